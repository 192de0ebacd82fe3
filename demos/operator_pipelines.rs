//! Demo of scalar operator pipelines, predicates and fallbacks.

use rowsift::frame::Value;
use rowsift::operator::{operator, Cmp};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("Operator Pipeline Demo");
    println!("======================");

    // Pipe two stages with >>
    let plus_one = operator(|v| v.add(&Value::Int(1)));
    let doubled = operator(|v| v.mul(&Value::Int(2)));
    let pipeline = plus_one >> doubled;
    println!("(3 + 1) * 2 = {}", pipeline.eval(&Value::Int(3))?);

    // Predicates compose with | and &
    let in_range = Cmp::ge(0) & Cmp::lt(100);
    println!("50 in [0, 100): {}", in_range.eval(&Value::Int(50))?);
    println!("-1 in [0, 100): {}", in_range.eval(&Value::Int(-1))?);

    // A fallback turns a failing predicate into a value
    let guarded = Cmp::lt(10).fallback(false);
    println!(
        "\"oops\" < 10 with fallback: {}",
        guarded.eval(&Value::Str("oops".into()))?
    );

    // Mixed dirty data: OR of guarded predicates still resolves
    let dirty = [Value::Int(5), Value::Str("n/a".into()), Value::Float(7.5)];
    let usable = Cmp::lt(10).fallback(false) | Cmp::isin(vec!["n/a", "?"]).fallback(false);
    for value in &dirty {
        println!("usable({}) = {}", value, usable.eval(value)?);
    }

    Ok(())
}
