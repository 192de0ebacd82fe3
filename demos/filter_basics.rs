//! Demo of frame filtering with column expressions and per-column filters.

use rand::Rng;
use rowsift::expr::col;
use rowsift::frame::{Column, DataFrame};
use rowsift::operator::Cmp;
use rowsift::selection::{dfilter, partition, Filter};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("Frame Filtering Demo");
    println!("====================");

    let mut rng = rand::thread_rng();
    let departments = ["engineering", "sales", "support"];
    let names = ["ada", "grace", "alan", "edsger", "barbara", "donald"];
    let rows: Vec<(&str, &str, i64)> = names
        .iter()
        .map(|name| {
            (
                *name,
                departments[rng.gen_range(0..departments.len())],
                rng.gen_range(20_000..90_000),
            )
        })
        .collect();

    let df = DataFrame::from_columns([
        ("name", rows.iter().map(|r| r.0).collect::<Column>()),
        ("department", rows.iter().map(|r| r.1).collect::<Column>()),
        ("salary", rows.iter().map(|r| r.2).collect::<Column>()),
    ])?;
    println!("\nAll staff:\n{}", df);

    // Expression filter: salary above the midpoint
    let well_paid = dfilter(&df, [Filter::from(col("salary").ge(55_000))])?;
    println!("Earning 55k or more:\n{}", well_paid);

    // Per-column filters AND together
    let picked = dfilter(
        &df,
        [
            Filter::col("department", "engineering"),
            Filter::col("salary", Cmp::ge(40_000)),
        ],
    )?;
    println!("Engineering at 40k+:\n{}", picked);

    // Partition into disjoint halves
    let (support, rest) = partition(&df, [Filter::col("department", "support")])?;
    println!(
        "Support: {} rows, everyone else: {} rows",
        support.num_rows(),
        rest.num_rows()
    );

    Ok(())
}
