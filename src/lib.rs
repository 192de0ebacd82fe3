//! Fluent, composable expressions for filtering and transforming tabular
//! data and scalar values.
//!
//! Expression trees are built with operator overloads and fluent builders,
//! then evaluated lazily against a frame or a value:
//!
//! ```
//! use rowsift::expr::col;
//! use rowsift::frame::{Column, DataFrame};
//! use rowsift::selection::{dfilter, Filter};
//!
//! let df = DataFrame::from_columns([
//!     ("name", Column::from(vec!["ada", "grace", "alan"])),
//!     ("score", Column::from(vec![35i64, 51, 41])),
//! ])?;
//! let picked = dfilter(&df, [Filter::from(col("score").ge(40))])?;
//! assert_eq!(picked.num_rows(), 2);
//! # Ok::<(), rowsift::error::EvalError>(())
//! ```

pub mod collections;
pub mod error;
pub mod expr;
pub mod frame;
pub mod hashing;
pub mod operator;
pub mod selection;
pub mod sequences;
pub mod stats;
