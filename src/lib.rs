//! Decode-throughput benchmarks for the rowbin row-oriented binary record
//! format, plus the criterion-compatible report tree they share with other
//! producers and the aggregation/charting pipeline over it.

pub mod aggregate;
pub mod codec;
pub mod dataset;
pub mod error;
pub mod harness;
pub mod plot;
pub mod report;
pub mod schema;
pub mod suite;

pub use error::{BenchError, Result};
