//! dfconv: DataFrame Format Conversion Library
//!
//! Converts tabular files between CSV, Arrow IPC (Feather), Parquet and
//! Excel using one of two interchangeable table engines.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
