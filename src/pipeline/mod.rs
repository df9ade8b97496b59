//! Pipeline module - format resolution, backend dispatch and conversion

#[cfg(feature = "arrow-backend")]
pub mod arrow_backend;
pub mod backend;
pub mod error;
pub mod format;
pub mod job;
#[cfg(feature = "polars-backend")]
pub mod polars_backend;
pub mod spreadsheet;

#[cfg(feature = "arrow-backend")]
pub use arrow_backend::{ArrowBackend, ArrowTable};
pub use backend::*;
pub use error::*;
pub use format::*;
pub use job::*;
#[cfg(feature = "polars-backend")]
pub use polars_backend::PolarsBackend;
