//! Error types for format conversion.
//!
//! `ConvertError` names the stage that failed. Library failures raised while
//! decoding or encoding are carried unchanged as the `source` of the
//! `Decode`/`Encode` variants.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use super::backend::BackendKind;
use super::format::FormatCode;

/// Which side of the conversion a format token was looked up for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Read,
    Write,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Read => write!(f, "input"),
            Side::Write => write!(f, "output"),
        }
    }
}

/// Errors that terminate a conversion run.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// No table engine is available at all.
    #[error("Neither the Polars nor the Arrow backend was found. At least one of them must be available.")]
    MissingBackend,

    /// The fallback engine was forced but is not available.
    #[error("The Arrow backend was requested with --force-fallback but is not available in this build")]
    FallbackUnavailable,

    /// The input file's MIME type could not be determined from its extension.
    #[error("Input file format couldn't be identified for '{}'. Maybe the MIME type is wrong?", .path.display())]
    FormatResolution { path: PathBuf },

    /// The resolved format token has no codec in the active backend.
    #[error("Unsupported {side} format '{token}' for the {backend} backend")]
    UnsupportedFormat {
        token: String,
        side: Side,
        backend: BackendKind,
    },

    /// The backend rejected the input file.
    #[error("Failed to read {format} file: {}", .path.display())]
    Decode {
        path: PathBuf,
        format: FormatCode,
        #[source]
        source: BackendError,
    },

    /// The backend failed to write the output file.
    #[error("Failed to write {format} file: {}", .path.display())]
    Encode {
        path: PathBuf,
        format: FormatCode,
        #[source]
        source: BackendError,
    },
}

/// Library-level failures raised inside a backend codec.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[cfg(feature = "polars-backend")]
    #[error(transparent)]
    Polars(#[from] polars::prelude::PolarsError),

    #[cfg(feature = "arrow-backend")]
    #[error(transparent)]
    Arrow(#[from] arrow::error::ArrowError),

    #[cfg(feature = "arrow-backend")]
    #[error(transparent)]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error(transparent)]
    SpreadsheetRead(#[from] calamine::Error),

    #[error(transparent)]
    SpreadsheetWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Table shape that the target format cannot hold.
    #[error("{0}")]
    Layout(String),
}
