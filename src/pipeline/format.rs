//! Format resolution: file names and flags to format tokens
//!
//! Input files are resolved through an extension -> MIME -> extension round
//! trip, output files take the last dot-segment of their name literally.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use clap::ValueEnum;

use super::error::ConvertError;

/// MIME type registered for Apache Parquet files
pub const PARQUET_MIME: &str = "application/vnd.apache.parquet";

/// MIME type registered for Arrow IPC / Feather files
pub const FEATHER_MIME: &str = "application/vnd.apache.arrow.feather";

/// Canonical tabular file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum FormatCode {
    /// Comma-separated text
    Csv,
    /// Arrow IPC file (also known as Feather v2)
    Ipc,
    /// Apache Parquet
    Parquet,
    /// Excel workbook
    Xlsx,
}

impl FormatCode {
    /// Canonical token for this format, as accepted by the explicit format flags
    pub fn token(self) -> &'static str {
        match self {
            FormatCode::Csv => "csv",
            FormatCode::Ipc => "ipc",
            FormatCode::Parquet => "parquet",
            FormatCode::Xlsx => "xlsx",
        }
    }

    /// Map a format token to its format; `arrow` and `feather` are IPC spellings.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "csv" => Some(FormatCode::Csv),
            "ipc" | "arrow" | "feather" => Some(FormatCode::Ipc),
            "parquet" => Some(FormatCode::Parquet),
            "xlsx" => Some(FormatCode::Xlsx),
            _ => None,
        }
    }
}

impl fmt::Display for FormatCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormatCode::Csv => "CSV",
            FormatCode::Ipc => "Arrow IPC",
            FormatCode::Parquet => "Parquet",
            FormatCode::Xlsx => "Excel",
        };
        write!(f, "{}", name)
    }
}

// Extension/MIME pairs registered before any custom type. Order matters for
// `guess_extension`: the first extension listed for a MIME type wins.
const STANDARD_TYPES: &[(&str, &str)] = &[
    (".csv", "text/csv"),
    (".tsv", "text/tab-separated-values"),
    (".txt", "text/plain"),
    (".json", "application/json"),
    (".xml", "text/xml"),
    (".html", "text/html"),
    (".htm", "text/html"),
    (".xls", "application/vnd.ms-excel"),
    (
        ".xlsx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ),
    (".ods", "application/vnd.oasis.opendocument.spreadsheet"),
    (".zip", "application/zip"),
    (".pdf", "application/pdf"),
    (".sql", "application/sql"),
];

/// Extension <-> MIME type table used to identify input files
#[derive(Debug, Clone, Default)]
pub struct MimeRegistry {
    by_extension: HashMap<String, String>,
    by_type: HashMap<String, Vec<String>>,
}

impl MimeRegistry {
    /// Registry with no associations at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry seeded with the standard extension table
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        for (ext, mime) in STANDARD_TYPES {
            registry.add_type(mime, ext);
        }
        registry
    }

    /// Standard table plus the Parquet and Arrow/Feather associations
    pub fn tabular() -> Self {
        let mut registry = Self::standard();
        registry.add_type(PARQUET_MIME, ".parquet");
        for ext in [".arrow", ".feather"] {
            registry.add_type(FEATHER_MIME, ext);
        }
        registry
    }

    /// Associate `ext` (with or without leading dot) with `mime`
    pub fn add_type(&mut self, mime: &str, ext: &str) {
        let ext = normalize_extension(ext);
        self.by_extension.insert(ext.clone(), mime.to_string());

        let extensions = self.by_type.entry(mime.to_string()).or_default();
        if !extensions.contains(&ext) {
            extensions.push(ext);
        }
    }

    /// MIME type for the final extension of `path`, if registered
    pub fn guess_type(&self, path: &Path) -> Option<&str> {
        let ext = path.extension()?.to_str()?;
        self.by_extension
            .get(&normalize_extension(ext))
            .map(String::as_str)
    }

    /// First extension (with leading dot) registered for `mime`
    pub fn guess_extension(&self, mime: &str) -> Option<&str> {
        self.by_type
            .get(mime)
            .and_then(|exts| exts.first())
            .map(String::as_str)
    }

    /// Resolve an input file to its format token via its MIME type.
    ///
    /// Fails with `FormatResolution` when the extension is not registered.
    pub fn resolve_input_token(&self, path: &Path) -> Result<String, ConvertError> {
        let unresolved = || ConvertError::FormatResolution {
            path: path.to_path_buf(),
        };

        let mime = self.guess_type(path).ok_or_else(unresolved)?;
        let ext = self.guess_extension(mime).ok_or_else(unresolved)?;
        Ok(ext.trim_start_matches('.').to_string())
    }
}

/// Output format token: everything after the last '.' of the file name.
///
/// A name without a dot yields the whole name, which no dispatch table knows.
pub fn resolve_output_token(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());

    match name.rsplit_once('.') {
        Some((_, suffix)) => suffix.to_string(),
        None => name,
    }
}

fn normalize_extension(ext: &str) -> String {
    format!(".{}", ext.trim_start_matches('.').to_lowercase())
}
