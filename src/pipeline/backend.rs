//! Backend selection and per-backend dispatch tables
//!
//! Two table engines can decode and encode every supported format. One of
//! them is chosen per run and used for both decode and encode; the table
//! type of each engine is an associated type, so a table from one engine
//! cannot reach the other engine's encoder.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use super::error::{BackendError, ConvertError, Side};
use super::format::FormatCode;

#[cfg(feature = "arrow-backend")]
use super::arrow_backend::ArrowBackend;
#[cfg(feature = "polars-backend")]
use super::polars_backend::PolarsBackend;

#[cfg(not(any(feature = "polars-backend", feature = "arrow-backend")))]
compile_error!("dfconv needs at least one of the `polars-backend` or `arrow-backend` features");

/// Table engines known to the converter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Primary engine
    Polars,
    /// Fallback engine
    Arrow,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Polars => write!(f, "Polars"),
            BackendKind::Arrow => write!(f, "Arrow"),
        }
    }
}

/// Which engines are usable in this process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Availability {
    pub primary: bool,
    pub fallback: bool,
}

impl Availability {
    /// Engines compiled into this build
    pub fn detect() -> Self {
        Self {
            primary: cfg!(feature = "polars-backend"),
            fallback: cfg!(feature = "arrow-backend"),
        }
    }

    /// Fail with `MissingBackend` when no engine is usable at all
    pub fn ensure_any(&self) -> Result<(), ConvertError> {
        if self.primary || self.fallback {
            Ok(())
        } else {
            Err(ConvertError::MissingBackend)
        }
    }
}

/// Pick the engine for this run.
///
/// Prefers the primary engine; `force_fallback` selects the fallback even
/// when the primary is available.
pub fn select_backend(
    availability: Availability,
    force_fallback: bool,
) -> Result<BackendKind, ConvertError> {
    availability.ensure_any()?;

    if force_fallback {
        return if availability.fallback {
            Ok(BackendKind::Arrow)
        } else {
            Err(ConvertError::FallbackUnavailable)
        };
    }

    if availability.primary {
        Ok(BackendKind::Polars)
    } else {
        Ok(BackendKind::Arrow)
    }
}

pub type DecodeFn<T> = fn(&Path) -> Result<T, BackendError>;
pub type EncodeFn<T> = fn(&mut T, &Path) -> Result<(), BackendError>;

/// Decode and encode routines for one format
pub struct Codec<T> {
    pub format: FormatCode,
    pub decode: DecodeFn<T>,
    pub encode: EncodeFn<T>,
}

/// Format token -> codec lookup for one engine
pub struct DispatchTable<T> {
    backend: BackendKind,
    codecs: Vec<Codec<T>>,
    tokens: HashMap<&'static str, usize>,
}

impl<T> DispatchTable<T> {
    pub fn new(backend: BackendKind) -> Self {
        Self {
            backend,
            codecs: Vec::new(),
            tokens: HashMap::new(),
        }
    }

    /// Register one codec under every token in `tokens`
    pub fn register(
        mut self,
        tokens: &[&'static str],
        format: FormatCode,
        decode: DecodeFn<T>,
        encode: EncodeFn<T>,
    ) -> Self {
        let index = self.codecs.len();
        self.codecs.push(Codec {
            format,
            decode,
            encode,
        });
        for token in tokens {
            self.tokens.insert(*token, index);
        }
        self
    }

    /// Codec for `token`, or `UnsupportedFormat` naming the side of the lookup
    pub fn lookup(&self, token: &str, side: Side) -> Result<&Codec<T>, ConvertError> {
        self.tokens
            .get(token)
            .map(|&index| &self.codecs[index])
            .ok_or_else(|| ConvertError::UnsupportedFormat {
                token: token.to_string(),
                side,
                backend: self.backend,
            })
    }

    /// Registered tokens, sorted
    pub fn tokens(&self) -> Vec<&'static str> {
        let mut tokens: Vec<_> = self.tokens.keys().copied().collect();
        tokens.sort_unstable();
        tokens
    }
}

/// Tokens each engine understands
pub const CSV_TOKENS: &[&str] = &["csv"];
pub const IPC_TOKENS: &[&str] = &["arrow", "feather", "ipc"];
pub const PARQUET_TOKENS: &[&str] = &["parquet"];
pub const XLSX_TOKENS: &[&str] = &["xlsx"];

/// A table engine with its dispatch table
pub trait Backend {
    /// In-memory table produced by decode and consumed by encode
    type Table;

    fn kind(&self) -> BackendKind;

    fn dispatch(&self) -> &DispatchTable<Self::Table>;

    /// (rows, columns) of a decoded table
    fn shape(table: &Self::Table) -> (usize, usize);
}

/// The engine chosen for this run
pub enum ActiveBackend {
    #[cfg(feature = "polars-backend")]
    Polars(PolarsBackend),
    #[cfg(feature = "arrow-backend")]
    Arrow(ArrowBackend),
}

impl ActiveBackend {
    /// Build the engine (and its dispatch table) for `kind`
    pub fn new(kind: BackendKind) -> Result<Self, ConvertError> {
        match kind {
            #[cfg(feature = "polars-backend")]
            BackendKind::Polars => Ok(ActiveBackend::Polars(PolarsBackend::new())),
            #[cfg(feature = "arrow-backend")]
            BackendKind::Arrow => Ok(ActiveBackend::Arrow(ArrowBackend::new())),
            #[allow(unreachable_patterns)]
            BackendKind::Arrow => Err(ConvertError::FallbackUnavailable),
            #[allow(unreachable_patterns)]
            BackendKind::Polars => Err(ConvertError::MissingBackend),
        }
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            #[cfg(feature = "polars-backend")]
            ActiveBackend::Polars(backend) => backend.kind(),
            #[cfg(feature = "arrow-backend")]
            ActiveBackend::Arrow(backend) => backend.kind(),
        }
    }
}
