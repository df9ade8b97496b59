//! Conversion job: resolve formats, pick a backend, decode, encode

use std::path::{Path, PathBuf};
use std::time::Instant;

use super::backend::{select_backend, ActiveBackend, Availability, Backend, BackendKind};
use super::error::{ConvertError, Side};
use super::format::{resolve_output_token, FormatCode, MimeRegistry};
use crate::report::ConversionSummary;
use crate::utils::{create_spinner, log_info};

/// How input and output formats are determined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatSelection {
    /// Input via MIME lookup, output via file suffix
    Detect,
    /// Both formats given explicitly
    Explicit { input: FormatCode, output: FormatCode },
}

/// Settings for one conversion run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub formats: FormatSelection,
    pub force_fallback: bool,
}

impl ConvertConfig {
    /// Detect both formats from the file names
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            formats: FormatSelection::Detect,
            force_fallback: false,
        }
    }

    pub fn with_formats(mut self, input: FormatCode, output: FormatCode) -> Self {
        self.formats = FormatSelection::Explicit { input, output };
        self
    }

    pub fn with_force_fallback(mut self, force: bool) -> Self {
        self.force_fallback = force;
        self
    }
}

/// Fully resolved parameters of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub input_format: String,
    pub output_format: String,
    pub backend: BackendKind,
}

impl ConversionJob {
    /// Resolve format tokens and the backend for `config`.
    pub fn resolve(
        config: &ConvertConfig,
        registry: &MimeRegistry,
        availability: Availability,
    ) -> Result<Self, ConvertError> {
        let (input_format, output_format) = match config.formats {
            FormatSelection::Detect => (
                registry.resolve_input_token(&config.input)?,
                resolve_output_token(&config.output),
            ),
            FormatSelection::Explicit { input, output } => {
                (input.token().to_string(), output.token().to_string())
            }
        };

        let backend = select_backend(availability, config.force_fallback)?;

        Ok(Self {
            input: config.input.clone(),
            output: config.output.clone(),
            input_format,
            output_format,
            backend,
        })
    }
}

/// Run a conversion with the backends compiled into this build.
pub fn run_conversion(config: &ConvertConfig) -> Result<ConversionSummary, ConvertError> {
    run_conversion_with(config, Availability::detect())
}

/// Run a conversion given which backends are usable.
///
/// Missing backends are reported before any file is touched.
pub fn run_conversion_with(
    config: &ConvertConfig,
    availability: Availability,
) -> Result<ConversionSummary, ConvertError> {
    availability.ensure_any()?;

    let registry = MimeRegistry::tabular();
    let job = ConversionJob::resolve(config, &registry, availability)?;
    log_info(&format!("Using the {} processor.", job.backend));

    match ActiveBackend::new(job.backend)? {
        #[cfg(feature = "polars-backend")]
        ActiveBackend::Polars(backend) => execute(&backend, &job),
        #[cfg(feature = "arrow-backend")]
        ActiveBackend::Arrow(backend) => execute(&backend, &job),
    }
}

/// Decode and encode `job` with a single backend.
pub fn execute<B: Backend>(backend: &B, job: &ConversionJob) -> Result<ConversionSummary, ConvertError> {
    let reader = backend.dispatch().lookup(&job.input_format, Side::Read)?;
    let writer = backend.dispatch().lookup(&job.output_format, Side::Write)?;

    log_info("Reading input file");
    let spinner = create_spinner(&format!("Reading {}...", display_name(&job.input)));
    let start_read = Instant::now();
    let decoded = (reader.decode)(job.input.as_path());
    let read_time = start_read.elapsed();
    spinner.finish_and_clear();
    let mut table = decoded.map_err(|source| ConvertError::Decode {
        path: job.input.clone(),
        format: reader.format,
        source,
    })?;
    let (rows, columns) = B::shape(&table);

    log_info("Writing output file");
    let spinner = create_spinner(&format!("Writing {}...", display_name(&job.output)));
    let start_write = Instant::now();
    let encoded = (writer.encode)(&mut table, job.output.as_path());
    let write_time = start_write.elapsed();
    spinner.finish_and_clear();
    encoded.map_err(|source| ConvertError::Encode {
        path: job.output.clone(),
        format: writer.format,
        source,
    })?;

    let summary = ConversionSummary {
        input: job.input.clone(),
        output: job.output.clone(),
        input_format: reader.format,
        output_format: writer.format,
        backend: backend.kind(),
        rows,
        columns,
        read_time,
        write_time,
    };

    log_info(&format!(
        "Read execution time: {} seconds",
        summary.read_time.as_secs_f64()
    ));
    log_info(&format!(
        "Write execution time: {} seconds",
        summary.write_time.as_secs_f64()
    ));
    log_info(&format!(
        "Total execution time: {} seconds",
        summary.total_time().as_secs_f64()
    ));

    Ok(summary)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn both() -> Availability {
        Availability {
            primary: true,
            fallback: true,
        }
    }

    #[test]
    fn test_resolve_detect_mode() {
        let config = ConvertConfig::new("in/data.feather", "out/report.final.v2.csv");
        let job = ConversionJob::resolve(&config, &MimeRegistry::tabular(), both()).unwrap();

        assert_eq!(job.input_format, "arrow");
        assert_eq!(job.output_format, "csv");
        assert_eq!(job.backend, BackendKind::Polars);
    }

    #[test]
    fn test_resolve_explicit_mode_skips_extensions() {
        let config = ConvertConfig::new("no_extension", "also_none")
            .with_formats(FormatCode::Ipc, FormatCode::Xlsx)
            .with_force_fallback(true);
        let job = ConversionJob::resolve(&config, &MimeRegistry::tabular(), both()).unwrap();

        assert_eq!(job.input_format, "ipc");
        assert_eq!(job.output_format, "xlsx");
        assert_eq!(job.backend, BackendKind::Arrow);
    }

    #[test]
    fn test_resolve_unknown_input_extension() {
        let config = ConvertConfig::new("data.unknownext", "out.csv");
        let result = ConversionJob::resolve(&config, &MimeRegistry::tabular(), both());

        assert!(matches!(result, Err(ConvertError::FormatResolution { .. })));
    }

    #[test]
    fn test_missing_backend_before_file_access() {
        let config = ConvertConfig::new("/nonexistent/dir/data.csv", "/nonexistent/dir/out.parquet");
        let none = Availability {
            primary: false,
            fallback: false,
        };

        assert!(matches!(
            run_conversion_with(&config, none),
            Err(ConvertError::MissingBackend)
        ));
    }
}
