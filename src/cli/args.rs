//! Command-line argument definitions using clap

use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::pipeline::{ConvertConfig, FormatCode};

/// Single-dash multi-letter flags and the long flags they stand for
const SINGLE_DASH_FLAGS: [(&str, &str); 3] = [
    ("-fp", "--force-pandas"),
    ("-if", "--input-format"),
    ("-of", "--output-format"),
];

/// dfconv - Convert between DataFrame formats
#[derive(Parser, Debug)]
#[command(name = "dfconv")]
#[command(author, version, about = "Convert between DataFrame formats", long_about = None)]
pub struct Cli {
    /// Input filename (CSV, Arrow/Feather, Parquet or XLSX)
    #[arg(short = 'i', long = "input-file", visible_alias = "input")]
    pub input_file: PathBuf,

    /// Output filename. Without --output-format the format is taken from
    /// the text after the last '.' of the file name.
    #[arg(short = 'o', long = "output-file", visible_alias = "output")]
    pub output_file: PathBuf,

    /// Input format, skipping extension detection. Requires --output-format.
    #[arg(long = "input-format", visible_alias = "if", value_enum, requires = "output_format")]
    pub input_format: Option<FormatCode>,

    /// Output format, skipping extension detection. Requires --input-format.
    #[arg(long = "output-format", visible_alias = "of", value_enum, requires = "input_format")]
    pub output_format: Option<FormatCode>,

    /// Force the fallback (Arrow) backend even when Polars is available
    #[arg(
        short = 'f',
        long = "force-fallback",
        visible_alias = "fp",
        alias = "force-pandas"
    )]
    pub force_fallback: bool,
}

impl Cli {
    /// Parse `args`, accepting `-fp`, `-if` and `-of`. Exits on usage errors.
    pub fn parse_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::parse_from(expand_single_dash_flags(args))
    }

    /// Like [`Cli::parse_args`], returning the usage error instead of exiting.
    pub fn try_parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(expand_single_dash_flags(args))
    }

    /// Build the conversion settings for this invocation.
    pub fn config(&self) -> ConvertConfig {
        let config = ConvertConfig::new(&self.input_file, &self.output_file)
            .with_force_fallback(self.force_fallback);

        match (self.input_format, self.output_format) {
            (Some(input), Some(output)) => config.with_formats(input, output),
            _ => config,
        }
    }
}

/// Rewrite `-fp`, `-if` and `-of` to their long forms.
///
/// clap reads a single dash as a cluster of one-letter flags, so these are
/// replaced before parsing. Arguments after `--` are left alone.
pub fn expand_single_dash_flags<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut expanded = Vec::new();
    let mut positional = false;

    for arg in args {
        let arg: OsString = arg.into();
        if !positional {
            if arg == "--" {
                positional = true;
            } else if let Some((_, long)) = SINGLE_DASH_FLAGS.iter().find(|(short, _)| arg == *short) {
                expanded.push(OsString::from(*long));
                continue;
            }
        }
        expanded.push(arg);
    }

    expanded
}
