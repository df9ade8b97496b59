//! Tests for CLI argument parsing

use clap::Parser;
use dfconv::cli::Cli;
use dfconv::pipeline::{FormatCode, FormatSelection};
use std::path::PathBuf;

#[test]
fn test_cli_short_flags() {
    let cli = Cli::parse_from(["dfconv", "-i", "data.csv", "-o", "data.parquet"]);

    assert_eq!(cli.input_file, PathBuf::from("data.csv"));
    assert_eq!(cli.output_file, PathBuf::from("data.parquet"));
    assert!(cli.input_format.is_none());
    assert!(cli.output_format.is_none());
    assert!(!cli.force_fallback, "Default force_fallback should be false");
}

#[test]
fn test_cli_long_flags() {
    let cli = Cli::parse_from([
        "dfconv",
        "--input-file",
        "in.xlsx",
        "--output-file",
        "out.feather",
        "--force-fallback",
    ]);

    assert_eq!(cli.input_file, PathBuf::from("in.xlsx"));
    assert_eq!(cli.output_file, PathBuf::from("out.feather"));
    assert!(cli.force_fallback);
}

#[test]
fn test_cli_force_aliases() {
    for flag in ["-f", "--fp", "--force-pandas"] {
        let cli = Cli::parse_from(["dfconv", "-i", "a.csv", "-o", "b.csv", flag]);
        assert!(cli.force_fallback, "{} should force the fallback backend", flag);
    }
}

#[test]
fn test_cli_detect_mode_config() {
    let cli = Cli::parse_from(["dfconv", "-i", "a.csv", "-o", "b.parquet"]);
    let config = cli.config();

    assert_eq!(config.formats, FormatSelection::Detect);
    assert_eq!(config.input, PathBuf::from("a.csv"));
    assert_eq!(config.output, PathBuf::from("b.parquet"));
}

#[test]
fn test_cli_explicit_formats() {
    let cli = Cli::parse_from([
        "dfconv",
        "--if",
        "ipc",
        "--of",
        "xlsx",
        "-i",
        "input.bin",
        "-o",
        "output.bin",
    ]);

    assert_eq!(cli.input_format, Some(FormatCode::Ipc));
    assert_eq!(cli.output_format, Some(FormatCode::Xlsx));
    assert_eq!(
        cli.config().formats,
        FormatSelection::Explicit {
            input: FormatCode::Ipc,
            output: FormatCode::Xlsx,
        }
    );
}

#[test]
fn test_cli_rejects_unknown_format_choice() {
    let result = Cli::try_parse_from([
        "dfconv",
        "--input-format",
        "feather",
        "--output-format",
        "csv",
        "-i",
        "a",
        "-o",
        "b",
    ]);

    assert!(result.is_err(), "Only csv, ipc, parquet and xlsx are valid choices");
}

#[test]
fn test_cli_format_flags_require_each_other() {
    let result = Cli::try_parse_from(["dfconv", "--input-format", "csv", "-i", "a", "-o", "b"]);
    assert!(result.is_err());

    let result = Cli::try_parse_from(["dfconv", "--output-format", "csv", "-i", "a", "-o", "b"]);
    assert!(result.is_err());
}

#[test]
fn test_cli_requires_input_and_output() {
    assert!(Cli::try_parse_from(["dfconv", "-o", "out.csv"]).is_err());
    assert!(Cli::try_parse_from(["dfconv", "-i", "in.csv"]).is_err());
    assert!(Cli::try_parse_from(["dfconv"]).is_err());
}

#[test]
fn test_cli_single_dash_force_flag() {
    let cli = Cli::try_parse_args(["dfconv", "-i", "a.csv", "-o", "b.csv", "-fp"]).unwrap();
    assert!(cli.force_fallback, "-fp should force the fallback backend");
}

#[test]
fn test_cli_single_dash_format_flags() {
    let cli = Cli::try_parse_args([
        "dfconv", "-if", "csv", "-of", "ipc", "-i", "a", "-o", "b", "-fp",
    ])
    .unwrap();

    assert_eq!(cli.input_format, Some(FormatCode::Csv));
    assert_eq!(cli.output_format, Some(FormatCode::Ipc));
    assert!(cli.force_fallback);
    assert_eq!(
        cli.config().formats,
        FormatSelection::Explicit {
            input: FormatCode::Csv,
            output: FormatCode::Ipc,
        }
    );
}

#[test]
fn test_cli_single_dash_format_flags_require_each_other() {
    let result = Cli::try_parse_args(["dfconv", "-if", "csv", "-i", "a", "-o", "b"]);
    assert!(result.is_err());
}

#[test]
fn test_cli_parse_args_keeps_standard_flags() {
    let cli = Cli::try_parse_args(["dfconv", "-i", "a.csv", "-o", "b.parquet", "-f"]).unwrap();

    assert_eq!(cli.input_file, PathBuf::from("a.csv"));
    assert_eq!(cli.output_file, PathBuf::from("b.parquet"));
    assert!(cli.force_fallback);
}
