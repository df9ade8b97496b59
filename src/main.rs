//! dfconv: DataFrame Format Converter
//!
//! A command-line tool for converting a single tabular file between
//! CSV, Arrow/Feather, Parquet and Excel formats.

use anyhow::Result;

use dfconv::cli::Cli;
use dfconv::pipeline::run_conversion;
use dfconv::utils::print_success;

fn main() -> Result<()> {
    let cli = Cli::parse_args(std::env::args_os());
    let config = cli.config();

    let summary = run_conversion(&config)?;

    summary.display();
    print_success(&format!("Saved to {}", summary.output.display()));

    Ok(())
}
