//! Conversion summary report

use std::path::PathBuf;
use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::{BackendKind, FormatCode};

/// Outcome of a finished conversion
#[derive(Debug, Clone)]
pub struct ConversionSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub input_format: FormatCode,
    pub output_format: FormatCode,
    pub backend: BackendKind,
    pub rows: usize,
    pub columns: usize,
    pub read_time: Duration,
    pub write_time: Duration,
}

impl ConversionSummary {
    pub fn total_time(&self) -> Duration {
        self.read_time + self.write_time
    }

    /// Output size relative to input size, when both files can be stat'ed
    pub fn size_ratio(&self) -> Option<f64> {
        let input = std::fs::metadata(&self.input).ok()?.len();
        let output = std::fs::metadata(&self.output).ok()?.len();
        if input == 0 {
            None
        } else {
            Some(output as f64 / input as f64)
        }
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("CONVERSION SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("📂 Input"),
            Cell::new(format!("{} ({})", self.input.display(), self.input_format)),
        ]);
        table.add_row(vec![
            Cell::new("💾 Output"),
            Cell::new(format!("{} ({})", self.output.display(), self.output_format)),
        ]);
        table.add_row(vec![
            Cell::new("⚙️  Backend"),
            Cell::new(self.backend).fg(Color::Cyan),
        ]);
        table.add_row(vec![
            Cell::new("📊 Shape"),
            Cell::new(format!("{} rows × {} columns", self.rows, self.columns)),
        ]);
        table.add_row(vec![
            Cell::new("⏱️  Read"),
            Cell::new(format_duration(self.read_time)),
        ]);
        table.add_row(vec![
            Cell::new("⏱️  Write"),
            Cell::new(format_duration(self.write_time)),
        ]);
        table.add_row(vec![
            Cell::new("✅ Total"),
            Cell::new(format_duration(self.total_time()))
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);

        if let Some(ratio) = self.size_ratio() {
            let color = if ratio < 1.0 { Color::Green } else { Color::Yellow };
            table.add_row(vec![
                Cell::new("📉 Size"),
                Cell::new(format!("{:.1}% of input", ratio * 100.0)).fg(color),
            ]);
        }

        // Indent the table
        for line in table.to_string().lines() {
            println!("    {}", line);
        }
        println!();
    }
}

/// Format a duration for display
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 1.0 {
        format!("{:.1}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.2}s", secs)
    } else {
        let mins = (secs / 60.0).floor();
        format!("{}m {:.1}s", mins as u64, secs - mins * 60.0)
    }
}
