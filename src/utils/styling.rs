//! Terminal output: timestamped log lines and styled messages

use chrono::Local;
use console::style;

/// Timestamp layout used in log lines
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Format a log line as `<timestamp> - <message>`
pub fn format_log_line(message: &str) -> String {
    format!("{} - {}", Local::now().format(TIMESTAMP_FORMAT), message)
}

/// Write an informational log line to stderr
pub fn log_info(message: &str) {
    let line = format_log_line(message);
    match line.split_once(" - ") {
        Some((stamp, rest)) => eprintln!("{} - {}", style(stamp).for_stderr().dim(), rest),
        None => eprintln!("{}", line),
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}
