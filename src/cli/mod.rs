//! CLI module - argument parsing

mod args;

pub use args::{expand_single_dash_flags, Cli};
