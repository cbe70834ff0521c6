//! logtally command-line front end.
//!
//! Parses flags, layers them over an optional TOML config file, runs the
//! analysis, writes reports and the optional AI summary, and prints a console
//! summary.

pub mod app;
pub mod cli;
pub mod config;
pub mod console;
