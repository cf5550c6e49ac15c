//! CLI command implementations.
//!
//! Each submodule corresponds to a top-level CLI command. Commands return
//! `Result<(), String>`; `main` prints the error and exits with status 1.

pub mod call;
pub mod locales;
pub mod modules;
pub mod server;
pub mod whoami;

/// Pretty-print a JSON value to stdout.
pub fn print_json(value: &serde_json::Value) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
    );
}
