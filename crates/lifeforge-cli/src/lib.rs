//! Library half of the `forge` binary, so command implementations can be
//! exercised from integration tests.

pub mod commands;

/// Log filter used when `RUST_LOG` is unset. `forge server` installs the
/// subscriber before the server starts, so the server and request-trace
/// targets have to be listed here too.
pub const DEFAULT_LOG_FILTER: &str =
    "lifeforge_core=warn,lifeforge_cli=info,lifeforge_server=info,tower_http=info";
