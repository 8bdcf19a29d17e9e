//! Error handlers
//!
//! Provides error reporting and exit-code mapping for the command line.

use crate::error::types::{ErrorKind, ScriptError};
use log::{error, warn};

/// Log a script error
pub fn handle_error(err: &ScriptError) {
    if err.is_credential_failure() {
        warn!("{} for {}", err.kind(), err);
    } else {
        error!("{}: {}", err.kind(), err);
    }
}

/// Convert error to a process exit code (sysexits.h values)
pub fn exit_code(err: &ScriptError) -> u8 {
    match err.kind() {
        ErrorKind::ConnectionError => 69,
        ErrorKind::QueryError => 69,
        ErrorKind::NotFoundError => 77,
        ErrorKind::InvalidSecretError => 77,
        ErrorKind::HashError => 65,
        ErrorKind::ConfigurationError => 78,
    }
}
