//! CLI support for molang-lang
//!
//! Provides programmatic access to the CLI commands so they can be
//! embedded in other tools.

mod check;
mod eval;
mod tokens;

pub use check::execute_check;
pub use eval::{EvalOptions, execute_eval};
pub use tokens::execute_tokens;

use std::io;

/// Errors that can occur during CLI operations
#[derive(Debug)]
pub enum CliError {
    /// Parse error in the script
    Parse(crate::ParseError),
    /// Binding registration error
    Binding(crate::BindingError),
    /// JSON parsing error
    Json(serde_json::Error),
    /// IO error
    Io(io::Error),
    /// The context document was valid JSON but not an object
    ContextNotAnObject,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Parse(e) => write!(f, "Parse error: {}", e),
            CliError::Binding(e) => write!(f, "Binding error: {}", e),
            CliError::Json(e) => write!(f, "Invalid JSON: {}", e),
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::ContextNotAnObject => {
                write!(f, "The context must be a JSON object, e.g. '{{\"health\": 20}}'")
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Parse(e) => Some(e),
            CliError::Binding(e) => Some(e),
            CliError::Json(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<crate::ParseError> for CliError {
    fn from(e: crate::ParseError) -> Self {
        CliError::Parse(e)
    }
}

impl From<crate::BindingError> for CliError {
    fn from(e: crate::BindingError) -> Self {
        CliError::Binding(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}
