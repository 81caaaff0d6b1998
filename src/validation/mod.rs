//! Validation findings and the engines that produce them.

pub mod definitions;
pub mod engine;

use serde::Serialize;

/// Diagnostic codes originated by this crate.
///
/// The set is open by design: consumers must treat codes as opaque
/// identifiers, not an exhaustive enumeration.
pub mod codes {
    pub const SCHEMA_LOAD_FAILED: &str = "SCHEMA_LOAD_FAILED";
    pub const TAG_INVALID: &str = "TAG_INVALID";
    pub const TAG_EXTENDED: &str = "TAG_EXTENDED";
    pub const TAG_EMPTY: &str = "TAG_EMPTY";
    pub const DEF_INVALID: &str = "DEF_INVALID";
    pub const DEFINITION_INVALID: &str = "DEFINITION_INVALID";
    pub const PARENTHESES_MISMATCH: &str = "PARENTHESES_MISMATCH";
    pub const REQUEST_INVALID: &str = "REQUEST_INVALID";
}

/// Severity of a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single diagnostic record with a stable code
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub code: String,
    pub message: String,
    pub severity: Severity,
}

impl Finding {
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            severity: Severity::Error,
        }
    }

    pub fn warning(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            severity: Severity::Warning,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}
