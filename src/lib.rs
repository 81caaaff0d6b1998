//! HED Validation Server
//!
//! A validation service for HED (Hierarchical Event Descriptor) annotation
//! strings.
//!
//! This library provides:
//! - HED string parsing and schema-based validation
//! - Caller-supplied definition registration with conflict detection
//! - A short-circuiting validation pipeline producing `{errors, warnings}`
//! - Schema version resolution from embedded and user vocabularies
//! - A line-delimited JSON transport over stdio

pub mod config;
pub mod parser;
pub mod pipeline;
pub mod schema;
pub mod server;
pub mod validation;

// Re-exports for clean public API
pub use config::Config;
pub use pipeline::{validate_request, ValidationRequest, ValidationResult};
pub use schema::{Schema, SchemaRegistry};
pub use validation::{codes, Finding, Severity};
