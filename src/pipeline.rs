//! Validation Pipeline
//!
//! Orchestrates one validation request: resolve the schema, register the
//! caller's definitions, validate the main string, aggregate the findings.
//!
//! The short-circuit rules are modeled as an explicit state machine rather
//! than early returns scattered through the code: each transition either
//! produces the next stage's input or a terminal result.
//!
//! The pipeline never fails: every failure mode is represented as a
//! finding inside the returned result.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::schema::{Schema, SchemaRegistry};
use crate::validation::definitions::{self, DefinitionRegistry};
use crate::validation::{codes, engine, Finding};

/// One validation request, matching the JSON wire shape
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRequest {
    pub hed_string: String,
    pub hed_version: String,
    #[serde(default)]
    pub check_for_warnings: bool,
    #[serde(default)]
    pub definitions: Vec<String>,
}

/// The verdict for one request
///
/// `warnings` is forced empty when the request did not ask for warnings.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct ValidationResult {
    pub errors: Vec<Finding>,
    pub warnings: Vec<Finding>,
}

impl ValidationResult {
    pub fn from_errors(errors: Vec<Finding>) -> Self {
        Self {
            errors,
            warnings: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Pipeline stages; each carries exactly the data the next transition needs
enum Stage {
    ResolvingSchema,
    RegisteringDefinitions {
        schema: Arc<Schema>,
    },
    ValidatingString {
        schema: Arc<Schema>,
        registry: DefinitionRegistry,
        definition_warnings: Vec<Finding>,
    },
}

/// Run one validation request against the schema registry.
///
/// Short-circuit contract:
/// - an unresolvable version terminates with a single SCHEMA_LOAD_FAILED
///   error and no warnings;
/// - any definition error terminates with the definition errors, in input
///   order, and no warnings - the main string is never validated and
///   definition-body warnings are dropped even when requested;
/// - otherwise the main string is validated and its warnings are merged
///   with the definition-body warnings when warnings were requested.
pub async fn validate_request(
    request: &ValidationRequest,
    schemas: &SchemaRegistry,
) -> ValidationResult {
    let mut stage = Stage::ResolvingSchema;

    loop {
        stage = match stage {
            Stage::ResolvingSchema => match schemas.resolve(&request.hed_version).await {
                Ok(schema) => Stage::RegisteringDefinitions { schema },
                Err(e) => {
                    log::debug!("Schema resolution failed: {}", e);
                    return ValidationResult::from_errors(vec![Finding::error(
                        codes::SCHEMA_LOAD_FAILED,
                        format!(
                            "Failed to load HED schema version '{}': {}",
                            request.hed_version, e
                        ),
                    )]);
                }
            },

            Stage::RegisteringDefinitions { schema } => {
                let outcome = definitions::register_definitions(&request.definitions, &schema);
                if !outcome.errors.is_empty() {
                    return ValidationResult::from_errors(outcome.errors);
                }
                Stage::ValidatingString {
                    schema,
                    registry: outcome.registry,
                    definition_warnings: outcome.warnings,
                }
            }

            Stage::ValidatingString {
                schema,
                registry,
                definition_warnings,
            } => {
                let findings = engine::validate_string(&request.hed_string, &schema, &registry);
                let (errors, string_warnings): (Vec<Finding>, Vec<Finding>) =
                    findings.into_iter().partition(Finding::is_error);

                let warnings = if request.check_for_warnings {
                    let mut warnings = string_warnings;
                    warnings.extend(definition_warnings);
                    warnings
                } else {
                    Vec::new()
                };

                return ValidationResult { errors, warnings };
            }
        };
    }
}
