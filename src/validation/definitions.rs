//! Definition Registrar
//!
//! Parses caller-supplied definition expressions like
//! `(Definition/MyDef, (Red, Blue))` into a per-request registry and
//! detects name conflicts. The registry is consulted by the string
//! validation engine to resolve `Def/<name>` references.

use std::collections::HashMap;

use crate::parser::{self, HedItem};
use crate::schema::Schema;
use crate::validation::{codes, engine, Finding};

/// A named, reusable tag group declared by the caller
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    pub name: String,
    pub body: Vec<HedItem>,
    /// Canonical lowercase rendering of the body, used for conflict checks
    normalized_body: String,
}

impl Definition {
    pub fn normalized_body(&self) -> &str {
        &self.normalized_body
    }
}

/// Registry of definitions, scoped to a single validation request
#[derive(Debug, Clone, Default)]
pub struct DefinitionRegistry {
    by_name: HashMap<String, Definition>,
}

impl DefinitionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Look up a definition by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&Definition> {
        self.by_name.get(&name.to_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(&name.to_lowercase())
    }

    /// Insert a definition, detecting name conflicts.
    ///
    /// A re-declaration with an identical body is a no-op; the same name
    /// bound to a different body is a conflict error. The earlier
    /// definition is never silently overwritten.
    fn insert(&mut self, definition: Definition) -> Result<(), Finding> {
        let key = definition.name.to_lowercase();
        match self.by_name.get(&key) {
            None => {
                self.by_name.insert(key, definition);
                Ok(())
            }
            Some(existing) if existing.normalized_body == definition.normalized_body => Ok(()),
            Some(existing) => Err(Finding::error(
                codes::DEFINITION_INVALID,
                format!(
                    "Definition '{}' is declared twice with different bodies: '{}' vs '{}'",
                    definition.name, existing.normalized_body, definition.normalized_body
                ),
            )),
        }
    }
}

/// Output of registering one request's definitions
#[derive(Debug, Default)]
pub struct RegistrationOutcome {
    pub registry: DefinitionRegistry,
    pub errors: Vec<Finding>,
    pub warnings: Vec<Finding>,
}

/// Parse and register a sequence of definition sources, in input order.
///
/// Every malformed source is reported; registration continues past errors
/// so the caller sees all of them at once. Warnings come from checking
/// definition bodies against the schema (e.g. extended tags).
pub fn register_definitions(sources: &[String], schema: &Schema) -> RegistrationOutcome {
    let mut outcome = RegistrationOutcome::default();

    for source in sources {
        match parse_definition(source, schema) {
            Ok(parsed) => {
                outcome.warnings.extend(parsed.warnings);
                if let Err(conflict) = outcome.registry.insert(parsed.definition) {
                    outcome.errors.push(conflict);
                }
            }
            Err(mut errors) => outcome.errors.append(&mut errors),
        }
    }

    log::debug!(
        "Registered {} definitions ({} errors, {} warnings)",
        outcome.registry.len(),
        outcome.errors.len(),
        outcome.warnings.len()
    );
    outcome
}

struct ParsedDefinition {
    definition: Definition,
    warnings: Vec<Finding>,
}

/// Parse one definition source into a named body group.
///
/// Expected shape: a single top-level group whose first item is a
/// `Definition/<name>` tag (an optional trailing `/#` placeholder is
/// accepted) and whose only other item is the parenthesized body.
fn parse_definition(source: &str, schema: &Schema) -> Result<ParsedDefinition, Vec<Finding>> {
    let invalid = |message: String| vec![Finding::error(codes::DEFINITION_INVALID, message)];

    let parsed = parser::parse_hed_string(source).map_err(|syntax_errors| {
        invalid(format!(
            "'{}' is not a parsable definition: {}",
            source,
            syntax_errors
                .iter()
                .map(|e| engine::syntax_error_to_finding(e).message)
                .collect::<Vec<_>>()
                .join("; ")
        ))
    })?;

    let [HedItem::Group(group)] = parsed.items.as_slice() else {
        return Err(invalid(format!(
            "'{}' is not a definition: expected a single parenthesized group",
            source
        )));
    };

    let Some(HedItem::Tag(head)) = group.first() else {
        return Err(invalid(format!(
            "'{}' is not a definition: the group must start with a Definition tag",
            source
        )));
    };
    if !head.is_definition() {
        return Err(invalid(format!(
            "'{}' is not a definition: the group must start with a Definition tag",
            source
        )));
    }

    let name = definition_name(head.components().as_slice()).ok_or_else(|| {
        invalid(format!(
            "'{}' has an invalid definition name in '{}'",
            source, head.text
        ))
    })?;

    let body = match &group[1..] {
        [HedItem::Group(body)] => body.clone(),
        [] => {
            return Err(invalid(format!(
                "Definition '{}' is missing its parenthesized body group",
                name
            )));
        }
        _ => {
            return Err(invalid(format!(
                "Definition '{}' must contain exactly one parenthesized body group",
                name
            )));
        }
    };

    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    check_body(&body, schema, &name, &mut errors, &mut warnings);
    if !errors.is_empty() {
        return Err(errors);
    }

    let normalized_body = normalize_items(&body);
    Ok(ParsedDefinition {
        definition: Definition {
            name,
            body,
            normalized_body,
        },
        warnings,
    })
}

/// Extract and validate the name from `Definition/<name>` components.
///
/// Accepts an optional trailing `#` placeholder component.
fn definition_name(components: &[&str]) -> Option<String> {
    let name = match components {
        [_, name] => *name,
        [_, name, "#"] => *name,
        _ => return None,
    };

    let name_re = regex::Regex::new(r"^[A-Za-z0-9_-]+$").ok()?;
    if name_re.is_match(name) {
        Some(name.to_string())
    } else {
        None
    }
}

/// Check a definition body against the schema.
///
/// Def references and nested Definition declarations are illegal inside
/// a body; ordinary tags are checked like any other tag, with warnings
/// (e.g. TAG_EXTENDED) surfaced to the caller.
fn check_body(
    items: &[HedItem],
    schema: &Schema,
    definition_name: &str,
    errors: &mut Vec<Finding>,
    warnings: &mut Vec<Finding>,
) {
    for item in items {
        match item {
            HedItem::Tag(tag) if tag.is_def_reference() || tag.is_definition() => {
                errors.push(Finding::error(
                    codes::DEFINITION_INVALID,
                    format!(
                        "Definition '{}' may not contain '{}' in its body",
                        definition_name, tag.text
                    ),
                ));
            }
            HedItem::Tag(tag) => {
                if let Some(mut finding) = engine::check_tag(tag, schema) {
                    finding.message =
                        format!("In definition '{}': {}", definition_name, finding.message);
                    if finding.is_error() {
                        errors.push(finding);
                    } else {
                        warnings.push(finding);
                    }
                }
            }
            HedItem::Group(inner) => {
                check_body(inner, schema, definition_name, errors, warnings);
            }
        }
    }
}

/// Canonical lowercase rendering of a body, insensitive to whitespace
fn normalize_items(items: &[HedItem]) -> String {
    items
        .iter()
        .map(|item| match item {
            HedItem::Tag(tag) => tag.components().join("/").to_lowercase(),
            HedItem::Group(inner) => format!("({})", normalize_items(inner)),
        })
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{SchemaFile, SchemaMeta, TagDef};

    fn test_schema() -> Schema {
        let tags = ["Event", "Property/Sensory-property/Color/Red"]
            .iter()
            .map(|name| TagDef {
                name: name.to_string(),
                extension_allowed: true,
                takes_value: false,
                description: None,
            })
            .collect();
        Schema::from(SchemaFile {
            schema: SchemaMeta {
                name: "standard".to_string(),
                version: "8.4.0".to_string(),
                description: None,
            },
            tags,
        })
    }

    fn register(sources: &[&str]) -> RegistrationOutcome {
        let sources: Vec<String> = sources.iter().map(|s| s.to_string()).collect();
        register_definitions(&sources, &test_schema())
    }

    #[test]
    fn test_empty_sources_yield_empty_registry() {
        let outcome = register(&[]);
        assert!(outcome.registry.is_empty());
        assert!(outcome.errors.is_empty());
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_valid_definition_registers() {
        let outcome = register(&["(Definition/MyDef, (Event))"]);
        assert!(outcome.errors.is_empty());
        assert!(outcome.registry.contains("MyDef"));
        assert!(outcome.registry.contains("mydef"));
    }

    #[test]
    fn test_placeholder_name_is_accepted() {
        let outcome = register(&["(Definition/MyDef/#, (Event))"]);
        assert!(outcome.errors.is_empty());
        assert!(outcome.registry.contains("MyDef"));
    }

    #[test]
    fn test_missing_body_group_is_invalid() {
        let outcome = register(&["(Definition/BadDef, Red)"]);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].code, codes::DEFINITION_INVALID);
        assert!(outcome.registry.is_empty());
    }

    #[test]
    fn test_non_definition_text_is_invalid() {
        let outcome = register(&["Not a definition at all"]);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].code, codes::DEFINITION_INVALID);
    }

    #[test]
    fn test_all_malformed_sources_are_reported() {
        let outcome = register(&[
            "Not a definition at all",
            "(Definition/BadDef, Red)",
            "(Definition/GoodDef, (Event))",
        ]);
        assert_eq!(outcome.errors.len(), 2);
        assert!(outcome.registry.contains("GoodDef"));
    }

    #[test]
    fn test_conflicting_bodies_are_an_error() {
        let outcome = register(&[
            "(Definition/ConflictDef, (Red))",
            "(Definition/ConflictDef, (Event))",
        ]);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].code, codes::DEFINITION_INVALID);
        // The first body wins; the later one never overwrites it.
        let kept = outcome.registry.get("ConflictDef").unwrap();
        assert_eq!(kept.normalized_body(), "(red)");
    }

    #[test]
    fn test_identical_duplicate_is_a_no_op() {
        let outcome = register(&[
            "(Definition/DupDef, (Red))",
            "(definition/DupDef, ( RED ))",
        ]);
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.registry.len(), 1);
    }

    #[test]
    fn test_body_extension_surfaces_warning() {
        let outcome = register(&["(Definition/WarningDef, (Red/Blech))"]);
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].code, codes::TAG_EXTENDED);
    }

    #[test]
    fn test_def_reference_in_body_is_invalid() {
        let outcome = register(&["(Definition/SelfDef, (Def/Other))"]);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].code, codes::DEFINITION_INVALID);
    }
}
