//! String Validation Engine
//!
//! Checks a HED string against a schema and a definition registry,
//! producing findings partitioned by severity. Orchestration and
//! warning filtering live in the pipeline, not here.

use crate::parser::{self, HedItem, HedTag, SyntaxError};
use crate::schema::Schema;
use crate::validation::definitions::DefinitionRegistry;
use crate::validation::{codes, Finding};

/// Validate a HED string, resolving `Def/<name>` references against
/// the given registry.
///
/// An empty or whitespace-only string is valid and produces no findings.
pub fn validate_string(
    input: &str,
    schema: &Schema,
    definitions: &DefinitionRegistry,
) -> Vec<Finding> {
    let parsed = match parser::parse_hed_string(input) {
        Ok(parsed) => parsed,
        Err(syntax_errors) => {
            return syntax_errors.iter().map(syntax_error_to_finding).collect();
        }
    };

    let mut findings = Vec::new();
    walk_items(&parsed.items, schema, definitions, &mut findings);
    findings
}

/// Convert a parser syntax error into a finding
pub(crate) fn syntax_error_to_finding(error: &SyntaxError) -> Finding {
    match error {
        SyntaxError::UnbalancedParentheses => Finding::error(
            codes::PARENTHESES_MISMATCH,
            "Unbalanced parentheses in HED string",
        ),
        SyntaxError::EmptyTag => {
            Finding::error(codes::TAG_EMPTY, "Empty tag slot in HED string")
        }
    }
}

fn walk_items(
    items: &[HedItem],
    schema: &Schema,
    definitions: &DefinitionRegistry,
    findings: &mut Vec<Finding>,
) {
    for item in items {
        match item {
            HedItem::Tag(tag) => {
                if tag.is_def_reference() {
                    if let Some(finding) = check_def_reference(tag, definitions) {
                        findings.push(finding);
                    }
                } else if tag.is_definition() {
                    findings.push(Finding::error(
                        codes::DEFINITION_INVALID,
                        format!(
                            "'{}': Definition expressions are not allowed in a HED string",
                            tag.text
                        ),
                    ));
                } else if let Some(finding) = check_tag(tag, schema) {
                    findings.push(finding);
                }
            }
            HedItem::Group(inner) => {
                walk_items(inner, schema, definitions, findings);
            }
        }
    }
}

/// Check a `Def/<name>` reference against the registry
fn check_def_reference(tag: &HedTag, definitions: &DefinitionRegistry) -> Option<Finding> {
    let components = tag.components();
    let name = components.get(1).copied().unwrap_or("");

    if name.is_empty() {
        return Some(Finding::error(
            codes::DEF_INVALID,
            format!("'{}': Def reference is missing a definition name", tag.text),
        ));
    }
    if !definitions.contains(name) {
        return Some(Finding::error(
            codes::DEF_INVALID,
            format!("'{}': no definition named '{}' was provided", tag.text, name),
        ));
    }
    None
}

/// Check an ordinary vocabulary tag against the schema
///
/// Returns at most one finding: either a TAG_INVALID error or a
/// TAG_EXTENDED warning for a permitted extension.
pub(crate) fn check_tag(tag: &HedTag, schema: &Schema) -> Option<Finding> {
    let components = tag.components();

    if components.iter().any(|c| c.is_empty()) {
        return Some(Finding::error(
            codes::TAG_INVALID,
            format!("'{}' contains an empty path component", tag.text),
        ));
    }

    let Some(base) = schema.resolve_base(components[0]) else {
        return Some(Finding::error(
            codes::TAG_INVALID,
            format!(
                "'{}' is not a tag in the {} schema",
                components[0], schema.name
            ),
        ));
    };

    let mut resolved_path = base.name.clone();
    let mut extension_allowed = base.extension_allowed;
    let mut takes_value = base.takes_value;
    let mut index = 1;

    while index < components.len() {
        let candidate = format!("{}/{}", resolved_path, components[index]);
        match schema.tag_by_path(&candidate) {
            Some(child) => {
                resolved_path = child.name.clone();
                extension_allowed |= child.extension_allowed;
                takes_value = child.takes_value;
                index += 1;
            }
            None => break,
        }
    }

    if index == components.len() {
        return None;
    }

    let remainder = components[index..].join("/");

    // A value tag consumes exactly one trailing component as its value.
    if takes_value && components.len() - index == 1 {
        return None;
    }

    if extension_allowed {
        return Some(Finding::warning(
            codes::TAG_EXTENDED,
            format!("'{}' extends '{}' with '{}'", tag.text, resolved_path, remainder),
        ));
    }

    Some(Finding::error(
        codes::TAG_INVALID,
        format!("'{}' is not valid under '{}'", tag.text, resolved_path),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{SchemaFile, SchemaMeta, TagDef};
    use crate::validation::Severity;

    fn test_schema() -> Schema {
        let tags = vec![
            tag("Event", false, false),
            tag("Event/Sensory-event", false, false),
            tag("Item", true, false),
            tag("Property/Sensory-property/Color/Red", true, false),
            tag("Label", false, true),
        ];
        Schema::from(SchemaFile {
            schema: SchemaMeta {
                name: "standard".to_string(),
                version: "8.4.0".to_string(),
                description: None,
            },
            tags,
        })
    }

    fn tag(name: &str, extension_allowed: bool, takes_value: bool) -> TagDef {
        TagDef {
            name: name.to_string(),
            extension_allowed,
            takes_value,
            description: None,
        }
    }

    #[test]
    fn test_known_tag_is_valid() {
        let schema = test_schema();
        assert!(check_tag(&HedTag::new("Event/Sensory-event"), &schema).is_none());
        assert!(check_tag(&HedTag::new("event"), &schema).is_none());
    }

    #[test]
    fn test_short_form_is_valid() {
        let schema = test_schema();
        assert!(check_tag(&HedTag::new("Sensory-event"), &schema).is_none());
        assert!(check_tag(&HedTag::new("Red"), &schema).is_none());
    }

    #[test]
    fn test_unknown_tag_is_error() {
        let schema = test_schema();
        let finding = check_tag(&HedTag::new("InvalidTag"), &schema).unwrap();
        assert_eq!(finding.code, codes::TAG_INVALID);
        assert_eq!(finding.severity, Severity::Error);
    }

    #[test]
    fn test_extension_is_warning() {
        let schema = test_schema();
        let finding = check_tag(&HedTag::new("Item/MyObject"), &schema).unwrap();
        assert_eq!(finding.code, codes::TAG_EXTENDED);
        assert_eq!(finding.severity, Severity::Warning);

        let finding = check_tag(&HedTag::new("Red/Blech"), &schema).unwrap();
        assert_eq!(finding.code, codes::TAG_EXTENDED);
    }

    #[test]
    fn test_disallowed_extension_is_error() {
        let schema = test_schema();
        let finding = check_tag(&HedTag::new("Event/Made-up-event"), &schema).unwrap();
        assert_eq!(finding.code, codes::TAG_INVALID);
    }

    #[test]
    fn test_value_tag_takes_one_value() {
        let schema = test_schema();
        assert!(check_tag(&HedTag::new("Label/my-label"), &schema).is_none());

        // Two trailing components are not a single value
        let finding = check_tag(&HedTag::new("Label/a/b"), &schema).unwrap();
        assert_eq!(finding.code, codes::TAG_INVALID);
    }

    #[test]
    fn test_empty_string_has_no_findings() {
        let schema = test_schema();
        let findings = validate_string("", &schema, &DefinitionRegistry::new());
        assert!(findings.is_empty());
    }

    #[test]
    fn test_unknown_def_reference() {
        let schema = test_schema();
        let findings = validate_string("Def/Missing", &schema, &DefinitionRegistry::new());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].code, codes::DEF_INVALID);
    }

    #[test]
    fn test_definition_not_allowed_in_string() {
        let schema = test_schema();
        let findings =
            validate_string("(Definition/X, (Event))", &schema, &DefinitionRegistry::new());
        assert!(findings.iter().any(|f| f.code == codes::DEFINITION_INVALID));
    }

    #[test]
    fn test_group_contents_are_validated() {
        let schema = test_schema();
        let findings = validate_string("(Event, (InvalidTag))", &schema, &DefinitionRegistry::new());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].code, codes::TAG_INVALID);
    }

    #[test]
    fn test_parentheses_mismatch() {
        let schema = test_schema();
        let findings = validate_string("(Event", &schema, &DefinitionRegistry::new());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].code, codes::PARENTHESES_MISMATCH);
    }
}
