//! Schema Vocabulary Types
//!
//! Types for HED vocabulary files and the runtime schema built from them.

use serde::Deserialize;
use std::collections::HashMap;

/// Root schema file structure (matches TOML)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SchemaFile {
    pub schema: SchemaMeta,
    pub tags: Vec<TagDef>,
}

/// Schema metadata
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SchemaMeta {
    pub name: String,
    pub version: String,
    pub description: Option<String>,
}

/// A vocabulary tag definition
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TagDef {
    /// Full slash path, e.g. "Event/Sensory-event"
    pub name: String,
    /// Unlisted child paths under this tag are extensions, not errors
    #[serde(default)]
    pub extension_allowed: bool,
    /// The final path component is a caller-supplied value
    #[serde(default)]
    pub takes_value: bool,
    pub description: Option<String>,
}

/// Runtime schema (optimized for tag lookups)
#[derive(Debug, Clone)]
pub struct Schema {
    pub name: String,
    pub version: String,
    pub description: Option<String>,
    /// Tags by lowercase full path
    by_path: HashMap<String, TagDef>,
    /// Lowercase leaf name to lowercase full path; None marks an ambiguous
    /// short form that must be written long-form
    by_leaf: HashMap<String, Option<String>>,
}

impl Schema {
    /// The version identifier this schema resolves under:
    /// plain version for the standard vocabulary, "name_version" for libraries.
    pub fn identifier(&self) -> String {
        if self.name == "standard" {
            self.version.clone()
        } else {
            format!("{}_{}", self.name, self.version)
        }
    }

    /// Look up a tag by full path (case-insensitive)
    pub fn tag_by_path(&self, path: &str) -> Option<&TagDef> {
        self.by_path.get(&path.to_lowercase())
    }

    /// Resolve the first component of a tag: full top-level path first,
    /// then unambiguous short form.
    pub fn resolve_base(&self, component: &str) -> Option<&TagDef> {
        let key = component.to_lowercase();
        if let Some(def) = self.by_path.get(&key) {
            return Some(def);
        }
        match self.by_leaf.get(&key) {
            Some(Some(path)) => self.by_path.get(path),
            _ => None,
        }
    }

    pub fn tag_count(&self) -> usize {
        self.by_path.len()
    }
}

impl From<SchemaFile> for Schema {
    fn from(file: SchemaFile) -> Self {
        let mut by_path: HashMap<String, TagDef> = HashMap::new();
        let mut by_leaf: HashMap<String, Option<String>> = HashMap::new();

        for tag in file.tags {
            // Fill in any ancestors the file does not list explicitly, so
            // path walking never falls into a hole in the middle of a tag.
            let components: Vec<&str> = tag.name.split('/').collect();
            for depth in 1..components.len() {
                let ancestor = components[..depth].join("/");
                by_path
                    .entry(ancestor.to_lowercase())
                    .or_insert_with(|| TagDef {
                        name: ancestor.clone(),
                        extension_allowed: false,
                        takes_value: false,
                        description: None,
                    });
            }
            by_path.insert(tag.name.to_lowercase(), tag);
        }

        for (path, tag) in &by_path {
            if let Some(leaf) = tag.name.split('/').next_back() {
                by_leaf
                    .entry(leaf.to_lowercase())
                    .and_modify(|existing| {
                        if existing.as_deref() != Some(path.as_str()) {
                            *existing = None;
                        }
                    })
                    .or_insert_with(|| Some(path.clone()));
            }
        }

        Self {
            name: file.schema.name,
            version: file.schema.version,
            description: file.schema.description,
            by_path,
            by_leaf,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema_from(tags: Vec<TagDef>) -> Schema {
        Schema::from(SchemaFile {
            schema: SchemaMeta {
                name: "standard".to_string(),
                version: "8.4.0".to_string(),
                description: None,
            },
            tags,
        })
    }

    fn tag(name: &str) -> TagDef {
        TagDef {
            name: name.to_string(),
            extension_allowed: false,
            takes_value: false,
            description: None,
        }
    }

    #[test]
    fn test_schema_from_file() {
        let schema = schema_from(vec![tag("Event"), tag("Event/Sensory-event")]);

        assert_eq!(schema.name, "standard");
        assert!(schema.tag_by_path("event/sensory-event").is_some());
        assert!(schema.tag_by_path("Event").is_some());
        assert!(schema.tag_by_path("Nonsense").is_none());
    }

    #[test]
    fn test_short_form_resolution() {
        let schema = schema_from(vec![tag("Event/Sensory-event")]);

        let resolved = schema.resolve_base("Sensory-event").unwrap();
        assert_eq!(resolved.name, "Event/Sensory-event");
    }

    #[test]
    fn test_ambiguous_short_form_is_not_resolved() {
        let schema = schema_from(vec![tag("Item/Red"), tag("Property/Red")]);

        assert!(schema.resolve_base("Red").is_none());
        assert!(schema.tag_by_path("Item/Red").is_some());
        assert!(schema.tag_by_path("Property/Red").is_some());
    }

    #[test]
    fn test_missing_ancestors_are_filled() {
        let schema = schema_from(vec![tag("Property/Sensory-property/Color/Red")]);

        assert!(schema.tag_by_path("Property").is_some());
        assert!(schema.tag_by_path("Property/Sensory-property/Color").is_some());
    }

    #[test]
    fn test_identifier() {
        let standard = schema_from(vec![tag("Event")]);
        assert_eq!(standard.identifier(), "8.4.0");

        let library = Schema::from(SchemaFile {
            schema: SchemaMeta {
                name: "testlib".to_string(),
                version: "1.0.0".to_string(),
                description: None,
            },
            tags: vec![tag("Measure")],
        });
        assert_eq!(library.identifier(), "testlib_1.0.0");
    }
}
