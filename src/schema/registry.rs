//! Schema Registry
//!
//! Resolves a HED version identifier to a loaded vocabulary.
//!
//! Built-in vocabularies are embedded in the binary; user vocabularies are
//! loaded from configured schema directories at startup and override
//! built-ins with the same identifier.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use tokio::sync::RwLock;

use super::model::{Schema, SchemaFile};
use crate::config::Config;

/// Built-in vocabularies embedded at compile time
const BUILT_IN_SCHEMAS: &[&str] = &[
    include_str!("../../resources/schemas/standard-8.4.0.toml"),
    include_str!("../../resources/schemas/testlib-1.0.0.toml"),
];

/// Registry of loaded schemas, keyed by version identifier
pub struct SchemaRegistry {
    schemas: Arc<RwLock<HashMap<String, Arc<Schema>>>>,
    schema_dirs: Vec<PathBuf>,
}

impl SchemaRegistry {
    /// Create a registry from configuration; call [`initialize`] before resolving
    pub fn new(config: &Config) -> Self {
        Self {
            schemas: Arc::new(RwLock::new(HashMap::new())),
            schema_dirs: config.schema_dirs.clone(),
        }
    }

    /// Create a registry with the default schema directories
    pub fn with_default_config() -> Result<Self> {
        Ok(Self::new(&Config::default_dirs_only()?))
    }

    /// Load built-in vocabularies and scan the schema directories
    pub async fn initialize(&self) -> Result<()> {
        let mut schemas = HashMap::new();

        for content in BUILT_IN_SCHEMAS {
            let schema = parse_schema_content(content, None)?;
            schemas.insert(schema.identifier(), Arc::new(schema));
        }

        for dir in &self.schema_dirs {
            self.load_schemas_from_directory(dir, &mut schemas).await?;
        }

        let count = schemas.len();
        let mut shared = self.schemas.write().await;
        *shared = schemas;
        log::info!("Loaded {} HED schemas", count);

        Ok(())
    }

    /// Resolve a version identifier to a schema
    ///
    /// Plain versions like "8.4.0" name the standard vocabulary; library
    /// vocabularies are addressed as "name_version", e.g. "testlib_1.0.0".
    pub async fn resolve(&self, version: &str) -> Result<Arc<Schema>> {
        let schemas = self.schemas.read().await;
        schemas
            .get(version.trim())
            .cloned()
            .ok_or_else(|| anyhow!("unknown HED schema version '{}'", version))
    }

    /// List all known version identifiers, sorted
    pub async fn list_versions(&self) -> Vec<String> {
        let schemas = self.schemas.read().await;
        let mut versions: Vec<String> = schemas.keys().cloned().collect();
        versions.sort();
        versions
    }

    /// Load all *.toml vocabularies from one directory
    async fn load_schemas_from_directory(
        &self,
        dir: &Path,
        schemas: &mut HashMap<String, Arc<Schema>>,
    ) -> Result<()> {
        if !dir.exists() {
            return Ok(());
        }

        let mut entries = tokio::fs::read_dir(dir)
            .await
            .with_context(|| format!("Failed to read schema directory: {}", dir.display()))?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("toml") {
                continue;
            }
            match self.load_schema_file(&path).await {
                Ok(schema) => {
                    let identifier = schema.identifier();
                    if schemas.contains_key(&identifier) {
                        log::info!(
                            "Schema '{}' from {} overrides built-in",
                            identifier,
                            path.display()
                        );
                    }
                    schemas.insert(identifier, Arc::new(schema));
                }
                Err(e) => {
                    log::error!("Failed to load schema file {}: {}", path.display(), e);
                }
            }
        }

        Ok(())
    }

    async fn load_schema_file(&self, path: &Path) -> Result<Schema> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read schema file: {}", path.display()))?;
        parse_schema_content(&content, Some(path))
    }
}

/// Parse vocabulary content from a TOML string
fn parse_schema_content(content: &str, source_path: Option<&Path>) -> Result<Schema> {
    let file: SchemaFile = toml::from_str(content).with_context(|| match source_path {
        Some(path) => format!("Failed to parse schema TOML: {}", path.display()),
        None => "Failed to parse built-in schema TOML".to_string(),
    })?;
    Ok(Schema::from(file))
}
