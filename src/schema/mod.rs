//! HED schema vocabularies: types, loading and version resolution.

pub mod model;
pub mod registry;

pub use model::{Schema, SchemaFile, SchemaMeta, TagDef};
pub use registry::SchemaRegistry;
