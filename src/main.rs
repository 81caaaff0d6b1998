use anyhow::Result;

use hed_validation_server::config::Config;
use hed_validation_server::pipeline::{self, ValidationRequest};
use hed_validation_server::schema::SchemaRegistry;
use hed_validation_server::server;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Parse configuration from command line and environment
    let config = Config::from_args_and_env()?;

    env_logger::Builder::new()
        .parse_filters(&config.log_level)
        .init();

    // Create and populate the schema registry
    let schemas = SchemaRegistry::new(&config);
    schemas.initialize().await?;

    if config.list_schemas {
        for version in schemas.list_versions().await {
            println!("{}", version);
        }
        return Ok(());
    }

    if let Some(one_shot) = config.one_shot {
        let request = ValidationRequest {
            hed_string: one_shot.hed_string,
            hed_version: one_shot.hed_version,
            check_for_warnings: one_shot.check_for_warnings,
            definitions: one_shot.definitions,
        };
        let result = pipeline::validate_request(&request, &schemas).await;
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    server::serve(schemas).await
}
