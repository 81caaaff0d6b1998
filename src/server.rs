//! Line-delimited JSON transport
//!
//! Reads one JSON `ValidationRequest` per line from stdin and writes one
//! JSON `ValidationResult` per line to stdout. A malformed request line is
//! answered with a well-formed error result; the loop never crashes on
//! caller input.

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::pipeline::{self, ValidationRequest, ValidationResult};
use crate::schema::SchemaRegistry;
use crate::validation::{codes, Finding};

/// Serve validation requests over stdio until stdin closes
pub async fn serve(schemas: SchemaRegistry) -> Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    let mut stdout = tokio::io::stdout();

    log::info!("Serving HED validation requests on stdio");

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = handle_request_line(&line, &schemas).await?;
        stdout.write_all(response.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    Ok(())
}

/// Handle one request line, returning the JSON response line.
///
/// Only serialization of the response itself can fail here; every
/// validation failure is data inside the result.
pub async fn handle_request_line(line: &str, schemas: &SchemaRegistry) -> Result<String> {
    let result = match serde_json::from_str::<ValidationRequest>(line) {
        Ok(request) => pipeline::validate_request(&request, schemas).await,
        Err(e) => {
            log::debug!("Rejected malformed request line: {}", e);
            ValidationResult::from_errors(vec![Finding::error(
                codes::REQUEST_INVALID,
                format!("Invalid validation request: {}", e),
            )])
        }
    };

    Ok(serde_json::to_string(&result)?)
}
