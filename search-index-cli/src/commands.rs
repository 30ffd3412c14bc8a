//! Command implementations.

use std::path::Path;

use tracing::{info, instrument};

use crate::config::Command;
use crate::CliError;
use search_index_client::SearchClient;

/// Settings sent when `create-index` is given no settings file.
const EMPTY_SETTINGS: &[u8] = b"{}";

/// Run `command` against the search service and return the status code.
#[instrument(skip(client))]
pub async fn run(command: Command, client: &SearchClient) -> Result<u16, CliError> {
    let status = match command {
        Command::CreateIndex { index, settings } => {
            let settings = match settings {
                Some(path) => read_json(&path).await?,
                None => EMPTY_SETTINGS.to_vec(),
            };
            client.create_index(&index, settings).await?
        }
        Command::DeleteIndex { index } => client.delete_index(&index).await?,
        Command::AddDocument {
            index,
            id,
            file,
            doc_type,
        } => {
            let document = read_json(&file).await?;
            client.add_document(&index, &doc_type, &id, document).await?
        }
    };

    info!(status = status, "Command completed");
    Ok(status)
}

/// Read a file and check that it holds a JSON value.
async fn read_json(path: &Path) -> Result<Vec<u8>, CliError> {
    let display = path.display().to_string();
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| CliError::ReadError {
            path: display.clone(),
            source,
        })?;

    serde_json::from_slice::<serde_json::Value>(&bytes).map_err(|e| CliError::InvalidJson {
        path: display,
        message: e.to_string(),
    })?;

    Ok(bytes)
}
