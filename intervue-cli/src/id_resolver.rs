//! ID resolver module
//!
//! Handles resolution of UUID prefixes to full UUIDs by querying the API.
//! This allows users to specify short, unambiguous prefixes instead of full UUIDs.

use anyhow::{Context, Result, anyhow};
use intervue_client::OrchestratorClient;
use uuid::Uuid;

use crate::types::IdOrPrefix;

/// Resolve an interview ID or prefix to a full UUID
///
/// If the input is already a full UUID, returns it immediately.
/// Otherwise, fetches all interviews and finds the one matching the prefix.
pub async fn resolve_interview_id(
    client: &OrchestratorClient,
    id_or_prefix: &IdOrPrefix,
) -> Result<Uuid> {
    // If it's already a full UUID, return it
    if let Some(uuid) = id_or_prefix.as_uuid() {
        return Ok(uuid);
    }

    let interviews = client
        .list_interviews()
        .await
        .context("Failed to fetch interviews for ID resolution")?;

    let ids: Vec<Uuid> = interviews.iter().map(|i| i.id).collect();
    pick_unique(id_or_prefix, &ids)
}

/// Select the single id matching a prefix
fn pick_unique(id_or_prefix: &IdOrPrefix, ids: &[Uuid]) -> Result<Uuid> {
    let matches: Vec<&Uuid> = ids.iter().filter(|id| id_or_prefix.matches(id)).collect();

    match matches.as_slice() {
        [] => Err(anyhow!(
            "No interview found with ID starting with '{}'",
            id_or_prefix
        )),
        [id] => Ok(**id),
        _ => {
            let ids: Vec<String> = matches.iter().map(|id| id.to_string()).collect();
            Err(anyhow!(
                "Ambiguous prefix '{}' matches multiple interviews: {}",
                id_or_prefix,
                ids.join(", ")
            ))
        }
    }
}
