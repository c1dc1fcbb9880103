//! Player identity resolution from the server's identity cache

use crate::decode::DecodeError;
use serde::Deserialize;
use std::collections::HashMap;

/// One row of the identity-cache document. Older cache files spell the
/// id field `id` instead of `uuid`; both are accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityEntry {
    #[serde(alias = "id")]
    pub uuid: String,
    pub name: String,
}

/// Read-only uuid → display-name table, built once per run.
pub struct IdentityResolver {
    names: HashMap<String, String>,
}

impl IdentityResolver {
    /// A resolver with no entries; every lookup falls back to the raw id.
    pub fn empty() -> Self {
        Self {
            names: HashMap::new(),
        }
    }

    /// Build the table from cache entries. Duplicate ids resolve
    /// last-write-wins, matching the cache's append order.
    pub fn load(entries: Vec<IdentityEntry>) -> Self {
        let mut names = HashMap::with_capacity(entries.len());
        for entry in entries {
            names.insert(entry.uuid, entry.name);
        }
        Self { names }
    }

    /// Parse an identity-cache JSON document (an array of entries).
    pub fn from_json(bytes: &[u8]) -> Result<Self, DecodeError> {
        let entries: Vec<IdentityEntry> = serde_json::from_slice(bytes)?;
        Ok(Self::load(entries))
    }

    /// Display name for an id. A miss degrades to the raw id and logs a
    /// diagnostic; it is never an error.
    pub fn resolve(&self, id: &str) -> String {
        match self.names.get(id) {
            Some(name) => name.clone(),
            None => {
                log::warn!("⚠️ no display name for id {}, using the id itself", id);
                id.to_string()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
