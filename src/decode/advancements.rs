//! Advancement decoding from per-player JSON milestone trees

use super::flatten::flatten_dotted;
use super::DecodeError;
use serde_json::Value;
use std::collections::BTreeMap;

/// One player's advancements: id → achieved flag.
///
/// Recipe-unlock advancements are auto-granted by the game and excluded
/// here so they never reach the ranking tables.
#[derive(Debug, Clone, Default)]
pub struct AdvancementRecord {
    pub achieved: BTreeMap<String, bool>,
}

impl AdvancementRecord {
    pub fn len(&self) -> usize {
        self.achieved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.achieved.is_empty()
    }
}

/// Decode a raw advancements document into an [`AdvancementRecord`].
///
/// The first dotted segment of each flattened leaf is the advancement id;
/// an advancement counts as achieved when its `done` leaf is JSON `true`.
/// Ids whose local part (after the first `:`) starts with `recipes` are
/// dropped; ids without a namespace separator are kept.
pub fn decode_advancements(bytes: &[u8]) -> Result<AdvancementRecord, DecodeError> {
    let root: Value = serde_json::from_slice(bytes)?;
    let mut achieved: BTreeMap<String, bool> = BTreeMap::new();

    for (segments, leaf) in flatten_dotted(&root) {
        if segments.len() < 2 {
            continue;
        }
        let id = &segments[0];
        if is_recipe_id(id) {
            continue;
        }
        let entry = achieved.entry(id.clone()).or_insert(false);
        if segments.len() == 2 && segments[1] == "done" && leaf == Value::Bool(true) {
            *entry = true;
        }
    }

    Ok(AdvancementRecord { achieved })
}

fn is_recipe_id(id: &str) -> bool {
    id.split_once(':')
        .map_or(false, |(_, local)| local.starts_with("recipes"))
}
