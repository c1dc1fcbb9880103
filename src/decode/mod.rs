//! Record decoders - raw per-player blobs to normalized records
//!
//! Three source formats feed the aggregation tables:
//!
//! ```text
//! stats/<uuid>.json         → StatRecord        (nested JSON counters)
//! advancements/<uuid>.json  → AdvancementRecord (nested JSON milestone tree)
//! playerdata/<uuid>.dat     → EconomyRecord     (gzipped binary tag tree)
//! ```
//!
//! Each decoder consumes one raw byte blob and either yields a record or a
//! `DecodeError` scoped to that single player.

pub mod advancements;
pub mod flatten;
pub mod nbt;
pub mod playerdata;
pub mod stats;

pub use advancements::{decode_advancements, AdvancementRecord};
pub use flatten::{flatten_dotted, RowKey};
pub use nbt::Tag;
pub use playerdata::{decode_playerdata, EconomyRecord};
pub use stats::{decode_stats, StatRecord};

#[derive(Debug)]
pub enum DecodeError {
    Json(serde_json::Error),
    Io(std::io::Error),
    Malformed(String),
    MissingPath(String),
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        DecodeError::Json(err)
    }
}

impl From<std::io::Error> for DecodeError {
    fn from(err: std::io::Error) -> Self {
        DecodeError::Io(err)
    }
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::Json(e) => write!(f, "JSON error: {}", e),
            DecodeError::Io(e) => write!(f, "IO error: {}", e),
            DecodeError::Malformed(msg) => write!(f, "Malformed record: {}", msg),
            DecodeError::MissingPath(path) => write!(f, "Path not found in save tree: {}", path),
        }
    }
}

impl std::error::Error for DecodeError {}

impl DecodeError {
    /// A missing save-tree path means the player never touched that
    /// feature; callers treat it as "record absent", not as corruption.
    pub fn is_missing_path(&self) -> bool {
        matches!(self, DecodeError::MissingPath(_))
    }
}
