//! Craftboard - game-server statistics leaderboard pipeline
//!
//! Turns heterogeneous per-player raw records (JSON stat counters, JSON
//! advancement trees, binary player saves) retrieved over a pluggable
//! transport into unified tables and ranked leaderboards.
//!
//! # Architecture
//!
//! ```text
//! Transport (local / FTP / SFTP)
//!     ↓
//! RecordDecoder (stats / advancements / playerdata)
//!     ↓
//! IdentityResolver (uuid → display name)
//!     ↓
//! AggregateTable / EconomyLedger (outer-join merges, fill 0)
//!     ↓
//! Leaderboards + CSV / SQLite export
//! ```

pub mod aggregate;
pub mod config;
pub mod decode;
pub mod export;
pub mod identity;
pub mod pipeline;
pub mod rank;
pub mod transport;

pub use aggregate::{AggregateTable, EconomyLedger, ServerSnapshot};
pub use config::{BackendType, Config, ConfigError, LeaderboardSpec, TransportMode};
pub use decode::{DecodeError, RowKey};
pub use export::{ExportError, SnapshotWriter};
pub use identity::IdentityResolver;
pub use pipeline::IngestPipeline;
pub use rank::{rank, rank_advancement_counts, Leaderboard};
pub use transport::{FileTransport, Transport, TransportError};
