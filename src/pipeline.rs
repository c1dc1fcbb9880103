//! Ingestion pipeline - one transport session in, one snapshot out
//!
//! ```text
//! Transport (local / FTP / SFTP)
//!     ↓ list + download, per-file failure tolerant
//! RecordDecoder (stats / advancements / playerdata)
//!     ↓ resolve display identity
//! AggregateTable merges (outer join) + EconomyLedger
//!     ↓ fill_missing(0)
//! ServerSnapshot
//! ```
//!
//! A file that fails to download or decode costs only that player's
//! contribution to that table; the omission is logged and the run goes on.
//! The transport session closes on every exit path, including early
//! failures.

use crate::aggregate::{
    merge_advancements, merge_economy, merge_stats, AggregateTable, EconomyLedger, ServerSnapshot,
};
use crate::config::SourcePaths;
use crate::decode::{decode_advancements, decode_playerdata, decode_stats};
use crate::identity::IdentityResolver;
use crate::transport::{FileTransport, Transport, TransportError};
use std::path::{Path, PathBuf};

pub struct IngestPipeline {
    transport: Transport,
    paths: SourcePaths,
    staging_dir: PathBuf,
}

impl IngestPipeline {
    pub fn new(transport: Transport, paths: SourcePaths, staging_dir: PathBuf) -> Self {
        Self {
            transport,
            paths,
            staging_dir,
        }
    }

    /// Run the full ingestion. Consumes the pipeline; the transport
    /// session is released before this returns, whatever happened.
    pub fn run(mut self) -> Result<ServerSnapshot, TransportError> {
        let result = self.collect();
        if let Err(e) = self.transport.close() {
            log::warn!("⚠️ failed to close transport session: {}", e);
        }
        result
    }

    fn collect(&mut self) -> Result<ServerSnapshot, TransportError> {
        self.prepare_staging()?;

        let resolver = self.load_identity();
        let stats = self.load_stats(&resolver);
        let economy = self.load_economy(&resolver);
        let advancements = self.load_advancements(&resolver);

        Ok(ServerSnapshot {
            stats,
            advancements,
            economy,
        })
    }

    /// Create the staging layout and drop files left over from earlier
    /// runs so a renamed player cannot leak a stale record in.
    fn prepare_staging(&self) -> Result<(), TransportError> {
        for sub in ["stats", "playerdata", "advancements"] {
            let dir = self.staging_dir.join(sub);
            std::fs::create_dir_all(&dir)?;

            for entry in std::fs::read_dir(&dir)?.filter_map(|e| e.ok()) {
                if entry.file_name() == ".gitignore" {
                    continue;
                }
                if entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                    if let Err(e) = std::fs::remove_file(entry.path()) {
                        log::warn!("⚠️ failed to remove {}: {}", entry.path().display(), e);
                    }
                }
            }
        }
        Ok(())
    }

    /// Download and parse the identity cache. An unreachable or corrupt
    /// cache degrades every lookup to the raw id instead of failing the
    /// run.
    fn load_identity(&mut self) -> IdentityResolver {
        let cache_path = self.paths.usercache_path.clone();
        let bytes = match self.download(&cache_path, "usercache.json") {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("⚠️ identity cache unavailable ({}); ids will be shown raw", e);
                return IdentityResolver::empty();
            }
        };

        match IdentityResolver::from_json(&bytes) {
            Ok(resolver) => {
                log::info!("👥 identity cache loaded: {} names", resolver.len());
                resolver
            }
            Err(e) => {
                log::warn!("⚠️ identity cache unreadable ({}); ids will be shown raw", e);
                IdentityResolver::empty()
            }
        }
    }

    fn load_stats(&mut self, resolver: &IdentityResolver) -> AggregateTable {
        let mut table = AggregateTable::new();
        let dir = self.paths.stats_dir.clone();
        let files = self.transport.list_files(&dir);
        log::info!("📁 {} entries under {}", files.len(), dir);

        for filename in files {
            if !filename.ends_with(".json") {
                continue;
            }
            let Some(id) = file_stem(&filename) else {
                continue;
            };
            log::debug!("🔄 processing {}", filename);

            match self.fetch(&dir, "stats", &filename) {
                Ok(bytes) => match decode_stats(&bytes) {
                    Ok(record) => {
                        let name = resolver.resolve(&id);
                        merge_stats(&mut table, &record, &name);
                    }
                    Err(e) => log::warn!("⚠️ skipping stats for {}: {}", id, e),
                },
                Err(e) => log::warn!("⚠️ skipping stats for {}: {}", id, e),
            }
        }

        table.fill_missing(0);
        log::info!(
            "📊 stats table: {} rows, {} players",
            table.row_count(),
            table.column_count()
        );
        table
    }

    fn load_advancements(&mut self, resolver: &IdentityResolver) -> AggregateTable {
        let mut table = AggregateTable::new();
        let dir = self.paths.advancements_dir.clone();
        let files = self.transport.list_files(&dir);
        log::info!("📁 {} entries under {}", files.len(), dir);

        for filename in files {
            if !filename.ends_with(".json") {
                continue;
            }
            let Some(id) = file_stem(&filename) else {
                continue;
            };
            log::debug!("🔄 processing {}", filename);

            match self.fetch(&dir, "advancements", &filename) {
                Ok(bytes) => match decode_advancements(&bytes) {
                    Ok(record) => {
                        let name = resolver.resolve(&id);
                        merge_advancements(&mut table, &record, &name);
                    }
                    Err(e) => log::warn!("⚠️ skipping advancements for {}: {}", id, e),
                },
                Err(e) => log::warn!("⚠️ skipping advancements for {}: {}", id, e),
            }
        }

        table.fill_missing(0);
        log::info!(
            "🏆 advancements table: {} rows, {} players",
            table.row_count(),
            table.column_count()
        );
        table
    }

    fn load_economy(&mut self, resolver: &IdentityResolver) -> EconomyLedger {
        let mut ledger = EconomyLedger::new();
        let dir = self.paths.playerdata_dir.clone();
        let files = self.transport.list_files(&dir);
        log::info!("📁 {} entries under {}", files.len(), dir);

        for filename in files {
            if !is_playerdata_file(&filename) {
                continue;
            }
            let Some(id) = file_stem(&filename) else {
                continue;
            };
            log::debug!("🔄 processing {}", filename);

            match self.fetch(&dir, "playerdata", &filename) {
                Ok(bytes) => match decode_playerdata(&bytes) {
                    Ok(record) => {
                        let name = resolver.resolve(&id);
                        merge_economy(&mut ledger, &record, &name);
                    }
                    Err(e) if e.is_missing_path() => {
                        log::debug!("💤 no economy data for {}", id);
                    }
                    Err(e) => log::warn!("⚠️ skipping economy data for {}: {}", id, e),
                },
                Err(e) => log::warn!("⚠️ skipping economy data for {}: {}", id, e),
            }
        }

        log::info!("💰 economy ledger: {} players", ledger.len());
        ledger
    }

    /// Download one file from a source directory into its staging
    /// subdirectory and return its bytes.
    fn fetch(&mut self, dir: &str, sub: &str, filename: &str) -> Result<Vec<u8>, TransportError> {
        let remote = format!("{}/{}", dir, filename);
        let local = self.staging_dir.join(sub).join(filename);
        self.transport.download_file(&remote, &local)?;
        Ok(std::fs::read(&local)?)
    }

    fn download(&mut self, remote: &str, staged_name: &str) -> Result<Vec<u8>, TransportError> {
        let local = self.staging_dir.join(staged_name);
        self.transport.download_file(remote, &local)?;
        Ok(std::fs::read(&local)?)
    }
}

fn file_stem(filename: &str) -> Option<String> {
    Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
}

/// Player saves only: `.dat` files, skipping rotated `_old` backups and
/// the server's role bookkeeping entry.
fn is_playerdata_file(filename: &str) -> bool {
    filename.ends_with(".dat") && !filename.ends_with("_old") && filename != "player_roles"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playerdata_filename_filter() {
        assert!(is_playerdata_file("11111111-2222-3333-4444-555555555555.dat"));
        assert!(!is_playerdata_file("11111111-2222-3333-4444-555555555555.dat_old"));
        assert!(!is_playerdata_file("player_roles"));
        assert!(!is_playerdata_file("notes.txt"));
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("abc.json"), Some("abc".to_string()));
        assert_eq!(file_stem("abc.dat"), Some("abc".to_string()));
    }
}
