//! Local-filesystem transport variant

use super::{ensure_parent_dir, FileTransport, TransportError};
use std::path::Path;

/// Reads the server's world directory straight off the local disk.
/// "Download" is a plain copy into the staging directory so all three
/// variants feed the decoders identically.
pub struct LocalTransport;

impl LocalTransport {
    pub fn new() -> Self {
        LocalTransport
    }
}

impl Default for LocalTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl FileTransport for LocalTransport {
    fn download_file(
        &mut self,
        remote_path: &str,
        local_path: &Path,
    ) -> Result<(), TransportError> {
        ensure_parent_dir(local_path)?;
        std::fs::copy(remote_path, local_path)?;
        Ok(())
    }

    fn list_files(&mut self, dir: &str) -> Vec<String> {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("⚠️ cannot list {}: {}", dir, e);
                return Vec::new();
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    fn close(&mut self) -> Result<(), TransportError> {
        Ok(())
    }
}
