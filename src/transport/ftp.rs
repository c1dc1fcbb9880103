//! FTP transport variant

use super::{ensure_parent_dir, FileTransport, TransportError};
use std::net::ToSocketAddrs;
use std::path::Path;
use std::time::Duration;
use suppaftp::FtpStream;

/// One authenticated FTP session, reused for every operation.
pub struct FtpTransport {
    stream: FtpStream,
}

impl FtpTransport {
    pub fn connect(
        host: &str,
        port: u16,
        username: &str,
        password: &str,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let addr = (host, port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| TransportError::Session(format!("cannot resolve {}:{}", host, port)))?;

        let mut stream = FtpStream::connect_timeout(addr, timeout)?;
        stream.login(username, password)?;

        log::info!("✅ FTP session established with {}:{}", host, port);
        Ok(Self { stream })
    }
}

impl FileTransport for FtpTransport {
    fn download_file(
        &mut self,
        remote_path: &str,
        local_path: &Path,
    ) -> Result<(), TransportError> {
        let buffer = self.stream.retr_as_buffer(remote_path)?;
        ensure_parent_dir(local_path)?;
        std::fs::write(local_path, buffer.into_inner())?;
        Ok(())
    }

    fn list_files(&mut self, dir: &str) -> Vec<String> {
        // NLST may return full paths and cannot distinguish files from
        // directories; entries are reduced to their final component and
        // the caller's extension filters keep directories out.
        match self.stream.nlst(Some(dir)) {
            Ok(names) => names
                .into_iter()
                .map(|name| name.rsplit('/').next().unwrap_or("").to_string())
                .filter(|name| !name.is_empty() && !name.ends_with('.'))
                .collect(),
            Err(e) => {
                log::warn!("⚠️ cannot list {}: {}", dir, e);
                Vec::new()
            }
        }
    }

    fn close(&mut self) -> Result<(), TransportError> {
        self.stream.quit()?;
        log::info!("👋 FTP session closed");
        Ok(())
    }
}
