//! File retrieval transports
//!
//! One capability set - download a file, list a directory, close the
//! session - with independent variants for the local filesystem, FTP and
//! SFTP. Network variants authenticate once at construction and reuse the
//! session for every operation. The [`Transport`] enum routes calls to the
//! configured variant so the ingestion pipeline never knows which one it
//! is talking to.

pub mod ftp;
pub mod local;
pub mod sftp;

pub use ftp::FtpTransport;
pub use local::LocalTransport;
pub use sftp::SftpTransport;

use crate::config::{Config, TransportMode};
use std::path::Path;
use std::time::Duration;

#[derive(Debug)]
pub enum TransportError {
    Io(std::io::Error),
    Ftp(suppaftp::FtpError),
    Ssh(ssh2::Error),
    Session(String),
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        TransportError::Io(err)
    }
}

impl From<suppaftp::FtpError> for TransportError {
    fn from(err: suppaftp::FtpError) -> Self {
        TransportError::Ftp(err)
    }
}

impl From<ssh2::Error> for TransportError {
    fn from(err: ssh2::Error) -> Self {
        TransportError::Ssh(err)
    }
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportError::Io(e) => write!(f, "IO error: {}", e),
            TransportError::Ftp(e) => write!(f, "FTP error: {}", e),
            TransportError::Ssh(e) => write!(f, "SSH error: {}", e),
            TransportError::Session(msg) => write!(f, "Session error: {}", msg),
        }
    }
}

impl std::error::Error for TransportError {}

/// The capability set every transport variant provides.
pub trait FileTransport {
    /// Copy one remote file to a local path. Fails on a missing path,
    /// permission error or connection loss; callers skip that file and
    /// keep going.
    fn download_file(&mut self, remote_path: &str, local_path: &Path)
        -> Result<(), TransportError>;

    /// Names of the regular files in a directory. An inaccessible
    /// directory yields an empty listing (with a logged warning), never an
    /// error.
    fn list_files(&mut self, dir: &str) -> Vec<String>;

    /// Release the session. Safe to call after earlier failures.
    fn close(&mut self) -> Result<(), TransportError>;
}

/// Routes operations to the configured transport variant.
pub enum Transport {
    Local(LocalTransport),
    Ftp(FtpTransport),
    Sftp(SftpTransport),
}

impl Transport {
    /// Open a session for the configured mode. Connection or
    /// authentication failure here is fatal to the run.
    pub fn connect(config: &Config) -> Result<Self, TransportError> {
        let timeout = Duration::from_secs(config.transfer_timeout_secs);
        match config.mode {
            TransportMode::Local => Ok(Transport::Local(LocalTransport::new())),
            TransportMode::Ftp => {
                let transport = FtpTransport::connect(
                    &config.host,
                    config.port,
                    &config.username,
                    &config.password,
                    timeout,
                )?;
                Ok(Transport::Ftp(transport))
            }
            TransportMode::Sftp => {
                let transport = SftpTransport::connect(
                    &config.host,
                    config.port,
                    &config.username,
                    &config.password,
                    timeout,
                )?;
                Ok(Transport::Sftp(transport))
            }
        }
    }

    pub fn backend_type(&self) -> &'static str {
        match self {
            Transport::Local(_) => "local",
            Transport::Ftp(_) => "FTP",
            Transport::Sftp(_) => "SFTP",
        }
    }
}

impl FileTransport for Transport {
    fn download_file(
        &mut self,
        remote_path: &str,
        local_path: &Path,
    ) -> Result<(), TransportError> {
        match self {
            Transport::Local(t) => t.download_file(remote_path, local_path),
            Transport::Ftp(t) => t.download_file(remote_path, local_path),
            Transport::Sftp(t) => t.download_file(remote_path, local_path),
        }
    }

    fn list_files(&mut self, dir: &str) -> Vec<String> {
        match self {
            Transport::Local(t) => t.list_files(dir),
            Transport::Ftp(t) => t.list_files(dir),
            Transport::Sftp(t) => t.list_files(dir),
        }
    }

    fn close(&mut self) -> Result<(), TransportError> {
        match self {
            Transport::Local(t) => t.close(),
            Transport::Ftp(t) => t.close(),
            Transport::Sftp(t) => t.close(),
        }
    }
}

/// Create the parent directory of a download target if needed.
pub(crate) fn ensure_parent_dir(local_path: &Path) -> Result<(), TransportError> {
    if let Some(parent) = local_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
