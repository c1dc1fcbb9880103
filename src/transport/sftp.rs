//! SFTP transport variant

use super::{ensure_parent_dir, FileTransport, TransportError};
use ssh2::{Session, Sftp};
use std::io::Read;
use std::net::TcpStream;
use std::net::ToSocketAddrs;
use std::path::Path;
use std::time::Duration;

/// One authenticated SSH session with an SFTP channel, reused for every
/// operation. The session-level timeout bounds each blocking transfer so
/// a stalled file surfaces as an error scoped to that file.
pub struct SftpTransport {
    session: Session,
    sftp: Sftp,
}

impl SftpTransport {
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

        let tcp = TcpStream::connect_timeout(&addr, timeout)?;
        let mut session = Session::new()?;
        session.set_tcp_stream(tcp);
        session.handshake()?;
        session.userauth_password(username, password)?;
        if !session.authenticated() {
            return Err(TransportError::Session(format!(
                "authentication rejected for {}@{}",
                username, host
            )));
        }
        session.set_timeout(timeout.as_millis() as u32);

        let sftp = session.sftp()?;
        log::info!("✅ SFTP session established with {}:{}", host, port);
        Ok(Self { session, sftp })
    }
}

impl FileTransport for SftpTransport {
    fn download_file(
        &mut self,
        remote_path: &str,
        local_path: &Path,
    ) -> Result<(), TransportError> {
        let mut remote = self.sftp.open(Path::new(remote_path))?;
        let mut contents = Vec::new();
        remote
            .read_to_end(&mut contents)
            .map_err(TransportError::Io)?;

        ensure_parent_dir(local_path)?;
        std::fs::write(local_path, contents)?;
        Ok(())
    }

    fn list_files(&mut self, dir: &str) -> Vec<String> {
        match self.sftp.readdir(Path::new(dir)) {
            Ok(entries) => entries
                .into_iter()
                .filter(|(_, stat)| stat.is_file())
                .filter_map(|(path, _)| {
                    path.file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                })
                .collect(),
            Err(e) => {
                log::warn!("⚠️ cannot list {}: {}", dir, e);
                Vec::new()
            }
        }
    }

    fn close(&mut self) -> Result<(), TransportError> {
        self.session
            .disconnect(None, "session finished", None)?;
        log::info!("👋 SFTP session closed");
        Ok(())
    }
}
