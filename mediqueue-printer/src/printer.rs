//! Printer adapters for sending ESC/POS data
//!
//! Supports:
//! - Network printers (TCP port 9100)
//! - File spooling (kiosks without a printer attached)

use crate::error::{PrintError, PrintResult};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{info, instrument, warn};

/// Trait for printer adapters
#[allow(async_fn_in_trait)]
pub trait Printer {
    /// Send raw ESC/POS data to the printer
    async fn print(&self, data: &[u8]) -> PrintResult<()>;

    /// Check if the printer is online/reachable
    async fn is_online(&self) -> bool;
}

/// Network printer (TCP port 9100)
///
/// Most thermal printers support raw TCP printing on port 9100.
#[derive(Debug, Clone)]
pub struct NetworkPrinter {
    addr: SocketAddr,
    timeout: Duration,
}

impl NetworkPrinter {
    /// Create a new network printer
    pub fn new(host: &str, port: u16) -> PrintResult<Self> {
        let addr_str = format!("{}:{}", host, port);
        let addr = addr_str
            .parse()
            .map_err(|_| PrintError::InvalidConfig(format!("Invalid address: {}", addr_str)))?;

        Ok(Self {
            addr,
            timeout: Duration::from_secs(5),
        })
    }

    /// Create from a socket address string (e.g., "192.168.1.100:9100")
    pub fn from_addr(addr: &str) -> PrintResult<Self> {
        let addr: SocketAddr = addr
            .parse()
            .map_err(|_| PrintError::InvalidConfig(format!("Invalid address: {}", addr)))?;

        Ok(Self {
            addr,
            timeout: Duration::from_secs(5),
        })
    }

    /// Set connection timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the printer address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Printer for NetworkPrinter {
    #[instrument(skip(data), fields(addr = %self.addr, data_len = data.len()))]
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        info!("Connecting to printer");

        let mut stream = tokio::time::timeout(self.timeout, TcpStream::connect(self.addr))
            .await
            .map_err(|_| PrintError::Timeout(format!("Connection timeout: {}", self.addr)))?
            .map_err(|e| PrintError::Connection(format!("{}: {}", self.addr, e)))?;

        info!("Connected, sending {} bytes", data.len());

        stream.write_all(data).await.map_err(|e| {
            PrintError::Io(std::io::Error::new(
                e.kind(),
                format!("Write failed: {}", e),
            ))
        })?;

        stream.flush().await?;

        info!("Print job sent successfully");
        Ok(())
    }

    #[instrument(fields(addr = %self.addr))]
    async fn is_online(&self) -> bool {
        let check_timeout = Duration::from_millis(500);

        match tokio::time::timeout(check_timeout, TcpStream::connect(self.addr)).await {
            Ok(Ok(_)) => {
                info!("Printer online");
                true
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Printer offline");
                false
            }
            Err(_) => {
                warn!("Printer check timeout");
                false
            }
        }
    }
}

/// File printer - spools each job to a new file in a directory
///
/// Used on kiosks without printer hardware; a separate process (or the
/// operator) can forward the spooled jobs later.
#[derive(Debug, Clone)]
pub struct FilePrinter {
    dir: PathBuf,
}

impl FilePrinter {
    /// Create a file printer spooling into `dir`
    ///
    /// The directory must exist and be writable.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Spool directory
    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }

    fn next_path(&self) -> PathBuf {
        let stamp = shared::util::now_millis();
        self.dir.join(format!("ticket-{}.escpos", stamp))
    }
}

impl Printer for FilePrinter {
    #[instrument(skip(data), fields(dir = %self.dir.display(), data_len = data.len()))]
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        let path = self.next_path();
        tokio::fs::write(&path, data).await?;
        info!(path = %path.display(), "Ticket spooled to file");
        Ok(())
    }

    async fn is_online(&self) -> bool {
        self.dir.is_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_printer_rejects_bad_addr() {
        assert!(NetworkPrinter::new("not a host", 9100).is_err());
        assert!(NetworkPrinter::from_addr("nonsense").is_err());
    }

    #[test]
    fn test_network_printer_parses_addr() {
        let p = NetworkPrinter::new("192.168.1.100", 9100).unwrap();
        assert_eq!(p.addr().port(), 9100);
    }

    #[tokio::test]
    async fn test_file_printer_spools_job() {
        let dir = tempfile::tempdir().unwrap();
        let printer = FilePrinter::new(dir.path());

        assert!(printer.is_online().await);
        printer.print(b"\x1B\x40hola").await.unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        let content = std::fs::read(entries[0].as_ref().unwrap().path()).unwrap();
        assert_eq!(content, b"\x1B\x40hola");
    }

    #[tokio::test]
    async fn test_file_printer_offline_when_dir_missing() {
        let printer = FilePrinter::new("/definitely/not/a/dir");
        assert!(!printer.is_online().await);
    }
}
