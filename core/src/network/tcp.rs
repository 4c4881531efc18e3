use std::io::ErrorKind;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use hotscan_common::error::DiscoveryError;
use tokio::net::TcpStream;
use tokio::time::timeout;

use super::Prober;

const ECHO_PORT: u16 = 7;

/// Handshake against the echo port. An accepted connection and an active
/// refusal (RST) both prove that the host is up.
pub struct TcpProber {
    port: u16,
    timeout: Duration,
}

impl TcpProber {
    pub fn new(timeout: Duration) -> Self {
        Self {
            port: ECHO_PORT,
            timeout,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

#[async_trait]
impl Prober for TcpProber {
    async fn probe(&self, ip: Ipv4Addr) -> Result<(), DiscoveryError> {
        let socket_addr: SocketAddr = SocketAddr::new(IpAddr::V4(ip), self.port);

        match timeout(self.timeout, TcpStream::connect(socket_addr)).await {
            Ok(Ok(_stream)) => Ok(()),
            Ok(Err(e)) if e.kind() == ErrorKind::ConnectionRefused => Ok(()),
            Ok(Err(_)) | Err(_) => Err(DiscoveryError::ProbeUnreachable { ip: ip.to_string() }),
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
