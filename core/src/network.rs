//! Reachability probes used by the active sweep.

use std::net::Ipv4Addr;
use std::time::Duration;

use async_trait::async_trait;
use hotscan_common::error::DiscoveryError;
use tracing::{debug, warn};

pub mod icmp;
pub mod tcp;

use icmp::IcmpProber;
use tcp::TcpProber;

/// Answers whether a host responds within a bounded time.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Fails with [`DiscoveryError::ProbeUnreachable`] when the host stays silent.
    async fn probe(&self, ip: Ipv4Addr) -> Result<(), DiscoveryError>;
}

/// ICMP echo when the OS hands out ICMP sockets, TCP echo-port handshakes otherwise.
pub enum ReachabilityProber {
    Icmp(IcmpProber),
    Tcp(TcpProber),
}

impl ReachabilityProber {
    /// Must be called from within a Tokio runtime.
    pub fn detect(timeout: Duration) -> Self {
        match IcmpProber::new(timeout) {
            Ok(prober) => {
                debug!("Probing with ICMP echo requests");
                Self::Icmp(prober)
            }
            Err(e) => {
                warn!("ICMP sockets unavailable ({e}), falling back to TCP probes");
                Self::Tcp(TcpProber::new(timeout))
            }
        }
    }
}

#[async_trait]
impl Prober for ReachabilityProber {
    async fn probe(&self, ip: Ipv4Addr) -> Result<(), DiscoveryError> {
        match self {
            Self::Icmp(prober) => prober.probe(ip).await,
            Self::Tcp(prober) => prober.probe(ip).await,
        }
    }
}
