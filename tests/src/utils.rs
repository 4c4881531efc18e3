use std::collections::HashSet;
use std::io::Write;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use hotscan_common::{config::Config, error::DiscoveryError};
use hotscan_core::{
    discovery::DiscoveryService, network::Prober, scanner::resolver::HostnameResolver,
};
use tempfile::NamedTempFile;

/// Answers probes for a fixed set of addresses and counts every probe.
pub struct FakeNetwork {
    reachable: HashSet<Ipv4Addr>,
    pub probes: AtomicUsize,
}

impl FakeNetwork {
    pub fn with_hosts(hosts: &[Ipv4Addr]) -> Arc<Self> {
        Arc::new(Self {
            reachable: hosts.iter().copied().collect(),
            probes: AtomicUsize::new(0),
        })
    }

    pub fn silent() -> Arc<Self> {
        Self::with_hosts(&[])
    }

    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Prober for FakeNetwork {
    async fn probe(&self, ip: Ipv4Addr) -> Result<(), DiscoveryError> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        if self.reachable.contains(&ip) {
            Ok(())
        } else {
            Err(DiscoveryError::ProbeUnreachable { ip: ip.to_string() })
        }
    }
}

/// A resolver for a network without PTR records.
pub struct NoPtrRecords;

#[async_trait]
impl HostnameResolver for NoPtrRecords {
    async fn resolve(&self, ip: &str) -> Result<String, DiscoveryError> {
        Err(DiscoveryError::ResolutionFailure {
            ip: ip.to_string(),
            reason: "NXDOMAIN".into(),
        })
    }
}

pub fn service(network: Arc<FakeNetwork>) -> DiscoveryService {
    DiscoveryService::new(Arc::new(NoPtrRecords), network, &Config::default())
}

pub fn neighbor_table(lines: &[&str]) -> anyhow::Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    for line in lines {
        writeln!(file, "{line}")?;
    }
    Ok(file)
}
