use std::net::{IpAddr, Ipv4Addr};
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use hotscan_common::error::DiscoveryError;
use surge_ping::{Client, Config as PingConfig, PingIdentifier, PingSequence};

use super::Prober;

const PAYLOAD: [u8; 56] = [0; 56];

/// Echo sequence numbers, wrapping after `u16::MAX`.
///
/// Linux ping sockets rewrite the identifier, so replies are matched on host
/// and sequence alone. Two requests in flight to the same host must never
/// share a sequence number.
#[derive(Debug, Default)]
struct SequenceCounter(AtomicU16);

impl SequenceCounter {
    fn next(&self) -> PingSequence {
        PingSequence(self.0.fetch_add(1, Ordering::Relaxed))
    }
}

pub struct IcmpProber {
    client: Client,
    timeout: Duration,
    sequence: SequenceCounter,
}

impl IcmpProber {
    /// Opens an unprivileged ICMP socket, which needs a permissive
    /// `net.ipv4.ping_group_range` on Linux.
    pub fn new(timeout: Duration) -> std::io::Result<Self> {
        let client: Client = Client::new(&PingConfig::default())?;
        Ok(Self {
            client,
            timeout,
            sequence: SequenceCounter::default(),
        })
    }
}

#[async_trait]
impl Prober for IcmpProber {
    async fn probe(&self, ip: Ipv4Addr) -> Result<(), DiscoveryError> {
        let mut pinger = self
            .client
            .pinger(IpAddr::V4(ip), PingIdentifier(rand::random()))
            .await;
        pinger.timeout(self.timeout);

        pinger
            .ping(self.sequence.next(), &PAYLOAD)
            .await
            .map(|_reply| ())
            .map_err(|_| DiscoveryError::ProbeUnreachable { ip: ip.to_string() })
    }
}
