use std::net::Ipv4Addr;

use crate::error::DiscoveryError;

/// Host suffixes `[start, end)` below a three-octet prefix, e.g. `192.168.43`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SweepRange {
    network: [u8; 3],
    start: u16,
    end: u16,
}

impl SweepRange {
    pub fn new(prefix: &str, start: u16, end: u16) -> Result<Self, DiscoveryError> {
        let network: [u8; 3] = parse_prefix(prefix)?;
        if start > end || end > 256 {
            return Err(DiscoveryError::InvalidRange { start, end });
        }
        Ok(Self {
            network,
            start,
            end,
        })
    }

    /// The canonical dotted prefix.
    pub fn prefix(&self) -> String {
        let [a, b, c] = self.network;
        format!("{a}.{b}.{c}")
    }

    pub fn len(&self) -> usize {
        usize::from(self.end - self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn to_iter(&self) -> impl Iterator<Item = Ipv4Addr> + use<> {
        let [a, b, c] = self.network;
        (self.start..self.end).map(move |suffix| Ipv4Addr::new(a, b, c, suffix as u8))
    }

    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        let [a, b, c, d] = addr.octets();
        [a, b, c] == self.network && (self.start..self.end).contains(&u16::from(d))
    }
}

/// Parses `a.b.c` into its octets.
pub fn parse_prefix(prefix: &str) -> Result<[u8; 3], DiscoveryError> {
    let invalid = || DiscoveryError::InvalidPrefix(prefix.to_string());

    let octets: Vec<u8> = prefix
        .trim()
        .trim_end_matches('.')
        .split('.')
        .map(|part| part.parse::<u8>().map_err(|_| invalid()))
        .collect::<Result<_, _>>()?;

    octets.try_into().map_err(|_| invalid())
}

/// The three leading octets of `ip`, in dotted form.
pub fn prefix_of(ip: Ipv4Addr) -> String {
    let [a, b, c, _] = ip.octets();
    format!("{a}.{b}.{c}")
}
