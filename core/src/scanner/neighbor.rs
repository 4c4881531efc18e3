//! Passive discovery through the kernel neighbor table.
//!
//! The table is whitespace separated with a header row, e.g. `/proc/net/arp`:
//!
//! ```text
//! IP address       HW type     Flags       HW address            Mask     Device
//! 192.168.43.5     0x1         0x2         aa:bb:cc:dd:ee:ff     *        wlan0
//! ```
//!
//! Columns are taken by position only: 0 is the address, 2 the flags, 3 the
//! MAC and 5 the interface. Names in the header are never interpreted.

use std::path::Path;
use std::sync::Arc;

use hotscan_common::{
    device::{DeviceRecord, UNKNOWN_HOSTNAME},
    error::DiscoveryError,
};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use super::resolver::{HostnameResolver, resolve_host_name};

const HEADER_TOKEN: &str = "IP";
const MIN_FIELDS: usize = 6;

const IP_FIELD: usize = 0;
const FLAGS_FIELD: usize = 2;
const MAC_FIELD: usize = 3;
const DEVICE_FIELD: usize = 5;

/// One accepted row of the neighbor table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborEntry {
    pub ip: String,
    pub flags: String,
    pub mac: String,
    pub interface_name: String,
}

impl NeighborEntry {
    fn into_record(self, host_name: String) -> DeviceRecord {
        DeviceRecord::new(self.ip, host_name).with_link_layer(
            self.mac,
            self.flags,
            self.interface_name,
        )
    }
}

/// Parses a single row. Headers and rows with fewer than six fields yield `None`.
pub fn parse_line(line: &str) -> Option<NeighborEntry> {
    let fields: Vec<&str> = line.split_whitespace().collect();

    if fields.len() < MIN_FIELDS || fields[IP_FIELD] == HEADER_TOKEN {
        return None;
    }

    Some(NeighborEntry {
        ip: fields[IP_FIELD].to_string(),
        flags: fields[FLAGS_FIELD].to_string(),
        mac: fields[MAC_FIELD].to_string(),
        interface_name: fields[DEVICE_FIELD].to_string(),
    })
}

pub fn parse_table(text: &str) -> Vec<NeighborEntry> {
    text.lines().filter_map(parse_line).collect()
}

pub async fn read_entries(path: &Path) -> Result<Vec<NeighborEntry>, DiscoveryError> {
    let bytes: Vec<u8> =
        tokio::fs::read(path)
            .await
            .map_err(|source| DiscoveryError::SourceUnavailable {
                path: path.to_path_buf(),
                source,
            })?;

    let entries: Vec<NeighborEntry> = parse_table(&String::from_utf8_lossy(&bytes));
    debug!("{} neighbor entries in {}", entries.len(), path.display());
    Ok(entries)
}

/// Reads the table and resolves a host name for every entry, with at most
/// `max_concurrent` lookups in flight.
///
/// Returns [`DiscoveryError::SourceUnavailable`] when the table cannot be read
/// so the caller can decide how to degrade.
pub async fn try_read_neighbor_table(
    path: &Path,
    resolver: Arc<dyn HostnameResolver>,
    max_concurrent: usize,
) -> Result<Vec<DeviceRecord>, DiscoveryError> {
    let entries: Vec<NeighborEntry> = read_entries(path).await?;
    Ok(resolve_entries(entries, resolver, max_concurrent).await)
}

/// Same as [`try_read_neighbor_table`], with an unreadable table yielding no records.
pub async fn read_neighbor_table(
    path: &Path,
    resolver: Arc<dyn HostnameResolver>,
    max_concurrent: usize,
) -> Vec<DeviceRecord> {
    try_read_neighbor_table(path, resolver, max_concurrent)
        .await
        .unwrap_or_else(|e| {
            warn!("{e}");
            Vec::new()
        })
}

/// Lookups run concurrently; the table order is kept.
async fn resolve_entries(
    entries: Vec<NeighborEntry>,
    resolver: Arc<dyn HostnameResolver>,
    max_concurrent: usize,
) -> Vec<DeviceRecord> {
    let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));
    let mut lookups: JoinSet<(usize, DeviceRecord)> = JoinSet::new();

    for (idx, entry) in entries.into_iter().enumerate() {
        let resolver = Arc::clone(&resolver);
        let semaphore = Arc::clone(&semaphore);
        lookups.spawn(async move {
            let host_name: String = match semaphore.acquire().await {
                Ok(_permit) => resolve_host_name(resolver.as_ref(), &entry.ip).await,
                Err(e) => {
                    warn!("Lookup semaphore closed for {}: {e}", entry.ip);
                    UNKNOWN_HOSTNAME.to_string()
                }
            };
            (idx, entry.into_record(host_name))
        });
    }

    let mut resolved: Vec<(usize, DeviceRecord)> = Vec::with_capacity(lookups.len());
    while let Some(joined) = lookups.join_next().await {
        match joined {
            Ok(pair) => resolved.push(pair),
            Err(e) => warn!("Neighbor lookup task failed: {e}"),
        }
    }

    resolved.sort_by_key(|(idx, _)| *idx);
    resolved.into_iter().map(|(_, record)| record).collect()
}
