//! # Discovery Environment
//!
//! Describes the host a discovery run executes on. The coordinator never
//! inspects the machine itself; whoever invokes it hands over an
//! [`Environment`], which keeps the core deterministic under test.

use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::network::interface;
use crate::strategy::DiscoveryStrategy;

/// Kernel neighbor table on Linux and Android.
pub const DEFAULT_NEIGHBOR_TABLE: &str = "/proc/net/arp";

/// Subnet Android assigns to tethered clients by default.
pub const DEFAULT_SUBNET_PREFIX: &str = "192.168.43";

/// Capability signal deciding which strategy is viable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlatformCapabilities {
    pub neighbor_table_readable: bool,
}

impl PlatformCapabilities {
    /// Checks whether `neighbor_table` can be opened for reading.
    ///
    /// Newer Android releases deny access to `/proc/net/arp` for regular
    /// apps, which surfaces here as a permission error.
    pub fn probe(neighbor_table: &Path) -> Self {
        let neighbor_table_readable: bool = match File::open(neighbor_table) {
            Ok(_) => true,
            Err(e) => {
                debug!("{} is not readable: {e}", neighbor_table.display());
                false
            }
        };
        Self {
            neighbor_table_readable,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub platform: PlatformCapabilities,
    pub neighbor_table: PathBuf,
    /// First three octets of the subnet swept when the table is unavailable.
    pub subnet_prefix: String,
}

impl Environment {
    pub fn new(
        platform: PlatformCapabilities,
        neighbor_table: impl Into<PathBuf>,
        subnet_prefix: impl Into<String>,
    ) -> Self {
        Self {
            platform,
            neighbor_table: neighbor_table.into(),
            subnet_prefix: subnet_prefix.into(),
        }
    }

    /// Builds the environment of the running host.
    ///
    /// The sweep prefix comes from an active wireless interface when one is
    /// found, otherwise the Android hotspot default is used.
    pub fn detect() -> Self {
        let neighbor_table: PathBuf = PathBuf::from(DEFAULT_NEIGHBOR_TABLE);
        let platform: PlatformCapabilities = PlatformCapabilities::probe(&neighbor_table);
        let subnet_prefix: String =
            interface::hotspot_prefix().unwrap_or_else(|| DEFAULT_SUBNET_PREFIX.to_string());

        Self {
            platform,
            neighbor_table,
            subnet_prefix,
        }
    }

    /// Points the environment at another table and re-probes its readability.
    pub fn with_neighbor_table(mut self, path: impl Into<PathBuf>) -> Self {
        self.neighbor_table = path.into();
        self.platform = PlatformCapabilities::probe(&self.neighbor_table);
        self
    }

    pub fn with_subnet_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.subnet_prefix = prefix.into();
        self
    }

    pub fn with_capabilities(mut self, platform: PlatformCapabilities) -> Self {
        self.platform = platform;
        self
    }

    pub fn strategy(&self) -> DiscoveryStrategy {
        DiscoveryStrategy::select(&self.platform)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(
            PlatformCapabilities::default(),
            DEFAULT_NEIGHBOR_TABLE,
            DEFAULT_SUBNET_PREFIX,
        )
    }
}
