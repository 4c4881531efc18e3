use std::fmt;

use crate::environment::PlatformCapabilities;

/// How a single discovery run finds devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryStrategy {
    /// Read the kernel neighbor table.
    PassiveTable,
    /// Probe every address of the hotspot subnet.
    ActiveSweep,
}

impl DiscoveryStrategy {
    /// Picks the strategy for one run. The neighbor table wins whenever the
    /// platform lets us read it.
    pub fn select(platform: &PlatformCapabilities) -> Self {
        if platform.neighbor_table_readable {
            Self::PassiveTable
        } else {
            Self::ActiveSweep
        }
    }
}

impl fmt::Display for DiscoveryStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PassiveTable => write!(f, "neighbor table"),
            Self::ActiveSweep => write!(f, "active sweep"),
        }
    }
}

/// Lifecycle of one discovery invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryState {
    Idle,
    Running,
    Completed,
}
