use std::time::Duration;

/// Per-host reachability budget used by the active sweep.
pub const PROBE_TIMEOUT: Duration = Duration::from_millis(300);

/// Reverse lookups share the probe budget.
pub const DNS_TIMEOUT: Duration = Duration::from_millis(300);

pub const MAX_CONCURRENT_PROBES: usize = 64;

pub const SWEEP_START: u16 = 1;
pub const SWEEP_END: u16 = 255;

#[derive(Debug, Clone)]
pub struct Config {
    /// Disables reverse DNS lookups.
    ///
    /// Every record is reported with the `Unknown` host name.
    pub no_dns: bool,
    pub quiet: u8,
    pub probe_timeout: Duration,
    pub dns_timeout: Duration,
    /// Upper bound of probes in flight during a sweep.
    pub max_concurrent_probes: usize,
    pub sweep_start: u16,
    /// Exclusive.
    pub sweep_end: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            no_dns: false,
            quiet: 0,
            probe_timeout: PROBE_TIMEOUT,
            dns_timeout: DNS_TIMEOUT,
            max_concurrent_probes: MAX_CONCURRENT_PROBES,
            sweep_start: SWEEP_START,
            sweep_end: SWEEP_END,
        }
    }
}
