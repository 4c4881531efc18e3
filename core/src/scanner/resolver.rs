use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hotscan_common::{config::Config, device::UNKNOWN_HOSTNAME, error::DiscoveryError};
use tracing::debug;

/// Turns an address into a host name.
#[async_trait]
pub trait HostnameResolver: Send + Sync {
    async fn resolve(&self, ip: &str) -> Result<String, DiscoveryError>;
}

/// Best-effort reverse lookup. Every failure becomes [`UNKNOWN_HOSTNAME`].
pub async fn resolve_host_name(resolver: &dyn HostnameResolver, ip: &str) -> String {
    match resolver.resolve(ip).await {
        Ok(name) if !name.trim().is_empty() => name,
        Ok(_) => UNKNOWN_HOSTNAME.to_string(),
        Err(e) => {
            debug!("{e}");
            UNKNOWN_HOSTNAME.to_string()
        }
    }
}

/// Picks the resolver matching `cfg`.
pub fn resolver_for(cfg: &Config) -> Arc<dyn HostnameResolver> {
    if cfg.no_dns {
        Arc::new(DisabledResolver)
    } else {
        Arc::new(SystemResolver::new(cfg.dns_timeout))
    }
}

/// Reverse lookups through the OS resolver (`getnameinfo`).
pub struct SystemResolver {
    timeout: Duration,
}

impl SystemResolver {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl HostnameResolver for SystemResolver {
    async fn resolve(&self, ip: &str) -> Result<String, DiscoveryError> {
        let failure = |reason: &str| DiscoveryError::ResolutionFailure {
            ip: ip.to_string(),
            reason: reason.to_string(),
        };

        let addr: IpAddr = ip.parse().map_err(|_| failure("malformed address"))?;

        // The blocking lookup keeps running after a timeout, but its result is ignored.
        let lookup = tokio::task::spawn_blocking(move || dns_lookup::lookup_addr(&addr));

        match tokio::time::timeout(self.timeout, lookup).await {
            Err(_elapsed) => Err(failure("timed out")),
            Ok(Err(join_err)) => Err(failure(&join_err.to_string())),
            Ok(Ok(Err(io_err))) => Err(failure(&io_err.to_string())),
            // getnameinfo falls back to the numeric form when there is no PTR record
            Ok(Ok(Ok(name))) if name == addr.to_string() => Err(failure("no PTR record")),
            Ok(Ok(Ok(name))) => Ok(name),
        }
    }
}

/// Used when lookups are turned off.
pub struct DisabledResolver;

#[async_trait]
impl HostnameResolver for DisabledResolver {
    async fn resolve(&self, _ip: &str) -> Result<String, DiscoveryError> {
        Ok(UNKNOWN_HOSTNAME.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingResolver;

    #[async_trait]
    impl HostnameResolver for FailingResolver {
        async fn resolve(&self, ip: &str) -> Result<String, DiscoveryError> {
            Err(DiscoveryError::ResolutionFailure {
                ip: ip.to_string(),
                reason: "NXDOMAIN".into(),
            })
        }
    }

    struct BlankResolver;

    #[async_trait]
    impl HostnameResolver for BlankResolver {
        async fn resolve(&self, _ip: &str) -> Result<String, DiscoveryError> {
            Ok("  ".into())
        }
    }

    #[tokio::test]
    async fn failures_become_unknown() {
        assert_eq!(
            resolve_host_name(&FailingResolver, "192.168.43.5").await,
            UNKNOWN_HOSTNAME
        );
    }

    #[tokio::test]
    async fn blank_names_become_unknown() {
        assert_eq!(
            resolve_host_name(&BlankResolver, "192.168.43.5").await,
            UNKNOWN_HOSTNAME
        );
    }

    #[tokio::test]
    async fn malformed_address_is_unknown() {
        let resolver = SystemResolver::new(Duration::from_millis(300));
        assert!(matches!(
            resolver.resolve("not-an-ip").await,
            Err(DiscoveryError::ResolutionFailure { .. })
        ));
        assert_eq!(
            resolve_host_name(&resolver, "999.1.1.1").await,
            UNKNOWN_HOSTNAME
        );
    }

    #[tokio::test]
    async fn zero_budget_never_yields_empty_name() {
        let resolver = SystemResolver::new(Duration::ZERO);
        let name = resolve_host_name(&resolver, "192.0.2.1").await;
        assert!(!name.is_empty());
    }

    #[tokio::test]
    async fn disabled_resolver_reports_unknown() {
        let cfg = Config {
            no_dns: true,
            ..Config::default()
        };
        let resolver = resolver_for(&cfg);
        assert_eq!(
            resolve_host_name(resolver.as_ref(), "10.0.0.1").await,
            UNKNOWN_HOSTNAME
        );
    }

    #[tokio::test]
    #[ignore]
    async fn documentation_range_has_no_ptr_record() {
        let resolver = SystemResolver::new(Duration::from_secs(2));
        assert_eq!(
            resolve_host_name(&resolver, "192.0.2.123").await,
            UNKNOWN_HOSTNAME
        );
    }
}
