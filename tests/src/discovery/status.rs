use std::fs::File;
use std::time::{Duration, Instant};

use hotscan_common::{error::DiscoveryError, hotspot::HotspotSupport};
use hotscan_core::system::{
    HostapdIntrospector, HotspotIntrospector, UnsupportedIntrospector, is_hotspot_enabled,
    platform_introspector,
};

struct BrokenPlatform;

impl HotspotIntrospector for BrokenPlatform {
    fn introspect(&self) -> Result<HotspotSupport, DiscoveryError> {
        Err(DiscoveryError::IntrospectionFailure(
            "ap state is not readable".into(),
        ))
    }
}

#[test]
fn failed_introspection_reports_disabled() {
    assert!(!is_hotspot_enabled(&BrokenPlatform));
}

#[test]
fn unsupported_platform_reports_disabled() {
    assert!(!is_hotspot_enabled(&UnsupportedIntrospector));
}

#[test]
fn hostapd_socket_for_live_interface() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    File::create(dir.path().join("ap0"))?;

    let introspector = HostapdIntrospector::new(dir.path(), |name| name == "ap0");
    assert!(is_hotspot_enabled(&introspector));
    Ok(())
}

#[test]
fn host_status_answers_promptly() {
    let started = Instant::now();
    let _ = is_hotspot_enabled(platform_introspector().as_ref());
    assert!(started.elapsed() < Duration::from_secs(1));
}
