//! Hotspot status introspection.
//!
//! The status query is synchronous and must answer immediately, so
//! introspectors only look at local state and never touch the network.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::Command;

use hotscan_common::{error::DiscoveryError, hotspot::HotspotSupport, network::interface};
use tracing::{debug, warn};

/// Directories hostapd creates one control socket in per served interface.
/// Desktop distributions use the first two, Android the vendor paths.
pub const HOSTAPD_CONTROL_DIRS: &[&str] = &[
    "/var/run/hostapd",
    "/run/hostapd",
    "/data/vendor/wifi/hostapd/ctrl",
    "/data/misc/wifi/hostapd",
];

pub trait HotspotIntrospector: Send + Sync {
    fn introspect(&self) -> Result<HotspotSupport, DiscoveryError>;
}

/// `false` unless the platform positively reports an active access point.
pub fn is_hotspot_enabled(introspector: &dyn HotspotIntrospector) -> bool {
    match introspector.introspect() {
        Ok(support) => {
            debug!("Hotspot introspection: {support:?}");
            support.is_enabled()
        }
        Err(e) => {
            warn!("{e}");
            false
        }
    }
}

/// The introspector matching the running platform.
pub fn platform_introspector() -> Box<dyn HotspotIntrospector> {
    #[cfg(target_os = "linux")]
    {
        Box::new(AnyIntrospector::new(vec![
            Box::new(HostapdIntrospector::default()),
            Box::new(IwIntrospector::default()),
        ]))
    }
    #[cfg(not(target_os = "linux"))]
    {
        Box::new(UnsupportedIntrospector)
    }
}

/// Asks several introspectors in turn. The first positive answer wins; a
/// negative answer from any supported source beats `Unsupported`.
pub struct AnyIntrospector {
    sources: Vec<Box<dyn HotspotIntrospector>>,
}

impl AnyIntrospector {
    pub fn new(sources: Vec<Box<dyn HotspotIntrospector>>) -> Self {
        Self { sources }
    }
}

impl HotspotIntrospector for AnyIntrospector {
    fn introspect(&self) -> Result<HotspotSupport, DiscoveryError> {
        let mut supported = false;
        let mut last_error: Option<DiscoveryError> = None;

        for source in &self.sources {
            match source.introspect() {
                Ok(HotspotSupport::Supported(true)) => return Ok(HotspotSupport::Supported(true)),
                Ok(HotspotSupport::Supported(false)) => supported = true,
                Ok(HotspotSupport::Unsupported) => {}
                Err(e) => {
                    debug!("{e}");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            _ if supported => Ok(HotspotSupport::Supported(false)),
            Some(e) => Err(e),
            None => Ok(HotspotSupport::Unsupported),
        }
    }
}

/// Considers AP mode enabled when hostapd holds a control socket for an
/// interface that is currently up.
pub struct HostapdIntrospector {
    control_dirs: Vec<PathBuf>,
    is_up: fn(&str) -> bool,
}

impl HostapdIntrospector {
    pub fn new(control_dir: impl Into<PathBuf>, is_up: fn(&str) -> bool) -> Self {
        Self::with_control_dirs(vec![control_dir.into()], is_up)
    }

    pub fn with_control_dirs(control_dirs: Vec<PathBuf>, is_up: fn(&str) -> bool) -> Self {
        Self {
            control_dirs,
            is_up,
        }
    }
}

impl Default for HostapdIntrospector {
    fn default() -> Self {
        let dirs: Vec<PathBuf> = HOSTAPD_CONTROL_DIRS.iter().map(PathBuf::from).collect();
        Self::with_control_dirs(dirs, interface::is_interface_up)
    }
}

impl HotspotIntrospector for HostapdIntrospector {
    fn introspect(&self) -> Result<HotspotSupport, DiscoveryError> {
        let mut found_dir = false;
        let mut last_error: Option<DiscoveryError> = None;

        for dir in &self.control_dirs {
            let entries = match std::fs::read_dir(dir) {
                Ok(entries) => entries,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => {
                    last_error = Some(DiscoveryError::IntrospectionFailure(format!(
                        "{}: {e}",
                        dir.display()
                    )));
                    continue;
                }
            };
            found_dir = true;

            let serving: Option<String> = entries
                .filter_map(Result::ok)
                .map(|entry| entry.file_name().to_string_lossy().into_owned())
                .find(|name| (self.is_up)(name.as_str()));

            if let Some(name) = serving {
                debug!("hostapd is serving {name} from {}", dir.display());
                return Ok(HotspotSupport::Supported(true));
            }
        }

        match last_error {
            _ if found_dir => Ok(HotspotSupport::Supported(false)),
            Some(e) => Err(e),
            None => Ok(HotspotSupport::Unsupported),
        }
    }
}

/// Asks nl80211 through `iw dev` for an interface in AP mode. Covers
/// hotspots run by wpa_supplicant, e.g. NetworkManager's.
pub struct IwIntrospector {
    list_devices: fn() -> std::io::Result<String>,
    is_up: fn(&str) -> bool,
}

impl IwIntrospector {
    pub fn new(list_devices: fn() -> std::io::Result<String>, is_up: fn(&str) -> bool) -> Self {
        Self {
            list_devices,
            is_up,
        }
    }
}

impl Default for IwIntrospector {
    fn default() -> Self {
        Self::new(run_iw_dev, interface::is_interface_up)
    }
}

fn run_iw_dev() -> std::io::Result<String> {
    let output = Command::new("iw").arg("dev").output()?;
    if !output.status.success() {
        return Err(std::io::Error::other(format!("iw dev exited with {}", output.status)));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Interfaces `iw dev` lists with `type AP`.
pub fn ap_interfaces(iw_dev: &str) -> Vec<String> {
    let mut current: Option<&str> = None;
    let mut found: Vec<String> = Vec::new();

    for line in iw_dev.lines().map(str::trim) {
        if let Some(name) = line.strip_prefix("Interface ") {
            current = Some(name.trim());
        } else if line == "type AP" {
            if let Some(name) = current {
                found.push(name.to_string());
            }
        }
    }
    found
}

impl HotspotIntrospector for IwIntrospector {
    fn introspect(&self) -> Result<HotspotSupport, DiscoveryError> {
        let listing: String = match (self.list_devices)() {
            Ok(listing) => listing,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(HotspotSupport::Unsupported),
            Err(e) => return Err(DiscoveryError::IntrospectionFailure(format!("iw dev: {e}"))),
        };

        let serving: Option<String> = ap_interfaces(&listing)
            .into_iter()
            .find(|name| (self.is_up)(name.as_str()));

        if let Some(name) = &serving {
            debug!("{name} is in AP mode");
        }
        Ok(HotspotSupport::Supported(serving.is_some()))
    }
}

pub struct UnsupportedIntrospector;

impl HotspotIntrospector for UnsupportedIntrospector {
    fn introspect(&self) -> Result<HotspotSupport, DiscoveryError> {
        Ok(HotspotSupport::Unsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    struct Denied;

    impl HotspotIntrospector for Denied {
        fn introspect(&self) -> Result<HotspotSupport, DiscoveryError> {
            Err(DiscoveryError::IntrospectionFailure("permission denied".into()))
        }
    }

    struct Fixed(HotspotSupport);

    impl HotspotIntrospector for Fixed {
        fn introspect(&self) -> Result<HotspotSupport, DiscoveryError> {
            Ok(self.0)
        }
    }

    fn wlan0_up(name: &str) -> bool {
        name == "wlan0"
    }

    const IW_DEV_AP: &str = "\
phy#0
\tInterface wlan0
\t\tifindex 3
\t\twdev 0x1
\t\taddr aa:bb:cc:dd:ee:ff
\t\tssid hotspot
\t\ttype AP
\t\tchannel 6 (2437 MHz), width: 20 MHz, center1: 2437 MHz
\tInterface wlan1
\t\ttype managed
";

    fn iw_ap_listing() -> std::io::Result<String> {
        Ok(IW_DEV_AP.to_string())
    }

    fn iw_missing() -> std::io::Result<String> {
        Err(std::io::Error::from(ErrorKind::NotFound))
    }

    fn iw_failing() -> std::io::Result<String> {
        Err(std::io::Error::other("netlink refused"))
    }

    #[test]
    fn failure_reports_disabled() {
        assert!(!is_hotspot_enabled(&Denied));
    }

    #[test]
    fn unsupported_reports_disabled() {
        assert!(!is_hotspot_enabled(&UnsupportedIntrospector));
        assert!(!is_hotspot_enabled(&Fixed(HotspotSupport::Unsupported)));
    }

    #[test]
    fn supported_answer_is_passed_through() {
        assert!(is_hotspot_enabled(&Fixed(HotspotSupport::Supported(true))));
        assert!(!is_hotspot_enabled(&Fixed(HotspotSupport::Supported(false))));
    }

    #[test]
    fn missing_control_dir_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let introspector = HostapdIntrospector::new(dir.path().join("hostapd"), wlan0_up);
        assert_eq!(introspector.introspect().unwrap(), HotspotSupport::Unsupported);
    }

    #[test]
    fn socket_for_live_interface_means_enabled() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("wlan0")).unwrap();

        let introspector = HostapdIntrospector::new(dir.path(), wlan0_up);
        assert_eq!(introspector.introspect().unwrap(), HotspotSupport::Supported(true));
    }

    #[test]
    fn stale_socket_means_disabled() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("wlan1")).unwrap();

        let introspector = HostapdIntrospector::new(dir.path(), wlan0_up);
        assert_eq!(introspector.introspect().unwrap(), HotspotSupport::Supported(false));
        assert!(!is_hotspot_enabled(&introspector));
    }

    #[test]
    fn android_vendor_dir_is_searched_after_missing_ones() {
        let dir = tempfile::tempdir().unwrap();
        let ctrl = dir.path().join("data/vendor/wifi/hostapd/ctrl");
        std::fs::create_dir_all(&ctrl).unwrap();
        File::create(ctrl.join("wlan0")).unwrap();

        let introspector = HostapdIntrospector::with_control_dirs(
            vec![dir.path().join("var/run/hostapd"), ctrl],
            wlan0_up,
        );
        assert_eq!(introspector.introspect().unwrap(), HotspotSupport::Supported(true));
    }

    #[test]
    fn iw_listing_names_ap_interfaces_only() {
        assert_eq!(ap_interfaces(IW_DEV_AP), ["wlan0"]);
        assert!(ap_interfaces("").is_empty());
    }

    #[test]
    fn iw_reports_live_ap_interface() {
        let introspector = IwIntrospector::new(iw_ap_listing, wlan0_up);
        assert_eq!(introspector.introspect().unwrap(), HotspotSupport::Supported(true));

        let introspector = IwIntrospector::new(iw_ap_listing, |_| false);
        assert_eq!(introspector.introspect().unwrap(), HotspotSupport::Supported(false));
    }

    #[test]
    fn missing_iw_is_unsupported_and_failing_iw_is_an_error() {
        let missing = IwIntrospector::new(iw_missing, wlan0_up);
        assert_eq!(missing.introspect().unwrap(), HotspotSupport::Unsupported);

        let failing = IwIntrospector::new(iw_failing, wlan0_up);
        assert!(matches!(
            failing.introspect(),
            Err(DiscoveryError::IntrospectionFailure(_))
        ));
        assert!(!is_hotspot_enabled(&failing));
    }

    #[test]
    fn wpa_supplicant_hotspot_found_when_hostapd_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let any = AnyIntrospector::new(vec![
            Box::new(HostapdIntrospector::new(dir.path().join("hostapd"), wlan0_up)),
            Box::new(IwIntrospector::new(iw_ap_listing, wlan0_up)),
        ]);
        assert!(is_hotspot_enabled(&any));
    }

    #[test]
    fn any_prefers_a_negative_answer_over_errors() {
        let any = AnyIntrospector::new(vec![
            Box::new(Denied),
            Box::new(Fixed(HotspotSupport::Supported(false))),
            Box::new(UnsupportedIntrospector),
        ]);
        assert_eq!(any.introspect().unwrap(), HotspotSupport::Supported(false));

        let any = AnyIntrospector::new(vec![Box::new(UnsupportedIntrospector), Box::new(Denied)]);
        assert!(any.introspect().is_err());

        let any = AnyIntrospector::new(vec![Box::new(UnsupportedIntrospector)]);
        assert_eq!(any.introspect().unwrap(), HotspotSupport::Unsupported);
    }
}
