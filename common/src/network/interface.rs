use std::net::Ipv4Addr;

use pnet::datalink::{self, NetworkInterface};
use pnet::ipnetwork::{IpNetwork, Ipv4Network};
use tracing::debug;

#[cfg(target_os = "linux")]
use linux_impl::is_wireless;
#[cfg(not(target_os = "linux"))]
use fallback_impl::is_wireless;

use super::range::prefix_of;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ViabilityError {
    /// The interface is operationally down.
    IsDown,
    IsLoopback,
    /// Filtered out as "not wireless" by the provided logic.
    NotWireless,
    /// The interface has no private IPv4 address to derive a subnet from.
    NoPrivateIpv4,
}

pub trait NetworkInterfaceExtension {
    fn get_ipv4_nets(&self) -> Vec<Ipv4Network>;
    fn get_private_ipv4(&self) -> Option<Ipv4Addr>;
}

impl NetworkInterfaceExtension for NetworkInterface {
    fn get_ipv4_nets(&self) -> Vec<Ipv4Network> {
        self.ips
            .iter()
            .filter_map(|ip| match ip {
                IpNetwork::V4(ipv4) => Some(*ipv4),
                IpNetwork::V6(_) => None,
            })
            .collect()
    }

    fn get_private_ipv4(&self) -> Option<Ipv4Addr> {
        self.get_ipv4_nets()
            .into_iter()
            .map(|net| net.ip())
            .find(|ip| ip.is_private())
    }
}

/// Derives the sweep prefix from the wireless interface serving the hotspot.
pub fn hotspot_prefix() -> Option<String> {
    let interfaces: Vec<NetworkInterface> = datalink::interfaces();
    let interface: &NetworkInterface = select_hotspot_interface(&interfaces, is_wireless)?;
    let ip: Ipv4Addr = interface.get_private_ipv4()?;

    debug!("Using {} ({ip}) to derive the sweep prefix", interface.name);
    Some(prefix_of(ip))
}

/// Whether an interface named `name` exists and is up.
pub fn is_interface_up(name: &str) -> bool {
    datalink::interfaces()
        .iter()
        .any(|interface| interface.name == name && interface.is_up())
}

pub fn is_viable_hotspot_interface(
    interface: &NetworkInterface,
    is_wireless: impl Fn(&NetworkInterface) -> bool,
) -> Result<(), ViabilityError> {
    if !interface.is_up() {
        return Err(ViabilityError::IsDown);
    }
    if interface.is_loopback() {
        return Err(ViabilityError::IsLoopback);
    }
    if !is_wireless(interface) {
        return Err(ViabilityError::NotWireless);
    }
    if interface.get_private_ipv4().is_none() {
        return Err(ViabilityError::NoPrivateIpv4);
    }
    Ok(())
}

/// Picks the first viable wireless interface, in the order the OS lists them.
pub fn select_hotspot_interface(
    interfaces: &[NetworkInterface],
    is_wireless: impl Fn(&NetworkInterface) -> bool,
) -> Option<&NetworkInterface> {
    interfaces.iter().find(|&interface| {
        match is_viable_hotspot_interface(interface, &is_wireless) {
            Ok(()) => true,
            Err(reason) => {
                debug!("Skipping {}: {reason:?}", interface.name);
                false
            }
        }
    })
}

#[cfg(target_os = "linux")]
mod linux_impl {
    use std::path::Path;

    use pnet::datalink::NetworkInterface;

    pub fn is_wireless(interface: &NetworkInterface) -> bool {
        let sys_path = Path::new("/sys/class/net").join(&interface.name);
        sys_path.join("wireless").exists() || sys_path.join("phy80211").exists()
    }
}

#[cfg(not(target_os = "linux"))]
mod fallback_impl {
    use pnet::datalink::NetworkInterface;

    const WIRELESS_PREFIXES: &[&str] = &["wlan", "wlp", "ap", "swlan", "en0"];

    pub fn is_wireless(interface: &NetworkInterface) -> bool {
        WIRELESS_PREFIXES
            .iter()
            .any(|prefix| interface.name.starts_with(prefix))
    }
}
