use colored::*;
use hotscan_common::device::DeviceRecord;

use crate::terminal::colors;

pub type Detail = (String, ColoredString);

/// Key/value rows printed under a device.
pub fn record_to_details(record: &DeviceRecord) -> Vec<Detail> {
    let mut details: Vec<Detail> = vec![(
        String::from("IPv4"),
        record.ip().color(colors::IPV4_ADDR),
    )];

    if let Some(mac) = record.mac() {
        details.push((String::from("MAC"), mac.color(colors::MAC_ADDR)));
    }
    if let Some(flags) = record.flags() {
        details.push((String::from("Flags"), flags.normal()));
    }
    if let Some(interface) = record.interface_name() {
        details.push((String::from("Interface"), interface.normal()));
    }
    details
}

pub fn host_name(record: &DeviceRecord) -> ColoredString {
    if record.is_resolved() {
        record.host_name().color(colors::PRIMARY)
    } else {
        record.host_name().color(colors::UNRESOLVED).italic()
    }
}
