//! # Device Record Model
//!
//! A [`DeviceRecord`] is one device seen during a single discovery run.
//!
//! Records coming from the neighbor table carry link-layer details (MAC,
//! state flags, interface). Records coming from an active sweep only know the
//! address and whatever the reverse lookup returned.

use std::collections::HashMap;
use std::fmt;

/// Host name reported whenever reverse resolution does not produce one.
pub const UNKNOWN_HOSTNAME: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceRecord {
    ip: String,
    mac: Option<String>,
    host_name: String,
    flags: Option<String>,
    interface_name: Option<String>,
}

impl DeviceRecord {
    /// Creates a record that only knows its address and host name.
    pub fn new(ip: impl Into<String>, host_name: impl Into<String>) -> Self {
        let ip: String = ip.into();
        debug_assert!(!ip.is_empty(), "device records need an address");

        let host_name: String = host_name.into();
        let host_name: String = if host_name.is_empty() {
            UNKNOWN_HOSTNAME.to_string()
        } else {
            host_name
        };

        Self {
            ip,
            mac: None,
            host_name,
            flags: None,
            interface_name: None,
        }
    }

    /// Attaches the link-layer columns read from the neighbor table.
    pub fn with_link_layer(
        mut self,
        mac: impl Into<String>,
        flags: impl Into<String>,
        interface_name: impl Into<String>,
    ) -> Self {
        self.mac = Some(mac.into());
        self.flags = Some(flags.into());
        self.interface_name = Some(interface_name.into());
        self
    }

    pub fn ip(&self) -> &str {
        &self.ip
    }

    pub fn mac(&self) -> Option<&str> {
        self.mac.as_deref()
    }

    pub fn host_name(&self) -> &str {
        &self.host_name
    }

    pub fn flags(&self) -> Option<&str> {
        self.flags.as_deref()
    }

    pub fn interface_name(&self) -> Option<&str> {
        self.interface_name.as_deref()
    }

    /// Whether the host name came from an actual reverse lookup.
    pub fn is_resolved(&self) -> bool {
        self.host_name != UNKNOWN_HOSTNAME
    }
}

impl fmt::Display for DeviceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.ip, self.host_name)?;
        if let Some(mac) = &self.mac {
            write!(f, " [{mac}]")?;
        }
        Ok(())
    }
}

/// Collapses records sharing an address.
///
/// The last record for an address wins but keeps the position where that
/// address first appeared.
pub fn collapse_duplicates(records: Vec<DeviceRecord>) -> Vec<DeviceRecord> {
    let mut positions: HashMap<String, usize> = HashMap::with_capacity(records.len());
    let mut collapsed: Vec<DeviceRecord> = Vec::with_capacity(records.len());

    for record in records {
        let existing: Option<usize> = positions.get(record.ip()).copied();
        match existing {
            Some(idx) => collapsed[idx] = record,
            None => {
                positions.insert(record.ip.clone(), collapsed.len());
                collapsed.push(record);
            }
        }
    }
    collapsed
}
