//! Device discovery for a local hotspot.
//!
//! The [`discovery::DiscoveryService`] picks between reading the kernel
//! neighbor table and sweeping the hotspot subnet, runs the chosen strategy on
//! a Tokio worker task and hands the aggregated [`DeviceRecord`] list back
//! through a one-shot handle.
//!
//! [`DeviceRecord`]: hotscan_common::device::DeviceRecord

pub mod discovery;
pub mod network;
pub mod scanner;
pub mod system;
