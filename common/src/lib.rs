//! Shared model for hotscan: device records, discovery environment,
//! configuration and the recoverable error taxonomy.

pub mod config;
pub mod device;
pub mod environment;
pub mod error;
pub mod hotspot;
pub mod network;
pub mod strategy;
