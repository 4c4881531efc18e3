//! The two producers of device records.
//!
//! [`neighbor`] reads what the kernel already knows about its neighbors and
//! is preferred whenever the platform allows it. [`sweep`] actively probes
//! the hotspot subnet and only learns addresses and host names. Both consult
//! [`resolver`] once per record.

use std::sync::Arc;

pub mod neighbor;
pub mod resolver;
pub mod sweep;

/// Invoked with the number of devices found so far.
pub type ProgressCallback = Arc<dyn Fn(usize) + Send + Sync>;
