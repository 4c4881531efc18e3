//! Recoverable failure kinds.
//!
//! None of these ever reach the caller of a discovery or status query. They
//! are produced by the individual producers, logged, and then folded into a
//! degraded value (an empty list, the `Unknown` host name, or `false`).

use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The neighbor table could not be opened or read.
    #[error("neighbor table {path} is unavailable: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("reverse lookup for {ip} failed: {reason}")]
    ResolutionFailure { ip: String, reason: String },

    #[error("{ip} did not answer the reachability probe")]
    ProbeUnreachable { ip: String },

    #[error("hotspot introspection failed: {0}")]
    IntrospectionFailure(String),

    #[error("invalid subnet prefix: {0}")]
    InvalidPrefix(String),

    #[error("invalid host range [{start}, {end})")]
    InvalidRange { start: u16, end: u16 },
}
