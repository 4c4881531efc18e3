/// Outcome of asking the platform about access point mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotspotSupport {
    /// The platform exposes AP state; carries whether it is enabled.
    Supported(bool),
    /// The platform has no way to report AP state.
    Unsupported,
}

impl HotspotSupport {
    /// Folds the answer into the status reported to callers.
    pub fn is_enabled(self) -> bool {
        matches!(self, Self::Supported(true))
    }
}
