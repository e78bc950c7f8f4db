use std::sync::OnceLock;

use crate::error::ContextError;
use crate::host::HostOverride;

static GLOBAL_CONFIG: OnceLock<ResolverConfig> = OnceLock::new();

/// Configuration threaded through every resolution call.
///
/// Holds the optional host override. Pass it explicitly to a
/// [`Resolver`](crate::resolver::Resolver), or install it once at bootstrap
/// with [`ResolverConfig::install`] and read it back with
/// [`ResolverConfig::global`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolverConfig {
    host_override: Option<HostOverride>,
}

impl ResolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the host override. A blank host is rejected and leaves the config untouched.
    pub fn set_override(&mut self, host: impl AsRef<str>, required: bool) -> Result<(), ContextError> {
        self.host_override = Some(HostOverride::new(host, required)?);
        Ok(())
    }

    pub fn with_override(mut self, host: impl AsRef<str>, required: bool) -> Result<Self, ContextError> {
        self.set_override(host, required)?;
        Ok(self)
    }

    pub fn clear_override(&mut self) {
        self.host_override = None;
    }

    pub fn host_override(&self) -> Option<&HostOverride> {
        self.host_override.as_ref()
    }

    /// Installs this config as the process-wide default. Returns false if one
    /// was already installed; the installed config never changes afterwards.
    pub fn install(self) -> bool {
        GLOBAL_CONFIG.set(self).is_ok()
    }

    pub fn global() -> Option<&'static ResolverConfig> {
        GLOBAL_CONFIG.get()
    }

    /// The installed config, or an empty one when nothing was installed.
    pub fn global_or_default() -> ResolverConfig {
        Self::global().cloned().unwrap_or_default()
    }
}
