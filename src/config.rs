//! # Process-wide hub configuration.
//!
//! [`HubConfig`] bounds what the dispatcher will copy into queued envelopes.
//! It is installed once with [`init`](crate::init) before the first publish;
//! if `init` is never called the defaults apply.
//!
//! # Example
//! ```
//! use evhub::HubConfig;
//!
//! let cfg = HubConfig::default();
//! assert_eq!(cfg.max_safe_payload, evhub::DEFAULT_SAFE_CAPACITY);
//! ```

use std::sync::OnceLock;

use crate::event::DEFAULT_SAFE_CAPACITY;

/// Configuration for the event hub.
///
/// Controls the envelope capacity enforced on the publish path.
#[derive(Clone, Debug)]
pub struct HubConfig {
    /// Largest safe-payload size (in bytes) a publish may carry.
    ///
    /// The safe region of a payload is copied byte-for-byte into each queued
    /// envelope; publishing a larger one asserts.
    pub max_safe_payload: usize,
}

impl Default for HubConfig {
    /// Provides a default configuration:
    /// - `max_safe_payload = DEFAULT_SAFE_CAPACITY` (384 bytes)
    fn default() -> Self {
        Self {
            max_safe_payload: DEFAULT_SAFE_CAPACITY,
        }
    }
}

/// Installed-once configuration; `current()` falls back to defaults.
static CONFIG: OnceLock<HubConfig> = OnceLock::new();

/// Installs the process-wide configuration.
///
/// # Panics
/// Panics if a configuration has already been installed.
pub(crate) fn install(cfg: HubConfig) {
    CONFIG
        .set(cfg)
        .expect("hub configuration already installed");
}

/// Returns the installed configuration, or the defaults.
pub(crate) fn current() -> &'static HubConfig {
    CONFIG.get_or_init(HubConfig::default)
}
