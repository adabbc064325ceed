//! The dispatch context: which probe and which override stubs resolve against.

use std::{fmt, sync::{Arc, OnceLock}};

use platform::{CapabilityLevel, CapabilityProbe, HostProbe};

use crate::config::DispatchConfig;

/// Probe and configuration shared by the stubs of one library instance.
///
/// A library builds one context at initialization and hands it to its stub
/// table. Tests build their own with a [`platform::FixedProbe`] or a counting
/// probe so that nothing is shared between test cases.
///
/// # Example
///
/// ```
/// use dispatch::{DispatchConfig, DispatchContext};
/// use platform::{CapabilityLevel, FixedProbe};
///
/// let ctx = DispatchContext::new(FixedProbe(CapabilityLevel::Level1), DispatchConfig::AUTO);
/// assert_eq!(ctx.probe().current_level(), CapabilityLevel::Level1);
/// assert!(!ctx.config().is_forced());
/// ```
#[derive(Clone)]
pub struct DispatchContext {
  probe: Arc<dyn CapabilityProbe>,
  config: DispatchConfig,
}

impl DispatchContext {
  #[must_use]
  pub fn new(probe: impl CapabilityProbe + 'static, config: DispatchConfig) -> Self {
    Self { probe: Arc::new(probe), config }
  }

  /// Share an existing probe.
  #[must_use]
  pub fn with_shared_probe(probe: Arc<dyn CapabilityProbe>, config: DispatchConfig) -> Self {
    Self { probe, config }
  }

  /// Host detection plus the environment override.
  #[must_use]
  pub fn host() -> Self {
    Self::new(HostProbe, DispatchConfig::from_env())
  }

  /// Process-wide host context, built on first use.
  #[must_use]
  pub fn global() -> &'static Self {
    static GLOBAL: OnceLock<DispatchContext> = OnceLock::new();
    GLOBAL.get_or_init(Self::host)
  }

  /// Same probe, with `level` forced.
  #[must_use]
  pub fn with_forced_level(&self, level: CapabilityLevel) -> Self {
    Self { probe: Arc::clone(&self.probe), config: DispatchConfig::forced(level) }
  }

  #[inline]
  #[must_use]
  pub fn probe(&self) -> &dyn CapabilityProbe {
    &*self.probe
  }

  #[inline]
  #[must_use]
  pub const fn config(&self) -> &DispatchConfig {
    &self.config
  }
}

impl fmt::Debug for DispatchContext {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("DispatchContext")
      .field("forced_level", &self.config.forced_level)
      .finish_non_exhaustive()
  }
}
