//! The capability-probe seam.
//!
//! Dispatch code never calls the host detection directly; it asks a
//! [`CapabilityProbe`]. Production code uses [`HostProbe`]; tests and
//! bare-metal deployments inject [`FixedProbe`] or their own implementation.

use crate::level::CapabilityLevel;

/// Reports the capability level of the machine dispatch should target.
///
/// Implementations must be cheap after their first call and safe to call
/// concurrently. A probe that cannot interrogate its hardware reports
/// [`CapabilityLevel::Default`] instead of failing.
pub trait CapabilityProbe: Send + Sync {
  /// Current capability level.
  fn current_level(&self) -> CapabilityLevel;
}

/// Probe backed by the cached host detection ([`crate::get`]).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HostProbe;

impl CapabilityProbe for HostProbe {
  #[inline]
  fn current_level(&self) -> CapabilityLevel {
    crate::detect::get().level
  }
}

/// Probe that always reports the same level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FixedProbe(pub CapabilityLevel);

impl CapabilityProbe for FixedProbe {
  #[inline]
  fn current_level(&self) -> CapabilityLevel {
    self.0
  }
}

impl<P: CapabilityProbe + ?Sized> CapabilityProbe for &P {
  #[inline]
  fn current_level(&self) -> CapabilityLevel {
    (**self).current_level()
  }
}

impl<P: CapabilityProbe + ?Sized> CapabilityProbe for std::sync::Arc<P> {
  #[inline]
  fn current_level(&self) -> CapabilityLevel {
    (**self).current_level()
  }
}
