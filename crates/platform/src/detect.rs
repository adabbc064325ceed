//! Host CPU detection.
//!
//! This module provides the cached [`get()`] entry point. It handles:
//!
//! - Compile-time detection (via `cfg!(target_feature = "...")`)
//! - Runtime detection (`is_x86_feature_detected!`, `is_aarch64_feature_detected!`)
//! - Caching in a process-wide `OnceLock`
//! - User-supplied overrides for bare metal and testing
//! - Graceful degradation: when the host cannot be interrogated, only the
//!   features guaranteed at compile time are reported
//!
//! # Overrides
//!
//! ```ignore
//! // Pin the capabilities before anything calls `get()`.
//! platform::try_set_override(Some(platform::caps::x86::AVX2_READY))?;
//! ```

mod compile_time;
mod runtime;

use std::sync::{Mutex, OnceLock, PoisonError};

pub use compile_time::caps_static;

use crate::{
  caps::{Arch, Caps},
  ladder::Ladder,
  level::CapabilityLevel,
};

/// One snapshot of host capabilities.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Detected {
  /// Target architecture.
  pub arch: Arch,
  /// Available feature bits.
  pub caps: Caps,
  /// Highest capability level `caps` reaches on the current ladder.
  pub level: CapabilityLevel,
}

impl Detected {
  /// Build a snapshot from a feature set using the current target's ladder.
  #[must_use]
  pub fn from_caps(caps: Caps) -> Self {
    Self { arch: Arch::current(), caps, level: Ladder::current().level_for(caps) }
  }

  /// Snapshot for a host that could not be interrogated at all.
  #[must_use]
  pub const fn portable() -> Self {
    Self { arch: Arch::current(), caps: Caps::NONE, level: CapabilityLevel::Default }
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Cache and Override
// ─────────────────────────────────────────────────────────────────────────────

static CACHE: OnceLock<Detected> = OnceLock::new();
static OVERRIDE: Mutex<OverrideState> = Mutex::new(OverrideState::new());

/// Error returned by [`try_set_override`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum OverrideError {
  /// Detection has already been cached; the override would be ignored.
  #[error("capabilities were already detected and cached")]
  AlreadyInitialized,
  /// The override lock was poisoned by a panicking writer.
  #[error("capability override lock is poisoned")]
  Poisoned,
}

/// Override caps plus whether detection has consumed them.
///
/// Both live under one lock: once `sealed` is set the caps are frozen, so a
/// successful [`try_set_override`] is always seen by the detection that
/// seals the state.
#[derive(Debug)]
struct OverrideState {
  caps: Option<Caps>,
  sealed: bool,
}

impl OverrideState {
  const fn new() -> Self {
    Self { caps: None, sealed: false }
  }

  fn set(&mut self, value: Option<Caps>) -> Result<(), OverrideError> {
    if self.sealed {
      return Err(OverrideError::AlreadyInitialized);
    }
    self.caps = value;
    Ok(())
  }

  /// Freeze the override and return it.
  fn seal(&mut self) -> Option<Caps> {
    self.sealed = true;
    self.caps
  }
}

/// Set (or clear, with `None`) the capabilities override.
///
/// Contract: pre-init only. Once [`get()`] has started detection, this
/// returns [`OverrideError::AlreadyInitialized`].
#[cold]
pub fn try_set_override(value: Option<Caps>) -> Result<(), OverrideError> {
  if CACHE.get().is_some() {
    return Err(OverrideError::AlreadyInitialized);
  }
  OVERRIDE.lock().map_err(|_| OverrideError::Poisoned)?.set(value)
}

/// Set the capabilities override.
///
/// # Panics
///
/// Panics if detection has already been cached.
#[cold]
pub fn set_override(value: Option<Caps>) {
  if let Err(err) = try_set_override(value) {
    panic!("platform::set_override failed: {err}");
  }
}

/// Check if an override is set.
#[inline]
#[must_use]
pub fn has_override() -> bool {
  OVERRIDE.lock().map(|state| state.caps.is_some()).unwrap_or(false)
}

#[cold]
fn detect_with_override() -> Detected {
  let caps = OVERRIDE.lock().unwrap_or_else(PoisonError::into_inner).seal();
  match caps {
    Some(caps) => Detected::from_caps(caps),
    None => detect_uncached(),
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main API
// ─────────────────────────────────────────────────────────────────────────────

/// Get the detected host capabilities.
///
/// The first call interrogates the host; every later call (from any thread)
/// returns the same cached snapshot. Concurrent first calls are serialized by
/// the `OnceLock`, so all callers agree on one result.
#[inline]
#[must_use]
pub fn get() -> Detected {
  *CACHE.get_or_init(detect_with_override)
}

/// Detect capabilities without caching.
///
/// Compile-time features are always included. Runtime detection adds to them
/// when the host supports it; otherwise only the compile-time set is used,
/// which on a generic build maps to [`CapabilityLevel::Default`].
#[must_use]
pub fn detect_uncached() -> Detected {
  let static_caps = caps_static();
  match runtime::detect() {
    Some(runtime_caps) => Detected::from_caps(static_caps | runtime_caps),
    None => {
      tracing::trace!(arch = %Arch::current(), "runtime feature detection unavailable, using compile-time features");
      Detected::from_caps(static_caps)
    }
  }
}
