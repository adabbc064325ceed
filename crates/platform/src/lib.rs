//! CPU capability detection for runtime kernel dispatch.
//!
//! This crate is the **single source of truth** for "what can this machine
//! run?" across the kdispatch workspace.
//!
//! # Core Types
//!
//! - [`Caps`]: which ISA extensions are available (a feature bitset)
//! - [`CapabilityLevel`]: the ordered dispatch ladder (`DEFAULT < LEVEL1 < LEVEL2 < LEVEL3`)
//! - [`Ladder`]: per-target mapping from levels to required features
//! - [`CapabilityProbe`]: the injectable query used by dispatchers
//!
//! # Main Entry Point
//!
//! ```
//! use platform::CapabilityLevel;
//!
//! let level = platform::current_level();
//! assert!(level >= CapabilityLevel::Default);
//! ```
//!
//! # Design Philosophy
//!
//! 1. **One API**: dispatchers query a [`CapabilityProbe`] instead of doing ad-hoc detection.
//! 2. **Levels vs features**: `Caps` says which instructions exist; `CapabilityLevel` says which
//!    compiled kernel variant may run.
//! 3. **Cached**: host detection runs once per process, behind a `OnceLock`.
//! 4. **Never fails**: a host that cannot be interrogated reports `Default`.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod caps;
mod describe;
mod detect;
pub mod ladder;
pub mod level;
pub mod probe;

pub use caps::{Arch, Caps};
pub use describe::Description;
pub use detect::{Detected, OverrideError, caps_static, detect_uncached, has_override, set_override, try_set_override};
pub use ladder::{Ladder, Rung};
pub use level::{CapabilityLevel, ParseLevelError};
pub use probe::{CapabilityProbe, FixedProbe, HostProbe};

/// Get the detected host capabilities (cached).
#[inline]
#[must_use]
pub fn get() -> Detected {
  detect::get()
}

/// Get just the detected feature set.
#[inline]
#[must_use]
pub fn caps() -> Caps {
  detect::get().caps
}

/// Get the highest capability level the host supports.
///
/// This is the query behind [`HostProbe`].
#[inline]
#[must_use]
pub fn current_level() -> CapabilityLevel {
  detect::get().level
}

/// Describe the detected platform for logs and diagnostics.
#[must_use]
pub fn describe() -> Description {
  Description::new(detect::get(), Ladder::current(), has_override())
}
