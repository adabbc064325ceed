//! Resolve-once kernel dispatch.
//!
//! A numerical library ships several compiled variants of one operation, one
//! per capability level. This crate picks the best variant the running CPU
//! supports on first call and reuses that choice for every later call.
//!
//! # Core Types
//!
//! - [`KernelSlots`]: one optional kernel per [`CapabilityLevel`], `DEFAULT` mandatory
//! - [`DispatchStub`]: slots plus a cached resolution
//! - [`DispatchContext`]: the probe and override a stub resolves against
//! - [`stub_table!`]: declares a table of typed stubs for a library's operations
//!
//! # Resolution
//!
//! 1. A forced level (`KDISPATCH_CPU_CAPABILITY` or [`DispatchConfig::forced`]) wins if the
//!    stub has a kernel for it; otherwise resolution fails with
//!    [`DispatchError::UnsupportedForcedLevel`].
//! 2. Without an override, the probe's level is walked down to the highest populated slot.
//! 3. The outcome is cached. Later calls are an atomic load and an indirect call.
//!
//! # Example
//!
//! ```
//! use dispatch::{DispatchConfig, DispatchContext, DispatchStub, KernelSlots};
//! use platform::{CapabilityLevel, FixedProbe};
//!
//! fn dot_scalar(a: &[f32], b: &[f32]) -> f32 {
//!   a.iter().zip(b).map(|(x, y)| x * y).sum()
//! }
//!
//! let stub = DispatchStub::new("dot", KernelSlots::<fn(&[f32], &[f32]) -> f32>::new(dot_scalar));
//! let ctx = DispatchContext::new(FixedProbe(CapabilityLevel::Level3), DispatchConfig::AUTO);
//!
//! let dot = stub.resolve_in(&ctx);
//! assert_eq!(dot(&[1.0, 2.0], &[3.0, 4.0]), 11.0);
//! assert_eq!(stub.selected().map(|s| s.level), Some(CapabilityLevel::Default));
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

mod config;
mod context;
mod error;
mod introspect;
mod macros;
mod slots;
mod stub;

pub use config::{CPU_CAPABILITY_ENV, DispatchConfig, parse_override};
pub use context::DispatchContext;
pub use error::{DispatchError, OverrideError};
pub use introspect::{DispatchInfo, StubReport};
pub use platform::{self, CapabilityLevel, CapabilityProbe, FixedProbe, HostProbe};
pub use slots::KernelSlots;
pub use stub::{DispatchStub, Selected, Selection, StubState};
