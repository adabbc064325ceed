//! Dispatch error types.
//!
//! Every error here is a permanent build or configuration defect. Nothing is
//! retried; hardware that lacks a capability is not an error at all.

use platform::CapabilityLevel;

/// Configuration or registration defect detected by a dispatch stub.
///
/// `Copy` so a stub can cache the outcome of its one resolution and hand the
/// same error to every later caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum DispatchError {
  /// The override forced a level for which no variant was compiled.
  #[error("stub `{stub}`: forced capability level {level} has no compiled kernel")]
  UnsupportedForcedLevel { stub: &'static str, level: CapabilityLevel },

  /// A registration list did not supply the mandatory `DEFAULT` kernel.
  #[error("stub `{stub}`: no DEFAULT kernel registered")]
  MissingDefault { stub: &'static str },

  /// A registration list supplied two kernels for one level.
  #[error("stub `{stub}`: capability level {level} registered twice")]
  DuplicateSlot { stub: &'static str, level: CapabilityLevel },
}

impl DispatchError {
  /// Name of the stub that reported the error.
  #[must_use]
  pub const fn stub(&self) -> &'static str {
    match *self {
      Self::UnsupportedForcedLevel { stub, .. } | Self::MissingDefault { stub } | Self::DuplicateSlot { stub, .. } => {
        stub
      }
    }
  }
}

/// The override value did not name a capability level.
///
/// Not fatal: the stub falls back to probe-based selection and the
/// misconfiguration is reported once.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized capability override `{value}` (expected one of: {expected})")]
pub struct OverrideError {
  /// Offending value, trimmed.
  pub value: String,
  /// Accepted spellings for the current target, comma separated.
  pub expected: String,
}
