//! Dispatch introspection.
//!
//! Snapshots of what a stub or table has selected, for logs and diagnostics.
//! Producing a report never resolves anything.
//!
//! ```
//! use dispatch::DispatchInfo;
//!
//! let info = DispatchInfo::current();
//! println!("{info}");
//! ```

use core::fmt;

use platform::{CapabilityLevel, Description, Ladder};

use crate::{
  config::DispatchConfig,
  context::DispatchContext,
  error::DispatchError,
  stub::{Selection, StubState},
};

/// State of one stub.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StubReport {
  pub name: &'static str,
  pub state: StubState,
  /// Levels with a compiled kernel, ascending.
  pub populated: Vec<CapabilityLevel>,
  /// Winning level, if resolution succeeded.
  pub selected: Option<(CapabilityLevel, Selection)>,
  /// Configuration error, if resolution failed.
  pub error: Option<DispatchError>,
}

impl StubReport {
  /// Architecture label of the selected level on this target.
  #[must_use]
  pub fn label(&self) -> Option<&'static str> {
    self.selected.map(|(level, _)| Ladder::current().label(level))
  }
}

impl fmt::Display for StubReport {
  /// `addr: LEVEL2 (avx2, probed) [DEFAULT, LEVEL2]`
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: ", self.name)?;
    match (self.selected, self.error) {
      (Some((level, selection)), _) => {
        write!(f, "{level} ({}, {selection})", Ladder::current().label(level))?;
      }
      (None, Some(err)) => write!(f, "error ({err})")?,
      (None, None) => f.write_str("unresolved")?,
    }
    f.write_str(" [")?;
    for (i, level) in self.populated.iter().enumerate() {
      if i > 0 {
        f.write_str(", ")?;
      }
      write!(f, "{level}")?;
    }
    f.write_str("]")
  }
}

/// Platform detection plus the override a context resolves with.
#[derive(Clone, Copy, Debug)]
pub struct DispatchInfo {
  pub platform: Description,
  /// Level the context's probe reports.
  pub probed: CapabilityLevel,
  pub config: DispatchConfig,
}

impl DispatchInfo {
  /// Info for the process-wide context.
  #[must_use]
  pub fn current() -> Self {
    Self::for_context(DispatchContext::global())
  }

  /// Info for `ctx`. Queries its probe.
  #[must_use]
  pub fn for_context(ctx: &DispatchContext) -> Self {
    Self { platform: platform::describe(), probed: ctx.probe().current_level(), config: *ctx.config() }
  }
}

impl fmt::Display for DispatchInfo {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}; probe={}", self.platform, self.probed)?;
    match self.config.forced_level {
      Some(level) => write!(f, "; forced={level}"),
      None => f.write_str("; forced=none"),
    }
  }
}

#[cfg(test)]
mod tests {
  use platform::FixedProbe;

  use super::*;
  use crate::{slots::KernelSlots, stub::DispatchStub};

  type KernelFn = fn() -> u8;

  fn f0() -> u8 {
    0
  }
  fn f2() -> u8 {
    2
  }

  fn stub() -> DispatchStub<KernelFn> {
    DispatchStub::new("addr", KernelSlots::new(f0 as KernelFn).with(CapabilityLevel::Level2, f2))
  }

  #[test]
  fn unresolved_report() {
    let report = stub().report();
    assert_eq!(report.state, StubState::Unresolved);
    assert_eq!(report.label(), None);
    assert_eq!(report.to_string(), "addr: unresolved [DEFAULT, LEVEL2]");
  }

  #[test]
  fn resolved_report() {
    let stub = stub();
    let ctx = DispatchContext::new(FixedProbe(CapabilityLevel::Level1), DispatchConfig::AUTO);
    let _ = stub.resolve_in(&ctx);
    let report = stub.report();
    assert_eq!(report.state, StubState::Resolved);
    assert_eq!(report.selected, Some((CapabilityLevel::Default, Selection::Probed)));
    assert_eq!(report.label(), Some("default"));
    assert_eq!(report.to_string(), "addr: DEFAULT (default, probed) [DEFAULT, LEVEL2]");
  }

  #[test]
  fn error_report() {
    let stub = stub();
    let ctx = DispatchContext::new(FixedProbe(CapabilityLevel::Level3), DispatchConfig::forced(CapabilityLevel::Level3));
    assert!(stub.try_resolve_in(&ctx).is_err());
    let report = stub.report();
    assert_eq!(report.state, StubState::Resolved);
    assert_eq!(
      report.to_string(),
      "addr: error (stub `addr`: forced capability level LEVEL3 has no compiled kernel) [DEFAULT, LEVEL2]"
    );
  }

  #[test]
  fn info_reflects_context() {
    let ctx = DispatchContext::new(FixedProbe(CapabilityLevel::Level2), DispatchConfig::forced(CapabilityLevel::Level1));
    let info = DispatchInfo::for_context(&ctx);
    assert_eq!(info.probed, CapabilityLevel::Level2);
    assert!(info.to_string().ends_with("; probe=LEVEL2; forced=LEVEL1"));
  }
}
