//! Resolve-once dispatch stubs.
//!
//! A [`DispatchStub`] owns the kernel slots of one operation and picks exactly
//! one of them the first time it is resolved:
//!
//! 1. A forced level (from the context's configuration) wins if its slot is
//!    populated. An empty forced slot is a configuration error; the stub never
//!    degrades silently in that case.
//! 2. Otherwise the probe is queried and the stub walks down from the probed
//!    level to the highest populated slot, with `DEFAULT` as the floor.
//! 3. The outcome, success or error, is cached for the life of the stub.
//!
//! The outcome lives in a [`OnceLock`]: one caller runs the algorithm while
//! concurrent callers block, and a panicking resolution leaves the stub
//! unresolved. After resolution every call is one atomic load plus a copy of
//! the cached function pointer.

use core::fmt;
use std::sync::OnceLock;

use platform::{CapabilityLevel, Ladder};

use crate::{context::DispatchContext, error::DispatchError, introspect::StubReport, slots::KernelSlots};

// ─────────────────────────────────────────────────────────────────────────────
// Selection
// ─────────────────────────────────────────────────────────────────────────────

/// Why a level won resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Selection {
  /// Highest populated level at or below the probed level.
  Probed,
  /// Named by the configuration override.
  Forced,
}

impl Selection {
  #[inline]
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Probed => "probed",
      Self::Forced => "forced",
    }
  }
}

impl fmt::Display for Selection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// The winning kernel of a resolution, tagged with its level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selected<F> {
  pub level: CapabilityLevel,
  pub selection: Selection,
  pub func: F,
}

/// Lifecycle of a stub. `Resolved` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StubState {
  Unresolved,
  Resolved,
}

/// Run the resolution algorithm once, without caching.
fn select<F: Copy>(
  stub: &'static str,
  slots: &KernelSlots<F>,
  ctx: &DispatchContext,
) -> Result<Selected<F>, DispatchError> {
  let selected = match ctx.config().forced_level {
    Some(level) => {
      let Some(func) = slots.get(level) else {
        tracing::error!(
          target: "dispatch",
          stub,
          level = %level,
          populated = ?slots,
          "forced capability level has no compiled kernel"
        );
        return Err(DispatchError::UnsupportedForcedLevel { stub, level });
      };
      Selected { level, selection: Selection::Forced, func }
    }
    None => {
      let probed = ctx.probe().current_level();
      let (level, func) = slots.floor_at(probed);
      if level < probed {
        tracing::trace!(target: "dispatch", stub, probed = %probed, level = %level, "no kernel at probed level");
      }
      Selected { level, selection: Selection::Probed, func }
    }
  };

  tracing::debug!(
    target: "dispatch",
    stub,
    level = %selected.level,
    label = Ladder::current().label(selected.level),
    selection = %selected.selection,
    "resolved dispatch stub"
  );
  Ok(selected)
}

// ─────────────────────────────────────────────────────────────────────────────
// DispatchStub
// ─────────────────────────────────────────────────────────────────────────────

/// One operation's kernel slots plus its cached resolution.
///
/// The first context a stub is resolved against decides its outcome for the
/// stub's lifetime; later calls return the cached result whatever context
/// they pass. Build a fresh stub to resolve under a different configuration.
///
/// # Example
///
/// ```
/// use dispatch::{DispatchConfig, DispatchContext, DispatchStub, KernelSlots, Selection};
/// use platform::{CapabilityLevel, FixedProbe};
///
/// fn scalar(x: u32) -> u32 { x + 1 }
/// fn wide(x: u32) -> u32 { x + 1 }
///
/// let stub = DispatchStub::new("inc", KernelSlots::<fn(u32) -> u32>::new(scalar).with(CapabilityLevel::Level2, wide));
/// let ctx = DispatchContext::new(FixedProbe(CapabilityLevel::Level3), DispatchConfig::AUTO);
///
/// let selected = stub.try_resolve_in(&ctx).unwrap();
/// assert_eq!(selected.level, CapabilityLevel::Level2);
/// assert_eq!(selected.selection, Selection::Probed);
/// assert_eq!((stub.resolve_in(&ctx))(41), 42);
/// ```
pub struct DispatchStub<F> {
  name: &'static str,
  slots: KernelSlots<F>,
  resolved: OnceLock<Result<Selected<F>, DispatchError>>,
}

impl<F: Copy> DispatchStub<F> {
  #[must_use]
  pub const fn new(name: &'static str, slots: KernelSlots<F>) -> Self {
    Self { name, slots, resolved: OnceLock::new() }
  }

  #[inline]
  #[must_use]
  pub const fn name(&self) -> &'static str {
    self.name
  }

  #[inline]
  #[must_use]
  pub const fn slots(&self) -> &KernelSlots<F> {
    &self.slots
  }

  #[inline]
  #[must_use]
  pub fn state(&self) -> StubState {
    if self.is_resolved() { StubState::Resolved } else { StubState::Unresolved }
  }

  #[inline]
  #[must_use]
  pub fn is_resolved(&self) -> bool {
    self.resolved.get().is_some()
  }

  /// Resolve against `ctx` (first call only) and return the cached outcome.
  ///
  /// # Errors
  ///
  /// [`DispatchError::UnsupportedForcedLevel`] when the configuration forces
  /// a level this stub has no kernel for. The same error is returned on every
  /// later call.
  #[inline]
  pub fn try_resolve_in(&self, ctx: &DispatchContext) -> Result<Selected<F>, DispatchError> {
    *self.resolved.get_or_init(|| select(self.name, &self.slots, ctx))
  }

  /// Resolve against `ctx` and return the selected kernel.
  ///
  /// # Panics
  ///
  /// Panics with the configuration error if the forced level has no kernel.
  /// A broken build must not silently run a weaker variant.
  #[inline]
  #[track_caller]
  #[must_use]
  pub fn resolve_in(&self, ctx: &DispatchContext) -> F {
    match self.try_resolve_in(ctx) {
      Ok(selected) => selected.func,
      Err(err) => panic!("{err}"),
    }
  }

  /// [`try_resolve_in`](Self::try_resolve_in) against [`DispatchContext::global`].
  ///
  /// # Errors
  ///
  /// See [`try_resolve_in`](Self::try_resolve_in).
  #[inline]
  pub fn try_resolve(&self) -> Result<Selected<F>, DispatchError> {
    self.try_resolve_in(DispatchContext::global())
  }

  /// [`resolve_in`](Self::resolve_in) against [`DispatchContext::global`].
  ///
  /// # Panics
  ///
  /// See [`resolve_in`](Self::resolve_in).
  #[inline]
  #[track_caller]
  #[must_use]
  pub fn resolve(&self) -> F {
    self.resolve_in(DispatchContext::global())
  }

  /// The cached selection, without resolving.
  #[must_use]
  pub fn selected(&self) -> Option<Selected<F>> {
    self.resolved.get().and_then(|outcome| outcome.as_ref().ok().copied())
  }

  /// Snapshot for diagnostics. Never triggers resolution.
  #[must_use]
  pub fn report(&self) -> StubReport {
    let (selected, error) = match self.resolved.get() {
      None => (None, None),
      Some(Ok(selected)) => (Some((selected.level, selected.selection)), None),
      Some(Err(err)) => (None, Some(*err)),
    };
    StubReport {
      name: self.name,
      state: self.state(),
      populated: self.slots.populated_levels().collect(),
      selected,
      error,
    }
  }
}

impl<F> fmt::Debug for DispatchStub<F> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("DispatchStub")
      .field("name", &self.name)
      .field("slots", &self.slots)
      .field("resolved", &self.resolved.get().is_some())
      .finish()
  }
}
