//! Per-level kernel slots.
//!
//! A [`KernelSlots`] holds at most one kernel per [`CapabilityLevel`]. The
//! `DEFAULT` slot is populated by construction; every other slot is optional
//! ("no variant compiled for this level on this build"). Slots are immutable
//! once handed to a stub.

use core::fmt;

use platform::CapabilityLevel;

use crate::error::DispatchError;

/// Kernel pointers indexed by capability level.
///
/// # Example
///
/// ```
/// use dispatch::KernelSlots;
/// use platform::CapabilityLevel;
///
/// fn scalar(x: u32) -> u32 { x }
/// fn wide(x: u32) -> u32 { x }
///
/// let slots = KernelSlots::<fn(u32) -> u32>::new(scalar).with(CapabilityLevel::Level2, wide);
/// assert!(slots.is_populated(CapabilityLevel::Level2));
/// assert!(!slots.is_populated(CapabilityLevel::Level3));
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct KernelSlots<F> {
  slots: [Option<F>; CapabilityLevel::COUNT],
}

impl<F: Copy> KernelSlots<F> {
  /// Slots with only the mandatory `DEFAULT` kernel.
  #[inline]
  #[must_use]
  pub const fn new(default: F) -> Self {
    Self { slots: [Some(default), None, None, None] }
  }

  /// Populate `level` with `kernel`, replacing any previous kernel there.
  #[inline]
  #[must_use]
  pub fn with(mut self, level: CapabilityLevel, kernel: F) -> Self {
    self.slots[level.index()] = Some(kernel);
    self
  }

  /// Build slots from a registration list.
  ///
  /// The list must contain exactly one `DEFAULT` entry and at most one entry
  /// per level; anything else is a build defect.
  pub fn try_from_entries(stub: &'static str, entries: &[(CapabilityLevel, F)]) -> Result<Self, DispatchError> {
    let mut slots = [None; CapabilityLevel::COUNT];
    for &(level, kernel) in entries {
      let slot = &mut slots[level.index()];
      if slot.is_some() {
        return Err(DispatchError::DuplicateSlot { stub, level });
      }
      *slot = Some(kernel);
    }
    if slots[CapabilityLevel::Default.index()].is_none() {
      return Err(DispatchError::MissingDefault { stub });
    }
    Ok(Self { slots })
  }

  /// Kernel registered for exactly `level`.
  #[inline]
  #[must_use]
  pub fn get(&self, level: CapabilityLevel) -> Option<F> {
    self.slots[level.index()]
  }

  /// The mandatory `DEFAULT` kernel.
  #[inline]
  #[must_use]
  pub fn default_kernel(&self) -> F {
    match self.slots[CapabilityLevel::Default.index()] {
      Some(kernel) => kernel,
      None => unreachable!("DEFAULT slot is populated by construction"),
    }
  }

  #[inline]
  #[must_use]
  pub fn is_populated(&self, level: CapabilityLevel) -> bool {
    self.slots[level.index()].is_some()
  }

  /// Populated levels in ascending order (always starts with `DEFAULT`).
  pub fn populated_levels(&self) -> impl Iterator<Item = CapabilityLevel> + '_ {
    CapabilityLevel::ALL.into_iter().filter(|&level| self.is_populated(level))
  }

  /// Highest populated level at or below `level`, with its kernel.
  ///
  /// Never fails: the walk ends at the `DEFAULT` slot.
  #[must_use]
  pub fn floor_at(&self, level: CapabilityLevel) -> (CapabilityLevel, F) {
    level
      .descending()
      .find_map(|candidate| self.get(candidate).map(|kernel| (candidate, kernel)))
      .unwrap_or_else(|| (CapabilityLevel::Default, self.default_kernel()))
  }
}

impl<F> fmt::Debug for KernelSlots<F> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut list = f.debug_list();
    for (level, slot) in CapabilityLevel::ALL.iter().zip(&self.slots) {
      if slot.is_some() {
        list.entry(level);
      }
    }
    list.finish()
  }
}
