//! Ordered capability levels.
//!
//! A [`CapabilityLevel`] is a rung on the dispatch ladder. Levels are totally
//! ordered and monotonic: on one architecture family a higher level can run
//! everything a lower one can. `Default` is the floor and is always available.
//!
//! The meaning of each rung (which ISA extensions it implies) is per-target
//! configuration data, see [`crate::ladder`].

use core::{fmt, str::FromStr};

/// Capability level, ordered from least to most capable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum CapabilityLevel {
  /// Baseline code that runs on every CPU of the target.
  #[default]
  Default = 0,
  /// First vector rung (e.g. SSE4.2 on x86_64, NEON on aarch64).
  Level1 = 1,
  /// Second vector rung (e.g. AVX2 on x86_64).
  Level2 = 2,
  /// Third vector rung (e.g. AVX-512 on x86_64).
  Level3 = 3,
}

impl CapabilityLevel {
  /// Number of levels.
  pub const COUNT: usize = 4;

  /// All levels in ascending order.
  pub const ALL: [Self; Self::COUNT] = [Self::Default, Self::Level1, Self::Level2, Self::Level3];

  /// Highest level.
  pub const MAX: Self = Self::Level3;

  /// Position in [`ALL`](Self::ALL).
  #[inline]
  #[must_use]
  pub const fn index(self) -> usize {
    self as usize
  }

  /// Inverse of [`index`](Self::index).
  #[inline]
  #[must_use]
  pub const fn from_index(index: usize) -> Option<Self> {
    match index {
      0 => Some(Self::Default),
      1 => Some(Self::Level1),
      2 => Some(Self::Level2),
      3 => Some(Self::Level3),
      _ => None,
    }
  }

  /// Canonical name, as accepted in overrides.
  #[inline]
  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::Default => "DEFAULT",
      Self::Level1 => "LEVEL1",
      Self::Level2 => "LEVEL2",
      Self::Level3 => "LEVEL3",
    }
  }

  /// The next lower level, or `None` at the floor.
  #[inline]
  #[must_use]
  pub const fn below(self) -> Option<Self> {
    match self {
      Self::Default => None,
      Self::Level1 => Some(Self::Default),
      Self::Level2 => Some(Self::Level1),
      Self::Level3 => Some(Self::Level2),
    }
  }

  /// Iterate from `self` down to `Default`, inclusive.
  pub fn descending(self) -> impl Iterator<Item = Self> {
    core::iter::successors(Some(self), |level| level.below())
  }
}

impl fmt::Display for CapabilityLevel {
  #[inline]
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// A string did not name a [`CapabilityLevel`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown capability level `{0}` (expected one of DEFAULT, LEVEL1, LEVEL2, LEVEL3)")]
pub struct ParseLevelError(pub String);

impl FromStr for CapabilityLevel {
  type Err = ParseLevelError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let value = s.trim();
    Self::ALL
      .into_iter()
      .find(|level| value.eq_ignore_ascii_case(level.name()))
      .ok_or_else(|| ParseLevelError(value.to_owned()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn level_ordering() {
    assert!(CapabilityLevel::Default < CapabilityLevel::Level1);
    assert!(CapabilityLevel::Level1 < CapabilityLevel::Level2);
    assert!(CapabilityLevel::Level2 < CapabilityLevel::Level3);
    assert_eq!(CapabilityLevel::MAX, *CapabilityLevel::ALL.last().unwrap());
  }

  #[test]
  fn index_roundtrip() {
    for level in CapabilityLevel::ALL {
      assert_eq!(CapabilityLevel::from_index(level.index()), Some(level));
    }
    assert_eq!(CapabilityLevel::from_index(CapabilityLevel::COUNT), None);
  }

  #[test]
  fn descending_walk() {
    let walk: Vec<_> = CapabilityLevel::Level2.descending().collect();
    assert_eq!(walk, [CapabilityLevel::Level2, CapabilityLevel::Level1, CapabilityLevel::Default]);
    assert_eq!(CapabilityLevel::Default.descending().count(), 1);
  }

  #[test]
  fn parse_names() {
    assert_eq!("DEFAULT".parse(), Ok(CapabilityLevel::Default));
    assert_eq!(" level3 ".parse(), Ok(CapabilityLevel::Level3));
    assert_eq!("Level2".parse(), Ok(CapabilityLevel::Level2));
    assert_eq!("LEVEL4".parse::<CapabilityLevel>(), Err(ParseLevelError("LEVEL4".into())));
  }

  #[test]
  fn default_is_floor() {
    assert_eq!(CapabilityLevel::default(), CapabilityLevel::Default);
    assert_eq!(CapabilityLevel::Default.below(), None);
  }
}
