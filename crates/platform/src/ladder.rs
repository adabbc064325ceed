//! Per-target capability ladders.
//!
//! A [`Ladder`] maps [`CapabilityLevel`]s to the ISA extensions they require on
//! one architecture. The ladder is configuration data: each target gets its
//! own table, and callers may build custom ladders with [`Ladder::new`].
//!
//! | Arch | LEVEL1 | LEVEL2 | LEVEL3 |
//! |------|--------|--------|--------|
//! | x86_64 | `sse42` (x86-64-v2) | `avx2` (x86-64-v3) | `avx512` (x86-64-v4) |
//! | aarch64 | `neon` | `dotprod` | `sve` |
//! | powerpc64 | `vsx` | - | - |
//! | s390x | `zvector` | - | - |
//! | riscv64 | `rvv` | - | - |
//!
//! Rungs must be listed in ascending level order and each rung's `requires`
//! should be a superset of the rung below it.

use crate::{
  caps::{Arch, Caps, aarch64, powerpc64, riscv, s390x, x86},
  level::CapabilityLevel,
};

/// One rung of a ladder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rung {
  /// Level this rung establishes.
  pub level: CapabilityLevel,
  /// Architecture-specific name (e.g. `"avx2"`), accepted as an override alias.
  pub label: &'static str,
  /// Features that must all be present.
  pub requires: Caps,
}

impl Rung {
  #[inline]
  #[must_use]
  pub const fn new(level: CapabilityLevel, label: &'static str, requires: Caps) -> Self {
    Self { level, label, requires }
  }
}

/// Ordered mapping from capability levels to required features.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ladder {
  arch: Arch,
  rungs: &'static [Rung],
}

const X86_64_RUNGS: &[Rung] = &[
  Rung::new(CapabilityLevel::Level1, "sse42", x86::SSE42_READY),
  Rung::new(CapabilityLevel::Level2, "avx2", x86::AVX2_READY),
  Rung::new(CapabilityLevel::Level3, "avx512", x86::AVX512_READY),
];

const AARCH64_RUNGS: &[Rung] = &[
  Rung::new(CapabilityLevel::Level1, "neon", aarch64::NEON),
  Rung::new(CapabilityLevel::Level2, "dotprod", aarch64::DOTPROD_READY),
  Rung::new(CapabilityLevel::Level3, "sve", aarch64::SVE_READY),
];

const POWERPC64_RUNGS: &[Rung] = &[Rung::new(CapabilityLevel::Level1, "vsx", powerpc64::VSX_READY)];

const S390X_RUNGS: &[Rung] = &[Rung::new(CapabilityLevel::Level1, "zvector", s390x::VECTOR)];

const RISCV64_RUNGS: &[Rung] = &[Rung::new(CapabilityLevel::Level1, "rvv", riscv::V)];

impl Ladder {
  /// x86_64 ladder.
  pub const X86_64: Self = Self::new(Arch::X86_64, X86_64_RUNGS);
  /// aarch64 ladder.
  pub const AARCH64: Self = Self::new(Arch::Aarch64, AARCH64_RUNGS);
  /// PowerPC64 ladder.
  pub const POWERPC64: Self = Self::new(Arch::Powerpc64, POWERPC64_RUNGS);
  /// s390x ladder.
  pub const S390X: Self = Self::new(Arch::S390x, S390X_RUNGS);
  /// RISC-V 64 ladder.
  pub const RISCV64: Self = Self::new(Arch::Riscv64, RISCV64_RUNGS);

  /// Build a custom ladder. `rungs` must be in ascending level order.
  #[inline]
  #[must_use]
  pub const fn new(arch: Arch, rungs: &'static [Rung]) -> Self {
    Self { arch, rungs }
  }

  /// A ladder with only the `Default` floor.
  #[inline]
  #[must_use]
  pub const fn baseline(arch: Arch) -> Self {
    Self { arch, rungs: &[] }
  }

  /// Ladder for the compilation target.
  #[must_use]
  pub const fn current() -> Self {
    match Arch::current() {
      Arch::X86_64 => Self::X86_64,
      Arch::Aarch64 => Self::AARCH64,
      Arch::Powerpc64 => Self::POWERPC64,
      Arch::S390x => Self::S390X,
      Arch::Riscv64 => Self::RISCV64,
      other => Self::baseline(other),
    }
  }

  #[inline]
  #[must_use]
  pub const fn arch(&self) -> Arch {
    self.arch
  }

  #[inline]
  #[must_use]
  pub const fn rungs(&self) -> &'static [Rung] {
    self.rungs
  }

  /// Highest level this ladder can reach.
  #[must_use]
  pub fn top(&self) -> CapabilityLevel {
    self.rungs.last().map_or(CapabilityLevel::Default, |rung| rung.level)
  }

  /// Highest level whose requirements `caps` satisfies.
  ///
  /// Climbing stops at the first unsatisfied rung, so a gap in the feature
  /// set never lets a higher rung win over a missing lower one.
  #[must_use]
  pub fn level_for(&self, caps: Caps) -> CapabilityLevel {
    self
      .rungs
      .iter()
      .take_while(|rung| caps.has(rung.requires))
      .last()
      .map_or(CapabilityLevel::Default, |rung| rung.level)
  }

  /// Architecture label for `level`, or the canonical level name when the
  /// ladder has no rung for it.
  #[must_use]
  pub fn label(&self, level: CapabilityLevel) -> &'static str {
    match level {
      CapabilityLevel::Default => "default",
      _ => self.rung(level).map_or(level.name(), |rung| rung.label),
    }
  }

  /// Rung establishing `level`, if any.
  #[must_use]
  pub fn rung(&self, level: CapabilityLevel) -> Option<&'static Rung> {
    self.rungs.iter().find(|rung| rung.level == level)
  }

  /// Resolve an architecture label (case-insensitive) to its level.
  #[must_use]
  pub fn level_for_label(&self, label: &str) -> Option<CapabilityLevel> {
    let label = label.trim();
    if label.eq_ignore_ascii_case("default") {
      return Some(CapabilityLevel::Default);
    }
    self.rungs.iter().find(|rung| rung.label.eq_ignore_ascii_case(label)).map(|rung| rung.level)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn x86_levels() {
    let ladder = Ladder::X86_64;
    assert_eq!(ladder.level_for(Caps::NONE), CapabilityLevel::Default);
    assert_eq!(ladder.level_for(x86::SSE2), CapabilityLevel::Default);
    assert_eq!(ladder.level_for(x86::SSE42_READY), CapabilityLevel::Level1);
    assert_eq!(ladder.level_for(x86::AVX2_READY), CapabilityLevel::Level2);
    assert_eq!(ladder.level_for(x86::AVX512_READY | x86::AVX512VNNI), CapabilityLevel::Level3);
  }

  #[test]
  fn gap_stops_climb() {
    // AVX-512 bits without the AVX2 rung must not reach Level3.
    let caps = x86::SSE42_READY | x86::AVX512F | x86::AVX512VL | x86::AVX512BW | x86::AVX512DQ | x86::AVX512CD;
    assert_eq!(Ladder::X86_64.level_for(caps), CapabilityLevel::Level1);
  }

  #[test]
  fn aarch64_levels() {
    let ladder = Ladder::AARCH64;
    assert_eq!(ladder.level_for(aarch64::NEON), CapabilityLevel::Level1);
    assert_eq!(ladder.level_for(aarch64::DOTPROD_READY), CapabilityLevel::Level2);
    assert_eq!(ladder.level_for(aarch64::SVE_READY), CapabilityLevel::Level3);
    assert_eq!(ladder.top(), CapabilityLevel::Level3);
  }

  #[test]
  fn baseline_ladder_is_default_only() {
    let ladder = Ladder::baseline(Arch::Other);
    assert_eq!(ladder.top(), CapabilityLevel::Default);
    assert_eq!(ladder.level_for(x86::AVX512_READY), CapabilityLevel::Default);
    assert_eq!(ladder.label(CapabilityLevel::Level2), "LEVEL2");
  }

  #[test]
  fn labels() {
    assert_eq!(Ladder::X86_64.label(CapabilityLevel::Default), "default");
    assert_eq!(Ladder::X86_64.label(CapabilityLevel::Level2), "avx2");
    assert_eq!(Ladder::X86_64.level_for_label("AVX512"), Some(CapabilityLevel::Level3));
    assert_eq!(Ladder::AARCH64.level_for_label("Sve"), Some(CapabilityLevel::Level3));
    assert_eq!(Ladder::S390X.level_for_label("zvector"), Some(CapabilityLevel::Level1));
    assert_eq!(Ladder::X86_64.level_for_label("neon"), None);
  }

  #[test]
  fn builtin_rungs_are_ascending_and_nested() {
    for ladder in [Ladder::X86_64, Ladder::AARCH64, Ladder::POWERPC64, Ladder::S390X, Ladder::RISCV64] {
      for pair in ladder.rungs().windows(2) {
        assert!(pair[0].level < pair[1].level, "{:?}", ladder.arch());
        assert!(pair[1].requires.has(pair[0].requires), "{:?}", ladder.arch());
      }
    }
  }

  #[test]
  fn current_matches_arch() {
    assert_eq!(Ladder::current().arch(), Arch::current());
  }
}
