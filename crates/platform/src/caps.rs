//! CPU capability representation.
//!
//! This module answers the question: "Which instruction-set extensions can I
//! legally run on this machine?"
//!
//! # Design
//!
//! [`Caps`] is a 256-bit bitset. Each bit corresponds to one ISA extension.
//! Bits are partitioned by architecture family, but the API is uniform:
//!
//! - Bits 0-63: x86/x86_64 features
//! - Bits 64-127: aarch64 features
//! - Bits 128-191: other vector ISAs (PowerPC, s390x, RISC-V)
//!
//! Capability *levels* (the ordered ladder used by dispatch) are built on top
//! of this bitset in [`crate::ladder`].

// ─────────────────────────────────────────────────────────────────────────────
// Core Capability Type
// ─────────────────────────────────────────────────────────────────────────────

/// CPU capabilities: a 256-bit feature bitset.
///
/// `Caps` is `Copy`, `Send`, and `Sync` and can be freely shared across threads.
///
/// # Example
///
/// ```
/// use platform::caps::{Caps, x86};
///
/// let caps = x86::SSE2 | x86::AVX2;
/// assert!(caps.has(x86::AVX2));
/// assert!(!caps.has(x86::AVX512F));
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Caps(pub(crate) [u64; 4]);

impl Caps {
  /// Empty capability set (no features).
  pub const NONE: Self = Self([0; 4]);

  /// Create a capability set from raw words.
  ///
  /// Only available in this crate's tests or with the `testing` feature.
  #[cfg(any(test, feature = "testing"))]
  #[inline]
  #[must_use]
  pub const fn from_raw(words: [u64; 4]) -> Self {
    Self(words)
  }

  /// Access the raw underlying words.
  #[cfg(any(test, feature = "testing"))]
  #[inline]
  #[must_use]
  pub const fn as_raw(&self) -> &[u64; 4] {
    &self.0
  }

  /// Check if all features in `required` are present.
  #[inline(always)]
  #[must_use]
  pub const fn has(self, required: Self) -> bool {
    (self.0[0] & required.0[0]) == required.0[0]
      && (self.0[1] & required.0[1]) == required.0[1]
      && (self.0[2] & required.0[2]) == required.0[2]
      && (self.0[3] & required.0[3]) == required.0[3]
  }

  /// Union of two capability sets.
  #[inline]
  #[must_use]
  pub const fn union(self, other: Self) -> Self {
    Self([self.0[0] | other.0[0], self.0[1] | other.0[1], self.0[2] | other.0[2], self.0[3] | other.0[3]])
  }

  /// Intersection of two capability sets.
  #[inline]
  #[must_use]
  pub const fn intersection(self, other: Self) -> Self {
    Self([self.0[0] & other.0[0], self.0[1] & other.0[1], self.0[2] & other.0[2], self.0[3] & other.0[3]])
  }

  /// True if no feature bit is set.
  #[inline]
  #[must_use]
  pub const fn is_empty(self) -> bool {
    self.0[0] == 0 && self.0[1] == 0 && self.0[2] == 0 && self.0[3] == 0
  }

  /// Number of feature bits set.
  #[inline]
  #[must_use]
  pub const fn count(self) -> u32 {
    self.0[0].count_ones() + self.0[1].count_ones() + self.0[2].count_ones() + self.0[3].count_ones()
  }

  /// A set containing exactly one feature bit.
  #[inline]
  #[must_use]
  pub const fn bit(bit: u8) -> Self {
    let mut words = [0u64; 4];
    words[(bit / 64) as usize] = 1u64 << (bit % 64);
    Self(words)
  }

  /// Check a single feature bit.
  #[inline]
  #[must_use]
  pub const fn has_bit(self, bit: u8) -> bool {
    (self.0[(bit / 64) as usize] & (1u64 << (bit % 64))) != 0
  }

  /// Returns an iterator over the names of all set feature bits.
  pub fn feature_names(self) -> impl Iterator<Item = &'static str> {
    X86_FEATURES
      .iter()
      .chain(AARCH64_FEATURES.iter())
      .chain(OTHER_FEATURES.iter())
      .filter_map(move |&(bit, name)| self.has_bit(bit).then_some(name))
  }
}

impl core::ops::BitOr for Caps {
  type Output = Self;

  #[inline]
  fn bitor(self, rhs: Self) -> Self::Output {
    self.union(rhs)
  }
}

impl core::ops::BitAnd for Caps {
  type Output = Self;

  #[inline]
  fn bitand(self, rhs: Self) -> Self::Output {
    self.intersection(rhs)
  }
}

impl core::ops::BitOrAssign for Caps {
  #[inline]
  fn bitor_assign(&mut self, rhs: Self) {
    *self = self.union(rhs);
  }
}

impl core::fmt::Debug for Caps {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    write!(f, "Caps(")?;
    let mut iter = self.feature_names().peekable();
    if iter.peek().is_none() {
      return write!(f, "none)");
    }
    let mut first = true;
    for name in iter {
      if !first {
        write!(f, ", ")?;
      }
      first = false;
      f.write_str(name)?;
    }
    write!(f, ")")
  }
}

impl core::fmt::Display for Caps {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    core::fmt::Debug::fmt(self, f)
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Architecture Identification
// ─────────────────────────────────────────────────────────────────────────────

/// Target architecture enumeration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Arch {
  X86_64,
  X86,
  Aarch64,
  Riscv64,
  Powerpc64,
  S390x,
  Wasm32,
  #[default]
  Other,
}

impl Arch {
  /// Get the architecture for the current compilation target.
  #[inline]
  #[must_use]
  pub const fn current() -> Self {
    if cfg!(target_arch = "x86_64") {
      Self::X86_64
    } else if cfg!(target_arch = "x86") {
      Self::X86
    } else if cfg!(target_arch = "aarch64") {
      Self::Aarch64
    } else if cfg!(target_arch = "riscv64") {
      Self::Riscv64
    } else if cfg!(target_arch = "powerpc64") {
      Self::Powerpc64
    } else if cfg!(target_arch = "s390x") {
      Self::S390x
    } else if cfg!(target_arch = "wasm32") {
      Self::Wasm32
    } else {
      Self::Other
    }
  }

  /// Returns the human-readable name for this architecture.
  #[inline]
  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::X86_64 => "x86_64",
      Self::X86 => "x86",
      Self::Aarch64 => "aarch64",
      Self::Riscv64 => "riscv64",
      Self::Powerpc64 => "powerpc64",
      Self::S390x => "s390x",
      Self::Wasm32 => "wasm32",
      Self::Other => "other",
    }
  }
}

impl core::fmt::Display for Arch {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_str(self.name())
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// x86/x86_64 Features (bits 0-63)
// ─────────────────────────────────────────────────────────────────────────────

/// x86/x86_64 CPU features.
pub mod x86 {
  use super::Caps;

  pub const SSE2: Caps = Caps::bit(0);
  pub const SSE3: Caps = Caps::bit(1);
  pub const SSSE3: Caps = Caps::bit(2);
  pub const SSE41: Caps = Caps::bit(3);
  pub const SSE42: Caps = Caps::bit(4);
  pub const POPCNT: Caps = Caps::bit(5);

  pub const AVX: Caps = Caps::bit(6);
  pub const AVX2: Caps = Caps::bit(7);
  pub const FMA: Caps = Caps::bit(8);
  pub const F16C: Caps = Caps::bit(9);
  pub const BMI1: Caps = Caps::bit(10);
  pub const BMI2: Caps = Caps::bit(11);
  pub const LZCNT: Caps = Caps::bit(12);

  pub const AVX512F: Caps = Caps::bit(14);
  pub const AVX512VL: Caps = Caps::bit(15);
  pub const AVX512BW: Caps = Caps::bit(16);
  pub const AVX512DQ: Caps = Caps::bit(17);
  pub const AVX512CD: Caps = Caps::bit(18);
  pub const AVX512VNNI: Caps = Caps::bit(19);

  /// x86-64-v2 baseline: SSE through SSE4.2 plus POPCNT.
  pub const SSE42_READY: Caps = SSE2.union(SSE3).union(SSSE3).union(SSE41).union(SSE42).union(POPCNT);

  /// x86-64-v3: AVX2 with FMA and the BMI family.
  pub const AVX2_READY: Caps =
    SSE42_READY.union(AVX).union(AVX2).union(FMA).union(F16C).union(BMI1).union(BMI2).union(LZCNT);

  /// x86-64-v4: the AVX-512 foundation subset.
  pub const AVX512_READY: Caps =
    AVX2_READY.union(AVX512F).union(AVX512VL).union(AVX512BW).union(AVX512DQ).union(AVX512CD);
}

// ─────────────────────────────────────────────────────────────────────────────
// aarch64 Features (bits 64-127)
// ─────────────────────────────────────────────────────────────────────────────

/// aarch64 CPU features.
pub mod aarch64 {
  use super::Caps;

  pub const NEON: Caps = Caps::bit(64); // Baseline on AArch64
  pub const FP16: Caps = Caps::bit(65);
  pub const DOTPROD: Caps = Caps::bit(66);
  pub const I8MM: Caps = Caps::bit(67);
  pub const BF16: Caps = Caps::bit(68);
  pub const SVE: Caps = Caps::bit(69);
  pub const SVE2: Caps = Caps::bit(70);

  /// NEON with the int8 dot-product and half-precision extensions.
  pub const DOTPROD_READY: Caps = NEON.union(DOTPROD).union(FP16);

  /// Scalable vectors on top of [`DOTPROD_READY`].
  pub const SVE_READY: Caps = DOTPROD_READY.union(SVE);
}

// ─────────────────────────────────────────────────────────────────────────────
// Other vector ISAs (bits 128-191)
// ─────────────────────────────────────────────────────────────────────────────

/// PowerPC64 features.
pub mod powerpc64 {
  use super::Caps;

  pub const ALTIVEC: Caps = Caps::bit(128);
  pub const VSX: Caps = Caps::bit(129);

  pub const VSX_READY: Caps = ALTIVEC.union(VSX);
}

/// s390x (IBM Z) features.
pub mod s390x {
  use super::Caps;

  pub const VECTOR: Caps = Caps::bit(136);
}

/// RISC-V features.
pub mod riscv {
  use super::Caps;

  pub const V: Caps = Caps::bit(144);
}

type FeatureEntry = (u8, &'static str);

const X86_FEATURES: &[FeatureEntry] = &[
  (0, "sse2"),
  (1, "sse3"),
  (2, "ssse3"),
  (3, "sse4.1"),
  (4, "sse4.2"),
  (5, "popcnt"),
  (6, "avx"),
  (7, "avx2"),
  (8, "fma"),
  (9, "f16c"),
  (10, "bmi1"),
  (11, "bmi2"),
  (12, "lzcnt"),
  (14, "avx512f"),
  (15, "avx512vl"),
  (16, "avx512bw"),
  (17, "avx512dq"),
  (18, "avx512cd"),
  (19, "avx512vnni"),
];

const AARCH64_FEATURES: &[FeatureEntry] = &[
  (64, "neon"),
  (65, "fp16"),
  (66, "dotprod"),
  (67, "i8mm"),
  (68, "bf16"),
  (69, "sve"),
  (70, "sve2"),
];

const OTHER_FEATURES: &[FeatureEntry] = &[(128, "altivec"), (129, "vsx"), (136, "vector"), (144, "v")];

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_caps_basic() {
    let empty = Caps::NONE;
    assert!(empty.is_empty());
    assert_eq!(empty.count(), 0);

    let bit0 = Caps::bit(0);
    assert!(!bit0.is_empty());
    assert_eq!(bit0.count(), 1);
    assert!(bit0.has_bit(0));
    assert!(!bit0.has_bit(1));
  }

  #[test]
  fn test_caps_union_intersection() {
    let a = Caps::bit(0);
    let b = Caps::bit(130);
    let ab = a | b;

    assert!(ab.has(a));
    assert!(ab.has(b));
    assert_eq!(ab.count(), 2);
    assert_eq!(ab & a, a);
    assert_eq!(a & b, Caps::NONE);
  }

  #[test]
  fn test_everything_has_none() {
    assert!(Caps::NONE.has(Caps::NONE));
    assert!(x86::AVX2.has(Caps::NONE));
  }

  #[test]
  fn test_ready_masks_are_nested() {
    assert!(x86::AVX2_READY.has(x86::SSE42_READY));
    assert!(x86::AVX512_READY.has(x86::AVX2_READY));
    assert!(aarch64::SVE_READY.has(aarch64::DOTPROD_READY));
    assert!(aarch64::DOTPROD_READY.has(aarch64::NEON));
  }

  #[test]
  fn test_feature_names() {
    let caps = x86::AVX2 | aarch64::SVE | riscv::V;
    let names: Vec<_> = caps.feature_names().collect();
    assert_eq!(names, ["avx2", "sve", "v"]);
  }

  #[test]
  fn test_debug_format() {
    assert_eq!(format!("{:?}", Caps::NONE), "Caps(none)");
    assert_eq!(format!("{}", x86::SSE2 | x86::AVX), "Caps(sse2, avx)");
  }

  #[test]
  fn test_raw_roundtrip() {
    let caps = Caps::from_raw([1, 2, 3, 4]);
    assert_eq!(caps.as_raw(), &[1, 2, 3, 4]);
  }

  #[test]
  fn test_arch_current_name() {
    let arch = Arch::current();
    #[cfg(target_arch = "x86_64")]
    assert_eq!(arch, Arch::X86_64);
    #[cfg(target_arch = "aarch64")]
    assert_eq!(arch, Arch::Aarch64);
    assert_eq!(arch.to_string(), arch.name());
  }
}
