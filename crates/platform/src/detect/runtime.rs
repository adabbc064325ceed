//! Runtime feature detection.
//!
//! Returns `None` when the host cannot be interrogated (unsupported target,
//! Miri). Callers fall back to the compile-time feature set.

use crate::caps::Caps;

#[cfg(all(any(target_arch = "x86_64", target_arch = "x86"), not(miri)))]
pub(super) fn detect() -> Option<Caps> {
  use crate::caps::x86;

  let mut caps = Caps::NONE;

  macro_rules! runtime_feature {
    ($($feature:tt => $cap:expr),* $(,)?) => {
      $(
        if std::arch::is_x86_feature_detected!($feature) {
          caps |= $cap;
        }
      )*
    };
  }

  runtime_feature! {
    "sse2" => x86::SSE2,
    "sse3" => x86::SSE3,
    "ssse3" => x86::SSSE3,
    "sse4.1" => x86::SSE41,
    "sse4.2" => x86::SSE42,
    "popcnt" => x86::POPCNT,
    "avx" => x86::AVX,
    "avx2" => x86::AVX2,
    "fma" => x86::FMA,
    "f16c" => x86::F16C,
    "bmi1" => x86::BMI1,
    "bmi2" => x86::BMI2,
    "lzcnt" => x86::LZCNT,
    "avx512f" => x86::AVX512F,
    "avx512vl" => x86::AVX512VL,
    "avx512bw" => x86::AVX512BW,
    "avx512dq" => x86::AVX512DQ,
    "avx512cd" => x86::AVX512CD,
    "avx512vnni" => x86::AVX512VNNI,
  }

  Some(caps)
}

#[cfg(all(target_arch = "aarch64", not(miri)))]
pub(super) fn detect() -> Option<Caps> {
  use crate::caps::aarch64;

  let mut caps = Caps::NONE;

  macro_rules! runtime_feature {
    ($($feature:tt => $cap:expr),* $(,)?) => {
      $(
        if std::arch::is_aarch64_feature_detected!($feature) {
          caps |= $cap;
        }
      )*
    };
  }

  runtime_feature! {
    "neon" => aarch64::NEON,
    "fp16" => aarch64::FP16,
    "dotprod" => aarch64::DOTPROD,
    "i8mm" => aarch64::I8MM,
    "bf16" => aarch64::BF16,
    "sve" => aarch64::SVE,
    "sve2" => aarch64::SVE2,
  }

  Some(caps)
}

// PowerPC, s390x and RISC-V runtime detection macros are not stable yet;
// those targets rely on compile-time features only.
#[cfg(any(miri, not(any(target_arch = "x86_64", target_arch = "x86", target_arch = "aarch64"))))]
pub(super) fn detect() -> Option<Caps> {
  None
}
