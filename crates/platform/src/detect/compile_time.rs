// ─────────────────────────────────────────────────────────────────────────────
// Compile-Time Static Detection
// ─────────────────────────────────────────────────────────────────────────────

use crate::caps::{Caps, aarch64, powerpc64, riscv, s390x, x86};

/// Returns CPU capabilities known at compile time.
///
/// Detects features enabled via `-C target-feature=...` or `-C target-cpu=native`.
/// The result is a `const` value; the compiler folds every `cfg!` check.
///
/// # Examples
///
/// ```
/// use platform::caps_static;
///
/// const CAPS: platform::Caps = caps_static();
///
/// // On x86_64, SSE2 is always present
/// #[cfg(target_arch = "x86_64")]
/// assert!(CAPS.has(platform::caps::x86::SSE2));
/// ```
#[inline(always)]
#[must_use]
pub const fn caps_static() -> Caps {
  let mut caps = Caps::NONE;

  macro_rules! static_feature {
    ($($feature:literal => $cap:expr),* $(,)?) => {
      $(
        if cfg!(target_feature = $feature) {
          caps = caps.union($cap);
        }
      )*
    };
  }

  if cfg!(any(target_arch = "x86_64", target_arch = "x86")) {
    static_feature! {
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
  }

  if cfg!(target_arch = "aarch64") {
    static_feature! {
      "neon" => aarch64::NEON,
      "fp16" => aarch64::FP16,
      "dotprod" => aarch64::DOTPROD,
      "i8mm" => aarch64::I8MM,
      "bf16" => aarch64::BF16,
      "sve" => aarch64::SVE,
      "sve2" => aarch64::SVE2,
    }
  }

  if cfg!(target_arch = "powerpc64") {
    static_feature! {
      "altivec" => powerpc64::ALTIVEC,
      "vsx" => powerpc64::VSX,
    }
  }

  if cfg!(target_arch = "s390x") {
    static_feature! { "vector" => s390x::VECTOR }
  }

  if cfg!(target_arch = "riscv64") {
    static_feature! { "v" => riscv::V }
  }

  caps
}
