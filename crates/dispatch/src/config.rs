//! Dispatch configuration.
//!
//! # Environment Variables
//!
//! - `KDISPATCH_CPU_CAPABILITY`: force a capability level for every stub
//!   resolved against the process context.
//!   - Level names: `DEFAULT`, `LEVEL1`, `LEVEL2`, `LEVEL3`
//!   - Architecture labels of the current target, e.g. `sse42`, `avx2`,
//!     `avx512` on x86_64 or `neon`, `dotprod`, `sve` on aarch64
//!   - Matching is case-insensitive and ignores surrounding whitespace
//!   - Empty or unset: no override
//!
//! The variable is read once per process. An unrecognized value is reported
//! once and ignored; a recognized level that a stub has no kernel for is a
//! configuration error raised by that stub.

use std::sync::OnceLock;

use platform::{CapabilityLevel, Ladder};

use crate::error::OverrideError;

/// Environment variable naming a forced capability level.
pub const CPU_CAPABILITY_ENV: &str = "KDISPATCH_CPU_CAPABILITY";

/// Resolution configuration shared by every stub of a context.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DispatchConfig {
  /// Level every stub must select, bypassing the probe.
  pub forced_level: Option<CapabilityLevel>,
}

impl DispatchConfig {
  /// Probe-based selection, no override.
  pub const AUTO: Self = Self { forced_level: None };

  /// Force `level` for every stub.
  #[inline]
  #[must_use]
  pub const fn forced(level: CapabilityLevel) -> Self {
    Self { forced_level: Some(level) }
  }

  #[inline]
  #[must_use]
  pub const fn is_forced(&self) -> bool {
    self.forced_level.is_some()
  }

  /// Process configuration from the environment (cached).
  #[must_use]
  pub fn from_env() -> Self {
    static CACHED: OnceLock<DispatchConfig> = OnceLock::new();
    *CACHED.get_or_init(Self::read_env)
  }

  /// Read the environment without caching.
  ///
  /// Tests use this to observe variable changes; production code should go
  /// through [`DispatchConfig::from_env`].
  #[must_use]
  pub fn read_env() -> Self {
    let value = std::env::var(CPU_CAPABILITY_ENV).ok();
    Self::from_override_value(value.as_deref())
  }

  /// Build a configuration from a raw override value.
  ///
  /// Unrecognized values are logged and treated as "no override".
  #[must_use]
  pub fn from_override_value(value: Option<&str>) -> Self {
    let Some(raw) = value else {
      return Self::AUTO;
    };
    match parse_override(raw, &Ladder::current()) {
      Ok(forced_level) => Self { forced_level },
      Err(err) => {
        tracing::warn!(
          target: "dispatch::config",
          variable = CPU_CAPABILITY_ENV,
          error = %err,
          "ignoring capability override; falling back to hardware probing"
        );
        Self::AUTO
      }
    }
  }
}

/// Parse an override value against `ladder`.
///
/// Returns `Ok(None)` for an empty value, `Ok(Some(level))` for a level name
/// or one of the ladder's architecture labels.
///
/// # Errors
///
/// Returns [`OverrideError`] when `raw` names nothing recognizable.
///
/// # Example
///
/// ```
/// use dispatch::parse_override;
/// use platform::{CapabilityLevel, Ladder};
///
/// assert_eq!(parse_override(" level2 ", &Ladder::X86_64), Ok(Some(CapabilityLevel::Level2)));
/// assert_eq!(parse_override("AVX512", &Ladder::X86_64), Ok(Some(CapabilityLevel::Level3)));
/// assert_eq!(parse_override("", &Ladder::X86_64), Ok(None));
/// assert!(parse_override("avx2", &Ladder::AARCH64).is_err());
/// ```
pub fn parse_override(raw: &str, ladder: &Ladder) -> Result<Option<CapabilityLevel>, OverrideError> {
  let value = raw.trim();
  if value.is_empty() {
    return Ok(None);
  }
  if let Ok(level) = value.parse::<CapabilityLevel>() {
    return Ok(Some(level));
  }
  if let Some(level) = ladder.level_for_label(value) {
    return Ok(Some(level));
  }
  Err(OverrideError { value: value.to_owned(), expected: accepted_values(ladder) })
}

fn accepted_values(ladder: &Ladder) -> String {
  CapabilityLevel::ALL
    .iter()
    .map(|level| level.name())
    .chain(ladder.rungs().iter().map(|rung| rung.label))
    .collect::<Vec<_>>()
    .join(", ")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_level_names() {
    let ladder = Ladder::X86_64;
    assert_eq!(parse_override("DEFAULT", &ladder), Ok(Some(CapabilityLevel::Default)));
    assert_eq!(parse_override("LEVEL1", &ladder), Ok(Some(CapabilityLevel::Level1)));
    assert_eq!(parse_override("level3", &ladder), Ok(Some(CapabilityLevel::Level3)));
    assert_eq!(parse_override("\tLevel2\n", &ladder), Ok(Some(CapabilityLevel::Level2)));
  }

  #[test]
  fn parses_arch_labels() {
    assert_eq!(parse_override("avx2", &Ladder::X86_64), Ok(Some(CapabilityLevel::Level2)));
    assert_eq!(parse_override("SSE42", &Ladder::X86_64), Ok(Some(CapabilityLevel::Level1)));
    assert_eq!(parse_override("sve", &Ladder::AARCH64), Ok(Some(CapabilityLevel::Level3)));
    assert_eq!(parse_override("VSX", &Ladder::POWERPC64), Ok(Some(CapabilityLevel::Level1)));
  }

  #[test]
  fn empty_means_no_override() {
    assert_eq!(parse_override("", &Ladder::X86_64), Ok(None));
    assert_eq!(parse_override("   ", &Ladder::X86_64), Ok(None));
  }

  #[test]
  fn rejects_unknown() {
    let err = parse_override(" AVX9 ", &Ladder::X86_64).unwrap_err();
    assert_eq!(err.value, "AVX9");
    assert_eq!(err.expected, "DEFAULT, LEVEL1, LEVEL2, LEVEL3, sse42, avx2, avx512");

    // Labels belong to their own architecture.
    assert!(parse_override("neon", &Ladder::X86_64).is_err());
    assert!(parse_override("LEVEL4", &Ladder::X86_64).is_err());
  }

  #[test]
  fn baseline_ladder_accepts_only_level_names() {
    let ladder = Ladder::baseline(platform::Arch::Other);
    assert_eq!(parse_override("LEVEL3", &ladder), Ok(Some(CapabilityLevel::Level3)));
    assert_eq!(parse_override("avx2", &ladder).unwrap_err().expected, "DEFAULT, LEVEL1, LEVEL2, LEVEL3");
  }

  #[test]
  fn from_override_value_falls_back() {
    assert_eq!(DispatchConfig::from_override_value(None), DispatchConfig::AUTO);
    assert_eq!(DispatchConfig::from_override_value(Some("bogus")), DispatchConfig::AUTO);
    assert_eq!(
      DispatchConfig::from_override_value(Some("LEVEL1")),
      DispatchConfig::forced(CapabilityLevel::Level1)
    );
    assert!(!DispatchConfig::AUTO.is_forced());
    assert!(DispatchConfig::forced(CapabilityLevel::Default).is_forced());
  }
}
