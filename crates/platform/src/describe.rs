//! Human-readable platform summary for diagnostics.

use core::fmt;

use crate::{caps::Caps, detect::Detected, ladder::Ladder, level::CapabilityLevel};

/// Snapshot of the detected platform, cheap to copy and print.
///
/// ```
/// let description = platform::describe();
/// println!("{description}");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Description {
  detected: Detected,
  ladder: Ladder,
  overridden: bool,
}

impl Description {
  #[must_use]
  pub fn new(detected: Detected, ladder: Ladder, overridden: bool) -> Self {
    Self { detected, ladder, overridden }
  }

  #[inline]
  #[must_use]
  pub fn caps(&self) -> Caps {
    self.detected.caps
  }

  #[inline]
  #[must_use]
  pub fn level(&self) -> CapabilityLevel {
    self.detected.level
  }

  /// Architecture label of the detected level (e.g. `"avx2"`).
  #[inline]
  #[must_use]
  pub fn label(&self) -> &'static str {
    self.ladder.label(self.detected.level)
  }

  /// True if the capabilities came from [`crate::try_set_override`].
  #[inline]
  #[must_use]
  pub fn is_overridden(&self) -> bool {
    self.overridden
  }
}

impl fmt::Display for Description {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {} ({}) {}", self.detected.arch, self.detected.level, self.label(), self.detected.caps)?;
    if self.overridden {
      f.write_str(" [override]")?;
    }
    Ok(())
  }
}
