//! Fuzz target for capability ladders.
//!
//! Tests that:
//! - The assigned level's requirements are present in the feature set
//! - Adding features never lowers the level
//! - `Detected::from_caps` agrees with the current ladder

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use platform::{CapabilityLevel, Caps, Detected, Ladder};

#[derive(Arbitrary, Debug)]
struct Input {
  base: [u64; 4],
  extra: [u64; 4],
}

const LADDERS: [Ladder; 5] = [Ladder::X86_64, Ladder::AARCH64, Ladder::POWERPC64, Ladder::S390X, Ladder::RISCV64];

fuzz_target!(|input: Input| {
  let base = Caps::from_raw(input.base);
  let wider = base | Caps::from_raw(input.extra);

  for ladder in LADDERS {
    let level = ladder.level_for(base);
    assert!(level <= ladder.top());
    if let Some(rung) = ladder.rung(level) {
      assert!(base.has(rung.requires), "{level} assigned without its features");
    } else {
      assert_eq!(level, CapabilityLevel::Default);
    }
    assert!(ladder.level_for(wider) >= level, "adding features lowered the level");
  }

  assert_eq!(Detected::from_caps(base).level, Ladder::current().level_for(base));
});
