//! Fuzz target for stub resolution.
//!
//! Tests that:
//! - Probed resolution picks the highest populated level at or below the probe
//! - Forced resolution picks exactly the forced level or reports it missing
//! - A second resolution returns the cached outcome

#![no_main]

use arbitrary::Arbitrary;
use dispatch::{CapabilityLevel, DispatchConfig, DispatchContext, DispatchError, DispatchStub, FixedProbe, KernelSlots};
use libfuzzer_sys::fuzz_target;

type MarkerFn = fn() -> usize;

const MARKERS: [MarkerFn; CapabilityLevel::COUNT] = [|| 0, || 1, || 2, || 3];

#[derive(Arbitrary, Debug)]
struct Input {
  populated: u8,
  probe: u8,
  forced: Option<u8>,
}

fn level(raw: u8) -> CapabilityLevel {
  CapabilityLevel::ALL[usize::from(raw) % CapabilityLevel::COUNT]
}

fuzz_target!(|input: Input| {
  let mut slots = KernelSlots::new(MARKERS[0]);
  for candidate in &CapabilityLevel::ALL[1..] {
    if input.populated & (1 << candidate.index()) != 0 {
      slots = slots.with(*candidate, MARKERS[candidate.index()]);
    }
  }

  let probe = level(input.probe);
  let config = input.forced.map_or(DispatchConfig::AUTO, |raw| DispatchConfig::forced(level(raw)));
  let ctx = DispatchContext::new(FixedProbe(probe), config);
  let stub = DispatchStub::new("fuzz", slots);

  let first = stub.try_resolve_in(&ctx);
  match config.forced_level {
    Some(forced) if slots.is_populated(forced) => {
      let selected = first.unwrap();
      assert_eq!(selected.level, forced);
      assert_eq!((selected.func)(), forced.index());
    }
    Some(forced) => {
      assert_eq!(first.unwrap_err(), DispatchError::UnsupportedForcedLevel { stub: "fuzz", level: forced });
    }
    None => {
      let selected = first.unwrap();
      let expected = probe.descending().find(|l| slots.is_populated(*l)).unwrap();
      assert_eq!(selected.level, expected);
      assert_eq!((selected.func)(), expected.index());
    }
  }

  let second = stub.try_resolve_in(&DispatchContext::new(FixedProbe(CapabilityLevel::MAX), DispatchConfig::AUTO));
  assert_eq!(first.map(|s| s.level), second.map(|s| s.level));
});
