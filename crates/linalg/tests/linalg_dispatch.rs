//! Routing of the linear-algebra operations.
//!
//! Each marker kernel writes the level it was registered at into `out[0]`
//! (or `packed[0]`), so a call reveals which variant the table selected.

use std::sync::{Arc, Barrier};

use dispatch::{FixedProbe, Selection};
use linalg::{
  AddrFn, CapabilityLevel, DispatchConfig, DispatchContext, DispatchError, Int4PackMmFn, Int8PackMmFn, KernelSlots,
  LinalgDispatch, LinalgKernels, OPERATIONS, WeightToInt4PackFn,
};
use proptest::prelude::*;

macro_rules! marker {
  (addr $name:ident => $level:literal) => {
    fn $name(out: &mut [f32], _: &[f32], _: &[f32], _: f32, _: f32) {
      out[0] = $level as f32;
    }
  };
  (pack $name:ident => $level:literal) => {
    fn $name(_: &[i32], packed: &mut [u8]) {
      packed[0] = $level;
    }
  };
  (int4 $name:ident => $level:literal) => {
    fn $name(out: &mut [f32], _: &[f32], _: &[u8], _: i64, _: &[f32]) {
      out[0] = $level as f32;
    }
  };
  (int8 $name:ident => $level:literal) => {
    fn $name(out: &mut [f32], _: &[f32], _: &[i8], _: &[f32]) {
      out[0] = $level as f32;
    }
  };
}

marker!(addr addr_default => 0);
marker!(addr addr_l1 => 1);
marker!(addr addr_l2 => 2);
marker!(addr addr_l3 => 3);
marker!(pack pack_default => 0);
marker!(int4 int4_default => 0);
marker!(int4 int4_l2 => 2);
marker!(int8 int8_default => 0);
marker!(int8 int8_l1 => 1);
marker!(int8 int8_l3 => 3);

/// A build where:
/// - `addr` has DEFAULT, LEVEL1, LEVEL2, LEVEL3
/// - `weight_to_int4pack` has DEFAULT only
/// - `int4pack_mm` has DEFAULT, LEVEL2
/// - `int8pack_mm` has DEFAULT, LEVEL1, LEVEL3
fn kernels() -> LinalgKernels {
  LinalgKernels {
    addr: KernelSlots::new(addr_default as AddrFn)
      .with(CapabilityLevel::Level1, addr_l1)
      .with(CapabilityLevel::Level2, addr_l2)
      .with(CapabilityLevel::Level3, addr_l3),
    weight_to_int4pack: KernelSlots::new(pack_default as WeightToInt4PackFn),
    int4pack_mm: KernelSlots::new(int4_default as Int4PackMmFn).with(CapabilityLevel::Level2, int4_l2),
    int8pack_mm: KernelSlots::new(int8_default as Int8PackMmFn)
      .with(CapabilityLevel::Level1, int8_l1)
      .with(CapabilityLevel::Level3, int8_l3),
  }
}

fn linalg(probe: CapabilityLevel, config: DispatchConfig) -> LinalgDispatch {
  LinalgDispatch::new(DispatchContext::new(FixedProbe(probe), config), kernels())
}

/// Levels the four operations select, in declaration order.
fn selected_levels(linalg: &LinalgDispatch) -> [u8; 4] {
  let mut out = [f32::NAN];
  let mut packed = [u8::MAX];

  linalg.addr(&mut out, &[1.0], &[1.0], 0.0, 1.0);
  let addr = out[0] as u8;
  linalg.weight_to_int4pack(&[1, 2], &mut packed);
  linalg.int4pack_mm(&mut out, &[1.0], &[0x21], 32, &[1.0, 0.0]);
  let int4 = out[0] as u8;
  linalg.int8pack_mm(&mut out, &[1.0], &[1], &[1.0]);
  let int8 = out[0] as u8;

  [addr, packed[0], int4, int8]
}

#[test]
fn each_operation_falls_back_independently() {
  assert_eq!(selected_levels(&linalg(CapabilityLevel::Level3, DispatchConfig::AUTO)), [3, 0, 2, 3]);
  assert_eq!(selected_levels(&linalg(CapabilityLevel::Level2, DispatchConfig::AUTO)), [2, 0, 2, 1]);
  assert_eq!(selected_levels(&linalg(CapabilityLevel::Level1, DispatchConfig::AUTO)), [1, 0, 0, 1]);
  assert_eq!(selected_levels(&linalg(CapabilityLevel::Default, DispatchConfig::AUTO)), [0, 0, 0, 0]);
}

#[test]
fn forced_default_is_always_available() {
  let linalg = linalg(CapabilityLevel::Level3, DispatchConfig::forced(CapabilityLevel::Default));
  assert_eq!(linalg.resolve_all(), Ok(()));
  assert_eq!(selected_levels(&linalg), [0, 0, 0, 0]);
  assert!(linalg.reports().iter().all(|r| r.selected == Some((CapabilityLevel::Default, Selection::Forced))));
}

#[test]
fn forced_level_missing_from_some_operations_fails_resolve_all() {
  let linalg = linalg(CapabilityLevel::Default, DispatchConfig::forced(CapabilityLevel::Level2));
  assert_eq!(
    linalg.resolve_all(),
    Err(DispatchError::UnsupportedForcedLevel { stub: "weight_to_int4pack", level: CapabilityLevel::Level2 })
  );

  let mut out = [0.0f32];
  linalg.addr(&mut out, &[1.0], &[1.0], 0.0, 1.0);
  assert_eq!(out[0], 2.0, "operations with a LEVEL2 kernel still run it");
}

#[test]
#[should_panic(expected = "stub `int8pack_mm`: forced capability level LEVEL2 has no compiled kernel")]
fn calling_an_operation_without_the_forced_level_panics() {
  let linalg = linalg(CapabilityLevel::Level3, DispatchConfig::forced(CapabilityLevel::Level2));
  let mut out = [0.0f32];
  linalg.int8pack_mm(&mut out, &[1.0], &[1], &[1.0]);
}

#[test]
fn concurrent_callers_share_one_selection() {
  const THREADS: usize = 16;
  let linalg = Arc::new(linalg(CapabilityLevel::Level2, DispatchConfig::AUTO));
  let barrier = Arc::new(Barrier::new(THREADS));

  let handles: Vec<_> = (0..THREADS)
    .map(|_| {
      let (linalg, barrier) = (Arc::clone(&linalg), Arc::clone(&barrier));
      std::thread::spawn(move || {
        barrier.wait();
        selected_levels(&linalg)
      })
    })
    .collect();

  for handle in handles {
    assert_eq!(handle.join().unwrap(), [2, 0, 2, 1]);
  }
}

#[test]
fn report_display_names_the_selection() {
  let linalg = linalg(CapabilityLevel::Level3, DispatchConfig::AUTO);
  let _ = selected_levels(&linalg);
  let report = linalg.reports().remove(2).to_string();
  assert!(report.starts_with("int4pack_mm: LEVEL2 ("), "{report}");
  assert!(report.ends_with(", probed) [DEFAULT, LEVEL2]"), "{report}");
}

proptest! {
  #[test]
  fn forced_selection_matches_registration(level in 0usize..4, probe in 0usize..4) {
    let level = CapabilityLevel::from_index(level).unwrap();
    let probe = CapabilityLevel::from_index(probe).unwrap();
    let linalg = linalg(probe, DispatchConfig::forced(level));
    let kernels = kernels();

    let expected = [
      kernels.addr.is_populated(level),
      kernels.weight_to_int4pack.is_populated(level),
      kernels.int4pack_mm.is_populated(level),
      kernels.int8pack_mm.is_populated(level),
    ];
    let stubs = linalg.stubs();
    let outcomes = [
      stubs.addr.try_resolve_in(linalg.context()).map(|s| s.level),
      stubs.weight_to_int4pack.try_resolve_in(linalg.context()).map(|s| s.level),
      stubs.int4pack_mm.try_resolve_in(linalg.context()).map(|s| s.level),
      stubs.int8pack_mm.try_resolve_in(linalg.context()).map(|s| s.level),
    ];
    for ((stub, populated), outcome) in OPERATIONS.into_iter().zip(expected).zip(outcomes) {
      if populated {
        prop_assert_eq!(outcome, Ok(level));
      } else {
        prop_assert_eq!(outcome, Err(DispatchError::UnsupportedForcedLevel { stub, level }));
      }
    }
  }
}
