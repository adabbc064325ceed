//! Linear-algebra dispatch stubs.
//!
//! Declares the operations whose kernels are compiled once per capability
//! level, and the typed table that routes calls to the selected variant:
//!
//! | Operation | Kernel signature |
//! |-----------|------------------|
//! | `addr` | `fn(out: &mut [f32], vec1: &[f32], vec2: &[f32], beta: f32, alpha: f32)` |
//! | `weight_to_int4pack` | `fn(weight: &[i32], packed: &mut [u8])` |
//! | `int4pack_mm` | `fn(out: &mut [f32], a: &[f32], packed_b: &[u8], q_group_size: i64, scales_and_zeros: &[f32])` |
//! | `int8pack_mm` | `fn(out: &mut [f32], a: &[f32], b: &[i8], scales: &[f32])` |
//!
//! The kernels themselves are supplied by the build through
//! [`LinalgKernels`]; at minimum every operation needs a `DEFAULT` kernel.
//! Buffer shapes and layouts are a contract between callers and kernels.
//!
//! # Example
//!
//! ```
//! use linalg::{LinalgDispatch, LinalgKernels};
//! # fn addr(out: &mut [f32], vec1: &[f32], vec2: &[f32], beta: f32, alpha: f32) {
//! #   for (i, o) in out.iter_mut().enumerate() {
//! #     *o = beta * *o + alpha * vec1[i / vec2.len()] * vec2[i % vec2.len()];
//! #   }
//! # }
//! # fn weight_to_int4pack(_: &[i32], _: &mut [u8]) {}
//! # fn int4pack_mm(_: &mut [f32], _: &[f32], _: &[u8], _: i64, _: &[f32]) {}
//! # fn int8pack_mm(_: &mut [f32], _: &[f32], _: &[i8], _: &[f32]) {}
//!
//! let kernels = LinalgKernels::portable(addr, weight_to_int4pack, int4pack_mm, int8pack_mm);
//! let linalg = LinalgDispatch::host(kernels);
//! linalg.resolve_all().expect("override names a compiled level");
//!
//! let mut out = [0.0; 4];
//! linalg.addr(&mut out, &[1.0, 2.0], &[3.0, 4.0], 0.0, 1.0);
//! assert_eq!(out, [3.0, 4.0, 6.0, 8.0]);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub use dispatch::{CapabilityLevel, DispatchConfig, DispatchContext, DispatchError, KernelSlots, StubReport};

dispatch::stub_table! {
  /// Linear-algebra operations routed to their best compiled kernels.
  ///
  /// Build one per library instance with [`LinalgDispatch::new`] (or
  /// [`LinalgDispatch::host`] for the process context). Each operation
  /// resolves on its first call and is a plain indirect call afterwards.
  pub struct LinalgDispatch {
    kernels: LinalgKernels,
    stubs: LinalgStubs,
  }

  /// Outer-product update: `out = beta * out + alpha * (vec1 ⊗ vec2)`.
  fn addr(out: &mut [f32], vec1: &[f32], vec2: &[f32], beta: f32, alpha: f32) as AddrFn;

  /// Packs 4-bit weights (one per `i32`) two to a byte.
  fn weight_to_int4pack(weight: &[i32], packed: &mut [u8]) as WeightToInt4PackFn;

  /// Matrix multiply against int4-packed weights with per-group scales and zero points.
  fn int4pack_mm(out: &mut [f32], a: &[f32], packed_b: &[u8], q_group_size: i64, scales_and_zeros: &[f32])
    as Int4PackMmFn;

  /// Matrix multiply against int8 weights with per-channel scales.
  fn int8pack_mm(out: &mut [f32], a: &[f32], b: &[i8], scales: &[f32]) as Int8PackMmFn;
}

/// Names of the declared operations, in declaration order.
pub const OPERATIONS: [&str; 4] = ["addr", "weight_to_int4pack", "int4pack_mm", "int8pack_mm"];
