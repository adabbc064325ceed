//! Stub table declaration.

/// Declare a table of dispatch stubs, one per operation.
///
/// For each `fn name(args) -> ret as Alias;` entry the macro generates:
///
/// - `type Alias = fn(args) -> ret`, the kernel signature
/// - a `name` field of `KernelSlots<Alias>` in the kernels struct, which is
///   what the build layer fills in
/// - a `name` field of `DispatchStub<Alias>` in the stubs struct
/// - a `name(&self, args) -> ret` method on the table, which resolves once
///   and then calls the selected kernel
///
/// The table also gets `new`, `context`, `stubs`, `resolve_all` (eager
/// validation of the override against every stub) and `reports`.
///
/// # Example
///
/// ```
/// use dispatch::{DispatchConfig, DispatchContext};
/// use platform::{CapabilityLevel, FixedProbe};
///
/// dispatch::stub_table! {
///   /// Vector helpers.
///   pub struct VecDispatch {
///     kernels: VecKernels,
///     stubs: VecStubs,
///   }
///
///   /// Sum of a slice.
///   fn sum(values: &[f32]) -> f32 as SumFn;
///   /// In-place scaling.
///   fn scale(values: &mut [f32], factor: f32) as ScaleFn;
/// }
///
/// fn sum_scalar(values: &[f32]) -> f32 { values.iter().sum() }
/// fn scale_scalar(values: &mut [f32], factor: f32) { values.iter_mut().for_each(|v| *v *= factor) }
///
/// let kernels = VecKernels::portable(sum_scalar, scale_scalar);
/// let table = VecDispatch::new(DispatchContext::new(FixedProbe(CapabilityLevel::Level2), DispatchConfig::AUTO), kernels);
///
/// let mut values = [1.0, 2.0, 3.0];
/// table.scale(&mut values, 2.0);
/// assert_eq!(table.sum(&values), 12.0);
/// assert!(table.resolve_all().is_ok());
/// ```
#[macro_export]
macro_rules! stub_table {
  (
    $(#[$table_meta:meta])*
    $vis:vis struct $table:ident {
      kernels: $kernels:ident,
      stubs: $stubs:ident $(,)?
    }
    $(
      $(#[$op_meta:meta])*
      fn $op:ident($($arg:ident : $arg_ty:ty),* $(,)?) $(-> $ret:ty)? as $alias:ident;
    )+
  ) => {
    $(
      #[doc = concat!("Kernel signature of `", stringify!($op), "`.")]
      $vis type $alias = fn($($arg_ty),*) $(-> $ret)?;
    )+

    /// Compiled kernels, one slot set per operation.
    #[derive(Clone, Copy, Debug)]
    $vis struct $kernels {
      $(
        #[doc = concat!("Kernels for `", stringify!($op), "`.")]
        pub $op: $crate::KernelSlots<$alias>,
      )+
    }

    impl $kernels {
      /// Only `DEFAULT` kernels.
      #[must_use]
      pub const fn portable($($op: $alias),+) -> Self {
        Self { $($op: $crate::KernelSlots::new($op),)+ }
      }
    }

    /// One dispatch stub per operation.
    #[derive(Debug)]
    $vis struct $stubs {
      $(
        #[doc = concat!("Stub for `", stringify!($op), "`.")]
        pub $op: $crate::DispatchStub<$alias>,
      )+
    }

    impl $stubs {
      #[must_use]
      pub const fn new(kernels: $kernels) -> Self {
        Self { $($op: $crate::DispatchStub::new(stringify!($op), kernels.$op),)+ }
      }

      /// Reports for every stub, in declaration order.
      #[must_use]
      pub fn reports(&self) -> ::std::vec::Vec<$crate::StubReport> {
        ::std::vec![$(self.$op.report()),+]
      }
    }

    $(#[$table_meta])*
    #[derive(Debug)]
    $vis struct $table {
      context: $crate::DispatchContext,
      stubs: $stubs,
    }

    impl $table {
      #[must_use]
      pub fn new(context: $crate::DispatchContext, kernels: $kernels) -> Self {
        Self { context, stubs: $stubs::new(kernels) }
      }

      /// Table resolving against the process-wide host context.
      #[must_use]
      pub fn host(kernels: $kernels) -> Self {
        Self::new($crate::DispatchContext::global().clone(), kernels)
      }

      #[inline]
      #[must_use]
      pub const fn context(&self) -> &$crate::DispatchContext {
        &self.context
      }

      #[inline]
      #[must_use]
      pub const fn stubs(&self) -> &$stubs {
        &self.stubs
      }

      $(
        $(#[$op_meta])*
        ///
        /// # Panics
        ///
        /// On first call, if the configuration forces a capability level
        /// this operation has no kernel for.
        #[inline]
        pub fn $op(&self, $($arg: $arg_ty),*) $(-> $ret)? {
          (self.stubs.$op.resolve_in(&self.context))($($arg),*)
        }
      )+

      /// Resolve every stub now.
      ///
      /// # Errors
      ///
      /// Returns the first configuration error, in declaration order.
      pub fn resolve_all(&self) -> ::core::result::Result<(), $crate::DispatchError> {
        $(self.stubs.$op.try_resolve_in(&self.context)?;)+
        ::core::result::Result::Ok(())
      }

      /// Reports for every stub, in declaration order.
      #[must_use]
      pub fn reports(&self) -> ::std::vec::Vec<$crate::StubReport> {
        self.stubs.reports()
      }
    }
  };
}
