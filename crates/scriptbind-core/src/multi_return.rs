//! Multi-return call adapters for output-pointer conventions.
//!
//! Many C-style APIs return several values through trailing pointer
//! parameters: `(input, *out1, *out2, ..) -> status`. Two conventions are
//! supported, selected at registration time:
//!
//! - **Pure output** ([`PureOutputFunction`]): the trailing pointers only
//!   receive values. Leading inputs are read from the stack; the output
//!   slots are local scratch storage the native function fills in.
//! - **Input-output** ([`InOutFunction`]): the trailing pointers both supply
//!   an initial value and receive a mutated one. Initial values are read
//!   from the stack positions following the inputs, in declared order.
//!
//! Both conventions share one push contract: after the native call the stack
//! is cleared and results are pushed as the return value first (when the
//! return type is not `()`) followed by the output slots in declared order.
//! A binding with outputs (O1, O2) and return R always yields `[R, O1, O2]`.
//!
//! Implementations are macro-generated for zero to two leading inputs and
//! one to six output slots — the envelope the bound API families actually
//! use. The `Marker` parameter records the input/output split of the erased
//! signature, which keeps a signature like `(*mut M, *mut f64)` (one handle
//! input, one output) distinct from an all-output reading of the same shape.

use crate::convert::{FromStack, IntoStack, ScriptReturn};
use crate::error::ScriptError;
use crate::native_fn::{NativeFn, PrototypeStore};
use crate::stack::ScriptStack;
use crate::tag::TypeTag;

/// A native callable bindable through the pure-output convention.
pub trait PureOutputFunction<Marker> {
    /// Run the read–invoke–push cycle against `stack`.
    ///
    /// Returns the number of results left on the stack.
    fn invoke(
        &self,
        stack: &mut ScriptStack,
        protos: &dyn PrototypeStore,
        tag_override: Option<TypeTag>,
    ) -> Result<usize, ScriptError>;

    /// Erase into a registrable binding.
    fn into_native(self, tag_override: Option<TypeTag>) -> NativeFn
    where
        Self: Sized + 'static,
    {
        NativeFn::new(move |stack, protos| self.invoke(stack, protos, tag_override))
    }
}

/// A native callable bindable through the input-output convention.
pub trait InOutFunction<Marker> {
    /// Run the read–invoke–push cycle against `stack`.
    ///
    /// Returns the number of results left on the stack.
    fn invoke(
        &self,
        stack: &mut ScriptStack,
        protos: &dyn PrototypeStore,
        tag_override: Option<TypeTag>,
    ) -> Result<usize, ScriptError>;

    /// Erase into a registrable binding.
    fn into_native(self, tag_override: Option<TypeTag>) -> NativeFn
    where
        Self: Sized + 'static,
    {
        NativeFn::new(move |stack, protos| self.invoke(stack, protos, tag_override))
    }
}

macro_rules! impl_pure_output {
    ([$($in:ident at $ipos:literal),*], [$($out:ident),+]) => {
        impl<Func, Ret, $($in,)* $($out,)*>
            PureOutputFunction<(($($in,)*), ($($out,)*), Ret)> for Func
        where
            Func: Fn($($in,)* $(*mut $out,)*) -> Ret,
            Ret: ScriptReturn,
            $($in: FromStack,)*
            $($out: IntoStack + Default,)*
        {
            #[allow(non_snake_case)]
            fn invoke(
                &self,
                stack: &mut ScriptStack,
                protos: &dyn PrototypeStore,
                tag_override: Option<TypeTag>,
            ) -> Result<usize, ScriptError> {
                $(let $in = <$in as FromStack>::read(stack, $ipos)?;)*
                // Output slots are scratch storage, never read from the stack.
                $(let mut $out = <$out>::default();)*
                let result = (self)($($in,)* $(&mut $out as *mut $out,)*);
                let results = Ret::COUNT + [$(stringify!($out)),+].len();
                stack.clear();
                result.push_result(stack, protos, tag_override);
                $($out.write(stack, protos, None);)*
                debug_assert_eq!(stack.height(), results, "adapter left an unbalanced stack");
                Ok(results)
            }
        }
    };
}

macro_rules! impl_in_out {
    ([$($in:ident at $ipos:literal),*], [$($out:ident at $opos:literal),+]) => {
        impl<Func, Ret, $($in,)* $($out,)*>
            InOutFunction<(($($in,)*), ($($out,)*), Ret)> for Func
        where
            Func: Fn($($in,)* $(*mut $out,)*) -> Ret,
            Ret: ScriptReturn,
            $($in: FromStack,)*
            $($out: FromStack + IntoStack,)*
        {
            #[allow(non_snake_case)]
            fn invoke(
                &self,
                stack: &mut ScriptStack,
                protos: &dyn PrototypeStore,
                tag_override: Option<TypeTag>,
            ) -> Result<usize, ScriptError> {
                $(let $in = <$in as FromStack>::read(stack, $ipos)?;)*
                // Initial values come off the stack in declared order; the
                // native function mutates them in place.
                $(let mut $out = <$out as FromStack>::read(stack, $opos)?;)*
                let result = (self)($($in,)* $(&mut $out as *mut $out,)*);
                let results = Ret::COUNT + [$(stringify!($out)),+].len();
                stack.clear();
                result.push_result(stack, protos, tag_override);
                $($out.write(stack, protos, None);)*
                debug_assert_eq!(stack.height(), results, "adapter left an unbalanced stack");
                Ok(results)
            }
        }
    };
}

impl_pure_output!([], [O1]);
impl_pure_output!([], [O1, O2]);
impl_pure_output!([], [O1, O2, O3]);
impl_pure_output!([], [O1, O2, O3, O4]);
impl_pure_output!([], [O1, O2, O3, O4, O5]);
impl_pure_output!([], [O1, O2, O3, O4, O5, O6]);
impl_pure_output!([I1 at 1], [O1]);
impl_pure_output!([I1 at 1], [O1, O2]);
impl_pure_output!([I1 at 1], [O1, O2, O3]);
impl_pure_output!([I1 at 1], [O1, O2, O3, O4]);
impl_pure_output!([I1 at 1], [O1, O2, O3, O4, O5]);
impl_pure_output!([I1 at 1], [O1, O2, O3, O4, O5, O6]);
impl_pure_output!([I1 at 1, I2 at 2], [O1]);
impl_pure_output!([I1 at 1, I2 at 2], [O1, O2]);
impl_pure_output!([I1 at 1, I2 at 2], [O1, O2, O3]);
impl_pure_output!([I1 at 1, I2 at 2], [O1, O2, O3, O4]);
impl_pure_output!([I1 at 1, I2 at 2], [O1, O2, O3, O4, O5]);
impl_pure_output!([I1 at 1, I2 at 2], [O1, O2, O3, O4, O5, O6]);

impl_in_out!([], [O1 at 1]);
impl_in_out!([], [O1 at 1, O2 at 2]);
impl_in_out!([], [O1 at 1, O2 at 2, O3 at 3]);
impl_in_out!([], [O1 at 1, O2 at 2, O3 at 3, O4 at 4]);
impl_in_out!([], [O1 at 1, O2 at 2, O3 at 3, O4 at 4, O5 at 5]);
impl_in_out!([], [O1 at 1, O2 at 2, O3 at 3, O4 at 4, O5 at 5, O6 at 6]);
impl_in_out!([I1 at 1], [O1 at 2]);
impl_in_out!([I1 at 1], [O1 at 2, O2 at 3]);
impl_in_out!([I1 at 1], [O1 at 2, O2 at 3, O3 at 4]);
impl_in_out!([I1 at 1], [O1 at 2, O2 at 3, O3 at 4, O4 at 5]);
impl_in_out!([I1 at 1], [O1 at 2, O2 at 3, O3 at 4, O4 at 5, O5 at 6]);
impl_in_out!([I1 at 1], [O1 at 2, O2 at 3, O3 at 4, O4 at 5, O5 at 6, O6 at 7]);
impl_in_out!([I1 at 1, I2 at 2], [O1 at 3]);
impl_in_out!([I1 at 1, I2 at 2], [O1 at 3, O2 at 4]);
impl_in_out!([I1 at 1, I2 at 2], [O1 at 3, O2 at 4, O3 at 5]);
impl_in_out!([I1 at 1, I2 at 2], [O1 at 3, O2 at 4, O3 at 5, O4 at 6]);
impl_in_out!([I1 at 1, I2 at 2], [O1 at 3, O2 at 4, O3 at 5, O4 at 6, O5 at 7]);
impl_in_out!([I1 at 1, I2 at 2], [O1 at 3, O2 at 4, O3 at 5, O4 at 6, O5 at 7, O6 at 8]);
