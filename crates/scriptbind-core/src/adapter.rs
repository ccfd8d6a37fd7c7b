//! Single-return call adapters.
//!
//! [`ScriptFunction`] turns a native callable of any supported arity into a
//! uniform stack-driven entry point:
//!
//! 1. Arguments are read from positions 1..n, strictly left to right; the
//!    first failed read aborts the call before the native function runs.
//! 2. The native function is invoked with the arguments in declared order.
//! 3. The stack is cleared and the result (if the return type is not `()`)
//!    is pushed, using the binding's tag override for constructed handles.
//!
//! One implementation exists per arity, generated by macro expansion up to
//! eight parameters. The `Marker` parameter names the erased signature so
//! the implementations stay coherent; it is inferred at registration sites.

use crate::convert::{FromStack, ScriptReturn};
use crate::error::ScriptError;
use crate::native_fn::{NativeFn, PrototypeStore};
use crate::stack::ScriptStack;
use crate::tag::TypeTag;

/// A native callable bindable through the single-return convention.
pub trait ScriptFunction<Marker> {
    /// Run the full read–invoke–write cycle against `stack`.
    ///
    /// Returns the number of results left on the stack (0 or 1).
    fn invoke(
        &self,
        stack: &mut ScriptStack,
        protos: &dyn PrototypeStore,
        tag_override: Option<TypeTag>,
    ) -> Result<usize, ScriptError>;

    /// Erase into a registrable binding, capturing the callable and the tag
    /// override as closure state.
    fn into_native(self, tag_override: Option<TypeTag>) -> NativeFn
    where
        Self: Sized + 'static,
    {
        NativeFn::new(move |stack, protos| self.invoke(stack, protos, tag_override))
    }
}

macro_rules! impl_script_function {
    ($($arg:ident at $pos:literal),* $(,)?) => {
        impl<Func, Ret, $($arg,)*> ScriptFunction<fn($($arg,)*) -> Ret> for Func
        where
            Func: Fn($($arg),*) -> Ret,
            Ret: ScriptReturn,
            $($arg: FromStack,)*
        {
            #[allow(non_snake_case)]
            fn invoke(
                &self,
                stack: &mut ScriptStack,
                protos: &dyn PrototypeStore,
                tag_override: Option<TypeTag>,
            ) -> Result<usize, ScriptError> {
                $(let $arg = <$arg as FromStack>::read(stack, $pos)?;)*
                let result = (self)($($arg),*);
                stack.clear();
                result.push_result(stack, protos, tag_override);
                debug_assert_eq!(stack.height(), Ret::COUNT, "adapter left an unbalanced stack");
                Ok(Ret::COUNT)
            }
        }
    };
}

impl_script_function!();
impl_script_function!(A1 at 1);
impl_script_function!(A1 at 1, A2 at 2);
impl_script_function!(A1 at 1, A2 at 2, A3 at 3);
impl_script_function!(A1 at 1, A2 at 2, A3 at 3, A4 at 4);
impl_script_function!(A1 at 1, A2 at 2, A3 at 3, A4 at 4, A5 at 5);
impl_script_function!(A1 at 1, A2 at 2, A3 at 3, A4 at 4, A5 at 5, A6 at 6);
impl_script_function!(A1 at 1, A2 at 2, A3 at 3, A4 at 4, A5 at 5, A6 at 6, A7 at 7);
impl_script_function!(A1 at 1, A2 at 2, A3 at 3, A4 at 4, A5 at 5, A6 at 6, A7 at 7, A8 at 8);
