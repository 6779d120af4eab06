//! Call methods with unpacked arguments, one impl per arity.

use crate::error::BadFunctionCall;
use crate::function::Function;
use crate::move_only::MoveOnlyFunction;
use crate::thread::Threading;

macro_rules! call {
    ($container:ident; $($arg:ident: $ty:ident),*) => {
        impl<R: 'static, $($ty: 'static,)* Space, T: Threading>
            $container<fn($($ty),*) -> R, Space, T>
        {
            /// Calls the payload.
            ///
            /// # Panics
            ///
            /// Panics if the container is empty. With the `std` feature the
            /// panic payload is [`BadFunctionCall`].
            #[inline]
            #[track_caller]
            pub fn call(&mut self, $($arg: $ty),*) -> R {
                self.invoke(($($arg,)*))
            }

            /// Calls the payload, or returns [`BadFunctionCall`] if the
            /// container is empty.
            #[inline]
            pub fn try_call(&mut self, $($arg: $ty),*) -> Result<R, BadFunctionCall> {
                self.try_invoke(($($arg,)*))
            }
        }
    };
}

macro_rules! call_all {
    ($($arg:ident: $ty:ident),*) => {
        call!(MoveOnlyFunction; $($arg: $ty),*);
        call!(Function; $($arg: $ty),*);
    };
}

call_all!();
call_all!(a1: A1);
call_all!(a1: A1, a2: A2);
call_all!(a1: A1, a2: A2, a3: A3);
call_all!(a1: A1, a2: A2, a3: A3, a4: A4);
call_all!(a1: A1, a2: A2, a3: A3, a4: A4, a5: A5);
call_all!(a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6);
call_all!(a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6, a7: A7);
call_all!(a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6, a7: A7, a8: A8);
