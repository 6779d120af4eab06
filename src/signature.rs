//! Call signatures and the payloads that match them.

mod sealed {
    pub trait Sealed {}
}

/// A call signature, spelled as a plain function-pointer type.
///
/// Implemented for `fn(A1, .., An) -> R` with up to eight arguments. The
/// function-pointer type doubles as the storage type of the pointer form, see
/// [`MoveOnlyFunction::from_fn`](crate::MoveOnlyFunction::from_fn).
///
/// Arguments and result must be `'static` types.
pub trait Signature: sealed::Sealed + Copy + 'static {
    /// Arguments packed into a tuple.
    type Args: 'static;
    /// Result of a call.
    type Output: 'static;

    /// Calls the function pointer with unpacked `args`.
    fn call_with(self, args: Self::Args) -> Self::Output;
}

/// A payload that can be called with the signature `S`.
///
/// Every closure, function item and function pointer implementing the
/// matching [`FnMut`] is a payload. Closure arguments usually need type
/// annotations, since the compiler cannot infer them through this trait:
///
/// ```
/// use smallfn::MoveOnlyFunction;
///
/// let mut add: MoveOnlyFunction<fn(i32, i32) -> i32> =
///     MoveOnlyFunction::new(|l: i32, r: i32| l + r);
/// assert_eq!(add.call(3, 5), 8);
/// ```
pub trait Invoke<S: Signature> {
    /// Calls the payload with unpacked `args`.
    fn invoke(&mut self, args: S::Args) -> S::Output;
}

macro_rules! signature {
    ($($arg:ident: $ty:ident),*) => {
        impl<R: 'static, $($ty: 'static),*> sealed::Sealed for fn($($ty),*) -> R {}

        impl<R: 'static, $($ty: 'static),*> Signature for fn($($ty),*) -> R {
            type Args = ($($ty,)*);
            type Output = R;

            #[inline]
            fn call_with(self, ($($arg,)*): Self::Args) -> R {
                self($($arg),*)
            }
        }

        impl<Func, R: 'static, $($ty: 'static),*> Invoke<fn($($ty),*) -> R> for Func
        where
            Func: FnMut($($ty),*) -> R,
        {
            #[inline]
            fn invoke(&mut self, ($($arg,)*): ($($ty,)*)) -> R {
                self($($arg),*)
            }
        }
    };
}

signature!();
signature!(a1: A1);
signature!(a1: A1, a2: A2);
signature!(a1: A1, a2: A2, a3: A3);
signature!(a1: A1, a2: A2, a3: A3, a4: A4);
signature!(a1: A1, a2: A2, a3: A3, a4: A4, a5: A5);
signature!(a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6);
signature!(a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6, a7: A7);
signature!(a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6, a7: A7, a8: A8);

#[cfg(test)]
mod tests {
    use super::{Invoke, Signature};

    fn foo(_: i32, _: char) -> usize {
        42
    }

    #[test]
    fn test_call_with() {
        let f: fn(i32, char) -> usize = foo;
        assert_eq!(f.call_with((1, '*')), 42);

        let g: fn() -> &'static str = || "nullary";
        assert_eq!(g.call_with(()), "nullary");
    }

    #[test]
    fn test_invoke_closure() {
        let mut total = 0;
        let mut acc = move |j: i32| {
            total += j;
            total
        };
        assert_eq!(Invoke::<fn(i32) -> i32>::invoke(&mut acc, (1,)), 1);
        assert_eq!(Invoke::<fn(i32) -> i32>::invoke(&mut acc, (6,)), 7);
    }

    #[test]
    fn test_invoke_eight_args() {
        let mut sum = |a: u8, b: u8, c: u8, d: u8, e: u8, f: u8, g: u8, h: u8| {
            [a, b, c, d, e, f, g, h].iter().map(|&x| u32::from(x)).sum::<u32>()
        };
        let args = (1, 2, 3, 4, 5, 6, 7, 8);
        assert_eq!(
            Invoke::<fn(u8, u8, u8, u8, u8, u8, u8, u8) -> u32>::invoke(&mut sum, args),
            36
        );
    }
}
