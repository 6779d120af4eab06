use thiserror::Error;

/// Error returned when an empty container is invoked.
///
/// Returned by the `try_*` call methods. The panicking call methods use this
/// value as their panic payload when the `std` feature is enabled, so it can
/// be recovered with [`std::panic::catch_unwind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("bad function call: invoked an empty callable")]
pub struct BadFunctionCall;

#[cold]
#[inline(never)]
#[track_caller]
pub(crate) fn empty_call() -> ! {
    #[cfg(feature = "std")]
    {
        std::panic::panic_any(BadFunctionCall)
    }
    #[cfg(not(feature = "std"))]
    {
        panic!("{}", BadFunctionCall)
    }
}
