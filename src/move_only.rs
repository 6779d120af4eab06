use core::fmt;
use core::marker::PhantomData;

use crate::error::BadFunctionCall;
use crate::raw::RawFunction;
use crate::signature::{Invoke, Signature};
use crate::space::S1;
use crate::thread::{Accepts, Local, Sendable, Threading};
use crate::vtable::{Form, MoveVTable};

/// A move-only container for any callable matching the signature `S`.
///
/// Small payloads are stored inline in `Space`, larger ones are boxed.
/// Payloads do not need to be [`Clone`], so unique-ownership captures such
/// as [`Box`] or a file handle are fine.
///
/// Calling takes `&mut self`, so stateful [`FnMut`] payloads are supported.
///
/// `T` is a [thread-safety marker](crate::thread). With the default
/// [`Local`] the container is not [`Send`].
///
/// # Example
///
/// ```
/// use smallfn::MoveOnlyFunction;
///
/// let (mut i, mut j) = (1usize, 1usize);
/// let mut fib: MoveOnlyFunction<fn() -> usize> = MoveOnlyFunction::new(move || {
///     let next = i + j;
///     i = j;
///     j = next;
///     i
/// });
///
/// let seq: Vec<usize> = (0..5).map(|_| fib.call()).collect();
/// assert_eq!(seq, [1, 2, 3, 5, 8]);
/// ```
///
/// Move-only containers can not be cloned:
///
/// ```compile_fail
/// use smallfn::MoveOnlyFunction;
///
/// let f: MoveOnlyFunction<fn() -> i32> = MoveOnlyFunction::new(|| 42);
/// let g = f.clone();
/// ```
pub struct MoveOnlyFunction<S: Signature, Space = S1, T: Threading = Local> {
    raw: RawFunction<S, Space, MoveVTable<S>>,
    _thread: PhantomData<T>,
}

impl<S: Signature, Space, T: Threading> MoveOnlyFunction<S, Space, T> {
    /// Creates an empty container.
    #[inline]
    pub const fn empty() -> Self {
        MoveOnlyFunction {
            raw: RawFunction::empty(),
            _thread: PhantomData,
        }
    }

    /// Stores `f` inline if it fits in `Space`, otherwise on the heap.
    ///
    /// # Example
    ///
    /// ```
    /// use smallfn::MoveOnlyFunction;
    ///
    /// let token = Box::new(7);
    /// let mut f: MoveOnlyFunction<fn(i32) -> i32> =
    ///     MoveOnlyFunction::new(move |x: i32| x * *token);
    ///
    /// assert!(f.is_inline());
    /// assert_eq!(f.call(6), 42);
    /// ```
    #[inline]
    pub fn new<F: Invoke<S> + 'static>(f: F) -> Self
    where
        T: Accepts<F>,
    {
        let mut this = Self::empty();
        this.set(f);
        this
    }

    /// Stores a plain function pointer.
    ///
    /// Non-capturing closures coerce to the pointer type.
    ///
    /// # Example
    ///
    /// ```
    /// use smallfn::{Form, MoveOnlyFunction};
    ///
    /// fn foo(_: i32, _: char) -> usize {
    ///     42
    /// }
    ///
    /// let mut f = MoveOnlyFunction::<fn(i32, char) -> usize>::from_fn(foo);
    /// assert_eq!(f.form(), Some(Form::Pointer));
    /// assert_eq!(f.call(1, '*'), 42);
    /// ```
    #[inline]
    pub fn from_fn(f: S) -> Self {
        MoveOnlyFunction {
            raw: unsafe { RawFunction::from_fn(MoveVTable::<S>::for_fn(), f) },
            _thread: PhantomData,
        }
    }

    /// Replaces the payload with `f`, dropping the previous payload first.
    #[inline]
    pub fn set<F: Invoke<S> + 'static>(&mut self, f: F)
    where
        T: Accepts<F>,
    {
        unsafe { self.raw.store(MoveVTable::<S>::of::<F, Space>(), f) }
    }

    /// Replaces the payload with a plain function pointer.
    #[inline]
    pub fn set_fn(&mut self, f: S) {
        unsafe { self.raw.store_fn(MoveVTable::<S>::for_fn(), f) }
    }

    /// Drops the payload, leaving the container empty.
    #[inline]
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Moves the payload out into a new container, leaving `self` empty.
    ///
    /// # Example
    ///
    /// ```
    /// use smallfn::MoveOnlyFunction;
    ///
    /// let mut src: MoveOnlyFunction<fn() -> i32> = MoveOnlyFunction::new(|| 42);
    /// let mut dst = src.take();
    ///
    /// assert!(src.is_empty());
    /// assert_eq!(dst.call(), 42);
    /// ```
    #[inline]
    pub fn take(&mut self) -> Self {
        let mut out = Self::empty();
        out.raw.move_from(&mut self.raw);
        out
    }

    /// Drops the current payload and moves the payload of `src` in, leaving
    /// `src` empty.
    #[inline]
    pub fn move_from(&mut self, src: &mut Self) {
        self.raw.move_from(&mut src.raw);
    }

    /// Returns true if there is no payload.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the storage form of the payload, or `None` if empty.
    #[inline]
    pub fn form(&self) -> Option<Form> {
        self.raw.form()
    }

    /// Returns true if the payload is heap-allocated.
    #[inline]
    pub fn is_heap(&self) -> bool {
        self.form() == Some(Form::Heap)
    }

    /// Returns true if the payload is stored inline.
    #[inline]
    pub fn is_inline(&self) -> bool {
        self.form() == Some(Form::Inline)
    }

    /// Calls the payload with packed `args`.
    ///
    /// # Panics
    ///
    /// Panics if the container is empty. With the `std` feature the panic
    /// payload is [`BadFunctionCall`].
    #[inline]
    #[track_caller]
    pub fn invoke(&mut self, args: S::Args) -> S::Output {
        self.raw.invoke(args)
    }

    /// Calls the payload with packed `args`, or returns [`BadFunctionCall`]
    /// if the container is empty.
    #[inline]
    pub fn try_invoke(&mut self, args: S::Args) -> Result<S::Output, BadFunctionCall> {
        self.raw.try_invoke(args)
    }

    /// Calls the payload without checking for emptiness.
    ///
    /// # Safety
    ///
    /// The container must not be empty. This is checked with a debug
    /// assertion only.
    #[inline]
    pub unsafe fn invoke_unchecked(&mut self, args: S::Args) -> S::Output {
        self.raw.invoke_unchecked(args)
    }

    pub(crate) fn from_raw(raw: RawFunction<S, Space, MoveVTable<S>>) -> Self {
        MoveOnlyFunction {
            raw,
            _thread: PhantomData,
        }
    }
}

impl<S: Signature, Space, T: Threading> Default for MoveOnlyFunction<S, Space, T> {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

impl<S: Signature, Space, T: Threading> From<S> for MoveOnlyFunction<S, Space, T> {
    #[inline]
    fn from(f: S) -> Self {
        Self::from_fn(f)
    }
}

impl<S: Signature, Space, T: Threading> fmt::Debug for MoveOnlyFunction<S, Space, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.raw.debug("MoveOnlyFunction", f)
    }
}

// SAFETY: `Sendable` only admits `Send` payloads, and function pointers are
// always `Send`.
unsafe impl<S: Signature, Space> Send for MoveOnlyFunction<S, Space, Sendable> {}
