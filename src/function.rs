use core::fmt;
use core::marker::PhantomData;

use crate::error::BadFunctionCall;
use crate::move_only::MoveOnlyFunction;
use crate::raw::RawFunction;
use crate::signature::{Invoke, Signature};
use crate::space::S1;
use crate::thread::{Accepts, Local, Sendable, Threading};
use crate::vtable::{CloneVTable, Form, Table};

/// A clonable container for any clonable callable matching the signature `S`.
///
/// Works like [`MoveOnlyFunction`], but only accepts [`Clone`] payloads and
/// is [`Clone`] itself. Every clone owns an independent copy of the payload.
/// `T` is a [thread-safety marker](crate::thread), as for
/// [`MoveOnlyFunction`].
///
/// # Example
///
/// ```
/// use smallfn::Function;
///
/// let mut count = 0;
/// let mut a: Function<fn() -> i32> = Function::new(move || {
///     count += 1;
///     count
/// });
///
/// assert_eq!(a.call(), 1);
/// let mut b = a.clone();
/// assert_eq!(b.call(), 2);
/// assert_eq!(b.call(), 3);
/// assert_eq!(a.call(), 2);
/// ```
///
/// Payloads that are not [`Clone`] are rejected at compile time:
///
/// ```compile_fail
/// use smallfn::Function;
///
/// struct Token;
///
/// impl Token {
///     fn get(&self) -> u32 {
///         7
///     }
/// }
///
/// let token = Token;
/// let f: Function<fn() -> u32> = Function::new(move || token.get());
/// ```
pub struct Function<S: Signature, Space = S1, T: Threading = Local> {
    raw: RawFunction<S, Space, CloneVTable<S>>,
    _thread: PhantomData<T>,
}

impl<S: Signature, Space, T: Threading> Function<S, Space, T> {
    /// Creates an empty container.
    #[inline]
    pub const fn empty() -> Self {
        Function {
            raw: RawFunction::empty(),
            _thread: PhantomData,
        }
    }

    /// Stores `f` inline if it fits in `Space`, otherwise on the heap.
    #[inline]
    pub fn new<F: Invoke<S> + Clone + 'static>(f: F) -> Self
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
    #[inline]
    pub fn from_fn(f: S) -> Self {
        Function {
            raw: unsafe { RawFunction::from_fn(CloneVTable::<S>::for_fn(), f) },
            _thread: PhantomData,
        }
    }

    /// Replaces the payload with `f`, dropping the previous payload first.
    #[inline]
    pub fn set<F: Invoke<S> + Clone + 'static>(&mut self, f: F)
    where
        T: Accepts<F>,
    {
        unsafe { self.raw.store(CloneVTable::<S>::of::<F, Space>(), f) }
    }

    /// Replaces the payload with a plain function pointer.
    #[inline]
    pub fn set_fn(&mut self, f: S) {
        unsafe { self.raw.store_fn(CloneVTable::<S>::for_fn(), f) }
    }

    /// Drops the payload, leaving the container empty.
    #[inline]
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Moves the payload out into a new container, leaving `self` empty.
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

    /// Converts into a [`MoveOnlyFunction`] holding the same payload, without
    /// copying or reallocating it.
    ///
    /// # Example
    ///
    /// ```
    /// use smallfn::{Function, MoveOnlyFunction};
    ///
    /// let f: Function<fn() -> i32> = Function::new(|| 1337);
    /// let mut g: MoveOnlyFunction<fn() -> i32> = f.into_move_only();
    /// assert_eq!(g.call(), 1337);
    /// ```
    #[inline]
    pub fn into_move_only(self) -> MoveOnlyFunction<S, Space, T> {
        MoveOnlyFunction::from_raw(self.raw.map_vtable(|vtable| vtable.ops()))
    }
}

impl<S: Signature, Space, T: Threading> Clone for Function<S, Space, T> {
    fn clone(&self) -> Self {
        let mut out = Self::empty();
        out.clone_from(self);
        out
    }

    fn clone_from(&mut self, source: &Self) {
        self.raw.clear();
        if let Some(vtable) = source.raw.vtable() {
            unsafe {
                vtable.duplicate(source.raw.slot_ptr(), self.raw.slot());
                self.raw.assume_init(vtable);
            }
        }
    }
}

impl<S: Signature, Space, T: Threading> Default for Function<S, Space, T> {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

impl<S: Signature, Space, T: Threading> From<S> for Function<S, Space, T> {
    #[inline]
    fn from(f: S) -> Self {
        Self::from_fn(f)
    }
}

impl<S: Signature, Space, T: Threading> From<Function<S, Space, T>>
    for MoveOnlyFunction<S, Space, T>
{
    #[inline]
    fn from(f: Function<S, Space, T>) -> Self {
        f.into_move_only()
    }
}

impl<S: Signature, Space, T: Threading> fmt::Debug for Function<S, Space, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.raw.debug("Function", f)
    }
}

// SAFETY: `Sendable` only admits `Send` payloads, and function pointers are
// always `Send`.
unsafe impl<S: Signature, Space> Send for Function<S, Space, Sendable> {}
