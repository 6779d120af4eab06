//! Storage mechanics shared by both container flavors.

use core::cell::UnsafeCell;
use core::fmt;
use core::marker::PhantomData;
use core::mem::{ManuallyDrop, MaybeUninit};

use crate::error::{empty_call, BadFunctionCall};
use crate::signature::Signature;
use crate::vtable::{self, Form, Table};

/// A table pointer plus a storage slot.
///
/// Empty iff `vtable` is `None`; the slot is never read while empty.
///
/// The slot sits in an `UnsafeCell` because payloads may carry interior
/// mutability, which a shared borrow of the container must still allow.
pub(crate) struct RawFunction<S: Signature, Space, V: Table<S>> {
    vtable: Option<&'static V>,
    space: UnsafeCell<MaybeUninit<Space>>,
    // The erased payload may be neither `Send` nor `Sync`.
    _phantom: PhantomData<(S, *const ())>,
}

impl<S: Signature, Space, V: Table<S>> RawFunction<S, Space, V> {
    #[inline]
    pub(crate) const fn empty() -> Self {
        RawFunction {
            vtable: None,
            space: UnsafeCell::new(MaybeUninit::uninit()),
            _phantom: PhantomData,
        }
    }

    /// Stores the function pointer `f` in the pointer form.
    ///
    /// # Safety
    ///
    /// `vtable` must be the pointer-form table for `S`.
    #[inline]
    pub(crate) unsafe fn from_fn(vtable: &'static V, f: S) -> Self {
        let mut raw = Self::empty();
        raw.store_fn(vtable, f);
        raw
    }

    /// Replaces the payload with `f`, dropping the old one first.
    ///
    /// # Safety
    ///
    /// `vtable` must be the table created for `F` stored in `Space`.
    #[inline]
    pub(crate) unsafe fn store<F>(&mut self, vtable: &'static V, f: F) {
        const { assert_holds_pointer::<Space>() };

        self.clear();
        crate::vtable::store::<F, Space>(self.slot(), f);
        self.vtable = Some(vtable);
    }

    /// Replaces the payload with the function pointer `f`.
    ///
    /// # Safety
    ///
    /// Same as [`RawFunction::from_fn`].
    #[inline]
    pub(crate) unsafe fn store_fn(&mut self, vtable: &'static V, f: S) {
        const { assert_holds_pointer::<Space>() };

        self.clear();
        self.slot().cast::<S>().write(f);
        self.vtable = Some(vtable);
    }

    #[inline]
    pub(crate) fn vtable(&self) -> Option<&'static V> {
        self.vtable
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.vtable.is_none()
    }

    #[inline]
    pub(crate) fn form(&self) -> Option<Form> {
        self.vtable.map(|vtable| vtable.ops().form())
    }

    #[inline]
    pub(crate) fn slot(&mut self) -> *mut () {
        self.space.get().cast()
    }

    /// Pointer to the slot through a shared borrow. Carries read-write
    /// permission, so payloads with interior mutability may be used through
    /// it.
    #[inline]
    pub(crate) fn slot_ptr(&self) -> *const () {
        self.space.get().cast_const().cast()
    }

    /// Drops the payload, if any, leaving the container empty.
    #[inline]
    pub(crate) fn clear(&mut self) {
        // Detach first, so a panicking destructor cannot cause a double drop.
        if let Some(vtable) = self.vtable.take() {
            unsafe { vtable.ops().destruct(self.slot()) }
        }
    }

    /// Moves the payload of `src` into `self`, dropping the old payload of
    /// `self` first. `src` is left empty.
    #[inline]
    pub(crate) fn move_from(&mut self, src: &mut Self) {
        self.clear();
        if let Some(vtable) = src.vtable.take() {
            unsafe { vtable.ops().relocate(src.slot(), self.slot()) };
            self.vtable = Some(vtable);
        }
    }

    /// Marks the slot as filled by `vtable`.
    ///
    /// # Safety
    ///
    /// The container must be empty and the slot must hold a payload matching
    /// `vtable`.
    #[inline]
    pub(crate) unsafe fn assume_init(&mut self, vtable: &'static V) {
        debug_assert!(self.vtable.is_none());
        self.vtable = Some(vtable);
    }

    #[inline]
    #[track_caller]
    pub(crate) fn invoke(&mut self, args: S::Args) -> S::Output {
        match self.vtable {
            Some(vtable) => unsafe { vtable.ops().invoke(self.slot(), args) },
            None => empty_call(),
        }
    }

    #[inline]
    pub(crate) fn try_invoke(&mut self, args: S::Args) -> Result<S::Output, BadFunctionCall> {
        match self.vtable {
            Some(vtable) => Ok(unsafe { vtable.ops().invoke(self.slot(), args) }),
            None => Err(BadFunctionCall),
        }
    }

    /// # Safety
    ///
    /// The container must not be empty.
    #[inline]
    pub(crate) unsafe fn invoke_unchecked(&mut self, args: S::Args) -> S::Output {
        debug_assert!(self.vtable.is_some(), "{}", BadFunctionCall);
        let vtable = self.vtable.unwrap_unchecked();
        vtable.ops().invoke(self.slot(), args)
    }

    /// Re-types the container with another table flavor, keeping the payload.
    #[inline]
    pub(crate) fn map_vtable<W: Table<S>>(
        self,
        map: impl FnOnce(&'static V) -> &'static W,
    ) -> RawFunction<S, Space, W> {
        let this = ManuallyDrop::new(self);
        RawFunction {
            vtable: this.vtable.map(map),
            space: unsafe { core::ptr::read(&this.space) },
            _phantom: PhantomData,
        }
    }

    pub(crate) fn debug(&self, name: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(name)
            .field("form", &self.form())
            .finish()
    }
}

impl<S: Signature, Space, V: Table<S>> Drop for RawFunction<S, Space, V> {
    fn drop(&mut self) {
        self.clear();
    }
}

const fn assert_holds_pointer<Space>() {
    assert!(
        vtable::holds_pointer::<Space>(),
        "the space must be at least as large and as aligned as a pointer"
    );
}
