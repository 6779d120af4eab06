//! Per-payload dispatch tables.
//!
//! Tables are `&'static` values built inside inline `const` blocks, one per
//! payload type, signature and storage form. A container never records the
//! payload type anywhere else: which table it points at is the type tag.
//!
//! Every entry receives a pointer to the container's storage slot. For the
//! pointer and inline forms the slot holds the value itself; for the heap form
//! it holds a `*mut F` obtained from [`Box::into_raw`].
//!
//! # Safety Invariant
//!
//! A table must only be applied to a slot that was filled for the same
//! payload type, signature and form the table was created with. Tables are
//! only reachable through [`MoveVTable::of`], [`MoveVTable::for_fn`],
//! [`CloneVTable::of`] and [`CloneVTable::for_fn`], which pair the entries
//! with the matching [`store`] form at compile time.

use alloc::boxed::Box;
use core::mem;
use core::ptr;

use crate::signature::{Invoke, Signature};

/// Storage form of a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Form {
    /// A plain function pointer kept in the slot. Nothing to drop.
    Pointer,
    /// The payload itself kept in the slot.
    Inline,
    /// The payload boxed, with the box pointer kept in the slot.
    Heap,
}

impl Form {
    /// Classifies a payload of type `F` for storage in `Space`.
    ///
    /// Resolved at compile time. Function pointers only take the
    /// [`Form::Pointer`] form through the dedicated `from_fn` entry points,
    /// so this never returns it.
    pub const fn of<F, Space>() -> Form {
        if fits_inline::<F, Space>() {
            Form::Inline
        } else {
            Form::Heap
        }
    }
}

/// Whether a value of type `F` can be stored directly in `Space`.
pub(crate) const fn fits_inline<F, Space>() -> bool {
    mem::size_of::<F>() <= mem::size_of::<Space>()
        && mem::align_of::<F>() <= mem::align_of::<Space>()
}

/// Whether `Space` is large enough for the pointer and heap forms.
pub(crate) const fn holds_pointer<Space>() -> bool {
    fits_inline::<*mut (), Space>()
}

/// Entries shared by both container flavors.
pub(crate) struct MoveVTable<S: Signature> {
    form: Form,
    destruct: unsafe fn(*mut ()),
    relocate: unsafe fn(*mut (), *mut ()),
    invoke: unsafe fn(*mut (), S::Args) -> S::Output,
}

/// Entries of the copyable flavor. Embeds the move-only table, so a copyable
/// container degrades to a move-only one by pointing at `base`.
pub(crate) struct CloneVTable<S: Signature> {
    base: MoveVTable<S>,
    clone: unsafe fn(*const (), *mut ()),
}

/// Access to the move-only entries of any table.
pub(crate) trait Table<S: Signature>: 'static {
    fn ops(&self) -> &MoveVTable<S>;
}

impl<S: Signature> Table<S> for MoveVTable<S> {
    #[inline]
    fn ops(&self) -> &MoveVTable<S> {
        self
    }
}

impl<S: Signature> Table<S> for CloneVTable<S> {
    #[inline]
    fn ops(&self) -> &MoveVTable<S> {
        &self.base
    }
}

impl<S: Signature> MoveVTable<S> {
    /// Returns the table for payload `F` stored in `Space`.
    #[inline]
    pub(crate) fn of<F: Invoke<S> + 'static, Space>() -> &'static Self {
        match Form::of::<F, Space>() {
            Form::Inline => const { &MoveVTable::<S>::inline::<F>() },
            _ => const { &MoveVTable::<S>::heap::<F>() },
        }
    }

    /// Returns the table for a function pointer of signature `S`.
    #[inline]
    pub(crate) fn for_fn() -> &'static Self {
        const { &MoveVTable::<S>::pointer() }
    }

    const fn pointer() -> Self {
        MoveVTable {
            form: Form::Pointer,
            destruct: pointer::destruct,
            relocate: pointer::relocate::<S>,
            invoke: pointer::invoke::<S>,
        }
    }

    const fn inline<F: Invoke<S>>() -> Self {
        MoveVTable {
            form: Form::Inline,
            destruct: inline::destruct::<F>,
            relocate: inline::relocate::<F>,
            invoke: inline::invoke::<S, F>,
        }
    }

    const fn heap<F: Invoke<S>>() -> Self {
        MoveVTable {
            form: Form::Heap,
            destruct: heap::destruct::<F>,
            relocate: heap::relocate::<F>,
            invoke: heap::invoke::<S, F>,
        }
    }

    #[inline]
    pub(crate) fn form(&self) -> Form {
        self.form
    }

    /// Drops the payload in `slot`.
    ///
    /// # Safety
    ///
    /// `slot` must hold a payload matching this table. The slot is logically
    /// uninitialized afterwards.
    #[inline]
    pub(crate) unsafe fn destruct(&self, slot: *mut ()) {
        (self.destruct)(slot)
    }

    /// Moves the payload from `src` into the uninitialized `dst`.
    ///
    /// # Safety
    ///
    /// `src` must hold a payload matching this table and `dst` must be a
    /// distinct slot of the same space. `src` is logically uninitialized
    /// afterwards.
    #[inline]
    pub(crate) unsafe fn relocate(&self, src: *mut (), dst: *mut ()) {
        (self.relocate)(src, dst)
    }

    /// Calls the payload in `slot`.
    ///
    /// # Safety
    ///
    /// `slot` must hold a payload matching this table.
    #[inline]
    pub(crate) unsafe fn invoke(&self, slot: *mut (), args: S::Args) -> S::Output {
        (self.invoke)(slot, args)
    }
}

impl<S: Signature> CloneVTable<S> {
    /// Returns the table for a clonable payload `F` stored in `Space`.
    #[inline]
    pub(crate) fn of<F: Invoke<S> + Clone + 'static, Space>() -> &'static Self {
        match Form::of::<F, Space>() {
            Form::Inline => const {
                &CloneVTable::<S> {
                    base: MoveVTable::<S>::inline::<F>(),
                    clone: inline::clone::<F>,
                }
            },
            _ => const {
                &CloneVTable::<S> {
                    base: MoveVTable::<S>::heap::<F>(),
                    clone: heap::clone::<F>,
                }
            },
        }
    }

    /// Returns the table for a function pointer of signature `S`.
    #[inline]
    pub(crate) fn for_fn() -> &'static Self {
        const {
            &CloneVTable::<S> {
                base: MoveVTable::<S>::pointer(),
                clone: pointer::clone::<S>,
            }
        }
    }

    /// Writes an independent copy of the payload in `src` into `dst`.
    ///
    /// # Safety
    ///
    /// `src` must hold a payload matching this table and `dst` must be an
    /// uninitialized slot of the same space.
    #[inline]
    pub(crate) unsafe fn duplicate(&self, src: *const (), dst: *mut ()) {
        (self.clone)(src, dst)
    }
}

/// Moves `f` into the uninitialized `slot` using the form chosen by
/// [`Form::of`].
///
/// # Safety
///
/// `slot` must point to writable storage of type `Space`, and `Space` must
/// hold a pointer.
#[inline]
pub(crate) unsafe fn store<F, Space>(slot: *mut (), f: F) {
    match Form::of::<F, Space>() {
        Form::Inline => slot.cast::<F>().write(f),
        _ => slot.cast::<*mut F>().write(Box::into_raw(Box::new(f))),
    }
}

mod pointer {
    use super::*;

    pub(super) unsafe fn destruct(_slot: *mut ()) {}

    pub(super) unsafe fn relocate<S: Signature>(src: *mut (), dst: *mut ()) {
        dst.cast::<S>().write(src.cast::<S>().read());
    }

    pub(super) unsafe fn invoke<S: Signature>(slot: *mut (), args: S::Args) -> S::Output {
        slot.cast::<S>().read().call_with(args)
    }

    pub(super) unsafe fn clone<S: Signature>(src: *const (), dst: *mut ()) {
        dst.cast::<S>().write(src.cast::<S>().read());
    }
}

mod inline {
    use super::*;

    pub(super) unsafe fn destruct<F>(slot: *mut ()) {
        ptr::drop_in_place(slot.cast::<F>());
    }

    pub(super) unsafe fn relocate<F>(src: *mut (), dst: *mut ()) {
        // Every Rust type is trivially relocatable.
        ptr::copy_nonoverlapping(src.cast::<F>(), dst.cast::<F>(), 1);
    }

    pub(super) unsafe fn invoke<S: Signature, F: Invoke<S>>(
        slot: *mut (),
        args: S::Args,
    ) -> S::Output {
        Invoke::<S>::invoke(&mut *slot.cast::<F>(), args)
    }

    pub(super) unsafe fn clone<F: Clone>(src: *const (), dst: *mut ()) {
        let copy = (*src.cast::<F>()).clone();
        dst.cast::<F>().write(copy);
    }
}

mod heap {
    use super::*;

    pub(super) unsafe fn destruct<F>(slot: *mut ()) {
        drop(Box::from_raw(slot.cast::<*mut F>().read()));
    }

    pub(super) unsafe fn relocate<F>(src: *mut (), dst: *mut ()) {
        let src = src.cast::<*mut F>();
        dst.cast::<*mut F>().write(src.read());
        src.write(ptr::null_mut());
    }

    pub(super) unsafe fn invoke<S: Signature, F: Invoke<S>>(
        slot: *mut (),
        args: S::Args,
    ) -> S::Output {
        Invoke::<S>::invoke(&mut *slot.cast::<*mut F>().read(), args)
    }

    pub(super) unsafe fn clone<F: Clone>(src: *const (), dst: *mut ()) {
        let copy = Box::new((*src.cast::<*const F>().read()).clone());
        dst.cast::<*mut F>().write(Box::into_raw(copy));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::*;

    #[test]
    fn test_classify() {
        assert_eq!(Form::of::<(), S1>(), Form::Inline);
        assert_eq!(Form::of::<usize, S1>(), Form::Inline);
        assert_eq!(Form::of::<[u8; mem::size_of::<usize>()], S1>(), Form::Inline);
        assert_eq!(Form::of::<[u8; mem::size_of::<usize>() + 1], S1>(), Form::Heap);
        assert_eq!(Form::of::<(usize, usize), S1>(), Form::Heap);
        assert_eq!(Form::of::<(usize, usize), S2>(), Form::Inline);
    }

    #[test]
    fn test_classify_alignment() {
        #[allow(dead_code)]
        #[repr(align(64))]
        struct Overaligned;

        assert_eq!(mem::size_of::<Overaligned>(), 0);
        assert_eq!(Form::of::<Overaligned, S64>(), Form::Heap);
    }

    #[test]
    fn test_holds_pointer() {
        assert!(holds_pointer::<S1>());
        assert!(holds_pointer::<[usize; 3]>());
        assert!(!holds_pointer::<[u8; 4]>());
        assert!(!holds_pointer::<[u8; 64]>());
    }

    #[test]
    fn test_table_forms() {
        type Sig = fn() -> usize;
        let small = 7usize;
        let large = [7usize; 2];

        fn table_of<F: Invoke<Sig> + 'static>(_: &F) -> &'static MoveVTable<Sig> {
            MoveVTable::<Sig>::of::<F, S1>()
        }

        assert_eq!(table_of(&move || small).form(), Form::Inline);
        assert_eq!(table_of(&move || large[1]).form(), Form::Heap);
        assert_eq!(MoveVTable::<Sig>::for_fn().form(), Form::Pointer);
        assert_eq!(CloneVTable::<Sig>::for_fn().ops().form(), Form::Pointer);
    }

    #[test]
    fn test_store_and_invoke() {
        type Sig = fn() -> u8;

        fn one() -> u8 {
            1
        }

        let table = MoveVTable::<Sig>::for_fn();
        let f: Sig = one;

        let mut src = mem::MaybeUninit::<S1>::uninit();
        let mut dst = mem::MaybeUninit::<S1>::uninit();
        let src = src.as_mut_ptr().cast::<()>();
        let dst = dst.as_mut_ptr().cast::<()>();
        unsafe {
            src.cast::<Sig>().write(f);
            assert_eq!(table.invoke(src, ()), 1);
            table.relocate(src, dst);
            assert_eq!(table.invoke(dst, ()), 1);
            table.destruct(dst);
        }
    }
}
