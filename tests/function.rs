extern crate smallfn;

use std::cell::Cell;
use std::mem;

use smallfn::space::*;
use smallfn::thread::Sendable;
use smallfn::{Form, Function, MoveOnlyFunction};

thread_local! {
    static LIVE: Cell<isize> = const { Cell::new(0) };
}

fn live() -> isize {
    LIVE.with(Cell::get)
}

fn reset() {
    LIVE.with(|live| live.set(0));
}

/// Counts live instances, including clones. `N` pads the probe to a chosen
/// size.
struct Probe<const N: usize>([u8; N]);

impl<const N: usize> Probe<N> {
    fn new() -> Self {
        LIVE.with(|live| live.set(live.get() + 1));
        Probe([0; N])
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

impl<const N: usize> Clone for Probe<N> {
    fn clone(&self) -> Self {
        LIVE.with(|live| live.set(live.get() + 1));
        Probe(self.0)
    }
}

impl<const N: usize> Drop for Probe<N> {
    fn drop(&mut self) {
        LIVE.with(|live| live.set(live.get() - 1));
    }
}

const WORD: usize = mem::size_of::<usize>();

fn probe_function<const N: usize>() -> Function<fn() -> usize> {
    let probe = Probe::<N>::new();
    Function::new(move || probe.len())
}

fn assert_one_copy_per_clone<const N: usize>(form: Form) {
    reset();

    let a = probe_function::<N>();
    assert_eq!(a.form(), Some(form));
    assert_eq!(live(), 1);

    let mut b = a.clone();
    assert_eq!(b.form(), Some(form));
    assert_eq!(live(), 2);
    assert_eq!(b.call(), N);

    b.clear();
    assert_eq!(live(), 1);

    drop(a);
    assert_eq!(live(), 0);
}

#[test]
fn no_extra_copies() {
    reset();

    let func = probe_function::<0>();
    let mut func2 = probe_function::<0>();
    assert_eq!(live(), 2);
    assert!(!func2.is_empty());

    func2 = Function::default();
    assert!(func2.is_empty());
    assert_eq!(live(), 1);

    func2.clone_from(&func);
    assert_eq!(live(), 2);
    assert!(!func2.is_empty());
}

#[test]
fn one_copy_per_clone() {
    assert_one_copy_per_clone::<0>(Form::Inline);
    assert_one_copy_per_clone::<WORD>(Form::Inline);
    assert_one_copy_per_clone::<{ WORD + 1 }>(Form::Heap);
    assert_one_copy_per_clone::<128>(Form::Heap);
}

#[test]
fn clone_does_not_alias() {
    let mut calls = 0u64;
    let mut a: Function<fn() -> u64> = Function::new(move || {
        calls += 1;
        calls
    });
    assert_eq!(a.call(), 1);

    let mut b = a.clone();
    assert_eq!(b.call(), a.call());
    assert_eq!(b.call(), 3);
    assert_eq!(a.call(), 3);
    assert_eq!(a.call(), 4);
}

#[test]
fn clone_payload_with_cell() {
    #[derive(Clone)]
    struct Tally {
        hits: Cell<u32>,
    }

    impl Tally {
        fn hit(&self) -> u32 {
            self.hits.set(self.hits.get() + 1);
            self.hits.get()
        }
    }

    let tally = Tally { hits: Cell::new(0) };
    let mut a: Function<fn() -> u32> = Function::new(move || tally.hit());
    assert!(a.is_inline());
    assert_eq!(a.call(), 1);

    let b = a.clone();
    let mut c = b.clone();
    assert_eq!(c.call(), 2);
    assert_eq!(a.call(), 2);
    assert_eq!(c.call(), 3);
}

#[test]
fn clone_function_pointer() {
    fn foo(_: i32, _: char) -> usize {
        42
    }

    let a = Function::<fn(i32, char) -> usize>::from_fn(foo);
    let mut b = a.clone();
    drop(a);
    assert_eq!(b.form(), Some(Form::Pointer));
    assert_eq!(b.call(1, '*'), 42);
}

#[test]
fn reassign() {
    let mut func: Function<fn() -> i32> = Function::default();

    assert!(func.is_empty());
    func.set(|| 42);
    assert!(!func.is_empty());
    assert_eq!(func.call(), 42);
    func.set(|| 1337);
    assert!(!func.is_empty());
    assert_eq!(func.call(), 1337);

    let mut func2: Function<fn() -> i32> = Function::default();

    func2.clone_from(&func);
    assert!(!func.is_empty());
    assert!(!func2.is_empty());
    assert_eq!(func.call(), 1337);
    assert_eq!(func2.call(), 1337);
}

#[test]
fn reassign_drops_old_payload_once() {
    reset();

    let mut func = probe_function::<{ WORD * 2 }>();
    assert!(func.is_heap());
    assert_eq!(live(), 1);

    let probe = Probe::<1>::new();
    func.set(move || probe.len());
    assert!(func.is_inline());
    assert_eq!(live(), 1);
    assert_eq!(func.call(), 1);

    func.set_fn(|| 9);
    assert_eq!(live(), 0);
    assert_eq!(func.call(), 9);
}

#[test]
fn take_and_move_from() {
    reset();

    let mut src = probe_function::<{ WORD + 1 }>();
    let mut dst = src.take();
    assert!(src.is_empty());
    assert_eq!(live(), 1);

    let mut copy = dst.clone();
    assert_eq!(live(), 2);

    copy.move_from(&mut dst);
    assert!(dst.is_empty());
    assert_eq!(live(), 1);
    assert_eq!(copy.call(), WORD + 1);

    // Cloning an emptied source yields an empty container.
    let empty = src.clone();
    assert!(empty.is_empty());
}

#[test]
fn into_move_only() {
    reset();

    let heap = probe_function::<64>();
    let inline = probe_function::<1>();
    assert_eq!(live(), 2);

    let mut heap: MoveOnlyFunction<fn() -> usize> = heap.into();
    let mut inline: MoveOnlyFunction<fn() -> usize> = inline.into_move_only();
    assert!(heap.is_heap());
    assert!(inline.is_inline());
    assert_eq!(live(), 2);
    assert_eq!(heap.call(), 64);
    assert_eq!(inline.call(), 1);

    drop(heap);
    drop(inline);
    assert_eq!(live(), 0);
}

#[test]
fn custom_space() {
    reset();

    let probe = Probe::<{ WORD * 4 }>::new();
    let a: Function<fn() -> usize, S4> = Function::new(move || probe.len());
    assert!(a.is_inline());

    let mut b = a.clone();
    assert!(b.is_inline());
    assert_eq!(live(), 2);
    assert_eq!(b.call(), WORD * 4);

    drop(a);
    drop(b);
    assert_eq!(live(), 0);
}

#[test]
fn clone_across_threads() {
    let words = vec!["a", "bb", "ccc"];
    let f: Function<fn(usize) -> usize, S1, Sendable> =
        Function::new(move |i: usize| words[i].len());

    let handles: Vec<_> = (0..3)
        .map(|i| {
            let mut f = f.clone();
            std::thread::spawn(move || f.call(i))
        })
        .collect();
    let lens: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(lens, [1, 2, 3]);

    let mut g: MoveOnlyFunction<fn(usize) -> usize, S1, Sendable> = f.into_move_only();
    assert_eq!(std::thread::spawn(move || g.call(2)).join().unwrap(), 3);
}
