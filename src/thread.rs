//! Thread-safety markers, passed as the last type parameter of the
//! containers.
//!
//! The payload type is erased, so a container cannot tell on its own whether
//! it may cross threads. The marker decides up front: [`Local`] containers
//! accept any payload and are not [`Send`]; [`Sendable`] containers accept
//! only [`Send`] payloads and are [`Send`] themselves.
//!
//! ```
//! use smallfn::thread::Sendable;
//! use smallfn::space::S1;
//! use smallfn::MoveOnlyFunction;
//!
//! let base = 40u32;
//! let mut f: MoveOnlyFunction<fn(u32) -> u32, S1, Sendable> =
//!     MoveOnlyFunction::new(move |x: u32| base + x);
//!
//! let answer = std::thread::spawn(move || f.call(2)).join().unwrap();
//! assert_eq!(answer, 42);
//! ```
//!
//! A payload that is not [`Send`] is rejected:
//!
//! ```compile_fail
//! use std::rc::Rc;
//! use smallfn::thread::Sendable;
//! use smallfn::space::S1;
//! use smallfn::MoveOnlyFunction;
//!
//! let shared = Rc::new(7);
//! let f: MoveOnlyFunction<fn() -> i32, S1, Sendable> =
//!     MoveOnlyFunction::new(move || *shared);
//! ```
//!
//! And a [`Local`] container stays on its thread:
//!
//! ```compile_fail
//! use smallfn::MoveOnlyFunction;
//!
//! let mut f: MoveOnlyFunction<fn() -> i32> = MoveOnlyFunction::new(|| 7);
//! std::thread::spawn(move || f.call());
//! ```

mod sealed {
    pub trait Sealed {}

    pub trait Admits<F> {}

    impl Sealed for super::Local {}
    impl Sealed for super::Sendable {}

    impl<F> Admits<F> for super::Local {}
    impl<F: Send> Admits<F> for super::Sendable {}
}

/// A thread-safety marker.
pub trait Threading: sealed::Sealed + 'static {}

/// Implemented by the markers whose containers may hold a payload `F`.
pub trait Accepts<F>: Threading + sealed::Admits<F> {}

impl<T: Threading + sealed::Admits<F>, F> Accepts<F> for T {}

/// Containers pinned to their thread. Accepts any payload. This is the
/// default.
#[derive(Debug)]
pub enum Local {}

/// Containers that may move to another thread. Accepts only [`Send`]
/// payloads.
#[derive(Debug)]
pub enum Sendable {}

impl Threading for Local {}
impl Threading for Sendable {}
