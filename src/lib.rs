//! # smallfn: Callable Containers with Small-Buffer Optimization
//!
//! [`MoveOnlyFunction`] and [`Function`] hold any callable matching a call
//! signature behind a fixed-size handle, without the caller knowing the
//! concrete type. Small payloads live inline in the handle; larger ones
//! automatically fall back to a heap allocation.
//!
//! ## Core Concept
//!
//! `Box<dyn FnMut(..)>` always heap-allocates, even for a closure that
//! captures a single pointer. The containers here instead classify every
//! payload at compile time into one of three [`Form`]s:
//!
//! - **Pointer**: a plain function pointer, stored as-is.
//! - **Inline**: the payload fits in the inline space, stored in place.
//! - **Heap**: everything else, boxed.
//!
//! All later operations go through a static per-payload dispatch table, so
//! the handle is just one table pointer plus the inline space: two pointer
//! widths with the default space.
//!
//! ## Quick Start
//!
//! Add smallfn to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! smallfn = "0.1"
//! ```
//!
//! The signature is spelled as a function-pointer type:
//!
//! ```rust
//! use smallfn::MoveOnlyFunction;
//!
//! fn foo(_: i32, _: char) -> usize {
//!     42
//! }
//!
//! // Function pointers
//! let mut f = MoveOnlyFunction::<fn(i32, char) -> usize>::from_fn(foo);
//! assert_eq!(f.call(1, '*'), 42);
//!
//! // Closures with small captures are stored inline
//! let base = 1000usize;
//! f.set(move |i: i32, _: char| base + i as usize);
//! assert!(f.is_inline());
//! assert_eq!(f.call(337, '*'), 1337);
//!
//! // Large captures automatically use heap allocation
//! let table = [1usize, 2, 3, 4];
//! f.set(move |i: i32, _: char| table[i as usize]);
//! assert!(f.is_heap());
//! assert_eq!(f.call(3, '*'), 4);
//! ```
//!
//! ## Move-only and Clonable
//!
//! [`MoveOnlyFunction`] accepts any payload, including ones owning unique
//! resources. [`Function`] only accepts [`Clone`] payloads and is [`Clone`]
//! itself; every clone gets an independent copy of the payload. A
//! [`Function`] converts into a [`MoveOnlyFunction`] for free, but not the
//! other way around.
//!
//! ```rust
//! use smallfn::{Function, MoveOnlyFunction};
//!
//! let greeting = String::from("hello");
//! let mut f: Function<fn() -> usize> = Function::new(move || greeting.len());
//! let mut g = f.clone();
//! assert_eq!(f.call(), g.call());
//!
//! let mut h: MoveOnlyFunction<fn() -> usize> = g.into();
//! assert_eq!(h.call(), 5);
//! ```
//!
//! ## Empty Containers
//!
//! Containers start out empty. Calling an empty container with `call` panics;
//! `try_call` reports a [`BadFunctionCall`] instead:
//!
//! ```rust
//! use smallfn::{BadFunctionCall, MoveOnlyFunction};
//!
//! let mut f: MoveOnlyFunction<fn() -> i32> = MoveOnlyFunction::default();
//! assert!(f.is_empty());
//! assert_eq!(f.try_call(), Err(BadFunctionCall));
//! ```
//!
//! ## Configuration
//!
//! ### Feature Flags
//!
//! - **`std`** (enabled by default)
//!   - Links to the standard library
//!   - Calling an empty container panics with a [`BadFunctionCall`] payload,
//!     recoverable with `std::panic::catch_unwind`
//!   - Disable for `#![no_std]` environments: `default-features = false`
//!
//! ### Custom Space Types
//!
//! The inline space defaults to [`space::S1`], one pointer width. A larger
//! space keeps larger payloads inline at the cost of a larger handle:
//!
//! ```rust
//! use smallfn::MoveOnlyFunction;
//! use smallfn::space::S4;
//!
//! let table = [1usize, 2, 3, 4];
//! let f: MoveOnlyFunction<fn(usize) -> usize, S4> =
//!     MoveOnlyFunction::new(move |i: usize| table[i]);
//! assert!(f.is_inline());
//! ```
//!
//! **Important**: Space alignment matters! If the space alignment is smaller
//! than the payload's required alignment, the payload is heap-allocated
//! regardless of size. A space must be able to hold a pointer.
//!
//! ## Thread Safety
//!
//! The payload type is erased, so by default the containers are neither
//! [`Send`] nor [`Sync`]. The [`thread::Sendable`] marker, passed as the last
//! type parameter, admits only [`Send`] payloads and makes the container
//! [`Send`]:
//!
//! ```rust
//! use smallfn::space::S1;
//! use smallfn::thread::Sendable;
//! use smallfn::Function;
//!
//! let name = String::from("worker");
//! let f: Function<fn() -> usize, S1, Sendable> = Function::new(move || name.len());
//! let mut g = f.clone();
//!
//! std::thread::spawn(move || assert_eq!(g.call(), 6)).join().unwrap();
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]
#![deny(clippy::as_conversions)]

extern crate alloc;

mod call;
mod error;
mod function;
mod move_only;
mod raw;
mod signature;
pub mod space;
pub mod thread;
mod vtable;

pub use crate::error::BadFunctionCall;
pub use crate::function::Function;
pub use crate::move_only::MoveOnlyFunction;
pub use crate::signature::{Invoke, Signature};
pub use crate::vtable::Form;
