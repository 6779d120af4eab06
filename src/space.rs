//! Inline storage spaces.
//!
//! A space type only contributes its size and alignment: a payload is stored
//! inline when it is no larger and no more aligned than the space, otherwise
//! it is boxed and the space holds the pointer. Every space must therefore be
//! able to hold at least one pointer.
//!
//! Any `Sized` type works as a space, e.g. `[usize; 3]`.

/// Space with one pointer width. This is the default.
pub type S1 = [usize; 1];
/// Space with two pointer widths.
pub type S2 = [usize; 2];
/// Space with four pointer widths.
pub type S4 = [usize; 4];
/// Space with eight pointer widths.
pub type S8 = [usize; 8];
/// Space with sixteen pointer widths.
pub type S16 = [usize; 16];
/// Space with thirty-two pointer widths.
pub type S32 = [usize; 32];
/// Space with sixty-four pointer widths.
pub type S64 = [usize; 64];
