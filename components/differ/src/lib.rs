//! Duplex difference engine.
//!
//! Turns two texts into an ordered sequence of [`DiffPart`]s: runs of lines
//! both texts share and runs of lines that only one of them has. The
//! computation is pure and deterministic; concatenating the left renderings
//! of the parts reproduces the first text and the right renderings the
//! second.

pub mod diff;
pub mod part;

pub use diff::{DiffAlgorithm, DiffOp, MyersDiff};
pub use part::{DiffPart, difference, difference_with, split_lines};
