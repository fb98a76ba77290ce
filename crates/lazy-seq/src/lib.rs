//! Lazy sequence combinators
//!
//! Small, pull-based building blocks over anything iterable. Every combinator
//! is an explicit cursor struct implementing [`Iterator`]; nothing is computed
//! until the consumer asks for the next element.
//!
//! # Combinators
//!
//! - [`take`] - at most `n` elements from the front of a sequence
//! - [`chunk`] - consecutive groups of up to `size` elements
//! - [`map`] - apply a function to each element at consumption time
//! - [`Seq`] / [`SeqExt`] - fluent wrapper for chaining the three
//!
//! None of these know anything about futures or scheduling. They only shape
//! the sequence; callers decide what the elements mean.
//!
//! # Example
//!
//! ```rust
//! use lazy_seq::SeqExt;
//!
//! let sizes: Vec<usize> = (1..=7)
//!     .lazy()
//!     .chunk(3)
//!     .map(|group| group.len())
//!     .into_iter()
//!     .collect();
//!
//! assert_eq!(sizes, vec![3, 3, 1]);
//! ```

mod chunk;
mod fluent;
mod map;
mod take;

pub use chunk::{chunk, Chunk};
pub use fluent::{Seq, SeqExt};
pub use map::{map, Map};
pub use take::{take, Take};
