//! Fixed-size chunking combinator

use crate::take::take;
use std::iter::FusedIterator;

/// Lazy sequence of groups of up to `size` consecutive elements
///
/// Created by [`chunk`]. Each group is materialized with [`take`] over the
/// shared source cursor, so groups never overlap and never reorder elements.
///
/// # Termination
///
/// - An empty source yields zero groups (not one empty group)
/// - The last group may be shorter than `size`
/// - As soon as a group shorter than `size` has been produced, the source is
///   never pulled again
#[derive(Debug, Clone)]
#[must_use = "combinators are lazy and do nothing unless consumed"]
pub struct Chunk<I> {
    /// Shared source cursor
    iter: I,
    /// Maximum group length (always > 0)
    size: usize,
    /// Set once a short group (or no group) came out of the source
    done: bool,
}

/// Split `sequence` into consecutive groups of up to `size` elements
///
/// # Panics
///
/// Panics if `size` is 0: a zero-sized group can never make progress.
///
/// # Example
///
/// ```rust
/// let groups: Vec<Vec<u32>> = lazy_seq::chunk(3, 1..=7).collect();
/// assert_eq!(groups, vec![vec![1, 2, 3], vec![4, 5, 6], vec![7]]);
///
/// let none: Vec<Vec<u32>> = lazy_seq::chunk(3, Vec::new()).collect();
/// assert!(none.is_empty());
/// ```
pub fn chunk<S>(size: usize, sequence: S) -> Chunk<S::IntoIter>
where
    S: IntoIterator,
{
    assert!(size > 0, "Chunk size must be at least one");
    Chunk {
        iter: sequence.into_iter(),
        size,
        done: false,
    }
}

impl<I> Chunk<I> {
    /// The configured group length
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }
}

impl<I> Iterator for Chunk<I>
where
    I: Iterator,
{
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let group: Vec<I::Item> = take(self.size, &mut self.iter).collect();
        if group.len() < self.size {
            self.done = true;
        }

        if group.is_empty() {
            None
        } else {
            Some(group)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }

        let (lower, upper) = self.iter.size_hint();
        (
            lower.div_ceil(self.size),
            upper.map(|upper| upper.div_ceil(self.size)),
        )
    }
}

impl<I> FusedIterator for Chunk<I> where I: Iterator {}
