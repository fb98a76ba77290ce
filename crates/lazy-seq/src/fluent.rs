//! Fluent chaining over the combinators

use crate::{chunk, map, take, Chunk, Map, Take};

/// A lazy sequence that can be reshaped left-to-right
///
/// `Seq` holds an iterator and offers [`take`](Seq::take),
/// [`chunk`](Seq::chunk) and [`map`](Seq::map) as methods, each returning a
/// new `Seq` around the corresponding combinator. Turn it back into a plain
/// iterator with [`IntoIterator`] or [`Seq::into_inner`].
///
/// # Example
///
/// ```rust
/// use lazy_seq::Seq;
///
/// let batches: Vec<String> = Seq::new(["a", "b", "c", "d", "e"])
///     .chunk(2)
///     .map(|group| group.concat())
///     .into_iter()
///     .collect();
///
/// assert_eq!(batches, vec!["ab", "cd", "e"]);
/// ```
#[derive(Debug, Clone)]
#[must_use = "combinators are lazy and do nothing unless consumed"]
pub struct Seq<I> {
    iter: I,
}

impl<I> Seq<I>
where
    I: Iterator,
{
    /// Wrap anything iterable
    pub fn new<S>(sequence: S) -> Self
    where
        S: IntoIterator<IntoIter = I>,
    {
        Self {
            iter: sequence.into_iter(),
        }
    }

    /// Keep at most `n` elements from the front
    pub fn take(self, n: usize) -> Seq<Take<I>> {
        Seq {
            iter: take(n, self.iter),
        }
    }

    /// Group into consecutive `Vec`s of up to `size` elements
    ///
    /// # Panics
    ///
    /// Panics if `size` is 0.
    pub fn chunk(self, size: usize) -> Seq<Chunk<I>> {
        Seq {
            iter: chunk(size, self.iter),
        }
    }

    /// Apply `f` to each element on demand
    pub fn map<F, B>(self, f: F) -> Seq<Map<I, F>>
    where
        F: FnMut(I::Item) -> B,
    {
        Seq {
            iter: map(f, self.iter),
        }
    }

    /// Unwrap the underlying iterator
    pub fn into_inner(self) -> I {
        self.iter
    }
}

impl<I> IntoIterator for Seq<I>
where
    I: Iterator,
{
    type Item = I::Item;
    type IntoIter = I;

    fn into_iter(self) -> I {
        self.iter
    }
}

/// Start a fluent [`Seq`] chain from anything iterable
pub trait SeqExt: IntoIterator + Sized {
    /// Wrap `self` in a [`Seq`]
    fn lazy(self) -> Seq<Self::IntoIter> {
        Seq::new(self)
    }
}

impl<S> SeqExt for S where S: IntoIterator {}
