//! Element-wise mapping combinator

use std::iter::FusedIterator;

/// Lazy sequence of `f(x)` for every `x` in a source
///
/// Created by [`map`]. `f` runs when an element is pulled, never ahead of time.
#[derive(Clone)]
#[must_use = "combinators are lazy and do nothing unless consumed"]
pub struct Map<I, F> {
    iter: I,
    f: F,
}

/// Apply `f` to each element of `sequence`, in order, on demand
///
/// # Example
///
/// ```rust
/// let doubled: Vec<i32> = lazy_seq::map(|x| x * 2, vec![1, 2, 3]).collect();
/// assert_eq!(doubled, vec![2, 4, 6]);
/// ```
pub fn map<S, F, B>(f: F, sequence: S) -> Map<S::IntoIter, F>
where
    S: IntoIterator,
    F: FnMut(S::Item) -> B,
{
    Map {
        iter: sequence.into_iter(),
        f,
    }
}

impl<I, F> std::fmt::Debug for Map<I, F>
where
    I: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Map").field("iter", &self.iter).finish_non_exhaustive()
    }
}

impl<I, F, B> Iterator for Map<I, F>
where
    I: Iterator,
    F: FnMut(I::Item) -> B,
{
    type Item = B;

    fn next(&mut self) -> Option<B> {
        self.iter.next().map(&mut self.f)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<I, F, B> FusedIterator for Map<I, F>
where
    I: FusedIterator,
    F: FnMut(I::Item) -> B,
{
}
