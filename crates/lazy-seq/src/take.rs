//! Take-first-N combinator

use std::iter::FusedIterator;

/// Lazy sequence of at most `n` elements pulled from the front of a source
///
/// Created by [`take`]. The source cursor is consumed as elements are
/// produced, so passing `&mut iter` leaves `iter` positioned right after the
/// last element taken. This is what [`chunk`](crate::chunk) relies on.
#[derive(Debug, Clone)]
#[must_use = "combinators are lazy and do nothing unless consumed"]
pub struct Take<I> {
    /// Underlying cursor
    iter: I,
    /// Elements still allowed to be produced
    remaining: usize,
}

/// Produce at most `n` elements from the front of `sequence`
///
/// Terminates early when the source runs out before `n` elements. Once this
/// sequence has ended it never pulls from the source again.
///
/// # Example
///
/// ```rust
/// let mut source = vec!['a', 'b', 'c', 'd'].into_iter();
///
/// let front: Vec<char> = lazy_seq::take(2, &mut source).collect();
/// assert_eq!(front, vec!['a', 'b']);
///
/// // The rest of the source is still there
/// assert_eq!(source.next(), Some('c'));
///
/// // Shorter source: stops early
/// let all: Vec<i32> = lazy_seq::take(10, vec![1, 2]).collect();
/// assert_eq!(all, vec![1, 2]);
/// ```
pub fn take<S>(n: usize, sequence: S) -> Take<S::IntoIter>
where
    S: IntoIterator,
{
    Take {
        iter: sequence.into_iter(),
        remaining: n,
    }
}

impl<I> Iterator for Take<I>
where
    I: Iterator,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        match self.iter.next() {
            Some(item) => {
                self.remaining -= 1;
                Some(item)
            }
            None => {
                // Source exhausted: never touch it again
                self.remaining = 0;
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.remaining == 0 {
            return (0, Some(0));
        }

        let (lower, upper) = self.iter.size_hint();
        let lower = lower.min(self.remaining);
        let upper = upper.map_or(self.remaining, |upper| upper.min(self.remaining));
        (lower, Some(upper))
    }
}

impl<I> FusedIterator for Take<I> where I: Iterator {}
