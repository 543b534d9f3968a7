//! Inclusive high-to-low index spans

use core::fmt;
use core::ops::Range;

use crate::LogicError;

/// The index range of a logic vector.
///
/// Vectors are indexed the hardware way: the most significant bit carries
/// the highest index and indices run down to `end`, both ends inclusive, so
/// `Span::new(31, 0)` describes a 32-bit value. A span translates between
/// this external index domain and the internal offset domain `0..len`,
/// where offset 0 is the most significant bit.
///
/// Negative external indices count from the most significant end: `-1` is
/// the MSB, `-2` the bit below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    start: isize,
    end: isize,
}

impl Span {
    /// The distinguished zero-length span.
    pub const EMPTY: Span = Span { start: -1, end: 0 };

    /// Create a span running from `start` down to `end`, both inclusive.
    ///
    /// Fails with [`LogicError::BadValue`] when `start < end`.
    pub fn new(start: usize, end: usize) -> Result<Self, LogicError> {
        if start < end {
            return Err(LogicError::BadValue(format!("{start}:{end}")));
        }

        Ok(Self {
            start: start as isize,
            end: end as isize,
        })
    }

    /// The span `[len - 1 : 0]`, or the empty span for `len == 0`.
    pub fn sized(len: usize) -> Self {
        Self {
            start: len as isize - 1,
            end: 0,
        }
    }

    /// Number of indices covered by this span.
    pub const fn len(&self) -> usize {
        if self.start < self.end {
            0
        } else {
            (self.start - self.end + 1) as usize
        }
    }

    /// Whether this span covers no indices.
    pub const fn is_empty(&self) -> bool {
        self.start < self.end
    }

    /// The most significant (highest) index. `-1` for the empty span.
    pub const fn start(&self) -> isize {
        self.start
    }

    /// The least significant (lowest) index. `0` for the empty span.
    pub const fn end(&self) -> isize {
        self.end
    }

    /// Resolve an external index to its absolute position, handling
    /// negative indices.
    fn resolve(&self, index: isize) -> Result<isize, LogicError> {
        let resolved = if index < 0 {
            self.start - (-index - 1)
        } else {
            index
        };

        if resolved < self.end || resolved > self.start {
            return Err(LogicError::OutOfBounds(index));
        }

        Ok(resolved)
    }

    /// Translate an external index into an internal offset.
    pub fn map(&self, index: isize) -> Result<usize, LogicError> {
        Ok((self.start - self.resolve(index)?) as usize)
    }

    /// Translate an inclusive external sub-range into an internal half-open
    /// offset range.
    ///
    /// `hi` defaults to `start`, `lo` to `end`. The endpoints must respect
    /// the high-to-low ordering of the span; a reversed pair fails with
    /// [`LogicError::BadValue`].
    pub fn map_range(
        &self,
        hi: Option<isize>,
        lo: Option<isize>,
    ) -> Result<Range<usize>, LogicError> {
        let hi = match hi {
            Some(index) => self.resolve(index)?,
            None => self.start,
        };
        let lo = match lo {
            Some(index) => self.resolve(index)?,
            None => self.end,
        };

        if hi < lo {
            return Err(LogicError::BadValue(format!("{hi}:{lo}")));
        }

        Ok((self.start - hi) as usize..(self.start - lo + 1) as usize)
    }

    /// Translate an internal offset back into an external index.
    ///
    /// The inverse of [`Span::map`]; negative offsets count back from the
    /// least significant end.
    pub fn rmap(&self, offset: isize) -> Result<usize, LogicError> {
        let resolved = if offset < 0 {
            self.len() as isize - (-offset - 1)
        } else {
            offset
        };

        let index = self.start - resolved;
        if index < self.end || index > self.start {
            return Err(LogicError::OutOfBounds(offset));
        }

        Ok(index as usize)
    }

    /// Widen this span by `delta` indices at the most significant end.
    ///
    /// Growing the empty span yields `[delta - 1 : 0]`.
    pub(crate) fn grown(self, delta: usize) -> Span {
        Span {
            start: self.start + delta as isize,
            end: self.end,
        }
    }

    /// Translate an internal half-open offset range back into the external
    /// sub-span it covers.
    ///
    /// The inverse of [`Span::map_range`]. An empty range yields
    /// [`Span::EMPTY`].
    pub fn rmap_range(&self, range: Range<usize>) -> Result<Span, LogicError> {
        if range.is_empty() {
            return Ok(Self::EMPTY);
        }

        let start = self.rmap(range.start as isize)?;
        let end = self.rmap(range.end as isize - 1)?;
        Self::new(start, end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }

        write!(f, "{}:{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_reversed_bounds() {
        assert!(Span::new(0, 31).is_err());
        assert!(Span::new(31, 0).is_ok());
        assert!(Span::new(4, 4).is_ok());
    }

    #[test]
    fn empty_has_no_indices() {
        assert_eq!(Span::EMPTY.len(), 0);
        assert!(Span::EMPTY.is_empty());
        assert_eq!(Span::sized(0), Span::EMPTY);
        assert!(Span::EMPTY.map(0).is_err());
    }

    #[test]
    fn sized_matches_new() {
        assert_eq!(Span::sized(8), Span::new(7, 0).unwrap());
        assert_eq!(Span::sized(1), Span::new(0, 0).unwrap());
    }
}
