use core::ops::Range;

use crate::util::id::PatternID;

/// The kind of match semantics to use for an automaton.
///
/// The match kind is fixed when an automaton is built. It influences both how
/// the automaton is constructed and which search routines are legal to call
/// on it.
///
/// The default match kind is `Standard`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MatchKind {
    /// Report matches as soon as the automaton discovers them. That is, the
    /// first match reported is the one that ends earliest. When several
    /// patterns end at the same position, the longest one (the pattern
    /// recorded on the trie path itself) is reported first.
    ///
    /// This is the only match kind that supports overlapping searches.
    Standard,
    /// Report only the leftmost matches. When multiple leftmost matches
    /// exist, report the one corresponding to the pattern that was given to
    /// the builder first.
    LeftmostFirst,
    /// Report only the leftmost matches. When multiple leftmost matches
    /// exist, report the longest one. Ties are broken by reporting the
    /// pattern that was given to the builder first.
    LeftmostLongest,
}

impl MatchKind {
    /// Returns true if and only if this is one of the leftmost match kinds.
    #[inline]
    pub fn is_leftmost(&self) -> bool {
        *self == MatchKind::LeftmostFirst
            || *self == MatchKind::LeftmostLongest
    }

    pub(crate) fn is_leftmost_first(&self) -> bool {
        *self == MatchKind::LeftmostFirst
    }

    /// Returns true if and only if overlapping searches are permitted with
    /// this match kind.
    #[inline]
    pub fn supports_overlapping(&self) -> bool {
        *self == MatchKind::Standard
    }
}

impl Default for MatchKind {
    fn default() -> MatchKind {
        MatchKind::Standard
    }
}

/// A representation of a match reported by an automaton.
///
/// A match records the pattern that matched, the length of that pattern and
/// the offset at which the match ended. The start of the match is always
/// derived from the other two, so a match can never disagree with itself.
///
/// Every match guarantees that `len() >= 1` and `start() < end()`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Match {
    /// The pattern ID.
    pattern: PatternID,
    /// The length of the pattern that matched, in bytes.
    len: usize,
    /// The end offset of the match, exclusive.
    end: usize,
}

impl Match {
    /// Create a new match from a pattern ID, the length of the match and the
    /// offset at which it ends.
    ///
    /// # Panics
    ///
    /// This panics if `len == 0` or if `len > end`.
    #[inline]
    pub fn new(pattern: PatternID, len: usize, end: usize) -> Match {
        assert!(len >= 1, "matches must be non-empty");
        assert!(len <= end, "match length {} exceeds end {}", len, end);
        Match { pattern, len, end }
    }

    /// Create a new match from a pattern ID and a byte offset span.
    ///
    /// This is like [`Match::new`], but accepts a `usize` instead of a
    /// [`PatternID`] and a range instead of a length. This panics if the
    /// given `usize` is not representable as a `PatternID` or if the range is
    /// empty.
    #[inline]
    pub fn must(pattern: usize, range: Range<usize>) -> Match {
        assert!(range.start < range.end, "matches must be non-empty");
        Match::new(
            PatternID::must(pattern),
            range.end - range.start,
            range.end,
        )
    }

    /// Returns the ID of the pattern that matched.
    ///
    /// The ID of a pattern is derived from the position in which it was
    /// originally inserted into the corresponding automaton. The first
    /// pattern has identifier `0`, and each subsequent pattern is `1`, `2`
    /// and so on.
    #[inline]
    pub fn pattern(&self) -> PatternID {
        self.pattern
    }

    /// The starting position of the match, inclusive.
    #[inline]
    pub fn start(&self) -> usize {
        self.end - self.len
    }

    /// The ending position of the match, exclusive.
    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    /// The length, in bytes, of the match.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always returns false, since matches are never empty. Provided for
    /// symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the match location as a span.
    #[inline]
    pub fn span(&self) -> Span {
        Span { start: self.start(), end: self.end }
    }

    /// Returns the match location as a range.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start()..self.end
    }
}

/// A representation of a span reported by a search.
///
/// This is basically equivalent to a `std::ops::Range<usize>`, except this
/// type implements `Copy`. Like a range, this implements `Index` for `[u8]`
/// and `str`. For convenience, this also impls `From<Range>`, which means
/// things like `Span::from(5..10)` work.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Span {
    /// The start offset of the span, inclusive.
    pub start: usize,
    /// The end offset of the span, exclusive.
    pub end: usize,
}

impl Span {
    /// Returns this span as a range.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        Range::from(*self)
    }

    /// Returns true when this span is empty. That is, when `start >= end`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Returns the length of this span.
    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }
}

impl core::ops::Index<Span> for [u8] {
    type Output = [u8];

    #[inline]
    fn index(&self, index: Span) -> &[u8] {
        &self[index.range()]
    }
}

impl core::ops::Index<Span> for str {
    type Output = str;

    #[inline]
    fn index(&self, index: Span) -> &str {
        &self[index.range()]
    }
}

impl From<Range<usize>> for Span {
    #[inline]
    fn from(range: Range<usize>) -> Span {
        Span { start: range.start, end: range.end }
    }
}

impl From<Span> for Range<usize> {
    #[inline]
    fn from(span: Span) -> Range<usize> {
        Range { start: span.start, end: span.end }
    }
}

impl PartialEq<Range<usize>> for Span {
    #[inline]
    fn eq(&self, range: &Range<usize>) -> bool {
        self.start == range.start && self.end == range.end
    }
}
