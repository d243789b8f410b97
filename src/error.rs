use crate::util::{
    id::{PatternID, StateID},
    search::MatchKind,
};

/// An error that occurred during the construction of an Aho-Corasick
/// automaton.
///
/// Building an automaton can only fail when the identifier space is
/// exhausted: either too many patterns were given, or the patterns require
/// more states than a [`StateID`] can represent. In practice, the latter
/// means the total length of all patterns is in the billions of bytes.
#[derive(Clone, Debug)]
pub struct BuildError {
    kind: ErrorKind,
}

/// The kind of error that occurred while building an automaton.
#[non_exhaustive]
#[derive(Clone, Debug)]
pub enum ErrorKind {
    /// An error that occurs if too many patterns were given to the builder.
    TooManyPatterns {
        /// The number of patterns given, which exceeds the limit.
        given: usize,
        /// The limit on the number of patterns.
        limit: usize,
    },
    /// An error that occurs if too many states are produced while building
    /// an automaton.
    TooManyStates {
        /// The minimum number of states that are desired, which exceeds the
        /// limit.
        given: usize,
        /// The limit on the number of states.
        limit: usize,
    },
}

impl BuildError {
    /// Return the kind of this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub(crate) fn too_many_patterns(given: usize) -> BuildError {
        let limit = PatternID::LIMIT;
        BuildError { kind: ErrorKind::TooManyPatterns { given, limit } }
    }

    pub(crate) fn too_many_states(given: usize) -> BuildError {
        let limit = StateID::LIMIT;
        BuildError { kind: ErrorKind::TooManyStates { given, limit } }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BuildError {}

impl core::fmt::Display for BuildError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match *self.kind() {
            ErrorKind::TooManyPatterns { given, limit } => write!(
                f,
                "attempted to build automaton with {} patterns, \
                 which exceeds the limit of {}",
                given, limit,
            ),
            ErrorKind::TooManyStates { given, limit } => write!(
                f,
                "attempted to build automaton with {} states, \
                 which exceeds the limit of {}",
                given, limit,
            ),
        }
    }
}

/// An error that occurs when a search or replacement routine is called in a
/// way its automaton does not support.
///
/// The infallible routines (such as [`AhoCorasick::find_overlapping_iter`]
/// and [`AhoCorasick::replace_all`]) panic in these cases instead. The
/// `try_` variants return this error so that callers who assemble
/// automatons from user configuration can report the mistake rather than
/// crash.
///
/// [`AhoCorasick::find_overlapping_iter`]: crate::AhoCorasick::find_overlapping_iter
/// [`AhoCorasick::replace_all`]: crate::AhoCorasick::replace_all
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum MatchError {
    /// An overlapping search was requested on an automaton whose match kind
    /// is not [`MatchKind::Standard`].
    InvalidMatchKind {
        /// The match kind the automaton was built with.
        got: MatchKind,
    },
    /// A replacement routine was given a number of replacements that is not
    /// equal to the number of patterns in the automaton.
    ReplacementCount {
        /// The number of replacements given.
        given: usize,
        /// The number of patterns in the automaton.
        expected: usize,
    },
}

impl MatchError {
    pub(crate) fn invalid_match_kind(got: MatchKind) -> MatchError {
        MatchError::InvalidMatchKind { got }
    }

    pub(crate) fn replacement_count(
        given: usize,
        expected: usize,
    ) -> MatchError {
        MatchError::ReplacementCount { given, expected }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MatchError {}

impl core::fmt::Display for MatchError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match *self {
            MatchError::InvalidMatchKind { got } => write!(
                f,
                "overlapping searches require {:?} match semantics, \
                 but the automaton was built with {:?}",
                MatchKind::Standard,
                got,
            ),
            MatchError::ReplacementCount { given, expected } => write!(
                f,
                "expected {} replacements (one per pattern), but got {}",
                expected, given,
            ),
        }
    }
}
