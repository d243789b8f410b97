/*!
Type definitions for identifier types.

A [`StateID`] identifies a state in one of the automatons in this crate. Both
the NFA and the DFA use the same identifier space: a DFA built from an NFA
keeps every state at the same ID it had in the NFA.

A [`PatternID`] identifies a pattern. Patterns are assigned an
auto-incrementing integer, starting at `0`, based on the order in which they
were given to the builder. Pattern IDs never change after an automaton is
built, which is what makes them usable as join keys by callers (for example,
mapping a matched keyword back to the detector that registered it).

Both identifier types clamp the range of permissible values to something
smaller than their `u32` representation, so that the total number of IDs is
always representable by a `usize` and an `i32`.
*/

use core::{convert::TryFrom, mem, ops};

/// An identifier for a pattern.
///
/// The identifier for a pattern corresponds to its position (starting at `0`)
/// in the sequence of patterns given to
/// [`AhoCorasickBuilder::build`](crate::AhoCorasickBuilder::build).
///
/// # Representation
///
/// This type is always represented internally by a `u32` and is marked as
/// `repr(transparent)`.
///
/// # Indexing
///
/// For convenience, callers may use a `PatternID` to index slices.
#[repr(transparent)]
#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, PartialEq, PartialOrd, Ord,
)]
pub struct PatternID(u32);

impl PatternID {
    /// The maximum pattern ID value.
    pub const MAX: PatternID =
        PatternID::new_unchecked(core::i32::MAX as usize - 1);

    /// The total number of patterns that are allowed in any single
    /// automaton.
    pub const LIMIT: usize = PatternID::MAX.as_usize() + 1;

    /// The zero pattern ID value.
    pub const ZERO: PatternID = PatternID::new_unchecked(0);

    /// Create a new pattern ID.
    ///
    /// If the given identifier exceeds [`PatternID::MAX`], then this returns
    /// an error.
    #[inline]
    pub fn new(id: usize) -> Result<PatternID, PatternIDError> {
        PatternID::try_from(id)
    }

    /// Create a new pattern ID without checking whether the given value
    /// exceeds [`PatternID::MAX`].
    ///
    /// Providing an incorrect value never sacrifices memory safety, but may
    /// produce nonsensical match results.
    #[inline]
    pub const fn new_unchecked(id: usize) -> PatternID {
        PatternID(id as u32)
    }

    /// Like [`PatternID::new`], but panics if the given ID is not valid.
    #[inline]
    pub fn must(id: usize) -> PatternID {
        PatternID::new(id).unwrap()
    }

    /// Return this pattern ID as a `usize`.
    #[inline]
    pub const fn as_usize(&self) -> usize {
        self.0 as usize
    }

    /// Return the internal u32 of this pattern ID.
    #[inline]
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

/// This error occurs when a pattern ID could not be constructed.
///
/// This occurs when given an integer exceeding the maximum pattern ID value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PatternIDError {
    attempted: u64,
}

impl PatternIDError {
    /// Returns the value that failed to constructed a pattern ID.
    pub fn attempted(&self) -> u64 {
        self.attempted
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PatternIDError {}

impl core::fmt::Display for PatternIDError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "failed to create PatternID from {:?}, which exceeds {:?}",
            self.attempted(),
            PatternID::MAX,
        )
    }
}

/// An identifier for a state in an automaton.
///
/// State IDs are handles into an append-only arena of states. Once a state
/// has been given an ID, that ID is never reused for another state.
///
/// # Representation
///
/// This type is always represented internally by a `u32` and is marked as
/// `repr(transparent)`.
///
/// # Indexing
///
/// For convenience, callers may use a `StateID` to index slices.
#[repr(transparent)]
#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, PartialEq, PartialOrd, Ord,
)]
pub struct StateID(u32);

impl StateID {
    /// The maximum state ID value.
    pub const MAX: StateID =
        StateID::new_unchecked(core::i32::MAX as usize - 1);

    /// The total number of states that are allowed in any single automaton.
    pub const LIMIT: usize = StateID::MAX.as_usize() + 1;

    /// The zero state ID value.
    pub const ZERO: StateID = StateID::new_unchecked(0);

    /// Create a new state ID.
    ///
    /// If the given identifier exceeds [`StateID::MAX`], then this returns
    /// an error.
    #[inline]
    pub fn new(id: usize) -> Result<StateID, StateIDError> {
        StateID::try_from(id)
    }

    /// Create a new state ID without checking whether the given value
    /// exceeds [`StateID::MAX`].
    #[inline]
    pub const fn new_unchecked(id: usize) -> StateID {
        StateID(id as u32)
    }

    /// Like [`StateID::new`], but panics if the given ID is not valid.
    #[inline]
    pub fn must(id: usize) -> StateID {
        StateID::new(id).unwrap()
    }

    /// Return this state ID as a `usize`.
    #[inline]
    pub const fn as_usize(&self) -> usize {
        self.0 as usize
    }

    /// Return the internal u32 of this state ID.
    #[inline]
    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    /// Returns an iterator over all state IDs from 0 up to and not including
    /// the given length.
    ///
    /// If the given length exceeds [`StateID::LIMIT`], then this panics.
    pub fn iter(len: usize) -> StateIDIter {
        StateIDIter::new(len)
    }
}

/// This error occurs when a state ID could not be constructed.
///
/// This occurs when given an integer exceeding the maximum state ID value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StateIDError {
    attempted: u64,
}

impl StateIDError {
    /// Returns the value that failed to constructed a state ID.
    pub fn attempted(&self) -> u64 {
        self.attempted
    }
}

#[cfg(feature = "std")]
impl std::error::Error for StateIDError {}

impl core::fmt::Display for StateIDError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "failed to create StateID from {:?}, which exceeds {:?}",
            self.attempted(),
            StateID::MAX,
        )
    }
}

/// A macro for defining exactly identical (modulo names) impls for ID types.
macro_rules! impls {
    ($ty:ident, $tyerr:ident) => {
        impl<T> core::ops::Index<$ty> for [T] {
            type Output = T;

            #[inline]
            fn index(&self, index: $ty) -> &T {
                &self[index.as_usize()]
            }
        }

        impl<T> core::ops::IndexMut<$ty> for [T] {
            #[inline]
            fn index_mut(&mut self, index: $ty) -> &mut T {
                &mut self[index.as_usize()]
            }
        }

        impl<T> core::ops::Index<$ty> for Vec<T> {
            type Output = T;

            #[inline]
            fn index(&self, index: $ty) -> &T {
                &self[index.as_usize()]
            }
        }

        impl<T> core::ops::IndexMut<$ty> for Vec<T> {
            #[inline]
            fn index_mut(&mut self, index: $ty) -> &mut T {
                &mut self[index.as_usize()]
            }
        }

        impl TryFrom<usize> for $ty {
            type Error = $tyerr;

            fn try_from(id: usize) -> Result<$ty, $tyerr> {
                if id > $ty::MAX.as_usize() {
                    return Err($tyerr { attempted: id as u64 });
                }
                Ok($ty::new_unchecked(id))
            }
        }

        impl TryFrom<u32> for $ty {
            type Error = $tyerr;

            fn try_from(id: u32) -> Result<$ty, $tyerr> {
                if id > $ty::MAX.as_u32() {
                    return Err($tyerr { attempted: id as u64 });
                }
                Ok($ty::new_unchecked(id as usize))
            }
        }

        #[cfg(test)]
        impl quickcheck::Arbitrary for $ty {
            fn arbitrary(gen: &mut quickcheck::Gen) -> $ty {
                use core::cmp::max;

                let id = max(
                    i32::MIN + 1,
                    <i32 as quickcheck::Arbitrary>::arbitrary(gen),
                )
                .abs();
                if id > $ty::MAX.as_u32() as i32 {
                    $ty::MAX
                } else {
                    $ty::new(usize::try_from(id).unwrap()).unwrap()
                }
            }
        }
    };
}

impls!(PatternID, PatternIDError);
impls!(StateID, StateIDError);

/// A macro for defining an iterator over a range of IDs.
macro_rules! iditer {
    ($ty:ident, $tyiter:ident) => {
        /// An iterator over a contiguous range of identifiers starting at
        /// zero.
        #[derive(Clone, Debug)]
        pub struct $tyiter {
            rng: ops::Range<usize>,
        }

        impl $tyiter {
            fn new(len: usize) -> $tyiter {
                assert!(
                    len <= $ty::LIMIT,
                    "cannot create iterator with IDs when number of \
                     elements exceed {:?}",
                    $ty::LIMIT,
                );
                $tyiter { rng: 0..len }
            }
        }

        impl Iterator for $tyiter {
            type Item = $ty;

            fn next(&mut self) -> Option<$ty> {
                if self.rng.start >= self.rng.end {
                    return None;
                }
                let next_id = self.rng.start + 1;
                let id = mem::replace(&mut self.rng.start, next_id);
                // new_unchecked is OK since we asserted that the number of
                // elements in this iterator will fit in an ID at construction.
                Some($ty::new_unchecked(id))
            }
        }
    };
}

iditer!(StateID, StateIDIter);

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::quickcheck;

    #[test]
    fn limits() {
        assert!(PatternID::new(PatternID::LIMIT).is_err());
        assert!(StateID::new(StateID::LIMIT).is_err());
        assert_eq!(
            PatternID::LIMIT as u64,
            PatternID::new(PatternID::LIMIT).unwrap_err().attempted(),
        );
        assert_eq!(StateID::MAX, StateID::must(StateID::LIMIT - 1));
    }

    #[test]
    fn iter_yields_every_id() {
        let got: Vec<usize> = StateID::iter(4).map(|s| s.as_usize()).collect();
        assert_eq!(vec![0, 1, 2, 3], got);
        assert_eq!(0, StateID::iter(0).count());
    }

    quickcheck! {
        fn prop_pattern_id_roundtrips_usize(pid: PatternID) -> bool {
            PatternID::must(pid.as_usize()) == pid
        }

        fn prop_state_id_indexes_like_usize(sid: StateID) -> bool {
            let v: Vec<u32> = (0..=(sid.as_usize() % 64) as u32).collect();
            let sid = StateID::must(sid.as_usize() % 64);
            v[sid] == sid.as_u32()
        }
    }
}
