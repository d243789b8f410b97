/*!
The interface shared by every automaton in this crate, and the search
routines written against it.

Both the [`NFA`](crate::nfa::NFA) and the [`DFA`](crate::dfa::DFA) implement
[`Automaton`]. The NFA computes failure transitions while searching, and the
DFA has them precomputed into its table, but from the perspective of a search
they look the same: a start state, a total transition function and, for each
state, a list of matches that end there.

The search routines here are provided methods on the trait. They are generic
over the automaton so that each gets its own monomorphized copy of the hot
loop.
*/

use crate::{
    prefilter::{self, Prefilter, PrefilterState},
    util::{
        id::StateID,
        search::{Match, MatchKind},
    },
};

/// The identifier of the sentinel state that signals "no transition on this
/// byte, follow the failure transition instead." No search ever enters it.
pub(crate) const FAIL: StateID = StateID::new_unchecked(0);

/// The identifier of the dead state. Once a search enters it, it can never
/// leave and can never see another match, so searches stop as soon as they
/// reach it. It is only ever reachable in automatons with leftmost match
/// semantics.
pub(crate) const DEAD: StateID = StateID::new_unchecked(1);

/// A trait describing the interface of an Aho-Corasick finite state machine.
///
/// Every automaton has one unanchored start state, and its transition
/// function (as exposed by `next_state`) is total. That is, it never returns
/// [`FAIL`].
pub(crate) trait Automaton {
    /// Return the match semantics this automaton was built with.
    fn match_kind(&self) -> MatchKind;

    /// Return the total number of patterns this automaton was built from,
    /// including patterns that can never match.
    fn patterns_len(&self) -> usize;

    /// Return the length of the longest pattern.
    fn max_pattern_len(&self) -> usize;

    /// Return the prefilter for this automaton, if one exists.
    fn prefilter(&self) -> Option<&dyn Prefilter>;

    /// Return the identifier of this automaton's start state.
    fn start_state(&self) -> StateID;

    /// Return the state reached by following the transition on `input` from
    /// `current`, following failure transitions as necessary.
    fn next_state(&self, current: StateID, input: u8) -> StateID;

    /// Returns true if and only if the given state is a match state or the
    /// dead state.
    fn is_match_or_dead_state(&self, id: StateID) -> bool;

    /// Return the number of matches in the given state.
    fn match_count(&self, id: StateID) -> usize;

    /// Return the match at the given index in the given state, ending at
    /// `end`. If there is no such match, then `None` is returned.
    fn get_match(
        &self,
        id: StateID,
        match_index: usize,
        end: usize,
    ) -> Option<Match>;

    /// Return the approximate heap usage of this automaton, in bytes.
    fn memory_usage(&self) -> usize;

    /// Execute a search using standard match semantics.
    ///
    /// The given state ID is both where the search begins and where it is
    /// left when the search stops, which permits resuming. When the search
    /// begins in the start state, this returns the match that ends earliest
    /// at or after `at`.
    #[inline(always)]
    fn standard_find_at(
        &self,
        prestate: &mut PrefilterState,
        haystack: &[u8],
        mut at: usize,
        state_id: &mut StateID,
    ) -> Option<Match> {
        let start = self.start_state();
        while at < haystack.len() {
            if let Some(pre) = self.prefilter() {
                if *state_id == start && prestate.is_effective(at) {
                    match prefilter::next(prestate, pre, haystack, at)
                        .into_option()
                    {
                        None => return None,
                        Some(i) => at = i,
                    }
                }
            }
            *state_id = self.next_state(*state_id, haystack[at]);
            at += 1;
            if self.is_match_or_dead_state(*state_id) {
                if *state_id == DEAD {
                    return None;
                }
                return self.get_match(*state_id, 0, at);
            }
        }
        None
    }

    /// Execute a search using leftmost (either first or longest) match
    /// semantics.
    ///
    /// The search keeps going after it sees a match, since a longer match
    /// (or, under leftmost-first, a match for an earlier pattern) starting at
    /// the same position may exist. It only stops once the automaton enters
    /// the dead state, which its construction guarantees happens as soon as
    /// no better match is possible.
    #[inline(always)]
    fn leftmost_find_at(
        &self,
        prestate: &mut PrefilterState,
        haystack: &[u8],
        mut at: usize,
    ) -> Option<Match> {
        let start = self.start_state();
        let mut state_id = start;
        let mut last_match = None;
        while at < haystack.len() {
            if let Some(pre) = self.prefilter() {
                if state_id == start && prestate.is_effective(at) {
                    match prefilter::next(prestate, pre, haystack, at)
                        .into_option()
                    {
                        None => return last_match,
                        Some(i) => at = i,
                    }
                }
            }
            state_id = self.next_state(state_id, haystack[at]);
            at += 1;
            if self.is_match_or_dead_state(state_id) {
                if state_id == DEAD {
                    return last_match;
                }
                last_match = self.get_match(state_id, 0, at);
            }
        }
        last_match
    }

    /// Execute a search that reports the first match the automaton
    /// discovers, regardless of match kind.
    ///
    /// This is the fastest way to answer "is there any match?", since it
    /// stops at the first match state.
    #[inline(always)]
    fn earliest_find_at(
        &self,
        prestate: &mut PrefilterState,
        haystack: &[u8],
        at: usize,
    ) -> Option<Match> {
        let mut state_id = self.start_state();
        self.standard_find_at(prestate, haystack, at, &mut state_id)
    }

    /// Execute a search that begins in the start state, using the match
    /// semantics this automaton was built with.
    #[inline(always)]
    fn find_at(
        &self,
        prestate: &mut PrefilterState,
        haystack: &[u8],
        at: usize,
    ) -> Option<Match> {
        match self.match_kind() {
            MatchKind::Standard => {
                let mut state_id = self.start_state();
                self.standard_find_at(prestate, haystack, at, &mut state_id)
            }
            MatchKind::LeftmostFirst | MatchKind::LeftmostLongest => {
                self.leftmost_find_at(prestate, haystack, at)
            }
        }
    }

    /// Execute an overlapping search, picking up where the last call left
    /// off.
    ///
    /// When the previous call stopped in a state with more than one match,
    /// the remaining matches are reported (one per call) before the search
    /// moves on. `at` must be the end of the previously reported match, or
    /// the starting position on the first call.
    ///
    /// This must only be called on automatons with standard match semantics.
    #[inline(always)]
    fn overlapping_find_at(
        &self,
        prestate: &mut PrefilterState,
        haystack: &[u8],
        at: usize,
        state: &mut OverlappingState,
    ) -> Option<Match> {
        debug_assert_eq!(MatchKind::Standard, self.match_kind());
        let mut id = match state.id {
            None => self.start_state(),
            Some(id) => id,
        };
        if state.match_index < self.match_count(id) {
            let m = self.get_match(id, state.match_index, at);
            state.match_index += 1;
            return m;
        }
        let m = self.standard_find_at(prestate, haystack, at, &mut id);
        state.id = Some(id);
        // When the haystack is exhausted, mark every match in the final
        // state as reported so that calling again can't repeat them.
        state.match_index = match m {
            Some(_) => 1,
            None => self.match_count(id),
        };
        m
    }
}

/// Represents the current state of an overlapping search.
///
/// This is used for overlapping searches since they need to know something
/// about the previous search. For example, when multiple patterns match at
/// the same position, this state tracks the index of the next pattern to
/// report, so that the next search knows whether to report another matching
/// pattern or continue with the search at the next position. Additionally,
/// it also tracks which state the last search call terminated in.
///
/// A fresh state, constructed via [`OverlappingState::start`], must be used
/// for every new search.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct OverlappingState {
    /// The state at which the last search call stopped. `None` indicates the
    /// start state.
    id: Option<StateID>,
    /// The index of the next match to report from the state `id`.
    match_index: usize,
}

impl OverlappingState {
    /// Create a new overlapping state that begins at the start state of any
    /// automaton.
    pub(crate) fn start() -> OverlappingState {
        OverlappingState { id: None, match_index: 0 }
    }
}
