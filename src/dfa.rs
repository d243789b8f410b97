/*!
An Aho-Corasick DFA: an NFA with every failure transition precomputed.

A DFA is compiled from an NFA by computing, for every state and every byte,
the state the NFA would end up in after following its failure transitions.
The result is one flat table, so each byte of a search costs exactly one
lookup. The price is memory: each state gets a full row, with one entry per
byte (or one per byte class when byte classes are enabled).

States keep the IDs they had in the NFA, so row `i` of the table describes
NFA state `i`.
*/

use core::{fmt, mem::size_of};

use alloc::{sync::Arc, vec, vec::Vec};

use crate::{
    automaton::{Automaton, DEAD, FAIL},
    error::BuildError,
    nfa::NFA,
    prefilter::Prefilter,
    util::{
        alphabet::ByteClasses,
        id::{PatternID, StateID},
        search::{Match, MatchKind},
    },
};

/// A builder for compiling an NFA into a DFA.
#[derive(Clone, Debug, Default)]
pub(crate) struct Builder {
    byte_classes: bool,
}

impl Builder {
    pub(crate) fn new() -> Builder {
        Builder::default()
    }

    /// Whether to shrink rows of the transition table by mapping bytes to
    /// equivalence classes first. This makes each search step a little
    /// slower (one extra lookup) but usually makes the table much smaller.
    pub(crate) fn byte_classes(&mut self, yes: bool) -> &mut Builder {
        self.byte_classes = yes;
        self
    }

    /// Compile the given NFA into a DFA with the same states, matches,
    /// match semantics and prefilter.
    pub(crate) fn build_from_nfa(&self, nfa: &NFA) -> Result<DFA, BuildError> {
        let byte_classes = if self.byte_classes {
            *nfa.byte_classes()
        } else {
            ByteClasses::singletons()
        };
        let stride = byte_classes.alphabet_len();
        let states_len = nfa.states_len();
        let table_len = states_len
            .checked_mul(stride)
            .ok_or_else(|| BuildError::too_many_states(states_len))?;
        let mut trans = vec![FAIL; table_len];
        let mut matches = Vec::with_capacity(states_len);
        for sid in StateID::iter(states_len) {
            let row = &mut trans[sid.as_usize() * stride..][..stride];
            // The fail state's row stays full of FAIL, since no search ever
            // enters it.
            if sid != FAIL {
                for (class, b) in byte_classes.representatives().enumerate() {
                    row[class] = nfa.next_state(sid, b);
                }
            }
            matches.push(nfa.matches(sid).to_vec());
        }
        let dfa = DFA {
            match_kind: nfa.match_kind(),
            start_id: nfa.start_state(),
            trans,
            stride,
            byte_classes,
            matches,
            patterns_len: nfa.patterns_len(),
            max_pattern_len: nfa.max_pattern_len(),
            prefilter: nfa.prefilter_arc(),
        };
        debug!(
            "DFA built: {} states, stride {}, {} bytes of memory",
            states_len,
            stride,
            dfa.memory_usage(),
        );
        Ok(dfa)
    }
}

/// A DFA implementation of Aho-Corasick.
#[derive(Clone)]
pub(crate) struct DFA {
    /// The match semantics this DFA was built for.
    match_kind: MatchKind,
    /// The start state.
    start_id: StateID,
    /// The transition table, with `stride` entries for each state.
    trans: Vec<StateID>,
    /// The number of entries in each row of `trans`.
    stride: usize,
    /// Maps bytes to the column of a row to look at.
    byte_classes: ByteClasses,
    /// The matches of each state, indexed by state ID.
    matches: Vec<Vec<(PatternID, usize)>>,
    /// The total number of patterns, including ones that never match.
    patterns_len: usize,
    /// The length of the longest pattern.
    max_pattern_len: usize,
    /// A prefilter for accelerating searches, if one exists.
    prefilter: Option<Arc<dyn Prefilter>>,
}

impl DFA {
    /// The number of states in this DFA.
    pub(crate) fn states_len(&self) -> usize {
        self.matches.len()
    }
}

impl Automaton for DFA {
    fn match_kind(&self) -> MatchKind {
        self.match_kind
    }

    fn patterns_len(&self) -> usize {
        self.patterns_len
    }

    fn max_pattern_len(&self) -> usize {
        self.max_pattern_len
    }

    fn prefilter(&self) -> Option<&dyn Prefilter> {
        self.prefilter.as_deref()
    }

    fn start_state(&self) -> StateID {
        self.start_id
    }

    #[inline(always)]
    fn next_state(&self, current: StateID, input: u8) -> StateID {
        let class = usize::from(self.byte_classes.get(input));
        self.trans[current.as_usize() * self.stride + class]
    }

    fn is_match_or_dead_state(&self, id: StateID) -> bool {
        id == DEAD || !self.matches[id].is_empty()
    }

    fn match_count(&self, id: StateID) -> usize {
        self.matches[id].len()
    }

    fn get_match(
        &self,
        id: StateID,
        match_index: usize,
        end: usize,
    ) -> Option<Match> {
        self.matches[id]
            .get(match_index)
            .map(|&(pid, len)| Match::new(pid, len, end))
    }

    fn memory_usage(&self) -> usize {
        size_of::<DFA>()
            + self.trans.len() * size_of::<StateID>()
            + self.matches.len() * size_of::<Vec<(PatternID, usize)>>()
            + self
                .matches
                .iter()
                .map(|m| m.len() * size_of::<(PatternID, usize)>())
                .sum::<usize>()
            + self.prefilter.as_ref().map_or(0, |p| p.heap_bytes())
    }
}

impl fmt::Debug for DFA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DFA(")?;
        writeln!(f, "match kind: {:?}", self.match_kind)?;
        writeln!(f, "prefilter: {:?}", self.prefilter)?;
        for sid in StateID::iter(self.states_len()) {
            if sid == FAIL {
                continue;
            }
            let status = if sid == self.start_id {
                '>'
            } else if sid == DEAD {
                'D'
            } else if !self.matches[sid].is_empty() {
                '*'
            } else {
                ' '
            };
            write!(f, "{}{:06?}:", status, sid.as_usize())?;
            let start = sid.as_usize() * self.stride;
            let row = &self.trans[start..][..self.stride];
            // Only print transitions that go somewhere interesting.
            for (class, &next) in row.iter().enumerate() {
                if next != self.start_id && next != DEAD {
                    write!(f, " {}=>{}", class, next.as_usize())?;
                }
            }
            writeln!(f, "")?;
        }
        writeln!(f, "")?;
        writeln!(
            f,
            "transition equivalence classes: {:?}",
            self.byte_classes,
        )?;
        writeln!(f, ")")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{nfa, prefilter::PrefilterState};

    fn build(
        kind: MatchKind,
        byte_classes: bool,
        patterns: &[&str],
    ) -> (NFA, DFA) {
        let nfa = nfa::Builder::new()
            .match_kind(kind)
            .build(patterns)
            .unwrap();
        let dfa = Builder::new()
            .byte_classes(byte_classes)
            .build_from_nfa(&nfa)
            .unwrap();
        (nfa, dfa)
    }

    #[test]
    fn rows_agree_with_nfa() {
        let (nfa, dfa) =
            build(MatchKind::Standard, false, &["he", "she", "his", "hers"]);
        assert_eq!(nfa.states_len(), dfa.states_len());
        for sid in StateID::iter(nfa.states_len()).skip(1) {
            for b in 0..=255u8 {
                assert_eq!(nfa.next_state(sid, b), dfa.next_state(sid, b));
            }
        }
    }

    #[test]
    fn byte_classes_shrink_rows() {
        let (_, full) = build(MatchKind::Standard, false, &["abc", "cab"]);
        let (_, small) = build(MatchKind::Standard, true, &["abc", "cab"]);
        assert_eq!(256, full.stride);
        assert!(small.stride < 256);
        assert!(small.memory_usage() < full.memory_usage());
        let mut pre1 = PrefilterState::new(full.max_pattern_len());
        let mut pre2 = PrefilterState::new(small.max_pattern_len());
        assert_eq!(
            full.find_at(&mut pre1, b"xxcabxx", 0),
            small.find_at(&mut pre2, b"xxcabxx", 0),
        );
    }

    #[test]
    fn leftmost_search_stops_in_dead_state() {
        let (_, dfa) =
            build(MatchKind::LeftmostLongest, true, &["abcd", "b", "bce"]);
        let mut prestate = PrefilterState::new(dfa.max_pattern_len());
        let m = dfa.find_at(&mut prestate, b"abce", 0).unwrap();
        assert_eq!(1..4, m.range());
        assert_eq!(2, m.pattern().as_usize());
    }
}
