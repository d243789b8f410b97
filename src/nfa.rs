/*!
An Aho-Corasick NFA: a trie of all patterns plus failure transitions.

The states of the NFA form an append-only arena indexed by [`StateID`]. The
first three states are always the same:

* `0` is the [`FAIL`] sentinel. A transition to it means "follow this state's
failure transition instead." It has no transitions of its own.
* `1` is the [`DEAD`] state. It transitions to itself on every byte, and only
leftmost automatons ever reach it.
* `2` is the unanchored start state. Every byte that doesn't begin a pattern
loops back to it.

States shallower than a configurable depth store a dense row of 256
transitions, since nearly every search visits them constantly. Deeper states
store a sorted list of the (usually very few) transitions they actually have.
*/

use core::{fmt, mem::size_of};

use alloc::{collections::VecDeque, sync::Arc, vec, vec::Vec};

use crate::{
    automaton::{Automaton, DEAD, FAIL},
    error::BuildError,
    prefilter::{self, Prefilter},
    util::{
        alphabet::{ByteClassSet, ByteClasses, ByteEquivalence},
        id::{PatternID, StateID},
        search::{Match, MatchKind},
    },
};

/// The identifier of the start state in every NFA.
const START: StateID = StateID::new_unchecked(2);

/// A builder for configuring and compiling an NFA.
#[derive(Clone, Debug)]
pub(crate) struct Builder {
    match_kind: MatchKind,
    ascii_case_insensitive: bool,
    byte_equivalence: Option<ByteEquivalence>,
    prefilter: bool,
    dense_depth: usize,
}

impl Default for Builder {
    fn default() -> Builder {
        Builder {
            match_kind: MatchKind::default(),
            ascii_case_insensitive: false,
            byte_equivalence: None,
            prefilter: true,
            dense_depth: 2,
        }
    }
}

impl Builder {
    pub(crate) fn new() -> Builder {
        Builder::default()
    }

    /// Compile the given patterns into an NFA.
    pub(crate) fn build<I, P>(&self, patterns: I) -> Result<NFA, BuildError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[u8]>,
    {
        Compiler::new(self)?.compile(patterns)
    }

    pub(crate) fn match_kind(&mut self, kind: MatchKind) -> &mut Builder {
        self.match_kind = kind;
        self
    }

    pub(crate) fn ascii_case_insensitive(
        &mut self,
        yes: bool,
    ) -> &mut Builder {
        self.ascii_case_insensitive = yes;
        self
    }

    pub(crate) fn byte_equivalence(
        &mut self,
        equiv: ByteEquivalence,
    ) -> &mut Builder {
        self.byte_equivalence = Some(equiv);
        self
    }

    pub(crate) fn prefilter(&mut self, yes: bool) -> &mut Builder {
        self.prefilter = yes;
        self
    }

    pub(crate) fn dense_depth(&mut self, depth: usize) -> &mut Builder {
        self.dense_depth = depth;
        self
    }

    /// Returns the equivalence to fan trie edges out over, or `None` when
    /// every byte is only equivalent to itself.
    fn equivalence(&self) -> Option<ByteEquivalence> {
        let ascii = if self.ascii_case_insensitive {
            Some(ByteEquivalence::ascii_case_insensitive())
        } else {
            None
        };
        match (ascii, self.byte_equivalence.as_ref()) {
            (None, None) => None,
            (Some(ascii), None) => Some(ascii),
            (None, Some(equiv)) => Some(equiv.closure()),
            (Some(ascii), Some(equiv)) => Some(ascii.union(equiv)),
        }
        .filter(|equiv| !equiv.is_identity())
    }
}

/// An Aho-Corasick automaton represented as a trie with failure transitions.
///
/// Searching with an NFA may need to follow several failure transitions per
/// haystack byte, but it is much cheaper to build than a DFA and uses much
/// less memory.
#[derive(Clone)]
pub(crate) struct NFA {
    /// The match semantics this NFA was built for.
    match_kind: MatchKind,
    /// All states, indexed by state ID.
    states: Vec<State>,
    /// The length of every pattern, indexed by pattern ID. This includes
    /// patterns that were never inserted into the trie.
    pattern_lens: Vec<usize>,
    /// The length of the longest pattern.
    max_pattern_len: usize,
    /// The byte classes that no state can tell apart. Used when compiling a
    /// DFA with byte classes enabled.
    byte_classes: ByteClasses,
    /// A prefilter for accelerating searches, if one exists.
    prefilter: Option<Arc<dyn Prefilter>>,
}

impl NFA {
    pub(crate) fn start_state_id(&self) -> StateID {
        START
    }

    /// The total number of states, including the sentinel states.
    pub(crate) fn states_len(&self) -> usize {
        self.states.len()
    }

    /// Returns the transitions out of the given state that don't lead to
    /// `FAIL`, in ascending byte order.
    pub(crate) fn transitions(&self, id: StateID) -> TransitionIter<'_> {
        self.states[id].trans.iter()
    }

    /// Returns the parent of the given state in the trie.
    pub(crate) fn parent(&self, id: StateID) -> StateID {
        self.states[id].parent
    }

    /// Returns the matches of the given state, including those inherited
    /// through its failure transition.
    pub(crate) fn matches(&self, id: StateID) -> &[(PatternID, usize)] {
        &self.states[id].matches
    }

    pub(crate) fn byte_classes(&self) -> &ByteClasses {
        &self.byte_classes
    }

    #[cfg(test)]
    fn pattern_lens(&self) -> &[usize] {
        &self.pattern_lens
    }

    pub(crate) fn prefilter_arc(&self) -> Option<Arc<dyn Prefilter>> {
        self.prefilter.clone()
    }

    #[cfg(test)]
    fn fail(&self, id: StateID) -> StateID {
        self.states[id].fail
    }

    #[cfg(test)]
    fn depth(&self, id: StateID) -> usize {
        self.states[id].depth
    }

    fn state_mut(&mut self, id: StateID) -> &mut State {
        &mut self.states[id]
    }

    fn copy_matches(&mut self, src: StateID, dst: StateID) {
        let (src, dst) = get_two_mut(&mut self.states, src, dst);
        dst.matches.extend_from_slice(&src.matches);
    }
}

impl Automaton for NFA {
    fn match_kind(&self) -> MatchKind {
        self.match_kind
    }

    fn patterns_len(&self) -> usize {
        self.pattern_lens.len()
    }

    fn max_pattern_len(&self) -> usize {
        self.max_pattern_len
    }

    fn prefilter(&self) -> Option<&dyn Prefilter> {
        self.prefilter.as_deref()
    }

    fn start_state(&self) -> StateID {
        START
    }

    #[inline(always)]
    fn next_state(&self, mut current: StateID, input: u8) -> StateID {
        // This terminates since the start state has a transition on every
        // byte, and following failure transitions always leads to a strictly
        // shallower state (until the start state is reached).
        loop {
            let state = &self.states[current];
            let next = state.trans.next(input);
            if next != FAIL {
                return next;
            }
            current = state.fail;
        }
    }

    fn is_match_or_dead_state(&self, id: StateID) -> bool {
        id == DEAD || !self.states[id].matches.is_empty()
    }

    fn match_count(&self, id: StateID) -> usize {
        self.states[id].matches.len()
    }

    fn get_match(
        &self,
        id: StateID,
        match_index: usize,
        end: usize,
    ) -> Option<Match> {
        self.states[id]
            .matches
            .get(match_index)
            .map(|&(pid, len)| Match::new(pid, len, end))
    }

    fn memory_usage(&self) -> usize {
        size_of::<NFA>()
            + self.states.len() * size_of::<State>()
            + self.states.iter().map(|s| s.heap_bytes()).sum::<usize>()
            + self.pattern_lens.len() * size_of::<usize>()
            + self.prefilter.as_ref().map_or(0, |p| p.heap_bytes())
    }
}

impl fmt::Debug for NFA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "NFA(")?;
        writeln!(f, "match kind: {:?}", self.match_kind)?;
        writeln!(f, "prefilter: {:?}", self.prefilter)?;
        for (sid, state) in self.states.iter().enumerate() {
            let status = if sid == START.as_usize() {
                '>'
            } else if sid == DEAD.as_usize() {
                'D'
            } else if sid == FAIL.as_usize() {
                'F'
            } else if !state.matches.is_empty() {
                '*'
            } else {
                ' '
            };
            writeln!(f, "{}{:06?}: {:?}", status, sid, state)?;
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

/// A single state in an NFA.
#[derive(Clone)]
struct State {
    /// The transitions out of this state.
    trans: Transitions,
    /// The patterns (and their lengths) that match when this state is
    /// entered. The state's own patterns come first, followed by the matches
    /// of its failure state.
    matches: Vec<(PatternID, usize)>,
    /// The state to move to when there is no transition on a byte.
    fail: StateID,
    /// The parent of this state in the trie.
    parent: StateID,
    /// The distance from the start state, which equals the length of every
    /// path from the start state to this state.
    depth: usize,
}

impl State {
    fn heap_bytes(&self) -> usize {
        self.trans.heap_bytes()
            + self.matches.len() * size_of::<(PatternID, usize)>()
    }

    fn is_match(&self) -> bool {
        !self.matches.is_empty()
    }

    /// The depth of the state at which the longest match ending in this
    /// state begins. A state's own match begins at depth 1.
    fn match_start_depth(&self) -> Option<usize> {
        // Own matches always come first, and they are always at least as long
        // as inherited matches.
        self.matches.first().map(|&(_, len)| self.depth - len + 1)
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let trans = self
            .trans
            .iter()
            .map(|(b, id)| format!("{:?} => {}", DebugByte(b), id.as_usize()))
            .collect::<Vec<String>>()
            .join(", ");
        write!(f, "{}({})", self.trans.kind(), trans)?;
        write!(f, " fail={}", self.fail.as_usize())?;
        if !self.matches.is_empty() {
            let matches = self
                .matches
                .iter()
                .map(|&(pid, len)| format!("{}/{}", pid.as_usize(), len))
                .collect::<Vec<String>>()
                .join(", ");
            write!(f, " matches=[{}]", matches)?;
        }
        Ok(())
    }
}

/// Formats a byte as its escaped ASCII representation.
struct DebugByte(u8);

impl fmt::Debug for DebugByte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let escaped = core::ascii::escape_default(self.0)
            .map(char::from)
            .collect::<String>();
        write!(f, "{}", escaped)
    }
}

/// The transitions out of a single state.
#[derive(Clone)]
enum Transitions {
    /// Transitions sorted by byte. Bytes not present lead to `FAIL`.
    Sparse(Vec<(u8, StateID)>),
    /// Exactly 256 transitions, one for each byte.
    Dense(Vec<StateID>),
}

impl Transitions {
    fn sparse() -> Transitions {
        Transitions::Sparse(vec![])
    }

    fn dense() -> Transitions {
        Transitions::Dense(vec![FAIL; 256])
    }

    fn kind(&self) -> &'static str {
        match *self {
            Transitions::Sparse(_) => "sparse",
            Transitions::Dense(_) => "dense",
        }
    }

    #[inline(always)]
    fn next(&self, input: u8) -> StateID {
        match *self {
            Transitions::Sparse(ref trans) => {
                for &(b, id) in trans.iter() {
                    if b == input {
                        return id;
                    }
                    if b > input {
                        break;
                    }
                }
                FAIL
            }
            Transitions::Dense(ref trans) => trans[usize::from(input)],
        }
    }

    fn set_next(&mut self, input: u8, next: StateID) {
        match *self {
            Transitions::Sparse(ref mut trans) => {
                match trans.binary_search_by_key(&input, |&(b, _)| b) {
                    Ok(i) => trans[i] = (input, next),
                    Err(i) => trans.insert(i, (input, next)),
                }
            }
            Transitions::Dense(ref mut trans) => {
                trans[usize::from(input)] = next;
            }
        }
    }

    fn iter(&self) -> TransitionIter<'_> {
        match *self {
            Transitions::Sparse(ref trans) => {
                TransitionIter::Sparse(trans.iter())
            }
            Transitions::Dense(ref trans) => {
                TransitionIter::Dense(trans.iter().enumerate())
            }
        }
    }

    fn heap_bytes(&self) -> usize {
        match *self {
            Transitions::Sparse(ref trans) => {
                trans.len() * size_of::<(u8, StateID)>()
            }
            Transitions::Dense(ref trans) => {
                trans.len() * size_of::<StateID>()
            }
        }
    }
}

/// An iterator over the transitions of a state that don't lead to `FAIL`.
pub(crate) enum TransitionIter<'a> {
    Sparse(core::slice::Iter<'a, (u8, StateID)>),
    Dense(core::iter::Enumerate<core::slice::Iter<'a, StateID>>),
}

impl<'a> Iterator for TransitionIter<'a> {
    type Item = (u8, StateID);

    fn next(&mut self) -> Option<(u8, StateID)> {
        match *self {
            TransitionIter::Sparse(ref mut it) => it.next().copied(),
            TransitionIter::Dense(ref mut it) => {
                for (b, &id) in it {
                    if id != FAIL {
                        // The row has exactly 256 entries.
                        return Some((b as u8, id));
                    }
                }
                None
            }
        }
    }
}

/// A compiler uses a builder configuration and builds up the NFA formulation
/// of an Aho-Corasick automaton.
#[derive(Debug)]
struct Compiler<'a> {
    builder: &'a Builder,
    nfa: NFA,
    /// The fan out applied to every inserted edge, if any.
    equivalence: Option<ByteEquivalence>,
    /// Tracks the bytes that label at least one edge.
    byte_class_set: ByteClassSet,
    /// The terminal state and length of every inserted pattern.
    terminals: Vec<(StateID, usize)>,
}

impl<'a> Compiler<'a> {
    fn new(builder: &'a Builder) -> Result<Compiler<'a>, BuildError> {
        let mut compiler = Compiler {
            builder,
            nfa: NFA {
                match_kind: builder.match_kind,
                states: vec![],
                pattern_lens: vec![],
                max_pattern_len: 0,
                byte_classes: ByteClasses::singletons(),
                prefilter: None,
            },
            equivalence: builder.equivalence(),
            byte_class_set: ByteClassSet::empty(),
            terminals: vec![],
        };
        compiler.add_state(0)?; // fail
        compiler.add_state(0)?; // dead
        compiler.add_state(0)?; // start
        Ok(compiler)
    }

    fn compile<I, P>(mut self, patterns: I) -> Result<NFA, BuildError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[u8]>,
    {
        self.add_patterns(patterns)?;
        self.add_dead_state_loop();
        self.add_start_state_loop();
        if self.builder.match_kind.is_leftmost() {
            self.fill_failure_transitions_leftmost();
        } else {
            self.fill_failure_transitions_standard();
        }
        self.nfa.byte_classes = self.byte_class_set.byte_classes();
        if self.builder.prefilter {
            self.nfa.prefilter = prefilter::build(&self.nfa, &self.terminals);
        }
        debug!(
            "NFA built: {} patterns ({} inserted), {} states, \
             {} byte classes, {} bytes of memory",
            self.nfa.pattern_lens.len(),
            self.terminals.len(),
            self.nfa.states.len(),
            self.nfa.byte_classes.alphabet_len(),
            self.nfa.memory_usage(),
        );
        Ok(self.nfa)
    }

    /// Add all patterns to this automaton's trie, along with the matches
    /// they produce in their terminal states.
    fn add_patterns<I, P>(&mut self, patterns: I) -> Result<(), BuildError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[u8]>,
    {
        'PATTERNS: for (i, pat) in patterns.into_iter().enumerate() {
            let pid = PatternID::new(i)
                .map_err(|_| BuildError::too_many_patterns(i + 1))?;
            let pat = pat.as_ref();
            self.nfa.pattern_lens.push(pat.len());
            if pat.len() > self.nfa.max_pattern_len {
                self.nfa.max_pattern_len = pat.len();
            }
            if pat.is_empty() {
                trace!("pattern {} is empty and can never match", i);
                continue;
            }

            let mut prev = START;
            let mut saw_match = false;
            for (depth, &b) in pat.iter().enumerate() {
                // Under leftmost-first semantics, a pattern that has an
                // earlier pattern as a prefix can never match, since the
                // earlier pattern always wins. Leaving it out of the trie is
                // required for the search to be correct, not just smaller.
                saw_match = saw_match || self.nfa.states[prev].is_match();
                if self.builder.match_kind.is_leftmost_first() && saw_match {
                    trace!("pattern {} is shadowed by a prefix", i);
                    continue 'PATTERNS;
                }

                let next = self.nfa.states[prev].trans.next(b);
                if next != FAIL {
                    prev = next;
                    continue;
                }
                let next = self.add_state(depth + 1)?;
                self.nfa.state_mut(next).parent = prev;
                self.add_edge(prev, b, next);
                prev = next;
            }
            self.nfa.state_mut(prev).matches.push((pid, pat.len()));
            self.terminals.push((prev, pat.len()));
        }
        Ok(())
    }

    /// Add a transition from `from` to `to` on `byte`, along with every byte
    /// equivalent to it that doesn't have a transition already.
    fn add_edge(&mut self, from: StateID, byte: u8, to: StateID) {
        self.byte_class_set.set_range(byte, byte);
        self.nfa.state_mut(from).trans.set_next(byte, to);
        let equivalence = match self.equivalence {
            None => return,
            Some(ref equivalence) => equivalence,
        };
        for eb in equivalence.equivalents(byte).iter() {
            if self.nfa.states[from].trans.next(eb) == FAIL {
                self.byte_class_set.set_range(eb, eb);
                self.nfa.states[from].trans.set_next(eb, to);
            }
        }
    }

    /// Set all transitions on the dead state to point back to itself.
    fn add_dead_state_loop(&mut self) {
        let dead = self.nfa.state_mut(DEAD);
        dead.trans = Transitions::dense();
        for b in 0..=255u8 {
            dead.trans.set_next(b, DEAD);
        }
        dead.fail = DEAD;
    }

    /// Add transitions back to the start state for every byte that doesn't
    /// begin a pattern. This makes the start state's transition function
    /// total, which is what makes the search unanchored.
    fn add_start_state_loop(&mut self) {
        let start = self.nfa.state_mut(START);
        for b in 0..=255u8 {
            if start.trans.next(b) == FAIL {
                start.trans.set_next(b, START);
            }
        }
        start.fail = START;
    }

    /// Compute the failure transitions for standard match semantics, and
    /// copy every failure state's matches into the states that fail to it.
    ///
    /// States are visited in breadth first order, which guarantees that a
    /// state's failure transition (which always points to a shallower state)
    /// is complete before the state itself is visited.
    fn fill_failure_transitions_standard(&mut self) {
        let mut queue = VecDeque::new();
        let mut seen = vec![false; self.nfa.states.len()];
        for (_, next) in self.nfa.transitions(START) {
            if next == START || seen[next] {
                continue;
            }
            seen[next] = true;
            queue.push_back(next);
        }
        while let Some(id) = queue.pop_front() {
            let trans: Vec<(u8, StateID)> = self.nfa.transitions(id).collect();
            for (b, next) in trans {
                // Equivalent bytes lead to the same state, so states can be
                // reached more than once here.
                if seen[next] {
                    continue;
                }
                seen[next] = true;
                queue.push_back(next);

                let fail = self.find_fail(id, b);
                self.nfa.state_mut(next).fail = fail;
                self.nfa.copy_matches(fail, next);
            }
        }
    }

    /// Compute the failure transitions for leftmost match semantics.
    ///
    /// This is like the standard construction, except that once a search
    /// has seen a match, it must never follow a failure transition that
    /// forgets where that match started. Such transitions point to the dead
    /// state instead, which ends the search. No matches are copied across
    /// them.
    fn fill_failure_transitions_leftmost(&mut self) {
        /// A state in the queue, along with the depth at which the earliest
        /// match seen on the path to it starts (if any).
        #[derive(Clone, Copy, Debug)]
        struct QueuedState {
            id: StateID,
            match_at_depth: Option<usize>,
        }

        impl QueuedState {
            fn next_queued_state(
                &self,
                nfa: &NFA,
                id: StateID,
            ) -> QueuedState {
                let match_at_depth = earliest(
                    self.match_at_depth,
                    nfa.states[id].match_start_depth(),
                );
                QueuedState { id, match_at_depth }
            }
        }

        fn earliest(d1: Option<usize>, d2: Option<usize>) -> Option<usize> {
            match (d1, d2) {
                (Some(d1), Some(d2)) => Some(core::cmp::min(d1, d2)),
                (d1, d2) => d1.or(d2),
            }
        }

        let mut queue = VecDeque::new();
        let mut seen = vec![false; self.nfa.states.len()];
        let start = QueuedState { id: START, match_at_depth: None };
        let children: Vec<StateID> =
            self.nfa.transitions(START).map(|(_, next)| next).collect();
        for next in children {
            if next == START {
                continue;
            }
            if !seen[next] {
                seen[next] = true;
                queue.push_back(start.next_queued_state(&self.nfa, next));
            }
            // The failure transition of a state right after the start state
            // necessarily leads back to the start state, which a leftmost
            // search must never do once it has seen a match.
            if self.nfa.states[next].is_match() {
                self.nfa.state_mut(next).fail = DEAD;
            }
        }
        while let Some(item) = queue.pop_front() {
            let trans: Vec<(u8, StateID)> =
                self.nfa.transitions(item.id).collect();
            let any_trans = !trans.is_empty();
            for (b, next_id) in trans {
                if seen[next_id] {
                    continue;
                }
                seen[next_id] = true;
                let mut next = item.next_queued_state(&self.nfa, next_id);

                let fail = self.find_fail(item.id, b);
                // Failure transitions point to a suffix of the path seen so
                // far. A suffix retains the match seen on the path only if it
                // is deep enough to still contain the match's start.
                if let Some(match_depth) = next.match_at_depth {
                    let fail_depth = self.nfa.states[fail].depth;
                    let next_depth = self.nfa.states[next_id].depth;
                    if next_depth - match_depth + 1 > fail_depth {
                        self.nfa.state_mut(next_id).fail = DEAD;
                        queue.push_back(next);
                        continue;
                    }
                    debug_assert_ne!(
                        START, fail,
                        "states at or after a match must never fail back \
                         to the start state in a leftmost search",
                    );
                }
                self.nfa.state_mut(next_id).fail = fail;
                self.nfa.copy_matches(fail, next_id);
                // A match inherited from the failure state is a match seen
                // on the path too, so descendants must not forget it.
                next.match_at_depth = earliest(
                    next.match_at_depth,
                    self.nfa.states[next_id].match_start_depth(),
                );
                queue.push_back(next);
            }
            // A match state with no way forward must not restart the search.
            if !any_trans && self.nfa.states[item.id].is_match() {
                self.nfa.state_mut(item.id).fail = DEAD;
            }
        }
    }

    /// Find the failure state for the child of `parent` on `byte`, by
    /// following the failure transitions of `parent` until one has a
    /// transition on `byte`.
    fn find_fail(&self, parent: StateID, byte: u8) -> StateID {
        // Children of the start state always fail back to it.
        if parent == START {
            return START;
        }
        let mut fail = self.nfa.states[parent].fail;
        loop {
            // Only reachable in a leftmost construction. The chain passed
            // through a match state, so falling back any further would
            // forget where that match started.
            if fail == DEAD {
                return DEAD;
            }
            let next = self.nfa.states[fail].trans.next(byte);
            if next != FAIL {
                return next;
            }
            fail = self.nfa.states[fail].fail;
        }
    }

    /// Add a new state at the given depth and return its ID.
    fn add_state(&mut self, depth: usize) -> Result<StateID, BuildError> {
        let len = self.nfa.states.len();
        let id = StateID::new(len)
            .map_err(|_| BuildError::too_many_states(len + 1))?;
        let trans = if depth < self.builder.dense_depth {
            Transitions::dense()
        } else {
            Transitions::sparse()
        };
        self.nfa.states.push(State {
            trans,
            matches: vec![],
            fail: START,
            parent: START,
            depth,
        });
        Ok(id)
    }
}

/// Safely return two mutable borrows to two different locations in the given
/// slice.
///
/// This panics if i == j.
fn get_two_mut<T>(xs: &mut [T], i: StateID, j: StateID) -> (&mut T, &mut T) {
    let (i, j) = (i.as_usize(), j.as_usize());
    assert!(i != j, "{} must not be equal to {}", i, j);
    if i < j {
        let (before, after) = xs.split_at_mut(j);
        (&mut before[i], &mut after[0])
    } else {
        let (before, after) = xs.split_at_mut(i);
        (&mut after[0], &mut before[j])
    }
}
