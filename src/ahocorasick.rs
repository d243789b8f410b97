/*!
The public entry point: an Aho-Corasick automaton and its builder.

An [`AhoCorasick`] wraps either an NFA or a DFA behind an `Arc`, along with
the options that apply after a match is found (the whole-word filter) and a
pool of scratch space for replacements. All searching and replacing goes
through it.
*/

use core::fmt;

use alloc::{borrow::Cow, sync::Arc, vec::Vec};

use crate::{
    automaton::{Automaton, OverlappingState},
    dfa::{self, DFA},
    error::{BuildError, MatchError},
    nfa::{self, NFA},
    prefilter::PrefilterState,
    replace::{self, Scratch},
    text::Text,
    util::{
        alphabet::ByteEquivalence,
        iter::{FindIter, FindOverlappingIter},
        pool::{Pool, PoolGuard},
        search::{Match, MatchKind},
    },
};

/// An automaton for searching multiple patterns simultaneously.
///
/// An `AhoCorasick` is built once from a list of patterns, and can then
/// search any number of haystacks for all of them in a single pass. The time
/// a search takes is proportional to the length of the haystack (plus the
/// number of matches), regardless of how many patterns there are.
///
/// Each pattern is identified by its position in the list the automaton was
/// built from. This identifier is reported with every match as a
/// [`PatternID`](crate::PatternID).
///
/// # Semantics
///
/// Which matches are reported depends on the [`MatchKind`] the automaton was
/// built with. By default, [`MatchKind::Standard`] is used, which reports
/// matches as soon as they are seen. The leftmost match kinds are usually
/// closer to what one expects from "find and replace" style operations.
///
/// # Sharing
///
/// An automaton is immutable once built. It is cheap to clone (the automaton
/// itself is shared behind an `Arc`) and can be used from many threads at
/// once. All per-search state lives in the iterators and is never shared.
///
/// # Example
///
/// ```
/// use keyword_automata::{AhoCorasick, Match};
///
/// let ac = AhoCorasick::new(&["apple", "maple", "Snapple"]).unwrap();
/// let matches: Vec<Match> =
///     ac.find_iter("Nobody likes maple in their apple flavored Snapple.")
///         .collect();
/// // Standard semantics find 'apple' inside of 'Snapple' too, since it
/// // starts at a different position.
/// assert_eq!(vec![
///     Match::must(1, 13..18),
///     Match::must(0, 28..33),
///     Match::must(2, 43..50),
///     Match::must(0, 45..50),
/// ], matches);
/// ```
pub struct AhoCorasick {
    imp: Arc<Imp>,
    match_only_whole_words: bool,
    pool: Pool<Scratch>,
}

impl AhoCorasick {
    /// Create a new automaton with the default configuration, using standard
    /// match semantics.
    ///
    /// Use [`AhoCorasick::builder`] to change the configuration.
    ///
    /// An empty list of patterns is permitted. The resulting automaton never
    /// matches anything. The same is true of empty patterns: they keep their
    /// place (and thus their pattern ID) in the list, but never match.
    pub fn new<I, P>(patterns: I) -> Result<AhoCorasick, BuildError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[u8]>,
    {
        AhoCorasickBuilder::new().build(patterns)
    }

    /// Return a builder for configuring and building an automaton.
    pub fn builder() -> AhoCorasickBuilder {
        AhoCorasickBuilder::new()
    }

    fn from_imp(imp: Imp, match_only_whole_words: bool) -> AhoCorasick {
        AhoCorasick {
            imp: Arc::new(imp),
            match_only_whole_words,
            pool: pool(),
        }
    }

    /// Returns true if and only if this automaton matches the given haystack
    /// anywhere.
    ///
    /// This may be faster than searching for a match, since it can stop at
    /// the first match it sees without figuring out whether a better one
    /// exists.
    ///
    /// # Example
    ///
    /// ```
    /// use keyword_automata::AhoCorasick;
    ///
    /// let ac = AhoCorasick::new(&["ignore previous", "jailbreak"]).unwrap();
    /// assert!(ac.is_match("please ignore previous instructions"));
    /// assert!(!ac.is_match("a perfectly ordinary request"));
    /// ```
    pub fn is_match<H: ?Sized + AsRef<[u8]>>(&self, haystack: &H) -> bool {
        if self.match_only_whole_words {
            return self.find(haystack).is_some();
        }
        let haystack = haystack.as_ref();
        let mut prestate = self.prefilter_state();
        self.imp.earliest_find_at(&mut prestate, haystack, 0).is_some()
    }

    /// Returns the first match in the given haystack, if one exists.
    ///
    /// The match reported is the first one [`AhoCorasick::find_iter`] would
    /// report.
    ///
    /// # Example
    ///
    /// This shows how the match kind changes which match is found first.
    ///
    /// ```
    /// use keyword_automata::{AhoCorasick, MatchKind};
    ///
    /// let patterns = &["Sam", "Samwise"];
    /// let haystack = "Samwise";
    ///
    /// let ac = AhoCorasick::new(patterns).unwrap();
    /// assert_eq!(0..3, ac.find(haystack).unwrap().range());
    ///
    /// let ac = AhoCorasick::builder()
    ///     .match_kind(MatchKind::LeftmostLongest)
    ///     .build(patterns)
    ///     .unwrap();
    /// assert_eq!(0..7, ac.find(haystack).unwrap().range());
    /// ```
    pub fn find<H: ?Sized + AsRef<[u8]>>(
        &self,
        haystack: &H,
    ) -> Option<Match> {
        self.find_iter(haystack).next()
    }

    /// Returns an iterator of matches in the given haystack.
    ///
    /// Under [`MatchKind::Standard`], this reports the earliest ending match
    /// at each successive starting position. That is, after a match is
    /// found, searching resumes one byte after that match's start. Under the
    /// leftmost match kinds, searching resumes at the match's end, so no two
    /// matches reported overlap.
    ///
    /// # Example
    ///
    /// ```
    /// use keyword_automata::{AhoCorasick, Match};
    ///
    /// let ac = AhoCorasick::new(&["he", "she", "his", "hers"]).unwrap();
    /// let matches: Vec<Match> = ac.find_iter("ushers").collect();
    /// assert_eq!(vec![Match::must(1, 1..4), Match::must(0, 2..4)], matches);
    /// ```
    pub fn find_iter<'a, 'h, H: ?Sized + AsRef<[u8]>>(
        &'a self,
        haystack: &'h H,
    ) -> FindIter<'a, 'h> {
        FindIter::new(self, haystack.as_ref())
    }

    /// Returns an iterator of every match in the given haystack, including
    /// overlapping ones.
    ///
    /// # Panics
    ///
    /// This panics when this automaton's match kind is not
    /// [`MatchKind::Standard`]. Use
    /// [`AhoCorasick::try_find_overlapping_iter`] to handle that case
    /// without panicking.
    ///
    /// # Example
    ///
    /// ```
    /// use keyword_automata::{AhoCorasick, Match};
    ///
    /// let ac = AhoCorasick::new(&["he", "she", "his", "hers"]).unwrap();
    /// let matches: Vec<Match> = ac.find_overlapping_iter("ushers").collect();
    /// assert_eq!(vec![
    ///     Match::must(1, 1..4),
    ///     Match::must(0, 2..4),
    ///     Match::must(3, 2..6),
    /// ], matches);
    /// ```
    pub fn find_overlapping_iter<'a, 'h, H: ?Sized + AsRef<[u8]>>(
        &'a self,
        haystack: &'h H,
    ) -> FindOverlappingIter<'a, 'h> {
        match self.try_find_overlapping_iter(haystack) {
            Ok(it) => it,
            Err(err) => panic!(
                "{}\nto handle this case, use try_find_overlapping_iter",
                err,
            ),
        }
    }

    /// Like [`AhoCorasick::find_overlapping_iter`], but returns an error
    /// instead of panicking when this automaton's match kind is not
    /// [`MatchKind::Standard`].
    pub fn try_find_overlapping_iter<'a, 'h, H: ?Sized + AsRef<[u8]>>(
        &'a self,
        haystack: &'h H,
    ) -> Result<FindOverlappingIter<'a, 'h>, MatchError> {
        let kind = self.match_kind();
        if !kind.supports_overlapping() {
            return Err(MatchError::invalid_match_kind(kind));
        }
        Ok(FindOverlappingIter::new(self, haystack.as_ref()))
    }

    /// Returns all matches that [`AhoCorasick::find_iter`] reports, in
    /// order.
    pub fn find_all<H: ?Sized + AsRef<[u8]>>(
        &self,
        haystack: &H,
    ) -> Vec<Match> {
        replace::find_all(self, haystack.as_ref())
    }

    /// Replace every match in the haystack with the replacement for its
    /// pattern. `replacements[i]` replaces matches of the `i`th pattern.
    ///
    /// Replaced regions never overlap. Under [`MatchKind::Standard`], a
    /// match that overlaps one already replaced is left alone. When there is
    /// nothing to replace, the haystack is returned without copying it.
    ///
    /// # Panics
    ///
    /// This panics when the number of replacements is not equal to the
    /// number of patterns. Use [`AhoCorasick::try_replace_all`] to handle
    /// that case without panicking.
    ///
    /// # Example
    ///
    /// ```
    /// use keyword_automata::AhoCorasick;
    ///
    /// let ac = AhoCorasick::new(&["cat", "dog"]).unwrap();
    /// let result = ac.replace_all("a cat and a dog", &["CAT", "DOG"]);
    /// assert_eq!("a CAT and a DOG", result);
    /// ```
    pub fn replace_all<'h, T, R>(
        &self,
        haystack: &'h T,
        replacements: &[R],
    ) -> Cow<'h, T>
    where
        T: ?Sized + Text,
        R: AsRef<[u8]>,
    {
        match self.try_replace_all(haystack, replacements) {
            Ok(result) => result,
            Err(err) => {
                panic!("{}\nto handle this case, use try_replace_all", err)
            }
        }
    }

    /// Like [`AhoCorasick::replace_all`], but returns an error instead of
    /// panicking when the number of replacements is not equal to the number
    /// of patterns.
    pub fn try_replace_all<'h, T, R>(
        &self,
        haystack: &'h T,
        replacements: &[R],
    ) -> Result<Cow<'h, T>, MatchError>
    where
        T: ?Sized + Text,
        R: AsRef<[u8]>,
    {
        replace::replace_all(self, haystack, replacements)
    }

    /// Replace every match in the haystack with the same replacement.
    ///
    /// # Example
    ///
    /// ```
    /// use keyword_automata::AhoCorasick;
    ///
    /// let ac = AhoCorasick::new(&["password", "api key"]).unwrap();
    /// let result = ac.replace_all_with(
    ///     "my password and api key are hunter2",
    ///     "[REDACTED]",
    /// );
    /// assert_eq!("my [REDACTED] and [REDACTED] are hunter2", result);
    /// ```
    pub fn replace_all_with<'h, T, R>(
        &self,
        haystack: &'h T,
        replacement: R,
    ) -> Cow<'h, T>
    where
        T: ?Sized + Text,
        R: AsRef<[u8]>,
    {
        replace::replace_all_with(self, haystack, replacement)
    }

    /// Replace every match in the haystack with whatever the given closure
    /// returns for it.
    ///
    /// The closure is called once for each match, in order. When it returns
    /// `None`, replacing stops. That match, and everything after it, is
    /// copied to the result unchanged.
    ///
    /// # Example
    ///
    /// ```
    /// use keyword_automata::AhoCorasick;
    ///
    /// let ac = AhoCorasick::new(&["one", "two", "three"]).unwrap();
    /// let mut count = 0;
    /// let result = ac.replace_all_func("one two three", |m| {
    ///     count += 1;
    ///     if count > 2 {
    ///         return None;
    ///     }
    ///     Some(m.pattern().as_usize().to_string())
    /// });
    /// assert_eq!("0 1 three", result);
    /// ```
    pub fn replace_all_func<'h, T, R, F>(
        &self,
        haystack: &'h T,
        replacer: F,
    ) -> Cow<'h, T>
    where
        T: ?Sized + Text,
        R: AsRef<[u8]>,
        F: FnMut(&Match) -> Option<R>,
    {
        replace::replace_all_func(self, haystack, replacer)
    }

    /// Returns the match semantics this automaton was built with.
    pub fn match_kind(&self) -> MatchKind {
        self.imp.match_kind()
    }

    /// Returns true if and only if this automaton only reports matches that
    /// are not adjacent to a letter or digit.
    pub fn match_only_whole_words(&self) -> bool {
        self.match_only_whole_words
    }

    /// Returns the number of patterns this automaton was built from,
    /// including empty patterns.
    pub fn patterns_len(&self) -> usize {
        self.imp.patterns_len()
    }

    /// Returns the length, in bytes, of the longest pattern.
    pub fn max_pattern_len(&self) -> usize {
        self.imp.max_pattern_len()
    }

    /// Returns which kind of automaton is used to execute searches.
    pub fn kind(&self) -> AhoCorasickKind {
        match *self.imp {
            Imp::NFA(_) => AhoCorasickKind::NFA,
            Imp::DFA(_) => AhoCorasickKind::DFA,
        }
    }

    /// Returns the approximate total amount of heap used by this automaton,
    /// in units of bytes.
    pub fn memory_usage(&self) -> usize {
        self.imp.memory_usage()
    }

    pub(crate) fn prefilter_state(&self) -> PrefilterState {
        PrefilterState::new(self.imp.max_pattern_len())
    }

    pub(crate) fn find_at_imp(
        &self,
        prestate: &mut PrefilterState,
        haystack: &[u8],
        at: usize,
    ) -> Option<Match> {
        self.imp.find_at(prestate, haystack, at)
    }

    pub(crate) fn overlapping_find_at_imp(
        &self,
        prestate: &mut PrefilterState,
        haystack: &[u8],
        at: usize,
        state: &mut OverlappingState,
    ) -> Option<Match> {
        self.imp.overlapping_find_at(prestate, haystack, at, state)
    }

    pub(crate) fn scratch(&self) -> PoolGuard<'_, Scratch, fn() -> Scratch> {
        self.pool.get()
    }
}

impl Clone for AhoCorasick {
    fn clone(&self) -> AhoCorasick {
        // The automaton is shared, but each clone gets its own scratch pool.
        AhoCorasick {
            imp: Arc::clone(&self.imp),
            match_only_whole_words: self.match_only_whole_words,
            pool: pool(),
        }
    }
}

impl fmt::Debug for AhoCorasick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AhoCorasick")
            .field("imp", &self.imp)
            .field("match_only_whole_words", &self.match_only_whole_words)
            .finish()
    }
}

fn pool() -> Pool<Scratch> {
    let create: fn() -> Scratch = Scratch::new;
    Pool::new(create)
}

/// The kind of automaton an [`AhoCorasick`] uses to execute searches.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AhoCorasickKind {
    /// A trie with failure transitions that are followed while searching.
    /// Cheap to build and small, but searching may need to follow several
    /// transitions per byte.
    NFA,
    /// A table with every failure transition precomputed. Searching takes
    /// exactly one transition per byte, but the table needs much more
    /// memory.
    DFA,
}

/// The automaton implementation behind an [`AhoCorasick`].
#[derive(Debug)]
enum Imp {
    NFA(NFA),
    DFA(DFA),
}

impl Imp {
    fn match_kind(&self) -> MatchKind {
        match *self {
            Imp::NFA(ref nfa) => nfa.match_kind(),
            Imp::DFA(ref dfa) => dfa.match_kind(),
        }
    }

    fn patterns_len(&self) -> usize {
        match *self {
            Imp::NFA(ref nfa) => nfa.patterns_len(),
            Imp::DFA(ref dfa) => dfa.patterns_len(),
        }
    }

    fn max_pattern_len(&self) -> usize {
        match *self {
            Imp::NFA(ref nfa) => nfa.max_pattern_len(),
            Imp::DFA(ref dfa) => dfa.max_pattern_len(),
        }
    }

    fn memory_usage(&self) -> usize {
        match *self {
            Imp::NFA(ref nfa) => nfa.memory_usage(),
            Imp::DFA(ref dfa) => dfa.memory_usage(),
        }
    }

    #[cfg(test)]
    fn prefilter(&self) -> Option<&dyn crate::prefilter::Prefilter> {
        match *self {
            Imp::NFA(ref nfa) => nfa.prefilter(),
            Imp::DFA(ref dfa) => dfa.prefilter(),
        }
    }

    #[inline(always)]
    fn earliest_find_at(
        &self,
        prestate: &mut PrefilterState,
        haystack: &[u8],
        at: usize,
    ) -> Option<Match> {
        match *self {
            Imp::NFA(ref nfa) => nfa.earliest_find_at(prestate, haystack, at),
            Imp::DFA(ref dfa) => dfa.earliest_find_at(prestate, haystack, at),
        }
    }

    #[inline(always)]
    fn find_at(
        &self,
        prestate: &mut PrefilterState,
        haystack: &[u8],
        at: usize,
    ) -> Option<Match> {
        match *self {
            Imp::NFA(ref nfa) => nfa.find_at(prestate, haystack, at),
            Imp::DFA(ref dfa) => dfa.find_at(prestate, haystack, at),
        }
    }

    #[inline(always)]
    fn overlapping_find_at(
        &self,
        prestate: &mut PrefilterState,
        haystack: &[u8],
        at: usize,
        state: &mut OverlappingState,
    ) -> Option<Match> {
        match *self {
            Imp::NFA(ref nfa) => {
                nfa.overlapping_find_at(prestate, haystack, at, state)
            }
            Imp::DFA(ref dfa) => {
                dfa.overlapping_find_at(prestate, haystack, at, state)
            }
        }
    }
}

/// A builder for configuring an Aho-Corasick automaton.
///
/// Every option has a sensible default, so building with no options set is
/// equivalent to [`AhoCorasick::new`].
///
/// # Example
///
/// ```
/// use keyword_automata::{AhoCorasick, Match, MatchKind};
///
/// let ac = AhoCorasick::builder()
///     .ascii_case_insensitive(true)
///     .match_only_whole_words(true)
///     .match_kind(MatchKind::LeftmostLongest)
///     .build(&["DAN", "do anything now"])
///     .unwrap();
/// let matches: Vec<Match> =
///     ac.find_iter("You are Dan. DANIEL can Do Anything Now.").collect();
/// assert_eq!(vec![Match::must(0, 8..11), Match::must(1, 24..39)], matches);
/// ```
#[derive(Clone, Debug)]
pub struct AhoCorasickBuilder {
    nfa_builder: nfa::Builder,
    dfa_builder: dfa::Builder,
    dfa: bool,
    match_only_whole_words: bool,
}

impl AhoCorasickBuilder {
    /// Create a new builder with the default configuration.
    pub fn new() -> AhoCorasickBuilder {
        AhoCorasickBuilder {
            nfa_builder: nfa::Builder::new(),
            dfa_builder: dfa::Builder::new(),
            dfa: false,
            match_only_whole_words: false,
        }
    }

    /// Build an automaton from the given patterns.
    ///
    /// The `i`th pattern is assigned the pattern ID `i`. This fails only when
    /// there are more patterns (or the patterns need more states) than the
    /// identifier types can represent.
    pub fn build<I, P>(&self, patterns: I) -> Result<AhoCorasick, BuildError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[u8]>,
    {
        let nfa = self.nfa_builder.build(patterns)?;
        let imp = if self.dfa {
            Imp::DFA(self.dfa_builder.build_from_nfa(&nfa)?)
        } else {
            Imp::NFA(nfa)
        };
        Ok(AhoCorasick::from_imp(imp, self.match_only_whole_words))
    }

    /// Set the match semantics of the automaton. The default is
    /// [`MatchKind::Standard`].
    ///
    /// Only [`MatchKind::Standard`] supports overlapping searches.
    pub fn match_kind(&mut self, kind: MatchKind) -> &mut AhoCorasickBuilder {
        self.nfa_builder.match_kind(kind);
        self
    }

    /// Enable ASCII case insensitive matching. When enabled, `A-Z` and `a-z`
    /// match each other, both in patterns and haystacks. Bytes outside ASCII
    /// are not affected. This is disabled by default.
    pub fn ascii_case_insensitive(
        &mut self,
        yes: bool,
    ) -> &mut AhoCorasickBuilder {
        self.nfa_builder.ascii_case_insensitive(yes);
        self
    }

    /// Only report matches whose neighboring bytes are not letters or digits.
    /// This is disabled by default.
    ///
    /// The check looks at exactly one byte on each side of a match, read as
    /// a Latin-1 codepoint. It is not aware of multi-byte UTF-8.
    ///
    /// Under the leftmost match kinds, a rejected match is not replaced by a
    /// shorter match starting at the same position. For example, with the
    /// patterns `testing` and `testing 123` under
    /// [`MatchKind::LeftmostLongest`], the haystack `testing 12345` has no
    /// matches at all: `testing 123` is rejected because it is followed by
    /// `4`, and `testing` is never considered because it lost to the longer
    /// match.
    pub fn match_only_whole_words(
        &mut self,
        yes: bool,
    ) -> &mut AhoCorasickBuilder {
        self.match_only_whole_words = yes;
        self
    }

    /// Compile the automaton into a DFA. This makes searching faster at the
    /// expense of slower construction and (often much) higher memory usage.
    /// This is disabled by default.
    pub fn dfa(&mut self, yes: bool) -> &mut AhoCorasickBuilder {
        self.dfa = yes;
        self
    }

    /// Set a byte equivalence to apply while building. Every pattern byte
    /// then also matches every byte equivalent to it.
    ///
    /// This composes with [`AhoCorasickBuilder::ascii_case_insensitive`].
    /// See [`ByteEquivalence`] for an example.
    pub fn byte_equivalence(
        &mut self,
        equiv: ByteEquivalence,
    ) -> &mut AhoCorasickBuilder {
        self.nfa_builder.byte_equivalence(equiv);
        self
    }

    /// Enable the use of a prefilter to accelerate searches. This is enabled
    /// by default.
    ///
    /// A prefilter is used only when the patterns admit one, and searches
    /// stop using it on their own when it turns out to be ineffective for a
    /// particular haystack. Disabling it is mostly useful for testing.
    pub fn prefilter(&mut self, yes: bool) -> &mut AhoCorasickBuilder {
        self.nfa_builder.prefilter(yes);
        self
    }

    /// Set the depth below which NFA states use a dense transition table.
    /// The default is `2`.
    ///
    /// Dense states make each step of a search faster, but use a lot more
    /// memory than sparse states. Since searches spend most of their time
    /// in the states closest to the start state, making only those dense
    /// gets most of the speed for a fraction of the memory. This has no
    /// effect when [`AhoCorasickBuilder::dfa`] is enabled.
    pub fn dense_depth(&mut self, depth: usize) -> &mut AhoCorasickBuilder {
        self.nfa_builder.dense_depth(depth);
        self
    }

    /// Shrink the rows of a DFA's transition table by grouping bytes that no
    /// state distinguishes. This is disabled by default, in which case every
    /// row has exactly 256 entries. This has no effect unless
    /// [`AhoCorasickBuilder::dfa`] is enabled.
    pub fn byte_classes(&mut self, yes: bool) -> &mut AhoCorasickBuilder {
        self.dfa_builder.byte_classes(yes);
        self
    }
}

impl Default for AhoCorasickBuilder {
    fn default() -> AhoCorasickBuilder {
        AhoCorasickBuilder::new()
    }
}
