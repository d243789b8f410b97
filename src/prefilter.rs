/*!
Prefilters for quickly skipping parts of a haystack that cannot match.

A prefilter is consulted only while an automaton sits in its start state. It
reports the next position at which a match *might* start, and the search
jumps straight there. Prefilters never report false negatives, but may report
any number of false positives.

Two prefilters are provided, both built from the finished NFA:

* `StartBytes` applies when at most three distinct bytes lead out of the
start state. It runs `memchr` (or `memchr2`/`memchr3`) on those bytes.
* `RareBytes` picks, for every pattern, the byte (at some offset into the
pattern) that is least likely to occur in typical text, and searches for those
bytes instead. A hit at position `i` for a byte that occurs at most `offset`
bytes into any pattern means a match can start no earlier than `i - offset`.

Whether a prefilter is worth using at all depends on the haystack, so every
search carries a [`PrefilterState`] that watches how many bytes each call
skips and turns the prefilter off (for the rest of that search) when it isn't
pulling its weight.
*/

use core::{
    fmt::Debug,
    panic::{RefUnwindSafe, UnwindSafe},
};

use alloc::sync::Arc;

use crate::{
    nfa::NFA,
    util::{alphabet::ByteSet, id::StateID},
};

/// A candidate is the result of running a prefilter on a haystack at a
/// particular position. The result is either no match or a possible match.
///
/// When no match is returned, the prefilter is guaranteeing that no possible
/// match can be found in the haystack, and the caller may trust this. That is,
/// all correct prefilters must never report false negatives.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Candidate {
    /// The prefilter reports that no match is possible. Prefilter
    /// implementations will never report false negatives.
    None,
    /// The prefilter reports that a match *may* start at the given position.
    /// When this variant is reported, it may correspond to a false positive.
    PossibleStartOfMatch(usize),
}

impl Candidate {
    /// Convert this candidate into an option of the possible starting
    /// position.
    pub(crate) fn into_option(self) -> Option<usize> {
        match self {
            Candidate::None => None,
            Candidate::PossibleStartOfMatch(start) => Some(start),
        }
    }
}

/// A prefilter describes the behavior of fast literal scanners for quickly
/// skipping past bytes in the haystack that we know cannot possibly
/// participate in a match.
pub(crate) trait Prefilter:
    Debug + Send + Sync + RefUnwindSafe + UnwindSafe + 'static
{
    /// Returns the next possible match candidate. This may yield false
    /// positives, so callers must confirm a match starting at the position
    /// returned. This, however, must never produce false negatives. That is,
    /// this must, at minimum, return the starting position of the next match
    /// in the given haystack after or at the given position.
    fn next_candidate(
        &self,
        state: &mut PrefilterState,
        haystack: &[u8],
        at: usize,
    ) -> Candidate;

    /// Returns the approximate total amount of heap used by this prefilter,
    /// in units of bytes.
    fn heap_bytes(&self) -> usize;
}

/// Run the given prefilter and record how far it skipped in the given state.
#[inline]
pub(crate) fn next(
    prestate: &mut PrefilterState,
    prefilter: &dyn Prefilter,
    haystack: &[u8],
    at: usize,
) -> Candidate {
    let cand = prefilter.next_candidate(prestate, haystack, at);
    match cand {
        Candidate::None => {
            prestate.update_skipped_bytes(haystack.len() - at);
        }
        Candidate::PossibleStartOfMatch(i) => {
            prestate.update_skipped_bytes(i - at);
        }
    }
    cand
}

/// PrefilterState tracks state associated with the effectiveness of a
/// prefilter. It is used to track how many bytes, on average, are skipped by
/// the prefilter. If this average dips below a certain threshold over time,
/// then the state renders the prefilter inert and stops using it.
///
/// A prefilter state should be created for each search. (Where creating an
/// iterator via, e.g., `find_iter`, is treated as a single search.) It is
/// never shared between searches.
#[derive(Clone, Debug)]
pub(crate) struct PrefilterState {
    /// The number of skips that has been executed.
    skips: usize,
    /// The total number of bytes that have been skipped.
    skipped: usize,
    /// The maximum length of a match. This is used to help determine how many
    /// bytes on average should be skipped in order for a prefilter to be
    /// effective.
    max_match_len: usize,
    /// Once this heuristic has been deemed permanently ineffective, it will be
    /// inert throughout the rest of its lifetime. This serves as a cheap way
    /// to check inertness.
    inert: bool,
    /// The last (absolute) position at which a prefilter scanned to.
    /// Prefilters can use this position to determine whether to re-scan or
    /// not.
    ///
    /// Unlike other things that impact effectiveness, this is a fleeting
    /// condition. That is, a prefilter can be considered ineffective if it is
    /// at a position before `last_scan_at`, but can become effective again
    /// once the search moves past `last_scan_at`.
    last_scan_at: usize,
}

impl PrefilterState {
    /// The minimum number of skip attempts to try before considering whether
    /// a prefilter is effective or not.
    const MIN_SKIPS: usize = 40;

    /// The minimum amount of bytes that skipping must average, expressed as
    /// a factor of the maximum match length.
    ///
    /// That is, after MIN_SKIPS have occurred, if the average number of bytes
    /// skipped ever falls below MIN_AVG_FACTOR * max-match-length, then the
    /// prefilter will be rendered inert.
    const MIN_AVG_FACTOR: usize = 2;

    /// Create a fresh prefilter state.
    pub(crate) fn new(max_match_len: usize) -> PrefilterState {
        PrefilterState {
            skips: 0,
            skipped: 0,
            max_match_len,
            inert: false,
            last_scan_at: 0,
        }
    }

    /// Updates the position at which the last scan stopped. This may be
    /// greater than the position of the last candidate reported. For example,
    /// searching for the "rare" byte `z` in `abczdef` for the pattern `abcz`
    /// will report a candidate at position `0`, but the end of its last scan
    /// will be at position `3`.
    ///
    /// It is always correct to never update the last scan position. The key
    /// is setting it to a position in the future at which it makes sense to
    /// restart the prefilter.
    pub(crate) fn update_last_scan(&mut self, at: usize) {
        if at > self.last_scan_at {
            self.last_scan_at = at;
        }
    }

    /// Return true if and only if this state indicates that a prefilter is
    /// still effective. If the prefilter is not effective, then this state
    /// is rendered "inert." At which point, all subsequent calls to
    /// `is_effective` on this state will return `false`.
    ///
    /// `at` should correspond to the current starting position of the search.
    pub(crate) fn is_effective(&mut self, at: usize) -> bool {
        if self.inert {
            return false;
        }
        if at < self.last_scan_at {
            return false;
        }
        if self.skips < PrefilterState::MIN_SKIPS {
            return true;
        }

        let min_avg = PrefilterState::MIN_AVG_FACTOR * self.max_match_len;
        if self.skipped >= min_avg * self.skips {
            return true;
        }

        // We're inert.
        trace!(
            "prefilter inert after {} skips over {} bytes (at {})",
            self.skips,
            self.skipped,
            at,
        );
        self.inert = true;
        false
    }

    /// Update this state with the number of bytes skipped on the last
    /// invocation of the prefilter.
    fn update_skipped_bytes(&mut self, skipped: usize) {
        self.skips += 1;
        self.skipped += skipped;
    }

    #[cfg(test)]
    pub(crate) fn is_inert(&self) -> bool {
        self.inert
    }
}

/// Build a prefilter from a finished NFA, if a useful one exists.
///
/// The prefilter is chosen by comparing how common the bytes each candidate
/// scanner would look for are. Ties favor `StartBytes`, since its candidates
/// are exact starting positions.
///
/// `patterns` lists the terminal state and length of every pattern that was
/// inserted into the trie.
pub(crate) fn build(
    nfa: &NFA,
    patterns: &[(StateID, usize)],
) -> Option<Arc<dyn Prefilter>> {
    if patterns.is_empty() {
        debug!("prefilter: no patterns, using empty prefilter");
        return Some(Arc::new(Empty));
    }
    let start = StartBytesBuilder::from_nfa(nfa).build();
    let rare = RareBytesBuilder::from_nfa(nfa, patterns).build();
    match (start, rare) {
        (None, None) => {
            debug!("prefilter: none applicable");
            None
        }
        (Some(start), None) => {
            debug!("prefilter: start bytes {:?}", start);
            Some(Arc::new(start))
        }
        (None, Some(rare)) => {
            debug!("prefilter: rare bytes {:?}", rare);
            Some(Arc::new(rare))
        }
        (Some(start), Some(rare)) => {
            if rare.max_rank() < start.max_rank() {
                debug!("prefilter: rare bytes {:?}", rare);
                Some(Arc::new(rare))
            } else {
                debug!("prefilter: start bytes {:?}", start);
                Some(Arc::new(start))
            }
        }
    }
}

/// A prefilter for an automaton with no patterns. It never reports a
/// candidate, so every search ends immediately.
#[derive(Clone, Debug)]
struct Empty;

impl Prefilter for Empty {
    fn next_candidate(
        &self,
        _: &mut PrefilterState,
        _: &[u8],
        _: usize,
    ) -> Candidate {
        Candidate::None
    }

    fn heap_bytes(&self) -> usize {
        0
    }
}

/// A builder for constructing a starting byte prefilter.
///
/// A starting byte prefilter is a simplistic prefilter that looks for
/// possible matches by reporting all positions corresponding to a particular
/// byte. This generally only takes effect when there are at most 3 distinct
/// possible starting bytes.
#[derive(Clone, Debug)]
struct StartBytesBuilder {
    bytes: ByteSet,
}

impl StartBytesBuilder {
    fn from_nfa(nfa: &NFA) -> StartBytesBuilder {
        let start = nfa.start_state_id();
        let mut bytes = ByteSet::empty();
        for (b, next) in nfa.transitions(start) {
            if next != start {
                bytes.add(b);
            }
        }
        StartBytesBuilder { bytes }
    }

    fn build(&self) -> Option<StartBytes> {
        let mut bytes = [0u8; 3];
        let len = self.bytes.len();
        if len == 0 || len > bytes.len() {
            return None;
        }
        for (slot, b) in bytes.iter_mut().zip(self.bytes.iter()) {
            *slot = b;
        }
        Some(StartBytes { bytes, len })
    }
}

/// A prefilter that searches for one of up to three starting bytes.
#[derive(Clone, Debug)]
struct StartBytes {
    bytes: [u8; 3],
    len: usize,
}

impl StartBytes {
    fn max_rank(&self) -> u8 {
        self.bytes[..self.len].iter().map(|&b| rank(b)).max().unwrap_or(0)
    }
}

impl Prefilter for StartBytes {
    fn next_candidate(
        &self,
        _: &mut PrefilterState,
        haystack: &[u8],
        at: usize,
    ) -> Candidate {
        let found = match self.len {
            1 => memchr::memchr(self.bytes[0], &haystack[at..]),
            2 => {
                memchr::memchr2(self.bytes[0], self.bytes[1], &haystack[at..])
            }
            _ => memchr::memchr3(
                self.bytes[0],
                self.bytes[1],
                self.bytes[2],
                &haystack[at..],
            ),
        };
        found
            .map(|i| Candidate::PossibleStartOfMatch(at + i))
            .unwrap_or(Candidate::None)
    }

    fn heap_bytes(&self) -> usize {
        0
    }
}

/// A builder for constructing a rare byte prefilter.
///
/// A rare byte prefilter attempts to pick out a small set of rare bytes that
/// occur in the patterns, and then quickly scan for those rare bytes. For
/// every pattern, only the single rarest byte is used. Since a pattern may be
/// matched through any of the bytes that label its trie edges (ASCII case
/// folding and byte equivalences add more than one), the whole label set of
/// the chosen edge is searched for.
#[derive(Clone, Debug)]
struct RareBytesBuilder {
    /// The set of rare bytes found so far.
    bytes: ByteSet,
    /// For each byte, the maximum offset at which it occurs in any pattern.
    /// This covers every byte of every pattern, not just the rare ones,
    /// since a rare byte of one pattern may sit deeper inside another.
    offsets: [usize; 256],
    /// Whether this prefilter should be used or not. It becomes unavailable
    /// as soon as the set of rare bytes grows too big.
    available: bool,
}

impl RareBytesBuilder {
    fn from_nfa(
        nfa: &NFA,
        patterns: &[(StateID, usize)],
    ) -> RareBytesBuilder {
        let mut builder = RareBytesBuilder {
            bytes: ByteSet::empty(),
            offsets: [0; 256],
            available: true,
        };
        for &(terminal, len) in patterns.iter() {
            builder.add(nfa, terminal, len);
            if !builder.available {
                break;
            }
        }
        builder
    }

    /// Choose the rarest edge along the trie path ending at `terminal` (of
    /// the given depth) and record all of its labels. The offset of every
    /// label along the path is recorded too.
    fn add(&mut self, nfa: &NFA, terminal: StateID, depth: usize) {
        let mut rarest: Option<(ByteSet, u8, usize)> = None;
        let mut child = terminal;
        for offset in (0..depth).rev() {
            let parent = nfa.parent(child);
            let mut labels = ByteSet::empty();
            for (b, next) in nfa.transitions(parent) {
                if next == child {
                    labels.add(b);
                    let slot = &mut self.offsets[usize::from(b)];
                    *slot = core::cmp::max(*slot, offset);
                }
            }
            let rank = labels.iter().map(rank).max().unwrap_or(0);
            // Walking backwards, so '<=' prefers earlier offsets on ties,
            // which keeps the lookback (and thus rescanning) small.
            if rarest.map_or(true, |(_, r, _)| rank <= r) {
                rarest = Some((labels, rank, offset));
            }
            child = parent;
        }
        let (labels, _, _) = match rarest {
            None => {
                self.available = false;
                return;
            }
            Some(rarest) => rarest,
        };
        for b in labels.iter() {
            self.bytes.add(b);
        }
        if self.bytes.len() > 3 {
            self.available = false;
        }
    }

    fn build(&self) -> Option<RareBytes> {
        if !self.available || self.bytes.is_empty() {
            return None;
        }
        let mut bytes = [0u8; 3];
        let mut offsets = [0usize; 3];
        let mut len = 0;
        for b in self.bytes.iter() {
            bytes[len] = b;
            offsets[len] = self.offsets[usize::from(b)];
            len += 1;
        }
        Some(RareBytes { bytes, offsets, len })
    }
}

/// A prefilter that searches for up to three rare bytes, each paired with
/// the maximum offset at which it occurs in a pattern.
#[derive(Clone, Debug)]
struct RareBytes {
    bytes: [u8; 3],
    offsets: [usize; 3],
    len: usize,
}

impl RareBytes {
    fn max_rank(&self) -> u8 {
        self.bytes[..self.len].iter().map(|&b| rank(b)).max().unwrap_or(0)
    }

    fn offset(&self, byte: u8) -> usize {
        for i in 0..self.len {
            if self.bytes[i] == byte {
                return self.offsets[i];
            }
        }
        0
    }
}

impl Prefilter for RareBytes {
    fn next_candidate(
        &self,
        state: &mut PrefilterState,
        haystack: &[u8],
        at: usize,
    ) -> Candidate {
        let found = match self.len {
            1 => memchr::memchr(self.bytes[0], &haystack[at..]),
            2 => {
                memchr::memchr2(self.bytes[0], self.bytes[1], &haystack[at..])
            }
            _ => memchr::memchr3(
                self.bytes[0],
                self.bytes[1],
                self.bytes[2],
                &haystack[at..],
            ),
        };
        match found {
            None => Candidate::None,
            Some(i) => {
                let pos = at + i;
                state.update_last_scan(pos);
                let offset = self.offset(haystack[pos]);
                let start = core::cmp::max(at, pos.saturating_sub(offset));
                Candidate::PossibleStartOfMatch(start)
            }
        }
    }

    fn heap_bytes(&self) -> usize {
        0
    }
}

/// Return a heuristic rank of how common the given byte is in the kind of
/// text a scanner typically sees (prose and code in mostly ASCII). Higher is
/// more common.
fn rank(b: u8) -> u8 {
    match b {
        b' ' => 255,
        b'e' => 254,
        b't' | b'a' | b'o' | b'i' | b'n' => 250,
        b's' | b'r' | b'h' | b'l' | b'd' => 245,
        b'c' | b'u' | b'm' | b'f' | b'p' | b'g' => 235,
        b'w' | b'y' | b'b' | b',' | b'.' | b'\n' => 225,
        b'v' | b'k' => 200,
        b'E' | b'T' | b'A' | b'O' | b'I' | b'N' | b'S' => 190,
        b'x' | b'j' | b'q' | b'z' => 180,
        b'A'..=b'Z' => 170,
        b'0'..=b'9' => 165,
        b'"' | b'\'' | b'-' | b'(' | b')' | b':' | b'_' | b'/' => 160,
        b'\t' | b'\r' => 150,
        b'!'..=b'~' => 120,
        0x80..=0xFF => 60,
        _ => 20,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_goes_inert_after_short_skips() {
        let mut state = PrefilterState::new(5);
        for _ in 0..PrefilterState::MIN_SKIPS {
            assert!(state.is_effective(0));
            state.update_skipped_bytes(1);
        }
        assert!(!state.is_effective(0));
        assert!(state.is_inert());
        // Once inert, always inert, even after long skips.
        state.update_skipped_bytes(1_000_000);
        assert!(!state.is_effective(0));
    }

    #[test]
    fn state_stays_effective_with_long_skips() {
        let mut state = PrefilterState::new(5);
        for _ in 0..(2 * PrefilterState::MIN_SKIPS) {
            assert!(state.is_effective(0));
            state.update_skipped_bytes(10);
        }
        assert!(state.is_effective(0));
    }

    #[test]
    fn last_scan_is_a_fleeting_condition() {
        let mut state = PrefilterState::new(5);
        state.update_last_scan(10);
        assert!(!state.is_effective(5));
        assert!(state.is_effective(10));
        assert!(!state.is_inert());
    }

    #[test]
    fn start_bytes() {
        let pre = StartBytes { bytes: [b'x', b'y', 0], len: 2 };
        let mut state = PrefilterState::new(1);
        let hay = b"aaaayaaax";
        let c = next(&mut state, &pre, hay, 0);
        assert_eq!(Candidate::PossibleStartOfMatch(4), c);
        let c = next(&mut state, &pre, hay, 5);
        assert_eq!(Candidate::PossibleStartOfMatch(8), c);
        assert_eq!(Candidate::None, next(&mut state, &pre, hay, 9));
    }

    #[test]
    fn rare_bytes_look_behind() {
        let pre =
            RareBytes { bytes: [b'z', 0, 0], offsets: [3, 0, 0], len: 1 };
        let mut state = PrefilterState::new(4);
        let hay = b"xxxxabczxxx";
        let c = next(&mut state, &pre, hay, 0);
        assert_eq!(Candidate::PossibleStartOfMatch(4), c);
        // The scan position was recorded, so the prefilter shouldn't run
        // again until the search passes it.
        assert!(!state.is_effective(5));
        assert!(state.is_effective(7));
        // The candidate never moves backwards past the search position.
        let c = next(&mut state, &pre, hay, 6);
        assert_eq!(Candidate::PossibleStartOfMatch(6), c);
    }

    #[test]
    fn rare_bytes_look_behind_every_occurrence() {
        use crate::{automaton::Automaton, nfa};

        let cases: &[(&[&str], &[u8])] =
            &[(&["acb", "ca"], b"acb"), (&["ekez", "k"], b"ekez")];
        for &(patterns, haystack) in cases.iter() {
            let nfa = nfa::Builder::new().build(patterns).unwrap();
            let pre = nfa.prefilter().unwrap();
            let mut state = PrefilterState::new(nfa.max_pattern_len());
            // The rare byte of the short pattern also occurs one byte into
            // the long one, which starts at 0.
            assert_eq!(
                Candidate::PossibleStartOfMatch(0),
                next(&mut state, pre, haystack, 0),
                "patterns: {:?}",
                patterns,
            );
        }
    }

    #[test]
    fn ranks_favor_rare_bytes() {
        assert!(rank(b'z') < rank(b'e'));
        assert!(rank(b'Z') < rank(b'z'));
        assert!(rank(0xFF) < rank(b'#'));
        assert!(rank(0x00) < rank(0xFF));
    }
}
