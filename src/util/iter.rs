/*!
Iterators over matches, and the whole-word filter they apply.

Both iterators own all per-search state (the prefilter state and, for
overlapping searches, the automaton state), so an [`AhoCorasick`] can be
shared freely while any number of iterators run over it.
*/

use crate::{
    ahocorasick::AhoCorasick,
    automaton::OverlappingState,
    prefilter::PrefilterState,
    util::search::Match,
};

/// An iterator of matches in a haystack.
///
/// Each search starts fresh from the automaton's start state. After a match,
/// the next search begins right after the match's start under
/// [`MatchKind::Standard`](crate::MatchKind::Standard), so matches that start
/// at different positions can be reported even when they overlap. A match
/// that starts before a reported match but ends after it is never reported,
/// since the search that could have found it stopped early. Under
/// the leftmost match kinds, the next search begins at the match's end, so
/// the matches reported never overlap.
///
/// When the automaton only matches whole words, candidates that are
/// adjacent to a letter or digit are skipped, and the search resumes right
/// after their start.
///
/// `'a` is the lifetime of the automaton and `'h` is the lifetime of the
/// haystack.
#[derive(Debug)]
pub struct FindIter<'a, 'h> {
    aut: &'a AhoCorasick,
    haystack: &'h [u8],
    prestate: PrefilterState,
    pos: usize,
}

impl<'a, 'h> FindIter<'a, 'h> {
    pub(crate) fn new(aut: &'a AhoCorasick, haystack: &'h [u8]) -> Self {
        let prestate = aut.prefilter_state();
        FindIter { aut, haystack, prestate, pos: 0 }
    }
}

impl<'a, 'h> Iterator for FindIter<'a, 'h> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        loop {
            if self.pos >= self.haystack.len() {
                return None;
            }
            let m = match self.aut.find_at_imp(
                &mut self.prestate,
                self.haystack,
                self.pos,
            ) {
                Some(m) => m,
                None => {
                    self.pos = self.haystack.len();
                    return None;
                }
            };
            if self.aut.match_only_whole_words()
                && !is_whole_word(self.haystack, &m)
            {
                self.pos = m.start() + 1;
                continue;
            }
            self.pos = if self.aut.match_kind().is_leftmost() {
                m.end()
            } else {
                m.start() + 1
            };
            return Some(m);
        }
    }
}

impl<'a, 'h> core::iter::FusedIterator for FindIter<'a, 'h> {}

/// An iterator of overlapping matches in a haystack.
///
/// This reports every match of every pattern, including matches that are
/// contained in other matches and several patterns matching at the same
/// position. Matches are reported in order of their end offset. Matches
/// that end at the same offset are reported longest first.
///
/// This can only be created from an automaton with
/// [`MatchKind::Standard`](crate::MatchKind::Standard) semantics.
///
/// `'a` is the lifetime of the automaton and `'h` is the lifetime of the
/// haystack.
#[derive(Debug)]
pub struct FindOverlappingIter<'a, 'h> {
    aut: &'a AhoCorasick,
    haystack: &'h [u8],
    prestate: PrefilterState,
    state: OverlappingState,
    pos: usize,
    done: bool,
}

impl<'a, 'h> FindOverlappingIter<'a, 'h> {
    pub(crate) fn new(aut: &'a AhoCorasick, haystack: &'h [u8]) -> Self {
        let prestate = aut.prefilter_state();
        FindOverlappingIter {
            aut,
            haystack,
            prestate,
            state: OverlappingState::start(),
            pos: 0,
            done: false,
        }
    }
}

impl<'a, 'h> Iterator for FindOverlappingIter<'a, 'h> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        loop {
            if self.done {
                return None;
            }
            let m = match self.aut.overlapping_find_at_imp(
                &mut self.prestate,
                self.haystack,
                self.pos,
                &mut self.state,
            ) {
                Some(m) => m,
                None => {
                    // The automaton state is left wherever the haystack ran
                    // out, so searching again from `pos` would rescan bytes
                    // it has already consumed.
                    self.done = true;
                    return None;
                }
            };
            self.pos = m.end();
            if self.aut.match_only_whole_words()
                && !is_whole_word(self.haystack, &m)
            {
                continue;
            }
            return Some(m);
        }
    }
}

impl<'a, 'h> core::iter::FusedIterator for FindOverlappingIter<'a, 'h> {}

/// Returns true if and only if the given match is neither preceded nor
/// followed by a word byte.
///
/// This only looks at the single bytes on either side of the match, so a
/// match next to a multi-byte UTF-8 letter is only rejected if the adjacent
/// byte happens to look like a Latin-1 letter.
pub(crate) fn is_whole_word(haystack: &[u8], m: &Match) -> bool {
    let before = m.start().checked_sub(1).map(|i| haystack[i]);
    let after = haystack.get(m.end()).copied();
    !before.map_or(false, is_word_byte) && !after.map_or(false, is_word_byte)
}

/// Returns true if the given byte, read as a Latin-1 codepoint, is a letter
/// or a digit.
fn is_word_byte(b: u8) -> bool {
    match b {
        b'0'..=b'9' | b'A'..=b'Z' | b'a'..=b'z' => true,
        // ª, µ and º
        0xAA | 0xB5 | 0xBA => true,
        // À through ÿ, minus × and ÷
        0xC0..=0xFF => b != 0xD7 && b != 0xF7,
        _ => false,
    }
}
