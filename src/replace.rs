/*!
Find-all and replace-all routines built on top of the match iterators.

Every replacement routine runs in two passes. The first pass collects the
matches to replace (and, for closures, the replacement bytes) into a scratch
space drawn from the automaton's pool, and computes the exact length of the
output. The second pass allocates the output once and writes it. When the
first pass finds nothing to replace, the input is returned as is, without
allocating.

Replacements never overlap. Under standard match semantics the iterator may
report overlapping matches; any match that starts before the end of the last
accepted match is skipped.
*/

use alloc::{borrow::Cow, vec::Vec};

use crate::{
    ahocorasick::AhoCorasick,
    error::MatchError,
    text::Text,
    util::search::Match,
};

/// Scratch space used by a single replacement. It is kept in a pool so that
/// repeated replacements with the same automaton don't reallocate.
#[derive(Debug, Default)]
pub(crate) struct Scratch {
    /// The matches to replace, in order.
    matches: Vec<Match>,
    /// Replacement bytes produced by a closure, concatenated.
    bytes: Vec<u8>,
    /// The end offset into `bytes` of the replacement for each match.
    ends: Vec<usize>,
}

impl Scratch {
    pub(crate) fn new() -> Scratch {
        Scratch::default()
    }

    fn clear(&mut self) {
        self.matches.clear();
        self.bytes.clear();
        self.ends.clear();
    }
}

pub(crate) fn find_all(aut: &AhoCorasick, haystack: &[u8]) -> Vec<Match> {
    aut.find_iter(haystack).collect()
}

pub(crate) fn replace_all<'h, T, R>(
    aut: &AhoCorasick,
    haystack: &'h T,
    replacements: &[R],
) -> Result<Cow<'h, T>, MatchError>
where
    T: ?Sized + Text,
    R: AsRef<[u8]>,
{
    if replacements.len() != aut.patterns_len() {
        return Err(MatchError::replacement_count(
            replacements.len(),
            aut.patterns_len(),
        ));
    }
    let bytes = haystack.as_bytes();
    let mut scratch = aut.scratch();
    scratch.clear();
    collect_non_overlapping(aut, bytes, &mut scratch.matches, |_| true);
    if scratch.matches.is_empty() {
        return Ok(Cow::Borrowed(haystack));
    }

    let mut len = bytes.len();
    for m in scratch.matches.iter() {
        len = len - m.len() + replacements[m.pattern()].as_ref().len();
    }
    let mut out = Vec::with_capacity(len);
    let mut last = 0;
    for m in scratch.matches.iter() {
        out.extend_from_slice(&bytes[last..m.start()]);
        out.extend_from_slice(replacements[m.pattern()].as_ref());
        last = m.end();
    }
    out.extend_from_slice(&bytes[last..]);
    debug_assert_eq!(len, out.len());
    Ok(Cow::Owned(T::from_bytes(out)))
}

pub(crate) fn replace_all_with<'h, T, R>(
    aut: &AhoCorasick,
    haystack: &'h T,
    replacement: R,
) -> Cow<'h, T>
where
    T: ?Sized + Text,
    R: AsRef<[u8]>,
{
    let replacement = replacement.as_ref();
    let bytes = haystack.as_bytes();
    let mut scratch = aut.scratch();
    scratch.clear();
    collect_non_overlapping(aut, bytes, &mut scratch.matches, |_| true);
    if scratch.matches.is_empty() {
        return Cow::Borrowed(haystack);
    }

    let replaced: usize = scratch.matches.iter().map(|m| m.len()).sum();
    let len =
        bytes.len() - replaced + scratch.matches.len() * replacement.len();
    let mut out = Vec::with_capacity(len);
    let mut last = 0;
    for m in scratch.matches.iter() {
        out.extend_from_slice(&bytes[last..m.start()]);
        out.extend_from_slice(replacement);
        last = m.end();
    }
    out.extend_from_slice(&bytes[last..]);
    debug_assert_eq!(len, out.len());
    Cow::Owned(T::from_bytes(out))
}

pub(crate) fn replace_all_func<'h, T, R, F>(
    aut: &AhoCorasick,
    haystack: &'h T,
    mut replacer: F,
) -> Cow<'h, T>
where
    T: ?Sized + Text,
    R: AsRef<[u8]>,
    F: FnMut(&Match) -> Option<R>,
{
    let bytes = haystack.as_bytes();
    let mut scratch = aut.scratch();
    scratch.clear();
    {
        let Scratch { matches, bytes: reps, ends } = &mut *scratch;
        collect_non_overlapping(aut, bytes, matches, |m| match replacer(m) {
            None => false,
            Some(rep) => {
                reps.extend_from_slice(rep.as_ref());
                ends.push(reps.len());
                true
            }
        });
    }
    if scratch.matches.is_empty() {
        return Cow::Borrowed(haystack);
    }

    let replaced: usize = scratch.matches.iter().map(|m| m.len()).sum();
    let len = bytes.len() - replaced + scratch.bytes.len();
    let mut out = Vec::with_capacity(len);
    let (mut last, mut rep_start) = (0, 0);
    for (m, &rep_end) in scratch.matches.iter().zip(scratch.ends.iter()) {
        out.extend_from_slice(&bytes[last..m.start()]);
        out.extend_from_slice(&scratch.bytes[rep_start..rep_end]);
        last = m.end();
        rep_start = rep_end;
    }
    out.extend_from_slice(&bytes[last..]);
    debug_assert_eq!(len, out.len());
    Cow::Owned(T::from_bytes(out))
}

/// Push every match that doesn't overlap a previously accepted match into
/// `matches`, as long as `accept` returns true. The first time `accept`
/// returns false, collection stops and that match is not pushed.
fn collect_non_overlapping<F>(
    aut: &AhoCorasick,
    haystack: &[u8],
    matches: &mut Vec<Match>,
    mut accept: F,
) where
    F: FnMut(&Match) -> bool,
{
    let mut last_end = 0;
    for m in aut.find_iter(haystack) {
        if m.start() < last_end {
            continue;
        }
        if !accept(&m) {
            break;
        }
        last_end = m.end();
        matches.push(m);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scratch_is_reused() {
        let ac = AhoCorasick::new(&["a"]).unwrap();
        let got = replace_all(&ac, "banana", &["o"]).unwrap();
        assert_eq!("bonono", got);
        // The scratch space was returned, and the next replacement starts
        // from a clean slate.
        let got = replace_all_func(&ac, "xax", |_| Some("yy"));
        assert_eq!("xyyx", got);
        let got = replace_all(&ac, "zzz", &["o"]).unwrap();
        assert!(matches!(got, Cow::Borrowed("zzz")));
    }

    #[test]
    fn overlapping_standard_matches_are_skipped() {
        let ac = AhoCorasick::new(&["abc", "bcd"]).unwrap();
        // The iterator reports 'abc' and then 'bcd', which overlaps it.
        let got = replace_all(&ac, "abcd", &["1", "2"]).unwrap();
        assert_eq!("1d", got);
    }
}
