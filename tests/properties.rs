// Property tests that compare every automaton configuration against a
// brute force search. Patterns and haystacks are drawn from a tiny alphabet
// so that matches (and overlapping matches in particular) are common.

use keyword_automata::{
    AhoCorasick, AhoCorasickBuilder, ByteEquivalence, ByteSet, Match,
    MatchKind,
};
use quickcheck::quickcheck;

const ALPHABET: &[u8] = b"abc";
const MAX_PATTERNS: usize = 8;
const MAX_PATTERN_LEN: usize = 4;
const MAX_HAYSTACK_LEN: usize = 40;

const ALL_KINDS: &[MatchKind] = &[
    MatchKind::Standard,
    MatchKind::LeftmostFirst,
    MatchKind::LeftmostLongest,
];

fn shrink_to(bytes: &[u8], alphabet: &[u8], max_len: usize) -> Vec<u8> {
    bytes
        .iter()
        .take(max_len)
        .map(|&b| alphabet[usize::from(b) % alphabet.len()])
        .collect()
}

fn normalize(
    patterns: &[Vec<u8>],
    haystack: &[u8],
    alphabet: &[u8],
) -> (Vec<Vec<u8>>, Vec<u8>) {
    let patterns = patterns
        .iter()
        .take(MAX_PATTERNS)
        .map(|p| shrink_to(p, alphabet, MAX_PATTERN_LEN))
        .collect();
    (patterns, shrink_to(haystack, alphabet, MAX_HAYSTACK_LEN))
}

fn builders(kind: MatchKind) -> Vec<AhoCorasickBuilder> {
    let mut builders = vec![];
    for &dfa in [false, true].iter() {
        for &prefilter in [false, true].iter() {
            let mut builder = AhoCorasick::builder();
            builder
                .match_kind(kind)
                .dfa(dfa)
                .prefilter(prefilter)
                .byte_classes(dfa);
            builders.push(builder);
        }
    }
    builders
}

fn tuples(matches: Vec<Match>) -> Vec<(usize, usize, usize)> {
    matches
        .into_iter()
        .map(|m| (m.pattern().as_usize(), m.start(), m.end()))
        .collect()
}

/// Every match of every non-empty pattern, in no particular order.
fn naive_overlapping(
    patterns: &[Vec<u8>],
    haystack: &[u8],
) -> Vec<(usize, usize, usize)> {
    let mut matches = vec![];
    for (pid, p) in patterns.iter().enumerate() {
        if p.is_empty() {
            continue;
        }
        for start in 0..haystack.len() {
            if haystack[start..].starts_with(p) {
                matches.push((pid, start, start + p.len()));
            }
        }
    }
    matches
}

/// The longest pattern ending at `end` and starting at or after `at`. Among
/// equally long patterns, the one given first wins.
fn longest_ending_at(
    patterns: &[Vec<u8>],
    haystack: &[u8],
    at: usize,
    end: usize,
) -> Option<(usize, usize, usize)> {
    let mut best: Option<(usize, usize, usize)> = None;
    for (pid, p) in patterns.iter().enumerate() {
        if p.is_empty() || p.len() > end - at {
            continue;
        }
        if !haystack[..end].ends_with(p) {
            continue;
        }
        let start = end - p.len();
        match best {
            Some((_, best_start, _)) if best_start <= start => {}
            _ => best = Some((pid, start, end)),
        }
    }
    best
}

/// Standard semantics: report the match that ends earliest (the longest
/// one, if several end there), then resume one byte after its start.
fn naive_standard(
    patterns: &[Vec<u8>],
    haystack: &[u8],
) -> Vec<(usize, usize, usize)> {
    let mut matches = vec![];
    let mut at = 0;
    'SEARCH: while at < haystack.len() {
        for end in at + 1..=haystack.len() {
            if let Some(m) = longest_ending_at(patterns, haystack, at, end) {
                at = m.1 + 1;
                matches.push(m);
                continue 'SEARCH;
            }
        }
        break;
    }
    matches
}

/// Leftmost semantics: report the match that starts earliest, broken by
/// pattern order or by length, then resume at its end.
fn naive_leftmost(
    kind: MatchKind,
    patterns: &[Vec<u8>],
    haystack: &[u8],
) -> Vec<(usize, usize, usize)> {
    let mut matches = vec![];
    let mut at = 0;
    'SEARCH: while at < haystack.len() {
        for start in at..haystack.len() {
            let mut best: Option<(usize, usize)> = None;
            for (pid, p) in patterns.iter().enumerate() {
                if p.is_empty() || !haystack[start..].starts_with(p) {
                    continue;
                }
                best = match best {
                    None => Some((pid, p.len())),
                    Some((_, len))
                        if kind == MatchKind::LeftmostLongest
                            && p.len() > len =>
                    {
                        Some((pid, p.len()))
                    }
                    best => best,
                };
            }
            if let Some((pid, len)) = best {
                at = start + len;
                matches.push((pid, start, start + len));
                continue 'SEARCH;
            }
        }
        break;
    }
    matches
}

fn naive(
    kind: MatchKind,
    patterns: &[Vec<u8>],
    haystack: &[u8],
) -> Vec<(usize, usize, usize)> {
    match kind {
        MatchKind::Standard => naive_standard(patterns, haystack),
        _ => naive_leftmost(kind, patterns, haystack),
    }
}

fn same_as_naive(
    kind: MatchKind,
    patterns: Vec<Vec<u8>>,
    haystack: Vec<u8>,
) -> bool {
    let (patterns, haystack) = normalize(&patterns, &haystack, ALPHABET);
    let expected = naive(kind, &patterns, &haystack);
    for builder in builders(kind) {
        let ac = builder.build(&patterns).unwrap();
        if tuples(ac.find_all(&haystack)) != expected {
            return false;
        }
        if ac.is_match(&haystack) == expected.is_empty() {
            return false;
        }
    }
    true
}

/// An equivalence given as chains rather than groups: 'a' reaches '4' only
/// through 'A', and '8' points at 'b' but not the other way around.
fn leet() -> ByteEquivalence {
    ByteEquivalence::new(|b| {
        let mut set = ByteSet::empty();
        match b {
            b'a' => set.add(b'A'),
            b'A' => set.add(b'4'),
            b'8' => set.add(b'b'),
            _ => {}
        }
        set
    })
}

/// Map every byte in `leet` to one representative of its class.
fn canonicalize(bytes: &[u8]) -> Vec<u8> {
    bytes
        .iter()
        .map(|&b| match b {
            b'A' | b'4' => b'a',
            b'8' => b'b',
            b => b,
        })
        .collect()
}

quickcheck! {
    fn prop_standard_same_as_naive(
        patterns: Vec<Vec<u8>>,
        haystack: Vec<u8>
    ) -> bool {
        same_as_naive(MatchKind::Standard, patterns, haystack)
    }

    fn prop_leftmost_first_same_as_naive(
        patterns: Vec<Vec<u8>>,
        haystack: Vec<u8>
    ) -> bool {
        same_as_naive(MatchKind::LeftmostFirst, patterns, haystack)
    }

    fn prop_leftmost_longest_same_as_naive(
        patterns: Vec<Vec<u8>>,
        haystack: Vec<u8>
    ) -> bool {
        same_as_naive(MatchKind::LeftmostLongest, patterns, haystack)
    }

    fn prop_overlapping_same_as_naive(
        patterns: Vec<Vec<u8>>,
        haystack: Vec<u8>
    ) -> bool {
        let (patterns, haystack) =
            normalize(&patterns, &haystack, ALPHABET);
        let mut expected = naive_overlapping(&patterns, &haystack);
        expected.sort();
        for builder in builders(MatchKind::Standard) {
            let ac = builder.build(&patterns).unwrap();
            let got: Vec<Match> =
                ac.find_overlapping_iter(&haystack).collect();
            // Matches are reported in order of their end offset.
            if got.windows(2).any(|w| w[0].end() > w[1].end()) {
                return false;
            }
            let mut got = tuples(got);
            got.sort();
            if got != expected {
                return false;
            }
        }
        true
    }

    fn prop_leftmost_matches_never_overlap(
        patterns: Vec<Vec<u8>>,
        haystack: Vec<u8>
    ) -> bool {
        let (patterns, haystack) =
            normalize(&patterns, &haystack, ALPHABET);
        for &kind in [MatchKind::LeftmostFirst, MatchKind::LeftmostLongest]
            .iter()
        {
            let ac = AhoCorasick::builder()
                .match_kind(kind)
                .build(&patterns)
                .unwrap();
            let matches = ac.find_all(&haystack);
            for m in matches.iter() {
                let pattern = &patterns[m.pattern().as_usize()];
                if &haystack[m.range()] != pattern.as_slice() {
                    return false;
                }
            }
            if matches.windows(2).any(|w| w[0].end() > w[1].start()) {
                return false;
            }
        }
        true
    }

    fn prop_ascii_case_insensitive_same_as_lowercase(
        patterns: Vec<Vec<u8>>,
        haystack: Vec<u8>
    ) -> bool {
        let (patterns, haystack) =
            normalize(&patterns, &haystack, b"abAB");
        let lower_patterns: Vec<Vec<u8>> =
            patterns.iter().map(|p| p.to_ascii_lowercase()).collect();
        let lower_haystack = haystack.to_ascii_lowercase();
        for &kind in [
            MatchKind::Standard,
            MatchKind::LeftmostFirst,
            MatchKind::LeftmostLongest,
        ]
        .iter()
        {
            let expected = naive(kind, &lower_patterns, &lower_haystack);
            for mut builder in builders(kind) {
                builder.ascii_case_insensitive(true);
                let ac = builder.build(&patterns).unwrap();
                if tuples(ac.find_all(&haystack)) != expected {
                    return false;
                }
            }
        }
        true
    }

    fn prop_byte_equivalence_same_as_canonical(
        patterns: Vec<Vec<u8>>,
        haystack: Vec<u8>
    ) -> bool {
        let (patterns, haystack) =
            normalize(&patterns, &haystack, b"aA4b8c");
        let canon_patterns: Vec<Vec<u8>> =
            patterns.iter().map(|p| canonicalize(p)).collect();
        let canon_haystack = canonicalize(&haystack);
        for &kind in ALL_KINDS.iter() {
            let expected = naive(kind, &canon_patterns, &canon_haystack);
            for mut builder in builders(kind) {
                builder.byte_equivalence(leet());
                let ac = builder.build(&patterns).unwrap();
                let got = ac.find_all(&haystack);
                for m in got.iter() {
                    let pattern = &canon_patterns[m.pattern().as_usize()];
                    if &canonicalize(&haystack[m.range()]) != pattern {
                        return false;
                    }
                }
                if tuples(got) != expected {
                    return false;
                }
            }
        }
        true
    }

    fn prop_find_all_is_repeatable(
        patterns: Vec<Vec<u8>>,
        haystack: Vec<u8>
    ) -> bool {
        let (patterns, haystack) =
            normalize(&patterns, &haystack, ALPHABET);
        for &kind in ALL_KINDS.iter() {
            for builder in builders(kind) {
                let ac = builder.build(&patterns).unwrap();
                let first = ac.find_all(&haystack);
                if first != ac.find_all(&haystack) {
                    return false;
                }
                if first != ac.clone().find_all(&haystack) {
                    return false;
                }
            }
        }
        true
    }

    fn prop_replace_with_empty_removes_matches(
        patterns: Vec<Vec<u8>>,
        haystack: Vec<u8>
    ) -> bool {
        let (patterns, haystack) =
            normalize(&patterns, &haystack, ALPHABET);
        for &kind in ALL_KINDS.iter() {
            let ac = AhoCorasick::builder()
                .match_kind(kind)
                .build(&patterns)
                .unwrap();
            // Standard matches may overlap, and only the first of each run
            // of overlapping matches is replaced.
            let (mut removed, mut last_end) = (0, 0);
            for m in ac.find_all(&haystack) {
                if m.start() < last_end {
                    continue;
                }
                removed += m.len();
                last_end = m.end();
            }
            let replaced = ac.replace_all_with(&haystack, "");
            if replaced.len() != haystack.len() - removed {
                return false;
            }
        }
        true
    }

    fn prop_whole_word_matches_have_boundaries(
        patterns: Vec<Vec<u8>>,
        haystack: Vec<u8>
    ) -> bool {
        let (patterns, haystack) =
            normalize(&patterns, &haystack, b"ab1 .");
        let is_word = |i: Option<&u8>| {
            i.map_or(false, |b| b.is_ascii_alphanumeric())
        };
        for &kind in ALL_KINDS.iter() {
            for mut builder in builders(kind) {
                builder.match_only_whole_words(true);
                let ac = builder.build(&patterns).unwrap();
                let mut matches = ac.find_all(&haystack);
                if kind == MatchKind::Standard {
                    matches.extend(ac.find_overlapping_iter(&haystack));
                }
                for m in matches {
                    let pattern = &patterns[m.pattern().as_usize()];
                    if &haystack[m.range()] != pattern.as_slice() {
                        return false;
                    }
                    let before = m.start().checked_sub(1);
                    if is_word(before.map(|i| &haystack[i])) {
                        return false;
                    }
                    if is_word(haystack.get(m.end())) {
                        return false;
                    }
                }
            }
        }
        true
    }
}
