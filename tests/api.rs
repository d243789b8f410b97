use std::{borrow::Cow, sync::Arc};

use keyword_automata::{
    AhoCorasick, ByteEquivalence, ByteSet, Match, MatchError, MatchKind,
};

use crate::Result;

// The classic example from the original Aho-Corasick paper. An overlapping
// search reports 'she' and 'hers' even though they share bytes.
#[test]
fn scenario_overlapping_ushers() -> Result<()> {
    let ac = AhoCorasick::new(&["he", "she", "his", "hers"])?;
    let matches: Vec<Match> = ac.find_overlapping_iter("ushers").collect();
    assert!(matches.contains(&Match::must(1, 1..4)));
    assert!(matches.contains(&Match::must(3, 2..6)));
    Ok(())
}

#[test]
fn scenario_byte_equivalence_folds_case() -> Result<()> {
    let ac = AhoCorasick::builder()
        .byte_equivalence(ByteEquivalence::ascii_case_insensitive())
        .build(&["HELLO"])?;
    let matches = ac.find_all("hello");
    assert_eq!(1, matches.len());
    assert_eq!(0, matches[0].pattern().as_usize());
    Ok(())
}

// The longest match wins first, and is then rejected for not ending on a
// word boundary. The shorter 'testing' is never reconsidered.
#[test]
fn scenario_whole_words_reject_longest() -> Result<()> {
    let ac = AhoCorasick::builder()
        .match_only_whole_words(true)
        .match_kind(MatchKind::LeftmostLongest)
        .build(&["testing", "testing 123"])?;
    assert_eq!(0, ac.find_all("testing 12345").len());
    assert!(!ac.is_match("testing 12345"));
    Ok(())
}

#[test]
fn scenario_replace_all() -> Result<()> {
    let ac = AhoCorasick::new(&["cat", "dog"])?;
    let result = ac.replace_all("a cat and a dog", &["CAT", "DOG"]);
    assert_eq!("a CAT and a DOG", result);
    Ok(())
}

#[test]
fn scenario_replace_all_func_stops_immediately() -> Result<()> {
    let ac = AhoCorasick::new(&["cat", "dog"])?;
    let haystack = "a cat and a dog";
    let mut calls = 0;
    let result = ac.replace_all_func(haystack, |_| {
        calls += 1;
        None::<&str>
    });
    assert_eq!(1, calls);
    assert_eq!(haystack, result);
    assert!(matches!(result, Cow::Borrowed(_)));
    Ok(())
}

#[test]
fn scenario_no_patterns() -> Result<()> {
    let ac = AhoCorasick::new(Vec::<&str>::new())?;
    assert_eq!(0, ac.patterns_len());
    assert!(ac.find_all("").is_empty());
    assert!(ac.find_all("anything at all").is_empty());
    assert!(ac.find_overlapping_iter("abc").next().is_none());
    assert!(!ac.is_match("abc"));
    Ok(())
}

#[test]
fn byte_equivalence_groups() -> Result<()> {
    let equiv = ByteEquivalence::from_groups(&[&b"aA4@"[..], &b"eE3"[..]]);
    let ac = AhoCorasick::builder()
        .byte_equivalence(equiv)
        .match_kind(MatchKind::LeftmostFirst)
        .build(&["hate", "leet"])?;
    let haystack = "h@t3 h4te L33T l33t";
    let got: Vec<(usize, &str)> = ac
        .find_iter(haystack)
        .map(|m| (m.pattern().as_usize(), &haystack[m.range()]))
        .collect();
    // 'L' and 'T' are not in any group, so 'L33T' doesn't match.
    assert_eq!(vec![(0, "h@t3"), (0, "h4te"), (1, "l33t")], got);
    Ok(())
}

#[test]
fn byte_equivalence_composes_with_case_insensitivity() -> Result<()> {
    let equiv = ByteEquivalence::new(|b| {
        let mut set = ByteSet::empty();
        if b == b'o' || b == b'O' {
            set.add(b'0');
        }
        set
    });
    let ac = AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .byte_equivalence(equiv)
        .build(&["root"])?;
    assert!(ac.is_match("R00T"));
    assert!(ac.is_match("rOot"));
    assert!(!ac.is_match("r00"));
    Ok(())
}

#[test]
fn byte_equivalence_does_not_depend_on_pattern_order() -> Result<()> {
    let orders: &[&[&str]] = &[&["Ox", "0y"], &["0y", "Ox"]];
    for patterns in orders.iter() {
        let ac = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .byte_equivalence(ByteEquivalence::from_groups(&[b"o0"]))
            .build(patterns.iter())?;
        let id = |p: &str| patterns.iter().position(|&q| q == p).unwrap();
        // 'O' and '0' are only related through 'o'.
        assert_eq!(vec![Match::must(id("0y"), 0..2)], ac.find_all("oy"));
        assert_eq!(vec![Match::must(id("0y"), 0..2)], ac.find_all("OY"));
        assert_eq!(vec![Match::must(id("Ox"), 0..2)], ac.find_all("0X"));
    }
    Ok(())
}

#[test]
fn equivalence_is_identity() {
    assert!(ByteEquivalence::identity().is_identity());
    assert!(!ByteEquivalence::ascii_case_insensitive().is_identity());
    let fold = ByteEquivalence::ascii_case_insensitive();
    assert!(fold.equivalents(b'q').contains(b'Q'));
    assert!(fold.equivalents(b'q').contains(b'q'));
    assert_eq!(1, fold.equivalents(b'7').len());
}

#[test]
fn whole_words_in_raw_bytes() -> Result<()> {
    let ac = AhoCorasick::builder()
        .match_only_whole_words(true)
        .build(&["cat"])?;
    // 0xE9 is 'é' in Latin-1 and 0xB5 is 'µ', both of which are letters.
    assert!(ac.find_all(&b"\xE9cat cat\xB5"[..]).is_empty());
    // 0xD7 is '×', which is not.
    let got = ac.find_all(&b"\xD7cat\xD7"[..]);
    assert_eq!(vec![Match::must(0, 1..4)], got);
    Ok(())
}

#[test]
fn whole_words_overlapping() -> Result<()> {
    let ac = AhoCorasick::builder()
        .match_only_whole_words(true)
        .build(&["he", "she", "hers"])?;
    let got: Vec<Match> = ac.find_overlapping_iter("she hers").collect();
    assert_eq!(vec![Match::must(1, 0..3), Match::must(2, 4..8)], got);
    Ok(())
}

#[test]
fn overlapping_requires_standard() -> Result<()> {
    for &kind in [MatchKind::LeftmostFirst, MatchKind::LeftmostLongest].iter()
    {
        let ac = AhoCorasick::builder().match_kind(kind).build(&["a"])?;
        assert!(!kind.supports_overlapping());
        let err = ac.try_find_overlapping_iter("a").unwrap_err();
        assert_eq!(MatchError::InvalidMatchKind { got: kind }, err);
    }
    Ok(())
}

#[test]
#[should_panic]
fn overlapping_leftmost_panics() {
    let ac = AhoCorasick::builder()
        .match_kind(MatchKind::LeftmostLongest)
        .build(&["a"])
        .unwrap();
    let _ = ac.find_overlapping_iter("a");
}

#[test]
fn search_any_haystack_type() -> Result<()> {
    let ac = AhoCorasick::new(&["jail", "break"])?;
    let expected = vec![Match::must(0, 0..4), Match::must(1, 4..9)];
    assert_eq!(expected, ac.find_all("jailbreak"));
    assert_eq!(expected, ac.find_all(&String::from("jailbreak")));
    assert_eq!(expected, ac.find_all(b"jailbreak"));
    assert_eq!(expected, ac.find_all(&b"jailbreak".to_vec()));
    Ok(())
}

#[test]
fn find_iter_is_fused() -> Result<()> {
    let ac = AhoCorasick::new(&["a"])?;
    let mut it = ac.find_iter("a");
    assert_eq!(Some(Match::must(0, 0..1)), it.next());
    assert_eq!(None, it.next());
    assert_eq!(None, it.next());

    let mut it = ac.find_overlapping_iter("a");
    assert_eq!(Some(Match::must(0, 0..1)), it.next());
    assert_eq!(None, it.next());
    assert_eq!(None, it.next());
    Ok(())
}

#[test]
fn find_overlapping_iter_is_fused_before_the_end() -> Result<()> {
    for &prefilter in [false, true].iter() {
        let ac = AhoCorasick::builder().prefilter(prefilter).build(&["ab"])?;
        let mut it = ac.find_overlapping_iter("abba");
        assert_eq!(Some(Match::must(0, 0..2)), it.next());
        assert_eq!(None, it.next());
        assert_eq!(None, it.next());
    }
    Ok(())
}

#[test]
fn find_iter_is_fused_before_the_end() -> Result<()> {
    let ac = AhoCorasick::builder().prefilter(false).build(&["ab"])?;
    let mut it = ac.find_iter("abba");
    assert_eq!(Some(Match::must(0, 0..2)), it.next());
    assert_eq!(None, it.next());
    assert_eq!(None, it.next());
    Ok(())
}

#[test]
fn match_errors_can_be_hashed() {
    use std::collections::HashSet;

    let mut errors = HashSet::new();
    errors.insert(MatchError::InvalidMatchKind {
        got: MatchKind::LeftmostFirst,
    });
    errors.insert(MatchError::InvalidMatchKind {
        got: MatchKind::LeftmostFirst,
    });
    errors.insert(MatchError::ReplacementCount { given: 1, expected: 2 });
    assert_eq!(2, errors.len());
}

#[test]
fn accessors() -> Result<()> {
    let ac = AhoCorasick::builder()
        .match_kind(MatchKind::LeftmostFirst)
        .match_only_whole_words(true)
        .build(&["", "abc", "de"])?;
    assert_eq!(MatchKind::LeftmostFirst, ac.match_kind());
    assert!(ac.match_only_whole_words());
    assert_eq!(3, ac.patterns_len());
    assert_eq!(3, ac.max_pattern_len());
    assert!(ac.memory_usage() > 0);
    Ok(())
}

#[test]
fn match_accessors() {
    let m = Match::must(2, 3..7);
    assert_eq!(2, m.pattern().as_usize());
    assert_eq!(3, m.start());
    assert_eq!(7, m.end());
    assert_eq!(4, m.len());
    assert!(!m.is_empty());
    assert_eq!(3..7, m.range());
    assert_eq!(3..7, m.span().range());
}

#[test]
fn dfa_uses_more_memory() -> Result<()> {
    let patterns = &["alpha", "beta", "gamma", "delta", "epsilon"];
    let nfa = AhoCorasick::new(patterns)?;
    let dfa = AhoCorasick::builder().dfa(true).build(patterns)?;
    assert!(dfa.memory_usage() > nfa.memory_usage());
    assert_eq!(nfa.find_all("gamma delta"), dfa.find_all("gamma delta"));
    Ok(())
}

#[test]
fn shared_across_threads() -> Result<()> {
    let ac = Arc::new(AhoCorasick::new(&["secret", "token"])?);
    let mut handles = vec![];
    for i in 0..4 {
        let ac = Arc::clone(&ac);
        handles.push(std::thread::spawn(move || {
            let haystack = format!("{} secret and token {}", i, i);
            let got = ac.replace_all_with(haystack.as_str(), "***");
            assert_eq!(format!("{} *** and *** {}", i, i), got);
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
    Ok(())
}

#[test]
fn clone_is_independent() -> Result<()> {
    let ac1 = AhoCorasick::new(&["x"])?;
    let ac2 = ac1.clone();
    drop(ac1);
    assert_eq!("y", ac2.replace_all("x", &["y"]));
    Ok(())
}
