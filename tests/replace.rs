use std::borrow::Cow;

use keyword_automata::{AhoCorasick, MatchError, MatchKind};

use crate::Result;

#[test]
fn replace_all_leftmost() -> Result<()> {
    let ac = AhoCorasick::builder()
        .match_kind(MatchKind::LeftmostLongest)
        .build(&["Sam", "Samwise", "Frodo"])?;
    let result = ac.replace_all(
        "Samwise and Frodo, Sam and Frodo",
        &["S", "SW", "F"],
    );
    assert_eq!("SW and F, S and F", result);
    Ok(())
}

#[test]
fn replace_all_bytes() -> Result<()> {
    let ac = AhoCorasick::new(&[&b"\xFF"[..], &b"ab"[..]])?;
    let haystack: &[u8] = b"ab\xFFab";
    let result = ac.replace_all(haystack, &[&b"?"[..], &b"AB"[..]]);
    assert_eq!(&b"AB?AB"[..], &*result);
    Ok(())
}

#[test]
fn replace_all_owned_types() -> Result<()> {
    let ac = AhoCorasick::new(&["x"])?;
    let s = String::from("axb");
    let result: Cow<'_, String> = ac.replace_all(&s, &["y"]);
    assert_eq!("ayb", result.as_str());
    let v = b"axb".to_vec();
    let result: Cow<'_, Vec<u8>> = ac.replace_all(&v, &["yy"]);
    assert_eq!(b"ayyb".to_vec(), *result);
    Ok(())
}

#[test]
fn replace_all_nothing_to_replace_borrows() -> Result<()> {
    let ac = AhoCorasick::new(&["needle"])?;
    let haystack = "a haystack without it";
    let result = ac.replace_all(haystack, &["pin"]);
    match result {
        Cow::Borrowed(s) => assert_eq!(haystack.as_ptr(), s.as_ptr()),
        Cow::Owned(_) => panic!("expected a borrowed result"),
    }
    let result = ac.replace_all_with(haystack, "pin");
    assert!(matches!(result, Cow::Borrowed(_)));
    let result = ac.replace_all_func(haystack, |_| Some("pin"));
    assert!(matches!(result, Cow::Borrowed(_)));
    Ok(())
}

#[test]
fn replace_all_wrong_count() -> Result<()> {
    let ac = AhoCorasick::new(&["a", "b"])?;
    let err = ac.try_replace_all("ab", &["x"]).unwrap_err();
    assert_eq!(MatchError::ReplacementCount { given: 1, expected: 2 }, err);
    assert_eq!(
        "expected 2 replacements (one per pattern), but got 1",
        err.to_string(),
    );
    Ok(())
}

#[test]
#[should_panic]
fn replace_all_wrong_count_panics() {
    let ac = AhoCorasick::new(&["a", "b"]).unwrap();
    let _ = ac.replace_all("ab", &["x", "y", "z"]);
}

#[test]
fn replace_all_with_redacts() -> Result<()> {
    let ac = AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .match_only_whole_words(true)
        .build(&["password", "ssn"])?;
    let result = ac.replace_all_with(
        "Password: hunter2, SSN: 123, passwords: none",
        "[REDACTED]",
    );
    assert_eq!(
        "[REDACTED]: hunter2, [REDACTED]: 123, passwords: none",
        result,
    );
    Ok(())
}

#[test]
fn replace_all_with_empty_replacement() -> Result<()> {
    let ac = AhoCorasick::new(&["um ", "uh "])?;
    let result = ac.replace_all_with("um so uh yes", "");
    assert_eq!("so yes", result);
    Ok(())
}

#[test]
fn replace_all_func_uses_match() -> Result<()> {
    let ac = AhoCorasick::new(&["apple", "pear"])?;
    let haystack = "apple pear apple";
    let result = ac.replace_all_func(haystack, |m| {
        Some(format!("<{}:{}>", m.pattern().as_usize(), m.start()))
    });
    assert_eq!("<0:0> <1:6> <0:11>", result);
    Ok(())
}

#[test]
fn replace_all_func_stops_midway() -> Result<()> {
    let ac = AhoCorasick::new(&["a"])?;
    let mut seen = vec![];
    let result = ac.replace_all_func("a.a.a.a", |m| {
        seen.push(m.start());
        if m.start() >= 4 {
            None
        } else {
            Some("b")
        }
    });
    assert_eq!("b.b.a.a", result);
    // The closure is never called again after it declines a match.
    assert_eq!(vec![0, 2, 4], seen);
    Ok(())
}

#[test]
fn replace_standard_skips_overlaps() -> Result<()> {
    let ac = AhoCorasick::new(&["aa"])?;
    // Standard search finds 'aa' at 0, 1 and 2. Only the ones that don't
    // overlap an earlier replacement are replaced.
    assert_eq!("XX", ac.replace_all("aaaa", &["X"]));
    Ok(())
}

#[test]
fn replace_into_invalid_utf8_is_repaired() -> Result<()> {
    // 'é' is 0xC3 0xA9. Replacing only its first byte leaves a lone
    // continuation byte behind.
    let ac = AhoCorasick::new(&[&b"\xC3"[..]])?;
    let result = ac.replace_all("café", &["e"]);
    assert_eq!("cafe\u{FFFD}", result);
    Ok(())
}

#[test]
fn find_all_matches_find_iter() -> Result<()> {
    let ac = AhoCorasick::new(&["ab", "b", "bc"])?;
    let haystack = "abcbc";
    let expected: Vec<_> = ac.find_iter(haystack).collect();
    assert_eq!(expected, ac.find_all(haystack));
    Ok(())
}
