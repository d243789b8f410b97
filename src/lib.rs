/*!
A library for finding occurrences of many keywords at once, using the
Aho-Corasick algorithm.

The main type in this crate is [`AhoCorasick`]. It is built once from a list
of patterns and can then search any number of haystacks for all of them in a
single pass over each haystack. It is meant as a cheap first filter: run it
over model output before handing the text to slower detectors, or use its
replacement routines to redact what it finds.

# Example: basic searching

```
use keyword_automata::{AhoCorasick, PatternID};

let patterns = &["apple", "maple", "Snapple"];
let haystack = "Nobody likes maple in their apple flavored Snapple.";

let ac = AhoCorasick::new(patterns).unwrap();
let mut matches = vec![];
for m in ac.find_iter(haystack) {
    matches.push((m.pattern(), m.start(), m.end()));
}
assert_eq!(matches, vec![
    (PatternID::must(1), 13, 18),
    (PatternID::must(0), 28, 33),
    (PatternID::must(2), 43, 50),
    (PatternID::must(0), 45, 50),
]);
```

# Example: case insensitivity and whole words

```
use keyword_automata::{AhoCorasick, MatchKind};

let ac = AhoCorasick::builder()
    .ascii_case_insensitive(true)
    .match_only_whole_words(true)
    .match_kind(MatchKind::LeftmostLongest)
    .build(&["jailbreak", "ignore all"])
    .unwrap();
let found: Vec<usize> = ac
    .find_iter("IGNORE ALL rules. Jailbreaking is not a Jailbreak!")
    .map(|m| m.pattern().as_usize())
    .collect();
assert_eq!(vec![1, 0], found);
```

# Example: replacing

```
use keyword_automata::AhoCorasick;

let ac = AhoCorasick::new(&["fox", "brown", "quick"]).unwrap();
let result = ac.replace_all(
    "The quick brown fox.",
    &["sloth", "grey", "slow"],
);
assert_eq!("The slow grey sloth.", result);
```

# Match semantics

Which matches are reported is controlled by [`MatchKind`]:

* [`MatchKind::Standard`] reports a match as soon as one is seen. This is
the classical Aho-Corasick behavior, and the only one that supports
overlapping searches via [`AhoCorasick::find_overlapping_iter`].
* [`MatchKind::LeftmostFirst`] reports the leftmost match, preferring the
pattern that was given first when several match at the same position.
* [`MatchKind::LeftmostLongest`] reports the leftmost match, preferring the
longest one when several match at the same position.

# Crate features

* **std** (enabled by default) - Enables `std::error::Error` impls for the
error types, and lets `memchr` use its `std` optimizations.
* **logging** - Emits `log` messages while building automatons. Only
useful for debugging.
*/

#[cfg(not(any(
    target_pointer_width = "16",
    target_pointer_width = "32",
    target_pointer_width = "64"
)))]
compile_error!("keyword-automata is not supported on non-{16,32,64}");

extern crate alloc;

pub use crate::{
    ahocorasick::{AhoCorasick, AhoCorasickBuilder, AhoCorasickKind},
    error::{BuildError, ErrorKind, MatchError},
    text::Text,
    util::{
        alphabet::{ByteClasses, ByteEquivalence, ByteSet},
        id::{PatternID, StateID},
        iter::{FindIter, FindOverlappingIter},
        search::{Match, MatchKind, Span},
    },
};

#[macro_use]
mod macros;

mod ahocorasick;
mod automaton;
mod dfa;
mod error;
mod nfa;
mod prefilter;
mod replace;
mod text;
pub mod util;
