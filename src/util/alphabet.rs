/*!
Byte level alphabets.

This module provides three related things:

* A [`ByteSet`], which is a small allocation free set of bytes.
* A [`ByteEquivalence`], which maps every byte to the set of bytes that should
be treated as equal to it while building an automaton. This is how case
folding and "klingon" style aliasing (e.g., `a`, `4` and `@` all matching the
same pattern byte) are supported. It is only consulted while building an
automaton, so its cost has no influence on search time.
* [`ByteClasses`], which partition all 256 byte values into classes of bytes
that no automaton state can tell apart. A DFA can use these to shrink each row
of its transition table.
*/

use alloc::sync::Arc;

/// A representation of byte oriented equivalence classes.
///
/// This is used in a DFA to reduce the size of the transition table. Every
/// byte maps to a class identifier, and two bytes map to the same class only
/// when every state of the automaton transitions on them identically.
#[derive(Clone, Copy)]
pub struct ByteClasses([u8; 256]);

impl ByteClasses {
    /// Creates a new set of equivalence classes where all bytes are mapped to
    /// the same class.
    pub fn empty() -> ByteClasses {
        ByteClasses([0; 256])
    }

    /// Creates a new set of equivalence classes where each byte belongs to
    /// its own equivalence class.
    pub fn singletons() -> ByteClasses {
        let mut classes = ByteClasses::empty();
        for b in 0..=255u8 {
            classes.set(b, b);
        }
        classes
    }

    /// Set the equivalence class for the given byte.
    #[inline]
    pub fn set(&mut self, byte: u8, class: u8) {
        self.0[usize::from(byte)] = class;
    }

    /// Get the equivalence class for the given byte.
    #[inline]
    pub fn get(&self, byte: u8) -> u8 {
        self.0[usize::from(byte)]
    }

    /// Return the total number of elements in the alphabet represented by
    /// these equivalence classes. Equivalently, this returns the total number
    /// of equivalence classes.
    #[inline]
    pub fn alphabet_len(&self) -> usize {
        usize::from(self.0[255]) + 1
    }

    /// Returns true if and only if every byte in this class maps to its own
    /// equivalence class.
    #[inline]
    pub fn is_singleton(&self) -> bool {
        self.alphabet_len() == 256
    }

    /// Returns an iterator over one representative byte from each
    /// equivalence class, in class order.
    ///
    /// Since every byte in a class leads to the same transition in every
    /// state, computing a transition for the representative is enough to
    /// know the transition for the entire class.
    pub fn representatives(&self) -> ByteClassRepresentatives<'_> {
        ByteClassRepresentatives { classes: self, byte: 0, last_class: None }
    }
}

impl core::fmt::Debug for ByteClasses {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.is_singleton() {
            return write!(f, "ByteClasses({{singletons}})");
        }
        write!(f, "ByteClasses(")?;
        let mut start = 0u8;
        for b in 0..=255u8 {
            if b == 255 || self.get(b) != self.get(b + 1) {
                if start > 0 {
                    write!(f, ", ")?;
                }
                if start == b {
                    write!(f, "{} => [{:?}]", self.get(b), b)?;
                } else {
                    write!(f, "{} => [{:?}-{:?}]", self.get(b), start, b)?;
                }
                start = b.wrapping_add(1);
            }
        }
        write!(f, ")")
    }
}

/// An iterator over representative bytes from each equivalence class.
#[derive(Debug)]
pub struct ByteClassRepresentatives<'a> {
    classes: &'a ByteClasses,
    byte: usize,
    last_class: Option<u8>,
}

impl<'a> Iterator for ByteClassRepresentatives<'a> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        while self.byte < 256 {
            let byte = self.byte as u8;
            let class = self.classes.get(byte);
            self.byte += 1;

            if self.last_class != Some(class) {
                self.last_class = Some(class);
                return Some(byte);
            }
        }
        None
    }
}

/// A byte class set keeps track of an *approximation* of equivalence classes
/// of bytes during automaton construction. That is, every byte in an
/// equivalence class cannot discriminate between a match and a non-match.
///
/// Classes are computed as contiguous ranges of bytes. Two bytes that are
/// interchangeable but not adjacent (for example, `a` and `A` under case
/// folding) still wind up in distinct classes. This is an approximation: the
/// classes are never too coarse, only sometimes finer than they need to be.
#[derive(Clone, Debug)]
pub struct ByteClassSet(ByteSet);

impl ByteClassSet {
    /// Create a new set of byte classes where all bytes are part of the same
    /// equivalence class.
    pub fn empty() -> Self {
        ByteClassSet(ByteSet::empty())
    }

    /// Indicate the the range of byte given (inclusive) can discriminate a
    /// match between it and all other bytes outside of the range.
    pub fn set_range(&mut self, start: u8, end: u8) {
        debug_assert!(start <= end);
        if start > 0 {
            self.0.add(start - 1);
        }
        self.0.add(end);
    }

    /// Convert this boolean set to a map that maps all byte values to their
    /// corresponding equivalence class. The last mapping indicates the largest
    /// equivalence class identifier (which is never bigger than 255).
    pub fn byte_classes(&self) -> ByteClasses {
        let mut classes = ByteClasses::empty();
        let mut class = 0u8;
        let mut b = 0u8;
        loop {
            classes.set(b, class);
            if b == 255 {
                break;
            }
            if self.0.contains(b) {
                class += 1;
            }
            b += 1;
        }
        classes
    }
}

/// A simple set of bytes that is reasonably cheap to copy and allocation free.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ByteSet {
    bits: BitSet,
}

/// The representation of a byte set. Split out so that we can define a
/// convenient Debug impl for it while keeping "ByteSet" in the output.
#[derive(Clone, Copy, Default, Eq, PartialEq)]
struct BitSet([u128; 2]);

impl ByteSet {
    /// Create an empty set of bytes.
    pub fn empty() -> ByteSet {
        ByteSet { bits: BitSet([0; 2]) }
    }

    /// Create a set containing exactly the given bytes.
    pub fn from_bytes(bytes: &[u8]) -> ByteSet {
        let mut set = ByteSet::empty();
        for &b in bytes.iter() {
            set.add(b);
        }
        set
    }

    /// Add a byte to this set.
    ///
    /// If the given byte already belongs to this set, then this is a no-op.
    pub fn add(&mut self, byte: u8) {
        let bucket = byte / 128;
        let bit = byte % 128;
        self.bits.0[usize::from(bucket)] |= 1 << bit;
    }

    /// Add every byte in the given set to this set.
    pub fn union(&mut self, other: &ByteSet) {
        self.bits.0[0] |= other.bits.0[0];
        self.bits.0[1] |= other.bits.0[1];
    }

    /// Return true if and only if the given byte is in this set.
    pub fn contains(&self, byte: u8) -> bool {
        let bucket = byte / 128;
        let bit = byte % 128;
        self.bits.0[usize::from(bucket)] & (1 << bit) > 0
    }

    /// Returns an iterator over all bytes in this set, in ascending order.
    pub fn iter(&self) -> ByteSetIter<'_> {
        ByteSetIter { set: self, b: 0 }
    }

    /// Return the number of bytes in this set.
    pub fn len(&self) -> usize {
        (self.bits.0[0].count_ones() + self.bits.0[1].count_ones()) as usize
    }

    /// Return true if and only if this set is empty.
    pub fn is_empty(&self) -> bool {
        self.bits.0 == [0, 0]
    }
}

impl core::fmt::Debug for BitSet {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut fmtd = f.debug_set();
        for b in 0..=255u8 {
            if (ByteSet { bits: *self }).contains(b) {
                fmtd.entry(&b);
            }
        }
        fmtd.finish()
    }
}

/// An iterator over all bytes in a [`ByteSet`].
#[derive(Debug)]
pub struct ByteSetIter<'a> {
    set: &'a ByteSet,
    b: usize,
}

impl<'a> Iterator for ByteSetIter<'a> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        while self.b <= 255 {
            let b = self.b as u8;
            self.b += 1;
            if self.set.contains(b) {
                return Some(b);
            }
        }
        None
    }
}

/// A per-byte equivalence function used while building an automaton.
///
/// When a pattern is inserted into the trie, every edge on a byte `b` is
/// also added for every other byte in `equivalents(b)`. The effect is that
/// any byte equivalent to a pattern byte in the haystack follows the same
/// path through the automaton. Since the fan out happens entirely at build
/// time, the complexity of the equivalence has no bearing on search speed.
///
/// Before an automaton is built, the equivalence is closed: it is made
/// symmetric and transitive, so that every byte belongs to exactly one
/// class and all bytes in a class are interchangeable. For example, if `o`
/// is equivalent to `0` and `O` is equivalent to `o`, then `O`, `o` and `0`
/// all match each other. See [`ByteEquivalence::closure`].
///
/// This type is cheap to clone.
///
/// # Example
///
/// This shows how to build a "leet speak" aware automaton where `4` and `@`
/// are aliases for `a`.
///
/// ```
/// use keyword_automata::{AhoCorasick, ByteEquivalence, Match};
///
/// let equiv = ByteEquivalence::from_groups(&[b"aA4@"]);
/// let ac = AhoCorasick::builder()
///     .byte_equivalence(equiv)
///     .build(&["hack"])
///     .unwrap();
/// let matches: Vec<Match> = ac.find_iter("h4ck or h@ck").collect();
/// assert_eq!(vec![Match::must(0, 0..4), Match::must(0, 8..12)], matches);
/// ```
#[derive(Clone)]
pub struct ByteEquivalence(Arc<[ByteSet; 256]>);

impl ByteEquivalence {
    /// Create an equivalence from a function mapping each byte to the set of
    /// bytes it is equivalent to.
    ///
    /// The function is called exactly once for each of the 256 byte values.
    /// Every byte is always considered equivalent to itself, regardless of
    /// whether the function includes it.
    pub fn new<F: Fn(u8) -> ByteSet>(f: F) -> ByteEquivalence {
        let mut table = [ByteSet::empty(); 256];
        for b in 0..=255u8 {
            let mut set = f(b);
            set.add(b);
            table[usize::from(b)] = set;
        }
        ByteEquivalence(Arc::new(table))
    }

    /// The identity equivalence, where every byte is only equal to itself.
    pub fn identity() -> ByteEquivalence {
        ByteEquivalence::new(|_| ByteSet::empty())
    }

    /// An equivalence that folds ASCII letters, i.e., `A-Z` and `a-z`.
    pub fn ascii_case_insensitive() -> ByteEquivalence {
        ByteEquivalence::new(|b| {
            let mut set = ByteSet::empty();
            set.add(opposite_ascii_case(b));
            set
        })
    }

    /// Create an equivalence from groups of mutually equivalent bytes.
    ///
    /// Each byte in a group is made equivalent to every other byte in that
    /// group. Groups that share a byte are merged into one.
    pub fn from_groups<B: AsRef<[u8]>>(groups: &[B]) -> ByteEquivalence {
        let mut table = [ByteSet::empty(); 256];
        for b in 0..=255u8 {
            table[usize::from(b)].add(b);
        }
        for group in groups.iter() {
            let set = ByteSet::from_bytes(group.as_ref());
            for &b in group.as_ref().iter() {
                table[usize::from(b)].union(&set);
            }
        }
        ByteEquivalence(Arc::new(close(&table)))
    }

    /// Return the smallest equivalence that contains both `self` and
    /// `other`. The result is always closed.
    pub fn union(&self, other: &ByteEquivalence) -> ByteEquivalence {
        let mut table = *self.0;
        for (set, other) in table.iter_mut().zip(other.0.iter()) {
            set.union(other);
        }
        ByteEquivalence(Arc::new(close(&table)))
    }

    /// Return the symmetric and transitive closure of this equivalence.
    ///
    /// In the result, two bytes are equivalent if and only if they are
    /// connected by a chain of equivalences in `self`, in either direction.
    /// This is what an automaton is built with.
    ///
    /// # Example
    ///
    /// ```
    /// use keyword_automata::{ByteEquivalence, ByteSet};
    ///
    /// let equiv = ByteEquivalence::new(|b| {
    ///     let mut set = ByteSet::empty();
    ///     match b {
    ///         b'O' => set.add(b'o'),
    ///         b'o' => set.add(b'0'),
    ///         _ => {}
    ///     }
    ///     set
    /// });
    /// assert!(!equiv.equivalents(b'0').contains(b'O'));
    /// assert!(equiv.closure().equivalents(b'0').contains(b'O'));
    /// ```
    pub fn closure(&self) -> ByteEquivalence {
        ByteEquivalence(Arc::new(close(&self.0)))
    }

    /// Return the set of bytes equivalent to the given byte. The set always
    /// contains the byte itself.
    #[inline]
    pub fn equivalents(&self, byte: u8) -> &ByteSet {
        &self.0[usize::from(byte)]
    }

    /// Returns true if and only if this equivalence maps every byte only to
    /// itself.
    pub fn is_identity(&self) -> bool {
        self.0.iter().all(|set| set.len() == 1)
    }
}

impl core::fmt::Debug for ByteEquivalence {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut map = f.debug_map();
        for b in 0..=255u8 {
            let set = self.equivalents(b);
            if set.len() > 1 {
                map.entry(&b, set);
            }
        }
        map.finish()
    }
}

/// Partition bytes into the classes of the smallest equivalence relation
/// containing every pair `(b, e)` with `e` in `table[b]`, and map each byte
/// to its class.
fn close(table: &[ByteSet; 256]) -> [ByteSet; 256] {
    fn find(parent: &mut [u8; 256], mut b: u8) -> u8 {
        while parent[usize::from(b)] != b {
            let grandparent = parent[usize::from(parent[usize::from(b)])];
            parent[usize::from(b)] = grandparent;
            b = grandparent;
        }
        b
    }

    let mut parent = [0u8; 256];
    for b in 0..=255u8 {
        parent[usize::from(b)] = b;
    }
    for b in 0..=255u8 {
        for eb in table[usize::from(b)].iter() {
            let (r1, r2) = (find(&mut parent, b), find(&mut parent, eb));
            if r1 != r2 {
                parent[usize::from(r1)] = r2;
            }
        }
    }
    let mut classes = [ByteSet::empty(); 256];
    for b in 0..=255u8 {
        let root = find(&mut parent, b);
        classes[usize::from(root)].add(b);
    }
    let mut closed = [ByteSet::empty(); 256];
    for b in 0..=255u8 {
        let root = find(&mut parent, b);
        closed[usize::from(b)] = classes[usize::from(root)];
    }
    closed
}

/// If the given byte is an ASCII letter, then return it in the opposite case.
/// e.g., Given `b'A'`, this returns `b'a'`, and given `b'a'`, this returns
/// `b'A'`. If a non-ASCII letter is given, then the given byte is returned.
pub(crate) fn opposite_ascii_case(b: u8) -> u8 {
    if b'A' <= b && b <= b'Z' {
        b.to_ascii_lowercase()
    } else if b'a' <= b && b <= b'z' {
        b.to_ascii_uppercase()
    } else {
        b
    }
}
