/*!
A small abstraction over the kinds of text that can be searched and rewritten.

Searching only ever needs a byte slice, so every search routine accepts any
`AsRef<[u8]>`. Replacement is different: its result should have the same
type as its input, so replacing in a `&str` gives back a string and replacing
in a `&[u8]` gives back bytes. The [`Text`] trait provides exactly the two
conversions needed for that.
*/

use alloc::{borrow::ToOwned, string::String, vec::Vec};

/// A type of text that replacement routines can read from and produce.
///
/// Replacement routines return a `Cow<T>`. When nothing was replaced, the
/// result borrows the input without copying it. Otherwise the result is
/// built as bytes and converted into `T::Owned` with [`Text::from_bytes`].
///
/// This is implemented for `str`, `String`, `[u8]` and `Vec<u8>`.
pub trait Text: ToOwned {
    /// Return this text as a byte slice, without copying.
    fn as_bytes(&self) -> &[u8];

    /// Convert the bytes produced by a replacement into an owned value of
    /// this text type.
    ///
    /// Replacements operate on bytes, so replacing in a string can produce
    /// invalid UTF-8 (for example, when a match begins in the middle of a
    /// multi-byte codepoint). String types repair this by replacing invalid
    /// sequences with `U+FFFD`, which costs an extra copy only in that case.
    fn from_bytes(bytes: Vec<u8>) -> Self::Owned;
}

impl Text for str {
    fn as_bytes(&self) -> &[u8] {
        str::as_bytes(self)
    }

    fn from_bytes(bytes: Vec<u8>) -> String {
        string_from_bytes(bytes)
    }
}

impl Text for String {
    fn as_bytes(&self) -> &[u8] {
        String::as_bytes(self)
    }

    fn from_bytes(bytes: Vec<u8>) -> String {
        string_from_bytes(bytes)
    }
}

impl Text for [u8] {
    fn as_bytes(&self) -> &[u8] {
        self
    }

    fn from_bytes(bytes: Vec<u8>) -> Vec<u8> {
        bytes
    }
}

impl Text for Vec<u8> {
    fn as_bytes(&self) -> &[u8] {
        self
    }

    fn from_bytes(bytes: Vec<u8>) -> Vec<u8> {
        bytes
    }
}

fn string_from_bytes(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(string) => string,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    }
}
