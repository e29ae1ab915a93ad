//! Natural (alphanumeric) ordering of file names
//!
//! A natural sort compares embedded digit runs by numeric value rather than
//! by character code, so "Lecture 10.pdf" sorts after "Lecture 2.pdf". The
//! key derivation is a pure string operation with no filesystem access, so
//! callers can sort whichever name strings they are about to act on.

use std::cmp::Ordering;

/// One run of a file name: digits compared numerically, everything else as
/// text. Variant order makes a digit run sort before a text run when two
/// names diverge in chunk kind.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Chunk {
    Number(u128),
    Text(String),
}

/// Derived ordering key for one file name. Comparison is lexicographic over
/// the chunk sequence.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SequenceKey(Vec<Chunk>);

/// Split a name into alternating digit and non-digit runs and convert each
/// run into a typed chunk.
///
/// Digit runs longer than 38 digits saturate to the maximum numeric chunk.
pub fn sequence_key(name: &str) -> SequenceKey {
    let mut chunks = Vec::new();
    let mut rest = name;

    while let Some(first) = rest.chars().next() {
        let digits = first.is_ascii_digit();
        let split = rest
            .find(|c: char| c.is_ascii_digit() != digits)
            .unwrap_or(rest.len());
        let (run, tail) = rest.split_at(split);

        chunks.push(if digits {
            Chunk::Number(run.parse().unwrap_or(u128::MAX))
        } else {
            Chunk::Text(run.to_string())
        });

        rest = tail;
    }

    SequenceKey(chunks)
}

/// Compare two names naturally.
pub fn compare_natural(a: &str, b: &str) -> Ordering {
    sequence_key(a).cmp(&sequence_key(b))
}

/// Sort names into natural order. The underlying sort is stable, so equal
/// keys keep their input order.
pub fn sort_natural<S: AsRef<str>>(names: &mut [S]) {
    names.sort_by(|a, b| compare_natural(a.as_ref(), b.as_ref()));
}
