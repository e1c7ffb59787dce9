//! Case-insensitive, numeric-aware title ordering.
//!
//! Used both for catalog query ordering and for the final display sort,
//! so "Course 2" sorts before "Course 10" and casing never splits runs.

use std::cmp::Ordering;

/// Compares two titles case-insensitively with numeric-aware segments
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    let a_chunks = chunks(a);
    let b_chunks = chunks(b);

    let mut left = a_chunks.iter();
    let mut right = b_chunks.iter();

    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => match compare_chunks(x, y) {
                Ordering::Equal => continue,
                other => return other,
            },
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Chunk {
    Digits(String),
    Text(String),
}

fn chunks(s: &str) -> Vec<Chunk> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut current_is_digits = false;

    for c in s.chars() {
        let is_digit = c.is_ascii_digit();
        if !current.is_empty() && is_digit != current_is_digits {
            out.push(finish_chunk(current, current_is_digits));
            current = String::new();
        }
        current_is_digits = is_digit;
        current.push(c);
    }
    if !current.is_empty() {
        out.push(finish_chunk(current, current_is_digits));
    }
    out
}

fn finish_chunk(raw: String, is_digits: bool) -> Chunk {
    if is_digits {
        Chunk::Digits(raw)
    } else {
        Chunk::Text(raw.to_lowercase())
    }
}

fn compare_chunks(a: &Chunk, b: &Chunk) -> Ordering {
    match (a, b) {
        (Chunk::Digits(x), Chunk::Digits(y)) => compare_digit_runs(x, y),
        (Chunk::Text(x), Chunk::Text(y)) => x.cmp(y),
        // Digit runs sort ahead of text at the same position
        (Chunk::Digits(_), Chunk::Text(_)) => Ordering::Less,
        (Chunk::Text(_), Chunk::Digits(_)) => Ordering::Greater,
    }
}

/// Compares digit runs by numeric value without overflowing on long runs
fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a_trimmed = a.trim_start_matches('0');
    let b_trimmed = b.trim_start_matches('0');

    a_trimmed
        .len()
        .cmp(&b_trimmed.len())
        .then_with(|| a_trimmed.cmp(b_trimmed))
        .then_with(|| a.len().cmp(&b.len()))
}
