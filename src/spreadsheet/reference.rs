//! A1-style cell references.
use regex::Regex;
use std::sync::LazyLock;

static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\$?([A-Za-z]{1,3})\$?([1-9][0-9]{0,6})$").expect("cell reference pattern")
});

/// Converts a reference such as `B3` to a zero-based (row, col) pair.
pub(crate) fn reference_to_index(reference: &str) -> Option<(usize, usize)> {
    let captures = REFERENCE.captures(reference.trim())?;
    let col = captures[1]
        .bytes()
        .fold(0usize, |index, letter| index * 26 + (letter.to_ascii_uppercase() - b'A' + 1) as usize);
    let row = captures[2].parse::<usize>().ok()?;
    Some((row - 1, col - 1))
}

/// Converts a zero-based (row, col) pair to a reference such as `B3`.
pub(crate) fn index_to_reference(row: usize, col: usize) -> String {
    let mut letters = Vec::new();
    let mut col = col + 1;
    while col > 0 {
        col -= 1;
        letters.push(b'A' + (col % 26) as u8);
        col /= 26;
    }
    letters.reverse();
    format!("{}{}", String::from_utf8_lossy(&letters), row + 1)
}
