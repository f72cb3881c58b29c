// src/common.rs
//
// common imports, type aliases, and other globals (avoids circular imports)

extern crate rand;
extern crate regex;

use ::regex::Regex;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// file-handling, command-line parsing
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub use std::path::Path;

/// `F`ile `Path` as passed on the command-line
pub type FPath = String;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// indexes and counts
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// General purpose counting type.
pub type Count = u64;

/// 0-based index of a [`Line`] within a document.
///
/// [`Line`]: crate::data::line::Line
pub type LineIndex = usize;

/// 0-based index of a whitespace-separated word within a line.
pub type WordIndex = usize;

/// Random number generator owned by a [`RewriteSession`].
///
/// [`RewriteSession`]: crate::session::RewriteSession
pub type SessionRng = ::rand::rngs::StdRng;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// character helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Regex fragment for one ASCII punctuation character.
pub const CGP_PUNCT: &str = "[[:punct:]]";

/// Return `text` with the ASCII letter case of `template` applied
/// position-by-position. Positions beyond `template`, and non-letters in
/// `template`, leave the character of `text` as-is.
pub fn match_case(
    template: &str,
    text: &str,
) -> String {
    let mut tchars = template.chars();
    text.chars()
        .map(|c| match tchars.next() {
            Some(t) if t.is_ascii_uppercase() => c.to_ascii_uppercase(),
            Some(t) if t.is_ascii_lowercase() => c.to_ascii_lowercase(),
            _ => c,
        })
        .collect()
}

/// Split `text` into alternating pieces of non-matching and matching text
/// for `re`. Concatenating the pieces reproduces `text`. The first piece is
/// always non-matching text (possibly empty).
pub fn split_keep<'a>(
    text: &'a str,
    re: &Regex,
) -> Vec<&'a str> {
    let mut pieces: Vec<&'a str> = Vec::new();
    let mut at: usize = 0;
    for m in re.find_iter(text) {
        if m.start() == m.end() {
            continue;
        }
        pieces.push(&text[at..m.start()]);
        pieces.push(m.as_str());
        at = m.end();
    }
    pieces.push(&text[at..]);

    pieces
}

/// Count of `char`s, the "length" used for shape comparisons.
#[inline(always)]
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
