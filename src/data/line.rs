// src/data/line.rs

//! Implement [`Line`], one line of a document, and [`split_lines`].
//!
//! A `Line` keeps its original line terminator so a rewritten document can
//! be reassembled byte-for-byte around the rewritten content.
//!
//! [`Line`]: crate::data::line::Line
//! [`split_lines`]: crate::data::line::split_lines

#[cfg(any(debug_assertions, test))]
use crate::common::LineIndex;
#[cfg(any(debug_assertions, test))]
use crate::debug::printers::str_to_String_noraw;

use std::fmt;

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A sequence of [`Line`].
pub type Lines = Vec<Line>;

/// One line of a document: content followed by its terminator run
/// (`"\n"`, `"\r\n"`, `"\r"` or nothing for an unterminated last line).
#[derive(Clone, Default, Eq, PartialEq)]
pub struct Line {
    raw: String,
    /// byte length of the content; the terminator follows
    content_len: usize,
    /// excluded from rewriting by the `unchanged_lines` rule
    pub unchanged: bool,
    /// rewritten content, without the terminator
    pub rewritten: Option<String>,
}

impl fmt::Debug for Line {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        f.debug_struct("Line")
            .field("content", &self.content())
            .field("terminator", &self.terminator())
            .field("unchanged", &self.unchanged)
            .field("rewritten", &self.rewritten)
            .finish()
    }
}

impl Line {
    pub fn new(raw: String) -> Line {
        let content_len = raw
            .trim_end_matches(|c| c == '\r' || c == '\n')
            .len();

        Line {
            raw,
            content_len,
            unchanged: false,
            rewritten: None,
        }
    }

    /// The original line including its terminator.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn content(&self) -> &str {
        &self.raw[..self.content_len]
    }

    pub fn terminator(&self) -> &str {
        &self.raw[self.content_len..]
    }

    /// Rewritten content if set and the line is not unchanged, else the
    /// original content, followed by the original terminator.
    pub fn output(&self) -> String {
        let content = match (&self.rewritten, self.unchanged) {
            (Some(rewritten), false) => rewritten.as_str(),
            _ => self.content(),
        };
        let mut out = String::with_capacity(content.len() + self.terminator().len());
        out.push_str(content);
        out.push_str(self.terminator());

        out
    }
}

/// Split `text` into [`Line`]s, each keeping its own terminator.
///
/// `"\n"`, `"\r\n"` and a lone `"\r"` all end a line, and may be mixed in
/// one document. Concatenating the `raw` of every returned `Line`
/// reproduces `text`.
pub fn split_lines(text: &str) -> Lines {
    defn!("text len {}", text.len());
    let bytes = text.as_bytes();
    let mut lines: Lines = Lines::new();
    let mut begin: usize = 0;
    let mut at: usize = 0;
    while at < bytes.len() {
        let end: Option<usize> = match bytes[at] {
            b'\n' => Some(at + 1),
            b'\r' if bytes.get(at + 1) == Some(&b'\n') => Some(at + 2),
            b'\r' => Some(at + 1),
            _ => None,
        };
        match end {
            Some(end) => {
                lines.push(Line::new(String::from(&text[begin..end])));
                begin = end;
                at = end;
            }
            None => at += 1,
        }
    }
    if begin < text.len() {
        lines.push(Line::new(String::from(&text[begin..])));
    }
    #[cfg(any(debug_assertions, test))]
    for (index, line) in lines.iter().enumerate() {
        let index: LineIndex = index;
        defo!("line {}: {:?}", index, str_to_String_noraw(line.raw()));
    }
    defx!("return {} lines", lines.len());

    lines
}
