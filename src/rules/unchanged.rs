// src/rules/unchanged.rs

//! Implement [`UnchangedLinesRule`], the `unchanged_lines` rule.
//!
//! Lines selected by the rule are copied to the output verbatim.
//!
//! String form, comma-separated items:
//!
//! ```yaml
//! unchanged_lines: 1, 3, eof, 5:8, -3:eof, 10:w2, Last login
//! ```
//!
//! List form, one `[start, stop]` pair or a list of pairs:
//!
//! ```yaml
//! unchanged_lines: [[BEGIN CERTIFICATE, END CERTIFICATE], [2, w3]]
//! ```
//!
//! [`UnchangedLinesRule`]: crate::rules::unchanged::UnchangedLinesRule

use crate::common::{split_keep, LineIndex};
use crate::data::line::Line;
use crate::rules::errors::{Result, RuleError};
use crate::rules::value_repr;

use ::const_format::concatcp;
use ::lazy_static::lazy_static;
use ::regex::Regex;
use ::serde_yaml::Value;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

const MSG_STRING_FORM: &str = "\
Invalid value for `unchanged_lines`.

Expected one of the following formats:
================================================================
unchanged_lines: <idx-k>
unchanged_lines: <idx-i>, <idx-j>, ..., <idx-n>
unchanged_lines: <idx-i>, <matching-text-i>, ..., <matching-text-k>, <idx-n>
unchanged_lines: <idx-i>, <idx-j>:<idx-k>, ..., <idx-n>
unchanged_lines: <idx-i>, <idx-j>:<width>, ..., <idx-n>
================================================================";

const MSG_PAIR_FORM: &str = "\
Invalid value for `unchanged_lines`.

Expected one of the following pair formats:
======================================
unchanged_lines: [<idx-i>, <idx-k>]
unchanged_lines: [<idx-i>, <width>]
unchanged_lines: [<start>, <stop>]
unchanged_lines: [<start>, <idx-k>]
unchanged_lines: [<start>, <width>]
unchanged_lines: [<idx-i>, <stop>]
======================================

Multiple pairs may be combined:
======================================
unchanged_lines: [
  [<idx-i>, <idx-k>],
  [<idx-i>, <width>],
  ...,
  [<start>, <stop>]
]
======================================";

/// tokens of literal text turned into a pattern
const RP_TEXT_TOKEN: &str = concatcp!(r"(?i)\s+|[a-z]+|", crate::common::CGP_PUNCT, r"|[0-9]+");

lazy_static! {
    static ref RE_TEXT_TOKEN: Regex = Regex::new(RP_TEXT_TOKEN).unwrap();
    static ref RE_INDEX: Regex = Regex::new(r"^[+-]?\d+$").unwrap();
    static ref RE_SLICE: Regex = Regex::new(
        r"(?i)^(?P<start>null|none|-?\d+):(?P<stop>eof|w\d+|-?\d+)$"
    ).unwrap();
    static ref RE_WIDTH: Regex = Regex::new(r"(?i)^w(\d+)$").unwrap();
    static ref RE_ITEM_SEPARATOR: Regex = Regex::new(r"\s*,\s*").unwrap();
}

fn unchanged_error(
    message: &str,
    value: &Value,
) -> RuleError {
    RuleError::UnchangedLines(format!("{}\n\nReceived: {}", message, value_repr(value)))
}

/// Generalize literal `text` into a case-insensitive pattern: punctuation
/// is escaped, digit runs match any digits, whitespace runs match any
/// whitespace, letters match themselves.
///
/// e.g. `"Last login: 3 days"` becomes
/// `(?i)Last\s+login:\s+[0-9]+\s+days`.
pub fn text_to_pattern(text: &str) -> Result<Regex> {
    let mut pattern = String::from("(?i)");
    for (at, piece) in split_keep(text, &RE_TEXT_TOKEN).into_iter().enumerate() {
        if at % 2 == 0 {
            pattern.push_str(&::regex::escape(piece));
        } else if piece.chars().all(|c| c.is_ascii_digit()) {
            pattern.push_str("[0-9]+");
        } else if piece.chars().all(char::is_whitespace) {
            pattern.push_str(r"\s+");
        } else if piece.chars().all(|c| c.is_ascii_alphabetic()) {
            pattern.push_str(piece);
        } else {
            pattern.push_str(&::regex::escape(piece));
        }
    }
    defo!("{:?} → {:?}", text, pattern);

    Ok(Regex::new(&pattern)?)
}

/// Resolve a possibly negative line index against `total` lines, clamped
/// to the first line.
fn resolve_index(
    index: i64,
    total: usize,
) -> usize {
    if index >= 0 {
        index as usize
    } else {
        (total as i64 + index).max(0) as usize
    }
}

/// A range of lines with slice semantics: `start` inclusive, `stop`
/// exclusive, negative values count from the end, a `None` stop is the
/// end of the document.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LineSlice {
    pub start: i64,
    pub stop: Option<i64>,
}

impl LineSlice {
    pub fn range(
        &self,
        total: usize,
    ) -> std::ops::Range<LineIndex> {
        let start = resolve_index(self.start, total).min(total);
        let stop = match self.stop {
            Some(stop) => resolve_index(stop, total).min(total),
            None => total,
        };

        start..stop.max(start)
    }
}

/// One bound of a `[start, stop]` pair.
#[derive(Clone, Debug)]
pub enum LineBound {
    /// 0-based, negative counts from the end
    Index(i64),
    /// the last line
    Eof,
    /// a stop bound only: the range runs to the end of the document
    Open,
    /// a line whose content matches
    Pattern(Regex),
    /// a stop bound only: the range covers this many lines
    Width(usize),
}

impl PartialEq for LineBound {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        match (self, other) {
            (LineBound::Index(a), LineBound::Index(b)) => a == b,
            (LineBound::Eof, LineBound::Eof) | (LineBound::Open, LineBound::Open) => true,
            (LineBound::Pattern(a), LineBound::Pattern(b)) => a.as_str() == b.as_str(),
            (LineBound::Width(a), LineBound::Width(b)) => a == b,
            _ => false,
        }
    }
}

impl LineBound {
    /// Text of a list element: `null` is `none`.
    fn scalar_text(value: &Value) -> Option<String> {
        match value {
            Value::Null => Some(String::from("none")),
            Value::Number(n) if n.is_i64() => Some(n.to_string()),
            Value::String(s) => Some(String::from(s.trim())),
            _ => None,
        }
    }

    /// A start bound. A 1-based positive index becomes 0-based, `none` is
    /// the first line, `wN` is taken as text.
    fn parse_start(text: &str) -> Result<LineBound> {
        if RE_INDEX.is_match(text) {
            if let Ok(index) = text.parse::<i64>() {
                return Ok(LineBound::Index(if index > 0 { index - 1 } else { index }));
            }
        }
        match text.to_lowercase().as_str() {
            "none" | "null" => Ok(LineBound::Index(0)),
            "eof" => Ok(LineBound::Eof),
            _ => Ok(LineBound::Pattern(text_to_pattern(text)?)),
        }
    }

    /// A stop bound. A 1-based positive index becomes 0-based, `none` is
    /// the open end.
    fn parse_stop(text: &str) -> Result<LineBound> {
        if RE_INDEX.is_match(text) {
            if let Ok(index) = text.parse::<i64>() {
                return Ok(LineBound::Index(if index > 0 { index - 1 } else { index }));
            }
        }
        if let Some(caps) = RE_WIDTH.captures(text) {
            if let Ok(width) = caps[1].parse::<usize>() {
                return Ok(LineBound::Width(width));
            }
        }
        match text.to_lowercase().as_str() {
            "none" | "null" => Ok(LineBound::Open),
            "eof" => Ok(LineBound::Eof),
            _ => Ok(LineBound::Pattern(text_to_pattern(text)?)),
        }
    }

    /// Does line `index` of `total` with `content` satisfy this bound?
    fn matches(
        &self,
        index: LineIndex,
        total: usize,
        content: &str,
    ) -> bool {
        match self {
            LineBound::Index(at) => resolve_index(*at, total) == index,
            LineBound::Eof => index + 1 == total,
            LineBound::Open | LineBound::Width(_) => false,
            LineBound::Pattern(regex) => regex.is_match(content),
        }
    }
}

/// Parsed `unchanged_lines` rule.
///
/// The string form fills `indices`, `slices` and `patterns`; the list form
/// fills `pairs`.
#[derive(Clone, Debug, Default)]
pub struct UnchangedLinesRule {
    /// 0-based, negative counts from the end
    pub indices: Vec<i64>,
    pub slices: Vec<LineSlice>,
    pub patterns: Vec<Regex>,
    pub pairs: Vec<(LineBound, LineBound)>,
}

impl UnchangedLinesRule {
    /// Parse the value of the `unchanged_lines` key.
    pub fn from_value(value: &Value) -> Result<UnchangedLinesRule> {
        defn!("{:?}", value);
        let rule = match value {
            Value::Number(n) => match n.as_i64() {
                Some(index) => UnchangedLinesRule {
                    indices: vec![if index > 0 { index - 1 } else { index }],
                    ..Default::default()
                },
                None => return Err(unchanged_error(MSG_STRING_FORM, value)),
            },
            Value::String(text) => UnchangedLinesRule::parse_str(text)?,
            Value::Sequence(items) => UnchangedLinesRule::from_pairs(items, value)?,
            _ => return Err(unchanged_error(MSG_STRING_FORM, value)),
        };
        defx!("{:?}", rule);

        Ok(rule)
    }

    /// Parse the list form: `[start, stop]` or `[[start, stop], ...]`.
    fn from_pairs(
        items: &[Value],
        value: &Value,
    ) -> Result<UnchangedLinesRule> {
        let error = || unchanged_error(MSG_PAIR_FORM, value);
        let pairs: Vec<&[Value]> = match items.first() {
            Some(Value::Sequence(_)) => items
                .iter()
                .map(|item| match item {
                    Value::Sequence(pair) if pair.len() == 2 => Ok(pair.as_slice()),
                    _ => Err(error()),
                })
                .collect::<Result<Vec<&[Value]>>>()?,
            Some(_) if items.len() == 2 => vec![items],
            _ => return Err(error()),
        };
        let mut rule = UnchangedLinesRule::default();
        for pair in pairs {
            // a start must be given
            if pair[0].is_null() {
                return Err(error());
            }
            let start = LineBound::scalar_text(&pair[0]).ok_or_else(error)?;
            let stop = LineBound::scalar_text(&pair[1]).ok_or_else(error)?;
            rule.pairs.push((LineBound::parse_start(&start)?, LineBound::parse_stop(&stop)?));
        }

        Ok(rule)
    }

    /// Parse the string form, comma-separated items of 1-based indices,
    /// `eof`, slices and literal text.
    pub fn parse_str(text: &str) -> Result<UnchangedLinesRule> {
        let mut rule = UnchangedLinesRule::default();
        for item in RE_ITEM_SEPARATOR.split(text.trim()) {
            let item = item.trim();
            if item.is_empty() {
                continue;
            }
            if RE_INDEX.is_match(item) {
                if let Ok(index) = item.parse::<i64>() {
                    rule.indices.push(if index > 0 { index - 1 } else { index });
                    continue;
                }
            }
            if item.eq_ignore_ascii_case("eof") {
                rule.indices.push(-1);
                continue;
            }
            if let Some(caps) = RE_SLICE.captures(item) {
                if let Some(slice) = UnchangedLinesRule::parse_slice(&caps["start"], &caps["stop"]) {
                    rule.slices.push(slice);
                }
                continue;
            }
            rule.patterns.push(text_to_pattern(item)?);
        }

        Ok(rule)
    }

    /// `start:stop`, `start:wWIDTH` or `start:eof`. Returns `None` for an
    /// empty slice.
    fn parse_slice(
        start: &str,
        stop: &str,
    ) -> Option<LineSlice> {
        let start: i64 = match start.to_lowercase().as_str() {
            "null" | "none" => 0,
            number => number.parse().ok()?,
        };
        let start = if start > 0 { start - 1 } else { start };
        let stop = stop.to_lowercase();
        if stop == "eof" {
            return Some(LineSlice { start, stop: None });
        }
        if let Some(width) = stop.strip_prefix('w') {
            let width: i64 = width.parse().ok()?;
            if width == 0 {
                return None;
            }
            let end = start + width;
            if start < 0 && end >= 0 {
                return Some(LineSlice { start, stop: None });
            }
            return Some(LineSlice { start, stop: Some(end) });
        }
        let stop: i64 = stop.parse().ok()?;
        // 1-based inclusive stop; a negative stop counts from the end
        let stop = if stop >= 0 { stop } else { stop + 1 };
        if start < 0 && stop == 0 {
            return Some(LineSlice { start, stop: None });
        }
        if stop > start {
            return Some(LineSlice { start, stop: Some(stop) });
        }

        None
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
            && self.slices.is_empty()
            && self.patterns.is_empty()
            && self.pairs.is_empty()
    }

    /// Which of `contents` (line content without terminators) stay
    /// unchanged.
    pub fn mark(
        &self,
        contents: &[&str],
    ) -> Vec<bool> {
        let total = contents.len();
        let mut marks: Vec<bool> = vec![false; total];
        if total == 0 {
            return marks;
        }
        if !self.indices.is_empty() || !self.slices.is_empty() || !self.patterns.is_empty() {
            for slice in self.slices.iter() {
                for index in slice.range(total) {
                    marks[index] = true;
                }
            }
            for index in self.indices.iter() {
                let at = resolve_index(*index, total);
                if at < total {
                    marks[at] = true;
                }
            }
            for (index, content) in contents.iter().enumerate() {
                if !marks[index] && self.patterns.iter().any(|re| re.is_match(content)) {
                    marks[index] = true;
                }
            }
            return marks;
        }
        for (start, stop) in self.pairs.iter() {
            self.mark_pair(start, stop, contents, &mut marks);
        }

        marks
    }

    /// Mark the first range of lines from the line matching `start`
    /// through the line satisfying `stop`.
    fn mark_pair(
        &self,
        start: &LineBound,
        stop: &LineBound,
        contents: &[&str],
        marks: &mut [bool],
    ) {
        let total = contents.len();
        let first: LineIndex = match contents
            .iter()
            .enumerate()
            .position(|(index, content)| start.matches(index, total, content))
        {
            Some(first) => first,
            None => return,
        };
        let end: LineIndex = match stop {
            LineBound::Index(at) => {
                let last = resolve_index(*at, total);
                if last < first {
                    defo!("stop {} before start {}, skip", last, first);
                    return;
                }
                last.min(total - 1) + 1
            }
            LineBound::Eof | LineBound::Open => total,
            LineBound::Width(width) => first.saturating_add(*width).min(total),
            LineBound::Pattern(_) => contents
                .iter()
                .enumerate()
                .skip(first + 1)
                .find(|(index, content)| stop.matches(*index, total, content))
                .map_or(total, |(index, _)| index + 1),
        };
        defo!("mark lines {}..{}", first, end);
        for mark in marks[first..end].iter_mut() {
            *mark = true;
        }
    }

    /// Set [`Line::unchanged`] on each selected line.
    pub fn apply(
        &self,
        lines: &mut [Line],
    ) {
        let marks = {
            let contents: Vec<&str> = lines.iter().map(|line| line.content()).collect();
            self.mark(&contents)
        };
        for (line, mark) in lines.iter_mut().zip(marks) {
            if mark {
                line.unchanged = true;
            }
        }
    }
}
