// src/rules/dtrule.rs

//! Implement [`DateTimeRule`], the `rewrite_datetime` rule.
//!
//! The rule selects a span of whitespace-separated words on every line
//! where a datetime is expected, e.g. the first three words of a syslog
//! line `Feb  7 12:57:36 host sshd[42]: ...`:
//!
//! ```yaml
//! rewrite_datetime: true, 1, 3
//! ```
//!
//! or in list form
//!
//! ```yaml
//! rewrite_datetime: [yes, 1, 3]
//! ```
//!
//! [`DateTimeRule`]: crate::rules::dtrule::DateTimeRule

use crate::common::WordIndex;
use crate::rules::errors::{Result, RuleError};
use crate::rules::value_repr;

use std::ops::Range;

use ::lazy_static::lazy_static;
use ::regex::Regex;
use ::serde_yaml::Value;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

const MSG_STRING_FORM: &str =
    "rewrite_datetime must be 'flag, index, width' where flag is one of: yes, no, true, false";
const MSG_LIST_FORM: &str = "rewrite_datetime must be [true|false|yes|no, index, width]";
const MSG_LIST_FLAG: &str = "first element must be one of: true, false, yes, no";
const MSG_LIST_INDEX: &str = "second element must be a signed integer index";
const MSG_LIST_WIDTH: &str = "third element must be a width value or 'eol' or 'none'";

lazy_static! {
    static ref RE_DT_RULE: Regex = Regex::new(
        r"(?i)^(?P<flag>yes|no|true|false)\s*,\s*(?P<start>-?\d+)(?:\s*,\s*(?P<width>\d+|eol|null|none)?)?$"
    ).unwrap();
    static ref RE_FLAG: Regex = Regex::new(r"(?i)^(true|false|yes|no)$").unwrap();
    static ref RE_INDEX: Regex = Regex::new(r"^[+-]?\d+$").unwrap();
    static ref RE_WIDTH: Regex = Regex::new(r"(?i)^(\d+|eol|none|null)$").unwrap();
}

/// How many words a [`DateTimeRule`] span covers.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SpanWidth {
    /// at most this many words
    Words(usize),
    /// through the last word of the line
    Eol,
}

/// Parsed `rewrite_datetime` rule.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DateTimeRule {
    /// rewrite recognized datetimes, else keep them verbatim
    pub rewrite: bool,
    /// 1-based word index, negative counts from the end
    pub start: i64,
    pub width: SpanWidth,
}

fn datetime_error(
    message: &str,
    value: &Value,
) -> RuleError {
    RuleError::DateTimeRule(format!("{}\nReceived: {}", message, value_repr(value)))
}

fn is_yes(flag: &str) -> bool {
    matches!(flag.to_lowercase().as_str(), "yes" | "true")
}

fn parse_width(width: Option<&str>) -> Option<SpanWidth> {
    match width {
        None => Some(SpanWidth::Words(1)),
        Some(width) => match width.parse::<usize>() {
            Ok(words) => Some(SpanWidth::Words(words)),
            Err(_) if RE_WIDTH.is_match(width) => Some(SpanWidth::Eol),
            Err(_) => None,
        },
    }
}

/// Render a list element the way the list form is validated: scalars as
/// their plain text, `null` as `none`.
fn element_text(value: &Value) -> String {
    match value {
        Value::Null => String::from("none"),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_lowercase(),
        other => value_repr(other),
    }
}

impl DateTimeRule {
    /// Parse the value of the `rewrite_datetime` key, either the string
    /// form `"flag, start[, width]"` or the list form
    /// `[flag, start, width?]`.
    pub fn from_value(value: &Value) -> Result<DateTimeRule> {
        defn!("{:?}", value);
        let rule = match value {
            Value::String(text) => DateTimeRule::parse_str(text)
                .map_err(|_| datetime_error(MSG_STRING_FORM, value))?,
            Value::Sequence(items) => DateTimeRule::from_list(items, value)?,
            _ => return Err(datetime_error(MSG_STRING_FORM, value)),
        };
        defx!("{:?}", rule);

        Ok(rule)
    }

    fn from_list(
        items: &[Value],
        value: &Value,
    ) -> Result<DateTimeRule> {
        if !(2..=3).contains(&items.len()) {
            return Err(datetime_error(MSG_LIST_FORM, value));
        }
        let texts: Vec<String> = items.iter().map(element_text).collect();
        let flag = &texts[0];
        let start = &texts[1];
        let width = texts.get(2).map(String::as_str);
        if !RE_FLAG.is_match(flag) {
            return Err(datetime_error(MSG_LIST_FLAG, value));
        }
        if !RE_INDEX.is_match(start) {
            return Err(datetime_error(MSG_LIST_INDEX, value));
        }
        let start: i64 = start
            .parse()
            .map_err(|_| datetime_error(MSG_LIST_INDEX, value))?;
        let width = match width {
            Some(text) if !RE_WIDTH.is_match(text) => {
                return Err(datetime_error(MSG_LIST_WIDTH, value));
            }
            width => parse_width(width).ok_or_else(|| datetime_error(MSG_LIST_WIDTH, value))?,
        };

        Ok(DateTimeRule {
            rewrite: is_yes(flag),
            start,
            width,
        })
    }

    /// Parse the string form, e.g. `"yes, 1, 3"`, `"no, -2"`,
    /// `"true, 4, eol"`. A missing width is `1`.
    pub fn parse_str(text: &str) -> Result<DateTimeRule> {
        let error = || datetime_error(MSG_STRING_FORM, &Value::String(String::from(text)));
        let caps = RE_DT_RULE
            .captures(text.trim())
            .ok_or_else(error)?;
        let start: i64 = caps["start"]
            .parse()
            .map_err(|_| error())?;
        let width = parse_width(caps.name("width").map(|m| m.as_str())).ok_or_else(error)?;

        Ok(DateTimeRule {
            rewrite: is_yes(&caps["flag"]),
            start,
            width,
        })
    }

    /// The half-open range of word indexes selected among `word_count`
    /// words, or `None` if the selection is empty.
    ///
    /// A start of `0` is taken as `1`. A positive start past the last word
    /// selects every word. A negative start counts back from the end and
    /// is clamped to the first word.
    pub fn extract_span(
        &self,
        word_count: usize,
    ) -> Option<Range<WordIndex>> {
        if word_count == 0 {
            return None;
        }
        let count = word_count as i64;
        let start: i64 = if self.start == 0 { 1 } else { self.start };
        if start > count {
            return Some(0..word_count);
        }
        let begin: usize = if start > 0 {
            (start - 1) as usize
        } else {
            (count + start).max(0) as usize
        };
        let end: usize = match self.width {
            SpanWidth::Eol => word_count,
            SpanWidth::Words(words) => begin.saturating_add(words).min(word_count),
        };
        if end <= begin {
            return None;
        }

        Some(begin..end)
    }
}
