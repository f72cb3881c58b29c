// src/tests/line_tests.rs

//! tests for `line.rs` functions

#![allow(non_snake_case)]

use crate::data::line::{split_lines, Line};

use ::test_case::test_case;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test_case("abc\n", "abc", "\n")]
#[test_case("abc\r\n", "abc", "\r\n")]
#[test_case("abc\r", "abc", "\r")]
#[test_case("abc", "abc", "")]
#[test_case("\n", "", "\n")]
fn test_Line_new(
    raw: &str,
    content: &str,
    terminator: &str,
) {
    let line = Line::new(String::from(raw));
    assert_eq!(line.raw(), raw);
    assert_eq!(line.content(), content);
    assert_eq!(line.terminator(), terminator);
    assert!(!line.unchanged);
    assert_eq!(line.output(), raw);
}

#[test]
fn test_Line_output_rewritten() {
    let mut line = Line::new(String::from("abc\r\n"));
    line.rewritten = Some(String::from("xyz"));
    assert_eq!(line.output(), "xyz\r\n");
    line.unchanged = true;
    assert_eq!(line.output(), "abc\r\n");
}

#[test_case("", &[]; "empty")]
#[test_case("a", &["a"]; "unterminated")]
#[test_case("a\n", &["a\n"]; "terminated")]
#[test_case("a\nb\r\nc\rd", &["a\n", "b\r\n", "c\r", "d"]; "mixed")]
#[test_case("\n\n", &["\n", "\n"]; "blank lines")]
#[test_case("\r\r\n", &["\r", "\r\n"]; "lone cr then crlf")]
fn test_split_lines(
    text: &str,
    expect: &[&str],
) {
    let lines = split_lines(text);
    let raws: Vec<&str> = lines.iter().map(Line::raw).collect();
    assert_eq!(raws, expect, "\nExpected {:?}\nReceived {:?}\n", expect, raws);
    let joined: String = raws.concat();
    assert_eq!(joined, text);
}
