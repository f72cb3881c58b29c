// src/tests/session_tests.rs

//! tests for `session.rs` functions

#![allow(non_snake_case)]

use crate::data::line::split_lines;
use crate::data::net::parse_ipv4;
use crate::data::token::{tokenize, TokenKind};
use crate::rules::{EntityKind, RuleSet};
use crate::session::RewriteSession;
use crate::tests::common::{char_classes, rng_seeded, SEEDS};

use ::chrono::NaiveDateTime;
use ::more_asserts::assert_lt;
use ::si_trace_print::stack::stack_offset_set;
use ::test_case::test_case;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn session_seeded(
    rules: &str,
    seed: u64,
) -> RewriteSession {
    RewriteSession::with_rng(RuleSet::from_yaml_str(rules).unwrap(), rng_seeded(seed))
}

/// the rewritten text of each token of `kind` in `raw`, found at the same
/// token positions in `rewritten`
fn rewritten_of_kind(
    raw: &str,
    rewritten: &str,
    kind: TokenKind,
) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    let raw_lines = split_lines(raw);
    let new_lines = split_lines(rewritten);
    assert_eq!(raw_lines.len(), new_lines.len());
    for (raw_line, new_line) in raw_lines.iter().zip(new_lines.iter()) {
        let raw_tokens = tokenize(raw_line.content());
        let new_tokens = tokenize(new_line.content());
        assert_eq!(raw_tokens.len(), new_tokens.len());
        for (raw_token, new_token) in raw_tokens.iter().zip(new_tokens.iter()) {
            if raw_token.kind() == kind {
                found.push(String::from(new_token.raw()));
            }
        }
    }

    found
}

const LOG: &str = "\
user alice logged in from 192.168.1.20 port 22\r\n\
GET https://www.example.com/index.html 200 0.532s\n\
mac 00:1A:2B:3C:4D:5E id=0x1F3A\n\
\n\
done";

#[test]
fn test_generate_keeps_shape() {
    stack_offset_set(Some(2));
    for seed in SEEDS.iter() {
        let mut session = session_seeded("", *seed);
        let rewritten = session.generate(LOG);
        assert_eq!(rewritten.raw, LOG);
        assert_ne!(rewritten.rewritten, LOG);
        assert_eq!(
            char_classes(&rewritten.rewritten),
            char_classes(LOG),
            "\nExpected shape of {:?}\nReceived {:?}\n",
            LOG,
            rewritten.rewritten
        );
    }
}

#[test]
fn test_generate_empty() {
    let mut session = session_seeded("", 0);
    assert_eq!(session.generate("").rewritten, "");
    assert_eq!(session.documents(), 1);
}

#[test]
fn test_generate_ipv4_consistent() {
    let text = "connect 34.149.87.45\nreply from 34.149.87.45,\n(34.149.87.45) closed\n";
    for seed in SEEDS.iter() {
        let mut session = session_seeded("", *seed);
        let rewritten = session.generate(text).rewritten;
        let found = rewritten_of_kind(text, &rewritten, TokenKind::Ipv4);
        assert_eq!(found.len(), 3);
        let addresses: Vec<String> = found
            .iter()
            .map(|token| String::from(parse_ipv4(token).unwrap().address()))
            .collect();
        assert!(addresses[0].starts_with("34."), "{:?}", addresses);
        assert_eq!(addresses[0], addresses[1]);
        assert_eq!(addresses[0], addresses[2]);
        assert!(found[1].ends_with(','));
        assert!(found[2].starts_with('(') && found[2].ends_with(')'));
    }
}

#[test]
fn test_generate_ipv4_shared_octets() {
    let text = "10.1.2.3 10.1.2.4\n";
    for seed in SEEDS.iter() {
        let mut session = session_seeded("", *seed);
        let rewritten = session.generate(text).rewritten;
        let found = rewritten_of_kind(text, &rewritten, TokenKind::Ipv4);
        let first = parse_ipv4(&found[0]).unwrap();
        let second = parse_ipv4(&found[1]).unwrap();
        let head = |address: &str| String::from(&address[..address.rfind('.').unwrap()]);
        assert_eq!(head(first.address()), head(second.address()));
    }
}

#[test]
fn test_generate_netmask_kept() {
    let text = "netmask 255.255.255.0 gateway 10.0.0.1\n";
    let mut session = session_seeded("", 3);
    let rewritten = session.generate(text).rewritten;
    assert!(rewritten.contains(" 255.255.255.0 "), "{:?}", rewritten);
}

#[test]
fn test_generate_repeated_word() {
    let mut session = session_seeded("", 4);
    let rewritten = session.generate("alpha alpha\nalpha").rewritten;
    let words: Vec<&str> = rewritten.split_whitespace().collect();
    assert_eq!(words.len(), 3);
    assert_eq!(words[0], words[1]);
    assert_eq!(words[0], words[2]);
    assert_ne!(words[0], "alpha");
}

#[test]
fn test_generate_rewrite_word_false() {
    let mut session = session_seeded("rewrite_word: false", 5);
    let rewritten = session.generate("alpha beta 10.1.2.3 gamma").rewritten;
    assert!(rewritten.starts_with("alpha beta 10."), "{:?}", rewritten);
    assert!(rewritten.ends_with(" gamma"), "{:?}", rewritten);
    assert_eq!(rewritten.len(), "alpha beta 10.1.2.3 gamma".len());
}

#[test]
fn test_generate_records_rules() {
    let mut session = session_seeded("rewrite_word: false", 6);
    session.generate("alpha 10.1.2.3");
    let text = session.rules().text();
    assert!(text.contains("rewrite_ipv4: true"), "{}", text);
    assert!(!text.contains("rewrite_mac"), "{}", text);
    assert!(session.rules().entity_rule(EntityKind::Ipv4).is_some());
}

#[test_case(1, &[1])]
#[test_case(2, &[1, 3])]
fn test_generate_unchanged_lines(
    seed: u64,
    unchanged: &[usize],
) {
    let rules = format!(
        "unchanged_lines: {}",
        unchanged
            .iter()
            .map(|index| (index + 1).to_string())
            .collect::<Vec<String>>()
            .join(", ")
    );
    let text = "first line here\nsecond line here\nthird line here\nfourth line here\nfifth line here\n";
    let mut session = session_seeded(&rules, seed);
    let rewritten = session.generate(text).rewritten;
    let raw_lines: Vec<&str> = text.lines().collect();
    let new_lines: Vec<&str> = rewritten.lines().collect();
    assert_eq!(raw_lines.len(), new_lines.len());
    for (index, (raw, new)) in raw_lines.iter().zip(new_lines.iter()).enumerate() {
        if unchanged.contains(&index) {
            assert_eq!(raw, new, "line {} changed", index);
        } else {
            assert_ne!(raw, new, "line {} unchanged", index);
            assert_eq!(raw.len(), new.len());
        }
    }
}

#[test]
fn test_generate_unchanged_pair() {
    let text = "a\n-----BEGIN CERT-----\nMIIB\n-----END CERT-----\nb\n";
    let mut session = session_seeded("unchanged_lines: [BEGIN CERT, END CERT]", 7);
    let rewritten = session.generate(text).rewritten;
    assert!(rewritten.contains("\n-----BEGIN CERT-----\nMIIB\n-----END CERT-----\n"), "{:?}", rewritten);
}

#[test]
fn test_generate_datetime_rewritten_earlier() {
    stack_offset_set(Some(2));
    let text = "2026-02-07 12:57:36 server started\n";
    let original = NaiveDateTime::parse_from_str("2026-02-07 12:57:36", "%Y-%m-%d %H:%M:%S").unwrap();
    for seed in SEEDS.iter() {
        let mut session = session_seeded("rewrite_datetime: yes, 1, 2", *seed);
        let rewritten = session.generate(text).rewritten;
        assert_eq!(rewritten.len(), text.len());
        let instant = NaiveDateTime::parse_from_str(&rewritten[..19], "%Y-%m-%d %H:%M:%S")
            .unwrap_or_else(|err| panic!("{:?}: {}", rewritten, err));
        assert_lt!(instant, original);
    }
}

#[test]
fn test_generate_datetime_kept() {
    let text = "2026-02-07 12:57:36 server started\n";
    let mut session = session_seeded("rewrite_datetime: no, 1, 2", 8);
    let rewritten = session.generate(text).rewritten;
    assert!(rewritten.starts_with("2026-02-07 12:57:36 "), "{:?}", rewritten);
    assert!(!rewritten.contains("server"), "{:?}", rewritten);
}

#[test]
fn test_generate_rewrite_on_each_generate_false() {
    let mut session = session_seeded("rewrite_on_each_generate: false", 9);
    let first = session.generate("alpha 10.1.2.3 beta").rewritten;
    let second = session.generate("alpha 10.1.2.3 beta").rewritten;
    assert_eq!(first, second);
    assert_eq!(session.documents(), 2);
}

#[test]
fn test_generate_rebuilds_tables() {
    let mut session = session_seeded("", 10);
    let before = session.tables().letters.clone();
    session.generate("alpha");
    assert_eq!(session.tables().letters, before, "first document rebuilt the tables");
    session.generate("alpha");
    assert_ne!(session.tables().letters, before, "second document kept the tables");
}

#[test]
fn test_from_rule_text_error() {
    assert!(RewriteSession::from_rule_text("- not\n- a mapping\n").is_err());
}
