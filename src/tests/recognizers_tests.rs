// src/tests/recognizers_tests.rs

//! tests for `recognizers.rs` functions

#![allow(non_snake_case)]

use crate::data::recognizers::{
    generate_number,
    generate_word,
    is_common_subdomain,
    parse_file_permission,
    parse_number,
    parse_url,
    parse_word,
    FilePermissionNode,
    NumberNode,
    UrlNode,
    WordNode,
};
use crate::tests::common::{char_classes, tables_seeded, SEEDS};

use ::si_trace_print::stack::stack_offset_set;
use ::test_case::test_case;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// file permissions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn test_parse_file_permission_unix() {
    let node = parse_file_permission("drwxr-xr-x@").unwrap();
    assert_eq!(
        node,
        FilePermissionNode::Unix {
            type_char: 'd',
            owner: String::from("rwx"),
            group: String::from("r-x"),
            other: String::from("r-x"),
            extended: String::from("@"),
        }
    );
}

#[test]
fn test_parse_file_permission_windows() {
    let node = parse_file_permission("-a----").unwrap();
    assert_eq!(
        node,
        FilePermissionNode::Windows {
            type_char: '-',
            attributes: String::from("a----"),
        }
    );
}

#[test_case("-rw-r--r--")]
#[test_case("lrwxrwxrwx")]
#[test_case("drwxrwxrwt")]
#[test_case("-rwsr-xr-x+")]
#[test_case("d-----")]
#[test_case("-ar---")]
fn test_parse_file_permission_some(text: &str) {
    assert!(parse_file_permission(text).is_some(), "{:?}", text);
}

#[test_case("rwxr-xr-x"; "missing type")]
#[test_case("-rwxr-xr-"; "too short")]
#[test_case("-rwzr-xr-x"; "bad letter")]
#[test_case("hello"; "word")]
fn test_parse_file_permission_none(text: &str) {
    assert!(parse_file_permission(text).is_none(), "{:?}", text);
}

#[test_case("-rw-r--r--")]
#[test_case("drwxr-x---")]
#[test_case("-rwxrwxrwx")]
fn test_FilePermissionNode_generate_new_unix(text: &str) {
    for seed in SEEDS.iter() {
        let (tables, _) = tables_seeded(*seed);
        let new = parse_file_permission(text).unwrap().generate_new(&tables);
        assert_eq!(new.len(), text.len());
        assert_eq!(new.chars().next(), text.chars().next(), "type changed");
        assert!(parse_file_permission(&new).is_some(), "{:?} → {:?}", text, new);
        for (at, c) in new.chars().enumerate().skip(1) {
            let letter = "rwx".chars().nth((at - 1) % 3).unwrap();
            assert!(c == letter || c == '-', "{:?} → {:?}", text, new);
        }
    }
}

#[test]
fn test_FilePermissionNode_generate_new_no_bits() {
    let (tables, _) = tables_seeded(1);
    let node = parse_file_permission("d---------").unwrap();
    assert_eq!(node.generate_new(&tables), "d---------");
}

#[test]
fn test_FilePermissionNode_generate_new_windows() {
    for seed in SEEDS.iter() {
        let (tables, _) = tables_seeded(*seed);
        let new = parse_file_permission("d-----").unwrap().generate_new(&tables);
        assert_eq!(new, "d-----");
        let new = parse_file_permission("-ar---").unwrap().generate_new(&tables);
        assert!(new.starts_with('-'), "{:?}", new);
        assert!("hilrs".contains(&new[1..2]), "{:?}", new);
        assert!("ahils".contains(&new[2..3]), "{:?}", new);
        assert_eq!(&new[3..], "---");
        assert!(parse_file_permission(&new).is_some(), "{:?}", new);
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// URLs
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn test_parse_url_parts() {
    let node = parse_url("(https://user@www.example.com:8443/a/b.html?q=1#top),").unwrap();
    assert_eq!(
        node,
        UrlNode {
            prefix: String::from("("),
            scheme: String::from("https://"),
            user: String::from("user@"),
            host: String::from("www.example.com"),
            port: String::from("8443"),
            path: String::from("/a/b.html"),
            query: String::from("?q=1"),
            fragment: String::from("#top"),
            suffix: String::from("),"),
        }
    );
}

#[test_case("example.com")]
#[test_case("http://docs.example.org/index")]
#[test_case("API.Example.IO")]
fn test_parse_url_some(text: &str) {
    assert!(parse_url(text).is_some(), "{:?}", text);
}

#[test_case("config.yaml"; "extension is not a tld")]
#[test_case("hello"; "single label")]
#[test_case("http://"; "scheme only")]
fn test_parse_url_none(text: &str) {
    assert!(parse_url(text).is_none(), "{:?}", text);
}

#[test_case("www", true)]
#[test_case("api2", true)]
#[test_case("mail01", true)]
#[test_case("example", false)]
#[test_case("xwww", false)]
fn test_is_common_subdomain(
    label: &str,
    expect: bool,
) {
    assert_eq!(is_common_subdomain(label), expect);
}

#[test]
fn test_UrlNode_generate_new() {
    stack_offset_set(Some(2));
    let text = "https://www.example.com:8443/path/to?key=value#frag";
    let node = parse_url(text).unwrap();
    for seed in SEEDS.iter() {
        let (tables, mut rng) = tables_seeded(*seed);
        let new = node.generate_new(&tables, &mut rng);
        assert!(new.starts_with("https://www."), "{:?}", new);
        assert!(new.contains(".com:8443/"), "{:?}", new);
        assert_ne!(new, text);
        assert_eq!(char_classes(&new), char_classes(text));
    }
}

#[test]
fn test_UrlNode_generate_new_two_labels() {
    let node = parse_url("example.org").unwrap();
    let (tables, mut rng) = tables_seeded(4);
    let new = node.generate_new(&tables, &mut rng);
    assert!(new.ends_with(".org"));
    assert_eq!(new.len(), "example.org".len());
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// numbers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test_case("42", "", "42", "")]
#[test_case("(42ms),", "(", "42", "ms),")]
#[test_case("3.14", "", "3.14", "")]
#[test_case("$.5", "$", ".5", "")]
#[test_case("10.", "", "10.", "")]
#[test_case("-7", "-", "7", "")]
fn test_parse_number(
    text: &str,
    prefix: &str,
    digits: &str,
    suffix: &str,
) {
    assert_eq!(
        parse_number(text),
        Some(NumberNode {
            prefix: String::from(prefix),
            digits: String::from(digits),
            suffix: String::from(suffix),
        })
    );
}

#[test_case("abc")]
#[test_case("12ab34")]
#[test_case("1.2.3")]
fn test_parse_number_none(text: &str) {
    assert!(parse_number(text).is_none(), "{:?}", text);
}

#[test_case("12345")]
#[test_case("3.14159")]
#[test_case("0.5")]
#[test_case("007")]
#[test_case("0089")]
fn test_generate_number_shape(digits: &str) {
    for seed in SEEDS.iter() {
        let (tables, mut rng) = tables_seeded(*seed);
        let new = generate_number(digits, &tables, &mut rng);
        assert_eq!(char_classes(&new), char_classes(digits), "{:?} → {:?}", digits, new);
    }
}

#[test_case("0")]
#[test_case("0.0")]
#[test_case("0.000")]
fn test_generate_number_zero(digits: &str) {
    let (tables, mut rng) = tables_seeded(2);
    assert_eq!(generate_number(digits, &tables, &mut rng), digits);
}

#[test]
fn test_generate_number_leading_zero() {
    for seed in SEEDS.iter() {
        let (tables, mut rng) = tables_seeded(*seed);
        let new = generate_number("0089", &tables, &mut rng);
        assert!(new.starts_with(tables.first_digit), "{:?}", new);
        assert_ne!(&new[..1], "0");
    }
}

#[test]
fn test_generate_number_binary() {
    let (tables, mut rng) = tables_seeded(3);
    let new = generate_number("0101", &tables, &mut rng);
    assert_eq!(new.len(), 4);
    assert!(new.chars().all(|c| c == '0' || c == '1'), "{:?}", new);
}

#[test]
fn test_NumberNode_generate_new_keeps_affixes() {
    let node = parse_number("(42ms),").unwrap();
    let (tables, mut rng) = tables_seeded(9);
    let new = node.generate_new(&tables, &mut rng);
    assert!(new.starts_with('('));
    assert!(new.ends_with("ms),"));
    assert_ne!(&new[1..3], "42");
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// words
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test_case("hello", "", "hello", "", "")]
#[test_case("\"(hello-world)\",", "\"(", "hello-world", ")\",", "")]
#[test_case("user_name", "", "user_name", "", "")]
#[test_case("(hello)€world", "(", "hello", ")", "€world"; "remainder")]
fn test_parse_word(
    text: &str,
    prefix: &str,
    core: &str,
    suffix: &str,
    remainder: &str,
) {
    assert_eq!(
        parse_word(text),
        Some(WordNode {
            prefix: String::from(prefix),
            core: String::from(core),
            suffix: String::from(suffix),
            remainder: String::from(remainder),
        })
    );
}

#[test_case("---")]
#[test_case("")]
fn test_parse_word_none(text: &str) {
    assert!(parse_word(text).is_none(), "{:?}", text);
}

#[test_case("config.yaml", ".yaml")]
#[test_case("server.LOG", ".LOG")]
#[test_case("archive.tar.gz", ".gz")]
fn test_generate_word_keeps_extension(
    text: &str,
    extension: &str,
) {
    for seed in SEEDS.iter() {
        let (tables, mut rng) = tables_seeded(*seed);
        let new = generate_word(text, &tables, &mut rng);
        assert!(new.ends_with(extension), "{:?} → {:?}", text, new);
        assert_eq!(new.len(), text.len());
    }
}

#[test_case("Hello-World")]
#[test_case("user_name42")]
#[test_case("CamelCase")]
fn test_generate_word_shape(text: &str) {
    for seed in SEEDS.iter() {
        let (tables, mut rng) = tables_seeded(*seed);
        let new = generate_word(text, &tables, &mut rng);
        assert_eq!(char_classes(&new), char_classes(text), "{:?} → {:?}", text, new);
        assert_ne!(new, text);
    }
}

#[test]
fn test_WordNode_generate_new_keeps_punctuation() {
    let node = parse_word("\"(hello-world)\",").unwrap();
    let (tables, mut rng) = tables_seeded(10);
    let new = node.generate_new(&tables, &mut rng);
    assert!(new.starts_with("\"("));
    assert!(new.ends_with(")\","));
    assert_eq!(&new[7..8], "-");
}

#[test]
fn test_WordNode_generate_new_keeps_remainder() {
    let node = parse_word("(hello)€world").unwrap();
    for seed in SEEDS.iter() {
        let (tables, mut rng) = tables_seeded(*seed);
        let new = node.generate_new(&tables, &mut rng);
        assert!(new.ends_with(")€world"), "{:?}", new);
        assert!(new.starts_with('('), "{:?}", new);
        assert_ne!(&new[1..6], "hello");
    }
}
