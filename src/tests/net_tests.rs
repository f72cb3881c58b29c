// src/tests/net_tests.rs

//! tests for `net.rs` functions

#![allow(non_snake_case)]

use crate::data::net::{
    parse_ipv4,
    parse_ipv6,
    parse_mac,
    AddressKind,
    NetworkAddress,
};
use crate::tests::common::{char_classes, tables_seeded, SEEDS};

use ::si_trace_print::stack::stack_offset_set;
use ::test_case::test_case;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// recognition
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test_case("10.1.2.3", "", "10.1.2.3", "", ""; "bare")]
#[test_case("(10.1.2.3),", "(", "10.1.2.3", "", "),"; "punctuated")]
#[test_case("src=192.168.0.1/24;", "src=", "192.168.0.1", "/24", ";"; "prefix length")]
#[test_case("255.255.255.0", "", "255.255.255.0", "", ""; "netmask")]
fn test_parse_ipv4(
    text: &str,
    prefix: &str,
    address: &str,
    subnet: &str,
    suffix: &str,
) {
    let ip = parse_ipv4(text).unwrap();
    assert_eq!(ip.kind(), AddressKind::Ipv4);
    assert_eq!(ip.prefix(), prefix);
    assert_eq!(ip.address(), address);
    assert_eq!(ip.subnet(), subnet);
    assert_eq!(ip.suffix(), suffix);
    assert_eq!(ip.octets().len(), 4);
    assert!(ip.new_octets().is_none());
    assert_eq!(ip.rewritten(), text);
}

#[test_case("256.1.1.1"; "octet too large")]
#[test_case("1.2.3"; "three octets")]
#[test_case("10.0.0.0/33"; "prefix length too large")]
#[test_case("10.0.0.0/0"; "prefix length zero")]
#[test_case("hello"; "word")]
fn test_parse_ipv4_none(text: &str) {
    assert!(parse_ipv4(text).is_none(), "{:?} parsed as IPv4", text);
}

#[test_case("::1", 1)]
#[test_case("::", 0)]
#[test_case("fe80::1ff:fe23:4567:890a", 0xfe80_0000_0000_0000_01ff_fe23_4567_890a)]
#[test_case("2001:db8:0:0:0:0:0:1", 0x2001_0db8_0000_0000_0000_0000_0000_0001)]
fn test_parse_ipv6(
    text: &str,
    value: u128,
) {
    let ip = parse_ipv6(text).unwrap();
    assert_eq!(ip.kind(), AddressKind::Ipv6);
    assert_eq!(ip.value(), value);
    assert_eq!(ip.octets().len(), 8);
    assert_eq!(ip.rewritten(), text);
}

#[test]
fn test_parse_ipv6_scope() {
    let ip = parse_ipv6("[fe80::1%2]:").unwrap();
    assert_eq!(ip.prefix(), "[");
    assert_eq!(ip.address(), "fe80::1");
    assert_eq!(ip.subnet(), "%2");
    assert_eq!(ip.suffix(), "]:");
}

#[test_case("1:2:3"; "too few groups")]
#[test_case("fe80::1/129"; "prefix length too large")]
#[test_case("12345::1"; "group too wide")]
fn test_parse_ipv6_none(text: &str) {
    assert!(parse_ipv6(text).is_none(), "{:?} parsed as IPv6", text);
}

#[test_case("00:1A:2B:3C:4D:5E", 6)]
#[test_case("00-1a-2b-3c-4d-5e", 6)]
#[test_case("001.a2b.3c4.d5e", 4)]
#[test_case("001a2b3c4d5e", 6)]
fn test_parse_mac(
    text: &str,
    groups: usize,
) {
    let mac = parse_mac(text).unwrap();
    assert_eq!(mac.kind(), AddressKind::Mac);
    assert_eq!(mac.value(), 0x001a_2b3c_4d5e);
    assert_eq!(mac.octets().len(), groups);
    assert_eq!(mac.rewritten(), text);
}

#[test_case("001122334455"; "all digits")]
#[test_case("001.122.334.455"; "all digits dotted")]
#[test_case("00:1A:2B:3C:4D"; "five groups")]
fn test_parse_mac_none(text: &str) {
    assert!(parse_mac(text).is_none(), "{:?} parsed as MAC", text);
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// regeneration
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn generate(
    mut address: NetworkAddress,
    seed: u64,
    sources: &[NetworkAddress],
) -> NetworkAddress {
    let (tables, _) = tables_seeded(seed);
    address.generate_new(&tables, sources);

    address
}

#[test_case("255.255.255.0")]
#[test_case("255.255.0.0")]
#[test_case("255.255.255.252")]
#[test_case("128.0.0.0")]
fn test_ipv4_netmask_preserved(text: &str) {
    let ip = parse_ipv4(text).unwrap();
    assert!(ip.is_netmask());
    for seed in SEEDS.iter() {
        let ip = generate(ip.clone(), *seed, &[]);
        assert_eq!(ip.rewritten(), text);
    }
}

#[test_case("10.1.2.3")]
#[test_case("255.255.255.1")]
#[test_case("255.0.255.0")]
fn test_ipv4_not_netmask(text: &str) {
    assert!(!parse_ipv4(text).unwrap().is_netmask());
}

#[test_case("10.1.2.3")]
#[test_case("172.16.254.99")]
#[test_case("(192.168.100.200),")]
#[test_case("10.0.0.1/8")]
fn test_ipv4_generate_new_shape(text: &str) {
    stack_offset_set(Some(2));
    let ip = parse_ipv4(text).unwrap();
    for seed in SEEDS.iter() {
        let new = generate(ip.clone(), *seed, &[]);
        let new_octets = new.new_octets().unwrap();
        assert_eq!(new_octets[0], ip.octets()[0], "first octet changed");
        for (old, new) in ip.octets().iter().zip(new_octets.iter()) {
            assert_eq!(old.width(), new.width(), "\nExpected width of {:?}\nReceived {:?}\n", old, new);
        }
        let rewritten = new.rewritten();
        assert_eq!(rewritten.len(), text.len());
        assert!(rewritten.starts_with(ip.prefix()));
        assert!(rewritten.ends_with(ip.suffix()));
        assert!(parse_ipv4(&rewritten).is_some(), "{:?} is not an IPv4 address", rewritten);
    }
}

#[test]
fn test_ipv4_generate_new_repeated_octet() {
    let ip = parse_ipv4("10.20.20.30").unwrap();
    for seed in SEEDS.iter() {
        let new = generate(ip.clone(), *seed, &[]);
        let octets = new.new_octets().unwrap();
        assert_eq!(octets[1].text, octets[2].text);
    }
}

#[test]
fn test_ipv4_generate_new_sync() {
    for seed in SEEDS.iter() {
        let first = generate(parse_ipv4("10.1.2.3").unwrap(), *seed, &[]);
        let sources = vec![first.clone()];
        let second = generate(parse_ipv4("10.1.2.4").unwrap(), *seed, &sources);
        let first_octets = first.new_octets().unwrap();
        let second_octets = second.new_octets().unwrap();
        assert_eq!(first_octets[..3], second_octets[..3]);
    }
}

#[test]
fn test_ipv4_generate_new_identical_reuse() {
    for seed in SEEDS.iter() {
        let first = generate(parse_ipv4("10.1.2.3").unwrap(), *seed, &[]);
        let sources = vec![first.clone()];
        // a different table seed to show the octets come from the source
        let again = generate(parse_ipv4("(10.1.2.3)").unwrap(), seed + 1, &sources);
        assert_eq!(again.new_address(), first.new_address());
        assert_eq!(again.rewritten(), format!("({})", first.new_address()));
    }
}

#[test]
fn test_ipv6_unspecified_preserved() {
    let ip = parse_ipv6("::").unwrap();
    assert!(ip.is_preserved());
    let ip = generate(ip, 0, &[]);
    assert_eq!(ip.rewritten(), "::");
}

#[test]
fn test_ipv6_generate_new_link_local() {
    let text = "fe80::1ff:fe23:4567:890a";
    let ip = parse_ipv6(text).unwrap();
    assert_eq!(ip.pivot(), 1);
    for seed in SEEDS.iter() {
        let rewritten = generate(ip.clone(), *seed, &[]).rewritten();
        assert!(rewritten.starts_with("fe80::"), "{:?}", rewritten);
        assert_eq!(rewritten.len(), text.len());
        assert_eq!(char_classes(&rewritten), char_classes(text));
    }
}

#[test]
fn test_ipv6_generate_new_loopback() {
    let ip = parse_ipv6("::1").unwrap();
    assert_eq!(ip.pivot(), 7);
    for seed in SEEDS.iter() {
        let rewritten = generate(ip.clone(), *seed, &[]).rewritten();
        assert!(rewritten.starts_with("::"));
        assert_eq!(rewritten.len(), 3);
        assert_ne!(rewritten, "::1");
    }
}

#[test_case("ff:ff:ff:ff:ff:ff")]
#[test_case("FF-FF-FF-FF-FF-FF")]
#[test_case("00:00:00:00:00:00")]
fn test_mac_preserved(text: &str) {
    let mac = parse_mac(text).unwrap();
    assert!(mac.is_preserved());
    assert_eq!(generate(mac, 3, &[]).rewritten(), text);
}

#[test]
fn test_mac_generate_new_keeps_oui() {
    let text = "00:1A:2B:3C:4D:5E";
    let mac = parse_mac(text).unwrap();
    assert_eq!(mac.pivot(), 3);
    for seed in SEEDS.iter() {
        let rewritten = generate(mac.clone(), *seed, &[]).rewritten();
        assert!(rewritten.starts_with("00:1A:2B:"), "{:?}", rewritten);
        assert_ne!(&rewritten[9..], &text[9..]);
        assert_eq!(char_classes(&rewritten), char_classes(text));
    }
}

#[test]
fn test_mac_generate_new_sync_matches_case() {
    for seed in SEEDS.iter() {
        let first = generate(parse_mac("00:1a:2b:3c:4d:5e").unwrap(), *seed, &[]);
        let sources = vec![first.clone()];
        let second = generate(parse_mac("00:1A:2B:3C:4D:5F").unwrap(), *seed, &sources);
        let first_octets = first.new_octets().unwrap();
        let second_octets = second.new_octets().unwrap();
        assert_eq!(second_octets[3].text, first_octets[3].text.to_uppercase());
        assert_eq!(second_octets[4].text, first_octets[4].text.to_uppercase());
        assert_eq!(second_octets[3].value, first_octets[3].value);
    }
}
