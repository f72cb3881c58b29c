// src/data/net.rs

//! The Network Subsystem: recognize and regenerate IPv4, IPv6 and MAC
//! addresses.
//!
//! An address is decomposed into positional [`Octet`]s. Regeneration keeps
//! a leading run of octets (the "pivot") so network prefixes and vendor
//! OUIs keep their shape, and re-randomizes the rest with the per-position
//! tables of [`MappingTables`].
//!
//! Addresses rewritten earlier in the same document are passed back in as
//! "sources" so that repeated addresses, shared subnets and shared OUIs
//! rewrite identically everywhere in the document.
//!
//! [`Octet`]: self::Octet
//! [`MappingTables`]: crate::data::mapping::MappingTables

use crate::common::match_case;
use crate::data::mapping::{map_chars, MappingTables};

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use ::lazy_static::lazy_static;
use ::regex::Regex;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The kind of network address an [`Octet`] belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum AddressKind {
    Ipv4,
    Ipv6,
    Mac,
}

impl fmt::Display for AddressKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        match self {
            AddressKind::Ipv4 => write!(f, "IPv4"),
            AddressKind::Ipv6 => write!(f, "IPv6"),
            AddressKind::Mac => write!(f, "MAC"),
        }
    }
}

/// One positional byte (IPv4, MAC) or 16-bit group (IPv6) of an address.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Octet {
    /// the octet as written, e.g. `"0a"`, `"8c1e"`, `"192"`
    pub text: String,
    pub value: u32,
    /// 0-based position within the (exploded) address
    pub position: usize,
    pub kind: AddressKind,
}

impl Octet {
    /// Rendered width.
    pub fn width(&self) -> usize {
        self.text.len()
    }

    /// Octets are comparable when they are of the same kind, at the same
    /// position, of the same width and value.
    pub fn is_comparable(
        &self,
        other: &Octet,
    ) -> bool {
        self.kind == other.kind
            && self.position == other.position
            && self.width() == other.width()
            && self.value == other.value
    }
}

/// A piece of the textual form of an address.
#[derive(Clone, Debug, Eq, PartialEq)]
enum AddressPiece {
    /// index into the octets
    Octet(usize),
    /// separator text, e.g. `"."`, `":"`, `"::"`, `"-"`
    Literal(String),
}

/// A recognized IPv4, IPv6 or MAC address along with its surrounding text.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NetworkAddress {
    kind: AddressKind,
    prefix: String,
    address: String,
    /// `/prefix-length` or `%scope`, kept verbatim
    subnet: String,
    suffix: String,
    value: u128,
    octets: Vec<Octet>,
    pieces: Vec<AddressPiece>,
    /// octets after [`NetworkAddress::generate_new`]
    new_octets: Option<Vec<Octet>>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// recognition
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// IPv4 address with optional prefix length, surrounded by non-digits.
pub const RP_IPV4: &str = r"(?i)^(?P<prefix>.*[^\d])?(?P<address>\d{1,3}(?:\.\d{1,3}){3})(?P<subnet>/\d{1,2})?(?P<suffix>[^\d].*)?$";

/// IPv6 address, full or compressed, with optional prefix length or scope,
/// surrounded by non-hex text.
pub const RP_IPV6: &str = concat!(
    r"(?i)^(?P<prefix>.*[^0-9a-f:])?",
    r"(?P<address>",
    r"(?:[0-9a-f]{1,4}(?::[0-9a-f]{1,4}){7})",
    r"|(?:(?:[0-9a-f]{1,4}:){0,6}[0-9a-f]{1,4}::(?:[0-9a-f]{1,4}:){0,6}[0-9a-f]{1,4})",
    r"|(?::(?::[0-9a-f]{1,4}){1,7})",
    r"|(?:(?:[0-9a-f]{1,4}:){1,7}:)",
    r"|(?:::)",
    r")",
    r"(?P<subnet>[/%]\d{1,3})?",
    r"(?P<suffix>[^0-9a-f:].*)?$",
);

/// MAC address in colon, dash, dotted-triplet or bare form, surrounded by
/// non-hex text.
pub const RP_MAC: &str = concat!(
    r"(?i)^(?P<prefix>.*[^0-9a-f])?",
    r"(?P<address>",
    r"(?:[0-9a-f]{2}(?::[0-9a-f]{2}){5})",
    r"|(?:[0-9a-f]{2}(?:-[0-9a-f]{2}){5})",
    r"|(?:[0-9a-f]{3}(?:\.[0-9a-f]{3}){3})",
    r"|(?:[0-9a-f]{12})",
    r")",
    r"(?P<suffix>[^0-9a-f].*)?$",
);

lazy_static! {
    static ref RE_IPV4: Regex = Regex::new(RP_IPV4).unwrap();
    static ref RE_IPV6: Regex = Regex::new(RP_IPV6).unwrap();
    static ref RE_MAC: Regex = Regex::new(RP_MAC).unwrap();
}

/// MAC broadcast address value.
pub const MAC_BROADCAST: u128 = 0xffff_ffff_ffff;

/// Recognize an IPv4 address within `text`.
pub fn parse_ipv4(text: &str) -> Option<NetworkAddress> {
    let caps = RE_IPV4.captures(text)?;
    let address = caps.name("address")?.as_str();
    let subnet = caps.name("subnet").map_or("", |m| m.as_str());
    let addr = Ipv4Addr::from_str(address).ok()?;
    if !subnet.is_empty() {
        let bits: u32 = subnet[1..].parse().ok()?;
        if !(1..=32).contains(&bits) {
            return None;
        }
    }
    let mut octets: Vec<Octet> = Vec::with_capacity(4);
    let mut pieces: Vec<AddressPiece> = Vec::with_capacity(7);
    for (position, part) in address.split('.').enumerate() {
        if position > 0 {
            pieces.push(AddressPiece::Literal(String::from(".")));
        }
        pieces.push(AddressPiece::Octet(position));
        octets.push(Octet {
            text: String::from(part),
            value: part.parse().ok()?,
            position,
            kind: AddressKind::Ipv4,
        });
    }

    Some(NetworkAddress {
        kind: AddressKind::Ipv4,
        prefix: String::from(caps.name("prefix").map_or("", |m| m.as_str())),
        address: String::from(address),
        subnet: String::from(subnet),
        suffix: String::from(caps.name("suffix").map_or("", |m| m.as_str())),
        value: u32::from(addr) as u128,
        octets,
        pieces,
        new_octets: None,
    })
}

/// Recognize an IPv6 address within `text`.
pub fn parse_ipv6(text: &str) -> Option<NetworkAddress> {
    let caps = RE_IPV6.captures(text)?;
    let address = caps.name("address")?.as_str();
    let subnet = caps.name("subnet").map_or("", |m| m.as_str());
    let addr = Ipv6Addr::from_str(address).ok()?;
    if !subnet.is_empty() {
        let bits: u32 = subnet[1..].parse().ok()?;
        if !(1..=128).contains(&bits) {
            return None;
        }
    }
    let (head, tail): (Vec<&str>, Vec<&str>) = match address.split_once("::") {
        Some((h, t)) => (
            h.split(':').filter(|g| !g.is_empty()).collect(),
            t.split(':').filter(|g| !g.is_empty()).collect(),
        ),
        None => (address.split(':').collect(), Vec::new()),
    };
    let compressed = address.contains("::");
    let hidden = 8_usize.checked_sub(head.len() + tail.len())?;

    let mut octets: Vec<Octet> = Vec::with_capacity(8);
    let mut pieces: Vec<AddressPiece> = Vec::with_capacity(16);
    let push_group = |text: &str, octets: &mut Vec<Octet>| -> Option<()> {
        let position = octets.len();
        octets.push(Octet {
            text: String::from(text),
            value: u32::from_str_radix(text, 16).ok()?,
            position,
            kind: AddressKind::Ipv6,
        });
        Some(())
    };
    for (at, group) in head.iter().enumerate() {
        if at > 0 {
            pieces.push(AddressPiece::Literal(String::from(":")));
        }
        pieces.push(AddressPiece::Octet(octets.len()));
        push_group(group, &mut octets)?;
    }
    if compressed {
        pieces.push(AddressPiece::Literal(String::from("::")));
        for _ in 0..hidden {
            // hidden groups are never rendered
            push_group("0", &mut octets)?;
        }
    }
    for (at, group) in tail.iter().enumerate() {
        if at > 0 {
            pieces.push(AddressPiece::Literal(String::from(":")));
        }
        pieces.push(AddressPiece::Octet(octets.len()));
        push_group(group, &mut octets)?;
    }
    if octets.len() != 8 {
        return None;
    }

    Some(NetworkAddress {
        kind: AddressKind::Ipv6,
        prefix: String::from(caps.name("prefix").map_or("", |m| m.as_str())),
        address: String::from(address),
        subnet: String::from(subnet),
        suffix: String::from(caps.name("suffix").map_or("", |m| m.as_str())),
        value: u128::from(addr),
        octets,
        pieces,
        new_octets: None,
    })
}

/// Recognize a MAC address within `text`.
///
/// Candidates made only of decimal digits (and dots) are not MAC
/// addresses.
pub fn parse_mac(text: &str) -> Option<NetworkAddress> {
    let caps = RE_MAC.captures(text)?;
    let address = caps.name("address")?.as_str();
    if address.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    let separator: Option<char> = address.chars().find(|c| matches!(c, ':' | '-' | '.'));
    let groups: Vec<&str> = match separator {
        Some(sep) => address.split(sep).collect(),
        None => (0..address.len())
            .step_by(2)
            .map(|at| &address[at..at + 2])
            .collect(),
    };
    let mut octets: Vec<Octet> = Vec::with_capacity(groups.len());
    let mut pieces: Vec<AddressPiece> = Vec::with_capacity(groups.len() * 2);
    for (position, group) in groups.iter().enumerate() {
        if position > 0 {
            if let Some(sep) = separator {
                pieces.push(AddressPiece::Literal(sep.to_string()));
            }
        }
        pieces.push(AddressPiece::Octet(position));
        octets.push(Octet {
            text: String::from(*group),
            value: u32::from_str_radix(group, 16).ok()?,
            position,
            kind: AddressKind::Mac,
        });
    }
    let compact: String = groups.concat();
    let value = u128::from_str_radix(&compact, 16).ok()?;

    Some(NetworkAddress {
        kind: AddressKind::Mac,
        prefix: String::from(caps.name("prefix").map_or("", |m| m.as_str())),
        address: String::from(address),
        subnet: String::new(),
        suffix: String::from(caps.name("suffix").map_or("", |m| m.as_str())),
        value,
        octets,
        pieces,
        new_octets: None,
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// regeneration
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

impl NetworkAddress {
    pub const fn kind(&self) -> AddressKind {
        self.kind
    }

    pub fn prefix(&self) -> &str {
        self.prefix.as_str()
    }

    /// The address alone, without prefix, subnet or suffix.
    pub fn address(&self) -> &str {
        self.address.as_str()
    }

    pub fn subnet(&self) -> &str {
        self.subnet.as_str()
    }

    pub fn suffix(&self) -> &str {
        self.suffix.as_str()
    }

    pub const fn value(&self) -> u128 {
        self.value
    }

    pub fn octets(&self) -> &[Octet] {
        self.octets.as_slice()
    }

    /// Octets after [`generate_new`], `None` before.
    ///
    /// [`generate_new`]: self::NetworkAddress::generate_new
    pub fn new_octets(&self) -> Option<&[Octet]> {
        self.new_octets.as_deref()
    }

    /// Is this IPv4 address a contiguous netmask, e.g. `255.255.255.0`?
    pub fn is_netmask(&self) -> bool {
        if self.kind != AddressKind::Ipv4 {
            return false;
        }
        let inverse: u64 = (1_u64 << 32) - self.value as u64;

        inverse.is_power_of_two() && inverse <= (1_u64 << 31)
    }

    /// Addresses that are never rewritten.
    pub fn is_preserved(&self) -> bool {
        match self.kind {
            AddressKind::Ipv4 => self.is_netmask(),
            AddressKind::Ipv6 => self.value == 0,
            AddressKind::Mac => self.value == 0 || self.value == MAC_BROADCAST,
        }
    }

    /// Positions before the pivot are kept verbatim.
    pub fn pivot(&self) -> usize {
        match self.kind {
            AddressKind::Ipv4 => 1,
            AddressKind::Mac => self.octets.len() / 2,
            AddressKind::Ipv6 => {
                let nonzero: Vec<usize> = self
                    .octets
                    .iter()
                    .filter(|o| o.value != 0)
                    .map(|o| o.position)
                    .collect();
                match nonzero.as_slice() {
                    [] => self.octets.len(),
                    [only] => *only,
                    [first, ..] => first + 1,
                }
            }
        }
    }

    /// Re-randomize `octet` with the per-position table.
    fn remap_octet(
        &self,
        octet: &Octet,
        tables: &MappingTables,
    ) -> Octet {
        let (text, value) = match self.kind {
            AddressKind::Ipv4 => {
                let value = match tables.ipv4.get(octet.position) {
                    Some(map) => *map.get(&(octet.value as u8)).unwrap_or(&(octet.value as u8)),
                    None => octet.value as u8,
                };
                (value.to_string(), value as u32)
            }
            AddressKind::Ipv6 | AddressKind::Mac => {
                let map = match self.kind {
                    AddressKind::Ipv6 => tables.ipv6.get(octet.position),
                    _ => tables.mac.get(octet.position % tables.mac.len()),
                };
                let text = match map {
                    Some(map) => map_chars(&octet.text, map),
                    None => octet.text.clone(),
                };
                let value = u32::from_str_radix(&text, 16).unwrap_or(octet.value);
                (text, value)
            }
        };

        Octet {
            text,
            value,
            position: octet.position,
            kind: octet.kind,
        }
    }

    /// Copy a rewritten octet from the earliest source whose original octet
    /// is comparable to `octet`.
    fn sync_octet(
        &self,
        octet: &Octet,
        sources: &[NetworkAddress],
    ) -> Option<Octet> {
        for source in sources.iter().filter(|s| s.kind == self.kind) {
            let (Some(original), Some(rewritten)) = (
                source.octets.get(octet.position),
                source
                    .new_octets
                    .as_ref()
                    .and_then(|n| n.get(octet.position)),
            ) else {
                continue;
            };
            if original.is_comparable(octet) {
                return Some(Octet {
                    text: match_case(&octet.text, &rewritten.text),
                    value: rewritten.value,
                    position: octet.position,
                    kind: octet.kind,
                });
            }
        }

        None
    }

    fn regenerate_octets(
        &self,
        tables: &MappingTables,
        sources: &[NetworkAddress],
    ) -> Vec<Octet> {
        if self.is_preserved() {
            defo!("preserved {} {:?}", self.kind, self.address);
            return self.octets.clone();
        }
        for source in sources.iter() {
            if source.kind == self.kind && source.address == self.address {
                if let Some(new_octets) = source.new_octets.as_ref() {
                    defo!("reuse {} {:?}", self.kind, self.address);
                    return new_octets.clone();
                }
            }
        }
        let mut new_octets: Vec<Octet> = self.octets.clone();
        for position in self.pivot()..self.octets.len() {
            let octet = &self.octets[position];
            if self.kind == AddressKind::Ipv4 {
                if let Some(earlier) = (0..position).find(|p| self.octets[*p].value == octet.value) {
                    new_octets[position] = Octet {
                        position,
                        ..new_octets[earlier].clone()
                    };
                    continue;
                }
            }
            if let Some(synced) = self.sync_octet(octet, sources) {
                new_octets[position] = synced;
                continue;
            }
            new_octets[position] = self.remap_octet(octet, tables);
        }

        new_octets
    }

    /// Regenerate this address using `tables`, consistent with the already
    /// rewritten `sources` of the same document. Returns the full rewritten
    /// text (prefix, address, subnet and suffix).
    pub fn generate_new(
        &mut self,
        tables: &MappingTables,
        sources: &[NetworkAddress],
    ) -> String {
        defn!("{} {:?}, {} sources", self.kind, self.address, sources.len());
        let new_octets = self.regenerate_octets(tables, sources);
        self.new_octets = Some(new_octets);
        let rewritten = self.rewritten();
        defx!("{:?}", rewritten);

        rewritten
    }

    /// Render the address part from `octets`.
    fn render_address(
        &self,
        octets: &[Octet],
    ) -> String {
        let mut out = String::with_capacity(self.address.len());
        for piece in self.pieces.iter() {
            match piece {
                AddressPiece::Octet(at) => match octets.get(*at) {
                    Some(octet) => out.push_str(&octet.text),
                    None => out.push_str(&self.octets[*at].text),
                },
                AddressPiece::Literal(literal) => out.push_str(literal),
            }
        }

        out
    }

    /// The rewritten address part; the original before [`generate_new`].
    ///
    /// [`generate_new`]: self::NetworkAddress::generate_new
    pub fn new_address(&self) -> String {
        match self.new_octets.as_ref() {
            Some(octets) => self.render_address(octets),
            None => self.address.clone(),
        }
    }

    /// The full rewritten text; the original before [`generate_new`].
    ///
    /// [`generate_new`]: self::NetworkAddress::generate_new
    pub fn rewritten(&self) -> String {
        format!("{}{}{}{}", self.prefix, self.new_address(), self.subnet, self.suffix)
    }
}
