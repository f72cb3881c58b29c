// src/data/mapping.rs

//! The Character Mapping Engine.
//!
//! A [`CharMap`] is a randomized substitution over a finite alphabet. It is
//! built from "groups" of characters; each group is shuffled within itself
//! so substituted characters keep their class (vowel, consonant, digit,
//! hex digit, …). The shuffle is a near-derangement: only "zero-like"
//! symbols and single-symbol groups may map to themselves.
//!
//! All tables used by one rewrite session are held by [`MappingTables`].
//!
//! [`CharMap`]: self::CharMap
//! [`MappingTables`]: self::MappingTables

use crate::common::{split_keep, CGP_PUNCT};

use std::collections::HashMap;

use ::const_format::concatcp;
use ::lazy_static::lazy_static;
use ::rand::seq::SliceRandom;
use ::rand::Rng;
use ::regex::Regex;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A substitution table from one `char` to another.
/// Characters not in the table are passed through by [`map_chars`].
///
/// [`map_chars`]: self::map_chars
pub type CharMap = HashMap<char, char>;

/// A substitution table for IPv4 octet values.
pub type OctetMap = HashMap<u8, u8>;

/// Number of shuffles tried by [`shuffle_until_unique`] before the best
/// shuffle is repaired.
///
/// [`shuffle_until_unique`]: self::shuffle_until_unique
pub const SHUFFLE_ATTEMPTS: usize = 10;

pub const GROUPS_LETTERS_LOWER: [&str; 5] = ["ae", "bcdf", "iou", "y", "ghjklmnpqrstvwxz"];
pub const GROUPS_LETTERS_UPPER: [&str; 5] = ["AE", "BCDF", "IOU", "Y", "GHJKLMNPQRSTVWXZ"];
pub const GROUPS_DIGITS: [&str; 2] = ["0", "123456789"];
pub const GROUPS_HEX: [&str; 4] = ["abcdef", "ABCDEF", "0", "123456789"];
pub const GROUPS_OCTAL: [&str; 2] = ["0", "1234567"];
pub const GROUPS_FILE_PERMISSION: [&str; 1] = ["01234567"];
pub const GROUPS_WIN_FILE_MODE: [&str; 5] = ["-", "d", "D", "ahilrs", "AHILRS"];

/// IPv4 octet value bands; values are only ever substituted within their
/// band so the rendered width is kept.
pub const IPV4_OCTET_BANDS: [(u8, u8); 4] = [(0, 0), (1, 9), (10, 99), (100, 255)];

/// Number of positions in a MAC address.
pub const MAC_POSITIONS: usize = 6;
/// Number of positions in an exploded IPv6 address.
pub const IPV6_POSITIONS: usize = 8;
/// Number of positions in an IPv4 address.
pub const IPV4_POSITIONS: usize = 4;

lazy_static! {
    static ref RE_HEX_LITERAL: Regex = Regex::new(r"(?i)^(0x)([0-9a-f]+)$").unwrap();
    static ref RE_BIN_LITERAL: Regex = Regex::new(r"(?i)^(0b)([01]+)$").unwrap();
    static ref RE_OCT_LITERAL: Regex = Regex::new(r"(?i)^(0o?)([0-7]+)$").unwrap();
    /// `%XX` escape sequences kept verbatim inside URL components
    pub static ref RE_PERCENT_ESCAPE: Regex = Regex::new(r"(?i)%[0-9a-f]{2}").unwrap();
    /// runs of punctuation
    pub static ref RE_PUNCT_RUN: Regex = Regex::new(concatcp!(CGP_PUNCT, "+")).unwrap();
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// table builders
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Symbols allowed to map to themselves.
#[inline(always)]
pub const fn is_zero_like(c: char) -> bool {
    c == '0'
}

/// Count of positions where `shuffled` kept the symbol of `origin`,
/// ignoring zero-like symbols.
pub fn count_fixed_points(
    origin: &[char],
    shuffled: &[char],
) -> usize {
    origin
        .iter()
        .zip(shuffled.iter())
        .filter(|(o, s)| o == s && !is_zero_like(**o))
        .count()
}

/// Shuffle `origin` looking for an arrangement where no symbol (other than
/// a zero-like symbol) keeps its position.
///
/// Up to [`SHUFFLE_ATTEMPTS`] shuffles are tried. If none is a derangement
/// then the shuffle with the fewest fixed points is repaired: each
/// remaining fixed point is swapped with its right-hand neighbour
/// (wrapping). Swapping a fixed point never creates another, so an
/// `origin` of two or more distinct symbols always comes back deranged.
///
/// `origin` symbols must be distinct.
pub fn shuffle_until_unique<R: Rng + ?Sized>(
    origin: &[char],
    rng: &mut R,
) -> Vec<char> {
    let len = origin.len();
    if len < 2 {
        return origin.to_vec();
    }
    let mut shuffled: Vec<char> = origin.to_vec();
    let mut best: Vec<char> = origin.to_vec();
    let mut best_fixed: usize = usize::MAX;
    for _ in 0..SHUFFLE_ATTEMPTS {
        shuffled.shuffle(rng);
        let fixed = count_fixed_points(origin, &shuffled);
        if fixed == 0 {
            return shuffled;
        }
        if fixed < best_fixed {
            best_fixed = fixed;
            best.clone_from(&shuffled);
        }
    }
    defo!("repair {} fixed points of {:?}", best_fixed, origin);
    for at in 0..len {
        if best[at] == origin[at] && !is_zero_like(origin[at]) {
            best.swap(at, (at + 1) % len);
        }
    }

    best
}

/// Build a [`CharMap`] where each group of `groups` is shuffled within
/// itself.
pub fn build_char_map<R: Rng + ?Sized>(
    groups: &[&str],
    rng: &mut R,
) -> CharMap {
    let mut map = CharMap::new();
    for group in groups.iter() {
        let origin: Vec<char> = group.chars().collect();
        let shuffled = shuffle_until_unique(&origin, rng);
        map.extend(origin.into_iter().zip(shuffled));
    }

    map
}

/// Build an [`OctetMap`] for one IPv4 position, shuffling each band of
/// [`IPV4_OCTET_BANDS`] within itself.
pub fn build_ipv4_octet_map<R: Rng + ?Sized>(rng: &mut R) -> OctetMap {
    let mut map = OctetMap::new();
    for (lo, hi) in IPV4_OCTET_BANDS.iter() {
        let origin: Vec<u8> = (*lo..=*hi).collect();
        let mut shuffled = origin.clone();
        shuffled.shuffle(rng);
        // an octet keeping its value is a tolerable weakness
        map.extend(origin.into_iter().zip(shuffled));
    }

    map
}

/// Uniformly random string of `0`/`1` of `width`.
pub fn generate_random_binary<R: Rng + ?Sized>(
    width: usize,
    rng: &mut R,
) -> String {
    (0..width)
        .map(|_| if rng.random_bool(0.5) { '1' } else { '0' })
        .collect()
}

/// Map each char of `text` through `map`, passing unmapped chars through.
pub fn map_chars(
    text: &str,
    map: &CharMap,
) -> String {
    text.chars()
        .map(|c| *map.get(&c).unwrap_or(&c))
        .collect()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// MappingTables
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Tables for each component of a URL.
#[derive(Clone, Debug)]
pub struct UrlTables {
    pub user: CharMap,
    pub host: CharMap,
    pub path: CharMap,
    pub query: CharMap,
    pub fragment: CharMap,
}

/// Every substitution table used while rewriting one document.
///
/// Owned by a [`RewriteSession`]; rebuilt by [`RewriteSession::rebuild`].
///
/// [`RewriteSession`]: crate::session::RewriteSession
/// [`RewriteSession::rebuild`]: crate::session::RewriteSession::rebuild
#[derive(Clone, Debug)]
pub struct MappingTables {
    pub letters: CharMap,
    pub base_number: CharMap,
    pub fraction_number: CharMap,
    pub alphanumeric: CharMap,
    pub hex: CharMap,
    pub octal: CharMap,
    pub file_permission: CharMap,
    pub win_file_mode: CharMap,
    pub url: UrlTables,
    pub mac: [CharMap; MAC_POSITIONS],
    pub ipv6: [CharMap; IPV6_POSITIONS],
    pub ipv4: [OctetMap; IPV4_POSITIONS],
    /// replaces a leading `0` of a rewritten number
    pub first_digit: char,
}

impl MappingTables {
    pub fn build<R: Rng + ?Sized>(rng: &mut R) -> MappingTables {
        defn!();
        let letter_groups: Vec<&str> = GROUPS_LETTERS_LOWER
            .iter()
            .chain(GROUPS_LETTERS_UPPER.iter())
            .copied()
            .collect();
        let alnum_groups: Vec<&str> = letter_groups
            .iter()
            .chain(GROUPS_DIGITS.iter())
            .copied()
            .collect();

        let letters = build_char_map(&letter_groups, rng);
        let base_number = build_char_map(&GROUPS_DIGITS, rng);
        let fraction_number = build_char_map(&GROUPS_DIGITS, rng);
        let alphanumeric = build_char_map(&alnum_groups, rng);
        let hex = build_char_map(&GROUPS_HEX, rng);
        let octal = build_char_map(&GROUPS_OCTAL, rng);
        let file_permission = build_char_map(&GROUPS_FILE_PERMISSION, rng);
        let win_file_mode = build_char_map(&GROUPS_WIN_FILE_MODE, rng);
        let url = UrlTables {
            user: build_char_map(&alnum_groups, rng),
            host: build_char_map(&alnum_groups, rng),
            path: build_char_map(&alnum_groups, rng),
            query: build_char_map(&alnum_groups, rng),
            fragment: build_char_map(&alnum_groups, rng),
        };
        let mac: [CharMap; MAC_POSITIONS] = std::array::from_fn(|_| build_char_map(&GROUPS_HEX, rng));
        let ipv6: [CharMap; IPV6_POSITIONS] = std::array::from_fn(|_| build_char_map(&GROUPS_HEX, rng));
        let ipv4: [OctetMap; IPV4_POSITIONS] = std::array::from_fn(|_| build_ipv4_octet_map(rng));
        let first_digit = char::from(b'1' + rng.random_range(0..9u8));
        defx!("first_digit {:?}", first_digit);

        MappingTables {
            letters,
            base_number,
            fraction_number,
            alphanumeric,
            hex,
            octal,
            file_permission,
            win_file_mode,
            url,
            mac,
            ipv6,
            ipv4,
            first_digit,
        }
    }

    /// Map `text` through `map`, treating numeric literals specially:
    ///
    /// - `0x…` keeps `0x` and maps the payload with the `hex` table
    /// - `0b…` keeps `0b` and the payload becomes random bits
    /// - `0o…` and `0[0-7]+` keep the prefix and map the payload with the
    ///   `octal` table
    pub fn apply_mapping<R: Rng + ?Sized>(
        &self,
        text: &str,
        map: &CharMap,
        rng: &mut R,
    ) -> String {
        if let Some(caps) = RE_HEX_LITERAL.captures(text) {
            return format!("{}{}", &caps[1], map_chars(&caps[2], &self.hex));
        }
        if let Some(caps) = RE_BIN_LITERAL.captures(text) {
            return format!("{}{}", &caps[1], generate_random_binary(caps[2].len(), rng));
        }
        if let Some(caps) = RE_OCT_LITERAL.captures(text) {
            return format!("{}{}", &caps[1], map_chars(&caps[2], &self.octal));
        }

        map_chars(text, map)
    }

    /// Map `text` through `map`, keeping `%XX` escapes verbatim.
    pub fn map_keep_escapes(
        &self,
        text: &str,
        map: &CharMap,
    ) -> String {
        let mut out = String::with_capacity(text.len());
        for (at, piece) in split_keep(text, &RE_PERCENT_ESCAPE)
            .into_iter()
            .enumerate()
        {
            if at % 2 == 1 {
                out.push_str(piece);
            } else {
                out.push_str(&map_chars(piece, map));
            }
        }

        out
    }
}
