// src/data/token.rs

//! Implement [`Token`], the recognizer dispatch [`recognize`], and the
//! tokenizers [`tokenize`] and [`tokenize_with_datetime`].
//!
//! A line's content is split losslessly into whitespace runs and
//! non-whitespace runs. Each non-whitespace run is offered to the
//! recognizers in [`RECOGNIZER_PRIORITY`] order, the first match wins,
//! and an unrecognized run becomes a `Fallback` token.
//!
//! [`Token`]: crate::data::token::Token
//! [`recognize`]: crate::data::token::recognize
//! [`tokenize`]: crate::data::token::tokenize
//! [`tokenize_with_datetime`]: crate::data::token::tokenize_with_datetime
//! [`RECOGNIZER_PRIORITY`]: crate::data::token::RECOGNIZER_PRIORITY

use crate::common::split_keep;
use crate::data::datetime::{parse_datetime, DateTimeNode};
use crate::data::mapping::MappingTables;
use crate::data::net::{parse_ipv4, parse_ipv6, parse_mac, NetworkAddress};
use crate::data::recognizers::{
    parse_file_permission,
    parse_number,
    parse_url,
    parse_word,
    FilePermissionNode,
    NumberNode,
    UrlNode,
    WordNode,
};
#[cfg(any(debug_assertions, test))]
use crate::debug::printers::str_to_String_noraw;
use crate::rules::dtrule::DateTimeRule;
use crate::rules::EntityKind;

use std::fmt;

use ::lazy_static::lazy_static;
use ::rand::Rng;
use ::regex::Regex;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

lazy_static! {
    static ref RE_WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
    static ref RE_WORD_RUN: Regex = Regex::new(r"\S+").unwrap();
}

/// The recognizer families.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TokenKind {
    FilePermission,
    Url,
    Mac,
    Ipv6,
    Ipv4,
    Number,
    Word,
    DateTime,
    Whitespace,
    Fallback,
}

/// Order in which recognizers are tried on a non-whitespace run.
///
/// `DateTime` is absent; it is only tried on the span selected by a
/// [`DateTimeRule`]. `Fallback` always matches.
pub const RECOGNIZER_PRIORITY: [TokenKind; 9] = [
    TokenKind::FilePermission,
    TokenKind::Url,
    TokenKind::Mac,
    TokenKind::Ipv6,
    TokenKind::Ipv4,
    TokenKind::Number,
    TokenKind::Word,
    TokenKind::Whitespace,
    TokenKind::Fallback,
];

impl TokenKind {
    /// The rule flag governing this kind, if any.
    pub const fn entity_kind(self) -> Option<EntityKind> {
        match self {
            TokenKind::FilePermission => Some(EntityKind::FilePermission),
            TokenKind::Url => Some(EntityKind::Url),
            TokenKind::Mac => Some(EntityKind::Mac),
            TokenKind::Ipv6 => Some(EntityKind::Ipv6),
            TokenKind::Ipv4 => Some(EntityKind::Ipv4),
            TokenKind::Number => Some(EntityKind::Number),
            TokenKind::Word => Some(EntityKind::Word),
            TokenKind::DateTime | TokenKind::Whitespace | TokenKind::Fallback => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// The structured decomposition a recognizer produces.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParsedNode {
    FilePermission(FilePermissionNode),
    Url(UrlNode),
    Mac(NetworkAddress),
    Ipv6(NetworkAddress),
    Ipv4(NetworkAddress),
    Number(NumberNode),
    Word(WordNode),
    DateTime(DateTimeNode),
    Whitespace,
    Fallback,
}

impl ParsedNode {
    pub const fn kind(&self) -> TokenKind {
        match self {
            ParsedNode::FilePermission(_) => TokenKind::FilePermission,
            ParsedNode::Url(_) => TokenKind::Url,
            ParsedNode::Mac(_) => TokenKind::Mac,
            ParsedNode::Ipv6(_) => TokenKind::Ipv6,
            ParsedNode::Ipv4(_) => TokenKind::Ipv4,
            ParsedNode::Number(_) => TokenKind::Number,
            ParsedNode::Word(_) => TokenKind::Word,
            ParsedNode::DateTime(_) => TokenKind::DateTime,
            ParsedNode::Whitespace => TokenKind::Whitespace,
            ParsedNode::Fallback => TokenKind::Fallback,
        }
    }

    pub fn network_address(&self) -> Option<&NetworkAddress> {
        match self {
            ParsedNode::Mac(address) | ParsedNode::Ipv6(address) | ParsedNode::Ipv4(address) => {
                Some(address)
            }
            _ => None,
        }
    }

    /// Regenerate the node into new text of the same shape as `raw`.
    ///
    /// `sources` are the network addresses already rewritten in this
    /// document; see [`NetworkAddress::generate_new`].
    /// `Whitespace` and `Fallback` give back `raw`.
    pub fn generate_new<R: Rng + ?Sized>(
        &mut self,
        raw: &str,
        tables: &MappingTables,
        sources: &[NetworkAddress],
        rng: &mut R,
    ) -> String {
        match self {
            ParsedNode::FilePermission(node) => node.generate_new(tables),
            ParsedNode::Url(node) => node.generate_new(tables, rng),
            ParsedNode::Mac(address) | ParsedNode::Ipv6(address) | ParsedNode::Ipv4(address) => {
                address.generate_new(tables, sources)
            }
            ParsedNode::Number(node) => node.generate_new(tables, rng),
            ParsedNode::Word(node) => node.generate_new(tables, rng),
            ParsedNode::DateTime(node) => node.generate_new(rng),
            ParsedNode::Whitespace | ParsedNode::Fallback => String::from(raw),
        }
    }
}

/// Try one recognizer on `text`.
pub fn recognize_as(
    kind: TokenKind,
    text: &str,
) -> Option<ParsedNode> {
    match kind {
        TokenKind::FilePermission => parse_file_permission(text).map(ParsedNode::FilePermission),
        TokenKind::Url => parse_url(text).map(ParsedNode::Url),
        TokenKind::Mac => parse_mac(text).map(ParsedNode::Mac),
        TokenKind::Ipv6 => parse_ipv6(text).map(ParsedNode::Ipv6),
        TokenKind::Ipv4 => parse_ipv4(text).map(ParsedNode::Ipv4),
        TokenKind::Number => parse_number(text).map(ParsedNode::Number),
        TokenKind::Word => parse_word(text).map(ParsedNode::Word),
        TokenKind::DateTime => parse_datetime(text).map(ParsedNode::DateTime),
        TokenKind::Whitespace => {
            if !text.is_empty() && text.chars().all(char::is_whitespace) {
                Some(ParsedNode::Whitespace)
            } else {
                None
            }
        }
        TokenKind::Fallback => Some(ParsedNode::Fallback),
    }
}

/// The first recognizer in [`RECOGNIZER_PRIORITY`] that matches `text`.
pub fn recognize(text: &str) -> ParsedNode {
    if !text.is_empty() {
        for kind in RECOGNIZER_PRIORITY.iter() {
            if let Some(node) = recognize_as(*kind, text) {
                return node;
            }
        }
    }

    ParsedNode::Fallback
}

/// A classified span of a line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Token {
    raw: String,
    node: ParsedNode,
    /// set once the token is rewritten
    pub rewritten: Option<String>,
}

impl Token {
    pub fn new(
        raw: String,
        node: ParsedNode,
    ) -> Token {
        Token {
            raw,
            node,
            rewritten: None,
        }
    }

    /// Classify `raw` with [`recognize`].
    pub fn from_text(raw: &str) -> Token {
        Token::new(String::from(raw), recognize(raw))
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub const fn kind(&self) -> TokenKind {
        self.node.kind()
    }

    pub const fn node(&self) -> &ParsedNode {
        &self.node
    }

    pub fn node_mut(&mut self) -> &mut ParsedNode {
        &mut self.node
    }

    /// Did a recognizer other than `Fallback` match?
    pub const fn is_matched(&self) -> bool {
        !matches!(self.node, ParsedNode::Fallback)
    }

    /// The rewritten text, or `raw` if not rewritten.
    pub fn output(&self) -> &str {
        self.rewritten.as_deref().unwrap_or(&self.raw)
    }
}

/// A sequence of [`Token`].
pub type Tokens = Vec<Token>;

/// Split `content` into whitespace and non-whitespace tokens.
///
/// Concatenating every token's `raw` reproduces `content`.
pub fn tokenize(content: &str) -> Tokens {
    let mut tokens = Tokens::new();
    for (at, piece) in split_keep(content, &RE_WHITESPACE_RUN).into_iter().enumerate() {
        if piece.is_empty() {
            continue;
        }
        if at % 2 == 1 {
            tokens.push(Token::new(String::from(piece), ParsedNode::Whitespace));
        } else {
            tokens.push(Token::from_text(piece));
        }
    }

    tokens
}

/// Tokenize `content`, first trying the span of words selected by `rule`
/// as a single `DateTime` token.
///
/// The span is sliced from `content`, so whitespace between its words is
/// kept. If the span is not a recognizable datetime, `content` is
/// tokenized as by [`tokenize`].
pub fn tokenize_with_datetime(
    content: &str,
    rule: &DateTimeRule,
) -> Tokens {
    defn!("({:?})", str_to_String_noraw(content));
    let words: Vec<(usize, usize)> = RE_WORD_RUN
        .find_iter(content)
        .map(|m| (m.start(), m.end()))
        .collect();
    let span = match rule.extract_span(words.len()) {
        Some(span) => span,
        None => {
            defx!("no span");
            return tokenize(content);
        }
    };
    let begin = words[span.start].0;
    let end = words[span.end - 1].1;
    let text = &content[begin..end];
    let node = match parse_datetime(text) {
        Some(node) => node,
        None => {
            defx!("{:?} is not a datetime", text);
            return tokenize(content);
        }
    };
    let mut tokens = tokenize(&content[..begin]);
    tokens.push(Token::new(String::from(text), ParsedNode::DateTime(node)));
    tokens.extend(tokenize(&content[end..]));
    defx!("datetime {:?} at {}..{}", text, begin, end);

    tokens
}
