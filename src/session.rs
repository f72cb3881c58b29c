// src/session.rs

//! Implement [`RewriteSession`], the entry point for rewriting documents.
//!
//! ```rust
//! use rewordlib::session::RewriteSession;
//!
//! let mut session = RewriteSession::from_rule_text("rewrite_word: false").unwrap();
//! let rewritten = session.generate("host 10.1.2.3 is up\n");
//! assert_eq!(rewritten.raw.len(), rewritten.rewritten.len());
//! ```
//!
//! A session owns the [`MappingTables`], the [`RuleSet`] and the random
//! number generator. Within one document every repeated entity rewrites
//! to the same new text, and network addresses sharing octets with an
//! earlier address share the rewritten octets.
//!
//! [`RewriteSession`]: crate::session::RewriteSession
//! [`MappingTables`]: crate::data::mapping::MappingTables
//! [`RuleSet`]: crate::rules::RuleSet

use crate::common::{Count, Path, SessionRng};
use crate::data::line::{split_lines, Line};
use crate::data::mapping::MappingTables;
use crate::data::net::NetworkAddress;
use crate::data::token::{tokenize, tokenize_with_datetime, Token, TokenKind};
#[cfg(any(debug_assertions, test))]
use crate::debug::printers::str_to_String_noraw;
use crate::rules::errors::Result;
use crate::rules::RuleSet;

use std::collections::HashMap;

use ::rand::SeedableRng;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A document and its rewritten form.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Rewritten {
    pub raw: String,
    pub rewritten: String,
}

/// Cross-reference state of the document being rewritten.
#[derive(Debug, Default)]
struct DocumentState {
    /// network addresses rewritten so far, in order
    sources: Vec<NetworkAddress>,
    /// rewritten text of each token already seen
    memo: HashMap<(TokenKind, String), String>,
}

/// Rewrites documents, see the [module docs](self).
pub struct RewriteSession {
    rules: RuleSet,
    tables: MappingTables,
    rng: SessionRng,
    /// count of documents rewritten
    documents: Count,
}

impl std::fmt::Debug for RewriteSession {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter,
    ) -> std::fmt::Result {
        f.debug_struct("RewriteSession")
            .field("rules", &self.rules)
            .field("documents", &self.documents)
            .finish()
    }
}

impl RewriteSession {
    /// New session with an RNG seeded from the operating system.
    pub fn new(rules: RuleSet) -> RewriteSession {
        RewriteSession::with_rng(rules, SessionRng::from_os_rng())
    }

    /// New session drawing all randomness from `rng`, for reproducible
    /// runs.
    pub fn with_rng(
        rules: RuleSet,
        mut rng: SessionRng,
    ) -> RewriteSession {
        let tables = MappingTables::build(&mut rng);

        RewriteSession {
            rules,
            tables,
            rng,
            documents: 0,
        }
    }

    /// New session from YAML rule text. Blank text gives the default
    /// rules.
    pub fn from_rule_text(text: &str) -> Result<RewriteSession> {
        Ok(RewriteSession::new(RuleSet::from_yaml_str(text)?))
    }

    /// New session from a YAML rule file.
    pub fn from_rule_file(path: &Path) -> Result<RewriteSession> {
        Ok(RewriteSession::new(RuleSet::from_yaml_file(path)?))
    }

    pub const fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub const fn tables(&self) -> &MappingTables {
        &self.tables
    }

    pub const fn documents(&self) -> Count {
        self.documents
    }

    /// Rebuild the mapping tables from the session RNG.
    pub fn rebuild(&mut self) {
        defñ!();
        self.tables = MappingTables::build(&mut self.rng);
    }

    /// Rewrite `text`, keeping both.
    pub fn generate(
        &mut self,
        text: &str,
    ) -> Rewritten {
        Rewritten {
            raw: String::from(text),
            rewritten: self.rewrite(text),
        }
    }

    /// Rewrite the document `text`.
    ///
    /// With `rewrite_on_each_generate` the mapping tables are rebuilt before
    /// every document but the first.
    pub fn rewrite(
        &mut self,
        text: &str,
    ) -> String {
        defn!("document {}, text len {}", self.documents, text.len());
        if self.documents > 0 && self.rules.rewrite_on_each_generate() {
            self.rebuild();
        }
        self.documents += 1;
        let mut state = DocumentState::default();
        let mut lines = split_lines(text);
        if let Some(rule) = self.rules.unchanged_lines() {
            rule.apply(&mut lines);
        }
        let mut out = String::with_capacity(text.len());
        for line in lines.iter_mut() {
            if !line.unchanged {
                line.rewritten = Some(self.rewrite_line(line, &mut state));
            }
            out.push_str(&line.output());
        }
        defx!("{} lines, {} addresses", lines.len(), state.sources.len());

        out
    }

    fn rewrite_line(
        &mut self,
        line: &Line,
        state: &mut DocumentState,
    ) -> String {
        let content = line.content();
        let mut tokens = match self.rules.rewrite_datetime() {
            Some(rule) => tokenize_with_datetime(content, rule),
            None => tokenize(content),
        };
        let mut out = String::with_capacity(content.len());
        for token in tokens.iter_mut() {
            let rewritten = self.rewrite_token(token, state);
            token.rewritten = Some(rewritten);
            out.push_str(token.output());
        }
        defo!("{:?} → {:?}", str_to_String_noraw(content), str_to_String_noraw(&out));

        out
    }

    /// Apply the rules to one token. Disabled kinds and tokens no
    /// recognizer matched give back their raw text.
    fn rewrite_token(
        &mut self,
        token: &mut Token,
        state: &mut DocumentState,
    ) -> String {
        let kind = token.kind();
        let enabled = match kind {
            TokenKind::Whitespace | TokenKind::Fallback => false,
            TokenKind::DateTime => self
                .rules
                .rewrite_datetime()
                .map_or(false, |rule| rule.rewrite),
            _ => match kind.entity_kind() {
                Some(entity) => self.rules.should_rewrite(entity),
                None => false,
            },
        };
        if !enabled {
            return String::from(token.raw());
        }
        let key = (kind, String::from(token.raw()));
        if let Some(rewritten) = state.memo.get(&key) {
            defo!("{} {:?} seen", kind, token.raw());
            return rewritten.clone();
        }
        let raw = String::from(token.raw());
        let rewritten = token
            .node_mut()
            .generate_new(&raw, &self.tables, &state.sources, &mut self.rng);
        if let Some(address) = token.node().network_address() {
            state.sources.push(address.clone());
        }
        state.memo.insert(key, rewritten.clone());

        rewritten
    }
}
