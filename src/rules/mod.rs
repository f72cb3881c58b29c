// src/rules/mod.rs

//! Rewrite rules loaded from a YAML document.
//!
//! ```yaml
//! rewrite_on_each_generate: false
//! rewrite_ipv4: true
//! rewrite_word: false
//! rewrite_datetime: yes, 1, 3
//! unchanged_lines: 1, eof
//! ```
//!
//! A [`RuleSet`] keeps the document it was loaded from, including keys it
//! does not know, so that [`RuleSet::text`] echoes the rules back. Entity
//! flags that were absent are added once an entity of that kind is
//! rewritten.
//!
//! [`RuleSet`]: crate::rules::RuleSet
//! [`RuleSet::text`]: crate::rules::RuleSet::text

pub mod dtrule;
pub mod errors;
pub mod unchanged;

use crate::common::Path;
use crate::debug::printers::de_err;
use crate::rules::dtrule::DateTimeRule;
use crate::rules::errors::{Result, RuleError};
use crate::rules::unchanged::UnchangedLinesRule;

use std::collections::HashMap;
use std::fmt;

use ::itertools::Itertools;
use ::serde_yaml::{Mapping, Value};
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub const KEY_REWRITE_ON_EACH_GENERATE: &str = "rewrite_on_each_generate";
pub const KEY_REWRITE_DATETIME: &str = "rewrite_datetime";
pub const KEY_UNCHANGED_LINES: &str = "unchanged_lines";

pub const RULE_DOCS_HEADER: &str = "# See the full list of rewrite rules in the wiki:";
pub const RULE_DOCS_LINK: &str = "# https://github.com/Geeks-Trident-LLC/rewordapp/wiki/Rewrite-Rules";

/// The kinds of entity with a `rewrite_*` flag.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum EntityKind {
    FilePermission,
    Ipv4,
    Ipv6,
    Mac,
    Url,
    Number,
    Word,
}

pub const ENTITY_KINDS: [EntityKind; 7] = [
    EntityKind::FilePermission,
    EntityKind::Ipv4,
    EntityKind::Ipv6,
    EntityKind::Mac,
    EntityKind::Url,
    EntityKind::Number,
    EntityKind::Word,
];

impl EntityKind {
    /// The rule document key of this kind's flag.
    pub const fn rule_name(self) -> &'static str {
        match self {
            EntityKind::FilePermission => "rewrite_file_permission",
            EntityKind::Ipv4 => "rewrite_ipv4",
            EntityKind::Ipv6 => "rewrite_ipv6",
            EntityKind::Mac => "rewrite_mac",
            EntityKind::Url => "rewrite_url",
            EntityKind::Number => "rewrite_number",
            EntityKind::Word => "rewrite_word",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        write!(f, "{}", self.rule_name())
    }
}

/// Policy of one entity flag.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EntityRule {
    /// `true` rewrites, `false` keeps
    Flag(bool),
    /// any non-bool value: always rewrite
    Always,
}

impl EntityRule {
    pub const fn rewrites(self) -> bool {
        match self {
            EntityRule::Flag(flag) => flag,
            EntityRule::Always => true,
        }
    }
}

/// Short single-line rendering of a YAML value for error messages.
pub fn value_repr(value: &Value) -> String {
    match value {
        Value::Null => String::from("null"),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("{:?}", s),
        Value::Sequence(items) => format!("[{}]", items.iter().map(value_repr).join(", ")),
        Value::Mapping(mapping) => format!(
            "{{{}}}",
            mapping
                .iter()
                .map(|(k, v)| format!("{}: {}", value_repr(k), value_repr(v)))
                .join(", ")
        ),
        Value::Tagged(tagged) => format!("{} {}", tagged.tag, value_repr(&tagged.value)),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "dictionary",
        Value::Tagged(_) => "tagged value",
    }
}

/// `Null` and `""` both mean the key is unset.
fn is_unset(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Rewrite rules, see the [module docs](self).
#[derive(Clone, Debug)]
pub struct RuleSet {
    /// the loaded document in insertion order, plus exercised flags
    document: Mapping,
    rewrite_on_each_generate: bool,
    entity_rules: HashMap<EntityKind, EntityRule>,
    rewrite_datetime: Option<DateTimeRule>,
    unchanged_lines: Option<UnchangedLinesRule>,
}

impl Default for RuleSet {
    /// `rewrite_on_each_generate: true` and nothing else.
    fn default() -> Self {
        let mut document = Mapping::new();
        document.insert(Value::from(KEY_REWRITE_ON_EACH_GENERATE), Value::Bool(true));

        RuleSet {
            document,
            rewrite_on_each_generate: true,
            entity_rules: HashMap::new(),
            rewrite_datetime: None,
            unchanged_lines: None,
        }
    }
}

impl RuleSet {
    /// Parse a YAML rule document. Blank text gives the default rules.
    pub fn from_yaml_str(text: &str) -> Result<RuleSet> {
        defn!("text len {}", text.len());
        if text.trim().is_empty() {
            defx!("blank, default rules");
            return Ok(RuleSet::default());
        }
        let value: Value = ::serde_yaml::from_str(text)?;
        let rules = RuleSet::from_value(value);
        defx!();

        rules
    }

    /// Read and parse a YAML rule file.
    pub fn from_yaml_file(path: &Path) -> Result<RuleSet> {
        defñ!("{:?}", path);
        let text = std::fs::read_to_string(path)?;

        RuleSet::from_yaml_str(&text)
    }

    pub fn from_value(value: Value) -> Result<RuleSet> {
        let document: Mapping = match value {
            Value::Mapping(mapping) => mapping,
            other => {
                return Err(RuleError::InvalidRulesFormat(format!(
                    "Rules must be a dictionary, but received {}.",
                    type_name(&other)
                )));
            }
        };

        let rewrite_on_each_generate = match document.get(KEY_REWRITE_ON_EACH_GENERATE) {
            None | Some(Value::Null) => false,
            Some(Value::Bool(flag)) => *flag,
            Some(other) => {
                return Err(RuleError::InvalidRulesFormat(format!(
                    "{} must be true or false\nReceived: {}",
                    KEY_REWRITE_ON_EACH_GENERATE,
                    value_repr(other)
                )));
            }
        };

        let mut entity_rules: HashMap<EntityKind, EntityRule> = HashMap::new();
        for kind in ENTITY_KINDS.iter() {
            match document.get(kind.rule_name()) {
                None => {}
                Some(Value::Bool(flag)) => {
                    entity_rules.insert(*kind, EntityRule::Flag(*flag));
                }
                Some(_) => {
                    entity_rules.insert(*kind, EntityRule::Always);
                }
            }
        }

        let rewrite_datetime = match document.get(KEY_REWRITE_DATETIME) {
            Some(value) if !is_unset(value) => Some(DateTimeRule::from_value(value)?),
            _ => None,
        };

        let unchanged_lines = match document.get(KEY_UNCHANGED_LINES) {
            Some(value) if !is_unset(value) => Some(UnchangedLinesRule::from_value(value)?),
            _ => None,
        };

        Ok(RuleSet {
            document,
            rewrite_on_each_generate,
            entity_rules,
            rewrite_datetime,
            unchanged_lines,
        })
    }

    pub const fn rewrite_on_each_generate(&self) -> bool {
        self.rewrite_on_each_generate
    }

    pub fn entity_rule(
        &self,
        kind: EntityKind,
    ) -> Option<EntityRule> {
        self.entity_rules.get(&kind).copied()
    }

    pub fn rewrite_datetime(&self) -> Option<&DateTimeRule> {
        self.rewrite_datetime.as_ref()
    }

    pub fn unchanged_lines(&self) -> Option<&UnchangedLinesRule> {
        self.unchanged_lines.as_ref()
    }

    /// Should an entity of `kind` be rewritten?
    ///
    /// An absent flag rewrites, and `true` is recorded in the document so
    /// the effective policy shows in [`RuleSet::text`].
    pub fn should_rewrite(
        &mut self,
        kind: EntityKind,
    ) -> bool {
        if let Some(rule) = self.entity_rules.get(&kind) {
            return rule.rewrites();
        }
        defo!("record {}: true", kind);
        self.entity_rules.insert(kind, EntityRule::Flag(true));
        self.document.insert(Value::from(kind.rule_name()), Value::Bool(true));

        true
    }

    /// The rule document as YAML, keys in insertion order, without
    /// trailing newlines.
    pub fn text(&self) -> String {
        match ::serde_yaml::to_string(&self.document) {
            Ok(text) => String::from(text.trim_end_matches(|c| c == '\r' || c == '\n')),
            Err(_err) => {
                de_err!("failed to serialize rules: {}", _err);
                String::new()
            }
        }
    }

    /// [`RuleSet::text`] after a banner pointing to the rule documentation.
    pub fn text_with_rule_docs(&self) -> String {
        let border = "#".repeat(RULE_DOCS_HEADER.len().max(RULE_DOCS_LINK.len()));

        format!(
            "{}\n{}\n{}\n{}\n{}",
            border,
            RULE_DOCS_HEADER,
            RULE_DOCS_LINK,
            border,
            self.text()
        )
    }
}

impl fmt::Display for RuleSet {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        write!(f, "{}", self.text())
    }
}
