// src/data/mod.rs

//! The `data` module holds the recognizers and regenerators for each kind
//! of literal, and the [`Line`]s and [`Token`]s they work on.
//!
//! ## Definitions of data
//!
//! ### Line
//!
//! A "line" is a sequence of characters of a document that:
//!
//! * begin after a prior "line" or the beginning of the document.
//! * end with `"\n"`, `"\r\n"`, `"\r"` or the end of the document.
//!
//! A "line" is represented by a [`Line`].
//!
//! ### Token
//!
//! A "token" is a span of a line's content that is either a run of
//! whitespace or a run of non-whitespace, or, on a line where a datetime is
//! expected, the datetime span of several words.
//!
//! A "token" is represented by a [`Token`]. Its [`ParsedNode`] is the
//! decomposition made by the first recognizer that matched.
//!
//! ### Mapping tables
//!
//! Regeneration substitutes characters through randomized per-class
//! bijections, the [`MappingTables`].
//!
//! [`Line`]: crate::data::line::Line
//! [`Token`]: crate::data::token::Token
//! [`ParsedNode`]: crate::data::token::ParsedNode
//! [`MappingTables`]: crate::data::mapping::MappingTables

pub mod datetime;
pub mod line;
pub mod mapping;
pub mod net;
pub mod recognizers;
pub mod token;
