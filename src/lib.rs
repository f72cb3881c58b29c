// src/lib.rs

//! _rewordlib_ rewrites sensitive literals in text (logs, command output,
//! captures) with randomized substitutes of the same shape.
//!
//! Addresses, URLs, numbers, words, file permissions and datetimes are
//! recognized per whitespace-separated word and regenerated so that the
//! output keeps the length, case pattern, and digit and punctuation
//! positions of the original.
//!
//! Start with [`RewriteSession`].
//!
//! [`RewriteSession`]: crate::session::RewriteSession

pub mod common;
pub mod data;
pub mod debug;
pub mod rules;
pub mod session;
#[cfg(test)]
pub mod tests;
