//! Text rewriting applied to relayed content.
//!
//! Three layers, leaf-first:
//! - [`normalize`] folds styled "Mathematical Bold" letters back to ASCII.
//! - [`Rewriter`] normalizes, then runs an ordered list of case-insensitive
//!   regex substitutions.
//! - [`walk`] applies a rewriter to every string leaf of a JSON tree (embeds).

pub mod error;
pub mod normalize;
pub mod rules;
pub mod walk;

pub use {
    error::{Error, Result},
    normalize::normalize,
    rules::{DEFAULT_RULES, Rewriter},
    walk::{map_strings, rewrite_strings},
};
