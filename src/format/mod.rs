//! Output format language
//!
//! ```text
//! format   := item*
//! item     := literal | '$' field | '#' field | '[' format ']' suffix?
//! field    := 'w' | 't' | 'b' | 'B' | 'c'
//! suffix   := '*' | N | '=' N | '<' N | '>' N | '!' N
//! ```
//!
//! A group without a suffix is a bare test: it disappears when nothing
//! countable inside it has values. `*` renders the group unconditionally;
//! the other suffixes compare the number of values of the first countable
//! field inside the group.

pub mod action;
pub mod cache;
pub mod context;
pub mod lexer;
pub mod parser;
pub mod tree;

pub use action::{Action, Field};
pub use cache::FormatCache;
pub use context::{Candidate, OutputContext};
pub use tree::{FormatNode, FormatTree, Guard};
