//! Core markup primitives
//!
//! This module contains the fundamental building blocks for markup scanning:
//! - Scanner: memchr-backed cursor for skipping unanalysed text
//! - Tagger: byte-driven tag classifier raising structural events
//! - Words: word tokenizer fed one text byte at a time
//! - Entities: escaping of computed output written into attribute values

pub mod entities;
pub mod scanner;
pub mod tagger;
pub mod words;
