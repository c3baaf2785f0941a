//! Processing Strategy Module
//!
//! - Sequential: one document at a time through a [`Session`](crate::lemmatiser::Session)
//! - Parallel: many documents across the Rayon pool, one session

pub mod parallel;

pub use parallel::lemmatise_parallel;
