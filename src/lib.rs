#![warn(clippy::perf)]
#![warn(clippy::unwrap_used)]

//! A daily word-guessing game: one hidden word per date, a handful of guesses, and
//! per-letter hints after each one.

pub mod errors;
pub use errors::{Error, Result};

pub mod framework;

pub mod input;
pub use input::Input;

pub mod oracle;

pub mod stats;

pub mod store;

pub mod wordle;
