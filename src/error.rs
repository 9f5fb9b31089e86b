//! Crate error type
//!
//! Parsing has no fatal errors; decoders report "not this kind of event" as
//! `None`. The only failures surfaced to callers are output-channel write
//! failures, propagated untouched.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The terminal output channel refused a write.
    #[error("terminal write failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
