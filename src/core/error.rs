//! Library error type.
//!
//! Files that are simply not test executables never produce an error; the
//! discovery coordinator declines them with `None`. Test failures are
//! `Outcome::Failed`, not errors. What remains is a broken toolchain or a
//! broken configuration.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A test executable (or the emulator wrapping it) could not be started.
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Listing the cases of a claimed executable failed.
    #[error("failed to list test cases of `{}`: {reason}", path.display())]
    Listing { path: PathBuf, reason: String },

    /// A private scratch directory for a test run could not be created.
    #[error("failed to create a scratch directory: {0}")]
    Scratch(#[source] std::io::Error),

    /// A configured file mask is not a valid glob pattern.
    #[error("invalid file mask `{mask}`: {source}")]
    InvalidMask {
        mask: String,
        #[source]
        source: glob::PatternError,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
