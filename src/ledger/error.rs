//! Error types for ledger reads.

use std::io;

use thiserror::Error;

use crate::Address;
use crate::codec::CodecError;

/// Failures of the transport behind an [`AccountSource`](super::AccountSource).
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Invalid account dump {path}: {reason}")]
    InvalidDump { path: String, reason: String },

    /// Opaque failure reported by a remote source.
    #[error("Account source unavailable: {0}")]
    Unavailable(String),
}

/// Errors that can occur while reading store accounts from a ledger.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The account exists but belongs to another program, so its bytes are
    /// not a store record whatever their length.
    #[error("Account {address} is owned by {owner}, expected {expected}")]
    ForeignOwner {
        address: Address,
        owner: Address,
        expected: Address,
    },
}

impl LedgerError {
    pub fn is_foreign_owner(&self) -> bool {
        matches!(self, Self::ForeignOwner { .. })
    }

    pub fn is_source(&self) -> bool {
        matches!(self, Self::Source(_))
    }
}
