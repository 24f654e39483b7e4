//! Unified error type for the cidacake library.
//!
//! Each module reports its own error enum. [`Error`] wraps all of them so
//! application code can use a single type with `?`.

use thiserror::Error;

use crate::codec::CodecError;
#[cfg(feature = "config")]
use crate::config::ConfigError;
use crate::ledger::{LedgerError, SourceError};

/// Unified error type for all cidacake operations.
///
/// # Example
///
/// ```ignore
/// use cidacake::{Result, StoreState, StoreLayout};
///
/// fn stock_of(bytes: &[u8]) -> Result<Option<u64>> {
///     Ok(StoreState::decode(bytes, StoreLayout::Single)?.stock)
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// Error from decoding, encoding or address derivation.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Error from reading store accounts.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Error from the account transport.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Error loading configuration.
    #[cfg(feature = "config")]
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A [`Result`] type alias using the unified [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns `true` if this is a codec error.
    pub fn is_codec(&self) -> bool {
        matches!(self, Self::Codec(_))
    }

    /// Returns `true` if bytes did not match the expected record length.
    pub fn is_layout_mismatch(&self) -> bool {
        match self {
            Self::Codec(e) | Self::Ledger(LedgerError::Codec(e)) => e.is_layout_mismatch(),
            _ => false,
        }
    }

    /// Returns `true` if this is a ledger read error.
    pub fn is_ledger(&self) -> bool {
        matches!(self, Self::Ledger(_))
    }

    /// Returns `true` if this is a transport error, wrapped or not.
    pub fn is_source(&self) -> bool {
        matches!(self, Self::Source(_) | Self::Ledger(LedgerError::Source(_)))
    }

    /// Returns `true` if this is a configuration error.
    #[cfg(feature = "config")]
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Returns `true` if this is an I/O error.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::RecordKind;

    #[test]
    fn test_predicates_see_through_ledger() {
        let mismatch = CodecError::LayoutMismatch {
            kind: RecordKind::Product,
            expected: 184,
            actual: 0,
            field: Some("id"),
        };
        let err = Error::from(LedgerError::from(mismatch));
        assert!(err.is_ledger());
        assert!(err.is_layout_mismatch());
        assert!(!err.is_codec());

        let err = Error::from(SourceError::Unavailable("timeout".into()));
        assert!(err.is_source());
    }
}
