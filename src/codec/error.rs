//! Error types for account decoding and instruction encoding.

use thiserror::Error;

use super::RecordKind;

/// Errors that can occur while encoding payloads, decoding account bytes or
/// deriving program addresses.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The byte length does not match the declared layout.
    ///
    /// `field` names the first field that could not be read when the buffer
    /// is too short. It is `None` when the buffer is longer than the layout.
    #[error(
        "{kind} layout mismatch: expected {expected} bytes, got {actual}{}",
        describe_field(.field)
    )]
    LayoutMismatch {
        kind: RecordKind,
        expected: usize,
        actual: usize,
        field: Option<&'static str>,
    },

    #[error("{kind} field `{field}` could not be decoded: {reason}")]
    FieldDecode {
        kind: RecordKind,
        field: &'static str,
        reason: String,
    },

    /// No bump value produced an off-curve address for these seeds.
    #[error("no program address found for seeds [{}]", format_seeds(.seeds))]
    AddressDerivationExhausted { seeds: Vec<Vec<u8>> },

    /// An encoder produced bytes that do not match its declared layout.
    /// This indicates a bug in the encoder, not bad input.
    #[error("encoding invariant violated for {context}: field `{field}`")]
    EncodingInvariantViolation {
        context: &'static str,
        field: &'static str,
    },

    #[error("Unknown opcode {0}")]
    UnknownOpcode(u8),

    #[error("Instruction payload is empty")]
    EmptyPayload,
}

fn describe_field(field: &Option<&'static str>) -> String {
    field
        .map(|f| format!(" (cannot read `{f}`)"))
        .unwrap_or_default()
}

fn format_seeds(seeds: &[Vec<u8>]) -> String {
    seeds
        .iter()
        .map(hex::encode)
        .collect::<Vec<_>>()
        .join(", ")
}

impl CodecError {
    /// Returns `true` for a length mismatch, which callers usually treat as
    /// an uninitialized or foreign account.
    pub fn is_layout_mismatch(&self) -> bool {
        matches!(self, Self::LayoutMismatch { .. })
    }

    /// The field a short buffer could not provide, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        match self {
            Self::LayoutMismatch { field, .. } => *field,
            _ => None,
        }
    }
}
