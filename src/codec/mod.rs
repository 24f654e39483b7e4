//! Binary codec for store program accounts.
//!
//! All integers are little-endian and every record has a fixed length.
//! Decoding never zero-fills: a buffer of the wrong length is a
//! [`CodecError::LayoutMismatch`].
//!
//! # Module Organization
//!
//! - [`error`]: Error types for codec operations
//! - [`buffer`]: Field tables and safe read/write helpers
//! - [`fixed_string`]: NUL-padded fixed-width strings
//! - [`layout`]: Layout versions for records that changed over time
//! - [`store`], [`product`], [`purchase`]: the account records

mod buffer;
mod error;
mod fixed_string;
mod layout;
mod product;
mod purchase;
mod store;

pub use error::CodecError;
pub use fixed_string::FixedString;
pub use layout::{ParseLayoutError, PurchaseLayout, StoreLayout};
pub use product::{Product, ProductDescription, ProductName};
pub use purchase::PurchaseRecord;
pub use store::StoreState;

pub(crate) use buffer::{Field, Layout};

use std::fmt;

/// The kinds of byte layouts this codec understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    StoreState,
    Product,
    PurchaseRecord,
    Instruction,
}

impl RecordKind {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::StoreState => "store state",
            Self::Product => "product",
            Self::PurchaseRecord => "purchase record",
            Self::Instruction => "instruction",
        }
    }

    /// Exact account length for a store state layout.
    pub const fn store_len(layout: StoreLayout) -> usize {
        StoreState::len(layout)
    }

    /// Exact account length for a purchase record layout.
    pub const fn purchase_len(layout: PurchaseLayout) -> usize {
        PurchaseRecord::len(layout)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
