//! Client-side codec for the Cidacake store program.
//!
//! This library decodes the program's accounts, encodes its instruction
//! payloads and derives the program addresses its accounts live at. It
//! never signs or submits anything; instructions are handed to whatever
//! transport the caller uses.
//!
//! # Quick Start
//!
//! ```ignore
//! use cidacake::prelude::*;
//!
//! let program = StoreProgram::new(program_id, ProgramRevision::Catalog);
//!
//! // Decode the store account and read its counters
//! let state = StoreState::decode(&store_bytes, program.store_layout)?;
//! let next_purchase = state.history_counter();
//!
//! // Build a purchase for product 2
//! let ix = program.sell_product(&store, &payment, 2, next_purchase.unwrap_or_default(), 1)?;
//! ```
//!
//! # Modules
//!
//! - [`codec`] - Fixed-layout account records (always available)
//! - [`instruction`] - Instruction payloads, opcode tables and account lists
//! - [`pda`] - Program-derived addresses for store accounts
//! - [`ledger`] - Decoded reads through a pluggable account source
//! - [`config`] - TOML deployment configuration (requires `config` feature)
//!
//! # Feature Flags
//!
//! - `logging` - Enable library-level tracing (consumers provide their own subscriber)
//! - `config` - Enable TOML configuration loading
//! - `cli` - Enable the command-line interface binary
//! - `full` - Enable all features

pub mod codec;
#[cfg(feature = "config")]
pub mod config;
pub mod instruction;
pub mod ledger;
mod logging;
pub mod pda;
pub mod prelude;
#[cfg(feature = "cli")]
pub mod subscriber;

mod error;

/// A 32-byte account address.
pub use solana_pubkey::Pubkey as Address;

// Re-export the unified error type
pub use error::{Error, Result};

// Re-export codec types at crate root for convenience
pub use codec::{
    CodecError, FixedString, Product, PurchaseLayout, PurchaseRecord, RecordKind, StoreLayout,
    StoreState,
};

pub use instruction::{
    AccountMeta, Instruction, OpcodeTable, Operation, PaymentAccounts, ProgramRevision,
    StoreInstruction, StoreProgram,
};

pub use pda::{DerivedAddress, derive_address};
