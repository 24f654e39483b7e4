//! Convenient re-exports for common usage patterns.
//!
//! # Example
//!
//! ```ignore
//! use cidacake::prelude::*;
//!
//! let catalog = Catalog::new(MemoryLedger::load_dir("dumps", &program_id)?, program);
//! let info = catalog.contract_info(&store)?;
//! ```

// Unified error handling
pub use crate::error::{Error, Result};

// Codec types
pub use crate::codec::{
    CodecError, FixedString, Product, ProductDescription, ProductName, PurchaseLayout,
    PurchaseRecord, RecordKind, StoreLayout, StoreState,
};

// Instructions
pub use crate::instruction::{
    AccountMeta, Instruction, OpcodeTable, Operation, PaymentAccounts, ProgramRevision,
    StoreInstruction, StoreProgram,
};

// Addresses
pub use crate::Address;
pub use crate::pda::{
    AccountSeeds, DerivedAddress, derive_address, history_address, metadata_address,
    product_address,
};

// Ledger reads
pub use crate::ledger::{
    AccountInfo, AccountSource, Catalog, ContractInfo, KeyedAccount, LedgerError, MemoryLedger,
    SourceError,
};

// Configuration (requires "config" feature)
#[cfg(feature = "config")]
pub use crate::config::{Config, ConfigError};
