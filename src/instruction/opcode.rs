//! Opcode tables for deployed program revisions.
//!
//! The store program renumbered `close_account` between deployments (5 in
//! the single-product store, 6 in the catalog store), so opcodes are looked
//! up in a table chosen per deployment instead of being hardcoded.

use std::fmt;
use std::str::FromStr;

use crate::codec::{ParseLayoutError, PurchaseLayout, StoreLayout};

/// Deployed revision of the store program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProgramRevision {
    /// One product, stock and price held in the store account.
    Single,
    /// Product catalog with per-product accounts and purchase history.
    #[default]
    Catalog,
}

impl ProgramRevision {
    pub const fn opcodes(&self) -> OpcodeTable {
        match self {
            Self::Single => OpcodeTable::SINGLE_STORE,
            Self::Catalog => OpcodeTable::CATALOG_STORE,
        }
    }

    pub const fn store_layout(&self) -> StoreLayout {
        match self {
            Self::Single => StoreLayout::Single,
            Self::Catalog => StoreLayout::Catalog,
        }
    }

    pub const fn purchase_layout(&self) -> PurchaseLayout {
        match self {
            Self::Single => PurchaseLayout::V1,
            Self::Catalog => PurchaseLayout::V2,
        }
    }
}

impl FromStr for ProgramRevision {
    type Err = ParseLayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<StoreLayout>().map(|layout| match layout {
            StoreLayout::Single => Self::Single,
            StoreLayout::Catalog => Self::Catalog,
        })
    }
}

impl fmt::Display for ProgramRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.store_layout(), f)
    }
}

/// The operations a store program exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Initialize,
    AddProduct,
    UpdatePrice,
    Sell,
    SellProduct,
    CloseAccount,
    CloseProductAccount,
}

impl Operation {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Initialize => "initialize",
            Self::AddProduct => "add_product",
            Self::UpdatePrice => "update_price",
            Self::Sell => "sell",
            Self::SellProduct => "sell_product",
            Self::CloseAccount => "close_account",
            Self::CloseProductAccount => "close_product_account",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Opcode byte for each store operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpcodeTable {
    pub initialize: u8,
    pub add_product: u8,
    pub update_price: u8,
    pub sell: u8,
    pub sell_product: u8,
    pub close_account: u8,
    pub close_product_account: u8,
}

impl OpcodeTable {
    pub const SINGLE_STORE: Self = Self {
        initialize: 0,
        add_product: 1,
        update_price: 2,
        sell: 3,
        sell_product: 4,
        close_account: 5,
        close_product_account: 7,
    };

    pub const CATALOG_STORE: Self = Self {
        close_account: 6,
        ..Self::SINGLE_STORE
    };

    /// Operations in table order, paired with their opcodes.
    pub const fn entries(&self) -> [(Operation, u8); 7] {
        [
            (Operation::Initialize, self.initialize),
            (Operation::AddProduct, self.add_product),
            (Operation::UpdatePrice, self.update_price),
            (Operation::Sell, self.sell),
            (Operation::SellProduct, self.sell_product),
            (Operation::CloseAccount, self.close_account),
            (Operation::CloseProductAccount, self.close_product_account),
        ]
    }

    pub const fn opcode(&self, operation: Operation) -> u8 {
        match operation {
            Operation::Initialize => self.initialize,
            Operation::AddProduct => self.add_product,
            Operation::UpdatePrice => self.update_price,
            Operation::Sell => self.sell,
            Operation::SellProduct => self.sell_product,
            Operation::CloseAccount => self.close_account,
            Operation::CloseProductAccount => self.close_product_account,
        }
    }

    /// The operation an opcode selects, if any.
    pub fn lookup(&self, opcode: u8) -> Option<Operation> {
        self.entries()
            .into_iter()
            .find(|(_, op)| *op == opcode)
            .map(|(operation, _)| operation)
    }

    /// The first operation sharing its opcode with a later one.
    pub fn find_duplicate(&self) -> Option<Operation> {
        let entries = self.entries();
        entries.iter().enumerate().find_map(|(i, (operation, op))| {
            entries
                .iter()
                .skip(i + 1)
                .any(|(_, other)| other == op)
                .then_some(*operation)
        })
    }
}

impl Default for OpcodeTable {
    fn default() -> Self {
        Self::CATALOG_STORE
    }
}
