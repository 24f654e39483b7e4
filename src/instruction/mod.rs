//! Instruction payloads for the store program.
//!
//! A payload is `[opcode, operands...]` with fixed-width little-endian
//! operands. The opcode byte comes from an [`OpcodeTable`] chosen for the
//! target deployment.
//!
//! # Module Organization
//!
//! - [`opcode`]: Opcode tables and program revisions
//! - [`accounts`]: Account lists paired with payloads, ready for submission

mod accounts;
mod opcode;

pub use accounts::{
    AccountMeta, Instruction, PaymentAccounts, StoreProgram, SYSTEM_PROGRAM_ID, TOKEN_PROGRAM_ID,
};
pub use opcode::{OpcodeTable, Operation, ProgramRevision};

use std::fmt;

use crate::codec::{
    CodecError, Field, Layout, ProductDescription, ProductName, RecordKind,
};
use crate::logging::trace;

const OPCODE: Field = Field::new("opcode", 0, 1);
const BUMP: Field = Field::new("bump", 1, 1);
const NAME: Field = Field::new("name", 1, 32);
const DESCRIPTION: Field = Field::new("description", 33, 128);
const PRICE: Field = Field::new("price", 161, 8);
const STOCK: Field = Field::new("stock", 169, 8);
const NEW_PRICE: Field = Field::new("new_price", 1, 8);
const QUANTITY: Field = Field::new("quantity", 1, 8);
const PRODUCT_ID: Field = Field::new("product_id", 1, 8);
const PRODUCT_QUANTITY: Field = Field::new("quantity", 9, 8);

const INITIALIZE: Layout = Layout::new(RecordKind::Instruction, &[OPCODE]).named("initialize");
const INITIALIZE_WITH_BUMP: Layout =
    Layout::new(RecordKind::Instruction, &[OPCODE, BUMP]).named("initialize");
const ADD_PRODUCT: Layout = Layout::new(
    RecordKind::Instruction,
    &[OPCODE, NAME, DESCRIPTION, PRICE, STOCK],
)
.named("add_product");
const UPDATE_PRICE: Layout =
    Layout::new(RecordKind::Instruction, &[OPCODE, NEW_PRICE]).named("update_price");
const SELL: Layout = Layout::new(RecordKind::Instruction, &[OPCODE, QUANTITY]).named("sell");
const SELL_PRODUCT: Layout = Layout::new(
    RecordKind::Instruction,
    &[OPCODE, PRODUCT_ID, PRODUCT_QUANTITY],
)
.named("sell_product");
const CLOSE_ACCOUNT: Layout =
    Layout::new(RecordKind::Instruction, &[OPCODE]).named("close_account");
const CLOSE_PRODUCT_ACCOUNT: Layout =
    Layout::new(RecordKind::Instruction, &[OPCODE, PRODUCT_ID]).named("close_product_account");

/// An operation of the store program with its operands.
///
/// String operands are [`FixedString`](crate::codec::FixedString)s, so the
/// 32/128-byte widths hold by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreInstruction {
    /// Create the store state. Some revisions take the store PDA's bump.
    Initialize { bump: Option<u8> },
    AddProduct {
        name: ProductName,
        description: ProductDescription,
        price: u64,
        stock: u64,
    },
    UpdatePrice { new_price: u64 },
    /// Buy from a single-product store.
    Sell { quantity: u64 },
    /// Buy one product from a catalog store.
    SellProduct { product_id: u64, quantity: u64 },
    CloseAccount,
    CloseProductAccount { product_id: u64 },
}

impl StoreInstruction {
    pub fn add_product(name: &str, description: &str, price: u64, stock: u64) -> Self {
        Self::AddProduct {
            name: ProductName::new(name),
            description: ProductDescription::new(description),
            price,
            stock,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.operation().name()
    }

    const fn layout(&self) -> Layout {
        match self {
            Self::Initialize { bump: None } => INITIALIZE,
            Self::Initialize { bump: Some(_) } => INITIALIZE_WITH_BUMP,
            Self::AddProduct { .. } => ADD_PRODUCT,
            Self::UpdatePrice { .. } => UPDATE_PRICE,
            Self::Sell { .. } => SELL,
            Self::SellProduct { .. } => SELL_PRODUCT,
            Self::CloseAccount => CLOSE_ACCOUNT,
            Self::CloseProductAccount { .. } => CLOSE_PRODUCT_ACCOUNT,
        }
    }

    pub const fn operation(&self) -> Operation {
        match self {
            Self::Initialize { .. } => Operation::Initialize,
            Self::AddProduct { .. } => Operation::AddProduct,
            Self::UpdatePrice { .. } => Operation::UpdatePrice,
            Self::Sell { .. } => Operation::Sell,
            Self::SellProduct { .. } => Operation::SellProduct,
            Self::CloseAccount => Operation::CloseAccount,
            Self::CloseProductAccount { .. } => Operation::CloseProductAccount,
        }
    }

    pub const fn opcode(&self, table: &OpcodeTable) -> u8 {
        table.opcode(self.operation())
    }

    /// Build the exact-length payload for this instruction.
    pub fn encode(&self, table: &OpcodeTable) -> Result<Vec<u8>, CodecError> {
        let mut w = self.layout().writer();
        w.u8(&OPCODE, self.opcode(table))?;
        match self {
            Self::Initialize { bump } => {
                if let Some(bump) = bump {
                    w.u8(&BUMP, *bump)?;
                }
            }
            Self::AddProduct {
                name,
                description,
                price,
                stock,
            } => {
                w.bytes(&NAME, name.as_bytes())?
                    .bytes(&DESCRIPTION, description.as_bytes())?
                    .u64(&PRICE, *price)?
                    .u64(&STOCK, *stock)?;
            }
            Self::UpdatePrice { new_price } => {
                w.u64(&NEW_PRICE, *new_price)?;
            }
            Self::Sell { quantity } => {
                w.u64(&QUANTITY, *quantity)?;
            }
            Self::SellProduct {
                product_id,
                quantity,
            } => {
                w.u64(&PRODUCT_ID, *product_id)?
                    .u64(&PRODUCT_QUANTITY, *quantity)?;
            }
            Self::CloseAccount => {}
            Self::CloseProductAccount { product_id } => {
                w.u64(&PRODUCT_ID, *product_id)?;
            }
        }
        let payload = w.into_bytes();
        trace!(instruction = self.name(), len = payload.len(), "encoded instruction");
        Ok(payload)
    }

    /// Parse a payload back into an instruction using `table` to resolve
    /// the opcode.
    pub fn decode(payload: &[u8], table: &OpcodeTable) -> Result<Self, CodecError> {
        let opcode = *payload.first().ok_or(CodecError::EmptyPayload)?;
        let operation = table
            .lookup(opcode)
            .ok_or(CodecError::UnknownOpcode(opcode))?;
        let instruction = match operation {
            Operation::Initialize => {
                if payload.len() == INITIALIZE.len {
                    Self::Initialize { bump: None }
                } else {
                    let r = INITIALIZE_WITH_BUMP.reader(payload)?;
                    Self::Initialize {
                        bump: Some(r.u8(&BUMP)?),
                    }
                }
            }
            Operation::AddProduct => {
                let r = ADD_PRODUCT.reader(payload)?;
                Self::AddProduct {
                    name: ProductName::from_bytes(r.array(&NAME)?),
                    description: ProductDescription::from_bytes(r.array(&DESCRIPTION)?),
                    price: r.u64(&PRICE)?,
                    stock: r.u64(&STOCK)?,
                }
            }
            Operation::UpdatePrice => Self::UpdatePrice {
                new_price: UPDATE_PRICE.reader(payload)?.u64(&NEW_PRICE)?,
            },
            Operation::Sell => Self::Sell {
                quantity: SELL.reader(payload)?.u64(&QUANTITY)?,
            },
            Operation::SellProduct => {
                let r = SELL_PRODUCT.reader(payload)?;
                Self::SellProduct {
                    product_id: r.u64(&PRODUCT_ID)?,
                    quantity: r.u64(&PRODUCT_QUANTITY)?,
                }
            }
            Operation::CloseAccount => {
                CLOSE_ACCOUNT.check(payload)?;
                Self::CloseAccount
            }
            Operation::CloseProductAccount => Self::CloseProductAccount {
                product_id: CLOSE_PRODUCT_ACCOUNT.reader(payload)?.u64(&PRODUCT_ID)?,
            },
        };
        Ok(instruction)
    }
}

impl fmt::Display for StoreInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initialize { bump: None } => write!(f, "initialize"),
            Self::Initialize { bump: Some(b) } => write!(f, "initialize bump={b}"),
            Self::AddProduct {
                name,
                description,
                price,
                stock,
            } => write!(
                f,
                "add_product name=\"{name}\" description=\"{description}\" price={price} stock={stock}"
            ),
            Self::UpdatePrice { new_price } => write!(f, "update_price new_price={new_price}"),
            Self::Sell { quantity } => write!(f, "sell quantity={quantity}"),
            Self::SellProduct {
                product_id,
                quantity,
            } => write!(f, "sell_product product_id={product_id} quantity={quantity}"),
            Self::CloseAccount => write!(f, "close_account"),
            Self::CloseProductAccount { product_id } => {
                write!(f, "close_product_account product_id={product_id}")
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    const CATALOG: OpcodeTable = OpcodeTable::CATALOG_STORE;

    #[test]
    fn test_sell_product_bytes() {
        let payload = StoreInstruction::SellProduct {
            product_id: 3,
            quantity: 5,
        }
        .encode(&CATALOG)
        .unwrap();
        let mut expected = vec![4];
        expected.extend_from_slice(&3u64.to_le_bytes());
        expected.extend_from_slice(&5u64.to_le_bytes());
        assert_eq!(payload.len(), 17);
        assert_eq!(payload, expected);
    }

    #[test]
    fn test_initialize_with_and_without_bump() {
        let plain = StoreInstruction::Initialize { bump: None };
        let bumped = StoreInstruction::Initialize { bump: Some(255) };
        assert_eq!(plain.encode(&CATALOG).unwrap(), vec![0]);
        assert_eq!(bumped.encode(&CATALOG).unwrap(), vec![0, 255]);
        assert_eq!(StoreInstruction::decode(&[0], &CATALOG).unwrap(), plain);
        assert_eq!(StoreInstruction::decode(&[0, 255], &CATALOG).unwrap(), bumped);
    }

    #[test]
    fn test_add_product_layout() {
        let payload = StoreInstruction::add_product("Bolo", "Chocolate", 1_500_000, 42)
            .encode(&CATALOG)
            .unwrap();
        assert_eq!(payload.len(), 177);
        assert_eq!(payload[0], 1);
        assert_eq!(&payload[1..5], b"Bolo");
        assert!(payload[5..33].iter().all(|b| *b == 0));
        assert_eq!(&payload[33..42], b"Chocolate");
        assert_eq!(&payload[161..169], &1_500_000u64.to_le_bytes());
        assert_eq!(&payload[169..177], &42u64.to_le_bytes());
    }

    #[test]
    fn test_close_account_follows_table() {
        let close = StoreInstruction::CloseAccount;
        assert_eq!(close.encode(&OpcodeTable::SINGLE_STORE).unwrap(), vec![5]);
        assert_eq!(close.encode(&CATALOG).unwrap(), vec![6]);
    }

    #[test]
    fn test_close_product_account() {
        let payload = StoreInstruction::CloseProductAccount { product_id: 1 }
            .encode(&CATALOG)
            .unwrap();
        assert_eq!(payload, vec![7, 1, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(
            StoreInstruction::decode(&[], &CATALOG),
            Err(CodecError::EmptyPayload)
        );
        assert_eq!(
            StoreInstruction::decode(&[5], &CATALOG),
            Err(CodecError::UnknownOpcode(5))
        );
        let err = StoreInstruction::decode(&[4, 1, 0, 0], &CATALOG).unwrap_err();
        assert_eq!(err.missing_field(), Some("product_id"));
    }

    #[test]
    fn test_display() {
        let ix = StoreInstruction::SellProduct {
            product_id: 2,
            quantity: 1,
        };
        assert_eq!(ix.to_string(), "sell_product product_id=2 quantity=1");
        assert_eq!(ix.name(), "sell_product");
    }
}
