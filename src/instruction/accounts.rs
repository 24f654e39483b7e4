//! Complete instructions: program id, ordered account list and payload.
//!
//! Account order and flags match what the deployed program reads; getting
//! either wrong makes the program reject the transaction.

use super::{OpcodeTable, ProgramRevision, StoreInstruction};
use crate::codec::{CodecError, Product, PurchaseLayout, StoreLayout};
use crate::logging::debug;
use crate::pda;
use crate::Address;

pub const SYSTEM_PROGRAM_ID: Address =
    solana_pubkey::pubkey!("11111111111111111111111111111111");

pub const TOKEN_PROGRAM_ID: Address =
    solana_pubkey::pubkey!("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA");

/// One account reference of an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountMeta {
    pub address: Address,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    pub const fn writable(address: Address) -> Self {
        Self {
            address,
            is_signer: false,
            is_writable: true,
        }
    }

    pub const fn readonly(address: Address) -> Self {
        Self {
            address,
            is_signer: false,
            is_writable: false,
        }
    }

    pub const fn signer(self) -> Self {
        Self {
            is_signer: true,
            ..self
        }
    }
}

/// An instruction ready to be placed in a transaction and signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub program_id: Address,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

impl Instruction {
    /// Addresses that must sign the transaction.
    pub fn signers(&self) -> impl Iterator<Item = &Address> {
        self.accounts
            .iter()
            .filter(|meta| meta.is_signer)
            .map(|meta| &meta.address)
    }
}

/// Buyer-side accounts of a purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentAccounts {
    pub buyer: Address,
    /// Buyer's token account the price is debited from.
    pub buyer_token: Address,
    /// Store owner's token account the price is credited to.
    pub owner_token: Address,
}

/// A deployed store program: its id, revision, opcode table and account
/// layouts.
///
/// The revision selects account orders that differ between deployments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreProgram {
    pub program_id: Address,
    pub revision: ProgramRevision,
    pub opcodes: OpcodeTable,
    pub store_layout: StoreLayout,
    pub purchase_layout: PurchaseLayout,
}

impl StoreProgram {
    pub const fn new(program_id: Address, revision: ProgramRevision) -> Self {
        Self {
            program_id,
            revision,
            opcodes: revision.opcodes(),
            store_layout: revision.store_layout(),
            purchase_layout: revision.purchase_layout(),
        }
    }

    pub const fn with_opcodes(self, opcodes: OpcodeTable) -> Self {
        Self { opcodes, ..self }
    }

    fn build(
        &self,
        instruction: &StoreInstruction,
        accounts: Vec<AccountMeta>,
    ) -> Result<Instruction, CodecError> {
        let data = instruction.encode(&self.opcodes)?;
        debug!(
            program = %self.program_id,
            instruction = instruction.name(),
            accounts = accounts.len(),
            "built instruction"
        );
        Ok(Instruction {
            program_id: self.program_id,
            accounts,
            data,
        })
    }

    pub fn product_address(&self, product_id: u64) -> Result<Address, CodecError> {
        Ok(pda::product_address(&self.program_id, product_id)?.address)
    }

    pub fn history_address(
        &self,
        buyer: &Address,
        product_id: u64,
        history_index: u64,
    ) -> Result<Address, CodecError> {
        Ok(pda::history_address(&self.program_id, buyer, product_id, history_index)?.address)
    }

    /// Single-product store: `[owner (w), store (w), payer (s)]`
    ///
    /// Catalog store: `[store (w), owner, payer (s, w), system_program]`
    pub fn initialize(
        &self,
        store: &Address,
        owner: &Address,
        payer: &Address,
        bump: Option<u8>,
    ) -> Result<Instruction, CodecError> {
        let accounts = match self.revision {
            ProgramRevision::Single => vec![
                AccountMeta::writable(*owner),
                AccountMeta::writable(*store),
                AccountMeta::readonly(*payer).signer(),
            ],
            ProgramRevision::Catalog => vec![
                AccountMeta::writable(*store),
                AccountMeta::readonly(*owner),
                AccountMeta::writable(*payer).signer(),
                AccountMeta::readonly(SYSTEM_PROGRAM_ID),
            ],
        };
        self.build(&StoreInstruction::Initialize { bump }, accounts)
    }

    /// `[store (w), product (w), owner (s, w), system_program]`
    ///
    /// `product.id` must be the store's current product counter; the
    /// program assigns ids sequentially and derives the account from it.
    pub fn add_product(
        &self,
        store: &Address,
        owner: &Address,
        product: &Product,
    ) -> Result<Instruction, CodecError> {
        let product_account = self.product_address(product.id)?;
        self.build(
            &StoreInstruction::add_product(
                &product.name,
                &product.description,
                product.price,
                product.stock,
            ),
            vec![
                AccountMeta::writable(*store),
                AccountMeta::writable(product_account),
                AccountMeta::writable(*owner).signer(),
                AccountMeta::readonly(SYSTEM_PROGRAM_ID),
            ],
        )
    }

    /// `[store (w), owner (s)]`
    pub fn update_price(
        &self,
        store: &Address,
        owner: &Address,
        new_price: u64,
    ) -> Result<Instruction, CodecError> {
        self.build(
            &StoreInstruction::UpdatePrice { new_price },
            vec![
                AccountMeta::writable(*store),
                AccountMeta::readonly(*owner).signer(),
            ],
        )
    }

    /// Single-product purchase:
    /// `[owner (w), store (w), buyer (s, w), buyer_token (w), owner_token (w),
    /// token_program, system_program]`
    pub fn sell(
        &self,
        store: &Address,
        owner: &Address,
        payment: &PaymentAccounts,
        quantity: u64,
    ) -> Result<Instruction, CodecError> {
        self.build(
            &StoreInstruction::Sell { quantity },
            vec![
                AccountMeta::writable(*owner),
                AccountMeta::writable(*store),
                AccountMeta::writable(payment.buyer).signer(),
                AccountMeta::writable(payment.buyer_token),
                AccountMeta::writable(payment.owner_token),
                AccountMeta::readonly(TOKEN_PROGRAM_ID),
                AccountMeta::readonly(SYSTEM_PROGRAM_ID),
            ],
        )
    }

    /// Catalog purchase:
    /// `[store (w), product (w), history (w), buyer (s, w), buyer_token (w),
    /// owner_token (w), token_program, system_program]`
    ///
    /// `history_index` must be the store's current history counter.
    pub fn sell_product(
        &self,
        store: &Address,
        payment: &PaymentAccounts,
        product_id: u64,
        history_index: u64,
        quantity: u64,
    ) -> Result<Instruction, CodecError> {
        let product_account = self.product_address(product_id)?;
        let history_account = self.history_address(&payment.buyer, product_id, history_index)?;
        self.build(
            &StoreInstruction::SellProduct {
                product_id,
                quantity,
            },
            vec![
                AccountMeta::writable(*store),
                AccountMeta::writable(product_account),
                AccountMeta::writable(history_account),
                AccountMeta::writable(payment.buyer).signer(),
                AccountMeta::writable(payment.buyer_token),
                AccountMeta::writable(payment.owner_token),
                AccountMeta::readonly(TOKEN_PROGRAM_ID),
                AccountMeta::readonly(SYSTEM_PROGRAM_ID),
            ],
        )
    }

    /// `[store (w), owner (s), system_program]`
    pub fn close_account(&self, store: &Address, owner: &Address) -> Result<Instruction, CodecError> {
        self.build(
            &StoreInstruction::CloseAccount,
            vec![
                AccountMeta::writable(*store),
                AccountMeta::readonly(*owner).signer(),
                AccountMeta::readonly(SYSTEM_PROGRAM_ID),
            ],
        )
    }

    /// `[store, product (w), owner (s, w), system_program]`
    pub fn close_product_account(
        &self,
        store: &Address,
        owner: &Address,
        product_id: u64,
    ) -> Result<Instruction, CodecError> {
        let product_account = self.product_address(product_id)?;
        self.build(
            &StoreInstruction::CloseProductAccount { product_id },
            vec![
                AccountMeta::readonly(*store),
                AccountMeta::writable(product_account),
                AccountMeta::writable(*owner).signer(),
                AccountMeta::readonly(SYSTEM_PROGRAM_ID),
            ],
        )
    }
}
