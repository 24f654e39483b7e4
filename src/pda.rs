//! Program-derived addresses for store accounts.
//!
//! The bump search is the ecosystem primitive
//! ([`Address::try_find_program_address`]). What this module owns is the seed
//! layout of each account: tag strings, component order and integer byte
//! order. A wrong byte here silently points every read and write at an
//! account that does not exist.

use std::fmt;

use crate::codec::CodecError;
use crate::logging::{debug, error};
use crate::Address;

/// Seed tag for product accounts.
pub const PRODUCT_SEED: &[u8] = b"product";
/// Seed tag for purchase history accounts.
pub const HISTORY_SEED: &[u8] = b"history";
/// Seed tag for token metadata accounts.
pub const METADATA_SEED: &[u8] = b"metadata";

/// Token Metadata program (`metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s`).
pub const TOKEN_METADATA_PROGRAM_ID: Address =
    solana_pubkey::pubkey!("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");

/// An address found by bump search, with the bump that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DerivedAddress {
    pub address: Address,
    pub bump: u8,
}

impl fmt::Display for DerivedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (bump {})", self.address, self.bump)
    }
}

/// Derive a program address from raw seed components.
///
/// Returns [`CodecError::AddressDerivationExhausted`] when no bump yields a
/// valid address. Retrying with the same seeds cannot succeed.
pub fn derive_address(program: &Address, seeds: &[&[u8]]) -> Result<DerivedAddress, CodecError> {
    match Address::try_find_program_address(seeds, program) {
        Some((address, bump)) => {
            debug!(%program, %address, bump, "derived program address");
            Ok(DerivedAddress { address, bump })
        }
        None => {
            error!(%program, seeds = seeds.len(), "no bump yields a program address");
            Err(CodecError::AddressDerivationExhausted {
                seeds: seeds.iter().map(|s| s.to_vec()).collect(),
            })
        }
    }
}

/// The seed layouts used by the store program and its satellites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountSeeds {
    /// `["product", product_id u64 LE]`
    Product { product_id: u64 },
    /// `["history", buyer, product_id u64 LE, history_index u64 LE]`
    History {
        buyer: Address,
        product_id: u64,
        history_index: u64,
    },
    /// `["metadata", metadata_program, mint]`, derived against the token
    /// metadata program rather than the store program.
    TokenMetadata { mint: Address },
}

impl AccountSeeds {
    /// Encoded seed components, in order.
    pub fn components(&self) -> Vec<Vec<u8>> {
        match self {
            Self::Product { product_id } => {
                vec![PRODUCT_SEED.to_vec(), product_id.to_le_bytes().to_vec()]
            }
            Self::History {
                buyer,
                product_id,
                history_index,
            } => vec![
                HISTORY_SEED.to_vec(),
                buyer.to_bytes().to_vec(),
                product_id.to_le_bytes().to_vec(),
                history_index.to_le_bytes().to_vec(),
            ],
            Self::TokenMetadata { mint } => vec![
                METADATA_SEED.to_vec(),
                TOKEN_METADATA_PROGRAM_ID.to_bytes().to_vec(),
                mint.to_bytes().to_vec(),
            ],
        }
    }

    /// The program these seeds are derived against.
    ///
    /// Store accounts use `store_program`; metadata accounts always use the
    /// token metadata program.
    pub fn program<'a>(&self, store_program: &'a Address) -> &'a Address {
        match self {
            Self::TokenMetadata { .. } => &TOKEN_METADATA_PROGRAM_ID,
            _ => store_program,
        }
    }

    pub fn derive(&self, store_program: &Address) -> Result<DerivedAddress, CodecError> {
        let components = self.components();
        let seeds: Vec<&[u8]> = components.iter().map(Vec::as_slice).collect();
        derive_address(self.program(store_program), &seeds)
    }
}

/// Address of the product account with the given id.
pub fn product_address(program: &Address, product_id: u64) -> Result<DerivedAddress, CodecError> {
    AccountSeeds::Product { product_id }.derive(program)
}

/// Address of a purchase history account.
pub fn history_address(
    program: &Address,
    buyer: &Address,
    product_id: u64,
    history_index: u64,
) -> Result<DerivedAddress, CodecError> {
    AccountSeeds::History {
        buyer: *buyer,
        product_id,
        history_index,
    }
    .derive(program)
}

/// Metadata account of a token mint.
pub fn metadata_address(mint: &Address) -> Result<DerivedAddress, CodecError> {
    AccountSeeds::TokenMetadata { mint: *mint }.derive(&TOKEN_METADATA_PROGRAM_ID)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn program() -> Address {
        solana_pubkey::pubkey!("3FFzaQvjTsFJe9G4xPrFJEmFKbfm21R57C5jVX74YbWS")
    }

    #[test]
    fn test_product_seed_bytes() {
        let seeds = AccountSeeds::Product { product_id: 3 }.components();
        assert_eq!(seeds, vec![b"product".to_vec(), vec![3, 0, 0, 0, 0, 0, 0, 0]]);
    }

    #[test]
    fn test_history_seed_order() {
        let buyer = Address::new_from_array([1; 32]);
        let seeds = AccountSeeds::History {
            buyer,
            product_id: 2,
            history_index: 258,
        }
        .components();
        assert_eq!(seeds.len(), 4);
        assert_eq!(seeds[0], b"history");
        assert_eq!(seeds[1], vec![1; 32]);
        assert_eq!(seeds[2], 2u64.to_le_bytes());
        assert_eq!(seeds[3], vec![2, 1, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_product_derivation_is_deterministic() {
        let a = product_address(&program(), 3).unwrap();
        let b = product_address(&program(), 3).unwrap();
        assert_eq!(a, b);
        assert_ne!(a.address, product_address(&program(), 4).unwrap().address);
    }

    #[test]
    fn test_matches_raw_primitive() {
        let derived = product_address(&program(), 0).unwrap();
        let (address, bump) =
            Address::find_program_address(&[b"product", &0u64.to_le_bytes()], &program());
        assert_eq!(derived, DerivedAddress { address, bump });
    }

    #[test]
    fn test_metadata_uses_metadata_program() {
        let mint = Address::new_from_array([4; 32]);
        let seeds = AccountSeeds::TokenMetadata { mint };
        assert_eq!(seeds.program(&program()), &TOKEN_METADATA_PROGRAM_ID);
        assert_eq!(
            seeds.derive(&program()).unwrap(),
            metadata_address(&mint).unwrap()
        );
    }

    #[test]
    fn test_oversized_seed_exhausts() {
        // Seeds longer than 32 bytes never produce an address.
        let long = [0u8; 33];
        let err = derive_address(&program(), &[&long]).unwrap_err();
        assert!(matches!(err, CodecError::AddressDerivationExhausted { .. }));
    }
}
