//! Store state account.

use super::{CodecError, Field, Layout, RecordKind, StoreLayout};
use crate::logging::trace;
use crate::Address;

const SINGLE_STOCK: Field = Field::new("stock", 0, 8);
const SINGLE_PRICE: Field = Field::new("price", 8, 8);
const SINGLE_OWNER: Field = Field::new("owner", 16, 32);

const CATALOG_OWNER: Field = Field::new("owner", 0, 32);
const CATALOG_PRODUCT_COUNTER: Field = Field::new("product_counter", 32, 8);
const CATALOG_HISTORY_COUNTER: Field = Field::new("history_counter", 40, 8);

const SINGLE: Layout = Layout::new(
    RecordKind::StoreState,
    &[SINGLE_STOCK, SINGLE_PRICE, SINGLE_OWNER],
);

const CATALOG: Layout = Layout::new(
    RecordKind::StoreState,
    &[CATALOG_OWNER, CATALOG_PRODUCT_COUNTER, CATALOG_HISTORY_COUNTER],
);

/// Decoded store state.
///
/// Fields a layout does not carry are `None`. A zero counter and an absent
/// counter are different things and stay different.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreState {
    pub layout: StoreLayout,
    pub owner: Address,
    /// Units in stock (single-product store only).
    pub stock: Option<u64>,
    /// Unit price in the token's smallest unit (single-product store only).
    pub price: Option<u64>,
    /// Number of products ever added (catalog store only).
    pub product_counter: Option<u64>,
    /// Number of purchases ever recorded (catalog store only).
    pub history_counter: Option<u64>,
}

impl StoreState {
    pub const fn len(layout: StoreLayout) -> usize {
        Self::layout_of(layout).len
    }

    const fn layout_of(layout: StoreLayout) -> Layout {
        match layout {
            StoreLayout::Single => SINGLE,
            StoreLayout::Catalog => CATALOG,
        }
    }

    pub fn single(owner: Address, stock: u64, price: u64) -> Self {
        Self {
            layout: StoreLayout::Single,
            owner,
            stock: Some(stock),
            price: Some(price),
            product_counter: None,
            history_counter: None,
        }
    }

    pub fn catalog(owner: Address, product_counter: u64, history_counter: u64) -> Self {
        Self {
            layout: StoreLayout::Catalog,
            owner,
            stock: None,
            price: None,
            product_counter: Some(product_counter),
            history_counter: Some(history_counter),
        }
    }

    /// Decode store state bytes under the given layout.
    pub fn decode(bytes: &[u8], layout: StoreLayout) -> Result<Self, CodecError> {
        trace!(len = bytes.len(), %layout, "decoding store state");
        let r = Self::layout_of(layout).reader(bytes)?;
        let state = match layout {
            StoreLayout::Single => Self::single(
                r.address(&SINGLE_OWNER)?,
                r.u64(&SINGLE_STOCK)?,
                r.u64(&SINGLE_PRICE)?,
            ),
            StoreLayout::Catalog => Self::catalog(
                r.address(&CATALOG_OWNER)?,
                r.u64(&CATALOG_PRODUCT_COUNTER)?,
                r.u64(&CATALOG_HISTORY_COUNTER)?,
            ),
        };
        Ok(state)
    }

    /// Encode back to account bytes.
    ///
    /// A field required by the layout but set to `None` is an
    /// [`CodecError::EncodingInvariantViolation`].
    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        let mut w = Self::layout_of(self.layout).writer();
        match self.layout {
            StoreLayout::Single => {
                w.u64(&SINGLE_STOCK, required(self.stock, &SINGLE_STOCK)?)?
                    .u64(&SINGLE_PRICE, required(self.price, &SINGLE_PRICE)?)?
                    .address(&SINGLE_OWNER, &self.owner)?;
            }
            StoreLayout::Catalog => {
                w.address(&CATALOG_OWNER, &self.owner)?
                    .u64(
                        &CATALOG_PRODUCT_COUNTER,
                        required(self.product_counter, &CATALOG_PRODUCT_COUNTER)?,
                    )?
                    .u64(
                        &CATALOG_HISTORY_COUNTER,
                        required(self.history_counter, &CATALOG_HISTORY_COUNTER)?,
                    )?;
            }
        }
        Ok(w.into_bytes())
    }

    /// Products created so far, read from the catalog layout's counter at
    /// offset 32.
    pub fn product_counter(&self) -> Option<u64> {
        self.product_counter
    }

    /// Purchases recorded so far, read from the catalog layout's counter at
    /// offset 40.
    pub fn history_counter(&self) -> Option<u64> {
        self.history_counter
    }
}

fn required(value: Option<u64>, field: &Field) -> Result<u64, CodecError> {
    value.ok_or(CodecError::EncodingInvariantViolation {
        context: "store state",
        field: field.name,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn owner() -> Address {
        Address::new_from_array([9; 32])
    }

    #[test]
    fn test_single_roundtrip() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&10u64.to_le_bytes());
        bytes.extend_from_slice(&2_500_000u64.to_le_bytes());
        bytes.extend_from_slice(&[9; 32]);
        assert_eq!(bytes.len(), 48);

        let state = StoreState::decode(&bytes, StoreLayout::Single).unwrap();
        assert_eq!(state.stock, Some(10));
        assert_eq!(state.price, Some(2_500_000));
        assert_eq!(state.owner, owner());
        assert_eq!(state.product_counter(), None);
        assert_eq!(state.encode().unwrap(), bytes);
    }

    #[test]
    fn test_catalog_counters() {
        let state = StoreState::catalog(owner(), 3, 0);
        let bytes = state.encode().unwrap();
        assert_eq!(&bytes[32..40], &3u64.to_le_bytes());
        assert_eq!(&bytes[40..48], &0u64.to_le_bytes());

        let decoded = StoreState::decode(&bytes, StoreLayout::Catalog).unwrap();
        assert_eq!(decoded.product_counter(), Some(3));
        // Zero is a real value, not an absent one.
        assert_eq!(decoded.history_counter(), Some(0));
        assert_eq!(decoded.stock, None);
    }

    #[test]
    fn test_same_length_different_layout() {
        assert_eq!(StoreState::len(StoreLayout::Single), 48);
        assert_eq!(StoreState::len(StoreLayout::Catalog), 48);

        let bytes = StoreState::catalog(owner(), 1, 2).encode().unwrap();
        let as_single = StoreState::decode(&bytes, StoreLayout::Single).unwrap();
        assert_ne!(as_single.owner, owner());
    }

    #[test]
    fn test_short_buffer_names_counter() {
        let err = StoreState::decode(&[0u8; 39], StoreLayout::Catalog).unwrap_err();
        assert_eq!(
            err,
            CodecError::LayoutMismatch {
                kind: RecordKind::StoreState,
                expected: 48,
                actual: 39,
                field: Some("product_counter"),
            }
        );
    }

    #[test]
    fn test_long_buffer_rejected() {
        let err = StoreState::decode(&[0u8; 56], StoreLayout::Catalog).unwrap_err();
        assert!(err.is_layout_mismatch());
        assert_eq!(err.missing_field(), None);
    }

    #[test]
    fn test_encode_missing_field() {
        let mut state = StoreState::single(owner(), 1, 1);
        state.price = None;
        assert!(matches!(
            state.encode(),
            Err(CodecError::EncodingInvariantViolation { field: "price", .. })
        ));
    }
}
