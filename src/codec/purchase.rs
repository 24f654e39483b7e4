//! Purchase history record.

use super::{CodecError, Field, Layout, PurchaseLayout, RecordKind};
use crate::logging::trace;
use crate::Address;

const V1_PRODUCT_ID: Field = Field::new("product_id", 0, 1);
const V1_QUANTITY: Field = Field::new("quantity", 1, 8);
const V1_TOTAL_PRICE: Field = Field::new("total_price", 9, 8);
const V1_BUYER: Field = Field::new("buyer", 17, 32);
const V1_TIMESTAMP: Field = Field::new("timestamp", 49, 8);

const V2_PRODUCT_ID: Field = Field::new("product_id", 0, 8);
const V2_QUANTITY: Field = Field::new("quantity", 8, 8);
const V2_TOTAL_PRICE: Field = Field::new("total_price", 16, 8);
const V2_BUYER: Field = Field::new("buyer", 24, 32);
const V2_TIMESTAMP: Field = Field::new("timestamp", 56, 8);
/// Trailing byte allocated by the program. Ignored on decode, written as zero.
const V2_PADDING: Field = Field::new("padding", 64, 1);

const V1: Layout = Layout::new(
    RecordKind::PurchaseRecord,
    &[V1_PRODUCT_ID, V1_QUANTITY, V1_TOTAL_PRICE, V1_BUYER, V1_TIMESTAMP],
);

const V2: Layout = Layout::new(
    RecordKind::PurchaseRecord,
    &[
        V2_PRODUCT_ID,
        V2_QUANTITY,
        V2_TOTAL_PRICE,
        V2_BUYER,
        V2_TIMESTAMP,
        V2_PADDING,
    ],
);

/// Field slots for one purchase layout.
struct Slots {
    layout: Layout,
    product_id: Field,
    quantity: Field,
    total_price: Field,
    buyer: Field,
    timestamp: Field,
}

const fn slots(layout: PurchaseLayout) -> Slots {
    match layout {
        PurchaseLayout::V1 => Slots {
            layout: V1,
            product_id: V1_PRODUCT_ID,
            quantity: V1_QUANTITY,
            total_price: V1_TOTAL_PRICE,
            buyer: V1_BUYER,
            timestamp: V1_TIMESTAMP,
        },
        PurchaseLayout::V2 => Slots {
            layout: V2,
            product_id: V2_PRODUCT_ID,
            quantity: V2_QUANTITY,
            total_price: V2_TOTAL_PRICE,
            buyer: V2_BUYER,
            timestamp: V2_TIMESTAMP,
        },
    }
}

/// One purchase, written by the program when a sale succeeds.
///
/// `product_id` is widened to `u64` for both layouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseRecord {
    pub product_id: u64,
    pub quantity: u64,
    pub total_price: u64,
    pub buyer: Address,
    /// Unix timestamp recorded by the program. Used for display ordering.
    pub timestamp: i64,
}

impl PurchaseRecord {
    pub const fn len(layout: PurchaseLayout) -> usize {
        slots(layout).layout.len
    }

    pub fn decode(bytes: &[u8], layout: PurchaseLayout) -> Result<Self, CodecError> {
        trace!(len = bytes.len(), %layout, "decoding purchase record");
        let s = slots(layout);
        let r = s.layout.reader(bytes)?;
        let product_id = match layout {
            PurchaseLayout::V1 => u64::from(r.u8(&s.product_id)?),
            PurchaseLayout::V2 => r.u64(&s.product_id)?,
        };
        Ok(Self {
            product_id,
            quantity: r.u64(&s.quantity)?,
            total_price: r.u64(&s.total_price)?,
            buyer: r.address(&s.buyer)?,
            timestamp: r.i64(&s.timestamp)?,
        })
    }

    /// Decode a record whose layout is identified by its length.
    ///
    /// Purchase layouts have distinct lengths, so unlike store state this
    /// is unambiguous. Any other length is reported against the latest
    /// layout.
    pub fn decode_any(bytes: &[u8]) -> Result<(PurchaseLayout, Self), CodecError> {
        let layout = PurchaseLayout::ALL
            .into_iter()
            .find(|l| Self::len(*l) == bytes.len())
            .unwrap_or(PurchaseLayout::LATEST);
        Self::decode(bytes, layout).map(|record| (layout, record))
    }

    /// Encode under the given layout.
    ///
    /// A `product_id` above 255 cannot be written in the V1 layout and is
    /// reported as [`CodecError::EncodingInvariantViolation`].
    pub fn encode(&self, layout: PurchaseLayout) -> Result<Vec<u8>, CodecError> {
        let s = slots(layout);
        let mut w = s.layout.writer();
        match layout {
            PurchaseLayout::V1 => {
                let id = u8::try_from(self.product_id).map_err(|_| {
                    CodecError::EncodingInvariantViolation {
                        context: "purchase record v1",
                        field: "product_id",
                    }
                })?;
                w.u8(&s.product_id, id)?;
            }
            PurchaseLayout::V2 => {
                w.u64(&s.product_id, self.product_id)?;
            }
        }
        w.u64(&s.quantity, self.quantity)?
            .u64(&s.total_price, self.total_price)?
            .address(&s.buyer, &self.buyer)?
            .i64(&s.timestamp, self.timestamp)?;
        Ok(w.into_bytes())
    }
}
