//! Product account (catalog store).

use super::{CodecError, Field, FixedString, Layout, RecordKind};
use crate::logging::trace;

pub type ProductName = FixedString<32>;
pub type ProductDescription = FixedString<128>;

const ID: Field = Field::new("id", 0, 8);
const NAME: Field = Field::new("name", 8, 32);
const DESCRIPTION: Field = Field::new("description", 40, 128);
const PRICE: Field = Field::new("price", 168, 8);
const STOCK: Field = Field::new("stock", 176, 8);

const LAYOUT: Layout = Layout::new(RecordKind::Product, &[ID, NAME, DESCRIPTION, PRICE, STOCK]);

/// A product record as stored in its program-derived account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    /// Sequential id assigned by the program, starting at 0.
    pub id: u64,
    pub name: String,
    pub description: String,
    /// Price in the token's smallest unit (micro-USDT for a 6-decimal mint).
    pub price: u64,
    pub stock: u64,
}

impl Product {
    pub const LEN: usize = LAYOUT.len;

    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        trace!(len = bytes.len(), "decoding product");
        let r = LAYOUT.reader(bytes)?;
        Ok(Self {
            id: r.u64(&ID)?,
            name: r.string::<32>(&NAME)?,
            description: r.string::<128>(&DESCRIPTION)?,
            price: r.u64(&PRICE)?,
            stock: r.u64(&STOCK)?,
        })
    }

    /// Encode to account bytes, truncating or padding the string fields.
    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        let mut w = LAYOUT.writer();
        w.u64(&ID, self.id)?
            .bytes(&NAME, ProductName::new(&self.name).as_bytes())?
            .bytes(&DESCRIPTION, ProductDescription::new(&self.description).as_bytes())?
            .u64(&PRICE, self.price)?
            .u64(&STOCK, self.stock)?;
        Ok(w.into_bytes())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_len() {
        assert_eq!(Product::LEN, 184);
    }

    #[test]
    fn test_invalid_utf8_name() {
        let mut bytes = Product {
            id: 0,
            name: "x".into(),
            description: String::new(),
            price: 0,
            stock: 0,
        }
        .encode()
        .unwrap();
        bytes[8] = 0xff;

        let err = Product::decode(&bytes).unwrap_err();
        assert!(matches!(
            err,
            CodecError::FieldDecode {
                kind: RecordKind::Product,
                field: "name",
                ..
            }
        ));
    }

    #[test]
    fn test_short_product_names_stock() {
        let err = Product::decode(&[0u8; 180]).unwrap_err();
        assert_eq!(err.missing_field(), Some("stock"));
    }
}
