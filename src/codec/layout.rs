//! Layout versions for on-chain account records.
//!
//! The store program changed its account layouts across deployments. Two
//! store layouts share the same 48-byte length, so the version is always an
//! explicit argument to decoding and never sniffed from the byte count.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Layout of the store state account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StoreLayout {
    /// Single-product store: `stock`, `price`, `owner`.
    Single,
    /// Catalog store: `owner`, `product_counter`, `history_counter`.
    #[default]
    Catalog,
}

/// Layout of a purchase history record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PurchaseLayout {
    /// 57 bytes, one-byte product id.
    V1,
    /// 65 bytes, eight-byte product id.
    #[default]
    V2,
}

/// Error returned when a layout name cannot be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {what} layout '{name}'")]
pub struct ParseLayoutError {
    what: &'static str,
    name: String,
}

impl StoreLayout {
    pub const ALL: [Self; 2] = [Self::Single, Self::Catalog];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Catalog => "catalog",
        }
    }
}

impl PurchaseLayout {
    pub const ALL: [Self; 2] = [Self::V1, Self::V2];

    /// The most recent layout known to this crate.
    pub const LATEST: Self = Self::V2;

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::V1 => "v1",
            Self::V2 => "v2",
        }
    }
}

impl FromStr for StoreLayout {
    type Err = ParseLayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "single" | "v1" => Ok(Self::Single),
            "catalog" | "v2" => Ok(Self::Catalog),
            _ => Err(ParseLayoutError {
                what: "store",
                name: s.to_string(),
            }),
        }
    }
}

impl FromStr for PurchaseLayout {
    type Err = ParseLayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "v1" | "1" => Ok(Self::V1),
            "v2" | "2" | "latest" => Ok(Self::V2),
            _ => Err(ParseLayoutError {
                what: "purchase",
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for StoreLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PurchaseLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("catalog".parse(), Ok(StoreLayout::Catalog));
        assert_eq!("Single".parse(), Ok(StoreLayout::Single));
        assert_eq!("v1".parse(), Ok(PurchaseLayout::V1));
        assert_eq!("latest".parse(), Ok(PurchaseLayout::V2));
        assert!("v3".parse::<PurchaseLayout>().is_err());
        assert!("multi".parse::<StoreLayout>().is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        for layout in StoreLayout::ALL {
            assert_eq!(layout.to_string().parse(), Ok(layout));
        }
        for layout in PurchaseLayout::ALL {
            assert_eq!(layout.to_string().parse(), Ok(layout));
        }
    }

    #[test]
    fn test_defaults_are_latest() {
        assert_eq!(StoreLayout::default(), StoreLayout::Catalog);
        assert_eq!(PurchaseLayout::default(), PurchaseLayout::LATEST);
    }
}
