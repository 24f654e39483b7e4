//! NUL-padded fixed-width string fields.

use std::fmt;
use std::str::Utf8Error;

/// A UTF-8 string stored in exactly `N` bytes.
///
/// Construction truncates the input's UTF-8 bytes to `N` or right-pads them
/// with `0x00`. Because the width is part of the type, a string field of the
/// wrong width cannot reach an encoder.
///
/// Truncation is byte-wise and may split a multi-byte character; such a
/// value fails to decode back with [`FixedString::to_str`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedString<const N: usize>([u8; N]);

impl<const N: usize> FixedString<N> {
    pub const WIDTH: usize = N;

    /// Truncate or NUL-pad `s` to exactly `N` bytes.
    pub fn new(s: &str) -> Self {
        let mut buf = [0u8; N];
        for (slot, byte) in buf.iter_mut().zip(s.as_bytes()) {
            *slot = *byte;
        }
        Self(buf)
    }

    pub const fn from_bytes(bytes: [u8; N]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }

    /// Decode the full `N` bytes as UTF-8, then strip the trailing run of NULs.
    ///
    /// Interior NULs are kept verbatim.
    pub fn to_str(&self) -> Result<&str, Utf8Error> {
        std::str::from_utf8(&self.0).map(|s| s.trim_end_matches('\0'))
    }
}

impl<const N: usize> Default for FixedString<N> {
    fn default() -> Self {
        Self([0u8; N])
    }
}

impl<const N: usize> From<&str> for FixedString<N> {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl<const N: usize> fmt::Debug for FixedString<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_str() {
            Ok(s) => write!(f, "FixedString<{N}>({s:?})"),
            Err(_) => write!(f, "FixedString<{N}>(0x{})", hex::encode(self.0)),
        }
    }
}

impl<const N: usize> fmt::Display for FixedString<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_str() {
            Ok(s) => f.write_str(s),
            Err(_) => write!(f, "0x{}", hex::encode(self.0)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_pad() {
        let s = FixedString::<8>::new("bolo");
        assert_eq!(s.as_bytes(), b"bolo\0\0\0\0");
        assert_eq!(s.to_str().unwrap(), "bolo");
    }

    #[test]
    fn test_truncate_without_padding() {
        let s = FixedString::<4>::new("chocolate");
        assert_eq!(s.as_bytes(), b"choc");
        assert_eq!(s.to_str().unwrap(), "choc");
    }

    #[test]
    fn test_exact_width() {
        let s = FixedString::<4>::new("cake");
        assert_eq!(s.as_bytes(), b"cake");
    }

    #[test]
    fn test_interior_nul_preserved() {
        let s = FixedString::<8>::from_bytes(*b"a\0b\0\0\0\0\0");
        assert_eq!(s.to_str().unwrap(), "a\0b");
    }

    #[test]
    fn test_split_multibyte_fails_to_decode() {
        // "é" is two bytes; cutting after the first leaves invalid UTF-8.
        let s = FixedString::<2>::new("aé");
        assert!(s.to_str().is_err());
        assert!(format!("{s:?}").contains("0x"));
    }

    #[test]
    fn test_empty() {
        let s = FixedString::<32>::default();
        assert_eq!(s.to_str().unwrap(), "");
    }
}
