//! Buffer read/write helpers for fixed account layouts.
//!
//! Every record layout is a static table of [`Field`]s. Length checks,
//! reads and writes all go through the table so each offset is stated once.

use super::{CodecError, FixedString, RecordKind};
use crate::Address;

/// One named, fixed-width slot in a record layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub offset: usize,
    pub width: usize,
}

impl Field {
    pub const fn new(name: &'static str, offset: usize, width: usize) -> Self {
        Self { name, offset, width }
    }

    pub const fn end(&self) -> usize {
        self.offset + self.width
    }
}

/// A complete fixed-length record layout.
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    pub kind: RecordKind,
    /// Reported as the context of encoding faults.
    pub name: &'static str,
    pub fields: &'static [Field],
    pub len: usize,
}

impl Layout {
    #[allow(clippy::indexing_slicing)]
    pub const fn new(kind: RecordKind, fields: &'static [Field]) -> Self {
        let mut len = 0;
        let mut i = 0;
        while i < fields.len() {
            let end = fields[i].end();
            if end > len {
                len = end;
            }
            i += 1;
        }
        Self {
            kind,
            name: kind.name(),
            fields,
            len,
        }
    }

    pub const fn named(self, name: &'static str) -> Self {
        Self { name, ..self }
    }

    /// Require `bytes` to be exactly this layout's length.
    ///
    /// A short buffer reports the first field (by offset) it cannot cover.
    pub fn check(&self, bytes: &[u8]) -> Result<(), CodecError> {
        let actual = bytes.len();
        if actual == self.len {
            return Ok(());
        }
        let field = if actual < self.len {
            self.fields
                .iter()
                .filter(|f| f.end() > actual)
                .min_by_key(|f| f.offset)
                .map(|f| f.name)
        } else {
            None
        };
        Err(CodecError::LayoutMismatch {
            kind: self.kind,
            expected: self.len,
            actual,
            field,
        })
    }

    /// Start reading a buffer that has already passed [`Layout::check`].
    pub fn reader<'a>(&self, bytes: &'a [u8]) -> Result<Reader<'a>, CodecError> {
        self.check(bytes)?;
        Ok(Reader {
            kind: self.kind,
            bytes,
        })
    }

    /// Start writing a zeroed buffer of this layout's length.
    pub fn writer(&self) -> Writer {
        Writer {
            kind: self.kind,
            context: self.name,
            buf: vec![0; self.len],
        }
    }
}

/// Safe buffer slice read helper.
#[inline]
pub fn read_slice<'a>(
    kind: RecordKind,
    buffer: &'a [u8],
    field: &Field,
) -> Result<&'a [u8], CodecError> {
    buffer
        .get(field.offset..field.end())
        .ok_or(CodecError::LayoutMismatch {
            kind,
            expected: field.end(),
            actual: buffer.len(),
            field: Some(field.name),
        })
}

/// Safe buffer slice write helper.
#[inline]
pub fn write_slice(
    kind: RecordKind,
    context: &'static str,
    buffer: &mut [u8],
    field: &Field,
    data: &[u8],
) -> Result<(), CodecError> {
    let len = buffer.len();
    let slot = buffer
        .get_mut(field.offset..field.end())
        .ok_or(CodecError::LayoutMismatch {
            kind,
            expected: field.end(),
            actual: len,
            field: Some(field.name),
        })?;
    if data.len() != slot.len() {
        return Err(CodecError::EncodingInvariantViolation {
            context,
            field: field.name,
        });
    }
    slot.copy_from_slice(data);
    Ok(())
}

/// Field-addressed reader over a length-checked buffer.
pub struct Reader<'a> {
    kind: RecordKind,
    bytes: &'a [u8],
}

impl Reader<'_> {
    pub fn array<const N: usize>(&self, field: &Field) -> Result<[u8; N], CodecError> {
        let slice = read_slice(self.kind, self.bytes, field)?;
        slice
            .try_into()
            .map_err(|_| CodecError::FieldDecode {
                kind: self.kind,
                field: field.name,
                reason: format!("expected {N} bytes, layout declares {}", field.width),
            })
    }

    pub fn u8(&self, field: &Field) -> Result<u8, CodecError> {
        Ok(u8::from_le_bytes(self.array::<1>(field)?))
    }

    pub fn u64(&self, field: &Field) -> Result<u64, CodecError> {
        Ok(u64::from_le_bytes(self.array::<8>(field)?))
    }

    pub fn i64(&self, field: &Field) -> Result<i64, CodecError> {
        Ok(i64::from_le_bytes(self.array::<8>(field)?))
    }

    pub fn address(&self, field: &Field) -> Result<Address, CodecError> {
        Ok(Address::new_from_array(self.array::<32>(field)?))
    }

    pub fn string<const N: usize>(&self, field: &Field) -> Result<String, CodecError> {
        FixedString::<N>::from_bytes(self.array::<N>(field)?)
            .to_str()
            .map(str::to_owned)
            .map_err(|e| CodecError::FieldDecode {
                kind: self.kind,
                field: field.name,
                reason: e.to_string(),
            })
    }
}

/// Field-addressed writer producing an exact-length buffer.
pub struct Writer {
    kind: RecordKind,
    context: &'static str,
    buf: Vec<u8>,
}

impl Writer {
    pub fn bytes(&mut self, field: &Field, data: &[u8]) -> Result<&mut Self, CodecError> {
        write_slice(self.kind, self.context, &mut self.buf, field, data)?;
        Ok(self)
    }

    pub fn u8(&mut self, field: &Field, value: u8) -> Result<&mut Self, CodecError> {
        self.bytes(field, &value.to_le_bytes())
    }

    pub fn u64(&mut self, field: &Field, value: u64) -> Result<&mut Self, CodecError> {
        self.bytes(field, &value.to_le_bytes())
    }

    pub fn i64(&mut self, field: &Field, value: i64) -> Result<&mut Self, CodecError> {
        self.bytes(field, &value.to_le_bytes())
    }

    pub fn address(&mut self, field: &Field, value: &Address) -> Result<&mut Self, CodecError> {
        self.bytes(field, value.as_ref())
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}
