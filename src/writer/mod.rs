#![doc = r#"
An in-memory byte sink for encoding MIDI files.

Chunk lengths are not known until their contents are written, so the
[`Writer`] hands out the offset of a placeholder and patches it afterwards.
"#]

use alloc::vec::Vec;

use crate::{FileError, reader::MAX_VARLEN_BYTES};

/// The largest value representable by a variable length quantity.
pub const MAX_VARLEN: u32 = 0x0FFF_FFFF;

/// Appends big endian integers and variable length quantities to a buffer.
#[derive(Debug, Default, Clone)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    /// An empty writer
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bytes written so far
    pub fn position(&self) -> usize {
        self.buf.len()
    }

    /// Appends one byte
    pub fn write_u8(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    /// Appends raw bytes
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Appends a big endian `u16`
    pub fn write_u16(&mut self, value: u16) {
        self.write_bytes(&value.to_be_bytes());
    }

    /// Appends a big endian `u32`
    pub fn write_u32(&mut self, value: u32) {
        self.write_bytes(&value.to_be_bytes());
    }

    /// Appends a variable length quantity using the fewest bytes possible.
    ///
    /// Values above [`MAX_VARLEN`] need more than four bytes and are rejected.
    pub fn write_varlen(&mut self, value: u32) -> Result<(), FileError> {
        let (bytes, len) = encode_varlen(value)?;
        self.write_bytes(&bytes[MAX_VARLEN_BYTES - len..]);
        Ok(())
    }

    /// Writes a zeroed `u32` and returns its offset for [`Writer::patch_u32`]
    pub fn placeholder_u32(&mut self) -> usize {
        let offset = self.position();
        self.write_u32(0);
        offset
    }

    /// Overwrites four already written bytes at `offset`.
    pub fn patch_u32(&mut self, offset: usize, value: u32) {
        self.buf[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
    }

    /// The bytes written so far
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the writer, returning its bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Encodes `value` right-aligned in a four byte array, returning how many
/// trailing bytes are significant.
pub fn encode_varlen(mut value: u32) -> Result<([u8; MAX_VARLEN_BYTES], usize), FileError> {
    if value > MAX_VARLEN {
        return Err(FileError::VarLenOverflow(value));
    }
    let mut bytes = [0; MAX_VARLEN_BYTES];
    let mut offset = MAX_VARLEN_BYTES - 1;
    loop {
        bytes[offset] = (value & 0x7F) as u8;
        if offset < MAX_VARLEN_BYTES - 1 {
            bytes[offset] |= 0x80;
        }
        value >>= 7;
        if value == 0 {
            break;
        }
        offset -= 1;
    }
    Ok((bytes, MAX_VARLEN_BYTES - offset))
}

#[test]
fn zero_is_a_single_byte() {
    use pretty_assertions::assert_eq;
    let mut writer = Writer::new();
    writer.write_varlen(0).unwrap();
    assert_eq!(writer.as_bytes(), &[0x00]);
}

#[test]
fn known_varlens() {
    use pretty_assertions::assert_eq;
    let cases: [(u32, &[u8]); 7] = [
        (0x7F, &[0x7F]),
        (0x80, &[0x81, 0x00]),
        (0x2000, &[0xC0, 0x00]),
        (0x3FFF, &[0xFF, 0x7F]),
        (0x4000, &[0x81, 0x80, 0x00]),
        (0x1F_FFFF, &[0xFF, 0xFF, 0x7F]),
        (0x0FFF_FFFF, &[0xFF, 0xFF, 0xFF, 0x7F]),
    ];
    for (value, expected) in cases {
        let mut writer = Writer::new();
        writer.write_varlen(value).unwrap();
        assert_eq!(writer.as_bytes(), expected, "encoding {value:#X}");
    }
}

#[test]
fn oversized_varlen_is_rejected() {
    let mut writer = Writer::new();
    assert_eq!(
        writer.write_varlen(0x1000_0000),
        Err(FileError::VarLenOverflow(0x1000_0000))
    );
    assert!(writer.as_bytes().is_empty());
}

#[test]
fn patch_placeholder() {
    use pretty_assertions::assert_eq;
    let mut writer = Writer::new();
    writer.write_bytes(b"MTrk");
    let len_at = writer.placeholder_u32();
    writer.write_bytes(&[0x00, 0xFF, 0x2F, 0x00]);
    let len = writer.position() - len_at - 4;
    writer.patch_u32(len_at, len as u32);
    assert_eq!(
        writer.into_bytes(),
        b"MTrk\x00\x00\x00\x04\x00\xFF\x2F\x00".to_vec()
    );
}
