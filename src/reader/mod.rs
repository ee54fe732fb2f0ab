#![doc = r#"
A cursor over the raw bytes of a MIDI file.

The [`Reader`] never reads past the end of its slice: every read either
returns the requested bytes or an [`OutOfBounds`](ReaderErrorKind::OutOfBounds)
error carrying the position where the stream ran out.
"#]

mod error;
pub use error::*;

use crate::TrackError;

/// The maximum number of bytes in a variable length quantity.
pub const MAX_VARLEN_BYTES: usize = 4;

/// Reads big endian integers, variable length quantities and raw runs of bytes.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Reader<'a> {
    /// Create a reader positioned at the first byte of `data`
    pub const fn from_byte_slice(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// The absolute offset of the next byte to be read
    pub const fn buffer_position(&self) -> usize {
        self.position
    }

    /// Total length of the underlying buffer
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the underlying buffer holds no bytes at all
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// True once every byte has been consumed
    pub const fn is_at_end(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Moves the cursor to an absolute offset.
    ///
    /// Seeking exactly to the end is allowed, seeking beyond it is not.
    pub fn seek(&mut self, position: usize) -> ReadResult<()> {
        if position > self.data.len() {
            return Err(ReaderError::oob(self.data.len()));
        }
        self.position = position;
        Ok(())
    }

    /// Returns the next byte without consuming it
    pub fn peek_next(&self) -> ReadResult<u8> {
        self.data
            .get(self.position)
            .copied()
            .ok_or(ReaderError::oob(self.position))
    }

    /// Consumes one byte
    pub fn read_next(&mut self) -> ReadResult<u8> {
        let byte = self.peek_next()?;
        self.position += 1;
        Ok(byte)
    }

    /// Consumes `len` bytes, borrowing them from the buffer
    pub fn read_exact(&mut self, len: usize) -> ReadResult<&'a [u8]> {
        let end = self
            .position
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or(ReaderError::oob(self.data.len()))?;
        let bytes = &self.data[self.position..end];
        self.position = end;
        Ok(bytes)
    }

    /// Consumes exactly `N` bytes into an array
    pub fn read_exact_size<const N: usize>(&mut self) -> ReadResult<[u8; N]> {
        let mut out = [0; N];
        out.copy_from_slice(self.read_exact(N)?);
        Ok(out)
    }

    /// Reads a big endian `u16`
    pub fn read_u16(&mut self) -> ReadResult<u16> {
        self.read_exact_size().map(u16::from_be_bytes)
    }

    /// Reads a big endian `u32`
    pub fn read_u32(&mut self) -> ReadResult<u32> {
        self.read_exact_size().map(u32::from_be_bytes)
    }

    /// Reads a variable length quantity.
    ///
    /// Seven bits per byte, most significant group first, with the top bit
    /// set on every byte but the last. At most four bytes are accepted, so
    /// the largest value is `0x0FFF_FFFF`.
    pub fn read_varlen(&mut self) -> ReadResult<u32> {
        let start = self.position;
        let mut value: u32 = 0;
        for _ in 0..MAX_VARLEN_BYTES {
            let byte = self.read_next()?;
            value = (value << 7) | (byte & 0x7F) as u32;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(ReaderError::parse_error(start, TrackError::VarLenTooLong))
    }
}

#[test]
fn read_big_endian_integers() {
    use pretty_assertions::assert_eq;
    let bytes = [0x00, 0x06, 0x01, 0xE0, 0x00, 0x00, 0x00, 0x12];
    let mut reader = Reader::from_byte_slice(&bytes);
    assert_eq!(reader.read_u16().unwrap(), 6);
    assert_eq!(reader.read_u16().unwrap(), 480);
    assert_eq!(reader.read_u32().unwrap(), 0x12);
    assert!(reader.is_at_end());
    assert!(reader.read_next().unwrap_err().is_out_of_bounds());
}

#[test]
fn read_known_varlens() {
    use pretty_assertions::assert_eq;
    let cases: [(&[u8], u32); 8] = [
        (&[0x00], 0),
        (&[0x40], 0x40),
        (&[0x7F], 0x7F),
        (&[0x81, 0x00], 0x80),
        (&[0xC0, 0x00], 0x2000),
        (&[0xFF, 0x7F], 0x3FFF),
        (&[0x81, 0x80, 0x00], 0x4000),
        (&[0xFF, 0xFF, 0xFF, 0x7F], 0x0FFF_FFFF),
    ];
    for (bytes, expected) in cases {
        let mut reader = Reader::from_byte_slice(bytes);
        assert_eq!(reader.read_varlen().unwrap(), expected);
        assert!(reader.is_at_end());
    }
}

#[test]
fn varlen_longer_than_four_bytes_fails() {
    let bytes = [0x81, 0x81, 0x81, 0x81, 0x01];
    let err = Reader::from_byte_slice(&bytes).read_varlen().unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::ParseError(TrackError::VarLenTooLong.into())
    );
}

#[test]
fn truncated_varlen_is_out_of_bounds() {
    let bytes = [0x81, 0x81];
    let err = Reader::from_byte_slice(&bytes).read_varlen().unwrap_err();
    assert!(err.is_out_of_bounds());
}

#[test]
fn seek_past_end_fails() {
    let bytes = [0u8; 4];
    let mut reader = Reader::from_byte_slice(&bytes);
    assert!(reader.seek(4).is_ok());
    assert!(reader.seek(5).unwrap_err().is_out_of_bounds());
}
