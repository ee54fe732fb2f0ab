use thiserror::Error;

use crate::file::FormatType;

#[doc = r#"
Errors raised while interpreting the bytes of a Standard MIDI File.

Every variant describes malformed input. Unknown meta types and unknown
chunks that may be skipped are not errors.
"#]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The header (or its RMID wrapper) is malformed
    #[error("Header: {0}")]
    Header(#[from] HeaderError),
    /// A chunk appeared where it was not expected
    #[error("Chunk: {0}")]
    Chunk(#[from] ChunkError),
    /// The event stream of a track is malformed
    #[error("Track: {0}")]
    Track(#[from] TrackError),
}

/// A malformed `MThd` chunk or RIFF/RMID wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// The stream does not begin with `MThd` (or `RIFF`).
    #[error("Expected MThd, found {0:?}")]
    MissingHeader([u8; 4]),
    /// A RIFF wrapper whose form type is not `RMID`
    #[error("RIFF form type {0:?} is not RMID")]
    NotRmid([u8; 4]),
    /// A RIFF/RMID wrapper without a `data` chunk
    #[error("RMID wrapper is missing its data chunk, found {0:?}")]
    MissingRmidData([u8; 4]),
}

/// A chunk with an unexpected tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChunkError {
    /// A specific chunk tag was required
    #[error("Expected chunk {expected:?}, found {found:?}")]
    Unexpected {
        /// The tag required here
        expected: [u8; 4],
        /// The tag present in the stream
        found: [u8; 4],
    },
}

/// A malformed event stream inside an `MTrk` chunk.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackError {
    /// A data byte appeared without any running status to apply
    #[error("Data byte {0:#04X} without running status")]
    NoRunningStatus(u8),
    /// System common/real-time status bytes have no meaning inside a track
    #[error("Unsupported status byte {0:#04X}")]
    UnsupportedStatus(u8),
    /// A variable length quantity ran past four bytes
    #[error("Variable length quantity longer than four bytes")]
    VarLenTooLong,
    /// The read cursor did not move while decoding an event.
    #[error("Track reader stalled")]
    Stalled,
}

#[doc = r#"
Invalid input handed to the file model.
"#]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FileError {
    /// Only format 0 files can be split into one track per voice
    #[error("Expected a single multi-channel file, found {0:?}")]
    NotSingleMultiChannel(FormatType),
    /// Tempos must be positive and finite
    #[error("Invalid tempo {0} bpm")]
    InvalidTempo(f64),
    /// System exclusive payloads carry their own leading `F0`/`F7` byte
    #[error("System exclusive data must begin with F0 or F7")]
    InvalidSysEx,
    /// The denominator must be a power of two
    #[error("Invalid time signature {numerator}/{denominator}")]
    InvalidTimeSignature {
        /// beats per bar
        numerator: u8,
        /// beat unit
        denominator: u8,
    },
    /// The header stores the track count in sixteen bits
    #[error("{0} tracks do not fit in a MIDI file header")]
    TooManyTracks(usize),
    /// A value does not fit in a four byte variable length quantity.
    #[error("{0} does not fit in a variable length quantity")]
    VarLenOverflow(u32),
}

#[cfg(feature = "std")]
#[doc = r#"
Errors from loading or saving a file on disk.
"#]
#[derive(Debug, Error)]
pub enum SmfError {
    /// The file could not be read or written
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The bytes are not a valid Standard MIDI File
    #[error(transparent)]
    Read(#[from] crate::reader::ReaderError),
    /// The model could not be encoded
    #[error(transparent)]
    File(#[from] FileError),
}
