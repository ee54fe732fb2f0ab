mod smpte;
pub use smpte::*;

use crate::reader::{ReadResult, Reader};

/// The header timing type.
///
/// This is either the number of ticks per quarter note or
/// the alternative SMPTE format. The division word is kept bit exact,
/// so a file saves back the two bytes it was loaded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Timing {
    /// The midi file's delta times are defined using a tick rate per quarter note
    TicksPerQuarterNote(TicksPerQuarterNote),

    /// The midi file's delta times are defined using an SMPTE and MIDI Time Code
    Smpte(SmpteHeader),
}

impl Default for Timing {
    fn default() -> Self {
        Self::new_ticks_per_quarter_note(0)
    }
}

impl Timing {
    /// The tickrate per quarter note defines what a "quarter note" means.
    ///
    /// The leading bit of the u16 is disregarded, so 1-32767
    pub const fn new_ticks_per_quarter_note(tpqn: u16) -> Self {
        let tpqn = tpqn & 0x7FFF;
        let msb = (tpqn >> 8) as u8;
        let lsb = (tpqn & 0x00FF) as u8;
        Self::TicksPerQuarterNote(TicksPerQuarterNote { inner: [msb, lsb] })
    }

    /// Define the timing in terms of fps and ticks per frame
    pub const fn new_smpte(fps: SmpteFps, ticks_per_frame: u8) -> Self {
        Self::Smpte(SmpteHeader {
            fps,
            ticks_per_frame,
        })
    }

    pub(crate) fn read(reader: &mut Reader<'_>) -> ReadResult<Self> {
        let bytes: [u8; 2] = reader.read_exact_size()?;
        if bytes[0] & 0x80 != 0 {
            //Bits 14 thru 8 contain one of the four values -24, -25, -29, or -30
            if let Ok(fps) = SmpteFps::try_from(bytes[0] as i8) {
                return Ok(Self::new_smpte(fps, bytes[1]));
            }
            #[cfg(feature = "tracing")]
            tracing::warn!(
                "Unknown SMPTE frame rate {}, reading the division as ticks per quarter note",
                bytes[0] as i8
            );
        }
        Ok(Timing::TicksPerQuarterNote(TicksPerQuarterNote {
            inner: bytes,
        }))
    }

    /// The two division bytes as stored in the header
    pub fn to_bytes(&self) -> [u8; 2] {
        match self {
            Self::TicksPerQuarterNote(t) => t.inner,
            Self::Smpte(s) => [s.fps.header_byte() as u8, s.ticks_per_frame],
        }
    }

    /// The signed division type byte: 0 for ticks per quarter note,
    /// otherwise the negated SMPTE frame rate.
    pub fn division_type(&self) -> i8 {
        match self {
            Self::TicksPerQuarterNote(_) => 0,
            Self::Smpte(s) => s.fps.header_byte(),
        }
    }

    /// Ticks per quarter note, or ticks per frame for SMPTE timing.
    pub const fn resolution(&self) -> u16 {
        match self {
            Self::TicksPerQuarterNote(t) => t.ticks_per_quarter_note(),
            Self::Smpte(s) => s.ticks_per_frame as u16,
        }
    }

    /// Returns Some if the midi timing is defined
    /// as ticks per quarter note
    pub const fn ticks_per_quarter_note(&self) -> Option<u16> {
        match self {
            Self::TicksPerQuarterNote(t) => Some(t.ticks_per_quarter_note()),
            _ => None,
        }
    }
}

/// A representation of the `tpqn` timing for a MIDI file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TicksPerQuarterNote {
    pub(crate) inner: [u8; 2],
}
impl TicksPerQuarterNote {
    /// Returns the ticks per quarter note for the file.
    ///
    /// The leading bit is only set when a header's negative division byte
    /// named no known frame rate. The whole word is the resolution then.
    pub const fn ticks_per_quarter_note(&self) -> u16 {
        u16::from_be_bytes(self.inner)
    }
}

/// A representation of the `smpte` timing for a MIDI file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmpteHeader {
    pub(crate) fps: SmpteFps,
    pub(crate) ticks_per_frame: u8,
}

impl SmpteHeader {
    /// Returns the frames per second
    pub const fn fps(&self) -> SmpteFps {
        self.fps
    }

    /// Returns the ticks per frame
    pub const fn ticks_per_frame(&self) -> u8 {
        self.ticks_per_frame
    }
}

#[test]
fn read_ticks_per_quarter_note() {
    let bytes = [0x01, 0xE0];
    let timing = Timing::read(&mut Reader::from_byte_slice(&bytes)).unwrap();
    assert_eq!(timing.ticks_per_quarter_note(), Some(480));
    assert_eq!(timing.division_type(), 0);
    assert_eq!(timing.to_bytes(), bytes);
}

#[test]
fn read_smpte_timing() {
    let bytes = [0xE7, 40];
    let timing = Timing::read(&mut Reader::from_byte_slice(&bytes)).unwrap();
    assert_eq!(timing, Timing::new_smpte(SmpteFps::TwentyFive, 40));
    assert_eq!(timing.resolution(), 40);
    assert_eq!(timing.division_type(), -25);
    assert_eq!(timing.to_bytes(), bytes);
}

#[test]
fn unknown_frame_rate_reads_as_ticks_per_quarter_note() {
    let bytes = [0xE0, 40];
    let timing = Timing::read(&mut Reader::from_byte_slice(&bytes)).unwrap();
    assert_eq!(timing.ticks_per_quarter_note(), Some(0xE028));
    assert_eq!(timing.division_type(), 0);
    assert_eq!(timing.to_bytes(), bytes);
}
