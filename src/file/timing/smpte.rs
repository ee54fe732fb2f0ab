#![doc = r#"
SMPTE (Society of Motion Picture and Television Engineers) time base support

MIDI files measure delta times in one of two ways:

1. **Musical Time** - ticks per quarter note, scaled by the tempo map
2. **Absolute Time** - ticks per SMPTE frame, independent of tempo

With SMPTE timing the high byte of the division word holds the negated
frame rate (-24, -25, -29 or -30) and the low byte the ticks per frame.
"#]

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// The possible FPS (Frames Per Second) for MIDI files
///
/// The discriminant is the signed byte stored in the header.
///
/// # Drop-Frame Timecode
///
/// The "TwentyNine" variant represents NTSC drop-frame timecode. Its rate is
/// taken as the literal 29.97 in every time conversion, so existing
/// conversions stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i8)]
pub enum SmpteFps {
    /// 24 frames per second - Standard film rate
    TwentyFour = -24,
    /// 25 frames per second - PAL/SECAM television standard
    TwentyFive = -25,
    /// 29.97 frames per second - NTSC color television drop-frame rate
    TwentyNine = -29,
    /// 30 frames per second - NTSC black & white, some digital formats
    Thirty = -30,
}

impl SmpteFps {
    /// Get the frame rate used for time conversions.
    pub const fn as_f64(&self) -> f64 {
        match self {
            Self::TwentyFour => 24.,
            Self::TwentyFive => 25.,
            Self::TwentyNine => DROP_FRAME,
            Self::Thirty => 30.,
        }
    }

    /// The signed byte written to the header
    pub fn header_byte(&self) -> i8 {
        (*self).into()
    }
}

const DROP_FRAME: f64 = 29.97;

#[test]
fn fps_from_header_byte() {
    assert_eq!(SmpteFps::try_from(-24i8).ok(), Some(SmpteFps::TwentyFour));
    assert_eq!(SmpteFps::try_from(-29i8).ok(), Some(SmpteFps::TwentyNine));
    assert!(SmpteFps::try_from(-28i8).is_err());
    assert_eq!(SmpteFps::Thirty.header_byte() as u8, 0xE2);
    assert_eq!(SmpteFps::TwentyNine.as_f64(), 29.97);
}
