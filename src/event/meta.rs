use alloc::vec::Vec;
use num_enum::{FromPrimitive, IntoPrimitive};

#[doc = r#"
The type byte of a meta event (`FF <type> <len> <data>`).

The values match the ones written to disk. Types this crate has no
special handling for are kept as [`MetaType::Other`] so they survive a
load/save cycle untouched.

# Example
```rust
# use smfile::prelude::*;
assert_eq!(MetaType::from(0x51u8), MetaType::Tempo);
assert_eq!(MetaType::from(0x21u8), MetaType::Other(0x21));
assert_eq!(u8::from(MetaType::TrackName), 0x03);
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MetaType {
    /// `FF 00 02`
    SequenceNumber = 0x00,
    /// `FF 01 len text`
    Text = 0x01,
    /// `FF 02 len text`
    Copyright = 0x02,
    /// `FF 03 len text`
    TrackName = 0x03,
    /// `FF 04 len text`
    InstrumentName = 0x04,
    /// `FF 05 len text`
    Lyric = 0x05,
    /// `FF 06 len text`
    Marker = 0x06,
    /// `FF 07 len text`
    CuePoint = 0x07,
    /// `FF 20 01 cc`
    ChannelPrefix = 0x20,
    /// `FF 2F 00`. Never stored as an event; it closes a track.
    EndOfTrack = 0x2F,
    /// `FF 51 03 tttttt`, microseconds per quarter note
    Tempo = 0x51,
    /// `FF 54 05 hr mn se fr ff`
    SmpteOffset = 0x54,
    /// `FF 58 04 nn dd cc bb`
    TimeSignature = 0x58,
    /// `FF 59 02 sf mi`
    KeySignature = 0x59,
    /// `FF 7F len data`
    SequencerSpecific = 0x7F,
    /// Any other type byte
    #[num_enum(catch_all)]
    Other(u8),
}

/// Default tempo of a file before its first tempo event.
pub const DEFAULT_BPM: f64 = 120.;

const MICROS_PER_MINUTE: f64 = 60_000_000.;
const MAX_MICROS_PER_QUARTER_NOTE: u32 = 0x00FF_FFFF;

/// Clocks per metronome click written by new time signatures.
const CLOCKS_PER_CLICK: u8 = 24;
/// Notated 32nd notes per MIDI quarter note written by new time signatures.
const THIRTY_SECONDS_PER_QUARTER: u8 = 8;

/// A meta event: its type and raw payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetaEvent {
    kind: MetaType,
    data: Vec<u8>,
}

impl MetaEvent {
    /// A meta event with an arbitrary payload
    pub fn new(kind: impl Into<MetaType>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            kind: kind.into(),
            data: data.into(),
        }
    }

    /// A tempo event for `bpm` beats per minute.
    ///
    /// Returns `None` unless `bpm` is positive and finite and its quarter
    /// note length fits the 24-bit payload, which takes 1 to 16777215 µs.
    pub fn tempo_from_bpm(bpm: f64) -> Option<Self> {
        if !bpm.is_finite() || bpm <= 0. {
            return None;
        }
        let micros = (MICROS_PER_MINUTE / bpm).trunc();
        if !(1. ..=f64::from(MAX_MICROS_PER_QUARTER_NOTE)).contains(&micros) {
            return None;
        }
        let [_, hi, mid, lo] = (micros as u32).to_be_bytes();
        Some(Self::new(MetaType::Tempo, [hi, mid, lo]))
    }

    /// A time signature event. `denominator` must be a power of two.
    pub fn time_signature(numerator: u8, denominator: u8) -> Option<Self> {
        if !denominator.is_power_of_two() {
            return None;
        }
        let power = denominator.trailing_zeros() as u8;
        Some(Self::new(
            MetaType::TimeSignature,
            [
                numerator,
                power,
                CLOCKS_PER_CLICK,
                THIRTY_SECONDS_PER_QUARTER,
            ],
        ))
    }

    /// The meta type
    pub const fn kind(&self) -> MetaType {
        self.kind
    }

    /// The type byte as written to disk
    pub fn number(&self) -> u8 {
        self.kind.into()
    }

    /// The raw payload
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Microseconds per quarter note, if this is a well formed tempo event
    pub fn micros_per_quarter_note(&self) -> Option<u32> {
        if self.kind != MetaType::Tempo {
            return None;
        }
        match self.data.as_slice() {
            [hi, mid, lo, ..] => Some(u32::from_be_bytes([0, *hi, *mid, *lo])),
            _ => None,
        }
    }

    /// Beats per minute of a tempo event.
    ///
    /// `None` for other meta types, short payloads, or a zero tempo.
    pub fn tempo(&self) -> Option<f64> {
        match self.micros_per_quarter_note()? {
            0 => None,
            micros => Some(MICROS_PER_MINUTE / micros as f64),
        }
    }

    /// `(numerator, denominator)` of a time signature event
    pub fn time_signature_parts(&self) -> Option<(u8, u32)> {
        if self.kind != MetaType::TimeSignature {
            return None;
        }
        match self.data.as_slice() {
            [numerator, power, ..] => Some((*numerator, 1u32.checked_shl(*power as u32)?)),
            _ => None,
        }
    }
}

#[test]
fn tempo_from_payload() {
    let meta = MetaEvent::new(MetaType::Tempo, [0x07, 0xA1, 0x20]);
    assert_eq!(meta.micros_per_quarter_note(), Some(500_000));
    assert_eq!(meta.tempo(), Some(120.));

    let meta = MetaEvent::new(MetaType::Tempo, [0x0F, 0x42, 0x40]);
    assert_eq!(meta.tempo(), Some(60.));
}

#[test]
fn tempo_of_other_meta_is_none() {
    assert_eq!(MetaEvent::new(MetaType::Marker, [0x07, 0xA1, 0x20]).tempo(), None);
    assert_eq!(MetaEvent::new(MetaType::Tempo, [0x07, 0xA1]).tempo(), None);
    assert_eq!(MetaEvent::new(MetaType::Tempo, [0, 0, 0]).tempo(), None);
}

#[test]
fn tempo_from_bpm_rejects_non_positive() {
    assert!(MetaEvent::tempo_from_bpm(0.).is_none());
    assert!(MetaEvent::tempo_from_bpm(-10.).is_none());
    assert!(MetaEvent::tempo_from_bpm(f64::NAN).is_none());
    let meta = MetaEvent::tempo_from_bpm(120.).unwrap();
    assert_eq!(meta.data(), &[0x07, 0xA1, 0x20]);
}

#[test]
fn tempo_from_bpm_rejects_what_24_bits_cannot_hold() {
    // 20 seconds per quarter note
    assert!(MetaEvent::tempo_from_bpm(3.).is_none());
    // under a microsecond per quarter note
    assert!(MetaEvent::tempo_from_bpm(1e8).is_none());

    let slowest = MetaEvent::tempo_from_bpm(3.6).unwrap();
    assert_eq!(slowest.data(), &[0xFE, 0x50, 0x2A]);
    let fastest = MetaEvent::tempo_from_bpm(6e7).unwrap();
    assert_eq!(fastest.data(), &[0x00, 0x00, 0x01]);
}

#[test]
fn time_signature_payload() {
    let meta = MetaEvent::time_signature(6, 8).unwrap();
    assert_eq!(meta.data(), &[6, 3, 24, 8]);
    assert_eq!(meta.time_signature_parts(), Some((6, 8)));
    assert!(MetaEvent::time_signature(3, 3).is_none());
}
