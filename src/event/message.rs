#![doc = r#"
Packing channel voice events into MIDI wire messages.

A wire message is the word handed to (or received from) a MIDI port: the
status byte in the low byte, then the first and second data bytes.

```text
bits:  31..24   23..16    15..8     7..0
       unused   data 2    data 1    status
```
"#]

use super::EventKind;

/// Number of data bytes following a channel voice status byte.
pub const fn channel_data_len(status: u8) -> usize {
    match status & 0xF0 {
        0xC0 | 0xD0 => 1,
        _ => 2,
    }
}

/// Total length in bytes of a short message beginning with `status`.
pub const fn wire_message_len(status: u8) -> usize {
    match status {
        0x80..=0xBF | 0xE0..=0xEF | 0xF2 => 3,
        0xC0..=0xDF | 0xF1 | 0xF3 => 2,
        _ => 1,
    }
}

impl EventKind {
    /// Builds a channel voice event from its status and data bytes.
    ///
    /// Returns `None` for status bytes outside `0x80..=0xEF`. A note on
    /// with velocity 0 stays a note on here.
    pub fn from_channel_bytes(status: u8, data1: u8, data2: u8) -> Option<Self> {
        let voice = status & 0x0F;
        let kind = match status & 0xF0 {
            0x80 => Self::NoteOff {
                voice,
                note: data1,
                velocity: data2,
            },
            0x90 => Self::NoteOn {
                voice,
                note: data1,
                velocity: data2,
            },
            0xA0 => Self::KeyPressure {
                voice,
                note: data1,
                amount: data2,
            },
            0xB0 => Self::ControlChange {
                voice,
                controller: data1,
                value: data2,
            },
            0xC0 => Self::ProgramChange {
                voice,
                program: data1,
            },
            0xD0 => Self::ChannelPressure {
                voice,
                amount: data1,
            },
            0xE0 => Self::PitchWheel {
                voice,
                value: ((data2 as u16 & 0x7F) << 7) | (data1 as u16 & 0x7F),
            },
            _ => return None,
        };
        Some(kind)
    }

    /// The status and data bytes of a channel voice event, masked to their
    /// valid ranges. Unused data bytes are zero.
    pub fn channel_bytes(&self) -> Option<[u8; 3]> {
        use EventKind::*;
        let (status, voice, data1, data2) = match *self {
            NoteOff {
                voice,
                note,
                velocity,
            } => (0x80, voice, note, velocity),
            NoteOn {
                voice,
                note,
                velocity,
            } => (0x90, voice, note, velocity),
            KeyPressure {
                voice,
                note,
                amount,
            } => (0xA0, voice, note, amount),
            ControlChange {
                voice,
                controller,
                value,
            } => (0xB0, voice, controller, value),
            ProgramChange { voice, program } => (0xC0, voice, program, 0),
            ChannelPressure { voice, amount } => (0xD0, voice, amount, 0),
            PitchWheel { voice, value } => (0xE0, voice, value as u8, (value >> 7) as u8),
            Meta(_) | SysEx(_) => return None,
        };
        Some([status | (voice & 0x0F), data1 & 0x7F, data2 & 0x7F])
    }

    /// Packs a channel voice event into a wire message word.
    ///
    /// Meta and system exclusive events have no wire word and return `None`.
    ///
    /// # Example
    /// ```rust
    /// # use smfile::prelude::*;
    /// let bend = EventKind::PitchWheel { voice: 2, value: 0x2001 };
    /// assert_eq!(bend.to_wire_message(), Some(0x40_01_E2));
    /// ```
    pub fn to_wire_message(&self) -> Option<u32> {
        self.channel_bytes()
            .map(|[status, data1, data2]| u32::from_le_bytes([status, data1, data2, 0]))
    }

    /// Decodes a wire message word, the inverse of [`EventKind::to_wire_message`].
    pub fn from_wire_message(message: u32) -> Option<Self> {
        let [status, data1, data2, _] = message.to_le_bytes();
        Self::from_channel_bytes(status, data1, data2)
    }
}

#[test]
fn pack_note_on() {
    let note_on = EventKind::NoteOn {
        voice: 9,
        note: 36,
        velocity: 100,
    };
    assert_eq!(note_on.to_wire_message(), Some(0x64_24_99));
}

#[test]
fn pack_masks_out_of_range_fields() {
    let cc = EventKind::ControlChange {
        voice: 0x1F,
        controller: 0xFF,
        value: 0x80,
    };
    assert_eq!(cc.to_wire_message(), Some(0x00_7F_BF));
}

#[test]
fn program_change_has_one_data_byte() {
    let program = EventKind::ProgramChange {
        voice: 0,
        program: 5,
    };
    assert_eq!(program.to_wire_message(), Some(0x05_C0));
    assert_eq!(channel_data_len(0xC0), 1);
    assert_eq!(channel_data_len(0xD3), 1);
    assert_eq!(channel_data_len(0xE3), 2);
    assert_eq!(wire_message_len(0xC0), 2);
    assert_eq!(wire_message_len(0x93), 3);
    assert_eq!(wire_message_len(0xF8), 1);
}

#[test]
fn unpack_every_channel_voice_kind() {
    let kinds = [
        EventKind::NoteOff {
            voice: 1,
            note: 60,
            velocity: 64,
        },
        EventKind::NoteOn {
            voice: 2,
            note: 61,
            velocity: 0,
        },
        EventKind::KeyPressure {
            voice: 3,
            note: 62,
            amount: 10,
        },
        EventKind::ChannelPressure {
            voice: 4,
            amount: 11,
        },
        EventKind::ControlChange {
            voice: 5,
            controller: 7,
            value: 100,
        },
        EventKind::ProgramChange {
            voice: 6,
            program: 42,
        },
        EventKind::PitchWheel {
            voice: 15,
            value: 0x3FFF,
        },
    ];
    for kind in kinds {
        let word = kind.to_wire_message().unwrap();
        assert_eq!(EventKind::from_wire_message(word), Some(kind));
    }
}

#[test]
fn meta_and_sysex_have_no_wire_message() {
    use alloc::vec;
    let meta = EventKind::Meta(super::MetaEvent::new(super::MetaType::Marker, *b"A"));
    assert_eq!(meta.to_wire_message(), None);
    assert_eq!(EventKind::SysEx(vec![0xF0, 0xF7]).to_wire_message(), None);
    assert_eq!(EventKind::from_wire_message(0xF8), None);
}
