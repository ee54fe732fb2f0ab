#![doc = r#"
The event model: one timed MIDI occurrence.

An [`Event`] pairs an [`EventKind`] with the absolute tick and the track it
belongs to. Events only exist inside a [`MidiFile`](crate::file::MidiFile),
which assigns the tick, the track, and a stable [`EventId`].

# Hierarchy
```text
                       |-----------|
                       | EventKind |
                       |-----------|
                /            |             \
|---------------------| |-----------| |--------|
| Channel voice (7)   | | MetaEvent | | SysEx  |
|---------------------| |-----------| |--------|
```
"#]

mod meta;
pub use meta::*;

mod message;
pub use message::*;

use alloc::vec::Vec;

/// Identifies one event inside its file for as long as it is stored there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventId(pub(crate) u64);

#[doc = r#"
The payload of an event.

Channel voice variants carry the channel as `voice` (0-15). Values are
stored as given and clamped to seven bits when written.
"#]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    /// `8n kk vv`
    NoteOff {
        /// channel
        voice: u8,
        /// key number
        note: u8,
        /// release velocity
        velocity: u8,
    },
    /// `9n kk vv`, with `vv > 0` when read from a file
    NoteOn {
        /// channel
        voice: u8,
        /// key number
        note: u8,
        /// attack velocity
        velocity: u8,
    },
    /// `An kk aa`, polyphonic aftertouch
    KeyPressure {
        /// channel
        voice: u8,
        /// key number
        note: u8,
        /// pressure
        amount: u8,
    },
    /// `Dn aa`, channel aftertouch
    ChannelPressure {
        /// channel
        voice: u8,
        /// pressure
        amount: u8,
    },
    /// `Bn cc vv`
    ControlChange {
        /// channel
        voice: u8,
        /// controller number
        controller: u8,
        /// controller value
        value: u8,
    },
    /// `Cn pp`
    ProgramChange {
        /// channel
        voice: u8,
        /// program number
        program: u8,
    },
    /// `En ll mm`, a 14 bit value centred on `0x2000`
    PitchWheel {
        /// channel
        voice: u8,
        /// bend amount, 0-16383
        value: u16,
    },
    /// `FF tt len data`
    Meta(MetaEvent),
    /// A system exclusive message, including its leading `F0` or `F7` byte.
    SysEx(Vec<u8>),
}

impl EventKind {
    /// The channel of a channel voice event
    pub const fn voice(&self) -> Option<u8> {
        use EventKind::*;
        match self {
            NoteOff { voice, .. }
            | NoteOn { voice, .. }
            | KeyPressure { voice, .. }
            | ChannelPressure { voice, .. }
            | ControlChange { voice, .. }
            | ProgramChange { voice, .. }
            | PitchWheel { voice, .. } => Some(*voice),
            Meta(_) | SysEx(_) => None,
        }
    }

    /// The key of note and key pressure events
    pub const fn note(&self) -> Option<u8> {
        use EventKind::*;
        match self {
            NoteOff { note, .. } | NoteOn { note, .. } | KeyPressure { note, .. } => Some(*note),
            _ => None,
        }
    }

    /// The velocity of note events
    pub const fn velocity(&self) -> Option<u8> {
        match self {
            Self::NoteOff { velocity, .. } | Self::NoteOn { velocity, .. } => Some(*velocity),
            _ => None,
        }
    }

    /// The pressure of key and channel pressure events
    pub const fn amount(&self) -> Option<u8> {
        match self {
            Self::KeyPressure { amount, .. } | Self::ChannelPressure { amount, .. } => {
                Some(*amount)
            }
            _ => None,
        }
    }

    /// The controller number, program number, or meta type byte.
    pub fn number(&self) -> Option<u8> {
        match self {
            Self::ControlChange { controller, .. } => Some(*controller),
            Self::ProgramChange { program, .. } => Some(*program),
            Self::Meta(meta) => Some(meta.number()),
            _ => None,
        }
    }

    /// The controller value or pitch wheel position
    pub const fn value(&self) -> Option<u16> {
        match self {
            Self::ControlChange { value, .. } => Some(*value as u16),
            Self::PitchWheel { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// The meta event, if this is one
    pub const fn meta(&self) -> Option<&MetaEvent> {
        match self {
            Self::Meta(meta) => Some(meta),
            _ => None,
        }
    }

    /// The raw payload of meta and system exclusive events
    pub fn data(&self) -> Option<&[u8]> {
        match self {
            Self::Meta(meta) => Some(meta.data()),
            Self::SysEx(data) => Some(data),
            _ => None,
        }
    }

    /// Beats per minute, for a tempo meta event.
    pub fn tempo(&self) -> Option<f64> {
        self.meta()?.tempo()
    }

    /// True for a meta event of the given type
    pub fn is_meta(&self, kind: MetaType) -> bool {
        self.meta().is_some_and(|meta| meta.kind() == kind)
    }
}

#[doc = r#"
One event stored in a [`MidiFile`](crate::file::MidiFile).
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    pub(crate) id: EventId,
    pub(crate) tick: u32,
    pub(crate) track: usize,
    pub(crate) kind: EventKind,
}

impl Event {
    /// The identifier assigned by the owning file
    pub const fn id(&self) -> EventId {
        self.id
    }

    /// The absolute tick
    pub const fn tick(&self) -> u32 {
        self.tick
    }

    /// The track index. The track itself may have been removed since.
    pub const fn track(&self) -> usize {
        self.track
    }

    /// The payload
    pub const fn kind(&self) -> &EventKind {
        &self.kind
    }

    /// Mutable access to the payload. Ordering depends only on the tick,
    /// so the payload may change freely.
    pub fn kind_mut(&mut self) -> &mut EventKind {
        &mut self.kind
    }

    /// Moves the event to another track
    pub fn set_track(&mut self, track: usize) {
        self.track = track;
    }

    /// See [`EventKind::voice`]
    pub const fn voice(&self) -> Option<u8> {
        self.kind.voice()
    }

    /// See [`EventKind::note`]
    pub const fn note(&self) -> Option<u8> {
        self.kind.note()
    }

    /// See [`EventKind::velocity`]
    pub const fn velocity(&self) -> Option<u8> {
        self.kind.velocity()
    }

    /// See [`EventKind::amount`]
    pub const fn amount(&self) -> Option<u8> {
        self.kind.amount()
    }

    /// See [`EventKind::number`]
    pub fn number(&self) -> Option<u8> {
        self.kind.number()
    }

    /// See [`EventKind::value`]
    pub const fn value(&self) -> Option<u16> {
        self.kind.value()
    }

    /// See [`EventKind::data`]
    pub fn data(&self) -> Option<&[u8]> {
        self.kind.data()
    }

    /// See [`EventKind::tempo`]
    pub fn tempo(&self) -> Option<f64> {
        self.kind.tempo()
    }

    /// The numerator of a time signature event
    pub fn numerator(&self) -> Option<u8> {
        self.kind.meta()?.time_signature_parts().map(|(n, _)| n)
    }

    /// The denominator of a time signature event
    pub fn denominator(&self) -> Option<u32> {
        self.kind.meta()?.time_signature_parts().map(|(_, d)| d)
    }

    /// True for a tempo event on track 0, the events making up the tempo map.
    pub fn is_tempo_map_entry(&self) -> bool {
        self.track == 0 && self.kind.is_meta(MetaType::Tempo)
    }

    /// See [`EventKind::to_wire_message`]
    pub fn to_wire_message(&self) -> Option<u32> {
        self.kind.to_wire_message()
    }
}
