use alloc::vec::Vec;

use super::MidiFile;
use crate::{
    FileError,
    event::{EventId, EventKind, MetaEvent, MetaType},
};

/// Release velocity used when none is given, and for note ons read with
/// velocity zero.
pub const DEFAULT_RELEASE_VELOCITY: u8 = 64;

impl MidiFile {
    /// Adds a note off event
    pub fn create_note_off_event(
        &mut self,
        track: usize,
        tick: u32,
        voice: u8,
        note: u8,
        velocity: u8,
    ) -> EventId {
        self.add_event(
            track,
            tick,
            EventKind::NoteOff {
                voice,
                note,
                velocity,
            },
        )
    }

    /// Adds a note on event
    pub fn create_note_on_event(
        &mut self,
        track: usize,
        tick: u32,
        voice: u8,
        note: u8,
        velocity: u8,
    ) -> EventId {
        self.add_event(
            track,
            tick,
            EventKind::NoteOn {
                voice,
                note,
                velocity,
            },
        )
    }

    /// Adds a note off at `end_tick`, then a note on at `start_tick`.
    ///
    /// Returns the id of the note on.
    #[allow(clippy::too_many_arguments)]
    pub fn create_note(
        &mut self,
        track: usize,
        start_tick: u32,
        end_tick: u32,
        voice: u8,
        note: u8,
        start_velocity: u8,
        end_velocity: u8,
    ) -> EventId {
        self.create_note_off_event(track, end_tick, voice, note, end_velocity);
        self.create_note_on_event(track, start_tick, voice, note, start_velocity)
    }

    /// Adds a polyphonic key pressure event
    pub fn create_key_pressure_event(
        &mut self,
        track: usize,
        tick: u32,
        voice: u8,
        note: u8,
        amount: u8,
    ) -> EventId {
        self.add_event(
            track,
            tick,
            EventKind::KeyPressure {
                voice,
                note,
                amount,
            },
        )
    }

    /// Adds a channel pressure event
    pub fn create_channel_pressure_event(
        &mut self,
        track: usize,
        tick: u32,
        voice: u8,
        amount: u8,
    ) -> EventId {
        self.add_event(track, tick, EventKind::ChannelPressure { voice, amount })
    }

    /// Adds a control change event
    pub fn create_control_change_event(
        &mut self,
        track: usize,
        tick: u32,
        voice: u8,
        controller: u8,
        value: u8,
    ) -> EventId {
        self.add_event(
            track,
            tick,
            EventKind::ControlChange {
                voice,
                controller,
                value,
            },
        )
    }

    /// Adds a program change event
    pub fn create_program_change_event(
        &mut self,
        track: usize,
        tick: u32,
        voice: u8,
        program: u8,
    ) -> EventId {
        self.add_event(track, tick, EventKind::ProgramChange { voice, program })
    }

    /// Adds a pitch wheel event. `value` is 14 bits, `0x2000` is centred.
    pub fn create_pitch_wheel_event(
        &mut self,
        track: usize,
        tick: u32,
        voice: u8,
        value: u16,
    ) -> EventId {
        self.add_event(track, tick, EventKind::PitchWheel { voice, value })
    }

    /// Adds a system exclusive event. `data` starts with its `F0` or `F7` byte.
    pub fn create_sysex_event(
        &mut self,
        track: usize,
        tick: u32,
        data: impl Into<Vec<u8>>,
    ) -> Result<EventId, FileError> {
        let data = data.into();
        if !matches!(data.first(), Some(0xF0 | 0xF7)) {
            return Err(FileError::InvalidSysEx);
        }
        Ok(self.add_event(track, tick, EventKind::SysEx(data)))
    }

    /// Adds a meta event with a raw payload
    pub fn create_meta_event(
        &mut self,
        track: usize,
        tick: u32,
        kind: impl Into<MetaType>,
        data: impl Into<Vec<u8>>,
    ) -> EventId {
        self.add_event(track, tick, EventKind::Meta(MetaEvent::new(kind, data)))
    }

    /// Adds a tempo event, given in beats per minute.
    ///
    /// Only tempo events on track 0 take part in the tempo map.
    pub fn create_tempo_event(
        &mut self,
        track: usize,
        tick: u32,
        bpm: f64,
    ) -> Result<EventId, FileError> {
        let meta = MetaEvent::tempo_from_bpm(bpm).ok_or(FileError::InvalidTempo(bpm))?;
        Ok(self.add_event(track, tick, EventKind::Meta(meta)))
    }

    /// Adds a time signature event. `denominator` must be a power of two.
    pub fn create_time_signature_event(
        &mut self,
        track: usize,
        tick: u32,
        numerator: u8,
        denominator: u8,
    ) -> Result<EventId, FileError> {
        let meta = MetaEvent::time_signature(numerator, denominator).ok_or(
            FileError::InvalidTimeSignature {
                numerator,
                denominator,
            },
        )?;
        Ok(self.add_event(track, tick, EventKind::Meta(meta)))
    }

    /// Adds a lyric meta event
    pub fn create_lyric_event(
        &mut self,
        track: usize,
        tick: u32,
        text: impl Into<Vec<u8>>,
    ) -> EventId {
        self.create_meta_event(track, tick, MetaType::Lyric, text)
    }

    /// Adds a marker meta event
    pub fn create_marker_event(
        &mut self,
        track: usize,
        tick: u32,
        text: impl Into<Vec<u8>>,
    ) -> EventId {
        self.create_meta_event(track, tick, MetaType::Marker, text)
    }

    /// Adds a track name meta event
    pub fn create_track_name_event(
        &mut self,
        track: usize,
        tick: u32,
        text: impl Into<Vec<u8>>,
    ) -> EventId {
        self.create_meta_event(track, tick, MetaType::TrackName, text)
    }

    /// Adds the channel voice event packed in a wire message word.
    ///
    /// Returns `None`, adding nothing, if the word holds no channel voice message.
    pub fn create_voice_event(&mut self, track: usize, tick: u32, message: u32) -> Option<EventId> {
        let kind = EventKind::from_wire_message(message)?;
        Some(self.add_event(track, tick, kind))
    }
}

#[test]
fn create_note_returns_the_note_on() {
    let mut file = MidiFile::new();
    let track = file.create_track();
    let on = file.create_note(track, 0, 96, 3, 60, 100, 20);
    let event = file.event(on).unwrap();
    assert!(matches!(event.kind(), EventKind::NoteOn { .. }));
    assert_eq!(file.events().len(), 2);
    assert_eq!(file.events()[1].velocity(), Some(20));
    assert_eq!(file.events()[1].tick(), 96);
}

#[test]
fn invalid_inputs_add_nothing() {
    let mut file = MidiFile::new();
    let track = file.create_track();
    assert_eq!(
        file.create_tempo_event(track, 0, 0.),
        Err(FileError::InvalidTempo(0.))
    );
    assert_eq!(
        file.create_tempo_event(track, 0, 3.),
        Err(FileError::InvalidTempo(3.))
    );
    assert_eq!(
        file.create_sysex_event(track, 0, [0x43, 0x10]),
        Err(FileError::InvalidSysEx)
    );
    assert_eq!(
        file.create_time_signature_event(track, 0, 4, 5),
        Err(FileError::InvalidTimeSignature {
            numerator: 4,
            denominator: 5
        })
    );
    assert_eq!(file.create_voice_event(track, 0, 0xFF), None);
    assert!(file.events().is_empty());
}

#[test]
fn time_signature_fields() {
    let mut file = MidiFile::new();
    let track = file.create_track();
    let id = file.create_time_signature_event(track, 0, 3, 4).unwrap();
    let event = file.event(id).unwrap();
    assert_eq!(event.numerator(), Some(3));
    assert_eq!(event.denominator(), Some(4));
    assert_eq!(event.number(), Some(0x58));
}

#[test]
fn voice_event_from_wire_word() {
    let mut file = MidiFile::new();
    let track = file.create_track();
    let id = file.create_voice_event(track, 12, 0x00_40_B1).unwrap();
    let event = file.event(id).unwrap();
    assert_eq!(event.voice(), Some(1));
    assert_eq!(event.number(), Some(0x40));
    assert_eq!(event.value(), Some(0));
    assert_eq!(event.tick(), 12);
}
