#![doc = r#"
The seam between a [`MidiFile`](crate::file::MidiFile) and a MIDI output.

This crate never opens ports itself. A player walks
[`MidiFile::timed_events`](crate::file::MidiFile::timed_events) and hands each
event to a [`MidiSink`], which forwards it to whatever transport it wraps.
With the `midir` feature, `midir::MidiOutputConnection` is a sink.
"#]

use crate::event::{Event, EventKind};

/// Something that accepts outgoing MIDI messages.
pub trait MidiSink {
    /// The transport's error type
    type Error;

    /// Sends a short message packed as a wire message word, status byte lowest.
    fn send_message(&mut self, message: u32) -> Result<(), Self::Error>;

    /// Sends a complete system exclusive message, including its leading status byte.
    fn send_sysex(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Sends one stored event. Meta events have no wire form and are skipped.
    fn send_event(&mut self, event: &Event) -> Result<(), Self::Error> {
        match event.kind() {
            EventKind::SysEx(data) => self.send_sysex(data),
            EventKind::Meta(_) => Ok(()),
            kind => match kind.to_wire_message() {
                Some(message) => self.send_message(message),
                None => Ok(()),
            },
        }
    }
}

#[cfg(feature = "midir")]
impl MidiSink for midir::MidiOutputConnection {
    type Error = midir::SendError;

    fn send_message(&mut self, message: u32) -> Result<(), Self::Error> {
        let bytes = message.to_le_bytes();
        let len = crate::event::wire_message_len(bytes[0]);
        self.send(&bytes[..len])
    }

    fn send_sysex(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.send(data)
    }
}

#[test]
fn send_event_routes_by_kind() {
    use crate::{event::MetaType, file::MidiFile};
    use alloc::vec::Vec;

    #[derive(Default)]
    struct Recorder {
        messages: Vec<u32>,
        sysex: Vec<Vec<u8>>,
    }
    impl MidiSink for Recorder {
        type Error = ();
        fn send_message(&mut self, message: u32) -> Result<(), ()> {
            self.messages.push(message);
            Ok(())
        }
        fn send_sysex(&mut self, data: &[u8]) -> Result<(), ()> {
            self.sysex.push(data.to_vec());
            Ok(())
        }
    }

    let mut file = MidiFile::new();
    let track = file.create_track();
    file.create_note_on_event(track, 0, 1, 60, 100);
    file.create_meta_event(track, 0, MetaType::Marker, *b"verse");
    file.create_sysex_event(track, 0, [0xF0, 0x7E, 0xF7]).unwrap();

    let mut recorder = Recorder::default();
    for event in file.events() {
        recorder.send_event(event).unwrap();
    }
    assert_eq!(recorder.messages, [0x64_3C_91]);
    assert_eq!(recorder.sysex, [alloc::vec![0xF0, 0x7E, 0xF7]]);
}
