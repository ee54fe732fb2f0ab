use alloc::vec::Vec;

use super::MidiFile;
use crate::{
    FileError,
    event::{EventKind, MetaType, channel_data_len},
    writer::Writer,
};

/// Payload length of the `MThd` chunk we write.
const HEADER_LEN: u32 = 6;

impl MidiFile {
    #[doc = r#"
Encodes the file as a Standard MIDI File.

Tracks are written in creation order. Each track ends with an End of Track
event at [`MidiFile::track_end_tick`]; End of Track meta events stored in
the file are not written. Running status is never used.

# Errors
Fails if there are more than 65535 tracks, if a delta time, sysex or meta
payload is too long for a variable length quantity, or if a system
exclusive payload is empty.

# Example
```rust
# use smfile::prelude::*;
let mut file = MidiFile::new();
file.set_format_type(FormatType::SingleMultiChannel);
file.set_timing(Timing::new_ticks_per_quarter_note(96));
let track = file.create_track();
file.create_program_change_event(track, 0, 0, 5);

let bytes = file.to_bytes().unwrap();
assert_eq!(&bytes[..14], b"MThd\0\0\0\x06\0\0\0\x01\0\x60");
assert_eq!(&bytes[14..], b"MTrk\0\0\0\x07\0\xC0\x05\0\xFF\x2F\0");
```
"#]
    pub fn to_bytes(&self) -> Result<Vec<u8>, FileError> {
        let track_count = self.tracks.len();
        let track_count =
            u16::try_from(track_count).map_err(|_| FileError::TooManyTracks(track_count))?;

        let mut writer = Writer::new();
        writer.write_bytes(b"MThd");
        writer.write_u32(HEADER_LEN);
        writer.write_u16(self.format.into());
        writer.write_u16(track_count);
        writer.write_bytes(&self.timing.to_bytes());

        for track in self.tracks() {
            writer.write_bytes(b"MTrk");
            let len_at = writer.placeholder_u32();
            let start = writer.position();

            let mut tick = 0;
            for event in self.events_for_track(track) {
                if event.kind.is_meta(MetaType::EndOfTrack) {
                    continue;
                }
                writer.write_varlen(event.tick.saturating_sub(tick))?;
                tick = tick.max(event.tick);
                write_event(&mut writer, &event.kind)?;
            }

            writer.write_varlen(self.track_end_tick(track).saturating_sub(tick))?;
            writer.write_bytes(&[0xFF, 0x2F, 0x00]);

            let len = writer.position() - start;
            writer.patch_u32(len_at, len as u32);
        }

        Ok(writer.into_bytes())
    }

    /// Writes [`MidiFile::to_bytes`] to `path`, replacing any existing file.
    #[cfg(feature = "std")]
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<(), crate::SmfError> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

/// Writes the status and data bytes of one event, without its delta time.
fn write_event(writer: &mut Writer, kind: &EventKind) -> Result<(), FileError> {
    match kind {
        EventKind::SysEx(data) => {
            let (status, payload) = data.split_first().ok_or(FileError::InvalidSysEx)?;
            writer.write_u8(*status);
            writer.write_varlen(payload.len() as u32)?;
            writer.write_bytes(payload);
        }
        EventKind::Meta(meta) => {
            writer.write_u8(0xFF);
            writer.write_u8(meta.number() & 0x7F);
            writer.write_varlen(meta.data().len() as u32)?;
            writer.write_bytes(meta.data());
        }
        channel => {
            if let Some(bytes) = channel.channel_bytes() {
                let len = 1 + channel_data_len(bytes[0]);
                writer.write_bytes(&bytes[..len]);
            }
        }
    }
    Ok(())
}

#[test]
fn empty_sysex_is_rejected() {
    let mut file = MidiFile::new();
    let track = file.create_track();
    file.add_event(track, 0, EventKind::SysEx(Vec::new()));
    assert_eq!(file.to_bytes(), Err(FileError::InvalidSysEx));
}

#[test]
fn stored_end_of_track_is_not_duplicated() {
    let mut file = MidiFile::new();
    let track = file.create_track();
    file.create_meta_event(track, 10, MetaType::EndOfTrack, []);
    let bytes = file.to_bytes().unwrap();
    assert_eq!(&bytes[14..], b"MTrk\0\0\0\x04\x0A\xFF\x2F\0");
}

#[test]
fn end_of_track_waits_for_recorded_end() {
    let mut file = MidiFile::new();
    let track = file.create_track();
    file.create_note(track, 0, 0x10, 1, 60, 100, 0);
    file.set_track_end_tick(track, 0x30);
    let bytes = file.to_bytes().unwrap();
    assert_eq!(
        &bytes[22..],
        &[
            0x00, 0x91, 60, 100, // note on
            0x10, 0x81, 60, 0, // note off
            0x20, 0xFF, 0x2F, 0x00,
        ]
    );
}

#[test]
fn pitch_wheel_and_pressure_bytes() {
    let mut file = MidiFile::new();
    let track = file.create_track();
    file.create_pitch_wheel_event(track, 0, 0, 0x2000);
    file.create_channel_pressure_event(track, 0, 3, 0x55);
    let bytes = file.to_bytes().unwrap();
    assert_eq!(
        &bytes[22..],
        &[0x00, 0xE0, 0x00, 0x40, 0x00, 0xD3, 0x55, 0x00, 0xFF, 0x2F, 0x00]
    );
}

#[test]
fn meta_type_and_sysex_layout() {
    let mut file = MidiFile::new();
    let track = file.create_track();
    file.create_sysex_event(track, 0, [0xF0, 0x7E, 0xF7]).unwrap();
    file.create_meta_event(track, 0, 0xA1u8, *b"hi");
    let bytes = file.to_bytes().unwrap();
    assert_eq!(
        &bytes[22..],
        &[
            0x00, 0xF0, 0x02, 0x7E, 0xF7, //
            0x00, 0xFF, 0x21, 0x02, b'h', b'i', //
            0x00, 0xFF, 0x2F, 0x00,
        ]
    );
}
