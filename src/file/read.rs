use alloc::vec::Vec;

use super::{BatchInsert, DEFAULT_RELEASE_VELOCITY, FormatType, MidiFile, Timing};
use crate::{
    ChunkError, HeaderError, TrackError,
    event::{EventKind, MetaEvent, MetaType, channel_data_len},
    reader::{ReadResult, Reader, ReaderError},
};

/// The tag and extent of one chunk. `start` is the offset of its first
/// payload byte.
#[derive(Debug, Clone, Copy)]
struct ChunkHeader {
    tag: [u8; 4],
    len: u32,
    start: usize,
}

impl ChunkHeader {
    fn read(reader: &mut Reader<'_>) -> ReadResult<Self> {
        let tag = reader.read_exact_size()?;
        let len = reader.read_u32()?;
        Ok(Self {
            tag,
            len,
            start: reader.buffer_position(),
        })
    }

    fn end(&self) -> usize {
        self.start.saturating_add(self.len as usize)
    }

    fn tag_position(&self) -> usize {
        self.start.saturating_sub(8)
    }
}

impl MidiFile {
    #[doc = r#"
Decodes a Standard MIDI File, optionally wrapped in a RIFF `RMID` container.

Exactly as many `MTrk` chunks as the header announces are read. Bytes left
at the end of a chunk, and anything after the last track, are skipped.

# Errors
Fails on a malformed header or wrapper, a chunk other than `MTrk` where a
track is expected, a malformed event stream, or input that ends early.
No partially decoded file is ever returned.

# Example
```rust
# use smfile::prelude::*;
let bytes = [
    b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 1, 0, 96,
    b'M', b'T', b'r', b'k', 0, 0, 0, 12,
    0x00, 0x90, 0x3C, 0x64,
    0x60, 0x3C, 0x00, // running status, velocity 0
    0x00, 0xFF, 0x2F, 0x00,
    0x00,
];
let file = MidiFile::parse(&bytes).unwrap();
assert_eq!(file.events().len(), 2);
assert!(matches!(file.events()[1].kind(), EventKind::NoteOff { note: 0x3C, .. }));
assert_eq!(file.track_end_tick(0), 96);
```
"#]
    pub fn parse(data: &[u8]) -> ReadResult<Self> {
        let mut reader = Reader::from_byte_slice(data);
        let mut chunk = ChunkHeader::read(&mut reader)?;

        if &chunk.tag == b"RIFF" {
            let form = reader.read_exact_size()?;
            if &form != b"RMID" {
                return Err(ReaderError::parse_error(
                    chunk.start,
                    HeaderError::NotRmid(form),
                ));
            }
            let data_chunk = ChunkHeader::read(&mut reader)?;
            if &data_chunk.tag != b"data" {
                return Err(ReaderError::parse_error(
                    data_chunk.tag_position(),
                    HeaderError::MissingRmidData(data_chunk.tag),
                ));
            }
            chunk = ChunkHeader::read(&mut reader)?;
        }

        if &chunk.tag != b"MThd" {
            return Err(ReaderError::parse_error(
                chunk.tag_position(),
                HeaderError::MissingHeader(chunk.tag),
            ));
        }

        let format = FormatType::from(reader.read_u16()?);
        #[cfg(feature = "tracing")]
        if let FormatType::Other(word) = format {
            tracing::warn!("Unknown format {word}, reading tracks anyway");
        }
        let track_count = reader.read_u16()?;
        let timing = Timing::read(&mut reader)?;

        #[cfg(feature = "tracing")]
        if chunk.len > 6 {
            tracing::debug!("Skipping {} extra header bytes", chunk.len - 6);
        }
        reader.seek(chunk.end())?;

        let mut file = MidiFile::new();
        file.set_format_type(format);
        file.set_timing(timing);
        {
            let mut batch = file.batch_insert();
            for _ in 0..track_count {
                let chunk = ChunkHeader::read(&mut reader)?;
                if &chunk.tag != b"MTrk" {
                    return Err(ReaderError::parse_error(
                        chunk.tag_position(),
                        ChunkError::Unexpected {
                            expected: *b"MTrk",
                            found: chunk.tag,
                        },
                    ));
                }
                read_track(&mut reader, &mut batch, &chunk)?;
                reader.seek(chunk.end())?;
            }
        }
        Ok(file)
    }

    /// Replaces this file with the contents of the file at `path`.
    ///
    /// On failure `self` is left untouched.
    #[cfg(feature = "std")]
    pub fn load(&mut self, path: impl AsRef<std::path::Path>) -> Result<(), crate::SmfError> {
        let bytes = std::fs::read(path.as_ref())?;
        match Self::parse(&bytes) {
            Ok(file) => {
                *self = file;
                Ok(())
            }
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::debug!("Failed to load {}: {e}", path.as_ref().display());
                Err(e.into())
            }
        }
    }
}

/// Decodes the events of one `MTrk` chunk into a new track.
///
/// The scan stops at End of Track or at the end of the chunk, whichever
/// comes first.
fn read_track(
    reader: &mut Reader<'_>,
    batch: &mut BatchInsert<'_>,
    chunk: &ChunkHeader,
) -> ReadResult<()> {
    let track = batch.create_track();
    let end = chunk.end();
    let mut tick: u32 = 0;
    let mut running_status: Option<u8> = None;
    let mut end_of_track = false;

    while !end_of_track && reader.buffer_position() < end {
        let event_start = reader.buffer_position();
        tick = tick.saturating_add(reader.read_varlen()?);

        let status = match reader.peek_next()? {
            byte if byte & 0x80 != 0 => {
                reader.read_next()?;
                byte
            }
            byte => running_status.ok_or_else(|| {
                ReaderError::parse_error(reader.buffer_position(), TrackError::NoRunningStatus(byte))
            })?,
        };

        match status {
            0x80..=0xEF => {
                running_status = Some(status);
                let data1 = reader.read_next()?;
                let data2 = match channel_data_len(status) {
                    2 => reader.read_next()?,
                    _ => 0,
                };
                let kind = match EventKind::from_channel_bytes(status, data1, data2) {
                    Some(EventKind::NoteOn {
                        voice,
                        note,
                        velocity: 0,
                    }) => EventKind::NoteOff {
                        voice,
                        note,
                        velocity: DEFAULT_RELEASE_VELOCITY,
                    },
                    Some(kind) => kind,
                    None => {
                        return Err(ReaderError::parse_error(
                            event_start,
                            TrackError::UnsupportedStatus(status),
                        ));
                    }
                };
                batch.add_event(track, tick, kind);
            }
            0xF0 | 0xF7 => {
                running_status = None;
                let len = reader.read_varlen()? as usize;
                let payload = reader.read_exact(len)?;
                let mut data = Vec::with_capacity(len + 1);
                data.push(status);
                data.extend_from_slice(payload);
                batch.add_event(track, tick, EventKind::SysEx(data));
            }
            // Running status carries across meta events.
            0xFF => {
                let kind = MetaType::from(reader.read_next()?);
                let len = reader.read_varlen()? as usize;
                let data = reader.read_exact(len)?;
                if kind == MetaType::EndOfTrack {
                    end_of_track = true;
                } else {
                    batch.add_event(track, tick, EventKind::Meta(MetaEvent::new(kind, data)));
                }
            }
            other => {
                return Err(ReaderError::parse_error(
                    event_start,
                    TrackError::UnsupportedStatus(other),
                ));
            }
        }

        if reader.buffer_position() == event_start {
            return Err(ReaderError::parse_error(event_start, TrackError::Stalled));
        }
    }

    #[cfg(feature = "tracing")]
    if !end_of_track {
        tracing::warn!("Track {track} has no End of Track event, ending at tick {tick}");
    }
    batch.set_track_end_tick(track, tick);
    Ok(())
}

#[cfg(test)]
fn single_track(events: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&[0, 0, 0, 6, 0, 0, 0, 1, 0x01, 0xE0]);
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&(events.len() as u32).to_be_bytes());
    bytes.extend_from_slice(events);
    bytes
}

#[test]
fn data_byte_without_running_status_fails() {
    let bytes = single_track(&[0x00, 0x40, 0x40, 0x00, 0xFF, 0x2F, 0x00]);
    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &crate::reader::ReaderErrorKind::ParseError(TrackError::NoRunningStatus(0x40).into())
    );
}

#[test]
fn running_status_survives_meta() {
    let bytes = single_track(&[
        0x00, 0x90, 0x40, 0x40, //
        0x00, 0xFF, 0x06, 0x01, b'x', //
        0x08, 0x41, 0x40, //
        0x00, 0xFF, 0x2F, 0x00,
    ]);
    let file = MidiFile::parse(&bytes).unwrap();
    let notes: Vec<_> = file
        .events()
        .iter()
        .filter_map(|e| Some((e.tick(), e.note()?)))
        .collect();
    assert_eq!(notes, [(0, 0x40), (8, 0x41)]);
}

#[test]
fn sysex_cancels_running_status() {
    let bytes = single_track(&[
        0x00, 0x90, 0x40, 0x40, //
        0x00, 0xF0, 0x01, 0xF7, //
        0x00, 0x41, 0x40, //
        0x00, 0xFF, 0x2F, 0x00,
    ]);
    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &crate::reader::ReaderErrorKind::ParseError(TrackError::NoRunningStatus(0x41).into())
    );
}

#[test]
fn system_common_status_is_rejected() {
    let bytes = single_track(&[0x00, 0xF2, 0x00, 0x00]);
    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &crate::reader::ReaderErrorKind::ParseError(TrackError::UnsupportedStatus(0xF2).into())
    );
}

#[test]
fn sysex_keeps_its_status_byte() {
    let bytes = single_track(&[
        0x10, 0xF0, 0x03, 0x43, 0x12, 0xF7, //
        0x00, 0xFF, 0x2F, 0x00,
    ]);
    let file = MidiFile::parse(&bytes).unwrap();
    assert_eq!(file.events().len(), 1);
    assert_eq!(file.events()[0].data(), Some(&[0xF0, 0x43, 0x12, 0xF7][..]));
    assert_eq!(file.events()[0].tick(), 0x10);
}

#[test]
fn missing_end_of_track_uses_last_tick() {
    let bytes = single_track(&[0x00, 0xC0, 0x05, 0x20, 0xC0, 0x06]);
    let file = MidiFile::parse(&bytes).unwrap();
    assert_eq!(file.events().len(), 2);
    assert_eq!(file.track_end_tick(0), 0x20);
}

#[test]
fn end_of_track_tick_is_recorded() {
    let bytes = single_track(&[0x00, 0xC0, 0x05, 0x83, 0x60, 0xFF, 0x2F, 0x00]);
    let file = MidiFile::parse(&bytes).unwrap();
    assert_eq!(file.track_end_tick(0), 480);
}
