use alloc::collections::BTreeMap;

use super::{FormatType, MidiFile};
use crate::{
    FileError,
    event::{EventKind, MetaType},
};

impl MidiFile {
    #[doc = r#"
Splits a format 0 file into a format 1 file with one track per channel.

Track 0 receives every meta event except track names, which go to track 1.
Each channel, in order of its first event, then gets a track of its own,
starting at 2. System exclusive events share one track the same way.
Track 0 ends where the latest track of this file ends.

# Errors
[`FileError::NotSingleMultiChannel`] unless this file is format 0.

# Example
```rust
# use smfile::prelude::*;
let mut file = MidiFile::new();
file.set_format_type(FormatType::SingleMultiChannel);
let track = file.create_track();
file.create_track_name_event(track, 0, "Song");
file.create_note(track, 0, 10, 9, 36, 100, 0);
file.create_note(track, 5, 10, 0, 60, 100, 0);

let split = file.one_track_per_voice().unwrap();
assert_eq!(split.format_type(), FormatType::Simultaneous);
assert_eq!(split.track_count(), 4);
assert!(split.events_for_track(3).all(|e| e.voice() == Some(0)));
```
"#]
    pub fn one_track_per_voice(&self) -> Result<MidiFile, FileError> {
        if self.format != FormatType::SingleMultiChannel {
            return Err(FileError::NotSingleMultiChannel(self.format));
        }
        let end_tick = self
            .tracks()
            .map(|track| self.track_end_tick(track))
            .max()
            .unwrap_or(0);

        let mut split = MidiFile::new();
        split.set_format_type(FormatType::Simultaneous);
        split.set_timing(self.timing);
        {
            let mut batch = split.batch_insert();
            let globals = batch.create_track();
            let names = batch.create_track();
            batch.set_track_end_tick(globals, end_tick);

            let mut voice_tracks: BTreeMap<Option<u8>, usize> = BTreeMap::new();
            for event in &self.events {
                let track = match &event.kind {
                    EventKind::Meta(meta) if meta.kind() == MetaType::TrackName => names,
                    EventKind::Meta(_) => globals,
                    kind => *voice_tracks
                        .entry(kind.voice())
                        .or_insert_with(|| batch.create_track()),
                };
                batch.add_event(track, event.tick, event.kind.clone());
            }

            #[cfg(feature = "tracing")]
            tracing::debug!(
                "Split {} events into {} voice tracks",
                self.events.len(),
                voice_tracks.len()
            );
        }
        Ok(split)
    }
}

#[test]
fn format_one_cannot_be_split() {
    let file = MidiFile::new();
    assert_eq!(
        file.one_track_per_voice(),
        Err(FileError::NotSingleMultiChannel(FormatType::Simultaneous))
    );
}

#[test]
fn voices_get_tracks_in_order_of_appearance() {
    use alloc::vec::Vec;
    let mut file = MidiFile::new();
    file.set_format_type(FormatType::SingleMultiChannel);
    let track = file.create_track();
    file.create_tempo_event(track, 0, 90.).unwrap();
    file.create_program_change_event(track, 0, 5, 1);
    file.create_program_change_event(track, 0, 2, 1);
    file.create_note(track, 10, 20, 5, 60, 90, 0);
    file.create_sysex_event(track, 15, [0xF0, 0x01, 0xF7]).unwrap();
    file.create_note(track, 12, 18, 2, 64, 90, 0);
    file.set_track_end_tick(track, 40);

    let split = file.one_track_per_voice().unwrap();
    assert_eq!(split.tracks().collect::<Vec<_>>(), [0, 1, 2, 3, 4]);
    assert_eq!(split.events().len(), file.events().len());
    assert!(split.events_for_track(2).all(|e| e.voice() == Some(5)));
    assert!(split.events_for_track(3).all(|e| e.voice() == Some(2)));
    assert_eq!(split.events_for_track(4).count(), 1);
    assert_eq!(split.tempo_events().count(), 1);
    assert_eq!(split.events_for_track(1).count(), 0);
    assert_eq!(split.track_end_tick(0), 40);

    let ticks: Vec<_> = split.events().iter().map(|e| e.tick()).collect();
    let source: Vec<_> = file.events().iter().map(|e| e.tick()).collect();
    assert_eq!(ticks, source);
}
