#![doc = r#"
Rusty representation of a [`MidiFile`]
"#]

mod format;
pub use format::*;

mod timing;
pub use timing::*;

mod batch;
pub use batch::*;

mod create;
pub use create::*;

mod tempo;

mod timed_event_iter;
pub use timed_event_iter::*;

mod read;
mod split;
mod write;

use crate::event::{Event, EventId, EventKind};
use alloc::vec::Vec;

/// Bookkeeping for one track of a [`MidiFile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct TrackEntry {
    index: usize,
    /// Tick of the End of Track event read from disk, or set explicitly.
    end_tick: u32,
}

#[doc = r#"
One Standard MIDI File: its header fields, its tracks and all of its events.

Events of every track live in a single list sorted by tick. Events sharing a
tick keep the order in which they were added. The tempo map is the subset of
tempo meta events on track 0 and is read straight from that list.

# Example
```rust
# use smfile::prelude::*;
let mut file = MidiFile::new();
file.set_timing(Timing::new_ticks_per_quarter_note(96));
let track = file.create_track();
let late = file.create_note_on_event(track, 96, 0, 64, 100);
let early = file.create_note_on_event(track, 0, 0, 60, 100);

let order: Vec<_> = file.events().iter().map(|e| e.id()).collect();
assert_eq!(order, vec![early, late]);
```
"#]
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "RawMidiFile")
)]
pub struct MidiFile {
    format: FormatType,
    timing: Timing,
    tracks: Vec<TrackEntry>,
    events: Vec<Event>,
    next_id: u64,
}

/// The serialized fields of a [`MidiFile`], before ordering and ids are
/// restored.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawMidiFile {
    format: FormatType,
    timing: Timing,
    tracks: Vec<TrackEntry>,
    events: Vec<Event>,
    next_id: u64,
}

#[cfg(feature = "serde")]
impl From<RawMidiFile> for MidiFile {
    fn from(raw: RawMidiFile) -> Self {
        let mut file = MidiFile {
            format: raw.format,
            timing: raw.timing,
            tracks: raw.tracks,
            events: raw.events,
            next_id: raw.next_id,
        };
        file.sort();
        // Ids must stay unique; events repeating an earlier id get a fresh one.
        let mut seen = alloc::collections::BTreeSet::new();
        let mut next_id = file.events.iter().map(|e| e.id.0 + 1).max().unwrap_or(0);
        next_id = next_id.max(file.next_id);
        for event in &mut file.events {
            if !seen.insert(event.id) {
                event.id = EventId(next_id);
                next_id += 1;
            }
        }
        file.next_id = next_id;
        file
    }
}

impl MidiFile {
    /// An empty format 1 file with zero ticks per quarter note
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every track and event and restores the defaults of [`MidiFile::new`]
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Returns the format type for the file.
    pub const fn format_type(&self) -> FormatType {
        self.format
    }

    /// Sets the format written to the header
    pub fn set_format_type(&mut self, format: FormatType) {
        self.format = format;
    }

    /// Returns header timing info
    pub const fn timing(&self) -> Timing {
        self.timing
    }

    /// Replaces the header timing
    pub fn set_timing(&mut self, timing: Timing) {
        self.timing = timing;
    }

    /// Ticks per quarter note, or ticks per frame for SMPTE timing.
    pub const fn resolution(&self) -> u16 {
        self.timing.resolution()
    }

    /// Adds a new, empty track and returns its index.
    ///
    /// Indices are never reused while a track holding them exists.
    pub fn create_track(&mut self) -> usize {
        let index = self
            .tracks
            .iter()
            .map(|t| t.index + 1)
            .max()
            .unwrap_or(0);
        self.tracks.push(TrackEntry { index, end_tick: 0 });
        index
    }

    /// Removes a track from the track table.
    ///
    /// Its events stay in the file but are no longer written by
    /// [`MidiFile::to_bytes`]. Returns false if no such track exists.
    pub fn remove_track(&mut self, track: usize) -> bool {
        let Some(pos) = self.tracks.iter().position(|t| t.index == track) else {
            return false;
        };
        self.tracks.remove(pos);
        true
    }

    /// Track indices in creation order
    pub fn tracks(&self) -> impl Iterator<Item = usize> + '_ {
        self.tracks.iter().map(|t| t.index)
    }

    /// Number of tracks
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// The tick at which a track ends: its last event, or a later End of
    /// Track position read from disk or set with [`MidiFile::set_track_end_tick`].
    pub fn track_end_tick(&self, track: usize) -> u32 {
        let last_event = self
            .events
            .iter()
            .rev()
            .find(|e| e.track == track)
            .map_or(0, |e| e.tick);
        let recorded = self
            .tracks
            .iter()
            .find(|t| t.index == track)
            .map_or(0, |t| t.end_tick);
        last_event.max(recorded)
    }

    /// Records where a track ends. Never moves the end before the last event.
    pub fn set_track_end_tick(&mut self, track: usize, tick: u32) -> bool {
        match self.tracks.iter_mut().find(|t| t.index == track) {
            Some(entry) => {
                entry.end_tick = tick;
                true
            }
            None => false,
        }
    }

    fn next_event(&mut self, track: usize, tick: u32, kind: EventKind) -> Event {
        let id = EventId(self.next_id);
        self.next_id += 1;
        Event {
            id,
            tick,
            track,
            kind,
        }
    }

    /// Inserts an event after every event with a tick lower or equal to its
    /// own, which keeps the list sorted and ties in insertion order.
    fn insert_sorted(&mut self, event: Event) {
        let at = self.events.partition_point(|e| e.tick <= event.tick);
        self.events.insert(at, event);
    }

    /// Stable sort by tick.
    fn sort(&mut self) {
        self.events.sort_by_key(|e| e.tick);
    }

    /// Adds an event at `tick` on `track`, returning its id.
    pub fn add_event(&mut self, track: usize, tick: u32, kind: EventKind) -> EventId {
        let event = self.next_event(track, tick, kind);
        let id = event.id;
        self.insert_sorted(event);
        id
    }

    /// Removes an event, returning it
    pub fn remove_event(&mut self, id: EventId) -> Option<Event> {
        let pos = self.events.iter().position(|e| e.id == id)?;
        Some(self.events.remove(pos))
    }

    /// Moves an event to another tick. It goes after any events already
    /// at that tick. Returns false if the event does not exist.
    pub fn set_event_tick(&mut self, id: EventId, tick: u32) -> bool {
        let Some(mut event) = self.remove_event(id) else {
            return false;
        };
        event.tick = tick;
        self.insert_sorted(event);
        true
    }

    /// Looks up an event
    pub fn event(&self, id: EventId) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Looks up an event for editing its payload or track.
    pub fn event_mut(&mut self, id: EventId) -> Option<&mut Event> {
        self.events.iter_mut().find(|e| e.id == id)
    }

    /// Every event, sorted by tick
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// The channel voice events on one channel, sorted by tick
    pub fn events_for_voice(&self, voice: u8) -> impl Iterator<Item = &Event> + '_ {
        self.events
            .iter()
            .filter(move |e| e.voice() == Some(voice))
    }

    /// The events of one track, sorted by tick
    pub fn events_for_track(&self, track: usize) -> impl Iterator<Item = &Event> + '_ {
        self.events.iter().filter(move |e| e.track == track)
    }

    /// The tempo map: tempo events on track 0, sorted by tick
    pub fn tempo_events(&self) -> impl Iterator<Item = &Event> + '_ {
        tempo::entries(&self.events)
    }
}

#[test]
fn equal_ticks_keep_insertion_order() {
    use crate::event::{MetaEvent, MetaType};
    let mut file = MidiFile::new();
    let track = file.create_track();
    let a = file.create_meta_event(track, 10, MetaType::Marker, *b"A");
    let b = file.create_meta_event(track, 10, MetaType::Marker, *b"B");
    file.add_event(track, 20, EventKind::Meta(MetaEvent::new(MetaType::Marker, *b"C")));
    file.add_event(track, 0, EventKind::Meta(MetaEvent::new(MetaType::Marker, *b"D")));
    file.add_event(track, 10, EventKind::Meta(MetaEvent::new(MetaType::Marker, *b"E")));

    let at_ten: Vec<_> = file
        .events()
        .iter()
        .filter(|e| e.tick() == 10)
        .map(|e| e.id())
        .collect();
    assert_eq!(&at_ten[..2], &[a, b]);
    assert_eq!(at_ten.len(), 3);
}

#[test]
fn created_tracks_never_collide() {
    let mut file = MidiFile::new();
    assert_eq!(file.create_track(), 0);
    assert_eq!(file.create_track(), 1);
    assert_eq!(file.create_track(), 2);
    assert!(file.remove_track(1));
    assert!(!file.remove_track(1));
    assert_eq!(file.create_track(), 3);
    assert_eq!(file.tracks().collect::<Vec<_>>(), [0, 2, 3]);
}

#[test]
fn remove_and_move_events() {
    let mut file = MidiFile::new();
    let track = file.create_track();
    let first = file.create_note_on_event(track, 0, 0, 60, 90);
    let second = file.create_note_off_event(track, 10, 0, 60, 64);
    assert!(file.set_event_tick(first, 20));
    assert_eq!(file.events()[0].id(), second);
    assert_eq!(file.events()[1].tick(), 20);

    let removed = file.remove_event(first).unwrap();
    assert_eq!(removed.note(), Some(60));
    assert!(file.remove_event(first).is_none());
    assert!(!file.set_event_tick(first, 0));
    assert_eq!(file.events().len(), 1);
}

#[test]
fn track_end_tick_follows_last_event() {
    let mut file = MidiFile::new();
    let track = file.create_track();
    assert_eq!(file.track_end_tick(track), 0);
    file.create_note_on_event(track, 30, 0, 60, 90);
    assert_eq!(file.track_end_tick(track), 30);
    assert!(file.set_track_end_tick(track, 100));
    assert_eq!(file.track_end_tick(track), 100);
    file.create_note_off_event(track, 150, 0, 60, 64);
    assert_eq!(file.track_end_tick(track), 150);
    assert!(!file.set_track_end_tick(9, 0));
}
