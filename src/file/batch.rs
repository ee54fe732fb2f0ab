use super::MidiFile;
use crate::event::{EventId, EventKind};

#[doc = r#"
A scope in which events are appended without keeping the file sorted.

Created by [`MidiFile::batch_insert`]. While it lives the file can only be
reached through it; when it is dropped, on every exit path, the file is
stable-sorted once by tick.

# Example
```rust
# use smfile::prelude::*;
let mut file = MidiFile::new();
{
    let mut batch = file.batch_insert();
    let track = batch.create_track();
    for tick in (0..100u32).rev() {
        batch.add_event(track, tick, EventKind::ProgramChange { voice: 0, program: 1 });
    }
}
assert!(file.events().windows(2).all(|w| w[0].tick() <= w[1].tick()));
```
"#]
pub struct BatchInsert<'a> {
    file: &'a mut MidiFile,
}

impl BatchInsert<'_> {
    /// Appends an event; ordering is restored when the batch ends
    pub fn add_event(&mut self, track: usize, tick: u32, kind: EventKind) -> EventId {
        let event = self.file.next_event(track, tick, kind);
        let id = event.id;
        self.file.events.push(event);
        id
    }

    /// See [`MidiFile::create_track`]
    pub fn create_track(&mut self) -> usize {
        self.file.create_track()
    }

    /// See [`MidiFile::set_track_end_tick`]
    pub fn set_track_end_tick(&mut self, track: usize, tick: u32) -> bool {
        self.file.set_track_end_tick(track, tick)
    }
}

impl Drop for BatchInsert<'_> {
    fn drop(&mut self) {
        self.file.sort();
    }
}

impl MidiFile {
    /// Starts a batch of insertions that defers sorting until the returned
    /// guard is dropped.
    pub fn batch_insert(&mut self) -> BatchInsert<'_> {
        BatchInsert { file: self }
    }
}

#[test]
fn sorted_after_early_exit() {
    fn fill(file: &mut MidiFile) -> Result<(), ()> {
        let mut batch = file.batch_insert();
        let track = batch.create_track();
        batch.add_event(track, 50, EventKind::ChannelPressure { voice: 0, amount: 1 });
        batch.add_event(track, 10, EventKind::ChannelPressure { voice: 0, amount: 2 });
        let interrupted: Result<(), ()> = Err(());
        interrupted?;
        batch.add_event(track, 0, EventKind::ChannelPressure { voice: 0, amount: 3 });
        Ok(())
    }
    let mut file = MidiFile::new();
    assert!(fill(&mut file).is_err());
    let ticks: alloc::vec::Vec<_> = file.events().iter().map(|e| e.tick()).collect();
    assert_eq!(ticks, [10, 50]);
}

#[test]
fn batch_keeps_ties_in_insertion_order() {
    let mut file = MidiFile::new();
    let (a, b) = {
        let mut batch = file.batch_insert();
        batch.create_track();
        batch.add_event(0, 5, EventKind::ProgramChange { voice: 0, program: 9 });
        let a = batch.add_event(0, 1, EventKind::ProgramChange { voice: 0, program: 1 });
        let b = batch.add_event(0, 1, EventKind::ProgramChange { voice: 0, program: 2 });
        (a, b)
    };
    assert_eq!(file.events()[0].id(), a);
    assert_eq!(file.events()[1].id(), b);
}
