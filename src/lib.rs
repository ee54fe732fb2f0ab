#![doc = r#"
# smfile

Read, edit and write Standard MIDI Files (SMF).

A [`MidiFile`](crate::file::MidiFile) owns every event of every track in one
tick-ordered list, together with the track table and the file timing. The
tempo events of track 0 form the tempo map used to move between ticks,
seconds and beats.

```rust
use smfile::prelude::*;

let mut file = MidiFile::new();
file.set_timing(Timing::new_ticks_per_quarter_note(480));
let track = file.create_track();
file.create_tempo_event(track, 0, 120.).unwrap();
file.create_note(track, 0, 480, 0, 60, 100, 64);

let bytes = file.to_bytes().unwrap();
let parsed = MidiFile::parse(&bytes).unwrap();

assert_eq!(parsed.time_from_tick(480), 0.5);
```

# Features
- `std` (default): load and save from paths.
- `tracing` (default): log skipped or suspicious input through `tracing`.
- `serde`: serialize the model types.
- `midir`: send events to a `midir` output connection.
"#]
#![warn(missing_docs)]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod error;
pub use error::*;

pub mod event;
pub mod file;
pub mod reader;
pub mod sink;
pub mod writer;

/// Commonly used types
pub mod prelude {
    pub use crate::{
        error::*,
        event::*,
        file::*,
        reader::{ReadResult, Reader, ReaderError, ReaderErrorKind},
        sink::MidiSink,
        writer::Writer,
    };
}
