use pretty_assertions::assert_eq;
use smfile::prelude::*;

/// A format 0 file with a name, a tempo, and two interleaved channels
fn create_format_zero_midi() -> Vec<u8> {
    let events: &[u8] = &[
        0x00, 0xFF, 0x03, 0x04, b'S', b'o', b'n', b'g', // Track name
        0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, // 120 BPM
        0x00, 0x99, 0x24, 0x7F, // Kick on channel 10
        0x00, 0x90, 0x3C, 0x50, // Middle C on channel 1
        0x30, 0x89, 0x24, 0x00, // Kick off
        0x30, 0x80, 0x3C, 0x40, // Middle C off
        0x00, 0xF0, 0x02, 0x01, 0xF7, // SysEx
        0x00, 0x99, 0x26, 0x60, // Snare on channel 10
        0x10, 0x26, 0x00, // Snare off by running status
        0x20, 0xFF, 0x2F, 0x00,
    ];
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x06, 0x00, 0x00, 0x00, 0x01, 0x00, 0x60]);
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&(events.len() as u32).to_be_bytes());
    bytes.extend_from_slice(events);
    bytes
}

#[test]
fn test_split_format_zero() {
    let file = MidiFile::parse(&create_format_zero_midi()).unwrap();
    assert_eq!(file.format_type(), FormatType::SingleMultiChannel);

    let split = file.one_track_per_voice().unwrap();
    assert_eq!(split.format_type(), FormatType::Simultaneous);
    assert_eq!(split.timing(), file.timing());
    assert_eq!(split.tracks().collect::<Vec<_>>(), [0, 1, 2, 3, 4]);

    // globals
    assert_eq!(split.tempo_events().count(), 1);
    assert_eq!(split.events_for_track(0).count(), 1);
    // names
    let names: Vec<_> = split.events_for_track(1).filter_map(|e| e.data()).collect();
    assert_eq!(names, [b"Song"]);
    // channel 10 was seen first
    assert_eq!(split.events_for_track(2).count(), 4);
    assert!(split.events_for_track(2).all(|e| e.voice() == Some(9)));
    assert_eq!(split.events_for_track(3).count(), 2);
    assert!(split.events_for_track(3).all(|e| e.voice() == Some(0)));
    // system exclusive gets its own track
    assert_eq!(split.events_for_track(4).count(), 1);

    assert_eq!(split.track_end_tick(0), 0x90);
}

#[test]
fn test_split_keeps_tick_order() {
    let file = MidiFile::parse(&create_format_zero_midi()).unwrap();
    let split = file.one_track_per_voice().unwrap();
    let before: Vec<_> = file
        .events()
        .iter()
        .map(|e| (e.tick(), e.kind().clone()))
        .collect();
    let after: Vec<_> = split
        .events()
        .iter()
        .map(|e| (e.tick(), e.kind().clone()))
        .collect();
    assert_eq!(before, after);
}

#[test]
fn test_split_result_saves_as_format_one() {
    let split = MidiFile::parse(&create_format_zero_midi())
        .unwrap()
        .one_track_per_voice()
        .unwrap();
    let bytes = split.to_bytes().unwrap();
    assert_eq!(&bytes[8..12], &[0x00, 0x01, 0x00, 0x05]);
    let reparsed = MidiFile::parse(&bytes).unwrap();
    assert_eq!(reparsed.track_count(), 5);
    assert_eq!(reparsed.events().len(), split.events().len());
}

#[test]
fn test_split_format_one_fails() {
    let mut bytes = create_format_zero_midi();
    bytes[9] = 0x01;
    let file = MidiFile::parse(&bytes).unwrap();
    assert_eq!(
        file.one_track_per_voice().unwrap_err(),
        FileError::NotSingleMultiChannel(FormatType::Simultaneous)
    );

    bytes[9] = 0x02;
    let file = MidiFile::parse(&bytes).unwrap();
    assert!(file.one_track_per_voice().is_err());
}
