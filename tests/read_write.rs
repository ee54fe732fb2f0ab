use pretty_assertions::assert_eq;
use smfile::{prelude::*, writer::encode_varlen};

/// Helper to wrap a track's raw event bytes in a format 0 file
/// at 96 ticks per quarter note
fn create_single_track_midi(events: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x06]); // Header length
    bytes.extend_from_slice(&[0x00, 0x00]); // Format 0
    bytes.extend_from_slice(&[0x00, 0x01]); // One track
    bytes.extend_from_slice(&[0x00, 0x60]); // 96 ticks per quarter note
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&(events.len() as u32).to_be_bytes());
    bytes.extend_from_slice(events);
    bytes
}

/// The fields that survive a save/load cycle
fn summary(file: &MidiFile) -> Vec<(u32, usize, EventKind)> {
    file.events()
        .iter()
        .map(|e| (e.tick(), e.track(), e.kind().clone()))
        .collect()
}

#[test]
fn test_running_status() {
    let bytes = create_single_track_midi(&[
        0x00, 0x91, 0x3C, 0x64, // Note On, channel 1
        0x10, 0x40, 0x50, // Note On by running status
        0x10, 0x43, 0x00, // velocity 0 by running status
        0x00, 0xFF, 0x2F, 0x00,
    ]);
    let file = MidiFile::parse(&bytes).unwrap();
    let kinds: Vec<_> = file.events().iter().map(|e| e.kind().clone()).collect();
    assert_eq!(
        kinds,
        [
            EventKind::NoteOn {
                voice: 1,
                note: 0x3C,
                velocity: 0x64
            },
            EventKind::NoteOn {
                voice: 1,
                note: 0x40,
                velocity: 0x50
            },
            EventKind::NoteOff {
                voice: 1,
                note: 0x43,
                velocity: DEFAULT_RELEASE_VELOCITY
            },
        ]
    );
    assert_eq!(file.events()[2].tick(), 0x20);
}

#[test]
fn test_note_on_velocity_zero_is_note_off() {
    let bytes = create_single_track_midi(&[0x00, 0x90, 0x40, 0x00, 0x00, 0xFF, 0x2F, 0x00]);
    let file = MidiFile::parse(&bytes).unwrap();
    let event = &file.events()[0];
    assert!(matches!(event.kind(), EventKind::NoteOff { .. }));
    assert_eq!(event.note(), Some(0x40));
    assert_eq!(event.voice(), Some(0));
}

#[test]
fn test_every_channel_message() {
    let bytes = create_single_track_midi(&[
        0x00, 0x82, 0x30, 0x20, // Note Off
        0x00, 0xA3, 0x31, 0x21, // Key Pressure
        0x00, 0xB4, 0x07, 0x64, // Control Change
        0x00, 0xC5, 0x11, // Program Change
        0x00, 0xD6, 0x22, // Channel Pressure
        0x00, 0xE7, 0x7F, 0x7F, // Pitch Wheel
        0x00, 0xFF, 0x2F, 0x00,
    ]);
    let file = MidiFile::parse(&bytes).unwrap();
    let events = file.events();
    assert_eq!(events.len(), 6);
    assert_eq!(events[0].velocity(), Some(0x20));
    assert_eq!(events[1].amount(), Some(0x21));
    assert_eq!(events[2].number(), Some(0x07));
    assert_eq!(events[2].value(), Some(0x64));
    assert_eq!(events[3].number(), Some(0x11));
    assert_eq!(events[4].amount(), Some(0x22));
    assert_eq!(events[5].value(), Some(0x3FFF));
    let voices: Vec<_> = events.iter().filter_map(|e| e.voice()).collect();
    assert_eq!(voices, [2, 3, 4, 5, 6, 7]);

    // none of these use running status, so the file saves back as it was
    assert_eq!(file.to_bytes().unwrap(), bytes);
}

#[test]
fn test_rmid_wrapper() {
    let smf = create_single_track_midi(&[0x00, 0xC0, 0x05, 0x00, 0xFF, 0x2F, 0x00]);
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&((smf.len() + 12) as u32).to_be_bytes());
    bytes.extend_from_slice(b"RMID");
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&(smf.len() as u32).to_be_bytes());
    bytes.extend_from_slice(&smf);

    let wrapped = MidiFile::parse(&bytes).unwrap();
    let plain = MidiFile::parse(&smf).unwrap();
    assert_eq!(summary(&wrapped), summary(&plain));
    // Saving drops the wrapper
    assert_eq!(wrapped.to_bytes().unwrap(), smf);
}

#[test]
fn test_extra_header_and_track_bytes_are_skipped() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x08]); // two extra bytes
    bytes.extend_from_slice(&[0x00, 0x01, 0x00, 0x01, 0x00, 0x60, 0xAA, 0xBB]);
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x0A]);
    bytes.extend_from_slice(&[0x00, 0xC0, 0x05, 0x00, 0xFF, 0x2F, 0x00]);
    bytes.extend_from_slice(&[0x01, 0x02, 0x03]); // padding after End of Track

    let file = MidiFile::parse(&bytes).unwrap();
    assert_eq!(file.format_type(), FormatType::Simultaneous);
    assert_eq!(file.resolution(), 96);
    assert_eq!(file.events().len(), 1);
}

fn build_song() -> MidiFile {
    let mut file = MidiFile::new();
    file.set_timing(Timing::new_ticks_per_quarter_note(480));
    let conductor = file.create_track();
    let piano = file.create_track();
    let drums = file.create_track();

    file.create_track_name_event(conductor, 0, "Conductor");
    file.create_tempo_event(conductor, 0, 100.).unwrap();
    file.create_time_signature_event(conductor, 0, 6, 8).unwrap();
    file.create_tempo_event(conductor, 1920, 80.).unwrap();
    file.create_marker_event(conductor, 960, "Bridge");

    file.create_track_name_event(piano, 0, "Piano");
    file.create_program_change_event(piano, 0, 0, 1);
    file.create_control_change_event(piano, 0, 0, 7, 100);
    for (i, note) in [60u8, 64, 67, 72].into_iter().enumerate() {
        let start = i as u32 * 240;
        file.create_note(piano, start, start + 200, 0, note, 90, 40);
    }
    file.create_pitch_wheel_event(piano, 900, 0, 0x1234);
    file.create_key_pressure_event(piano, 100, 0, 60, 33);
    file.create_channel_pressure_event(piano, 120, 0, 44);
    file.create_lyric_event(piano, 240, "la");

    file.create_note(drums, 0, 10, 9, 36, 127, 0);
    file.create_note(drums, 480, 490, 9, 38, 100, 0);
    file.create_sysex_event(drums, 0, [0xF0, 0x7E, 0x7F, 0x09, 0x01, 0xF7])
        .unwrap();
    file.create_meta_event(drums, 20, 0x21u8, [0x00]);
    file.set_track_end_tick(drums, 1920);
    file
}

#[test]
fn test_round_trip_keeps_events() {
    let file = build_song();
    let bytes = file.to_bytes().unwrap();
    let parsed = MidiFile::parse(&bytes).unwrap();

    assert_eq!(parsed.format_type(), file.format_type());
    assert_eq!(parsed.timing(), file.timing());
    assert_eq!(parsed.tracks().collect::<Vec<_>>(), [0, 1, 2]);
    for track in file.tracks() {
        assert_eq!(parsed.track_end_tick(track), file.track_end_tick(track));
        let saved: Vec<_> = file
            .events_for_track(track)
            .map(|e| (e.tick(), e.kind().clone()))
            .collect();
        let loaded: Vec<_> = parsed
            .events_for_track(track)
            .map(|e| (e.tick(), e.kind().clone()))
            .collect();
        assert_eq!(saved, loaded);
    }
    assert_eq!(parsed.events().len(), file.events().len());
    assert_eq!(parsed.to_bytes().unwrap(), bytes);
}

#[test]
fn test_resave_is_byte_identical() {
    let bytes = build_song().to_bytes().unwrap();
    let once = MidiFile::parse(&bytes).unwrap().to_bytes().unwrap();
    let twice = MidiFile::parse(&once).unwrap().to_bytes().unwrap();
    assert_eq!(once, bytes);
    assert_eq!(twice, once);
}

#[test]
fn test_time_signature_survives() {
    let parsed = MidiFile::parse(&build_song().to_bytes().unwrap()).unwrap();
    let signature = parsed
        .events()
        .iter()
        .find(|e| e.kind().is_meta(MetaType::TimeSignature))
        .unwrap();
    assert_eq!(signature.numerator(), Some(6));
    assert_eq!(signature.denominator(), Some(8));
    assert_eq!(signature.data(), Some(&[6, 3, 24, 8][..]));
}

#[test]
fn test_events_stay_sorted_and_stable() {
    let mut file = MidiFile::new();
    let track = file.create_track();
    let a = file.create_marker_event(track, 100, "A");
    let b = file.create_marker_event(track, 100, "B");
    for tick in [500, 0, 100, 99, 101, 100, 7] {
        file.create_program_change_event(track, tick, 0, 0);
    }
    let ticks: Vec<_> = file.events().iter().map(|e| e.tick()).collect();
    let mut sorted = ticks.clone();
    sorted.sort();
    assert_eq!(ticks, sorted);

    let at_100: Vec<_> = file
        .events()
        .iter()
        .filter(|e| e.tick() == 100)
        .map(|e| e.id())
        .collect();
    assert_eq!(at_100[..2], [a, b]);

    // A and B also keep their order through a save/load cycle
    let parsed = MidiFile::parse(&file.to_bytes().unwrap()).unwrap();
    let markers: Vec<_> = parsed
        .events()
        .iter()
        .filter(|e| e.kind().is_meta(MetaType::Marker))
        .filter_map(|e| e.data())
        .collect();
    assert_eq!(markers, [b"A", b"B"]);
}

#[test]
fn test_varlen_round_trip() {
    let mut samples: Vec<u32> = vec![0, 1, 0x7F, 0x80, 0x3FFF, 0x4000, 0x1F_FFFF, 0x20_0000];
    samples.extend((0..28).map(|shift| (1u32 << shift) - 1));
    samples.extend((0..2000u32).map(|i| i.wrapping_mul(0x9E37_79B9) & 0x0FFF_FFFF));
    samples.push(0x0FFF_FFFF);

    for value in samples {
        let mut writer = Writer::new();
        writer.write_varlen(value).unwrap();
        let bytes = writer.into_bytes();
        assert!(bytes.len() <= 4);
        let (_, len) = encode_varlen(value).unwrap();
        assert_eq!(bytes.len(), len);
        let mut reader = Reader::from_byte_slice(&bytes);
        assert_eq!(reader.read_varlen().unwrap(), value);
        assert!(reader.is_at_end());
    }
    assert_eq!(
        encode_varlen(0x1000_0000).unwrap_err(),
        FileError::VarLenOverflow(0x1000_0000)
    );
}

#[test]
fn test_delta_too_large_fails_to_save() {
    let mut file = MidiFile::new();
    let track = file.create_track();
    file.create_program_change_event(track, 0x1000_0000, 0, 0);
    assert_eq!(
        file.to_bytes().unwrap_err(),
        FileError::VarLenOverflow(0x1000_0000)
    );
}

#[cfg(feature = "std")]
#[test]
fn test_save_and_load_path() {
    let path = std::env::temp_dir().join(format!("smfile-song-{}.mid", std::process::id()));
    let song = build_song();
    song.save(&path).unwrap();

    let mut loaded = MidiFile::new();
    loaded.load(&path).unwrap();
    assert_eq!(loaded.to_bytes().unwrap(), song.to_bytes().unwrap());

    loaded.clear();
    assert_eq!(loaded, MidiFile::new());
    std::fs::remove_file(&path).unwrap();
}
