use smfile::prelude::*;

/// Helper: a format 1 file whose first track holds the given
/// `(delta, microseconds per quarter note)` tempo events
fn create_midi_with_tempos(resolution: u16, tempos: &[(u8, u32)]) -> Vec<u8> {
    let mut track = Vec::new();
    for (delta, micros) in tempos {
        let [_, hi, mid, lo] = micros.to_be_bytes();
        track.extend_from_slice(&[*delta, 0xFF, 0x51, 0x03, hi, mid, lo]);
    }
    track.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);

    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x06, 0x00, 0x01, 0x00, 0x01]);
    bytes.extend_from_slice(&resolution.to_be_bytes());
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&(track.len() as u32).to_be_bytes());
    bytes.extend_from_slice(&track);
    bytes
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_default_tempo_before_first_event() {
    let file = MidiFile::parse(&create_midi_with_tempos(480, &[(0x60, 1_000_000)])).unwrap();
    // 96 ticks at the default 120 BPM, then 60 BPM
    assert!(close(file.time_from_tick(96), 0.1));
    assert!(close(file.time_from_tick(96 + 480), 1.1));
    assert!(close(file.time_from_tick(48), 0.05));
}

#[test]
fn test_120_and_60_bpm() {
    let mut file = MidiFile::parse(&create_midi_with_tempos(480, &[(0, 500_000)])).unwrap();
    file.create_note_on_event(0, 480, 0, 60, 100);
    assert!(close(file.time_from_tick(480), 0.5));

    let tempo = file.tempo_events().next().unwrap().id();
    file.remove_event(tempo).unwrap();
    file.create_tempo_event(0, 0, 60.).unwrap();
    assert!(close(file.time_from_tick(480), 1.));
}

#[test]
fn test_tempo_events_view() {
    let file = MidiFile::parse(&create_midi_with_tempos(
        96,
        &[(0, 500_000), (96, 400_000), (96, 600_000)],
    ))
    .unwrap();
    let tempos: Vec<_> = file
        .tempo_events()
        .map(|e| (e.tick(), e.tempo().unwrap()))
        .collect();
    assert_eq!(tempos, [(0, 120.), (96, 150.), (192, 100.)]);
}

#[test]
fn test_moving_a_tempo_event_reorders_the_map() {
    let mut file = MidiFile::parse(&create_midi_with_tempos(96, &[(0, 500_000)])).unwrap();
    let slow = file.create_tempo_event(0, 10, 60.).unwrap();
    let fast = file.create_tempo_event(0, 20, 240.).unwrap();
    assert!(file.set_event_tick(slow, 30));
    let order: Vec<_> = file.tempo_events().map(|e| e.id()).skip(1).collect();
    assert_eq!(order, [fast, slow]);
}

#[test]
fn test_round_trip_drift_is_small() {
    let file = MidiFile::parse(&create_midi_with_tempos(
        480,
        &[(0, 452_000), (0x7F, 812_345), (0x50, 333_333), (0x11, 1_500_000)],
    ))
    .unwrap();
    for tick in (0..20_000).step_by(37) {
        let time = file.time_from_tick(tick);
        let back = file.tick_from_time(time);
        assert!(back.abs_diff(tick) <= 1, "{tick} -> {time} -> {back}");
    }
}

#[test]
fn test_time_is_monotonic() {
    let file = MidiFile::parse(&create_midi_with_tempos(
        120,
        &[(0, 250_000), (0x40, 2_000_000), (0x40, 100_000)],
    ))
    .unwrap();
    let times: Vec<_> = (0..1000).map(|t| file.time_from_tick(t)).collect();
    assert!(times.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_beats_follow_resolution() {
    let file = MidiFile::parse(&create_midi_with_tempos(192, &[(0, 300_000)])).unwrap();
    assert_eq!(file.beat_from_tick(96), 0.5);
    assert_eq!(file.tick_from_beat(3.25), 624);
}

#[test]
fn test_timed_events_match_time_from_tick() {
    let mut file = MidiFile::parse(&create_midi_with_tempos(
        480,
        &[(0, 500_000), (0x78, 750_000)],
    ))
    .unwrap();
    let track = file.create_track();
    for tick in (0..4000).step_by(250) {
        file.create_note_on_event(track, tick, 0, 60, 100);
    }
    let timed: Vec<_> = file.timed_events().collect();
    assert_eq!(timed.len(), file.events().len());
    for t in timed {
        assert!(close(t.seconds, file.time_from_tick(t.event.tick())));
    }
}
