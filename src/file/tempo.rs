#![doc = r#"
Tick, time and beat conversions driven by the tempo map.

With ticks per quarter note the time of a tick is the integral of a
piecewise constant tempo: 120 BPM until the first tempo event on track 0,
then whatever the latest tempo event set. SMPTE timing ignores tempo and
is linear in the frame rate.
"#]

use super::{MidiFile, Timing};
use crate::event::{DEFAULT_BPM, Event};

pub(super) fn entries(events: &[Event]) -> impl Iterator<Item = &Event> + '_ {
    events.iter().filter(|e| e.is_tempo_map_entry())
}

/// Seconds taken by `ticks` at `bpm`.
fn span(ticks: u32, bpm: f64, resolution: f64) -> f64 {
    f64::from(ticks) / resolution / (bpm / 60.)
}

/// Integrates the tempo map over ascending ticks, carrying the last
/// tempo segment between calls.
#[derive(Debug, Clone)]
pub(super) struct TempoCursor<'a> {
    rest: &'a [Event],
    resolution: f64,
    tick: u32,
    seconds: f64,
    bpm: f64,
}

impl<'a> TempoCursor<'a> {
    pub(super) fn new(events: &'a [Event], resolution: u16) -> Self {
        Self {
            rest: events,
            resolution: f64::from(resolution),
            tick: 0,
            seconds: 0.,
            bpm: DEFAULT_BPM,
        }
    }

    /// Seconds at `tick`. Ticks handed to one cursor must not decrease.
    pub(super) fn seconds_at(&mut self, tick: u32) -> f64 {
        if self.resolution == 0. {
            return 0.;
        }
        while let Some((first, rest)) = self.rest.split_first() {
            if first.tick >= tick {
                break;
            }
            self.rest = rest;
            if !first.is_tempo_map_entry() {
                continue;
            }
            let ticks = first.tick.saturating_sub(self.tick);
            self.seconds += span(ticks, self.bpm, self.resolution);
            self.tick = first.tick;
            if let Some(bpm) = first.tempo() {
                self.bpm = bpm;
            }
        }
        self.seconds + span(tick.saturating_sub(self.tick), self.bpm, self.resolution)
    }
}

impl MidiFile {
    /// Converts an absolute tick to seconds.
    ///
    /// Returns 0 while the resolution is 0.
    pub fn time_from_tick(&self, tick: u32) -> f64 {
        match self.timing {
            Timing::TicksPerQuarterNote(t) => {
                TempoCursor::new(&self.events, t.ticks_per_quarter_note()).seconds_at(tick)
            }
            Timing::Smpte(s) => {
                let ticks_per_second = f64::from(s.ticks_per_frame) * s.fps.as_f64();
                if ticks_per_second == 0. {
                    return 0.;
                }
                f64::from(tick) / ticks_per_second
            }
        }
    }

    /// Converts seconds to the tick sounding at that time, truncating.
    ///
    /// Negative times give tick 0.
    pub fn tick_from_time(&self, time: f64) -> u32 {
        match self.timing {
            Timing::TicksPerQuarterNote(t) => {
                let resolution = f64::from(t.ticks_per_quarter_note());
                if resolution == 0. {
                    return 0;
                }
                let mut seconds = 0.;
                let mut tick = 0;
                let mut bpm = DEFAULT_BPM;
                for entry in entries(&self.events) {
                    let next = seconds + span(entry.tick.saturating_sub(tick), bpm, resolution);
                    if next >= time {
                        break;
                    }
                    seconds = next;
                    tick = entry.tick;
                    if let Some(tempo) = entry.tempo() {
                        bpm = tempo;
                    }
                }
                let remaining = (time - seconds) * (bpm / 60.) * resolution;
                tick.saturating_add(remaining as u32)
            }
            Timing::Smpte(s) => {
                (time * f64::from(s.ticks_per_frame) * s.fps.as_f64()) as u32
            }
        }
    }

    /// Converts a tick to beats: quarter notes, or frames for SMPTE timing.
    pub fn beat_from_tick(&self, tick: u32) -> f64 {
        match self.timing {
            Timing::TicksPerQuarterNote(t) => match t.ticks_per_quarter_note() {
                0 => 0.,
                resolution => f64::from(tick) / f64::from(resolution),
            },
            Timing::Smpte(s) => f64::from(tick) / s.fps.as_f64(),
        }
    }

    /// Inverse of [`MidiFile::beat_from_tick`], truncating.
    pub fn tick_from_beat(&self, beat: f64) -> u32 {
        match self.timing {
            Timing::TicksPerQuarterNote(t) => {
                (beat * f64::from(t.ticks_per_quarter_note())) as u32
            }
            Timing::Smpte(s) => (beat * s.fps.as_f64()) as u32,
        }
    }
}

#[cfg(test)]
fn ppq_file(resolution: u16) -> (MidiFile, usize) {
    let mut file = MidiFile::new();
    file.set_timing(Timing::new_ticks_per_quarter_note(resolution));
    let track = file.create_track();
    (file, track)
}

#[test]
fn default_tempo_is_120() {
    let (file, _) = ppq_file(480);
    assert_eq!(file.time_from_tick(480), 0.5);
    assert_eq!(file.time_from_tick(0), 0.);
}

#[test]
fn tempo_at_tick_zero_applies() {
    let (mut file, track) = ppq_file(480);
    file.create_tempo_event(track, 0, 60.).unwrap();
    file.create_note_on_event(track, 480, 0, 60, 100);
    assert!((file.time_from_tick(480) - 1.).abs() < 1e-9);
}

#[test]
fn tempo_changes_integrate() {
    let (mut file, track) = ppq_file(480);
    file.create_tempo_event(track, 0, 120.).unwrap();
    file.create_tempo_event(track, 960, 60.).unwrap();
    // two beats at 120, then one at 60
    assert!((file.time_from_tick(960) - 1.).abs() < 1e-9);
    assert!((file.time_from_tick(1440) - 2.).abs() < 1e-9);
    assert_eq!(file.tick_from_time(2.), 1440);
    assert_eq!(file.tick_from_time(0.5), 480);
}

#[test]
fn tempo_off_track_zero_is_ignored() {
    let (mut file, _) = ppq_file(480);
    let other = file.create_track();
    file.create_tempo_event(other, 0, 60.).unwrap();
    assert_eq!(file.tempo_events().count(), 0);
    assert_eq!(file.time_from_tick(480), 0.5);
}

#[test]
fn tick_time_round_trip_within_a_tick() {
    let (mut file, track) = ppq_file(96);
    file.create_tempo_event(track, 0, 133.).unwrap();
    file.create_tempo_event(track, 200, 71.5).unwrap();
    file.create_tempo_event(track, 777, 180.).unwrap();
    for tick in [0, 1, 95, 199, 200, 201, 500, 777, 778, 5000] {
        let back = file.tick_from_time(file.time_from_tick(tick));
        assert!(back.abs_diff(tick) <= 1, "{tick} came back as {back}");
    }
}

#[test]
fn smpte_conversions_are_linear() {
    use super::SmpteFps;
    let mut file = MidiFile::new();
    file.set_timing(Timing::new_smpte(SmpteFps::TwentyFive, 40));
    assert_eq!(file.time_from_tick(1000), 1.);
    assert_eq!(file.tick_from_time(2.), 2000);
    assert_eq!(file.beat_from_tick(50), 2.);
    assert_eq!(file.tick_from_beat(2.), 50);

    file.set_timing(Timing::new_smpte(SmpteFps::TwentyNine, 10));
    assert!((file.time_from_tick(2997) - 10.).abs() < 1e-9);
}

#[test]
fn beats_use_resolution() {
    let (file, _) = ppq_file(480);
    assert_eq!(file.beat_from_tick(720), 1.5);
    assert_eq!(file.tick_from_beat(1.5), 720);
}

#[test]
fn zero_resolution_is_not_a_division_by_zero() {
    let (file, _) = ppq_file(0);
    assert_eq!(file.time_from_tick(480), 0.);
    assert_eq!(file.tick_from_time(1.), 0);
    assert_eq!(file.beat_from_tick(480), 0.);
}
