use super::{MidiFile, Timing, tempo::TempoCursor};
use crate::event::Event;

/// An event paired with the time, in seconds, at which it sounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedEvent<'a> {
    /// Seconds from the start of the file
    pub seconds: f64,
    /// The event
    pub event: &'a Event,
}

/// An iterator returned from [`MidiFile::timed_events`]
#[derive(Debug, Clone)]
pub struct TimedEventIterator<'a> {
    events: core::slice::Iter<'a, Event>,
    clock: Clock<'a>,
}

#[derive(Debug, Clone)]
enum Clock<'a> {
    Tempo(TempoCursor<'a>),
    /// Seconds per tick
    Fixed(f64),
}

impl<'a> TimedEventIterator<'a> {
    fn new(file: &'a MidiFile) -> Self {
        let clock = match file.timing {
            Timing::TicksPerQuarterNote(t) => {
                Clock::Tempo(TempoCursor::new(&file.events, t.ticks_per_quarter_note()))
            }
            Timing::Smpte(s) => {
                //ticks per second = fps × ticks per frame
                let ticks_per_second = s.fps.as_f64() * f64::from(s.ticks_per_frame);
                if ticks_per_second == 0. {
                    Clock::Fixed(0.)
                } else {
                    Clock::Fixed(1. / ticks_per_second)
                }
            }
        };
        Self {
            events: file.events.iter(),
            clock,
        }
    }
}

impl<'a> Iterator for TimedEventIterator<'a> {
    type Item = TimedEvent<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        let event = self.events.next()?;
        let seconds = match &mut self.clock {
            Clock::Tempo(cursor) => cursor.seconds_at(event.tick),
            Clock::Fixed(per_tick) => *per_tick * f64::from(event.tick),
        };
        Some(TimedEvent { seconds, event })
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.events.size_hint()
    }
}

impl ExactSizeIterator for TimedEventIterator<'_> {}

impl MidiFile {
    /// Every event in tick order with its time in seconds.
    ///
    /// Walks the tempo map once, so this is cheaper than calling
    /// [`MidiFile::time_from_tick`] for each event.
    pub fn timed_events(&self) -> TimedEventIterator<'_> {
        TimedEventIterator::new(self)
    }
}

#[cfg(test)]
fn ppq(resolution: u16) -> (MidiFile, usize) {
    let mut file = MidiFile::new();
    file.set_timing(Timing::new_ticks_per_quarter_note(resolution));
    let track = file.create_track();
    (file, track)
}

#[test]
fn test_empty_file_yields_nothing() {
    let (file, _) = ppq(480);
    assert_eq!(file.timed_events().next(), None);
}

#[test]
fn test_single_track_multiple_events_with_delta_time() {
    let (mut file, track) = ppq(480);
    file.create_tempo_event(track, 0, 120.).unwrap();
    file.create_note(track, 0, 480, 0, 60, 100, 0);
    file.create_note_on_event(track, 720, 0, 62, 80);

    let times: alloc::vec::Vec<_> = file.timed_events().map(|t| t.seconds).collect();
    assert_eq!(times, [0., 0., 0.5, 0.75]);
}

#[test]
fn test_tempo_change_mid_file() {
    let (mut file, track) = ppq(480);
    file.create_tempo_event(track, 0, 60.).unwrap();
    file.create_note_on_event(track, 480, 0, 60, 100);
    file.create_tempo_event(track, 480, 120.).unwrap();
    file.create_note_off_event(track, 960, 0, 60, 0);

    let timed: alloc::vec::Vec<_> = file.timed_events().collect();
    assert_eq!(timed.len(), 4);
    assert!((timed[1].seconds - 1.).abs() < 1e-9);
    assert!((timed[3].seconds - 1.5).abs() < 1e-9);
    for t in &timed {
        assert!((t.seconds - file.time_from_tick(t.event.tick())).abs() < 1e-9);
    }
}

#[test]
fn test_tempo_on_other_tracks_is_ignored() {
    let (mut file, _) = ppq(480);
    let second = file.create_track();
    file.create_tempo_event(second, 0, 30.).unwrap();
    file.create_note_on_event(second, 480, 1, 36, 80);

    let last = file.timed_events().last().unwrap();
    assert_eq!(last.seconds, 0.5);
}

#[test]
fn test_smpte_timing() {
    use super::SmpteFps;
    let mut file = MidiFile::new();
    file.set_timing(Timing::new_smpte(SmpteFps::Thirty, 40));
    let track = file.create_track();
    file.create_note_on_event(track, 0, 0, 60, 100);
    file.create_note_off_event(track, 1200, 0, 60, 0);
    file.create_note_on_event(track, 1800, 0, 62, 80);

    let times: alloc::vec::Vec<_> = file.timed_events().map(|t| t.seconds).collect();
    assert_eq!(times.len(), 3);
    assert_eq!(times[0], 0.);
    assert!((times[1] - 1.).abs() < 1e-9);
    assert!((times[2] - 1.5).abs() < 1e-9);
}
