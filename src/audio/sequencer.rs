//! Timed playback of the background pattern.
//!
//! Every queued entry remembers the generation it was scheduled under.
//! [`Sequencer::stop`] bumps the generation, so anything queued earlier is
//! dropped instead of played, even if its deadline has already passed.

use std::time::{Duration, Instant};

use super::synth::{pattern_tones, Voice, PATTERN_LOOP_MS};

#[derive(Clone, Debug)]
enum Slot {
    Tone(Voice),
    /// Queue the next loop.
    Repeat,
}

#[derive(Clone, Debug)]
struct Entry {
    due: Instant,
    generation: u64,
    slot: Slot,
}

#[derive(Debug, Default)]
pub struct Sequencer {
    queue: Vec<Entry>,
    generation: u64,
    playing: bool,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Begin looping from `now`.  No-op while already playing.
    pub fn start(&mut self, now: Instant) {
        if self.playing {
            return;
        }
        self.playing = true;
        self.schedule_loop(now);
    }

    pub fn stop(&mut self) {
        self.playing = false;
        self.generation += 1;
    }

    fn schedule_loop(&mut self, at: Instant) {
        let generation = self.generation;
        for (offset, voice) in pattern_tones() {
            self.queue.push(Entry {
                due: at + Duration::from_millis(offset),
                generation,
                slot: Slot::Tone(voice),
            });
        }
        self.queue.push(Entry {
            due: at + Duration::from_millis(PATTERN_LOOP_MS),
            generation,
            slot: Slot::Repeat,
        });
    }

    /// Earliest pending deadline of the current generation.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.queue
            .iter()
            .filter(|e| e.generation == self.generation)
            .map(|e| e.due)
            .min()
    }

    /// Pop every entry due by `now`, returning the tones to play.  Stale
    /// entries are discarded; a due repeat queues the following loop.
    pub fn take_due(&mut self, now: Instant) -> Vec<Voice> {
        let generation = self.generation;
        self.queue.retain(|e| e.generation == generation);

        let mut tones = Vec::new();
        // A repeat can queue tones that are themselves already due.
        loop {
            let (mut due, pending): (Vec<Entry>, Vec<Entry>) =
                self.queue.drain(..).partition(|e| e.due <= now);
            self.queue = pending;
            if due.is_empty() {
                return tones;
            }
            due.sort_by_key(|e| e.due);

            for entry in due {
                match entry.slot {
                    Slot::Tone(voice) => tones.push(voice),
                    Slot::Repeat if self.playing => self.schedule_loop(entry.due),
                    Slot::Repeat => {}
                }
            }
        }
    }

    /// Entries still waiting, stale ones included.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}
