use std::sync::{Arc, Mutex};

use fuel_rush::audio::{SoundSystem, ToneSink, SAMPLE_RATE};
use fuel_rush::entities::SoundCue;
use fuel_rush::error::AudioError;

/// Remembers the length and rate of every buffer it is handed.
struct RecordingSink {
    played: Arc<Mutex<Vec<(usize, u32)>>>,
}

impl ToneSink for RecordingSink {
    fn play(&mut self, samples: Vec<f32>, sample_rate: u32) {
        assert!(samples.iter().all(|s| (-1.0..=1.0).contains(s)));
        self.played.lock().unwrap().push((samples.len(), sample_rate));
    }
}

fn recording() -> (Arc<Mutex<Vec<(usize, u32)>>>, SoundSystem) {
    let played = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&played);
    let sound = SoundSystem::with_sink(move || Ok(RecordingSink { played: log }))
        .expect("recording sink always opens");
    (played, sound)
}

#[test]
fn disabled_handle_ignores_everything() {
    let mut sound = SoundSystem::disabled();
    assert!(!sound.is_enabled());
    sound.play(SoundCue::Collision);
    sound.start_music();
    sound.stop_music();
    sound.shutdown();
    sound.shutdown();
}

#[test]
fn failing_device_is_reported() {
    let result = SoundSystem::with_sink(|| -> Result<RecordingSink, AudioError> {
        Err(AudioError::Device("no card".into()))
    });
    assert!(matches!(result, Err(AudioError::Device(_))));
}

#[test]
fn cues_reach_the_sink_in_order() {
    let (played, mut sound) = recording();
    assert!(sound.is_enabled());
    sound.play(SoundCue::Collision);
    sound.play(SoundCue::FuelPickup);
    sound.shutdown();

    let played = played.lock().unwrap();
    let rate = SAMPLE_RATE as usize;
    assert_eq!(played.len(), 2);
    // 0.3 s crash, then 0.2 s chime.
    assert!(played[0].0.abs_diff(rate * 3 / 10) <= 1);
    assert!(played[1].0.abs_diff(rate / 5) <= 1);
    assert!(played.iter().all(|&(_, r)| r == SAMPLE_RATE));
}

#[test]
fn music_starts_with_melody_and_bass() {
    let (played, mut sound) = recording();
    sound.start_music();
    sound.stop_music();
    sound.shutdown();

    // The first note of each line is due immediately; stopping drops the rest.
    let n = played.lock().unwrap().len();
    assert!((2..=4).contains(&n), "{n}");
}

#[test]
fn shutdown_is_idempotent() {
    let (_, mut sound) = recording();
    sound.shutdown();
    sound.shutdown();
    assert!(!sound.is_enabled());
}
