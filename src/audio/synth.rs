//! Oscillator voices and the cue/pattern tables built from them.

use std::f32::consts::TAU;

use rand::Rng;

use crate::entities::SoundCue;

pub const SAMPLE_RATE: u32 = 44_100;

/// Mix level of the background pattern.
const MUSIC_BUS: f32 = 0.3;
/// Mix level of the engine hum.
const ENGINE_BUS: f32 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
}

impl Waveform {
    /// One sample at `phase` cycles (only the fractional part matters).
    fn sample(self, phase: f32) -> f32 {
        let p = phase.fract();
        match self {
            Waveform::Sine => (p * TAU).sin(),
            Waveform::Square => {
                if p < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => 2.0 * p - 1.0,
        }
    }
}

/// One oscillator with a linear pitch glide and a two-segment linear
/// envelope: `start_gain` → `peak` over `attack`, then `peak` → 0 at
/// `duration`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Voice {
    pub waveform: Waveform,
    pub freq_start: f32,
    pub freq_end: f32,
    pub start_gain: f32,
    pub peak: f32,
    pub attack: f32,
    pub duration: f32,
    pub bus: f32,
}

impl Voice {
    /// A fixed-pitch voice that decays linearly from `gain` to silence.
    pub fn decay(waveform: Waveform, freq: f32, gain: f32, duration: f32, bus: f32) -> Voice {
        Voice {
            waveform,
            freq_start: freq,
            freq_end: freq,
            start_gain: gain,
            peak: gain,
            attack: 0.0,
            duration,
            bus,
        }
    }

    pub fn glide(mut self, freq_end: f32) -> Voice {
        self.freq_end = freq_end;
        self
    }

    fn gain_at(&self, t: f32) -> f32 {
        if t >= self.duration {
            0.0
        } else if t < self.attack {
            self.start_gain + (self.peak - self.start_gain) * (t / self.attack)
        } else {
            let release = (self.duration - self.attack).max(f32::EPSILON);
            self.peak * (1.0 - (t - self.attack) / release)
        }
    }

    fn freq_at(&self, t: f32) -> f32 {
        let k = (t / self.duration).clamp(0.0, 1.0);
        self.freq_start + (self.freq_end - self.freq_start) * k
    }
}

/// Render and mix `voices` into one mono buffer as long as the longest.
pub fn render(voices: &[Voice], sample_rate: u32) -> Vec<f32> {
    let longest = voices.iter().map(|v| v.duration).fold(0.0, f32::max);
    let len = (longest * sample_rate as f32) as usize;
    let mut out = vec![0.0f32; len];
    let dt = 1.0 / sample_rate as f32;

    for voice in voices {
        let mut phase = 0.0f32;
        let n = ((voice.duration * sample_rate as f32) as usize).min(len);
        for (i, sample) in out.iter_mut().take(n).enumerate() {
            let t = i as f32 * dt;
            *sample += voice.waveform.sample(phase) * voice.gain_at(t) * voice.bus;
            phase += voice.freq_at(t) * dt;
        }
    }
    for sample in &mut out {
        *sample = sample.clamp(-1.0, 1.0);
    }
    out
}

/// Voices for a one-shot cue.  The engine hum is detuned at random each time.
pub fn cue_voices(cue: SoundCue, rng: &mut impl Rng) -> Vec<Voice> {
    match cue {
        SoundCue::Engine => vec![
            Voice::decay(Waveform::Sawtooth, rng.gen_range(80.0..120.0), 0.8, 0.1, ENGINE_BUS),
            Voice::decay(Waveform::Square, rng.gen_range(100.0..300.0), 0.8, 0.1, ENGINE_BUS),
        ],
        SoundCue::Collision => {
            vec![Voice::decay(Waveform::Square, 150.0, 0.5, 0.3, 1.0).glide(50.0)]
        }
        SoundCue::FuelPickup => {
            vec![Voice::decay(Waveform::Sine, 400.0, 0.3, 0.2, 1.0).glide(800.0)]
        }
    }
}

// ── Background pattern ───────────────────────────────────────────────────────

/// Melody as (Hz, seconds): an A-major run up and down, then a G run.
const MELODY: [(f32, f32); 14] = [
    (220.0, 0.2),
    (277.0, 0.2),
    (330.0, 0.2),
    (440.0, 0.4),
    (330.0, 0.2),
    (277.0, 0.2),
    (220.0, 0.4),
    (247.0, 0.2),
    (294.0, 0.2),
    (330.0, 0.2),
    (392.0, 0.4),
    (330.0, 0.2),
    (294.0, 0.2),
    (247.0, 0.4),
];

const BASS: [f32; 8] = [110.0, 110.0, 138.0, 138.0, 123.0, 123.0, 110.0, 110.0];

/// Melody onsets are 600 ms per second of preceding note length.
const MELODY_MS_PER_SECOND: f32 = 600.0;
const BASS_STEP_MS: u64 = 600;
const BASS_LENGTH: f32 = 0.6;

/// Length of one loop of the background pattern.
pub const PATTERN_LOOP_MS: u64 = 4800;

/// Every tone of one loop with its onset in milliseconds from loop start.
pub fn pattern_tones() -> Vec<(u64, Voice)> {
    let mut tones = Vec::with_capacity(MELODY.len() + BASS.len());

    let mut elapsed = 0.0f32;
    for &(freq, duration) in &MELODY {
        let voice = Voice {
            waveform: Waveform::Square,
            freq_start: freq,
            freq_end: freq,
            start_gain: 0.0,
            peak: 0.5,
            attack: 0.01,
            duration,
            bus: MUSIC_BUS,
        };
        tones.push(((elapsed * MELODY_MS_PER_SECOND).round() as u64, voice));
        elapsed += duration;
    }
    for (i, &freq) in BASS.iter().enumerate() {
        let voice = Voice::decay(Waveform::Sawtooth, freq, 0.3, BASS_LENGTH, MUSIC_BUS);
        tones.push((i as u64 * BASS_STEP_MS, voice));
    }
    tones
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn render_length_matches_longest_voice() {
        let voices = [
            Voice::decay(Waveform::Sine, 440.0, 0.5, 0.1, 1.0),
            Voice::decay(Waveform::Square, 220.0, 0.5, 0.2, 1.0),
        ];
        let samples = render(&voices, 1000);
        assert_eq!(samples.len(), 200);
    }

    #[test]
    fn render_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(1);
        for cue in [SoundCue::Engine, SoundCue::Collision, SoundCue::FuelPickup] {
            let samples = render(&cue_voices(cue, &mut rng), SAMPLE_RATE);
            assert!(!samples.is_empty());
            assert!(samples.iter().all(|s| (-1.0..=1.0).contains(s)));
        }
    }

    #[test]
    fn envelope_attacks_then_releases() {
        let v = Voice {
            waveform: Waveform::Square,
            freq_start: 220.0,
            freq_end: 220.0,
            start_gain: 0.0,
            peak: 0.5,
            attack: 0.01,
            duration: 0.2,
            bus: 1.0,
        };
        assert_eq!(v.gain_at(0.0), 0.0);
        assert!((v.gain_at(0.01) - 0.5).abs() < 1e-6);
        assert!(v.gain_at(0.1) < 0.5);
        assert_eq!(v.gain_at(0.2), 0.0);
    }

    #[test]
    fn glide_reaches_target_pitch() {
        let v = Voice::decay(Waveform::Sine, 400.0, 0.3, 0.2, 1.0).glide(800.0);
        assert_eq!(v.freq_at(0.0), 400.0);
        assert_eq!(v.freq_at(0.2), 800.0);
    }

    #[test]
    fn pattern_fits_one_loop() {
        let tones = pattern_tones();
        assert_eq!(tones.len(), 22);
        assert!(tones.iter().all(|(at, _)| *at < PATTERN_LOOP_MS));
        // Fourth melody note follows three 0.2 s notes.
        assert_eq!(tones[3].0, 360);
    }
}
