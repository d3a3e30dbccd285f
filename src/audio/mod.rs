//! Procedural sound on a background thread.
//!
//! [`SoundSystem`] is the game's handle: it sends [`AudioCmd`]s over a
//! channel and never blocks or fails.  The thread owns the output device and
//! the [`Sequencer`] that drives the background pattern.  When no device can
//! be opened the handle is created disabled and every call is a no-op.

pub mod sequencer;
pub mod synth;

use std::thread::JoinHandle;
use std::time::Instant;

use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender};
use log::{debug, info, warn};

use crate::entities::SoundCue;
use crate::error::AudioError;

pub use sequencer::Sequencer;
pub use synth::{Voice, Waveform, SAMPLE_RATE};

/// Commands from the game to the audio thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioCmd {
    Cue(SoundCue),
    StartMusic,
    StopMusic,
    Shutdown,
}

/// Where rendered samples go.  The real backend wraps the output device;
/// tests record what would have been played.
pub trait ToneSink {
    fn play(&mut self, samples: Vec<f32>, sample_rate: u32);
}

/// Handle to the audio thread.  Cheap to call every frame.
#[derive(Debug, Default)]
pub struct SoundSystem {
    tx: Option<Sender<AudioCmd>>,
    handle: Option<JoinHandle<()>>,
}

impl SoundSystem {
    /// A handle that ignores every call.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Open the default output device.  Failure is logged and yields a
    /// disabled handle; the game carries on silently.
    pub fn init() -> Self {
        #[cfg(feature = "audio")]
        let result = Self::with_sink(output::RodioSink::open);
        #[cfg(not(feature = "audio"))]
        let result: Result<Self, AudioError> = Err(AudioError::Disabled);

        match result {
            Ok(system) => {
                info!("audio ready");
                system
            }
            Err(e) => {
                warn!("sound disabled: {e}");
                Self::disabled()
            }
        }
    }

    /// Spawn the audio thread with the sink produced by `open`, which runs
    /// on that thread (device handles are often not `Send`).  Returns once
    /// the sink is open, or with its error.
    pub fn with_sink<S, F>(open: F) -> Result<Self, AudioError>
    where
        S: ToneSink + 'static,
        F: FnOnce() -> Result<S, AudioError> + Send + 'static,
    {
        let (tx_cmd, rx_cmd) = unbounded::<AudioCmd>();
        let (tx_ready, rx_ready) = bounded::<Result<(), AudioError>>(1);

        let handle = std::thread::spawn(move || match open() {
            Ok(sink) => {
                let _ = tx_ready.send(Ok(()));
                audio_thread(sink, rx_cmd);
            }
            Err(e) => {
                let _ = tx_ready.send(Err(e));
            }
        });

        match rx_ready.recv() {
            Ok(Ok(())) => Ok(SoundSystem {
                tx: Some(tx_cmd),
                handle: Some(handle),
            }),
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(e)
            }
            Err(_) => {
                let _ = handle.join();
                Err(AudioError::ThreadGone)
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.tx.is_some()
    }

    fn send(&self, cmd: AudioCmd) {
        if let Some(tx) = &self.tx {
            // A dead thread just means silence.
            let _ = tx.send(cmd);
        }
    }

    pub fn play(&self, cue: SoundCue) {
        self.send(AudioCmd::Cue(cue));
    }

    pub fn start_music(&self) {
        self.send(AudioCmd::StartMusic);
    }

    pub fn stop_music(&self) {
        self.send(AudioCmd::StopMusic);
    }

    /// Stop the thread and wait for it.  Idempotent.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(AudioCmd::Shutdown);
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for SoundSystem {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Body of the audio thread: wait for a command or the next pattern
/// deadline, whichever comes first, then play whatever is due.
fn audio_thread<S: ToneSink>(mut sink: S, rx: Receiver<AudioCmd>) {
    let mut sequencer = Sequencer::new();
    let mut rng = rand::thread_rng();

    loop {
        let received = match sequencer.next_deadline() {
            Some(deadline) => rx.recv_deadline(deadline),
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        match received {
            Ok(AudioCmd::Cue(cue)) => {
                let voices = synth::cue_voices(cue, &mut rng);
                sink.play(synth::render(&voices, SAMPLE_RATE), SAMPLE_RATE);
            }
            Ok(AudioCmd::StartMusic) => sequencer.start(Instant::now()),
            Ok(AudioCmd::StopMusic) => sequencer.stop(),
            Ok(AudioCmd::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {}
        }

        for voice in sequencer.take_due(Instant::now()) {
            sink.play(synth::render(&[voice], SAMPLE_RATE), SAMPLE_RATE);
        }
    }
    debug!("audio thread exiting");
}

#[cfg(feature = "audio")]
mod output {
    use rodio::buffer::SamplesBuffer;
    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use super::ToneSink;
    use crate::error::AudioError;

    pub struct RodioSink {
        _stream: OutputStream,
        handle: OutputStreamHandle,
    }

    impl RodioSink {
        pub fn open() -> Result<Self, AudioError> {
            let (stream, handle) =
                OutputStream::try_default().map_err(|e| AudioError::Device(e.to_string()))?;
            Ok(RodioSink {
                _stream: stream,
                handle,
            })
        }
    }

    impl ToneSink for RodioSink {
        fn play(&mut self, samples: Vec<f32>, sample_rate: u32) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                sink.append(SamplesBuffer::new(1, sample_rate, samples));
                sink.detach();
            }
        }
    }
}
