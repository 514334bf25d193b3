//! Cry playback with a single-flight guard

use std::io::Cursor;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use rodio::cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rodio::cpal::{self, BufferSize, SampleRate, StreamConfig};
use rodio::{OutputStream, Sink, Source};
use thiserror::Error;

use crate::api::{FetchFailure, PokeClient};

/// Output buffer length, expressed as time at the stream's own sample rate.
pub const OUTPUT_LATENCY: Duration = Duration::from_millis(100);

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("failed to get audio: {0}")]
    Fetch(#[source] FetchFailure),
    #[error("failed to decode audio: {0}")]
    Decode(String),
    #[error("failed to initialize audio output: {0}")]
    Device(String),
    #[error("playback task failed: {0}")]
    Join(#[source] tokio::task::JoinError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackOutcome {
    Played,
    /// Another cry was already sounding; the request was dropped.
    Skipped,
}

/// Decodes and plays a payload, returning once playback has finished.
pub trait AudioOutput: Send + Sync + 'static {
    fn play(&self, bytes: Vec<u8>) -> Result<(), PlaybackError>;
}

// ============================================================================
// Guard
// ============================================================================

#[derive(Clone, Debug, Default)]
pub struct PlaybackGuard {
    playing: Arc<Mutex<bool>>,
}

impl PlaybackGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PlaybackState {
        if *lock(&self.playing) {
            PlaybackState::Playing
        } else {
            PlaybackState::Idle
        }
    }

    /// Move Idle -> Playing. Returns `None` if a cry is already playing.
    pub fn try_begin(&self) -> Option<PlaybackTicket> {
        let mut playing = lock(&self.playing);
        if *playing {
            return None;
        }
        *playing = true;
        Some(PlaybackTicket {
            playing: Arc::clone(&self.playing),
        })
    }
}

/// Held for the duration of one playback; dropping it moves back to Idle.
#[derive(Debug)]
pub struct PlaybackTicket {
    playing: Arc<Mutex<bool>>,
}

impl Drop for PlaybackTicket {
    fn drop(&mut self) {
        *lock(&self.playing) = false;
    }
}

fn lock(flag: &Mutex<bool>) -> MutexGuard<'_, bool> {
    flag.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// Playback
// ============================================================================

pub struct Playback<O: AudioOutput> {
    guard: PlaybackGuard,
    client: PokeClient,
    output: Arc<O>,
}

impl<O: AudioOutput> Clone for Playback<O> {
    fn clone(&self) -> Self {
        Self {
            guard: self.guard.clone(),
            client: self.client.clone(),
            output: Arc::clone(&self.output),
        }
    }
}

impl<O: AudioOutput> Playback<O> {
    pub fn new(client: PokeClient, output: O) -> Self {
        Self {
            guard: PlaybackGuard::new(),
            client,
            output: Arc::new(output),
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.guard.state()
    }

    /// Fetch and play `url` to completion, or return `Skipped` straight away
    /// if another cry is playing.
    pub async fn play_cry(&self, url: &str) -> Result<PlaybackOutcome, PlaybackError> {
        let Some(ticket) = self.guard.try_begin() else {
            tracing::debug!(%url, "cry already playing, request dropped");
            return Ok(PlaybackOutcome::Skipped);
        };

        let bytes = self
            .client
            .fetch_bytes(url)
            .await
            .map_err(PlaybackError::Fetch)?;

        // The ticket rides along with the blocking call so the flag stays set
        // until the audio has actually stopped, even if this task is aborted.
        let output = Arc::clone(&self.output);
        tokio::task::spawn_blocking(move || {
            let _ticket = ticket;
            output.play(bytes)
        })
        .await
        .map_err(PlaybackError::Join)??;

        tracing::debug!(%url, "cry finished");
        Ok(PlaybackOutcome::Played)
    }
}

// ============================================================================
// Rodio output
// ============================================================================

#[derive(Clone, Copy, Debug, Default)]
pub struct RodioOutput;

impl AudioOutput for RodioOutput {
    fn play(&self, bytes: Vec<u8>) -> Result<(), PlaybackError> {
        let source = rodio::Decoder::new(Cursor::new(bytes))
            .map_err(|err| PlaybackError::Decode(err.to_string()))?;
        let config = output_config(source.channels(), source.sample_rate());

        match FixedLatencyStream::open(&config) {
            Ok(stream) => {
                stream.sink.append(source);
                stream.sink.sleep_until_end();
                // The queue is empty once the sink wakes; one buffer is still in the device.
                std::thread::sleep(OUTPUT_LATENCY);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(
                    sample_rate = config.sample_rate.0,
                    error = %err,
                    "fixed-latency output rejected, using default stream"
                );
                let (_stream, handle) = OutputStream::try_default()
                    .map_err(|err| PlaybackError::Device(err.to_string()))?;
                let sink =
                    Sink::try_new(&handle).map_err(|err| PlaybackError::Device(err.to_string()))?;
                sink.append(source);
                sink.sleep_until_end();
                Ok(())
            }
        }
    }
}

/// Frames in one output buffer at `sample_rate`.
pub fn buffer_frames(sample_rate: u32) -> u32 {
    let frames = u128::from(sample_rate) * OUTPUT_LATENCY.as_millis() / 1000;
    u32::try_from(frames).unwrap_or(u32::MAX).max(1)
}

/// Device config for a clip: its own channel count and sample rate, with a
/// fixed buffer of `OUTPUT_LATENCY`.
pub fn output_config(channels: u16, sample_rate: u32) -> StreamConfig {
    StreamConfig {
        channels,
        sample_rate: SampleRate(sample_rate),
        buffer_size: BufferSize::Fixed(buffer_frames(sample_rate)),
    }
}

/// A cpal stream on the default device, fed from an idle rodio sink's queue.
struct FixedLatencyStream {
    sink: Sink,
    _stream: cpal::Stream,
}

impl FixedLatencyStream {
    fn open(config: &StreamConfig) -> Result<Self, PlaybackError> {
        let device = cpal::default_host()
            .default_output_device()
            .ok_or_else(|| PlaybackError::Device("no output device".to_string()))?;
        let (sink, mut queue) = Sink::new_idle();

        let stream = device
            .build_output_stream(
                config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    for sample in data.iter_mut() {
                        *sample = queue.next().unwrap_or(0.0);
                    }
                },
                |err| tracing::warn!(error = %err, "audio stream error"),
                None,
            )
            .map_err(|err| PlaybackError::Device(err.to_string()))?;
        stream
            .play()
            .map_err(|err| PlaybackError::Device(err.to_string()))?;

        Ok(Self {
            sink,
            _stream: stream,
        })
    }
}
