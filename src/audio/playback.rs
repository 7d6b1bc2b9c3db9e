// Playback surface: sinks hand out owned handles, the preview player keeps at
// most one of them alive.

use super::AudioBuffer;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("No output device available")]
    NoDevice,

    #[error("Output stream error: {0}")]
    Stream(String),

    #[error("Nothing to play")]
    EmptyBuffer,
}

/// A running playback. Dropping the handle does not have to stop it; call
/// [`PlaybackHandle::stop`].
pub trait PlaybackHandle {
    fn stop(&mut self);

    fn is_finished(&self) -> bool;
}

/// Platform audio output.
pub trait PlaybackSink {
    type Handle: PlaybackHandle;

    fn play(&self, audio: &AudioBuffer) -> Result<Self::Handle, PlaybackError>;
}

/// Owns the single in-flight preview, stopping it before starting the next.
pub struct PreviewPlayer<S: PlaybackSink> {
    sink: S,
    current: Option<S::Handle>,
}

impl<S: PlaybackSink> PreviewPlayer<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            current: None,
        }
    }

    pub fn play(&mut self, audio: &AudioBuffer) -> Result<(), PlaybackError> {
        self.stop();
        if audio.is_empty() {
            return Err(PlaybackError::EmptyBuffer);
        }
        let handle = self.sink.play(audio)?;
        self.current = Some(handle);
        Ok(())
    }

    pub fn stop(&mut self) {
        if let Some(mut handle) = self.current.take() {
            handle.stop();
            tracing::debug!("Preview playback stopped");
        }
    }

    pub fn is_playing(&self) -> bool {
        self.current
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

impl<S: PlaybackSink> Drop for PreviewPlayer<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Sink that plays nothing; handles finish immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

#[derive(Debug)]
pub struct NullHandle;

impl PlaybackHandle for NullHandle {
    fn stop(&mut self) {}

    fn is_finished(&self) -> bool {
        true
    }
}

impl PlaybackSink for NullSink {
    type Handle = NullHandle;

    fn play(&self, audio: &AudioBuffer) -> Result<NullHandle, PlaybackError> {
        tracing::info!(
            "Null playback: {:.2}s discarded",
            audio.duration_secs
        );
        Ok(NullHandle)
    }
}

#[cfg(feature = "playback")]
pub use self::device::{CpalHandle, CpalSink};

#[cfg(feature = "playback")]
mod device {
    use super::{PlaybackError, PlaybackHandle, PlaybackSink};
    use crate::audio::AudioBuffer;
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use std::sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    };
    use tracing::{error, info};

    /// Default output device via cpal. Samples are played at the buffer's own
    /// rate; the first channel is copied to every device channel.
    #[derive(Default)]
    pub struct CpalSink;

    pub struct CpalHandle {
        stream: Option<cpal::Stream>,
        finished: Arc<AtomicBool>,
    }

    impl PlaybackHandle for CpalHandle {
        fn stop(&mut self) {
            if let Some(stream) = self.stream.take() {
                let _ = stream.pause();
            }
            self.finished.store(true, Ordering::Relaxed);
        }

        fn is_finished(&self) -> bool {
            self.finished.load(Ordering::Relaxed)
        }
    }

    impl PlaybackSink for CpalSink {
        type Handle = CpalHandle;

        fn play(&self, audio: &AudioBuffer) -> Result<CpalHandle, PlaybackError> {
            let host = cpal::default_host();
            let device = host.default_output_device().ok_or(PlaybackError::NoDevice)?;
            let default_config = device
                .default_output_config()
                .map_err(|e| PlaybackError::Stream(e.to_string()))?;

            let device_channels = default_config.channels().max(1) as usize;
            let config = cpal::StreamConfig {
                channels: default_config.channels(),
                sample_rate: audio.sample_rate,
                buffer_size: cpal::BufferSize::Default,
            };

            let samples: Arc<Vec<f32>> = Arc::new(audio.channel(0).unwrap_or(&[]).to_vec());
            let position = Arc::new(AtomicUsize::new(0));
            let finished = Arc::new(AtomicBool::new(false));

            let samples_clone = samples.clone();
            let finished_clone = finished.clone();
            let err_fn = |err| error!("an error occurred on output stream: {}", err);

            let stream = device
                .build_output_stream(
                    &config,
                    move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                        for frame in data.chunks_mut(device_channels) {
                            let index = position.fetch_add(1, Ordering::Relaxed);
                            let value = match samples_clone.get(index) {
                                Some(&s) => s,
                                None => {
                                    finished_clone.store(true, Ordering::Relaxed);
                                    0.0
                                }
                            };
                            frame.iter_mut().for_each(|out| *out = value);
                        }
                    },
                    err_fn,
                    None,
                )
                .map_err(|e| PlaybackError::Stream(e.to_string()))?;

            stream
                .play()
                .map_err(|e| PlaybackError::Stream(e.to_string()))?;
            info!(
                "Playback started: {} samples at {} Hz",
                samples.len(),
                audio.sample_rate
            );

            Ok(CpalHandle {
                stream: Some(stream),
                finished,
            })
        }
    }
}
