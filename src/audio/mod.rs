pub mod buffer;
pub mod codec;
pub mod playback;
pub mod wav;

pub use buffer::AudioBuffer;
pub use codec::{decode_base64, decode_payload, interpret_pcm, DecodeError};
pub use playback::{NullSink, PlaybackError, PlaybackHandle, PlaybackSink, PreviewPlayer};
pub use wav::encode_wav;

/// Rate of the raw PCM returned by the TTS service.
pub const TTS_SAMPLE_RATE: u32 = 24_000;
/// The TTS service returns mono audio.
pub const TTS_CHANNELS: u16 = 1;
