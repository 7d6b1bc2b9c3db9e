// Base64 payload -> raw PCM bytes -> normalized AudioBuffer

use super::AudioBuffer;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use thiserror::Error;

const BYTES_PER_SAMPLE: usize = 2;
const I16_SCALE: f32 = 32768.0;

#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    #[error("Invalid base64 payload: {0}")]
    InvalidEncoding(String),

    #[error("Truncated PCM payload ({len} bytes)")]
    TruncatedPayload { len: usize },
}

/// Decode a standard-alphabet, padded base64 string.
///
/// ASCII whitespace (line breaks in long payloads) is skipped; any other
/// character outside the alphabet is rejected.
pub fn decode_base64(payload: &str) -> Result<Vec<u8>, DecodeError> {
    let result = if payload.bytes().any(|b| b.is_ascii_whitespace()) {
        let compact: String = payload
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        BASE64_STANDARD.decode(compact)
    } else {
        BASE64_STANDARD.decode(payload)
    };

    result.map_err(|e| DecodeError::InvalidEncoding(e.to_string()))
}

/// Interpret little-endian signed 16-bit PCM as an [`AudioBuffer`].
///
/// Interleaved input is split into `channels` sequences. The whole payload
/// must divide into complete frames; a dangling byte or partial frame is an
/// error.
pub fn interpret_pcm(
    bytes: &[u8],
    sample_rate: u32,
    channels: u16,
) -> Result<AudioBuffer, DecodeError> {
    let channel_count = channels.max(1) as usize;
    let frame_bytes = BYTES_PER_SAMPLE * channel_count;

    if bytes.len() % frame_bytes != 0 {
        return Err(DecodeError::TruncatedPayload { len: bytes.len() });
    }

    let frames = bytes.len() / frame_bytes;
    let mut data: Vec<Vec<f32>> = (0..channel_count)
        .map(|_| Vec::with_capacity(frames))
        .collect();

    for frame in bytes.chunks_exact(frame_bytes) {
        for (channel, sample) in data.iter_mut().zip(frame.chunks_exact(BYTES_PER_SAMPLE)) {
            let value = i16::from_le_bytes([sample[0], sample[1]]);
            channel.push(value as f32 / I16_SCALE);
        }
    }

    AudioBuffer::from_channels(data, sample_rate)
        .ok_or(DecodeError::TruncatedPayload { len: bytes.len() })
}

/// Full decode step for a remote payload.
pub fn decode_payload(
    payload: &str,
    sample_rate: u32,
    channels: u16,
) -> Result<AudioBuffer, DecodeError> {
    let bytes = decode_base64(payload)?;
    interpret_pcm(&bytes, sample_rate, channels)
}
