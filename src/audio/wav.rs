// Canonical 44-byte-header PCM WAV writer

use super::AudioBuffer;

pub const WAV_HEADER_LEN: usize = 44;
const BITS_PER_SAMPLE: u16 = 16;
const PCM_FORMAT: u16 = 1;
const I16_PEAK: f32 = 32767.0;

/// Quantize a normalized sample to 16-bit PCM.
pub fn quantize(sample: f32) -> i16 {
    // NaN clamps to NaN; treat it as silence
    if sample.is_nan() {
        return 0;
    }
    (sample.clamp(-1.0, 1.0) * I16_PEAK).round() as i16
}

/// Encode the buffer as a RIFF/WAVE file with interleaved 16-bit samples.
pub fn encode_wav(audio: &AudioBuffer) -> Vec<u8> {
    let channels = audio.channel_count();
    let sample_rate = audio.sample_rate;
    let data_size = audio.sample_count() * 2;

    let mut wav = Vec::with_capacity(WAV_HEADER_LEN + data_size);

    // RIFF header
    wav.extend_from_slice(b"RIFF");
    let file_size = u32::try_from(WAV_HEADER_LEN - 8 + data_size).unwrap_or(u32::MAX);
    wav.extend_from_slice(&file_size.to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    // fmt chunk
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes()); // chunk size
    wav.extend_from_slice(&PCM_FORMAT.to_le_bytes());
    wav.extend_from_slice(&channels.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    // Header fields saturate rather than overflow for out-of-range formats
    let block_align = channels.saturating_mul(2);
    let byte_rate = sample_rate.saturating_mul(block_align as u32);
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    // data chunk
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&u32::try_from(data_size).unwrap_or(u32::MAX).to_le_bytes());

    for sample in audio.interleaved() {
        wav.extend_from_slice(&quantize(sample).to_le_bytes());
    }

    debug_assert_eq!(wav.len(), WAV_HEADER_LEN + data_size);
    wav
}

/// PCM section of a WAV produced by [`encode_wav`].
pub fn pcm_section(wav: &[u8]) -> Option<&[u8]> {
    if wav.len() < WAV_HEADER_LEN || &wav[..4] != b"RIFF" || &wav[36..40] != b"data" {
        return None;
    }
    let data_len = u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]) as usize;
    wav.get(WAV_HEADER_LEN..WAV_HEADER_LEN + data_len)
}
