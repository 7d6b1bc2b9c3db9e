use serde::Serialize;

/// Decoded audio, one sample sequence per channel.
///
/// Every channel holds the same number of frames. Samples are normalized to
/// `[-1.0, 1.0]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioBuffer {
    channels: Vec<Vec<f32>>,
    pub sample_rate: u32,
    /// Cached duration in seconds
    #[serde(skip)]
    pub duration_secs: f64,
}

impl AudioBuffer {
    /// Build a buffer from per-channel data.
    ///
    /// Returns `None` when there are no channels or when channel lengths differ.
    pub fn from_channels(channels: Vec<Vec<f32>>, sample_rate: u32) -> Option<Self> {
        let first_len = channels.first()?.len();
        if channels.iter().any(|c| c.len() != first_len) {
            return None;
        }

        let mut buffer = Self {
            channels,
            sample_rate,
            duration_secs: 0.0,
        };
        buffer.update_duration();
        Some(buffer)
    }

    /// Single-channel buffer.
    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> Self {
        let mut buffer = Self {
            channels: vec![samples],
            sample_rate,
            duration_secs: 0.0,
        };
        buffer.update_duration();
        buffer
    }

    /// Recalculate and update duration_secs
    pub fn update_duration(&mut self) {
        if self.sample_rate == 0 {
            self.duration_secs = 0.0;
        } else {
            self.duration_secs = self.frames() as f64 / self.sample_rate as f64;
        }
    }

    pub fn channel_count(&self) -> u16 {
        self.channels.len() as u16
    }

    /// Samples per channel.
    pub fn frames(&self) -> usize {
        self.channels.first().map(Vec::len).unwrap_or(0)
    }

    /// Samples across all channels.
    pub fn sample_count(&self) -> usize {
        self.frames() * self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames() == 0
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// Samples in frame order: frame 0 of every channel, then frame 1, ...
    pub fn interleaved(&self) -> impl Iterator<Item = f32> + '_ {
        let channel_count = self.channels.len();
        (0..self.frames() * channel_count).map(move |i| self.channels[i % channel_count][i / channel_count])
    }
}
