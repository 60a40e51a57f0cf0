use serde::{Deserialize, Serialize};

use crate::error::MfccError;

/// Geometry and filter parameters for the extractor.
///
/// Immutable after [`crate::MfccEngine::new`] captures it. MFCC frames are
/// unrelated to the 10 ms VAD frames: the default 32 ms frame is a round
/// 512 samples at 16 kHz, matching the default FFT length, and successive
/// frames overlap by half a frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MfccConfig {
    /// FFT length in samples. Power of two, at least `frame_length()`.
    pub fft_num: usize,

    /// Number of triangular Mel filterbank channels.
    pub mel_channel: usize,

    /// Cepstral coefficients kept per frame, DC term excluded.
    pub coef_num: usize,

    /// Pre-emphasis coefficient in integer percent (97 means 0.97).
    pub pre_emphasis: u32,

    /// Sampling rate in Hz, 8000 or 16000.
    pub sample_rate: u32,

    /// Frame duration in milliseconds.
    pub frame_time_ms: u32,
}

impl Default for MfccConfig {
    fn default() -> Self {
        Self {
            fft_num: 512,
            mel_channel: 24,
            coef_num: 12,
            pre_emphasis: 97,
            sample_rate: 16_000,
            frame_time_ms: 32,
        }
    }
}

impl MfccConfig {
    /// Samples per frame.
    pub fn frame_length(&self) -> usize {
        (self.frame_time_ms as u64 * self.sample_rate as u64 / 1000) as usize
    }

    /// Stride between successive frames: half a frame (50% overlap).
    pub fn hop_length(&self) -> usize {
        self.frame_length() / 2
    }

    pub(crate) fn validate(&self) -> Result<(), MfccError> {
        if self.fft_num == 0 || !self.fft_num.is_power_of_two() {
            return Err(MfccError::InvalidFftLength(self.fft_num));
        }
        if self.sample_rate != 8_000 && self.sample_rate != 16_000 {
            return Err(MfccError::UnsupportedSampleRate(self.sample_rate));
        }
        if self.mel_channel == 0 {
            return Err(MfccError::ZeroParameter {
                name: "mel_channel",
            });
        }
        if self.coef_num == 0 {
            return Err(MfccError::ZeroParameter { name: "coef_num" });
        }
        if self.frame_time_ms == 0 {
            return Err(MfccError::ZeroParameter {
                name: "frame_time_ms",
            });
        }
        if self.frame_length() > self.fft_num {
            return Err(MfccError::FrameExceedsFft {
                frame_length: self.frame_length(),
                fft_num: self.fft_num,
            });
        }
        Ok(())
    }
}
