use serde::{Deserialize, Serialize};

use crate::error::VadError;

/// Strictness of the speech/non-speech call. Higher levels reject more
/// marginal frames as non-speech.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Aggression {
    Lv0,
    Lv1,
    Lv2,
    Lv3,
    Lv4,
}

impl Default for Aggression {
    fn default() -> Self {
        Self::Lv0
    }
}

/// Timing and classifier parameters for utterance detection.
///
/// Captured by the engine at construction and never mutated. All millisecond
/// fields translate to sample counts through the `*_length` methods; the
/// frame time itself is fixed at 10 ms, which is what the per-frame speech
/// classifiers expect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VadConfig {
    /// Lead-in consumed and discarded while the microphone stabilizes.
    pub warmup_time_ms: u32,

    /// Pre-onset margin retained in the emitted utterance.
    pub hangbefore_ms: u32,

    /// Continuous speech required before an onset is confirmed.
    pub decision_time_ms: u32,

    /// Continuous non-speech required before an offset is confirmed; the
    /// trail is retained in the emitted utterance.
    pub hangover_ms: u32,

    /// Sampling rate in Hz, 8000 or 16000.
    pub sample_rate: u32,

    /// Strictness of the default speech classifier.
    pub aggression: Aggression,
}

impl Default for VadConfig {
    fn default() -> Self {
        Self {
            warmup_time_ms: 0,
            hangbefore_ms: 100,
            decision_time_ms: 200,
            hangover_ms: 200,
            sample_rate: 16_000,
            aggression: Aggression::Lv0,
        }
    }
}

impl VadConfig {
    /// Duration of one frame. Fixed: the engine rejects nothing else.
    pub const FRAME_TIME_MS: u32 = 10;

    /// Samples per frame.
    pub fn frame_length(&self) -> usize {
        ms_to_samples(Self::FRAME_TIME_MS, self.sample_rate)
    }

    /// Samples consumed during warmup.
    pub fn warmup_length(&self) -> usize {
        ms_to_samples(self.warmup_time_ms, self.sample_rate)
    }

    /// Samples of retained pre-onset lead-in.
    pub fn before_length(&self) -> usize {
        ms_to_samples(self.hangbefore_ms, self.sample_rate)
    }

    /// Samples of continuous speech confirming an onset.
    pub fn decision_length(&self) -> usize {
        ms_to_samples(self.decision_time_ms, self.sample_rate)
    }

    /// Samples of continuous non-speech confirming an offset.
    pub fn over_length(&self) -> usize {
        ms_to_samples(self.hangover_ms, self.sample_rate)
    }

    pub(crate) fn validate(&self) -> Result<(), VadError> {
        if self.sample_rate != 8_000 && self.sample_rate != 16_000 {
            return Err(VadError::UnsupportedSampleRate(self.sample_rate));
        }
        Ok(())
    }
}

fn ms_to_samples(ms: u32, sample_rate: u32) -> usize {
    (ms as u64 * sample_rate as u64 / 1000) as usize
}
