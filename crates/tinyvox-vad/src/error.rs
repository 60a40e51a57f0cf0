use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VadError {
    #[error("unsupported sample rate: {0} Hz (must be 8000 or 16000)")]
    UnsupportedSampleRate(u32),

    #[error("expected a frame of {expected} samples, got {got}")]
    FrameSizeMismatch { expected: usize, got: usize },
}
