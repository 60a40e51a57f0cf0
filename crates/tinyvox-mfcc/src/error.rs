use thiserror::Error;

#[derive(Debug, Error)]
pub enum MfccError {
    #[error("FFT length {0} must be a non-zero power of two")]
    InvalidFftLength(usize),

    #[error("unsupported sample rate: {0} Hz (must be 8000 or 16000)")]
    UnsupportedSampleRate(u32),

    #[error("frame length {frame_length} exceeds FFT length {fft_num}")]
    FrameExceedsFft { frame_length: usize, fft_num: usize },

    #[error("{name} must be non-zero")]
    ZeroParameter { name: &'static str },

    #[error("utterance of {length} samples is shorter than one frame ({frame_length})")]
    UtteranceTooShort { length: usize, frame_length: usize },

    #[error("cepstrum buffer holds {got} values, expected {frames} frames x {coefs} coefficients")]
    CepstrumShape {
        frames: usize,
        coefs: usize,
        got: usize,
    },

    #[error("feature file has unknown version tag {0:#04x}")]
    UnknownVersion(u8),

    #[error("feature file is truncated or its declared shape does not match the payload")]
    MalformedFile,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
