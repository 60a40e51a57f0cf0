//! MFCC feature extraction tuned for microcontroller-class budgets.
//!
//! [`MfccEngine`] turns an isolated utterance into a compact feature matrix:
//! pre-emphasis and a Hamming window fused in one pass, a power spectrum, a
//! triangular Mel filterbank, log compression, and a DCT-II that drops the
//! DC cepstral term. The window and DCT tables are precomputed as 16-bit
//! integers scaled by 10000: half the table memory of floats for one extra
//! divide per use.
//!
//! A whole utterance is normalized globally to zero mean and unit variance,
//! stored as `i16` at 1000 units per standard deviation. That scale is what
//! the integer DTW comparator consumes, and it is the on-disk interchange
//! format of [`save_file`]/[`load_file`].

pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod feature;
pub mod storage;

mod fft;
mod tables;

pub use config::MfccConfig;
pub use constants::FEATURE_SCALE;
pub use engine::MfccEngine;
pub use error::MfccError;
pub use feature::MfccFeature;
pub use storage::{load_file, save_file};
