//! On-device isolated-word recognition from a streaming PCM signal.
//!
//! Three stages, composed by the caller:
//!
//! 1. [`VadEngine`] isolates a single utterance out of silence and noise,
//!    with explicit lead-in, decision and hang-over regions.
//! 2. [`MfccEngine`] reduces the utterance to a compact fixed-point
//!    cepstral fingerprint, which [`save_file`]/[`load_file`] persist.
//! 3. [`calc_dtw`] scores two fingerprints; small average step distance
//!    means the same short phrase.
//!
//! The stages run synchronously on the caller's thread and are sized for
//! tens-of-kilobytes working sets. A typical wake-word flow enrolls once
//! (detect, fingerprint, save) and then compares each detected utterance
//! against the stored fingerprint; see `examples/isolated_word.rs`.

pub use tinyvox_dtw::{calc_dtw, DTW_INCOMPARABLE, MAX_LENGTH_RATIO};
pub use tinyvox_feature::{SliceFeature, SoundFeature};
pub use tinyvox_mfcc::{
    load_file, save_file, MfccConfig, MfccEngine, MfccError, MfccFeature, FEATURE_SCALE,
};
pub use tinyvox_vad::{
    Aggression, EnergyClassifier, SpeechActivity, SpeechClassifier, VadConfig, VadEngine,
    VadError, VadState,
};
