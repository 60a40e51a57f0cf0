//! Voice activity detection that isolates a single spoken utterance from a
//! streaming PCM signal.
//!
//! The engine consumes fixed 10 ms frames and walks a seven-state machine
//! (warmup, setup, silence, pre-detection, speech, post-detection, detected)
//! so that transient noise bursts do not produce phantom onsets and brief
//! pauses do not split an utterance. [`VadEngine::detect`] additionally
//! maintains the caller's destination buffer so that, once an end of speech
//! is confirmed, the buffer holds exactly the hangbefore lead-in, the active
//! speech, and the hangover trail.

pub mod classifier;
pub mod config;
pub mod engine;
pub mod error;

mod energy;

pub use classifier::{EnergyClassifier, SpeechActivity, SpeechClassifier};
pub use config::{Aggression, VadConfig};
pub use engine::{VadEngine, VadState};
pub use error::VadError;
