//! The utterance-isolating state machine.

use tracing::debug;

use crate::classifier::{EnergyClassifier, SpeechActivity, SpeechClassifier};
use crate::config::VadConfig;
use crate::error::VadError;

/// Detection progress. Ordered: the retention logic in [`VadEngine::detect`]
/// compares against `Speech` to decide whether a truncated utterance is
/// still worth emitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VadState {
    /// Consuming the microphone stabilization lead-in.
    Warmup,
    /// One-frame handoff between warmup and detection; its samples are
    /// not retained.
    Setup,
    /// No speech. Fills the hangbefore window, then arms the classifier.
    Silence,
    /// Speech heard; deciding whether it is an utterance or a noise burst.
    PreDetection,
    /// Confirmed speech.
    Speech,
    /// Non-speech heard; deciding whether the utterance ended or paused.
    PostDetection,
    /// Utterance complete. Terminal until [`VadEngine::reset`].
    Detected,
}

/// Segments a PCM stream into a single utterance.
///
/// Feed exactly one frame of [`VadConfig::frame_length`] samples per
/// [`process`](Self::process) call, in sample order. Once `Detected` is
/// reached the engine ignores further frames until [`reset`](Self::reset).
pub struct VadEngine {
    config: VadConfig,
    classifier: Box<dyn SpeechClassifier>,
    state: VadState,
    state_count: usize,
    frame_count: usize,
    has_satisfied_hangbefore: bool,
}

impl VadEngine {
    /// Engine with the default adaptive-energy classifier at the configured
    /// aggression level.
    pub fn new(config: VadConfig) -> Result<Self, VadError> {
        let classifier = Box::new(EnergyClassifier::new(config.aggression));
        Self::with_classifier(config, classifier)
    }

    /// Engine with a caller-supplied classifier backend.
    pub fn with_classifier(
        config: VadConfig,
        classifier: Box<dyn SpeechClassifier>,
    ) -> Result<Self, VadError> {
        config.validate()?;
        Ok(Self {
            config,
            classifier,
            state: VadState::Warmup,
            state_count: 0,
            frame_count: 0,
            has_satisfied_hangbefore: false,
        })
    }

    pub fn config(&self) -> &VadConfig {
        &self.config
    }

    pub fn state(&self) -> VadState {
        self.state
    }

    /// Frames currently committed to the utterance.
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Discards all detection progress. Idempotent.
    pub fn reset(&mut self) {
        self.state = VadState::Warmup;
        self.state_count = 0;
        self.frame_count = 0;
        self.has_satisfied_hangbefore = false;
        self.classifier.reset();
    }

    /// Advances the state machine by one frame and returns the new state.
    pub fn process(&mut self, frame: &[i16]) -> Result<VadState, VadError> {
        let frame_length = self.config.frame_length();
        if frame.len() != frame_length {
            return Err(VadError::FrameSizeMismatch {
                expected: frame_length,
                got: frame.len(),
            });
        }

        self.state_count += 1;
        let state_length = frame_length * self.state_count;
        // The classifier only sees frames once the hangbefore window is
        // full; a cold classifier judging the very first frames would
        // misfire anyway.
        let is_speech = self.has_satisfied_hangbefore
            && self.classifier.classify(frame) == SpeechActivity::Speech;

        let entered = self.state;
        match self.state {
            VadState::Warmup => {
                if state_length >= self.config.warmup_length() {
                    self.state_count = 0;
                    self.state = VadState::Setup;
                }
            }
            VadState::Setup => {
                self.state_count = 0;
                self.state = VadState::Silence;
            }
            VadState::Silence => {
                if !self.has_satisfied_hangbefore {
                    self.frame_count += 1;
                    if state_length >= self.config.before_length() {
                        self.has_satisfied_hangbefore = true;
                    }
                } else if is_speech {
                    self.state_count = 0;
                    self.frame_count += 1;
                    self.state = VadState::PreDetection;
                }
            }
            VadState::PreDetection => {
                if is_speech {
                    let pass_count =
                        self.config.decision_length().div_ceil(frame_length);
                    self.frame_count += 1;
                    if self.state_count >= pass_count {
                        self.state_count = 0;
                        self.state = VadState::Speech;
                    }
                } else {
                    // A burst shorter than the decision window was noise:
                    // drop every frame the burst committed.
                    self.frame_count -= self.state_count;
                    self.state_count = 0;
                    self.state = VadState::Silence;
                }
            }
            VadState::Speech => {
                self.frame_count += 1;
                if !is_speech {
                    self.state_count = 0;
                    self.state = VadState::PostDetection;
                }
            }
            VadState::PostDetection => {
                self.frame_count += 1;
                if is_speech {
                    self.state_count = 0;
                    self.state = VadState::Speech;
                } else {
                    let over_count = self.config.over_length().div_ceil(frame_length);
                    if self.state_count >= over_count {
                        self.state_count = 0;
                        self.state = VadState::Detected;
                    }
                }
            }
            VadState::Detected => {}
        }

        if self.state != entered {
            debug!(from = ?entered, to = ?self.state, frames = self.frame_count, "vad transition");
        }
        Ok(self.state)
    }

    /// Advances the machine and maintains `dest` as the utterance buffer.
    ///
    /// `dest[..frame_length × frame_count]` always holds the most recent
    /// frames committed to the utterance: the hangbefore window slides one
    /// frame at a time during armed silence, a rejected noise burst drops
    /// its false-start tail, and confirmed speech appends.
    ///
    /// Returns `Ok(Some(samples))` once the utterance is complete (sticky
    /// until [`reset`](Self::reset)) or, if `dest` cannot hold another
    /// frame after confirmed speech began, the truncated length accumulated
    /// so far. `Ok(None)` means detection is still in progress. When `dest`
    /// fills up before speech is confirmed the frame is not consumed.
    pub fn detect(&mut self, dest: &mut [i16], frame: &[i16]) -> Result<Option<usize>, VadError> {
        let frame_length = self.config.frame_length();
        let sound_length = frame_length * self.frame_count;

        if self.state == VadState::Detected {
            return Ok(Some(sound_length));
        }
        if dest.len() < sound_length + frame_length {
            return Ok(if self.state >= VadState::Speech {
                Some(sound_length)
            } else {
                None
            });
        }

        let prev_frame_count = self.frame_count;
        let state = self.process(frame)?;

        if self.frame_count == prev_frame_count + 1 {
            dest[sound_length..sound_length + frame_length].copy_from_slice(frame);
        } else if state == VadState::Silence && prev_frame_count >= self.frame_count {
            // Armed silence slides the window one frame; a rollback from
            // PreDetection slides past the whole rejected burst.
            let shift_count = prev_frame_count - self.frame_count + 1;
            let shift_length = frame_length * shift_count;
            if sound_length > shift_length {
                dest.copy_within(shift_length..sound_length, 0);
                let start = sound_length - shift_length;
                dest[start..start + frame_length].copy_from_slice(frame);
            }
        }

        Ok(if state == VadState::Detected {
            Some(frame_length * self.frame_count)
        } else {
            None
        })
    }
}
