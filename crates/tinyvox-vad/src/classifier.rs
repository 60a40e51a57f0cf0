//! Per-frame speech/non-speech classification.
//!
//! The state machine in [`crate::engine`] only consumes a binary verdict per
//! frame; everything temporal (debouncing, hangover, rollback) lives there.
//! The default backend is an adaptive-energy classifier; callers with a
//! model-based detector plug it in through [`SpeechClassifier`].

use crate::config::Aggression;
use crate::energy::frame_dbfs;

/// Verdict for a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechActivity {
    Speech,
    NotSpeech,
}

/// Binary per-frame speech predicate.
///
/// The engine treats an implementation as a pure function of the current
/// frame plus whatever internal state the classifier keeps. Frames arrive in
/// sample order, one 10 ms frame per call.
pub trait SpeechClassifier {
    fn classify(&mut self, frame: &[i16]) -> SpeechActivity;

    /// Discard internal state so a new utterance can be judged from scratch.
    fn reset(&mut self);
}

const INITIAL_FLOOR_DB: f32 = -50.0;
const MIN_FLOOR_DB: f32 = -80.0;
const MAX_FLOOR_DB: f32 = -20.0;
const EMA_ALPHA: f32 = 0.02;

/// Energy classifier with an EMA noise floor and onset/offset hysteresis.
///
/// A frame is speech when its energy clears the noise floor by an onset
/// margin; once active, the frame stays speech until energy drops below the
/// smaller offset margin. The floor adapts only on non-speech frames so that
/// the utterance itself cannot drag the threshold up.
pub struct EnergyClassifier {
    noise_floor_db: f32,
    onset_margin_db: f32,
    offset_margin_db: f32,
    active: bool,
}

impl EnergyClassifier {
    pub fn new(aggression: Aggression) -> Self {
        let onset_margin_db = match aggression {
            Aggression::Lv0 => 6.0,
            Aggression::Lv1 => 9.0,
            Aggression::Lv2 => 12.0,
            Aggression::Lv3 => 15.0,
            Aggression::Lv4 => 18.0,
        };
        Self {
            noise_floor_db: INITIAL_FLOOR_DB,
            onset_margin_db,
            offset_margin_db: onset_margin_db - 3.0,
            active: false,
        }
    }

    pub fn noise_floor_db(&self) -> f32 {
        self.noise_floor_db
    }
}

impl SpeechClassifier for EnergyClassifier {
    fn classify(&mut self, frame: &[i16]) -> SpeechActivity {
        let energy_db = frame_dbfs(frame);

        let margin = if self.active {
            self.offset_margin_db
        } else {
            self.onset_margin_db
        };
        self.active = energy_db >= self.noise_floor_db + margin;

        if !self.active && energy_db > MIN_FLOOR_DB && energy_db < MAX_FLOOR_DB {
            self.noise_floor_db = (1.0 - EMA_ALPHA) * self.noise_floor_db + EMA_ALPHA * energy_db;
            self.noise_floor_db = self.noise_floor_db.clamp(MIN_FLOOR_DB, MAX_FLOOR_DB);
        }

        if self.active {
            SpeechActivity::Speech
        } else {
            SpeechActivity::NotSpeech
        }
    }

    fn reset(&mut self) {
        self.noise_floor_db = INITIAL_FLOOR_DB;
        self.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone_frame(amplitude: f32) -> Vec<i16> {
        (0..160)
            .map(|i| {
                let phase = 2.0 * std::f32::consts::PI * 440.0 * i as f32 / 16_000.0;
                (phase.sin() * amplitude) as i16
            })
            .collect()
    }

    #[test]
    fn silence_is_not_speech() {
        let mut classifier = EnergyClassifier::new(Aggression::Lv0);
        let silence = vec![0i16; 160];
        for _ in 0..50 {
            assert_eq!(classifier.classify(&silence), SpeechActivity::NotSpeech);
        }
    }

    #[test]
    fn loud_tone_is_speech() {
        let mut classifier = EnergyClassifier::new(Aggression::Lv0);
        let tone = tone_frame(30_000.0);
        assert_eq!(classifier.classify(&tone), SpeechActivity::Speech);
    }

    #[test]
    fn higher_aggression_rejects_quiet_tone() {
        // ~-39 dBFS: above the Lv0 threshold (-44), below the Lv4 one (-32).
        let quiet = tone_frame(500.0);

        let mut relaxed = EnergyClassifier::new(Aggression::Lv0);
        let mut strict = EnergyClassifier::new(Aggression::Lv4);

        assert_eq!(relaxed.classify(&quiet), SpeechActivity::Speech);
        assert_eq!(strict.classify(&quiet), SpeechActivity::NotSpeech);
    }

    #[test]
    fn floor_adapts_to_sustained_background() {
        let mut classifier = EnergyClassifier::new(Aggression::Lv0);
        let hum = tone_frame(200.0); // ~-47 dBFS, below onset margin

        let initial = classifier.noise_floor_db();
        for _ in 0..100 {
            classifier.classify(&hum);
        }
        assert!(
            classifier.noise_floor_db() > initial,
            "floor should rise toward the background level"
        );
    }

    #[test]
    fn reset_restores_initial_floor() {
        let mut classifier = EnergyClassifier::new(Aggression::Lv0);
        let hum = tone_frame(200.0);
        for _ in 0..100 {
            classifier.classify(&hum);
        }
        classifier.reset();
        assert_eq!(classifier.noise_floor_db(), INITIAL_FLOOR_DB);
    }
}
