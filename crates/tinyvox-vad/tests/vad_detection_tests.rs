//! End-to-end detection scenarios with the adaptive-energy classifier.

use tinyvox_vad::{Aggression, VadConfig, VadEngine, VadState};

const FRAME_LENGTH: usize = 160; // 10 ms at 16 kHz

fn config() -> VadConfig {
    VadConfig {
        warmup_time_ms: 0,
        hangbefore_ms: 100,
        decision_time_ms: 200,
        hangover_ms: 200,
        sample_rate: 16_000,
        aggression: Aggression::Lv0,
    }
}

fn silence_frame() -> Vec<i16> {
    vec![0i16; FRAME_LENGTH]
}

/// Full-scale 440 Hz tone, phase-continuous across frames.
fn tone_frame(index: usize) -> Vec<i16> {
    (0..FRAME_LENGTH)
        .map(|i| {
            let n = (index * FRAME_LENGTH + i) as f32;
            let phase = 2.0 * std::f32::consts::PI * 440.0 * n / 16_000.0;
            (phase.sin() * 30_000.0) as i16
        })
        .collect()
}

#[test]
fn silence_only_never_leaves_silence() {
    let mut engine = VadEngine::new(config()).unwrap();
    let mut dest = vec![0i16; 16_000];
    let frame = silence_frame();

    let mut states = Vec::new();
    for _ in 0..100 {
        assert_eq!(engine.detect(&mut dest, &frame).unwrap(), None);
        states.push(engine.state());
    }

    // With zero warmup the first frame already lands in Setup, the second
    // in Silence, and Silence holds from there.
    assert_eq!(states[0], VadState::Setup);
    assert!(states[1..].iter().all(|&s| s == VadState::Silence));
}

#[test]
fn tone_burst_is_detected_with_expected_length() {
    let mut engine = VadEngine::new(config()).unwrap();
    let mut dest = vec![0i16; 70 * FRAME_LENGTH];

    // 10 frames of silence, 30 of tone, 30 of silence.
    let mut frames: Vec<Vec<i16>> = Vec::new();
    for _ in 0..10 {
        frames.push(silence_frame());
    }
    for i in 0..30 {
        frames.push(tone_frame(i));
    }
    for _ in 0..30 {
        frames.push(silence_frame());
    }

    let mut emitted = None;
    let mut detected_at = None;
    for (index, frame) in frames.iter().enumerate() {
        if let Some(length) = engine.detect(&mut dest, frame).unwrap() {
            emitted = Some(length);
            detected_at = Some(index);
            break;
        }
    }

    let length = emitted.expect("tone burst should be detected");
    let detected_at = detected_at.unwrap();
    assert!(
        (40..70).contains(&detected_at),
        "detection should land after the tone plus hangover, got frame {detected_at}"
    );

    // Hangbefore (10 frames) + speech (~29) + hangover (20), one frame of
    // tolerance for the onset/offset boundaries.
    let frames_emitted = length / FRAME_LENGTH;
    assert!(
        (59..=61).contains(&frames_emitted),
        "expected ~60 frames of utterance, got {frames_emitted}"
    );
    assert_eq!(length, engine.frame_count() * FRAME_LENGTH);
    assert_eq!(engine.state(), VadState::Detected);

    // Sticky: further frames keep returning the same utterance.
    assert_eq!(
        engine.detect(&mut dest, &silence_frame()).unwrap(),
        Some(length)
    );
}

#[test]
fn emitted_window_ends_with_trailing_silence() {
    let mut engine = VadEngine::new(config()).unwrap();
    let mut dest = vec![9999i16; 70 * FRAME_LENGTH];

    let mut emitted = None;
    for index in 0..70 {
        let frame = if (10..40).contains(&index) {
            tone_frame(index - 10)
        } else {
            silence_frame()
        };
        if let Some(length) = engine.detect(&mut dest, &frame).unwrap() {
            emitted = Some(length);
            break;
        }
    }

    let length = emitted.expect("utterance should complete");
    // The hangover trail is silence, so the emitted window must end quiet...
    assert!(dest[length - FRAME_LENGTH..length].iter().all(|&s| s == 0));
    // ...while the middle of the window carries the tone.
    let mid = length / 2;
    assert!(dest[mid..mid + FRAME_LENGTH].iter().any(|&s| s.abs() > 10_000));
}

#[test]
fn reset_enables_a_second_detection() {
    let mut engine = VadEngine::new(config()).unwrap();
    let mut dest = vec![0i16; 70 * FRAME_LENGTH];

    let run = |engine: &mut VadEngine, dest: &mut Vec<i16>| -> Option<usize> {
        for index in 0..70 {
            let frame = if (10..40).contains(&index) {
                tone_frame(index - 10)
            } else {
                silence_frame()
            };
            if let Some(length) = engine.detect(dest, &frame).unwrap() {
                return Some(length);
            }
        }
        None
    };

    let first = run(&mut engine, &mut dest).expect("first detection");
    engine.reset();
    let second = run(&mut engine, &mut dest).expect("second detection");
    assert_eq!(first, second);
}
