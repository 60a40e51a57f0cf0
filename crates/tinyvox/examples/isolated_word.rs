//! Enroll-then-compare demo on synthesized audio.
//!
//! Mirrors the wake-word flow a device would run from its microphone
//! callback: detect an utterance, fingerprint it, persist it, then compare
//! later utterances against the stored fingerprint. Run with:
//!
//! ```sh
//! cargo run --example isolated_word
//! ```

use tinyvox::{
    calc_dtw, load_file, save_file, MfccConfig, MfccEngine, VadConfig, VadEngine,
};
use tracing::info;

const SAMPLE_RATE: u32 = 16_000;
const VAD_FRAME: usize = 160;

/// Application-level accept threshold for the average DTW step distance.
/// Needs tuning per deployment; this value works for clean signals.
const MATCH_THRESHOLD: u32 = 180;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut vad = VadEngine::new(VadConfig {
        sample_rate: SAMPLE_RATE,
        ..Default::default()
    })?;
    let mut mfcc = MfccEngine::new(MfccConfig {
        sample_rate: SAMPLE_RATE,
        ..Default::default()
    })?;

    let dir = tempfile::tempdir()?;
    let enrolled_path = dir.path().join("wakeword.bin");

    // Enroll: detect one utterance of the keyword and store its fingerprint.
    let keyword = synthesize_word(220.0, 400);
    let utterance = detect(&mut vad, &keyword).expect("keyword should be detected");
    info!(samples = utterance.len(), "enrolling utterance");

    let fingerprint = mfcc.create(&utterance)?;
    save_file(&enrolled_path, &fingerprint)?;
    info!(path = %enrolled_path.display(), "fingerprint saved");

    // Compare: fresh takes against the stored fingerprint.
    let enrolled = load_file(&enrolled_path)?;
    for (label, fundamental, speech_ms) in [
        ("same word, slower take", 220.0, 460),
        ("different word", 540.0, 320),
    ] {
        vad.reset();
        let take = synthesize_word(fundamental, speech_ms);
        let utterance = detect(&mut vad, &take).expect("utterance should be detected");
        let candidate = mfcc.create(&utterance)?;

        let distance = calc_dtw(&enrolled, &candidate);
        let verdict = if distance < MATCH_THRESHOLD {
            "match"
        } else {
            "no match"
        };
        info!(label, distance, verdict, "comparison");
        println!("{label}: distance {distance} -> {verdict}");
    }

    Ok(())
}

/// Feeds `signal` through the detector frame by frame and returns the
/// emitted utterance, if any.
fn detect(vad: &mut VadEngine, signal: &[i16]) -> Option<Vec<i16>> {
    let mut dest = vec![0i16; signal.len()];
    for frame in signal.chunks_exact(VAD_FRAME) {
        if let Some(length) = vad.detect(&mut dest, frame).expect("frame size is fixed") {
            dest.truncate(length);
            return Some(dest);
        }
    }
    None
}

/// A stand-in for a spoken word: two harmonics under a raised-sine
/// envelope, padded with half a second of silence on both sides.
fn synthesize_word(fundamental: f32, speech_ms: usize) -> Vec<i16> {
    let silence = vec![0i16; SAMPLE_RATE as usize / 2];
    let speech_samples = speech_ms * SAMPLE_RATE as usize / 1000;

    let mut signal = silence.clone();
    for n in 0..speech_samples {
        let t = n as f32 / SAMPLE_RATE as f32;
        let envelope = (std::f32::consts::PI * n as f32 / speech_samples as f32).sin();
        let sample = (2.0 * std::f32::consts::PI * fundamental * t).sin()
            + 0.5 * (2.0 * std::f32::consts::PI * 2.0 * fundamental * t).sin();
        signal.push((sample * envelope * 18_000.0) as i16);
    }
    signal.extend_from_slice(&silence);
    signal
}
