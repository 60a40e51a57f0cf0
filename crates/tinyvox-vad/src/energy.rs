//! Frame energy measurement for the default speech classifier.

/// RMS of a frame, normalized to `[0.0, 1.0]` of full scale.
pub(crate) fn frame_rms(frame: &[i16]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }

    let sum_squares: i64 = frame
        .iter()
        .map(|&sample| {
            let s = sample as i64;
            s * s
        })
        .sum();

    let mean_square = sum_squares as f64 / frame.len() as f64;
    (mean_square.sqrt() / 32768.0) as f32
}

/// RMS to decibels relative to full scale. Silence floors at -100 dBFS.
pub(crate) fn rms_to_dbfs(rms: f32) -> f32 {
    if rms <= 1e-10 {
        return -100.0;
    }
    20.0 * rms.log10()
}

pub(crate) fn frame_dbfs(frame: &[i16]) -> f32 {
    rms_to_dbfs(frame_rms(frame))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silence_is_floor_dbfs() {
        let silence = vec![0i16; 160];
        assert_eq!(frame_dbfs(&silence), -100.0);
    }

    #[test]
    fn full_scale_is_near_zero_dbfs() {
        let full = vec![i16::MAX; 160];
        let db = frame_dbfs(&full);
        assert!((db - 0.0).abs() < 0.1, "full scale should be ~0 dBFS, got {db}");
    }

    #[test]
    fn sine_rms_matches_theory() {
        // Sine RMS = peak / sqrt(2); 16384 / 32768 / sqrt(2) ~= 0.354.
        let sine: Vec<i16> = (0..160)
            .map(|i| {
                let phase = 2.0 * std::f32::consts::PI * i as f32 / 160.0;
                (phase.sin() * 16384.0) as i16
            })
            .collect();

        let rms = frame_rms(&sine);
        assert!((rms - 0.354).abs() < 0.02, "expected ~0.354, got {rms}");
    }

    #[test]
    fn dbfs_increases_with_amplitude() {
        let mut prev_db = f32::NEG_INFINITY;
        for amplitude in [100i16, 500, 1000, 5000, 10000, 20000, 30000] {
            let frame = vec![amplitude; 160];
            let db = frame_dbfs(&frame);
            assert!(db > prev_db, "dBFS should grow with amplitude, got {db}");
            prev_db = db;
        }
    }
}
