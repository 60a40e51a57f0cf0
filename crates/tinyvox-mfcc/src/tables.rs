//! Precomputed fixed-point tables: Hamming window, Mel filter geometry, and
//! the DCT-II cosine matrix.

use crate::constants::{DCT_SCALE, WINDOW_SCALE};

/// Hamming window, `i16` scaled by [`WINDOW_SCALE`].
pub(crate) fn hamming_window(length: usize) -> Vec<i16> {
    let denom = (length - 1) as f32;
    (0..length)
        .map(|i| {
            let w = 0.54 - 0.46 * (2.0 * std::f32::consts::PI * i as f32 / denom).cos();
            (WINDOW_SCALE as f32 * w).round() as i16
        })
        .collect()
}

fn hz_to_mel(freq: f32) -> f32 {
    2595.0 * (1.0 + freq / 700.0).log10()
}

fn mel_to_hz(mel: f32) -> f32 {
    700.0 * (10f32.powf(mel / 2595.0) - 1.0)
}

/// FFT-bin positions of the Mel triangle feet and peaks.
///
/// Each triangle's peak is the next triangle's rising foot, so the whole
/// filterbank is described by `mel_channel + 2` positions: index 0 is bin 0,
/// index `mel_channel + 1` is `fft_num / 2`, and the peaks in between sit at
/// equally spaced Mel frequencies.
pub(crate) fn mel_positions(sample_rate: u32, fft_num: usize, mel_channel: usize) -> Vec<i16> {
    let nyquist = (sample_rate / 2) as f32;
    let delta_mel = hz_to_mel(nyquist) / (mel_channel + 1) as f32;
    let delta_freq = sample_rate as f32 / fft_num as f32;

    let mut position = vec![0i16; mel_channel + 2];
    for (i, slot) in position.iter_mut().enumerate().take(mel_channel + 1).skip(1) {
        let center_freq = mel_to_hz(i as f32 * delta_mel);
        *slot = (center_freq / delta_freq).round() as i16;
    }
    position[mel_channel + 1] = (fft_num / 2) as i16;
    position
}

/// DCT-II cosine table, `coef_num` rows of `mel_channel` entries, `i16`
/// scaled by [`DCT_SCALE`]. Row `i` uses frequency index `i + 1`: the DC
/// cepstral coefficient is deliberately dropped.
pub(crate) fn dct_table(coef_num: usize, mel_channel: usize) -> Vec<i16> {
    let mut table = vec![0i16; coef_num * mel_channel];
    for i in 0..coef_num {
        for j in 0..mel_channel {
            let angle =
                std::f32::consts::PI / mel_channel as f32 * (j as f32 + 0.5) * (i + 1) as f32;
            table[i * mel_channel + j] = (DCT_SCALE as f32 * angle.cos()).round() as i16;
        }
    }
    table
}
