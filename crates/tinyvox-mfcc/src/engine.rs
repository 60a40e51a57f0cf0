//! The per-frame cepstrum pipeline and whole-utterance normalization.

use rustfft::num_complex::Complex;

use crate::config::MfccConfig;
use crate::constants::{DCT_SCALE, FEATURE_SCALE, PRE_EMPHASIS_SCALE, WINDOW_SCALE};
use crate::error::MfccError;
use crate::feature::MfccFeature;
use crate::fft::FftProcessor;
use crate::tables;

/// Keeps log-Mel finite on silent channels; the DCT of the resulting flat
/// spectrum is zero to within table rounding.
const LOG_FLOOR: f32 = 1e-10;

/// MFCC extractor.
///
/// Owns the precomputed tables and the FFT/Mel scratch buffers, so
/// [`calculate`](Self::calculate) allocates nothing per frame. The scratch
/// makes the extractor single-writer; the tables are immutable after
/// construction.
pub struct MfccEngine {
    config: MfccConfig,
    window: Vec<i16>,
    mel_position: Vec<i16>,
    dct_table: Vec<i16>,
    fft: FftProcessor,
    fft_data: Vec<Complex<f32>>,
    mel_data: Vec<f32>,
}

impl MfccEngine {
    /// Validates the configuration and builds the tables.
    pub fn new(config: MfccConfig) -> Result<Self, MfccError> {
        config.validate()?;

        let window = tables::hamming_window(config.frame_length());
        let mel_position = tables::mel_positions(
            config.sample_rate,
            config.fft_num,
            config.mel_channel,
        );
        let dct_table = tables::dct_table(config.coef_num, config.mel_channel);

        Ok(Self {
            window,
            mel_position,
            dct_table,
            fft: FftProcessor::new(config.fft_num),
            fft_data: vec![Complex::default(); config.fft_num],
            mel_data: vec![0.0; config.mel_channel],
            config,
        })
    }

    pub fn config(&self) -> &MfccConfig {
        &self.config
    }

    /// Cepstrum of a single frame, written to `mfcc`.
    ///
    /// # Panics
    ///
    /// Panics unless `frame.len() == frame_length()` and
    /// `mfcc.len() == coef_num`.
    pub fn calculate(&mut self, frame: &[i16], mfcc: &mut [f32]) {
        let frame_length = self.config.frame_length();
        let fft_num = self.config.fft_num;
        assert_eq!(frame.len(), frame_length, "frame length mismatch");
        assert_eq!(mfcc.len(), self.config.coef_num, "coefficient count mismatch");

        // Pre-emphasis fused with the window; the filter carries x[-1] = 0.
        let pre_emphasis = self.config.pre_emphasis as i32;
        let mut prev = 0i32;
        for (i, &sample) in frame.iter().enumerate() {
            let current = sample as i32;
            let emphasized = (current - pre_emphasis * prev / PRE_EMPHASIS_SCALE) as f32;
            self.fft_data[i] =
                Complex::new(emphasized * self.window[i] as f32 / WINDOW_SCALE as f32, 0.0);
            prev = current;
        }
        for slot in self.fft_data[frame_length..fft_num].iter_mut() {
            *slot = Complex::new(0.0, 0.0);
        }

        self.fft.process(&mut self.fft_data);

        // Power spectrum in place over the real half.
        for bin in self.fft_data[..fft_num / 2].iter_mut() {
            bin.re = bin.re * bin.re + bin.im * bin.im;
        }

        apply_mel_filter(&self.fft_data, &self.mel_position, &mut self.mel_data);

        for mel in self.mel_data.iter_mut() {
            *mel = 10.0 * mel.max(LOG_FLOOR).log10();
        }

        let mel_channel = self.config.mel_channel;
        for (i, out) in mfcc.iter_mut().enumerate() {
            let dct_row = &self.dct_table[i * mel_channel..(i + 1) * mel_channel];
            let mut acc = 0.0f32;
            for (&mel, &dct) in self.mel_data.iter().zip(dct_row) {
                acc += mel * dct as f32 / DCT_SCALE as f32;
            }
            *out = acc;
        }
    }

    /// One-shot path: extracts and normalizes a whole utterance.
    pub fn create(&mut self, raw: &[i16]) -> Result<MfccFeature, MfccError> {
        let frame_length = self.config.frame_length();
        let hop_length = self.config.hop_length();
        let coef_num = self.config.coef_num;

        if raw.len() < frame_length {
            return Err(MfccError::UtteranceTooShort {
                length: raw.len(),
                frame_length,
            });
        }
        let frame_num = (raw.len() - (frame_length - hop_length)) / hop_length;

        let mut cepstra = vec![0.0f32; frame_num * coef_num];
        for (index, out) in cepstra.chunks_exact_mut(coef_num).enumerate() {
            let start = index * hop_length;
            self.calculate(&raw[start..start + frame_length], out);
        }

        let mut data = vec![0i16; frame_num * coef_num];
        Self::normalize(&cepstra, &mut data);
        Ok(MfccFeature::from_raw(frame_num, coef_num, data))
    }

    /// Incremental path: normalizes cepstra the caller accumulated through
    /// [`calculate`](Self::calculate) while detection was still running.
    pub fn create_from_mfcc(
        &self,
        mfccs: &[f32],
        frame_num: usize,
        coef_num: usize,
    ) -> Result<MfccFeature, MfccError> {
        if frame_num == 0 || coef_num == 0 || mfccs.len() != frame_num * coef_num {
            return Err(MfccError::CepstrumShape {
                frames: frame_num,
                coefs: coef_num,
                got: mfccs.len(),
            });
        }

        let mut data = vec![0i16; mfccs.len()];
        Self::normalize(mfccs, &mut data);
        Ok(MfccFeature::from_raw(frame_num, coef_num, data))
    }

    /// Global zero-mean unit-variance normalization, emitted at
    /// [`FEATURE_SCALE`] units per standard deviation and clipped to `i16`.
    ///
    /// A constant input (squared-deviation sum below `f32::EPSILON`) maps to
    /// all zeros rather than dividing by zero.
    ///
    /// # Panics
    ///
    /// Panics if the slices are empty or of different lengths.
    pub fn normalize(src: &[f32], dest: &mut [i16]) {
        assert_eq!(src.len(), dest.len(), "normalize shape mismatch");
        assert!(!src.is_empty(), "nothing to normalize");

        let count = src.len() as f32;
        let mean = src.iter().sum::<f32>() / count;
        let sum_squares = src
            .iter()
            .map(|&value| {
                let deviation = value - mean;
                deviation * deviation
            })
            .sum::<f32>();
        let stddev = if sum_squares.abs() < f32::EPSILON {
            1.0
        } else {
            (sum_squares / count).sqrt()
        };

        for (out, &value) in dest.iter_mut().zip(src) {
            let scaled = FEATURE_SCALE as f32 * (value - mean) / stddev;
            *out = scaled.clamp(i16::MIN as f32, i16::MAX as f32) as i16;
        }
    }
}

/// Accumulates the power spectrum through each triangular Mel window.
///
/// The rising slope of channel `c` spans `position[c-1]..position[c]` and
/// the falling slope spans `position[c]..position[c+1]`; the running `coef`
/// walks both slopes without per-bin multiplies against a stored shape.
fn apply_mel_filter(power: &[Complex<f32>], position: &[i16], mel: &mut [f32]) {
    for channel in 1..=mel.len() {
        let left = position[channel - 1] as usize;
        let center = position[channel] as usize;
        let right = position[channel + 1] as usize;

        let rise = 1.0 / (center - left) as f32;
        let mut coef = 0.0f32;
        let mut acc = 0.0f32;
        for bin in left..center {
            coef += rise;
            acc += coef * power[bin].re;
        }
        let fall = 1.0 / (right - center) as f32;
        for bin in center..right {
            coef -= fall;
            acc += coef * power[bin].re;
        }
        mel[channel - 1] = acc;
    }
}
