//! Thin wrapper over the rustfft planner.
//!
//! The plan and its scratch are owned per engine; unlike fixed-function DSP
//! backends there is no process-wide instance to contend for, so multiple
//! extractors can coexist.

use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

pub(crate) struct FftProcessor {
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
}

impl FftProcessor {
    pub(crate) fn new(fft_num: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_num);
        let scratch = vec![Complex::default(); fft.get_inplace_scratch_len()];
        Self { fft, scratch }
    }

    pub(crate) fn process(&mut self, buffer: &mut [Complex<f32>]) {
        self.fft.process_with_scratch(buffer, &mut self.scratch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pure_tone_concentrates_in_one_bin() {
        let n = 64;
        let mut processor = FftProcessor::new(n);
        let mut buffer: Vec<Complex<f32>> = (0..n)
            .map(|i| {
                let phase = 2.0 * std::f32::consts::PI * 4.0 * i as f32 / n as f32;
                Complex::new(phase.cos(), 0.0)
            })
            .collect();

        processor.process(&mut buffer);

        let magnitudes: Vec<f32> = buffer[..n / 2].iter().map(|c| c.norm()).collect();
        let peak = magnitudes
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak, 4);
        // A real cosine of unit amplitude carries n/2 in each mirrored bin.
        assert!((magnitudes[4] - n as f32 / 2.0).abs() < 1e-3);
    }
}
