//! Dynamic time warping over fixed-point feature matrices.
//!
//! [`calc_dtw`] scores two utterance fingerprints by the average per-step
//! integer cosine distance along the minimum-cost monotone alignment.
//! Averaging (rather than the total) keeps an application threshold
//! length-independent, and a 3x length-ratio gate prunes obviously
//! different utterances before the O(|a|·|b|·D) lattice runs. Two
//! single-row scratch arrays are the only working memory: each lattice row
//! overwrites the previous one in place with a single-variable carry for
//! the diagonal predecessor.

use tinyvox_feature::SoundFeature;

/// Returned when the inputs cannot be meaningfully compared: mismatched
/// dimensions, an empty side, or a length ratio beyond [`MAX_LENGTH_RATIO`].
pub const DTW_INCOMPARABLE: u32 = u32::MAX;

/// Comparisons are refused when one input is more than this many times
/// longer than the other.
pub const MAX_LENGTH_RATIO: usize = 3;

/// Cosine distances are stored as integers at this scale, so a single step
/// costs at most `2 * DISTANCE_SCALE`.
const DISTANCE_SCALE: f32 = 1000.0;

fn inner_product(a: &[i16], b: &[i16]) -> i32 {
    a.iter().zip(b).map(|(&x, &y)| x as i32 * y as i32).sum()
}

/// Integer cosine distance in `[0, 2000]` from precomputed inner products.
/// By convention the distance is `1000` (orthogonal) when either vector has
/// zero self-inner product.
fn cosine_distance(inner12: i32, inner1: i32, inner2: i32) -> u32 {
    let cosine = if inner1 == 0 || inner2 == 0 {
        0.0
    } else {
        inner12 as f32 / (inner1 as f32 * inner2 as f32).sqrt()
    };
    (DISTANCE_SCALE * (1.0 - cosine)) as u32
}

/// Average per-step cosine distance along the best alignment of two feature
/// matrices, or [`DTW_INCOMPARABLE`].
///
/// Ties between predecessors resolve left, then up, then diagonal, so step
/// counts are reproducible. Self-inner products of the first matrix's row
/// are hoisted out of the inner loop; the second matrix's are recomputed
/// per cell, trading time for scratch memory.
pub fn calc_dtw(feature1: &impl SoundFeature, feature2: &impl SoundFeature) -> u32 {
    let dimension = feature1.dimension();
    if dimension != feature2.dimension() {
        return DTW_INCOMPARABLE;
    }
    let (size1, size2) = (feature1.size(), feature2.size());
    if size1 == 0 || size2 == 0 {
        return DTW_INCOMPARABLE;
    }
    if size1 > MAX_LENGTH_RATIO * size2 || MAX_LENGTH_RATIO * size1 < size2 {
        return DTW_INCOMPARABLE;
    }

    let mut step_counts = vec![0u32; size2];
    let mut step_distances = vec![0u32; size2];

    let inner1_0 = inner_product(feature1.feature(0), feature1.feature(0));
    let inner2_0 = inner_product(feature2.feature(0), feature2.feature(0));

    // The origin cell is doubled so that a warped path which lingers at the
    // start pays the same per-step toll as everywhere else.
    step_distances[0] = 2 * cosine_distance(
        inner_product(feature1.feature(0), feature2.feature(0)),
        inner1_0,
        inner2_0,
    );
    step_counts[0] = 0;

    for j in 1..size2 {
        let row2 = feature2.feature(j);
        let inner12 = inner_product(feature1.feature(0), row2);
        let inner2_j = inner_product(row2, row2);
        step_distances[j] = step_distances[j - 1] + cosine_distance(inner12, inner1_0, inner2_j);
        step_counts[j] = j as u32;
    }

    let last = size2 - 1;
    for i in 1..size1 {
        let row1 = feature1.feature(i);
        let inner1_i = inner_product(row1, row1);

        // Column 0 can only come from above.
        let mut prev_step_dist = step_distances[0]
            + cosine_distance(inner_product(row1, feature2.feature(0)), inner1_i, inner2_0);
        let mut prev_step_count = step_counts[0] + 1;

        for j in 1..size2 {
            // step_distances[j] still holds row i-1 ("up"); prev_step_dist
            // holds the freshly computed cell to the left; step_distances[j-1]
            // holds row i-1, column j-1 ("diagonal") because the write-back
            // below lags one column.
            let (mut step_dist, mut step_count) = if step_distances[j] < prev_step_dist {
                (step_distances[j], step_counts[j])
            } else {
                (prev_step_dist, prev_step_count)
            };
            if step_distances[j - 1] < step_dist {
                step_dist = step_distances[j - 1];
                step_count = step_counts[j - 1];
            }

            let row2 = feature2.feature(j);
            step_dist += cosine_distance(
                inner_product(row1, row2),
                inner1_i,
                inner_product(row2, row2),
            );
            step_count += 1;

            step_distances[j - 1] = prev_step_dist;
            step_counts[j - 1] = prev_step_count;
            prev_step_dist = step_dist;
            prev_step_count = step_count;
        }
        step_distances[last] = prev_step_dist;
        step_counts[last] = prev_step_count;
    }

    // A 1x1 comparison accumulates no steps; its doubled origin cell is
    // already an average.
    step_distances[last] / step_counts[last].max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tinyvox_feature::SliceFeature;

    #[test]
    fn identical_rows_have_zero_distance() {
        let values = vec![100i16, -200, 300, 100, -200, 300];
        let feature = SliceFeature::new(&values, 3);
        assert_eq!(calc_dtw(&feature, &feature), 0);
    }

    #[test]
    fn orthogonal_rows_average_near_one_thousand() {
        // Every cell costs exactly 1000 (zero inner product), so the best
        // path is the 29-step diagonal: (2*1000 + 29*1000) / 29 = 1068.
        let a: Vec<i16> = (0..30).flat_map(|_| [1000i16, 0, 0]).collect();
        let b: Vec<i16> = (0..30).flat_map(|_| [0i16, 1000, 0]).collect();
        let fa = SliceFeature::new(&a, 3);
        let fb = SliceFeature::new(&b, 3);
        assert_eq!(calc_dtw(&fa, &fb), 1068);
    }

    #[test]
    fn zero_vector_scores_orthogonal_by_convention() {
        // A zero self-inner product pins each cell at 1000; over a 10-step
        // diagonal the average is 1000 + 2000/10 from the doubled origin.
        let a = vec![0i16; 11 * 3];
        let b: Vec<i16> = (0..11).flat_map(|_| [700i16, -100, 40]).collect();
        let fa = SliceFeature::new(&a, 3);
        let fb = SliceFeature::new(&b, 3);
        assert_eq!(calc_dtw(&fa, &fb), 1200);
    }

    #[test]
    fn dimension_mismatch_is_incomparable() {
        let a = vec![1i16; 30 * 12];
        let b = vec![1i16; 30 * 11];
        let fa = SliceFeature::new(&a, 12);
        let fb = SliceFeature::new(&b, 11);
        assert_eq!(calc_dtw(&fa, &fb), DTW_INCOMPARABLE);
    }

    #[test]
    fn length_ratio_gate() {
        let a = vec![1i16; 10 * 12];
        let b = vec![1i16; 40 * 12];
        let fa = SliceFeature::new(&a, 12);
        let fb = SliceFeature::new(&b, 12);
        assert_eq!(calc_dtw(&fa, &fb), DTW_INCOMPARABLE);
        assert_eq!(calc_dtw(&fb, &fa), DTW_INCOMPARABLE);

        // Exactly 3x is still comparable.
        let c = vec![1i16; 30 * 12];
        let fc = SliceFeature::new(&c, 12);
        assert_ne!(calc_dtw(&fc, &fa), DTW_INCOMPARABLE);
    }
}
