//! Fixed-point scale factors.

/// Pre-emphasis coefficients are integer percent (97 means 0.97).
pub(crate) const PRE_EMPHASIS_SCALE: i32 = 100;

/// Hamming window entries are `i16` scaled by this factor.
pub(crate) const WINDOW_SCALE: i32 = 10_000;

/// DCT-II cosine entries are `i16` scaled by this factor.
pub(crate) const DCT_SCALE: i32 = 10_000;

/// Normalized feature values are stored at this many units per standard
/// deviation. Part of the serialized interchange format; integer DTW
/// distances are calibrated against it.
pub const FEATURE_SCALE: i32 = 1_000;
