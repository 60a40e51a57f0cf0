//! Binary persistence of feature matrices.
//!
//! Layout, little-endian with no padding: a one-byte version tag (`0x01`),
//! `frame_num` and `coef_num` as signed 32-bit integers, then the row-major
//! `i16` values. No trailer, no checksum; the reader rejects unknown tags
//! and any byte-count mismatch.

use std::fs;
use std::path::Path;

use tinyvox_feature::SoundFeature;
use tracing::warn;

use crate::error::MfccError;
use crate::feature::MfccFeature;

const FEATURE_TAG_V1: u8 = 0x01;
const HEADER_LEN: usize = 9;

/// Writes `feature` to `path`, replacing any existing file.
///
/// A failed or short write leaves the file in an undefined state; the
/// reader will reject it on reload.
pub fn save_file(path: impl AsRef<Path>, feature: &MfccFeature) -> Result<(), MfccError> {
    let values = feature.values();
    let mut bytes = Vec::with_capacity(HEADER_LEN + 2 * values.len());
    bytes.push(FEATURE_TAG_V1);
    bytes.extend_from_slice(&(feature.size() as i32).to_le_bytes());
    bytes.extend_from_slice(&(feature.dimension() as i32).to_le_bytes());
    for &value in values {
        bytes.extend_from_slice(&value.to_le_bytes());
    }

    fs::write(path, bytes)?;
    Ok(())
}

/// Reads a feature matrix previously written by [`save_file`].
pub fn load_file(path: impl AsRef<Path>) -> Result<MfccFeature, MfccError> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;

    if bytes.len() < HEADER_LEN {
        warn!(path = %path.display(), len = bytes.len(), "feature file shorter than header");
        return Err(MfccError::MalformedFile);
    }
    if bytes[0] != FEATURE_TAG_V1 {
        warn!(path = %path.display(), tag = bytes[0], "feature file has unknown version tag");
        return Err(MfccError::UnknownVersion(bytes[0]));
    }

    let frame_num = read_i32_le(&bytes[1..5]);
    let coef_num = read_i32_le(&bytes[5..9]);
    if frame_num <= 0 || coef_num <= 0 {
        warn!(path = %path.display(), frame_num, coef_num, "feature file declares empty shape");
        return Err(MfccError::MalformedFile);
    }

    let (frame_num, coef_num) = (frame_num as usize, coef_num as usize);
    let payload = frame_num
        .checked_mul(coef_num)
        .and_then(|count| count.checked_mul(2))
        .ok_or(MfccError::MalformedFile)?;
    if bytes.len() - HEADER_LEN != payload {
        warn!(
            path = %path.display(),
            declared = payload,
            actual = bytes.len() - HEADER_LEN,
            "feature file payload does not match its declared shape"
        );
        return Err(MfccError::MalformedFile);
    }

    let data = bytes[HEADER_LEN..]
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    Ok(MfccFeature::from_raw(frame_num, coef_num, data))
}

fn read_i32_le(bytes: &[u8]) -> i32 {
    i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}
