//! Bounds validation utilities

use crate::error::{Error, Result};

/// `true` if `later` is more than `skew_seconds` past `earlier`
///
/// Computed in `i128`, so any pair of `i64` timestamps compares exactly.
pub(crate) fn exceeds_skew(later: i64, earlier: i64, skew_seconds: u64) -> bool {
    i128::from(later) - i128::from(earlier) > i128::from(skew_seconds)
}

/// Validate string field size
pub(crate) fn validate_field_size(field: &'static str, value: &str, max: usize) -> Result<()> {
    if value.len() > max {
        return Err(Error::HeaderFieldTooLong {
            field,
            length: value.len(),
            max,
        });
    }
    Ok(())
}
