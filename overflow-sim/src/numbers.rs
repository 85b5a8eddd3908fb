//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Round a non-negative f64 to the nearest u32, clamping to the u32 range.
/// NaN and negative values map to 0.
#[must_use]
pub fn round_f64_to_u32(value: f64) -> u32 {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    let max = cast::<u32, f64>(u32::MAX).unwrap_or(f64::MAX);
    let clamped = value.min(max).round();
    cast::<f64, u32>(clamped).unwrap_or(0)
}

/// Round a non-negative f64 to the nearest usize, clamping to the usize range.
/// NaN and negative values map to 0.
#[must_use]
pub fn round_f64_to_usize(value: f64) -> usize {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    let max = cast::<usize, f64>(usize::MAX).unwrap_or(f64::MAX);
    cast::<f64, usize>(value.min(max).round()).unwrap_or(usize::MAX)
}

/// Floor a non-negative f64 into an index, clamping to `len - 1`.
/// Returns `None` for an empty range.
#[must_use]
pub fn floor_index(value: f64, len: usize) -> Option<usize> {
    let last = len.checked_sub(1)?;
    if value.is_nan() || value <= 0.0 {
        return Some(0);
    }
    let index = cast::<f64, usize>(value.floor()).unwrap_or(last);
    Some(index.min(last))
}

/// Convert usize to f64 while allowing precision loss in a single location.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// Convert u64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn u64_to_f64(value: u64) -> f64 {
    cast::<u64, f64>(value).unwrap_or(0.0)
}
