//! Request-count clamping shared by both generation endpoints.

/// Clamp a requested item count into `0..=max_len`.
///
/// When `requested` is `None` the `fallback` is used instead, still capped
/// at `max_len`. Negative values floor at zero.
pub fn clamp_requested(requested: Option<i64>, max_len: usize, fallback: i64) -> usize {
    let max = i64::try_from(max_len).unwrap_or(i64::MAX);
    let value = match requested {
        None => fallback.min(max),
        Some(r) => r.min(max),
    };
    usize::try_from(value.max(0)).unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
