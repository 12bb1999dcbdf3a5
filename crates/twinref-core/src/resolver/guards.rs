//! Bounds for resolver worker pools.

pub const DEFAULT_RESOLVE_WORKERS: usize = 4;
pub const MAX_RESOLVE_WORKERS: usize = 32;

pub fn clamp_int(value: i64, minimum: i64, maximum: i64) -> i64 {
    value.max(minimum).min(maximum)
}

/// Clamp a requested worker count into `[1, MAX_RESOLVE_WORKERS]`.
pub fn clamp_workers(value: i64) -> usize {
    clamp_int(value, 1, MAX_RESOLVE_WORKERS as i64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_workers_bounds() {
        assert_eq!(clamp_workers(0), 1);
        assert_eq!(clamp_workers(-5), 1);
        assert_eq!(clamp_workers(8), 8);
        assert_eq!(clamp_workers(10_000), MAX_RESOLVE_WORKERS);
    }
}
