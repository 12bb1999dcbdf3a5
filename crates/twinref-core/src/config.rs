//! Resolver options with environment overrides.

use crate::errors::{TwinRefError, TwinRefResult};
use crate::resolver::guards::{clamp_workers, DEFAULT_RESOLVE_WORKERS};

pub const WORKERS_ENV: &str = "TWINREF_RESOLVE_WORKERS";
pub const VERBOSE_NOTICES_ENV: &str = "TWINREF_VERBOSE_NOTICES";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Upper bound on batches resolved concurrently by the parallel resolver.
    pub workers: usize,
    /// Emit `Info` notices for batches dropped or left without a component.
    pub verbose_notices: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            workers: DEFAULT_RESOLVE_WORKERS,
            verbose_notices: false,
        }
    }
}

impl ResolverOptions {
    pub fn new(workers: i64, verbose_notices: bool) -> Self {
        Self {
            workers: clamp_workers(workers),
            verbose_notices,
        }
    }

    /// Defaults overridden by `TWINREF_RESOLVE_WORKERS` and
    /// `TWINREF_VERBOSE_NOTICES`.
    pub fn from_env() -> TwinRefResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> TwinRefResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();
        if let Some(raw) = lookup(WORKERS_ENV) {
            let workers: i64 = raw.trim().parse().map_err(|_| {
                TwinRefError::Config(format!("{WORKERS_ENV} must be an integer, got {raw:?}"))
            })?;
            options.workers = clamp_workers(workers);
        }
        if let Some(raw) = lookup(VERBOSE_NOTICES_ENV) {
            let v = raw.trim().to_lowercase();
            options.verbose_notices = matches!(v.as_str(), "1" | "true" | "yes" | "on");
        }
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let options = ResolverOptions::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(options, ResolverOptions::default());
        assert!(!options.verbose_notices);
    }

    #[test]
    fn test_env_overrides() {
        let options = ResolverOptions::from_lookup(lookup_from(&[
            (WORKERS_ENV, " 12 "),
            (VERBOSE_NOTICES_ENV, "Yes"),
        ]))
        .unwrap();
        assert_eq!(options.workers, 12);
        assert!(options.verbose_notices);
    }

    #[test]
    fn test_workers_are_clamped() {
        let options =
            ResolverOptions::from_lookup(lookup_from(&[(WORKERS_ENV, "0")])).unwrap();
        assert_eq!(options.workers, 1);
        assert_eq!(ResolverOptions::new(500, false).workers, 32);
    }

    #[test]
    fn test_invalid_workers_is_config_error() {
        let err = ResolverOptions::from_lookup(lookup_from(&[(WORKERS_ENV, "many")]))
            .unwrap_err();
        assert!(matches!(err, TwinRefError::Config(_)));
    }
}
