use crate::config::{ScannerConfig, DEFAULT_MAX_RESULTS};

/// Configuration options for venv scanning.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Stop after this many candidates
    pub max_results: usize,

    /// Measure size and file count of every candidate
    pub compute_sizes: bool,

    /// Add a warning when the root is `/` or the home directory
    pub warn_broad_root: bool,

    /// Threads used for size measurement (0 = rayon default)
    pub threads: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            compute_sizes: true,
            warn_broad_root: true,
            threads: 0,
        }
    }
}

impl From<&ScannerConfig> for ScanOptions {
    fn from(config: &ScannerConfig) -> Self {
        Self {
            max_results: config.max_results,
            compute_sizes: config.compute_sizes,
            warn_broad_root: config.warn_broad_root,
            threads: 0,
        }
    }
}

impl ScanOptions {
    /// Create a new ScanOptions with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the result limit (at least 1)
    pub fn with_max_results(mut self, limit: usize) -> Self {
        self.max_results = limit.max(1);
        self
    }

    /// Set whether to measure candidate sizes
    pub fn with_sizes(mut self, enabled: bool) -> Self {
        self.compute_sizes = enabled;
        self
    }

    /// Set whether to warn about broad roots
    pub fn with_broad_root_warning(mut self, enabled: bool) -> Self {
        self.warn_broad_root = enabled;
        self
    }

    /// Set number of size measurement threads
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = ScanOptions::default();
        assert_eq!(opts.max_results, DEFAULT_MAX_RESULTS);
        assert!(opts.compute_sizes);
        assert!(opts.warn_broad_root);
        assert_eq!(opts.threads, 0);
    }

    #[test]
    fn test_scan_options_chaining() {
        let opts = ScanOptions::new()
            .with_max_results(10)
            .with_sizes(false)
            .with_broad_root_warning(false)
            .with_threads(2);

        assert_eq!(opts.max_results, 10);
        assert!(!opts.compute_sizes);
        assert!(!opts.warn_broad_root);
        assert_eq!(opts.threads, 2);
    }

    #[test]
    fn test_zero_limit_is_clamped() {
        assert_eq!(ScanOptions::new().with_max_results(0).max_results, 1);
    }

    #[test]
    fn test_from_config() {
        let config = ScannerConfig {
            max_results: 7,
            compute_sizes: false,
            ..Default::default()
        };
        let opts = ScanOptions::from(&config);
        assert_eq!(opts.max_results, 7);
        assert!(!opts.compute_sizes);
    }
}
