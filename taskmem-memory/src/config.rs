//! Configuration for the memory service.

use serde::{Deserialize, Serialize};
use taskmem_core::RecordStatus;

use crate::error::{MemoryError, Result};

/// Configuration parameters for the semantic memory subsystem.
///
/// Both similarity thresholds are cosine *distances* (smaller is more
/// similar) and are deliberately configuration rather than constants:
/// deployments tune them against their own record corpus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemoryConfig {
    /// Vector dimensionality shared by the encoder and the index.
    pub dimensions: usize,
    /// Maximum distance for a duplicate-work match (the dedup gate).
    pub strict_threshold: f32,
    /// Maximum distance for exploratory recall and episodic memory.
    pub loose_threshold: f32,
    /// Default number of matches returned when the caller gives no limit.
    pub default_limit: usize,
    /// Statuses considered terminal-resolved for episodic memory.
    pub terminal_statuses: Vec<RecordStatus>,
    /// Page size used by the reindex job when none is requested.
    pub reindex_page_size: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            dimensions: 384,
            strict_threshold: 0.2,
            loose_threshold: 0.25,
            default_limit: 5,
            terminal_statuses: vec![RecordStatus::Completed, RecordStatus::Archived],
            reindex_page_size: 100,
        }
    }
}

impl MemoryConfig {
    /// Create a new builder for constructing a [`MemoryConfig`].
    pub fn builder() -> MemoryConfigBuilder {
        MemoryConfigBuilder::default()
    }

    /// Whether `status` counts as terminal-resolved for episodic memory.
    pub fn is_terminal(&self, status: RecordStatus) -> bool {
        self.terminal_statuses.contains(&status)
    }
}

/// Builder for constructing a validated [`MemoryConfig`].
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigBuilder {
    config: MemoryConfig,
}

impl MemoryConfigBuilder {
    /// Set the vector dimensionality.
    pub fn dimensions(mut self, dimensions: usize) -> Self {
        self.config.dimensions = dimensions;
        self
    }

    /// Set the strict (dedup-gate) distance threshold.
    pub fn strict_threshold(mut self, threshold: f32) -> Self {
        self.config.strict_threshold = threshold;
        self
    }

    /// Set the loose (exploratory) distance threshold.
    pub fn loose_threshold(mut self, threshold: f32) -> Self {
        self.config.loose_threshold = threshold;
        self
    }

    /// Set the default match limit.
    pub fn default_limit(mut self, limit: usize) -> Self {
        self.config.default_limit = limit;
        self
    }

    /// Set the terminal-resolved status set for episodic memory.
    pub fn terminal_statuses(mut self, statuses: Vec<RecordStatus>) -> Self {
        self.config.terminal_statuses = statuses;
        self
    }

    /// Set the default reindex page size.
    pub fn reindex_page_size(mut self, page_size: usize) -> Self {
        self.config.reindex_page_size = page_size;
        self
    }

    /// Build the [`MemoryConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::Config`] if:
    /// - `dimensions == 0`
    /// - either threshold is outside `0.0..=2.0` (the cosine distance range)
    /// - `strict_threshold > loose_threshold`
    /// - `default_limit == 0` or `reindex_page_size == 0`
    /// - `terminal_statuses` is empty
    pub fn build(self) -> Result<MemoryConfig> {
        let config = self.config;
        if config.dimensions == 0 {
            return Err(MemoryError::Config("dimensions must be greater than zero".into()));
        }
        for (name, value) in [
            ("strict_threshold", config.strict_threshold),
            ("loose_threshold", config.loose_threshold),
        ] {
            if !(0.0..=2.0).contains(&value) {
                return Err(MemoryError::Config(format!(
                    "{name} ({value}) must be within the cosine distance range 0.0..=2.0"
                )));
            }
        }
        if config.strict_threshold > config.loose_threshold {
            return Err(MemoryError::Config(format!(
                "strict_threshold ({}) must not exceed loose_threshold ({})",
                config.strict_threshold, config.loose_threshold
            )));
        }
        if config.default_limit == 0 {
            return Err(MemoryError::Config("default_limit must be greater than zero".into()));
        }
        if config.reindex_page_size == 0 {
            return Err(MemoryError::Config("reindex_page_size must be greater than zero".into()));
        }
        if config.terminal_statuses.is_empty() {
            return Err(MemoryError::Config("terminal_statuses must not be empty".into()));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_passes_validation() {
        let config = MemoryConfig::builder().build().unwrap();
        assert_eq!(config, MemoryConfig::default());
    }

    #[test]
    fn strict_above_loose_is_rejected() {
        let err = MemoryConfig::builder()
            .strict_threshold(0.5)
            .loose_threshold(0.2)
            .build()
            .unwrap_err();
        assert!(matches!(err, MemoryError::Config(_)));
    }

    #[test]
    fn threshold_outside_cosine_range_is_rejected() {
        assert!(MemoryConfig::builder().loose_threshold(2.5).build().is_err());
        assert!(MemoryConfig::builder().strict_threshold(-0.1).build().is_err());
    }

    #[test]
    fn terminal_predicate_uses_configured_set() {
        let config = MemoryConfig::builder()
            .terminal_statuses(vec![RecordStatus::Completed])
            .build()
            .unwrap();
        assert!(config.is_terminal(RecordStatus::Completed));
        assert!(!config.is_terminal(RecordStatus::Archived));
        assert!(!config.is_terminal(RecordStatus::Pending));
    }
}
