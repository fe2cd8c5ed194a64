//! Reconstruction configuration types
//!
//! The reconstruction pass itself has no tunables beyond filtering: which
//! components and which record categories end up in the timeline.

use crate::types::Category;
use serde::{Deserialize, Serialize};

/// Configuration for the reconstruction pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconstructConfig {
    /// Optional: only keep records from these process identifiers
    #[serde(default)]
    pub pids: Option<Vec<String>>,

    /// Optional: only keep records of these categories
    #[serde(default)]
    pub categories: Option<Vec<Category>>,
}

impl ReconstructConfig {
    /// Create a new configuration that keeps everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set pid filter
    pub fn with_pid_filter(mut self, pids: Vec<String>) -> Self {
        self.pids = Some(pids);
        self
    }

    /// Builder method: set category filter
    pub fn with_category_filter(mut self, categories: Vec<Category>) -> Self {
        self.categories = Some(categories);
        self
    }

    /// Check if a component should be processed
    pub fn should_process_pid(&self, pid: &str) -> bool {
        match &self.pids {
            Some(pids) => pids.iter().any(|p| p == pid),
            None => true,
        }
    }

    /// Check if a category should be processed
    pub fn should_process_category(&self, category: Category) -> bool {
        match &self.categories {
            Some(categories) => categories.contains(&category),
            None => true,
        }
    }

    /// Check if a record should be processed based on filters
    pub fn should_process(&self, pid: &str, category: Category) -> bool {
        self.should_process_pid(pid) && self.should_process_category(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_logic() {
        let config = ReconstructConfig::new()
            .with_pid_filter(vec!["100".into(), "200".into()])
            .with_category_filter(vec![Category::State, Category::Event]);

        assert!(config.should_process("100", Category::State));
        assert!(config.should_process("200", Category::Event));
        assert!(!config.should_process("300", Category::State)); // Wrong pid
        assert!(!config.should_process("100", Category::PortFlow)); // Wrong category
    }

    #[test]
    fn test_no_filters() {
        let config = ReconstructConfig::new();

        assert!(config.should_process("100", Category::PortPacket));
        assert!(config.should_process("", Category::Event));
    }
}
