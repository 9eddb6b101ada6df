//! Configuration for one exploration run.

use serde::{Deserialize, Serialize};

/// Tunables of the run loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PilotConfig {
    /// Maximum turns before the run stops with a limit-reached report.
    /// Default: 100
    pub max_steps: u32,

    /// Attempts per turn when prompting or extraction fails.
    /// Default: 2
    pub max_attempts_per_turn: u32,

    /// Whether analysis results are cached and replayed on matching
    /// screens.
    /// Default: true
    pub cache_enabled: bool,

    /// Review sections requested from the model on every turn.
    #[serde(default)]
    pub review_sections: Vec<ReviewSectionConfig>,
}

impl Default for PilotConfig {
    fn default() -> Self {
        Self {
            max_steps: 100,
            max_attempts_per_turn: 2,
            cache_enabled: true,
            review_sections: Vec::new(),
        }
    }
}

/// One caller-declared review section (e.g. "ux", "accessibility").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReviewSectionConfig {
    /// Section name; its wire tag derives from this.
    pub name: String,
    /// Optional guidance included in the prompt for this section.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidance: Option<String>,
}

impl ReviewSectionConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            guidance: None,
        }
    }

    pub fn with_guidance(mut self, guidance: impl Into<String>) -> Self {
        self.guidance = Some(guidance.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PilotConfig::default();
        assert_eq!(config.max_steps, 100);
        assert_eq!(config.max_attempts_per_turn, 2);
        assert!(config.cache_enabled);
        assert!(config.review_sections.is_empty());
    }
}
