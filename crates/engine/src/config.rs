use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::query::SearchComposition;

pub const DEFAULT_PAGE_SIZE: usize = 8;
pub const DEFAULT_LOAD_LATENCY_MS: u64 = 800;
pub const DEFAULT_AUTOPLAY_THRESHOLD: f32 = 0.7;
pub const DEFAULT_SENTINEL_THRESHOLD: f32 = 0.1;
pub const DEFAULT_SCROLL_TO_TOP_OFFSET: f32 = 500.0;

/// Tunables for one feed view.
///
/// Every field has a default, so a config file only lists what it overrides.
///
/// # Example
/// ```
/// use engine::FeedConfig;
///
/// let config = FeedConfig::from_json_str(r#"{ "page_size": 4 }"#).expect("valid config");
/// assert_eq!(config.page_size, 4);
/// assert_eq!(config.load_latency_ms, 800);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub page_size: usize,
    /// Simulated fetch latency between a load request and its completion.
    pub load_latency_ms: u64,
    /// Visible fraction at which a card player counts as in view.
    pub autoplay_threshold: f32,
    /// Visible fraction at which the end-of-list sentinel requests a page.
    pub sentinel_threshold: f32,
    pub scroll_to_top_offset: f32,
    pub start_muted: bool,
    pub search_composition: SearchComposition,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            load_latency_ms: DEFAULT_LOAD_LATENCY_MS,
            autoplay_threshold: DEFAULT_AUTOPLAY_THRESHOLD,
            sentinel_threshold: DEFAULT_SENTINEL_THRESHOLD,
            scroll_to_top_offset: DEFAULT_SCROLL_TO_TOP_OFFSET,
            start_muted: true,
            search_composition: SearchComposition::default(),
        }
    }
}

impl FeedConfig {
    /// Parses and validates a config from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|source| EngineError::ConfigSerialization {
                path: "<inline>".into(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| EngineError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self =
            serde_json::from_str(&json).map_err(|source| EngineError::ConfigSerialization {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the pagination and visibility logic cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(EngineError::InvalidConfig {
                reason: "page_size must be positive",
            });
        }
        if !is_visibility_ratio(self.autoplay_threshold) {
            return Err(EngineError::InvalidConfig {
                reason: "autoplay_threshold must be within (0, 1]",
            });
        }
        if !is_visibility_ratio(self.sentinel_threshold) {
            return Err(EngineError::InvalidConfig {
                reason: "sentinel_threshold must be within (0, 1]",
            });
        }
        if !self.scroll_to_top_offset.is_finite() || self.scroll_to_top_offset < 0.0 {
            return Err(EngineError::InvalidConfig {
                reason: "scroll_to_top_offset must be a non-negative number",
            });
        }
        Ok(())
    }
}

fn is_visibility_ratio(value: f32) -> bool {
    value > 0.0 && value <= 1.0
}
