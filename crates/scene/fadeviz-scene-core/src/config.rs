//! Scene configuration, loadable from JSON.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use fadeviz_cache_core::{BaseDefinition, CacheConfig};
use fadeviz_layout_core::LayoutConfig;
use fadeviz_transition_core::TransitionConfig;

/// Everything a [`FadeScene`](crate::FadeScene) needs besides its factory and
/// spawner. Every field has a default, so partial JSON documents are fine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Number of items spawned on construction.
    pub item_count: usize,
    pub cache: CacheConfig,
    pub transition: TransitionConfig,
    pub layout: LayoutConfig,
    pub base: BaseDefinition,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            item_count: 50,
            cache: CacheConfig::default(),
            transition: TransitionConfig::default(),
            layout: LayoutConfig::default(),
            base: BaseDefinition::default(),
        }
    }
}

impl SceneConfig {
    /// Parse and validate a JSON config document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: SceneConfig = serde_json::from_str(json).context("parsing scene config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        self.cache.validate().context("invalid cache config")?;
        Ok(())
    }
}
