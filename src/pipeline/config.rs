use std::{path::PathBuf, time::Duration};

use crate::{
    assets::{
        font::FontResolver,
        sprite::{DEFAULT_FETCH_TIMEOUT, DEFAULT_SPRITE_BASE_URL, SpriteLoader, SpriteSource},
    },
    scene::builder::SceneAssets,
};

pub const ENV_SPRITE_BASE_URL: &str = "TUTOGEN_SPRITE_BASE_URL";
pub const ENV_OFFLINE: &str = "TUTOGEN_OFFLINE";

/// Runtime settings for a generator run; content lives in the tutorial definition.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratorConfig {
    /// Directory receiving every artifact (created when missing).
    pub out_dir: PathBuf,
    /// Local sprite cache (created when missing).
    pub sprite_cache_dir: PathBuf,
    /// Remote sprite source; file names are appended to it.
    pub sprite_base_url: String,
    /// Only consult the local sprite cache.
    pub offline: bool,
    pub fetch_timeout: Duration,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("tutos"),
            sprite_cache_dir: PathBuf::from("emoji"),
            sprite_base_url: DEFAULT_SPRITE_BASE_URL.to_owned(),
            offline: false,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

impl GeneratorConfig {
    /// Defaults with `TUTOGEN_SPRITE_BASE_URL` / `TUTOGEN_OFFLINE` applied.
    pub fn from_env() -> Self {
        Self::default().with_env(|k| std::env::var(k).ok())
    }

    /// Apply environment-style overrides read through `lookup`.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(ENV_SPRITE_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.sprite_base_url = url.trim().to_owned();
        }
        if let Some(v) = lookup(ENV_OFFLINE) {
            self.offline = matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }
        self
    }

    pub fn with_out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
        self.out_dir = out_dir.into();
        self
    }

    pub fn with_sprite_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.sprite_cache_dir = dir.into();
        self
    }

    pub fn with_offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    pub fn sprite_source(&self) -> SpriteSource {
        SpriteSource {
            cache_dir: self.sprite_cache_dir.clone(),
            base_url: self.sprite_base_url.clone(),
            offline: self.offline,
            timeout: self.fetch_timeout,
        }
    }

    /// Fresh per-run asset resolvers: system fonts plus a sprite loader for this source.
    pub fn scene_assets(&self) -> SceneAssets {
        SceneAssets::new(
            FontResolver::system(),
            SpriteLoader::new(self.sprite_source()),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/config.rs"]
mod tests;
