use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;

use crate::{
    assets::decode::{PreparedImage, decode_image_fit, rasterize_svg_fit},
    foundation::error::TutoResult,
};

/// Default remote sprite source (Twemoji 14.0.2, 72x72 PNGs).
pub const DEFAULT_SPRITE_BASE_URL: &str =
    "https://cdn.jsdelivr.net/gh/twitter/twemoji@14.0.2/assets/72x72/";

/// Default network timeout for one sprite request.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

const VARIATION_SELECTOR_16: u32 = 0xFE0F;

/// A decoded sprite, premultiplied and already fitted to the requested size.
pub type Sprite = PreparedImage;

/// Where sprites come from.
#[derive(Clone, Debug)]
pub struct SpriteSource {
    pub cache_dir: PathBuf,
    pub base_url: String,
    /// Never touch the network; only the local cache is consulted.
    pub offline: bool,
    pub timeout: Duration,
}

impl SpriteSource {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            base_url: DEFAULT_SPRITE_BASE_URL.to_owned(),
            offline: false,
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    pub fn offline(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            offline: true,
            ..Self::new(cache_dir)
        }
    }
}

/// File name of the sprite for `symbol`: lowercase hex code points joined by `-`, plus `.png`.
pub fn sprite_file_name(symbol: &str) -> String {
    file_name_for(symbol.chars().map(u32::from))
}

fn file_name_for(code_points: impl Iterator<Item = u32>) -> String {
    let hex = code_points
        .map(|cp| format!("{cp:x}"))
        .collect::<Vec<_>>()
        .join("-");
    format!("{hex}.png")
}

/// The alternate file name with every variation selector stripped, if it differs.
pub fn sprite_file_name_without_vs16(symbol: &str) -> Option<String> {
    if !symbol.chars().any(|c| u32::from(c) == VARIATION_SELECTOR_16) {
        return None;
    }
    let stripped = symbol
        .chars()
        .map(u32::from)
        .filter(|&cp| cp != VARIATION_SELECTOR_16)
        .collect::<Vec<_>>();
    if stripped.is_empty() {
        return None;
    }
    Some(file_name_for(stripped.into_iter()))
}

/// Outcome of one remote request. Only `NotFound` allows the variation-selector retry.
#[derive(Debug)]
enum Fetched {
    Bytes(Vec<u8>),
    NotFound,
    Failed,
}

/// Lazily populated sprite cache for one run.
///
/// Lookups never fail: anything that goes wrong (missing cache entry, network error, HTTP error
/// status, undecodable bytes) yields `None` and a warning.
pub struct SpriteLoader {
    source: SpriteSource,
    client: Option<reqwest::blocking::Client>,
    memo: HashMap<(String, u32), Option<Sprite>>,
}

impl SpriteLoader {
    pub fn new(source: SpriteSource) -> Self {
        Self {
            source,
            client: None,
            memo: HashMap::new(),
        }
    }

    pub fn source(&self) -> &SpriteSource {
        &self.source
    }

    /// Resolve `symbol` to an image fitting inside `target_size`x`target_size`.
    pub fn load_sprite(&mut self, symbol: &str, target_size: u32) -> Option<Sprite> {
        let key = (symbol.to_owned(), target_size);
        if let Some(hit) = self.memo.get(&key) {
            return hit.clone();
        }
        let sprite = self.resolve(symbol, target_size);
        self.memo.insert(key, sprite.clone());
        sprite
    }

    fn resolve(&mut self, symbol: &str, target_size: u32) -> Option<Sprite> {
        if symbol.is_empty() {
            return None;
        }
        let primary = sprite_file_name(symbol);
        let alternate = sprite_file_name_without_vs16(symbol);

        for name in std::iter::once(&primary).chain(alternate.iter()) {
            if let Some(sprite) = self.from_cache(name, target_size) {
                tracing::debug!(symbol, file = %name, "sprite cache hit");
                return Some(sprite);
            }
        }

        if self.source.offline {
            tracing::warn!(symbol, file = %primary, "sprite not cached and offline; skipping");
            return None;
        }

        let fetched = match (self.fetch(&primary), &alternate) {
            (Fetched::Bytes(bytes), _) => Some((primary.clone(), bytes)),
            (Fetched::NotFound, Some(alt)) => match self.fetch(alt) {
                Fetched::Bytes(bytes) => Some((alt.clone(), bytes)),
                _ => None,
            },
            _ => None,
        };
        let Some((name, bytes)) = fetched else {
            tracing::warn!(symbol, file = %primary, "sprite unavailable; skipping");
            return None;
        };

        let sprite = match decode_image_fit(&bytes, target_size) {
            Ok(sprite) => sprite,
            Err(err) => {
                tracing::warn!(symbol, file = %name, %err, "sprite bytes undecodable; skipping");
                return None;
            }
        };
        if let Err(err) = persist(&self.source.cache_dir, &name, &bytes) {
            tracing::warn!(file = %name, %err, "could not persist sprite to cache");
        }
        Some(sprite)
    }

    fn from_cache(&self, name: &str, target_size: u32) -> Option<Sprite> {
        let png = self.source.cache_dir.join(name);
        if let Ok(bytes) = std::fs::read(&png) {
            match decode_image_fit(&bytes, target_size) {
                Ok(s) => return Some(s),
                Err(err) => tracing::warn!(path = %png.display(), %err, "cached sprite undecodable"),
            }
        }

        let svg = png.with_extension("svg");
        let bytes = std::fs::read(&svg).ok()?;
        match rasterize_svg_fit(&bytes, target_size) {
            Ok(s) => Some(s),
            Err(err) => {
                tracing::warn!(path = %svg.display(), %err, "cached svg sprite unreadable");
                None
            }
        }
    }

    fn fetch(&mut self, name: &str) -> Fetched {
        let url = format!("{}{}", self.source.base_url, name);
        let Some(client) = self.client() else {
            return Fetched::Failed;
        };
        tracing::debug!(%url, "fetching sprite");
        let response = match client.get(&url).send() {
            Ok(r) => r,
            Err(err) => {
                tracing::debug!(%url, %err, "sprite request failed");
                return Fetched::Failed;
            }
        };
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            tracing::debug!(%url, "sprite not found");
            return Fetched::NotFound;
        }
        if !status.is_success() {
            tracing::debug!(%url, %status, "sprite request rejected");
            return Fetched::Failed;
        }
        match response.bytes() {
            Ok(b) => Fetched::Bytes(b.to_vec()),
            Err(err) => {
                tracing::debug!(%url, %err, "sprite body unreadable");
                Fetched::Failed
            }
        }
    }

    fn client(&mut self) -> Option<&reqwest::blocking::Client> {
        if self.client.is_none() {
            match reqwest::blocking::Client::builder()
                .timeout(self.source.timeout)
                .build()
            {
                Ok(c) => self.client = Some(c),
                Err(err) => {
                    tracing::warn!(%err, "could not build http client; sprites disabled");
                    self.source.offline = true;
                    return None;
                }
            }
        }
        self.client.as_ref()
    }
}

fn persist(dir: &Path, name: &str, bytes: &[u8]) -> TutoResult<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create sprite cache dir '{}'", dir.display()))?;
    let path = dir.join(name);
    std::fs::write(&path, bytes).with_context(|| format!("write sprite '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/sprite.rs"]
mod tests;
