//! Engine configuration
//!
//! Everything here has a sensible default; the browser build never needs to
//! override it, tests and the native demo sometimes do.

use crate::consts::{DEFAULT_BGM_VOLUME, MAX_NUMBER, MIN_NUMBER, STORAGE_PREFIX};
use crate::game::DrawDomain;

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Prefix for every persisted key
    pub storage_prefix: String,
    /// Drawable numbers
    pub domain: DrawDomain,
    /// Volume used when no BGM preference is stored
    pub default_bgm_volume: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            storage_prefix: STORAGE_PREFIX.to_string(),
            domain: DrawDomain::new(MIN_NUMBER, MAX_NUMBER),
            default_bgm_volume: DEFAULT_BGM_VOLUME,
        }
    }
}

impl EngineConfig {
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.storage_prefix = prefix.into();
        self
    }

    pub fn with_domain(mut self, min: u8, max: u8) -> Self {
        self.domain = DrawDomain::new(min, max);
        self
    }
}
