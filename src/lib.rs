//! Bingo Engine - session and data core for a browser bingo caller
//!
//! Core modules:
//! - `game`: Draw history and deterministic number selection
//! - `prizes`: Prize list, CSV import/export, image blob capability
//! - `persistence`: Namespaced JSON store with read-repair
//! - `session`: Start/resume/persist of the whole session envelope
//! - `observer`: Observable snapshots for the UI layer
//! - `platform`: Browser bindings

pub mod bgm;
pub mod config;
pub mod error;
pub mod game;
pub mod observer;
pub mod persistence;
pub mod platform;
pub mod prizes;
pub mod session;

pub use bgm::BgmPreference;
pub use config::EngineConfig;
pub use error::{Error, Result};
pub use game::{DrawError, DrawHistoryEntry, DrawOptions, GameState};
pub use observer::Observable;
pub use persistence::{MemoryStorage, StorageMedium, VersionedStore};
pub use prizes::{CsvImportResult, Prize};
pub use session::{GameStateEnvelope, SessionLifecycle, StartOptions};

/// Game configuration constants
pub mod consts {
    /// Lowest drawable number
    pub const MIN_NUMBER: u8 = 1;
    /// Highest drawable number
    pub const MAX_NUMBER: u8 = 75;

    /// Namespace for every persisted key
    pub const STORAGE_PREFIX: &str = "bingo:v1:";

    /// BGM volume when the user never set one
    pub const DEFAULT_BGM_VOLUME: f32 = 0.5;
}

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        return;
    }
    log::info!("Bingo engine loaded");
}
