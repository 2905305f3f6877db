//! Platform abstraction layer
//!
//! Browser bindings (wasm32 only):
//! - `LocalStorage`: storage medium over `window.localStorage`
//! - `WebSession`: JSON-in/JSON-out facade for the page scripts

#[cfg(target_arch = "wasm32")]
mod web {
    use chrono::Utc;
    use wasm_bindgen::prelude::*;

    use crate::config::EngineConfig;
    use crate::game::DrawOptions;
    use crate::persistence::{StorageError, StorageMedium, VersionedStore};
    use crate::prizes::{export_csv, import_csv};
    use crate::session::{SessionLifecycle, StartOptions};

    /// `window.localStorage`
    pub struct LocalStorage {
        storage: web_sys::Storage,
    }

    impl LocalStorage {
        /// `None` when storage is blocked (private mode, sandboxed iframe)
        pub fn open() -> Option<Self> {
            let storage = web_sys::window()?.local_storage().ok()??;
            Some(Self { storage })
        }
    }

    impl StorageMedium for LocalStorage {
        fn get_item(&self, key: &str) -> Option<String> {
            self.storage.get_item(key).ok().flatten()
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.storage
                .set_item(key, value)
                .map_err(|e| StorageError::Write {
                    key: key.to_string(),
                    reason: format!("{e:?}"),
                })
        }

        fn remove_item(&self, key: &str) {
            let _ = self.storage.remove_item(key);
        }

        fn keys(&self) -> Vec<String> {
            let len = self.storage.length().unwrap_or(0);
            (0..len)
                .filter_map(|i| self.storage.key(i).ok().flatten())
                .collect()
        }
    }

    fn js_err(e: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&e.to_string())
    }

    fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
        serde_json::to_string(value).map_err(js_err)
    }

    /// Session handle exported to JavaScript
    #[wasm_bindgen]
    pub struct WebSession {
        session: SessionLifecycle,
    }

    #[wasm_bindgen]
    impl WebSession {
        #[wasm_bindgen(constructor)]
        pub fn new() -> WebSession {
            let config = EngineConfig::default();
            let store = match LocalStorage::open() {
                Some(medium) => VersionedStore::new(medium, config.storage_prefix.clone()),
                None => {
                    log::warn!("localStorage unavailable - nothing will be saved");
                    VersionedStore::unavailable(config.storage_prefix.clone())
                }
            };
            WebSession {
                session: SessionLifecycle::new(store, config),
            }
        }

        #[wasm_bindgen(js_name = startSession)]
        pub fn start_session(&self, reset_prizes: bool) -> Result<String, JsValue> {
            let envelope = self
                .session
                .start_session(StartOptions { reset_prizes })
                .map_err(js_err)?;
            to_json(&envelope)
        }

        /// Envelope JSON, or `undefined` when there is nothing to resume
        #[wasm_bindgen(js_name = resumeSession)]
        pub fn resume_session(&self) -> Result<Option<String>, JsValue> {
            self.session
                .resume_session()
                .map(|envelope| to_json(&envelope))
                .transpose()
        }

        /// Draw the next number; the error message is the exhaustion notice
        #[wasm_bindgen(js_name = drawNext)]
        pub fn draw_next(&self, seed: Option<f64>) -> Result<String, JsValue> {
            let options = DrawOptions {
                seed,
                ..Default::default()
            };
            let state = self.session.draw_and_persist(options).map_err(js_err)?;
            to_json(&state)
        }

        #[wasm_bindgen(js_name = resetGame)]
        pub fn reset_game(&self) -> Result<String, JsValue> {
            let state = self.session.reset_game().map_err(js_err)?;
            to_json(&state)
        }

        /// Merge CSV into the stored prizes; returns the import summary JSON
        #[wasm_bindgen(js_name = importCsv)]
        pub fn import_csv(&self, source_name: &str, text: &str) -> Result<String, JsValue> {
            let existing = self.session.load_prizes();
            let (prizes, result) =
                import_csv(&existing, source_name, text, Utc::now()).map_err(js_err)?;
            self.session.save_prizes(&prizes).map_err(js_err)?;
            to_json(&result)
        }

        #[wasm_bindgen(js_name = exportCsv)]
        pub fn export_csv(&self) -> String {
            export_csv(&self.session.load_prizes())
        }

        #[wasm_bindgen(js_name = hasStoredDrawHistory)]
        pub fn has_stored_draw_history(&self) -> bool {
            self.session.has_stored_draw_history()
        }

        #[wasm_bindgen(js_name = hasStoredGameState)]
        pub fn has_stored_game_state(&self) -> bool {
            self.session.has_stored_game_state()
        }

        #[wasm_bindgen(js_name = hasStoredPrizeSelection)]
        pub fn has_stored_prize_selection(&self) -> bool {
            self.session.has_stored_prize_selection()
        }

        #[wasm_bindgen(js_name = clearAll)]
        pub fn clear_all(&self) -> usize {
            self.session.clear_all()
        }
    }

    impl Default for WebSession {
        fn default() -> Self {
            Self::new()
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::{LocalStorage, WebSession};
