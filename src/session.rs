//! Session lifecycle
//!
//! Composes the game state, prize list and BGM preference into one envelope
//! and moves it in and out of the versioned store.
//!
//! The three aggregates are stored under independent keys and written one
//! after another. A failed write leaves the earlier keys committed; nothing
//! rolls them back.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bgm::BgmPreference;
use crate::config::EngineConfig;
use crate::game::{DrawError, DrawOptions, GameState};
use crate::persistence::{StorageError, VersionedStore};
use crate::prizes::{Prize, list::reset_selection};

pub const GAME_STATE_KEY: &str = "game-state";
pub const PRIZES_KEY: &str = "prizes";
pub const BGM_KEY: &str = "bgm";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Draw(#[from] DrawError),
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// Everything a running session needs, persisted and restored together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateEnvelope {
    pub game_state: GameState,
    pub prizes: Vec<Prize>,
    pub bgm: BgmPreference,
}

#[derive(Debug, Clone, Copy)]
pub struct StartOptions {
    /// Clear every prize's `selected` flag
    pub reset_prizes: bool,
}

impl Default for StartOptions {
    fn default() -> Self {
        Self { reset_prizes: true }
    }
}

/// Start/resume/persist over a versioned store
pub struct SessionLifecycle {
    store: VersionedStore,
    config: EngineConfig,
}

impl SessionLifecycle {
    pub fn new(store: VersionedStore, config: EngineConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &VersionedStore {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn default_bgm(&self) -> BgmPreference {
        BgmPreference {
            volume: self.config.default_bgm_volume,
            ..BgmPreference::default_at(Utc::now())
        }
    }

    pub fn load_game_state(&self) -> Option<GameState> {
        self.store.read_as(GAME_STATE_KEY)
    }

    /// Stored prizes, empty when none
    pub fn load_prizes(&self) -> Vec<Prize> {
        self.store.read_as(PRIZES_KEY).unwrap_or_default()
    }

    /// Stored BGM preference, or the default
    pub fn load_bgm(&self) -> BgmPreference {
        self.store
            .read_as(BGM_KEY)
            .unwrap_or_else(|| self.default_bgm())
    }

    pub fn save_game_state(&self, state: &GameState) -> Result<()> {
        Ok(self.store.write_json(GAME_STATE_KEY, state)?)
    }

    pub fn save_prizes(&self, prizes: &[Prize]) -> Result<()> {
        Ok(self.store.write_json(PRIZES_KEY, prizes)?)
    }

    pub fn save_bgm(&self, bgm: &BgmPreference) -> Result<()> {
        Ok(self.store.write_json(BGM_KEY, bgm)?)
    }

    /// Begin a fresh game, keeping the prize list and BGM preference
    pub fn start_session(&self, options: StartOptions) -> Result<GameStateEnvelope> {
        let stored = self.load_prizes();
        let prizes = if options.reset_prizes {
            reset_selection(&stored)
        } else {
            stored
        };

        let envelope = GameStateEnvelope {
            game_state: GameState::new(Utc::now()),
            prizes,
            bgm: self.load_bgm(),
        };
        self.persist_session_state(&envelope)?;
        log::info!(
            "Started session with {} prizes (selection reset: {})",
            envelope.prizes.len(),
            options.reset_prizes
        );
        Ok(envelope)
    }

    /// Restore the stored session, or `None` when no game was saved.
    /// Never writes.
    pub fn resume_session(&self) -> Option<GameStateEnvelope> {
        let game_state = self.load_game_state()?;
        let envelope = GameStateEnvelope {
            game_state,
            prizes: self.load_prizes(),
            bgm: self.load_bgm(),
        };
        log::info!(
            "Resumed session at draw {}",
            envelope.game_state.draw_history.len()
        );
        Some(envelope)
    }

    /// Write game state, prizes, then BGM. Not atomic.
    pub fn persist_session_state(&self, envelope: &GameStateEnvelope) -> Result<()> {
        self.save_game_state(&envelope.game_state)?;
        self.save_prizes(&envelope.prizes)?;
        self.save_bgm(&envelope.bgm)?;
        Ok(())
    }

    /// Draw from the latest persisted state and persist the result
    pub fn draw_and_persist(&self, options: DrawOptions) -> Result<GameState> {
        let current = self
            .load_game_state()
            .unwrap_or_else(|| GameState::new(Utc::now()));
        let next = self.config.domain.draw_next(&current, options)?;
        self.save_game_state(&next)?;
        Ok(next)
    }

    /// Clear the draw history; prizes are kept
    pub fn reset_game(&self) -> Result<GameState> {
        let now = Utc::now();
        let next = match self.load_game_state() {
            Some(state) => state.reset(now),
            None => GameState::new(now),
        };
        self.save_game_state(&next)?;
        log::info!("Game reset");
        Ok(next)
    }

    /// Remove everything this engine stored
    pub fn clear_all(&self) -> usize {
        self.store.clear_versioned()
    }

    pub fn has_stored_game_state(&self) -> bool {
        self.store.has_key(GAME_STATE_KEY)
    }

    pub fn has_stored_draw_history(&self) -> bool {
        self.load_game_state().is_some_and(|s| s.has_history())
    }

    pub fn has_stored_prize_selection(&self) -> bool {
        self.load_prizes().iter().any(|p| p.selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStorage, StorageMedium};

    const HEADER: &str = "id,order,prizeName,itemName,imagePath,selected,memo";

    fn session() -> (SessionLifecycle, MemoryStorage) {
        let medium = MemoryStorage::new();
        let config = EngineConfig::default();
        let store = VersionedStore::new(medium.clone(), config.storage_prefix.clone());
        (SessionLifecycle::new(store, config), medium)
    }

    fn seed_prizes(session: &SessionLifecycle) -> Vec<Prize> {
        let text = format!(
            "{HEADER}\np-1,0,一等,Switch,,true,豪華賞品\np-2,1,二等,ギフトカード,,false,"
        );
        let prizes = crate::prizes::csv::parse(&text).unwrap().prizes;
        session.save_prizes(&prizes).unwrap();
        prizes
    }

    fn snapshot(medium: &MemoryStorage) -> Vec<(String, Option<String>)> {
        medium
            .keys()
            .into_iter()
            .map(|k| {
                let v = medium.get_item(&k);
                (k, v)
            })
            .collect()
    }

    #[test]
    fn test_start_session_resets_selection() {
        let (session, _) = session();
        seed_prizes(&session);

        let envelope = session.start_session(StartOptions::default()).unwrap();
        assert_eq!(envelope.game_state.current_number, None);
        assert!(envelope.game_state.draw_history.is_empty());
        assert!(!envelope.game_state.is_drawing);
        assert_eq!(envelope.game_state.created_at, envelope.game_state.updated_at);
        assert_eq!(envelope.prizes.len(), 2);
        assert!(envelope.prizes.iter().all(|p| !p.selected));
        assert!(envelope.bgm.enabled);
        assert_eq!(envelope.bgm.volume, crate::consts::DEFAULT_BGM_VOLUME);

        // Persisted too
        assert!(!session.has_stored_prize_selection());
        assert_eq!(session.resume_session(), Some(envelope));
    }

    #[test]
    fn test_start_session_can_keep_selection() {
        let (session, _) = session();
        let prizes = seed_prizes(&session);
        let envelope = session
            .start_session(StartOptions { reset_prizes: false })
            .unwrap();
        assert_eq!(envelope.prizes, prizes);
        assert!(session.has_stored_prize_selection());
    }

    #[test]
    fn test_start_session_keeps_stored_bgm() {
        let (session, _) = session();
        let bgm = session.load_bgm().with_volume(0.2, Utc::now()).with_enabled(false, Utc::now());
        session.save_bgm(&bgm).unwrap();
        let envelope = session.start_session(StartOptions::default()).unwrap();
        assert_eq!(envelope.bgm, bgm);
    }

    #[test]
    fn test_start_session_discards_history() {
        let (session, _) = session();
        session.start_session(StartOptions::default()).unwrap();
        session.draw_and_persist(DrawOptions::seeded(3.0)).unwrap();
        assert!(session.has_stored_draw_history());

        session.start_session(StartOptions::default()).unwrap();
        assert!(!session.has_stored_draw_history());
        assert!(session.has_stored_game_state());
    }

    #[test]
    fn test_resume_without_game_state() {
        let (session, medium) = session();
        seed_prizes(&session);
        assert_eq!(session.resume_session(), None);
        // Prizes alone don't make a session, and resume wrote nothing
        assert_eq!(medium.len(), 1);
    }

    #[test]
    fn test_resume_is_read_only_and_exact() {
        let (session, medium) = session();
        seed_prizes(&session);
        let started = session
            .start_session(StartOptions { reset_prizes: false })
            .unwrap();
        let drawn = session.draw_and_persist(DrawOptions::seeded(10.0)).unwrap();

        let before = snapshot(&medium);
        let resumed = session.resume_session().unwrap();
        assert_eq!(snapshot(&medium), before);

        assert_eq!(resumed.game_state, drawn);
        assert_eq!(resumed.prizes, started.prizes);
        assert_eq!(resumed.bgm, started.bgm);
    }

    #[test]
    fn test_resume_with_corrupted_game_state() {
        let (session, medium) = session();
        medium.set_item("bingo:v1:game-state", "{{{").unwrap();
        assert_eq!(session.resume_session(), None);
        assert!(!session.has_stored_game_state());
    }

    #[test]
    fn test_resume_synthesizes_default_bgm() {
        let (session, _) = session();
        session.save_game_state(&GameState::new(Utc::now())).unwrap();
        let resumed = session.resume_session().unwrap();
        assert!(resumed.bgm.enabled);
        assert!(resumed.prizes.is_empty());
    }

    #[test]
    fn test_persist_is_not_atomic() {
        let medium = MemoryStorage::with_quota(600);
        let store = VersionedStore::new(medium.clone(), "bingo:v1:");
        let session = SessionLifecycle::new(store, EngineConfig::default());

        let text = format!("{HEADER}\np-1,0,A,B,,false,");
        let mut prizes = crate::prizes::csv::parse(&text).unwrap().prizes;
        prizes[0].memo = Some("x".repeat(1000));
        let envelope = GameStateEnvelope {
            game_state: GameState::new(Utc::now()),
            prizes,
            bgm: BgmPreference::default_at(Utc::now()),
        };

        let err = session.persist_session_state(&envelope).unwrap_err();
        assert!(matches!(err, SessionError::Storage(StorageError::Write { .. })));
        // Game state landed, prizes and BGM did not
        assert!(session.has_stored_game_state());
        assert!(medium.get_item("bingo:v1:prizes").is_none());
        assert!(medium.get_item("bingo:v1:bgm").is_none());
    }

    #[test]
    fn test_draw_and_persist_never_repeats() {
        let (session, _) = session();
        session.start_session(StartOptions::default()).unwrap();
        for _ in 0..75 {
            session.draw_and_persist(DrawOptions::default()).unwrap();
        }
        let state = session.load_game_state().unwrap();
        let mut numbers: Vec<u8> = state.drawn_numbers().collect();
        numbers.sort_unstable();
        numbers.dedup();
        assert_eq!(numbers.len(), 75);

        let err = session.draw_and_persist(DrawOptions::default()).unwrap_err();
        assert!(matches!(err, SessionError::Draw(DrawError::NoAvailableNumbers)));
        // Failed draw did not touch the stored state
        assert_eq!(session.load_game_state().unwrap(), state);
    }

    #[test]
    fn test_reset_game_keeps_prizes() {
        let (session, _) = session();
        seed_prizes(&session);
        let started = session
            .start_session(StartOptions { reset_prizes: false })
            .unwrap();
        session.draw_and_persist(DrawOptions::seeded(1.0)).unwrap();

        let reset = session.reset_game().unwrap();
        assert_eq!(reset.current_number, None);
        assert_eq!(reset.created_at, started.game_state.created_at);
        assert!(!session.has_stored_draw_history());
        assert_eq!(session.load_prizes(), started.prizes);
    }

    #[test]
    fn test_clear_all_leaves_foreign_keys() {
        let (session, medium) = session();
        medium.set_item("someone-else", "1").unwrap();
        session.start_session(StartOptions::default()).unwrap();
        assert_eq!(session.clear_all(), 3);
        assert_eq!(medium.keys(), vec!["someone-else".to_string()]);
        assert!(session.resume_session().is_none());
    }

    #[test]
    fn test_unavailable_store_still_starts() {
        let store = VersionedStore::unavailable("x:");
        let session = SessionLifecycle::new(store, EngineConfig::default());
        let envelope = session.start_session(StartOptions::default()).unwrap();
        assert!(envelope.prizes.is_empty());
        assert!(session.resume_session().is_none());
        assert!(!session.has_stored_game_state());
    }
}
