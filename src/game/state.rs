//! Game state and draw history
//!
//! Everything that must survive a reload for Continue lives here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded draw
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawHistoryEntry {
    pub number: u8,
    /// 1-based position in the history
    pub sequence: u32,
    pub drawn_at: DateTime<Utc>,
}

/// Complete caller state (serializable, immutable between draws)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Last drawn number, `None` before the first draw
    pub current_number: Option<u8>,
    /// Past draws, oldest first, no repeated numbers
    pub draw_history: Vec<DrawHistoryEntry>,
    /// Set while the UI animates a draw
    pub is_drawing: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GameState {
    /// Fresh game with no draws
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            current_number: None,
            draw_history: Vec::new(),
            is_drawing: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Numbers drawn so far, in draw order
    pub fn drawn_numbers(&self) -> impl Iterator<Item = u8> + '_ {
        self.draw_history.iter().map(|e| e.number)
    }

    pub fn has_history(&self) -> bool {
        !self.draw_history.is_empty()
    }

    /// Copy with `is_drawing` raised
    pub fn begin_drawing(&self, now: DateTime<Utc>) -> Self {
        Self {
            is_drawing: true,
            updated_at: now,
            ..self.clone()
        }
    }

    /// Copy with history cleared; `created_at` is kept
    pub fn reset(&self, now: DateTime<Utc>) -> Self {
        Self {
            current_number: None,
            draw_history: Vec::new(),
            is_drawing: false,
            created_at: self.created_at,
            updated_at: now,
        }
    }
}
