//! Number selection
//!
//! Pure functions over a `GameState` snapshot: the input is never modified,
//! each draw returns a new state with one more history entry.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rand::Rng;
use rand_pcg::Pcg32;
use thiserror::Error;

use super::state::{DrawHistoryEntry, GameState};
use crate::consts::{MAX_NUMBER, MIN_NUMBER};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    /// Every number in the domain has been drawn
    #[error("no available numbers left to draw")]
    NoAvailableNumbers,
}

/// Source of uniform values in `[0, 1)`
pub trait UniformSource {
    fn next_uniform(&mut self) -> f64;
}

impl UniformSource for rand::rngs::ThreadRng {
    fn next_uniform(&mut self) -> f64 {
        self.random::<f64>()
    }
}

impl UniformSource for Pcg32 {
    fn next_uniform(&mut self) -> f64 {
        self.random::<f64>()
    }
}

/// Always yields the same value. Used to pin selection in tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedUniform(pub f64);

impl UniformSource for FixedUniform {
    fn next_uniform(&mut self) -> f64 {
        self.0
    }
}

/// Per-draw options
#[derive(Debug, Clone, Copy, Default)]
pub struct DrawOptions {
    /// Deterministic selection: `abs(trunc(seed)) mod available`. Ignored
    /// when not finite.
    pub seed: Option<f64>,
    /// Timestamp for the entry; wall clock when `None`
    pub timestamp: Option<DateTime<Utc>>,
}

impl DrawOptions {
    pub fn seeded(seed: f64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Closed range of drawable numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawDomain {
    pub min: u8,
    pub max: u8,
}

impl Default for DrawDomain {
    fn default() -> Self {
        Self {
            min: MIN_NUMBER,
            max: MAX_NUMBER,
        }
    }
}

impl DrawDomain {
    pub fn new(min: u8, max: u8) -> Self {
        Self { min, max }
    }

    pub fn size(&self) -> usize {
        if self.max < self.min {
            0
        } else {
            (self.max - self.min) as usize + 1
        }
    }

    /// Undrawn numbers, ascending
    pub fn available(&self, history: &[DrawHistoryEntry]) -> Vec<u8> {
        let drawn: HashSet<u8> = history.iter().map(|e| e.number).collect();
        (self.min..=self.max).filter(|n| !drawn.contains(n)).collect()
    }

    /// How many numbers can still be drawn
    pub fn remaining(&self, state: &GameState) -> usize {
        self.available(&state.draw_history).len()
    }

    /// Every number in the domain has been drawn
    pub fn is_complete(&self, state: &GameState) -> bool {
        self.remaining(state) == 0
    }

    /// Draw with an explicit uniform source for the unseeded path
    pub fn draw_next_with<S: UniformSource + ?Sized>(
        &self,
        state: &GameState,
        options: DrawOptions,
        source: &mut S,
    ) -> Result<GameState, DrawError> {
        let available = self.available(&state.draw_history);
        if available.is_empty() {
            return Err(DrawError::NoAvailableNumbers);
        }

        let timestamp = options.timestamp.unwrap_or_else(Utc::now);
        let index = match options.seed.filter(|s| s.is_finite()) {
            Some(seed) => seeded_index(seed, available.len()),
            None => uniform_index(source.next_uniform(), available.len()),
        };
        let number = available[index];

        let mut draw_history = Vec::with_capacity(state.draw_history.len() + 1);
        draw_history.extend_from_slice(&state.draw_history);
        draw_history.push(DrawHistoryEntry {
            number,
            sequence: state.draw_history.len() as u32 + 1,
            drawn_at: timestamp,
        });

        log::debug!(
            "Drew {number} (#{}, {} left)",
            draw_history.len(),
            available.len() - 1
        );

        Ok(GameState {
            current_number: Some(number),
            draw_history,
            is_drawing: false,
            updated_at: timestamp,
            ..state.clone()
        })
    }

    /// Draw using the thread RNG for the unseeded path
    pub fn draw_next(
        &self,
        state: &GameState,
        options: DrawOptions,
    ) -> Result<GameState, DrawError> {
        self.draw_next_with(state, options, &mut rand::rng())
    }
}

fn seeded_index(seed: f64, len: usize) -> usize {
    (seed.trunc().abs() % len as f64) as usize
}

fn uniform_index(r: f64, len: usize) -> usize {
    ((r * len as f64).floor() as usize).min(len - 1)
}

/// Undrawn numbers in the standard 1..=75 domain, ascending
pub fn available_numbers(history: &[DrawHistoryEntry]) -> Vec<u8> {
    DrawDomain::default().available(history)
}

/// Draw the next number in the standard domain
pub fn draw_next(state: &GameState, options: DrawOptions) -> Result<GameState, DrawError> {
    DrawDomain::default().draw_next(state, options)
}

/// Draw the next number in the standard domain with an explicit source
pub fn draw_next_with<S: UniformSource + ?Sized>(
    state: &GameState,
    options: DrawOptions,
    source: &mut S,
) -> Result<GameState, DrawError> {
    DrawDomain::default().draw_next_with(state, options, source)
}
