//! Player roster and per-player match state
//!
//! Assist levels are hidden from players. They rise after repeated low rounds and
//! fall after strong ones, and only the session mutates them between rounds.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Stable player identifier (0-based slot in the join order)
pub type PlayerId = u8;

/// Session-stable player identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub id: PlayerId,
    pub name: String,
}

impl PlayerConfig {
    /// Default-named player ("Player 1" for id 0)
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            name: format!("Player {}", id as u32 + 1),
        }
    }

    pub fn named(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A player's standing within one match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub config: PlayerConfig,
    pub round_score: u32,
    pub total_score: u32,
    /// Rounds under the low-score threshold, decays on decent rounds
    pub consecutive_low_scores: u32,
    /// 0 = no help, up to `MAX_ASSIST`
    pub assist_level: u8,
}

impl PlayerState {
    pub fn new(config: PlayerConfig) -> Self {
        Self {
            config,
            round_score: 0,
            total_score: 0,
            consecutive_low_scores: 0,
            assist_level: 0,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.config.id
    }

    /// Bank a round score and apply the assist rubber-band
    pub fn record_round(&mut self, score: u32) {
        self.round_score = score;
        self.total_score += score;

        if score < LOW_SCORE {
            self.consecutive_low_scores += 1;
            if self.consecutive_low_scores >= LOW_ROUNDS_FOR_ASSIST {
                self.assist_level = (self.assist_level + 1).min(MAX_ASSIST);
            }
        } else if score >= HIGH_SCORE {
            self.assist_level = self.assist_level.saturating_sub(1);
            self.consecutive_low_scores = 0;
        } else {
            self.consecutive_low_scores = self.consecutive_low_scores.saturating_sub(1);
        }
    }

    /// Clear scores and assist for a new match
    pub fn reset(&mut self) {
        *self = Self::new(self.config.clone());
    }
}

/// Per-hand accuracy for solo training
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoloStats {
    pub left_hits: u32,
    pub right_hits: u32,
    /// Running mean of left-hand scores
    pub left_accuracy: f32,
    pub right_accuracy: f32,
    pub rounds_completed: u32,
}

impl SoloStats {
    /// Fold one round's hand scores in; `None` means that hand never locked
    pub fn record(&mut self, left: Option<u32>, right: Option<u32>) {
        if let Some(score) = left {
            self.left_hits += 1;
            self.left_accuracy = running_mean(self.left_accuracy, self.left_hits, score);
        }
        if let Some(score) = right {
            self.right_hits += 1;
            self.right_accuracy = running_mean(self.right_accuracy, self.right_hits, score);
        }
        self.rounds_completed += 1;
    }
}

fn running_mean(mean: f32, count: u32, sample: u32) -> f32 {
    (mean * (count - 1) as f32 + sample as f32) / count as f32
}
