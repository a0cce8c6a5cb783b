//! Simulation events for the presentation shell
//!
//! The round pushes events as they happen; the shell drains them once per frame to
//! spawn particles or play sounds. The simulation never touches effects directly.

use serde::{Deserialize, Serialize};

use crate::consts::GOOD_LOCK_SCORE;
use crate::input::Hand;
use crate::players::PlayerId;

/// Who an event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Participant {
    Player(PlayerId),
    SoloHand(Hand),
}

/// Something the shell may want to show
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// A delayed or reversing lock was triggered and is counting down
    LockPending { participant: Participant, position: f32 },
    /// A marker locked with a good score; intensity 1.0 for perfect
    Locked {
        participant: Participant,
        position: f32,
        intensity: f32,
    },
    /// A marker locked outside the good range
    Missed { participant: Participant, position: f32 },
}

impl SimEvent {
    /// Classify a player-initiated lock by its score
    pub fn for_lock(participant: Participant, position: f32, score: u32) -> Self {
        if score >= 100 {
            SimEvent::Locked {
                participant,
                position,
                intensity: 1.0,
            }
        } else if score >= GOOD_LOCK_SCORE {
            SimEvent::Locked {
                participant,
                position,
                intensity: 0.6,
            }
        } else {
            SimEvent::Missed {
                participant,
                position,
            }
        }
    }

    pub fn participant(&self) -> Participant {
        match *self {
            SimEvent::LockPending { participant, .. }
            | SimEvent::Locked { participant, .. }
            | SimEvent::Missed { participant, .. } => participant,
        }
    }
}
