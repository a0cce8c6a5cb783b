//! Read-only render snapshot
//!
//! Owned copies of everything the shell draws. Hidden assist levels are not exposed.

use serde::{Deserialize, Serialize};

use super::events::Participant;
use super::marker::{LockState, Marker};
use super::pattern::PatternKind;
use super::pattern_state::SpeedZone;
use super::scoring::ScoreZone;

/// Coarse lock phase for drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockPhase {
    Moving,
    Locking,
    Locked,
}

/// One marker as the shell sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerView {
    pub participant: Participant,
    pub position: f32,
    pub phase: LockPhase,
    pub lock_position: Option<f32>,
    /// Where the press happened while a delayed lock is pending
    pub press_position: Option<f32>,
    /// Seconds until a pending lock lands
    pub lock_countdown: Option<f32>,
    /// 0..1 progress of a pending lock
    pub lock_progress: Option<f32>,
    /// Target this marker is scored against
    pub target: f32,
    pub visible: bool,
    pub in_boost_zone: bool,
    pub auto_locked: bool,
    pub impact_ring: f32,
    pub time_since_lock: f32,
}

impl MarkerView {
    pub fn new(participant: Participant, marker: &Marker, target: f32) -> Self {
        let (phase, press_position, lock_progress) = match marker.state {
            LockState::Moving => (LockPhase::Moving, None, None),
            LockState::Locking {
                remaining,
                duration,
                press_position,
            } => {
                let progress = if duration > 0.0 {
                    (1.0 - remaining / duration).clamp(0.0, 1.0)
                } else {
                    1.0
                };
                (LockPhase::Locking, Some(press_position), Some(progress))
            }
            LockState::Locked { .. } => (LockPhase::Locked, None, None),
        };

        Self {
            participant,
            position: marker.position,
            phase,
            lock_position: marker.lock_position(),
            press_position,
            lock_countdown: marker.lock_countdown(),
            lock_progress,
            target,
            visible: marker.visible,
            in_boost_zone: marker.in_boost_zone,
            auto_locked: marker.auto_locked,
            impact_ring: marker.impact_ring,
            time_since_lock: marker.time_since_lock,
        }
    }
}

/// Everything needed to draw one frame of a round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub pattern_name: String,
    pub headline: String,
    pub description: String,
    pub twist_hint: Option<String>,
    pub kind: PatternKind,
    pub solo: bool,
    /// Shared target (party rounds)
    pub target: f32,
    pub target_visible: bool,
    pub perfect_width: f32,
    pub good_width: f32,
    pub boost_zones: Vec<SpeedZone>,
    pub slow_zones: Vec<SpeedZone>,
    pub score_zones: Vec<ScoreZone>,
    pub game_time: f32,
    /// 0 = normal, 1 = hurry, 2 = critical
    pub urgency: u8,
    pub markers: Vec<MarkerView>,
}
