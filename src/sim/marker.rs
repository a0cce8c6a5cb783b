//! Marker entities and the lock state machine
//!
//! `Moving -> Locking -> Locked`, or `Moving -> Locked` directly without a timing
//! twist. `Locked` is terminal for the round and owns the immutable lock position.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::pattern::Twist;
use super::pattern_state::PatternState;
use crate::consts::*;

/// Lock progress of a marker
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LockState {
    Moving,
    /// Lock triggered, lands when `remaining` runs out; the marker keeps moving
    Locking {
        remaining: f32,
        duration: f32,
        press_position: f32,
    },
    Locked { position: f32 },
}

/// What a button press did to a marker
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PressOutcome {
    /// Marker was already locking or locked
    Ignored,
    /// Lock countdown started at this position
    Pending(f32),
    /// Locked immediately at this position
    Locked(f32),
}

/// Party-mode motion inputs shared by every marker in a tick
#[derive(Debug, Clone, Copy)]
pub struct Motion<'a> {
    pub field: &'a PatternState,
    /// Scaled pattern speed (bounce re-rolls start from this)
    pub pattern_speed: f32,
    pub oscillating: bool,
    pub twist: Option<Twist>,
    /// Round clock after this step
    pub game_time: f32,
}

/// One moving indicator on a track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Marker {
    /// Position on the track, 0 = left edge, 1 = right edge
    pub position: f32,
    /// Speed applied on the last step (after zone and wobble multipliers)
    pub speed: f32,
    pub base_speed: f32,
    /// +1 toward 1, -1 toward 0
    pub direction: f32,
    pub state: LockState,
    pub assist_level: u8,
    /// Forced lock when the round timer ran out
    pub auto_locked: bool,
    /// Cleared by the invisible-marker twist while far from the target
    pub visible: bool,
    pub in_boost_zone: bool,
    pub oscillate_phase: f32,
    /// Presentation: expanding ring after a lock
    pub impact_ring: f32,
    /// Presentation: seconds since the lock landed
    pub time_since_lock: f32,
}

impl Marker {
    pub fn new(position: f32, base_speed: f32, direction: f32) -> Self {
        Self {
            position,
            speed: base_speed,
            base_speed,
            direction,
            state: LockState::Moving,
            assist_level: 0,
            auto_locked: false,
            visible: true,
            in_boost_zone: false,
            oscillate_phase: 0.0,
            impact_ring: 0.0,
            time_since_lock: 0.0,
        }
    }

    pub fn is_locked(&self) -> bool {
        matches!(self.state, LockState::Locked { .. })
    }

    pub fn is_locking(&self) -> bool {
        matches!(self.state, LockState::Locking { .. })
    }

    pub fn lock_position(&self) -> Option<f32> {
        match self.state {
            LockState::Locked { position } => Some(position),
            _ => None,
        }
    }

    /// Seconds left on a pending lock
    pub fn lock_countdown(&self) -> Option<f32> {
        match self.state {
            LockState::Locking { remaining, .. } => Some(remaining.max(0.0)),
            _ => None,
        }
    }

    /// Position to score: the lock position, or the live position while unlocked
    pub fn scoring_position(&self) -> f32 {
        self.lock_position().unwrap_or(self.position)
    }

    fn lock_here(&mut self) -> f32 {
        let position = self.position;
        self.state = LockState::Locked { position };
        self.time_since_lock = 0.0;
        self.impact_ring = 1.0;
        position
    }

    /// Apply a press under the round's twist
    pub fn press(&mut self, twist: Option<Twist>) -> PressOutcome {
        if self.state != LockState::Moving {
            return PressOutcome::Ignored;
        }

        let delay = match twist {
            Some(Twist::DelayedLock { delay }) => delay,
            Some(Twist::ReverseOnLock) => {
                self.direction = -self.direction;
                REVERSE_LOCK_DELAY
            }
            Some(Twist::InvisibleMarker { .. }) | None => {
                return PressOutcome::Locked(self.lock_here());
            }
        };

        self.state = LockState::Locking {
            remaining: delay,
            duration: delay,
            press_position: self.position,
        };
        PressOutcome::Pending(self.position)
    }

    /// Timer expiry: lock wherever the marker is. Returns false if already locked.
    pub fn force_lock(&mut self) -> bool {
        if self.is_locked() {
            return false;
        }
        self.lock_here();
        self.auto_locked = true;
        true
    }

    /// Count down a pending lock, or run the lock animation.
    ///
    /// Returns the lock position when a pending lock lands on this step, and whether
    /// the marker should still move.
    fn settle(&mut self, dt: f32) -> (Option<f32>, bool) {
        match self.state {
            LockState::Moving => (None, true),
            LockState::Locking {
                remaining,
                duration,
                press_position,
            } => {
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    return (Some(self.lock_here()), false);
                }
                self.state = LockState::Locking {
                    remaining,
                    duration,
                    press_position,
                };
                (None, true)
            }
            LockState::Locked { .. } => {
                self.time_since_lock += dt;
                self.impact_ring = (self.impact_ring + dt * IMPACT_RING_GROWTH).min(IMPACT_RING_MAX);
                (None, false)
            }
        }
    }

    /// Party-mode step. `slot` is the marker's index in the roster.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        motion: &Motion<'_>,
        slot: usize,
        dt: f32,
        rng: &mut R,
    ) -> Option<f32> {
        let (landed, moving) = self.settle(dt);
        if !moving {
            return landed;
        }

        let field = motion.field;

        if let Some(Twist::InvisibleMarker { reveal_distance }) = motion.twist {
            self.visible = (self.position - field.target).abs() <= reveal_distance;
        }

        if motion.oscillating {
            self.oscillate_phase += dt * OSCILLATE_RATE;
            let s = self.oscillate_phase.sin();
            if s > OSCILLATE_FLIP && self.direction > 0.0 {
                self.direction = -1.0;
            } else if s < -OSCILLATE_FLIP && self.direction < 0.0 {
                self.direction = 1.0;
            }
        }

        self.in_boost_zone = field.in_boost_zone(self.position);
        let multiplier = field.speed_multiplier(self.position);
        let wobble =
            1.0 + (motion.game_time * WOBBLE_FREQ + slot as f32 * WOBBLE_SLOT_PHASE).sin() * WOBBLE_AMP;

        self.speed = self.base_speed * multiplier * wobble;
        self.position += self.speed * self.direction * dt;

        if self.bounce() {
            self.base_speed =
                motion.pattern_speed * rng.random_range(BOUNCE_SPEED_MIN..BOUNCE_SPEED_MAX);
        }

        None
    }

    /// Solo-hand step: no zones or twists, gentler wobble and bounce
    pub fn step_solo<R: Rng + ?Sized>(&mut self, game_time: f32, dt: f32, rng: &mut R) {
        let (_, moving) = self.settle(dt);
        if !moving {
            return;
        }

        let wobble = 1.0 + (game_time * SOLO_WOBBLE_FREQ).sin() * SOLO_WOBBLE_AMP;
        self.speed = self.base_speed * wobble;
        self.position += self.speed * self.direction * dt;

        if self.bounce() {
            self.base_speed *= rng.random_range(SOLO_BOUNCE_MIN..SOLO_BOUNCE_MAX);
        }
    }

    /// Clamp to the track, reversing at an edge. Returns true on a bounce.
    fn bounce(&mut self) -> bool {
        if self.position >= 1.0 {
            self.position = 1.0;
            self.direction = -1.0;
            true
        } else if self.position <= 0.0 {
            self.position = 0.0;
            self.direction = 1.0;
            true
        } else {
            false
        }
    }
}
