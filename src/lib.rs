//! Timing Party - a local multiplayer "lock the marker in the zone" game
//!
//! Core modules:
//! - `sim`: Deterministic round simulation (patterns, markers, scoring)
//! - `session`: Round orchestration across a whole match (fail-soft assist, totals)
//! - `players`: Player roster and per-player match state
//! - `standings`: Ranking by total score
//! - `input`: Abstracted input events and edge detection
//! - `settings`: Match configuration
//!
//! Rendering, particles and raw device capture live in the host shell; the core only
//! consumes [`input::InputEvent`]s and exposes [`sim::RoundSnapshot`]s.

pub mod error;
pub mod input;
pub mod players;
pub mod session;
pub mod settings;
pub mod sim;
pub mod standings;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::MatchError;
pub use input::{ButtonEdges, Hand, InputEvent};
pub use players::{PlayerConfig, PlayerId, PlayerState, SoloStats};
pub use session::{MatchMode, MatchPhase, RoundSummary, Session};
pub use settings::MatchSettings;
pub use standings::Standings;

/// Gameplay tuning constants
pub mod consts {
    /// Largest frame delta the simulation accepts (tab stalls are clamped to this)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Maximum simultaneous players in party mode
    pub const MAX_PLAYERS: usize = 4;

    /// Target position is clamped to this range
    pub const TARGET_MIN: f32 = 0.2;
    pub const TARGET_MAX: f32 = 0.8;
    /// Good zone is this many perfect widths wide
    pub const GOOD_ZONE_FACTOR: f32 = 3.0;

    /// Per-round difficulty ramp (speed *= 1 + round * step)
    pub const DIFFICULTY_STEP: f32 = 0.08;

    /// Speed zone multipliers
    pub const BOOST_MULTIPLIER: f32 = 2.0;
    pub const SLOW_MULTIPLIER: f32 = 0.5;
    /// Slow zones sit this far either side of the target
    pub const SLOW_ZONE_OFFSET: f32 = 0.15;
    pub const SLOW_ZONE_WIDTH: f32 = 0.07;

    /// Speed wobble: 1 + sin(t * FREQ + slot * PHASE) * AMP
    pub const WOBBLE_FREQ: f32 = 4.0;
    pub const WOBBLE_SLOT_PHASE: f32 = 2.0;
    pub const WOBBLE_AMP: f32 = 0.2;

    /// Oscillating markers advance their phase at this rate (rad/s)
    pub const OSCILLATE_RATE: f32 = 2.0;
    /// sin(phase) threshold that flips an oscillating marker
    pub const OSCILLATE_FLIP: f32 = 0.95;

    /// Initial per-marker speed variation U(MIN, MAX)
    pub const SPAWN_SPEED_MIN: f32 = 0.9;
    pub const SPAWN_SPEED_MAX: f32 = 1.1;
    /// Speed re-roll on edge bounce U(MIN, MAX)
    pub const BOUNCE_SPEED_MIN: f32 = 0.85;
    pub const BOUNCE_SPEED_MAX: f32 = 1.3;

    /// Reverse-on-lock twist settles after this delay (seconds)
    pub const REVERSE_LOCK_DELAY: f32 = 0.15;

    /// Shrink pattern: duration and the fraction of width removed
    pub const SHRINK_DURATION: f32 = 8.0;
    pub const SHRINK_AMOUNT: f32 = 0.6;
    /// Pulse pattern on/off durations (seconds)
    pub const PULSE_ON: f32 = 1.5;
    pub const PULSE_OFF: f32 = 0.5;
    /// Delayed-reveal pattern hides the target for this long (seconds)
    pub const REVEAL_DELAY: f32 = 2.5;

    /// Assist: zone widening and speed reduction per level
    pub const MAX_ASSIST: u8 = 3;
    pub const ASSIST_WIDTH_BONUS: f32 = 0.07;
    pub const ASSIST_SPEED_PENALTY: f32 = 0.06;
    /// Assist rubber-band thresholds
    pub const LOW_SCORE: u32 = 50;
    pub const HIGH_SCORE: u32 = 80;
    pub const LOW_ROUNDS_FOR_ASSIST: u32 = 2;

    /// Scores at or above this count as a good lock
    pub const GOOD_LOCK_SCORE: u32 = 70;

    /// Solo mode: per-hand target range and gentler motion profile
    pub const SOLO_TARGET_MIN: f32 = 0.3;
    pub const SOLO_TARGET_MAX: f32 = 0.7;
    pub const SOLO_WOBBLE_FREQ: f32 = 3.0;
    pub const SOLO_WOBBLE_AMP: f32 = 0.15;
    pub const SOLO_BOUNCE_MIN: f32 = 0.9;
    pub const SOLO_BOUNCE_MAX: f32 = 1.1;

    /// Urgency thresholds on the round timer (seconds remaining)
    pub const URGENCY_HURRY: f32 = 5.0;
    pub const URGENCY_CRITICAL: f32 = 3.0;

    /// Lock impact ring animation
    pub const IMPACT_RING_GROWTH: f32 = 400.0;
    pub const IMPACT_RING_MAX: f32 = 80.0;
}
