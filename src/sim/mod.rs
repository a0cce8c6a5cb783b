//! Round simulation
//!
//! All gameplay logic for a single round lives here:
//! - Seeded RNG only (one `Pcg32` per round)
//! - Stable iteration order (roster order)
//! - No rendering, particles or platform dependencies

pub mod events;
pub mod marker;
pub mod pattern;
pub mod pattern_state;
pub mod round;
pub mod scoring;
pub mod snapshot;

pub use events::{Participant, SimEvent};
pub use marker::{LockState, Marker, Motion, PressOutcome};
pub use pattern::{Direction, Pattern, PatternKind, Twist, pattern_library};
pub use pattern_state::{KindState, PatternState, SpeedZone};
pub use round::{HandScores, HandTrack, Round};
pub use scoring::{ScoreZone, score, score_multi_zone, score_with_assist, solo_average};
pub use snapshot::{LockPhase, MarkerView, RoundSnapshot};
