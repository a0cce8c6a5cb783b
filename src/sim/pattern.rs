//! Pattern library
//!
//! A pattern is an immutable round template. The session picks one per round and
//! works on a difficulty-scaled copy.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// How markers start moving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Start moving toward 0
    Left,
    /// Start moving toward 1
    Right,
    /// Start direction alternates per player and flips periodically
    Oscillate,
}

/// The interaction pattern for a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatternKind {
    /// Classic sweep across the track
    Sweep,
    /// Marker bounces back and forth
    Oscillate,
    /// Target zone shrinks over time
    Shrink,
    /// Target blinks on and off
    Pulse,
    /// Target hidden for the first seconds
    DelayedReveal,
    /// Three scoring zones of different value
    MultiZone,
}

/// Optional modifier on lock timing or marker visibility
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Twist {
    /// Lock lands `delay` seconds after the press; marker keeps moving meanwhile
    DelayedLock { delay: f32 },
    /// Marker only visible within `reveal_distance` of the target
    InvisibleMarker { reveal_distance: f32 },
    /// Press reverses the marker, then it locks shortly after
    ReverseOnLock,
}

impl Twist {
    /// Player-facing hint with the exact timing
    pub fn hint(&self) -> String {
        match self {
            Twist::DelayedLock { delay } => {
                format!("LOCK DELAY: {}ms - press early!", (delay * 1000.0).round() as u32)
            }
            Twist::InvisibleMarker { .. } => "GHOST MARKER: visible only near the target".into(),
            Twist::ReverseOnLock => "REVERSE: direction flips when you press".into(),
        }
    }
}

/// A named round configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub name: String,
    /// Base marker speed (track widths per second)
    pub speed: f32,
    pub direction: Direction,
    /// Offset of the target from the track center
    pub target_offset: f32,
    /// Width of the perfect zone (fraction of the track)
    pub perfect_width: f32,
    pub kind: PatternKind,
    pub twist: Option<Twist>,
    pub description: String,
}

impl Pattern {
    fn new(
        name: &str,
        speed: f32,
        direction: Direction,
        target_offset: f32,
        perfect_width: f32,
        kind: PatternKind,
        description: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            speed,
            direction,
            target_offset,
            perfect_width,
            kind,
            twist: None,
            description: description.to_string(),
        }
    }

    fn with_twist(mut self, twist: Twist) -> Self {
        self.twist = Some(twist);
        self
    }

    /// Working copy for a 0-based round: faster markers, narrower perfect zone
    pub fn scaled_for_round(&self, round: u32) -> Self {
        let difficulty = 1.0 + round as f32 * DIFFICULTY_STEP;
        Self {
            speed: self.speed * difficulty,
            perfect_width: self.perfect_width / difficulty.sqrt(),
            ..self.clone()
        }
    }

    /// Target position on the track, clamped away from the edges
    pub fn target_position(&self) -> f32 {
        (0.5 + self.target_offset).clamp(TARGET_MIN, TARGET_MAX)
    }

    /// Short headline shown above the tracks
    pub fn headline(&self) -> String {
        match self.kind {
            PatternKind::Shrink => "TARGET SHRINKING".into(),
            PatternKind::Pulse => "PULSING TARGET".into(),
            PatternKind::DelayedReveal => "HIDDEN TARGET".into(),
            PatternKind::MultiZone => "MULTIPLE TARGETS".into(),
            PatternKind::Oscillate => "BOUNCING MARKER".into(),
            PatternKind::Sweep => {
                let target = self.target_position();
                let side = if target < 0.4 {
                    "LEFT"
                } else if target > 0.6 {
                    "RIGHT"
                } else {
                    "CENTER"
                };
                format!("HIT THE {side}")
            }
        }
    }
}

/// The fixed, ordered pattern catalog
pub fn pattern_library() -> Vec<Pattern> {
    use Direction::{Left, Right};
    use PatternKind::{DelayedReveal, MultiZone, Pulse, Shrink, Sweep};
    const BOUNCE: Direction = Direction::Oscillate;

    vec![
        // Sweeps
        Pattern::new("🎯 Classic Center", 0.7, Right, 0.0, 0.04, Sweep, "Hit the center target!"),
        Pattern::new("⬅️ Left Target", 0.75, Right, -0.25, 0.04, Sweep, "Target is on the LEFT side!"),
        Pattern::new("➡️ Right Target", 0.75, Left, 0.25, 0.04, Sweep, "Target is on the RIGHT side!"),
        Pattern::new("🐢 Slow & Steady", 0.45, Right, 0.0, 0.03, Sweep, "Slow marker, tiny target zone!"),
        Pattern::new("⚡ Speed Run", 1.2, Right, 0.0, 0.06, Sweep, "Fast marker - react quickly!"),
        // Bouncing
        Pattern::new("🔄 Bounce Mode", 0.65, BOUNCE, 0.0, 0.045, PatternKind::Oscillate, "Marker bounces back and forth!"),
        Pattern::new("🏓 Ping Pong", 0.9, BOUNCE, 0.15, 0.04, PatternKind::Oscillate, "Fast bouncing, offset target!"),
        // Shrinking target (wide start)
        Pattern::new("📉 Shrinking Zone", 0.6, Right, 0.0, 0.08, Shrink, "Target shrinks over time - lock early!"),
        Pattern::new("💫 Vanishing Point", 0.55, BOUNCE, 0.0, 0.1, Shrink, "Target shrinks fast! Don't wait too long!"),
        // Pulsing target
        Pattern::new("💓 Pulse Beat", 0.65, Right, 0.0, 0.05, Pulse, "Target appears and disappears rhythmically!"),
        Pattern::new("👁️ Blink Zone", 0.8, BOUNCE, -0.1, 0.045, Pulse, "Fast blink - time your lock carefully!"),
        // Hidden target
        Pattern::new("❓ Mystery Target", 0.5, Right, 0.0, 0.05, DelayedReveal, "Target position revealed after 2.5 seconds!"),
        Pattern::new("🔮 Late Reveal", 0.6, BOUNCE, 0.2, 0.045, DelayedReveal, "Where will the target appear?"),
        // Several zones
        Pattern::new("🎪 Triple Threat", 0.55, Right, 0.0, 0.035, MultiZone, "Three targets - center is worth most!"),
        Pattern::new("🎰 Pick Your Zone", 0.7, BOUNCE, 0.0, 0.04, MultiZone, "Multiple scoring zones available!"),
        // Twists
        Pattern::new("⏰ Delayed Lock (200ms)", 0.65, Right, 0.0, 0.055, Sweep, "Press EARLY! Lock takes 200ms to activate.")
            .with_twist(Twist::DelayedLock { delay: 0.2 }),
        Pattern::new("⏱️ Long Delay (350ms)", 0.55, BOUNCE, 0.1, 0.06, Sweep, "Press VERY EARLY! 350ms delay before lock.")
            .with_twist(Twist::DelayedLock { delay: 0.35 }),
        Pattern::new("👻 Ghost Marker", 0.6, Right, 0.0, 0.055, Sweep, "Marker is hidden until close to target!")
            .with_twist(Twist::InvisibleMarker { reveal_distance: 0.15 }),
        Pattern::new("🔀 Reverse Lock", 0.65, Right, 0.0, 0.055, Sweep, "Marker reverses direction when you press!")
            .with_twist(Twist::ReverseOnLock),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_library_covers_every_kind() {
        let library = pattern_library();
        assert!(library.len() >= 18);

        let kinds: HashSet<_> = library.iter().map(|p| format!("{:?}", p.kind)).collect();
        assert_eq!(kinds.len(), 6);

        let twisted = library.iter().filter(|p| p.twist.is_some()).count();
        assert!(twisted >= 3);
    }

    #[test]
    fn test_library_names_unique() {
        let library = pattern_library();
        let names: HashSet<_> = library.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names.len(), library.len());
    }

    #[test]
    fn test_library_is_restartable() {
        assert_eq!(pattern_library(), pattern_library());
    }

    #[test]
    fn test_round_scaling() {
        let classic = &pattern_library()[0];

        let round0 = classic.scaled_for_round(0);
        assert_eq!(round0.speed, classic.speed);
        assert_eq!(round0.perfect_width, classic.perfect_width);

        let round5 = classic.scaled_for_round(5);
        assert!((round5.speed - 0.7 * 1.4).abs() < 1e-5);
        assert!((round5.perfect_width - 0.04 / 1.4f32.sqrt()).abs() < 1e-6);
        assert_eq!(round5.name, classic.name);
    }

    #[test]
    fn test_target_clamped() {
        let mut pattern = pattern_library()[0].clone();
        pattern.target_offset = 0.45;
        assert_eq!(pattern.target_position(), TARGET_MAX);
        pattern.target_offset = -0.45;
        assert_eq!(pattern.target_position(), TARGET_MIN);
    }

    #[test]
    fn test_headline_and_twist_hint() {
        let library = pattern_library();
        let left = library.iter().find(|p| p.name.contains("Left Target")).unwrap();
        assert_eq!(left.headline(), "HIT THE LEFT");

        let delayed = library.iter().find(|p| p.name.contains("200ms")).unwrap();
        assert!(delayed.twist.unwrap().hint().contains("200ms"));
    }
}
