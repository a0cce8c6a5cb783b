//! Per-round pattern instance state
//!
//! Holds the live target geometry for a round and advances the per-kind timers
//! (shrinking zones, pulse visibility, delayed reveal). Visibility flags only gate
//! what the shell draws; scoring always uses the true target.

use serde::{Deserialize, Serialize};

use super::pattern::{Pattern, PatternKind};
use super::scoring::{self, ScoreZone};
use crate::consts::*;

/// A position range that changes marker speed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedZone {
    pub start: f32,
    pub end: f32,
}

impl SpeedZone {
    pub fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }

    /// Inclusive on both ends
    #[inline]
    pub fn contains(&self, position: f32) -> bool {
        position >= self.start && position <= self.end
    }
}

/// Extra state carried by each pattern kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum KindState {
    /// Sweep and oscillate: nothing beyond marker motion
    Plain,
    Shrink {
        /// 0 at round start, 1 once fully shrunk
        progress: f32,
        base_perfect: f32,
        base_good: f32,
    },
    Pulse {
        timer: f32,
        visible: bool,
    },
    DelayedReveal {
        timer: f32,
        revealed: bool,
    },
    MultiZone {
        zones: Vec<ScoreZone>,
    },
}

/// Live geometry for the current round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternState {
    pub target: f32,
    pub perfect_width: f32,
    pub good_width: f32,
    pub boost_zones: Vec<SpeedZone>,
    pub slow_zones: Vec<SpeedZone>,
    pub kind: KindState,
}

impl PatternState {
    /// Build the instance state for a (difficulty-scaled) pattern
    pub fn new(pattern: &Pattern) -> Self {
        let target = pattern.target_position();
        let perfect_width = pattern.perfect_width;
        let good_width = perfect_width * GOOD_ZONE_FACTOR;

        let kind = match pattern.kind {
            PatternKind::Sweep | PatternKind::Oscillate => KindState::Plain,
            PatternKind::Shrink => KindState::Shrink {
                progress: 0.0,
                base_perfect: perfect_width,
                base_good: good_width,
            },
            PatternKind::Pulse => KindState::Pulse {
                timer: 0.0,
                visible: true,
            },
            PatternKind::DelayedReveal => KindState::DelayedReveal {
                timer: 0.0,
                revealed: false,
            },
            PatternKind::MultiZone => KindState::MultiZone {
                zones: vec![
                    ScoreZone { position: 0.25, width: perfect_width * 1.5, points: 70 },
                    ScoreZone { position: 0.5, width: perfect_width, points: 100 },
                    ScoreZone { position: 0.75, width: perfect_width * 1.5, points: 70 },
                ],
            },
        };

        let (boost_zones, slow_zones) = if matches!(kind, KindState::MultiZone { .. }) {
            (Vec::new(), Vec::new())
        } else {
            speed_zones_for(target)
        };

        Self {
            target,
            perfect_width,
            good_width,
            boost_zones,
            slow_zones,
            kind,
        }
    }

    /// Advance per-kind timers. `game_time` is the round clock after this step.
    pub fn update(&mut self, game_time: f32, dt: f32) {
        match &mut self.kind {
            KindState::Plain | KindState::MultiZone { .. } => {}
            KindState::Shrink {
                progress,
                base_perfect,
                base_good,
            } => {
                *progress = (game_time / SHRINK_DURATION).min(1.0);
                let factor = 1.0 - *progress * SHRINK_AMOUNT;
                self.perfect_width = *base_perfect * factor;
                self.good_width = *base_good * factor;
            }
            KindState::Pulse { timer, visible } => {
                *timer += dt;
                *visible = *timer % (PULSE_ON + PULSE_OFF) < PULSE_ON;
            }
            KindState::DelayedReveal { timer, revealed } => {
                if !*revealed {
                    *timer += dt;
                    *revealed = *timer >= REVEAL_DELAY;
                }
            }
        }
    }

    /// Whether the shell should draw the target this frame
    pub fn target_visible(&self) -> bool {
        match self.kind {
            KindState::Pulse { visible, .. } => visible,
            KindState::DelayedReveal { revealed, .. } => revealed,
            _ => true,
        }
    }

    /// Scoring sub-zones (empty unless multi-zone)
    pub fn score_zones(&self) -> &[ScoreZone] {
        match &self.kind {
            KindState::MultiZone { zones } => zones,
            _ => &[],
        }
    }

    /// Speed multiplier at a track position; boost zones take precedence
    pub fn speed_multiplier(&self, position: f32) -> f32 {
        if self.boost_zones.iter().any(|z| z.contains(position)) {
            BOOST_MULTIPLIER
        } else if self.slow_zones.iter().any(|z| z.contains(position)) {
            SLOW_MULTIPLIER
        } else {
            1.0
        }
    }

    /// Whether a position lies in a boost zone
    pub fn in_boost_zone(&self, position: f32) -> bool {
        self.boost_zones.iter().any(|z| z.contains(position))
    }

    /// Score a locked party marker, widening zones by its assist level
    pub fn score(&self, position: f32, assist_level: u8) -> u32 {
        match &self.kind {
            KindState::MultiZone { zones } => scoring::score_multi_zone(position, zones),
            _ => scoring::score_with_assist(
                position,
                self.target,
                self.perfect_width,
                self.good_width,
                assist_level,
            ),
        }
    }

    /// Score against an explicit target with the current widths (solo hands)
    pub fn score_against(&self, position: f32, target: f32) -> u32 {
        scoring::score(position, target, self.perfect_width, self.good_width)
    }
}

/// Boost zones away from the target, slow zones on its approaches
fn speed_zones_for(target: f32) -> (Vec<SpeedZone>, Vec<SpeedZone>) {
    let mut boost = Vec::with_capacity(2);
    if target > 0.3 {
        boost.push(SpeedZone::new(0.05, 0.15));
    }
    if target < 0.7 {
        boost.push(SpeedZone::new(0.85, 0.95));
    }

    let mut slow = Vec::with_capacity(2);
    if target - SLOW_ZONE_OFFSET > 0.1 {
        let end = target - SLOW_ZONE_OFFSET;
        slow.push(SpeedZone::new(end - SLOW_ZONE_WIDTH, end));
    }
    if target + SLOW_ZONE_OFFSET < 0.9 {
        let start = target + SLOW_ZONE_OFFSET;
        slow.push(SpeedZone::new(start, start + SLOW_ZONE_WIDTH));
    }

    (boost, slow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::pattern::pattern_library;

    fn pattern_of(kind: PatternKind) -> Pattern {
        pattern_library()
            .into_iter()
            .find(|p| p.kind == kind)
            .expect("library has every kind")
    }

    fn run(state: &mut PatternState, seconds: f32, dt: f32) -> f32 {
        let mut t = 0.0;
        while t + dt <= seconds + 1e-4 {
            t += dt;
            state.update(t, dt);
        }
        t
    }

    #[test]
    fn test_speed_zones_center_target() {
        let state = PatternState::new(&pattern_of(PatternKind::Sweep));
        assert_eq!(state.target, 0.5);
        assert_eq!(state.boost_zones.len(), 2);
        assert_eq!(state.slow_zones.len(), 2);

        assert_eq!(state.speed_multiplier(0.1), BOOST_MULTIPLIER);
        assert_eq!(state.speed_multiplier(0.9), BOOST_MULTIPLIER);
        assert_eq!(state.speed_multiplier(0.3), SLOW_MULTIPLIER);
        assert_eq!(state.speed_multiplier(0.68), SLOW_MULTIPLIER);
        assert_eq!(state.speed_multiplier(0.5), 1.0);
    }

    #[test]
    fn test_boost_wins_over_slow() {
        let mut state = PatternState::new(&pattern_of(PatternKind::Sweep));
        state.slow_zones.push(SpeedZone::new(0.0, 0.2));
        assert_eq!(state.speed_multiplier(0.1), BOOST_MULTIPLIER);
    }

    #[test]
    fn test_speed_zones_left_target() {
        // target 0.25: no left boost zone, no left slow zone
        let (boost, slow) = speed_zones_for(0.25);
        assert_eq!(boost, vec![SpeedZone::new(0.85, 0.95)]);
        assert_eq!(slow.len(), 1);
        assert!((slow[0].start - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_multi_zone_has_no_speed_zones() {
        let state = PatternState::new(&pattern_of(PatternKind::MultiZone));
        assert!(state.boost_zones.is_empty());
        assert!(state.slow_zones.is_empty());
        assert_eq!(state.score_zones().len(), 3);
        assert_eq!(state.score(0.5, 0), 100);
        assert_eq!(state.score(0.25, 0), 70);
    }

    #[test]
    fn test_shrink_reaches_forty_percent_and_freezes() {
        let pattern = pattern_of(PatternKind::Shrink);
        let mut state = PatternState::new(&pattern);

        run(&mut state, 4.0, 0.05);
        assert!((state.perfect_width - pattern.perfect_width * 0.7).abs() < 1e-3);

        let mut state = PatternState::new(&pattern);
        let t = run(&mut state, 8.0, 0.05);
        assert!((state.perfect_width - pattern.perfect_width * 0.4).abs() < 1e-4);
        assert!((state.good_width - pattern.perfect_width * 3.0 * 0.4).abs() < 1e-4);

        state.update(t + 5.0, 5.0);
        assert!((state.perfect_width - pattern.perfect_width * 0.4).abs() < 1e-4);
    }

    #[test]
    fn test_pulse_cycle() {
        let mut state = PatternState::new(&pattern_of(PatternKind::Pulse));
        assert!(state.target_visible());

        state.update(1.0, 1.0);
        assert!(state.target_visible());
        state.update(1.7, 0.7);
        assert!(!state.target_visible());
        state.update(2.1, 0.4);
        assert!(state.target_visible());
    }

    #[test]
    fn test_pulse_hides_target_but_scores_it() {
        let mut state = PatternState::new(&pattern_of(PatternKind::Pulse));
        state.update(1.7, 1.7);
        assert!(!state.target_visible());
        assert_eq!(state.score(state.target, 0), 100);
        assert!(state.score(state.target + 0.3, 0) < 100);
    }

    #[test]
    fn test_delayed_reveal() {
        let mut state = PatternState::new(&pattern_of(PatternKind::DelayedReveal));
        assert!(!state.target_visible());

        run(&mut state, 2.0, 0.1);
        assert!(!state.target_visible());
        // Hidden target still scores against the true position
        assert_eq!(state.score(state.target, 0), 100);

        state.update(2.6, 0.6);
        assert!(state.target_visible());
    }
}
