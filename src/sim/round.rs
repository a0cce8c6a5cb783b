//! One round of the timing minigame
//!
//! A round owns its markers and pattern instance for its whole lifetime and is
//! dropped when the round ends. Inputs may arrive at any point between ticks; each
//! press applies at most one transition to one marker.

use std::collections::{BTreeMap, HashMap};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::events::{Participant, SimEvent};
use super::marker::{Marker, Motion, PressOutcome};
use super::pattern::{Direction, Pattern, Twist};
use super::pattern_state::PatternState;
use super::scoring;
use super::snapshot::{MarkerView, RoundSnapshot};
use crate::consts::*;
use crate::input::{Hand, InputEvent};
use crate::players::PlayerId;

/// A solo hand: its own marker and target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandTrack {
    pub marker: Marker,
    pub target: f32,
}

/// Per-hand scores of a solo round; `None` for a hand that never locked by itself
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandScores {
    pub left: Option<u32>,
    pub right: Option<u32>,
}

#[derive(Debug, Clone)]
enum Tracks {
    /// One marker per player, in roster order
    Party(Vec<(PlayerId, Marker)>),
    Solo { left: HandTrack, right: HandTrack },
}

/// Live state of a single round
#[derive(Debug, Clone)]
pub struct Round {
    pattern: Pattern,
    field: PatternState,
    tracks: Tracks,
    game_time: f32,
    urgency: u8,
    rng: Pcg32,
    events: Vec<SimEvent>,
}

impl Round {
    /// Start a party round. Players missing from `assist_levels` get no assist.
    pub fn party(
        players: &[PlayerId],
        pattern: Pattern,
        assist_levels: &HashMap<PlayerId, u8>,
        seed: u64,
    ) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);

        let markers = players
            .iter()
            .map(|&id| {
                let assist = assist_levels.get(&id).copied().unwrap_or(0).min(MAX_ASSIST);
                (id, spawn_party_marker(&pattern, id, assist, &mut rng))
            })
            .collect();

        log::debug!("Party round '{}' with {} markers", pattern.name, players.len());

        Self {
            field: PatternState::new(&pattern),
            pattern,
            tracks: Tracks::Party(markers),
            game_time: 0.0,
            urgency: 0,
            rng,
            events: Vec::new(),
        }
    }

    /// Start a solo training round: two hands, each with its own target
    pub fn solo(pattern: Pattern, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let left = spawn_hand(&pattern, 1.0, &mut rng);
        let right = spawn_hand(&pattern, -1.0, &mut rng);

        log::debug!(
            "Solo round '{}' targets left={:.2} right={:.2}",
            pattern.name,
            left.target,
            right.target
        );

        Self {
            field: PatternState::new(&pattern),
            pattern,
            tracks: Tracks::Solo { left, right },
            game_time: 0.0,
            urgency: 0,
            rng,
            events: Vec::new(),
        }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn field(&self) -> &PatternState {
        &self.field
    }

    pub fn game_time(&self) -> f32 {
        self.game_time
    }

    pub fn is_solo(&self) -> bool {
        matches!(self.tracks, Tracks::Solo { .. })
    }

    /// Current urgency from the last tick: 0 normal, 1 hurry, 2 critical
    pub fn urgency(&self) -> u8 {
        self.urgency
    }

    /// Marker for a party player
    pub fn marker(&self, player: PlayerId) -> Option<&Marker> {
        match &self.tracks {
            Tracks::Party(markers) => markers.iter().find(|(id, _)| *id == player).map(|(_, m)| m),
            Tracks::Solo { .. } => None,
        }
    }

    /// Track for a solo hand
    pub fn hand(&self, hand: Hand) -> Option<&HandTrack> {
        match &self.tracks {
            Tracks::Solo { left, right } => Some(match hand {
                Hand::Left => left,
                Hand::Right => right,
            }),
            Tracks::Party(_) => None,
        }
    }

    /// Advance one frame. `dt` is clamped to `MAX_FRAME_DT`.
    pub fn tick(&mut self, dt: f32, time_remaining: f32) {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        self.game_time += dt;
        self.urgency = urgency_for(time_remaining);
        self.field.update(self.game_time, dt);

        match &mut self.tracks {
            Tracks::Party(markers) => {
                let motion = Motion {
                    field: &self.field,
                    pattern_speed: self.pattern.speed,
                    oscillating: self.pattern.direction == Direction::Oscillate,
                    twist: self.pattern.twist,
                    game_time: self.game_time,
                };
                for (slot, (id, marker)) in markers.iter_mut().enumerate() {
                    if let Some(position) = marker.step(&motion, slot, dt, &mut self.rng) {
                        let score = self.field.score(position, marker.assist_level);
                        log::debug!("Player {} delayed lock landed at {:.3} ({})", id, position, score);
                        self.events
                            .push(SimEvent::for_lock(Participant::Player(*id), position, score));
                    }
                }
            }
            Tracks::Solo { left, right } => {
                left.marker.step_solo(self.game_time, dt, &mut self.rng);
                right.marker.step_solo(self.game_time, dt, &mut self.rng);
            }
        }
    }

    /// Apply one press. Unknown players, missing hands and already locking or locked
    /// markers are ignored.
    pub fn submit_input(&mut self, input: InputEvent) {
        match &mut self.tracks {
            Tracks::Party(markers) => {
                let Some((id, marker)) = markers.iter_mut().find(|(id, _)| *id == input.player)
                else {
                    log::debug!("Ignoring press from unknown player {}", input.player);
                    return;
                };
                let participant = Participant::Player(*id);
                match marker.press(self.pattern.twist) {
                    PressOutcome::Ignored => {}
                    PressOutcome::Pending(position) => {
                        self.events.push(SimEvent::LockPending {
                            participant,
                            position,
                        });
                    }
                    PressOutcome::Locked(position) => {
                        let score = self.field.score(position, marker.assist_level);
                        log::debug!("Player {} locked at {:.3} ({})", id, position, score);
                        self.events.push(SimEvent::for_lock(participant, position, score));
                    }
                }
            }
            Tracks::Solo { left, right } => {
                let Some(hand) = input.hand else {
                    log::debug!("Ignoring solo press without a hand");
                    return;
                };
                let track = match hand {
                    Hand::Left => left,
                    Hand::Right => right,
                };
                // Twists do not apply to solo hands
                if let PressOutcome::Locked(position) = track.marker.press(None) {
                    let score = self.field.score_against(position, track.target);
                    log::debug!("{} hand locked at {:.3} ({})", hand.as_str(), position, score);
                    self.events
                        .push(SimEvent::for_lock(Participant::SoloHand(hand), position, score));
                }
            }
        }
    }

    /// True once every marker (both hands in solo) is locked
    pub fn is_complete(&self) -> bool {
        match &self.tracks {
            Tracks::Party(markers) => markers.iter().all(|(_, m)| m.is_locked()),
            Tracks::Solo { left, right } => left.marker.is_locked() && right.marker.is_locked(),
        }
    }

    /// Timeout: lock every moving or locking marker where it is, for zero points.
    /// Returns how many markers were forced.
    pub fn force_lock_all(&mut self) -> usize {
        let forced = match &mut self.tracks {
            Tracks::Party(markers) => markers
                .iter_mut()
                .map(|(_, m)| m.force_lock() as usize)
                .sum(),
            Tracks::Solo { left, right } => {
                left.marker.force_lock() as usize + right.marker.force_lock() as usize
            }
        };
        if forced > 0 {
            log::info!("Round timer expired, auto-locked {} marker(s)", forced);
        }
        forced
    }

    fn party_score(&self, marker: &Marker) -> u32 {
        if marker.auto_locked {
            0
        } else {
            self.field.score(marker.scoring_position(), marker.assist_level)
        }
    }

    fn hand_score(&self, track: &HandTrack) -> u32 {
        match track.marker.lock_position() {
            Some(position) if !track.marker.auto_locked => {
                self.field.score_against(position, track.target)
            }
            _ => 0,
        }
    }

    /// Round score per player; a solo round reports the hand average for player 0
    pub fn collect_scores(&self) -> BTreeMap<PlayerId, u32> {
        match &self.tracks {
            Tracks::Party(markers) => markers
                .iter()
                .map(|(id, marker)| (*id, self.party_score(marker)))
                .collect(),
            Tracks::Solo { left, right } => {
                let average = scoring::solo_average(self.hand_score(left), self.hand_score(right));
                BTreeMap::from([(0, average)])
            }
        }
    }

    /// Per-hand scores of a solo round (`None` for party rounds)
    pub fn collect_solo_hand_scores(&self) -> Option<HandScores> {
        let Tracks::Solo { left, right } = &self.tracks else {
            return None;
        };
        let locked_by_hand = |track: &HandTrack| {
            (track.marker.is_locked() && !track.marker.auto_locked).then(|| self.hand_score(track))
        };
        Some(HandScores {
            left: locked_by_hand(left),
            right: locked_by_hand(right),
        })
    }

    /// Events since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Owned copy of the drawable state
    pub fn snapshot(&self) -> RoundSnapshot {
        let markers = match &self.tracks {
            Tracks::Party(markers) => markers
                .iter()
                .map(|(id, m)| MarkerView::new(Participant::Player(*id), m, self.field.target))
                .collect(),
            Tracks::Solo { left, right } => vec![
                MarkerView::new(Participant::SoloHand(Hand::Left), &left.marker, left.target),
                MarkerView::new(Participant::SoloHand(Hand::Right), &right.marker, right.target),
            ],
        };

        RoundSnapshot {
            pattern_name: self.pattern.name.clone(),
            headline: self.pattern.headline(),
            description: self.pattern.description.clone(),
            twist_hint: self.pattern.twist.map(|t| t.hint()),
            kind: self.pattern.kind,
            solo: self.is_solo(),
            target: self.field.target,
            target_visible: self.field.target_visible(),
            perfect_width: self.field.perfect_width,
            good_width: self.field.good_width,
            boost_zones: self.field.boost_zones.clone(),
            slow_zones: self.field.slow_zones.clone(),
            score_zones: self.field.score_zones().to_vec(),
            game_time: self.game_time,
            urgency: self.urgency,
            markers,
        }
    }
}

fn spawn_party_marker(pattern: &Pattern, id: PlayerId, assist: u8, rng: &mut Pcg32) -> Marker {
    let assist_slowdown = 1.0 - assist as f32 * ASSIST_SPEED_PENALTY;
    let base_speed =
        pattern.speed * rng.random_range(SPAWN_SPEED_MIN..SPAWN_SPEED_MAX) * assist_slowdown;

    let direction = match pattern.direction {
        Direction::Left => -1.0,
        Direction::Right => 1.0,
        Direction::Oscillate if id % 2 == 0 => 1.0,
        Direction::Oscillate => -1.0,
    };

    let mut marker = Marker::new(rng.random::<f32>(), base_speed, direction);
    marker.assist_level = assist;
    marker.oscillate_phase = rng.random_range(0.0..std::f32::consts::TAU);
    marker.visible = !matches!(pattern.twist, Some(Twist::InvisibleMarker { .. }));
    marker
}

fn spawn_hand(pattern: &Pattern, direction: f32, rng: &mut Pcg32) -> HandTrack {
    let target = rng.random_range(SOLO_TARGET_MIN..SOLO_TARGET_MAX);
    let base_speed = pattern.speed * rng.random_range(SPAWN_SPEED_MIN..SPAWN_SPEED_MAX);
    HandTrack {
        marker: Marker::new(rng.random::<f32>(), base_speed, direction),
        target,
    }
}

/// 0 normal, 1 hurry, 2 critical
fn urgency_for(time_remaining: f32) -> u8 {
    if time_remaining <= URGENCY_CRITICAL {
        2
    } else if time_remaining <= URGENCY_HURRY {
        1
    } else {
        0
    }
}
