//! Match orchestration
//!
//! A session runs a whole match: it picks patterns without immediate repeats, scales
//! difficulty per round, drives the countdown / playing / results phase machine and
//! banks round scores into player totals and hidden assist levels.

use std::collections::{BTreeMap, HashMap, HashSet};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{GOOD_LOCK_SCORE, MAX_FRAME_DT};
use crate::error::MatchError;
use crate::input::InputEvent;
use crate::players::{PlayerConfig, PlayerId, PlayerState, SoloStats};
use crate::settings::MatchSettings;
use crate::sim::{HandScores, Pattern, Round, RoundSnapshot, SimEvent, pattern_library};
use crate::standings::Standings;

/// Party (one marker per player) or solo two-hand training
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchMode {
    Party,
    Solo,
}

/// Match phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Pattern is shown, markers hold still
    Countdown,
    /// Markers move and accept presses
    Playing,
    /// Round scores on screen
    RoundResults,
    /// Last round banked, waiting for `reset`
    Finished,
}

/// One player's line in a round summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRoundResult {
    pub id: PlayerId,
    pub score: u32,
    pub total: u32,
    pub assist_before: u8,
    pub assist_after: u8,
}

/// What a finished round did to the match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    /// 1-based round number
    pub round: u32,
    pub pattern_name: String,
    /// Roster order
    pub results: Vec<PlayerRoundResult>,
    /// Best scorer, if they scored at least a good lock
    pub winner: Option<PlayerId>,
    /// Per-hand scores in solo mode
    pub hands: Option<HandScores>,
}

impl RoundSummary {
    pub fn score_of(&self, player: PlayerId) -> Option<u32> {
        self.results.iter().find(|r| r.id == player).map(|r| r.score)
    }
}

/// A whole match
#[derive(Debug, Clone)]
pub struct Session {
    mode: MatchMode,
    settings: MatchSettings,
    players: Vec<PlayerState>,
    library: Vec<Pattern>,
    used_patterns: HashSet<String>,
    /// 0-based index of the current round
    round_index: u32,
    round: Option<Round>,
    phase: MatchPhase,
    phase_timer: f32,
    rng: Pcg32,
    solo_stats: SoloStats,
    last_summary: Option<RoundSummary>,
}

impl Session {
    /// Start a party match. The first round's countdown begins immediately.
    pub fn new_party(
        roster: Vec<PlayerConfig>,
        settings: MatchSettings,
        seed: u64,
    ) -> Result<Self, MatchError> {
        settings.validate()?;
        if roster.is_empty() {
            return Err(MatchError::NoPlayers);
        }
        if roster.len() > settings.max_players {
            return Err(MatchError::TooManyPlayers {
                count: roster.len(),
                max: settings.max_players,
            });
        }
        let mut seen = HashSet::new();
        if let Some(dup) = roster.iter().find(|c| !seen.insert(c.id)) {
            return Err(MatchError::DuplicatePlayer(dup.id));
        }

        log::info!("Starting party match with {} players", roster.len());
        Ok(Self::start(MatchMode::Party, roster, settings, seed))
    }

    /// Start a solo two-hand training session
    pub fn new_solo(settings: MatchSettings, seed: u64) -> Result<Self, MatchError> {
        settings.validate()?;
        log::info!("Starting solo training");
        Ok(Self::start(
            MatchMode::Solo,
            vec![PlayerConfig::named(0, "Solo Player")],
            settings,
            seed,
        ))
    }

    fn start(mode: MatchMode, roster: Vec<PlayerConfig>, settings: MatchSettings, seed: u64) -> Self {
        let mut session = Self {
            mode,
            settings,
            players: roster.into_iter().map(PlayerState::new).collect(),
            library: pattern_library(),
            used_patterns: HashSet::new(),
            round_index: 0,
            round: None,
            phase: MatchPhase::Countdown,
            phase_timer: 0.0,
            rng: Pcg32::seed_from_u64(seed),
            solo_stats: SoloStats::default(),
            last_summary: None,
        };
        session.start_round();
        session
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    /// Seconds left in the current phase (0 once finished)
    pub fn phase_time_remaining(&self) -> f32 {
        self.phase_timer.max(0.0)
    }

    pub fn settings(&self) -> &MatchSettings {
        &self.settings
    }

    /// 1-based number of the current round
    pub fn round_number(&self) -> u32 {
        self.round_index + 1
    }

    pub fn total_rounds(&self) -> u32 {
        self.settings.rounds_for(self.mode)
    }

    pub fn players(&self) -> &[PlayerState] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&PlayerState> {
        self.players.iter().find(|p| p.id() == id)
    }

    pub fn solo_stats(&self) -> &SoloStats {
        &self.solo_stats
    }

    /// The live round; kept through the results phase for display
    pub fn current_round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn last_summary(&self) -> Option<&RoundSummary> {
        self.last_summary.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.phase == MatchPhase::Finished
    }

    /// Pick the next pattern: uniformly among those not played this cycle, starting a
    /// new cycle once every pattern has been used. Difficulty is scaled for the
    /// current round.
    pub fn select_pattern(&mut self) -> Pattern {
        assert!(!self.library.is_empty(), "pattern library is empty");

        let mut available: Vec<&Pattern> = self
            .library
            .iter()
            .filter(|p| !self.used_patterns.contains(&p.name))
            .collect();
        if available.is_empty() {
            log::debug!("All {} patterns used, starting a new cycle", self.library.len());
            self.used_patterns.clear();
            available = self.library.iter().collect();
        }

        let pattern = available[self.rng.random_range(0..available.len())].clone();
        self.used_patterns.insert(pattern.name.clone());
        pattern.scaled_for_round(self.round_index)
    }

    /// Build the next round and enter its countdown
    fn start_round(&mut self) {
        let pattern = self.select_pattern();
        let seed = self.rng.random::<u64>();
        log::info!(
            "Round {}/{}: {} ({})",
            self.round_number(),
            self.total_rounds(),
            pattern.name,
            pattern.headline()
        );

        let round = match self.mode {
            MatchMode::Party => {
                let ids: Vec<PlayerId> = self.players.iter().map(PlayerState::id).collect();
                let assists: HashMap<PlayerId, u8> = self
                    .players
                    .iter()
                    .map(|p| (p.id(), p.assist_level))
                    .collect();
                Round::party(&ids, pattern, &assists, seed)
            }
            MatchMode::Solo => Round::solo(pattern, seed),
        };

        self.round = Some(round);
        self.phase = MatchPhase::Countdown;
        self.phase_timer = self.settings.countdown;
    }

    /// Bank the current round's scores, adjust assist levels and show results.
    /// Only `advance` calls this, once per round as `Playing` ends.
    fn end_round(&mut self) -> RoundSummary {
        let (scores, hands, pattern_name) = match &self.round {
            Some(round) => (
                round.collect_scores(),
                round.collect_solo_hand_scores(),
                round.pattern().name.clone(),
            ),
            None => (BTreeMap::new(), None, String::new()),
        };

        let results: Vec<PlayerRoundResult> = self
            .players
            .iter_mut()
            .map(|player| {
                let score = scores.get(&player.id()).copied().unwrap_or(0);
                let assist_before = player.assist_level;
                player.record_round(score);
                if player.assist_level != assist_before {
                    log::info!(
                        "Player {} assist {} -> {}",
                        player.id(),
                        assist_before,
                        player.assist_level
                    );
                }
                PlayerRoundResult {
                    id: player.id(),
                    score,
                    total: player.total_score,
                    assist_before,
                    assist_after: player.assist_level,
                }
            })
            .collect();

        if self.mode == MatchMode::Solo {
            let hands = hands.unwrap_or_default();
            self.solo_stats.record(hands.left, hands.right);
        }

        let summary = RoundSummary {
            round: self.round_number(),
            pattern_name,
            winner: round_winner(&results),
            results,
            hands,
        };
        log::info!(
            "Round {} ended, winner: {:?}",
            summary.round,
            summary.winner
        );

        self.phase = MatchPhase::RoundResults;
        self.phase_timer = self.settings.results_display;
        self.last_summary = Some(summary.clone());
        summary
    }

    /// Advance the match by one frame. Returns the summary of a round that ended
    /// during this frame.
    pub fn advance(&mut self, dt: f32) -> Option<RoundSummary> {
        let dt = dt.clamp(0.0, self.settings.max_frame_dt.min(MAX_FRAME_DT));

        match self.phase {
            MatchPhase::Countdown => {
                self.phase_timer -= dt;
                if self.phase_timer <= 0.0 {
                    self.phase = MatchPhase::Playing;
                    self.phase_timer = self.settings.round_duration;
                }
                None
            }
            MatchPhase::Playing => {
                self.phase_timer -= dt;
                let time_remaining = self.phase_timer.max(0.0);
                let round = self.round.as_mut()?;
                round.tick(dt, time_remaining);

                let timed_out = self.phase_timer <= 0.0;
                if timed_out {
                    round.force_lock_all();
                }
                (timed_out || round.is_complete()).then(|| self.end_round())
            }
            MatchPhase::RoundResults => {
                self.phase_timer -= dt;
                if self.phase_timer <= 0.0 {
                    if self.round_index + 1 >= self.total_rounds() {
                        self.finish();
                    } else {
                        self.round_index += 1;
                        self.start_round();
                    }
                }
                None
            }
            MatchPhase::Finished => None,
        }
    }

    fn finish(&mut self) {
        self.phase = MatchPhase::Finished;
        self.phase_timer = 0.0;
        match self.mode {
            MatchMode::Party => {
                if let Some(leader) = self.standings().leader() {
                    log::info!("Match over: {} wins with {}", leader.name, leader.total_score);
                }
            }
            MatchMode::Solo => log::info!(
                "Training over: left {:.1}% ({} hits), right {:.1}% ({} hits)",
                self.solo_stats.left_accuracy,
                self.solo_stats.left_hits,
                self.solo_stats.right_accuracy,
                self.solo_stats.right_hits
            ),
        }
    }

    /// Route a press to the live round. Returns false when no round is accepting input.
    pub fn submit_input(&mut self, input: InputEvent) -> bool {
        if self.phase != MatchPhase::Playing {
            log::debug!("Ignoring press outside play ({:?})", self.phase);
            return false;
        }
        match self.round.as_mut() {
            Some(round) => {
                round.submit_input(input);
                true
            }
            None => false,
        }
    }

    pub fn snapshot(&self) -> Option<RoundSnapshot> {
        self.round.as_ref().map(Round::snapshot)
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.round.as_mut().map(Round::drain_events).unwrap_or_default()
    }

    pub fn standings(&self) -> Standings {
        Standings::from_players(&self.players)
    }

    /// Restart the match with the same roster: totals, assist levels, solo stats and
    /// the used-pattern cycle are cleared.
    pub fn reset(&mut self) {
        log::info!("Resetting match");
        self.players.iter_mut().for_each(PlayerState::reset);
        self.used_patterns.clear();
        self.solo_stats = SoloStats::default();
        self.last_summary = None;
        self.round_index = 0;
        self.round = None;
        self.start_round();
    }
}

/// Best score wins if it is at least a good lock; ties go to roster order
fn round_winner(results: &[PlayerRoundResult]) -> Option<PlayerId> {
    results
        .iter()
        .fold(None::<&PlayerRoundResult>, |best, r| match best {
            Some(b) if b.score >= r.score => Some(b),
            _ => Some(r),
        })
        .filter(|r| r.score >= GOOD_LOCK_SCORE)
        .map(|r| r.id)
}
