//! Match settings
//!
//! Timings and round counts for a match. The shell may hand these in as JSON;
//! missing fields fall back to the defaults.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_FRAME_DT, MAX_PLAYERS};
use crate::error::MatchError;
use crate::session::MatchMode;

/// Match timing and length
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchSettings {
    /// Seconds players have to lock before auto-lock
    pub round_duration: f32,
    /// Rounds in a party match
    pub party_rounds: u32,
    /// Rounds in a solo training session
    pub solo_rounds: u32,
    /// Seconds of countdown before each round
    pub countdown: f32,
    /// Seconds the round results stay up
    pub results_display: f32,
    /// Frame deltas above this are clamped
    pub max_frame_dt: f32,
    /// Party roster limit
    pub max_players: usize,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            round_duration: 12.0,
            party_rounds: 7,
            solo_rounds: 10,
            countdown: 2.0,
            results_display: 2.0,
            max_frame_dt: MAX_FRAME_DT,
            max_players: MAX_PLAYERS,
        }
    }
}

impl MatchSettings {
    /// Short match for demos and quick sessions
    pub fn quick() -> Self {
        Self {
            party_rounds: 3,
            solo_rounds: 3,
            ..Self::default()
        }
    }

    /// Rounds to play in a mode
    pub fn rounds_for(&self, mode: MatchMode) -> u32 {
        match mode {
            MatchMode::Party => self.party_rounds,
            MatchMode::Solo => self.solo_rounds,
        }
    }

    /// Parse settings JSON, defaulting missing fields
    pub fn from_json(json: &str) -> Result<Self, MatchError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        log::info!("Loaded match settings: {:?}", settings);
        Ok(settings)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Reject settings that would stall or break a match
    pub fn validate(&self) -> Result<(), MatchError> {
        let positive = |name: &str, value: f32| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(MatchError::InvalidSettings(format!("{name} must be positive, got {value}")))
            }
        };
        positive("round_duration", self.round_duration)?;
        positive("max_frame_dt", self.max_frame_dt)?;
        if self.max_frame_dt > MAX_FRAME_DT {
            return Err(MatchError::InvalidSettings(format!(
                "max_frame_dt must be at most {MAX_FRAME_DT}, got {}",
                self.max_frame_dt
            )));
        }

        for (name, value) in [("countdown", self.countdown), ("results_display", self.results_display)] {
            if !value.is_finite() || value < 0.0 {
                return Err(MatchError::InvalidSettings(format!(
                    "{name} must be zero or more, got {value}"
                )));
            }
        }
        if self.party_rounds == 0 || self.solo_rounds == 0 {
            return Err(MatchError::InvalidSettings("a match needs at least one round".into()));
        }
        if self.max_players == 0 || self.max_players > MAX_PLAYERS {
            return Err(MatchError::InvalidSettings(format!(
                "max_players must be 1..={MAX_PLAYERS}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_party_game() {
        let settings = MatchSettings::default();
        assert_eq!(settings.rounds_for(MatchMode::Party), 7);
        assert_eq!(settings.rounds_for(MatchMode::Solo), 10);
        assert_eq!(settings.round_duration, 12.0);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let settings = MatchSettings::from_json(r#"{"party_rounds": 3}"#).unwrap();
        assert_eq!(settings.party_rounds, 3);
        assert_eq!(settings.solo_rounds, 10);
    }

    #[test]
    fn test_round_trip_json() {
        let settings = MatchSettings::quick();
        assert_eq!(MatchSettings::from_json(&settings.to_json()).unwrap(), settings);
    }

    #[test]
    fn test_rejects_bad_settings() {
        assert!(matches!(
            MatchSettings::from_json(r#"{"round_duration": 0}"#),
            Err(MatchError::InvalidSettings(_))
        ));
        assert!(matches!(
            MatchSettings::from_json(r#"{"solo_rounds": 0}"#),
            Err(MatchError::InvalidSettings(_))
        ));
        assert!(matches!(MatchSettings::from_json("not json"), Err(MatchError::Settings(_))));
    }

    #[test]
    fn test_frame_clamp_cannot_exceed_sim_step() {
        assert!(matches!(
            MatchSettings::from_json(r#"{"max_frame_dt": 1.0}"#),
            Err(MatchError::InvalidSettings(_))
        ));
        assert!(MatchSettings::from_json(r#"{"max_frame_dt": 0.05}"#).is_ok());
    }

    #[test]
    fn test_phase_durations_must_be_finite() {
        let settings = MatchSettings {
            countdown: f32::NAN,
            ..MatchSettings::default()
        };
        assert!(matches!(settings.validate(), Err(MatchError::InvalidSettings(_))));

        let settings = MatchSettings {
            results_display: f32::INFINITY,
            ..MatchSettings::default()
        };
        assert!(matches!(settings.validate(), Err(MatchError::InvalidSettings(_))));

        let settings = MatchSettings {
            countdown: 0.0,
            results_display: 0.0,
            ..MatchSettings::default()
        };
        assert!(settings.validate().is_ok());
    }
}
