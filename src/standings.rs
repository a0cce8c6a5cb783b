//! Match standings
//!
//! Players ranked by total score, highest first. Equal totals are ordered by player id
//! so the ranking is stable from frame to frame.

use serde::{Deserialize, Serialize};

use crate::players::{PlayerId, PlayerState};

/// A single row of the standings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingEntry {
    pub id: PlayerId,
    pub name: String,
    pub total_score: u32,
    /// Score of the most recent round
    pub round_score: u32,
}

/// Ranked players
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standings {
    pub entries: Vec<StandingEntry>,
}

impl Standings {
    pub fn from_players(players: &[PlayerState]) -> Self {
        let mut entries: Vec<StandingEntry> = players
            .iter()
            .map(|p| StandingEntry {
                id: p.id(),
                name: p.config.name.clone(),
                total_score: p.total_score,
                round_score: p.round_score,
            })
            .collect();
        entries.sort_by(|a, b| b.total_score.cmp(&a.total_score).then(a.id.cmp(&b.id)));
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current leader (the match winner once the match is finished)
    pub fn leader(&self) -> Option<&StandingEntry> {
        self.entries.first()
    }

    /// Everyone sharing the top total
    pub fn tied_leaders(&self) -> Vec<&StandingEntry> {
        let Some(top) = self.leader().map(|e| e.total_score) else {
            return Vec::new();
        };
        self.entries.iter().take_while(|e| e.total_score == top).collect()
    }

    /// 1-indexed position of a player
    pub fn rank_of(&self, id: PlayerId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id).map(|i| i + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::players::PlayerConfig;

    fn player(id: PlayerId, rounds: &[u32]) -> PlayerState {
        let mut p = PlayerState::new(PlayerConfig::new(id));
        for &score in rounds {
            p.record_round(score);
        }
        p
    }

    #[test]
    fn test_empty() {
        let standings = Standings::from_players(&[]);
        assert!(standings.is_empty());
        assert!(standings.leader().is_none());
        assert!(standings.tied_leaders().is_empty());
    }

    #[test]
    fn test_sorted_by_total() {
        let standings = Standings::from_players(&[
            player(0, &[50, 20]),
            player(1, &[90, 95]),
            player(2, &[100]),
        ]);
        let order: Vec<PlayerId> = standings.entries.iter().map(|e| e.id).collect();
        assert_eq!(order, vec![1, 2, 0]);
        assert_eq!(standings.leader().unwrap().name, "Player 2");
        assert_eq!(standings.rank_of(0), Some(3));
        assert_eq!(standings.rank_of(7), None);
        assert_eq!(standings.entries[0].round_score, 95);
    }

    #[test]
    fn test_ties_ordered_by_id() {
        let standings = Standings::from_players(&[
            player(3, &[80]),
            player(1, &[80]),
            player(2, &[10]),
        ]);
        assert_eq!(standings.leader().unwrap().id, 1);
        let tied: Vec<PlayerId> = standings.tied_leaders().iter().map(|e| e.id).collect();
        assert_eq!(tied, vec![1, 3]);
    }
}
