//! Distance-to-target scoring
//!
//! Three tiers around a single target:
//! - inside half the perfect width: 100
//! - inside half the good width: 100 falling linearly to 70
//! - beyond: 70 falling linearly to 0 at a distance of 0.5
//!
//! The good and outer tiers normalize over different spans (steep near the zone,
//! gentle far away) and must stay separate tiers.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Distance at which the outer tier reaches 0
const MAX_DISTANCE: f32 = 0.5;

/// A scoring sub-zone of a multi-zone pattern
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreZone {
    pub position: f32,
    pub width: f32,
    /// Score at the exact zone center
    pub points: u32,
}

/// Score a locked position against a single target
pub fn score(position: f32, target: f32, perfect_width: f32, good_width: f32) -> u32 {
    let distance = (position - target).abs();
    let half_perfect = perfect_width / 2.0;
    let half_good = good_width / 2.0;

    if distance <= half_perfect {
        return 100;
    }

    if distance <= half_good {
        let normalized = (distance - half_perfect) / (half_good - half_perfect);
        return (100.0 - normalized * 30.0).round() as u32;
    }

    let normalized = (distance - half_good) / (MAX_DISTANCE - half_good);
    (70.0 * (1.0 - normalized)).round().max(0.0) as u32
}

/// Zone width multiplier for a hidden assist level
#[inline]
pub fn assist_width_factor(assist_level: u8) -> f32 {
    1.0 + assist_level.min(MAX_ASSIST) as f32 * ASSIST_WIDTH_BONUS
}

/// Single-target score with both zones widened by the player's assist level
pub fn score_with_assist(
    position: f32,
    target: f32,
    perfect_width: f32,
    good_width: f32,
    assist_level: u8,
) -> u32 {
    let factor = assist_width_factor(assist_level);
    score(position, target, perfect_width * factor, good_width * factor)
}

/// Best score across the zones containing `position`
///
/// Outside every zone the score falls off from 50 with the distance to the nearest
/// zone center.
pub fn score_multi_zone(position: f32, zones: &[ScoreZone]) -> u32 {
    let best = zones
        .iter()
        .filter_map(|zone| {
            let distance = (position - zone.position).abs();
            let half = zone.width / 2.0;
            (distance <= half).then(|| {
                let normalized = distance / half;
                (zone.points as f32 * (1.0 - normalized * 0.3)).round() as u32
            })
        })
        .max();

    if let Some(best) = best {
        return best;
    }

    let nearest = zones
        .iter()
        .map(|zone| (position - zone.position).abs())
        .fold(1.0f32, f32::min);
    (50.0 * (1.0 - 2.0 * nearest)).round().max(0.0) as u32
}

/// Solo match score: rounded mean of both hands
pub fn solo_average(left: u32, right: u32) -> u32 {
    ((left + right) as f32 / 2.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const PERFECT: f32 = 0.04;
    const GOOD: f32 = 0.12;

    fn triple_zones() -> Vec<ScoreZone> {
        vec![
            ScoreZone { position: 0.25, width: PERFECT * 1.5, points: 70 },
            ScoreZone { position: 0.5, width: PERFECT, points: 100 },
            ScoreZone { position: 0.75, width: PERFECT * 1.5, points: 70 },
        ]
    }

    #[test]
    fn test_classic_center_tiers() {
        assert_eq!(score(0.50, 0.5, PERFECT, GOOD), 100);
        // Exactly half the perfect width
        assert_eq!(score(0.52, 0.5, PERFECT, GOOD), 100);

        // Beyond the good half-width: outer tier
        let far = score(0.60, 0.5, PERFECT, GOOD);
        assert!(far > 0 && far < 70, "outer tier score {far}");
        // (0.10 - 0.06) / (0.5 - 0.06) = 0.0909.. -> 70 * 0.909 = 63.6
        assert_eq!(far, 64);
    }

    #[test]
    fn test_good_tier_interpolates() {
        // Halfway through the good band: 100 - 0.5 * 30
        assert_eq!(score(0.54, 0.5, PERFECT, GOOD), 85);
        // Edge of the good band
        assert_eq!(score(0.5, 0.56, PERFECT, GOOD), 70);
    }

    #[test]
    fn test_far_is_zero() {
        assert_eq!(score(0.0, 0.8, PERFECT, GOOD), 0);
        assert_eq!(score(1.0, 0.5, PERFECT, GOOD), 0);
    }

    #[test]
    fn test_assist_zero_is_noop() {
        for p in [0.3, 0.45, 0.51, 0.53, 0.6] {
            assert_eq!(
                score_with_assist(p, 0.5, PERFECT, GOOD, 0),
                score(p, 0.5, PERFECT, GOOD)
            );
        }
    }

    #[test]
    fn test_assist_widens_perfect_zone() {
        // 0.021 is outside the unassisted perfect half-width (0.02) but inside 0.0214
        assert_eq!(score_with_assist(0.521, 0.5, PERFECT, GOOD, 0), 99);
        assert_eq!(score_with_assist(0.521, 0.5, PERFECT, GOOD, 1), 100);
    }

    #[test]
    fn test_multi_zone_centers() {
        let zones = triple_zones();
        assert_eq!(score_multi_zone(0.5, &zones), 100);
        assert_eq!(score_multi_zone(0.25, &zones), 70);
        assert_eq!(score_multi_zone(0.75, &zones), 70);
    }

    #[test]
    fn test_multi_zone_edge_and_outside() {
        let zones = triple_zones();
        // Edge of the center zone: 100 * 0.7
        assert_eq!(score_multi_zone(0.52, &zones), 70);
        // Between zones: nearest center 0.125 away -> 50 * 0.75
        assert_eq!(score_multi_zone(0.375, &zones), 38);
        // Track edge: nearest center 0.25 away
        assert_eq!(score_multi_zone(0.0, &zones), 25);
    }

    #[test]
    fn test_solo_average() {
        assert_eq!(solo_average(90, 70), 80);
        assert_eq!(solo_average(0, 0), 0);
        assert_eq!(solo_average(100, 71), 86);
    }

    proptest! {
        #[test]
        fn prop_score_in_range(p in 0.0f32..=1.0, t in 0.2f32..=0.8, w in 0.01f32..0.1) {
            let s = score(p, t, w, w * GOOD_ZONE_FACTOR);
            prop_assert!(s <= 100);
            prop_assert_eq!(score(t, t, w, w * GOOD_ZONE_FACTOR), 100);
        }

        #[test]
        fn prop_score_non_increasing_with_distance(
            d1 in 0.0f32..0.6,
            d2 in 0.0f32..0.6,
            w in 0.01f32..0.1,
        ) {
            let (near, far) = if d1 <= d2 { (d1, d2) } else { (d2, d1) };
            let good = w * GOOD_ZONE_FACTOR;
            prop_assert!(score(0.5 + near, 0.5, w, good) >= score(0.5 + far, 0.5, w, good));
        }

        #[test]
        fn prop_assist_never_hurts(
            p in 0.0f32..=1.0,
            t in 0.2f32..=0.8,
            w in 0.01f32..0.1,
            level in 0u8..3,
        ) {
            let good = w * GOOD_ZONE_FACTOR;
            let lower = score_with_assist(p, t, w, good, level);
            let higher = score_with_assist(p, t, w, good, level + 1);
            prop_assert!(higher >= lower);
        }
    }
}
