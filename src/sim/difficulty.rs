//! Rank progression and the difficulty parameters it drives
//!
//! Ranks are keyed by strictly increasing score thresholds. Each rank owns a
//! fixed mutation of `DifficultyParameters`; the parameters for a rank are the
//! fold of every mutation from the base rank up to it, so skipping a rank can
//! never leave a hazard switched off.

use serde::{Deserialize, Serialize};

/// Named player ranks, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Rank {
    #[default]
    Sybil,
    #[serde(rename = "Approve?")]
    Approve,
    Gmpc,
    Arcian,
    #[serde(rename = "PARASOL ☂️")]
    Parasol,
    #[serde(rename = "Loosty GM")]
    Loosty,
    #[serde(rename = "Well you a monster")]
    Monster,
    #[serde(rename = "A BOT?")]
    Bot,
    #[serde(rename = "LEGEND")]
    Legend,
}

impl Rank {
    /// All ranks in ascending order
    pub const ALL: [Rank; 9] = [
        Rank::Sybil,
        Rank::Approve,
        Rank::Gmpc,
        Rank::Arcian,
        Rank::Parasol,
        Rank::Loosty,
        Rank::Monster,
        Rank::Bot,
        Rank::Legend,
    ];

    /// Score at which this rank is reached
    pub fn threshold(self) -> u64 {
        match self {
            Rank::Sybil => 0,
            Rank::Approve => 1500,
            Rank::Gmpc => 3000,
            Rank::Arcian => 5000,
            Rank::Parasol => 7000,
            Rank::Loosty => 10000,
            Rank::Monster => 15000,
            Rank::Bot => 20000,
            Rank::Legend => 30000,
        }
    }

    /// Display title shown to players
    pub fn title(self) -> &'static str {
        match self {
            Rank::Sybil => "Sybil",
            Rank::Approve => "Approve?",
            Rank::Gmpc => "Gmpc",
            Rank::Arcian => "Arcian",
            Rank::Parasol => "PARASOL ☂️",
            Rank::Loosty => "Loosty GM",
            Rank::Monster => "Well you a monster",
            Rank::Bot => "A BOT?",
            Rank::Legend => "LEGEND",
        }
    }

    /// Highest rank whose threshold the score has reached
    pub fn from_score(score: u64) -> Rank {
        Rank::ALL
            .iter()
            .rev()
            .copied()
            .find(|rank| score >= rank.threshold())
            .unwrap_or(Rank::Sybil)
    }

    /// Position in the ladder (0 = Sybil)
    pub fn index(self) -> u32 {
        self as u32
    }

    /// Difficulty level as shown by the host (1-based)
    pub fn level(self) -> u32 {
        self.index() + 1
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

/// Wind pushing the player sideways
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub enabled: bool,
    /// Horizontal push per frame, reference units
    pub strength: f32,
    /// +1 pushes right, -1 pushes left
    pub direction: f32,
    /// Seconds between direction re-rolls
    pub change_interval: f32,
    /// Seconds since the last re-roll
    pub change_timer: f32,
}

/// Raindrop hazard settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardParams {
    pub enabled: bool,
    /// Nominal drop count (the live count is half of it)
    pub count: u32,
}

/// Swinging umbrella settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwingParams {
    pub enabled: bool,
    /// Peak horizontal offset, reference units
    pub amplitude: f32,
    /// Angular frequency, radians per second
    pub frequency: f32,
}

/// Slippery umbrella settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlipParams {
    pub enabled: bool,
    /// Share of horizontal velocity kept per tick (higher = icier)
    pub slip_factor: f32,
}

/// Shared difficulty knobs, mutated only by rank transitions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyParameters {
    pub broken_chance: f32,
    pub temporary_chance: f32,
    pub moving_speed_multiplier: f32,
    pub wind: Wind,
    /// Fraction the umbrella canopy shrinks by (0 = full size)
    pub umbrella_shrink: f32,
    pub hazards: HazardParams,
    pub swing: SwingParams,
    pub slippery: SlipParams,
}

impl Default for DifficultyParameters {
    fn default() -> Self {
        Self {
            broken_chance: 0.08,
            temporary_chance: 0.08,
            moving_speed_multiplier: 1.2,
            wind: Wind {
                enabled: false,
                strength: 0.0,
                direction: 1.0,
                change_interval: 2.0,
                change_timer: 0.0,
            },
            umbrella_shrink: 0.0,
            hazards: HazardParams {
                enabled: false,
                count: 0,
            },
            swing: SwingParams {
                enabled: false,
                amplitude: 0.0,
                frequency: 2.0,
            },
            slippery: SlipParams {
                enabled: false,
                slip_factor: 0.0,
            },
        }
    }
}

impl DifficultyParameters {
    /// Parameters in force at `rank` (base plus every mutation up to it)
    pub fn for_rank(rank: Rank) -> Self {
        let mut params = Self::default();
        for step in Rank::ALL.iter().take(rank.index() as usize + 1) {
            params.apply_rank(*step);
        }
        params
    }

    /// Apply the fixed mutation for a single rank
    ///
    /// Wind direction and its timer are live state and are left alone.
    pub fn apply_rank(&mut self, rank: Rank) {
        match rank {
            Rank::Sybil => {}
            Rank::Approve => {
                self.broken_chance = 0.18;
                self.temporary_chance = 0.12;
                self.wind.enabled = true;
                self.wind.strength = 0.2;
            }
            Rank::Gmpc => {
                self.wind.strength = 0.3;
                self.broken_chance = 0.22;
                self.temporary_chance = 0.15;
            }
            Rank::Arcian => {
                self.umbrella_shrink = 0.35;
                self.wind.strength = 0.4;
                self.broken_chance = 0.25;
            }
            Rank::Parasol => {
                self.hazards.enabled = true;
                self.hazards.count = 8;
                self.wind.strength = 0.5;
                self.temporary_chance = 0.25;
            }
            Rank::Loosty => {
                self.moving_speed_multiplier = 1.8;
                self.temporary_chance = 0.3;
                self.hazards.count = 12;
                self.wind.strength = 0.6;
                self.broken_chance = 0.3;
            }
            Rank::Monster => {
                self.swing.enabled = true;
                self.swing.amplitude = 25.0;
                self.swing.frequency = 3.0;
                self.wind.strength = 0.7;
                self.hazards.count = 16;
                self.temporary_chance = 0.35;
            }
            Rank::Bot => {
                self.slippery.enabled = true;
                self.slippery.slip_factor = 0.93;
                self.hazards.count = 20;
                self.wind.strength = 0.8;
                self.broken_chance = 0.35;
                self.temporary_chance = 0.4;
            }
            Rank::Legend => {
                self.broken_chance = 0.4;
                self.temporary_chance = 0.45;
                self.moving_speed_multiplier = 2.5;
                self.wind.strength = 1.0;
                self.hazards.count = 25;
                self.swing.amplitude = 35.0;
                self.slippery.slip_factor = 0.96;
                self.umbrella_shrink = 0.45;
            }
        }
    }

    /// Live raindrop count (nominal count halved for density)
    pub fn hazard_target(&self) -> usize {
        if self.hazards.enabled {
            (self.hazards.count / 2) as usize
        } else {
            0
        }
    }

    /// Width-to-radius ratio after the rank shrink
    pub fn umbrella_ratio(&self, base_ratio: f32) -> f32 {
        base_ratio / (1.0 - self.umbrella_shrink).max(0.05)
    }
}

/// Recompute the rank for `score`; on an upward move, apply every mutation
/// between the old and new rank and return the new rank
pub fn update_rank(current: Rank, score: u64, params: &mut DifficultyParameters) -> Option<Rank> {
    let target = Rank::from_score(score);
    if target <= current {
        return None;
    }

    for rank in Rank::ALL
        .iter()
        .copied()
        .filter(|r| *r > current && *r <= target)
    {
        params.apply_rank(rank);
    }

    log::info!(
        "Rank {} -> {} at score {} (level {})",
        current,
        target,
        score,
        target.level()
    );
    Some(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_from_score_boundaries() {
        assert_eq!(Rank::from_score(0), Rank::Sybil);
        assert_eq!(Rank::from_score(1499), Rank::Sybil);
        assert_eq!(Rank::from_score(1500), Rank::Approve);
        assert_eq!(Rank::from_score(29_999), Rank::Bot);
        assert_eq!(Rank::from_score(30_000), Rank::Legend);
        assert_eq!(Rank::from_score(u64::MAX), Rank::Legend);
    }

    #[test]
    fn test_thresholds_strictly_increase() {
        for pair in Rank::ALL.windows(2) {
            assert!(pair[0].threshold() < pair[1].threshold());
        }
    }

    #[test]
    fn test_threshold_transition_enables_wind() {
        let mut params = DifficultyParameters::default();
        assert!(!params.wind.enabled);

        assert_eq!(update_rank(Rank::Sybil, 1475, &mut params), None);
        assert!(!params.wind.enabled);

        assert_eq!(
            update_rank(Rank::Sybil, 1500, &mut params),
            Some(Rank::Approve)
        );
        assert!(params.wind.enabled);
        assert!(params.wind.strength > 0.0);
        assert_eq!(params, DifficultyParameters::for_rank(Rank::Approve));
    }

    #[test]
    fn test_skipping_ranks_applies_every_mutation() {
        let mut params = DifficultyParameters::default();
        assert_eq!(
            update_rank(Rank::Sybil, 16_000, &mut params),
            Some(Rank::Monster)
        );
        assert!(params.hazards.enabled);
        assert!(params.swing.enabled);
        assert!(params.umbrella_shrink > 0.0);
        assert_eq!(params, DifficultyParameters::for_rank(Rank::Monster));
    }

    #[test]
    fn test_no_downward_transition() {
        let mut params = DifficultyParameters::for_rank(Rank::Gmpc);
        let before = params.clone();
        assert_eq!(update_rank(Rank::Gmpc, 100, &mut params), None);
        assert_eq!(params, before);
    }

    #[test]
    fn test_parameters_monotone_in_severity() {
        for pair in Rank::ALL.windows(2) {
            let lo = DifficultyParameters::for_rank(pair[0]);
            let hi = DifficultyParameters::for_rank(pair[1]);
            assert!(hi.broken_chance >= lo.broken_chance);
            assert!(hi.temporary_chance >= lo.temporary_chance);
            assert!(hi.moving_speed_multiplier >= lo.moving_speed_multiplier);
            assert!(hi.wind.strength >= lo.wind.strength);
            assert!(hi.wind.enabled >= lo.wind.enabled);
            assert!(hi.umbrella_shrink >= lo.umbrella_shrink);
            assert!(hi.hazards.enabled >= lo.hazards.enabled);
            assert!(hi.hazards.count >= lo.hazards.count);
            assert!(hi.swing.enabled >= lo.swing.enabled);
            assert!(hi.swing.amplitude >= lo.swing.amplitude);
            assert!(hi.slippery.enabled >= lo.slippery.enabled);
            assert!(hi.slippery.slip_factor >= lo.slippery.slip_factor);
        }
    }

    #[test]
    fn test_hazard_target_is_halved() {
        let params = DifficultyParameters::for_rank(Rank::Parasol);
        assert_eq!(params.hazard_target(), 4);
        assert_eq!(DifficultyParameters::default().hazard_target(), 0);
    }

    #[test]
    fn test_rank_serializes_as_title() {
        let json = serde_json::to_string(&Rank::Parasol).unwrap();
        assert_eq!(json, "\"PARASOL ☂️\"");
        assert_eq!(Rank::Monster.to_string(), "Well you a monster");
    }
}
