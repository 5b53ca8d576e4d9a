//! Match configuration.
//!
//! The defaults are the standard rules; tests and the replay CLI override
//! individual values (most often the RNG seed).

/// Tunable rules constants and the RNG seed for one match.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct GameConfig {
    /// A player wins once their total power exceeds this value.
    pub win_power: u32,
    pub setup_hand_size: usize,
    /// Gold available for placing setup cards.
    pub setup_gold: u32,
    /// Cards drawn by each player in the draw phase.
    pub draw_phase_cards: usize,
    pub max_challenges_per_type: u32,
    pub max_challenges_total: u32,
    /// Seed for shuffles and random discards. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            win_power: 15,
            setup_hand_size: 7,
            setup_gold: 8,
            draw_phase_cards: 2,
            max_challenges_per_type: 1,
            max_challenges_total: 3,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.win_power, 15);
        assert_eq!(config.setup_hand_size, 7);
        assert_eq!(config.max_challenges_per_type, 1);
        assert_eq!(config.max_challenges_total, 3);
        assert!(config.seed.is_none());
    }

    #[cfg(feature = "serialization")]
    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{ "seed": 7, "win_power": 10 }"#)
            .expect("config should parse");
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.win_power, 10);
        assert_eq!(config.setup_gold, 8);
    }
}
