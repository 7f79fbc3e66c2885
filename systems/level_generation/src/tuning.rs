//! Tuning surface of the level generator.

use grow_defence_core::LoreRarity;

/// Aggregated tuning knobs controlling every adjustable aspect of the level generator.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LevelTuning {
    /// Difficulty scaling and boss cadence.
    pub difficulty: DifficultyTuning,
    /// Pest count and per-pest stat variation.
    pub pests: PestTuning,
    /// Weather and environmental effect probabilities.
    pub weather: WeatherTuning,
    /// Boss selection and multipliers.
    pub boss: BossTuning,
    /// Independent special condition rolls.
    pub conditions: ConditionTuning,
    /// Leaf rewards.
    pub rewards: RewardTuning,
    /// Objective thresholds.
    pub objectives: ObjectiveTuning,
    /// Lore discovery.
    pub lore: LoreTuning,
}

/// Difficulty curve parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct DifficultyTuning {
    /// Added to the difficulty multiplier for every level past the first.
    pub step: f64,
    /// Every level divisible by this is a boss level.
    pub boss_interval: u32,
    /// Player-facing rating gained per level.
    pub rating_per_level: f64,
    /// Ceiling of the player-facing rating.
    pub rating_cap: f64,
}

impl Default for DifficultyTuning {
    fn default() -> Self {
        Self {
            step: 0.15,
            boss_interval: 3,
            rating_per_level: 0.3,
            rating_cap: 10.0,
        }
    }
}

/// Pest wave composition.
#[derive(Clone, Debug, PartialEq)]
pub struct PestTuning {
    /// Pest count at level zero.
    pub base_count: f64,
    /// Pests added per level before flooring.
    pub count_per_level: f64,
    /// Hard cap on pests per level.
    pub max_count: u32,
    /// Random health factor window.
    pub health_variation: (f64, f64),
    /// Random speed factor window.
    pub speed_variation: (f64, f64),
    /// Exclusive upper bound of the spawn delay in milliseconds.
    pub max_spawn_delay_ms: f64,
}

impl Default for PestTuning {
    fn default() -> Self {
        Self {
            base_count: 3.0,
            count_per_level: 0.5,
            max_count: 20,
            health_variation: (0.8, 1.2),
            speed_variation: (0.9, 1.1),
            max_spawn_delay_ms: 5_000.0,
        }
    }
}

/// Weather draw and weather-driven effects.
#[derive(Clone, Debug, PartialEq)]
pub struct WeatherTuning {
    /// A roll above this replaces the base weather with a seasonal draw.
    pub season_override_roll: f64,
    /// Chance that fog thickens into a dense fog effect.
    pub dense_fog_chance: f64,
    /// Chance that a heatwave causes drought.
    pub drought_chance: f64,
    /// Chance of a pest frenzy under any weather.
    pub pest_frenzy_chance: f64,
}

impl Default for WeatherTuning {
    fn default() -> Self {
        Self {
            season_override_roll: 0.6,
            dense_fog_chance: 0.5,
            drought_chance: 0.4,
            pest_frenzy_chance: 0.15,
        }
    }
}

/// Boss selection parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct BossTuning {
    /// Chance of preferring an environmental boss when one is eligible.
    pub environmental_chance: f64,
    /// Health multiplier gained per level past the boss's first appearance.
    pub health_per_level: f64,
    /// Damage multiplier gained per level past the boss's first appearance.
    pub damage_per_level: f64,
    /// Upper bound of the random speed bonus.
    pub max_speed_bonus: f64,
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            environmental_chance: 0.5,
            health_per_level: 0.25,
            damage_per_level: 0.15,
            max_speed_bonus: 0.3,
        }
    }
}

/// Special condition rolls; each condition is attached when its roll exceeds the threshold.
#[derive(Clone, Debug, PartialEq)]
pub struct ConditionTuning {
    /// Threshold for the spawn rate boost.
    pub spawn_boost_roll: f64,
    /// Spawn rate multiplier.
    pub spawn_boost: f64,
    /// Threshold for the pest speed boost.
    pub speed_boost_roll: f64,
    /// Pest speed multiplier.
    pub speed_boost: f64,
    /// Threshold for the plant stress debuff.
    pub plant_stress_roll: f64,
    /// Starting plant health multiplier.
    pub plant_stress: f64,
}

impl Default for ConditionTuning {
    fn default() -> Self {
        Self {
            spawn_boost_roll: 0.7,
            spawn_boost: 1.5,
            speed_boost_roll: 0.8,
            speed_boost: 1.3,
            plant_stress_roll: 0.85,
            plant_stress: 0.8,
        }
    }
}

/// Leaf reward formula.
#[derive(Clone, Debug, PartialEq)]
pub struct RewardTuning {
    /// Leaves every level awards.
    pub base: u32,
    /// Leaves added per level.
    pub per_level: u32,
    /// Leaves added on boss levels.
    pub boss_bonus: u32,
    /// Completion bonus as a share of the base reward.
    pub completion_share: f64,
    /// Perfect-run bonus as a share of the base reward.
    pub perfect_share: f64,
}

impl Default for RewardTuning {
    fn default() -> Self {
        Self {
            base: 50,
            per_level: 10,
            boss_bonus: 200,
            completion_share: 0.5,
            perfect_share: 0.3,
        }
    }
}

/// Objective thresholds.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectiveTuning {
    /// Survival time at level zero in seconds.
    pub base_survival_secs: u32,
    /// Survival seconds added per level.
    pub survival_secs_per_level: u32,
    /// Share of spawned pests that must be eliminated.
    pub elimination_share: f64,
    /// Plant health percentage that must be maintained.
    pub health_threshold: u32,
}

impl Default for ObjectiveTuning {
    fn default() -> Self {
        Self {
            base_survival_secs: 120,
            survival_secs_per_level: 5,
            elimination_share: 0.7,
            health_threshold: 50,
        }
    }
}

/// Lore discovery odds.
#[derive(Clone, Debug, PartialEq)]
pub struct LoreTuning {
    /// A roll above this attempts a discovery.
    pub discovery_roll: f64,
    /// Survival odds of a common entry in the rarity filter.
    pub common_weight: f64,
    /// Survival odds of an uncommon entry.
    pub uncommon_weight: f64,
    /// Survival odds of a rare entry.
    pub rare_weight: f64,
    /// Survival odds of a legendary entry.
    pub legendary_weight: f64,
}

impl LoreTuning {
    /// Probability that an entry of `rarity` survives the rarity filter.
    #[must_use]
    pub fn weight(&self, rarity: LoreRarity) -> f64 {
        match rarity {
            LoreRarity::Common => self.common_weight,
            LoreRarity::Uncommon => self.uncommon_weight,
            LoreRarity::Rare => self.rare_weight,
            LoreRarity::Legendary => self.legendary_weight,
        }
    }
}

impl Default for LoreTuning {
    fn default() -> Self {
        Self {
            discovery_roll: 0.3,
            common_weight: 1.0,
            uncommon_weight: 0.6,
            rare_weight: 0.3,
            legendary_weight: 0.1,
        }
    }
}
