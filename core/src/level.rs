//! Procedurally generated level descriptors and the context they are built from.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::LoreRarity;

/// Calendar season the player is currently in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    /// Mild and wet.
    Spring,
    /// Hot and dry.
    Summer,
    /// Wet and windy.
    Autumn,
    /// Cold and foggy.
    Winter,
}

impl Season {
    /// Weather pool used when a level's weather is biased toward the season.
    #[must_use]
    pub const fn weather_pool(self) -> &'static [Weather] {
        match self {
            Self::Spring => &[Weather::Rain, Weather::Clear, Weather::Fog],
            Self::Summer => &[Weather::Heatwave, Weather::Clear, Weather::Storm],
            Self::Autumn => &[Weather::Rain, Weather::Wind, Weather::Fog, Weather::AcidRain],
            Self::Winter => &[Weather::Fog, Weather::Wind, Weather::Storm],
        }
    }

    /// Every season in calendar order.
    pub const ALL: [Season; 4] = [Self::Spring, Self::Summer, Self::Autumn, Self::Winter];

    /// Lowercase name used on the wire.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Autumn => "autumn",
            Self::Winter => "winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Season {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|season| season.name().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| format!("unknown season `{value}`"))
    }
}

/// Weather active for the duration of a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    /// No weather effects.
    Clear,
    /// Rain showers.
    Rain,
    /// Gusty wind.
    Wind,
    /// Extreme heat.
    Heatwave,
    /// Thunderstorm.
    Storm,
    /// Low visibility.
    Fog,
    /// Corrosive rain that damages plants.
    AcidRain,
}

/// Player state supplied alongside a level request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerContext {
    /// Current season, when the client reports one.
    #[serde(default)]
    pub season: Option<Season>,
}

impl PlayerContext {
    /// Context for a player in the given season.
    #[must_use]
    pub const fn in_season(season: Season) -> Self {
        Self {
            season: Some(season),
        }
    }
}

/// Single pest scheduled to spawn during a level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PestSpawn {
    /// Catalog identifier of the pest.
    pub pest_id: String,
    /// Gameplay archetype of the pest.
    #[serde(rename = "type")]
    pub pest_type: String,
    /// Scaled hit points.
    pub health: u32,
    /// Scaled movement speed.
    pub speed: f64,
    /// Scaled damage per second.
    pub damage: f64,
    /// Delay after level start before the pest spawns.
    pub spawn_delay_ms: u32,
}

/// Whether a boss came from the standard or the environmental catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BossKind {
    /// Standard boss gated by level only.
    Standard,
    /// Boss gated by level, season and weather.
    Environmental,
}

/// Boss guarding a boss level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BossSpec {
    /// Catalog identifier of the boss.
    pub boss_id: String,
    /// Display name of the boss.
    pub name: String,
    /// Catalog the boss was drawn from.
    pub kind: BossKind,
    /// Hit point multiplier.
    pub health_multiplier: f64,
    /// Movement speed multiplier.
    pub speed_multiplier: f64,
    /// Damage multiplier.
    pub damage_multiplier: f64,
}

/// Environmental effect or special rule active during a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKind {
    /// Reduced visibility from fog.
    DenseFog,
    /// Periodic acid damage to plants.
    AcidDamage,
    /// Wind pushing pests off course.
    StrongWind,
    /// Accelerated water loss.
    Drought,
    /// Burst of extra spawns.
    PestFrenzy,
    /// Increased spawn rate for the whole level.
    PestSpawnBoost,
    /// Faster pests.
    SpeedBoost,
    /// Plant starts with reduced health.
    PlantStress,
}

/// Condition attached to a level with its magnitude and player-facing text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelCondition {
    /// Condition type.
    #[serde(rename = "type")]
    pub kind: ConditionKind,
    /// Magnitude; multipliers above one strengthen pests, below one weaken the plant.
    pub value: f64,
    /// Human readable description shown to the player.
    pub description: String,
}

/// Leaf currency awarded for the level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rewards {
    /// Leaves awarded for playing the level.
    pub base_leaf: u32,
    /// Extra leaves for completing it.
    pub completion_bonus: u32,
    /// Extra leaves for a perfect run.
    pub perfect_bonus: u32,
}

/// Goal the player must meet to clear a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Objective {
    /// Keep the plant alive for the duration.
    Survive {
        /// Required survival time in seconds.
        duration: u32,
    },
    /// Eliminate a number of pests.
    EliminatePests {
        /// Required number of eliminations.
        count: u32,
    },
    /// Keep plant health above a threshold.
    MaintainHealth {
        /// Minimum health percentage.
        threshold: u32,
    },
}

/// Lore entry discovered by playing the level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoreReference {
    /// Catalog identifier of the lore entry.
    pub lore_id: String,
    /// Title of the entry.
    pub title: String,
    /// Rarity of the entry.
    pub rarity: LoreRarity,
}

/// Complete description of one procedurally generated level.
///
/// Created fresh per level-start request and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelDescriptor {
    /// Level number, starting at one.
    pub level_number: u32,
    /// Multiplier applied to pest statistics.
    pub difficulty_multiplier: f64,
    /// Player-facing difficulty on a one to ten scale.
    pub difficulty_rating: f64,
    /// Whether the level is a boss level.
    pub is_boss_level: bool,
    /// Pest spawns in generation order.
    pub pests: Vec<PestSpawn>,
    /// Boss guarding the level, present only on boss levels.
    pub boss: Option<BossSpec>,
    /// Active weather.
    pub weather: Weather,
    /// Starting hour of the level on a 24 hour clock.
    pub time_of_day: u8,
    /// Environmental effects followed by special conditions.
    pub special_conditions: Vec<LevelCondition>,
    /// Leaf rewards.
    pub rewards: Rewards,
    /// Objectives to clear the level.
    pub objectives: Vec<Objective>,
    /// Lore entry discovered on this level, if any.
    pub lore: Option<LoreReference>,
}

impl LevelDescriptor {
    /// Number of pests scheduled to spawn.
    #[must_use]
    pub fn pest_count(&self) -> usize {
        self.pests.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn objectives_serialise_with_type_tag() {
        let json = serde_json::to_value(Objective::EliminatePests { count: 4 }).expect("json");
        assert_eq!(json, serde_json::json!({ "type": "eliminate_pests", "count": 4 }));
    }

    #[test]
    fn player_context_tolerates_missing_season() {
        let context: PlayerContext = serde_json::from_str("{}").expect("parse");
        assert_eq!(context, PlayerContext::default());

        let context: PlayerContext =
            serde_json::from_str(r#"{ "season": "summer" }"#).expect("parse");
        assert_eq!(context, PlayerContext::in_season(Season::Summer));
    }

    #[test]
    fn every_season_offers_weather() {
        for season in Season::ALL {
            assert!(!season.weather_pool().is_empty());
        }
    }

    #[test]
    fn seasons_parse_from_names() {
        assert_eq!("Winter".parse::<Season>(), Ok(Season::Winter));
        assert!("monsoon".parse::<Season>().is_err());
    }
}
