//! Read-only reference catalogs owned by the content backend.

use serde::{Deserialize, Serialize};

use crate::{Season, Weather};

/// Pest archetype that can appear in levels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PestDefinition {
    /// Catalog identifier.
    pub id: String,
    /// Gameplay archetype, e.g. `aphid` or `spider_mite`.
    #[serde(rename = "type")]
    pub pest_type: String,
    /// Base hit points at difficulty multiplier one.
    pub health: f64,
    /// Base movement speed.
    pub speed: f64,
    /// Base damage dealt per second.
    pub damage_per_second: f64,
    /// First level the pest may appear on.
    pub unlock_level: u32,
}

/// Standard boss that may guard boss levels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BossDefinition {
    /// Catalog identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// First level the boss may appear on.
    pub level_appearance: u32,
}

/// Boss tied to a season or weather pattern.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalBossDefinition {
    /// Catalog identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// First level the boss may appear on.
    pub min_level: u32,
    /// Seasons the boss appears in; empty means any season.
    #[serde(default)]
    pub seasons: Vec<Season>,
    /// Weather the boss appears in; empty means any weather.
    #[serde(default)]
    pub weather: Vec<Weather>,
}

impl EnvironmentalBossDefinition {
    /// Reports whether the boss may appear under the provided conditions.
    ///
    /// A season gate only passes when the player's season is known.
    #[must_use]
    pub fn is_eligible(&self, level: u32, season: Option<Season>, weather: Weather) -> bool {
        let season_ok = self.seasons.is_empty()
            || season.is_some_and(|season| self.seasons.contains(&season));
        let weather_ok = self.weather.is_empty() || self.weather.contains(&weather);
        self.min_level <= level && season_ok && weather_ok
    }
}

/// Rarity of a lore entry, controlling how often it is discovered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoreRarity {
    /// Frequently found.
    Common,
    /// Found now and then.
    Uncommon,
    /// Seldom found.
    Rare,
    /// Almost never found.
    Legendary,
}

/// Collectible piece of world lore.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoreElement {
    /// Catalog identifier.
    pub id: String,
    /// Title shown on discovery.
    pub title: String,
    /// Discovery rarity.
    pub rarity: LoreRarity,
    /// First level the entry may be discovered on.
    pub unlock_level: u32,
}

/// Materialised snapshot of every catalog a generation call reads.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalogs {
    /// Pest archetypes.
    #[serde(default)]
    pub pests: Vec<PestDefinition>,
    /// Standard bosses.
    #[serde(default)]
    pub bosses: Vec<BossDefinition>,
    /// Season and weather bound bosses.
    #[serde(default)]
    pub environmental_bosses: Vec<EnvironmentalBossDefinition>,
    /// Lore entries.
    #[serde(default)]
    pub lore: Vec<LoreElement>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frost_wraith() -> EnvironmentalBossDefinition {
        EnvironmentalBossDefinition {
            id: "frost_wraith".to_owned(),
            name: "Frost Wraith".to_owned(),
            min_level: 6,
            seasons: vec![Season::Winter],
            weather: vec![Weather::Fog, Weather::Storm],
        }
    }

    #[test]
    fn environmental_boss_respects_every_gate() {
        let boss = frost_wraith();
        assert!(boss.is_eligible(6, Some(Season::Winter), Weather::Fog));
        assert!(!boss.is_eligible(5, Some(Season::Winter), Weather::Fog));
        assert!(!boss.is_eligible(9, Some(Season::Summer), Weather::Fog));
        assert!(!boss.is_eligible(9, None, Weather::Fog));
        assert!(!boss.is_eligible(9, Some(Season::Winter), Weather::Clear));
    }

    #[test]
    fn ungated_environmental_boss_matches_anything_past_min_level() {
        let boss = EnvironmentalBossDefinition {
            seasons: Vec::new(),
            weather: Vec::new(),
            ..frost_wraith()
        };
        assert!(boss.is_eligible(6, None, Weather::Clear));
    }
}
