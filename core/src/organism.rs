//! Seeds, plants and the records produced by breeding them.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::{GeneticProfile, TraitId};

/// Identifier assigned to an organism by the persistence collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrganismId(String);

impl OrganismId {
    /// Wraps the provided identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrowed string form of the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Rarity tier assigned from the quality score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    /// Quality score of 0.50 or below.
    Common,
    /// Quality score above 0.50, or any organism with a special trait.
    Rare,
    /// Quality score above 0.70.
    Legendary,
    /// Quality score above 0.85.
    Mythic,
}

impl Rarity {
    /// Quality score that must be exceeded to reach [`Rarity::Mythic`].
    pub const MYTHIC_THRESHOLD: f64 = 0.85;
    /// Quality score that must be exceeded to reach [`Rarity::Legendary`].
    pub const LEGENDARY_THRESHOLD: f64 = 0.70;
    /// Quality score that must be exceeded to reach [`Rarity::Rare`].
    pub const RARE_THRESHOLD: f64 = 0.50;

    /// Tier implied by the quality score alone.
    #[must_use]
    pub fn from_quality(score: f64) -> Self {
        if score > Self::MYTHIC_THRESHOLD {
            Self::Mythic
        } else if score > Self::LEGENDARY_THRESHOLD {
            Self::Legendary
        } else if score > Self::RARE_THRESHOLD {
            Self::Rare
        } else {
            Self::Common
        }
    }

    /// Tier for an offspring; a special trait lifts the result to at least rare.
    #[must_use]
    pub fn assign(score: f64, has_special_trait: bool) -> Self {
        let rarity = Self::from_quality(score);
        if has_special_trait {
            rarity.max(Self::Rare)
        } else {
            rarity
        }
    }
}

/// How a special trait modifies a trait value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoostKind {
    /// Multiplies the value by `1 + factor`.
    Scale(f64),
    /// Adds a flat amount.
    Add(f64),
}

/// Single trait modification granted by a special trait.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraitBoost {
    /// Trait that receives the boost.
    pub trait_id: TraitId,
    /// Kind and magnitude of the boost.
    pub kind: BoostKind,
}

impl TraitBoost {
    const fn scale(trait_id: TraitId, factor: f64) -> Self {
        Self {
            trait_id,
            kind: BoostKind::Scale(factor),
        }
    }

    const fn add(trait_id: TraitId, amount: f64) -> Self {
        Self {
            trait_id,
            kind: BoostKind::Add(amount),
        }
    }

    /// Applies the boost to a value, without clamping.
    #[must_use]
    pub fn apply(&self, value: f64) -> f64 {
        match self.kind {
            BoostKind::Scale(factor) => value * (1.0 + factor),
            BoostKind::Add(amount) => value + amount,
        }
    }
}

const RAPID_GROWTH_BOOSTS: [TraitBoost; 1] = [TraitBoost::scale(TraitId::GrowthSpeed, 0.3)];
const IRON_DEFENSE_BOOSTS: [TraitBoost; 1] = [TraitBoost::add(TraitId::PestResistance, 15.0)];
const DROUGHT_MASTER_BOOSTS: [TraitBoost; 1] =
    [TraitBoost::scale(TraitId::WaterEfficiency, 0.4)];
const BOUNTIFUL_HARVEST_BOOSTS: [TraitBoost; 1] =
    [TraitBoost::add(TraitId::YieldPotential, 25.0)];
const ADAPTABLE_BOOSTS: [TraitBoost; 2] = [
    TraitBoost::scale(TraitId::GrowthSpeed, 0.15),
    TraitBoost::add(TraitId::PestResistance, 8.0),
];
const RESILIENT_BOOSTS: [TraitBoost; 2] = [
    TraitBoost::add(TraitId::PestResistance, 12.0),
    TraitBoost::scale(TraitId::WaterEfficiency, 0.2),
];

/// Named bonus occasionally attached to an offspring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialTrait {
    /// Faster growth.
    RapidGrowth,
    /// Hardened against pests.
    IronDefense,
    /// Thrives with little water.
    DroughtMaster,
    /// Larger harvests.
    BountifulHarvest,
    /// Balanced growth and resistance.
    Adaptable,
    /// Balanced resistance and water efficiency.
    Resilient,
}

impl SpecialTrait {
    /// Catalog the breeding engine draws from, uniformly.
    pub const ALL: [SpecialTrait; 6] = [
        SpecialTrait::RapidGrowth,
        SpecialTrait::IronDefense,
        SpecialTrait::DroughtMaster,
        SpecialTrait::BountifulHarvest,
        SpecialTrait::Adaptable,
        SpecialTrait::Resilient,
    ];

    /// Trait modifications granted by the special trait.
    #[must_use]
    pub fn boosts(self) -> &'static [TraitBoost] {
        match self {
            Self::RapidGrowth => &RAPID_GROWTH_BOOSTS,
            Self::IronDefense => &IRON_DEFENSE_BOOSTS,
            Self::DroughtMaster => &DROUGHT_MASTER_BOOSTS,
            Self::BountifulHarvest => &BOUNTIFUL_HARVEST_BOOSTS,
            Self::Adaptable => &ADAPTABLE_BOOSTS,
            Self::Resilient => &RESILIENT_BOOSTS,
        }
    }

    /// Adjective prefixed to the strain name of an offspring carrying the trait.
    #[must_use]
    pub const fn adjective(self) -> &'static str {
        match self {
            Self::RapidGrowth => "Swift",
            Self::IronDefense => "Armored",
            Self::DroughtMaster => "Arid",
            Self::BountifulHarvest => "Bountiful",
            Self::Adaptable => "Versatile",
            Self::Resilient => "Resilient",
        }
    }
}

/// Breeding generation, starting at one for wild or purchased seeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Generation(NonZeroU32);

impl Generation {
    /// Generation of seeds that have never been bred.
    pub const FIRST: Generation = Generation(NonZeroU32::MIN);

    /// Wraps a raw generation number; zero reads as the first generation.
    #[must_use]
    pub fn from_raw(value: u32) -> Self {
        NonZeroU32::new(value).map_or(Self::FIRST, Self)
    }

    /// Generation of an offspring of the two parents.
    #[must_use]
    pub fn offspring_of(a: Generation, b: Generation) -> Self {
        Self(a.0.max(b.0).saturating_add(1))
    }

    /// Numeric representation.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0.get()
    }
}

impl Default for Generation {
    fn default() -> Self {
        Self::FIRST
    }
}

/// References from an offspring back to the parents it was bred from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentRefs {
    /// Identifier of the first parent, when it was persisted.
    pub parent1_id: Option<OrganismId>,
    /// Identifier of the second parent, when it was persisted.
    pub parent2_id: Option<OrganismId>,
    /// Strain name of the first parent.
    pub parent1_name: String,
    /// Strain name of the second parent.
    pub parent2_name: String,
}

/// A seed or plant together with its genetics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Organism {
    /// Persistence identifier; offspring carry none until stored.
    pub id: Option<OrganismId>,
    /// Display name of the strain.
    pub strain_name: String,
    /// Trait values carried by the organism.
    pub genetics: GeneticProfile,
    /// Rarity tier.
    pub rarity: Rarity,
    /// Breeding generation.
    pub generation: Generation,
    /// Special trait, if one was rolled.
    pub special_trait: Option<SpecialTrait>,
    /// Parents this organism was bred from.
    pub parents: Option<ParentRefs>,
}

impl Organism {
    /// Creates a first-generation common organism with the given genetics.
    #[must_use]
    pub fn new(strain_name: impl Into<String>, genetics: GeneticProfile) -> Self {
        Self {
            id: None,
            strain_name: strain_name.into(),
            genetics,
            rarity: Rarity::Common,
            generation: Generation::FIRST,
            special_trait: None,
            parents: None,
        }
    }

    /// Returns the organism with a persistence identifier attached.
    #[must_use]
    pub fn with_id(mut self, id: OrganismId) -> Self {
        self.id = Some(id);
        self
    }

    /// Returns the organism with the provided rarity.
    #[must_use]
    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    /// Returns the organism with the provided generation.
    #[must_use]
    pub fn with_generation(mut self, generation: Generation) -> Self {
        self.generation = generation;
        self
    }
}

/// Outcome of crossing two organisms.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BreedingResult {
    /// Newly bred organism; parents are left untouched.
    pub offspring: Organism,
    /// Weighted, normalised genetic strength that produced the rarity tier.
    pub quality_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rarity_thresholds_are_exclusive() {
        assert_eq!(Rarity::from_quality(0.50), Rarity::Common);
        assert_eq!(Rarity::from_quality(0.5001), Rarity::Rare);
        assert_eq!(Rarity::from_quality(0.70), Rarity::Rare);
        assert_eq!(Rarity::from_quality(0.71), Rarity::Legendary);
        assert_eq!(Rarity::from_quality(0.85), Rarity::Legendary);
        assert_eq!(Rarity::from_quality(0.86), Rarity::Mythic);
    }

    #[test]
    fn special_trait_lifts_common_to_rare() {
        assert_eq!(Rarity::assign(0.1, true), Rarity::Rare);
        assert_eq!(Rarity::assign(0.1, false), Rarity::Common);
        assert_eq!(Rarity::assign(0.9, true), Rarity::Mythic);
    }

    #[test]
    fn rarity_never_drops_as_quality_rises() {
        for has_special in [false, true] {
            let mut previous = Rarity::assign(0.0, has_special);
            for step in 1..=1_000 {
                let score = f64::from(step) / 1_000.0;
                let current = Rarity::assign(score, has_special);
                assert!(current >= previous, "rarity fell at {score}");
                previous = current;
            }
        }
    }

    #[test]
    fn generation_follows_oldest_parent() {
        let a = Generation::from_raw(1);
        let b = Generation::from_raw(4);
        assert_eq!(Generation::offspring_of(a, b).get(), 5);
        assert_eq!(Generation::from_raw(0), Generation::FIRST);
    }

    #[test]
    fn boosts_scale_or_add() {
        let [growth] = SpecialTrait::RapidGrowth.boosts() else {
            panic!("rapid growth boosts a single trait");
        };
        assert!((growth.apply(2.0) - 2.6).abs() < 1e-12);

        let [defense] = SpecialTrait::IronDefense.boosts() else {
            panic!("iron defense boosts a single trait");
        };
        assert!((defense.apply(10.0) - 25.0).abs() < 1e-12);
    }
}
