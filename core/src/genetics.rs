//! Trait Model: the registry of genetic traits and per-organism trait values.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::ContentError;

const WEIGHT_TOLERANCE: f64 = 1e-9;

/// Genetic traits understood by the breeding engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitId {
    /// How quickly the plant matures.
    GrowthSpeed,
    /// Innate resistance against pest damage.
    PestResistance,
    /// Water consumed per growth step; higher is more efficient.
    WaterEfficiency,
    /// Expected harvest size.
    YieldPotential,
    /// Cannabinoid potency.
    ThcContent,
    /// Hue of the foliage in degrees.
    ColorVariation,
    /// Days required to flower.
    FloweringTime,
}

impl TraitId {
    /// Every trait in canonical order.
    pub const ALL: [TraitId; 7] = [
        TraitId::GrowthSpeed,
        TraitId::PestResistance,
        TraitId::WaterEfficiency,
        TraitId::YieldPotential,
        TraitId::ThcContent,
        TraitId::ColorVariation,
        TraitId::FloweringTime,
    ];

    /// Wire name of the trait.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::GrowthSpeed => "growth_speed",
            Self::PestResistance => "pest_resistance",
            Self::WaterEfficiency => "water_efficiency",
            Self::YieldPotential => "yield_potential",
            Self::ThcContent => "thc_content",
            Self::ColorVariation => "color_variation",
            Self::FloweringTime => "flowering_time",
        }
    }

    /// Resolves a wire name back into a trait identifier.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.name() == name)
    }
}

impl fmt::Display for TraitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a trait is expressed when two parents are crossed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InheritanceMode {
    /// Either the larger or the smaller parental value, on a coin flip.
    Dominant,
    /// Usually the parental mean, occasionally the smaller value.
    Recessive,
    /// Parental mean boosted by hybrid vigor.
    Additive,
    /// Plain parental mean.
    CoDominant,
}

/// Closed interval a trait value must stay within.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraitRange {
    min: f64,
    max: f64,
}

impl TraitRange {
    /// Creates a new range. Callers validate ordering through [`TraitRegistry::new`].
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Inclusive lower bound.
    #[must_use]
    pub const fn min(&self) -> f64 {
        self.min
    }

    /// Inclusive upper bound.
    #[must_use]
    pub const fn max(&self) -> f64 {
        self.max
    }

    /// Width of the range.
    #[must_use]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Value read for a trait an organism does not carry.
    #[must_use]
    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// Clamps the provided value into the range.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Reports whether the value lies inside the range.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Static description of a single genetic trait.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraitDefinition {
    id: TraitId,
    range: TraitRange,
    inheritance: InheritanceMode,
    mutation_chance: f64,
    quality_weight: f64,
}

impl TraitDefinition {
    /// Creates a new trait definition.
    #[must_use]
    pub const fn new(
        id: TraitId,
        range: TraitRange,
        inheritance: InheritanceMode,
        mutation_chance: f64,
        quality_weight: f64,
    ) -> Self {
        Self {
            id,
            range,
            inheritance,
            mutation_chance,
            quality_weight,
        }
    }

    /// Trait this definition describes.
    #[must_use]
    pub const fn id(&self) -> TraitId {
        self.id
    }

    /// Declared value range.
    #[must_use]
    pub const fn range(&self) -> TraitRange {
        self.range
    }

    /// Inheritance mode used by the mode-based resolver.
    #[must_use]
    pub const fn inheritance(&self) -> InheritanceMode {
        self.inheritance
    }

    /// Per-trait mutation probability.
    #[must_use]
    pub const fn mutation_chance(&self) -> f64 {
        self.mutation_chance
    }

    /// Contribution of the normalised value to the quality score.
    #[must_use]
    pub const fn quality_weight(&self) -> f64 {
        self.quality_weight
    }
}

/// Ordered set of trait definitions used by one breeding context.
///
/// Iteration order is declaration order; the breeding engine draws random
/// numbers in that order, so it is part of the deterministic contract.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraitRegistry {
    definitions: Vec<TraitDefinition>,
}

impl TraitRegistry {
    /// Validates and wraps a list of definitions.
    ///
    /// Ranges must be finite with `0 <= min < max`, mutation chances must lie
    /// in `[0, 1]`, quality weights must be non-negative and sum to one, and
    /// every trait may appear at most once.
    pub fn new(definitions: Vec<TraitDefinition>) -> Result<Self, ContentError> {
        if definitions.is_empty() {
            return Err(ContentError::validation("trait registry is empty"));
        }

        let mut weight_total = 0.0;
        for (index, definition) in definitions.iter().enumerate() {
            let range = definition.range();
            if !range.min().is_finite() || !range.max().is_finite() {
                return Err(ContentError::validation(format!(
                    "trait {} has a non-finite range",
                    definition.id()
                )));
            }
            if range.min() < 0.0 || range.min() >= range.max() {
                return Err(ContentError::validation(format!(
                    "trait {} has an invalid range [{}, {}]",
                    definition.id(),
                    range.min(),
                    range.max()
                )));
            }
            if !(0.0..=1.0).contains(&definition.mutation_chance()) {
                return Err(ContentError::validation(format!(
                    "trait {} mutation chance {} is outside [0, 1]",
                    definition.id(),
                    definition.mutation_chance()
                )));
            }
            let weight = definition.quality_weight();
            if weight.is_nan() || weight < 0.0 {
                return Err(ContentError::validation(format!(
                    "trait {} has a negative quality weight",
                    definition.id()
                )));
            }
            if definitions[..index]
                .iter()
                .any(|earlier| earlier.id() == definition.id())
            {
                return Err(ContentError::validation(format!(
                    "trait {} is declared twice",
                    definition.id()
                )));
            }
            weight_total += definition.quality_weight();
        }

        if (weight_total - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(ContentError::validation(format!(
                "quality weights sum to {weight_total}, expected 1.0"
            )));
        }

        Ok(Self { definitions })
    }

    /// Traits used by authoritative seed breeding.
    #[must_use]
    pub fn seed_bank() -> Self {
        Self {
            definitions: vec![
                TraitDefinition::new(
                    TraitId::GrowthSpeed,
                    TraitRange::new(0.5, 3.0),
                    InheritanceMode::Additive,
                    0.12,
                    0.25,
                ),
                TraitDefinition::new(
                    TraitId::PestResistance,
                    TraitRange::new(0.0, 100.0),
                    InheritanceMode::Dominant,
                    0.15,
                    0.25,
                ),
                TraitDefinition::new(
                    TraitId::WaterEfficiency,
                    TraitRange::new(0.5, 2.5),
                    InheritanceMode::Recessive,
                    0.18,
                    0.2,
                ),
                TraitDefinition::new(
                    TraitId::YieldPotential,
                    TraitRange::new(0.0, 150.0),
                    InheritanceMode::Additive,
                    0.10,
                    0.3,
                ),
            ],
        }
    }

    /// Seven-trait set used by the genetics lab.
    #[must_use]
    pub fn genetics_lab() -> Self {
        const WEIGHT: f64 = 1.0 / 7.0;
        Self {
            definitions: vec![
                TraitDefinition::new(
                    TraitId::PestResistance,
                    TraitRange::new(0.0, 100.0),
                    InheritanceMode::Dominant,
                    0.15,
                    WEIGHT,
                ),
                TraitDefinition::new(
                    TraitId::GrowthSpeed,
                    TraitRange::new(0.5, 3.0),
                    InheritanceMode::Additive,
                    0.12,
                    WEIGHT,
                ),
                TraitDefinition::new(
                    TraitId::WaterEfficiency,
                    TraitRange::new(0.5, 2.0),
                    InheritanceMode::Recessive,
                    0.18,
                    WEIGHT,
                ),
                TraitDefinition::new(
                    TraitId::YieldPotential,
                    TraitRange::new(50.0, 200.0),
                    InheritanceMode::Additive,
                    0.10,
                    WEIGHT,
                ),
                TraitDefinition::new(
                    TraitId::ThcContent,
                    TraitRange::new(5.0, 30.0),
                    InheritanceMode::Dominant,
                    0.20,
                    WEIGHT,
                ),
                TraitDefinition::new(
                    TraitId::ColorVariation,
                    TraitRange::new(0.0, 360.0),
                    InheritanceMode::CoDominant,
                    0.25,
                    WEIGHT,
                ),
                TraitDefinition::new(
                    TraitId::FloweringTime,
                    TraitRange::new(40.0, 90.0),
                    InheritanceMode::Recessive,
                    0.08,
                    WEIGHT,
                ),
            ],
        }
    }

    /// Looks up the definition of a trait.
    #[must_use]
    pub fn get(&self, id: TraitId) -> Option<&TraitDefinition> {
        self.definitions
            .iter()
            .find(|definition| definition.id() == id)
    }

    /// Iterator over the definitions in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &TraitDefinition> {
        self.definitions.iter()
    }

    /// Number of registered traits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Reports whether the registry holds no traits.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Mapping of trait to numeric value carried by an organism.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeneticProfile {
    values: BTreeMap<TraitId, f64>,
}

impl GeneticProfile {
    /// Creates an empty profile.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the profile with the trait set to `value`.
    #[must_use]
    pub fn with(mut self, id: TraitId, value: f64) -> Self {
        self.set(id, value);
        self
    }

    /// Stores a trait value, replacing any previous one.
    pub fn set(&mut self, id: TraitId, value: f64) {
        let _ = self.values.insert(id, value);
    }

    /// Raw stored value, if the organism carries the trait.
    #[must_use]
    pub fn get(&self, id: TraitId) -> Option<f64> {
        self.values.get(&id).copied()
    }

    /// Value read for breeding: the stored value, or the range midpoint when
    /// the organism does not carry the trait.
    #[must_use]
    pub fn value_of(&self, definition: &TraitDefinition) -> f64 {
        self.get(definition.id())
            .unwrap_or_else(|| definition.range().midpoint())
    }

    /// Iterator over stored traits in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (TraitId, f64)> + '_ {
        self.values.iter().map(|(id, value)| (*id, *value))
    }

    /// Number of stored traits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Reports whether no trait is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(TraitId, f64)> for GeneticProfile {
    fn from_iter<I: IntoIterator<Item = (TraitId, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_registries_validate() {
        let seed_bank = TraitRegistry::seed_bank();
        let lab = TraitRegistry::genetics_lab();
        assert_eq!(
            TraitRegistry::new(seed_bank.iter().copied().collect()).as_ref(),
            Ok(&seed_bank)
        );
        assert_eq!(
            TraitRegistry::new(lab.iter().copied().collect()).as_ref(),
            Ok(&lab)
        );
        assert_eq!(seed_bank.len(), 4);
        assert_eq!(lab.len(), 7);
    }

    #[test]
    fn registry_rejects_weights_that_do_not_sum_to_one() {
        let definitions = vec![TraitDefinition::new(
            TraitId::GrowthSpeed,
            TraitRange::new(0.5, 3.0),
            InheritanceMode::Additive,
            0.1,
            0.5,
        )];
        assert!(matches!(
            TraitRegistry::new(definitions),
            Err(ContentError::Validation(_))
        ));
    }

    #[test]
    fn registry_rejects_duplicate_traits() {
        let definition = TraitDefinition::new(
            TraitId::ThcContent,
            TraitRange::new(5.0, 30.0),
            InheritanceMode::Dominant,
            0.2,
            0.5,
        );
        assert!(TraitRegistry::new(vec![definition, definition]).is_err());
    }

    #[test]
    fn registry_rejects_inverted_range() {
        let definitions = vec![TraitDefinition::new(
            TraitId::FloweringTime,
            TraitRange::new(90.0, 40.0),
            InheritanceMode::Recessive,
            0.08,
            1.0,
        )];
        assert!(TraitRegistry::new(definitions).is_err());
    }

    #[test]
    fn missing_trait_reads_as_range_midpoint() {
        let registry = TraitRegistry::genetics_lab();
        let thc = registry.get(TraitId::ThcContent).expect("thc registered");
        let profile = GeneticProfile::new().with(TraitId::GrowthSpeed, 2.0);
        assert!((profile.value_of(thc) - 17.5).abs() < f64::EPSILON);

        let growth = registry.get(TraitId::GrowthSpeed).expect("growth registered");
        assert!((profile.value_of(growth) - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn trait_names_resolve_both_ways() {
        for id in TraitId::ALL {
            assert_eq!(TraitId::from_name(id.name()), Some(id));
        }
        assert_eq!(TraitId::from_name("max_health_bonus"), None);
    }

    #[test]
    fn profile_serialises_as_flat_object() {
        let profile = GeneticProfile::new()
            .with(TraitId::PestResistance, 30.0)
            .with(TraitId::GrowthSpeed, 1.5);
        let json = serde_json::to_string(&profile).expect("serialize");
        assert_eq!(json, r#"{"growth_speed":1.5,"pest_resistance":30.0}"#);
    }
}
