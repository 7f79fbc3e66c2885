#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Breeding engine that crosses two organisms into a new strain.
//!
//! Both inheritance resolvers observed in the game live here behind
//! [`InheritanceResolver`], so preview and authoritative breeding can never
//! drift apart silently. Every random draw comes from the caller's [`Rng`].

mod naming;
mod preview;
mod resolver;

use grow_defence_core::{
    BreedingResult, ContentError, GeneticProfile, Generation, Organism, ParentRefs, Rarity,
    SpecialTrait, TraitDefinition, TraitRegistry,
};
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub use preview::{BreedingPreview, TraitPrediction};

/// Strategy that turns two parental values into an inherited value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InheritanceResolver {
    /// Expresses each trait according to its [`grow_defence_core::InheritanceMode`].
    ModeBased,
    /// Picks either parent outright or blends them, ignoring inheritance modes.
    WeightedBlend,
}

/// Tuning for the weighted-blend resolver.
#[derive(Clone, Debug, PartialEq)]
pub struct BlendTuning {
    /// Probability of copying the first parent; the same probability copies the second.
    pub parent_pick_chance: f64,
    /// Maximum relative deviation applied to the blended mean.
    pub variance: f64,
    /// Flat hybrid vigor applied to every blended trait before mutation.
    pub hybrid_vigor: f64,
}

impl Default for BlendTuning {
    fn default() -> Self {
        Self {
            parent_pick_chance: 0.35,
            variance: 0.075,
            hybrid_vigor: 0.08,
        }
    }
}

/// Multiplier window applied to additive traits by the mode-based resolver.
#[derive(Clone, Debug, PartialEq)]
pub struct VigorRange {
    /// Lower multiplier bound.
    pub min: f64,
    /// Upper multiplier bound.
    pub max: f64,
}

impl Default for VigorRange {
    fn default() -> Self {
        Self { min: 1.1, max: 1.3 }
    }
}

/// Source of the per-trait mutation probability.
#[derive(Clone, Debug, PartialEq)]
pub enum MutationChance {
    /// Use each trait's own mutation chance.
    PerTrait,
    /// One chance for every trait, growing with player level.
    Global {
        /// Chance at player level zero.
        base: f64,
        /// Chance added per player level.
        per_player_level: f64,
    },
}

/// Mutation probability and strength.
#[derive(Clone, Debug, PartialEq)]
pub struct MutationTuning {
    /// Where the mutation probability comes from.
    pub chance: MutationChance,
    /// Smallest relative change a mutation applies.
    pub strength_min: f64,
    /// Largest relative change a mutation applies.
    pub strength_max: f64,
}

/// Complete tuning surface of the breeding engine.
#[derive(Clone, Debug, PartialEq)]
pub struct BreedingConfig {
    /// Resolver used for every trait.
    pub resolver: InheritanceResolver,
    /// Traits bred, in draw order.
    pub registry: TraitRegistry,
    /// Weighted-blend parameters.
    pub blend: BlendTuning,
    /// Hybrid vigor window for additive traits under the mode-based resolver.
    pub additive_vigor: VigorRange,
    /// Mutation parameters.
    pub mutation: MutationTuning,
    /// Base probability of rolling a special trait.
    pub special_trait_chance: f64,
    /// Probability of fusing the parent names instead of joining them with `x`.
    pub fusion_name_chance: f64,
}

impl BreedingConfig {
    /// Configuration used for persisted breeding results.
    #[must_use]
    pub fn authoritative() -> Self {
        Self {
            resolver: InheritanceResolver::WeightedBlend,
            registry: TraitRegistry::seed_bank(),
            blend: BlendTuning::default(),
            additive_vigor: VigorRange::default(),
            mutation: MutationTuning {
                chance: MutationChance::Global {
                    base: 0.15,
                    per_player_level: 0.005,
                },
                strength_min: -0.1,
                strength_max: 0.15,
            },
            special_trait_chance: 0.12,
            fusion_name_chance: 0.5,
        }
    }

    /// Configuration used by the seven-trait genetics lab.
    #[must_use]
    pub fn genetics_lab() -> Self {
        Self {
            resolver: InheritanceResolver::ModeBased,
            registry: TraitRegistry::genetics_lab(),
            mutation: MutationTuning {
                chance: MutationChance::PerTrait,
                strength_min: -0.15,
                strength_max: 0.15,
            },
            ..Self::authoritative()
        }
    }

    /// Returns the configuration with the resolver swapped.
    #[must_use]
    pub fn with_resolver(mut self, resolver: InheritanceResolver) -> Self {
        self.resolver = resolver;
        self
    }

    fn validate(&self) -> Result<(), ContentError> {
        let probabilities = [
            ("blend.parent_pick_chance", self.blend.parent_pick_chance * 2.0),
            ("special_trait_chance", self.special_trait_chance),
            ("fusion_name_chance", self.fusion_name_chance),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(ContentError::validation(format!(
                    "{name} must keep probabilities within [0, 1]"
                )));
            }
        }

        let windows = [
            ("blend.variance", -self.blend.variance, self.blend.variance),
            (
                "additive_vigor",
                self.additive_vigor.min,
                self.additive_vigor.max,
            ),
            (
                "mutation strength",
                self.mutation.strength_min,
                self.mutation.strength_max,
            ),
        ];
        for (name, min, max) in windows {
            if !min.is_finite() || !max.is_finite() || min > max {
                return Err(ContentError::validation(format!(
                    "{name} window [{min}, {max}] is invalid"
                )));
            }
        }

        if !self.blend.hybrid_vigor.is_finite() {
            return Err(ContentError::validation("blend.hybrid_vigor must be finite"));
        }
        if let MutationChance::Global {
            base,
            per_player_level,
        } = self.mutation.chance
        {
            if !base.is_finite() || !per_player_level.is_finite() {
                return Err(ContentError::validation(
                    "global mutation chance must be finite",
                ));
            }
        }
        Ok(())
    }
}

impl Default for BreedingConfig {
    fn default() -> Self {
        Self::authoritative()
    }
}

/// Research upgrades that bias breeding outcomes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchBonuses {
    /// Added to the mutation chance.
    pub genetics: f64,
    /// Added to the flat hybrid vigor of the weighted-blend resolver.
    pub breeding: f64,
    /// Added to the special trait chance.
    pub special_traits: f64,
}

/// Player state a cross is performed under.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BreedingContext {
    /// Player level; raises the global mutation chance.
    pub player_level: u32,
    /// Research upgrades.
    pub research: ResearchBonuses,
}

impl Default for BreedingContext {
    fn default() -> Self {
        Self {
            player_level: 1,
            research: ResearchBonuses::default(),
        }
    }
}

/// Pure system that crosses organisms.
#[derive(Clone, Debug)]
pub struct BreedingEngine {
    config: BreedingConfig,
}

impl Default for BreedingEngine {
    fn default() -> Self {
        Self {
            config: BreedingConfig::authoritative(),
        }
    }
}

impl BreedingEngine {
    /// Creates an engine after checking that every probability and window is usable.
    pub fn new(config: BreedingConfig) -> Result<Self, ContentError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &BreedingConfig {
        &self.config
    }

    /// Crosses two parents into an offspring.
    ///
    /// Parents are only read. The result is a pure function of the inputs and
    /// the random stream.
    pub fn breed<R>(
        &self,
        parent1: &Organism,
        parent2: &Organism,
        context: &BreedingContext,
        rng: &mut R,
    ) -> Result<BreedingResult, ContentError>
    where
        R: Rng + ?Sized,
    {
        validate_parent(parent1, "parent1")?;
        validate_parent(parent2, "parent2")?;
        validate_research(&context.research)?;

        let registry = &self.config.registry;
        let mut genetics = GeneticProfile::new();
        for definition in registry.iter() {
            let first = parent1.genetics.value_of(definition);
            let second = parent2.genetics.value_of(definition);
            let inherited = self.inherit(definition, first, second, context, rng);
            let mutated = self.mutate(definition, inherited, context, rng);
            genetics.set(definition.id(), definition.range().clamp(mutated));
        }

        let special_trait = self.roll_special_trait(context, rng);
        if let Some(special) = special_trait {
            apply_special_trait(registry, &mut genetics, special);
        }

        let quality_score = quality_score(registry, &genetics);
        let rarity = Rarity::assign(quality_score, special_trait.is_some());
        let strain_name = naming::hybrid_name(
            &parent1.strain_name,
            &parent2.strain_name,
            special_trait,
            self.config.fusion_name_chance,
            rng,
        );

        debug!(
            "bred {} x {} into {strain_name} ({rarity:?}, quality {quality_score:.3})",
            parent1.strain_name, parent2.strain_name
        );

        let offspring = Organism {
            id: None,
            strain_name,
            genetics,
            rarity,
            generation: Generation::offspring_of(parent1.generation, parent2.generation),
            special_trait,
            parents: Some(ParentRefs {
                parent1_id: parent1.id.clone(),
                parent2_id: parent2.id.clone(),
                parent1_name: parent1.strain_name.clone(),
                parent2_name: parent2.strain_name.clone(),
            }),
        };

        Ok(BreedingResult {
            offspring,
            quality_score,
        })
    }

    /// Predicts the offspring of two parents without drawing random numbers.
    pub fn preview(
        &self,
        parent1: &Organism,
        parent2: &Organism,
    ) -> Result<BreedingPreview, ContentError> {
        validate_parent(parent1, "parent1")?;
        validate_parent(parent2, "parent2")?;
        Ok(preview::predict(
            &self.config.registry,
            &parent1.genetics,
            &parent2.genetics,
        ))
    }

    fn inherit<R>(
        &self,
        definition: &TraitDefinition,
        first: f64,
        second: f64,
        context: &BreedingContext,
        rng: &mut R,
    ) -> f64
    where
        R: Rng + ?Sized,
    {
        match self.config.resolver {
            InheritanceResolver::ModeBased => resolver::resolve_by_mode(
                definition.inheritance(),
                first,
                second,
                &self.config.additive_vigor,
                rng,
            ),
            InheritanceResolver::WeightedBlend => {
                let blended = resolver::resolve_by_blend(first, second, &self.config.blend, rng);
                blended * (1.0 + self.config.blend.hybrid_vigor + context.research.breeding)
            }
        }
    }

    fn mutate<R>(
        &self,
        definition: &TraitDefinition,
        value: f64,
        context: &BreedingContext,
        rng: &mut R,
    ) -> f64
    where
        R: Rng + ?Sized,
    {
        let mutation = &self.config.mutation;
        let chance = match mutation.chance {
            MutationChance::PerTrait => definition.mutation_chance(),
            MutationChance::Global {
                base,
                per_player_level,
            } => base + f64::from(context.player_level) * per_player_level,
        } + context.research.genetics;

        if rng.gen::<f64>() < chance {
            let strength = resolver::uniform(rng, mutation.strength_min, mutation.strength_max);
            value * (1.0 + strength)
        } else {
            value
        }
    }

    fn roll_special_trait<R>(&self, context: &BreedingContext, rng: &mut R) -> Option<SpecialTrait>
    where
        R: Rng + ?Sized,
    {
        let chance = self.config.special_trait_chance + context.research.special_traits;
        if rng.gen::<f64>() < chance {
            let index = rng.gen_range(0..SpecialTrait::ALL.len());
            Some(SpecialTrait::ALL[index])
        } else {
            None
        }
    }
}

/// Weighted sum of every trait value normalised by its range maximum.
///
/// With clamped values and weights summing to one the score lies in `[0, 1]`.
#[must_use]
pub fn quality_score(registry: &TraitRegistry, genetics: &GeneticProfile) -> f64 {
    registry
        .iter()
        .map(|definition| {
            definition.quality_weight() * genetics.value_of(definition) / definition.range().max()
        })
        .sum()
}

fn apply_special_trait(
    registry: &TraitRegistry,
    genetics: &mut GeneticProfile,
    special: SpecialTrait,
) {
    for boost in special.boosts() {
        let Some(definition) = registry.get(boost.trait_id) else {
            continue;
        };
        let boosted = boost.apply(genetics.value_of(definition));
        genetics.set(definition.id(), definition.range().clamp(boosted));
    }
}

fn validate_parent(parent: &Organism, label: &str) -> Result<(), ContentError> {
    for (trait_id, value) in parent.genetics.iter() {
        if !value.is_finite() {
            return Err(ContentError::validation(format!(
                "{label} trait {trait_id} is not a finite number"
            )));
        }
    }
    Ok(())
}

fn validate_research(research: &ResearchBonuses) -> Result<(), ContentError> {
    let bonuses = [
        ("genetics", research.genetics),
        ("breeding", research.breeding),
        ("special_traits", research.special_traits),
    ];
    for (name, value) in bonuses {
        if !value.is_finite() {
            return Err(ContentError::validation(format!(
                "research bonus {name} is not a finite number"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use grow_defence_core::TraitId;
    use rand::rngs::mock::StepRng;

    fn blue() -> Organism {
        Organism::new(
            "Blue",
            GeneticProfile::new()
                .with(TraitId::GrowthSpeed, 1.0)
                .with(TraitId::PestResistance, 10.0)
                .with(TraitId::WaterEfficiency, 1.0)
                .with(TraitId::YieldPotential, 20.0),
        )
    }

    fn haze() -> Organism {
        Organism::new(
            "Haze",
            GeneticProfile::new()
                .with(TraitId::GrowthSpeed, 1.4)
                .with(TraitId::PestResistance, 30.0)
                .with(TraitId::WaterEfficiency, 1.2)
                .with(TraitId::YieldPotential, 40.0),
        )
        .with_rarity(Rarity::Rare)
    }

    #[test]
    fn low_rolls_copy_first_parent_then_mutate_and_roll_special() {
        let engine = BreedingEngine::default();
        let mut rng = StepRng::new(0, 0);
        let result = engine
            .breed(&blue(), &haze(), &BreedingContext::default(), &mut rng)
            .expect("breeding succeeds");

        let genes = &result.offspring.genetics;
        let scale = 1.08 * 0.9;
        let growth = genes.get(TraitId::GrowthSpeed).expect("growth");
        assert!((growth - 1.0 * scale * 1.3).abs() < 1e-9);
        let pest = genes.get(TraitId::PestResistance).expect("pest");
        assert!((pest - 10.0 * scale).abs() < 1e-9);

        assert_eq!(
            result.offspring.special_trait,
            Some(SpecialTrait::RapidGrowth)
        );
        assert_eq!(result.offspring.rarity, Rarity::Rare);
        assert_eq!(result.offspring.strain_name, "Swift Blze");
        assert_eq!(result.offspring.generation.get(), 2);
    }

    #[test]
    fn high_rolls_blend_without_mutation_or_special() {
        let engine = BreedingEngine::default();
        let mut rng = StepRng::new(u64::MAX, 0);
        let result = engine
            .breed(&blue(), &haze(), &BreedingContext::default(), &mut rng)
            .expect("breeding succeeds");

        assert_eq!(result.offspring.special_trait, None);
        assert_eq!(result.offspring.strain_name, "Blue x Haze");
        let growth = result
            .offspring
            .genetics
            .get(TraitId::GrowthSpeed)
            .expect("growth");
        assert!((growth - 1.2 * 1.075 * 1.08).abs() < 1e-6);
    }

    fn fixed_roll(roll: f64) -> StepRng {
        let bits = (roll * (1u64 << 53) as f64) as u64;
        StepRng::new(bits << 11, 0)
    }

    fn at_level(player_level: u32, genetics: f64) -> BreedingContext {
        BreedingContext {
            player_level,
            research: ResearchBonuses {
                genetics,
                ..ResearchBonuses::default()
            },
        }
    }

    #[test]
    fn global_mutation_chance_grows_with_level_and_research() {
        let engine = BreedingEngine::default();
        let pest = engine
            .config()
            .registry
            .get(TraitId::PestResistance)
            .expect("seed bank trait");
        let mutated = 100.0 * (1.0 - 0.1 + 0.25 * 0.17);

        let value = engine.mutate(pest, 100.0, &at_level(5, 0.0), &mut fixed_roll(0.17));
        assert!((value - mutated).abs() < 1e-9);

        let value = engine.mutate(pest, 100.0, &at_level(1, 0.0), &mut fixed_roll(0.17));
        assert!((value - 100.0).abs() < f64::EPSILON);

        let value = engine.mutate(pest, 100.0, &at_level(1, 0.02), &mut fixed_roll(0.17));
        assert!((value - mutated).abs() < 1e-9);
    }

    #[test]
    fn lab_mutation_chance_comes_from_each_trait() {
        let engine =
            BreedingEngine::new(BreedingConfig::genetics_lab()).expect("lab config is valid");
        let registry = &engine.config().registry;
        let flowering = registry.get(TraitId::FloweringTime).expect("lab trait");
        let color = registry.get(TraitId::ColorVariation).expect("lab trait");

        let value = engine.mutate(flowering, 60.0, &at_level(40, 0.0), &mut fixed_roll(0.17));
        assert!((value - 60.0).abs() < f64::EPSILON);

        let value = engine.mutate(color, 200.0, &at_level(1, 0.0), &mut fixed_roll(0.17));
        assert!((value - 200.0 * (1.0 - 0.15 + 0.3 * 0.17)).abs() < 1e-9);

        let value = engine.mutate(flowering, 60.0, &at_level(1, 0.1), &mut fixed_roll(0.17));
        assert!((value - 60.0 * (1.0 - 0.15 + 0.3 * 0.17)).abs() < 1e-9);
    }

    #[test]
    fn parents_are_recorded_on_offspring() {
        let engine = BreedingEngine::default();
        let mut rng = StepRng::new(7, 11);
        let parent1 = blue().with_id(grow_defence_core::OrganismId::new("seed-1"));
        let result = engine
            .breed(&parent1, &haze(), &BreedingContext::default(), &mut rng)
            .expect("breeding succeeds");
        let parents = result.offspring.parents.expect("parents recorded");
        assert_eq!(parents.parent1_id.as_ref().map(|id| id.as_str()), Some("seed-1"));
        assert_eq!(parents.parent2_id, None);
        assert_eq!(parents.parent1_name, "Blue");
        assert_eq!(parents.parent2_name, "Haze");
        assert_eq!(result.offspring.id, None);
    }

    #[test]
    fn non_finite_trait_is_rejected() {
        let engine = BreedingEngine::default();
        let mut broken = blue();
        broken.genetics.set(TraitId::GrowthSpeed, f64::NAN);
        let mut rng = StepRng::new(0, 1);
        let error = engine
            .breed(&broken, &haze(), &BreedingContext::default(), &mut rng)
            .expect_err("nan rejected");
        assert!(matches!(error, ContentError::Validation(_)));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = BreedingConfig::authoritative();
        config.mutation.strength_min = 0.5;
        config.mutation.strength_max = -0.5;
        assert!(BreedingEngine::new(config).is_err());

        let mut config = BreedingConfig::authoritative();
        config.blend.parent_pick_chance = 0.6;
        assert!(BreedingEngine::new(config).is_err());
    }

    #[test]
    fn quality_score_uses_registry_weights() {
        let registry = TraitRegistry::seed_bank();
        let genetics = GeneticProfile::new()
            .with(TraitId::GrowthSpeed, 3.0)
            .with(TraitId::PestResistance, 100.0)
            .with(TraitId::WaterEfficiency, 2.5)
            .with(TraitId::YieldPotential, 150.0);
        assert!((quality_score(&registry, &genetics) - 1.0).abs() < 1e-12);

        let halved = GeneticProfile::new()
            .with(TraitId::GrowthSpeed, 1.5)
            .with(TraitId::PestResistance, 50.0)
            .with(TraitId::WaterEfficiency, 1.25)
            .with(TraitId::YieldPotential, 75.0);
        assert!((quality_score(&registry, &halved) - 0.5).abs() < 1e-12);
    }
}
