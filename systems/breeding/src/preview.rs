//! Deterministic offspring prediction shown before a cross is committed.

use grow_defence_core::{GeneticProfile, Rarity, TraitId, TraitRegistry};
use serde::{Deserialize, Serialize};

use crate::quality_score;

/// Share of a trait's span always added to the prediction band.
const BASE_BAND_FRACTION: f64 = 0.1;

/// Expected outcome for a single trait.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraitPrediction {
    /// Trait being predicted.
    pub trait_id: TraitId,
    /// Parental mean, clamped to the trait range.
    pub expected: f64,
    /// Lower edge of the likely band.
    pub min: f64,
    /// Upper edge of the likely band.
    pub max: f64,
}

/// Expected outcome of crossing two parents.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BreedingPreview {
    /// Per-trait predictions in registry order.
    pub traits: Vec<TraitPrediction>,
    /// Quality score of the expected genetics.
    pub expected_quality: f64,
    /// Rarity of the expected genetics, ignoring special traits.
    pub expected_rarity: Rarity,
}

pub(crate) fn predict(
    registry: &TraitRegistry,
    first: &GeneticProfile,
    second: &GeneticProfile,
) -> BreedingPreview {
    let mut expected_genetics = GeneticProfile::new();
    let traits = registry
        .iter()
        .map(|definition| {
            let range = definition.range();
            let a = first.value_of(definition);
            let b = second.value_of(definition);
            let mean = (a + b) / 2.0;
            let band = (a - b).abs() / 4.0 + range.span() * BASE_BAND_FRACTION;
            let expected = range.clamp(mean);
            expected_genetics.set(definition.id(), expected);
            TraitPrediction {
                trait_id: definition.id(),
                expected,
                min: range.clamp(mean - band),
                max: range.clamp(mean + band),
            }
        })
        .collect();

    let expected_quality = quality_score(registry, &expected_genetics);
    BreedingPreview {
        traits,
        expected_quality,
        expected_rarity: Rarity::from_quality(expected_quality),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_widens_with_parental_difference() {
        let registry = TraitRegistry::seed_bank();
        let close = GeneticProfile::new().with(TraitId::PestResistance, 50.0);
        let far = GeneticProfile::new().with(TraitId::PestResistance, 90.0);
        let twin = predict(&registry, &close, &close);
        let split = predict(&registry, &close, &far);

        let width = |preview: &BreedingPreview| {
            let prediction = preview
                .traits
                .iter()
                .find(|prediction| prediction.trait_id == TraitId::PestResistance)
                .copied()
                .expect("pest resistance predicted");
            prediction.max - prediction.min
        };
        assert!((width(&twin) - 20.0).abs() < 1e-9);
        assert!(width(&split) > width(&twin));
    }

    #[test]
    fn band_is_clamped_to_range() {
        let registry = TraitRegistry::seed_bank();
        let maxed = GeneticProfile::new().with(TraitId::PestResistance, 100.0);
        let preview = predict(&registry, &maxed, &maxed);
        let prediction = preview
            .traits
            .iter()
            .find(|prediction| prediction.trait_id == TraitId::PestResistance)
            .expect("pest resistance predicted");
        assert!((prediction.max - 100.0).abs() < f64::EPSILON);
        assert!((prediction.min - 90.0).abs() < 1e-9);
    }

    #[test]
    fn missing_traits_predict_midpoint() {
        let registry = TraitRegistry::genetics_lab();
        let preview = predict(&registry, &GeneticProfile::new(), &GeneticProfile::new());
        for (prediction, definition) in preview.traits.iter().zip(registry.iter()) {
            assert!((prediction.expected - definition.range().midpoint()).abs() < 1e-9);
        }
    }
}
