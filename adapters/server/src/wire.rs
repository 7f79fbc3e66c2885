//! JSON request and response bodies.

use std::collections::BTreeMap;

use grow_defence_core::{
    ContentError, GeneticProfile, Generation, LevelDescriptor, Organism, OrganismId,
    PlayerContext, Rarity, SpecialTrait, TraitId,
};
use grow_defence_system_breeding::{BreedingContext, BreedingPreview, ResearchBonuses};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Legacy flat field carrying the yield potential.
const LEGACY_YIELD_FIELD: &str = "max_health_bonus";

/// Parent as sent by clients: nested `genetics` or flat trait fields.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct ParentInput {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, alias = "name")]
    strain_name: Option<String>,
    #[serde(default)]
    generation: Option<u32>,
    #[serde(default)]
    rarity: Option<Rarity>,
    #[serde(default)]
    special_trait: Option<SpecialTrait>,
    #[serde(default)]
    genetics: Option<BTreeMap<String, Value>>,
    #[serde(flatten)]
    fields: BTreeMap<String, Value>,
}

impl ParentInput {
    /// Converts the wire parent into an organism, naming it `fallback_name` when unnamed.
    pub(crate) fn into_organism(self, fallback_name: &str) -> Result<Organism, ContentError> {
        let mut genetics = GeneticProfile::new();
        collect_traits(&self.fields, &mut genetics)?;
        if let Some(nested) = &self.genetics {
            collect_traits(nested, &mut genetics)?;
        }

        let strain_name = self
            .strain_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| fallback_name.to_owned());
        let mut organism = Organism::new(strain_name, genetics)
            .with_generation(Generation::from_raw(self.generation.unwrap_or(1)))
            .with_rarity(self.rarity.unwrap_or(Rarity::Common));
        organism.special_trait = self.special_trait;
        if let Some(id) = self.id {
            organism = organism.with_id(OrganismId::new(id));
        }
        Ok(organism)
    }
}

fn collect_traits(
    fields: &BTreeMap<String, Value>,
    genetics: &mut GeneticProfile,
) -> Result<(), ContentError> {
    for (name, value) in fields {
        let trait_id = if name == LEGACY_YIELD_FIELD {
            TraitId::YieldPotential
        } else if let Some(trait_id) = TraitId::from_name(name) {
            trait_id
        } else {
            continue;
        };
        let Some(number) = value.as_f64() else {
            return Err(ContentError::validation(format!(
                "trait {name} must be a number"
            )));
        };
        genetics.set(trait_id, number);
    }
    Ok(())
}

/// Body of `POST /breed`.
#[derive(Debug, Deserialize)]
pub(crate) struct BreedRequest {
    #[serde(default)]
    parent1: Option<ParentInput>,
    #[serde(default)]
    parent2: Option<ParentInput>,
    #[serde(default, alias = "playerLevel")]
    player_level: Option<u32>,
    #[serde(default, alias = "researchBonuses")]
    research_bonuses: Option<ResearchBonuses>,
    #[serde(default)]
    pub(crate) seed: Option<u64>,
}

/// Both parents as organisms; a missing parent is a validation failure.
fn require_parents(
    parent1: Option<ParentInput>,
    parent2: Option<ParentInput>,
) -> Result<(Organism, Organism), ContentError> {
    match (parent1, parent2) {
        (Some(first), Some(second)) => Ok((
            first.into_organism("Plant1")?,
            second.into_organism("Plant2")?,
        )),
        _ => Err(ContentError::validation("Both parents are required")),
    }
}

impl BreedRequest {
    pub(crate) fn parents(&mut self) -> Result<(Organism, Organism), ContentError> {
        require_parents(self.parent1.take(), self.parent2.take())
    }

    pub(crate) fn context(&self) -> BreedingContext {
        let defaults = BreedingContext::default();
        BreedingContext {
            player_level: self.player_level.unwrap_or(defaults.player_level),
            research: self.research_bonuses.unwrap_or(defaults.research),
        }
    }
}

/// Body of `POST /breed/preview`.
#[derive(Debug, Deserialize)]
pub(crate) struct PreviewRequest {
    #[serde(default)]
    parent1: Option<ParentInput>,
    #[serde(default)]
    parent2: Option<ParentInput>,
}

impl PreviewRequest {
    pub(crate) fn parents(self) -> Result<(Organism, Organism), ContentError> {
        require_parents(self.parent1, self.parent2)
    }
}

/// Body of `POST /generate-level`.
#[derive(Debug, Deserialize)]
pub(crate) struct LevelRequest {
    #[serde(default)]
    pub(crate) level: Option<u32>,
    #[serde(default, alias = "playerStats")]
    pub(crate) player_stats: Option<PlayerContext>,
    #[serde(default)]
    pub(crate) seed: Option<u64>,
}

/// Successful breeding response.
#[derive(Debug, Serialize)]
pub(crate) struct BreedResponse {
    pub(crate) success: bool,
    pub(crate) offspring: Organism,
    pub(crate) quality_score: f64,
    pub(crate) seed: u64,
}

/// Successful preview response.
#[derive(Debug, Serialize)]
pub(crate) struct PreviewResponse {
    pub(crate) success: bool,
    pub(crate) preview: BreedingPreview,
}

/// Successful level generation response.
#[derive(Debug, Serialize)]
pub(crate) struct LevelResponse {
    pub(crate) success: bool,
    pub(crate) level: LevelDescriptor,
    pub(crate) seed: u64,
    pub(crate) generated_at: String,
}

/// Failure response shared by every endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct ErrorResponse {
    pub(crate) success: bool,
    pub(crate) error: String,
}

/// Decodes a JSON body, reporting malformed input as a validation failure.
pub(crate) fn decode<T>(body: &[u8]) -> Result<T, ContentError>
where
    T: for<'de> Deserialize<'de>,
{
    serde_json::from_slice(body)
        .map_err(|error| ContentError::validation(format!("invalid request body: {error}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_legacy_parent_is_understood() {
        let parent: ParentInput = serde_json::from_str(
            r#"{
                "strain_name": "Blue",
                "growth_speed": 1.0,
                "pest_resistance": 10,
                "water_efficiency": 1.0,
                "max_health_bonus": 20,
                "rarity": "common"
            }"#,
        )
        .expect("parent parses");
        let organism = parent.into_organism("Plant1").expect("valid parent");

        assert_eq!(organism.strain_name, "Blue");
        assert_eq!(organism.genetics.get(TraitId::YieldPotential), Some(20.0));
        assert_eq!(organism.genetics.get(TraitId::PestResistance), Some(10.0));
        assert_eq!(organism.generation.get(), 1);
    }

    #[test]
    fn nested_genetics_override_flat_fields() {
        let parent: ParentInput = serde_json::from_str(
            r#"{
                "id": "p-1",
                "generation": 0,
                "growth_speed": 1.0,
                "genetics": { "growth_speed": 2.0, "thc_content": 18 }
            }"#,
        )
        .expect("parent parses");
        let organism = parent.into_organism("Plant2").expect("valid parent");

        assert_eq!(organism.strain_name, "Plant2");
        assert_eq!(organism.genetics.get(TraitId::GrowthSpeed), Some(2.0));
        assert_eq!(organism.genetics.get(TraitId::ThcContent), Some(18.0));
        assert_eq!(organism.generation.get(), 1);
        assert_eq!(organism.id.as_ref().map(OrganismId::as_str), Some("p-1"));
    }

    #[test]
    fn non_numeric_trait_is_rejected() {
        let parent: ParentInput =
            serde_json::from_str(r#"{ "growth_speed": "fast" }"#).expect("parent parses");
        assert!(matches!(
            parent.into_organism("Plant1"),
            Err(ContentError::Validation(_))
        ));
    }

    #[test]
    fn missing_parent_is_a_validation_error() {
        let mut request: BreedRequest =
            decode(br#"{ "parent1": { "strain_name": "Blue" } }"#).expect("body parses");
        assert_eq!(
            request.parents().expect_err("missing parent"),
            ContentError::validation("Both parents are required")
        );
    }

    #[test]
    fn camel_case_context_fields_are_accepted() {
        let request: BreedRequest = decode(
            br#"{ "playerLevel": 12, "researchBonuses": { "genetics": 0.05 } }"#,
        )
        .expect("body parses");
        let context = request.context();
        assert_eq!(context.player_level, 12);
        assert!((context.research.genetics - 0.05).abs() < f64::EPSILON);
    }
}
