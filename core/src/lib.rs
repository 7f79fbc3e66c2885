#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Grow Defence content generators.
//!
//! This crate defines the plain data that flows between adapters and the
//! pure generation systems. Adapters decode requests into [`Organism`] values,
//! [`PlayerContext`] and materialised [`Catalogs`], hand them to the breeding
//! or level generation systems together with a seeded random source, and
//! receive a [`BreedingResult`] or [`LevelDescriptor`] back. Nothing in here
//! performs I/O or owns random state.

pub mod catalog;
pub mod error;
pub mod genetics;
pub mod level;
pub mod organism;

pub use catalog::{
    BossDefinition, Catalogs, EnvironmentalBossDefinition, LoreElement, LoreRarity,
    PestDefinition,
};
pub use error::ContentError;
pub use genetics::{
    GeneticProfile, InheritanceMode, TraitDefinition, TraitId, TraitRange, TraitRegistry,
};
pub use level::{
    BossKind, BossSpec, ConditionKind, LevelCondition, LevelDescriptor, LoreReference, Objective,
    PestSpawn, PlayerContext, Rewards, Season, Weather,
};
pub use organism::{
    BoostKind, BreedingResult, Generation, Organism, OrganismId, ParentRefs, Rarity,
    SpecialTrait, TraitBoost,
};

/// Canonical banner reported by adapters when the service boots.
pub const WELCOME_BANNER: &str = "Welcome to Grow Defence.";
