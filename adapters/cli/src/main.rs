#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter for the Grow Defence content generators.

use std::{
    fs,
    net::SocketAddr,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;
use grow_defence_core::{Organism, PlayerContext, Season};
use grow_defence_server::{config, decode_parents, ServerConfig};
use grow_defence_system_breeding::{
    BreedingConfig, BreedingContext, BreedingEngine, InheritanceResolver, ResearchBonuses,
};
use grow_defence_system_level_generation::{level_rng, LevelGeneration, MAX_CLIENT_SEED};
use log::info;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde_json::json;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the JSON endpoints over HTTP
    Serve {
        /// Server configuration file
        #[arg(long, short)]
        config: Option<PathBuf>,

        /// Address to bind, overriding the configuration
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
    /// Cross the two parents described in a JSON file
    Breed {
        /// JSON file holding `parent1` and `parent2`
        parents: PathBuf,

        /// Seed for a reproducible cross
        #[arg(long)]
        seed: Option<u64>,

        /// Use the seven-trait genetics lab registry
        #[arg(long)]
        lab: bool,

        /// Inheritance resolver, overriding the registry's default
        #[arg(long, value_enum)]
        resolver: Option<ResolverArg>,

        /// Player level raising the mutation chance
        #[arg(long, default_value = "1")]
        player_level: u32,

        /// Research bonus added to the mutation chance
        #[arg(long, default_value = "0")]
        genetics_bonus: f64,

        /// Research bonus added to the blend hybrid vigor
        #[arg(long, default_value = "0")]
        breeding_bonus: f64,

        /// Research bonus added to the special trait chance
        #[arg(long, default_value = "0")]
        special_traits_bonus: f64,
    },
    /// Predict the offspring of two parents without rolling
    Preview {
        /// JSON file holding `parent1` and `parent2`
        parents: PathBuf,

        /// Use the seven-trait genetics lab registry
        #[arg(long)]
        lab: bool,
    },
    /// Generate a level descriptor
    Level {
        /// Level number, starting at one
        level: u32,

        /// Catalog TOML file
        #[arg(long)]
        catalog: PathBuf,

        /// Player season: spring, summer, autumn or winter
        #[arg(long)]
        season: Option<Season>,

        /// Seed for a reproducible level
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ResolverArg {
    ModeBased,
    WeightedBlend,
}

impl From<ResolverArg> for InheritanceResolver {
    fn from(value: ResolverArg) -> Self {
        match value {
            ResolverArg::ModeBased => Self::ModeBased,
            ResolverArg::WeightedBlend => Self::WeightedBlend,
        }
    }
}

/// Entry point for the Grow Defence command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Serve { config, bind } => serve(config, bind),
        Command::Breed {
            parents,
            seed,
            lab,
            resolver,
            player_level,
            genetics_bonus,
            breeding_bonus,
            special_traits_bonus,
        } => {
            let context = BreedingContext {
                player_level,
                research: ResearchBonuses {
                    genetics: genetics_bonus,
                    breeding: breeding_bonus,
                    special_traits: special_traits_bonus,
                },
            };
            breed(&parents, seed, breeding_config(lab, resolver), &context)
        }
        Command::Preview { parents, lab } => preview(&parents, breeding_config(lab, None)),
        Command::Level {
            level,
            catalog,
            season,
            seed,
        } => generate_level(level, &catalog, season, seed),
    }
}

fn serve(config_path: Option<PathBuf>, bind: Option<SocketAddr>) -> Result<()> {
    let mut config = match &config_path {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = bind {
        config.bind = bind;
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    runtime.block_on(grow_defence_server::serve(config))
}

fn breeding_config(lab: bool, resolver: Option<ResolverArg>) -> BreedingConfig {
    let config = if lab {
        BreedingConfig::genetics_lab()
    } else {
        BreedingConfig::authoritative()
    };
    match resolver {
        Some(resolver) => config.with_resolver(resolver.into()),
        None => config,
    }
}

fn breed(
    parents: &Path,
    seed: Option<u64>,
    config: BreedingConfig,
    context: &BreedingContext,
) -> Result<()> {
    let (parent1, parent2) = read_parents(parents)?;
    let engine = BreedingEngine::new(config).context("invalid breeding configuration")?;
    let seed = seed.unwrap_or_else(fresh_seed);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let result = engine
        .breed(&parent1, &parent2, context, &mut rng)
        .context("breeding failed")?;
    info!(
        "bred {} ({:?}) with seed {seed}",
        result.offspring.strain_name, result.offspring.rarity
    );
    print_json(&json!({
        "offspring": result.offspring,
        "quality_score": result.quality_score,
        "seed": seed,
    }))
}

fn preview(parents: &Path, config: BreedingConfig) -> Result<()> {
    let (parent1, parent2) = read_parents(parents)?;
    let engine = BreedingEngine::new(config).context("invalid breeding configuration")?;
    let preview = engine.preview(&parent1, &parent2).context("preview failed")?;
    print_json(&json!({ "preview": preview }))
}

fn generate_level(
    level: u32,
    catalog: &Path,
    season: Option<Season>,
    seed: Option<u64>,
) -> Result<()> {
    let catalogs = config::load_catalogs(catalog)?;
    let context = PlayerContext { season };
    let seed = seed.unwrap_or_else(fresh_seed);

    let descriptor = LevelGeneration::default()
        .generate(level, &context, &catalogs, &mut level_rng(seed, level))
        .with_context(|| format!("failed to generate level {level}"))?;
    print_json(&json!({ "level": descriptor, "seed": seed }))
}

fn read_parents(path: &Path) -> Result<(Organism, Organism)> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    decode_parents(&bytes).with_context(|| format!("invalid parents in {}", path.display()))
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render json")?;
    println!("{rendered}");
    Ok(())
}

fn fresh_seed() -> u64 {
    rand::thread_rng().gen::<u64>() & MAX_CLIENT_SEED
}
