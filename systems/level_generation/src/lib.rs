#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Procedural level generator.
//!
//! [`LevelGeneration::generate`] turns a level number, the player's context and
//! materialised catalogs into a complete [`LevelDescriptor`]. The generator
//! holds no state between calls; all randomness comes from the caller's
//! [`Rng`], and [`level_rng`] derives a replayable stream from a request seed.

mod conditions;
mod seed;
mod tuning;

use grow_defence_core::{
    BossKind, BossSpec, Catalogs, ContentError, LevelDescriptor, LoreReference, Objective,
    PestDefinition, PestSpawn, PlayerContext, Rewards, Weather,
};
use log::{debug, warn};
use rand::{seq::SliceRandom, Rng};

pub use seed::{derive_level_seed, level_rng, MAX_CLIENT_SEED};
pub use tuning::{
    BossTuning, ConditionTuning, DifficultyTuning, LevelTuning, LoreTuning, ObjectiveTuning,
    PestTuning, RewardTuning, WeatherTuning,
};

/// Base weather pool; clear appears twice to bias toward calm levels.
const WEATHER_POOL: [Weather; 5] = [
    Weather::Clear,
    Weather::Clear,
    Weather::Rain,
    Weather::Wind,
    Weather::Heatwave,
];

/// Starting hours a level may be played at.
const START_HOURS: [u8; 8] = [6, 9, 12, 15, 18, 21, 0, 3];

/// Pure system that generates [`LevelDescriptor`] values.
#[derive(Clone, Debug, Default)]
pub struct LevelGeneration {
    tuning: LevelTuning,
}

impl LevelGeneration {
    /// Creates a generator using the provided tuning.
    #[must_use]
    pub fn new(tuning: LevelTuning) -> Self {
        Self { tuning }
    }

    /// Active tuning.
    #[must_use]
    pub fn tuning(&self) -> &LevelTuning {
        &self.tuning
    }

    /// Difficulty multiplier applied to pest stats on `level`.
    #[must_use]
    pub fn difficulty_multiplier(&self, level: u32) -> f64 {
        1.0 + f64::from(level.saturating_sub(1)) * self.tuning.difficulty.step
    }

    /// Reports whether `level` is guarded by a boss.
    #[must_use]
    pub fn is_boss_level(&self, level: u32) -> bool {
        let interval = self.tuning.difficulty.boss_interval;
        interval != 0 && level % interval == 0
    }

    /// Number of pests spawned on `level`.
    #[must_use]
    pub fn pest_count(&self, level: u32) -> u32 {
        let pests = &self.tuning.pests;
        let scaled = (pests.base_count + f64::from(level) * pests.count_per_level).floor();
        if scaled >= f64::from(pests.max_count) {
            pests.max_count
        } else {
            scaled.max(0.0) as u32
        }
    }

    /// Generates the descriptor for `level`.
    ///
    /// Fails with [`ContentError::Validation`] for level zero and with
    /// [`ContentError::Generation`] when no pest is unlocked yet. A boss level
    /// without an eligible boss is generated without one.
    pub fn generate<R>(
        &self,
        level: u32,
        context: &PlayerContext,
        catalogs: &Catalogs,
        rng: &mut R,
    ) -> Result<LevelDescriptor, ContentError>
    where
        R: Rng + ?Sized,
    {
        if level == 0 {
            return Err(ContentError::validation("level must be at least 1"));
        }

        let eligible_pests: Vec<&PestDefinition> = catalogs
            .pests
            .iter()
            .filter(|pest| pest.unlock_level <= level)
            .collect();
        if eligible_pests.is_empty() {
            return Err(ContentError::generation(format!(
                "no pests are unlocked at level {level}"
            )));
        }

        let difficulty_multiplier = self.difficulty_multiplier(level);
        let is_boss_level = self.is_boss_level(level);
        let pest_count = self.pest_count(level);

        let weather = self.pick_weather(context, rng);
        let time_of_day = START_HOURS.choose(rng).copied().unwrap_or_default();
        let mut special_conditions =
            conditions::environmental_effects(weather, &self.tuning.weather, rng);

        let mut pests = Vec::with_capacity(pest_count as usize);
        for _ in 0..pest_count {
            if let Some(pest) = eligible_pests.choose(rng) {
                pests.push(self.spawn(pest, difficulty_multiplier, rng));
            }
        }

        let boss = if is_boss_level {
            let boss = self.pick_boss(level, context, weather, catalogs, rng);
            if boss.is_none() {
                warn!("boss level {level} has no eligible standard or environmental boss");
            }
            boss
        } else {
            None
        };

        special_conditions.extend(conditions::special_conditions(
            &self.tuning.conditions,
            rng,
        ));

        let lore = self.discover_lore(level, catalogs, rng);

        let descriptor = LevelDescriptor {
            level_number: level,
            difficulty_multiplier,
            difficulty_rating: self.difficulty_rating(level),
            is_boss_level,
            pests,
            boss,
            weather,
            time_of_day,
            special_conditions,
            rewards: self.rewards(level, is_boss_level),
            objectives: self.objectives(level, pest_count),
            lore,
        };

        debug!(
            "generated level {level}: {} pests, weather {:?}, boss {}",
            descriptor.pest_count(),
            descriptor.weather,
            descriptor
                .boss
                .as_ref()
                .map_or("none", |boss| boss.boss_id.as_str())
        );
        Ok(descriptor)
    }

    fn difficulty_rating(&self, level: u32) -> f64 {
        let difficulty = &self.tuning.difficulty;
        (1.0 + f64::from(level) * difficulty.rating_per_level).min(difficulty.rating_cap)
    }

    fn pick_weather<R>(&self, context: &PlayerContext, rng: &mut R) -> Weather
    where
        R: Rng + ?Sized,
    {
        let base = WEATHER_POOL.choose(rng).copied().unwrap_or(Weather::Clear);
        let Some(season) = context.season else {
            return base;
        };
        if rng.gen::<f64>() > self.tuning.weather.season_override_roll {
            season.weather_pool().choose(rng).copied().unwrap_or(base)
        } else {
            base
        }
    }

    fn spawn<R>(&self, pest: &PestDefinition, difficulty: f64, rng: &mut R) -> PestSpawn
    where
        R: Rng + ?Sized,
    {
        let tuning = &self.tuning.pests;
        let health_factor = sample(rng, tuning.health_variation);
        let speed_factor = sample(rng, tuning.speed_variation);
        let spawn_delay = rng.gen::<f64>() * tuning.max_spawn_delay_ms;

        PestSpawn {
            pest_id: pest.id.clone(),
            pest_type: pest.pest_type.clone(),
            health: (pest.health * difficulty * health_factor).floor() as u32,
            speed: pest.speed * difficulty * speed_factor,
            damage: pest.damage_per_second * difficulty,
            spawn_delay_ms: spawn_delay.floor() as u32,
        }
    }

    fn pick_boss<R>(
        &self,
        level: u32,
        context: &PlayerContext,
        weather: Weather,
        catalogs: &Catalogs,
        rng: &mut R,
    ) -> Option<BossSpec>
    where
        R: Rng + ?Sized,
    {
        let environmental: Vec<_> = catalogs
            .environmental_bosses
            .iter()
            .filter(|boss| boss.is_eligible(level, context.season, weather))
            .collect();
        let standard: Vec<_> = catalogs
            .bosses
            .iter()
            .filter(|boss| boss.level_appearance <= level)
            .collect();

        let prefer_environmental = rng.gen::<f64>() < self.tuning.boss.environmental_chance;
        if prefer_environmental || standard.is_empty() {
            if let Some(boss) = environmental.choose(rng) {
                return Some(self.boss_spec(
                    &boss.id,
                    &boss.name,
                    BossKind::Environmental,
                    level - boss.min_level,
                    rng,
                ));
            }
        }

        standard.choose(rng).map(|boss| {
            self.boss_spec(
                &boss.id,
                &boss.name,
                BossKind::Standard,
                level - boss.level_appearance,
                rng,
            )
        })
    }

    fn boss_spec<R>(
        &self,
        id: &str,
        name: &str,
        kind: BossKind,
        levels_since_appearance: u32,
        rng: &mut R,
    ) -> BossSpec
    where
        R: Rng + ?Sized,
    {
        let tuning = &self.tuning.boss;
        let gap = f64::from(levels_since_appearance);
        BossSpec {
            boss_id: id.to_owned(),
            name: name.to_owned(),
            kind,
            health_multiplier: 1.0 + gap * tuning.health_per_level,
            speed_multiplier: 1.0 + rng.gen::<f64>() * tuning.max_speed_bonus,
            damage_multiplier: 1.0 + gap * tuning.damage_per_level,
        }
    }

    fn rewards(&self, level: u32, is_boss_level: bool) -> Rewards {
        let tuning = &self.tuning.rewards;
        let boss_bonus = if is_boss_level { tuning.boss_bonus } else { 0 };
        let base_leaf = tuning
            .base
            .saturating_add(level.saturating_mul(tuning.per_level))
            .saturating_add(boss_bonus);
        let share = |fraction: f64| (f64::from(base_leaf) * fraction).floor() as u32;
        Rewards {
            base_leaf,
            completion_bonus: share(tuning.completion_share),
            perfect_bonus: share(tuning.perfect_share),
        }
    }

    fn objectives(&self, level: u32, pest_count: u32) -> Vec<Objective> {
        let tuning = &self.tuning.objectives;
        vec![
            Objective::Survive {
                duration: tuning
                    .base_survival_secs
                    .saturating_add(level.saturating_mul(tuning.survival_secs_per_level)),
            },
            Objective::EliminatePests {
                count: (f64::from(pest_count) * tuning.elimination_share).floor() as u32,
            },
            Objective::MaintainHealth {
                threshold: tuning.health_threshold,
            },
        ]
    }

    fn discover_lore<R>(
        &self,
        level: u32,
        catalogs: &Catalogs,
        rng: &mut R,
    ) -> Option<LoreReference>
    where
        R: Rng + ?Sized,
    {
        let tuning = &self.tuning.lore;
        if rng.gen::<f64>() <= tuning.discovery_roll {
            return None;
        }

        let survivors: Vec<_> = catalogs
            .lore
            .iter()
            .filter(|entry| entry.unlock_level <= level)
            .filter(|entry| rng.gen::<f64>() < tuning.weight(entry.rarity))
            .collect();
        survivors.choose(rng).map(|entry| LoreReference {
            lore_id: entry.id.clone(),
            title: entry.title.clone(),
            rarity: entry.rarity,
        })
    }
}

fn sample<R>(rng: &mut R, (min, max): (f64, f64)) -> f64
where
    R: Rng + ?Sized,
{
    min + (max - min) * rng.gen::<f64>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use grow_defence_core::{BossDefinition, LoreElement, LoreRarity};
    use rand::rngs::mock::StepRng;

    fn aphid() -> PestDefinition {
        PestDefinition {
            id: "aphid".into(),
            pest_type: "aphid".into(),
            health: 100.0,
            speed: 2.0,
            damage_per_second: 4.0,
            unlock_level: 1,
        }
    }

    #[test]
    fn multiplier_and_cadence_follow_the_level() {
        let generation = LevelGeneration::default();
        assert!((generation.difficulty_multiplier(1) - 1.0).abs() < f64::EPSILON);
        assert!((generation.difficulty_multiplier(5) - 1.6).abs() < 1e-12);
        assert!(generation.is_boss_level(3));
        assert!(!generation.is_boss_level(4));
        assert_eq!(generation.pest_count(1), 3);
        assert_eq!(generation.pest_count(5), 5);
        assert_eq!(generation.pest_count(34), 20);
        assert_eq!(generation.pest_count(u32::MAX), 20);
    }

    #[test]
    fn low_rolls_pick_minimum_variation() {
        let generation = LevelGeneration::default();
        let mut rng = StepRng::new(0, 0);
        let spawn = generation.spawn(&aphid(), 1.0, &mut rng);
        assert_eq!(spawn.health, 80);
        assert!((spawn.speed - 1.8).abs() < 1e-12);
        assert!((spawn.damage - 4.0).abs() < f64::EPSILON);
        assert_eq!(spawn.spawn_delay_ms, 0);
    }

    #[test]
    fn rewards_add_boss_bonus() {
        let generation = LevelGeneration::default();
        let plain = generation.rewards(4, false);
        assert_eq!(plain.base_leaf, 90);
        assert_eq!(plain.completion_bonus, 45);
        assert_eq!(plain.perfect_bonus, 27);

        let boss = generation.rewards(3, true);
        assert_eq!(boss.base_leaf, 280);
        assert_eq!(boss.completion_bonus, 140);
        assert_eq!(boss.perfect_bonus, 84);
    }

    #[test]
    fn objectives_form_the_fixed_triad() {
        let generation = LevelGeneration::default();
        assert_eq!(
            generation.objectives(2, 4),
            vec![
                Objective::Survive { duration: 130 },
                Objective::EliminatePests { count: 2 },
                Objective::MaintainHealth { threshold: 50 },
            ]
        );
    }

    #[test]
    fn rating_is_capped_at_ten() {
        let generation = LevelGeneration::default();
        assert!((generation.difficulty_rating(1) - 1.3).abs() < 1e-12);
        assert!((generation.difficulty_rating(40) - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn boss_multipliers_grow_with_the_gap() {
        let generation = LevelGeneration::default();
        let catalogs = Catalogs {
            bosses: vec![BossDefinition {
                id: "queen".into(),
                name: "Aphid Queen".into(),
                level_appearance: 3,
            }],
            ..Catalogs::default()
        };
        let mut rng = StepRng::new(0, 0);
        let boss = generation
            .pick_boss(7, &PlayerContext::default(), Weather::Clear, &catalogs, &mut rng)
            .expect("standard boss chosen");
        assert_eq!(boss.kind, BossKind::Standard);
        assert!((boss.health_multiplier - 2.0).abs() < 1e-12);
        assert!((boss.damage_multiplier - 1.6).abs() < 1e-12);
        assert!((boss.speed_multiplier - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn lore_is_skipped_on_low_discovery_roll() {
        let generation = LevelGeneration::default();
        let catalogs = Catalogs {
            lore: vec![LoreElement {
                id: "origin".into(),
                title: "The First Seed".into(),
                rarity: LoreRarity::Common,
                unlock_level: 1,
            }],
            ..Catalogs::default()
        };
        let mut rng = StepRng::new(0, 0);
        assert_eq!(generation.discover_lore(5, &catalogs, &mut rng), None);
    }

    #[test]
    fn level_zero_is_rejected() {
        let generation = LevelGeneration::default();
        let catalogs = Catalogs {
            pests: vec![aphid()],
            ..Catalogs::default()
        };
        let mut rng = StepRng::new(0, 1);
        let error = generation
            .generate(0, &PlayerContext::default(), &catalogs, &mut rng)
            .expect_err("level zero rejected");
        assert!(matches!(error, ContentError::Validation(_)));
    }
}
