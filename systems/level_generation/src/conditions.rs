//! Weather-driven effects and independent special conditions.

use grow_defence_core::{ConditionKind, LevelCondition, Weather};
use rand::Rng;

use crate::tuning::{ConditionTuning, WeatherTuning};

const DENSE_FOG_VISIBILITY: f64 = 0.5;
const ACID_DAMAGE_PER_SECOND: f64 = 2.0;
const WIND_DRIFT: f64 = 1.2;
const DROUGHT_WATER_LOSS: f64 = 1.5;
const FRENZY_SPAWN_RATE: f64 = 2.0;

fn condition(kind: ConditionKind, value: f64, description: impl Into<String>) -> LevelCondition {
    LevelCondition {
        kind,
        value,
        description: description.into(),
    }
}

pub(crate) fn environmental_effects<R>(
    weather: Weather,
    tuning: &WeatherTuning,
    rng: &mut R,
) -> Vec<LevelCondition>
where
    R: Rng + ?Sized,
{
    let mut effects = Vec::new();
    match weather {
        Weather::Fog => {
            if rng.gen::<f64>() < tuning.dense_fog_chance {
                effects.push(condition(
                    ConditionKind::DenseFog,
                    DENSE_FOG_VISIBILITY,
                    "Dense fog: tower range reduced by 50%",
                ));
            }
        }
        Weather::AcidRain => effects.push(condition(
            ConditionKind::AcidDamage,
            ACID_DAMAGE_PER_SECOND,
            "Acid rain: the plant loses 2 health per second",
        )),
        Weather::Storm => effects.push(condition(
            ConditionKind::StrongWind,
            WIND_DRIFT,
            "Strong wind: pests drift off their path",
        )),
        Weather::Heatwave => {
            if rng.gen::<f64>() < tuning.drought_chance {
                effects.push(condition(
                    ConditionKind::Drought,
                    DROUGHT_WATER_LOSS,
                    "Drought: water drains 50% faster",
                ));
            }
        }
        Weather::Clear | Weather::Rain | Weather::Wind => {}
    }

    if rng.gen::<f64>() < tuning.pest_frenzy_chance {
        effects.push(condition(
            ConditionKind::PestFrenzy,
            FRENZY_SPAWN_RATE,
            "Pest frenzy: spawn rate doubled",
        ));
    }
    effects
}

pub(crate) fn special_conditions<R>(tuning: &ConditionTuning, rng: &mut R) -> Vec<LevelCondition>
where
    R: Rng + ?Sized,
{
    let mut conditions = Vec::new();
    if rng.gen::<f64>() > tuning.spawn_boost_roll {
        conditions.push(condition(
            ConditionKind::PestSpawnBoost,
            tuning.spawn_boost,
            format!(
                "Pest wave: spawn rate increased by {}%",
                percent(tuning.spawn_boost - 1.0)
            ),
        ));
    }
    if rng.gen::<f64>() > tuning.speed_boost_roll {
        conditions.push(condition(
            ConditionKind::SpeedBoost,
            tuning.speed_boost,
            format!(
                "Aggressive pests: speed increased by {}%",
                percent(tuning.speed_boost - 1.0)
            ),
        ));
    }
    if rng.gen::<f64>() > tuning.plant_stress_roll {
        conditions.push(condition(
            ConditionKind::PlantStress,
            tuning.plant_stress,
            format!(
                "Stressed plant: starting health reduced by {}%",
                percent(1.0 - tuning.plant_stress)
            ),
        ));
    }
    conditions
}

fn percent(fraction: f64) -> i64 {
    (fraction * 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    #[test]
    fn acid_rain_always_corrodes() {
        let mut never = StepRng::new(u64::MAX, 0);
        let tuning = WeatherTuning::default();
        let effects = environmental_effects(Weather::AcidRain, &tuning, &mut never);
        assert_eq!(effects.len(), 1);
        assert_eq!(effects[0].kind, ConditionKind::AcidDamage);
    }

    #[test]
    fn low_rolls_trigger_weather_effects_and_frenzy() {
        let mut always = StepRng::new(0, 0);
        let effects = environmental_effects(Weather::Fog, &WeatherTuning::default(), &mut always);
        let kinds: Vec<_> = effects.iter().map(|effect| effect.kind).collect();
        assert_eq!(kinds, [ConditionKind::DenseFog, ConditionKind::PestFrenzy]);
    }

    #[test]
    fn clear_weather_only_risks_frenzy() {
        let mut never = StepRng::new(u64::MAX, 0);
        let tuning = WeatherTuning::default();
        assert!(environmental_effects(Weather::Clear, &tuning, &mut never).is_empty());
    }

    #[test]
    fn high_rolls_attach_every_special_condition() {
        let mut high = StepRng::new(u64::MAX, 0);
        let conditions = special_conditions(&ConditionTuning::default(), &mut high);
        let described: Vec<_> = conditions
            .iter()
            .map(|condition| (condition.kind, condition.description.as_str()))
            .collect();
        assert_eq!(
            described,
            [
                (
                    ConditionKind::PestSpawnBoost,
                    "Pest wave: spawn rate increased by 50%"
                ),
                (
                    ConditionKind::SpeedBoost,
                    "Aggressive pests: speed increased by 30%"
                ),
                (
                    ConditionKind::PlantStress,
                    "Stressed plant: starting health reduced by 20%"
                ),
            ]
        );
    }

    #[test]
    fn low_rolls_attach_no_special_condition() {
        let mut low = StepRng::new(0, 0);
        assert!(special_conditions(&ConditionTuning::default(), &mut low).is_empty());
    }
}
