//! Inheritance resolvers turning two parental values into one.

use grow_defence_core::InheritanceMode;
use rand::Rng;

use crate::{BlendTuning, VigorRange};

/// Probability that a recessive trait expresses the smaller parental value.
const RECESSIVE_EXPRESSION_CHANCE: f64 = 0.25;

/// Uniform draw from `[min, max)`; returns `min` for an empty window.
pub(crate) fn uniform<R>(rng: &mut R, min: f64, max: f64) -> f64
where
    R: Rng + ?Sized,
{
    min + (max - min) * rng.gen::<f64>()
}

pub(crate) fn resolve_by_mode<R>(
    mode: InheritanceMode,
    first: f64,
    second: f64,
    vigor: &VigorRange,
    rng: &mut R,
) -> f64
where
    R: Rng + ?Sized,
{
    let mean = (first + second) / 2.0;
    match mode {
        InheritanceMode::Dominant => {
            if rng.gen::<bool>() {
                first.max(second)
            } else {
                first.min(second)
            }
        }
        InheritanceMode::Recessive => {
            if rng.gen::<f64>() < RECESSIVE_EXPRESSION_CHANCE {
                first.min(second)
            } else {
                mean
            }
        }
        InheritanceMode::Additive => mean * uniform(rng, vigor.min, vigor.max),
        InheritanceMode::CoDominant => mean,
    }
}

pub(crate) fn resolve_by_blend<R>(first: f64, second: f64, tuning: &BlendTuning, rng: &mut R) -> f64
where
    R: Rng + ?Sized,
{
    let roll = rng.gen::<f64>();
    if roll < tuning.parent_pick_chance {
        first
    } else if roll < tuning.parent_pick_chance * 2.0 {
        second
    } else {
        let deviation = uniform(rng, -tuning.variance, tuning.variance);
        (first + second) / 2.0 * (1.0 + deviation)
    }
}
