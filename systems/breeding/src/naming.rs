//! Strain names for offspring.

use grow_defence_core::SpecialTrait;
use rand::Rng;

pub(crate) fn hybrid_name<R>(
    first: &str,
    second: &str,
    special: Option<SpecialTrait>,
    fusion_chance: f64,
    rng: &mut R,
) -> String
where
    R: Rng + ?Sized,
{
    let first = leading_word(first);
    let second = leading_word(second);
    let base = if rng.gen::<f64>() < fusion_chance {
        fuse(first, second)
    } else {
        format!("{first} x {second}")
    };

    let name = match special {
        Some(special) => format!("{} {base}", special.adjective()),
        None => base,
    };
    name.trim().to_owned()
}

fn leading_word(name: &str) -> &str {
    name.split_whitespace().next().unwrap_or_default()
}

/// First half of `first` (rounded up) followed by the second half of `second`.
fn fuse(first: &str, second: &str) -> String {
    let keep = (first.chars().count() + 1) / 2;
    let skip = second.chars().count() / 2;
    first
        .chars()
        .take(keep)
        .chain(second.chars().skip(skip))
        .collect()
}
