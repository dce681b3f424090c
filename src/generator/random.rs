use rand::seq::{index, SliceRandom};
use rand::Rng;

use crate::error::GeneratorError;

/// Uniform integer in `[min, max]`, bounds inclusive and accepted in either order
pub fn generate_random_value<R: Rng + ?Sized>(rng: &mut R, min: u32, max: u32) -> u32 {
    let (low, high) = if min <= max { (min, max) } else { (max, min) };
    rng.gen_range(low..=high)
}

/// Uniform float in `[min, max]` rounded to `precision` decimal digits
pub fn generate_random_float<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64, precision: u32) -> f64 {
    let (low, high) = if min <= max { (min, max) } else { (max, min) };
    let value = rng.gen_range(low..=high);
    let scale = 10f64.powi(precision as i32);
    (value * scale).round() / scale
}

/// One uniformly random element of `pool`
pub fn get_random_item<'a, T, R: Rng + ?Sized>(
    rng: &mut R,
    pool: &'a [T],
    pool_name: &'static str,
) -> Result<&'a T, GeneratorError> {
    pool.choose(rng)
        .ok_or(GeneratorError::InvalidPool { pool: pool_name })
}

/// Random non-empty subset of `pool` with no repeated positions, in pool order
pub fn get_random_items<T: Clone, R: Rng + ?Sized>(
    rng: &mut R,
    pool: &[T],
    pool_name: &'static str,
) -> Result<Vec<T>, GeneratorError> {
    if pool.is_empty() {
        return Err(GeneratorError::InvalidPool { pool: pool_name });
    }

    let amount = rng.gen_range(1..=pool.len());
    let mut positions = index::sample(rng, pool.len(), amount).into_vec();
    positions.sort_unstable();

    Ok(positions.into_iter().map(|i| pool[i].clone()).collect())
}
