// src/field/sampling.rs

use crate::{
    error::{StippleError, StippleResult},
    field::density::DensityField,
    types::Point2D,
};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Zieht `count` Punkte per Rejection-Sampling aus dem Dichtefeld.
/// Die Annahmewahrscheinlichkeit ist proportional zum Gewicht der
/// getroffenen Zelle, Kandidaten sind gleichverteilt über [0, W) x [0, H).
pub fn rejection_sample<R: Rng + ?Sized>(
    field: &DensityField,
    count: usize,
    rng: &mut R,
) -> StippleResult<Vec<Point2D>> {
    if count == 0 {
        return Ok(Vec::new());
    }
    if field.total_mass() <= 0.0 {
        // Ohne Masse würde das Sampling nie terminieren.
        return Err(StippleError::InvalidDensity {
            message: "Cannot sample from a field with zero total mass".to_string(),
        });
    }

    let width = field.width() as f64;
    let height = field.height() as f64;
    let max_weight = field.max_weight();

    let mut samples = Vec::with_capacity(count);
    while samples.len() < count {
        let x = rng.random_range(0.0..width);
        let y = rng.random_range(0.0..height);
        let threshold: f64 = rng.random();
        if threshold * max_weight < field.weight(x as usize, y as usize) {
            samples.push(Point2D::new(x as f32, y as f32));
        }
    }
    Ok(samples)
}

/// Erzeugt eine initiale, dichteproportionale Punktmenge.
/// Mit `seed` reproduzierbar, sonst aus dem Thread-RNG gespeist.
pub fn initial_points(
    field: &DensityField,
    count: usize,
    seed: Option<u64>,
) -> StippleResult<Vec<Point2D>> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    rejection_sample(field, count, &mut rng)
}
