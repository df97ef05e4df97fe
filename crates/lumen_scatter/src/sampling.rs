//! Random sampling helpers.
//!
//! Nothing here owns a generator. Callers pass the random source in, and
//! parallel callers give every worker its own via [`worker_rng`].

use lumen_math::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Draw a point uniformly distributed inside the unit ball.
///
/// Rejection sampling over the enclosing cube `[-1, 1)^3`: candidates are
/// drawn until one has squared length below 1. About 52% of candidates are
/// accepted, so the loop runs ~1.91 times on average. There is no cap.
pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    random_in_unit_sphere_counted(rng).0
}

/// Same as [`random_in_unit_sphere`], also returning how many candidates
/// were drawn (at least 1).
pub fn random_in_unit_sphere_counted(rng: &mut dyn RngCore) -> (Vec3, u32) {
    let mut attempts = 0;
    loop {
        attempts += 1;
        let p = 2.0 * Vec3::new(rng.gen(), rng.gen(), rng.gen()) - Vec3::ONE;
        if p.squared_length() < 1.0 {
            return (p, attempts);
        }
    }
}

/// Deterministic, independent generator for worker `worker` of a run seeded
/// with `seed`. Worker 0 uses the seed unchanged.
pub fn worker_rng(seed: u64, worker: usize) -> StdRng {
    StdRng::seed_from_u64(seed ^ (worker as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}
