use rand::{Rng, RngCore};

/// True with probability `p`. Out-of-range values are clamped to [0, 1] and
/// NaN never succeeds, so a bad tunable cannot abort a tick.
pub fn roll(rng: &mut dyn RngCore, p: f64) -> bool {
    if p.is_nan() {
        return false;
    }
    rng.random_bool(p.clamp(0.0, 1.0))
}
