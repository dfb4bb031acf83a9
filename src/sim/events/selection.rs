use rand::{Rng, RngCore};

/// Pick one item with probability proportional to its weight.
///
/// Draws an integer in `[0, total)` and returns the first item whose running
/// total exceeds it, so ties resolve in slice order and zero-weight items are
/// never chosen. Returns `None` when the total weight is zero.
pub fn weighted_choice<'a, T>(
    items: &'a [T],
    weight: impl Fn(&T) -> u32,
    rng: &mut dyn RngCore,
) -> Option<&'a T> {
    let total: u64 = items.iter().map(|i| u64::from(weight(i))).sum();
    if total == 0 {
        return None;
    }
    let draw = rng.random_range(0..total);
    let mut cumulative = 0u64;
    items.iter().find(|item| {
        cumulative += u64::from(weight(item));
        cumulative > draw
    })
}
