use super::context::TickContext;

/// One stage of the monthly pipeline.
///
/// Object-safe so the engine can drive stages as `&mut dyn SimSystem`.
/// A stage never fails as a whole: per-entity errors are reported through
/// [`TickContext::skip`] and the stage moves on to the next entity.
pub trait SimSystem {
    fn name(&self) -> &'static str;
    fn tick(&mut self, ctx: &mut TickContext);
}
