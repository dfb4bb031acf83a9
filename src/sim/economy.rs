use tracing::debug;

use super::context::TickContext;
use super::system::SimSystem;
use crate::error::Result;

pub struct EconomySystem;

impl SimSystem for EconomySystem {
    fn name(&self) -> &'static str {
        "economy"
    }

    fn tick(&mut self, ctx: &mut TickContext) {
        process_all_regions(ctx);
    }
}

/// Credit each owned region's building income to its polity's ruler.
pub fn process_all_regions(ctx: &mut TickContext) {
    let region_ids: Vec<u64> = ctx.world.regions.keys().copied().collect();
    for id in region_ids {
        if let Err(e) = credit_region(ctx, id) {
            ctx.skip("economy", id, e);
        }
    }
}

/// Returns the amount credited, 0 when the region is unowned, the owner has
/// no living ruler, or nothing productive is built there.
pub fn credit_region(ctx: &mut TickContext, region_id: u64) -> Result<i64> {
    let region = ctx.world.region(region_id)?;
    let Some(owner) = region.owner_polity_id else {
        return Ok(0);
    };
    let income = region.monthly_income();
    let Some(ruler_id) = ctx.world.polity(owner)?.ruler_id else {
        return Ok(0);
    };
    let ruler = ctx.world.character_mut(ruler_id)?;
    if income == 0 || !ruler.is_alive {
        return Ok(0);
    }
    // Routine income stays out of the chronicle.
    ruler.wealth += income;
    debug!(region = region_id, ruler = ruler_id, income, "income");
    Ok(income)
}
