use rand::Rng;
use tracing::{debug, info};

use super::context::TickContext;
use super::signal::Signal;
use super::system::SimSystem;
use crate::error::Result;
use crate::model::{Gender, GovernmentType, LEGITIMACY_MAX, offset_year};

/// Republican terms last this many years.
const TERM_YEARS: i32 = 1;

pub struct GovernmentSystem;

impl SimSystem for GovernmentSystem {
    fn name(&self) -> &'static str {
        "government"
    }

    fn tick(&mut self, ctx: &mut TickContext) {
        process_all_polities(ctx);
    }
}

pub fn process_all_polities(ctx: &mut TickContext) {
    let polity_ids: Vec<u64> = ctx.world.polities.keys().copied().collect();
    for id in polity_ids {
        if let Err(e) = process_polity(ctx, id) {
            ctx.skip("government", id, e);
        }
    }
}

/// Run one polity's politics for this tick, dispatched on its government.
pub fn process_polity(ctx: &mut TickContext, polity_id: u64) -> Result<()> {
    match ctx.world.polity(polity_id)?.government_type {
        GovernmentType::Republic => process_republic(ctx, polity_id),
        GovernmentType::Monarchy => process_monarchy(ctx, polity_id),
        GovernmentType::Tribe => process_tribe(ctx, polity_id),
    }
}

fn process_republic(ctx: &mut TickContext, polity_id: u64) -> Result<()> {
    let year = ctx.world.calendar.signed_year();
    if year >= ctx.world.polity(polity_id)?.term_end_year {
        hold_election(ctx, polity_id)?;
    }
    Ok(())
}

/// Elect a ruler uniformly at random from every living man of age. The term
/// only advances when someone was elected.
pub fn hold_election(ctx: &mut TickContext, polity_id: u64) -> Result<()> {
    let name = ctx.world.polity(polity_id)?.name.clone();
    ctx.world.log(format!("Elections are held in {name}!"));

    let min_age = ctx.config.candidate_min_age;
    let candidates: Vec<u64> = ctx
        .world
        .living_characters()
        .filter(|c| c.gender == Gender::Male && c.age >= min_age)
        .map(|c| c.id)
        .collect();

    if candidates.is_empty() {
        debug!(polity = polity_id, "no candidates");
        ctx.world.log(format!("No eligible candidates found for {name}."));
        return Ok(());
    }

    let winner = candidates[ctx.rng.random_range(0..candidates.len())];
    let winner_name = ctx.world.character(winner)?.name.clone();
    let year = ctx.world.calendar.signed_year();

    let polity = ctx.world.polity_mut(polity_id)?;
    let previous = polity.ruler_id.replace(winner);
    polity.term_end_year = offset_year(year, TERM_YEARS);

    info!(polity = polity_id, winner, "election");
    ctx.world
        .log(format!("{winner_name} has been elected as Ruler of {name}!"));
    if previous != Some(winner) {
        ctx.signals.push(Signal::RulerChanged {
            polity_id,
            previous_id: previous,
            ruler_id: Some(winner),
        });
    }
    Ok(())
}

/// Legitimacy drifts with the ruler's diplomacy. Nothing happens at zero.
fn process_monarchy(ctx: &mut TickContext, polity_id: u64) -> Result<()> {
    let Some(diplomacy) = living_ruler(ctx, polity_id)?.map(|(_, diplomacy, _)| diplomacy) else {
        return Ok(());
    };
    let polity = ctx.world.polity_mut(polity_id)?;
    if diplomacy > 10 {
        polity.legitimacy = (polity.legitimacy + 1).min(LEGITIMACY_MAX);
    } else if diplomacy < 5 {
        polity.legitimacy = polity.legitimacy.saturating_sub(1);
    }
    Ok(())
}

/// Prestige decays; a weak chief attracts rumors but no actual challenger.
fn process_tribe(ctx: &mut TickContext, polity_id: u64) -> Result<()> {
    let polity = ctx.world.polity_mut(polity_id)?;
    polity.prestige = polity.prestige.saturating_sub(1);

    if let Some((name, _, martial)) = living_ruler(ctx, polity_id)?
        && martial < 5
    {
        ctx.world
            .log(format!("Rumors of a challenge to {name}'s leadership spread..."));
    }
    Ok(())
}

/// (name, diplomacy, martial) of the polity's ruler, if one is set and alive.
fn living_ruler(ctx: &TickContext, polity_id: u64) -> Result<Option<(String, i32, i32)>> {
    let Some(ruler_id) = ctx.world.polity(polity_id)?.ruler_id else {
        return Ok(None);
    };
    let ruler = ctx.world.character(ruler_id)?;
    Ok(ruler
        .is_alive
        .then(|| (ruler.name.clone(), ruler.diplomacy, ruler.martial)))
}
