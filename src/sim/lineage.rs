use serde::Serialize;

use crate::culture::TitleRole;
use crate::error::Result;
use crate::model::{Gender, World};

/// Immediate family of one character, as ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FamilyTree {
    pub character_id: u64,
    pub father_id: Option<u64>,
    pub mother_id: Option<u64>,
    pub spouse_id: Option<u64>,
    /// Birth order.
    pub children_ids: Vec<u64>,
    /// Everyone sharing at least one parent, in id order.
    pub sibling_ids: Vec<u64>,
}

pub fn family_tree(world: &World, character_id: u64) -> Result<FamilyTree> {
    let c = world.character(character_id)?;
    let shares_parent = |other_father: Option<u64>, other_mother: Option<u64>| {
        (c.father_id.is_some() && other_father == c.father_id)
            || (c.mother_id.is_some() && other_mother == c.mother_id)
    };
    let sibling_ids = world
        .characters
        .values()
        .filter(|o| o.id != character_id && shares_parent(o.father_id, o.mother_id))
        .map(|o| o.id)
        .collect();

    Ok(FamilyTree {
        character_id,
        father_id: c.father_id,
        mother_id: c.mother_id,
        spouse_id: c.spouse_id,
        children_ids: c.children_ids.clone(),
        sibling_ids,
    })
}

/// First living child in birth order.
pub fn primogeniture_heir(world: &World, character_id: u64) -> Option<u64> {
    world
        .characters
        .get(&character_id)?
        .children_ids
        .iter()
        .copied()
        .find(|id| world.characters.get(id).is_some_and(|c| c.is_alive))
}

pub fn eldest_living_son(world: &World, character_id: u64) -> Option<u64> {
    world
        .characters
        .get(&character_id)?
        .children_ids
        .iter()
        .copied()
        .find(|id| {
            world
                .characters
                .get(id)
                .is_some_and(|c| c.is_alive && c.gender == Gender::Male)
        })
}

/// Ruler outranks heir outranks noble. An heir is the eldest living son of
/// a ruling parent.
pub fn title_role(world: &World, character_id: u64) -> Result<TitleRole> {
    let c = world.character(character_id)?;
    if world.is_ruler(character_id) {
        return Ok(TitleRole::Ruler);
    }
    let heir_of_ruler = [c.father_id, c.mother_id]
        .into_iter()
        .flatten()
        .any(|parent| {
            world.is_ruler(parent) && eldest_living_son(world, parent) == Some(character_id)
        });
    Ok(if heir_of_ruler {
        TitleRole::Heir
    } else {
        TitleRole::Noble
    })
}
