mod geography;

pub use geography::build_initial_map;

use crate::model::World;

/// Generate the starting map into `world`. Returns the new region ids in
/// creation order.
pub fn install_initial_map(world: &mut World) -> Vec<u64> {
    let regions = build_initial_map(&mut world.id_gen);
    let ids = regions.iter().map(|r| r.id).collect();
    for region in regions {
        world.insert_region(region);
    }
    world.log("World Map generated (Italy, Greece, Near East).");
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn installed_map_is_consistent() {
        let mut world = World::new();
        let ids = install_initial_map(&mut world);
        assert_eq!(ids.len(), 7);
        assert!(world.validate().is_ok());
        assert_eq!(world.chronicle.len(), 1);
    }
}
