use crate::id::IdGenerator;
use crate::model::{Region, Terrain};

/// Regions of the 753 BC map in creation order.
const REGIONS: &[(&str, Terrain)] = &[
    // Italy
    ("Latium", Terrain::Plains),
    ("Etruria", Terrain::Hills),
    ("Campania", Terrain::Coastal),
    // Greece
    ("Attica", Terrain::Hills),
    ("Peloponnese", Terrain::Mountains),
    // Near East
    ("Lower Egypt", Terrain::Plains),
    ("Judaea", Terrain::Hills),
];

/// Land borders, by index into [`REGIONS`].
const BORDERS: &[(usize, usize)] = &[(0, 1), (0, 2), (3, 4), (5, 6)];

/// Build the starting map with symmetric adjacency. Ids come from the
/// caller's generator so they never collide with other entities.
pub fn build_initial_map(id_gen: &mut IdGenerator) -> Vec<Region> {
    let mut regions: Vec<Region> = REGIONS
        .iter()
        .map(|&(name, terrain)| Region::new(id_gen.next_id(), name, terrain))
        .collect();

    for &(a, b) in BORDERS {
        let (id_a, id_b) = (regions[a].id, regions[b].id);
        regions[a].neighbors.push(id_b);
        regions[b].neighbors.push(id_a);
    }
    regions
}
