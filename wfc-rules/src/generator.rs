use crate::types::{Direction, TileCatalog};
use log::debug;

/// Generates the flattened adjacency vector from the catalog's edge labels.
///
/// Entry `axis * n * n + a * n + b` is `true` iff tile `b` may sit on the
/// `axis` side of tile `a`, i.e. `a.edge(axis) == b.edge(axis.opposite())`.
/// `axis` is `Direction::index()`.
pub fn generate_edge_rules(catalog: &TileCatalog) -> Vec<bool> {
    let num_tiles = catalog.len();
    let mut allowed = vec![false; Direction::ALL.len() * num_tiles * num_tiles];

    for direction in Direction::ALL {
        let axis_offset = direction.index() * num_tiles * num_tiles;
        for tile1 in catalog.iter() {
            for tile2 in catalog.iter() {
                if tile1.fits(tile2, direction) {
                    allowed[axis_offset + tile1.id().0 * num_tiles + tile2.id().0] = true;
                }
            }
        }
    }

    debug!(
        "Generated edge rules for {} tiles: {} allowed pairs",
        num_tiles,
        allowed.iter().filter(|&&a| a).count()
    );
    allowed
}
