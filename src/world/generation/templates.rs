//! Hand-authored layouts
//!
//! An alternative to carving: start from a fixed layout and mirror it for
//! variety. Every template is bordered by walls and fully connected.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::world::map::MapError;
use crate::world::Map;

/// A named fixed layout
#[derive(Debug, Clone, Copy)]
pub struct Template {
    pub name: &'static str,
    pub rows: &'static [&'static str],
}

pub const TEMPLATES: &[Template] = &[
    Template {
        name: "crossroads",
        rows: &[
            "WWWWWWWWWWWWWWW",
            "W......W......W",
            "W.WWWW.W.WWWW.W",
            "W.W..........WW",
            "W.W.WWW.WWWW..W",
            "W...W.....W...W",
            "WWW.W.WWW.W.W.W",
            "W.....W.....W.W",
            "W.WWWWW.WWWWW.W",
            "W.............W",
            "WW.WW.WWW.WW.WW",
            "W...W.....W...W",
            "W.W.W.WWW.W.W.W",
            "W.W...W.W...W.W",
            "W.WWW.W.W.WWW.W",
            "W.....W.......W",
            "WWW.WWW.WWW.WWW",
            "W.............W",
            "W.WW.WW.WW.WW.W",
            "W....W...W....W",
            "WWWWWWWWWWWWWWW",
        ],
    },
    Template {
        name: "galleries",
        rows: &[
            "WWWWWWWWWWWWWWW",
            "W.......WW....W",
            "W.WWWW..W..W.WW",
            "W.WWW..WW..W..W",
            "W.WW..WW......W",
            "W.W..WW...WW..W",
            "W...WW.......WW",
            "W..WWW..W....WW",
            "W.......W.WW..W",
            "WW..W.......W.W",
            "W...WWWW.W..W.W",
            "W.W......W....W",
            "W.W.WW.WWW.WW.W",
            "W......W......W",
            "WWWWWWWWWWWWWWW",
        ],
    },
    Template {
        name: "columns",
        rows: &[
            "WWWWWWWWWWWWWWWWWWW",
            "W.......W.........W",
            "W.W.W.W.W.W.W.W.W.W",
            "W.................W",
            "WW.W.WWWWW.W.WWW.WW",
            "W...........W.....W",
            "W.W.W.W.W.W.W.W.W.W",
            "W.....W...........W",
            "WWW.WWW.W.WWWWW.W.W",
            "W.................W",
            "W.W.W.W.W.W.W.W.W.W",
            "W.........W.......W",
            "WWWWWWWWWWWWWWWWWWW",
        ],
    },
];

impl Template {
    pub fn to_map(&self) -> Result<Map, MapError> {
        let mut map = Map::from_rows(self.rows)?;
        map.seal_border();
        Ok(map)
    }
}

/// Pick a random template, mirrored along each axis with even odds when `mirror` is set
pub fn random_template(
    rng: &mut StdRng,
    mirror: bool,
) -> Result<(&'static Template, Map), MapError> {
    let template = TEMPLATES.choose(rng).ok_or(MapError::Empty)?;
    let mut map = template.to_map()?;
    if mirror {
        if rng.gen_bool(0.5) {
            map.mirror_horizontal();
        }
        if rng.gen_bool(0.5) {
            map.mirror_vertical();
        }
    }
    Ok((template, map))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Position, TileType};
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_templates_parse_and_are_walled() {
        for template in TEMPLATES {
            let map = template.to_map().unwrap();
            assert_eq!(map.to_rows(), template.rows, "{} was altered by sealing", template.name);
            assert!(map.tiles.iter().all(|t| matches!(t, TileType::Wall | TileType::Floor)));
        }
    }

    #[test]
    fn test_templates_are_connected() {
        for template in TEMPLATES {
            let map = template.to_map().unwrap();
            let floors = map.floor_positions();
            let mut seen: HashSet<Position> = HashSet::from([floors[0]]);
            let mut stack = vec![floors[0]];
            while let Some(pos) = stack.pop() {
                for n in pos.neighbors() {
                    if map.is_floor(n) && seen.insert(n) {
                        stack.push(n);
                    }
                }
            }
            assert_eq!(seen.len(), floors.len(), "{} is split", template.name);
        }
    }

    #[test]
    fn test_mirroring_preserves_floor_count() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            let (template, map) = random_template(&mut rng, true).unwrap();
            let base = template.to_map().unwrap();
            assert_eq!(map.count(TileType::Floor), base.count(TileType::Floor));
            assert_eq!((map.width, map.height), (base.width, base.height));
        }
    }
}
