use super::shanten::ShantenCalculator;
use crate::tile::{MAX_COPIES, NUM_TILE_TYPES, Tile};
use std::collections::BTreeMap;
use serde::Serialize;

/// Tile kinds that lower shanten when drawn, with the copies still out there.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Ukeire {
    pub tiles: BTreeMap<Tile, u8>,
    pub total: u32,
}

impl Ukeire {
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Accepting kinds in canonical order.
    pub fn kinds(&self) -> impl Iterator<Item = Tile> + '_ {
        self.tiles.keys().copied()
    }
}

/// `4 - held` for every kind.
#[must_use]
pub fn default_supply(tiles: &[u8; NUM_TILE_TYPES]) -> [u8; NUM_TILE_TYPES] {
    tiles.map(|held| MAX_COPIES.saturating_sub(held))
}

/// `4 - held - visible` for every kind.
#[must_use]
pub fn supply_with_visible(tiles: &[u8; NUM_TILE_TYPES], visible: &[u8; NUM_TILE_TYPES]) -> [u8; NUM_TILE_TYPES] {
    std::array::from_fn(|tid| MAX_COPIES.saturating_sub(tiles[tid]).saturating_sub(visible[tid]))
}

pub fn calc(calc: &mut ShantenCalculator, tiles: &[u8; NUM_TILE_TYPES]) -> Ukeire {
    calc_with_supply(calc, tiles, &default_supply(tiles))
}

/// Kinds with nothing left in `supply` are never tried.
pub fn calc_with_supply(calc: &mut ShantenCalculator, tiles: &[u8; NUM_TILE_TYPES], supply: &[u8; NUM_TILE_TYPES]) -> Ukeire {
    let shanten = calc.calc(tiles);
    let mut ret = Ukeire::default();
    if shanten < 0 {
        return ret;
    }

    let mut tiles = *tiles;
    for tile in Tile::all() {
        let tid = tile.as_usize();
        if supply[tid] == 0 || tiles[tid] >= MAX_COPIES {
            continue;
        }

        tiles[tid] += 1;
        let after = calc.calc(&tiles);
        tiles[tid] -= 1;

        if after < shanten {
            ret.tiles.insert(tile, supply[tid]);
            ret.total += supply[tid] as u32;
        }
    }
    ret
}
