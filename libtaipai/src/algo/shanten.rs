//! Shanten of the standard five melds plus one eye shape.
//!
//! Hands shorter than 16 tiles are scored as if `5 - n/3` melds were already
//! exposed, so the concealed target is `min(n/3, 5)` melds and the eye.
//!
//! Waits on a kind the hand holds all four of are not waits at all, so a hand
//! whose only wait is such a kind is one step further away.
use super::decompose::{Decomposer, Shape, Shapes, merge};
use crate::tile::{HONOR_START, NUM_TILE_TYPES};

/// Melds in a complete hand.
pub const TARGET_MELDS: u8 = 5;

/// Largest tile total the calculator accepts: a full discarding-phase hand
/// plus one hypothetical draw.
pub const MAX_EVAL_LEN: u8 = 18;

#[derive(Debug, Default)]
pub struct ShantenCalculator {
    decomposer: Decomposer,
}

impl ShantenCalculator {
    /// `-1` for a complete hand.
    ///
    /// # Panics
    /// Panics if `tiles` holds more than 4 of a kind or more than 18 tiles in
    /// total. [`Hand`](crate::Hand) never does.
    pub fn calc(&mut self, tiles: &[u8; NUM_TILE_TYPES]) -> i8 {
        let len = tiles.iter().try_fold(0_u8, |acc, &c| acc.checked_add(c));
        let len = match len {
            Some(len) if len <= MAX_EVAL_LEN => len,
            _ => panic!("too many tiles in {tiles:?}"),
        };
        let target = (len / 3).min(TARGET_MELDS);

        self.shapes(tiles)
            .iter()
            .map(|&shape| score(shape, target))
            .fold(i8::MAX, i8::min)
    }

    /// Pareto-optimal shapes of the whole hand.
    pub fn shapes(&mut self, tiles: &[u8; NUM_TILE_TYPES]) -> Shapes {
        let mut ret: Shapes = [Shape::default()].into_iter().collect();
        for suit in tiles[..HONOR_START].chunks_exact(9) {
            ret = merge(&ret, &self.decomposer.shapes(suit));
        }
        for honor in HONOR_START..NUM_TILE_TYPES {
            if tiles[honor] > 0 {
                ret = merge(&ret, &self.decomposer.shapes(&tiles[honor..=honor]));
            }
        }
        ret
    }

    #[must_use]
    pub const fn decomposer(&self) -> &Decomposer {
        &self.decomposer
    }
}

/// `2 * (target - melds) - partials - eye`, where only the open meld slots
/// can take partials.
///
/// One more exchange is needed when no eye is reserved and no leftover single
/// can still be paired into one.
fn score(shape: Shape, target: u8) -> i8 {
    let melds = shape.melds.min(target);
    let partials = shape.partials.min(target - melds);
    let eye = shape.eyes.min(1);

    let mut shanten = 2 * (target - melds) as i8 - partials as i8 - eye as i8;
    if eye == 0 && shape.live == 0 {
        shanten += 1;
    }
    shanten.max(-1)
}
