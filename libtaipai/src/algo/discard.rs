use super::shanten::ShantenCalculator;
use super::ukeire::{self, Ukeire};
use crate::error::{Error, HandProblem, Result};
use crate::hand::{Hand, Phase};
use crate::tile::{NUM_TILE_TYPES, Tile};
use std::cmp::Ordering;
use rayon::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscardKind {
    /// Keeps the best shanten reachable by any discard.
    Holding,
    Receding,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscardOption {
    pub tile: Tile,
    pub shanten: i8,
    pub ukeire: Ukeire,
    pub kind: DiscardKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscardRanking {
    /// Best first.
    pub candidates: Vec<DiscardOption>,
    pub best: Tile,
}

impl DiscardOption {
    /// Lower shanten, then more ukeire, then canonical tile order.
    #[must_use]
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        self.shanten
            .cmp(&other.shanten)
            .then_with(|| other.ukeire.total.cmp(&self.ukeire.total))
            .then_with(|| self.tile.cmp(&other.tile))
    }
}

impl DiscardRanking {
    pub fn holding(&self) -> impl Iterator<Item = &DiscardOption> {
        self.candidates.iter().filter(|c| c.kind == DiscardKind::Holding)
    }

    #[must_use]
    pub fn get(&self, tile: Tile) -> Option<&DiscardOption> {
        self.candidates.iter().find(|c| c.tile == tile)
    }
}

pub fn rank(tiles: &[u8; NUM_TILE_TYPES]) -> Result<DiscardRanking> {
    rank_with_supply(tiles, |after, _| ukeire::default_supply(after))
}

/// `supply` receives the hand after the discard and the discarded tile, and
/// returns what remains of every kind for that candidate's ukeire.
///
/// `tiles` is checked the same way [`Hand`] checks its counts.
pub fn rank_with_supply<F>(tiles: &[u8; NUM_TILE_TYPES], supply: F) -> Result<DiscardRanking>
where
    F: Fn(&[u8; NUM_TILE_TYPES], Tile) -> [u8; NUM_TILE_TYPES] + Sync,
{
    let found = Hand::from_counts(*tiles)?.phase();
    if found != Phase::Discarding {
        return Err(Error::InvalidPhase {
            expected: Phase::Discarding,
            found,
        });
    }

    let held: Vec<_> = Tile::all().filter(|t| tiles[t.as_usize()] > 0).collect();
    let mut candidates: Vec<_> = held
        .into_par_iter()
        .map_init(ShantenCalculator::default, |calc, tile| {
            let mut after = *tiles;
            after[tile.as_usize()] -= 1;
            let shanten = calc.calc(&after);
            let ukeire = ukeire::calc_with_supply(calc, &after, &supply(&after, tile));
            DiscardOption {
                tile,
                shanten,
                ukeire,
                kind: DiscardKind::Holding,
            }
        })
        .collect();

    let min_shanten = candidates.iter().map(|c| c.shanten).min().unwrap_or_default();
    for c in &mut candidates {
        if c.shanten > min_shanten {
            c.kind = DiscardKind::Receding;
        }
    }
    candidates.sort_by(DiscardOption::rank_cmp);

    let best = candidates.first().map(|c| c.tile).ok_or(HandProblem::Empty)?;
    log::debug!(
        "ranked {} discards, best {best} at shanten {min_shanten}",
        candidates.len(),
    );
    Ok(DiscardRanking { candidates, best })
}

#[cfg(test)]
pub mod test {
    use super::*;
    use crate::algo::shanten::test::random_hand;
    use crate::hand::hand;
    use std::collections::BTreeMap;
    use rand::prelude::*;
    use rand_chacha::ChaCha12Rng;

    fn tile(s: &str) -> Tile {
        s.parse().unwrap()
    }

    #[test]
    pub fn tenpai_discard() {
        let ranking = rank(&hand("123m 456p 789s 111z 22z 55z 7z").unwrap()).unwrap();
        assert_eq!(ranking.best, tile("Red"));
        assert_eq!(ranking.candidates.len(), 13);

        let best = &ranking.candidates[0];
        assert_eq!(best.shanten, 0);
        assert_eq!(best.ukeire.total, 4);
        assert_eq!(best.kind, DiscardKind::Holding);
        assert_eq!(ranking.holding().count(), 1);

        let south = ranking.get(tile("South")).unwrap();
        assert_eq!(south.shanten, 1);
        assert_eq!(south.kind, DiscardKind::Receding);
        assert!(ranking.get(tile("North")).is_none());
    }

    #[test]
    pub fn ties_break_by_ukeire_then_tile() {
        // either single is a tanki wait on the other with three copies left
        let ranking = rank(&hand("123m 456m 789m 111s 111z 5z 1p").unwrap()).unwrap();
        let order: Vec<_> = ranking.candidates.iter().take(2).map(|c| c.tile).collect();
        assert_eq!(order, [tile("1p"), tile("White")]);
        assert_eq!(ranking.candidates[0].ukeire.total, ranking.candidates[1].ukeire.total);
        assert_eq!(ranking.holding().count(), 2);

        // 5z leaves a 23p two-sided wait, 8 tiles, the 2p/3p discards stay behind
        let ranking = rank(&hand("123m 456m 23p 99s 5z").unwrap()).unwrap();
        assert_eq!(ranking.best, tile("White"));
        assert_eq!(ranking.candidates[0].ukeire.total, 8);
        for pair in ranking.candidates.windows(2) {
            assert_ne!(pair[0].rank_cmp(&pair[1]), Ordering::Greater);
        }
    }

    #[test]
    pub fn waiting_hand_is_rejected() {
        let err = rank(&hand("123m 456p 789s 111z 22z 55z").unwrap()).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidPhase {
                expected: Phase::Discarding,
                found: Phase::Waiting,
            }
        );
        let err = rank(&hand("123m 456p").unwrap()).unwrap_err();
        assert_eq!(err, Error::InvalidHand { reason: HandProblem::BadLength(6) });
    }

    #[test]
    pub fn raw_counts_are_checked() {
        let err = rank(&hand("11111m 234p").unwrap()).unwrap_err();
        assert_eq!(err, Error::InvalidHand { reason: HandProblem::TooManyCopies(0, 5) });
        let err = rank(&hand("123456789m 123456789p 11z").unwrap()).unwrap_err();
        assert_eq!(err, Error::InvalidHand { reason: HandProblem::TooManyTiles(20) });
        let err = rank(&[0; NUM_TILE_TYPES]).unwrap_err();
        assert_eq!(err, Error::InvalidHand { reason: HandProblem::Empty });
    }

    #[test]
    pub fn dead_wait_is_not_holding() {
        // keeping 1s leaves a tanki on the fourth 7p
        let ranking = rank(&hand("7777p 222z 333z 666z 777z 1s").unwrap()).unwrap();
        assert_eq!(ranking.best, tile("7p"));
        assert_eq!(ranking.candidates[0].shanten, 0);
        assert_eq!(ranking.candidates[0].ukeire.tiles, BTreeMap::from([(tile("1s"), 3)]));
        assert_eq!(ranking.holding().count(), 1);

        let dead = ranking.get(tile("1s")).unwrap();
        assert_eq!(dead.shanten, 1);
        assert_eq!(dead.kind, DiscardKind::Receding);
        assert_eq!(dead.ukeire.kinds().count(), 29);
        assert_eq!(dead.ukeire.total, 116);
        assert!(!dead.ukeire.tiles.contains_key(&tile("7p")));
    }

    #[test]
    pub fn best_discard_keeps_hand_shanten() {
        let mut rng = ChaCha12Rng::seed_from_u64(17);
        let mut calc = ShantenCalculator::default();
        for len in [5, 11, 17] {
            for _ in 0..40 {
                let tiles = random_hand(&mut rng, len);
                let ranking = rank(&tiles).unwrap();
                let distinct = tiles.iter().filter(|&&c| c > 0).count();
                assert_eq!(ranking.candidates.len(), distinct);
                assert_eq!(ranking.candidates[0].tile, ranking.best);
                assert_eq!(ranking.candidates[0].shanten, calc.calc(&tiles).max(0));
                for pair in ranking.candidates.windows(2) {
                    assert_eq!(pair[0].rank_cmp(&pair[1]), Ordering::Less);
                }
            }
        }
    }

    #[test]
    pub fn same_hand_same_ranking() {
        let tiles = hand("1m 1m 2m 4m 6p 7p 8p 9p 3s 3s 5s East East Red Green White 9s").unwrap();
        let first = rank(&tiles).unwrap();
        for _ in 0..5 {
            assert_eq!(rank(&tiles).unwrap(), first);
        }
    }
}
