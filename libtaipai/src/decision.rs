//! One-call summary of a hand, as printed by the CLI and emitted as JSON.
use crate::algo::discard::{self, DiscardKind, DiscardOption};
use crate::algo::shanten::ShantenCalculator;
use crate::algo::ukeire;
use crate::error::{HandProblem, Result};
use crate::hand::{Hand, Phase, parse_tokens};
use crate::tile::{MAX_COPIES, NUM_TILE_TYPES, Tile, Token};
use std::collections::BTreeMap;
use serde::Serialize;
use serde_with::skip_serializing_none;

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub tile_count: usize,
    pub flower_count: u8,
    pub visible_count: usize,
    pub phase: Phase,
    /// Of the hand as given, `-1` if it is already complete.
    pub shanten: i8,

    /// Waiting phase only.
    pub accepting_tiles: Option<BTreeMap<Tile, u8>>,
    pub total_ukeire: Option<u32>,

    /// Discarding phase only, best first.
    pub candidates: Option<Vec<Candidate>>,
    pub best_discard: Option<Tile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub discard: Tile,
    pub shanten: i8,
    pub ukeire: u32,
    pub accepting_tiles: BTreeMap<Tile, u8>,
    pub quality: DiscardKind,
}

impl From<DiscardOption> for Candidate {
    fn from(opt: DiscardOption) -> Self {
        Self {
            discard: opt.tile,
            shanten: opt.shanten,
            ukeire: opt.ukeire.total,
            accepting_tiles: opt.ukeire.tiles,
            quality: opt.kind,
        }
    }
}

impl Decision {
    /// Both arguments are whitespace separated tile strings, `visible` may be
    /// empty.
    pub fn parse(hand: &str, visible: &str) -> Result<Self> {
        Self::from_tokens(parse_tokens(hand)?, parse_tokens(visible)?)
    }

    /// Flowers among the visible tiles are ignored.
    pub fn from_tokens<H, V>(hand: H, visible: V) -> Result<Self>
    where
        H: IntoIterator<Item = Token>,
        V: IntoIterator<Item = Token>,
    {
        let hand = Hand::from_tokens(hand)?;
        let mut seen = [0_u8; NUM_TILE_TYPES];
        for token in visible {
            if let Token::Tile(tile) = token {
                let count = &mut seen[tile.as_usize()];
                *count = count.saturating_add(1);
            }
        }
        Self::new(&hand, &seen)
    }

    /// `visible` counts tiles seen outside the hand. Together with the hand
    /// they may not exceed 4 of a kind.
    pub fn new(hand: &Hand, visible: &[u8; NUM_TILE_TYPES]) -> Result<Self> {
        let tiles = hand.tiles();
        for (tid, (&held, &seen)) in tiles.iter().zip(visible).enumerate() {
            let total = held.saturating_add(seen);
            if total > MAX_COPIES {
                return Err(HandProblem::TooManyCopies(tid as u8, total).into());
            }
        }

        let mut calc = ShantenCalculator::default();
        let shanten = calc.calc(tiles);
        let mut ret = Self {
            tile_count: hand.len(),
            flower_count: hand.flowers(),
            visible_count: visible.iter().map(|&c| c as usize).sum(),
            phase: hand.phase(),
            shanten,
            accepting_tiles: None,
            total_ukeire: None,
            candidates: None,
            best_discard: None,
        };

        match hand.phase() {
            Phase::Waiting => {
                let supply = ukeire::supply_with_visible(tiles, visible);
                let ukeire = ukeire::calc_with_supply(&mut calc, tiles, &supply);
                ret.total_ukeire = Some(ukeire.total);
                ret.accepting_tiles = Some(ukeire.tiles);
            }
            Phase::Discarding => {
                // the discarded tile joins the visible ones
                let ranking = discard::rank_with_supply(tiles, |after, discarded| {
                    let mut supply = ukeire::supply_with_visible(after, visible);
                    let left = &mut supply[discarded.as_usize()];
                    *left = left.saturating_sub(1);
                    supply
                })?;
                ret.best_discard = Some(ranking.best);
                ret.candidates = Some(ranking.candidates.into_iter().map(Candidate::from).collect());
            }
        }

        log::debug!(
            "{hand}: shanten {shanten}, {} group states searched, {} memo hits",
            calc.decomposer().cached(),
            calc.decomposer().hits(),
        );
        Ok(ret)
    }

    #[must_use]
    pub fn best(&self) -> Option<&Candidate> {
        self.candidates.as_deref().and_then(<[_]>::first)
    }

    #[must_use]
    pub fn candidate(&self, tile: Tile) -> Option<&Candidate> {
        self.candidates.as_deref()?.iter().find(|c| c.discard == tile)
    }

    /// One line for the player.
    #[must_use]
    pub fn advice(&self) -> String {
        if self.shanten < 0 {
            return "complete hand".to_owned();
        }
        match (self.phase, self.best(), &self.accepting_tiles) {
            (Phase::Discarding, Some(best), _) => format!(
                "discard {} (ukeire {}, shanten {})",
                best.discard.display_name(),
                best.ukeire,
                best.shanten,
            ),
            (Phase::Waiting, _, Some(waits)) if self.shanten == 0 => {
                let waits = waits
                    .keys()
                    .map(|t| t.display_name())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("tenpai, waiting on {waits}")
            }
            _ => format!("shanten {}, ukeire {}", self.shanten, self.total_ukeire.unwrap_or_default()),
        }
    }
}

#[cfg(test)]
pub mod test {
    use super::*;
    use crate::error::Error;
    use serde_json::json;

    #[test]
    pub fn waiting_decision() {
        let d = Decision::parse("1C 2C 3C 4D 5D 6D 7B 8B 9B East East East South South White White 2F", "").unwrap();
        assert_eq!(d.phase, Phase::Waiting);
        assert_eq!(d.shanten, 0);
        assert_eq!(d.total_ukeire, Some(4));
        assert!(d.candidates.is_none());
        assert_eq!(d.advice(), "tenpai, waiting on 南, 白");

        let value = serde_json::to_value(&d).unwrap();
        assert_eq!(
            value,
            json!({
                "tileCount": 16,
                "flowerCount": 1,
                "visibleCount": 0,
                "phase": "waiting",
                "shanten": 0,
                "acceptingTiles": { "South": 2, "White": 2 },
                "totalUkeire": 4
            })
        );
    }

    #[test]
    pub fn discarding_decision() {
        let d = Decision::parse("123m 456p 789s 111z 22z 55z 7z", "2z 9s").unwrap();
        assert_eq!(d.phase, Phase::Discarding);
        assert_eq!(d.visible_count, 2);
        assert_eq!(d.best_discard, Some("Red".parse().unwrap()));

        let best = d.best().unwrap();
        assert_eq!(best.shanten, 0);
        assert_eq!(best.ukeire, 3);
        assert_eq!(best.quality, DiscardKind::Holding);
        assert_eq!(d.advice(), "discard 中 (ukeire 3, shanten 0)");

        let value = serde_json::to_value(&d).unwrap();
        assert_eq!(value["bestDiscard"], "Red");
        assert_eq!(value["candidates"][0]["acceptingTiles"], json!({ "South": 1, "White": 2 }));
        assert_eq!(value["candidates"][1]["quality"], "receding");
        assert!(value.get("totalUkeire").is_none());
    }

    #[test]
    pub fn discarded_tile_counts_as_visible() {
        // dropping one White leaves a tanki on the other
        let white: Tile = "White".parse().unwrap();
        let d = Decision::parse("123m 456m 789m 111s 111z 5z 5z", "").unwrap();
        assert_eq!(d.candidate(white).unwrap().accepting_tiles, BTreeMap::from([(white, 2)]));

        let hand: Hand = "123m 456m 789m 111s 111z 5z 5z".parse().unwrap();
        let ranking = crate::rank_discards(&hand).unwrap();
        assert_eq!(ranking.get(white).unwrap().ukeire.tiles, BTreeMap::from([(white, 3)]));
    }

    #[test]
    pub fn other_advice() {
        let d = Decision::parse("123m 456p 789s 111z 22z 555z", "").unwrap();
        assert_eq!(d.advice(), "complete hand");

        let d = Decision::parse("147m 258p 369s 1234567z", "").unwrap();
        assert_eq!(d.advice(), format!("shanten 10, ukeire {}", d.total_ukeire.unwrap()));
    }

    #[test]
    pub fn rejects_impossible_visible() {
        let err = Decision::parse("123m 456p 789s 111z 22z 55z", "1z 1z").unwrap_err();
        assert_eq!(err, Error::InvalidHand { reason: HandProblem::TooManyCopies(27, 5) });

        let err = Decision::parse("123m 456p 789s 111z 22z 5z", "").unwrap_err();
        assert_eq!(err, Error::InvalidHand { reason: HandProblem::BadLength(15) });

        // the way the CLI reads --visible
        let hand: Hand = "123m 456p 789s 111z 22z 55z".parse().unwrap();
        let seen = crate::hand::hand(&"1m ".repeat(256)).unwrap();
        let err = Decision::new(&hand, &seen).unwrap_err();
        assert_eq!(err, Error::InvalidHand { reason: HandProblem::TooManyCopies(0, 255) });
    }
}
