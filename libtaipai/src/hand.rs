//! Hand construction and text conversions.
//!
//! Input is whitespace separated. Every token is one tile in any notation
//! [`Token`] understands, or a compact run such as `123m` or `11122z` which
//! expands to one tile per digit.
use crate::error::{Error, HandProblem, Result};
use crate::tile::{HONOR_START, MAX_COPIES, NUM_TILE_TYPES, Tile, Token};
use std::fmt;
use std::str::FromStr;
use serde::Serialize;

/// A complete hand holds five melds and the eye.
pub const MAX_HAND_LEN: usize = 17;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// `3n+1` tiles, about to draw.
    Waiting,
    /// `3n+2` tiles, one must go.
    Discarding,
}

/// A validated count vector of concealed tiles.
///
/// Construction guarantees every count is at most 4 and the total is `3n+1`
/// or `3n+2`, at most 17.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hand {
    tiles: [u8; NUM_TILE_TYPES],
    len: u8,
    flowers: u8,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Waiting => "waiting",
            Self::Discarding => "discarding",
        })
    }
}

impl Phase {
    #[must_use]
    pub const fn from_len(len: usize) -> Option<Self> {
        match len % 3 {
            1 => Some(Self::Waiting),
            2 => Some(Self::Discarding),
            _ => None,
        }
    }
}

impl Hand {
    pub fn from_counts(tiles: [u8; NUM_TILE_TYPES]) -> Result<Self> {
        Self::with_flowers(tiles, 0)
    }

    /// Flowers are counted for passthrough and otherwise dropped.
    pub fn from_tokens<I>(tokens: I) -> Result<Self>
    where
        I: IntoIterator<Item = Token>,
    {
        let mut tiles = [0_u8; NUM_TILE_TYPES];
        let mut flowers = 0_u8;
        for token in tokens {
            match token {
                Token::Tile(tile) => {
                    let count = &mut tiles[tile.as_usize()];
                    *count = count.saturating_add(1);
                }
                Token::Flower(_) => flowers = flowers.saturating_add(1),
            }
        }
        if flowers > 0 {
            log::warn!("ignoring {flowers} flower tile(s), they never take part in melds");
        }
        Self::with_flowers(tiles, flowers)
    }

    fn with_flowers(tiles: [u8; NUM_TILE_TYPES], flowers: u8) -> Result<Self> {
        if let Some((tid, &count)) = tiles.iter().enumerate().find(|&(_, &c)| c > MAX_COPIES) {
            return Err(HandProblem::TooManyCopies(tid as u8, count).into());
        }
        let len: usize = tiles.iter().map(|&c| c as usize).sum();
        if len == 0 {
            return Err(HandProblem::Empty.into());
        }
        if Phase::from_len(len).is_none() {
            return Err(HandProblem::BadLength(len).into());
        }
        if len > MAX_HAND_LEN {
            return Err(HandProblem::TooManyTiles(len).into());
        }
        Ok(Self {
            tiles,
            len: len as u8,
            flowers,
        })
    }

    #[inline]
    #[must_use]
    pub const fn tiles(&self) -> &[u8; NUM_TILE_TYPES] {
        &self.tiles
    }

    #[inline]
    #[must_use]
    pub const fn count(&self, tile: Tile) -> u8 {
        self.tiles[tile.as_usize()]
    }

    /// Non-flower tile total.
    #[inline]
    #[must_use]
    #[allow(clippy::len_without_is_empty)]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    #[must_use]
    pub const fn flowers(&self) -> u8 {
        self.flowers
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        if self.len % 3 == 1 { Phase::Waiting } else { Phase::Discarding }
    }

    /// Distinct kinds held, in canonical order.
    pub fn distinct(&self) -> impl Iterator<Item = Tile> + '_ {
        Tile::all().filter(|t| self.tiles[t.as_usize()] > 0)
    }
}

impl FromStr for Hand {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_tokens(parse_tokens(s)?)
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&tiles_to_string(&self.tiles))?;
        if self.flowers > 0 {
            write!(f, " +{}F", self.flowers)?;
        }
        Ok(())
    }
}

/// Split whitespace separated input into tokens, expanding compact runs.
pub fn parse_tokens(s: &str) -> Result<Vec<Token>> {
    let mut tokens = vec![];
    for word in s.split_whitespace() {
        match word.parse::<Token>() {
            Ok(token) => tokens.push(token),
            Err(err) => {
                let Some(run) = expand_run(word) else {
                    return Err(err);
                };
                tokens.extend(run?);
            }
        }
    }
    Ok(tokens)
}

/// `None` if `word` does not look like a run at all.
fn expand_run(word: &str) -> Option<Result<Vec<Token>>> {
    let (&suit, digits) = word.as_bytes().split_last()?;
    if digits.len() < 2 || !matches!(suit, b'm' | b'p' | b's' | b'z') || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let run = digits
        .iter()
        .map(|&d| {
            let single = format!("{}{}", char::from(d), char::from(suit));
            single.parse::<Token>().map_err(|_| Error::InvalidTile { token: word.to_owned() })
        })
        .collect();
    Some(run)
}

/// Count vector of a tile string without any hand validation, mainly for
/// tests and for visible tiles.
pub fn hand(s: &str) -> Result<[u8; NUM_TILE_TYPES]> {
    let mut ret = [0u8; NUM_TILE_TYPES];
    for token in parse_tokens(s)? {
        if let Token::Tile(tile) = token {
            let count = &mut ret[tile.as_usize()];
            *count = count.saturating_add(1);
        }
    }
    Ok(ret)
}

/// Compact rendering such as `123m 456p 789s 1157z`.
#[must_use]
pub fn tiles_to_string(tiles: &[u8; NUM_TILE_TYPES]) -> String {
    let mut groups = vec![];
    for (kind, chunk) in tiles[..HONOR_START].chunks_exact(9).enumerate() {
        let digits: String = chunk
            .iter()
            .enumerate()
            .flat_map(|(num, &count)| std::iter::repeat_n(char::from(b'1' + num as u8), count as usize))
            .collect();
        if !digits.is_empty() {
            groups.push(digits + ["m", "p", "s"][kind]);
        }
    }
    let honors: String = crate::tile::Z_HONORS
        .iter()
        .enumerate()
        .flat_map(|(z, &tid)| std::iter::repeat_n(char::from(b'1' + z as u8), tiles[tid as usize] as usize))
        .collect();
    if !honors.is_empty() {
        groups.push(honors + "z");
    }
    groups.join(" ")
}

#[cfg(test)]
pub mod test {
    use super::*;

    #[test]
    pub fn build_hands() {
        let h: Hand = "1C 2C 3C 4D 5D 6D 7B 8B 9B East East East South South White White".parse().unwrap();
        assert_eq!(h.len(), 16);
        assert_eq!(h.phase(), Phase::Waiting);
        assert_eq!(h.to_string(), "123m 456p 789s 1112255z");

        let h: Hand = "123m 456p 789s 111z 22z 55z 1F 6F 6z".parse().unwrap();
        assert_eq!(h.len(), 17);
        assert_eq!(h.flowers(), 2);
        assert_eq!(h.phase(), Phase::Discarding);
        assert_eq!(h.distinct().count(), 13);
        assert_eq!(h.count("White".parse().unwrap()), 2);
    }

    #[test]
    pub fn reject_bad_hands() {
        let err = |s: &str| s.parse::<Hand>().unwrap_err();
        assert_eq!(err(""), Error::InvalidHand { reason: HandProblem::Empty });
        assert_eq!(err("1F 2F"), Error::InvalidHand { reason: HandProblem::Empty });
        assert_eq!(err("123m 456p 789s 111z 22z 5z"), Error::InvalidHand { reason: HandProblem::BadLength(15) });
        assert_eq!(
            err("11111m 234p"),
            Error::InvalidHand {
                reason: HandProblem::TooManyCopies(0, 5)
            }
        );
        assert_eq!(err("123456789m 123456789p 1z"), Error::InvalidHand { reason: HandProblem::TooManyTiles(19) });
        assert_eq!(err("1m 2m 3q"), Error::InvalidTile { token: "3q".to_owned() });
        assert_eq!(err("12m 80p"), Error::InvalidTile { token: "80p".to_owned() });
    }

    #[test]
    pub fn compact_round_trip() {
        let tiles = hand("East South Red Green White 1C 9C 1D").unwrap();
        assert_eq!(tiles_to_string(&tiles), "19m 1p 12567z");
        assert_eq!(hand(&tiles_to_string(&tiles)).unwrap(), tiles);
    }

    #[test]
    pub fn counts_saturate() {
        let tiles = hand(&"1m ".repeat(300)).unwrap();
        assert_eq!(tiles[0], u8::MAX);
        assert_eq!(tiles.iter().map(|&c| c as usize).sum::<usize>(), 255);
        assert_eq!(
            Hand::from_counts(tiles).unwrap_err(),
            Error::InvalidHand {
                reason: HandProblem::TooManyCopies(0, 255)
            }
        );
    }
}
