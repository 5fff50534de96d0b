//! The 34 tile kinds that take part in melds, plus flower tokens.
//!
//! Tile ids follow the canonical ordering used everywhere in the engine:
//! characters 1-9 are 0-8, dots 9-17, bamboos 18-26, then East, South, West,
//! North, Red, Green and White at 27-33.
use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;
use serde_with::{DeserializeFromStr, SerializeDisplay};

pub const NUM_TILE_TYPES: usize = 34;
pub const HONOR_START: usize = 27;
pub const NUM_FLOWERS: u8 = 8;

/// Copies of every tile kind in a set.
pub const MAX_COPIES: u8 = 4;

const CODES: [&str; NUM_TILE_TYPES] = [
    "1C", "2C", "3C", "4C", "5C", "6C", "7C", "8C", "9C", //
    "1D", "2D", "3D", "4D", "5D", "6D", "7D", "8D", "9D", //
    "1B", "2B", "3B", "4B", "5B", "6B", "7B", "8B", "9B", //
    "East", "South", "West", "North", "Red", "Green", "White",
];

const NAMES: [&str; NUM_TILE_TYPES] = [
    "一萬", "二萬", "三萬", "四萬", "五萬", "六萬", "七萬", "八萬", "九萬", //
    "一筒", "二筒", "三筒", "四筒", "五筒", "六筒", "七筒", "八筒", "九筒", //
    "一條", "二條", "三條", "四條", "五條", "六條", "七條", "八條", "九條", //
    "東", "南", "西", "北", "中", "發", "白",
];

/// `1z`..`7z` in the numeric honor notation: winds, then White, Green, Red.
pub(crate) const Z_HONORS: [u8; 7] = [27, 28, 29, 30, 33, 32, 31];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Suit {
    Character,
    Dot,
    Bamboo,
    Honor,
}

/// One of the 34 non-bonus tile kinds. Ordering is the canonical tie-break
/// order: suit, then rank.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, SerializeDisplay, DeserializeFromStr)]
pub struct Tile(u8);

/// A single parsed input token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Tile(Tile),
    /// Bonus tile `1F`..`8F`, never part of a meld.
    Flower(u8),
}

impl Tile {
    #[inline]
    #[must_use]
    pub const fn new(id: u8) -> Option<Self> {
        if (id as usize) < NUM_TILE_TYPES { Some(Self(id)) } else { None }
    }

    /// All 34 kinds in canonical order.
    pub fn all() -> impl DoubleEndedIterator<Item = Self> + ExactSizeIterator {
        (0..NUM_TILE_TYPES as u8).map(Self)
    }

    #[inline]
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    #[must_use]
    pub const fn suit(self) -> Suit {
        match self.0 / 9 {
            0 => Suit::Character,
            1 => Suit::Dot,
            2 => Suit::Bamboo,
            _ => Suit::Honor,
        }
    }

    /// 1-based rank for suited tiles.
    #[must_use]
    pub const fn rank(self) -> Option<u8> {
        if self.is_honor() { None } else { Some(self.0 % 9 + 1) }
    }

    #[inline]
    #[must_use]
    pub const fn is_honor(self) -> bool {
        self.0 as usize >= HONOR_START
    }

    /// The code the vision service speaks (`1C`, `9B`, `East`, ...).
    #[must_use]
    pub const fn code(self) -> &'static str {
        CODES[self.0 as usize]
    }

    /// Traditional Chinese name shown to players.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        NAMES[self.0 as usize]
    }
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tile({})", self.code())
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<u8> for Tile {
    type Error = Error;

    fn try_from(id: u8) -> Result<Self> {
        Self::new(id).ok_or_else(|| Error::InvalidTile { token: format!("#{id}") })
    }
}

impl FromStr for Tile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match Token::from_str(s)? {
            Token::Tile(tile) => Ok(tile),
            Token::Flower(_) => Err(Error::InvalidTile { token: s.to_owned() }),
        }
    }
}

impl FromStr for Token {
    type Err = Error;

    /// Accepts `1C`/`4D`/`7B`/`East`/`3F`, `1m`/`1p`/`1s`/`1z` and the
    /// Chinese names.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidTile { token: s.to_owned() };

        if let Some(id) = NAMES.iter().position(|&name| name == s) {
            return Ok(Self::Tile(Tile(id as u8)));
        }
        if !s.is_ascii() {
            return Err(invalid());
        }
        if let Some(id) = CODES[HONOR_START..].iter().position(|code| code.eq_ignore_ascii_case(s)) {
            return Ok(Self::Tile(Tile((HONOR_START + id) as u8)));
        }

        let &[num @ b'1'..=b'9', suit] = s.as_bytes() else {
            return Err(invalid());
        };
        let num = num - b'1';
        let token = match suit.to_ascii_lowercase() {
            b'c' | b'm' => Self::Tile(Tile(num)),
            b'd' | b'p' => Self::Tile(Tile(9 + num)),
            b'b' | b's' => Self::Tile(Tile(18 + num)),
            b'z' => Self::Tile(Tile(*Z_HONORS.get(num as usize).ok_or_else(invalid)?)),
            b'f' if num < NUM_FLOWERS => Self::Flower(num + 1),
            _ => return Err(invalid()),
        };
        Ok(token)
    }
}
