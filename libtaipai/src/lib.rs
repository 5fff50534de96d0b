//! Hand efficiency for Taiwanese 16-tile mahjong.
//!
//! Shanten and ukeire of the standard five melds plus one eye shape, discard
//! ranking for a hand that has just drawn, and the [`Decision`] summary the
//! CLI prints. Everything here is a pure function of its input.
//!
//! ```
//! let hand: taipai::Hand = "123m 456p 789s 111z 22z 55z".parse()?;
//! assert_eq!(taipai::compute_shanten(&hand), 0);
//! assert_eq!(taipai::compute_ukeire(&hand).total, 4);
//! # Ok::<(), taipai::Error>(())
//! ```
pub mod algo;
pub mod decision;
pub mod error;
pub mod hand;
pub mod tile;

pub use algo::discard::{DiscardKind, DiscardOption, DiscardRanking};
pub use algo::shanten::ShantenCalculator;
pub use algo::ukeire::Ukeire;
pub use decision::Decision;
pub use error::{Error, HandProblem, Result};
pub use hand::{Hand, Phase};
pub use tile::{Tile, Token};

/// `-1` when the hand is already complete.
#[must_use]
pub fn compute_shanten(hand: &Hand) -> i8 {
    ShantenCalculator::default().calc(hand.tiles())
}

#[must_use]
pub fn compute_ukeire(hand: &Hand) -> Ukeire {
    algo::ukeire::calc(&mut ShantenCalculator::default(), hand.tiles())
}

/// Fails with [`Error::InvalidPhase`] unless the hand has just drawn.
pub fn rank_discards(hand: &Hand) -> Result<DiscardRanking> {
    algo::discard::rank(hand.tiles())
}
