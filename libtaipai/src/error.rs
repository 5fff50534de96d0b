use crate::hand::Phase;
use std::fmt;

/// Every way a request to the engine can be rejected.
///
/// The engine is a pure function of its input, so none of these are transient
/// and there is nothing to retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A token that is neither a tile nor a flower.
    InvalidTile { token: String },
    /// The tile total or a per-type count breaks the hand invariant.
    InvalidHand { reason: HandProblem },
    /// The operation is not defined for the hand's phase.
    InvalidPhase { expected: Phase, found: Phase },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandProblem {
    Empty,
    /// `len % 3 == 0`.
    BadLength(usize),
    TooManyTiles(usize),
    /// Tile id and the count it would have reached.
    TooManyCopies(u8, u8),
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for HandProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Empty => f.write_str("no tiles given"),
            Self::BadLength(n) => {
                write!(f, "{n} tiles, must be 3n+1 (waiting) or 3n+2 (discarding)")
            }
            Self::TooManyTiles(n) => write!(f, "{n} tiles, a hand holds at most 17"),
            Self::TooManyCopies(tid, count) => match crate::tile::Tile::new(tid) {
                Some(tile) => write!(f, "{count} copies of {tile}, at most 4 exist"),
                None => write!(f, "{count} copies of tile #{tid}, at most 4 exist"),
            },
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTile { token } => write!(f, "invalid tile: {token:?}"),
            Self::InvalidHand { reason } => write!(f, "invalid hand: {reason}"),
            Self::InvalidPhase { expected, found } => {
                write!(f, "invalid phase: expected a {expected} hand, got a {found} hand")
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<HandProblem> for Error {
    fn from(reason: HandProblem) -> Self {
        Self::InvalidHand { reason }
    }
}
