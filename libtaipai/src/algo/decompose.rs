//! Exhaustive block decomposition of a single suit or honor.
//!
//! A group is carved rank by rank, always starting from the lowest rank that
//! still holds tiles, so every block considered starts at that rank. Every
//! applicable block is tried, never only the first one that fits.
//!
//! Kinds the group holds all four of are dead waits: a partial that can only
//! be completed by such kinds is never formed, and a leftover single of such a
//! kind can never grow into the eye.
use ahash::AHashMap;
use derivative::Derivative;
use derive_more::{Add, AddAssign};
use tinyvec::TinyVec;

/// Longest group, one suit.
pub const MAX_GROUP_LEN: usize = 9;

/// What a decomposition contributes to the whole hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Add, AddAssign)]
pub struct Shape {
    pub melds: u8,
    pub partials: u8,
    /// Pairs reserved as the eye. A merged shape with more than one is
    /// discarded.
    pub eyes: u8,
    /// 1 if some leftover single could still be paired, capped at 1.
    pub live: u8,
}

pub type Shapes = TinyVec<[Shape; 8]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Run,
    Triplet,
    /// `r, r+1`
    Adjacent,
    /// `r, r+2`
    Gapped,
    /// A pair kept with triplet potential.
    Pair,
    Eye,
    Single,
}

impl Block {
    const ALL: [Self; 7] = [
        Self::Run,
        Self::Triplet,
        Self::Adjacent,
        Self::Gapped,
        Self::Pair,
        Self::Eye,
        Self::Single,
    ];

    const fn offsets(self) -> &'static [usize] {
        match self {
            Self::Run => &[0, 1, 2],
            Self::Triplet => &[0, 0, 0],
            Self::Adjacent => &[0, 1],
            Self::Gapped => &[0, 2],
            Self::Pair | Self::Eye => &[0, 0],
            Self::Single => &[0],
        }
    }

    /// `quads` has bit `r` set when the group holds all four of rank `r`.
    const fn shape(self, rank: usize, quads: u16) -> Shape {
        let (melds, partials, eyes, live) = match self {
            Self::Run | Self::Triplet => (1, 0, 0, 0),
            Self::Adjacent | Self::Gapped | Self::Pair => (0, 1, 0, 0),
            Self::Eye => (0, 0, 1, 0),
            Self::Single => (0, 0, 0, ((quads >> rank) & 1 == 0) as u8),
        };
        Shape {
            melds,
            partials,
            eyes,
            live,
        }
    }

    /// Whether a partial at `rank` still has a wait the hand does not hold
    /// four of. Complete blocks and singles are always usable.
    fn is_live(self, rank: usize, len: usize, quads: u16) -> bool {
        let open = |r: usize| r < len && (quads >> r) & 1 == 0;
        match self {
            Self::Adjacent => rank.checked_sub(1).is_some_and(open) || open(rank + 2),
            Self::Gapped => open(rank + 1),
            Self::Pair => open(rank),
            _ => true,
        }
    }

    fn fits(self, counts: &[u8], rank: usize) -> bool {
        let offsets = self.offsets();
        offsets.iter().all(|&off| {
            let need = offsets.iter().filter(|&&o| o == off).count();
            counts.get(rank + off).is_some_and(|&c| c as usize >= need)
        })
    }

    fn take(self, counts: &mut [u8], rank: usize) {
        for &off in self.offsets() {
            counts[rank + off] -= 1;
        }
    }

    fn put_back(self, counts: &mut [u8], rank: usize) {
        for &off in self.offsets() {
            counts[rank + off] += 1;
        }
    }
}

impl Shape {
    #[inline]
    #[must_use]
    pub const fn dominates(self, other: Self) -> bool {
        self.eyes == other.eyes && self.melds >= other.melds && self.partials >= other.partials && self.live >= other.live
    }

    #[inline]
    #[must_use]
    const fn capped(mut self) -> Self {
        if self.live > 1 {
            self.live = 1;
        }
        self
    }
}

/// Memoized decomposition of count slices of up to nine ranks.
///
/// The memo key is the base-5 encoding of the remaining counts, which is
/// exact for counts 0-4, plus the ranks the group started with four of. Honor
/// groups are one-rank slices and share the table with suits, whose one-rank
/// states decompose identically.
#[derive(Derivative)]
#[derivative(Debug, Default)]
pub struct Decomposer {
    #[derivative(Debug = "ignore")]
    cache: AHashMap<u32, Shapes>,
    hits: u64,
}

impl Decomposer {
    /// Pareto-optimal shapes of `counts`.
    ///
    /// # Panics
    /// Panics if `counts` is longer than nine ranks or holds a count above 4.
    pub fn shapes(&mut self, counts: &[u8]) -> Shapes {
        assert!(counts.iter().all(|&c| c <= 4), "count above 4 in {counts:?}");

        let quads = counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c == 4)
            .fold(0, |acc, (r, _)| acc | 1 << r);
        let mut buf = [0; MAX_GROUP_LEN];
        buf[..counts.len()].copy_from_slice(counts);
        self.search(&mut buf[..counts.len()], quads)
    }

    /// Distinct group states seen so far.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    #[must_use]
    pub const fn hits(&self) -> u64 {
        self.hits
    }

    fn search(&mut self, counts: &mut [u8], quads: u16) -> Shapes {
        let key = encode(counts) | (quads as u32) << QUAD_SHIFT;
        if let Some(shapes) = self.cache.get(&key) {
            self.hits += 1;
            return shapes.clone();
        }

        let mut ret = Shapes::new();
        match counts.iter().position(|&c| c > 0) {
            None => ret.push(Shape::default()),
            Some(rank) => {
                for block in Block::ALL {
                    if !block.fits(counts, rank) || !block.is_live(rank, counts.len(), quads) {
                        continue;
                    }
                    block.take(counts, rank);
                    let rest = self.search(counts, quads);
                    block.put_back(counts, rank);

                    for shape in rest {
                        if block == Block::Eye && shape.eyes > 0 {
                            continue;
                        }
                        ret.push((shape + block.shape(rank, quads)).capped());
                    }
                }
                prune(&mut ret);
            }
        }

        self.cache.insert(key, ret.clone());
        ret
    }
}

/// `5^9` fits in 21 bits.
const QUAD_SHIFT: u32 = 21;

fn encode(counts: &[u8]) -> u32 {
    counts.iter().rev().fold(0, |acc, &c| acc * 5 + c as u32)
}

/// Drops every shape another shape with the same eye count dominates,
/// duplicates included.
pub fn prune(shapes: &mut Shapes) {
    // A dominator is lexicographically no smaller, so it is already kept.
    shapes.sort_unstable_by(|a, b| b.cmp(a));
    let mut kept = Shapes::new();
    for &shape in shapes.iter() {
        if !kept.iter().any(|k: &Shape| k.dominates(shape)) {
            kept.push(shape);
        }
    }
    *shapes = kept;
}

/// Every way to combine one shape from each side, at most one eye overall.
#[must_use]
pub fn merge(a: &[Shape], b: &[Shape]) -> Shapes {
    let mut ret = Shapes::new();
    for &x in a {
        for &y in b {
            let shape = (x + y).capped();
            if shape.eyes <= 1 {
                ret.push(shape);
            }
        }
    }
    prune(&mut ret);
    ret
}
