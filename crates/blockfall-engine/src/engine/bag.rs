use std::{fmt, fmt::Write as _, str::FromStr};

use arrayvec::ArrayVec;
use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom as _,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::{PieceKind, Tetromino};

/// 7-bag piece randomizer.
///
/// # 7-Bag System
///
/// 1. The bag is filled with one copy of each of the seven catalog pieces
/// 2. The bag is shuffled (Fisher–Yates)
/// 3. Pieces are drawn from the back until the bag is empty
/// 4. Only an empty bag is refilled
///
/// Every aligned group of seven draws therefore contains each piece exactly
/// once, and no piece can be absent for more than twelve draws in a row.
///
/// # Example
///
/// ```
/// use blockfall_engine::{PieceBag, PieceKind};
///
/// let mut bag = PieceBag::new();
/// let mut kinds: Vec<_> = (0..7).map(|_| bag.next().kind()).collect();
/// kinds.sort_by_key(|kind| *kind as u8);
/// assert_eq!(kinds, PieceKind::ALL);
/// ```
#[derive(Debug, Clone)]
pub struct PieceBag {
    rng: Pcg32,
    bag: ArrayVec<Tetromino, { PieceKind::LEN }>,
}

impl Default for PieceBag {
    fn default() -> Self {
        Self::new()
    }
}

/// Seed for deterministic piece generation.
///
/// A 128-bit seed for the randomizers of a board. The same seed produces the
/// same piece sequence and the same garbage holes, which makes games
/// reproducible from the command line and in tests.
///
/// Seeds serialize as a 32 character hex string and parse from the same text.
///
/// # Example
///
/// ```
/// use blockfall_engine::{PieceBag, PieceSeed};
/// use rand::Rng as _;
///
/// let seed: PieceSeed = rand::rng().random();
/// let mut a = PieceBag::with_seed(seed);
/// let mut b = PieceBag::with_seed(seed);
/// assert_eq!(a.next(), b.next());
///
/// let parsed: PieceSeed = seed.to_string().parse().unwrap();
/// assert_eq!(parsed, seed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

/// Error returned when a seed is not a 32 character hex string.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex: {reason}")]
pub struct ParseSeedError {
    reason: String,
}

impl FromStr for PieceSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParseSeedError {
                reason: format!("expected 32 characters, got {}", s.len()),
            });
        }
        let num = u128::from_str_radix(s, 16).map_err(|e| ParseSeedError {
            reason: format!("{s} ({e})"),
        })?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut hex_str = String::with_capacity(2 * self.0.len());
        write!(&mut hex_str, "{self}").map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&hex_str)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `PieceSeed` values with `rng.random()`.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

impl PieceBag {
    /// Creates a bag seeded from the thread RNG.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for a deterministic sequence.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::from_rng(Pcg32::from_seed(seed.0))
    }

    pub(crate) fn from_rng(rng: Pcg32) -> Self {
        Self {
            rng,
            bag: ArrayVec::new(),
        }
    }

    /// Number of pieces left before the next refill.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.bag.len()
    }

    /// Draws the next piece, refilling and shuffling the bag first if it is empty.
    ///
    /// The returned value is a copy of a catalog entry.
    pub fn next(&mut self) -> Tetromino {
        if self.bag.is_empty() {
            self.bag.extend(PieceKind::ALL.map(PieceKind::tetromino));
            self.bag.shuffle(&mut self.rng);
        }
        match self.bag.pop() {
            Some(piece) => piece,
            None => unreachable!("bag was refilled"),
        }
    }
}
