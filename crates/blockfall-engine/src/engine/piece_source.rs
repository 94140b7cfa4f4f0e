use std::{fmt::Write as _, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{PieceKind, PieceSeedError, PieceSequenceError};

/// Supplies the kind of each newly generated piece.
///
/// The engine draws from its source at reset (twice: current and next) and
/// once per lock. Tests inject a [`SequencePieceSource`] to get a known
/// order instead of relying on randomness.
pub trait PieceSource {
    fn next_kind(&mut self) -> PieceKind;
}

impl<S> PieceSource for Box<S>
where
    S: PieceSource + ?Sized,
{
    fn next_kind(&mut self) -> PieceKind {
        (**self).next_kind()
    }
}

/// Uniform, independent random draws over the seven kinds.
///
/// There is no 7-bag: any kind may repeat any number of times.
///
/// # Example
///
/// ```
/// use blockfall_engine::{PieceSource as _, RandomPieceSource};
/// use rand::Rng as _;
///
/// let seed = rand::rng().random();
/// let mut a = RandomPieceSource::with_seed(seed);
/// let mut b = RandomPieceSource::with_seed(seed);
///
/// for _ in 0..10 {
///     assert_eq!(a.next_kind(), b.next_kind());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RandomPieceSource {
    rng: Pcg32,
}

impl Default for RandomPieceSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPieceSource {
    /// Creates a source with a random seed.
    ///
    /// For deterministic piece generation, use [`Self::with_seed`] instead.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
        }
    }
}

impl PieceSource for RandomPieceSource {
    fn next_kind(&mut self) -> PieceKind {
        self.rng.random()
    }
}

/// Cycles through a fixed list of kinds forever.
///
/// Parsed from a string of piece letters:
///
/// ```
/// use blockfall_engine::{PieceKind, PieceSource as _, SequencePieceSource};
///
/// let mut source: SequencePieceSource = "IO".parse().unwrap();
/// assert_eq!(source.next_kind(), PieceKind::I);
/// assert_eq!(source.next_kind(), PieceKind::O);
/// assert_eq!(source.next_kind(), PieceKind::I);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencePieceSource {
    kinds: Vec<PieceKind>,
    cursor: usize,
}

impl SequencePieceSource {
    pub fn new(kinds: Vec<PieceKind>) -> Result<Self, PieceSequenceError> {
        if kinds.is_empty() {
            return Err(PieceSequenceError::Empty);
        }
        Ok(Self { kinds, cursor: 0 })
    }
}

impl FromStr for SequencePieceSource {
    type Err = PieceSequenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kinds = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| {
                PieceKind::from_char(c.to_ascii_uppercase())
                    .ok_or(PieceSequenceError::InvalidKind(c))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(kinds)
    }
}

impl PieceSource for SequencePieceSource {
    fn next_kind(&mut self) -> PieceKind {
        let kind = self.kinds[self.cursor];
        self.cursor = (self.cursor + 1) % self.kinds.len();
        kind
    }
}

/// Seed for deterministic piece generation.
///
/// This is a 128-bit (16-byte) seed for [`RandomPieceSource`]. Using the
/// same seed produces the same sequence of pieces. It is written as 32 hex
/// digits, both in serialized form and on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl FromStr for PieceSeed {
    type Err = PieceSeedError;

    fn from_str(hex_str: &str) -> Result<Self, Self::Err> {
        if hex_str.len() != 32 {
            return Err(PieceSeedError::Length(hex_str.len()));
        }
        let num = u128::from_str_radix(hex_str, 16).map_err(PieceSeedError::Digits)?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl std::fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let num = u128::from_be_bytes(self.0);
        write!(f, "{num:032x}")
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

/// Allows generating random `PieceSeed` values using the standard random distribution.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}
