//! Tile values and tile multisets.
//!
//! ## Tile
//!
//! Immutable value identifying a playable unit by two attributes:
//! a color (written as a letter) and a rank (written as a number).
//! Compared and ordered by value; many copies of an identical tile
//! may exist at once.
//!
//! ## TileSet
//!
//! Count-based multiset over every (color, rank) kind. Backs the shared
//! pool and the private hands. Supports the multiset algebra the engine
//! needs: add/remove with multiplicity, subset tests against groups.
//!
//! ## TileGroup
//!
//! Small sorted multiset of tiles, used as the payload of meld actions.
//! Kept sorted at all times, so equality and hashing give multiset
//! semantics for free - two groups naming the same tiles in any order
//! compare equal.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Letters used for color short-codes, in color-index order.
pub const COLOR_LETTERS: &[u8; 8] = b"RYBGKWPC";

/// A single tile, identified by color and rank.
///
/// Ranks are 1-based. Ordering is by color first, then rank, which fixes
/// the canonical order used by sorted groups and enumeration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tile {
    color: u8,
    rank: u8,
}

impl Tile {
    /// Create a tile from a color index and a 1-based rank.
    #[must_use]
    pub const fn new(color: u8, rank: u8) -> Self {
        Self { color, rank }
    }

    /// Parse a tile from its canonical short-code, e.g. `"B3"`.
    ///
    /// The leading letter selects the color (see [`COLOR_LETTERS`]), the
    /// remaining digits the rank. Returns `None` for anything malformed.
    /// Authoring-time entry point only - never on the search hot path.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        let mut chars = code.chars();
        let letter = chars.next()?.to_ascii_uppercase();
        let color = COLOR_LETTERS.iter().position(|&c| c as char == letter)? as u8;
        let rank: u8 = chars.as_str().parse().ok()?;
        if rank == 0 {
            return None;
        }
        Some(Self { color, rank })
    }

    /// Color index.
    #[must_use]
    pub const fn color(self) -> u8 {
        self.color
    }

    /// 1-based rank.
    #[must_use]
    pub const fn rank(self) -> u8 {
        self.rank
    }

    /// The color letter used in short-codes.
    #[must_use]
    pub fn letter(self) -> char {
        COLOR_LETTERS
            .get(self.color as usize)
            .map(|&c| c as char)
            .unwrap_or('?')
    }

    /// Score value of this tile when melded.
    #[must_use]
    pub fn value(self) -> i32 {
        i32::from(self.rank)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter(), self.rank)
    }
}

/// Count-based multiset over every (color, rank) tile kind.
///
/// Dimensions are fixed at construction; all sets manipulated together
/// must share them. Counts are `u8` - rule validation bounds copies well
/// below that.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileSet {
    counts: SmallVec<[u8; 32]>,
    ranks: u8,
}

impl TileSet {
    /// Create an empty set sized for `colors * ranks` kinds.
    #[must_use]
    pub fn new(colors: u8, ranks: u8) -> Self {
        Self {
            counts: SmallVec::from_elem(0, colors as usize * ranks as usize),
            ranks,
        }
    }

    /// Create a set holding `copies` of every kind - the full pool
    /// composition.
    #[must_use]
    pub fn filled(colors: u8, ranks: u8, copies: u8) -> Self {
        Self {
            counts: SmallVec::from_elem(copies, colors as usize * ranks as usize),
            ranks,
        }
    }

    /// Slot for `tile`, or `None` for tiles outside this set's
    /// dimensions (rank 0 included). Keeps every read fail-closed.
    fn index(&self, tile: Tile) -> Option<usize> {
        let rank = (tile.rank() as usize).checked_sub(1)?;
        if rank >= self.ranks as usize {
            return None;
        }
        let idx = tile.color() as usize * self.ranks as usize + rank;
        (idx < self.counts.len()).then_some(idx)
    }

    /// Number of copies of `tile` in the set. Zero for tiles outside the
    /// set's dimensions.
    #[must_use]
    pub fn count(&self, tile: Tile) -> usize {
        self.index(tile)
            .map(|i| self.counts[i] as usize)
            .unwrap_or(0)
    }

    /// Total number of tiles across all kinds.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().map(|&c| c as usize).sum()
    }

    /// True when no tiles remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Add one copy of `tile`.
    pub fn add(&mut self, tile: Tile) {
        self.add_n(tile, 1);
    }

    /// Add `n` copies of `tile`.
    ///
    /// Panics for tiles outside the set's dimensions; the engine only
    /// ever adds tiles it previously removed or dealt.
    pub fn add_n(&mut self, tile: Tile, n: usize) {
        let idx = self.index(tile).expect("tile out of range for this set");
        self.counts[idx] += n as u8;
    }

    /// Remove one copy of `tile`. Returns false (without mutating) if the
    /// set holds none.
    pub fn remove(&mut self, tile: Tile) -> bool {
        self.remove_n(tile, 1)
    }

    /// Remove `n` copies of `tile`. Returns false (without mutating) if
    /// fewer than `n` copies are present, including for tiles outside
    /// the set's dimensions.
    pub fn remove_n(&mut self, tile: Tile, n: usize) -> bool {
        let idx = match self.index(tile) {
            Some(idx) => idx,
            None => return false,
        };
        if (self.counts[idx] as usize) < n {
            return false;
        }
        self.counts[idx] -= n as u8;
        true
    }

    /// True when every tile of `group` is present with sufficient
    /// multiplicity.
    #[must_use]
    pub fn contains_group(&self, group: &TileGroup) -> bool {
        group.iter_counts().all(|(tile, n)| self.count(tile) >= n)
    }

    /// Move `group` out of the set. Returns false (without mutating) if
    /// the group is not fully contained.
    pub fn remove_group(&mut self, group: &TileGroup) -> bool {
        if !self.contains_group(group) {
            return false;
        }
        for tile in group.iter() {
            // contains_group passed: the slot exists and is non-zero
            let idx = self.index(tile).expect("tile out of range for this set");
            self.counts[idx] -= 1;
        }
        true
    }

    /// Add every tile of `group` to the set.
    pub fn add_group(&mut self, group: &TileGroup) {
        for tile in group.iter() {
            self.add(tile);
        }
    }

    /// Iterate `(tile, count)` over kinds with a non-zero count, in
    /// canonical (color, rank) order.
    pub fn iter(&self) -> impl Iterator<Item = (Tile, usize)> + '_ {
        let ranks = self.ranks as usize;
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &c)| c > 0)
            .map(move |(i, &c)| {
                let tile = Tile::new((i / ranks) as u8, (i % ranks + 1) as u8);
                (tile, c as usize)
            })
    }

    /// Rank dimension this set was sized for.
    #[must_use]
    pub fn ranks(&self) -> u8 {
        self.ranks
    }
}

impl fmt::Display for TileSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        let mut first = true;
        for (tile, count) in self.iter() {
            if !first {
                write!(f, " ")?;
            }
            first = false;
            write!(f, "{}x{}", tile, count)?;
        }
        write!(f, "}}")
    }
}

/// Small sorted multiset of tiles - the payload of a meld.
///
/// The backing vector is kept sorted on every insertion, so this type is
/// its own normalized multiset key: derived equality and hashing compare
/// groups by content, not by insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileGroup(SmallVec<[Tile; 8]>);

impl TileGroup {
    /// Empty group.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a group from any tile sequence; order does not matter.
    #[must_use]
    pub fn from_tiles(tiles: impl IntoIterator<Item = Tile>) -> Self {
        let mut inner: SmallVec<[Tile; 8]> = tiles.into_iter().collect();
        inner.sort_unstable();
        Self(inner)
    }

    /// Parse a whitespace-separated list of short-codes, e.g. `"B3 B4 B5"`.
    #[must_use]
    pub fn from_codes(codes: &str) -> Option<Self> {
        let tiles: Option<Vec<Tile>> = codes.split_whitespace().map(Tile::from_code).collect();
        Some(Self::from_tiles(tiles?))
    }

    /// Insert a tile at its sorted position.
    pub fn push(&mut self, tile: Tile) {
        let pos = self.0.partition_point(|&t| t <= tile);
        self.0.insert(pos, tile);
    }

    /// Number of tiles in the group, counting multiplicity.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the group holds no tiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate tiles in canonical order, with multiplicity.
    pub fn iter(&self) -> impl Iterator<Item = Tile> + '_ {
        self.0.iter().copied()
    }

    /// Iterate `(tile, count)` pairs in canonical order.
    pub fn iter_counts(&self) -> impl Iterator<Item = (Tile, usize)> + '_ {
        let inner = &self.0;
        let mut i = 0;
        std::iter::from_fn(move || {
            if i >= inner.len() {
                return None;
            }
            let tile = inner[i];
            let mut n = 1;
            while i + n < inner.len() && inner[i + n] == tile {
                n += 1;
            }
            i += n;
            Some((tile, n))
        })
    }

    /// Combined score value of the tiles in the group.
    #[must_use]
    pub fn points(&self) -> i32 {
        self.0.iter().map(|t| t.value()).sum()
    }
}

impl fmt::Display for TileGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, tile) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", tile)?;
        }
        write!(f, "]")
    }
}
