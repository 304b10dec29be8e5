//! Hashable search state and the inventories it carries.

use maze_grader_core::CellCoord;

/// Growable bit set indexed by discovery order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub(crate) struct IndexSet {
    words: Vec<u64>,
}

impl IndexSet {
    /// Marks `index` as present. Returns `false` when it already was.
    pub(crate) fn insert(&mut self, index: usize) -> bool {
        let word = index / 64;
        let mask = 1_u64 << (index % 64);
        if self.words.len() <= word {
            self.words.resize(word + 1, 0);
        }
        let fresh = self.words[word] & mask == 0;
        self.words[word] |= mask;
        fresh
    }

    pub(crate) fn contains(&self, index: usize) -> bool {
        self.words
            .get(index / 64)
            .is_some_and(|word| word & (1_u64 << (index % 64)) != 0)
    }

    pub(crate) fn len(&self) -> usize {
        self.words
            .iter()
            .map(|word| word.count_ones() as usize)
            .sum()
    }

    /// Indices in ascending order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words
            .iter()
            .enumerate()
            .flat_map(|(word_index, &word)| {
                (0..64)
                    .filter(move |bit| word & (1_u64 << bit) != 0)
                    .map(move |bit| word_index * 64 + bit)
            })
    }
}

/// Lowercase key letters held, one bit per letter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub(crate) struct KeyRing(u32);

impl KeyRing {
    pub(crate) fn with(self, letter: char) -> Self {
        Self(self.0 | bit(letter))
    }

    pub(crate) fn holds(self, letter: char) -> bool {
        let mask = bit(letter);
        mask != 0 && self.0 & mask != 0
    }

    pub(crate) const fn count(self) -> u32 {
        self.0.count_ones()
    }

    pub(crate) fn letters(self) -> impl Iterator<Item = char> {
        ('a'..='z').filter(move |&letter| self.holds(letter))
    }
}

fn bit(letter: char) -> u32 {
    u32::from(letter)
        .checked_sub(u32::from('a'))
        .filter(|offset| *offset < 26)
        .map_or(0, |offset| 1 << offset)
}

/// Unit of search-space deduplication.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct SearchState {
    pub(crate) position: CellCoord,
    pub(crate) keys: KeyRing,
    pub(crate) switches: IndexSet,
    pub(crate) teleporters: IndexSet,
}

impl SearchState {
    pub(crate) fn at(position: CellCoord) -> Self {
        Self {
            position,
            keys: KeyRing::default(),
            switches: IndexSet::default(),
            teleporters: IndexSet::default(),
        }
    }
}
