//! Sparse character bitset used for prohibited-next-character lookups.
//!
//! Characters are grouped into 64-bit blocks keyed by `c >> 6`. Romaji tables
//! only ever touch one or two blocks, so a sorted block list beats a hash set
//! on both size and lookup cost.

const BLOCK_BITS: u32 = u64::BITS;

/// Immutable set of characters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CharSet {
    /// `(block index, bit mask)` pairs, sorted by block index.
    blocks: Vec<(u32, u64)>,
}

impl CharSet {
    #[inline]
    fn split(c: char) -> (u32, u64) {
        let code = c as u32;
        (code / BLOCK_BITS, 1u64 << (code % BLOCK_BITS))
    }

    pub fn contains(&self, c: char) -> bool {
        let (block, bit) = Self::split(c);
        match self.blocks.binary_search_by_key(&block, |&(b, _)| b) {
            Ok(i) => self.blocks[i].1 & bit != 0,
            Err(_) => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.blocks
            .iter()
            .map(|&(_, mask)| mask.count_ones() as usize)
            .sum()
    }

    /// Members in code point order.
    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.blocks.iter().flat_map(|&(block, mask)| {
            (0..BLOCK_BITS)
                .filter(move |bit| mask & (1u64 << bit) != 0)
                .filter_map(move |bit| char::from_u32(block * BLOCK_BITS + bit))
        })
    }
}

impl FromIterator<char> for CharSet {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        let mut blocks: Vec<(u32, u64)> = Vec::new();
        for c in iter {
            let (block, bit) = Self::split(c);
            match blocks.binary_search_by_key(&block, |&(b, _)| b) {
                Ok(i) => blocks[i].1 |= bit,
                Err(i) => blocks.insert(i, (block, bit)),
            }
        }
        Self { blocks }
    }
}
