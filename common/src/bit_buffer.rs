//! Word-packed bit vector for object masks.
//!
//! Bits are stored LSB-first in `u64` words. Bits past `len` in the last word
//! are always zero, so a buffer's words can be copied verbatim into a larger
//! word-aligned region without leaking stray bits into a neighbor.

use std::fmt;

/// Number of bits per storage word.
pub const BITS_PER_WORD: usize = 64;

/// Number of words needed to hold `len` bits.
#[inline]
pub const fn words_for_bits(len: usize) -> usize {
    len.div_ceil(BITS_PER_WORD)
}

#[derive(Clone, PartialEq, Eq, Default)]
pub struct BitBuffer {
    words: Vec<u64>,
    len: usize,
}

impl BitBuffer {
    /// Create a buffer of `len` bits, all set to `value`.
    #[inline]
    pub fn new_filled(len: usize, value: bool) -> Self {
        let fill = if value { !0u64 } else { 0u64 };
        let mut buffer = Self {
            words: vec![fill; words_for_bits(len)],
            len,
        };
        buffer.clear_tail();
        buffer
    }

    /// Create a buffer of `len` bits, all clear.
    #[inline]
    pub fn new_default(len: usize) -> Self {
        Self::new_filled(len, false)
    }

    /// Create a buffer from a slice of booleans, one bit per element.
    pub fn from_slice(data: &[bool]) -> Self {
        let mut words = vec![0u64; words_for_bits(data.len())];
        for (i, &value) in data.iter().enumerate() {
            if value {
                words[i / BITS_PER_WORD] |= 1u64 << (i % BITS_PER_WORD);
            }
        }
        Self {
            words,
            len: data.len(),
        }
    }

    /// Take ownership of packed words holding `len` bits.
    ///
    /// Bits beyond `len` are cleared.
    pub fn from_words(mut words: Vec<u64>, len: usize) -> Self {
        assert!(
            words.len() >= words_for_bits(len),
            "{} words cannot hold {} bits",
            words.len(),
            len
        );
        words.truncate(words_for_bits(len));
        let mut buffer = Self { words, len };
        buffer.clear_tail();
        buffer
    }

    /// Copy `len` bits starting at word `word_offset` of `src`.
    pub fn from_word_slice(src: &[u64], word_offset: usize, len: usize) -> Self {
        let end = word_offset + words_for_bits(len);
        Self::from_words(src[word_offset..end].to_vec(), len)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn get(&self, idx: usize) -> bool {
        debug_assert!(idx < self.len, "bit {} out of range {}", idx, self.len);
        (self.words[idx / BITS_PER_WORD] >> (idx % BITS_PER_WORD)) & 1 != 0
    }

    #[inline]
    pub fn set(&mut self, idx: usize, value: bool) {
        debug_assert!(idx < self.len, "bit {} out of range {}", idx, self.len);
        let word = &mut self.words[idx / BITS_PER_WORD];
        let bit = 1u64 << (idx % BITS_PER_WORD);
        if value {
            *word |= bit;
        } else {
            *word &= !bit;
        }
    }

    #[inline]
    pub fn fill(&mut self, value: bool) {
        let fill = if value { !0u64 } else { 0u64 };
        self.words.fill(fill);
        self.clear_tail();
    }

    /// Packed storage, LSB-first within each word.
    #[inline]
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    #[inline]
    pub fn num_words(&self) -> usize {
        self.words.len()
    }

    #[inline]
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Index of the highest set bit, if any.
    pub fn last_set_bit(&self) -> Option<usize> {
        let i = self.words.iter().rposition(|&word| word != 0)?;
        let high_bit = BITS_PER_WORD - 1 - self.words[i].leading_zeros() as usize;
        Some(i * BITS_PER_WORD + high_bit)
    }

    #[inline]
    pub fn iter(&self) -> BitIter<'_> {
        BitIter {
            buffer: self,
            idx: 0,
        }
    }

    /// Iterate over the indices of set bits in ascending order.
    #[inline]
    pub fn iter_ones(&self) -> OnesIter<'_> {
        OnesIter {
            words: &self.words,
            word_idx: 0,
            current: self.words.first().copied().unwrap_or(0),
        }
    }

    fn clear_tail(&mut self) {
        let used = self.len % BITS_PER_WORD;
        if used != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= (1u64 << used) - 1;
            }
        }
    }
}

impl fmt::Debug for BitBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitBuffer({} bits, {} set)", self.len, self.count_ones())
    }
}

impl From<&BitBuffer> for Vec<bool> {
    #[inline]
    fn from(buf: &BitBuffer) -> Self {
        buf.iter().collect()
    }
}

pub struct BitIter<'a> {
    buffer: &'a BitBuffer,
    idx: usize,
}

impl Iterator for BitIter<'_> {
    type Item = bool;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.idx < self.buffer.len {
            let value = self.buffer.get(self.idx);
            self.idx += 1;
            Some(value)
        } else {
            None
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.buffer.len - self.idx;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BitIter<'_> {}

pub struct OnesIter<'a> {
    words: &'a [u64],
    word_idx: usize,
    current: u64,
}

impl Iterator for OnesIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        while self.current == 0 {
            self.word_idx += 1;
            self.current = *self.words.get(self.word_idx)?;
        }
        let bit = self.current.trailing_zeros() as usize;
        // clear lowest set bit
        self.current &= self.current - 1;
        Some(self.word_idx * BITS_PER_WORD + bit)
    }
}
