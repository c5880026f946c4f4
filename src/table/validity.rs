/// Bit-packed presence map running parallel to a column's values.
///
/// A set bit marks a present value, a cleared bit marks an absent cell.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Validity {
    bits: Vec<u64>,
    len: usize,
}

impl Validity {
    const WORD_BITS: usize = 64;

    /// Creates an empty map with room for `capacity` cells.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bits: Vec::with_capacity(capacity.div_ceil(Self::WORD_BITS)),
            len: 0,
        }
    }

    /// Appends one cell.
    pub fn push(&mut self, present: bool) {
        let (word, bit) = (self.len / Self::WORD_BITS, self.len % Self::WORD_BITS);
        if word == self.bits.len() {
            self.bits.push(0);
        }
        if present {
            self.bits[word] |= 1 << bit;
        }
        self.len += 1;
    }

    /// Returns true if the cell at `index` holds a value.
    /// Out of range indexes read as absent.
    #[inline]
    pub fn is_present(&self, index: usize) -> bool {
        index < self.len
            && (self.bits[index / Self::WORD_BITS] >> (index % Self::WORD_BITS)) & 1 == 1
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of present cells.
    pub fn present_count(&self) -> usize {
        self.bits.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// Number of absent cells.
    pub fn absent_count(&self) -> usize {
        self.len - self.present_count()
    }

    /// Iterates over the presence flag of every cell.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = bool> + '_ {
        (0..self.len).map(|index| self.is_present(index))
    }
}

impl FromIterator<bool> for Validity {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut validity = Validity::with_capacity(iter.size_hint().0);
        for present in iter {
            validity.push(present);
        }
        validity
    }
}
