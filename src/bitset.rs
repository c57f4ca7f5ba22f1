use crate::error::BitSetError;
use alloc::vec::Vec;
use core::hash::{Hash, Hasher};
use core::iter::{FusedIterator, Iterator};
use core::ops::{BitAnd, BitOr, BitXor, Not};
use tracing::{debug, trace};

/// Computes the number of bytes needed to store `bit_count` bits.
///
/// # Examples
/// ```
/// use grow_bitset::byte_count;
///
/// assert_eq!(byte_count(0), 0);
/// assert_eq!(byte_count(9), 2);
/// assert_eq!(byte_count(16), 2);
/// assert_eq!(byte_count(17), 3);
/// ```
pub const fn byte_count(bit_count: usize) -> usize {
    bit_count.div_ceil(8)
}

/// Counts the set bits of a single byte with a branch-free SWAR reduction.
///
/// Pairs of bits are summed first, then nibbles, then the two nibbles are
/// combined.
///
/// # Examples
/// ```
/// use grow_bitset::popcount_byte;
///
/// assert_eq!(popcount_byte(0b0000_0000), 0);
/// assert_eq!(popcount_byte(0b1010_0110), 4);
/// assert_eq!(popcount_byte(0b1111_1111), 8);
/// ```
pub const fn popcount_byte(n: u8) -> u8 {
    let n = n - ((n >> 1) & 0x55);
    let n = (n & 0x33) + ((n >> 2) & 0x33);
    (n + (n >> 4)) & 0x0F
}

#[inline]
const fn fill_byte(fill: bool) -> u8 {
    if fill { !0u8 } else { 0u8 }
}

/// A growable set of bits stored in a packed byte buffer.
///
/// Bit `i` lives in bit `i % 8` (least significant first) of byte `i / 8`.
/// The capacity is always a multiple of 8. Writing beyond the current
/// capacity doubles the buffer until the bit fits; the new bytes are all ones
/// or all zeros depending on the fill policy chosen at construction.
///
/// Two bitsets compare equal when their byte buffers are identical. The fill
/// policy does not take part in equality or hashing.
///
/// `BitSet` has no internal synchronization. Sharing one between threads for
/// mutation requires an external lock.
#[derive(Clone)]
pub struct BitSet {
    bytes: Vec<u8>,
    fill: bool,
}

impl BitSet {
    /// Capacity in bits used by [`new`](BitSet::new) and [`Default`].
    pub const DEFAULT_CAPACITY: usize = 64;

    /// Fill policy used by [`new`](BitSet::new) and [`Default`].
    pub const DEFAULT_FILL: bool = false;

    /// Creates a 64 bit bitset with all bits unset that grows with zeros.
    ///
    /// # Examples
    /// ```
    /// use grow_bitset::BitSet;
    ///
    /// let bitset = BitSet::new();
    /// assert_eq!(bitset.capacity(), 64);
    /// assert_eq!(bitset.count(), 0);
    /// ```
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY, Self::DEFAULT_FILL)
    }

    /// Creates a bitset holding at least `capacity_bits` bits.
    ///
    /// The capacity is rounded up to the next multiple of 8. Every byte starts
    /// as `0xFF` if `fill` is `true` and `0x00` otherwise, and `fill` is kept
    /// as the value for bytes added by later growth. A capacity of 0 is
    /// allowed.
    ///
    /// # Examples
    /// ```
    /// use grow_bitset::BitSet;
    ///
    /// let bitset = BitSet::with_capacity(10, true);
    /// assert_eq!(bitset.capacity(), 16);
    /// assert_eq!(bitset.count(), 16);
    /// ```
    pub fn with_capacity(capacity_bits: usize, fill: bool) -> Self {
        Self {
            bytes: alloc::vec![fill_byte(fill); byte_count(capacity_bits)],
            fill,
        }
    }

    /// Adopts `bytes` as the backing buffer.
    ///
    /// # Examples
    /// ```
    /// use grow_bitset::BitSet;
    ///
    /// let bitset = BitSet::from_bytes(vec![0b0000_0101, 0b1000_0000], false);
    /// assert_eq!(bitset.each_set_bit().collect::<Vec<_>>(), [0, 2, 15]);
    /// ```
    pub fn from_bytes(bytes: Vec<u8>, fill: bool) -> Self {
        Self { bytes, fill }
    }

    /// Constructs a default bitset and sets every index the iterator yields,
    /// growing as needed.
    ///
    /// # Examples
    /// ```
    /// use grow_bitset::BitSet;
    ///
    /// let bitset = BitSet::from_ones_iter([0, 2, 100]);
    /// assert_eq!(bitset.test(2), Some(true));
    /// assert_eq!(bitset.test(1), Some(false));
    /// assert_eq!(bitset.capacity(), 128);
    /// ```
    pub fn from_ones_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut bitset = Self::new();
        bitset.extend(iter);
        bitset
    }

    /// Number of addressable bits, always a multiple of 8.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.bytes.len() * 8
    }

    /// Whether bytes added by growth start out all ones.
    #[inline]
    pub fn fill_policy(&self) -> bool {
        self.fill
    }

    /// The backing buffer, least significant bit of byte 0 being bit 0.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    fn idxs(bit: usize) -> (usize, usize) {
        (bit / 8, bit % 8)
    }

    /// Doubles the buffer until `bit` is addressable.
    fn grow_to_fit(&mut self, bit: usize) {
        let byte_idx = bit / 8;
        let old_len = self.bytes.len();
        if byte_idx < old_len {
            return;
        }
        // an empty buffer cannot double
        let mut new_len = old_len.max(1);
        while new_len <= byte_idx {
            new_len = match new_len.checked_mul(2) {
                Some(len) => len,
                None => panic!("bit index {bit} exceeds addressable capacity"),
            };
        }
        self.bytes.resize(new_len, fill_byte(self.fill));
        debug!(
            bit,
            old_bytes = old_len,
            new_bytes = new_len,
            fill = self.fill,
            "grew bitset buffer"
        );
    }

    /// Sets the bit at the given index, growing the buffer if needed.
    ///
    /// # Examples
    /// ```
    /// use grow_bitset::BitSet;
    ///
    /// let mut bitset = BitSet::new();
    /// bitset.set(3).set(100);
    /// assert_eq!(bitset.test(3), Some(true));
    /// assert_eq!(bitset.test(100), Some(true));
    /// assert_eq!(bitset.capacity(), 128);
    /// ```
    #[inline]
    pub fn set(&mut self, bit: usize) -> &mut Self {
        self.grow_to_fit(bit);
        let (byte_idx, bit_idx) = Self::idxs(bit);
        self.bytes[byte_idx] |= 1 << bit_idx;
        self
    }

    /// Unsets the bit at the given index, growing the buffer if needed.
    ///
    /// # Examples
    /// ```
    /// use grow_bitset::BitSet;
    ///
    /// let mut bitset = BitSet::with_capacity(8, true);
    /// bitset.unset(3);
    /// assert_eq!(bitset.test(3), Some(false));
    /// bitset.unset(20);
    /// assert_eq!(bitset.capacity(), 32);
    /// assert_eq!(bitset.test(19), Some(true));
    /// ```
    #[inline]
    pub fn unset(&mut self, bit: usize) -> &mut Self {
        self.grow_to_fit(bit);
        let (byte_idx, bit_idx) = Self::idxs(bit);
        self.bytes[byte_idx] &= !(1 << bit_idx);
        self
    }

    /// Toggles the bit at the given index, growing the buffer if needed.
    ///
    /// Returns the previous value of the bit. A bit that only came into
    /// existence through growth had the fill policy as its previous value.
    ///
    /// # Examples
    /// ```
    /// use grow_bitset::BitSet;
    ///
    /// let mut bitset = BitSet::new();
    /// assert_eq!(bitset.toggle(4), false);
    /// assert_eq!(bitset.toggle(4), true);
    /// ```
    pub fn toggle(&mut self, bit: usize) -> bool {
        self.grow_to_fit(bit);
        let (byte_idx, bit_idx) = Self::idxs(bit);
        let previous = self.bytes[byte_idx] & 1 << bit_idx != 0;
        self.bytes[byte_idx] ^= 1 << bit_idx;
        previous
    }

    /// Returns the value of the bit at the given index, or `None` if the
    /// index lies beyond the allocated capacity. Never grows the buffer.
    ///
    /// # Examples
    /// ```
    /// use grow_bitset::BitSet;
    ///
    /// let mut bitset = BitSet::new();
    /// bitset.set(1);
    /// assert_eq!(bitset.test(1), Some(true));
    /// assert_eq!(bitset.test(0), Some(false));
    /// assert_eq!(bitset.test(64), None);
    /// ```
    #[inline]
    pub fn test(&self, bit: usize) -> Option<bool> {
        let (byte_idx, bit_idx) = Self::idxs(bit);
        self.bytes
            .get(byte_idx)
            .map(|byte| *byte & 1 << bit_idx != 0)
    }

    /// Returns `true` if the bit is allocated and set.
    #[inline]
    pub fn is_set(&self, bit: usize) -> bool {
        self.test(bit) == Some(true)
    }

    /// Sets every bit of the current capacity.
    ///
    /// # Examples
    /// ```
    /// use grow_bitset::BitSet;
    ///
    /// let mut bitset = BitSet::with_capacity(24, false);
    /// bitset.set_all();
    /// assert_eq!(bitset.count(), 24);
    /// ```
    pub fn set_all(&mut self) -> &mut Self {
        self.bytes.fill(!0);
        self
    }

    /// Unsets every bit of the current capacity.
    pub fn unset_all(&mut self) -> &mut Self {
        self.bytes.fill(0);
        self
    }

    /// Returns the number of set bits.
    ///
    /// # Examples
    /// ```
    /// use grow_bitset::BitSet;
    ///
    /// let bitset = BitSet::from_ones_iter([1, 9, 63]);
    /// assert_eq!(bitset.count(), 3);
    /// ```
    pub fn count(&self) -> usize {
        self.bytes
            .iter()
            .map(|byte| popcount_byte(*byte) as usize)
            .sum()
    }

    /// Returns the index of the first set bit or `None` if all bits are unset.
    ///
    /// # Examples
    /// ```
    /// use grow_bitset::BitSet;
    ///
    /// let mut bitset = BitSet::new();
    /// assert_eq!(bitset.first_set_bit(), None);
    /// bitset.set(42);
    /// assert_eq!(bitset.first_set_bit(), Some(42));
    /// ```
    pub fn first_set_bit(&self) -> Option<usize> {
        self.bytes
            .iter()
            .position(|byte| *byte != 0)
            .map(|i| i * 8 + self.bytes[i].trailing_zeros() as usize)
    }

    fn check_capacity(&self, other: &Self) -> Result<(), BitSetError> {
        if self.bytes.len() != other.bytes.len() {
            let (left, right) = (self.capacity(), other.capacity());
            trace!(left, right, "rejecting set operation on mismatched capacities");
            return Err(BitSetError::CapacityMismatch { left, right });
        }
        Ok(())
    }

    /// Sets every bit of `self` that is set in `other`.
    ///
    /// # Errors
    /// Returns [`BitSetError::CapacityMismatch`] without touching either
    /// operand if the capacities differ.
    ///
    /// # Examples
    /// ```
    /// use grow_bitset::BitSet;
    ///
    /// let mut a = BitSet::from_ones_iter([1, 2]);
    /// let b = BitSet::from_ones_iter([2, 3]);
    /// a.union_in_place(&b)?.set(7);
    /// assert_eq!(a.each_set_bit().collect::<Vec<_>>(), [1, 2, 3, 7]);
    /// # Ok::<(), grow_bitset::BitSetError>(())
    /// ```
    pub fn union_in_place(&mut self, other: &Self) -> Result<&mut Self, BitSetError> {
        self.check_capacity(other)?;
        for (self_byte, other_byte) in self.bytes.iter_mut().zip(other.bytes.iter()) {
            *self_byte |= other_byte
        }
        Ok(self)
    }

    /// Returns the union of `self` and `other` as a new bitset.
    ///
    /// # Errors
    /// Returns [`BitSetError::CapacityMismatch`] if the capacities differ.
    ///
    /// # Examples
    /// ```
    /// use grow_bitset::{BitSet, BitSetError};
    ///
    /// let a = BitSet::from_ones_iter([1, 2]);
    /// let b = BitSet::from_ones_iter([2, 3]);
    /// assert_eq!(a.union(&b)?, BitSet::from_ones_iter([1, 2, 3]));
    ///
    /// let wide = BitSet::with_capacity(128, false);
    /// assert_eq!(
    ///     a.union(&wide),
    ///     Err(BitSetError::CapacityMismatch { left: 64, right: 128 })
    /// );
    /// # Ok::<(), BitSetError>(())
    /// ```
    pub fn union(&self, other: &Self) -> Result<Self, BitSetError> {
        let mut result = self.clone();
        result.union_in_place(other)?;
        Ok(result)
    }

    /// Keeps only the bits of `self` that are also set in `other`.
    ///
    /// # Errors
    /// Returns [`BitSetError::CapacityMismatch`] without touching either
    /// operand if the capacities differ.
    pub fn intersection_in_place(&mut self, other: &Self) -> Result<&mut Self, BitSetError> {
        self.check_capacity(other)?;
        for (self_byte, other_byte) in self.bytes.iter_mut().zip(other.bytes.iter()) {
            *self_byte &= other_byte
        }
        Ok(self)
    }

    /// Returns the intersection of `self` and `other` as a new bitset.
    ///
    /// # Errors
    /// Returns [`BitSetError::CapacityMismatch`] if the capacities differ.
    ///
    /// # Examples
    /// ```
    /// use grow_bitset::BitSet;
    ///
    /// let a = BitSet::from_ones_iter([1, 2]);
    /// let b = BitSet::from_ones_iter([2, 3]);
    /// assert_eq!(a.intersection(&b)?, BitSet::from_ones_iter([2]));
    /// # Ok::<(), grow_bitset::BitSetError>(())
    /// ```
    pub fn intersection(&self, other: &Self) -> Result<Self, BitSetError> {
        let mut result = self.clone();
        result.intersection_in_place(other)?;
        Ok(result)
    }

    /// Keeps the bits that are set in exactly one of `self` and `other`.
    ///
    /// # Errors
    /// Returns [`BitSetError::CapacityMismatch`] without touching either
    /// operand if the capacities differ.
    pub fn symmetric_difference_in_place(
        &mut self,
        other: &Self,
    ) -> Result<&mut Self, BitSetError> {
        self.check_capacity(other)?;
        for (self_byte, other_byte) in self.bytes.iter_mut().zip(other.bytes.iter()) {
            *self_byte ^= other_byte
        }
        Ok(self)
    }

    /// Returns the bits set in exactly one of `self` and `other`.
    ///
    /// # Errors
    /// Returns [`BitSetError::CapacityMismatch`] if the capacities differ.
    ///
    /// # Examples
    /// ```
    /// use grow_bitset::BitSet;
    ///
    /// let a = BitSet::from_ones_iter([1, 2]);
    /// let b = BitSet::from_ones_iter([2, 3]);
    /// assert_eq!(a.symmetric_difference(&b)?, BitSet::from_ones_iter([1, 3]));
    /// # Ok::<(), grow_bitset::BitSetError>(())
    /// ```
    pub fn symmetric_difference(&self, other: &Self) -> Result<Self, BitSetError> {
        let mut result = self.clone();
        result.symmetric_difference_in_place(other)?;
        Ok(result)
    }

    /// Returns a new bitset of the same capacity with every bit inverted.
    ///
    /// # Examples
    /// ```
    /// use grow_bitset::BitSet;
    ///
    /// let a = BitSet::from_ones_iter([0, 5]);
    /// let b = a.complement();
    /// assert_eq!(b.count(), 62);
    /// assert_eq!(b.test(0), Some(false));
    /// assert_eq!(b.test(1), Some(true));
    /// ```
    pub fn complement(&self) -> Self {
        Self {
            bytes: self.bytes.iter().map(|byte| !byte).collect(),
            fill: self.fill,
        }
    }

    /// Inverts every bit in place.
    ///
    /// # Examples
    /// ```
    /// use grow_bitset::BitSet;
    ///
    /// let mut a = BitSet::from_ones_iter([3]);
    /// a.toggle_all_in_place();
    /// assert_eq!(a.count(), 63);
    /// a.toggle_all_in_place();
    /// assert_eq!(a, BitSet::from_ones_iter([3]));
    /// ```
    pub fn toggle_all_in_place(&mut self) -> &mut Self {
        for byte in &mut self.bytes {
            *byte = !*byte;
        }
        self
    }

    /// Returns an iterator over all bits as `bool`, from least to most
    /// significant.
    ///
    /// The iterator yields exactly [`capacity`](BitSet::capacity) items.
    #[inline]
    pub fn iter(&self) -> BitSetIter<'_> {
        BitSetIter {
            bytes: &self.bytes,
            byte_idx: 0,
            bit_idx: 0,
        }
    }

    /// Returns an iterator over the indices of all set bits, in ascending
    /// order.
    ///
    /// The iterator covers the capacity at the time of the call and borrows
    /// the bitset, so the set cannot be mutated while it is alive.
    ///
    /// # Examples
    /// ```
    /// use grow_bitset::BitSet;
    ///
    /// let mut bitset = BitSet::new();
    /// bitset.set(10).set(2).set(3);
    /// assert_eq!(bitset.each_set_bit().collect::<Vec<_>>(), [2, 3, 10]);
    /// ```
    #[inline]
    pub fn each_set_bit(&self) -> IterOnes<'_> {
        IterOnes {
            bytes: &self.bytes,
            byte_idx: 0,
            current: self.bytes.first().copied().unwrap_or(0),
            base_bit_idx: 0,
        }
    }

    /// Returns an iterator over the indices of all unset bits, in ascending
    /// order.
    ///
    /// # Examples
    /// ```
    /// use grow_bitset::BitSet;
    ///
    /// let mut bitset = BitSet::with_capacity(8, true);
    /// bitset.unset(1).unset(6);
    /// assert_eq!(bitset.iter_zeros().collect::<Vec<_>>(), [1, 6]);
    /// ```
    #[inline]
    pub fn iter_zeros(&self) -> IterZeros<'_> {
        IterZeros {
            bytes: &self.bytes,
            byte_idx: 0,
            current: !self.bytes.first().copied().unwrap_or(!0),
            base_bit_idx: 0,
        }
    }
}

impl Default for BitSet {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for BitSet {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for BitSet {}

impl Hash for BitSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl FromIterator<usize> for BitSet {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        Self::from_ones_iter(iter)
    }
}

impl Extend<usize> for BitSet {
    fn extend<T: IntoIterator<Item = usize>>(&mut self, iter: T) {
        for bit in iter {
            self.set(bit);
        }
    }
}

impl<'bitset> IntoIterator for &'bitset BitSet {
    type Item = usize;
    type IntoIter = IterOnes<'bitset>;

    fn into_iter(self) -> Self::IntoIter {
        self.each_set_bit()
    }
}

impl BitAnd for &BitSet {
    type Output = Result<BitSet, BitSetError>;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.intersection(rhs)
    }
}

impl BitOr for &BitSet {
    type Output = Result<BitSet, BitSetError>;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl BitXor for &BitSet {
    type Output = Result<BitSet, BitSetError>;

    fn bitxor(self, rhs: Self) -> Self::Output {
        self.symmetric_difference(rhs)
    }
}

impl Not for &BitSet {
    type Output = BitSet;

    fn not(self) -> Self::Output {
        self.complement()
    }
}

impl Not for BitSet {
    type Output = Self;

    fn not(mut self) -> Self::Output {
        self.toggle_all_in_place();
        self
    }
}

/// Iterator over all bits in the bitset as `bool` values.
///
/// Returned by [`BitSet::iter()`].
#[derive(Clone, Copy)]
pub struct BitSetIter<'bitset> {
    bytes: &'bitset [u8],
    byte_idx: usize,
    bit_idx: usize,
}

impl Iterator for BitSetIter<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<Self::Item> {
        let byte = self.bytes.get(self.byte_idx)?;
        let bit = byte & 1 << self.bit_idx;
        self.bit_idx += 1;
        if self.bit_idx == 8 {
            self.bit_idx = 0;
            self.byte_idx += 1;
        }
        Some(bit != 0)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.bytes.len() * 8).saturating_sub(self.byte_idx * 8 + self.bit_idx);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BitSetIter<'_> {}

impl FusedIterator for BitSetIter<'_> {}

/// Iterator over the indices of set bits in the bitset.
///
/// Returned by [`BitSet::each_set_bit()`].
#[derive(Clone, Copy)]
pub struct IterOnes<'bitset> {
    bytes: &'bitset [u8],
    byte_idx: usize,
    current: u8,
    base_bit_idx: usize,
}

impl Iterator for IterOnes<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        while self.byte_idx < self.bytes.len() {
            if self.current != 0 {
                let tz = self.current.trailing_zeros() as usize;
                self.current &= self.current - 1; // unset LSB
                return Some(self.base_bit_idx + tz);
            }

            self.byte_idx += 1;
            self.base_bit_idx += 8;
            self.current = self.bytes.get(self.byte_idx).copied().unwrap_or(0);
        }
        None
    }
}

impl FusedIterator for IterOnes<'_> {}

/// Iterator over the indices of unset bits in the bitset.
///
/// Returned by [`BitSet::iter_zeros()`].
#[derive(Clone, Copy)]
pub struct IterZeros<'bitset> {
    bytes: &'bitset [u8],
    byte_idx: usize,
    current: u8,
    base_bit_idx: usize,
}

impl Iterator for IterZeros<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        while self.byte_idx < self.bytes.len() {
            if self.current != 0 {
                let tz = self.current.trailing_zeros() as usize;
                self.current &= self.current - 1; // unset LSB
                return Some(self.base_bit_idx + tz);
            }

            self.byte_idx += 1;
            self.base_bit_idx += 8;
            self.current = !self.bytes.get(self.byte_idx).copied().unwrap_or(!0);
        }
        None
    }
}

impl FusedIterator for IterZeros<'_> {}
