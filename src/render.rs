use crate::bitset::BitSet;
use alloc::string::String;
use core::fmt::{self, Debug, Formatter, Write};

const CHUNK_BITS: usize = 8;
const FIELD_WIDTH: usize = 3;
const BLANK_FIELD: &str = "   ";
const EMPTY: &str = "Empty bitset\n";

impl BitSet {
    /// Window width used by [`to_ascii_default`](BitSet::to_ascii_default).
    pub const DEFAULT_ASCII_WIDTH: usize = 64;

    /// Window width used by the [`Debug`] implementation.
    pub const DEBUG_ASCII_WIDTH: usize = 32;

    /// Renders the bits in `[start, start + width)` as an ASCII table.
    ///
    /// Every row has three lines: hex bit indices, bit values and a border.
    /// Each bit takes a right-aligned field of 3 characters and groups of 8
    /// bits are separated by `|` (`+` in the border). A short trailing group
    /// is padded with blank fields. If the window ends before the capacity,
    /// further rows of the same width follow until the capacity is reached.
    ///
    /// An empty window renders as `"Empty bitset\n"`.
    ///
    /// # Examples
    /// ```
    /// use grow_bitset::BitSet;
    ///
    /// let mut bitset = BitSet::with_capacity(16, false);
    /// bitset.set(1).set(10);
    /// assert_eq!(
    ///     bitset.to_ascii(16, 0),
    ///     concat!(
    ///         "  0  1  2  3  4  5  6  7|  8  9  a  b  c  d  e  f\n",
    ///         "  0  1  0  0  0  0  0  0|  0  0  1  0  0  0  0  0\n",
    ///         "------------------------+------------------------\n",
    ///     )
    /// );
    /// assert_eq!(BitSet::new().to_ascii(0, 0), "Empty bitset\n");
    /// ```
    pub fn to_ascii(&self, width: usize, start: usize) -> String {
        let mut out = String::new();
        // writing into a String never fails
        let _ = self.write_ascii(&mut out, width, start);
        out
    }

    /// Renders the first 64 bits (and following rows) with
    /// [`to_ascii`](BitSet::to_ascii).
    pub fn to_ascii_default(&self) -> String {
        self.to_ascii(Self::DEFAULT_ASCII_WIDTH, 0)
    }

    /// Writes the table produced by [`to_ascii`](BitSet::to_ascii) into `out`.
    pub fn write_ascii<W: Write>(&self, out: &mut W, width: usize, start: usize) -> fmt::Result {
        let capacity = self.capacity();
        let mut row_start = start;
        let mut end = row_start.saturating_add(width).min(capacity);
        if end <= row_start {
            return out.write_str(EMPTY);
        }

        loop {
            self.write_row(out, row_start, end)?;
            if end >= capacity || width >= capacity {
                return Ok(());
            }
            row_start = end;
            end = row_start.saturating_add(width).min(capacity);
        }
    }

    fn write_row<W: Write>(&self, out: &mut W, start: usize, end: usize) -> fmt::Result {
        write_line(out, start, end, |out, bit| write!(out, "{bit:>3x}"))?;
        write_line(out, start, end, |out, bit| {
            write!(out, "{:>3}", u8::from(self.is_set(bit)))
        })?;

        for (chunk, _) in (start..end).step_by(CHUNK_BITS).enumerate() {
            if chunk > 0 {
                out.write_char('+')?;
            }
            for _ in 0..CHUNK_BITS * FIELD_WIDTH {
                out.write_char('-')?;
            }
        }
        out.write_char('\n')
    }
}

/// Writes one line of 8-bit chunks, calling `cell` for every bit in
/// `[start, end)` and padding the last chunk with blank fields.
fn write_line<W, F>(out: &mut W, start: usize, end: usize, mut cell: F) -> fmt::Result
where
    W: Write,
    F: FnMut(&mut W, usize) -> fmt::Result,
{
    for (chunk, chunk_start) in (start..end).step_by(CHUNK_BITS).enumerate() {
        if chunk > 0 {
            out.write_char('|')?;
        }
        for bit in chunk_start..chunk_start + CHUNK_BITS {
            if bit < end {
                cell(out, bit)?;
            } else {
                out.write_str(BLANK_FIELD)?;
            }
        }
    }
    out.write_char('\n')
}

impl Debug for BitSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.write_ascii(f, Self::DEBUG_ASCII_WIDTH, 0)
    }
}
