use thiserror::Error;

/// Errors returned by the binary set-algebra operations of [`BitSet`].
///
/// [`BitSet`]: crate::BitSet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BitSetError {
    /// The two operands do not have the same capacity. Neither operand was
    /// modified.
    #[error("capacity mismatch: {left} bits vs {right} bits")]
    CapacityMismatch {
        /// Capacity in bits of the receiving (left-hand) operand.
        left: usize,
        /// Capacity in bits of the argument (right-hand) operand.
        right: usize,
    },
}
