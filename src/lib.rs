//! A dynamically growable, byte-packed bitset library written in pure Rust.
//! `no_std` (only `alloc` is needed), no `unsafe`.
//!
//! [`BitSet`] is the main struct in this library. Its [features](#features)
//! are listed below.
//!
//! # Examples
//! ```
//! use grow_bitset::BitSet;
//!
//! let mut bitset = BitSet::new();
//! assert_eq!(bitset.capacity(), 64);
//! assert_eq!(bitset.test(3), Some(false));
//! assert_eq!(bitset.test(100), None);
//!
//! bitset.set(3).set(100);
//! assert_eq!(bitset.test(100), Some(true));
//! assert_eq!(bitset.capacity(), 128);
//! assert_eq!(bitset.count(), 2);
//! ```
//!
//! # Features
//!
//! - `#![no_std]` compatible, backed by a `Vec<u8>`
//! - Writes beyond the capacity grow the buffer by doubling, filling new
//!   bytes with the fill policy chosen at construction
//! - Tri-state queries: [`BitSet::test`] returns `None` for positions that
//!   were never allocated
//! - Set algebra with a strict capacity contract:
//!   - `union`, `intersection`, `symmetric_difference` and their `_in_place`
//!     variants return [`BitSetError::CapacityMismatch`] on unequal
//!     capacities
//!   - `complement`, `toggle_all_in_place`
//!   - `&a | &b`, `&a & &b`, `&a ^ &b`, `!&a` as sugar
//! - SWAR popcount ([`popcount_byte`]) for `count`
//! - Iteration over all bits, set bits and unset bits:
//!   - `iter()` (all bits as bools)
//!   - `each_set_bit()` (indices of set bits)
//!   - `iter_zeros()` (indices of unset bits)
//! - ASCII table rendering with `to_ascii`, also used by `Debug`
//!
//! # Logging
//!
//! Buffer growth is reported through [`tracing`] at `DEBUG` level. The
//! library never installs a subscriber.
//!
//! # Thread safety
//!
//! A `BitSet` carries no internal locking. Mutation needs `&mut`, so sharing
//! one between threads for writing requires an external lock.

#![deny(missing_docs)]
#![forbid(unsafe_code)]
#![no_std]

extern crate alloc;

mod bitset;
mod error;
mod render;

pub use bitset::{BitSet, BitSetIter, IterOnes, IterZeros, byte_count, popcount_byte};
pub use error::BitSetError;
