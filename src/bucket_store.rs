//! The storage layer: a prime-sized array of slots plus the capacity
//! ladder that sizes it.
//!
//! The [`BucketStore`] owns the slot array and knows how to reduce a raw
//! hash into a valid index. It does not probe, count, or grow on its own;
//! that is the job of [`LinearMap`](crate::LinearMap).

use alloc::vec::Vec;
use core::iter::repeat_with;

/// Ascending prime capacities the table grows through, starting at 7 and
/// roughly doubling. Growth only ever advances to the next entry; the
/// ladder is never re-derived at runtime.
pub const CAPACITY_LADDER: &[usize] = &[
    7,
    17,
    37,
    79,
    163,
    331,
    673,
    1361,
    2729,
    5471,
    10949,
    21911,
    43853,
    87719,
    175447,
    350899,
    701819,
    1403641,
    2807303,
    5614657,
    11229331,
    22458671,
    44917381,
    89834777,
    179669557,
    359339171,
    718678369,
    1437356741,
];

/// A single table cell.
///
/// `Tombstone` marks a slot whose entry was removed. Probe sequences pass
/// through tombstones (unlike `Empty`, which terminates them), keeping
/// entries that were pushed past this slot by earlier collisions
/// reachable. Insertions may reuse tombstoned slots; a resize discards
/// them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Slot<K, V> {
    /// Never used since the store was allocated or cleared.
    Empty,
    /// Previously occupied; removal left this marker behind.
    Tombstone,
    /// Holds a live entry.
    Occupied {
        /// The entry's key.
        key: K,
        /// The entry's value.
        value: V,
    },
}

impl<K, V> Slot<K, V> {
    /// Returns `true` if the slot holds a live entry.
    #[inline(always)]
    pub fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied { .. })
    }

    /// Returns `true` if an insertion may write into this slot.
    #[inline(always)]
    pub fn is_reusable(&self) -> bool {
        !self.is_occupied()
    }

    /// Returns `true` if the slot is a deletion marker.
    #[inline(always)]
    pub fn is_tombstone(&self) -> bool {
        matches!(self, Slot::Tombstone)
    }
}

/// An ordered sequence of exactly `capacity` [`Slot`]s, where `capacity`
/// is always an element of [`CAPACITY_LADDER`].
///
/// The store tracks its position in the ladder; the position only ever
/// advances, so capacity never shrinks.
#[derive(Clone)]
pub struct BucketStore<K, V> {
    slots: Vec<Slot<K, V>>,
    prime_index: usize,
}

impl<K, V> BucketStore<K, V> {
    /// Creates a store sized so that `hint` entries fit without exceeding
    /// the 0.5 load-factor growth threshold.
    ///
    /// Picks the smallest ladder prime `p` with `2 * hint <= p`, or the
    /// last prime if the hint exceeds the whole ladder.
    pub fn with_capacity_hint(hint: usize) -> Self {
        let wanted = hint.saturating_mul(2);
        let prime_index = CAPACITY_LADDER
            .iter()
            .position(|&p| p >= wanted)
            .unwrap_or(CAPACITY_LADDER.len() - 1);
        Self::at_prime_index(prime_index)
    }

    pub(crate) fn at_prime_index(prime_index: usize) -> Self {
        let capacity = CAPACITY_LADDER[prime_index];
        BucketStore {
            slots: repeat_with(|| Slot::Empty).take(capacity).collect(),
            prime_index,
        }
    }

    /// Returns the number of slots.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the store's current position in [`CAPACITY_LADDER`].
    #[inline(always)]
    pub fn prime_index(&self) -> usize {
        self.prime_index
    }

    /// Returns the ladder position a grown store would occupy, or `None`
    /// if the ladder is exhausted.
    #[inline(always)]
    pub fn next_prime_index(&self) -> Option<usize> {
        let next = self.prime_index + 1;
        (next < CAPACITY_LADDER.len()).then_some(next)
    }

    /// Reduces a raw hash to a valid slot index (`hash mod capacity`).
    #[inline(always)]
    pub fn home_index(&self, hash: u64) -> usize {
        (hash % self.slots.len() as u64) as usize
    }

    /// Advances an index by one, wrapping past the last slot to 0.
    #[inline(always)]
    pub fn step(&self, index: usize) -> usize {
        let next = index + 1;
        if next == self.slots.len() { 0 } else { next }
    }

    /// Returns the slot at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= capacity()`.
    #[inline(always)]
    pub fn slot(&self, index: usize) -> &Slot<K, V> {
        &self.slots[index]
    }

    #[inline(always)]
    pub(crate) fn slot_mut(&mut self, index: usize) -> &mut Slot<K, V> {
        &mut self.slots[index]
    }

    pub(crate) fn reset(&mut self) {
        for slot in &mut self.slots {
            *slot = Slot::Empty;
        }
    }

    /// Consumes the store, yielding every live `(key, value)` pair. Empty
    /// and tombstoned slots are dropped.
    pub(crate) fn drain_occupied(self) -> impl Iterator<Item = (K, V)> {
        self.slots.into_iter().filter_map(|slot| match slot {
            Slot::Occupied { key, value } => Some((key, value)),
            Slot::Empty | Slot::Tombstone => None,
        })
    }
}
