use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;

use crate::bucket_store::BucketStore;
use crate::bucket_store::Slot;

/// A hash map using open addressing with linear probing as the underlying
/// storage scheme.
///
/// `LinearMap<K, V, S>` stores key-value pairs where keys implement
/// `Hash + Eq` and uses a configurable hasher builder `S` to hash keys.
/// Every entry lives directly in the bucket store; collisions are resolved
/// by scanning forward from the key's home index with wraparound. Removal
/// writes a tombstone so entries pushed past the removed slot stay
/// reachable, and the table grows along a fixed ladder of prime capacities
/// whenever an insertion would push the load factor past 0.5.
///
/// # Duplicate keys
///
/// `insert` never merges: inserting a key that is already present stores a
/// second entry, and lookups return whichever entry a forward probe from
/// the home index reaches first. Callers that want upsert semantics must
/// check for the key (e.g. with [`get_mut`](LinearMap::get_mut)) before
/// inserting.
#[derive(Clone)]
pub struct LinearMap<K, V, S> {
    store: BucketStore<K, V>,
    hash_builder: S,
    len: usize,
}

impl<K, V, S> Debug for LinearMap<K, V, S>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use alloc::format;
        use alloc::vec::Vec;

        f.debug_struct("LinearMap")
            .field("len", &self.len)
            .field("capacity", &self.store.capacity())
            .field(
                "slots",
                &(0..self.store.capacity())
                    .map(|i| match self.store.slot(i) {
                        Slot::Empty => format!("[{i}] ....."),
                        Slot::Tombstone => format!("[{i}] xxxxx"),
                        Slot::Occupied { key, value } => format!("[{i}] {key:?} | {value:?}"),
                    })
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<K, V, S> LinearMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Creates a new map with the given hasher builder and the smallest
    /// ladder capacity.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "std")]
    /// # {
    /// use std::collections::hash_map::RandomState;
    ///
    /// use probe_hash::LinearMap;
    ///
    /// let map: LinearMap<i32, String, _> = LinearMap::with_hasher(RandomState::new());
    /// assert!(map.is_empty());
    /// # }
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_capacity_and_hasher(0, hash_builder)
    }

    /// Creates a new map with the given hasher builder, sized so that
    /// `capacity` entries fit without triggering growth.
    ///
    /// The actual slot count is the smallest ladder prime that keeps
    /// `capacity` entries at or below the 0.5 load-factor threshold.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "std")]
    /// # {
    /// use std::collections::hash_map::RandomState;
    ///
    /// use probe_hash::LinearMap;
    ///
    /// let map: LinearMap<i32, String, _> = LinearMap::with_capacity_and_hasher(100, RandomState::new());
    /// assert!(map.capacity() >= 200);
    /// # }
    /// ```
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            store: BucketStore::with_capacity_hint(capacity),
            hash_builder,
            len: 0,
        }
    }

    /// Returns the number of entries in the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "std")]
    /// # {
    /// use std::collections::hash_map::RandomState;
    ///
    /// use probe_hash::LinearMap;
    ///
    /// let mut map = LinearMap::with_hasher(RandomState::new());
    /// assert_eq!(map.len(), 0);
    /// map.insert(1, "a");
    /// assert_eq!(map.len(), 1);
    /// # }
    /// ```
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the map contains no entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "std")]
    /// # {
    /// use std::collections::hash_map::RandomState;
    ///
    /// use probe_hash::LinearMap;
    ///
    /// let mut map = LinearMap::with_hasher(RandomState::new());
    /// assert!(map.is_empty());
    /// map.insert(1, "a");
    /// assert!(!map.is_empty());
    /// # }
    /// ```
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the current slot count, always a prime from the capacity
    /// ladder.
    ///
    /// Growth triggers when the number of entries exceeds half of this
    /// value.
    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    /// Removes all entries from the map, keeping its capacity, ladder
    /// position, and hasher.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "std")]
    /// # {
    /// use std::collections::hash_map::RandomState;
    ///
    /// use probe_hash::LinearMap;
    ///
    /// let mut map = LinearMap::with_hasher(RandomState::new());
    /// map.insert(1, "a");
    /// map.clear();
    /// assert!(map.is_empty());
    /// # }
    /// ```
    pub fn clear(&mut self) {
        self.store.reset();
        self.len = 0;
    }

    /// Inserts a key-value pair into the map.
    ///
    /// The growth check runs first: if the map is already past the 0.5
    /// load-factor threshold, it grows to the next ladder prime and
    /// rehashes every entry before placing the new one. The pair is then
    /// written into the first empty or tombstoned slot on the forward
    /// probe from the key's home index.
    ///
    /// An equal key already in the map is **not** replaced; see the type
    /// docs on duplicate keys.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "std")]
    /// # {
    /// use std::collections::hash_map::RandomState;
    ///
    /// use probe_hash::LinearMap;
    ///
    /// let mut map = LinearMap::with_hasher(RandomState::new());
    /// map.insert(37, "a");
    /// assert_eq!(map.get(&37), Some(&"a"));
    /// # }
    /// ```
    pub fn insert(&mut self, key: K, value: V) {
        self.grow_if_needed();
        let home = self.store.home_index(self.hash_builder.hash_one(&key));
        let index = Self::probe_free(&self.store, home);
        *self.store.slot_mut(index) = Slot::Occupied { key, value };
        self.len += 1;
    }

    /// Removes a key from the map, returning its value if it was present.
    ///
    /// The first entry matching `key` in forward probe order is replaced
    /// with a tombstone, which later lookups and removals probe through.
    /// Removing an absent key is a no-op returning `None`, and leaves the
    /// entry count untouched.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "std")]
    /// # {
    /// use std::collections::hash_map::RandomState;
    ///
    /// use probe_hash::LinearMap;
    ///
    /// let mut map = LinearMap::with_hasher(RandomState::new());
    /// map.insert(1, "a");
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// # }
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let index = self.find_index(key)?;
        match core::mem::replace(self.store.slot_mut(index), Slot::Tombstone) {
            Slot::Occupied { value, .. } => {
                self.len -= 1;
                Some(value)
            }
            // find_index only ever returns occupied slots
            Slot::Empty | Slot::Tombstone => unreachable!(),
        }
    }

    /// Returns a reference to the value of the first entry matching `key`
    /// in forward probe order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "std")]
    /// # {
    /// use std::collections::hash_map::RandomState;
    ///
    /// use probe_hash::LinearMap;
    ///
    /// let mut map = LinearMap::with_hasher(RandomState::new());
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// # }
    /// ```
    pub fn get(&self, key: &K) -> Option<&V> {
        match self.store.slot(self.find_index(key)?) {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Empty | Slot::Tombstone => None,
        }
    }

    /// Returns a mutable reference to the value of the first entry
    /// matching `key` in forward probe order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "std")]
    /// # {
    /// use std::collections::hash_map::RandomState;
    ///
    /// use probe_hash::LinearMap;
    ///
    /// let mut map = LinearMap::with_hasher(RandomState::new());
    /// map.insert(1, 10);
    /// if let Some(value) = map.get_mut(&1) {
    ///     *value += 1;
    /// }
    /// assert_eq!(map.get(&1), Some(&11));
    /// # }
    /// ```
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let index = self.find_index(key)?;
        match self.store.slot_mut(index) {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Empty | Slot::Tombstone => None,
        }
    }

    /// Returns `true` if the map contains an entry for `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "std")]
    /// # {
    /// use std::collections::hash_map::RandomState;
    ///
    /// use probe_hash::LinearMap;
    ///
    /// let mut map = LinearMap::with_hasher(RandomState::new());
    /// map.insert(1, "a");
    /// assert!(map.contains_key(&1));
    /// assert!(!map.contains_key(&2));
    /// # }
    /// ```
    pub fn contains_key(&self, key: &K) -> bool {
        self.find_index(key).is_some()
    }

    /// The shared probe routine behind `get`, `get_mut`, `contains_key`,
    /// and `remove`.
    ///
    /// Walks forward from the key's home index, skipping tombstones and
    /// non-matching entries. Stops with `None` at an empty slot (nothing
    /// past it can belong to this probe chain) or after a full cycle back
    /// to the home index.
    fn find_index(&self, key: &K) -> Option<usize> {
        let home = self.store.home_index(self.hash_builder.hash_one(key));
        let mut index = home;
        loop {
            match self.store.slot(index) {
                Slot::Empty => return None,
                Slot::Occupied { key: held, .. } if held == key => return Some(index),
                Slot::Occupied { .. } | Slot::Tombstone => {}
            }
            index = self.store.step(index);
            if index == home {
                return None;
            }
        }
    }

    /// Finds the first empty or tombstoned slot on the forward probe from
    /// `home`.
    ///
    /// Standalone over the store so the rehash loop can place entries into
    /// a freshly grown store.
    fn probe_free(store: &BucketStore<K, V>, home: usize) -> usize {
        let mut index = home;
        loop {
            if store.slot(index).is_reusable() {
                return index;
            }
            index = store.step(index);
            assert!(index != home, "probe cycled without finding a free slot");
        }
    }

    fn needs_grow(&self) -> bool {
        // count > 0.5 * capacity, in integer arithmetic
        2 * self.len > self.store.capacity()
    }

    /// Grows to the next ladder prime and rehashes every live entry
    /// against the new capacity. Tombstones are dropped here and only
    /// here. Never shrinks; saturates silently if the ladder is
    /// exhausted.
    fn grow_if_needed(&mut self) {
        if !self.needs_grow() {
            return;
        }
        let Some(next) = self.store.next_prime_index() else {
            return;
        };

        let old = core::mem::replace(&mut self.store, BucketStore::at_prime_index(next));
        for (key, value) in old.drain_occupied() {
            let home = self.store.home_index(self.hash_builder.hash_one(&key));
            let index = Self::probe_free(&self.store, home);
            *self.store.slot_mut(index) = Slot::Occupied { key, value };
        }
    }
}

impl<K, V, S> LinearMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Creates an empty map with the default hasher builder and the
    /// smallest ladder capacity.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "foldhash")]
    /// # {
    /// use probe_hash::DefaultHashBuilder;
    /// use probe_hash::LinearMap;
    ///
    /// let map: LinearMap<i32, String, DefaultHashBuilder> = LinearMap::new();
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), 7);
    /// # }
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }

    /// Creates an empty map with the default hasher builder, sized so
    /// that `capacity` entries fit without triggering growth.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "foldhash")]
    /// # {
    /// use probe_hash::DefaultHashBuilder;
    /// use probe_hash::LinearMap;
    ///
    /// let map: LinearMap<i32, String, DefaultHashBuilder> = LinearMap::with_capacity(100);
    /// assert!(map.capacity() >= 200);
    /// # }
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, S::default())
    }
}

impl<K, V, S> Default for LinearMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::new()
    }
}
