//! A string-keyed hash table using open addressing with linear probing.
//!
//! Every entry lives directly in the slot array. A key starts probing at
//! `hash_str(key) % capacity` and walks forward (wrapping) until it finds
//! itself or an empty slot. Removal leaves a tombstone behind so that keys
//! which probed past the removed one stay reachable.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::marker::PhantomData;
use core::mem;

use crate::config::TableConfig;
use crate::error::Result;
use crate::error::TableError;
use crate::hash::hash_str;

#[derive(Clone)]
enum Slot<V> {
    /// Never held an entry since the last rehash. Terminates probing.
    Empty,
    Occupied {
        key: String,
        value: V,
    },
    /// Tombstone. Probing continues past it; inserts may reuse it.
    Deleted,
}

/// Result of walking a probe sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    /// The key is stored at this index.
    Found(usize),
    /// The key is absent. The index is where it should be inserted: the
    /// first tombstone seen on the way, or the empty slot that ended the
    /// probe.
    Vacant(usize),
}

#[inline]
fn start_index(key: &str, capacity: usize) -> usize {
    hash_str(key) as usize % capacity
}

/// Walks the probe sequence for `key` over `slots`.
///
/// `slots` must be non-empty and contain at least one `Empty` slot; the
/// table upholds this by growing or rehashing before an insert would fill
/// the last one.
fn probe<V>(slots: &[Slot<V>], key: &str) -> Probe {
    let capacity = slots.len();
    let start = start_index(key, capacity);
    let mut first_deleted = None;

    for offset in 0..capacity {
        let index = (start + offset) % capacity;
        match &slots[index] {
            Slot::Empty => return Probe::Vacant(first_deleted.unwrap_or(index)),
            Slot::Occupied { key: stored, .. } if stored == key => return Probe::Found(index),
            Slot::Deleted => {
                first_deleted.get_or_insert(index);
            }
            Slot::Occupied { .. } => {}
        }
    }

    unreachable!("probe for {key:?} visited all {capacity} slots without reaching an empty one")
}

fn empty_slots<V>(capacity: usize) -> Vec<Slot<V>> {
    (0..capacity).map(|_| Slot::Empty).collect()
}

/// Debug statistics for hash table analysis.
///
/// Available under `cfg(test)` or with the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of live entries
    pub populated: usize,
    /// Total number of slots allocated
    pub capacity: usize,
    /// Number of tombstoned slots
    pub tombstones: usize,
    /// Number of slots that have never been written since the last rehash
    pub empty_slots: usize,
    /// Load factor (populated / capacity)
    pub load_factor: f64,
    /// Slot utilization ((populated + tombstones) / capacity)
    pub slot_utilization: f64,
    /// Longest distance of a live entry from its home slot
    pub max_probe: usize,
    /// Mean distance of live entries from their home slot
    pub mean_probe: f64,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.populated,
            self.capacity,
            self.load_factor * 100.0
        );
        println!(
            "Slot Usage: {} live + {} tombstones, {} empty ({:.2}% utilization)",
            self.populated,
            self.tombstones,
            self.empty_slots,
            self.slot_utilization * 100.0
        );
        println!(
            "Probe Distance: max {}, mean {:.2}",
            self.max_probe, self.mean_probe
        );
    }
}

/// Count of live entries per probe distance.
///
/// Index `d` holds the number of entries stored `d` slots past their home
/// slot.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeHistogram(pub Vec<usize>);

#[cfg(any(test, feature = "stats"))]
impl ProbeHistogram {
    /// Total number of entries counted.
    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    /// Pretty-prints the histogram horizontally using stdout.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        let max = self.0.iter().copied().max().unwrap_or(0);
        if max == 0 {
            println!("probe histogram: empty");
            return;
        }

        let max_bar = 60usize;
        println!("probe histogram ({} entries):", self.total());
        for (distance, &count) in self.0.iter().enumerate() {
            let width = (count * max_bar).div_ceil(max);
            println!("{:>3} | {} ({})", distance, "█".repeat(width), count);
        }
    }
}

/// A hash table from string keys to values of type `V`.
///
/// Collisions are resolved by linear probing, deletions leave tombstones,
/// and an insert that would push the load ratio past
/// [`TableConfig::max_load_ratio`] first grows the slot array by
/// [`TableConfig::growth_factor`] and re-inserts every live entry.
///
/// ## Example
///
/// ```rust
/// use probe_table::Table;
/// use probe_table::TableError;
///
/// let mut lore = Table::new();
/// lore.set("Hobbit", "Bilbo");
/// lore.set("Hobbit", "Frodo");
/// lore.set("Wizard", "Gandalf");
///
/// assert_eq!(lore.get("Hobbit"), Ok(&"Frodo"));
/// assert_eq!(lore.len(), 2);
///
/// lore.remove("Wizard").unwrap();
/// assert!(matches!(lore.get("Wizard"), Err(TableError::KeyNotFound { .. })));
/// ```
#[derive(Clone)]
pub struct Table<V> {
    slots: Vec<Slot<V>>,
    length: usize,
    deleted: usize,
    config: TableConfig,
}

impl<V> Debug for Table<V>
where
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<V> Default for Table<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Table<V> {
    /// Creates an empty table with the default configuration (8 slots).
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_table::Table;
    /// #
    /// let table: Table<i32> = Table::new();
    /// assert_eq!(table.capacity(), 8);
    /// assert!(table.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_config(TableConfig::default())
    }

    /// Creates an empty table with exactly `capacity` slots.
    ///
    /// A capacity of zero allocates nothing until the first insert.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_table::Table;
    /// #
    /// let table: Table<String> = Table::with_capacity(100);
    /// assert_eq!(table.capacity(), 100);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(TableConfig::default().with_initial_capacity(capacity))
    }

    /// Creates an empty table tuned by `config`.
    pub fn with_config(config: TableConfig) -> Self {
        Self {
            slots: empty_slots(config.initial_capacity()),
            length: 0,
            deleted: 0,
            config,
        }
    }

    /// Returns the number of live entries.
    ///
    /// Overwriting an existing key does not change the count.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_table::Table;
    /// #
    /// let mut table = Table::new();
    /// table.set("Maiar", "The Necromancer");
    /// table.set("Maiar", "Sauron");
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the table holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the number of slots, live or not.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of tombstoned slots.
    pub fn deleted_count(&self) -> usize {
        self.deleted
    }

    /// Returns `len() / capacity()`, or `0.0` for a table without slots.
    pub fn load_ratio(&self) -> f64 {
        if self.slots.is_empty() {
            0.0
        } else {
            self.length as f64 / self.slots.len() as f64
        }
    }

    /// Returns the configuration this table was built with.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    fn find(&self, key: &str) -> Option<usize> {
        if self.slots.is_empty() {
            return None;
        }

        match probe(&self.slots, key) {
            Probe::Found(index) => Some(index),
            Probe::Vacant(_) => None,
        }
    }

    /// Returns a reference to the value stored under `key`.
    ///
    /// # Errors
    ///
    /// [`TableError::KeyNotFound`] if the key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_table::Table;
    /// # use probe_table::TableError;
    /// #
    /// let mut table = Table::new();
    /// table.set("Elf", "Legolas");
    /// assert_eq!(table.get("Elf"), Ok(&"Legolas"));
    /// assert_eq!(
    ///     table.get("Dwarf"),
    ///     Err(TableError::KeyNotFound { key: "Dwarf".to_string() })
    /// );
    /// ```
    pub fn get(&self, key: &str) -> Result<&V> {
        match self.find(key) {
            Some(index) => Ok(self.occupied(index).1),
            None => {
                tracing::trace!(key, "lookup miss");
                Err(TableError::key_not_found(key))
            }
        }
    }

    /// Returns a mutable reference to the value stored under `key`.
    ///
    /// # Errors
    ///
    /// [`TableError::KeyNotFound`] if the key is absent.
    pub fn get_mut(&mut self, key: &str) -> Result<&mut V> {
        match self.find(key) {
            Some(index) => Ok(self.occupied_mut(index).1),
            None => {
                tracing::trace!(key, "lookup miss");
                Err(TableError::key_not_found(key))
            }
        }
    }

    /// Returns `true` if `key` is present. Never mutates the table.
    pub fn contains_key(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Stores `value` under `key`, returning the value it replaced.
    ///
    /// Inserting a new key may grow the table first; overwriting an
    /// existing key never does. The key is resolved before the load check,
    /// so an overwrite at the load threshold leaves the capacity unchanged
    /// instead of resizing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_table::Table;
    /// #
    /// let mut table = Table::new();
    /// assert_eq!(table.set("Hobbit", "Bilbo"), None);
    /// assert_eq!(table.set("Hobbit", "Frodo"), Some("Bilbo"));
    /// assert_eq!(table.get("Hobbit"), Ok(&"Frodo"));
    /// ```
    pub fn set(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        match self.entry(key) {
            Entry::Occupied(mut entry) => Some(entry.insert(value)),
            Entry::Vacant(entry) => {
                entry.insert(value);
                None
            }
        }
    }

    /// Removes `key`, leaving a tombstone in its slot, and returns its
    /// value.
    ///
    /// The slot count never shrinks.
    ///
    /// # Errors
    ///
    /// [`TableError::KeyNotFound`] if the key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_table::Table;
    /// #
    /// let mut table = Table::new();
    /// table.set("RingBearer", "Gollum");
    ///
    /// assert_eq!(table.remove("RingBearer"), Ok("Gollum"));
    /// assert_eq!(table.deleted_count(), 1);
    /// assert!(table.remove("RingBearer").is_err());
    /// ```
    pub fn remove(&mut self, key: &str) -> Result<V> {
        match self.find(key) {
            Some(index) => Ok(self.tombstone(index).1),
            None => {
                tracing::trace!(key, "remove miss");
                Err(TableError::key_not_found(key))
            }
        }
    }

    /// Gets the entry for `key` for in-place insertion or update.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_table::Table;
    /// #
    /// let mut counts: Table<usize> = Table::new();
    /// for c in ["a", "b", "a"] {
    ///     *counts.entry(c).or_insert(0) += 1;
    /// }
    /// assert_eq!(counts.get("a"), Ok(&2));
    /// assert_eq!(counts.get("b"), Ok(&1));
    /// ```
    pub fn entry(&mut self, key: impl Into<String>) -> Entry<'_, V> {
        let key = key.into();
        match self.find(&key) {
            Some(index) => Entry::Occupied(OccupiedEntry { table: self, index }),
            None => Entry::Vacant(VacantEntry { table: self, key }),
        }
    }

    /// Removes every entry and tombstone, keeping the slot count.
    pub fn clear(&mut self) {
        self.slots.fill_with(|| Slot::Empty);
        self.length = 0;
        self.deleted = 0;
    }

    /// Rebuilds the slot array at its current size, dropping tombstones.
    ///
    /// Lookups for absent keys stop at the first empty slot, so a table
    /// that has seen many removals probes further than its load suggests.
    /// Compacting restores short probe sequences.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_table::Table;
    /// #
    /// let mut table = Table::new();
    /// table.set("Ent", "Treebeard");
    /// table.set("HalfElven", "Arwen");
    /// table.remove("Ent").unwrap();
    /// assert_eq!(table.deleted_count(), 1);
    ///
    /// table.compact();
    /// assert_eq!(table.deleted_count(), 0);
    /// assert_eq!(table.get("HalfElven"), Ok(&"Arwen"));
    /// ```
    pub fn compact(&mut self) {
        if self.deleted > 0 {
            self.rehash(self.slots.len());
        }
    }

    /// Grows the table so that `additional` more keys can be inserted
    /// without exceeding the maximum load ratio.
    pub fn reserve(&mut self, additional: usize) {
        if additional == 0 {
            return;
        }

        let required = self.length.saturating_add(additional);
        if self.config.exceeds(required, self.slots.len()) {
            self.rehash(self.grown_capacity(required));
        }
    }

    /// Returns an iterator over `(key, value)` pairs in slot order.
    ///
    /// Slot order depends on hashes and insertion history; callers must not
    /// rely on it.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.length,
        }
    }

    /// Returns an iterator over the keys.
    pub fn keys(&self) -> Keys<'_, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values.
    pub fn values(&self) -> Values<'_, V> {
        Values { inner: self.iter() }
    }

    /// Removes every entry, yielding owned `(key, value)` pairs. The slot
    /// count is kept.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_table::Table;
    /// #
    /// let mut table = Table::new();
    /// table.set("Human", "Aragorn");
    ///
    /// let drained: Vec<(String, &str)> = table.drain().collect();
    /// assert_eq!(drained, vec![("Human".to_string(), "Aragorn")]);
    /// assert!(table.is_empty());
    /// assert_eq!(table.capacity(), 8);
    /// ```
    pub fn drain(&mut self) -> Drain<'_, V> {
        let capacity = self.slots.len();
        let slots = mem::replace(&mut self.slots, empty_slots(capacity));
        let remaining = mem::take(&mut self.length);
        self.deleted = 0;
        Drain {
            inner: slots.into_iter(),
            remaining,
            _table: PhantomData,
        }
    }

    /// Makes room for one more key, growing or flushing tombstones so that
    /// at least one empty slot survives the insert.
    fn reserve_one(&mut self) {
        let capacity = self.slots.len();
        if self.config.exceeds(self.length + 1, capacity) {
            self.rehash(self.grown_capacity(self.length + 1));
        } else if self.config.exceeds(self.length + self.deleted + 1, capacity) {
            self.rehash(capacity);
        }

        debug_assert!(self.length + self.deleted + 1 < self.slots.len());
    }

    fn grown_capacity(&self, required: usize) -> usize {
        let mut capacity = self.slots.len().max(1);
        loop {
            capacity = capacity
                .checked_mul(self.config.growth_factor())
                .expect("capacity overflow");
            if !self.config.exceeds(required, capacity) {
                return capacity;
            }
        }
    }

    /// Moves every live entry into a fresh array of `capacity` slots and
    /// swaps it in. Tombstones are not carried over.
    #[cold]
    fn rehash(&mut self, capacity: usize) {
        debug_assert!(!self.config.exceeds(self.length, capacity) || self.length == 0);
        tracing::debug!(
            from = self.slots.len(),
            to = capacity,
            live = self.length,
            tombstones = self.deleted,
            "rehashing table"
        );

        let mut slots = empty_slots(capacity);
        for slot in mem::take(&mut self.slots) {
            if let Slot::Occupied { key, value } = slot {
                let Probe::Vacant(index) = probe(&slots, &key) else {
                    unreachable!("duplicate key {key:?} while rehashing");
                };
                slots[index] = Slot::Occupied { key, value };
            }
        }

        self.slots = slots;
        self.deleted = 0;
    }

    /// Stores a key known to be absent, growing first if needed.
    fn insert_vacant(&mut self, key: String, value: V) -> &mut V {
        self.reserve_one();

        let Probe::Vacant(index) = probe(&self.slots, &key) else {
            unreachable!("vacant key {key:?} found during insert");
        };
        if matches!(self.slots[index], Slot::Deleted) {
            self.deleted -= 1;
        }
        self.slots[index] = Slot::Occupied { key, value };
        self.length += 1;

        self.occupied_mut(index).1
    }

    fn tombstone(&mut self, index: usize) -> (String, V) {
        match mem::replace(&mut self.slots[index], Slot::Deleted) {
            Slot::Occupied { key, value } => {
                self.length -= 1;
                self.deleted += 1;
                (key, value)
            }
            _ => unreachable!("slot {index} is not occupied"),
        }
    }

    fn occupied(&self, index: usize) -> (&str, &V) {
        match &self.slots[index] {
            Slot::Occupied { key, value } => (key.as_str(), value),
            _ => unreachable!("slot {index} is not occupied"),
        }
    }

    fn occupied_mut(&mut self, index: usize) -> (&str, &mut V) {
        match &mut self.slots[index] {
            Slot::Occupied { key, value } => (key.as_str(), value),
            _ => unreachable!("slot {index} is not occupied"),
        }
    }

    /// Computes the probe distance of every live entry.
    ///
    /// Available under `cfg(test)` or with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> ProbeHistogram {
        let mut hist = Vec::new();
        let capacity = self.slots.len();

        for (index, slot) in self.slots.iter().enumerate() {
            if let Slot::Occupied { key, .. } = slot {
                let distance = (index + capacity - start_index(key, capacity)) % capacity;
                if hist.len() <= distance {
                    hist.resize(distance + 1, 0);
                }
                hist[distance] += 1;
            }
        }

        ProbeHistogram(hist)
    }

    /// Returns slot utilization and probe statistics for debugging.
    ///
    /// Available under `cfg(test)` or with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let capacity = self.slots.len();
        let hist = self.probe_histogram();
        let total_distance: usize = hist.0.iter().enumerate().map(|(d, &n)| d * n).sum();

        DebugStats {
            populated: self.length,
            capacity,
            tombstones: self.deleted,
            empty_slots: capacity - self.length - self.deleted,
            load_factor: self.load_ratio(),
            slot_utilization: if capacity == 0 {
                0.0
            } else {
                (self.length + self.deleted) as f64 / capacity as f64
            },
            max_probe: hist.0.len().saturating_sub(1),
            mean_probe: if self.length == 0 {
                0.0
            } else {
                total_distance as f64 / self.length as f64
            },
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Table<V>
where
    K: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Table::new();
        table.extend(iter);
        table
    }
}

impl<K, V> Extend<(K, V)> for Table<V>
where
    K: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

impl<'a, V> IntoIterator for &'a Table<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A view into a single entry in the table, which may be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`Table`].
///
/// [`entry`]: Table::entry
pub enum Entry<'a, V> {
    /// The key is not present in the table
    Vacant(VacantEntry<'a, V>),
    /// The key is present in the table
    Occupied(OccupiedEntry<'a, V>),
}

impl<'a, V> Entry<'a, V> {
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the value.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the entry is vacant and returns a
    /// mutable reference to the value.
    pub fn or_insert_with(self, default: impl FnOnce() -> V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Modifies an occupied entry in place before any potential insert.
    pub fn and_modify(self, f: impl FnOnce(&mut V)) -> Self {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }

    /// Returns the key of this entry.
    pub fn key(&self) -> &str {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }
}

impl<'a, V> Entry<'a, V>
where
    V: Default,
{
    /// Inserts the default value if the entry is vacant and returns a
    /// mutable reference to the value.
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with(Default::default)
    }
}

/// A view into a vacant entry in a [`Table`].
pub struct VacantEntry<'a, V> {
    table: &'a mut Table<V>,
    key: String,
}

impl<'a, V> VacantEntry<'a, V> {
    /// Gets the key that would be used when inserting a value.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Takes ownership of the key.
    pub fn into_key(self) -> String {
        self.key
    }

    /// Inserts the value, growing the table first if the insert would push
    /// it past its maximum load ratio.
    pub fn insert(self, value: V) -> &'a mut V {
        let VacantEntry { table, key } = self;
        table.insert_vacant(key, value)
    }
}

/// A view into an occupied entry in a [`Table`].
pub struct OccupiedEntry<'a, V> {
    table: &'a mut Table<V>,
    index: usize,
}

impl<'a, V> OccupiedEntry<'a, V> {
    /// Gets the key stored in the entry.
    pub fn key(&self) -> &str {
        self.table.occupied(self.index).0
    }

    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        self.table.occupied(self.index).1
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        self.table.occupied_mut(self.index).1
    }

    /// Converts the entry into a mutable reference to the value.
    pub fn into_mut(self) -> &'a mut V {
        let OccupiedEntry { table, index } = self;
        table.occupied_mut(index).1
    }

    /// Replaces the value in the entry and returns the old one.
    pub fn insert(&mut self, value: V) -> V {
        mem::replace(self.get_mut(), value)
    }

    /// Removes the entry, leaving a tombstone, and returns the value.
    pub fn remove(self) -> V {
        self.table.tombstone(self.index).1
    }

    /// Removes the entry, leaving a tombstone, and returns the key and value.
    pub fn remove_entry(self) -> (String, V) {
        self.table.tombstone(self.index)
    }
}

/// An iterator over the entries of a [`Table`].
///
/// This struct is created by the [`iter`] method on [`Table`].
///
/// [`iter`]: Table::iter
pub struct Iter<'a, V> {
    slots: core::slice::Iter<'a, Slot<V>>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        for slot in self.slots.by_ref() {
            if let Slot::Occupied { key, value } = slot {
                self.remaining -= 1;
                return Some((key.as_str(), value));
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

/// An iterator over the keys of a [`Table`].
pub struct Keys<'a, V> {
    inner: Iter<'a, V>,
}

impl<'a, V> Iterator for Keys<'a, V> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Keys<'_, V> {}

/// An iterator over the values of a [`Table`].
pub struct Values<'a, V> {
    inner: Iter<'a, V>,
}

impl<'a, V> Iterator for Values<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Values<'_, V> {}

/// A draining iterator over the entries of a [`Table`].
///
/// The table is already empty when this is created; dropping it early
/// drops the remaining entries.
pub struct Drain<'a, V> {
    inner: alloc::vec::IntoIter<Slot<V>>,
    remaining: usize,
    _table: PhantomData<&'a mut Table<V>>,
}

impl<V> Iterator for Drain<'_, V> {
    type Item = (String, V);

    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.inner.by_ref() {
            if let Slot::Occupied { key, value } = slot {
                self.remaining -= 1;
                return Some((key, value));
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::format;
    use alloc::string::ToString;
    use alloc::vec;

    use proptest::prelude::*;
    use rand::Rng;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn occupied_slots_for<V>(table: &Table<V>, key: &str) -> usize {
        table
            .slots
            .iter()
            .filter(|slot| matches!(slot, Slot::Occupied { key: k, .. } if k == key))
            .count()
    }

    /// Generates `count` distinct keys sharing a home slot in a table of
    /// `capacity` slots.
    fn colliding_keys(capacity: usize, count: usize) -> Vec<String> {
        let home = start_index("anchor", capacity);
        let mut keys = vec!["anchor".to_string()];
        let mut i = 0;
        while keys.len() < count {
            let key = format!("key{i}");
            if start_index(&key, capacity) == home {
                keys.push(key);
            }
            i += 1;
        }
        keys
    }

    #[test]
    fn overwrite_returns_latest() {
        let mut table = Table::with_capacity(8);
        table.set("Hobbit", "Bilbo");
        table.set("Hobbit", "Frodo");

        assert_eq!(table.get("Hobbit"), Ok(&"Frodo"));
        assert_eq!(table.len(), 1);
        assert_eq!(occupied_slots_for(&table, "Hobbit"), 1);
    }

    /// The 0.9 ratio and 3x growth, independent of `max-load-*`
    /// features.
    fn ninety_percent(capacity: usize) -> Table<i32> {
        Table::with_config(
            TableConfig::default()
                .with_initial_capacity(capacity)
                .with_max_load_ratio(0.9)
                .unwrap()
                .with_growth_factor(3)
                .unwrap(),
        )
    }

    #[test]
    fn grows_past_load_threshold() {
        let mut table = ninety_percent(8);
        for i in 0..7 {
            table.set(format!("key{i}"), i);
        }
        assert_eq!(table.capacity(), 8, "{:#?}", table);
        assert_eq!(table.len(), 7);

        table.set("key7", 7);
        assert_eq!(table.capacity(), 24, "{:#?}", table);
        assert_eq!(table.len(), 8);

        for i in 0..8 {
            assert_eq!(table.get(&format!("key{i}")), Ok(&i));
        }
    }

    #[test]
    fn overwrite_never_grows() {
        let mut table = ninety_percent(8);
        for i in 0..7 {
            table.set(format!("key{i}"), i);
        }
        for i in 0..7 {
            table.set(format!("key{i}"), i * 10);
        }
        assert_eq!(table.capacity(), 8);
        assert_eq!(table.len(), 7);
    }

    #[test]
    fn missing_key_is_not_found() {
        let mut table: Table<i32> = Table::new();
        assert_eq!(
            table.get("Balrog"),
            Err(TableError::KeyNotFound {
                key: "Balrog".to_string()
            })
        );
        assert!(table.get_mut("Balrog").is_err());
        assert!(!table.contains_key("Balrog"));

        table.set("Balrog", 1);
        assert!(table.contains_key("Balrog"));
    }

    #[test]
    fn remove_items() {
        let mut table = Table::new();
        for i in 0..5 {
            table.set(format!("key{i}"), i);
        }

        assert_eq!(table.remove("key3"), Ok(3));
        assert_eq!(table.len(), 4);
        assert_eq!(table.deleted_count(), 1);
        assert!(table.get("key3").is_err());
        assert!(table.remove("key3").is_err());
        assert!(table.remove("key99").is_err());
        assert_eq!(table.len(), 4);

        for i in [0, 1, 2, 4] {
            assert_eq!(table.get(&format!("key{i}")), Ok(&i));
        }
    }

    #[test]
    fn tombstone_keeps_collision_chain() {
        let keys = colliding_keys(8, 3);
        let mut table = Table::with_capacity(8);
        table.set(keys[0].as_str(), 0);
        table.set(keys[1].as_str(), 1);

        table.remove(&keys[0]).unwrap();
        assert_eq!(table.get(&keys[1]), Ok(&1));
        assert!(table.get(&keys[0]).is_err());

        // The next colliding insert lands on the tombstone.
        let home = start_index(&keys[0], 8);
        table.set(keys[2].as_str(), 2);
        assert_eq!(table.deleted_count(), 0);
        assert!(matches!(&table.slots[home], Slot::Occupied { key, .. } if *key == keys[2]));
        assert_eq!(table.get(&keys[1]), Ok(&1));
    }

    #[test]
    fn insert_past_tombstone_does_not_duplicate() {
        let keys = colliding_keys(8, 2);
        let mut table = Table::with_capacity(8);
        table.set(keys[0].as_str(), 0);
        table.set(keys[1].as_str(), 1);
        table.remove(&keys[0]).unwrap();

        // keys[1] sits behind the tombstone; overwriting must find it, not
        // reuse the tombstone.
        table.set(keys[1].as_str(), 10);
        assert_eq!(occupied_slots_for(&table, &keys[1]), 1);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&keys[1]), Ok(&10));
    }

    #[test]
    fn tombstones_never_saturate() {
        let mut table = ninety_percent(8);
        for i in 0..1000 {
            let key = format!("key{i}");
            table.set(key.as_str(), i);
            assert_eq!(table.remove(&key), Ok(i));
            assert!(table.get(&key).is_err());
        }

        assert_eq!(table.capacity(), 8);
        assert!(table.deleted_count() < 8);
        assert!(table.is_empty());
    }

    #[test]
    fn compact_drops_tombstones() {
        let mut table = Table::with_capacity(32);
        for i in 0..20 {
            table.set(format!("key{i}"), i);
        }
        for i in (0..20).step_by(2) {
            table.remove(&format!("key{i}")).unwrap();
        }
        assert_eq!(table.deleted_count(), 10);

        table.compact();
        assert_eq!(table.deleted_count(), 0);
        assert_eq!(table.capacity(), 32);
        assert_eq!(table.len(), 10);
        for i in (1..20).step_by(2) {
            assert_eq!(table.get(&format!("key{i}")), Ok(&i));
        }
    }

    #[test]
    fn zero_capacity() {
        let mut table = ninety_percent(0);
        assert!(table.get("x").is_err());
        assert!(table.remove("x").is_err());
        assert_eq!(table.iter().count(), 0);
        table.compact();

        table.set("x", 1);
        assert_eq!(table.capacity(), 3);
        assert_eq!(table.get("x"), Ok(&1));
    }

    #[test]
    fn insert_many() {
        let mut rng = SmallRng::seed_from_u64(0x5eed);
        let mut table = Table::new();
        let mut expected = BTreeMap::new();

        for _ in 0..20_000 {
            let key = format!("key_{:04}", rng.random_range(0..5000u32));
            let value: u64 = rng.random();
            table.set(key.as_str(), value);
            expected.insert(key, value);
        }

        assert_eq!(table.len(), expected.len());
        for (key, value) in &expected {
            assert_eq!(table.get(key), Ok(value));
        }
        assert!(table.load_ratio() <= table.config().max_load_ratio());
    }

    #[test]
    fn reserve_prevents_growth() {
        let mut table = Table::new();
        table.reserve(100);
        let capacity = table.capacity();
        assert!(capacity >= 112);

        for i in 0..100 {
            table.set(format!("key{i}"), i);
        }
        assert_eq!(table.capacity(), capacity);
    }

    #[test]
    fn entry_api() {
        let mut table: Table<Vec<u32>> = Table::new();
        table.entry("a").or_default().push(1);
        table.entry("a").or_default().push(2);
        table.entry("b").or_insert_with(|| vec![9]);
        table
            .entry("b")
            .and_modify(|v| v.push(10))
            .or_insert_with(Vec::new);

        assert_eq!(table.get("a"), Ok(&vec![1, 2]));
        assert_eq!(table.get("b"), Ok(&vec![9, 10]));
        assert_eq!(table.entry("c").key(), "c");
        assert_eq!(table.len(), 2);

        match table.entry("a") {
            Entry::Occupied(entry) => {
                assert_eq!(entry.key(), "a");
                assert_eq!(entry.remove_entry(), ("a".to_string(), vec![1, 2]));
            }
            Entry::Vacant(_) => panic!("a should be occupied"),
        }
        assert_eq!(table.len(), 1);
        assert_eq!(table.deleted_count(), 1);
    }

    #[test]
    fn iter_keys_values_and_drain() {
        let mut table: Table<i32> = (0..10).map(|i| (format!("key{i}"), i)).collect();
        table.remove("key0").unwrap();

        assert_eq!(table.iter().len(), 9);
        assert_eq!(table.keys().len(), 9);
        let mut values = table.values();
        values.next();
        assert_eq!(values.len(), 8);
        let mut keys: Vec<&str> = table.keys().collect();
        keys.sort_unstable();
        assert_eq!(keys[0], "key1");
        assert_eq!(table.values().sum::<i32>(), 45);

        let capacity = table.capacity();
        let mut drained: Vec<(String, i32)> = table.drain().collect();
        drained.sort_unstable();
        assert_eq!(drained.len(), 9);
        assert!(table.is_empty());
        assert_eq!(table.deleted_count(), 0);
        assert_eq!(table.capacity(), capacity);
    }

    #[test]
    fn clear_and_clone() {
        let mut original = Table::new();
        original.set("Wizard", "Gandalf".to_string());
        let cloned = original.clone();

        original.clear();
        assert!(original.is_empty());
        assert!(original.get("Wizard").is_err());
        assert_eq!(cloned.get("Wizard"), Ok(&"Gandalf".to_string()));
    }

    #[test]
    fn debug_is_map_like() {
        let mut table = Table::new();
        table.set("Elf", 1);
        assert_eq!(format!("{:?}", table), r#"{"Elf": 1}"#);
    }

    #[test]
    fn stats_account_for_every_slot() {
        let mut table = Table::new();
        for i in 0..50 {
            table.set(format!("key{i}"), i);
        }
        for i in 0..10 {
            table.remove(&format!("key{i}")).unwrap();
        }

        let stats = table.debug_stats();
        assert_eq!(stats.populated, 40);
        assert_eq!(stats.tombstones, 10);
        assert_eq!(
            stats.populated + stats.tombstones + stats.empty_slots,
            stats.capacity
        );
        assert_eq!(table.probe_histogram().total(), 40);
        assert!(stats.max_probe < stats.capacity);
    }

    #[test]
    #[cfg(feature = "std")]
    fn histogram_output() {
        let mut table = Table::with_capacity(1000);
        for i in 0..900 {
            table.set(format!("key{i}"), i);
        }

        table.probe_histogram().print();
        table.debug_stats().print();
    }

    #[derive(Debug, Clone)]
    enum Op {
        Set(String, u32),
        Remove(String),
        Get(String),
    }

    fn op() -> impl Strategy<Value = Op> {
        let key = "[a-e]{0,2}";
        prop_oneof![
            (key, any::<u32>()).prop_map(|(k, v)| Op::Set(k, v)),
            key.prop_map(Op::Remove),
            key.prop_map(Op::Get),
        ]
    }

    proptest! {
        #[test]
        fn prop_matches_model(ops in prop::collection::vec(op(), 0..200), capacity in 0usize..16) {
            let mut table = Table::with_capacity(capacity);
            let mut model = BTreeMap::new();

            for op in ops {
                match op {
                    Op::Set(k, v) => {
                        let previous = table.set(k.as_str(), v);
                        prop_assert_eq!(previous, model.insert(k, v));
                    }
                    Op::Remove(k) => {
                        prop_assert_eq!(table.remove(&k).ok(), model.remove(&k));
                    }
                    Op::Get(k) => {
                        prop_assert_eq!(table.get(&k).ok(), model.get(&k));
                    }
                }
                prop_assert_eq!(table.len(), model.len());
                prop_assert!(table.len() + table.deleted_count() < table.capacity() || table.capacity() == 0);
            }

            for (k, v) in &model {
                prop_assert_eq!(table.get(k), Ok(v));
                prop_assert_eq!(occupied_slots_for(&table, k), 1);
            }
        }

        #[test]
        fn prop_round_trip(key in ".{0,16}", value in any::<i64>()) {
            let mut table = Table::new();
            table.set(key.as_str(), value);
            prop_assert_eq!(table.get(&key), Ok(&value));
            table.remove(&key).unwrap();
            prop_assert!(table.get(&key).is_err());
        }
    }
}
