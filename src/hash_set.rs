use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::iter::FusedIterator;

use crate::ops::FnOps;
use crate::ops::HashedOps;
use crate::ops::MissingBehavior;
use crate::ops::ValueOps;
use crate::slot::Slot;
use crate::slot::SlotMatch;

/// Number of slots a freshly created set allocates. Always a power of two;
/// the table never shrinks below it.
pub const INITIAL_CAPACITY: usize = 16;

/// Factor by which capacity is multiplied on growth and divided on shrink.
pub const GROWTH_FACTOR: usize = 2;

cfg_if::cfg_if! {
    if #[cfg(feature = "load-fifty")] {
        /// Load factor at which an insertion triggers growth.
        pub const MAX_LOAD_FACTOR: f64 = 0.5;
        /// Load factor at which an erasure triggers a shrink.
        pub const MIN_LOAD_FACTOR: f64 = 0.125;
    } else if #[cfg(feature = "load-eighty-seven-point-five")] {
        /// Load factor at which an insertion triggers growth.
        pub const MAX_LOAD_FACTOR: f64 = 0.875;
        /// Load factor at which an erasure triggers a shrink.
        pub const MIN_LOAD_FACTOR: f64 = 0.25;
    } else {
        /// Load factor at which an insertion triggers growth.
        pub const MAX_LOAD_FACTOR: f64 = 0.75;
        /// Load factor at which an erasure triggers a shrink.
        pub const MIN_LOAD_FACTOR: f64 = 0.25;
    }
}

/// Slot index for probe `attempt` of a value hashing to `hash`.
///
/// Offsets follow the triangular numbers `0, 1, 3, 6, 10, ...`. Over a
/// power-of-two table this visits every slot exactly once in the first
/// `mask + 1` attempts.
#[inline(always)]
fn probe_index(hash: u64, attempt: usize, mask: usize) -> usize {
    let offset = attempt.wrapping_mul(attempt.wrapping_add(1)) / 2;
    (hash as usize).wrapping_add(offset) & mask
}

fn alloc_slots<T>(capacity: usize) -> Box<[Slot<T>]> {
    debug_assert!(capacity.is_power_of_two());
    core::iter::repeat_with(Slot::new).take(capacity).collect()
}

/// Probe statistics for a [`HashSet`].
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of values stored.
    pub len: usize,
    /// Number of slots allocated.
    pub capacity: usize,
    /// Number of slots holding a value. Always equal to `len`.
    pub occupied_slots: usize,
    /// `len / capacity`.
    pub load_factor: f64,
    /// Longest probe attempt used by any placement since the last rebuild.
    pub max_probe: usize,
    /// Sum of every slot's probe count. Always equal to `len`.
    pub total_probe_count: usize,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Set Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.len,
            self.capacity,
            self.load_factor * 100.0
        );
        println!("Occupied slots: {}", self.occupied_slots);
        println!("Longest probe: {}", self.max_probe);
        println!("Probe counts: {}", self.total_probe_count);
    }
}

/// A hash set using open addressing with triangular quadratic probing.
///
/// `HashSet<T, O>` stores values of type `T` and routes every hash, copy,
/// comparison and release through the [`ValueOps`] `O` bound at
/// construction. Inserted values are copied into the set; the set owns its
/// copies until they are erased, cleared or the set is dropped.
///
/// The table starts at [`INITIAL_CAPACITY`] slots, doubles once the load
/// factor reaches [`MAX_LOAD_FACTOR`] and halves once it falls to
/// [`MIN_LOAD_FACTOR`]. Every slot records how many stored values use it as
/// their base index.
///
/// # Examples
///
/// ```rust
/// # #[cfg(any(feature = "std", feature = "foldhash"))]
/// # {
/// use quad_hash::DefaultOps;
/// use quad_hash::HashSet;
///
/// let mut set: HashSet<&str, DefaultOps> = HashSet::new();
/// assert!(set.insert(&"a"));
/// assert!(set.contains(&"a"));
/// assert!(set.erase(&"a"));
/// assert!(set.is_empty());
/// # }
/// ```
pub struct HashSet<T, O: ValueOps<T>> {
    slots: Box<[Slot<T>]>,
    len: usize,
    max_probe: usize,
    ops: O,
}

impl<T, O> Drop for HashSet<T, O>
where
    O: ValueOps<T>,
{
    fn drop(&mut self) {
        for slot in core::mem::take(&mut self.slots).into_vec() {
            slot.destroy(&self.ops);
        }
    }
}

impl<T, O> Clone for HashSet<T, O>
where
    O: ValueOps<T> + Clone,
{
    fn clone(&self) -> Self {
        Self {
            slots: self
                .slots
                .iter()
                .map(|slot| slot.duplicate(&self.ops))
                .collect(),
            len: self.len,
            max_probe: self.max_probe,
            ops: self.ops.clone(),
        }
    }
}

impl<T, O> PartialEq for HashSet<T, O>
where
    O: ValueOps<T>,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|v| other.contains(v))
    }
}

impl<T, O> Eq for HashSet<T, O> where O: ValueOps<T> {}

impl<T, O> Debug for HashSet<T, O>
where
    T: Debug,
    O: ValueOps<T>,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, O> HashSet<T, O>
where
    O: ValueOps<T>,
{
    /// Creates an empty set bound to the given value behavior.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quad_hash::FnOps;
    /// use quad_hash::HashSet;
    /// use quad_hash::hash_set::INITIAL_CAPACITY;
    ///
    /// let ops = FnOps::<u64>::new(|v| *v, |v| *v, |a, b| a == b, drop);
    /// let set = HashSet::with_ops(ops);
    /// assert!(set.is_empty());
    /// assert_eq!(set.capacity(), INITIAL_CAPACITY);
    /// ```
    pub fn with_ops(ops: O) -> Self {
        Self {
            slots: alloc_slots(INITIAL_CAPACITY),
            len: 0,
            max_probe: 0,
            ops,
        }
    }

    /// Returns the value behavior the set was built with.
    pub fn ops(&self) -> &O {
        &self.ops
    }

    /// Returns the number of values in the set.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the set contains no values.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of slots in the table. Always a power of two.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns `len / capacity`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use quad_hash::DefaultOps;
    /// use quad_hash::HashSet;
    ///
    /// let mut set: HashSet<u32, DefaultOps> = HashSet::new();
    /// assert_eq!(set.load_factor(), 0.0);
    /// set.insert(&1);
    /// assert_eq!(set.load_factor(), 1.0 / set.capacity() as f64);
    /// # }
    /// ```
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.capacity() as f64
    }

    #[inline(always)]
    fn mask(&self) -> usize {
        self.slots.len() - 1
    }

    /// Adds a copy of `value` to the set.
    ///
    /// Returns `false`, leaving the set untouched, if an equal value is
    /// already present. Growth happens after the copy is stored, once the
    /// load factor reaches [`MAX_LOAD_FACTOR`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use quad_hash::DefaultOps;
    /// use quad_hash::HashSet;
    ///
    /// let mut set: HashSet<i32, DefaultOps> = HashSet::new();
    /// assert_eq!(set.insert(&37), true);
    /// assert_eq!(set.insert(&37), false);
    /// assert_eq!(set.len(), 1);
    /// # }
    /// ```
    pub fn insert(&mut self, value: &T) -> bool {
        let hash = self.ops.hash(value);
        if self.find(hash, value).is_some() {
            return false;
        }

        self.place(hash, value);
        if self.load_factor() >= MAX_LOAD_FACTOR {
            self.resize(self.capacity() * GROWTH_FACTOR);
        }
        true
    }

    /// Returns `true` if the set contains a value equal to `value`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use quad_hash::DefaultOps;
    /// use quad_hash::HashSet;
    ///
    /// let mut set: HashSet<i32, DefaultOps> = HashSet::new();
    /// set.insert(&1);
    /// assert!(set.contains(&1));
    /// assert!(!set.contains(&2));
    /// # }
    /// ```
    pub fn contains(&self, value: &T) -> bool {
        self.find(self.ops.hash(value), value).is_some()
    }

    /// Returns a reference to the stored value equal to `value`, if any.
    pub fn get(&self, value: &T) -> Option<&T> {
        self.find(self.ops.hash(value), value)
            .and_then(|index| self.slots[index].get())
    }

    /// Removes the value equal to `value` and releases it. Returns whether a
    /// value was removed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use quad_hash::DefaultOps;
    /// use quad_hash::HashSet;
    ///
    /// let mut set: HashSet<i32, DefaultOps> = HashSet::new();
    /// set.insert(&1);
    /// assert_eq!(set.erase(&1), true);
    /// assert_eq!(set.erase(&1), false);
    /// # }
    /// ```
    pub fn erase(&mut self, value: &T) -> bool {
        match self.unlink(value) {
            Some(removed) => {
                self.ops.free(removed);
                self.shrink_if_sparse();
                true
            }
            None => false,
        }
    }

    /// Removes and returns the value equal to `value`, handing ownership of
    /// the stored copy to the caller.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use quad_hash::DefaultOps;
    /// use quad_hash::HashSet;
    ///
    /// let mut set: HashSet<String, DefaultOps> = HashSet::new();
    /// set.insert(&"kept".to_string());
    /// assert_eq!(set.take(&"kept".to_string()).as_deref(), Some("kept"));
    /// assert!(set.is_empty());
    /// # }
    /// ```
    pub fn take(&mut self, value: &T) -> Option<T> {
        let removed = self.unlink(value)?;
        self.shrink_if_sparse();
        Some(removed)
    }

    /// Releases every value and resets every probe count. Capacity is kept.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            slot.clear(&self.ops);
            slot.reset_probe_count();
        }
        self.len = 0;
        self.max_probe = 0;
    }

    /// Returns the value stored at the literal slot `index`.
    ///
    /// This is positional access for inspection, not a keyed lookup: `None`
    /// is returned for an index outside `0..capacity` and for an empty slot.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quad_hash::FnOps;
    /// use quad_hash::HashSet;
    ///
    /// let ops = FnOps::<u64>::new(|v| *v, |v| *v, |a, b| a == b, drop);
    /// let mut set = HashSet::with_ops(ops);
    /// set.insert(&5);
    /// assert_eq!(set.at(5), Some(&5));
    /// assert_eq!(set.at(4), None);
    /// assert_eq!(set.at(set.capacity()), None);
    /// ```
    pub fn at(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(Slot::get)
    }

    /// Returns the slot at `index`, or `None` outside `0..capacity`.
    pub fn slot(&self, index: usize) -> Option<&Slot<T>> {
        self.slots.get(index)
    }

    /// Returns an iterator over the stored values in slot order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.len,
        }
    }

    /// Index of the slot holding a value equal to `value`.
    ///
    /// Every stored value sits within `max_probe` attempts of its base
    /// index, so the walk is bounded by that. An empty probe count at the
    /// base index means nothing stored hashes there.
    fn find(&self, hash: u64, value: &T) -> Option<usize> {
        let mask = self.mask();
        if self.slots[probe_index(hash, 0, mask)].probe_count() == 0 {
            return None;
        }

        (0..=self.max_probe)
            .map(|attempt| probe_index(hash, attempt, mask))
            .find(|&index| self.slots[index].contains(value, &self.ops) == SlotMatch::Matched)
    }

    /// Stores a copy of `value` in the first empty slot of its probe
    /// sequence. The caller guarantees the value is absent and that the
    /// table has a free slot.
    fn place(&mut self, hash: u64, value: &T) {
        let mask = self.mask();
        let mut attempt = 0;
        let index = loop {
            let index = probe_index(hash, attempt, mask);
            if !self.slots[index].is_occupied() {
                break index;
            }
            attempt += 1;
            // The first `capacity` attempts cover every slot.
            assert!(attempt < self.slots.len(), "probe sequence exhausted");
        };

        self.slots[index].set_data(value, &self.ops);
        self.slots[probe_index(hash, 0, mask)].increment_probe_count();
        self.max_probe = self.max_probe.max(attempt);
        self.len += 1;
    }

    /// Detaches the stored copy equal to `value` without releasing it.
    fn unlink(&mut self, value: &T) -> Option<T> {
        let hash = self.ops.hash(value);
        let index = self.find(hash, value)?;
        let removed = self.slots[index].take()?;

        let base = probe_index(hash, 0, self.mask());
        self.slots[base].decrement_probe_count();
        self.len -= 1;
        Some(removed)
    }

    fn shrink_if_sparse(&mut self) {
        if self.capacity() > INITIAL_CAPACITY && self.load_factor() <= MIN_LOAD_FACTOR {
            self.resize((self.capacity() / GROWTH_FACTOR).max(INITIAL_CAPACITY));
        }
    }

    /// Rebuilds the table at `new_capacity`.
    ///
    /// Live values are copied out, the old slots are destroyed, and the
    /// copies are placed again against the new capacity before being
    /// released.
    fn resize(&mut self, new_capacity: usize) {
        let snapshot: Vec<T> = self
            .slots
            .iter()
            .filter_map(Slot::get)
            .map(|value| self.ops.copy(value))
            .collect();

        let old = core::mem::replace(&mut self.slots, alloc_slots(new_capacity));
        for slot in old.into_vec() {
            slot.destroy(&self.ops);
        }
        self.len = 0;
        self.max_probe = 0;

        for value in &snapshot {
            let hash = self.ops.hash(value);
            self.place(hash, value);
        }
        for value in snapshot {
            self.ops.free(value);
        }
    }

    /// Returns probe statistics for the current table.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        DebugStats {
            len: self.len,
            capacity: self.capacity(),
            occupied_slots: self.slots.iter().filter(|s| s.is_occupied()).count(),
            load_factor: self.load_factor(),
            max_probe: self.max_probe,
            total_probe_count: self.slots.iter().map(Slot::probe_count).sum(),
        }
    }

    /// Returns how many stored values sit at each probe attempt.
    ///
    /// Index `n` counts values placed `n` attempts away from their base
    /// index; the vector has `max_probe + 1` entries.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> Vec<usize> {
        let mut hist = alloc::vec![0usize; self.max_probe + 1];
        let mask = self.mask();

        for (index, slot) in self.slots.iter().enumerate() {
            let Some(value) = slot.get() else {
                continue;
            };
            let hash = self.ops.hash(value);
            if let Some(attempt) =
                (0..=self.max_probe).find(|&attempt| probe_index(hash, attempt, mask) == index)
            {
                hist[attempt] += 1;
            }
        }

        hist
    }
}

impl<T> HashSet<T, FnOps<T>> {
    /// Creates an empty set from optional behavior functions, failing if any
    /// of them is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quad_hash::HashSet;
    /// use quad_hash::MissingBehavior;
    ///
    /// let set = HashSet::<u64, _>::try_from_fns(Some(|v| *v), Some(|v| *v), Some(|a, b| a == b), None);
    /// assert_eq!(set.err(), Some(MissingBehavior::Free));
    /// ```
    pub fn try_from_fns(
        hash: Option<crate::ops::HashFn<T>>,
        copy: Option<crate::ops::CopyFn<T>>,
        compare: Option<crate::ops::CompareFn<T>>,
        free: Option<crate::ops::FreeFn<T>>,
    ) -> Result<Self, MissingBehavior> {
        FnOps::from_parts(hash, copy, compare, free).map(Self::with_ops)
    }
}

impl<T, S> HashSet<T, HashedOps<S>>
where
    T: Hash + Eq + Clone,
    S: BuildHasher,
{
    /// Creates an empty set for `Hash + Eq + Clone` values hashed with
    /// `hash_builder`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "std")]
    /// # {
    /// use std::collections::hash_map::RandomState;
    ///
    /// use quad_hash::HashSet;
    ///
    /// let set: HashSet<i32, _> = HashSet::with_hasher(RandomState::new());
    /// assert!(set.is_empty());
    /// # }
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_ops(HashedOps::with_hasher(hash_builder))
    }
}

impl<T, O> HashSet<T, O>
where
    O: ValueOps<T> + Default,
{
    /// Creates an empty set using the default value behavior.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use quad_hash::DefaultOps;
    /// use quad_hash::HashSet;
    ///
    /// let set: HashSet<i32, DefaultOps> = HashSet::new();
    /// assert!(set.is_empty());
    /// # }
    /// ```
    pub fn new() -> Self {
        Self::with_ops(O::default())
    }
}

impl<T, O> Default for HashSet<T, O>
where
    O: ValueOps<T> + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

/// An iterator over the values of a `HashSet`, in slot order.
pub struct Iter<'a, T> {
    slots: core::slice::Iter<'a, Slot<T>>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        for slot in self.slots.by_ref() {
            if let Some(value) = slot.get() {
                self.remaining -= 1;
                return Some(value);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<'a, T, O> IntoIterator for &'a HashSet<T, O>
where
    O: ValueOps<T>,
{
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, O> FromIterator<T> for HashSet<T, O>
where
    O: ValueOps<T> + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = HashSet::new();
        set.extend(iter);
        set
    }
}

impl<T, O> Extend<T> for HashSet<T, O>
where
    O: ValueOps<T>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(&value);
            self.ops.free(value);
        }
    }
}

impl<'a, T, O> Extend<&'a T> for HashSet<T, O>
where
    T: 'a,
    O: ValueOps<T>,
{
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}
