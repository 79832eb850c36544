//! A single storage cell of a [`HashSet`](crate::HashSet).
//!
//! A slot owns at most one value and counts how many stored values hash to
//! it as their base index. The count is bookkeeping for the slot's *position*
//! in the table and is independent of whether the slot itself is occupied.

use core::fmt::Debug;

use crate::ops::ValueOps;

/// The result of comparing a slot's content against a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotMatch {
    /// The slot holds a value equal to the probe.
    Matched,
    /// The slot holds a value, but not an equal one.
    Mismatched,
    /// The slot holds nothing to compare against.
    Empty,
}

/// A storage cell holding at most one value and a probe count.
///
/// Slots never store their own [`ValueOps`]; the owning set passes its
/// behavior into every call that copies, compares or releases a value.
/// Only a [`HashSet`](crate::HashSet) creates slots and stores values in
/// them, so every value a slot holds is released through the set's
/// behavior. Outside the crate a slot is read-only:
///
/// ```compile_fail
/// use quad_hash::slot::Slot;
///
/// let slot: Slot<u32> = Slot::new();
/// ```
pub struct Slot<T> {
    value: Option<T>,
    probe_count: usize,
}

impl<T: Debug> Debug for Slot<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Slot")
            .field("value", &self.value)
            .field("probe_count", &self.probe_count)
            .finish()
    }
}

impl<T> Slot<T> {
    /// Creates an empty slot with a probe count of zero.
    pub(crate) const fn new() -> Self {
        Self {
            value: None,
            probe_count: 0,
        }
    }

    /// Returns the stored value, if any.
    #[inline]
    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Returns `true` if the slot holds a value.
    #[inline]
    pub fn is_occupied(&self) -> bool {
        self.value.is_some()
    }

    /// Returns the number of stored values whose base index is this slot.
    #[inline]
    pub fn probe_count(&self) -> usize {
        self.probe_count
    }

    /// Compares the stored value against `value`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quad_hash::FnOps;
    /// use quad_hash::HashSet;
    /// use quad_hash::slot::SlotMatch;
    ///
    /// let ops = FnOps::<u32>::new(|v| *v as u64, |v| *v, |a, b| a == b, drop);
    /// let mut set = HashSet::with_ops(ops);
    /// set.insert(&1);
    ///
    /// let slot = set.slot(1).unwrap();
    /// assert_eq!(slot.contains(&1, set.ops()), SlotMatch::Matched);
    /// assert_eq!(slot.contains(&2, set.ops()), SlotMatch::Mismatched);
    /// assert_eq!(set.slot(0).unwrap().contains(&1, set.ops()), SlotMatch::Empty);
    /// ```
    #[inline]
    pub fn contains<O: ValueOps<T>>(&self, value: &T, ops: &O) -> SlotMatch {
        match &self.value {
            Some(stored) if ops.compare(stored, value) => SlotMatch::Matched,
            Some(_) => SlotMatch::Mismatched,
            None => SlotMatch::Empty,
        }
    }

    /// Stores a copy of `value`, releasing any value already held.
    pub(crate) fn set_data<O: ValueOps<T>>(&mut self, value: &T, ops: &O) {
        if let Some(previous) = self.value.take() {
            ops.free(previous);
        }
        self.value = Some(ops.copy(value));
    }

    /// Releases the stored value, if any, leaving the slot empty.
    ///
    /// The probe count is left untouched.
    pub(crate) fn clear<O: ValueOps<T>>(&mut self, ops: &O) {
        if let Some(previous) = self.value.take() {
            ops.free(previous);
        }
    }

    /// Releases the stored value, if any, and consumes the slot.
    pub(crate) fn destroy<O: ValueOps<T>>(mut self, ops: &O) {
        self.clear(ops);
    }

    /// Removes the stored value without releasing it.
    #[inline]
    pub(crate) fn take(&mut self) -> Option<T> {
        self.value.take()
    }

    /// Produces an independent slot holding a copy of this slot's value and
    /// the same probe count.
    pub(crate) fn duplicate<O: ValueOps<T>>(&self, ops: &O) -> Self {
        Self {
            value: self.value.as_ref().map(|v| ops.copy(v)),
            probe_count: self.probe_count,
        }
    }

    #[inline]
    pub(crate) fn increment_probe_count(&mut self) {
        self.probe_count += 1;
    }

    #[inline]
    pub(crate) fn decrement_probe_count(&mut self) {
        debug_assert!(self.probe_count > 0);
        self.probe_count -= 1;
    }

    #[inline]
    pub(crate) fn reset_probe_count(&mut self) {
        self.probe_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::string::String;
    use alloc::string::ToString;
    use core::cell::Cell;

    use super::*;
    use crate::ops::FnOps;

    /// Counts copies and frees so ownership transfers can be asserted.
    #[derive(Default)]
    struct CountingOps {
        copies: Rc<Cell<usize>>,
        frees: Rc<Cell<usize>>,
    }

    impl ValueOps<String> for CountingOps {
        fn hash(&self, value: &String) -> u64 {
            value.len() as u64
        }

        fn copy(&self, value: &String) -> String {
            self.copies.set(self.copies.get() + 1);
            value.clone()
        }

        fn compare(&self, stored: &String, probe: &String) -> bool {
            stored == probe
        }

        fn free(&self, value: String) {
            self.frees.set(self.frees.get() + 1);
            drop(value);
        }
    }

    fn u32_ops() -> FnOps<u32> {
        FnOps::<u32>::new(|v| *v as u64, |v| *v, |a, b| a == b, drop)
    }

    #[test]
    fn new_slot_is_empty() {
        let slot: Slot<u32> = Slot::new();
        assert!(!slot.is_occupied());
        assert_eq!(slot.get(), None);
        assert_eq!(slot.probe_count(), 0);
        assert_eq!(slot.contains(&0, &u32_ops()), SlotMatch::Empty);
    }

    #[test]
    fn set_data_stores_a_copy() {
        let ops = CountingOps::default();
        let mut slot = Slot::new();
        let value = "owned".to_string();

        slot.set_data(&value, &ops);
        assert_eq!(slot.get(), Some(&value));
        assert_eq!(ops.copies.get(), 1);
        assert_eq!(ops.frees.get(), 0);
        assert_eq!(slot.contains(&value, &ops), SlotMatch::Matched);
        assert_eq!(
            slot.contains(&"other".to_string(), &ops),
            SlotMatch::Mismatched
        );
    }

    #[test]
    fn set_data_releases_previous_value() {
        let ops = CountingOps::default();
        let mut slot = Slot::new();

        slot.set_data(&"first".to_string(), &ops);
        slot.set_data(&"second".to_string(), &ops);

        assert_eq!(slot.get().map(String::as_str), Some("second"));
        assert_eq!(ops.copies.get(), 2);
        assert_eq!(ops.frees.get(), 1);
    }

    #[test]
    fn clear_releases_once_and_keeps_probe_count() {
        let ops = CountingOps::default();
        let mut slot = Slot::new();
        slot.set_data(&"value".to_string(), &ops);
        slot.increment_probe_count();

        slot.clear(&ops);
        slot.clear(&ops);

        assert!(!slot.is_occupied());
        assert_eq!(ops.frees.get(), 1);
        assert_eq!(slot.probe_count(), 1);
    }

    #[test]
    fn destroy_releases_held_value() {
        let ops = CountingOps::default();
        let mut slot = Slot::new();
        slot.set_data(&"value".to_string(), &ops);
        slot.destroy(&ops);
        assert_eq!(ops.frees.get(), 1);

        let empty: Slot<String> = Slot::new();
        empty.destroy(&ops);
        assert_eq!(ops.frees.get(), 1);
    }

    #[test]
    fn probe_count_tracks_independently_of_content() {
        let mut slot: Slot<u32> = Slot::new();
        slot.increment_probe_count();
        slot.increment_probe_count();
        assert_eq!(slot.probe_count(), 2);
        assert!(!slot.is_occupied());

        slot.decrement_probe_count();
        assert_eq!(slot.probe_count(), 1);

        slot.reset_probe_count();
        assert_eq!(slot.probe_count(), 0);
    }

    #[test]
    fn duplicate_copies_value_and_count() {
        let ops = CountingOps::default();
        let mut slot = Slot::new();
        slot.set_data(&"value".to_string(), &ops);
        slot.increment_probe_count();

        let copy = slot.duplicate(&ops);
        assert_eq!(copy.get(), slot.get());
        assert_eq!(copy.probe_count(), 1);
        assert_eq!(ops.copies.get(), 2);
    }

    #[test]
    fn take_does_not_release() {
        let ops = CountingOps::default();
        let mut slot = Slot::new();
        slot.set_data(&"value".to_string(), &ops);

        assert_eq!(slot.take().as_deref(), Some("value"));
        assert!(!slot.is_occupied());
        assert_eq!(ops.frees.get(), 0);
    }
}
