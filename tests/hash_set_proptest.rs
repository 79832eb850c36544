use std::collections::HashSet as StdHashSet;

use proptest::prelude::*;
use quad_hash::DefaultOps;
use quad_hash::FnOps;
use quad_hash::HashSet;
use quad_hash::hash_set::INITIAL_CAPACITY;
use quad_hash::hash_set::MAX_LOAD_FACTOR;
use quad_hash::hash_set::MIN_LOAD_FACTOR;

fn check_invariants<T, O: quad_hash::ValueOps<T>>(
    set: &HashSet<T, O>,
) -> Result<(), TestCaseError> {
    let lf = set.load_factor();
    prop_assert!(set.capacity().is_power_of_two());
    prop_assert!(set.capacity() >= INITIAL_CAPACITY);
    prop_assert!(lf < MAX_LOAD_FACTOR, "load factor {} at ceiling", lf);
    prop_assert!(
        set.capacity() == INITIAL_CAPACITY || lf > MIN_LOAD_FACTOR,
        "load factor {} at floor with capacity {}",
        lf,
        set.capacity()
    );

    let probe_total: usize = (0..set.capacity())
        .filter_map(|i| set.slot(i))
        .map(|slot| slot.probe_count())
        .sum();
    prop_assert_eq!(probe_total, set.len());
    Ok(())
}

// Model insert/erase against std's HashSet and check the table invariants
// after every step.
proptest! {
    #[test]
    fn prop_matches_std_model(ops in proptest::collection::vec((any::<bool>(), 0u16..256u16), 1..400)) {
        let mut set: HashSet<u16, DefaultOps> = HashSet::new();
        let mut model = StdHashSet::new();

        for (insert, value) in ops {
            if insert {
                prop_assert_eq!(set.insert(&value), model.insert(value));
            } else {
                prop_assert_eq!(set.erase(&value), model.remove(&value));
            }
            prop_assert_eq!(set.len(), model.len());
            prop_assert_eq!(set.contains(&value), model.contains(&value));
            check_invariants(&set)?;
        }

        for value in &model {
            prop_assert!(set.contains(value));
        }
        let collected: StdHashSet<u16> = set.iter().copied().collect();
        prop_assert_eq!(collected, model);
    }

    // A weak hash packs many values onto few base indices, exercising long
    // probe sequences and holes left by erasure.
    #[test]
    fn prop_clustered_hash_matches_model(ops in proptest::collection::vec((0u8..3u8, 0u32..200u32), 1..300)) {
        let ops_fns = FnOps::<u32>::new(|v| (*v % 5) as u64, |v| *v, |a, b| a == b, drop);
        let mut set = HashSet::with_ops(ops_fns);
        let mut model = StdHashSet::new();

        for (op, value) in ops {
            match op {
                0 | 1 => {
                    prop_assert_eq!(set.insert(&value), model.insert(value));
                }
                2 => {
                    prop_assert_eq!(set.erase(&value), model.remove(&value));
                }
                _ => unreachable!(),
            }
            check_invariants(&set)?;
        }

        prop_assert_eq!(set.len(), model.len());
        for value in 0u32..200 {
            prop_assert_eq!(set.contains(&value), model.contains(&value));
        }
    }

    #[test]
    fn prop_clear_forgets_everything(values in proptest::collection::vec(any::<u64>(), 0..200)) {
        let mut set: HashSet<u64, DefaultOps> = HashSet::new();
        for v in &values {
            set.insert(v);
        }
        let capacity = set.capacity();

        set.clear();
        prop_assert_eq!(set.len(), 0);
        prop_assert_eq!(set.capacity(), capacity);
        for v in &values {
            prop_assert!(!set.contains(v));
        }
        for i in 0..capacity {
            prop_assert!(set.at(i).is_none());
        }
    }
}
