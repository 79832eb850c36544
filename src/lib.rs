#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// A hash set using open addressing with triangular quadratic probing.
///
/// This module provides the `HashSet` container, its load-factor constants
/// and its iterator.
pub mod hash_set;

/// Value behavior: hashing, copying, comparing and releasing stored values.
pub mod ops;

pub mod slot;

pub use hash_set::HashSet;
#[cfg(any(feature = "std", feature = "foldhash"))]
pub use ops::DefaultHashBuilder;
#[cfg(any(feature = "std", feature = "foldhash"))]
pub use ops::DefaultOps;
pub use ops::FnOps;
pub use ops::HashedOps;
pub use ops::MissingBehavior;
pub use ops::ValueOps;
