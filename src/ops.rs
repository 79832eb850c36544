use core::fmt;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The hasher builder used by [`DefaultOps`].
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// The hasher builder used by [`DefaultOps`].
        pub type DefaultHashBuilder = std::hash::RandomState;
    }
}

/// Value behavior backed by the standard `Hash`, `Eq` and `Clone` traits and
/// the crate's default hasher builder.
#[cfg(any(feature = "std", feature = "foldhash"))]
pub type DefaultOps = HashedOps<DefaultHashBuilder>;

/// The behavior a [`HashSet`](crate::HashSet) needs from the values it
/// stores.
///
/// A set binds one `ValueOps` at construction and routes every hash, copy,
/// comparison and release of a stored value through it.
///
/// Implementations must keep `hash` consistent with `compare`: two values
/// that compare equal must hash identically.
pub trait ValueOps<T> {
    /// Maps a value to its hash. The same logical value must always produce
    /// the same hash for the lifetime of the set.
    fn hash(&self, value: &T) -> u64;

    /// Produces an independent, owned duplicate of `value`.
    fn copy(&self, value: &T) -> T;

    /// Returns `true` if `stored` and `probe` are the same logical value.
    fn compare(&self, stored: &T, probe: &T) -> bool;

    /// Releases every resource owned by `value`.
    ///
    /// The set calls this exactly once for every value it copied.
    fn free(&self, value: T) {
        drop(value);
    }
}

/// [`ValueOps`] for types implementing `Hash + Eq + Clone`, hashed with a
/// configurable [`BuildHasher`].
#[derive(Clone, Copy, Debug, Default)]
pub struct HashedOps<S> {
    hash_builder: S,
}

impl<S> HashedOps<S> {
    /// Creates value behavior that hashes with `hash_builder`.
    pub fn with_hasher(hash_builder: S) -> Self {
        Self { hash_builder }
    }

    /// Returns the hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }
}

impl<T, S> ValueOps<T> for HashedOps<S>
where
    T: Hash + Eq + Clone,
    S: BuildHasher,
{
    #[inline]
    fn hash(&self, value: &T) -> u64 {
        self.hash_builder.hash_one(value)
    }

    #[inline]
    fn copy(&self, value: &T) -> T {
        value.clone()
    }

    #[inline]
    fn compare(&self, stored: &T, probe: &T) -> bool {
        stored == probe
    }
}

/// Hashes a value.
pub type HashFn<T> = fn(&T) -> u64;
/// Duplicates a value.
pub type CopyFn<T> = fn(&T) -> T;
/// Compares two values for equality.
pub type CompareFn<T> = fn(&T, &T) -> bool;
/// Releases a value.
pub type FreeFn<T> = fn(T);

/// [`ValueOps`] assembled from four plain function pointers.
///
/// This is the form to reach for when the stored type has no useful `Hash`
/// or `Eq` implementation, or when hashing and equality must be looser than
/// the type's own (for example case-insensitive strings).
///
/// # Examples
///
/// ```rust
/// use quad_hash::FnOps;
/// use quad_hash::HashSet;
///
/// let ops = FnOps::<String>::new(
///     |v| v.len() as u64,
///     |v| v.to_ascii_lowercase(),
///     |a, b| a.eq_ignore_ascii_case(b),
///     drop,
/// );
///
/// let mut set = HashSet::with_ops(ops);
/// assert!(set.insert(&"Hello".to_string()));
/// assert!(set.contains(&"HELLO".to_string()));
/// assert!(!set.insert(&"hello".to_string()));
/// ```
pub struct FnOps<T> {
    hash: HashFn<T>,
    copy: CopyFn<T>,
    compare: CompareFn<T>,
    free: FreeFn<T>,
}

impl<T> FnOps<T> {
    /// Bundles the four behavior functions.
    pub fn new(hash: HashFn<T>, copy: CopyFn<T>, compare: CompareFn<T>, free: FreeFn<T>) -> Self {
        Self {
            hash,
            copy,
            compare,
            free,
        }
    }

    /// Bundles the four behavior functions, failing if any of them is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quad_hash::FnOps;
    /// use quad_hash::MissingBehavior;
    ///
    /// let ops = FnOps::<u32>::from_parts(Some(|v| *v as u64), Some(|v| *v), None, Some(drop));
    /// assert_eq!(ops.err(), Some(MissingBehavior::Compare));
    /// ```
    pub fn from_parts(
        hash: Option<HashFn<T>>,
        copy: Option<CopyFn<T>>,
        compare: Option<CompareFn<T>>,
        free: Option<FreeFn<T>>,
    ) -> Result<Self, MissingBehavior> {
        Ok(Self {
            hash: hash.ok_or(MissingBehavior::Hash)?,
            copy: copy.ok_or(MissingBehavior::Copy)?,
            compare: compare.ok_or(MissingBehavior::Compare)?,
            free: free.ok_or(MissingBehavior::Free)?,
        })
    }
}

impl<T> Clone for FnOps<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for FnOps<T> {}

impl<T> Debug for FnOps<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnOps").finish_non_exhaustive()
    }
}

impl<T> ValueOps<T> for FnOps<T> {
    #[inline]
    fn hash(&self, value: &T) -> u64 {
        (self.hash)(value)
    }

    #[inline]
    fn copy(&self, value: &T) -> T {
        (self.copy)(value)
    }

    #[inline]
    fn compare(&self, stored: &T, probe: &T) -> bool {
        (self.compare)(stored, probe)
    }

    #[inline]
    fn free(&self, value: T) {
        (self.free)(value)
    }
}

/// The behavior function that was absent when building an [`FnOps`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissingBehavior {
    /// No hash function was supplied.
    Hash,
    /// No copy function was supplied.
    Copy,
    /// No compare function was supplied.
    Compare,
    /// No free function was supplied.
    Free,
}

impl fmt::Display for MissingBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MissingBehavior::Hash => "hash",
            MissingBehavior::Copy => "copy",
            MissingBehavior::Compare => "compare",
            MissingBehavior::Free => "free",
        };
        write!(f, "missing {name} function")
    }
}

impl core::error::Error for MissingBehavior {}
