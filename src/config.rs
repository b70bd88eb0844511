use crate::Error;

/// The smallest table the map will allocate. Corresponds to an expected
/// maximum size of 2 given the 2/3 load factor.
pub const MIN_CAPACITY: usize = 4;

/// The table size used by [`IdentityHashMap::new`]. Corresponds to an expected
/// maximum size of 21 given the 2/3 load factor.
///
/// [`IdentityHashMap::new`]: crate::IdentityHashMap::new
pub const DEFAULT_CAPACITY: usize = 32;

cfg_if::cfg_if! {
    if #[cfg(target_pointer_width = "16")] {
        /// The largest table any configuration may request.
        pub const ABSOLUTE_MAX_CAPACITY: usize = 1 << 12;
        /// The maximum table size used when none is configured.
        pub const DEFAULT_MAX_CAPACITY: usize = 1 << 12;
    } else {
        /// The largest table any configuration may request.
        pub const ABSOLUTE_MAX_CAPACITY: usize = 1 << 29;
        /// The maximum table size used when none is configured.
        pub const DEFAULT_MAX_CAPACITY: usize = 1 << 28;
    }
}

/// Controls how an inserted entry claims its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InsertPolicy {
    /// Plain linear probing: a new entry takes the first empty slot after its
    /// preferred index and never moves an existing occupant.
    Linear,
    /// Robin Hood displacement: while probing, an entry that has travelled
    /// further from its preferred slot than the current occupant takes that
    /// slot, and the occupant continues probing in its place.
    ///
    /// Keeping probe distances balanced lets lookups stop as soon as they reach
    /// an occupant closer to home than the sought key would be.
    #[default]
    RobinHood,
}

/// Table configuration fixed for the lifetime of a map.
///
/// # Examples
///
/// ```rust
/// use ident_hash::Config;
/// use ident_hash::InsertPolicy;
///
/// let config = Config::new()
///     .with_policy(InsertPolicy::Linear)
///     .with_max_capacity(1 << 10)
///     .unwrap();
/// assert_eq!(config.policy(), InsertPolicy::Linear);
/// assert_eq!(config.max_capacity(), 1 << 10);
///
/// assert!(Config::new().with_max_capacity(1000).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Config {
    policy: InsertPolicy,
    max_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Robin Hood insertion with the default maximum capacity.
    pub const fn new() -> Self {
        Self {
            policy: InsertPolicy::RobinHood,
            max_capacity: DEFAULT_MAX_CAPACITY,
        }
    }

    /// Sets the insertion policy.
    pub const fn with_policy(mut self, policy: InsertPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the largest table the map may grow to.
    ///
    /// A table of capacity `n` holds at most `n - 1` entries, since at least
    /// one slot must stay empty to terminate probing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] unless `max_capacity` is a power of
    /// two between [`MIN_CAPACITY`] and [`ABSOLUTE_MAX_CAPACITY`].
    pub const fn with_max_capacity(mut self, max_capacity: usize) -> Result<Self, Error> {
        if !max_capacity.is_power_of_two()
            || max_capacity < MIN_CAPACITY
            || max_capacity > ABSOLUTE_MAX_CAPACITY
        {
            return Err(Error::InvalidArgument(
                "max capacity must be a power of two within the supported range",
            ));
        }
        self.max_capacity = max_capacity;
        Ok(self)
    }

    /// The insertion policy.
    pub const fn policy(&self) -> InsertPolicy {
        self.policy
    }

    /// The largest table size the map may grow to.
    pub const fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    pub(crate) const fn robin_hood(&self) -> bool {
        matches!(self.policy, InsertPolicy::RobinHood)
    }

    /// The table size a map starts with when no size is expected.
    pub(crate) const fn default_capacity(&self) -> usize {
        if DEFAULT_CAPACITY < self.max_capacity {
            DEFAULT_CAPACITY
        } else {
            self.max_capacity
        }
    }
}

/// Returns the table size for a map expected to hold `expected` entries.
///
/// The result is the smallest power of two between [`MIN_CAPACITY`] and
/// `max_capacity` that keeps `expected` entries under the 2/3 load factor, or
/// `max_capacity` when no such size exists.
///
/// # Examples
///
/// ```rust
/// use ident_hash::config::capacity_for;
///
/// assert_eq!(capacity_for(0, 1 << 28), 4);
/// assert_eq!(capacity_for(21, 1 << 28), 32);
/// assert_eq!(capacity_for(100, 64), 64);
/// ```
pub fn capacity_for(expected: usize, max_capacity: usize) -> usize {
    if expected > max_capacity / 3 {
        max_capacity
    } else if expected <= 2 * MIN_CAPACITY / 3 {
        MIN_CAPACITY
    } else {
        let scaled = expected + (expected << 1);
        let highest = 1usize << (usize::BITS - 1 - scaled.leading_zeros());
        highest.clamp(MIN_CAPACITY, max_capacity)
    }
}

/// Returns whether a table of `capacity` slots must grow before holding
/// `len` entries.
#[inline(always)]
pub(crate) fn exceeds_load_factor(len: usize, capacity: usize) -> bool {
    len + (len << 1) > capacity << 1
}
