//! The open-addressing table underneath [`IdentityHashMap`].
//!
//! [`RawTable`] stores `(hash, key, value)` buckets in one flat slot array
//! and resolves collisions by circular linear probing. Like the map it backs,
//! it never hashes or compares keys itself: every operation takes the key's
//! hash and an equality predicate.
//!
//! [`IdentityHashMap`]: crate::IdentityHashMap

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::iter::FusedIterator;
use core::marker::PhantomData;

use crate::Error;
use crate::config::Config;
use crate::config::capacity_for;
use crate::config::exceeds_load_factor;

/// Returns the preferred slot for `hash` in a table of `len` slots.
///
/// The high half of the hash is folded into the low half so that small
/// tables, which only look at the low bits, still see all of it. `len` must be
/// a power of two.
///
/// # Examples
///
/// ```rust
/// use ident_hash::hash_table::index;
///
/// assert_eq!(index(5, 8), 5);
/// assert_eq!(index(0x0001_0000, 8), 1);
/// ```
#[inline(always)]
pub fn index(hash: u32, len: usize) -> usize {
    ((hash ^ (hash >> 16)) as usize) & (len - 1)
}

/// Returns the slot probed after `i`, wrapping at the end of the table.
#[inline(always)]
pub fn next_index(i: usize, len: usize) -> usize {
    (i + 1) & (len - 1)
}

/// Returns how many probe steps past its preferred slot `want` an entry
/// sitting at `i` is.
#[inline(always)]
pub fn hops(i: usize, len: usize, want: usize) -> usize {
    (i + len - want) & (len - 1)
}

/// Returns whether the occupant at `i`, preferring slot `r`, must move back
/// into the gap at `d` to stay reachable from `r`.
///
/// This is the circular form of "`r` does not lie in `(d, i]`".
#[inline(always)]
pub fn fills_gap(i: usize, r: usize, d: usize) -> bool {
    (i < r && (r <= d || d <= i)) || (r <= d && d <= i)
}

#[derive(Clone, Debug)]
pub(crate) struct Bucket<K, V> {
    pub(crate) hash: u32,
    pub(crate) key: K,
    pub(crate) value: V,
}

pub(crate) type Slot<K, V> = Option<Bucket<K, V>>;

fn empty_slots<K, V>(capacity: usize) -> Box<[Slot<K, V>]> {
    core::iter::repeat_with(|| None).take(capacity).collect()
}

/// Writes `bucket` into `slots`, which must not already hold its key and
/// must have at least one empty slot. Returns the slot `bucket` landed in.
///
/// Under Robin Hood displacement the bucket being placed takes over any slot
/// whose occupant is closer to home than the bucket is, and the displaced
/// occupant continues probing in its place.
fn place<K, V>(slots: &mut [Slot<K, V>], robin_hood: bool, mut bucket: Bucket<K, V>) -> usize {
    let len = slots.len();
    let mut i = index(bucket.hash, len);
    let mut probed = 0;
    let mut landed = None;

    loop {
        let Some(occupant) = slots[i].as_mut() else {
            slots[i] = Some(bucket);
            return landed.unwrap_or(i);
        };

        if robin_hood {
            let occupant_hops = hops(i, len, index(occupant.hash, len));
            if probed > occupant_hops {
                core::mem::swap(occupant, &mut bucket);
                if landed.is_none() {
                    landed = Some(i);
                }
                probed = occupant_hops;
            }
        }

        probed += 1;
        i = next_index(i, len);
    }
}

/// Probe-length statistics for a [`RawTable`].
///
/// Available with the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq)]
pub struct DebugStats {
    /// Number of entries in the table
    pub len: usize,
    /// Number of slots in the table
    pub capacity: usize,
    /// The largest table this one may grow to
    pub max_capacity: usize,
    /// Occupied slots divided by total slots
    pub load_factor: f64,
    /// Slots inspected by the worst successful lookup
    pub max_probe_length: usize,
    /// Mean slots inspected by a successful lookup
    pub mean_probe_length: f64,
    /// `histogram[h]` counts entries sitting `h` slots past their preferred
    /// slot
    pub histogram: Vec<usize>,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the statistics, including the displacement histogram.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Identity Table Statistics ===");
        println!(
            "Population: {}/{} slots ({:.2}% load, max capacity {})",
            self.len,
            self.capacity,
            self.load_factor * 100.0,
            self.max_capacity
        );
        println!(
            "Probe length: max {}, mean {:.2}",
            self.max_probe_length, self.mean_probe_length
        );

        let widest = self.histogram.iter().copied().max().unwrap_or(0);
        if widest == 0 {
            println!("displacement histogram: empty");
            return;
        }

        let max_bar = 60usize;
        for (hops, &count) in self.histogram.iter().enumerate() {
            let width = (count * max_bar).div_ceil(widest);
            println!("{hops:>3} | {} ({count})", "█".repeat(width));
        }
    }
}

/// An open-addressing hash table with linear probing.
///
/// `RawTable<K, V>` keeps its slot count a power of two between
/// [`MIN_CAPACITY`](crate::config::MIN_CAPACITY) and the configured maximum,
/// doubles when an insertion would push the load factor past 2/3, and always
/// keeps at least one slot empty so that probing terminates. Removal closes
/// the gap it leaves by moving later members of the probe run back, so no
/// tombstones are ever stored.
///
/// ## Example
///
/// ```rust
/// use ident_hash::Config;
/// use ident_hash::hash_table::RawTable;
///
/// let mut table = RawTable::new(Config::new());
/// table.insert_unique(7, "seven", 7).unwrap();
///
/// assert_eq!(table.find(7, |k| *k == "seven"), Some((&"seven", &7)));
/// assert_eq!(table.remove(7, |k| *k == "seven"), Some(("seven", 7)));
/// assert!(table.is_empty());
/// ```
pub struct RawTable<K, V> {
    slots: Box<[Slot<K, V>]>,
    len: usize,
    mod_count: u64,
    config: Config,
}

impl<K, V> Debug for RawTable<K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use alloc::format;
        use alloc::string::String;

        let capacity = self.slots.len();
        let slots = self
            .slots
            .iter()
            .enumerate()
            .map(|(i, slot)| match slot {
                Some(bucket) => {
                    let want = index(bucket.hash, capacity);
                    format!(
                        "{i:>4}: want {want:>4} hops {:>3} hash {:08x}",
                        hops(i, capacity, want),
                        bucket.hash
                    )
                }
                None => format!("{i:>4}: ...."),
            })
            .collect::<Vec<String>>();

        f.debug_struct("RawTable")
            .field("len", &self.len)
            .field("capacity", &capacity)
            .field("config", &self.config)
            .field("slots", &slots)
            .finish()
    }
}

impl<K, V> Clone for RawTable<K, V>
where
    K: Clone,
    V: Clone,
{
    /// Copies the slot array. The copy starts a fresh modification history.
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            len: self.len,
            mod_count: 0,
            config: self.config,
        }
    }
}

impl<K, V> RawTable<K, V> {
    /// Creates an empty table of the configuration's default size.
    pub fn new(config: Config) -> Self {
        Self::with_slots(config.default_capacity(), config)
    }

    /// Creates an empty table sized to hold `expected` entries without
    /// growing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ident_hash::Config;
    /// use ident_hash::hash_table::RawTable;
    ///
    /// let table: RawTable<u32, u32> = RawTable::with_expected_size(100, Config::new());
    /// assert_eq!(table.capacity(), 256);
    /// ```
    pub fn with_expected_size(expected: usize, config: Config) -> Self {
        Self::with_slots(capacity_for(expected, config.max_capacity()), config)
    }

    pub(crate) fn with_slots(capacity: usize, config: Config) -> Self {
        debug_assert!(capacity.is_power_of_two());
        debug_assert!(capacity <= config.max_capacity());

        Self {
            slots: empty_slots(capacity),
            len: 0,
            mod_count: 0,
            config,
        }
    }

    /// Returns the number of entries in the table.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of slots, occupied or not.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the table's configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the structural modification counter.
    ///
    /// The counter changes whenever an entry is added or removed, or the
    /// table is cleared. Overwriting a value is not a structural change.
    pub fn mod_count(&self) -> u64 {
        self.mod_count
    }

    pub(crate) fn slots(&self) -> &[Slot<K, V>] {
        &self.slots
    }

    pub(crate) fn bucket(&self, i: usize) -> Option<&Bucket<K, V>> {
        self.slots.get(i)?.as_ref()
    }

    pub(crate) fn bucket_mut(&mut self, i: usize) -> Option<&mut Bucket<K, V>> {
        self.slots.get_mut(i)?.as_mut()
    }

    /// Returns the bucket in slot `i`, which the caller knows is occupied.
    pub(crate) fn occupied(&self, i: usize) -> &Bucket<K, V> {
        match &self.slots[i] {
            Some(bucket) => bucket,
            None => unreachable!("slot {i} is empty"),
        }
    }

    pub(crate) fn occupied_mut(&mut self, i: usize) -> &mut Bucket<K, V> {
        match &mut self.slots[i] {
            Some(bucket) => bucket,
            None => unreachable!("slot {i} is empty"),
        }
    }

    /// Returns the slot holding the entry with `hash` whose key satisfies
    /// `eq`.
    ///
    /// Under Robin Hood insertion the probe stops as soon as it meets an
    /// occupant closer to its preferred slot than the sought key would be at
    /// the same position, because displacement would have put the key there.
    #[inline]
    pub(crate) fn find_index(&self, hash: u32, eq: impl Fn(&K) -> bool) -> Option<usize> {
        let len = self.slots.len();
        let robin_hood = self.config.robin_hood();
        let mut i = index(hash, len);
        let mut probed = 0;

        loop {
            let bucket = self.slots[i].as_ref()?;
            if bucket.hash == hash && eq(&bucket.key) {
                return Some(i);
            }
            if robin_hood && probed > hops(i, len, index(bucket.hash, len)) {
                return None;
            }

            probed += 1;
            i = next_index(i, len);
        }
    }

    /// Finds the entry with `hash` whose key satisfies `eq`.
    pub fn find(&self, hash: u32, eq: impl Fn(&K) -> bool) -> Option<(&K, &V)> {
        let bucket = self.bucket(self.find_index(hash, eq)?)?;
        Some((&bucket.key, &bucket.value))
    }

    /// Finds the entry with `hash` whose key satisfies `eq`, with its value
    /// mutable.
    pub fn find_mut(&mut self, hash: u32, eq: impl Fn(&K) -> bool) -> Option<(&K, &mut V)> {
        let i = self.find_index(hash, eq)?;
        let bucket = self.bucket_mut(i)?;
        Some((&bucket.key, &mut bucket.value))
    }

    /// Inserts an entry whose key the caller knows is absent, growing the
    /// table first if the insertion would exceed the 2/3 load factor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExhausted`] if the table is at its maximum
    /// size and holds `capacity - 1` entries.
    pub fn insert_unique(&mut self, hash: u32, key: K, value: V) -> Result<&mut V, Error> {
        let i = self.insert_unique_index(hash, key, value)?;
        Ok(&mut self.occupied_mut(i).value)
    }

    pub(crate) fn insert_unique_index(
        &mut self,
        hash: u32,
        key: K,
        value: V,
    ) -> Result<usize, Error> {
        self.reserve_one()?;
        let i = place(&mut self.slots, self.config.robin_hood(), Bucket { hash, key, value });
        self.len += 1;
        self.mod_count = self.mod_count.wrapping_add(1);
        Ok(i)
    }

    /// Inserts an entry while reconstructing a persisted table.
    ///
    /// The table is expected to be pre-sized, so this skips modification
    /// bookkeeping; it only grows if the persisted size understated the
    /// entry count.
    #[cfg(any(test, feature = "serde"))]
    pub(crate) fn load(
        &mut self,
        hash: u32,
        key: K,
        value: V,
        eq: impl Fn(&K, &K) -> bool,
    ) -> Result<(), Error> {
        if self.find_index(hash, |k| eq(k, &key)).is_some() {
            return Err(Error::StreamCorrupted("duplicate key"));
        }

        self.reserve_one()?;
        place(&mut self.slots, self.config.robin_hood(), Bucket { hash, key, value });
        self.len += 1;
        Ok(())
    }

    #[inline]
    fn reserve_one(&mut self) -> Result<(), Error> {
        let capacity = self.slots.len();
        if exceeds_load_factor(self.len + 1, capacity) {
            self.grow(capacity << 1)?;
        }
        Ok(())
    }

    /// Rebuilds the table with `new_capacity` slots, reinserting every entry.
    ///
    /// Returns `Ok(false)` without doing anything if `new_capacity` does not
    /// exceed the current size, or if the table is already at its maximum size
    /// but still has room.
    #[cold]
    pub(crate) fn grow(&mut self, new_capacity: usize) -> Result<bool, Error> {
        let old_capacity = self.slots.len();
        if new_capacity <= old_capacity {
            return Ok(false);
        }

        let max_capacity = self.config.max_capacity();
        if old_capacity >= max_capacity {
            if self.len >= old_capacity - 1 {
                tracing::warn!(capacity = old_capacity, "identity table capacity exhausted");
                return Err(Error::CapacityExhausted {
                    capacity: old_capacity,
                });
            }
            return Ok(false);
        }

        let new_capacity = new_capacity.min(max_capacity);
        tracing::debug!(old_capacity, new_capacity, len = self.len, "resizing identity table");

        let robin_hood = self.config.robin_hood();
        let old = core::mem::replace(&mut self.slots, empty_slots(new_capacity));
        for bucket in old.into_vec().into_iter().flatten() {
            place(&mut self.slots, robin_hood, bucket);
        }

        Ok(true)
    }

    /// Grows the table so that `additional` more entries fit without a
    /// further resize, as far as the maximum capacity allows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExhausted`] if growth was needed but the table
    /// is already full at its maximum size.
    pub fn reserve(&mut self, additional: usize) -> Result<(), Error> {
        let required = self.len.saturating_add(additional);
        if exceeds_load_factor(required, self.slots.len()) {
            self.grow(capacity_for(required, self.config.max_capacity()))?;
        }
        Ok(())
    }

    /// Removes the entry with `hash` whose key satisfies `eq`.
    pub fn remove(&mut self, hash: u32, eq: impl Fn(&K) -> bool) -> Option<(K, V)> {
        let i = self.find_index(hash, eq)?;
        self.remove_at(i).map(|bucket| (bucket.key, bucket.value))
    }

    pub(crate) fn remove_at(&mut self, d: usize) -> Option<Bucket<K, V>> {
        self.remove_at_with(d, |_, _, _| {})
    }

    /// Empties slot `d` and closes the gap it leaves (Knuth, Algorithm 6.4R).
    ///
    /// Walking forward from the gap until the end of the probe run, every
    /// occupant that would become unreachable from its preferred slot moves
    /// back into the gap, and its old slot becomes the new gap.
    /// `on_move(slots, from, to)` observes the table before each such move.
    pub(crate) fn remove_at_with(
        &mut self,
        d: usize,
        mut on_move: impl FnMut(&[Slot<K, V>], usize, usize),
    ) -> Option<Bucket<K, V>> {
        let removed = self.slots.get_mut(d)?.take()?;
        self.len -= 1;
        self.mod_count = self.mod_count.wrapping_add(1);

        let len = self.slots.len();
        let mut d = d;
        let mut i = next_index(d, len);
        while let Some(occupant) = &self.slots[i] {
            let r = index(occupant.hash, len);
            if fills_gap(i, r, d) {
                on_move(&self.slots, i, d);
                self.slots[d] = self.slots[i].take();
                d = i;
            }
            i = next_index(i, len);
        }

        Some(removed)
    }

    /// Keeps only the entries for which `f` returns `true`.
    ///
    /// The scan starts just after an empty slot. Probe runs never span an
    /// empty slot, so every entry moved by gap closing comes from a slot not
    /// yet visited, and each entry is offered to `f` exactly once.
    pub fn retain(&mut self, mut f: impl FnMut(&K, &mut V) -> bool) {
        let len = self.slots.len();
        let Some(start) = self.slots.iter().position(Option::is_none) else {
            return;
        };

        let mut step = 1;
        while step < len {
            let i = (start + step) & (len - 1);
            let keep = match self.slots[i].as_mut() {
                Some(bucket) => f(&bucket.key, &mut bucket.value),
                None => true,
            };

            if keep {
                step += 1;
            } else {
                self.remove_at(i);
            }
        }
    }

    /// Removes every entry, keeping the table's size.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.len = 0;
        self.mod_count = self.mod_count.wrapping_add(1);
    }

    /// Returns an iterator over all entries in slot order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.len,
        }
    }

    /// Returns an iterator over all entries in slot order, with mutable
    /// values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            slots: self.slots.iter_mut(),
            remaining: self.len,
        }
    }

    /// Removes and yields every entry. The table keeps its size.
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        let capacity = self.slots.len();
        let slots = core::mem::replace(&mut self.slots, empty_slots(capacity));
        let remaining = core::mem::take(&mut self.len);
        self.mod_count = self.mod_count.wrapping_add(1);

        Drain {
            inner: IntoIter {
                slots: slots.into_vec().into_iter(),
                remaining,
            },
            _marker: PhantomData,
        }
    }

    pub(crate) fn into_iter(self) -> IntoIter<K, V> {
        IntoIter {
            slots: self.slots.into_vec().into_iter(),
            remaining: self.len,
        }
    }

    /// Returns how many entries sit each number of slots past their preferred
    /// slot: `histogram[h]` counts entries displaced by `h`.
    ///
    /// Available with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> Vec<usize> {
        let len = self.slots.len();
        let mut histogram = Vec::new();
        for (i, slot) in self.slots.iter().enumerate() {
            if let Some(bucket) = slot {
                let displaced = hops(i, len, index(bucket.hash, len));
                if histogram.len() <= displaced {
                    histogram.resize(displaced + 1, 0);
                }
                histogram[displaced] += 1;
            }
        }
        histogram
    }

    /// Returns the number of slots the worst successful lookup inspects.
    ///
    /// Available with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn max_probe_length(&self) -> usize {
        self.probe_histogram().len()
    }

    /// Returns occupied slots divided by total slots.
    ///
    /// Available with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.slots.len() as f64
    }

    /// Collects probe-length statistics by walking the table.
    ///
    /// Available with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let histogram = self.probe_histogram();
        let total_probes: usize = histogram
            .iter()
            .enumerate()
            .map(|(displaced, count)| (displaced + 1) * count)
            .sum();

        DebugStats {
            len: self.len,
            capacity: self.slots.len(),
            max_capacity: self.config.max_capacity(),
            load_factor: self.load_factor(),
            max_probe_length: histogram.len(),
            mean_probe_length: if self.len == 0 {
                0.0
            } else {
                total_probes as f64 / self.len as f64
            },
            histogram,
        }
    }

    /// Checks every structural invariant of the table.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let len = self.slots.len();
        assert!(len.is_power_of_two());
        assert!(len >= crate::config::MIN_CAPACITY);
        assert!(len <= self.config.max_capacity());

        let occupied = self.slots.iter().filter(|slot| slot.is_some()).count();
        assert_eq!(occupied, self.len, "len disagrees with occupied slots");
        assert!(occupied < len, "no empty slot left");

        for (i, slot) in self.slots.iter().enumerate() {
            let Some(bucket) = slot else {
                continue;
            };

            let found = self.find_index(bucket.hash, |k| core::ptr::eq(k, &bucket.key));
            assert_eq!(found, Some(i), "entry at slot {i} unreachable: {self:#?}");

            if self.config.robin_hood() {
                let here = hops(i, len, index(bucket.hash, len));
                let previous = (i + len - 1) & (len - 1);
                match &self.slots[previous] {
                    None => assert_eq!(here, 0, "entry after a gap is displaced: {self:#?}"),
                    Some(before) => {
                        let there = hops(previous, len, index(before.hash, len));
                        assert!(here <= there + 1, "displacement jumps at slot {i}: {self:#?}");
                    }
                }
            }
        }
    }
}

/// An iterator over the entries of a [`RawTable`].
///
/// This struct is created by the [`iter`] method on [`RawTable`].
///
/// [`iter`]: RawTable::iter
pub struct Iter<'a, K, V> {
    slots: core::slice::Iter<'a, Slot<K, V>>,
    remaining: usize,
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let bucket = self.slots.find_map(Option::as_ref)?;
        self.remaining -= 1;
        Some((&bucket.key, &bucket.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// A mutable iterator over the entries of a [`RawTable`].
///
/// This struct is created by the [`iter_mut`] method on [`RawTable`].
///
/// [`iter_mut`]: RawTable::iter_mut
pub struct IterMut<'a, K, V> {
    slots: core::slice::IterMut<'a, Slot<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let bucket = self.slots.find_map(Option::as_mut)?;
        self.remaining -= 1;
        Some((&bucket.key, &mut bucket.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

impl<K, V> FusedIterator for IterMut<'_, K, V> {}

/// An owning iterator over the entries of a [`RawTable`].
pub struct IntoIter<K, V> {
    slots: alloc::vec::IntoIter<Slot<K, V>>,
    remaining: usize,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let bucket = self.slots.find_map(core::convert::identity)?;
        self.remaining -= 1;
        Some((bucket.key, bucket.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}

/// A draining iterator over the entries of a [`RawTable`].
///
/// This struct is created by the [`drain`] method on [`RawTable`]. The table
/// is already empty when `drain` returns; dropping the iterator drops any
/// entries not yet yielded.
///
/// [`drain`]: RawTable::drain
pub struct Drain<'a, K, V> {
    inner: IntoIter<K, V>,
    _marker: PhantomData<&'a mut RawTable<K, V>>,
}

impl<K, V> Iterator for Drain<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Drain<'_, K, V> {}

impl<K, V> FusedIterator for Drain<'_, K, V> {}
