use core::fmt::Debug;
use core::hash::Hash;
use core::hash::Hasher;
use core::iter::FusedIterator;

use crate::Error;
use crate::config::Config;
use crate::config::capacity_for;
use crate::cursor::Cursor;
use crate::equivalence::ByIdentity;
use crate::equivalence::Equivalence;
use crate::hash_table;
use crate::hash_table::RawTable;
use crate::views::EntrySet;
use crate::views::KeySet;
use crate::views::ValuesView;

/// A hash map that compares keys by reference identity.
///
/// `IdentityHashMap<K, V, E>` stores its entries in a single open-addressing
/// table with linear probing (see [`RawTable`]). Keys are hashed and compared
/// through an [`Equivalence`] strategy `E`, which by default is
/// [`ByIdentity`]: two keys are the same only when they refer to the same
/// object, however equal their contents are. That makes the map suitable for
/// bookkeeping over object graphs, such as cycle detection during a deep copy.
///
/// Values are compared through the same strategy wherever the map needs to
/// compare them ([`contains_value`], [`remove_mapping`], equality and
/// hashing).
///
/// # Performance Characteristics
///
/// - **Memory**: one slot of `(u32, K, V)` per table entry, with the table
///   kept at most 2/3 full
/// - **Lookups**: expected O(1); with Robin Hood insertion (the default) a
///   miss stops at the first occupant closer to home than the sought key
///
/// [`contains_value`]: IdentityHashMap::contains_value
/// [`remove_mapping`]: IdentityHashMap::remove_mapping
#[derive(Clone)]
pub struct IdentityHashMap<K, V, E = ByIdentity> {
    table: RawTable<K, V>,
    equivalence: E,
}

impl<K, V, E> Debug for IdentityHashMap<K, V, E>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> IdentityHashMap<K, V> {
    /// Creates an empty identity map with room for 21 entries before it
    /// first grows.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ident_hash::IdentityHashMap;
    ///
    /// let map: IdentityHashMap<&String, u32> = IdentityHashMap::new();
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), 32);
    /// ```
    pub fn new() -> Self {
        Self::with_equivalence(ByIdentity)
    }

    /// Creates an empty identity map that holds `expected` entries without
    /// growing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ident_hash::IdentityHashMap;
    ///
    /// let map: IdentityHashMap<&u64, u64> = IdentityHashMap::with_expected_size(100);
    /// assert_eq!(map.capacity(), 256);
    /// ```
    pub fn with_expected_size(expected: usize) -> Self {
        Self::with_parts(expected, Config::new(), ByIdentity)
    }

    /// Like [`with_expected_size`](Self::with_expected_size), for callers
    /// holding a signed size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `expected` is negative.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ident_hash::Error;
    /// use ident_hash::IdentityHashMap;
    ///
    /// assert!(IdentityHashMap::<&u8, u8>::try_with_expected_size(10).is_ok());
    /// assert!(matches!(
    ///     IdentityHashMap::<&u8, u8>::try_with_expected_size(-1),
    ///     Err(Error::InvalidArgument(_))
    /// ));
    /// ```
    pub fn try_with_expected_size(expected: isize) -> Result<Self, Error> {
        let expected = usize::try_from(expected)
            .map_err(|_| Error::InvalidArgument("expected size must not be negative"))?;
        Ok(Self::with_expected_size(expected))
    }

    /// Creates an empty identity map with the given configuration.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ident_hash::Config;
    /// use ident_hash::IdentityHashMap;
    /// use ident_hash::InsertPolicy;
    ///
    /// let config = Config::new().with_policy(InsertPolicy::Linear);
    /// let map: IdentityHashMap<&u8, u8> = IdentityHashMap::with_config(config);
    /// assert_eq!(map.config().policy(), InsertPolicy::Linear);
    /// ```
    pub fn with_config(config: Config) -> Self {
        Self::with_table(RawTable::new(config), ByIdentity)
    }

    /// Creates an empty identity map with the given configuration that holds
    /// `expected` entries without growing.
    pub fn with_expected_size_and_config(expected: usize, config: Config) -> Self {
        Self::with_parts(expected, config, ByIdentity)
    }
}

impl<K, V> Default for IdentityHashMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, E> IdentityHashMap<K, V, E> {
    /// Creates an empty map that compares keys with `equivalence`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ident_hash::IdentityHashMap;
    /// use ident_hash::equivalence::ByValue;
    ///
    /// let mut map = IdentityHashMap::with_equivalence(ByValue::new());
    /// map.insert(String::from("a"), 1);
    /// map.insert(String::from("a"), 2);
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn with_equivalence(equivalence: E) -> Self {
        Self::with_table(RawTable::new(Config::new()), equivalence)
    }

    /// Creates an empty map from all of its parts.
    pub fn with_parts(expected: usize, config: Config, equivalence: E) -> Self {
        Self::with_table(RawTable::with_expected_size(expected, config), equivalence)
    }

    fn with_table(table: RawTable<K, V>, equivalence: E) -> Self {
        Self { table, equivalence }
    }

    /// Returns the number of entries in the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ident_hash::IdentityHashMap;
    ///
    /// let key = 1u8;
    /// let mut map = IdentityHashMap::new();
    /// assert_eq!(map.len(), 0);
    /// map.insert(&key, "a");
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of slots in the table. The map holds at most 2/3 of
    /// this many entries before it grows.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the map's configuration.
    pub fn config(&self) -> &Config {
        self.table.config()
    }

    /// Returns the strategy used to compare keys and values.
    pub fn equivalence(&self) -> &E {
        &self.equivalence
    }

    pub(crate) fn table(&self) -> &RawTable<K, V> {
        &self.table
    }

    pub(crate) fn table_mut(&mut self) -> &mut RawTable<K, V> {
        &mut self.table
    }

    pub(crate) fn table_and_equivalence_mut(&mut self) -> (&mut RawTable<K, V>, &E) {
        (&mut self.table, &self.equivalence)
    }

    /// Removes every entry. The table keeps its size.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ident_hash::IdentityHashMap;
    ///
    /// let (a, b) = (1u8, 2u8);
    /// let mut map = IdentityHashMap::new();
    /// map.insert(&a, "a");
    /// map.insert(&b, "b");
    ///
    /// let capacity = map.capacity();
    /// map.clear();
    /// assert!(map.is_empty());
    /// assert!(!map.contains_key(&&a));
    /// assert_eq!(map.capacity(), capacity);
    /// ```
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Keeps only the entries for which `f` returns `true`. Each entry is
    /// offered to `f` exactly once.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ident_hash::IdentityHashMap;
    ///
    /// let keys: Vec<u32> = (0..8).collect();
    /// let mut map: IdentityHashMap<&u32, u32> = keys.iter().map(|k| (k, *k)).collect();
    /// map.retain(|_, v| *v % 2 == 0);
    /// assert_eq!(map.len(), 4);
    /// ```
    pub fn retain(&mut self, f: impl FnMut(&K, &mut V) -> bool) {
        self.table.retain(f);
    }

    /// Replaces every value with the result of `f` on its entry.
    ///
    /// This is not a structural change: outstanding cursors stay valid.
    pub fn replace_all(&mut self, mut f: impl FnMut(&K, &V) -> V) {
        for (key, value) in self.table.iter_mut() {
            *value = f(key, value);
        }
    }

    /// Returns an iterator over the entries in table order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ident_hash::IdentityHashMap;
    ///
    /// let (a, b) = (1u8, 2u8);
    /// let mut map = IdentityHashMap::new();
    /// map.insert(&a, 10u32);
    /// map.insert(&b, 20u32);
    ///
    /// let mut values: Vec<_> = map.iter().map(|(k, v)| **k as u32 + v).collect();
    /// values.sort_unstable();
    /// assert_eq!(values, vec![11, 22]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the entries in table order, with mutable
    /// values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            inner: self.table.iter_mut(),
        }
    }

    /// Returns an iterator over the keys in table order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values in table order.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Returns an iterator over mutable references to the values.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Removes every entry, yielding them in table order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ident_hash::IdentityHashMap;
    ///
    /// let key = 1u8;
    /// let mut map = IdentityHashMap::new();
    /// map.insert(&key, "a");
    ///
    /// let drained: Vec<_> = map.drain().collect();
    /// assert_eq!(drained, vec![(&key, "a")]);
    /// assert!(map.is_empty());
    /// ```
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        Drain {
            inner: self.table.drain(),
        }
    }

    /// Returns a detached, fail-fast cursor positioned before the first entry.
    ///
    /// Unlike [`iter`](Self::iter), a cursor does not borrow the map, so the
    /// map can be modified between steps. The cursor reports
    /// [`Error::ConcurrentModification`] if that happens through any path
    /// other than the cursor itself.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ident_hash::IdentityHashMap;
    ///
    /// let keys = [1u8, 2, 3];
    /// let mut map: IdentityHashMap<&u8, u8> = keys.iter().map(|k| (k, *k)).collect();
    ///
    /// let mut cursor = map.cursor();
    /// while let Some((_, value)) = cursor.next(&map).unwrap() {
    ///     if *value == 2 {
    ///         cursor.remove(&mut map).unwrap();
    ///     }
    /// }
    /// assert_eq!(map.len(), 2);
    /// ```
    pub fn cursor(&self) -> Cursor<K> {
        Cursor::new(self.table.mod_count())
    }

    /// Returns a set view of the keys.
    pub fn key_set(&self) -> KeySet<&Self> {
        KeySet::new(self)
    }

    /// Returns a set view of the keys that can remove entries.
    pub fn key_set_mut(&mut self) -> KeySet<&mut Self> {
        KeySet::new(self)
    }

    /// Returns a collection view of the values.
    pub fn values_view(&self) -> ValuesView<&Self> {
        ValuesView::new(self)
    }

    /// Returns a collection view of the values that can remove entries.
    pub fn values_view_mut(&mut self) -> ValuesView<&mut Self> {
        ValuesView::new(self)
    }

    /// Returns a set view of the entries.
    pub fn entry_set(&self) -> EntrySet<&Self> {
        EntrySet::new(self)
    }

    /// Returns a set view of the entries that can remove entries.
    pub fn entry_set_mut(&mut self) -> EntrySet<&mut Self> {
        EntrySet::new(self)
    }

    /// Returns how many entries sit each number of slots past their preferred
    /// slot.
    ///
    /// Available with the `stats` feature.
    #[cfg(feature = "stats")]
    pub fn probe_histogram(&self) -> alloc::vec::Vec<usize> {
        self.table.probe_histogram()
    }

    /// Returns the number of slots the worst successful lookup inspects.
    ///
    /// Available with the `stats` feature.
    #[cfg(feature = "stats")]
    pub fn max_probe_length(&self) -> usize {
        self.table.max_probe_length()
    }

    /// Returns occupied slots divided by total slots.
    ///
    /// Available with the `stats` feature.
    #[cfg(feature = "stats")]
    pub fn load_factor(&self) -> f64 {
        self.table.load_factor()
    }

    /// Collects probe-length statistics by walking the table.
    ///
    /// Available with the `stats` feature.
    #[cfg(feature = "stats")]
    pub fn debug_stats(&self) -> hash_table::DebugStats {
        self.table.debug_stats()
    }
}

impl<K, V, E> IdentityHashMap<K, V, E>
where
    E: Equivalence<K>,
{
    #[inline]
    fn find_index(&self, key: &K) -> Option<usize> {
        let hash = self.equivalence.hash(key);
        self.table.find_index(hash, |k| self.equivalence.equivalent(k, key))
    }

    /// Returns a reference to the value mapped to `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ident_hash::IdentityHashMap;
    ///
    /// let a = String::from("node");
    /// let b = String::from("node");
    ///
    /// let mut map = IdentityHashMap::new();
    /// map.insert(&a, 1);
    /// assert_eq!(map.get(&&a), Some(&1));
    /// assert_eq!(map.get(&&b), None);
    /// ```
    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// Returns the stored key and its value.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        let bucket = self.table.occupied(self.find_index(key)?);
        Some((&bucket.key, &bucket.value))
    }

    /// Returns a mutable reference to the value mapped to `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ident_hash::IdentityHashMap;
    ///
    /// let key = 1u8;
    /// let mut map = IdentityHashMap::new();
    /// map.insert(&key, 10);
    /// if let Some(value) = map.get_mut(&&key) {
    ///     *value += 1;
    /// }
    /// assert_eq!(map.get(&&key), Some(&11));
    /// ```
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let i = self.find_index(key)?;
        Some(&mut self.table.occupied_mut(i).value)
    }

    /// Returns `true` if the map holds `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.find_index(key).is_some()
    }

    /// Maps `key` to `value`, returning the value previously mapped to the
    /// same key.
    ///
    /// When the key is already present its stored key is kept and only the
    /// value is replaced; that is not a structural modification.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExhausted`] if the key is new and the table is
    /// full at its maximum capacity. The map is unchanged in that case.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<Option<V>, Error> {
        let hash = self.equivalence.hash(&key);
        if let Some((_, current)) = self
            .table
            .find_mut(hash, |k| self.equivalence.equivalent(k, &key))
        {
            return Ok(Some(core::mem::replace(current, value)));
        }

        self.table.insert_unique_index(hash, key, value)?;
        Ok(None)
    }

    /// Maps `key` to `value`, returning the value previously mapped to the
    /// same key.
    ///
    /// # Panics
    ///
    /// Panics if the key is new and the table is full at its maximum
    /// capacity. Use [`try_insert`](Self::try_insert) to handle that case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ident_hash::IdentityHashMap;
    ///
    /// let a = String::from("node");
    /// let b = String::from("node");
    ///
    /// let mut map = IdentityHashMap::new();
    /// assert_eq!(map.insert(&a, 1), None);
    /// assert_eq!(map.insert(&b, 2), None);
    /// assert_eq!(map.insert(&a, 3), Some(1));
    /// assert_eq!(map.len(), 2);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.try_insert(key, value) {
            Ok(previous) => previous,
            Err(error) => panic!("{error}"),
        }
    }

    /// Removes `key`, returning its value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ident_hash::IdentityHashMap;
    ///
    /// let key = 1u8;
    /// let mut map = IdentityHashMap::new();
    /// map.insert(&key, "a");
    /// assert_eq!(map.remove(&&key), Some("a"));
    /// assert_eq!(map.remove(&&key), None);
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes `key`, returning the stored key and its value.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let i = self.find_index(key)?;
        let bucket = self.table.remove_at(i)?;
        Some((bucket.key, bucket.value))
    }

    /// Returns the entry for `key`, for in-place manipulation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ident_hash::IdentityHashMap;
    ///
    /// let words = [String::from("a"), String::from("b")];
    /// let mut counts = IdentityHashMap::new();
    /// for word in words.iter().chain(words.iter().take(1)) {
    ///     *counts.entry(word).or_insert(0) += 1;
    /// }
    /// assert_eq!(counts.get(&&words[0]), Some(&2));
    /// assert_eq!(counts.get(&&words[1]), Some(&1));
    /// ```
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V> {
        let hash = self.equivalence.hash(&key);
        match self
            .table
            .find_index(hash, |k| self.equivalence.equivalent(k, &key))
        {
            Some(index) => Entry::Occupied(OccupiedEntry {
                table: &mut self.table,
                index,
            }),
            None => Entry::Vacant(VacantEntry {
                table: &mut self.table,
                hash,
                key,
            }),
        }
    }

    /// Inserts every entry of `entries`.
    ///
    /// If the iterator reports a lower size bound larger than the map, the
    /// table is first grown to hold that many entries. The bound alone is used
    /// because incoming keys may already be present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExhausted`] if the table fills up at its
    /// maximum capacity. Entries inserted before the failure stay in the map.
    pub fn try_put_all<I>(&mut self, entries: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let entries = entries.into_iter();
        let (additional, _) = entries.size_hint();
        if additional > self.len() {
            let capacity = capacity_for(additional, self.table.config().max_capacity());
            self.table.grow(capacity)?;
        }

        for (key, value) in entries {
            self.try_insert(key, value)?;
        }
        Ok(())
    }

    /// Grows the table so that `additional` more entries fit without a
    /// further resize.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExhausted`] if growth was needed but the table
    /// is already full at its maximum capacity.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), Error> {
        self.table.reserve(additional)
    }
}

impl<K, V, E> IdentityHashMap<K, V, E>
where
    E: Equivalence<V>,
{
    /// Returns `true` if some key maps to `value`. This scans the whole
    /// table.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ident_hash::IdentityHashMap;
    ///
    /// let (key, value, twin) = (1u8, String::from("v"), String::from("v"));
    /// let mut map = IdentityHashMap::new();
    /// map.insert(&key, &value);
    /// assert!(map.contains_value(&&value));
    /// assert!(!map.contains_value(&&twin));
    /// ```
    pub fn contains_value(&self, value: &V) -> bool {
        self.values().any(|v| self.equivalence.equivalent(v, value))
    }

    /// Returns the wrapping sum, over all entries, of the key's hash XOR the
    /// value's hash.
    ///
    /// Maps that compare equal have equal content hashes as long as they hash
    /// keys the same way, which always holds for [`ByIdentity`].
    pub fn content_hash(&self) -> u32 {
        self.table
            .slots()
            .iter()
            .flatten()
            .fold(0u32, |sum, bucket| {
                sum.wrapping_add(bucket.hash ^ self.equivalence.hash(&bucket.value))
            })
    }
}

impl<K, V, E> IdentityHashMap<K, V, E>
where
    E: Equivalence<K> + Equivalence<V>,
{
    fn find_mapping(&self, key: &K, value: &V) -> Option<usize> {
        let i = self.find_index(key)?;
        let current = &self.table.occupied(i).value;
        <E as Equivalence<V>>::equivalent(&self.equivalence, current, value).then_some(i)
    }

    /// Removes `key` only if it currently maps to `value`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ident_hash::IdentityHashMap;
    ///
    /// let (key, one, two) = (0u8, 1u8, 2u8);
    /// let mut map = IdentityHashMap::new();
    /// map.insert(&key, &one);
    /// assert!(!map.remove_mapping(&&key, &&two));
    /// assert!(map.remove_mapping(&&key, &&one));
    /// assert!(map.is_empty());
    /// ```
    pub fn remove_mapping(&mut self, key: &K, value: &V) -> bool {
        match self.find_mapping(key, value) {
            Some(i) => self.table.remove_at(i).is_some(),
            None => false,
        }
    }

    /// Maps `key` to `new` only if it currently maps to `current`.
    pub fn replace_mapping(&mut self, key: &K, current: &V, new: V) -> bool {
        match self.find_mapping(key, current) {
            Some(i) => {
                self.table.occupied_mut(i).value = new;
                true
            }
            None => false,
        }
    }
}

impl<K, V, E> PartialEq for IdentityHashMap<K, V, E>
where
    E: Equivalence<K> + Equivalence<V>,
{
    /// Two maps are equal when they have the same size and every mapping of
    /// one is present in the other.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.iter().all(|(key, value)| {
                other
                    .get(key)
                    .is_some_and(|v| <E as Equivalence<V>>::equivalent(&self.equivalence, v, value))
            })
    }
}

impl<K, V, E> Eq for IdentityHashMap<K, V, E> where E: Equivalence<K> + Equivalence<V> {}

/// Compares against an ordinary `HashMap` by looking up each of its entries
/// here, under this map's strategy.
///
/// The comparison is not symmetric: the `HashMap` itself compares keys by
/// value, so it may consider two maps equal that this map does not, and the
/// reverse comparison is not provided.
#[cfg(feature = "std")]
impl<K, V, E, S> PartialEq<std::collections::HashMap<K, V, S>> for IdentityHashMap<K, V, E>
where
    E: Equivalence<K> + Equivalence<V>,
{
    fn eq(&self, other: &std::collections::HashMap<K, V, S>) -> bool {
        self.len() == other.len()
            && other.iter().all(|(key, value)| {
                self.get(key)
                    .is_some_and(|v| <E as Equivalence<V>>::equivalent(&self.equivalence, v, value))
            })
    }
}

impl<K, V, E> Hash for IdentityHashMap<K, V, E>
where
    E: Equivalence<K> + Equivalence<V>,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.content_hash());
    }
}

impl<K, V, E> Extend<(K, V)> for IdentityHashMap<K, V, E>
where
    E: Equivalence<K>,
{
    /// # Panics
    ///
    /// Panics if the table fills up at its maximum capacity. Use
    /// [`try_put_all`](IdentityHashMap::try_put_all) to handle that case.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        if let Err(error) = self.try_put_all(iter) {
            panic!("{error}");
        }
    }
}

impl<K, V, E> FromIterator<(K, V)> for IdentityHashMap<K, V, E>
where
    E: Equivalence<K> + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::with_equivalence(E::default());
        map.extend(iter);
        map
    }
}

impl<K, V, E> IntoIterator for IdentityHashMap<K, V, E> {
    type IntoIter = IntoIter<K, V>;
    type Item = (K, V);

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, K, V, E> IntoIterator for &'a IdentityHashMap<K, V, E> {
    type IntoIter = Iter<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, E> IntoIterator for &'a mut IdentityHashMap<K, V, E> {
    type IntoIter = IterMut<'a, K, V>;
    type Item = (&'a K, &'a mut V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// A view into a single entry in the map, which may either be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`IdentityHashMap`].
///
/// [`entry`]: IdentityHashMap::entry
pub enum Entry<'a, K, V> {
    /// A vacant entry.
    Vacant(VacantEntry<'a, K, V>),
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, K, V>),
}

impl<'a, K, V> Entry<'a, K, V> {
    /// Inserts a default value if the entry is vacant and returns a mutable
    /// reference.
    ///
    /// # Panics
    ///
    /// Panics if the table is full at its maximum capacity.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts a value computed from a closure if the entry is vacant and
    /// returns a mutable reference.
    pub fn or_insert_with<F>(self, default: F) -> &'a mut V
    where
        F: FnOnce() -> V,
    {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Provides in-place mutable access to an occupied entry before any
    /// potential inserts.
    pub fn and_modify<F>(self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }

    /// Returns a reference to this entry's key.
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }
}

impl<'a, K, V> Entry<'a, K, V>
where
    V: Default,
{
    /// Inserts the default value if the entry is vacant and returns a mutable
    /// reference.
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with(Default::default)
    }
}

/// A view into a vacant entry in the map.
pub struct VacantEntry<'a, K, V> {
    table: &'a mut RawTable<K, V>,
    hash: u32,
    key: K,
}

impl<'a, K, V> VacantEntry<'a, K, V> {
    /// Gets a reference to the key that would be used when inserting a value.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Take ownership of the key.
    pub fn into_key(self) -> K {
        self.key
    }

    /// Inserts the value into the map and returns a mutable reference to it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExhausted`] if the table is full at its
    /// maximum capacity.
    pub fn try_insert(self, value: V) -> Result<&'a mut V, Error> {
        let i = self.table.insert_unique_index(self.hash, self.key, value)?;
        Ok(&mut self.table.occupied_mut(i).value)
    }

    /// Inserts the value into the map and returns a mutable reference to it.
    ///
    /// # Panics
    ///
    /// Panics if the table is full at its maximum capacity.
    pub fn insert(self, value: V) -> &'a mut V {
        match self.try_insert(value) {
            Ok(value) => value,
            Err(error) => panic!("{error}"),
        }
    }
}

/// A view into an occupied entry in the map.
pub struct OccupiedEntry<'a, K, V> {
    table: &'a mut RawTable<K, V>,
    index: usize,
}

impl<'a, K, V> OccupiedEntry<'a, K, V> {
    /// Gets a reference to the key in the entry.
    pub fn key(&self) -> &K {
        &self.table.occupied(self.index).key
    }

    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        &self.table.occupied(self.index).value
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.table.occupied_mut(self.index).value
    }

    /// Converts the entry into a mutable reference to the value.
    pub fn into_mut(self) -> &'a mut V {
        &mut self.table.occupied_mut(self.index).value
    }

    /// Inserts a value into the entry and returns the old value.
    pub fn insert(&mut self, value: V) -> V {
        core::mem::replace(self.get_mut(), value)
    }

    /// Removes the entry from the map and returns the value.
    pub fn remove(self) -> V {
        self.remove_entry().1
    }

    /// Removes the entry from the map and returns the key and value.
    pub fn remove_entry(self) -> (K, V) {
        match self.table.remove_at(self.index) {
            Some(bucket) => (bucket.key, bucket.value),
            None => unreachable!("occupied entry at empty slot {}", self.index),
        }
    }
}

/// An iterator over the entries of an [`IdentityHashMap`].
///
/// This struct is created by the [`iter`] method on [`IdentityHashMap`].
///
/// [`iter`]: IdentityHashMap::iter
pub struct Iter<'a, K, V> {
    inner: hash_table::Iter<'a, K, V>,
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// A mutable iterator over the entries of an [`IdentityHashMap`].
pub struct IterMut<'a, K, V> {
    inner: hash_table::IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

impl<K, V> FusedIterator for IterMut<'_, K, V> {}

/// An iterator over the keys of an [`IdentityHashMap`].
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// An iterator over the values of an [`IdentityHashMap`].
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V> FusedIterator for Values<'_, K, V> {}

/// A mutable iterator over the values of an [`IdentityHashMap`].
pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}

impl<K, V> FusedIterator for ValuesMut<'_, K, V> {}

/// An owning iterator over the entries of an [`IdentityHashMap`].
pub struct IntoIter<K, V> {
    inner: hash_table::IntoIter<K, V>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}

/// A draining iterator over the entries of an [`IdentityHashMap`].
pub struct Drain<'a, K, V> {
    inner: hash_table::Drain<'a, K, V>,
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
