//! Collection views over an [`IdentityHashMap`].
//!
//! A view owns no data. It wraps a borrow of the map: a shared borrow for
//! reading, or a mutable one when the view should also remove entries.
//! Creating a view is free, so the map hands out a fresh one on every call.

use alloc::vec::Vec;
use core::iter::FusedIterator;
use core::ops::Deref;
use core::ops::DerefMut;

use crate::Error;
use crate::IdentityHashMap;
use crate::equivalence::Equivalence;
use crate::hash_map::Iter;
use crate::hash_map::Keys;
use crate::hash_map::Values;
use crate::hash_table::Slot;

fn collect_checked<T>(len: usize, items: impl Iterator<Item = T>) -> Result<Vec<T>, Error> {
    let mut out = Vec::with_capacity(len);
    out.extend(items);
    if out.len() != len {
        return Err(Error::ConcurrentModification);
    }
    Ok(out)
}

pub(crate) fn split_of<K, V, E>(map: &IdentityHashMap<K, V, E>) -> Split<'_, K, V> {
    Split {
        slots: map.table().slots(),
        estimate: map.len(),
    }
}

/// A set view of the keys of an [`IdentityHashMap`].
///
/// This struct is created by [`IdentityHashMap::key_set`] and
/// [`IdentityHashMap::key_set_mut`].
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
/// assert!(map.key_set().contains(&&a));
/// assert!(map.key_set_mut().remove(&&a));
/// assert_eq!(map.key_set().len(), 1);
/// ```
#[derive(Debug)]
pub struct KeySet<M> {
    map: M,
}

impl<M> KeySet<M> {
    pub(crate) fn new(map: M) -> Self {
        Self { map }
    }
}

impl<M, K, V, E> KeySet<M>
where
    M: Deref<Target = IdentityHashMap<K, V, E>>,
{
    /// Returns the number of keys.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if there are no keys.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns an iterator over the keys in table order.
    pub fn iter<'s>(&'s self) -> Keys<'s, K, V>
    where
        K: 's,
        V: 's,
        E: 's,
    {
        self.map.keys()
    }

    /// Returns `true` if the map holds `key`.
    pub fn contains(&self, key: &K) -> bool
    where
        E: Equivalence<K>,
    {
        self.map.contains_key(key)
    }

    /// Returns the wrapping sum of the keys' hashes.
    pub fn content_hash(&self) -> u32 {
        self.map
            .table()
            .slots()
            .iter()
            .flatten()
            .fold(0u32, |sum, bucket| sum.wrapping_add(bucket.hash))
    }

    /// Collects references to every key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConcurrentModification`] if the slot walk finds a
    /// different number of entries than the map's length. The view's borrow
    /// freezes the map, so this is a consistency assertion on the table
    /// rather than a detector of outside modification.
    pub fn to_vec<'s>(&'s self) -> Result<Vec<&'s K>, Error>
    where
        K: 's,
        V: 's,
        E: 's,
    {
        collect_checked(self.map.len(), self.map.keys())
    }

    /// Returns a splittable iterator over the map's entries.
    pub fn split<'s>(&'s self) -> Split<'s, K, V>
    where
        K: 's,
        V: 's,
        E: 's,
    {
        split_of(&*self.map)
    }
}

impl<M, K, V, E> KeySet<M>
where
    M: DerefMut<Target = IdentityHashMap<K, V, E>>,
{
    /// Removes `key` from the map, returning whether it was present.
    pub fn remove(&mut self, key: &K) -> bool
    where
        E: Equivalence<K>,
    {
        self.map.remove(key).is_some()
    }

    /// Removes every entry from the map.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Keeps only the entries whose key satisfies `f`.
    pub fn retain(&mut self, mut f: impl FnMut(&K) -> bool) {
        self.map.retain(|k, _| f(k));
    }
}

impl<'a, M, K, V, E> IntoIterator for &'a KeySet<M>
where
    M: Deref<Target = IdentityHashMap<K, V, E>>,
    K: 'a,
    V: 'a,
    E: 'a,
{
    type IntoIter = Keys<'a, K, V>;
    type Item = &'a K;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A collection view of the values of an [`IdentityHashMap`].
///
/// This struct is created by [`IdentityHashMap::values_view`] and
/// [`IdentityHashMap::values_view_mut`]. Values may repeat; removal takes the
/// first matching entry in table order.
#[derive(Debug)]
pub struct ValuesView<M> {
    map: M,
}

impl<M> ValuesView<M> {
    pub(crate) fn new(map: M) -> Self {
        Self { map }
    }
}

impl<M, K, V, E> ValuesView<M>
where
    M: Deref<Target = IdentityHashMap<K, V, E>>,
{
    /// Returns the number of values.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if there are no values.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns an iterator over the values in table order.
    pub fn iter<'s>(&'s self) -> Values<'s, K, V>
    where
        K: 's,
        V: 's,
        E: 's,
    {
        self.map.values()
    }

    /// Returns `true` if some key maps to `value`.
    pub fn contains(&self, value: &V) -> bool
    where
        E: Equivalence<V>,
    {
        self.map.contains_value(value)
    }

    /// Collects references to every value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConcurrentModification`] if the slot walk finds a
    /// different number of entries than the map's length. The view's borrow
    /// freezes the map, so this is a consistency assertion on the table
    /// rather than a detector of outside modification.
    pub fn to_vec<'s>(&'s self) -> Result<Vec<&'s V>, Error>
    where
        K: 's,
        V: 's,
        E: 's,
    {
        collect_checked(self.map.len(), self.map.values())
    }

    /// Returns a splittable iterator over the map's entries.
    pub fn split<'s>(&'s self) -> Split<'s, K, V>
    where
        K: 's,
        V: 's,
        E: 's,
    {
        split_of(&*self.map)
    }
}

impl<M, K, V, E> ValuesView<M>
where
    M: DerefMut<Target = IdentityHashMap<K, V, E>>,
{
    /// Removes the first entry, in table order, whose value is `value`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ident_hash::IdentityHashMap;
    ///
    /// let (a, b, shared) = (1u8, 2u8, String::from("v"));
    /// let mut map = IdentityHashMap::new();
    /// map.insert(&a, &shared);
    /// map.insert(&b, &shared);
    ///
    /// assert!(map.values_view_mut().remove(&&shared));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn remove(&mut self, value: &V) -> bool
    where
        E: Equivalence<V>,
    {
        let map = &mut *self.map;
        let found = map.table().slots().iter().position(|slot| {
            slot.as_ref()
                .is_some_and(|bucket| map.equivalence().equivalent(&bucket.value, value))
        });

        match found {
            Some(i) => map.table_mut().remove_at(i).is_some(),
            None => false,
        }
    }

    /// Removes every entry from the map.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Keeps only the entries whose value satisfies `f`.
    pub fn retain(&mut self, mut f: impl FnMut(&V) -> bool) {
        self.map.retain(|_, v| f(v));
    }
}

impl<'a, M, K, V, E> IntoIterator for &'a ValuesView<M>
where
    M: Deref<Target = IdentityHashMap<K, V, E>>,
    K: 'a,
    V: 'a,
    E: 'a,
{
    type IntoIter = Values<'a, K, V>;
    type Item = &'a V;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A set view of the entries of an [`IdentityHashMap`].
///
/// This struct is created by [`IdentityHashMap::entry_set`] and
/// [`IdentityHashMap::entry_set_mut`].
#[derive(Debug)]
pub struct EntrySet<M> {
    map: M,
}

impl<M> EntrySet<M> {
    pub(crate) fn new(map: M) -> Self {
        Self { map }
    }
}

impl<M, K, V, E> EntrySet<M>
where
    M: Deref<Target = IdentityHashMap<K, V, E>>,
{
    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns an iterator over the entries in table order.
    pub fn iter<'s>(&'s self) -> Iter<'s, K, V>
    where
        K: 's,
        V: 's,
        E: 's,
    {
        self.map.iter()
    }

    /// Returns `true` if `key` maps to `value`.
    pub fn contains(&self, key: &K, value: &V) -> bool
    where
        E: Equivalence<K> + Equivalence<V>,
    {
        self.map
            .get(key)
            .is_some_and(|v| <E as Equivalence<V>>::equivalent(self.map.equivalence(), v, value))
    }

    /// Returns the map's content hash.
    pub fn content_hash(&self) -> u32
    where
        E: Equivalence<V>,
    {
        self.map.content_hash()
    }

    /// Collects references to every entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConcurrentModification`] if the slot walk finds a
    /// different number of entries than the map's length. The view's borrow
    /// freezes the map, so this is a consistency assertion on the table
    /// rather than a detector of outside modification.
    pub fn to_vec<'s>(&'s self) -> Result<Vec<(&'s K, &'s V)>, Error>
    where
        K: 's,
        V: 's,
        E: 's,
    {
        collect_checked(self.map.len(), self.map.iter())
    }

    /// Returns a splittable iterator over the entries.
    pub fn split<'s>(&'s self) -> Split<'s, K, V>
    where
        K: 's,
        V: 's,
        E: 's,
    {
        split_of(&*self.map)
    }
}

impl<M, K, V, E> EntrySet<M>
where
    M: DerefMut<Target = IdentityHashMap<K, V, E>>,
{
    /// Removes the entry for `key` if it maps to `value`.
    pub fn remove(&mut self, key: &K, value: &V) -> bool
    where
        E: Equivalence<K> + Equivalence<V>,
    {
        self.map.remove_mapping(key, value)
    }

    /// Removes every entry from the map.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Keeps only the entries for which `f` returns `true`.
    pub fn retain(&mut self, mut f: impl FnMut(&K, &V) -> bool) {
        self.map.retain(|k, v| f(k, v));
    }
}

impl<'a, M, K, V, E> IntoIterator for &'a EntrySet<M>
where
    M: Deref<Target = IdentityHashMap<K, V, E>>,
    K: 'a,
    V: 'a,
    E: 'a,
{
    type IntoIter = Iter<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A splittable iterator over a contiguous range of table slots, for
/// divide-and-conquer traversal.
///
/// [`split`](Split::split) hands off the first half of the remaining range
/// and halves the size estimate of both parts.
///
/// # Examples
///
/// ```rust
/// use ident_hash::IdentityHashMap;
///
/// let keys: Vec<u32> = (0..100).collect();
/// let map: IdentityHashMap<&u32, u32> = keys.iter().map(|k| (k, *k)).collect();
///
/// let view = map.entry_set();
/// let mut back = view.split();
/// let front = back.split().unwrap();
/// assert_eq!(front.estimate(), 50);
/// assert_eq!(front.count() + back.count(), 100);
/// ```
pub struct Split<'a, K, V> {
    slots: &'a [Slot<K, V>],
    estimate: usize,
}

impl<K, V> Clone for Split<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots,
            estimate: self.estimate,
        }
    }
}

impl<'a, K, V> Split<'a, K, V> {
    /// Splits off the first half of the remaining slots, or returns `None`
    /// if fewer than two slots remain.
    pub fn split(&mut self) -> Option<Self> {
        if self.slots.len() < 2 {
            return None;
        }

        let (front, back) = self.slots.split_at(self.slots.len() / 2);
        self.slots = back;
        self.estimate >>= 1;
        Some(Self {
            slots: front,
            estimate: self.estimate,
        })
    }

    /// Returns the estimated number of entries left.
    pub fn estimate(&self) -> usize {
        self.estimate
    }

    /// Returns the number of slots left to scan.
    pub fn slots_remaining(&self) -> usize {
        self.slots.len()
    }
}

impl<'a, K, V> Iterator for Split<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((first, rest)) = self.slots.split_first() {
            self.slots = rest;
            if let Some(bucket) = first {
                return Some((&bucket.key, &bucket.value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.slots.len()))
    }
}

impl<K, V> FusedIterator for Split<'_, K, V> {}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;

    use super::*;

    #[test]
    fn key_set_reads_and_removes() {
        let keys: Vec<u64> = (0..10).collect();
        let mut map: IdentityHashMap<&u64, u64> = keys.iter().map(|k| (k, *k)).collect();

        let view = map.key_set();
        assert_eq!(view.len(), 10);
        assert!(view.contains(&&keys[3]));
        assert_eq!(view.iter().count(), 10);
        assert_eq!((&view).into_iter().count(), 10);
        assert_eq!(view.to_vec().unwrap().len(), 10);

        let expected = map
            .table()
            .slots()
            .iter()
            .flatten()
            .fold(0u32, |sum, b| sum.wrapping_add(b.hash));
        assert_eq!(map.key_set().content_hash(), expected);

        let mut view = map.key_set_mut();
        assert!(view.remove(&&keys[3]));
        assert!(!view.remove(&&keys[3]));
        view.retain(|k| **k < 5);
        assert_eq!(view.len(), 4);
        view.clear();
        assert!(map.is_empty());
    }

    #[test]
    fn values_view_matches_by_identity() {
        let keys: Vec<u64> = (0..3).collect();
        let shared = String::from("v");
        let twin = shared.clone();
        let other = String::from("w");

        let mut map = IdentityHashMap::new();
        map.insert(&keys[0], &shared);
        map.insert(&keys[1], &shared);
        map.insert(&keys[2], &other);

        let view = map.values_view();
        assert!(view.contains(&&shared));
        assert!(!view.contains(&&twin));
        assert_eq!(view.to_vec().unwrap().len(), 3);

        let mut view = map.values_view_mut();
        assert!(!view.remove(&&twin));
        assert!(view.remove(&&shared));
        assert_eq!(view.len(), 2);
        view.retain(|v| core::ptr::eq(*v, &other));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&&keys[2]), Some(&&other));
    }

    #[test]
    fn entry_set_checks_both_halves() {
        let keys: Vec<u64> = (0..2).collect();
        let values: Vec<u64> = (10..12).collect();
        let mut map: IdentityHashMap<&u64, &u64> = keys.iter().zip(values.iter()).collect();

        let view = map.entry_set();
        assert!(view.contains(&&keys[0], &&values[0]));
        assert!(!view.contains(&&keys[0], &&values[1]));
        assert_eq!(view.content_hash(), map.content_hash());
        assert_eq!(view.to_vec().unwrap().len(), 2);

        let mut view = map.entry_set_mut();
        assert!(!view.remove(&&keys[0], &&values[1]));
        assert!(view.remove(&&keys[0], &&values[0]));
        view.retain(|_, _| false);
        assert!(view.is_empty());
    }

    #[test]
    fn views_lend_for_their_own_borrow() {
        let keys: Vec<u64> = (0..6).collect();
        let mut map: IdentityHashMap<&u64, u64> = keys.iter().map(|k| (k, *k)).collect();

        let view = map.key_set_mut();
        let collected = view.to_vec().unwrap();
        assert_eq!((&view).into_iter().count(), 6);
        assert_eq!(view.split().count(), 6);
        assert_eq!(collected.len(), view.iter().count());
        assert!(keys.iter().all(|k| collected.iter().any(|c| core::ptr::eq(**c, k))));

        let view = map.values_view_mut();
        let total: u64 = (&view).into_iter().sum();
        assert_eq!(total, view.to_vec().unwrap().into_iter().sum::<u64>());
        assert_eq!(view.split().count(), 6);

        let mut view = map.entry_set_mut();
        let pairs = view.to_vec().unwrap();
        assert!(pairs.iter().all(|(k, v)| ***k == **v));
        assert_eq!((&view).into_iter().count(), view.iter().count());
        assert_eq!(view.split().estimate(), 6);
        view.retain(|k, _| **k % 2 == 0);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn collect_checked_asserts_length() {
        assert_eq!(collect_checked(3, [1, 2].into_iter()), Err(Error::ConcurrentModification));
        assert_eq!(collect_checked(2, [1, 2].into_iter()), Ok(vec![1, 2]));
    }

    #[test]
    fn split_covers_every_entry_once() {
        let keys: Vec<u64> = (0..500).collect();
        let map: IdentityHashMap<&u64, u64> = keys.iter().map(|k| (k, *k)).collect();

        let view = map.entry_set();
        let mut pending = vec![view.split()];
        let mut leaves = Vec::new();
        while let Some(mut split) = pending.pop() {
            if split.slots_remaining() > 16 {
                if let Some(front) = split.split() {
                    pending.push(front);
                }
                pending.push(split);
            } else {
                leaves.push(split);
            }
        }

        let total_slots: usize = leaves.iter().map(Split::slots_remaining).sum();
        assert_eq!(total_slots, map.capacity());

        let mut seen = vec![0; 500];
        for leaf in leaves {
            for (key, _) in leaf {
                seen[**key as usize] += 1;
            }
        }
        assert!(seen.iter().all(|&n| n == 1));
    }

    #[test]
    fn split_halves_estimate() {
        let keys: Vec<u64> = (0..8).collect();
        let map: IdentityHashMap<&u64, u64> = keys.iter().map(|k| (k, *k)).collect();
        let view = map.key_set();
        let mut split = view.split();
        assert_eq!(split.estimate(), 8);

        let front = split.split().unwrap();
        assert_eq!(front.estimate(), 4);
        assert_eq!(split.estimate(), 4);
        assert_eq!(front.slots_remaining() + split.slots_remaining(), map.capacity());
    }
}
