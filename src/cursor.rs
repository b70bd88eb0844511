//! Detached traversal that tolerates its own removals.
//!
//! The borrowing iterators on [`IdentityHashMap`] cannot observe a modified
//! map: the borrow checker rules it out. A [`Cursor`] holds no borrow, so the
//! map can change between steps. Each step checks the map's modification
//! counter and fails with [`Error::ConcurrentModification`] when the map was
//! changed by anything other than the cursor itself.

use alloc::vec::Vec;

use crate::Error;
use crate::IdentityHashMap;
use crate::equivalence::Equivalence;

type Suffix<K> = Vec<Option<(u32, K)>>;

/// A fail-fast position in an [`IdentityHashMap`], created by
/// [`IdentityHashMap::cursor`].
///
/// The cursor walks the table in slot order. Removing the current entry
/// through [`remove`](Cursor::remove) closes the gap it leaves, which may pull
/// a later entry back into the removed slot; the cursor steps back to revisit
/// it. Near the end of the table gap closing can also pull an entry that sat
/// past the wrap-around, and was therefore already visited, into a slot not
/// yet visited. When that happens the cursor switches to a private copy of
/// the rest of the table, so no entry is yielded twice and none is skipped.
/// Entries reached through the copy are still looked up in the live map.
///
/// Fail-fast detection is best-effort. It surfaces bugs; it is not a
/// synchronization mechanism.
#[derive(Debug, Clone)]
pub struct Cursor<K> {
    index: usize,
    expected_mod_count: u64,
    last_returned: Option<usize>,
    traversal: Option<Suffix<K>>,
}

fn first_occupied<T>(slots: &[Option<T>], from: usize) -> Option<(usize, &T)> {
    slots
        .iter()
        .enumerate()
        .skip(from)
        .find_map(|(i, slot)| Some((i, slot.as_ref()?)))
}

impl<K> Cursor<K> {
    pub(crate) fn new(mod_count: u64) -> Self {
        Self {
            index: 0,
            expected_mod_count: mod_count,
            last_returned: None,
            traversal: None,
        }
    }

    /// Returns `true` once a removal has switched the cursor onto its private
    /// copy of the table's tail.
    pub fn is_traversing_copy(&self) -> bool {
        self.traversal.is_some()
    }

    fn check<V, E>(&self, map: &IdentityHashMap<K, V, E>) -> Result<(), Error> {
        if map.table().mod_count() == self.expected_mod_count {
            Ok(())
        } else {
            Err(Error::ConcurrentModification)
        }
    }

    /// Returns `true` if [`next`](Cursor::next) would yield another entry.
    pub fn has_next<V, E>(&self, map: &IdentityHashMap<K, V, E>) -> bool {
        match &self.traversal {
            None => first_occupied(map.table().slots(), self.index).is_some(),
            Some(copy) => first_occupied(copy, self.index).is_some(),
        }
    }

    /// Advances to the next entry and returns it, or `None` at the end.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConcurrentModification`] if the map was structurally
    /// modified since the cursor was created or last removed an entry.
    pub fn next<'m, V, E>(
        &mut self,
        map: &'m IdentityHashMap<K, V, E>,
    ) -> Result<Option<(&'m K, &'m V)>, Error>
    where
        E: Equivalence<K>,
    {
        self.check(map)?;

        let table = map.table();
        let found = match &self.traversal {
            None => first_occupied(table.slots(), self.index).map(|(i, _)| (i, i)),
            Some(copy) => match first_occupied(copy, self.index) {
                Some((i, (hash, key))) => {
                    let live = table
                        .find_index(*hash, |k| map.equivalence().equivalent(k, key))
                        .ok_or(Error::ConcurrentModification)?;
                    Some((i, live))
                }
                None => None,
            },
        };

        let Some((position, live)) = found else {
            return Ok(None);
        };

        self.last_returned = Some(position);
        self.index = position + 1;
        let bucket = table.occupied(live);
        Ok(Some((&bucket.key, &bucket.value)))
    }

    /// Removes the entry most recently returned by [`next`](Cursor::next).
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalIteratorState`] if `next` has not returned an
    /// entry since the cursor was created or last removed one, and
    /// [`Error::ConcurrentModification`] if the map was structurally modified
    /// behind the cursor's back.
    pub fn remove<V, E>(&mut self, map: &mut IdentityHashMap<K, V, E>) -> Result<(K, V), Error>
    where
        K: Clone,
        E: Equivalence<K>,
    {
        let Some(deleted) = self.last_returned else {
            return Err(Error::IllegalIteratorState("no current entry to remove"));
        };
        self.check(map)?;
        self.last_returned = None;
        self.index = deleted;

        let (table, equivalence) = map.table_and_equivalence_mut();

        if let Some(copy) = &mut self.traversal {
            let (hash, key) = copy
                .get_mut(deleted)
                .and_then(Option::take)
                .ok_or(Error::IllegalIteratorState("entry already removed"))?;
            let removed = table
                .remove(hash, |k| equivalence.equivalent(k, &key))
                .ok_or(Error::ConcurrentModification)?;
            self.expected_mod_count = table.mod_count();
            return Ok(removed);
        }

        let mut copied: Option<Suffix<K>> = None;
        let bucket = table
            .remove_at_with(deleted, |slots, from, to| {
                if from < deleted && to >= deleted && copied.is_none() {
                    let suffix = slots[deleted..]
                        .iter()
                        .map(|slot| slot.as_ref().map(|b| (b.hash, b.key.clone())))
                        .collect();
                    copied = Some(suffix);
                }
            })
            .ok_or(Error::ConcurrentModification)?;

        if let Some(copy) = copied {
            tracing::trace!(
                removed_slot = deleted,
                remaining = copy.len(),
                "cursor switched to a copy of the table tail"
            );
            self.traversal = Some(copy);
            self.index = 0;
        }

        self.expected_mod_count = table.mod_count();
        Ok((bucket.key, bucket.value))
    }

    /// Replaces the value of the entry most recently returned by
    /// [`next`](Cursor::next), returning the old value.
    ///
    /// Replacing a value is not a structural modification, so the cursor and
    /// any other cursor over the map remain valid.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalIteratorState`] if there is no current entry,
    /// and [`Error::ConcurrentModification`] if the map was structurally
    /// modified behind the cursor's back.
    pub fn replace_value<V, E>(
        &mut self,
        map: &mut IdentityHashMap<K, V, E>,
        value: V,
    ) -> Result<V, Error>
    where
        E: Equivalence<K>,
    {
        let Some(current) = self.last_returned else {
            return Err(Error::IllegalIteratorState("no current entry to update"));
        };
        self.check(map)?;

        let (table, equivalence) = map.table_and_equivalence_mut();
        let slot = match &self.traversal {
            None => current,
            Some(copy) => {
                let (hash, key) = copy
                    .get(current)
                    .and_then(Option::as_ref)
                    .ok_or(Error::IllegalIteratorState("no current entry to update"))?;
                table
                    .find_index(*hash, |k| equivalence.equivalent(k, key))
                    .ok_or(Error::ConcurrentModification)?
            }
        };

        let bucket = table
            .bucket_mut(slot)
            .ok_or(Error::ConcurrentModification)?;
        Ok(core::mem::replace(&mut bucket.value, value))
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use rand::Rng;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::Config;
    use crate::InsertPolicy;
    use crate::testing::Pinned;
    use crate::testing::PinnedHash;
    use crate::testing::pinned;

    fn small_map(policy: InsertPolicy) -> IdentityHashMap<Pinned, u32, PinnedHash> {
        let map = IdentityHashMap::with_parts(3, Config::new().with_policy(policy), PinnedHash);
        assert_eq!(map.capacity(), 8);
        map
    }

    fn drain_ids(
        cursor: &mut Cursor<Pinned>,
        map: &IdentityHashMap<Pinned, u32, PinnedHash>,
    ) -> Vec<u32> {
        let mut ids = Vec::new();
        while let Some((key, _)) = cursor.next(map).unwrap() {
            ids.push(key.id);
        }
        ids
    }

    #[test]
    fn visits_every_entry_once() {
        let keys: Vec<u64> = (0..100).collect();
        let map: IdentityHashMap<&u64, u64> = keys.iter().map(|k| (k, *k)).collect();

        let mut cursor = map.cursor();
        let mut seen = vec![0; 100];
        assert!(cursor.has_next(&map));
        while let Some((key, value)) = cursor.next(&map).unwrap() {
            assert_eq!(*key, value);
            seen[**key as usize] += 1;
        }
        assert!(seen.iter().all(|&n| n == 1));
        assert!(!cursor.has_next(&map));
        assert_eq!(cursor.next(&map), Ok(None));
    }

    #[test]
    fn fails_fast_after_outside_insert() {
        let mut map = small_map(InsertPolicy::RobinHood);
        map.insert(pinned(1, 1), 1);
        map.insert(pinned(2, 2), 2);

        let mut cursor = map.cursor();
        assert!(cursor.next(&map).unwrap().is_some());

        map.insert(pinned(3, 3), 3);
        assert_eq!(cursor.next(&map), Err(Error::ConcurrentModification));
        assert_eq!(cursor.remove(&mut map), Err(Error::ConcurrentModification));
    }

    #[test]
    fn value_replacement_is_not_structural() {
        let mut map = small_map(InsertPolicy::RobinHood);
        map.insert(pinned(1, 1), 1);
        map.insert(pinned(2, 2), 2);

        let mut cursor = map.cursor();
        cursor.next(&map).unwrap();
        map.insert(pinned(2, 2), 20);
        *map.get_mut(&pinned(1, 1)).unwrap() = 10;

        let (key, value) = cursor.next(&map).unwrap().unwrap();
        assert_eq!(*value, key.id * 10);
    }

    #[test]
    fn remove_needs_a_current_entry() {
        let mut map = small_map(InsertPolicy::Linear);
        map.insert(pinned(1, 1), 1);
        map.insert(pinned(2, 2), 2);

        let mut cursor = map.cursor();
        assert!(matches!(
            cursor.remove(&mut map),
            Err(Error::IllegalIteratorState(_))
        ));

        cursor.next(&map).unwrap();
        assert_eq!(cursor.remove(&mut map), Ok((pinned(1, 1), 1)));
        assert!(matches!(
            cursor.remove(&mut map),
            Err(Error::IllegalIteratorState(_))
        ));
        assert!(matches!(
            cursor.replace_value(&mut map, 5),
            Err(Error::IllegalIteratorState(_))
        ));

        // The cursor's own removal does not trip fail-fast detection.
        assert_eq!(cursor.next(&map).unwrap().map(|(k, _)| k.id), Some(2));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn removal_revisits_entry_pulled_into_gap() {
        let mut map = small_map(InsertPolicy::Linear);
        map.insert(pinned(2, 1), 1);
        map.insert(pinned(2, 2), 2);
        map.insert(pinned(2, 3), 3);

        let mut cursor = map.cursor();
        let mut ids = Vec::new();
        while let Some((key, _)) = cursor.next(&map).unwrap() {
            ids.push(key.id);
            if key.id == 1 {
                cursor.remove(&mut map).unwrap();
            }
        }

        assert_eq!(ids, vec![1, 2, 3]);
        assert!(!cursor.is_traversing_copy());
        assert_eq!(map.len(), 2);
        map.table().assert_invariants();
    }

    #[test]
    fn removal_across_wraparound_does_not_yield_twice() {
        for policy in [InsertPolicy::Linear, InsertPolicy::RobinHood] {
            let mut map = small_map(policy);
            // 1 sits in the last slot, 2 wraps to slot 0, 3 sits in slot 3.
            map.insert(pinned(7, 1), 1);
            map.insert(pinned(7, 2), 2);
            map.insert(pinned(3, 3), 3);
            assert_eq!(map.table().find_index(7, |k| k.id == 2), Some(0));

            let mut cursor = map.cursor();
            let mut ids = Vec::new();
            while let Some((key, _)) = cursor.next(&map).unwrap() {
                ids.push(key.id);
                if key.id == 1 {
                    // Gap closing pulls 2, already visited, into slot 7.
                    assert_eq!(cursor.remove(&mut map), Ok((pinned(7, 1), 1)));
                    assert!(cursor.is_traversing_copy());
                }
            }

            assert_eq!(ids, vec![2, 3, 1]);
            assert_eq!(map.len(), 2);
            assert_eq!(map.table().find_index(7, |k| k.id == 2), Some(7));
            map.table().assert_invariants();
        }
    }

    #[test]
    fn removals_from_copy_are_forwarded() {
        let mut map = small_map(InsertPolicy::Linear);
        map.insert(pinned(5, 1), 1);
        map.insert(pinned(6, 2), 2);
        map.insert(pinned(7, 3), 3);
        map.insert(pinned(6, 4), 4);
        // Slots: 4 at 0 (wrapped), 1 at 5, 2 at 6, 3 at 7.

        let mut cursor = map.cursor();
        let mut ids = Vec::new();
        while let Some((key, _)) = cursor.next(&map).unwrap() {
            let id = key.id;
            ids.push(id);
            match id {
                2 => {
                    cursor.remove(&mut map).unwrap();
                    assert!(cursor.is_traversing_copy());
                }
                3 => {
                    assert_eq!(cursor.replace_value(&mut map, 30), Ok(3));
                    assert_eq!(map.get(&pinned(7, 3)), Some(&30));
                    assert_eq!(cursor.remove(&mut map), Ok((pinned(7, 3), 30)));
                }
                _ => {}
            }
        }

        assert_eq!(ids, vec![4, 1, 2, 3]);
        assert_eq!(map.len(), 2);
        assert!(map.contains_key(&pinned(6, 4)));
        assert!(map.contains_key(&pinned(5, 1)));
        assert!(!cursor.has_next(&map));
        map.table().assert_invariants();
    }

    #[test]
    fn random_removal_yields_each_entry_once() {
        for seed in 0..20 {
            let mut rng = SmallRng::seed_from_u64(seed);
            for policy in [InsertPolicy::Linear, InsertPolicy::RobinHood] {
                let config = Config::new().with_policy(policy);
                let mut map = IdentityHashMap::with_parts(40, config, PinnedHash);
                assert_eq!(map.capacity(), 64);
                for id in 0..40 {
                    // Crowd the end of the table so runs wrap around.
                    map.insert(pinned(rng.random_range(44..64), id), id);
                }

                let mut seen = vec![0; 40];
                let mut removed = vec![false; 40];
                let mut cursor = map.cursor();
                while let Some((key, value)) = cursor.next(&map).unwrap() {
                    assert_eq!(key.id, *value);
                    let id = key.id as usize;
                    seen[id] += 1;
                    if rng.random_bool(0.5) {
                        cursor.remove(&mut map).unwrap();
                        removed[id] = true;
                    }
                }

                assert!(seen.iter().all(|&n| n == 1), "seed {seed}: {seen:?}");
                for id in 0..40u32 {
                    let present = map.keys().any(|k| k.id == id);
                    assert_eq!(present, !removed[id as usize]);
                }
                assert_eq!(map.len(), removed.iter().filter(|r| !**r).count());
                map.table().assert_invariants();
            }
        }
    }

    #[test]
    fn draining_through_cursor_empties_map() {
        let mut map = small_map(InsertPolicy::RobinHood);
        for (hash, id) in [(6, 1), (7, 2), (6, 3), (0, 4), (7, 5)] {
            map.insert(pinned(hash, id), id);
        }

        let mut cursor = map.cursor();
        let mut ids = drain_ids(&mut cursor.clone(), &map);
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);

        while cursor.next(&map).unwrap().is_some() {
            cursor.remove(&mut map).unwrap();
        }
        assert!(map.is_empty());
    }
}
