// IdentityHashMap property tests.
//
// Property 1: the map agrees with a per-object model after every operation.
//  - Objects: boxes that all hold the same value, so only identity separates them.
//  - Model: Vec<Option<u32>> indexed by object.
//  - Operations: insert, remove, get, retain, clear, replace_all.
//  - Invariant: len(), get() and a full iteration match the model; iteration
//    yields every key exactly once.
//
// Property 2: removing through a cursor visits every entry exactly once and
// leaves exactly the entries that were kept.
use std::collections::HashSet;

use ident_hash::Config;
use ident_hash::IdentityHashMap;
use ident_hash::InsertPolicy;
use proptest::prelude::*;

fn policy(robin_hood: bool) -> InsertPolicy {
    if robin_hood {
        InsertPolicy::RobinHood
    } else {
        InsertPolicy::Linear
    }
}

fn objects(count: usize) -> Vec<Box<u32>> {
    (0..count).map(|_| Box::new(7)).collect()
}

fn check_against_model(
    map: &IdentityHashMap<&u32, u32>,
    objects: &[Box<u32>],
    model: &[Option<u32>],
) -> Result<(), TestCaseError> {
    prop_assert_eq!(map.len(), model.iter().flatten().count());
    for (object, expected) in objects.iter().zip(model) {
        prop_assert_eq!(map.get(&&**object), expected.as_ref());
    }

    let mut seen = HashSet::new();
    for (key, value) in map.iter() {
        prop_assert!(seen.insert(*key as *const u32), "key yielded twice");
        let index = objects
            .iter()
            .position(|object| core::ptr::eq(&**object, *key))
            .ok_or_else(|| TestCaseError::fail("unknown key"))?;
        prop_assert_eq!(model[index], Some(*value));
    }
    Ok(())
}

proptest! {
    #[test]
    fn prop_identity_map_matches_model(
        robin_hood in any::<bool>(),
        count in 1usize..=64,
        ops in proptest::collection::vec((0u8..=9u8, 0usize..64usize, any::<u32>()), 1..200)
    ) {
        let objects = objects(count);
        let mut model: Vec<Option<u32>> = vec![None; count];
        let mut map = IdentityHashMap::with_config(Config::new().with_policy(policy(robin_hood)));

        for (op, raw, value) in ops {
            let i = raw % count;
            let key: &u32 = &objects[i];
            match op {
                // Inserts dominate so that tables grow and probe runs form.
                0..=4 => {
                    let previous = map.insert(key, value);
                    prop_assert_eq!(previous, model[i].replace(value));
                }
                5 | 6 => {
                    prop_assert_eq!(map.remove(&key), model[i].take());
                }
                7 => {
                    let threshold = value;
                    map.retain(|_, v| *v < threshold);
                    for slot in model.iter_mut() {
                        if slot.is_some_and(|v| v >= threshold) {
                            *slot = None;
                        }
                    }
                }
                8 => {
                    map.replace_all(|_, v| v.wrapping_add(1));
                    for slot in model.iter_mut().flatten() {
                        *slot = slot.wrapping_add(1);
                    }
                }
                9 => {
                    if value % 16 == 0 {
                        let capacity = map.capacity();
                        map.clear();
                        model.fill(None);
                        prop_assert_eq!(map.capacity(), capacity);
                    }
                }
                _ => unreachable!(),
            }

            check_against_model(&map, &objects, &model)?;
        }

        let copy = map.clone();
        check_against_model(&copy, &objects, &model)?;
    }
}

proptest! {
    #[test]
    fn prop_cursor_removal_visits_each_entry_once(
        robin_hood in any::<bool>(),
        count in 1usize..=200,
        keep in proptest::collection::vec(any::<bool>(), 200)
    ) {
        let objects = objects(count);
        let mut map = IdentityHashMap::with_config(Config::new().with_policy(policy(robin_hood)));
        for (i, object) in objects.iter().enumerate() {
            map.insert(&**object, i);
        }

        let mut visited = HashSet::new();
        let mut cursor = map.cursor();
        while let Some((_, &index)) = cursor
            .next(&map)
            .map_err(|e| TestCaseError::fail(e.to_string()))?
        {
            prop_assert!(visited.insert(index), "entry {} visited twice", index);
            if !keep[index] {
                let (_, removed) = cursor
                    .remove(&mut map)
                    .map_err(|e| TestCaseError::fail(e.to_string()))?;
                prop_assert_eq!(removed, index);
            }
        }

        prop_assert_eq!(visited.len(), count);
        let expected = (0..count).filter(|&i| keep[i]).count();
        prop_assert_eq!(map.len(), expected);
        for (i, object) in objects.iter().enumerate() {
            prop_assert_eq!(map.contains_key(&&**object), keep[i]);
        }
    }
}
