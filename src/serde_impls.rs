use core::fmt;
use core::fmt::Formatter;
use core::marker::PhantomData;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de;
use serde::de::MapAccess;
use serde::de::Visitor;

use crate::Config;
use crate::IdentityHashMap;
use crate::equivalence::Equivalence;

struct MapVisitor<K, V, E> {
    _marker: PhantomData<IdentityHashMap<K, V, E>>,
}

impl<K, V, E> MapVisitor<K, V, E> {
    fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<K, V, E> Serialize for IdentityHashMap<K, V, E>
where
    K: Serialize,
    V: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self)
    }
}

impl<'de, K, V, E> Deserialize<'de> for IdentityHashMap<K, V, E>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
    E: Equivalence<K> + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(MapVisitor::new())
    }
}

impl<'de, K, V, E> Visitor<'de> for MapVisitor<K, V, E>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
    E: Equivalence<K> + Default,
{
    type Value = IdentityHashMap<K, V, E>;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "a map")
    }

    fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
    where
        M: MapAccess<'de>,
    {
        let declared = access.size_hint().unwrap_or(0);
        let mut map = IdentityHashMap::with_parts(declared, Config::new(), E::default());
        tracing::trace!(
            declared,
            capacity = map.capacity(),
            "pre-sized map for deserialization"
        );

        let (table, equivalence) = map.table_and_equivalence_mut();
        while let Some((key, value)) = access.next_entry::<K, V>()? {
            let hash = equivalence.hash(&key);
            table
                .load(hash, key, value, |a, b| equivalence.equivalent(a, b))
                .map_err(de::Error::custom)?;
        }

        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec::Vec;

    use crate::IdentityHashMap;
    use crate::equivalence::ByValue;

    type Named = IdentityHashMap<String, u32, ByValue>;

    #[test]
    fn round_trips_through_json() {
        let mut map: Named = IdentityHashMap::with_equivalence(ByValue::new());
        for i in 0..50u32 {
            map.insert(i.to_string(), i);
        }

        let json = serde_json::to_string(&map).unwrap();
        let restored: Named = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.len(), 50);
        assert_eq!(restored, map);
        assert_eq!(restored.table().mod_count(), 0);
        restored.table().assert_invariants();
    }

    #[test]
    fn serializes_in_table_order() {
        let mut map: Named = IdentityHashMap::with_equivalence(ByValue::new());
        map.insert("x".to_string(), 1);
        map.insert("y".to_string(), 2);

        let expected: Vec<String> = map
            .iter()
            .map(|(k, v)| alloc::format!("\"{k}\":{v}"))
            .collect();
        let expected = alloc::format!("{{{}}}", expected.join(","));
        assert_eq!(serde_json::to_string(&map).unwrap(), expected);
    }

    #[test]
    fn rejects_duplicate_keys() {
        let error = serde_json::from_str::<Named>(r#"{"a":1,"b":2,"a":3}"#).unwrap_err();
        assert!(error.to_string().contains("duplicate key"), "{error}");
    }

    #[test]
    fn grows_past_a_missing_size_hint() {
        let json: String = {
            let body: Vec<String> = (0..100).map(|i| alloc::format!("\"k{i}\":{i}")).collect();
            alloc::format!("{{{}}}", body.join(","))
        };
        let map: Named = serde_json::from_str(&json).unwrap();
        assert_eq!(map.len(), 100);
        assert_eq!(map.get(&"k42".to_string()), Some(&42));
        map.table().assert_invariants();
    }

    #[test]
    fn identity_keys_deserialize_as_fresh_objects() {
        let map: IdentityHashMap<Box<u8>, u8> = serde_json::from_str("{}").unwrap();
        assert!(map.is_empty());

        let map: IdentityHashMap<Box<String>, u8> =
            serde_json::from_str(r#"{"same":1,"same":2}"#).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.values().copied().sum::<u8>(), 3);
    }
}
