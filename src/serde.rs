use core::fmt;
use core::marker::PhantomData;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::AvlMap;
use crate::compare::Comparator;

impl<K, V, C> Serialize for AvlMap<K, V, C>
where
    K: Serialize,
    V: Serialize,
{
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = s.serialize_map(Some(self.len()))?;
        for (k, v) in self {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Upper bound on entries reserved up front from an untrusted size hint.
const MAX_PREALLOCATED: usize = 4096;

struct AvlMapVisitor<K, V, C> {
    pd: PhantomData<(K, V, C)>,
}

impl<'de, K, V, C> Visitor<'de> for AvlMapVisitor<K, V, C>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
    C: Comparator<K> + Default,
{
    type Value = AvlMap<K, V, C>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
    where
        M: MapAccess<'de>,
    {
        let capacity = access.size_hint().unwrap_or(0).min(MAX_PREALLOCATED);
        let mut map = AvlMap::with_capacity_and_comparator(capacity, C::default());

        // Later duplicates overwrite earlier ones, as with `insert`.
        while let Some((key, value)) = access.next_entry()? {
            map.insert(key, value);
        }

        Ok(map)
    }
}

impl<'de, K, V, C> Deserialize<'de> for AvlMap<K, V, C>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
    C: Comparator<K> + Default,
{
    fn deserialize<D>(d: D) -> Result<AvlMap<K, V, C>, D::Error>
    where
        D: Deserializer<'de>,
    {
        d.deserialize_map(AvlMapVisitor { pd: PhantomData })
    }
}
