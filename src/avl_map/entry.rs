use core::fmt;
use core::mem;

use super::AvlMap;
use crate::compare::{Comparator, Natural};
use crate::raw::{Handle, RawAvlMap};

/// A view into a single entry in a map, which may either be vacant or occupied.
///
/// This `enum` is constructed from the [`entry`] method on [`AvlMap`].
///
/// # Examples
///
/// ```
/// use avl_dict::AvlMap;
/// use avl_dict::avl_map::Entry;
///
/// let mut map = AvlMap::new();
///
/// match map.entry("oz") {
///     Entry::Vacant(v) => {
///         v.insert(1);
///     }
///     Entry::Occupied(mut o) => {
///         *o.get_mut() += 1;
///     }
/// }
/// assert_eq!(map["oz"], 1);
/// ```
///
/// [`entry`]: AvlMap::entry
pub enum Entry<'a, K: 'a, V: 'a, C = Natural> {
    /// A vacant entry.
    Vacant(VacantEntry<'a, K, V, C>),

    /// An occupied entry.
    Occupied(OccupiedEntry<'a, K, V, C>),
}

/// A view into a vacant entry in an `AvlMap`.
/// It is part of the [`Entry`] enum.
pub struct VacantEntry<'a, K, V, C = Natural> {
    key: K,
    raw: &'a mut RawAvlMap<K, V, C>,
}

/// A view into an occupied entry in an `AvlMap`.
/// It is part of the [`Entry`] enum.
pub struct OccupiedEntry<'a, K, V, C = Natural> {
    node: Handle,
    raw: &'a mut RawAvlMap<K, V, C>,
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for Entry<'_, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Vacant(v) => f.debug_tuple("Entry").field(v).finish(),
            Entry::Occupied(o) => f.debug_tuple("Entry").field(o).finish(),
        }
    }
}

impl<K: fmt::Debug, V, C> fmt::Debug for VacantEntry<'_, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("VacantEntry").field(&self.key).finish()
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for OccupiedEntry<'_, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OccupiedEntry").field("key", self.key()).field("value", self.get()).finish()
    }
}

impl<K, V, C: Comparator<K>> AvlMap<K, V, C> {
    /// Gets the given key's corresponding entry in the map for in-place manipulation.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    ///
    /// let mut count: AvlMap<&str, usize> = AvlMap::new();
    ///
    /// // count the number of occurrences of letters in the vec
    /// for x in ["a", "b", "a", "c", "a", "b"] {
    ///     count.entry(x).and_modify(|curr| *curr += 1).or_insert(1);
    /// }
    ///
    /// assert_eq!(count["a"], 3);
    /// assert_eq!(count["b"], 2);
    /// assert_eq!(count["c"], 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V, C> {
        match self.raw.search(&key) {
            Some(node) => Entry::Occupied(OccupiedEntry { node, raw: &mut self.raw }),
            None => Entry::Vacant(VacantEntry { key, raw: &mut self.raw }),
        }
    }
}

impl<'a, K, V, C: Comparator<K>> Entry<'a, K, V, C> {
    /// Ensures a value is in the entry by inserting the default if empty, and returns
    /// a mutable reference to the value in the entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    ///
    /// let mut map: AvlMap<&str, usize> = AvlMap::new();
    /// map.entry("poneyland").or_insert(12);
    ///
    /// assert_eq!(map["poneyland"], 12);
    /// ```
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(o) => o.into_mut(),
            Entry::Vacant(v) => v.insert(default),
        }
    }

    /// Ensures a value is in the entry by inserting the result of the default function if
    /// empty, and returns a mutable reference to the value in the entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    ///
    /// let mut map: AvlMap<&str, String> = AvlMap::new();
    /// let s = "hoho".to_string();
    ///
    /// map.entry("poneyland").or_insert_with(|| s);
    ///
    /// assert_eq!(map["poneyland"], "hoho".to_string());
    /// ```
    pub fn or_insert_with<F: FnOnce() -> V>(self, default: F) -> &'a mut V {
        match self {
            Entry::Occupied(o) => o.into_mut(),
            Entry::Vacant(v) => v.insert(default()),
        }
    }

    /// Like [`or_insert_with`](Entry::or_insert_with), but the default function receives
    /// the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    ///
    /// let mut map: AvlMap<&str, usize> = AvlMap::new();
    /// map.entry("poneyland").or_insert_with_key(|key| key.chars().count());
    ///
    /// assert_eq!(map["poneyland"], 9);
    /// ```
    pub fn or_insert_with_key<F: FnOnce(&K) -> V>(self, default: F) -> &'a mut V {
        match self {
            Entry::Occupied(o) => o.into_mut(),
            Entry::Vacant(v) => {
                let value = default(&v.key);
                v.insert(value)
            }
        }
    }

    /// Provides in-place mutable access to an occupied entry before any potential inserts
    /// into the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    ///
    /// let mut map: AvlMap<&str, usize> = AvlMap::new();
    ///
    /// map.entry("poneyland").and_modify(|e| *e += 1).or_insert(42);
    /// assert_eq!(map["poneyland"], 42);
    ///
    /// map.entry("poneyland").and_modify(|e| *e += 1).or_insert(42);
    /// assert_eq!(map["poneyland"], 43);
    /// ```
    #[must_use]
    pub fn and_modify<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        if let Entry::Occupied(o) = &mut self {
            f(o.get_mut());
        }
        self
    }

    /// Sets the value of the entry, and returns an `OccupiedEntry`.
    pub fn insert_entry(self, value: V) -> OccupiedEntry<'a, K, V, C> {
        match self {
            Entry::Occupied(mut o) => {
                o.insert(value);
                o
            }
            Entry::Vacant(v) => v.insert_entry(value),
        }
    }
}

impl<K, V, C> Entry<'_, K, V, C> {
    /// Returns a reference to this entry's key.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    ///
    /// let mut map: AvlMap<&str, usize> = AvlMap::new();
    /// assert_eq!(map.entry("poneyland").key(), &"poneyland");
    /// ```
    #[must_use]
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(o) => o.key(),
            Entry::Vacant(v) => v.key(),
        }
    }
}

impl<'a, K, V: Default, C: Comparator<K>> Entry<'a, K, V, C> {
    /// Ensures a value is in the entry by inserting the default value if empty,
    /// and returns a mutable reference to the value in the entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    ///
    /// let mut map: AvlMap<&str, Option<usize>> = AvlMap::new();
    /// map.entry("poneyland").or_default();
    ///
    /// assert_eq!(map["poneyland"], None);
    /// ```
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with(V::default)
    }
}

impl<K, V, C> VacantEntry<'_, K, V, C> {
    /// Gets a reference to the key that would be used when inserting a value
    /// through the `VacantEntry`.
    #[must_use]
    pub const fn key(&self) -> &K {
        &self.key
    }

    /// Take ownership of the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    /// use avl_dict::avl_map::Entry;
    ///
    /// let mut map: AvlMap<&str, usize> = AvlMap::new();
    ///
    /// if let Entry::Vacant(v) = map.entry("poneyland") {
    ///     assert_eq!(v.into_key(), "poneyland");
    /// }
    /// assert!(map.is_empty());
    /// ```
    #[must_use]
    pub fn into_key(self) -> K {
        self.key
    }
}

impl<'a, K, V, C: Comparator<K>> VacantEntry<'a, K, V, C> {
    /// Sets the value of the entry with the `VacantEntry`'s key,
    /// and returns a mutable reference to it.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    /// use avl_dict::avl_map::Entry;
    ///
    /// let mut map: AvlMap<&str, u32> = AvlMap::new();
    ///
    /// if let Entry::Vacant(o) = map.entry("poneyland") {
    ///     o.insert(37);
    /// }
    /// assert_eq!(map["poneyland"], 37);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(self, value: V) -> &'a mut V {
        self.insert_entry(value).into_mut()
    }

    /// Sets the value of the entry with the `VacantEntry`'s key,
    /// and returns an `OccupiedEntry`.
    pub fn insert_entry(self, value: V) -> OccupiedEntry<'a, K, V, C> {
        let (node, replaced) = self.raw.insert(self.key, value);
        debug_assert!(replaced.is_none(), "vacant entry was occupied");
        OccupiedEntry { node, raw: self.raw }
    }
}

impl<'a, K, V, C> OccupiedEntry<'a, K, V, C> {
    /// Gets a reference to the key in the entry.
    ///
    /// This is the key stored in the map, not the key that was used to probe the entry.
    #[must_use]
    pub fn key(&self) -> &K {
        self.raw.key_value(self.node).0
    }

    /// Gets a reference to the value in the entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    /// use avl_dict::avl_map::Entry;
    ///
    /// let mut map: AvlMap<&str, usize> = AvlMap::new();
    /// map.entry("poneyland").or_insert(12);
    ///
    /// if let Entry::Occupied(o) = map.entry("poneyland") {
    ///     assert_eq!(o.get(), &12);
    /// }
    /// ```
    #[must_use]
    pub fn get(&self) -> &V {
        self.raw.key_value(self.node).1
    }

    /// Gets a mutable reference to the value in the entry.
    ///
    /// If you need a reference to the `OccupiedEntry` that may outlive the
    /// destruction of the `Entry` value, see [`into_mut`].
    ///
    /// [`into_mut`]: OccupiedEntry::into_mut
    pub fn get_mut(&mut self) -> &mut V {
        self.raw.key_value_mut(self.node).1
    }

    /// Converts the entry into a mutable reference to its value.
    #[must_use = "`self` will be dropped if the result is not used"]
    pub fn into_mut(self) -> &'a mut V {
        self.raw.key_value_mut(self.node).1
    }

    /// Sets the value of the entry and returns the entry's old value.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    /// use avl_dict::avl_map::Entry;
    ///
    /// let mut map: AvlMap<&str, usize> = AvlMap::new();
    /// map.entry("poneyland").or_insert(12);
    ///
    /// if let Entry::Occupied(mut o) = map.entry("poneyland") {
    ///     assert_eq!(o.insert(15), 12);
    /// }
    /// assert_eq!(map["poneyland"], 15);
    /// ```
    pub fn insert(&mut self, value: V) -> V {
        mem::replace(self.get_mut(), value)
    }

    /// Takes ownership of the key and value from the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    /// use avl_dict::avl_map::Entry;
    ///
    /// let mut map: AvlMap<&str, usize> = AvlMap::new();
    /// map.entry("poneyland").or_insert(12);
    ///
    /// if let Entry::Occupied(o) = map.entry("poneyland") {
    ///     assert_eq!(o.remove_entry(), ("poneyland", 12));
    /// }
    /// assert!(map.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[allow(clippy::must_use_candidate)]
    pub fn remove_entry(self) -> (K, V) {
        self.raw.remove_handle(self.node)
    }

    /// Takes the value of the entry out of the map, and returns it.
    #[allow(clippy::must_use_candidate)]
    pub fn remove(self) -> V {
        self.remove_entry().1
    }
}
