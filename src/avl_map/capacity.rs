use super::AvlMap;
use crate::compare::Natural;
use crate::raw::RawAvlMap;

impl<K, V> AvlMap<K, V> {
    /// Creates an empty map with room for at least `capacity` entries before the node
    /// storage reallocates.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    ///
    /// let map: AvlMap<i32, i32> = AvlMap::with_capacity(32);
    /// assert!(map.is_empty());
    /// assert!(map.capacity() >= 32);
    /// ```
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        AvlMap {
            raw: RawAvlMap::with_capacity(capacity, Natural),
        }
    }
}

impl<K, V, C> AvlMap<K, V, C> {
    /// Creates an empty map ordered by `comparator`, with room for at least `capacity`
    /// entries.
    #[must_use]
    pub fn with_capacity_and_comparator(capacity: usize, comparator: C) -> Self {
        AvlMap {
            raw: RawAvlMap::with_capacity(capacity, comparator),
        }
    }

    /// Returns the number of entries the map can hold without reallocating.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Reserves room for at least `additional` more entries. Slots freed by earlier
    /// removals count towards the reservation.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    ///
    /// let mut map = AvlMap::from([(1, "a")]);
    /// map.reserve(10);
    /// assert!(map.capacity() >= 11);
    /// ```
    pub fn reserve(&mut self, additional: usize) {
        self.raw.reserve(additional);
    }
}
