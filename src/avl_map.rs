use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::ops::Index;

use crate::Error;
use crate::compare::{Comparator, Natural};
use crate::raw::{Arena, Handle, Node, RawAvlMap, predecessor, successor};

mod capacity;
mod cursor;
mod entry;
mod set_algebra;
mod traverse;

pub use cursor::{Cursor, CursorMut};
pub use entry::{Entry, OccupiedEntry, VacantEntry};
pub use crate::set_algebra::Operand;
pub use traverse::{Traverse, TraverseMut};

/// An ordered map based on an [AVL tree].
///
/// Keys are kept in the order given by the comparator `C`, which defaults to the natural
/// [`Ord`] order of `K` (see [`Natural`]). Every node of the tree is balanced: the heights
/// of its two subtrees differ by at most one, so lookups, insertions and removals take
/// O(log n) comparisons in the worst case.
///
/// Besides the usual ascending iterators, a map can be walked in
/// [descending or breadth-first order](crate::TraversalOrder) with [`iter_in`],
/// [`traverse`] or a [`Cursor`], and combined with other maps using [`union`],
/// [`intersect`] and [`complement`].
///
/// It is a logic error for a key to be modified in such a way that the key's ordering relative to
/// any other key, as determined by the comparator, changes while it is in the map. This is
/// normally only possible through [`Cell`], [`RefCell`], global state, I/O, or unsafe code.
/// The behavior resulting from such a logic error is not specified, but will be encapsulated to the
/// `AvlMap` that observed the logic error and not result in undefined behavior. This could
/// include panics, incorrect results, aborts, memory leaks, and non-termination.
///
/// # Examples
///
/// ```
/// use avl_dict::AvlMap;
///
/// let mut stock = AvlMap::new();
/// stock.insert("apples", 3);
/// stock.insert("pears", 0);
/// stock.insert("plums", 12);
///
/// if !stock.contains_key("kiwis") {
///     println!("{} kinds in stock, but no kiwis.", stock.len());
/// }
///
/// // Sold out.
/// stock.remove("pears");
///
/// // Inserting an existing key replaces its value.
/// assert_eq!(stock.insert("apples", 5), Some(3));
///
/// for (fruit, count) in &stock {
///     println!("{fruit}: {count}");
/// }
/// assert_eq!(stock["plums"], 12);
/// ```
///
/// An `AvlMap` with a known list of items can be initialized from an array:
///
/// ```
/// use avl_dict::AvlMap;
///
/// let planets = AvlMap::from([
///     ("Mercury", 0.4),
///     ("Venus", 0.7),
///     ("Earth", 1.0),
///     ("Mars", 1.5),
/// ]);
/// assert_eq!(planets.first_key_value(), Some((&"Earth", &1.0)));
/// ```
///
/// [AVL tree]: https://en.wikipedia.org/wiki/AVL_tree
/// [`iter_in`]: AvlMap::iter_in
/// [`traverse`]: AvlMap::traverse
/// [`union`]: AvlMap::union
/// [`intersect`]: AvlMap::intersect
/// [`complement`]: AvlMap::complement
/// [`Cell`]: core::cell::Cell
/// [`RefCell`]: core::cell::RefCell
#[derive(Clone)]
pub struct AvlMap<K, V, C = Natural> {
    raw: RawAvlMap<K, V, C>,
}

/// An iterator over the entries of an `AvlMap`, in ascending order.
///
/// This `struct` is created by the [`iter`] method on [`AvlMap`]. See its
/// documentation for more.
///
/// # Examples
///
/// ```
/// use avl_dict::AvlMap;
///
/// let map = AvlMap::from([(1, "a"), (2, "b")]);
/// let mut iter = map.iter();
/// assert_eq!(iter.next(), Some((&1, &"a")));
/// assert_eq!(iter.next_back(), Some((&2, &"b")));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: AvlMap::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    nodes: &'a Arena<Node<K>>,
    values: &'a Arena<V>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
}

/// A mutable iterator over the entries of an `AvlMap`, in ascending order.
///
/// This `struct` is created by the [`iter_mut`] method on [`AvlMap`].
///
/// [`iter_mut`]: AvlMap::iter_mut
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IterMut<'a, K, V> {
    nodes: &'a Arena<Node<K>>,
    values: *mut Arena<V>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
    _marker: PhantomData<&'a mut V>,
}

// SAFETY: IterMut reads keys like `&K` and writes values like `&mut V`.
unsafe impl<K: Sync, V: Send> Send for IterMut<'_, K, V> {}
unsafe impl<K: Sync, V: Sync> Sync for IterMut<'_, K, V> {}

/// An owning iterator over the entries of an `AvlMap`, in ascending order.
///
/// This `struct` is created by the [`into_iter`] method on [`AvlMap`]
/// (provided by the [`IntoIterator`] trait).
///
/// [`into_iter`]: IntoIterator::into_iter
pub struct IntoIter<K, V> {
    inner: alloc::vec::IntoIter<(K, V)>,
}

/// An iterator over the keys of an `AvlMap`, in ascending order.
///
/// This `struct` is created by the [`keys`] method on [`AvlMap`].
///
/// [`keys`]: AvlMap::keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An iterator over the values of an `AvlMap`, in ascending key order.
///
/// This `struct` is created by the [`values`] method on [`AvlMap`].
///
/// [`values`]: AvlMap::values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// A mutable iterator over the values of an `AvlMap`, in ascending key order.
///
/// This `struct` is created by the [`values_mut`] method on [`AvlMap`].
///
/// [`values_mut`]: AvlMap::values_mut
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

/// An owning iterator over the keys of an `AvlMap`.
///
/// This `struct` is created by the [`into_keys`] method on [`AvlMap`].
///
/// [`into_keys`]: AvlMap::into_keys
pub struct IntoKeys<K, V> {
    inner: IntoIter<K, V>,
}

/// An owning iterator over the values of an `AvlMap`.
///
/// This `struct` is created by the [`into_values`] method on [`AvlMap`].
///
/// [`into_values`]: AvlMap::into_values
pub struct IntoValues<K, V> {
    inner: IntoIter<K, V>,
}

impl<K, V> AvlMap<K, V> {
    /// Makes a new, empty `AvlMap` ordered by the natural order of `K`.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    ///
    /// // entries can now be inserted into the empty map
    /// map.insert(1, "a");
    /// ```
    #[must_use]
    pub const fn new() -> AvlMap<K, V> {
        AvlMap {
            raw: RawAvlMap::new(Natural),
        }
    }
}

impl<K, V, C> AvlMap<K, V, C> {
    /// Makes a new, empty `AvlMap` that orders its keys with `comparator`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    /// use avl_dict::compare::Reverse;
    ///
    /// let mut map = AvlMap::with_comparator(Reverse);
    /// map.insert("a", 1);
    /// map.insert("b", 2);
    /// assert_eq!(map.first_key_value(), Some((&"b", &2)));
    /// ```
    #[must_use]
    pub const fn with_comparator(comparator: C) -> Self {
        AvlMap {
            raw: RawAvlMap::new(comparator),
        }
    }

    /// Returns the comparator that orders the keys of this map.
    #[must_use]
    pub const fn comparator(&self) -> &C {
        self.raw.comparator()
    }

    /// Clears the map, removing all elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    ///
    /// let mut a = AvlMap::new();
    /// a.insert(1, "a");
    /// a.clear();
    /// assert!(a.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n) to drop the entries; no rebalancing takes place.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the number of elements in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    ///
    /// let mut a = AvlMap::new();
    /// assert_eq!(a.len(), 0);
    /// a.insert(1, "a");
    /// assert_eq!(a.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    ///
    /// let mut a = AvlMap::new();
    /// assert!(a.is_empty());
    /// a.insert(1, "a");
    /// assert!(!a.is_empty());
    /// ```
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the height of the underlying tree: 0 when empty, 1 for a single entry.
    ///
    /// The height never exceeds `1.44 * log2(len + 2)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    ///
    /// let map: AvlMap<u32, ()> = (0..1023).map(|k| (k, ())).collect();
    /// assert!(map.height() >= 10);
    /// assert!(map.height() <= 14);
    /// ```
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Returns the first key-value pair in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// assert_eq!(map.first_key_value(), None);
    /// map.insert(1, "b");
    /// map.insert(2, "a");
    /// assert_eq!(map.first_key_value(), Some((&1, &"b")));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.raw.first().map(|h| self.raw.key_value(h))
    }

    /// Returns the last key-value pair in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, "b");
    /// map.insert(2, "a");
    /// assert_eq!(map.last_key_value(), Some((&2, &"a")));
    /// ```
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.raw.last().map(|h| self.raw.key_value(h))
    }

    /// Removes and returns the first element in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    ///
    /// let mut map = AvlMap::from([(1, "a"), (2, "b")]);
    /// assert_eq!(map.pop_first(), Some((1, "a")));
    /// assert_eq!(map.pop_first(), Some((2, "b")));
    /// assert_eq!(map.pop_first(), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        self.raw.pop_first()
    }

    /// Removes and returns the last element in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    ///
    /// let mut map = AvlMap::from([(1, "a"), (2, "b")]);
    /// assert_eq!(map.pop_last(), Some((2, "b")));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        self.raw.pop_last()
    }

    /// Retains only the elements specified by the predicate.
    ///
    /// In other words, remove all pairs `(k, v)` for which `f(&k, &mut v)` returns `false`.
    /// The elements are visited in ascending key order.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    ///
    /// let mut map: AvlMap<i32, i32> = (0..8).map(|x| (x, x * 10)).collect();
    /// // Keep only the elements with even-numbered keys.
    /// map.retain(|&k, _| k % 2 == 0);
    /// assert!(map.into_iter().eq(vec![(0, 0), (2, 20), (4, 40), (6, 60)]));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n log n) in the worst case (when many elements are removed).
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let mut current = self.raw.first();
        while let Some(h) = current {
            // Removal relinks nodes but never invalidates the handles of survivors.
            current = successor(self.raw.nodes(), h);
            let (key, value) = self.raw.key_value_mut(h);
            if !f(key, value) {
                self.raw.remove_handle(h);
            }
        }
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(3, "c");
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    ///
    /// let (first_key, first_value) = map.iter().next().unwrap();
    /// assert_eq!((*first_key, *first_value), (1, "a"));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) to create the iterator; O(1) amortized per step.
    pub fn iter(&self) -> Iter<'_, K, V> {
        let (nodes, values) = self.raw.parts();
        Iter {
            nodes,
            values,
            front: self.raw.first(),
            back: self.raw.last(),
            remaining: self.raw.len(),
        }
    }

    /// Gets a mutable iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    ///
    /// let mut map = AvlMap::from([("a", 1), ("b", 2), ("c", 3)]);
    ///
    /// // add 10 to the value if the key isn't "a"
    /// for (key, value) in map.iter_mut() {
    ///     if key != &"a" {
    ///         *value += 10;
    ///     }
    /// }
    /// assert_eq!(map["c"], 13);
    /// ```
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let front = self.raw.first();
        let back = self.raw.last();
        let remaining = self.raw.len();
        let (nodes, values) = self.raw.parts_mut();
        IterMut {
            nodes,
            values: core::ptr::from_mut(values),
            front,
            back,
            remaining,
            _marker: PhantomData,
        }
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    ///
    /// let mut a = AvlMap::new();
    /// a.insert(2, "b");
    /// a.insert(1, "a");
    ///
    /// let keys: Vec<_> = a.keys().cloned().collect();
    /// assert_eq!(keys, [1, 2]);
    /// ```
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Gets an iterator over the values of the map, in order by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    ///
    /// let mut a = AvlMap::new();
    /// a.insert(1, "hello");
    /// a.insert(2, "goodbye");
    ///
    /// let values: Vec<&str> = a.values().cloned().collect();
    /// assert_eq!(values, ["hello", "goodbye"]);
    /// ```
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Gets a mutable iterator over the values of the map, in order by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    ///
    /// let mut a = AvlMap::new();
    /// a.insert(1, String::from("hello"));
    /// a.insert(2, String::from("goodbye"));
    ///
    /// for value in a.values_mut() {
    ///     value.push_str("!");
    /// }
    ///
    /// let values: Vec<String> = a.values().cloned().collect();
    /// assert_eq!(values, ["hello!", "goodbye!"]);
    /// ```
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut { inner: self.iter_mut() }
    }

    /// Creates a consuming iterator visiting all the keys, in sorted order.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    ///
    /// let map = AvlMap::from([(2, "b"), (1, "a")]);
    /// let keys: Vec<i32> = map.into_keys().collect();
    /// assert_eq!(keys, [1, 2]);
    /// ```
    pub fn into_keys(self) -> IntoKeys<K, V> {
        IntoKeys { inner: self.into_iter() }
    }

    /// Creates a consuming iterator visiting all the values, in order by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    ///
    /// let map = AvlMap::from([(1, "hello"), (2, "goodbye")]);
    /// let values: Vec<&str> = map.into_values().collect();
    /// assert_eq!(values, ["hello", "goodbye"]);
    /// ```
    pub fn into_values(self) -> IntoValues<K, V> {
        IntoValues { inner: self.into_iter() }
    }
}

impl<K, V, C> AvlMap<K, V, C> {
    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but the ordering
    /// on the borrowed form *must* match the ordering on the key type.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.raw.search(key).map(|h| self.raw.key_value(h).1)
    }

    /// Returns the key-value pair corresponding to the supplied key.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.get_key_value(&1), Some((&1, &"a")));
    /// assert_eq!(map.get_key_value(&2), None);
    /// ```
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.raw.search(key).map(|h| self.raw.key_value(h))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, "a");
    /// if let Some(x) = map.get_mut(&1) {
    ///     *x = "b";
    /// }
    /// assert_eq!(map[&1], "b");
    /// ```
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let node = self.raw.search(key)?;
        Some(self.raw.key_value_mut(node).1)
    }

    /// Returns the value corresponding to the key, or [`Error::KeyNotFound`].
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if the map has no entry for `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::{AvlMap, Error};
    ///
    /// let map = AvlMap::from([(1, "a")]);
    /// assert_eq!(map.try_get(&1), Ok(&"a"));
    /// assert_eq!(map.try_get(&2), Err(Error::KeyNotFound));
    /// ```
    pub fn try_get<Q>(&self, key: &Q) -> Result<&V, Error>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    /// Returns a mutable reference to the value corresponding to the key, or
    /// [`Error::KeyNotFound`].
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if the map has no entry for `key`.
    pub fn try_get_mut<Q>(&mut self, key: &Q) -> Result<&mut V, Error>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.get_mut(key).ok_or(Error::KeyNotFound)
    }

    /// Returns `true` if the map contains a value for the specified key.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.contains_key(&1), true);
    /// assert_eq!(map.contains_key(&2), false);
    /// ```
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.raw.search(key).is_some()
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map did not have this key present, `None` is returned and the tree is
    /// rebalanced along the path to the new entry.
    ///
    /// If the map did have this key present, the value is updated, and the old
    /// value is returned. The key is not updated and the size does not change.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// assert_eq!(map.insert(37, "a"), None);
    /// assert_eq!(map.is_empty(), false);
    ///
    /// map.insert(37, "b");
    /// assert_eq!(map.insert(37, "c"), Some("b"));
    /// assert_eq!(map[&37], "c");
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, key: K, value: V) -> Option<V>
    where
        C: Comparator<K>,
    {
        self.raw.insert(key, value).1
    }

    /// Returns a mutable reference to the value for `key`, inserting `V::default()` first
    /// if the key is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    ///
    /// let mut counts: AvlMap<&str, u32> = AvlMap::new();
    /// for word in ["a", "b", "a"] {
    ///     *counts.get_or_insert_default(word) += 1;
    /// }
    /// assert_eq!(counts["a"], 2);
    /// assert_eq!(counts["b"], 1);
    /// ```
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        C: Comparator<K>,
        V: Default,
    {
        let node = match self.raw.search(&key) {
            Some(node) => node,
            None => self.raw.insert(key, V::default()).0,
        };
        self.raw.key_value_mut(node).1
    }

    /// Removes a key from the map, returning the value at the key if the key
    /// was previously in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.raw.remove(key).map(|(_, v)| v)
    }

    /// Removes a key from the map, returning the stored key and value if the key
    /// was previously in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.remove_entry(&1), Some((1, "a")));
    /// assert_eq!(map.remove_entry(&1), None);
    /// ```
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.raw.remove(key)
    }

    /// Removes a key from the map, returning its value, or [`Error::KeyNotFound`].
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if the map has no entry for `key`; the map is unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::{AvlMap, Error};
    ///
    /// let mut map = AvlMap::from([(1, "a")]);
    /// assert_eq!(map.try_remove(&1), Ok("a"));
    /// assert_eq!(map.try_remove(&1), Err(Error::KeyNotFound));
    /// ```
    pub fn try_remove<Q>(&mut self, key: &Q) -> Result<V, Error>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.remove(key).ok_or(Error::KeyNotFound)
    }

    /// Moves all elements from `other` into `self`, leaving `other` empty.
    ///
    /// If a key from `other` is already present in `self`, the respective
    /// value from `self` will be overwritten with the respective value from `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    ///
    /// let mut a = AvlMap::from([(1, "a"), (2, "b"), (3, "c")]);
    /// let mut b = AvlMap::from([(3, "d"), (4, "e")]);
    ///
    /// a.append(&mut b);
    ///
    /// assert_eq!(a.len(), 4);
    /// assert_eq!(b.len(), 0);
    /// assert_eq!(a[&3], "d");
    /// ```
    ///
    /// # Complexity
    ///
    /// O(m log(n + m)), where m is the size of `other` and n is the size of `self`.
    pub fn append(&mut self, other: &mut Self)
    where
        C: Comparator<K>,
    {
        if other.is_empty() {
            return;
        }

        if self.is_empty() {
            core::mem::swap(&mut self.raw, &mut other.raw);
            return;
        }

        for (k, v) in other.raw.drain_to_vec() {
            self.raw.insert(k, v);
        }
    }
}

impl<K: Hash, V: Hash, C> Hash for AvlMap<K, V, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for (k, v) in self {
            k.hash(state);
            v.hash(state);
        }
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for AvlMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<K: Eq, V: Eq, C> Eq for AvlMap<K, V, C> {}

impl<K: PartialOrd, V: PartialOrd, C> PartialOrd for AvlMap<K, V, C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<K: Ord, V: Ord, C> Ord for AvlMap<K, V, C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for AvlMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C: Default> Default for AvlMap<K, V, C> {
    fn default() -> Self {
        AvlMap::with_comparator(C::default())
    }
}

impl<K, V, C: Comparator<K> + Default> FromIterator<(K, V)> for AvlMap<K, V, C> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = AvlMap::default();
        map.extend(iter);
        map
    }
}

impl<K, V, C: Comparator<K>> Extend<(K, V)> for AvlMap<K, V, C> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K: Copy, V: Copy, C: Comparator<K>> Extend<(&'a K, &'a V)> for AvlMap<K, V, C> {
    fn extend<T: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: T) {
        for (&k, &v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K, V, C> IntoIterator for &'a AvlMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V, C> IntoIterator for &'a mut AvlMap<K, V, C> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}

impl<K, V, C> IntoIterator for AvlMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    /// Gets an owning iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    ///
    /// let map = AvlMap::from([(2, "b"), (1, "a")]);
    /// let mut iter = map.into_iter();
    /// assert_eq!(iter.next(), Some((1, "a")));
    /// assert_eq!(iter.next_back(), Some((2, "b")));
    /// ```
    fn into_iter(mut self) -> IntoIter<K, V> {
        IntoIter {
            inner: self.raw.drain_to_vec().into_iter(),
        }
    }
}

impl<K, Q, V, C> Index<&Q> for AvlMap<K, V, C>
where
    K: Borrow<Q>,
    Q: ?Sized,
    C: Comparator<Q>,
{
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the `AvlMap`.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for AvlMap<K, V> {
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<'a, K: 'a, V: 'a> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let h = self.front?;
        let node = self.nodes.get(h);
        self.front = successor(self.nodes, h);
        self.remaining -= 1;
        Some((node.key(), self.values.get(node.value())))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K: 'a, V: 'a> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let h = self.back?;
        let node = self.nodes.get(h);
        self.back = predecessor(self.nodes, h);
        self.remaining -= 1;
        Some((node.key(), self.values.get(node.value())))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            nodes: self.nodes,
            values: self.values,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let h = self.front?;
        let node = self.nodes.get(h);
        self.front = successor(self.nodes, h);
        self.remaining -= 1;
        // SAFETY: `values` comes from the `&'a mut` borrow taken by `iter_mut`, and the
        // front and back cursors never hand out the same node twice.
        let value = unsafe { Arena::get_mut_ptr(self.values, node.value()) };
        Some((node.key(), value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let h = self.back?;
        let node = self.nodes.get(h);
        self.back = predecessor(self.nodes, h);
        self.remaining -= 1;
        // SAFETY: as in `next`.
        let value = unsafe { Arena::get_mut_ptr(self.values, node.value()) };
        Some((node.key(), value))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for IterMut<'_, K, V> {}

impl<K, V> fmt::Debug for IterMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut").field("remaining", &self.remaining).finish()
    }
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

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for IntoIter<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.as_slice()).finish()
    }
}

impl<K, V> Default for IntoIter<K, V> {
    /// Creates an empty `avl_map::IntoIter`.
    ///
    /// ```
    /// # use avl_dict::avl_map;
    /// let iter: avl_map::IntoIter<u8, u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        IntoIter {
            inner: alloc::vec::Vec::new().into_iter(),
        }
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

impl<K: fmt::Debug, V> fmt::Debug for Keys<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Values<'_, K, V> {}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Values {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V: fmt::Debug> fmt::Debug for Values<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<&'a mut V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for ValuesMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for ValuesMut<'_, K, V> {}

impl<K, V> fmt::Debug for ValuesMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValuesMut").field("remaining", &self.inner.remaining).finish()
    }
}

impl<K, V> Iterator for IntoKeys<K, V> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoKeys<K, V> {
    fn next_back(&mut self) -> Option<K> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for IntoKeys<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoKeys<K, V> {}

impl<K: fmt::Debug, V> fmt::Debug for IntoKeys<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.inner.as_slice().iter().map(|(k, _)| k)).finish()
    }
}

impl<K, V> Iterator for IntoValues<K, V> {
    type Item = V;

    fn next(&mut self) -> Option<V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoValues<K, V> {
    fn next_back(&mut self) -> Option<V> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for IntoValues<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoValues<K, V> {}

impl<K, V: fmt::Debug> fmt::Debug for IntoValues<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.inner.as_slice().iter().map(|(_, v)| v)).finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    impl<K, V, C: Comparator<K>> AvlMap<K, V, C> {
        pub(crate) fn validate_invariants(&self) {
            self.raw.validate_invariants();
        }
    }

    #[test]
    fn iter_meets_in_the_middle() {
        let map: AvlMap<u16, u16> = (0..10).map(|k| (k, k)).collect();
        let mut iter = map.iter();
        let mut seen = Vec::new();
        while let Some((k, _)) = iter.next() {
            seen.push(*k);
            if let Some((k, _)) = iter.next_back() {
                seen.push(*k);
            }
        }
        seen.sort_unstable();
        assert_eq!(seen, (0..10).collect::<Vec<_>>());
        assert_eq!(iter.len(), 0);
    }

    #[test]
    fn retain_keeps_tree_valid() {
        let mut map: AvlMap<u16, u16> = (0..300).map(|k| (k, k)).collect();
        map.retain(|k, v| {
            *v += 1;
            k % 3 != 0
        });
        map.raw.validate_invariants();
        assert_eq!(map.len(), 200);
        assert!(map.iter().all(|(k, v)| *v == k + 1 && k % 3 != 0));
    }

    #[test]
    fn iter_mut_from_both_ends() {
        let mut map: AvlMap<u16, u16> = (0..6).map(|k| (k, 0)).collect();
        {
            let mut iter = map.iter_mut();
            *iter.next().unwrap().1 = 1;
            *iter.next_back().unwrap().1 = 2;
            assert_eq!(iter.len(), 4);
        }
        assert_eq!(map.values().copied().collect::<Vec<_>>(), [1, 0, 0, 0, 0, 2]);
    }

    #[test]
    fn append_into_empty_swaps() {
        let mut a: AvlMap<u16, ()> = AvlMap::new();
        let mut b: AvlMap<u16, ()> = (0..5).map(|k| (k, ())).collect();
        a.append(&mut b);
        assert_eq!(a.len(), 5);
        assert!(b.is_empty());
        a.raw.validate_invariants();
        b.raw.validate_invariants();
    }
}
