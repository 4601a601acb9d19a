use core::borrow::Borrow;
use core::fmt;

use super::AvlMap;
use crate::compare::{Comparator, Natural};
use crate::raw::{RawAvlMap, Walker};
use crate::{Error, TraversalOrder};

/// A position in one traversal order over an `AvlMap`.
///
/// A cursor either points at an entry or sits on the end sentinel, one past the last entry
/// of its order. Reading or advancing at the end fails with [`Error::InvalidIterator`];
/// stepping back from the end lands on the last entry. Cursors in
/// [`Breadth`](TraversalOrder::Breadth) order only move forward.
///
/// The cursor borrows the map, so the map cannot change while the cursor is alive. Use a
/// [`CursorMut`] to remove entries during a walk.
///
/// # Examples
///
/// ```
/// use avl_dict::{AvlMap, Error, TraversalOrder};
///
/// let map = AvlMap::from([(1, "a"), (2, "b"), (3, "c")]);
///
/// let mut cursor = map.cursor(TraversalOrder::Descending);
/// assert_eq!(cursor.get(), Ok((&3, &"c")));
/// cursor.move_next()?;
/// cursor.move_next()?;
/// cursor.move_next()?;
/// assert!(cursor.is_end());
/// assert_eq!(cursor.get(), Err(Error::InvalidIterator));
///
/// cursor.move_prev()?;
/// assert_eq!(cursor.key(), Ok(&1));
/// # Ok::<(), Error>(())
/// ```
pub struct Cursor<'a, K, V, C = Natural> {
    raw: &'a RawAvlMap<K, V, C>,
    walker: Walker,
}

/// A position in one traversal order over an `AvlMap` that can modify the entries under it.
///
/// Besides everything a [`Cursor`] does, a `CursorMut` hands out mutable values and can
/// [remove](CursorMut::remove_current) the entry it points at, moving on to the entry
/// that followed it.
pub struct CursorMut<'a, K, V, C = Natural> {
    raw: &'a mut RawAvlMap<K, V, C>,
    walker: Walker,
}

impl<K, V, C> AvlMap<K, V, C> {
    /// Returns a cursor on the first entry of `order`, or on the end sentinel if the map is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::{AvlMap, TraversalOrder};
    ///
    /// let map = AvlMap::from([(1, "a"), (2, "b"), (3, "c")]);
    /// assert_eq!(map.cursor(TraversalOrder::Ascending).key(), Ok(&1));
    /// assert_eq!(map.cursor(TraversalOrder::Breadth).key(), Ok(&2));
    /// ```
    pub fn cursor(&self, order: TraversalOrder) -> Cursor<'_, K, V, C> {
        Cursor {
            raw: &self.raw,
            walker: Walker::first(self.raw.nodes(), self.raw.root(), order),
        }
    }

    /// Returns a cursor on the end sentinel of `order`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::{AvlMap, Error, TraversalOrder};
    ///
    /// let map = AvlMap::from([(1, "a"), (2, "b")]);
    /// let mut cursor = map.cursor_end(TraversalOrder::Ascending);
    /// assert!(cursor.is_end());
    /// cursor.move_prev()?;
    /// assert_eq!(cursor.get(), Ok((&2, &"b")));
    /// # Ok::<(), Error>(())
    /// ```
    pub fn cursor_end(&self, order: TraversalOrder) -> Cursor<'_, K, V, C> {
        Cursor {
            raw: &self.raw,
            walker: Walker::end(order),
        }
    }

    /// Returns a mutable cursor on the first entry of `order`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::{AvlMap, TraversalOrder};
    ///
    /// let mut map = AvlMap::from([(1, 10), (2, 20)]);
    /// let mut cursor = map.cursor_mut(TraversalOrder::Ascending);
    /// *cursor.value_mut()? += 1;
    /// assert_eq!(map[&1], 11);
    /// # Ok::<(), avl_dict::Error>(())
    /// ```
    pub fn cursor_mut(&mut self, order: TraversalOrder) -> CursorMut<'_, K, V, C> {
        let walker = Walker::first(self.raw.nodes(), self.raw.root(), order);
        CursorMut { raw: &mut self.raw, walker }
    }

    /// Returns a mutable cursor on the end sentinel of `order`.
    pub fn cursor_end_mut(&mut self, order: TraversalOrder) -> CursorMut<'_, K, V, C> {
        CursorMut {
            raw: &mut self.raw,
            walker: Walker::end(order),
        }
    }

    /// Returns an ascending cursor on the first entry whose key is not less than `key`, or
    /// on the end sentinel if there is none.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    ///
    /// let map = AvlMap::from([(10, "a"), (20, "b"), (30, "c")]);
    /// assert_eq!(map.lower_bound(&20).key(), Ok(&20));
    /// assert_eq!(map.lower_bound(&21).key(), Ok(&30));
    /// assert!(map.lower_bound(&31).is_end());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn lower_bound<Q>(&self, key: &Q) -> Cursor<'_, K, V, C>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        Cursor {
            raw: &self.raw,
            walker: Walker::ascending_at(self.raw.bound(key, true)),
        }
    }

    /// Returns an ascending cursor on the first entry whose key is greater than `key`, or
    /// on the end sentinel if there is none.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    ///
    /// let map = AvlMap::from([(10, "a"), (20, "b"), (30, "c")]);
    /// assert_eq!(map.upper_bound(&20).key(), Ok(&30));
    /// assert_eq!(map.upper_bound(&5).key(), Ok(&10));
    /// assert!(map.upper_bound(&30).is_end());
    /// ```
    pub fn upper_bound<Q>(&self, key: &Q) -> Cursor<'_, K, V, C>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        Cursor {
            raw: &self.raw,
            walker: Walker::ascending_at(self.raw.bound(key, false)),
        }
    }

    /// Mutable counterpart of [`lower_bound`](AvlMap::lower_bound).
    pub fn lower_bound_mut<Q>(&mut self, key: &Q) -> CursorMut<'_, K, V, C>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let walker = Walker::ascending_at(self.raw.bound(key, true));
        CursorMut { raw: &mut self.raw, walker }
    }

    /// Mutable counterpart of [`upper_bound`](AvlMap::upper_bound).
    pub fn upper_bound_mut<Q>(&mut self, key: &Q) -> CursorMut<'_, K, V, C>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let walker = Walker::ascending_at(self.raw.bound(key, false));
        CursorMut { raw: &mut self.raw, walker }
    }
}

impl<'a, K, V, C> Cursor<'a, K, V, C> {
    /// Returns the order this cursor walks in.
    #[must_use]
    pub fn order(&self) -> TraversalOrder {
        self.walker.order()
    }

    /// Returns `true` if the cursor sits on the end sentinel.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.walker.current().is_none()
    }

    /// Returns the entry under the cursor.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidIterator`] at the end sentinel.
    pub fn get(&self) -> Result<(&'a K, &'a V), Error> {
        let node = self.walker.current().ok_or(Error::InvalidIterator)?;
        Ok(self.raw.key_value(node))
    }

    /// Returns the key under the cursor.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidIterator`] at the end sentinel.
    pub fn key(&self) -> Result<&'a K, Error> {
        self.get().map(|(k, _)| k)
    }

    /// Returns the value under the cursor.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidIterator`] at the end sentinel.
    pub fn value(&self) -> Result<&'a V, Error> {
        self.get().map(|(_, v)| v)
    }

    /// Moves to the next entry of the order, or onto the end sentinel after the last one.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidIterator`] if the cursor is already on the end sentinel.
    pub fn move_next(&mut self) -> Result<(), Error> {
        self.walker.advance(self.raw.nodes())
    }

    /// Moves to the previous entry of the order. From the end sentinel this is the last
    /// entry. On failure the cursor does not move.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidIterator`] on the first entry, or at the end of an empty map.
    /// - [`Error::UnsupportedInOrder`] for breadth-first cursors.
    pub fn move_prev(&mut self) -> Result<(), Error> {
        self.walker.retreat(self.raw.nodes(), self.raw.root())
    }
}

impl<K, V, C> Clone for Cursor<'_, K, V, C> {
    fn clone(&self) -> Self {
        Cursor {
            raw: self.raw,
            walker: self.walker.clone(),
        }
    }
}

impl<K, V, C> PartialEq for Cursor<'_, K, V, C> {
    /// Two cursors are equal when they walk the same map in the same order and point at the
    /// same entry, or are both at the end.
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.raw, other.raw)
            && self.walker.order() == other.walker.order()
            && self.walker.current() == other.walker.current()
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for Cursor<'_, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("order", &self.order())
            .field("current", &self.get().ok())
            .finish()
    }
}

impl<'a, K, V, C> CursorMut<'a, K, V, C> {
    /// Returns the order this cursor walks in.
    #[must_use]
    pub fn order(&self) -> TraversalOrder {
        self.walker.order()
    }

    /// Returns `true` if the cursor sits on the end sentinel.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.walker.current().is_none()
    }

    /// Returns the entry under the cursor.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidIterator`] at the end sentinel.
    pub fn get(&self) -> Result<(&K, &V), Error> {
        let node = self.walker.current().ok_or(Error::InvalidIterator)?;
        Ok(self.raw.key_value(node))
    }

    /// Returns the entry under the cursor with a mutable value.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidIterator`] at the end sentinel.
    pub fn get_mut(&mut self) -> Result<(&K, &mut V), Error> {
        let node = self.walker.current().ok_or(Error::InvalidIterator)?;
        Ok(self.raw.key_value_mut(node))
    }

    /// Returns the key under the cursor.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidIterator`] at the end sentinel.
    pub fn key(&self) -> Result<&K, Error> {
        self.get().map(|(k, _)| k)
    }

    /// Returns the value under the cursor.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidIterator`] at the end sentinel.
    pub fn value(&self) -> Result<&V, Error> {
        self.get().map(|(_, v)| v)
    }

    /// Returns the value under the cursor, mutably.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidIterator`] at the end sentinel.
    pub fn value_mut(&mut self) -> Result<&mut V, Error> {
        self.get_mut().map(|(_, v)| v)
    }

    /// Moves to the next entry of the order.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidIterator`] if the cursor is already on the end sentinel.
    pub fn move_next(&mut self) -> Result<(), Error> {
        self.walker.advance(self.raw.nodes())
    }

    /// Moves to the previous entry of the order. From the end sentinel this is the last
    /// entry.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidIterator`] on the first entry, or at the end of an empty map.
    /// - [`Error::UnsupportedInOrder`] for breadth-first cursors.
    pub fn move_prev(&mut self) -> Result<(), Error> {
        self.walker.retreat(self.raw.nodes(), self.raw.root())
    }

    /// Removes the entry under the cursor and moves the cursor to the entry that followed
    /// it in the cursor's order, or onto the end sentinel.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedInOrder`] for breadth-first cursors, because rebalancing after
    ///   the removal reshapes the levels still waiting in the queue.
    /// - [`Error::InvalidIterator`] at the end sentinel.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::{AvlMap, TraversalOrder};
    ///
    /// let mut map: AvlMap<i32, ()> = (1..=6).map(|k| (k, ())).collect();
    /// let mut cursor = map.cursor_mut(TraversalOrder::Descending);
    /// while let Ok(&key) = cursor.key() {
    ///     if key % 2 == 0 {
    ///         cursor.remove_current()?;
    ///     } else {
    ///         cursor.move_next()?;
    ///     }
    /// }
    /// assert_eq!(map.keys().copied().collect::<Vec<_>>(), [1, 3, 5]);
    /// # Ok::<(), avl_dict::Error>(())
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove_current(&mut self) -> Result<(K, V), Error> {
        if !self.walker.order().is_sorted() {
            return Err(Error::UnsupportedInOrder(self.walker.order()));
        }
        let node = self.walker.current().ok_or(Error::InvalidIterator)?;
        let next = self.walker.peek_next(self.raw.nodes());
        let pair = self.raw.remove_handle(node);
        self.walker.skip_removed(next);
        Ok(pair)
    }

    /// Returns a read-only cursor at the same position, borrowing this one.
    pub fn as_cursor(&self) -> Cursor<'_, K, V, C> {
        Cursor {
            raw: &*self.raw,
            walker: self.walker.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for CursorMut<'_, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorMut")
            .field("order", &self.order())
            .field("current", &self.get().ok())
            .finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn map(n: u16) -> AvlMap<u16, u16> {
        (0..n).map(|k| (k, k * 10)).collect()
    }

    #[test]
    fn walk_back_from_end() {
        let map = map(20);
        for order in [TraversalOrder::Ascending, TraversalOrder::Descending] {
            let mut cursor = map.cursor_end(order);
            let mut keys = Vec::new();
            while cursor.move_prev().is_ok() {
                keys.push(*cursor.key().unwrap());
            }
            let mut forward: Vec<u16> = map.iter_in(order).map(|(k, _)| *k).collect();
            forward.reverse();
            assert_eq!(keys, forward, "{order}");
            // Stuck on the first entry after the failed step.
            assert_eq!(cursor, map.cursor(order));
        }
    }

    #[test]
    fn empty_map_cursors() {
        let map: AvlMap<u16, u16> = AvlMap::new();
        for order in TraversalOrder::ALL {
            let mut cursor = map.cursor(order);
            assert!(cursor.is_end());
            assert_eq!(cursor.move_next(), Err(Error::InvalidIterator));
        }
        assert_eq!(map.cursor_end(TraversalOrder::Ascending).move_prev(), Err(Error::InvalidIterator));
    }

    #[test]
    fn breadth_cursor_is_forward_only() {
        let mut map = map(7);
        let mut cursor = map.cursor(TraversalOrder::Breadth);
        cursor.move_next().unwrap();
        assert_eq!(cursor.move_prev(), Err(Error::UnsupportedInOrder(TraversalOrder::Breadth)));

        let mut cursor = map.cursor_mut(TraversalOrder::Breadth);
        assert_eq!(cursor.remove_current(), Err(Error::UnsupportedInOrder(TraversalOrder::Breadth)));
        assert_eq!(map.len(), 7);
    }

    #[test]
    fn remove_every_entry_ascending() {
        let mut map = map(100);
        let mut cursor = map.cursor_mut(TraversalOrder::Ascending);
        let mut removed = Vec::new();
        while !cursor.is_end() {
            removed.push(cursor.remove_current().unwrap().0);
        }
        assert_eq!(cursor.remove_current(), Err(Error::InvalidIterator));
        assert_eq!(removed, (0..100).collect::<Vec<_>>());
        assert!(map.is_empty());
        map.raw.validate_invariants();
    }

    #[test]
    fn remove_then_step_back() {
        let mut map = map(10);
        let mut cursor = map.lower_bound_mut(&5);
        assert_eq!(cursor.remove_current(), Ok((5, 50)));
        assert_eq!(cursor.key(), Ok(&6));
        cursor.move_prev().unwrap();
        assert_eq!(cursor.key(), Ok(&4));
        *cursor.value_mut().unwrap() = 0;
        assert_eq!(cursor.as_cursor().value(), Ok(&0));
        map.raw.validate_invariants();
        assert!(!map.contains_key(&5));
    }

    #[test]
    fn upper_bound_mut_past_everything() {
        let mut map = map(3);
        let mut cursor = map.upper_bound_mut(&2);
        assert!(cursor.is_end());
        cursor.move_prev().unwrap();
        assert_eq!(cursor.get(), Ok((&2, &20)));
    }

    #[test]
    fn cursors_over_different_maps_differ() {
        let a = map(3);
        let b = map(3);
        assert_ne!(a.cursor(TraversalOrder::Ascending), b.cursor(TraversalOrder::Ascending));
        assert_eq!(a.cursor_end(TraversalOrder::Ascending), a.cursor_end(TraversalOrder::Ascending));
    }
}
