use core::fmt;
use core::iter::FusedIterator;
use core::marker::PhantomData;

use super::AvlMap;
use crate::TraversalOrder;
use crate::raw::{Arena, Node, Walker};

/// An iterator over the entries of an `AvlMap` in a chosen [`TraversalOrder`].
///
/// This `struct` is created by the [`iter_in`] method on [`AvlMap`].
///
/// [`iter_in`]: AvlMap::iter_in
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Traverse<'a, K, V> {
    nodes: &'a Arena<Node<K>>,
    values: &'a Arena<V>,
    walker: Walker,
    remaining: usize,
}

/// A mutable iterator over the entries of an `AvlMap` in a chosen [`TraversalOrder`].
///
/// This `struct` is created by the [`iter_mut_in`] method on [`AvlMap`].
///
/// [`iter_mut_in`]: AvlMap::iter_mut_in
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct TraverseMut<'a, K, V> {
    nodes: &'a Arena<Node<K>>,
    values: *mut Arena<V>,
    walker: Walker,
    remaining: usize,
    _marker: PhantomData<&'a mut V>,
}

// SAFETY: TraverseMut reads keys like `&K` and writes values like `&mut V`.
unsafe impl<K: Sync, V: Send> Send for TraverseMut<'_, K, V> {}
unsafe impl<K: Sync, V: Sync> Sync for TraverseMut<'_, K, V> {}

impl<K, V, C> AvlMap<K, V, C> {
    /// Gets an iterator over the entries of the map in the given order.
    ///
    /// Every entry is visited exactly once whatever the order; only the sequence differs.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::{AvlMap, TraversalOrder};
    ///
    /// let map: AvlMap<i32, ()> = (1..=7).map(|k| (k, ())).collect();
    ///
    /// let keys = |order| map.iter_in(order).map(|(k, _)| *k).collect::<Vec<_>>();
    /// assert_eq!(keys(TraversalOrder::Ascending), [1, 2, 3, 4, 5, 6, 7]);
    /// assert_eq!(keys(TraversalOrder::Descending), [7, 6, 5, 4, 3, 2, 1]);
    /// assert_eq!(keys(TraversalOrder::Breadth), [4, 2, 6, 1, 3, 5, 7]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) to create the iterator. Sorted orders take O(1) amortized per step;
    /// breadth-first order keeps a queue of up to one tree level.
    pub fn iter_in(&self, order: TraversalOrder) -> Traverse<'_, K, V> {
        let (nodes, values) = self.raw.parts();
        Traverse {
            nodes,
            values,
            walker: Walker::first(nodes, self.raw.root(), order),
            remaining: self.raw.len(),
        }
    }

    /// Gets a mutable iterator over the entries of the map in the given order.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::{AvlMap, TraversalOrder};
    ///
    /// let mut map = AvlMap::from([(1, 0), (2, 0), (3, 0)]);
    /// for (rank, (_, value)) in map.iter_mut_in(TraversalOrder::Descending).enumerate() {
    ///     *value = rank;
    /// }
    /// assert_eq!(map.values().copied().collect::<Vec<_>>(), [2, 1, 0]);
    /// ```
    pub fn iter_mut_in(&mut self, order: TraversalOrder) -> TraverseMut<'_, K, V> {
        let root = self.raw.root();
        let remaining = self.raw.len();
        let (nodes, values) = self.raw.parts_mut();
        TraverseMut {
            nodes,
            values: core::ptr::from_mut(values),
            walker: Walker::first(nodes, root, order),
            remaining,
            _marker: PhantomData,
        }
    }

    /// Calls `visitor` on every entry in the given order and hands the visitor back, so
    /// that whatever it accumulated can be read afterwards.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::{AvlMap, TraversalOrder};
    ///
    /// let map = AvlMap::from([(3, "c"), (1, "a"), (2, "b")]);
    ///
    /// let mut seen = String::new();
    /// map.traverse(TraversalOrder::Descending, |_, v| seen.push_str(v));
    /// assert_eq!(seen, "cba");
    /// ```
    pub fn traverse<F>(&self, order: TraversalOrder, mut visitor: F) -> F
    where
        F: FnMut(&K, &V),
    {
        for (k, v) in self.iter_in(order) {
            visitor(k, v);
        }
        visitor
    }

    /// Like [`traverse`](AvlMap::traverse), but stops at the first error the visitor
    /// returns.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `visitor`; later entries are not visited.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::{AvlMap, Error, TraversalOrder};
    /// use avl_dict::reduce::KeyValueSum;
    ///
    /// let map = AvlMap::from([(1i32, "one"), (2, "two")]);
    /// let mut sum = KeyValueSum::new();
    /// map.try_traverse(TraversalOrder::Ascending, |k, v| sum.visit(k, v))?;
    /// assert_eq!(sum.key_sum(), &3);
    /// assert_eq!(sum.values(), "one two");
    /// # Ok::<(), Error>(())
    /// ```
    pub fn try_traverse<F, E>(&self, order: TraversalOrder, mut visitor: F) -> Result<F, E>
    where
        F: FnMut(&K, &V) -> Result<(), E>,
    {
        for (k, v) in self.iter_in(order) {
            visitor(k, v)?;
        }
        Ok(visitor)
    }
}

impl<K, V> Traverse<'_, K, V> {
    /// Returns the order this iterator walks in.
    #[must_use]
    pub fn order(&self) -> TraversalOrder {
        self.walker.order()
    }
}

impl<'a, K, V> Iterator for Traverse<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let h = self.walker.current()?;
        let node = self.nodes.get(h);
        // Cannot fail: the walker is on a node.
        let _ = self.walker.advance(self.nodes);
        self.remaining -= 1;
        Some((node.key(), self.values.get(node.value())))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Traverse<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for Traverse<'_, K, V> {}

impl<K, V> Clone for Traverse<'_, K, V> {
    fn clone(&self) -> Self {
        Traverse {
            nodes: self.nodes,
            values: self.values,
            walker: self.walker.clone(),
            remaining: self.remaining,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Traverse<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<K, V> TraverseMut<'_, K, V> {
    /// Returns the order this iterator walks in.
    #[must_use]
    pub fn order(&self) -> TraversalOrder {
        self.walker.order()
    }
}

impl<'a, K, V> Iterator for TraverseMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        let h = self.walker.current()?;
        let node = self.nodes.get(h);
        let _ = self.walker.advance(self.nodes);
        self.remaining -= 1;
        // SAFETY: `values` comes from the `&'a mut` borrow taken by `iter_mut_in`, and every
        // traversal order visits each node once.
        let value = unsafe { Arena::get_mut_ptr(self.values, node.value()) };
        Some((node.key(), value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for TraverseMut<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for TraverseMut<'_, K, V> {}

impl<K, V> fmt::Debug for TraverseMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraverseMut")
            .field("order", &self.walker.order())
            .field("remaining", &self.remaining)
            .finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn every_order_visits_every_entry_once() {
        let map: AvlMap<u16, u16> = (0..100).rev().map(|k| (k, k)).collect();
        for order in TraversalOrder::ALL {
            let mut keys: Vec<u16> = map.iter_in(order).map(|(k, _)| *k).collect();
            assert_eq!(keys.len(), 100, "{order}");
            keys.sort_unstable();
            keys.dedup();
            assert_eq!(keys.len(), 100, "{order}");
        }
    }

    #[test]
    fn breadth_visits_by_level() {
        let map: AvlMap<u16, ()> = (0..50).map(|k| (k, ())).collect();
        let mut depths = Vec::new();
        for (k, _) in map.iter_in(TraversalOrder::Breadth) {
            let mut depth = 0;
            let mut h = map.raw.search(k);
            while let Some(node) = h {
                h = map.raw.nodes().get(node).parent();
                depth += 1;
            }
            depths.push(depth);
        }
        assert!(depths.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn try_traverse_stops_early() {
        let map: AvlMap<u16, ()> = (0..10).map(|k| (k, ())).collect();
        let mut visited = 0;
        let result = map.try_traverse(TraversalOrder::Ascending, |k, ()| {
            visited += 1;
            if *k == 4 { Err(*k) } else { Ok(()) }
        });
        assert!(matches!(result, Err(4)));
        assert_eq!(visited, 5);
    }

    #[test]
    fn len_counts_down() {
        let map: AvlMap<u16, ()> = (0..5).map(|k| (k, ())).collect();
        let mut iter = map.iter_in(TraversalOrder::Breadth);
        assert_eq!(iter.len(), 5);
        iter.next();
        assert_eq!(iter.len(), 4);
        assert_eq!(iter.order(), TraversalOrder::Breadth);
    }
}
