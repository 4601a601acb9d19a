use alloc::vec::Vec;
use core::borrow::Borrow;
use core::cmp::Ordering;
use core::mem;

use super::arena::Arena;
use super::balance;
use super::handle::Handle;
use super::node::{Node, Side};
use super::walk;
use crate::compare::Comparator;

/// The AVL tree backing `AvlMap`.
///
/// Nodes and values live in separate arenas so that mutable iteration can hand out
/// `&mut V` while it keeps reading node links.
#[derive(Clone)]
pub(crate) struct RawAvlMap<K, V, C> {
    nodes: Arena<Node<K>>,
    values: Arena<V>,
    root: Option<Handle>,
    len: usize,
    comparator: C,
}

impl<K, V, C> RawAvlMap<K, V, C> {
    pub(crate) const fn new(comparator: C) -> Self {
        Self {
            nodes: Arena::new(),
            values: Arena::new(),
            root: None,
            len: 0,
            comparator,
        }
    }

    pub(crate) fn with_capacity(capacity: usize, comparator: C) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            values: Arena::with_capacity(capacity),
            root: None,
            len: 0,
            comparator,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn capacity(&self) -> usize {
        self.values.capacity().min(self.nodes.capacity())
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        self.nodes.reserve(additional);
        self.values.reserve(additional);
    }

    pub(crate) const fn comparator(&self) -> &C {
        &self.comparator
    }

    pub(crate) const fn root(&self) -> Option<Handle> {
        self.root
    }

    /// Height of the tree; the empty tree has height 0.
    pub(crate) fn height(&self) -> usize {
        usize::from(balance::height(&self.nodes, self.root))
    }

    pub(crate) const fn nodes(&self) -> &Arena<Node<K>> {
        &self.nodes
    }

    pub(crate) const fn parts(&self) -> (&Arena<Node<K>>, &Arena<V>) {
        (&self.nodes, &self.values)
    }

    /// Splits the borrow so values can be written while node links are read.
    pub(crate) fn parts_mut(&mut self) -> (&Arena<Node<K>>, &mut Arena<V>) {
        (&self.nodes, &mut self.values)
    }

    pub(crate) fn key_value(&self, node: Handle) -> (&K, &V) {
        let node = self.nodes.get(node);
        (node.key(), self.values.get(node.value()))
    }

    pub(crate) fn key_value_mut(&mut self, node: Handle) -> (&K, &mut V) {
        let node = self.nodes.get(node);
        (node.key(), self.values.get_mut(node.value()))
    }

    pub(crate) fn first(&self) -> Option<Handle> {
        self.root.map(|r| walk::extreme(&self.nodes, r, Side::Left))
    }

    pub(crate) fn last(&self) -> Option<Handle> {
        self.root.map(|r| walk::extreme(&self.nodes, r, Side::Right))
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.values.clear();
        self.root = None;
        self.len = 0;
    }

    /// Moves every pair out in ascending order, leaving the tree empty.
    /// O(n): nothing is rebalanced on the way.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<(K, V)> {
        let mut order = Vec::with_capacity(self.len);
        let mut current = self.first();
        while let Some(h) = current {
            order.push(h);
            current = walk::step(&self.nodes, h, Side::Right);
        }

        let pairs = order
            .into_iter()
            .map(|h| {
                let (key, value) = self.nodes.take(h).into_parts();
                (key, self.values.take(value))
            })
            .collect();
        self.clear();
        pairs
    }

    /// Unlinks `target` and returns its pair. Every other handle stays valid.
    pub(crate) fn remove_handle(&mut self, target: Handle) -> (K, V) {
        let (parent, left, right) = {
            let node = self.nodes.get(target);
            (node.parent(), node.left(), node.right())
        };

        let rebalance_from = match (left, right) {
            (None, child) | (child, None) => {
                balance::replace_child(&mut self.nodes, &mut self.root, parent, target, child);
                parent
            }
            (Some(left), Some(right)) => {
                // The in-order successor takes the place of `target`.
                let successor = walk::extreme(&self.nodes, right, Side::Left);
                let from = if successor == right {
                    successor
                } else {
                    let (successor_parent, successor_right) = {
                        let node = self.nodes.get(successor);
                        (node.parent(), node.right())
                    };
                    balance::replace_child(
                        &mut self.nodes,
                        &mut self.root,
                        successor_parent,
                        successor,
                        successor_right,
                    );
                    self.nodes.get_mut(successor).set_child(Side::Right, Some(right));
                    self.nodes.get_mut(right).set_parent(Some(successor));
                    successor_parent.expect("`remove_handle()` - successor below the right child has a parent")
                };

                balance::replace_child(&mut self.nodes, &mut self.root, parent, target, Some(successor));
                self.nodes.get_mut(successor).set_child(Side::Left, Some(left));
                self.nodes.get_mut(left).set_parent(Some(successor));
                let height = self.nodes.get(target).height();
                self.nodes.get_mut(successor).set_height(height);
                Some(from)
            }
        };

        let (key, value) = self.nodes.take(target).into_parts();
        let value = self.values.take(value);
        self.len -= 1;
        balance::rebalance_upwards(&mut self.nodes, &mut self.root, rebalance_from);
        (key, value)
    }

    pub(crate) fn pop_first(&mut self) -> Option<(K, V)> {
        let first = self.first()?;
        Some(self.remove_handle(first))
    }

    pub(crate) fn pop_last(&mut self) -> Option<(K, V)> {
        let last = self.last()?;
        Some(self.remove_handle(last))
    }
}

impl<K, V, C> RawAvlMap<K, V, C> {
    /// Finds the node holding `key`.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let mut current = self.root;
        while let Some(h) = current {
            let node = self.nodes.get(h);
            current = match self.comparator.compare(key, node.key().borrow()) {
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
                Ordering::Equal => return Some(h),
            };
        }
        None
    }

    /// First node whose key is not less than `key` (`inclusive`), or greater than `key`.
    pub(crate) fn bound<Q>(&self, key: &Q, inclusive: bool) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let mut current = self.root;
        let mut found = None;
        while let Some(h) = current {
            let node = self.nodes.get(h);
            let ordering = self.comparator.compare(node.key().borrow(), key);
            if ordering == Ordering::Greater || (inclusive && ordering == Ordering::Equal) {
                found = Some(h);
                current = node.left();
            } else {
                current = node.right();
            }
        }
        found
    }

    /// Inserts or overwrites. Returns the node now holding `key` and the replaced value.
    pub(crate) fn insert(&mut self, key: K, value: V) -> (Handle, Option<V>)
    where
        C: Comparator<K>,
    {
        let Some(mut current) = self.root else {
            let value = self.values.alloc(value);
            let node = self.nodes.alloc(Node::new_leaf(key, value, None));
            self.root = Some(node);
            self.len = 1;
            return (node, None);
        };

        let side = loop {
            let node = self.nodes.get(current);
            let side = match self.comparator.compare(&key, node.key()) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => {
                    let slot = node.value();
                    let old = mem::replace(self.values.get_mut(slot), value);
                    return (current, Some(old));
                }
            };
            match node.child(side) {
                Some(child) => current = child,
                None => break side,
            }
        };

        let value = self.values.alloc(value);
        let node = self.nodes.alloc(Node::new_leaf(key, value, Some(current)));
        self.nodes.get_mut(current).set_child(side, Some(node));
        self.len += 1;
        balance::rebalance_upwards(&mut self.nodes, &mut self.root, Some(current));
        (node, None)
    }

    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let node = self.search(key)?;
        Some(self.remove_handle(node))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::compare::{Natural, Reverse};
    use alloc::collections::BTreeMap;
    use proptest::prelude::*;

    impl<K, V, C: Comparator<K>> RawAvlMap<K, V, C> {
        /// Checks links, ordering, heights, balance and counts. Panics on the first violation.
        pub(crate) fn validate_invariants(&self) {
            let Some(root) = self.root else {
                assert_eq!(self.len, 0, "empty tree with non-zero len");
                assert_eq!(self.nodes.len(), 0, "empty tree still owns nodes");
                assert_eq!(self.values.len(), 0, "empty tree still owns values");
                return;
            };
            assert_eq!(self.nodes.get(root).parent(), None, "root has a parent");

            let mut reachable = 0;
            let mut stack = alloc::vec![root];
            while let Some(h) = stack.pop() {
                reachable += 1;
                let node = self.nodes.get(h);
                for side in [Side::Left, Side::Right] {
                    if let Some(child) = node.child(side) {
                        assert_eq!(self.nodes.get(child).parent(), Some(h), "parent link of {child:?}");
                        stack.push(child);
                    }
                }

                let expected = 1 + balance::height(&self.nodes, node.left()).max(balance::height(&self.nodes, node.right()));
                assert_eq!(node.height(), expected, "stale height at {h:?}");
                let factor = balance::balance_factor(&self.nodes, h);
                assert!((-1..=1).contains(&factor), "balance factor {factor} at {h:?}");
            }
            assert_eq!(reachable, self.len, "len does not match reachable nodes");
            assert_eq!(self.nodes.len(), self.len, "orphaned nodes");
            assert_eq!(self.values.len(), self.len, "orphaned values");

            // In-order walk must be strictly increasing.
            let mut current = self.first();
            let mut previous: Option<Handle> = None;
            while let Some(h) = current {
                if let Some(p) = previous {
                    let ordering = self.comparator.compare(self.nodes.get(p).key(), self.nodes.get(h).key());
                    assert_eq!(ordering, Ordering::Less, "keys out of order at {h:?}");
                }
                previous = Some(h);
                current = walk::step(&self.nodes, h, Side::Right);
            }
            assert_eq!(previous, self.last());

            // An AVL tree of height h holds at least fib(h + 2) - 1 nodes.
            let (mut fib, mut next) = (0usize, 1usize);
            for _ in 0..self.height() + 2 {
                (fib, next) = (next, fib + next);
            }
            assert!(self.len >= fib - 1, "height {} is too tall for {} entries", self.height(), self.len);
        }
    }

    fn keys<V, C>(raw: &RawAvlMap<u16, V, C>) -> alloc::vec::Vec<u16> {
        let mut keys = alloc::vec::Vec::new();
        let mut current = raw.first();
        while let Some(h) = current {
            keys.push(*raw.nodes.get(h).key());
            current = walk::step(&raw.nodes, h, Side::Right);
        }
        keys
    }

    #[test]
    fn sequential_inserts_stay_balanced() {
        let mut raw = RawAvlMap::new(Natural);
        for key in 0u16..1000 {
            let (_, old) = raw.insert(key, u32::from(key));
            assert_eq!(old, None);
        }
        raw.validate_invariants();
        assert_eq!(raw.len(), 1000);
        assert!(raw.height() <= 15);
    }

    #[test]
    fn insert_overwrites_in_place() {
        let mut raw = RawAvlMap::new(Natural);
        let (first, _) = raw.insert(7u16, "a");
        let (second, old) = raw.insert(7, "b");
        assert_eq!(first, second);
        assert_eq!(old, Some("a"));
        assert_eq!(raw.len(), 1);
        assert_eq!(raw.key_value(first), (&7, &"b"));
    }

    #[test]
    fn remove_keeps_other_handles() {
        let mut raw = RawAvlMap::new(Natural);
        let handles: alloc::vec::Vec<_> = (0u16..64).map(|k| raw.insert(k, k).0).collect();
        // The root has two children, so its successor is relinked into its place.
        let root = raw.root().unwrap();
        let (root_key, _) = raw.remove_handle(root);
        raw.validate_invariants();

        for (key, &h) in (0u16..64).zip(&handles) {
            if key != root_key {
                assert_eq!(raw.key_value(h), (&key, &key));
            }
        }
    }

    #[test]
    fn bounds() {
        let mut raw = RawAvlMap::new(Natural);
        for key in [10u16, 20, 30] {
            raw.insert(key, ());
        }
        let key_at = |h: Option<Handle>| h.map(|h| *raw.nodes.get(h).key());
        assert_eq!(key_at(raw.bound(&20, true)), Some(20));
        assert_eq!(key_at(raw.bound(&20, false)), Some(30));
        assert_eq!(key_at(raw.bound(&5, false)), Some(10));
        assert_eq!(key_at(raw.bound(&30, false)), None);
    }

    #[test]
    fn drain_empties_tree_in_order() {
        let mut raw = RawAvlMap::new(Reverse);
        for key in [3u16, 1, 2] {
            raw.insert(key, key * 10);
        }
        assert_eq!(raw.drain_to_vec(), [(3, 30), (2, 20), (1, 10)]);
        raw.validate_invariants();
    }

    proptest! {
        #[test]
        fn matches_btree_map(operations in prop::collection::vec(operation(), 0..512)) {
            let mut raw = RawAvlMap::new(Natural);
            let mut model = BTreeMap::new();

            for op in operations {
                match op {
                    Op::Insert(key, value) => {
                        let (_, old) = raw.insert(key, value);
                        prop_assert_eq!(old, model.insert(key, value));
                    }
                    Op::Remove(key) => {
                        prop_assert_eq!(raw.remove(&key), model.remove_entry(&key));
                    }
                    Op::PopFirst => prop_assert_eq!(raw.pop_first(), model.pop_first()),
                    Op::PopLast => prop_assert_eq!(raw.pop_last(), model.pop_last()),
                }
                raw.validate_invariants();
            }

            prop_assert_eq!(keys(&raw), model.keys().copied().collect::<alloc::vec::Vec<_>>());
        }

        #[test]
        fn insert_then_remove_all_empties(keys in prop::collection::hash_set(any::<u16>(), 0..256), seed in any::<u64>()) {
            let mut raw = RawAvlMap::new(Natural);
            let mut keys: alloc::vec::Vec<u16> = keys.into_iter().collect();
            for &key in &keys {
                raw.insert(key, ());
            }
            // Deterministic shuffle of the removal order.
            #[allow(clippy::cast_possible_truncation)]
            keys.sort_by_key(|&k| (u64::from(k).wrapping_mul(seed | 1)) as u16);
            for key in keys {
                prop_assert!(raw.remove(&key).is_some());
                raw.validate_invariants();
            }
            prop_assert!(raw.is_empty());
            prop_assert_eq!(raw.root(), None);
        }
    }

    #[derive(Clone, Debug)]
    enum Op {
        Insert(u16, u32),
        Remove(u16),
        PopFirst,
        PopLast,
    }

    fn operation() -> impl Strategy<Value = Op> {
        // A narrow key range so that removals and overwrites actually hit.
        prop_oneof![
            10 => (0u16..200, any::<u32>()).prop_map(|(k, v)| Op::Insert(k, v)),
            6 => (0u16..200).prop_map(Op::Remove),
            1 => Just(Op::PopFirst),
            1 => Just(Op::PopLast),
        ]
    }
}
