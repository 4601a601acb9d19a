//! Navigation over parent links, shared by every iterator and cursor.

use alloc::collections::VecDeque;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Node, Side};
use crate::{Error, TraversalOrder};

/// Follows `side` links from `node` as far as they go.
pub(crate) fn extreme<K>(nodes: &Arena<Node<K>>, mut node: Handle, side: Side) -> Handle {
    while let Some(child) = nodes.get(node).child(side) {
        node = child;
    }
    node
}

/// The in-order neighbour of `node` towards `side`: `Right` gives the successor, `Left`
/// the predecessor.
pub(crate) fn step<K>(nodes: &Arena<Node<K>>, node: Handle, side: Side) -> Option<Handle> {
    if let Some(child) = nodes.get(node).child(side) {
        return Some(extreme(nodes, child, side.flip()));
    }

    let mut child = node;
    let mut parent = nodes.get(node).parent();
    while let Some(p) = parent {
        if nodes.get(p).child(side) != Some(child) {
            return Some(p);
        }
        child = p;
        parent = nodes.get(p).parent();
    }
    None
}

#[inline]
pub(crate) fn successor<K>(nodes: &Arena<Node<K>>, node: Handle) -> Option<Handle> {
    step(nodes, node, Side::Right)
}

#[inline]
pub(crate) fn predecessor<K>(nodes: &Arena<Node<K>>, node: Handle) -> Option<Handle> {
    step(nodes, node, Side::Left)
}

const fn forward(order: TraversalOrder) -> Side {
    match order {
        TraversalOrder::Descending => Side::Left,
        TraversalOrder::Ascending | TraversalOrder::Breadth => Side::Right,
    }
}

#[derive(Clone, Debug)]
enum Position {
    Sorted(Option<Handle>),
    // The front of the queue is the current node.
    Breadth(VecDeque<Handle>),
}

/// A position in one traversal order. Reaching the end of the order leaves the walker on
/// the end sentinel, from which only sorted orders can step back.
#[derive(Clone, Debug)]
pub(crate) struct Walker {
    order: TraversalOrder,
    position: Position,
}

impl Walker {
    /// Positions a walker on the first node of `order`.
    pub(crate) fn first<K>(nodes: &Arena<Node<K>>, root: Option<Handle>, order: TraversalOrder) -> Self {
        let position = match order {
            TraversalOrder::Breadth => Position::Breadth(root.into_iter().collect()),
            sorted => Position::Sorted(root.map(|r| extreme(nodes, r, forward(sorted).flip()))),
        };
        Self { order, position }
    }

    /// Positions a walker on the end sentinel of `order`.
    pub(crate) fn end(order: TraversalOrder) -> Self {
        let position = match order {
            TraversalOrder::Breadth => Position::Breadth(VecDeque::new()),
            TraversalOrder::Ascending | TraversalOrder::Descending => Position::Sorted(None),
        };
        Self { order, position }
    }

    /// Positions an ascending walker on `node`, or on the end sentinel.
    pub(crate) const fn ascending_at(node: Option<Handle>) -> Self {
        Self {
            order: TraversalOrder::Ascending,
            position: Position::Sorted(node),
        }
    }

    pub(crate) const fn order(&self) -> TraversalOrder {
        self.order
    }

    pub(crate) fn current(&self) -> Option<Handle> {
        match &self.position {
            Position::Sorted(current) => *current,
            Position::Breadth(queue) => queue.front().copied(),
        }
    }

    /// The node that follows the current one, without moving.
    pub(crate) fn peek_next<K>(&self, nodes: &Arena<Node<K>>) -> Option<Handle> {
        match &self.position {
            Position::Sorted(current) => current.and_then(|h| step(nodes, h, forward(self.order))),
            Position::Breadth(queue) => {
                let front = *queue.front()?;
                queue.get(1).copied().or_else(|| {
                    let node = nodes.get(front);
                    node.left().or(node.right())
                })
            }
        }
    }

    /// Moves to the next node of the order.
    ///
    /// # Errors
    /// [`Error::InvalidIterator`] if the walker is on the end sentinel.
    pub(crate) fn advance<K>(&mut self, nodes: &Arena<Node<K>>) -> Result<(), Error> {
        let side = forward(self.order);
        match &mut self.position {
            Position::Sorted(current) => {
                let node = current.ok_or(Error::InvalidIterator)?;
                *current = step(nodes, node, side);
            }
            Position::Breadth(queue) => {
                let node = queue.pop_front().ok_or(Error::InvalidIterator)?;
                let node = nodes.get(node);
                queue.extend(node.left());
                queue.extend(node.right());
            }
        }
        Ok(())
    }

    /// Moves to the previous node of the order. From the end sentinel this is the last node.
    ///
    /// # Errors
    /// - [`Error::UnsupportedInOrder`] for breadth-first walkers.
    /// - [`Error::InvalidIterator`] on the first node, or on the end sentinel of an empty tree.
    pub(crate) fn retreat<K>(&mut self, nodes: &Arena<Node<K>>, root: Option<Handle>) -> Result<(), Error> {
        let back = forward(self.order).flip();
        match &mut self.position {
            Position::Breadth(_) => Err(Error::UnsupportedInOrder(self.order)),
            Position::Sorted(current) => {
                let previous = match *current {
                    Some(node) => step(nodes, node, back),
                    None => root.map(|r| extreme(nodes, r, back.flip())),
                };
                *current = Some(previous.ok_or(Error::InvalidIterator)?);
                Ok(())
            }
        }
    }

    /// Jumps to `node`, which must be the node [`peek_next`](Self::peek_next) reported
    /// before the current node was unlinked.
    pub(crate) fn skip_removed(&mut self, next: Option<Handle>) {
        match &mut self.position {
            Position::Sorted(current) => *current = next,
            // Removing reshapes the levels, so callers reject it for breadth walkers.
            Position::Breadth(_) => unreachable!("`Walker::skip_removed()` - breadth-first walkers do not remove"),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    // Perfect tree of 2, 1, 3 (root first).
    fn small_tree() -> (Arena<Node<u8>>, Handle) {
        let mut nodes = Arena::new();
        let root = nodes.alloc(Node::new_leaf(2, Handle::new(0), None));
        let left = nodes.alloc(Node::new_leaf(1, Handle::new(1), Some(root)));
        let right = nodes.alloc(Node::new_leaf(3, Handle::new(2), Some(root)));
        nodes.get_mut(root).set_child(Side::Left, Some(left));
        nodes.get_mut(root).set_child(Side::Right, Some(right));
        nodes.get_mut(root).set_height(2);
        (nodes, root)
    }

    fn collect(nodes: &Arena<Node<u8>>, mut walker: Walker) -> Vec<u8> {
        let mut keys = Vec::new();
        while let Some(h) = walker.current() {
            keys.push(*nodes.get(h).key());
            walker.advance(nodes).unwrap();
        }
        keys
    }

    #[test]
    fn all_orders() {
        let (nodes, root) = small_tree();
        assert_eq!(collect(&nodes, Walker::first(&nodes, Some(root), TraversalOrder::Ascending)), [1, 2, 3]);
        assert_eq!(collect(&nodes, Walker::first(&nodes, Some(root), TraversalOrder::Descending)), [3, 2, 1]);
        assert_eq!(collect(&nodes, Walker::first(&nodes, Some(root), TraversalOrder::Breadth)), [2, 1, 3]);
    }

    #[test]
    fn advance_past_end_fails() {
        let (nodes, _) = small_tree();
        let mut walker = Walker::end(TraversalOrder::Ascending);
        assert_eq!(walker.advance(&nodes), Err(Error::InvalidIterator));
        let mut walker = Walker::end(TraversalOrder::Breadth);
        assert_eq!(walker.advance(&nodes), Err(Error::InvalidIterator));
    }

    #[test]
    fn retreat_from_end_reaches_last() {
        let (nodes, root) = small_tree();
        let mut walker = Walker::end(TraversalOrder::Descending);
        walker.retreat(&nodes, Some(root)).unwrap();
        assert_eq!(walker.current().map(|h| *nodes.get(h).key()), Some(1));
        walker.retreat(&nodes, Some(root)).unwrap();
        assert_eq!(walker.current().map(|h| *nodes.get(h).key()), Some(2));
    }

    #[test]
    fn retreat_before_first_fails_and_stays() {
        let (nodes, root) = small_tree();
        let mut walker = Walker::first(&nodes, Some(root), TraversalOrder::Ascending);
        let first = walker.current();
        assert_eq!(walker.retreat(&nodes, Some(root)), Err(Error::InvalidIterator));
        assert_eq!(walker.current(), first);

        let mut empty = Walker::end(TraversalOrder::Ascending);
        assert_eq!(empty.retreat(&nodes, None), Err(Error::InvalidIterator));
    }

    #[test]
    fn breadth_cannot_retreat() {
        let (nodes, root) = small_tree();
        let mut walker = Walker::first(&nodes, Some(root), TraversalOrder::Breadth);
        assert_eq!(
            walker.retreat(&nodes, Some(root)),
            Err(Error::UnsupportedInOrder(TraversalOrder::Breadth))
        );
    }

    #[test]
    fn peek_matches_advance() {
        let (nodes, root) = small_tree();
        for order in TraversalOrder::ALL {
            let mut walker = Walker::first(&nodes, Some(root), order);
            while walker.current().is_some() {
                let peeked = walker.peek_next(&nodes);
                walker.advance(&nodes).unwrap();
                assert_eq!(walker.current(), peeked);
            }
        }
    }
}
