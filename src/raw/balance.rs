//! Height bookkeeping and AVL rotations over the node arena.

use core::cmp::max;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Node, Side};

#[inline]
pub(crate) fn height<K>(nodes: &Arena<Node<K>>, node: Option<Handle>) -> u8 {
    node.map_or(0, |h| nodes.get(h).height())
}

/// Height of the right subtree minus height of the left subtree.
pub(crate) fn balance_factor<K>(nodes: &Arena<Node<K>>, node: Handle) -> i16 {
    let n = nodes.get(node);
    i16::from(height(nodes, n.right())) - i16::from(height(nodes, n.left()))
}

fn fix_height<K>(nodes: &mut Arena<Node<K>>, node: Handle) {
    let n = nodes.get(node);
    let h = 1 + max(height(nodes, n.left()), height(nodes, n.right()));
    nodes.get_mut(node).set_height(h);
}

/// Points whatever referenced `old` (its parent, or the root slot) at `new`.
pub(crate) fn replace_child<K>(
    nodes: &mut Arena<Node<K>>,
    root: &mut Option<Handle>,
    parent: Option<Handle>,
    old: Handle,
    new: Option<Handle>,
) {
    match parent {
        None => *root = new,
        Some(p) => {
            let side = nodes.get(p).side_of(old);
            nodes.get_mut(p).set_child(side, new);
        }
    }
    if let Some(n) = new {
        nodes.get_mut(n).set_parent(parent);
    }
}

/// Rotates `node` down towards `dir`; its child on the opposite side takes its place.
/// Returns the handle now at the top of the rotated subtree.
fn rotate<K>(nodes: &mut Arena<Node<K>>, root: &mut Option<Handle>, node: Handle, dir: Side) -> Handle {
    let up = dir.flip();
    let pivot = nodes.get(node).child(up).expect("`rotate()` - no child to rotate up");
    let inner = nodes.get(pivot).child(dir);
    let parent = nodes.get(node).parent();

    log::trace!("rotate {dir:?} at {node:?}, pivot {pivot:?}");

    nodes.get_mut(node).set_child(up, inner);
    if let Some(i) = inner {
        nodes.get_mut(i).set_parent(Some(node));
    }
    replace_child(nodes, root, parent, node, Some(pivot));
    nodes.get_mut(pivot).set_child(dir, Some(node));
    nodes.get_mut(node).set_parent(Some(pivot));

    fix_height(nodes, node);
    fix_height(nodes, pivot);
    pivot
}

/// Refreshes the height of `node` and restores the AVL condition at it.
/// Returns the handle now at the top of the subtree.
///
/// # Panics
/// Panics if the subtree was more than one level out of balance before the call, which
/// means some earlier mutation skipped its rebalancing.
pub(crate) fn rebalance<K>(nodes: &mut Arena<Node<K>>, root: &mut Option<Handle>, node: Handle) -> Handle {
    fix_height(nodes, node);

    let top = match balance_factor(nodes, node) {
        2 => {
            let right = nodes.get(node).right().expect("`rebalance()` - right-heavy node without a right child");
            if balance_factor(nodes, right) < 0 {
                rotate(nodes, root, right, Side::Right);
            }
            rotate(nodes, root, node, Side::Left)
        }
        -2 => {
            let left = nodes.get(node).left().expect("`rebalance()` - left-heavy node without a left child");
            if balance_factor(nodes, left) > 0 {
                rotate(nodes, root, left, Side::Left);
            }
            rotate(nodes, root, node, Side::Right)
        }
        factor => {
            assert!((-1..=1).contains(&factor), "`rebalance()` - balance factor {factor} at {node:?}");
            node
        }
    };

    debug_assert!((-1..=1).contains(&balance_factor(nodes, top)));
    top
}

/// Rebalances every node from `start` up to and including the root.
pub(crate) fn rebalance_upwards<K>(nodes: &mut Arena<Node<K>>, root: &mut Option<Handle>, start: Option<Handle>) {
    let mut current = start;
    while let Some(node) = current {
        let top = rebalance(nodes, root, node);
        current = nodes.get(top).parent();
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    // Builds the degenerate chain 1 -> 2 -> 3 hanging off the given side.
    fn chain(nodes: &mut Arena<Node<u8>>, side: Side) -> [Handle; 3] {
        let a = nodes.alloc(Node::new_leaf(1, Handle::new(0), None));
        let b = nodes.alloc(Node::new_leaf(2, Handle::new(1), Some(a)));
        let c = nodes.alloc(Node::new_leaf(3, Handle::new(2), Some(b)));
        nodes.get_mut(a).set_child(side, Some(b));
        nodes.get_mut(b).set_child(side, Some(c));
        nodes.get_mut(b).set_height(2);
        nodes.get_mut(a).set_height(3);
        [a, b, c]
    }

    #[test]
    fn right_chain_rotates_left() {
        let mut nodes = Arena::new();
        let [a, b, c] = chain(&mut nodes, Side::Right);
        let mut root = Some(a);

        rebalance_upwards(&mut nodes, &mut root, Some(c));

        assert_eq!(root, Some(b));
        assert_eq!(nodes.get(b).left(), Some(a));
        assert_eq!(nodes.get(b).right(), Some(c));
        assert_eq!(nodes.get(a).parent(), Some(b));
        assert_eq!(nodes.get(b).parent(), None);
        assert_eq!(height(&nodes, root), 2);
    }

    #[test]
    fn zig_zag_rotates_twice() {
        // 1 -> right 3 -> left 2
        let mut nodes = Arena::new();
        let a = nodes.alloc(Node::new_leaf(1u8, Handle::new(0), None));
        let c = nodes.alloc(Node::new_leaf(3, Handle::new(1), Some(a)));
        let b = nodes.alloc(Node::new_leaf(2, Handle::new(2), Some(c)));
        nodes.get_mut(a).set_child(Side::Right, Some(c));
        nodes.get_mut(c).set_child(Side::Left, Some(b));
        nodes.get_mut(c).set_height(2);
        nodes.get_mut(a).set_height(3);
        let mut root = Some(a);

        let top = rebalance(&mut nodes, &mut root, a);

        assert_eq!(top, b);
        assert_eq!(root, Some(b));
        assert_eq!((nodes.get(b).left(), nodes.get(b).right()), (Some(a), Some(c)));
        assert_eq!(balance_factor(&nodes, b), 0);
    }

    #[test]
    fn left_chain_rotates_right() {
        let mut nodes = Arena::new();
        let [a, b, c] = chain(&mut nodes, Side::Left);
        let mut root = Some(a);

        rebalance_upwards(&mut nodes, &mut root, Some(c));

        assert_eq!(root, Some(b));
        assert_eq!((nodes.get(b).left(), nodes.get(b).right()), (Some(c), Some(a)));
    }

    #[test]
    #[should_panic(expected = "balance factor")]
    fn unrepairable_imbalance_panics() {
        // A chain of four nodes is three levels off balance at the top.
        let mut nodes = Arena::new();
        let mut parent = None;
        let mut handles = alloc::vec::Vec::new();
        for key in 0u8..4 {
            let h = nodes.alloc(Node::new_leaf(key, Handle::new(usize::from(key)), parent));
            if let Some(p) = parent {
                nodes.get_mut(p).set_child(Side::Right, Some(h));
            }
            handles.push(h);
            parent = Some(h);
        }
        for (depth, &h) in handles.iter().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            nodes.get_mut(h).set_height((4 - depth) as u8);
        }
        let mut root = Some(handles[0]);
        let _ = rebalance(&mut nodes, &mut root, handles[0]);
    }
}
