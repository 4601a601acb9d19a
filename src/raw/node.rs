use super::handle::Handle;

/// Which child link of a parent a node hangs from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    pub(crate) const fn flip(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// A tree node. The value lives in a separate arena and is referenced by `value`.
#[derive(Clone)]
pub(crate) struct Node<K> {
    key: K,
    value: Handle,
    // Height of the subtree rooted here; a leaf has height 1.
    height: u8,
    parent: Option<Handle>,
    left: Option<Handle>,
    right: Option<Handle>,
}

impl<K> Node<K> {
    pub(crate) const fn new_leaf(key: K, value: Handle, parent: Option<Handle>) -> Self {
        Self {
            key,
            value,
            height: 1,
            parent,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) const fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub(crate) const fn value(&self) -> Handle {
        self.value
    }

    #[inline]
    pub(crate) const fn height(&self) -> u8 {
        self.height
    }

    #[inline]
    pub(crate) fn set_height(&mut self, height: u8) {
        self.height = height;
    }

    #[inline]
    pub(crate) const fn parent(&self) -> Option<Handle> {
        self.parent
    }

    #[inline]
    pub(crate) fn set_parent(&mut self, parent: Option<Handle>) {
        self.parent = parent;
    }

    #[inline]
    pub(crate) const fn left(&self) -> Option<Handle> {
        self.left
    }

    #[inline]
    pub(crate) const fn right(&self) -> Option<Handle> {
        self.right
    }

    #[inline]
    pub(crate) const fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, side: Side, child: Option<Handle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    /// Returns the side on which `child` hangs from this node.
    ///
    /// # Panics
    /// Panics if `child` is not linked to this node.
    pub(crate) fn side_of(&self, child: Handle) -> Side {
        if self.left == Some(child) {
            Side::Left
        } else if self.right == Some(child) {
            Side::Right
        } else {
            panic!("`Node::side_of()` - {child:?} is not a child of this node")
        }
    }

    pub(crate) fn into_parts(self) -> (K, Handle) {
        (self.key, self.value)
    }
}
