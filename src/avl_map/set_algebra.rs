use super::AvlMap;
use crate::compare::Comparator;
use crate::set_algebra::{self, Operand};

impl<K: Clone, V: Clone, C: Clone + Comparator<K>> AvlMap<K, V, C> {
    /// Returns the union of `self` and `other`. On a shared key the value from `self`
    /// wins.
    ///
    /// See [`set_algebra::union`].
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    ///
    /// let a = AvlMap::from([(1, "a"), (2, "b")]);
    /// let b = AvlMap::from([(2, "c"), (3, "d")]);
    /// assert_eq!(a.union(&b), AvlMap::from([(1, "a"), (2, "b"), (3, "d")]));
    /// ```
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        set_algebra::union(self, other)
    }

    /// Returns the entries of `self` whose key is also in `other`.
    ///
    /// See [`set_algebra::intersect`].
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    ///
    /// let a = AvlMap::from([(1, "a"), (2, "b")]);
    /// let b = AvlMap::from([(2, "c"), (3, "d")]);
    /// assert_eq!(a.intersect(&b), AvlMap::from([(2, "b")]));
    /// ```
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        set_algebra::intersect(self, other)
    }

    /// Returns the entries whose key is in exactly one of `self` and `other`.
    ///
    /// See [`set_algebra::complement`].
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    ///
    /// let a = AvlMap::from([(1, "a"), (2, "b")]);
    /// let b = AvlMap::from([(2, "c"), (3, "d")]);
    /// assert_eq!(a.complement(&b), AvlMap::from([(1, "a"), (3, "d")]));
    /// ```
    #[must_use]
    pub fn complement(&self, other: &Self) -> Self {
        set_algebra::complement(self, other)
    }
}

impl<K: Clone, V: Clone, C: Comparator<K>> AvlMap<K, V, C> {
    /// Turns `self` into its union with `other`, `self` playing the role `as_operand`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    /// use avl_dict::avl_map::Operand;
    ///
    /// let a = AvlMap::from([(1, "a"), (2, "b")]);
    /// let mut b = AvlMap::from([(2, "c"), (3, "d")]);
    /// b.union_in_place(&a, Operand::Second);
    /// assert_eq!(b, a.union(&AvlMap::from([(2, "c"), (3, "d")])));
    /// ```
    pub fn union_in_place(&mut self, other: &Self, as_operand: Operand) {
        set_algebra::union_in_place(self, other, as_operand);
    }

    /// Turns `self` into the symmetric difference of `self` and `other`.
    pub fn complement_in_place(&mut self, other: &Self) {
        set_algebra::complement_in_place(self, other);
    }
}

impl<K, V: Clone, C: Comparator<K>> AvlMap<K, V, C> {
    /// Turns `self` into its intersection with `other`, `self` playing the role
    /// `as_operand`, and returns how many entries were removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    /// use avl_dict::avl_map::Operand;
    ///
    /// let mut a = AvlMap::from([(1, "a"), (2, "b")]);
    /// let b = AvlMap::from([(2, "c"), (3, "d")]);
    /// assert_eq!(a.intersect_in_place(&b, Operand::First), 1);
    /// assert_eq!(a, AvlMap::from([(2, "b")]));
    /// ```
    pub fn intersect_in_place(&mut self, other: &Self, as_operand: Operand) -> usize {
        set_algebra::intersect_in_place(self, other, as_operand)
    }
}

impl<K, V, C> AvlMap<K, V, C> {
    /// Removes every entry matching `predicate` and returns how many were removed.
    ///
    /// Unlike [`retain`](AvlMap::retain), the predicate sees values by shared reference.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dict::AvlMap;
    ///
    /// let mut map = AvlMap::from([(1, "keep"), (2, "drop"), (3, "drop")]);
    /// assert_eq!(map.remove_if(|_, v| *v == "drop"), 2);
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn remove_if<F>(&mut self, predicate: F) -> usize
    where
        F: FnMut(&K, &V) -> bool,
    {
        set_algebra::remove_if(self, predicate)
    }
}
