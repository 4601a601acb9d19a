//! Set-style algebra over [`AvlMap`]s.
//!
//! Maps are treated as sets of keys carrying a value. Every operation resolves a key
//! present in both operands in favor of the *first* operand's value, so
//! `union(a, b)` and `union(b, a)` hold the same keys but may disagree on values.
//!
//! The functions here only use the public map API. The `*_in_place` variants update one
//! operand in place and produce exactly what the by-value function would, with the
//! receiver playing the role named by [`Operand`].
//!
//! # Examples
//!
//! ```
//! use avl_dict::AvlMap;
//! use avl_dict::set_algebra::{self, Operand};
//!
//! let a = AvlMap::from([(1, "a"), (2, "b")]);
//! let b = AvlMap::from([(2, "c"), (3, "d")]);
//!
//! assert_eq!(set_algebra::union(&a, &b), AvlMap::from([(1, "a"), (2, "b"), (3, "d")]));
//! assert_eq!(set_algebra::intersect(&a, &b), AvlMap::from([(2, "b")]));
//! assert_eq!(set_algebra::complement(&a, &b), AvlMap::from([(1, "a"), (3, "d")]));
//!
//! let mut c = b.clone();
//! set_algebra::union_in_place(&mut c, &a, Operand::Second);
//! assert_eq!(c, set_algebra::union(&a, &b));
//! ```

use alloc::borrow::ToOwned;
use alloc::vec::Vec;

use crate::compare::Comparator;
use crate::{AvlMap, TraversalOrder};

/// The role a map updated in place plays in a binary operation.
///
/// With `First`, `dest` becomes `op(dest, other)`; with `Second`, it becomes
/// `op(other, dest)`. The two differ in whose value survives a key collision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Operand {
    /// The receiver is the left-hand operand.
    #[default]
    First,
    /// The receiver is the right-hand operand.
    Second,
}

/// Returns every pair of `first`, followed by the pairs of `second` whose key is absent
/// from `first`.
///
/// # Complexity
///
/// O(n + m log(n + m))
#[must_use]
pub fn union<K, V, C>(first: &AvlMap<K, V, C>, second: &AvlMap<K, V, C>) -> AvlMap<K, V, C>
where
    K: Clone,
    V: Clone,
    C: Clone + Comparator<K>,
{
    let mut result = first.clone();
    union_in_place(&mut result, second, Operand::First);
    result
}

/// Returns the pairs of `first` whose key is also present in `second`.
///
/// # Complexity
///
/// O(n log m + k log k) for `k` shared keys.
#[must_use]
pub fn intersect<K, V, C>(first: &AvlMap<K, V, C>, second: &AvlMap<K, V, C>) -> AvlMap<K, V, C>
where
    K: Clone,
    V: Clone,
    C: Clone + Comparator<K>,
{
    let mut result = AvlMap::with_comparator(first.comparator().clone());
    for (key, value) in first {
        if second.contains_key(key) {
            result.insert(key.clone(), value.clone());
        }
    }
    result
}

/// Returns the symmetric difference: the pairs whose key is present in exactly one of
/// the two maps.
///
/// Since no key is shared, the result does not depend on operand order.
#[must_use]
pub fn complement<K, V, C>(first: &AvlMap<K, V, C>, second: &AvlMap<K, V, C>) -> AvlMap<K, V, C>
where
    K: Clone,
    V: Clone,
    C: Clone + Comparator<K>,
{
    let mut result = AvlMap::with_comparator(first.comparator().clone());
    for (a, b) in [(first, second), (second, first)] {
        for (key, value) in a {
            if !b.contains_key(key) {
                result.insert(key.clone(), value.clone());
            }
        }
    }
    result
}

/// Replaces `dest` with its union with `other`, `dest` taking the role `as_operand`.
pub fn union_in_place<K, V, C>(dest: &mut AvlMap<K, V, C>, other: &AvlMap<K, V, C>, as_operand: Operand)
where
    K: Clone,
    V: Clone,
    C: Comparator<K>,
{
    for (key, value) in other {
        match as_operand {
            Operand::First => {
                if !dest.contains_key(key) {
                    dest.insert(key.clone(), value.clone());
                }
            }
            Operand::Second => {
                if let Some(slot) = dest.get_mut(key) {
                    value.clone_into(slot);
                } else {
                    dest.insert(key.clone(), value.clone());
                }
            }
        }
    }
    log::debug!("union in place as {as_operand:?}: {} entries", dest.len());
}

/// Replaces `dest` with its intersection with `other`, `dest` taking the role
/// `as_operand`.
///
/// Returns the number of entries removed from `dest`.
pub fn intersect_in_place<K, V, C>(dest: &mut AvlMap<K, V, C>, other: &AvlMap<K, V, C>, as_operand: Operand) -> usize
where
    V: Clone,
    C: Comparator<K>,
{
    let removed = remove_if(dest, |key, _| !other.contains_key(key));
    if as_operand == Operand::Second {
        for (key, value) in dest.iter_mut() {
            if let Some(winner) = other.get(key) {
                winner.clone_into(value);
            }
        }
    }
    log::debug!("intersect in place as {as_operand:?}: removed {removed}");
    removed
}

/// Replaces `dest` with the symmetric difference of `dest` and `other`.
pub fn complement_in_place<K, V, C>(dest: &mut AvlMap<K, V, C>, other: &AvlMap<K, V, C>)
where
    K: Clone,
    V: Clone,
    C: Comparator<K>,
{
    let incoming: Vec<(K, V)> = other
        .iter()
        .filter(|(key, _)| !dest.contains_key(*key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    let removed = remove_if(dest, |key, _| other.contains_key(key));
    log::debug!("complement in place: removed {removed}, adding {}", incoming.len());
    dest.extend(incoming);
}

/// Removes every entry for which `predicate` returns `true`, walking the map in
/// ascending order with a [`CursorMut`](crate::avl_map::CursorMut).
///
/// Returns the number of entries removed.
///
/// # Examples
///
/// ```
/// use avl_dict::AvlMap;
/// use avl_dict::set_algebra::remove_if;
///
/// let mut map: AvlMap<i32, i32> = (0..10).map(|k| (k, k * k)).collect();
/// assert_eq!(remove_if(&mut map, |k, _| k % 3 == 0), 4);
/// assert_eq!(map.keys().copied().collect::<Vec<_>>(), [1, 2, 4, 5, 7, 8]);
/// ```
pub fn remove_if<K, V, C, F>(map: &mut AvlMap<K, V, C>, mut predicate: F) -> usize
where
    F: FnMut(&K, &V) -> bool,
{
    let mut removed = 0;
    let mut cursor = map.cursor_mut(TraversalOrder::Ascending);
    while let Ok((key, value)) = cursor.get() {
        if predicate(key, value) {
            cursor.remove_current().expect("ascending cursor is on an entry");
            removed += 1;
        } else {
            cursor.move_next().expect("ascending cursor is on an entry");
        }
    }
    removed
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::compare::Reverse;
    use alloc::vec;
    use proptest::prelude::*;

    fn pair() -> (AvlMap<u8, &'static str>, AvlMap<u8, &'static str>) {
        (AvlMap::from([(1, "a"), (2, "b")]), AvlMap::from([(2, "c"), (3, "d")]))
    }

    #[test]
    fn first_operand_wins() {
        let (a, b) = pair();
        assert_eq!(union(&b, &a), AvlMap::from([(1, "a"), (2, "c"), (3, "d")]));
        assert_eq!(intersect(&b, &a), AvlMap::from([(2, "c")]));
    }

    #[test]
    fn empty_operands() {
        let (a, _) = pair();
        let empty = AvlMap::new();
        assert_eq!(union(&a, &empty), a);
        assert_eq!(union(&empty, &a), a);
        assert!(intersect(&a, &empty).is_empty());
        assert_eq!(complement(&empty, &a), a);
        assert!(complement(&a, &a).is_empty());
    }

    #[test]
    fn result_keeps_comparator() {
        let mut a = AvlMap::with_comparator(Reverse);
        a.extend([(1, ()), (2, ())]);
        let mut b = AvlMap::with_comparator(Reverse);
        b.extend([(3, ())]);
        let keys: Vec<_> = complement(&a, &b).into_keys().collect();
        assert_eq!(keys, [3, 2, 1]);
    }

    #[test]
    fn remove_if_counts_and_keeps_balance() {
        let mut map: AvlMap<u16, ()> = (0..200).map(|k| (k, ())).collect();
        assert_eq!(remove_if(&mut map, |k, ()| k % 2 == 1), 100);
        map.validate_invariants();
        assert!(map.keys().all(|k| k % 2 == 0));
        assert_eq!(remove_if(&mut map, |_, ()| true), 100);
        assert!(map.is_empty());
    }

    #[test]
    fn remove_if_sees_ascending_order() {
        let mut map: AvlMap<u8, ()> = [3, 1, 2].into_iter().map(|k| (k, ())).collect();
        let mut seen = vec![];
        remove_if(&mut map, |k, ()| {
            seen.push(*k);
            false
        });
        assert_eq!(seen, [1, 2, 3]);
    }

    fn map_strategy() -> impl Strategy<Value = AvlMap<u8, u8>> {
        proptest::collection::vec((0..32u8, any::<u8>()), 0..24).prop_map(|pairs| pairs.into_iter().collect())
    }

    proptest! {
        #[test]
        fn in_place_matches_by_value(a in map_strategy(), b in map_strategy()) {
            let mut d = a.clone();
            union_in_place(&mut d, &b, Operand::First);
            prop_assert_eq!(&d, &union(&a, &b));

            let mut d = b.clone();
            union_in_place(&mut d, &a, Operand::Second);
            prop_assert_eq!(&d, &union(&a, &b));

            let mut d = a.clone();
            intersect_in_place(&mut d, &b, Operand::First);
            prop_assert_eq!(&d, &intersect(&a, &b));

            let mut d = b.clone();
            intersect_in_place(&mut d, &a, Operand::Second);
            prop_assert_eq!(&d, &intersect(&a, &b));

            let mut d = a.clone();
            complement_in_place(&mut d, &b);
            prop_assert_eq!(&d, &complement(&a, &b));
            d.validate_invariants();
        }

        #[test]
        fn key_sets_follow_set_laws(a in map_strategy(), b in map_strategy()) {
            let u = union(&a, &b);
            let i = intersect(&a, &b);
            let c = complement(&a, &b);
            prop_assert_eq!(u.len(), i.len() + c.len());
            prop_assert!(u.keys().all(|k| a.contains_key(k) || b.contains_key(k)));
            prop_assert!(i.iter().all(|(k, v)| b.contains_key(k) && a.get(k) == Some(v)));
            prop_assert!(c.keys().all(|k| a.contains_key(k) != b.contains_key(k)));
        }
    }
}
