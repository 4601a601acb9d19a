use core::cmp::Ordering;
use core::fmt;

/// A total order over `T`, used by [`AvlMap`](crate::AvlMap) to place and find keys.
///
/// Lookups accept any borrowed form `Q` of the key type, so a comparator is usually
/// implemented for a family of types (see [`Natural`]). The ordering on a borrowed form
/// *must* agree with the ordering on the owned key.
///
/// It is a logic error for a comparator to be inconsistent, e.g. to return different
/// results for the same pair over time. The behavior resulting from such a logic error is
/// not specified, but it is encapsulated in the map that observed it and never results in
/// undefined behavior.
pub trait Comparator<T: ?Sized> {
    /// Compares `a` with `b`.
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// The natural order of `T` given by its [`Ord`] implementation. This is the default.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Natural;

impl<T: Ord + ?Sized> Comparator<T> for Natural {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// The reverse of the natural order of `T`.
///
/// # Examples
///
/// ```
/// use avl_dict::AvlMap;
/// use avl_dict::compare::Reverse;
///
/// let mut map = AvlMap::with_comparator(Reverse);
/// map.insert(1, "a");
/// map.insert(3, "c");
/// map.insert(2, "b");
///
/// let keys: Vec<_> = map.keys().copied().collect();
/// assert_eq!(keys, [3, 2, 1]);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Reverse;

impl<T: Ord + ?Sized> Comparator<T> for Reverse {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        b.cmp(a)
    }
}

/// Adapts a closure into a [`Comparator`].
///
/// # Examples
///
/// ```
/// use avl_dict::AvlMap;
/// use avl_dict::compare::FnComparator;
///
/// // Case-insensitive keys.
/// let mut map = AvlMap::with_comparator(FnComparator(|a: &&str, b: &&str| {
///     a.to_lowercase().cmp(&b.to_lowercase())
/// }));
/// map.insert("Apple", 1);
/// map.insert("apple", 2);
///
/// assert_eq!(map.len(), 1);
/// assert_eq!(map.get(&"APPLE"), Some(&2));
/// ```
#[derive(Clone, Copy, Default)]
pub struct FnComparator<F>(pub F);

impl<T: ?Sized, F> Comparator<T> for FnComparator<F>
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        (self.0)(a, b)
    }
}

impl<F> fmt::Debug for FnComparator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnComparator")
    }
}
