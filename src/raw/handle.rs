use core::fmt;
use core::num::NonZero;

// Small handles in unit tests so the capacity limit is reachable.
#[cfg(test)]
type RawHandle = u16;
#[cfg(not(test))]
type RawHandle = u32;

/// Index of a slot in an [`Arena`](super::arena::Arena).
///
/// Child, parent and value links are all `Option<Handle>`, which stays the size of a
/// bare index thanks to the non-zero niche.
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<RawHandle>);

impl Handle {
    /// The largest slot index a handle can address.
    pub(crate) const MAX_INDEX: usize = (RawHandle::MAX - 1) as usize;

    #[inline]
    pub(crate) const fn new(index: usize) -> Self {
        assert!(index <= Self::MAX_INDEX, "`Handle::new()` - slot index out of range!");
        #[allow(clippy::cast_possible_truncation)]
        match NonZero::new((index + 1) as RawHandle) {
            Some(raw) => Self(raw),
            None => unreachable!(),
        }
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::format;
    use proptest::prelude::*;
    use static_assertions::assert_eq_size;

    // Links must not grow because of the `Option`.
    assert_eq_size!(Handle, Option<Handle>);
    assert_eq_size!(Handle, RawHandle);

    #[test]
    #[should_panic(expected = "`Handle::new()` - slot index out of range!")]
    fn index_past_max_panics() {
        let _ = Handle::new(Handle::MAX_INDEX + 1);
    }

    #[test]
    fn debug_shows_index() {
        assert_eq!(format!("{:?}", Handle::new(7)), "#7");
        assert_eq!(format!("{:?}", Some(Handle::new(0))), "Some(#0)");
    }

    proptest! {
        #[test]
        fn index_round_trip(index in 0..=Handle::MAX_INDEX) {
            prop_assert_eq!(Handle::new(index).index(), index);
        }
    }
}
