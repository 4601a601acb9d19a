use alloc::vec::Vec;

use super::handle::Handle;

/// Slot storage for tree nodes and values.
///
/// Freed slots are recycled before the backing vector grows, so a handle stays valid
/// until its element is taken and never moves while it is live.
#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    vacant: Vec<Handle>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            vacant: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            vacant: Vec::new(),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Makes room for `additional` more live elements without reallocating.
    pub(crate) fn reserve(&mut self, additional: usize) {
        let recycled = self.vacant.len().min(additional);
        self.slots.reserve(additional - recycled);
    }

    pub(crate) const fn len(&self) -> usize {
        self.slots.len().saturating_sub(self.vacant.len())
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        if let Some(handle) = self.vacant.pop() {
            debug_assert!(self.slots[handle.index()].is_none());
            self.slots[handle.index()] = Some(element);
            return handle;
        }

        assert!(
            self.slots.len() <= Handle::MAX_INDEX,
            "`Arena::alloc()` - arena is full ({} slots)",
            Handle::MAX_INDEX + 1
        );
        self.slots.push(Some(element));
        Handle::new(self.slots.len() - 1)
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        self.slots[handle.index()].as_ref().expect("`Arena::get()` - stale handle")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        self.slots[handle.index()].as_mut().expect("`Arena::get_mut()` - stale handle")
    }

    /// Writes an element through a raw arena pointer without borrowing the other slots.
    ///
    /// # Safety
    /// - `ptr` must point to a live `Arena<T>`.
    /// - No other reference to the element at `handle` may exist while the result is alive.
    #[inline]
    pub(crate) unsafe fn get_mut_ptr<'a>(ptr: *mut Self, handle: Handle) -> &'a mut T {
        // SAFETY: `as_mut_ptr` does not create a reference to the whole buffer, so
        // references to other slots handed out earlier stay valid.
        unsafe {
            let slots = core::ptr::addr_of_mut!((*ptr).slots);
            assert!(handle.index() < (*slots).len(), "`Arena::get_mut_ptr()` - stale handle");
            (*(*slots).as_mut_ptr().add(handle.index())).as_mut().expect("`Arena::get_mut_ptr()` - stale handle")
        }
    }

    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let element = self.slots[handle.index()].take().expect("`Arena::take()` - stale handle");
        self.vacant.push(handle);
        element
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.vacant.clear();
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn reserve_counts_recycled_slots() {
        let mut arena: Arena<u8> = Arena::with_capacity(4);
        let handles: Vec<_> = (0..4).map(|i| arena.alloc(i)).collect();
        for handle in handles {
            let _ = arena.take(handle);
        }
        arena.reserve(4);
        assert_eq!(arena.capacity(), 4);
        assert_eq!(arena.len(), 0);
    }

    #[test]
    fn taken_slot_is_reused() {
        let mut arena = Arena::new();
        let a = arena.alloc('a');
        let _ = arena.alloc('b');
        assert_eq!(arena.take(a), 'a');
        let c = arena.alloc('c');
        assert_eq!(a, c);
        assert_eq!(*arena.get(c), 'c');
    }

    #[test]
    #[should_panic(expected = "`Arena::get()` - stale handle")]
    fn get_after_take_panics() {
        let mut arena = Arena::new();
        let a = arena.alloc(1u32);
        let _ = arena.take(a);
        let _ = arena.get(a);
    }

    #[test]
    #[should_panic(expected = "`Arena::alloc()` - arena is full")]
    fn alloc_past_max_panics() {
        let mut arena = Arena::new();
        for _ in 0..=Handle::MAX_INDEX + 1 {
            let _ = arena.alloc(());
        }
    }

    #[test]
    fn raw_pointer_access_is_disjoint() {
        let mut arena = Arena::new();
        let a = arena.alloc(1u32);
        let b = arena.alloc(2u32);
        let ptr: *mut Arena<u32> = &mut arena;
        // SAFETY: `a` and `b` are distinct live slots and `arena` is not otherwise used.
        unsafe {
            let x = Arena::get_mut_ptr(ptr, a);
            let y = Arena::get_mut_ptr(ptr, b);
            core::mem::swap(x, y);
        }
        assert_eq!((*arena.get(a), *arena.get(b)), (2, 1));
    }

    proptest! {
        #[test]
        fn arena_matches_model(operations in prop::collection::vec(operation(), 0..256)) {
            let mut model: Vec<(Handle, u32)> = Vec::new();
            let mut arena: Arena<u32> = Arena::new();

            for op in operations {
                match op {
                    Op::Alloc(value) => model.push((arena.alloc(value), value)),
                    Op::Overwrite(which, value) if !model.is_empty() => {
                        let slot = which % model.len();
                        *arena.get_mut(model[slot].0) = value;
                        model[slot].1 = value;
                    }
                    Op::Take(which) if !model.is_empty() => {
                        let (handle, expected) = model.swap_remove(which % model.len());
                        prop_assert_eq!(arena.take(handle), expected);
                    }
                    Op::Clear => {
                        arena.clear();
                        model.clear();
                    }
                    _ => {}
                }

                prop_assert_eq!(arena.len(), model.len());
                for &(handle, value) in &model {
                    prop_assert_eq!(*arena.get(handle), value);
                }
            }
        }
    }

    #[derive(Clone, Debug)]
    enum Op {
        Alloc(u32),
        Overwrite(usize, u32),
        Take(usize),
        Clear,
    }

    fn operation() -> impl Strategy<Value = Op> {
        prop_oneof![
            20 => any::<u32>().prop_map(Op::Alloc),
            5 => (any::<usize>(), any::<u32>()).prop_map(|(which, value)| Op::Overwrite(which, value)),
            8 => any::<usize>().prop_map(Op::Take),
            1 => Just(Op::Clear),
        ]
    }
}
