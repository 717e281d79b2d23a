//! Slot allocator for tree nodes that need to refer to each other by handle.

use std::mem;
use std::ops::{Index, IndexMut};

/// A handle to an object allocated in a `TypedArena<T>`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Handle {
    index: usize,
}

#[derive(Clone)]
enum Slot<T> {
    Occupied(T),
    Vacant(Option<usize>),
}

/// An allocator that only holds a single type of object.
///
/// Objects are addressed by `Handle`s, which stay valid until the object is freed. Freed slots
/// are kept on a free list and reused by later allocations, so a handle must not be used after
/// it has been passed to `free`. The backing store is a single `Vec` and the arena uses no
/// unsafe code.
///
/// # Examples
///
/// ```
/// use balanced_sets::arena::TypedArena;
///
/// let mut arena = TypedArena::new();
///
/// let x = arena.allocate(1);
/// assert_eq!(arena[x], 1);
///
/// arena[x] += 1;
/// assert_eq!(arena[x], 2);
///
/// assert_eq!(arena.free(x), 2);
/// assert!(arena.is_empty());
/// ```
#[derive(Clone)]
pub struct TypedArena<T> {
    head: Option<usize>,
    slots: Vec<Slot<T>>,
    len: usize,
}

impl<T> TypedArena<T> {
    /// Constructs a new, empty `TypedArena<T>`.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Constructs a new, empty `TypedArena<T>` with room for `capacity` objects before the
    /// backing store reallocates.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_sets::arena::TypedArena;
    ///
    /// let arena: TypedArena<u32> = TypedArena::with_capacity(1024);
    /// assert!(arena.capacity() >= 1024);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        TypedArena {
            head: None,
            slots: Vec::with_capacity(capacity),
            len: 0,
        }
    }

    /// Allocates an object and returns its handle, reusing a freed slot if one exists.
    pub fn allocate(&mut self, value: T) -> Handle {
        self.len += 1;
        match self.head.take() {
            None => {
                self.slots.push(Slot::Occupied(value));
                Handle {
                    index: self.slots.len() - 1,
                }
            },
            Some(index) => {
                match mem::replace(&mut self.slots[index], Slot::Occupied(value)) {
                    Slot::Vacant(next) => self.head = next,
                    Slot::Occupied(_) => panic!("Expected the free list to point at a vacant slot."),
                }
                Handle { index }
            },
        }
    }

    /// Deallocates an object and returns it.
    ///
    /// # Panics
    ///
    /// Panics if `handle` refers to a slot that is out of bounds or already vacant.
    pub fn free(&mut self, handle: Handle) -> T {
        let slot = match self.slots.get_mut(handle.index) {
            Some(slot) => slot,
            None => panic!("Error: attempting to free an invalid slot."),
        };
        if let Slot::Vacant(_) = slot {
            panic!("Error: attempting to free a vacant slot.");
        }
        match mem::replace(slot, Slot::Vacant(self.head.take())) {
            Slot::Occupied(value) => {
                self.len -= 1;
                self.head = Some(handle.index);
                value
            },
            Slot::Vacant(_) => unreachable!(),
        }
    }

    /// Returns a reference to an object, or `None` if the handle does not refer to a live
    /// object.
    pub fn get(&self, handle: Handle) -> Option<&T> {
        match self.slots.get(handle.index) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns a mutable reference to an object, or `None` if the handle does not refer to a
    /// live object.
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        match self.slots.get_mut(handle.index) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns the number of live objects.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the arena holds no live objects.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of objects the arena can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Drops every object. All outstanding handles become invalid.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.head = None;
        self.len = 0;
    }
}

impl<T> Default for TypedArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<Handle> for TypedArena<T> {
    type Output = T;

    fn index(&self, handle: Handle) -> &Self::Output {
        self.get(handle).expect("Error: handle does not refer to a live object.")
    }
}

impl<T> IndexMut<Handle> for TypedArena<T> {
    fn index_mut(&mut self, handle: Handle) -> &mut Self::Output {
        self.get_mut(handle).expect("Error: handle does not refer to a live object.")
    }
}

#[cfg(test)]
mod tests {
    use super::{Handle, TypedArena};

    #[test]
    #[should_panic]
    fn test_free_invalid_slot() {
        let mut arena: TypedArena<u32> = TypedArena::new();
        arena.free(Handle { index: 0 });
    }

    #[test]
    #[should_panic]
    fn test_free_vacant_slot() {
        let mut arena = TypedArena::new();
        let handle = arena.allocate(0);
        arena.free(handle);
        arena.free(handle);
    }

    #[test]
    fn test_allocate() {
        let mut arena = TypedArena::new();
        assert_eq!(arena.allocate(0), Handle { index: 0 });
        assert_eq!(arena.allocate(0), Handle { index: 1 });
        assert_eq!(arena.allocate(0), Handle { index: 2 });
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn test_free_reuses_slots() {
        let mut arena = TypedArena::new();
        let a = arena.allocate(1);
        let b = arena.allocate(2);
        assert_eq!(arena.free(a), 1);
        assert_eq!(arena.free(b), 2);
        assert!(arena.is_empty());

        assert_eq!(arena.allocate(3), b);
        assert_eq!(arena.allocate(4), a);
        assert_eq!(arena.allocate(5), Handle { index: 2 });
    }

    #[test]
    fn test_get() {
        let mut arena = TypedArena::new();
        let handle = arena.allocate(0);
        assert_eq!(arena.get(handle), Some(&0));
        assert_eq!(arena.get(Handle { index: 1 }), None);

        arena.free(handle);
        assert_eq!(arena.get(handle), None);
    }

    #[test]
    fn test_get_mut() {
        let mut arena = TypedArena::new();
        let handle = arena.allocate(0);
        *arena.get_mut(handle).unwrap() = 1;
        assert_eq!(arena[handle], 1);
        assert_eq!(arena.get_mut(Handle { index: 1 }), None);
    }

    #[test]
    fn test_clear() {
        let mut arena = TypedArena::new();
        let handle = arena.allocate(0);
        arena.allocate(1);
        arena.clear();
        assert!(arena.is_empty());
        assert_eq!(arena.get(handle), None);
        assert_eq!(arena.allocate(2), Handle { index: 0 });
    }
}
