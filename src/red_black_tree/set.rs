use crate::arena::{Handle, TypedArena};
use crate::error::InvariantError;
use crate::ordered_set::{OrderedSet, SeqVisitor};
use crate::red_black_tree::node::Node;
use crate::red_black_tree::tree::{Cursor, Tree};
use crate::traversal::{InOrder, Order, Traversal};
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::borrow::Borrow;
use std::fmt;
use std::iter::FromIterator;
use std::vec;

/// An ordered set implemented using a red black tree.
///
/// A red black tree is a self-balancing binary search tree that colors every node red or
/// black. The root is black, a red node never has a red child, and every path from a node to
/// a null leaf crosses the same number of black nodes, which keeps the longest path at most
/// twice as long as the shortest. Insertions and removals restore these rules with recoloring
/// and at most a constant number of rotations per level.
///
/// # Examples
///
/// ```
/// use balanced_sets::RedBlackSet;
///
/// let mut set = RedBlackSet::new();
/// assert!(set.insert(0));
/// assert!(set.insert(3));
/// assert!(!set.insert(3));
///
/// assert_eq!(set.len(), 2);
///
/// assert_eq!(set.min(), Some(&0));
/// assert_eq!(set.ceil(&2), Some(&3));
///
/// assert!(set.remove(&0));
/// assert!(!set.remove(&1));
/// ```
#[derive(Clone)]
pub struct RedBlackSet<T> {
    tree: Tree<T>,
}

impl<T> RedBlackSet<T> {
    /// Constructs a new, empty `RedBlackSet<T>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_sets::RedBlackSet;
    ///
    /// let set: RedBlackSet<u32> = RedBlackSet::new();
    /// ```
    pub fn new() -> Self {
        RedBlackSet { tree: Tree::new() }
    }

    /// Constructs a new, empty `RedBlackSet<T>` that can hold `capacity` keys before its node
    /// storage reallocates.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_sets::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::with_capacity(16);
    /// set.insert(1);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        RedBlackSet {
            tree: Tree::with_capacity(capacity),
        }
    }

    /// Returns the number of keys in the set.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_sets::RedBlackSet;
    ///
    /// let set: RedBlackSet<u32> = RedBlackSet::new();
    /// assert!(set.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.tree.len() == 0
    }

    /// Clears the set, dropping every key.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Returns the height of the underlying tree. An empty set has height 0.
    pub fn height(&self) -> usize {
        self.tree.height()
    }

    /// Returns the number of black nodes on any path from the root (exclusive) to a null leaf.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_sets::RedBlackSet;
    ///
    /// let set: RedBlackSet<u32> = (1..=4).collect();
    /// assert_eq!(set.black_height(), 1);
    /// ```
    pub fn black_height(&self) -> usize {
        self.tree.black_height()
    }

    /// Returns the minimum key of the set. Returns `None` if the set is empty.
    pub fn min(&self) -> Option<&T> {
        self.tree.min()
    }

    /// Returns the maximum key of the set. Returns `None` if the set is empty.
    pub fn max(&self) -> Option<&T> {
        self.tree.max()
    }

    /// Returns an iterator over the set. The iterator will yield keys using in-order traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_sets::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(3);
    /// set.insert(1);
    ///
    /// let mut iterator = set.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.next(), Some(&3));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> RedBlackSetIter<'_, T> {
        RedBlackSetIter {
            inner: InOrder::new(self.tree.cursor()),
            remaining: self.tree.len(),
        }
    }

    /// Returns an iterator that walks the tree in the given order.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_sets::{Order, RedBlackSet};
    ///
    /// let set: RedBlackSet<u32> = (1..=4).collect();
    /// assert_eq!(
    ///     set.traverse(Order::LevelOrder).collect::<Vec<_>>(),
    ///     vec![&2, &1, &3, &4],
    /// );
    /// ```
    pub fn traverse(&self, order: Order) -> impl Iterator<Item = &T> + Clone + '_ {
        Traversal::new(self.tree.cursor(), order)
    }

    /// Calls `visitor` on every key in the given order.
    pub fn for_each_in<F>(&self, order: Order, visitor: F)
    where
        F: FnMut(&T),
    {
        self.traverse(order).for_each(visitor);
    }
}

impl<T> RedBlackSet<T>
where
    T: Ord,
{
    /// Inserts a key into the set. Returns `false` and leaves the set untouched if the key is
    /// already present.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_sets::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// assert!(set.insert(1));
    /// assert!(set.contains(&1));
    /// assert!(!set.insert(1));
    /// ```
    pub fn insert(&mut self, key: T) -> bool {
        let inserted = self.tree.insert(key);
        if inserted {
            self.check_invariants();
        }
        inserted
    }

    /// Removes a key from the set. Returns `true` if the key was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_sets::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(1);
    /// assert!(set.remove(&1));
    /// assert!(!set.remove(&1));
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.take(key).is_some()
    }

    /// Removes a key from the set and returns it, or `None` if the key was not present.
    pub fn take<Q>(&mut self, key: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let ret = self.tree.remove(key);
        if ret.is_some() {
            self.check_invariants();
        }
        ret
    }

    /// Checks if a key exists in the set.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.get(key).is_some()
    }

    /// Returns a reference to the key in the set that compares equal to `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.get(key)
    }

    /// Returns a key in the set that is less than or equal to a particular key. Returns `None` if
    /// such a key does not exist.
    pub fn floor<Q>(&self, key: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.floor(key)
    }

    /// Returns a key in the set that is greater than or equal to a particular key. Returns `None`
    /// if such a key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_sets::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(1);
    /// assert_eq!(set.ceil(&0), Some(&1));
    /// assert_eq!(set.ceil(&2), None);
    /// ```
    pub fn ceil<Q>(&self, key: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.ceil(key)
    }

    /// Retains only the keys for which `f` returns `true`.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&T) -> bool,
    {
        let tree = std::mem::replace(&mut self.tree, Tree::new());
        for key in RedBlackSetIntoIter::new(tree) {
            if f(&key) {
                self.insert(key);
            }
        }
    }

    /// Checks every structural invariant of the tree: search order, parent links, the color
    /// rules, uniform black height and the cached length.
    pub fn validate(&self) -> Result<(), InvariantError> {
        self.tree.validate()
    }

    fn check_invariants(&self) {
        if cfg!(feature = "check-invariants") {
            if let Err(error) = self.validate() {
                panic!("red black tree invariant violated: {}", error);
            }
        }
    }
}

impl<T> OrderedSet<T> for RedBlackSet<T>
where
    T: Ord,
{
    fn insert(&mut self, key: T) -> bool {
        RedBlackSet::insert(self, key)
    }

    fn remove(&mut self, key: &T) -> bool {
        RedBlackSet::remove(self, key)
    }

    fn contains(&self, key: &T) -> bool {
        RedBlackSet::contains(self, key)
    }

    fn len(&self) -> usize {
        self.tree.len()
    }

    fn clear(&mut self) {
        RedBlackSet::clear(self)
    }

    fn for_each_in(&self, order: Order, visitor: &mut dyn FnMut(&T)) {
        RedBlackSet::for_each_in(self, order, visitor)
    }
}

impl<T> IntoIterator for RedBlackSet<T> {
    type Item = T;
    type IntoIter = RedBlackSetIntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        RedBlackSetIntoIter::new(self.tree)
    }
}

impl<'a, T> IntoIterator for &'a RedBlackSet<T>
where
    T: 'a,
{
    type Item = &'a T;
    type IntoIter = RedBlackSetIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `RedBlackSet<T>`.
///
/// This iterator traverses the elements of the set in-order and yields owned keys.
pub struct RedBlackSetIntoIter<T> {
    arena: TypedArena<Node<T>>,
    handles: vec::IntoIter<Handle>,
}

impl<T> RedBlackSetIntoIter<T> {
    fn new(tree: Tree<T>) -> Self {
        let (arena, handles) = tree.into_sorted_handles();
        RedBlackSetIntoIter {
            arena,
            handles: handles.into_iter(),
        }
    }
}

impl<T> Iterator for RedBlackSetIntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.handles.next()?;
        Some(self.arena.free(handle).key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.handles.size_hint()
    }
}

/// An iterator for `RedBlackSet<T>`.
///
/// This iterator traverses the elements of the set in-order and yields immutable references.
#[derive(Clone)]
pub struct RedBlackSetIter<'a, T> {
    inner: InOrder<Cursor<'a, T>>,
    remaining: usize,
}

impl<'a, T> Iterator for RedBlackSetIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.inner.next();
        if next.is_some() {
            self.remaining -= 1;
        }
        next
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> ExactSizeIterator for RedBlackSetIter<'a, T> {}

impl<T> Default for RedBlackSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for RedBlackSet<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T> PartialEq for RedBlackSet<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &RedBlackSet<T>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T> Eq for RedBlackSet<T> where T: Eq {}

impl<T> Extend<T> for RedBlackSet<T>
where
    T: Ord,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<T> FromIterator<T> for RedBlackSet<T>
where
    T: Ord,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut set = RedBlackSet::new();
        set.extend(iter);
        set
    }
}

impl<T> Serialize for RedBlackSet<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for key in self {
            seq.serialize_element(key)?;
        }
        seq.end()
    }
}

impl<'de, T> Deserialize<'de> for RedBlackSet<T>
where
    T: Deserialize<'de> + Ord,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(SeqVisitor::new())
    }
}

#[cfg(test)]
mod tests {
    use super::RedBlackSet;
    use crate::traversal::Order;

    #[test]
    fn test_len_empty() {
        let set: RedBlackSet<u32> = RedBlackSet::new();
        assert_eq!(set.len(), 0);
        assert_eq!(set.height(), 0);
        assert_eq!(set.black_height(), 0);
    }

    #[test]
    fn test_min_max_empty() {
        let set: RedBlackSet<u32> = RedBlackSet::new();
        assert_eq!(set.min(), None);
        assert_eq!(set.max(), None);
    }

    #[test]
    fn test_insert() {
        let mut set = RedBlackSet::new();
        assert!(set.insert(1));
        assert!(set.contains(&1));
    }

    #[test]
    fn test_insert_duplicate() {
        let mut set = RedBlackSet::new();
        assert!(set.insert(1));
        assert!(!set.insert(1));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut set = RedBlackSet::new();
        set.insert(1);
        assert!(set.remove(&1));
        assert!(!set.contains(&1));
        assert!(!set.remove(&1));
    }

    #[test]
    fn test_take() {
        let mut set = RedBlackSet::new();
        set.insert(String::from("a"));
        assert_eq!(set.take("a"), Some(String::from("a")));
        assert_eq!(set.take("a"), None);
    }

    #[test]
    fn test_min_max() {
        let mut set = RedBlackSet::new();
        set.insert(1);
        set.insert(3);
        set.insert(5);

        assert_eq!(set.min(), Some(&1));
        assert_eq!(set.max(), Some(&5));
    }

    #[test]
    fn test_floor_ceil() {
        let mut set = RedBlackSet::new();
        set.insert(1);
        set.insert(3);
        set.insert(5);

        assert_eq!(set.floor(&0), None);
        assert_eq!(set.floor(&2), Some(&1));
        assert_eq!(set.floor(&4), Some(&3));
        assert_eq!(set.floor(&6), Some(&5));

        assert_eq!(set.ceil(&0), Some(&1));
        assert_eq!(set.ceil(&2), Some(&3));
        assert_eq!(set.ceil(&4), Some(&5));
        assert_eq!(set.ceil(&6), None);
    }

    #[test]
    fn test_into_iter() {
        let mut set = RedBlackSet::new();
        set.insert(1);
        set.insert(5);
        set.insert(3);

        assert_eq!(set.into_iter().collect::<Vec<u32>>(), vec![1, 3, 5]);
    }

    #[test]
    fn test_into_iter_partial_drop() {
        let set: RedBlackSet<String> = vec!["b", "a", "c"].into_iter().map(String::from).collect();
        let mut iter = set.into_iter();
        assert_eq!(iter.next(), Some(String::from("a")));
    }

    #[test]
    fn test_iter() {
        let mut set = RedBlackSet::new();
        set.insert(1);
        set.insert(5);
        set.insert(3);

        let iter = set.iter();
        assert_eq!(iter.len(), 3);
        assert_eq!(iter.collect::<Vec<&u32>>(), vec![&1, &3, &5]);
    }

    #[test]
    fn test_traverse() {
        let set: RedBlackSet<u32> = (1..=5).collect();

        assert_eq!(
            set.traverse(Order::PreOrder).cloned().collect::<Vec<u32>>(),
            vec![2, 1, 4, 3, 5],
        );
        assert_eq!(
            set.traverse(Order::PostOrder).cloned().collect::<Vec<u32>>(),
            vec![1, 3, 5, 4, 2],
        );
        assert_eq!(
            set.traverse(Order::LevelOrder).cloned().collect::<Vec<u32>>(),
            vec![2, 1, 4, 3, 5],
        );

        let mut visited = Vec::new();
        set.for_each_in(Order::InOrder, |key| visited.push(*key));
        assert_eq!(visited, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_retain() {
        let mut set: RedBlackSet<u32> = (0..100).collect();
        set.retain(|key| key % 3 == 0);
        assert_eq!(set.len(), 34);
        assert!(set.iter().all(|key| key % 3 == 0));
        assert!(set.validate().is_ok());
    }

    #[test]
    fn test_clear() {
        let mut set: RedBlackSet<u32> = (0..10).collect();
        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.iter().next(), None);
        assert!(set.insert(1));
        assert!(set.validate().is_ok());
    }

    #[test]
    fn test_eq_and_debug() {
        let a: RedBlackSet<u32> = vec![3, 1, 2].into_iter().collect();
        let b: RedBlackSet<u32> = vec![1, 2, 3].into_iter().collect();
        assert_eq!(a, b);
        assert_eq!(format!("{:?}", a), "{1, 2, 3}");
        assert_eq!(a.clone(), b);
    }
}
