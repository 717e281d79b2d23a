use crate::avl_tree::node::Node;
use crate::avl_tree::tree;
use crate::error::InvariantError;
use crate::ordered_set::{OrderedSet, SeqVisitor};
use crate::traversal::{InOrder, Order, Traversal};
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::borrow::Borrow;
use std::fmt;
use std::iter::FromIterator;

/// An ordered set implemented using an avl tree.
///
/// An avl tree is a self-balancing binary search tree that maintains the invariant that the
/// heights of two child subtrees of any node differ by at most one. Every insertion and
/// removal walks back up its search path, recomputing heights and rotating wherever a balance
/// factor leaves [-1, 1].
///
/// # Examples
///
/// ```
/// use balanced_sets::AvlSet;
///
/// let mut set = AvlSet::new();
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
pub struct AvlSet<T> {
    tree: tree::Tree<T>,
    len: usize,
}

impl<T> AvlSet<T> {
    /// Constructs a new, empty `AvlSet<T>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_sets::AvlSet;
    ///
    /// let set: AvlSet<u32> = AvlSet::new();
    /// ```
    pub fn new() -> Self {
        AvlSet { tree: None, len: 0 }
    }

    /// Returns the number of keys in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_sets::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Clears the set, dropping every key.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_sets::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// set.insert(2);
    /// set.clear();
    /// assert!(set.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.tree = None;
        self.len = 0;
    }

    /// Returns the height of the underlying tree. An empty set has height 0.
    pub fn height(&self) -> usize {
        tree::height(&self.tree)
    }

    /// Returns the minimum key of the set. Returns `None` if the set is empty.
    pub fn min(&self) -> Option<&T> {
        tree::min(&self.tree)
    }

    /// Returns the maximum key of the set. Returns `None` if the set is empty.
    pub fn max(&self) -> Option<&T> {
        tree::max(&self.tree)
    }

    fn root(&self) -> Option<&Node<T>> {
        self.tree.as_ref().map(|node| &**node)
    }

    /// Returns an iterator over the set. The iterator will yield keys using in-order traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_sets::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(3);
    /// set.insert(1);
    ///
    /// let mut iterator = set.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.next(), Some(&3));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> AvlSetIter<'_, T> {
        AvlSetIter {
            inner: InOrder::new(self.root()),
            remaining: self.len,
        }
    }

    /// Returns an iterator that walks the tree in the given order.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_sets::{AvlSet, Order};
    ///
    /// let set: AvlSet<u32> = (1..=3).collect();
    /// assert_eq!(set.traverse(Order::PreOrder).collect::<Vec<_>>(), vec![&2, &1, &3]);
    /// assert_eq!(set.traverse(Order::PostOrder).collect::<Vec<_>>(), vec![&1, &3, &2]);
    /// ```
    pub fn traverse(&self, order: Order) -> impl Iterator<Item = &T> + Clone + '_ {
        Traversal::new(self.root(), order)
    }

    /// Calls `visitor` on every key in the given order.
    pub fn for_each_in<F>(&self, order: Order, visitor: F)
    where
        F: FnMut(&T),
    {
        self.traverse(order).for_each(visitor);
    }
}

impl<T> AvlSet<T>
where
    T: Ord,
{
    /// Inserts a key into the set. Returns `false` and leaves the set untouched if the key is
    /// already present.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_sets::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// assert!(set.insert(1));
    /// assert!(set.contains(&1));
    /// assert!(!set.insert(1));
    /// ```
    pub fn insert(&mut self, key: T) -> bool {
        let inserted = tree::insert(&mut self.tree, key);
        if inserted {
            self.len += 1;
            self.check_invariants();
        }
        inserted
    }

    /// Removes a key from the set. Returns `true` if the key was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_sets::AvlSet;
    ///
    /// let mut set = AvlSet::new();
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
        let ret = tree::remove(&mut self.tree, key);
        if ret.is_some() {
            self.len -= 1;
            self.check_invariants();
        }
        ret
    }

    /// Checks if a key exists in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_sets::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// assert!(!set.contains(&0));
    /// assert!(set.contains(&1));
    /// ```
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Returns a reference to the key in the set that compares equal to `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        tree::get(&self.tree, key)
    }

    /// Returns a key in the set that is less than or equal to a particular key. Returns `None` if
    /// such a key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_sets::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// assert_eq!(set.floor(&0), None);
    /// assert_eq!(set.floor(&2), Some(&1));
    /// ```
    pub fn floor<Q>(&self, key: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        tree::floor(&self.tree, key)
    }

    /// Returns a key in the set that is greater than or equal to a particular key. Returns `None`
    /// if such a key does not exist.
    pub fn ceil<Q>(&self, key: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        tree::ceil(&self.tree, key)
    }

    /// Retains only the keys for which `f` returns `true`.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_sets::AvlSet;
    ///
    /// let mut set: AvlSet<u32> = (1..=6).collect();
    /// set.retain(|key| key % 2 == 0);
    /// assert_eq!(set.iter().collect::<Vec<_>>(), vec![&2, &4, &6]);
    /// ```
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&T) -> bool,
    {
        let keys = AvlSetIntoIter {
            current: self.tree.take(),
            stack: Vec::new(),
        };
        self.len = 0;
        for key in keys {
            if f(&key) {
                self.insert(key);
            }
        }
    }

    /// Checks every structural invariant of the tree: search order, cached heights, balance
    /// factors and the cached length.
    pub fn validate(&self) -> Result<(), InvariantError> {
        let actual = tree::validate(&self.tree)?;
        if actual != self.len {
            return Err(InvariantError::LengthMismatch {
                cached: self.len,
                actual,
            });
        }
        Ok(())
    }

    fn check_invariants(&self) {
        if cfg!(feature = "check-invariants") {
            if let Err(error) = self.validate() {
                panic!("avl tree invariant violated: {}", error);
            }
        }
    }
}

impl<T> OrderedSet<T> for AvlSet<T>
where
    T: Ord,
{
    fn insert(&mut self, key: T) -> bool {
        AvlSet::insert(self, key)
    }

    fn remove(&mut self, key: &T) -> bool {
        AvlSet::remove(self, key)
    }

    fn contains(&self, key: &T) -> bool {
        AvlSet::contains(self, key)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        AvlSet::clear(self)
    }

    fn for_each_in(&self, order: Order, visitor: &mut dyn FnMut(&T)) {
        AvlSet::for_each_in(self, order, visitor)
    }
}

impl<T> IntoIterator for AvlSet<T> {
    type Item = T;
    type IntoIter = AvlSetIntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        Self::IntoIter {
            current: self.tree,
            stack: Vec::new(),
        }
    }
}

impl<'a, T> IntoIterator for &'a AvlSet<T>
where
    T: 'a,
{
    type Item = &'a T;
    type IntoIter = AvlSetIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `AvlSet<T>`.
///
/// This iterator traverses the elements of the set in-order and yields owned keys.
pub struct AvlSetIntoIter<T> {
    current: tree::Tree<T>,
    stack: Vec<Node<T>>,
}

impl<T> Iterator for AvlSetIntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(mut node) = self.current.take() {
            self.current = node.left.take();
            self.stack.push(*node);
        }
        self.stack.pop().map(|node| {
            let Node { key, right, .. } = node;
            self.current = right;
            key
        })
    }
}

/// An iterator for `AvlSet<T>`.
///
/// This iterator traverses the elements of the set in-order and yields immutable references.
#[derive(Clone)]
pub struct AvlSetIter<'a, T> {
    inner: InOrder<&'a Node<T>>,
    remaining: usize,
}

impl<'a, T> Iterator for AvlSetIter<'a, T> {
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

impl<'a, T> ExactSizeIterator for AvlSetIter<'a, T> {}

impl<T> Default for AvlSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for AvlSet<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T> PartialEq for AvlSet<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &AvlSet<T>) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T> Eq for AvlSet<T> where T: Eq {}

impl<T> Extend<T> for AvlSet<T>
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

impl<T> FromIterator<T> for AvlSet<T>
where
    T: Ord,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut set = AvlSet::new();
        set.extend(iter);
        set
    }
}

impl<T> Serialize for AvlSet<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len))?;
        for key in self {
            seq.serialize_element(key)?;
        }
        seq.end()
    }
}

impl<'de, T> Deserialize<'de> for AvlSet<T>
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
    use super::AvlSet;
    use crate::traversal::Order;

    #[test]
    fn test_len_empty() {
        let set: AvlSet<u32> = AvlSet::new();
        assert_eq!(set.len(), 0);
        assert_eq!(set.height(), 0);
    }

    #[test]
    fn test_is_empty() {
        let set: AvlSet<u32> = AvlSet::new();
        assert!(set.is_empty());
    }

    #[test]
    fn test_min_max_empty() {
        let set: AvlSet<u32> = AvlSet::new();
        assert_eq!(set.min(), None);
        assert_eq!(set.max(), None);
    }

    #[test]
    fn test_insert() {
        let mut set = AvlSet::new();
        assert!(set.insert(1));
        assert!(set.contains(&1));
    }

    #[test]
    fn test_insert_duplicate() {
        let mut set = AvlSet::new();
        assert!(set.insert(1));
        assert!(!set.insert(1));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut set = AvlSet::new();
        set.insert(1);
        assert!(set.remove(&1));
        assert!(!set.contains(&1));
        assert!(!set.remove(&1));
    }

    #[test]
    fn test_take() {
        let mut set = AvlSet::new();
        set.insert(String::from("a"));
        assert_eq!(set.take("a"), Some(String::from("a")));
        assert_eq!(set.take("a"), None);
    }

    #[test]
    fn test_min_max() {
        let mut set = AvlSet::new();
        set.insert(1);
        set.insert(3);
        set.insert(5);

        assert_eq!(set.min(), Some(&1));
        assert_eq!(set.max(), Some(&5));
    }

    #[test]
    fn test_floor_ceil() {
        let mut set = AvlSet::new();
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
        let mut set = AvlSet::new();
        set.insert(1);
        set.insert(5);
        set.insert(3);

        assert_eq!(set.into_iter().collect::<Vec<u32>>(), vec![1, 3, 5]);
    }

    #[test]
    fn test_iter() {
        let mut set = AvlSet::new();
        set.insert(1);
        set.insert(5);
        set.insert(3);

        let iter = set.iter();
        assert_eq!(iter.len(), 3);
        assert_eq!(iter.collect::<Vec<&u32>>(), vec![&1, &3, &5]);
    }

    #[test]
    fn test_traverse() {
        let set: AvlSet<u32> = (1..=7).collect();

        assert_eq!(
            set.traverse(Order::PreOrder).cloned().collect::<Vec<u32>>(),
            vec![4, 2, 1, 3, 6, 5, 7],
        );
        assert_eq!(
            set.traverse(Order::PostOrder).cloned().collect::<Vec<u32>>(),
            vec![1, 3, 2, 5, 7, 6, 4],
        );
        assert_eq!(
            set.traverse(Order::LevelOrder).cloned().collect::<Vec<u32>>(),
            vec![4, 2, 6, 1, 3, 5, 7],
        );

        let mut visited = Vec::new();
        set.for_each_in(Order::InOrder, |key| visited.push(*key));
        assert_eq!(visited, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_retain() {
        let mut set: AvlSet<u32> = (0..100).collect();
        set.retain(|key| key % 3 == 0);
        assert_eq!(set.len(), 34);
        assert!(set.iter().all(|key| key % 3 == 0));
        assert!(set.validate().is_ok());
    }

    #[test]
    fn test_clear() {
        let mut set: AvlSet<u32> = (0..10).collect();
        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.iter().next(), None);
        assert!(set.insert(1));
    }

    #[test]
    fn test_eq_and_debug() {
        let a: AvlSet<u32> = vec![3, 1, 2].into_iter().collect();
        let b: AvlSet<u32> = vec![1, 2, 3].into_iter().collect();
        assert_eq!(a, b);
        assert_eq!(format!("{:?}", a), "{1, 2, 3}");
        assert_eq!(a.clone(), b);
    }
}
