//! The contract shared by every balanced set in the crate.

use crate::traversal::Order;
use serde::de::{Deserialize, SeqAccess, Visitor};
use std::borrow::Borrow;
use std::fmt;
use std::marker::PhantomData;

/// An ordered set of unique keys.
///
/// `AvlSet` and `RedBlackSet` both implement this trait, so code that only needs set semantics
/// can be written once and handed either balancer. Keys that compare equal are duplicates even
/// if they differ in other ways; callers that need several values per comparison key must
/// make the key itself composite.
///
/// The single-key primitives are object safe. The bulk adapters are built from them and apply
/// every element independently: one element failing (a duplicate insert, an absent remove)
/// never stops the rest of the batch.
///
/// # Examples
///
/// ```
/// use balanced_sets::{AvlSet, OrderedSet, RedBlackSet};
///
/// let mut sets: Vec<Box<dyn OrderedSet<u32>>> = vec![
///     Box::new(AvlSet::new()),
///     Box::new(RedBlackSet::new()),
/// ];
///
/// for set in &mut sets {
///     assert!(set.insert(1));
///     assert!(!set.insert(1));
///     assert_eq!(set.len(), 1);
/// }
/// ```
pub trait OrderedSet<T>
where
    T: Ord,
{
    /// Inserts a key. Returns `false`, leaving the set untouched, if the key is already present.
    fn insert(&mut self, key: T) -> bool;

    /// Removes a key. Returns `false` if the key was not present.
    fn remove(&mut self, key: &T) -> bool;

    /// Returns `true` if the set contains the key.
    fn contains(&self, key: &T) -> bool;

    /// Returns the number of keys in the set.
    fn len(&self) -> usize;

    /// Returns `true` if the set holds no keys.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every key.
    fn clear(&mut self);

    /// Calls `visitor` on every key in the given order.
    fn for_each_in(&self, order: Order, visitor: &mut dyn FnMut(&T));

    /// Returns the keys in sorted order.
    fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        let mut keys = Vec::with_capacity(self.len());
        self.for_each_in(Order::InOrder, &mut |key: &T| keys.push(key.clone()));
        keys
    }

    /// Inserts every key. Returns `true` if the set changed, that is if at least one key was
    /// not already present.
    fn insert_all<I>(&mut self, keys: I) -> bool
    where
        I: IntoIterator<Item = T>,
        Self: Sized,
    {
        keys.into_iter()
            .fold(false, |changed, key| self.insert(key) || changed)
    }

    /// Removes every key. Returns `true` if the set changed, that is if at least one key was
    /// present. Absent keys are skipped.
    fn remove_all<I>(&mut self, keys: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
        Self: Sized,
    {
        keys.into_iter()
            .fold(false, |changed, key| self.remove(key.borrow()) || changed)
    }

    /// Returns `true` if every key is present. An empty batch is trivially contained.
    fn contains_all<I>(&self, keys: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
        Self: Sized,
    {
        keys.into_iter().all(|key| self.contains(key.borrow()))
    }
}

/// Deserializes any default-constructible `OrderedSet` from a sequence of keys.
pub(crate) struct SeqVisitor<S, T> {
    marker: PhantomData<fn() -> (S, T)>,
}

impl<S, T> SeqVisitor<S, T> {
    pub(crate) fn new() -> Self {
        SeqVisitor {
            marker: PhantomData,
        }
    }
}

impl<'de, S, T> Visitor<'de> for SeqVisitor<S, T>
where
    S: OrderedSet<T> + Default,
    T: Deserialize<'de> + Ord,
{
    type Value = S;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence of keys")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut set = S::default();
        while let Some(key) = seq.next_element()? {
            set.insert(key);
        }
        Ok(set)
    }
}
