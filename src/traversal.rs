//! Depth-first and breadth-first walks shared by every tree shape in the crate.
//!
//! Each walk is lazy and keeps its own stack or queue, so deep trees never grow the call stack.
//! Walks borrow the tree immutably, so they can be interleaved with lookups but never with a
//! mutation. Asking the set for a new walk restarts it; cloning a walk forks it at its current
//! position.

use std::collections::VecDeque;

/// A cheap, copyable reference to a node that the walks can navigate.
pub trait NodeRef: Copy {
    /// What a walk yields for each node, usually a reference to the key.
    type Item;

    fn item(self) -> Self::Item;
    fn left(self) -> Option<Self>;
    fn right(self) -> Option<Self>;
}

/// The order in which a traversal visits nodes.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Order {
    /// Node, then left subtree, then right subtree.
    PreOrder,
    /// Left subtree, then node, then right subtree. Yields keys in sorted order.
    InOrder,
    /// Left subtree, then right subtree, then node.
    PostOrder,
    /// Breadth-first, left to right within each depth.
    LevelOrder,
}

/// Pre-order walk.
#[derive(Clone)]
pub struct PreOrder<N> {
    stack: Vec<N>,
}

impl<N: NodeRef> PreOrder<N> {
    pub fn new(root: Option<N>) -> Self {
        PreOrder {
            stack: root.into_iter().collect(),
        }
    }
}

impl<N: NodeRef> Iterator for PreOrder<N> {
    type Item = N::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let Some(right) = node.right() {
            self.stack.push(right);
        }
        if let Some(left) = node.left() {
            self.stack.push(left);
        }
        Some(node.item())
    }
}

/// In-order walk.
#[derive(Clone)]
pub struct InOrder<N> {
    current: Option<N>,
    stack: Vec<N>,
}

impl<N: NodeRef> InOrder<N> {
    pub fn new(root: Option<N>) -> Self {
        InOrder {
            current: root,
            stack: Vec::new(),
        }
    }
}

impl<N: NodeRef> Iterator for InOrder<N> {
    type Item = N::Item;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.current {
            self.current = node.left();
            self.stack.push(node);
        }
        self.stack.pop().map(|node| {
            self.current = node.right();
            node.item()
        })
    }
}

/// Post-order walk.
#[derive(Clone)]
pub struct PostOrder<N> {
    // the flag records whether the node's children have already been pushed
    stack: Vec<(N, bool)>,
}

impl<N: NodeRef> PostOrder<N> {
    pub fn new(root: Option<N>) -> Self {
        PostOrder {
            stack: root.into_iter().map(|node| (node, false)).collect(),
        }
    }
}

impl<N: NodeRef> Iterator for PostOrder<N> {
    type Item = N::Item;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, expanded)) = self.stack.pop() {
            if expanded {
                return Some(node.item());
            }
            self.stack.push((node, true));
            if let Some(right) = node.right() {
                self.stack.push((right, false));
            }
            if let Some(left) = node.left() {
                self.stack.push((left, false));
            }
        }
        None
    }
}

/// Level-order (breadth-first) walk.
#[derive(Clone)]
pub struct LevelOrder<N> {
    queue: VecDeque<N>,
}

impl<N: NodeRef> LevelOrder<N> {
    pub fn new(root: Option<N>) -> Self {
        LevelOrder {
            queue: root.into_iter().collect(),
        }
    }
}

impl<N: NodeRef> Iterator for LevelOrder<N> {
    type Item = N::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.queue.pop_front()?;
        if let Some(left) = node.left() {
            self.queue.push_back(left);
        }
        if let Some(right) = node.right() {
            self.queue.push_back(right);
        }
        Some(node.item())
    }
}

/// A walk in any of the four orders, chosen at runtime.
#[derive(Clone)]
pub enum Traversal<N> {
    PreOrder(PreOrder<N>),
    InOrder(InOrder<N>),
    PostOrder(PostOrder<N>),
    LevelOrder(LevelOrder<N>),
}

impl<N: NodeRef> Traversal<N> {
    pub fn new(root: Option<N>, order: Order) -> Self {
        match order {
            Order::PreOrder => Traversal::PreOrder(PreOrder::new(root)),
            Order::InOrder => Traversal::InOrder(InOrder::new(root)),
            Order::PostOrder => Traversal::PostOrder(PostOrder::new(root)),
            Order::LevelOrder => Traversal::LevelOrder(LevelOrder::new(root)),
        }
    }
}

impl<N: NodeRef> Iterator for Traversal<N> {
    type Item = N::Item;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Traversal::PreOrder(iter) => iter.next(),
            Traversal::InOrder(iter) => iter.next(),
            Traversal::PostOrder(iter) => iter.next(),
            Traversal::LevelOrder(iter) => iter.next(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{NodeRef, Order, Traversal};

    // A fixed tree stored as (key, left, right) triples indexed by position.
    //
    //         4
    //       /   \
    //      2     6
    //     / \     \
    //    1   3     7
    const TREE: [(u32, Option<usize>, Option<usize>); 6] = [
        (4, Some(1), Some(2)),
        (2, Some(3), Some(4)),
        (6, None, Some(5)),
        (1, None, None),
        (3, None, None),
        (7, None, None),
    ];

    #[derive(Clone, Copy)]
    struct Fixed(usize);

    impl NodeRef for Fixed {
        type Item = u32;

        fn item(self) -> u32 {
            TREE[self.0].0
        }

        fn left(self) -> Option<Self> {
            TREE[self.0].1.map(Fixed)
        }

        fn right(self) -> Option<Self> {
            TREE[self.0].2.map(Fixed)
        }
    }

    fn walk(order: Order) -> Vec<u32> {
        Traversal::new(Some(Fixed(0)), order).collect()
    }

    #[test]
    fn test_pre_order() {
        assert_eq!(walk(Order::PreOrder), vec![4, 2, 1, 3, 6, 7]);
    }

    #[test]
    fn test_in_order() {
        assert_eq!(walk(Order::InOrder), vec![1, 2, 3, 4, 6, 7]);
    }

    #[test]
    fn test_post_order() {
        assert_eq!(walk(Order::PostOrder), vec![1, 3, 2, 7, 6, 4]);
    }

    #[test]
    fn test_level_order() {
        assert_eq!(walk(Order::LevelOrder), vec![4, 2, 6, 1, 3, 7]);
    }

    #[test]
    fn test_empty() {
        for &order in &[Order::PreOrder, Order::InOrder, Order::PostOrder, Order::LevelOrder] {
            assert_eq!(Traversal::<Fixed>::new(None, order).next(), None);
        }
    }

    #[test]
    fn test_clone_forks_position() {
        let mut walk = Traversal::new(Some(Fixed(0)), Order::InOrder);
        walk.next();
        walk.next();
        let fork = walk.clone();
        assert_eq!(walk.collect::<Vec<u32>>(), vec![3, 4, 6, 7]);
        assert_eq!(fork.collect::<Vec<u32>>(), vec![3, 4, 6, 7]);
    }
}
