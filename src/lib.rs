//! Ordered sets backed by self-balancing binary search trees.
//!
//! Two balancers implement the same [`OrderedSet`] contract and can be swapped freely:
//!
//! - [`AvlSet`]: keeps the heights of sibling subtrees within one of each other.
//! - [`RedBlackSet`]: keeps the tree approximately balanced with a color bit per node.
//!
//! Both reject duplicate keys, keep their element count cached, and expose pre-order,
//! in-order, post-order and level-order traversals through the [`traversal`] module.
//!
//! # Examples
//!
//! ```
//! use balanced_sets::{AvlSet, OrderedSet, RedBlackSet};
//!
//! fn fill<S: OrderedSet<u32>>(set: &mut S) {
//!     assert!(set.insert_all(vec![3, 1, 2]));
//!     assert!(set.contains_all(vec![1u32, 2, 3]));
//! }
//!
//! let mut avl = AvlSet::new();
//! let mut red_black = RedBlackSet::new();
//! fill(&mut avl);
//! fill(&mut red_black);
//!
//! assert_eq!(avl.to_vec(), red_black.to_vec());
//! ```

pub mod arena;
pub mod avl_tree;
pub mod error;
pub mod ordered_set;
pub mod red_black_tree;
pub mod traversal;

pub use crate::avl_tree::AvlSet;
pub use crate::error::InvariantError;
pub use crate::ordered_set::OrderedSet;
pub use crate::red_black_tree::RedBlackSet;
pub use crate::traversal::Order;
