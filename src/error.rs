//! Errors reported when a tree fails its structural checks.

use std::error;
use std::fmt;
use std::result;

/// A violated tree invariant, as reported by `validate` on either set.
///
/// A correct implementation never produces one of these; they exist so that tests and the
/// `check-invariants` feature can pinpoint which rule a corrupted tree breaks.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum InvariantError {
    /// A key is not strictly between the keys of its left and right subtrees.
    OutOfOrder,
    /// A node's cached AVL height differs from the height of its subtree.
    HeightMismatch { stored: usize, actual: usize },
    /// A node's subtree heights differ by more than one.
    Unbalanced { balance: i64 },
    /// The root of a red-black tree is red.
    RedRoot,
    /// A red node has a red child.
    RedViolation,
    /// Two paths from the same node to a null leaf cross different numbers of black nodes.
    BlackHeightMismatch { left: usize, right: usize },
    /// A node's parent link is not the inverse of a child link.
    BrokenParentLink,
    /// The cached element count differs from the number of nodes in the tree.
    LengthMismatch { cached: usize, actual: usize },
}

pub type Result<T> = result::Result<T, InvariantError>;

impl error::Error for InvariantError {}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InvariantError::OutOfOrder => write!(f, "keys are not in search tree order"),
            InvariantError::HeightMismatch { stored, actual } => {
                write!(f, "cached height {} does not match subtree height {}", stored, actual)
            },
            InvariantError::Unbalanced { balance } => {
                write!(f, "balance factor {} is outside of [-1, 1]", balance)
            },
            InvariantError::RedRoot => write!(f, "root is red"),
            InvariantError::RedViolation => write!(f, "red node has a red child"),
            InvariantError::BlackHeightMismatch { left, right } => {
                write!(f, "black heights of siblings differ ({} and {})", left, right)
            },
            InvariantError::BrokenParentLink => {
                write!(f, "parent link does not match child link")
            },
            InvariantError::LengthMismatch { cached, actual } => {
                write!(f, "cached length {} does not match node count {}", cached, actual)
            },
        }
    }
}
