use crate::avl_tree::node::Node;
use crate::error::{InvariantError, Result};
use log::trace;
use std::borrow::Borrow;
use std::cmp::{self, Ordering};
use std::mem;

pub type Tree<T> = Option<Box<Node<T>>>;

pub fn height<T>(tree: &Tree<T>) -> usize {
    match tree {
        None => 0,
        Some(node) => node.height,
    }
}

fn rotate_left<T>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    let mut child = node
        .right
        .take()
        .expect("Expected right child node to be `Some`.");
    node.right = child.left.take();
    node.update();
    child.left = Some(node);
    child.update();
    child
}

fn rotate_right<T>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    let mut child = node
        .left
        .take()
        .expect("Expected left child node to be `Some`.");
    node.left = child.right.take();
    node.update();
    child.right = Some(node);
    child.update();
    child
}

// Recomputes the height of the root of `tree` and restores its balance factor to [-1, 1],
// assuming both subtrees are already valid avl trees.
fn balance<T>(tree: &mut Tree<T>) {
    let mut node = match tree.take() {
        Some(node) => node,
        None => return,
    };

    node.update();

    let balance = node.balance();
    if balance > 1 {
        if let Some(child) = node.left.take() {
            if child.balance() < 0 {
                trace!("avl: left-right rotation at height {}", node.height);
                node.left = Some(rotate_left(child));
            } else {
                trace!("avl: right rotation at height {}", node.height);
                node.left = Some(child);
            }
        }
        node = rotate_right(node);
    } else if balance < -1 {
        if let Some(child) = node.right.take() {
            if child.balance() > 0 {
                trace!("avl: right-left rotation at height {}", node.height);
                node.right = Some(rotate_right(child));
            } else {
                trace!("avl: left rotation at height {}", node.height);
                node.right = Some(child);
            }
        }
        node = rotate_left(node);
    }

    *tree = Some(node);
}

// precondition: there exists a minimum node in the tree
fn remove_min<T>(tree: &mut Tree<T>) -> Box<Node<T>> {
    if let Some(node) = tree {
        if node.left.is_some() {
            let min = remove_min(&mut node.left);
            balance(tree);
            return min;
        }
    }

    let mut node = tree.take().expect("Expected a non-empty tree.");
    *tree = node.right.take();
    node
}

// precondition: the tree is non-empty
fn remove_root<T>(tree: &mut Tree<T>) -> T {
    let mut node = tree.take().expect("Expected a non-empty tree.");
    match (node.left.take(), node.right.take()) {
        (None, child) | (child, None) => {
            *tree = child;
            node.key
        },
        (left, mut right) => {
            // the successor is detached and its key takes the place of the removed one
            let successor = remove_min(&mut right);
            node.left = left;
            node.right = right;
            let key = mem::replace(&mut node.key, successor.key);
            *tree = Some(node);
            key
        },
    }
}

pub fn insert<T>(tree: &mut Tree<T>, key: T) -> bool
where
    T: Ord,
{
    let inserted = match tree {
        Some(node) => match key.cmp(&node.key) {
            Ordering::Less => insert(&mut node.left, key),
            Ordering::Greater => insert(&mut node.right, key),
            Ordering::Equal => return false,
        },
        None => {
            *tree = Some(Box::new(Node::new(key)));
            return true;
        },
    };

    if inserted {
        balance(tree);
    }
    inserted
}

pub fn remove<T, Q>(tree: &mut Tree<T>, key: &Q) -> Option<T>
where
    T: Borrow<Q>,
    Q: Ord + ?Sized,
{
    let ret = {
        let node = tree.as_mut()?;
        match key.cmp(node.key.borrow()) {
            Ordering::Less => remove(&mut node.left, key),
            Ordering::Greater => remove(&mut node.right, key),
            Ordering::Equal => Some(remove_root(tree)),
        }
    };

    if ret.is_some() {
        balance(tree);
    }
    ret
}

pub fn get<'a, T, Q>(tree: &'a Tree<T>, key: &Q) -> Option<&'a T>
where
    T: Borrow<Q>,
    Q: Ord + ?Sized,
{
    let mut curr = tree;
    while let Some(node) = curr {
        match key.cmp(node.key.borrow()) {
            Ordering::Less => curr = &node.left,
            Ordering::Greater => curr = &node.right,
            Ordering::Equal => return Some(&node.key),
        }
    }
    None
}

pub fn ceil<'a, T, Q>(tree: &'a Tree<T>, key: &Q) -> Option<&'a T>
where
    T: Borrow<Q>,
    Q: Ord + ?Sized,
{
    tree.as_ref().and_then(|node| {
        match key.cmp(node.key.borrow()) {
            Ordering::Greater => ceil(&node.right, key),
            Ordering::Less => {
                match ceil(&node.left, key) {
                    None => Some(&node.key),
                    res => res,
                }
            },
            Ordering::Equal => Some(&node.key),
        }
    })
}

pub fn floor<'a, T, Q>(tree: &'a Tree<T>, key: &Q) -> Option<&'a T>
where
    T: Borrow<Q>,
    Q: Ord + ?Sized,
{
    tree.as_ref().and_then(|node| {
        match key.cmp(node.key.borrow()) {
            Ordering::Less => floor(&node.left, key),
            Ordering::Greater => {
                match floor(&node.right, key) {
                    None => Some(&node.key),
                    res => res,
                }
            },
            Ordering::Equal => Some(&node.key),
        }
    })
}

pub fn min<T>(tree: &Tree<T>) -> Option<&T> {
    tree.as_ref().map(|node| {
        let mut curr = node;
        while let Some(left_node) = &curr.left {
            curr = left_node;
        }
        &curr.key
    })
}

pub fn max<T>(tree: &Tree<T>) -> Option<&T> {
    tree.as_ref().map(|node| {
        let mut curr = node;
        while let Some(right_node) = &curr.right {
            curr = right_node;
        }
        &curr.key
    })
}

/// Checks order, cached heights and balance factors. Returns the number of nodes.
pub fn validate<T>(tree: &Tree<T>) -> Result<usize>
where
    T: Ord,
{
    check(tree, None, None).map(|(_, count)| count)
}

// returns (height, node count) of a subtree whose keys must lie strictly between the bounds
fn check<T>(tree: &Tree<T>, lower: Option<&T>, upper: Option<&T>) -> Result<(usize, usize)>
where
    T: Ord,
{
    let node = match tree {
        None => return Ok((0, 0)),
        Some(node) => node,
    };

    if lower.map_or(false, |lower| *lower >= node.key)
        || upper.map_or(false, |upper| *upper <= node.key)
    {
        return Err(InvariantError::OutOfOrder);
    }

    let (left_height, left_count) = check(&node.left, lower, Some(&node.key))?;
    let (right_height, right_count) = check(&node.right, Some(&node.key), upper)?;

    let actual = cmp::max(left_height, right_height) + 1;
    if node.height != actual {
        return Err(InvariantError::HeightMismatch {
            stored: node.height,
            actual,
        });
    }

    let balance = left_height as i64 - right_height as i64;
    if balance.abs() > 1 {
        return Err(InvariantError::Unbalanced { balance });
    }

    Ok((actual, left_count + right_count + 1))
}
