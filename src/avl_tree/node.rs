use crate::avl_tree::tree;
use crate::traversal::NodeRef;
use std::cmp;

/// A struct representing an internal node of an avl tree.
#[derive(Clone)]
pub struct Node<T> {
    pub key: T,
    pub height: usize,
    pub left: tree::Tree<T>,
    pub right: tree::Tree<T>,
}

impl<T> Node<T> {
    pub fn new(key: T) -> Self {
        Node {
            key,
            height: 1,
            left: None,
            right: None,
        }
    }

    pub fn update(&mut self) {
        self.height = cmp::max(tree::height(&self.left), tree::height(&self.right)) + 1;
    }

    pub fn balance(&self) -> i64 {
        (tree::height(&self.left) as i64) - (tree::height(&self.right) as i64)
    }
}

impl<'a, T> NodeRef for &'a Node<T> {
    type Item = &'a T;

    fn item(self) -> &'a T {
        &self.key
    }

    fn left(self) -> Option<Self> {
        self.left.as_ref().map(|node| &**node)
    }

    fn right(self) -> Option<Self> {
        self.right.as_ref().map(|node| &**node)
    }
}
