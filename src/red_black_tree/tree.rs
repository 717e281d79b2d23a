use crate::arena::{Handle, TypedArena};
use crate::error::{InvariantError, Result};
use crate::red_black_tree::node::{Color, Node, Side};
use crate::traversal::NodeRef;
use log::trace;
use std::borrow::Borrow;
use std::cmp::{self, Ordering};
use std::mem;

/// A red black tree whose nodes live in an arena and link to their parents.
#[derive(Clone)]
pub struct Tree<T> {
    arena: TypedArena<Node<T>>,
    root: Option<Handle>,
    len: usize,
}

/// A copyable reference to a node of a `Tree<T>`, used to walk the tree.
pub struct Cursor<'a, T> {
    arena: &'a TypedArena<Node<T>>,
    handle: Handle,
}

impl<'a, T> Clone for Cursor<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for Cursor<'a, T> {}

impl<'a, T> Cursor<'a, T> {
    fn to(self, handle: Option<Handle>) -> Option<Self> {
        handle.map(|handle| Cursor {
            arena: self.arena,
            handle,
        })
    }
}

impl<'a, T> NodeRef for Cursor<'a, T> {
    type Item = &'a T;

    fn item(self) -> &'a T {
        let arena: &'a TypedArena<Node<T>> = self.arena;
        &arena[self.handle].key
    }

    fn left(self) -> Option<Self> {
        self.to(self.arena[self.handle].left)
    }

    fn right(self) -> Option<Self> {
        self.to(self.arena[self.handle].right)
    }
}

impl<T> Tree<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Tree {
            arena: TypedArena::with_capacity(capacity),
            root: None,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
        self.len = 0;
    }

    pub fn cursor(&self) -> Option<Cursor<'_, T>> {
        self.root.map(|handle| Cursor {
            arena: &self.arena,
            handle,
        })
    }

    fn is_red(&self, handle: Option<Handle>) -> bool {
        handle.map_or(false, |handle| self.arena[handle].is_red())
    }

    fn side_of(&self, child: Handle, parent: Handle) -> Side {
        if self.arena[parent].left == Some(child) {
            Side::Left
        } else {
            Side::Right
        }
    }

    // Points whatever referenced `old` (a parent's child slot, or the root) at `new`.
    fn replace_child(&mut self, parent: Option<Handle>, old: Handle, new: Option<Handle>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let side = self.side_of(old, parent);
                self.arena[parent].set_child(side, new);
            },
        }
    }

    // Rotates `node` down towards `side`; its child on the opposite side takes its place.
    fn rotate(&mut self, node: Handle, side: Side) {
        let pivot = self.arena[node]
            .child(side.opposite())
            .expect("Expected rotation pivot to be `Some`.");
        let inner = self.arena[pivot].child(side);

        self.arena[node].set_child(side.opposite(), inner);
        if let Some(inner) = inner {
            self.arena[inner].parent = Some(node);
        }

        let parent = self.arena[node].parent;
        self.arena[pivot].parent = parent;
        self.replace_child(parent, node, Some(pivot));

        self.arena[pivot].set_child(side, Some(node));
        self.arena[node].parent = Some(pivot);
    }

    fn leftmost(&self, mut handle: Handle) -> Handle {
        while let Some(left) = self.arena[handle].left {
            handle = left;
        }
        handle
    }

    fn rightmost(&self, mut handle: Handle) -> Handle {
        while let Some(right) = self.arena[handle].right {
            handle = right;
        }
        handle
    }

    pub fn min(&self) -> Option<&T> {
        self.root.map(|root| &self.arena[self.leftmost(root)].key)
    }

    pub fn max(&self) -> Option<&T> {
        self.root.map(|root| &self.arena[self.rightmost(root)].key)
    }

    /// Returns the number of nodes on the longest path from the root to a leaf.
    pub fn height(&self) -> usize {
        self.subtree_height(self.root)
    }

    fn subtree_height(&self, handle: Option<Handle>) -> usize {
        match handle {
            None => 0,
            Some(handle) => {
                let node = &self.arena[handle];
                cmp::max(self.subtree_height(node.left), self.subtree_height(node.right)) + 1
            },
        }
    }

    /// Returns the number of black nodes between the root (exclusive) and any null leaf.
    pub fn black_height(&self) -> usize {
        let mut black_height = 0;
        let mut curr = self.root.and_then(|root| self.arena[root].left);
        while let Some(handle) = curr {
            if !self.arena[handle].is_red() {
                black_height += 1;
            }
            curr = self.arena[handle].left;
        }
        black_height
    }

    /// Consumes the tree, returning its arena and the handles of its nodes in key order.
    pub fn into_sorted_handles(self) -> (TypedArena<Node<T>>, Vec<Handle>) {
        let mut handles = Vec::with_capacity(self.len);
        let mut stack = Vec::new();
        let mut curr = self.root;
        loop {
            while let Some(handle) = curr {
                stack.push(handle);
                curr = self.arena[handle].left;
            }
            match stack.pop() {
                Some(handle) => {
                    handles.push(handle);
                    curr = self.arena[handle].right;
                },
                None => break,
            }
        }
        (self.arena, handles)
    }
}

impl<T> Tree<T>
where
    T: Ord,
{
    pub fn insert(&mut self, key: T) -> bool {
        let mut parent = None;
        let mut side = Side::Left;
        let mut curr = self.root;
        while let Some(handle) = curr {
            let node = &self.arena[handle];
            side = match key.cmp(&node.key) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => return false,
            };
            parent = Some(handle);
            curr = node.child(side);
        }

        let handle = self.arena.allocate(Node::new(key, parent));
        match parent {
            None => self.root = Some(handle),
            Some(parent) => self.arena[parent].set_child(side, Some(handle)),
        }
        self.len += 1;
        self.insert_fixup(handle);
        true
    }

    fn insert_fixup(&mut self, mut node: Handle) {
        while let Some(parent) = self.arena[node].parent {
            if !self.arena[parent].is_red() {
                break;
            }
            let grandparent = self.arena[parent]
                .parent
                .expect("Expected a red node to have a parent.");
            let parent_side = self.side_of(parent, grandparent);

            match self.arena[grandparent].child(parent_side.opposite()) {
                Some(uncle) if self.arena[uncle].is_red() => {
                    trace!("red black: insert fixup, recoloring around red uncle");
                    self.arena[parent].color = Color::Black;
                    self.arena[uncle].color = Color::Black;
                    self.arena[grandparent].color = Color::Red;
                    node = grandparent;
                },
                _ => {
                    let mut parent = parent;
                    if self.side_of(node, parent) != parent_side {
                        trace!("red black: insert fixup, rotating inner grandchild outwards");
                        self.rotate(parent, parent_side);
                        parent = node;
                    }
                    trace!("red black: insert fixup, rotating grandparent");
                    self.arena[parent].color = Color::Black;
                    self.arena[grandparent].color = Color::Red;
                    self.rotate(grandparent, parent_side.opposite());
                    break;
                },
            }
        }

        if let Some(root) = self.root {
            self.arena[root].color = Color::Black;
        }
    }

    fn find<Q>(&self, key: &Q) -> Option<Handle>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut curr = self.root;
        while let Some(handle) = curr {
            let node = &self.arena[handle];
            match key.cmp(node.key.borrow()) {
                Ordering::Less => curr = node.left,
                Ordering::Greater => curr = node.right,
                Ordering::Equal => return Some(handle),
            }
        }
        None
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let target = self.find(key)?;

        // a node with two children keeps its place and takes its successor's key instead; the
        // successor has at most one child and is the node that is actually detached
        let detached = match (self.arena[target].left, self.arena[target].right) {
            (Some(_), Some(right)) => self.leftmost(right),
            _ => target,
        };

        let child = self.arena[detached].left.or(self.arena[detached].right);
        let parent = self.arena[detached].parent;
        let side = parent.map(|parent| self.side_of(detached, parent));

        self.replace_child(parent, detached, child);
        if let Some(child) = child {
            self.arena[child].parent = parent;
        }

        let Node { key: detached_key, color, .. } = self.arena.free(detached);
        self.len -= 1;

        let key = if detached == target {
            detached_key
        } else {
            mem::replace(&mut self.arena[target].key, detached_key)
        };

        if color == Color::Black {
            self.remove_fixup(child, parent, side.unwrap_or(Side::Left));
        }
        Some(key)
    }

    // Restores the black height after a black node was detached. `node` is whatever now sits
    // in the vacated slot, which is the `side` child of `parent` and may be empty.
    fn remove_fixup(&mut self, mut node: Option<Handle>, mut parent: Option<Handle>, mut side: Side) {
        while let Some(curr_parent) = parent {
            if self.is_red(node) {
                break;
            }

            let mut sibling = self.arena[curr_parent]
                .child(side.opposite())
                .expect("Expected a doubly black node to have a sibling.");

            if self.arena[sibling].is_red() {
                trace!("red black: remove fixup, red sibling");
                self.arena[sibling].color = Color::Black;
                self.arena[curr_parent].color = Color::Red;
                self.rotate(curr_parent, side);
                sibling = self.arena[curr_parent]
                    .child(side.opposite())
                    .expect("Expected a doubly black node to have a sibling.");
            }

            let near = self.arena[sibling].child(side);
            let far = self.arena[sibling].child(side.opposite());

            if !self.is_red(near) && !self.is_red(far) {
                trace!("red black: remove fixup, black sibling with black children");
                self.arena[sibling].color = Color::Red;
                node = Some(curr_parent);
                parent = self.arena[curr_parent].parent;
                if let Some(grandparent) = parent {
                    side = self.side_of(curr_parent, grandparent);
                }
                continue;
            }

            if !self.is_red(far) {
                trace!("red black: remove fixup, black sibling with red near child");
                let near = near.expect("Expected near child to be red.");
                self.arena[near].color = Color::Black;
                self.arena[sibling].color = Color::Red;
                self.rotate(sibling, side.opposite());
                sibling = near;
            }

            trace!("red black: remove fixup, black sibling with red far child");
            let parent_color = self.arena[curr_parent].color;
            self.arena[sibling].color = parent_color;
            self.arena[curr_parent].color = Color::Black;
            if let Some(far) = self.arena[sibling].child(side.opposite()) {
                self.arena[far].color = Color::Black;
            }
            self.rotate(curr_parent, side);
            node = self.root;
            break;
        }

        if let Some(node) = node {
            self.arena[node].color = Color::Black;
        }
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|handle| &self.arena[handle].key)
    }

    pub fn floor<Q>(&self, key: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut best = None;
        let mut curr = self.root;
        while let Some(handle) = curr {
            let node = &self.arena[handle];
            match key.cmp(node.key.borrow()) {
                Ordering::Less => curr = node.left,
                Ordering::Greater => {
                    best = Some(&node.key);
                    curr = node.right;
                },
                Ordering::Equal => return Some(&node.key),
            }
        }
        best
    }

    pub fn ceil<Q>(&self, key: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut best = None;
        let mut curr = self.root;
        while let Some(handle) = curr {
            let node = &self.arena[handle];
            match key.cmp(node.key.borrow()) {
                Ordering::Greater => curr = node.right,
                Ordering::Less => {
                    best = Some(&node.key);
                    curr = node.left;
                },
                Ordering::Equal => return Some(&node.key),
            }
        }
        best
    }

    /// Checks search order, parent links, the color rules, uniform black height and the
    /// cached length.
    pub fn validate(&self) -> Result<()> {
        if let Some(root) = self.root {
            if self.arena[root].is_red() {
                return Err(InvariantError::RedRoot);
            }
        }

        let (_, actual) = self.check(self.root, None, None, None)?;
        if actual != self.len || actual != self.arena.len() {
            return Err(InvariantError::LengthMismatch {
                cached: self.len,
                actual,
            });
        }
        Ok(())
    }

    // returns (black height including the null leaves, node count) of a subtree
    fn check(
        &self,
        handle: Option<Handle>,
        parent: Option<Handle>,
        lower: Option<&T>,
        upper: Option<&T>,
    ) -> Result<(usize, usize)> {
        let handle = match handle {
            None => return Ok((1, 0)),
            Some(handle) => handle,
        };
        let node = self
            .arena
            .get(handle)
            .ok_or(InvariantError::BrokenParentLink)?;

        if node.parent != parent {
            return Err(InvariantError::BrokenParentLink);
        }

        if lower.map_or(false, |lower| *lower >= node.key)
            || upper.map_or(false, |upper| *upper <= node.key)
        {
            return Err(InvariantError::OutOfOrder);
        }

        if node.is_red() && (self.is_red(node.left) || self.is_red(node.right)) {
            return Err(InvariantError::RedViolation);
        }

        let (left, left_count) = self.check(node.left, Some(handle), lower, Some(&node.key))?;
        let (right, right_count) = self.check(node.right, Some(handle), Some(&node.key), upper)?;
        if left != right {
            return Err(InvariantError::BlackHeightMismatch { left, right });
        }

        let own = if node.is_red() { 0 } else { 1 };
        Ok((left + own, left_count + right_count + 1))
    }
}
