// Copyright 2024 Persistent Collections Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::rc::Rc;

use imm_bitops::{OwnerId, WIDTH};

use crate::error::Error;
use crate::node::Node;

/// The trie half of a persistent vector: always holds a number of elements
/// that is a multiple of [`WIDTH`]. The partially filled tail block is the
/// caller's responsibility (see `imm_collections::Vector`).
#[derive(Debug, Clone)]
pub struct Trie<T> {
    root: Rc<Node<T>>,
}

impl<T> Trie<T> {
    pub fn size(&self) -> usize {
        self.root.size()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn get(&self, index: usize) -> Result<&T, Error> {
        if index >= self.size() {
            return Err(Error::OutOfRange {
                index,
                size: self.size(),
            });
        }
        Ok(self.root.get(index))
    }

    pub fn last_leaf(&self) -> &[T] {
        if self.is_empty() {
            &[]
        } else {
            self.root.last_leaf_values()
        }
    }

    pub fn for_each<'a, F: FnMut(&'a T)>(&'a self, mut f: F) {
        self.root.for_each(&mut f)
    }

    pub fn iter(&self) -> crate::iter::Iter<'_, T> {
        crate::iter::Iter::new(&self.root)
    }
}

impl<T: Clone> Trie<T> {
    pub fn empty() -> Self {
        Trie {
            root: Node::empty_leaf(),
        }
    }

    /// Build a trie from a sequence whose length is a multiple of `WIDTH`,
    /// by repeatedly pushing full leaves.
    pub fn from_full_elements(elements: &[T]) -> Result<Self, Error> {
        if elements.len() % WIDTH != 0 {
            return Err(Error::BadArgument(format!(
                "from_full_elements requires a length that is a multiple of {WIDTH}, got {}",
                elements.len()
            )));
        }
        let mut root = Node::empty_leaf();
        for chunk in elements.chunks(WIDTH) {
            root = Node::push_leaf(root, chunk.to_vec(), None);
        }
        Ok(Trie { root })
    }

    pub fn update(&self, index: usize, value: T) -> Result<Self, Error> {
        if index >= self.size() {
            return Err(Error::OutOfRange {
                index,
                size: self.size(),
            });
        }
        Ok(Trie {
            root: Node::update(Rc::clone(&self.root), index, value, None),
        })
    }

    pub fn push_leaf(&self, leaf: Vec<T>) -> Result<Self, Error> {
        self.validate_leaf_push(&leaf)?;
        Ok(Trie {
            root: Node::push_leaf(Rc::clone(&self.root), leaf, None),
        })
    }

    pub fn pop_leaf(&self) -> Result<(Vec<T>, Self), Error> {
        if self.is_empty() {
            return Err(Error::OutOfRange {
                index: 0,
                size: 0,
            });
        }
        let (values, remainder) = Node::pop_leaf(Rc::clone(&self.root), None);
        Ok((
            values,
            Trie {
                root: remainder.unwrap_or_else(Node::empty_leaf),
            },
        ))
    }

    fn validate_leaf_push(&self, leaf: &[T]) -> Result<(), Error> {
        if leaf.is_empty() || leaf.len() > WIDTH {
            return Err(Error::BadArgument(format!(
                "leaf length must be in 1..={WIDTH}, got {}",
                leaf.len()
            )));
        }
        if self.size() % WIDTH != 0 {
            return Err(Error::BadArgument(format!(
                "cannot push a leaf onto a trie of size {} (not a multiple of {WIDTH})",
                self.size()
            )));
        }
        Ok(())
    }

    /// Spawn a transient view sharing structure with `self`, stamped with
    /// `owner`.
    pub fn transient(&self, owner: OwnerId) -> TransientTrie<T> {
        TransientTrie {
            root: Rc::clone(&self.root),
            owner,
        }
    }
}

/// A single-owner, in-place-mutable view over a vector trie.
///
/// Every mutating method takes `&mut self` and mutates `root` through
/// [`Node::for_mutate`]'s owner-tag check; nodes created before this
/// transient took over (or belonging to a different transient) are cloned
/// on first touch, exactly like the persistent path, and then mutated in
/// place on subsequent touches.
#[derive(Debug)]
pub struct TransientTrie<T> {
    root: Rc<Node<T>>,
    owner: OwnerId,
}

impl<T> TransientTrie<T> {
    pub fn size(&self) -> usize {
        self.root.size()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn get(&self, index: usize) -> Result<&T, Error> {
        if index >= self.size() {
            return Err(Error::OutOfRange {
                index,
                size: self.size(),
            });
        }
        Ok(self.root.get(index))
    }
}

impl<T: Clone> TransientTrie<T> {
    pub fn update(&mut self, index: usize, value: T) -> Result<(), Error> {
        if index >= self.size() {
            return Err(Error::OutOfRange {
                index,
                size: self.size(),
            });
        }
        let root = std::mem::replace(&mut self.root, Node::empty_leaf());
        self.root = Node::update(root, index, value, Some(self.owner));
        Ok(())
    }

    pub fn push_leaf(&mut self, leaf: Vec<T>) -> Result<(), Error> {
        if leaf.is_empty() || leaf.len() > WIDTH {
            return Err(Error::BadArgument(format!(
                "leaf length must be in 1..={WIDTH}, got {}",
                leaf.len()
            )));
        }
        if self.size() % WIDTH != 0 {
            return Err(Error::BadArgument(format!(
                "cannot push a leaf onto a trie of size {} (not a multiple of {WIDTH})",
                self.size()
            )));
        }
        let root = std::mem::replace(&mut self.root, Node::empty_leaf());
        self.root = Node::push_leaf(root, leaf, Some(self.owner));
        Ok(())
    }

    pub fn pop_leaf(&mut self) -> Result<Vec<T>, Error> {
        if self.is_empty() {
            return Err(Error::OutOfRange {
                index: 0,
                size: 0,
            });
        }
        let root = std::mem::replace(&mut self.root, Node::empty_leaf());
        let (values, remainder) = Node::pop_leaf(root, Some(self.owner));
        self.root = remainder.unwrap_or_else(Node::empty_leaf);
        Ok(values)
    }

    /// Clear the owner tag and hand back a persistent trie. The transient
    /// itself is consumed; callers track the `Active`/`Consumed` state
    /// machine (see `imm_collections`) since the trie layer has no notion
    /// of "already persisted" on its own.
    pub fn persist(self) -> Trie<T> {
        Trie { root: self.root }
    }
}
