// Copyright 2024 Persistent Collections Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::marker::PhantomData;
use std::rc::Rc;

use imm_bitops::{HashAlgorithm, OwnerId, SipHashAlgorithm};

use crate::error::Error;
use crate::node::Node;

/// A persistent hash-array-mapped trie keyed by `K`, storing `V`.
///
/// `H` selects the hashing strategy (see [`HashAlgorithm`]); it defaults to
/// [`SipHashAlgorithm`], the standard library's `DefaultHasher`.
#[derive(Debug)]
pub struct Hamt<K, V, H = SipHashAlgorithm> {
    root: Rc<Node<K, V>>,
    _hash: PhantomData<H>,
}

impl<K, V, H> Clone for Hamt<K, V, H> {
    fn clone(&self) -> Self {
        Hamt {
            root: Rc::clone(&self.root),
            _hash: PhantomData,
        }
    }
}

impl<K, V, H> Hamt<K, V, H> {
    pub fn size(&self) -> usize {
        self.root.size()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }
}

impl<K, V, H: HashAlgorithm> Hamt<K, V, H> {
    pub fn empty() -> Self {
        Hamt {
            root: Node::empty(0),
            _hash: PhantomData,
        }
    }
}

impl<K: Eq, V, H: HashAlgorithm> Hamt<K, V, H> {
    pub fn get(&self, key: &K) -> Option<&V>
    where
        K: std::hash::Hash,
    {
        self.root.get(H::hash(key), key)
    }

    pub fn fetch(&self, key: &K) -> Result<&V, Error>
    where
        K: std::hash::Hash,
    {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    pub fn contains_key(&self, key: &K) -> bool
    where
        K: std::hash::Hash,
    {
        self.get(key).is_some()
    }

    pub fn for_each<'a, F: FnMut(&'a K, &'a V)>(&'a self, mut f: F) {
        self.root.for_each(&mut f)
    }

    pub fn iter(&self) -> crate::iter::Iter<'_, K, V> {
        crate::iter::Iter::new(&self.root)
    }
}

impl<K: Eq + Clone + std::hash::Hash, V: Clone, H: HashAlgorithm> Hamt<K, V, H> {
    pub fn set(&self, key: K, value: V) -> Self {
        let hash = H::hash(&key);
        let (root, _) = Node::set::<H>(Rc::clone(&self.root), hash, key, value, None);
        Hamt {
            root,
            _hash: PhantomData,
        }
    }

    pub fn delete(&self, key: &K) -> Result<Self, Error> {
        let hash = H::hash(key);
        let (root, _) = Node::delete::<H>(Rc::clone(&self.root), hash, key, None)?;
        Ok(Hamt {
            root,
            _hash: PhantomData,
        })
    }

    pub fn transient(&self, owner: OwnerId) -> TransientHamt<K, V, H> {
        TransientHamt {
            root: Rc::clone(&self.root),
            owner,
            _hash: PhantomData,
        }
    }
}

/// A single-owner, in-place-mutable view over a HAMT. See
/// `imm_vector_trie::TransientTrie` for the mirrored design on the vector
/// side; both route through the same owner-tag discipline in their
/// respective `Node::for_mutate`.
#[derive(Debug)]
pub struct TransientHamt<K, V, H = SipHashAlgorithm> {
    root: Rc<Node<K, V>>,
    owner: OwnerId,
    _hash: PhantomData<H>,
}

impl<K, V, H> TransientHamt<K, V, H> {
    pub fn size(&self) -> usize {
        self.root.size()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }
}

impl<K: Eq + std::hash::Hash, V, H: HashAlgorithm> TransientHamt<K, V, H> {
    pub fn get(&self, key: &K) -> Option<&V> {
        self.root.get(H::hash(key), key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }
}

impl<K: Eq + Clone + std::hash::Hash, V: Clone, H: HashAlgorithm> TransientHamt<K, V, H> {
    pub fn set(&mut self, key: K, value: V) {
        let hash = H::hash(&key);
        let root = std::mem::replace(&mut self.root, Node::empty(0));
        let (root, _) = Node::set::<H>(root, hash, key, value, Some(self.owner));
        self.root = root;
    }

    pub fn delete(&mut self, key: &K) -> Result<V, Error> {
        let hash = H::hash(key);
        let root = std::mem::replace(&mut self.root, Node::empty(0));
        let (root, value) = Node::delete::<H>(root, hash, key, Some(self.owner))?;
        self.root = root;
        Ok(value)
    }

    pub fn persist(self) -> Hamt<K, V, H> {
        Hamt {
            root: self.root,
            _hash: PhantomData,
        }
    }
}
