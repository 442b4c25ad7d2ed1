// Copyright 2024 Persistent Collections Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use imm_bitops::{next_owner_id, OwnerId, WIDTH};
use imm_vector_trie::{TransientTrie, Trie};
use log::trace;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::Error;

/// A persistent, integer-indexed sequence.
///
/// Backed by [`imm_vector_trie::Trie`] for everything but the last partially
/// filled block of up to `WIDTH - 1` elements, which lives in `tail`. That
/// split is what keeps [`Vector::push`]/[`Vector::pop`] O(1) amortized
/// instead of O(log n): only one push or pop in every `WIDTH` ever touches
/// the trie.
#[derive(Debug, Clone)]
pub struct Vector<T: Clone> {
    body: Trie<T>,
    tail: Vec<T>,
}

impl<T: Clone> Vector<T> {
    pub fn empty() -> Self {
        Vector {
            body: Trie::empty(),
            tail: Vec::new(),
        }
    }

    /// Build from a slice, splitting it into full `WIDTH`-sized leaves for
    /// the trie and a remainder tail.
    pub fn from_slice(elements: &[T]) -> Self {
        let full_len = elements.len() - elements.len() % WIDTH;
        let (full, tail) = elements.split_at(full_len);
        let body = Trie::from_full_elements(full)
            .expect("full_len is always a multiple of WIDTH by construction");
        Vector {
            body,
            tail: tail.to_vec(),
        }
    }

    pub fn of(elements: Vec<T>) -> Self {
        Self::from_slice(&elements)
    }

    pub fn size(&self) -> usize {
        self.body.size() + self.tail.len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn any(&self) -> bool {
        !self.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&T, Error> {
        let body_size = self.body.size();
        if index < body_size {
            self.body.get(index).map_err(Error::from)
        } else if index < self.size() {
            Ok(&self.tail[index - body_size])
        } else {
            Err(Error::OutOfRange {
                index,
                size: self.size(),
            })
        }
    }

    pub fn get_opt(&self, index: usize) -> Option<&T> {
        self.get(index).ok()
    }

    pub fn at(&self, index: usize, fallback: T) -> T {
        self.get(index).cloned().unwrap_or(fallback)
    }

    pub fn first(&self) -> Result<&T, Error> {
        self.get(0)
    }

    pub fn first_opt(&self) -> Option<&T> {
        self.get_opt(0)
    }

    pub fn last(&self) -> Result<&T, Error> {
        if self.is_empty() {
            Err(Error::OutOfRange { index: 0, size: 0 })
        } else {
            self.get(self.size() - 1)
        }
    }

    pub fn last_opt(&self) -> Option<&T> {
        self.last().ok()
    }

    pub fn set(&self, index: usize, value: T) -> Result<Self, Error> {
        let body_size = self.body.size();
        if index < body_size {
            let body = self.body.update(index, value).map_err(Error::from)?;
            Ok(Vector {
                body,
                tail: self.tail.clone(),
            })
        } else if index < self.size() {
            let mut tail = self.tail.clone();
            tail[index - body_size] = value;
            Ok(Vector {
                body: self.body.clone(),
                tail,
            })
        } else {
            Err(Error::OutOfRange {
                index,
                size: self.size(),
            })
        }
    }

    pub fn push(&self, value: T) -> Self {
        let mut tail = self.tail.clone();
        tail.push(value);
        if tail.len() == WIDTH {
            let body = self
                .body
                .push_leaf(tail)
                .expect("tail reaching WIDTH always leaves the body at a multiple of WIDTH");
            Vector {
                body,
                tail: Vec::new(),
            }
        } else {
            Vector {
                body: self.body.clone(),
                tail,
            }
        }
    }

    pub fn pop(&self) -> Result<(T, Self), Error> {
        if !self.tail.is_empty() {
            let mut tail = self.tail.clone();
            let popped = tail.pop().expect("checked non-empty above");
            Ok((
                popped,
                Vector {
                    body: self.body.clone(),
                    tail,
                },
            ))
        } else if !self.body.is_empty() {
            let (mut leaf, body) = self.body.pop_leaf().map_err(Error::from)?;
            let popped = leaf.pop().expect("pop_leaf never returns an empty leaf");
            Ok((popped, Vector { body, tail: leaf }))
        } else {
            Err(Error::OutOfRange { index: 0, size: 0 })
        }
    }

    pub fn pop_opt(&self) -> (Option<T>, Self) {
        match self.pop() {
            Ok((value, rest)) => (Some(value), rest),
            Err(_) => (None, self.clone()),
        }
    }

    pub fn for_each<F: FnMut(&T)>(&self, mut f: F) {
        self.body.for_each(|v| f(v));
        self.tail.iter().for_each(f);
    }

    pub fn iter(&self) -> std::iter::Chain<imm_vector_trie::Iter<'_, T>, std::slice::Iter<'_, T>> {
        self.body.iter().chain(self.tail.iter())
    }

    pub fn equals_by<F: Fn(&T, &T) -> bool>(&self, other: &Self, predicate: F) -> bool {
        self.size() == other.size() && self.iter().zip(other.iter()).all(|(a, b)| predicate(a, b))
    }

    pub fn to_transient(&self) -> Transient<T> {
        let owner = next_owner_id();
        trace!("spawning vector transient with owner {owner:?}");
        Transient {
            state: TransientState::Active {
                body: self.body.transient(owner),
                tail: self.tail.clone(),
            },
            owner,
        }
    }

    /// Run `f` against a fresh transient view of `self` and persist the
    /// result, mirroring the `transient { |t| ... }` block pattern.
    pub fn transient<F: FnOnce(&mut Transient<T>)>(&self, f: F) -> Self {
        let mut t = self.to_transient();
        f(&mut t);
        trace!("persisting vector transient with owner {:?}", t.owner);
        t.persist()
            .expect("the closure given to Vector::transient must not outlive its own persist")
    }
}

impl<T: Clone + PartialEq> PartialEq for Vector<T> {
    fn eq(&self, other: &Self) -> bool {
        self.size() == other.size() && self.iter().eq(other.iter())
    }
}

impl<T: Clone + Eq> Eq for Vector<T> {}

impl<T: Clone + PartialOrd> PartialOrd for Vector<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Clone + Hash> Hash for Vector<T> {
    fn hash<Hs: Hasher>(&self, state: &mut Hs) {
        self.size().hash(state);
        self.iter().for_each(|v| v.hash(state));
    }
}

impl<T: Clone> std::ops::Add for Vector<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.transient(|t| {
            rhs.iter().for_each(|v| {
                let _ = t.push(v.clone());
            });
        })
    }
}

impl<T: Clone + Eq + Hash> Vector<T> {
    pub fn difference(&self, other: &Self) -> Self {
        let exclude: HashSet<T> = other.iter().cloned().collect();
        let kept: Vec<T> = self
            .iter()
            .filter(|v| !exclude.contains(*v))
            .cloned()
            .collect();
        Vector::from_slice(&kept)
    }

    pub fn intersection(&self, other: &Self) -> Self {
        let allowed: HashSet<T> = other.iter().cloned().collect();
        let mut seen: HashSet<T> = HashSet::new();
        let kept: Vec<T> = self
            .iter()
            .filter(|v| allowed.contains(*v) && seen.insert((**v).clone()))
            .cloned()
            .collect();
        Vector::from_slice(&kept)
    }

    pub fn union(&self, other: &Self) -> Self {
        let mut seen: HashSet<T> = HashSet::new();
        let merged: Vec<T> = self
            .iter()
            .chain(other.iter())
            .filter(|v| seen.insert((**v).clone()))
            .cloned()
            .collect();
        Vector::from_slice(&merged)
    }

    pub fn uniq(&self) -> Self {
        let mut seen: HashSet<T> = HashSet::new();
        let deduped: Vec<T> = self
            .iter()
            .filter(|v| seen.insert((**v).clone()))
            .cloned()
            .collect();
        Vector::from_slice(&deduped)
    }
}

impl<T: Clone + Eq + Hash> std::ops::Sub for Vector<T> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        self.difference(&rhs)
    }
}

impl<T: Clone + Eq + Hash> std::ops::BitAnd for Vector<T> {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        self.intersection(&rhs)
    }
}

impl<T: Clone + Eq + Hash> std::ops::BitOr for Vector<T> {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        self.union(&rhs)
    }
}

impl<T: Clone + Serialize> Vector<T> {
    pub fn to_native_sequence(&self) -> Value {
        Value::Array(
            self.iter()
                .map(|v| serde_json::to_value(v).expect("T must serialize to JSON"))
                .collect(),
        )
    }

    pub fn to_textual(&self) -> String {
        format!("Vector {}", self.to_native_sequence())
    }
}

impl<T: Clone + DeserializeOwned> Vector<T> {
    pub fn from_native_sequence(value: &Value) -> Result<Self, Error> {
        let items: Vec<T> = serde_json::from_value(value.clone())
            .map_err(|err| Error::BadArgument(err.to_string()))?;
        Ok(Self::from_slice(&items))
    }
}

impl<T: Clone> FromIterator<T> for Vector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Vector::of(iter.into_iter().collect())
    }
}

impl<T: Clone> Extend<T> for Vector<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let mut result = self.clone();
        for value in iter {
            result = result.push(value);
        }
        *self = result;
    }
}

impl<'a, T: Clone> IntoIterator for &'a Vector<T> {
    type Item = &'a T;
    type IntoIter = std::iter::Chain<imm_vector_trie::Iter<'a, T>, std::slice::Iter<'a, T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

enum TransientState<T> {
    Active { body: TransientTrie<T>, tail: Vec<T> },
    Consumed,
}

/// A single-owner, in-place-mutable view over a [`Vector`], spawned by
/// [`Vector::to_transient`] or [`Vector::transient`].
///
/// Every mutating call here goes through [`TransientTrie`]'s owner-tag
/// discipline on the trie side; the tail itself is a plain owned `Vec`
/// (already single-owner by construction, nothing further to arbitrate).
/// Once [`Transient::persist`] has run, the state becomes `Consumed` and
/// every further call returns [`Error::InvalidTransient`] instead of
/// relying on Rust's ownership to make reuse merely inexpressible.
pub struct Transient<T: Clone> {
    state: TransientState<T>,
    owner: OwnerId,
}

impl<T: Clone> Transient<T> {
    fn active(&mut self) -> Result<(&mut TransientTrie<T>, &mut Vec<T>), Error> {
        match &mut self.state {
            TransientState::Active { body, tail } => Ok((body, tail)),
            TransientState::Consumed => Err(Error::InvalidTransient),
        }
    }

    pub fn size(&self) -> usize {
        match &self.state {
            TransientState::Active { body, tail } => body.size() + tail.len(),
            TransientState::Consumed => 0,
        }
    }

    pub fn get(&self, index: usize) -> Result<&T, Error> {
        match &self.state {
            TransientState::Consumed => Err(Error::InvalidTransient),
            TransientState::Active { body, tail } => {
                let body_size = body.size();
                if index < body_size {
                    body.get(index).map_err(Error::from)
                } else if index < body_size + tail.len() {
                    Ok(&tail[index - body_size])
                } else {
                    Err(Error::OutOfRange {
                        index,
                        size: body_size + tail.len(),
                    })
                }
            }
        }
    }

    pub fn push(&mut self, value: T) -> Result<(), Error> {
        let (body, tail) = self.active()?;
        tail.push(value);
        if tail.len() == WIDTH {
            let leaf = std::mem::take(tail);
            body.push_leaf(leaf).map_err(Error::from)?;
        }
        Ok(())
    }

    pub fn pop(&mut self) -> Result<T, Error> {
        let (body, tail) = self.active()?;
        if let Some(value) = tail.pop() {
            Ok(value)
        } else if !body.is_empty() {
            let mut leaf = body.pop_leaf().map_err(Error::from)?;
            let popped = leaf.pop().expect("pop_leaf never returns an empty leaf");
            *tail = leaf;
            Ok(popped)
        } else {
            Err(Error::OutOfRange { index: 0, size: 0 })
        }
    }

    pub fn set(&mut self, index: usize, value: T) -> Result<(), Error> {
        let (body, tail) = self.active()?;
        let body_size = body.size();
        if index < body_size {
            body.update(index, value).map_err(Error::from)
        } else if index < body_size + tail.len() {
            tail[index - body_size] = value;
            Ok(())
        } else {
            Err(Error::OutOfRange {
                index,
                size: body_size + tail.len(),
            })
        }
    }

    pub fn persist(&mut self) -> Result<Vector<T>, Error> {
        match std::mem::replace(&mut self.state, TransientState::Consumed) {
            TransientState::Active { body, tail } => Ok(Vector {
                body: body.persist(),
                tail,
            }),
            TransientState::Consumed => Err(Error::InvalidTransient),
        }
    }
}
