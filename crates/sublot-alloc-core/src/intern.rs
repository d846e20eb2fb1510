// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use std::{collections::HashMap, hash::Hash};

/// A dense `usize` index handed out by an [`Interner`].
pub trait DenseIndex: Copy + Eq + Ord + Hash {
    fn new(index: usize) -> Self;
    fn get(self) -> usize;
}

/// Maps keys to dense indices `0..len` in insertion order, and back.
#[derive(Debug, Clone)]
pub struct Interner<K, Ix> {
    to_index: HashMap<K, Ix>,
    to_key: Vec<K>,
}

impl<K, Ix> Default for Interner<K, Ix> {
    fn default() -> Self {
        Self {
            to_index: HashMap::new(),
            to_key: Vec::new(),
        }
    }
}

impl<K, Ix> Interner<K, Ix>
where
    K: Clone + Eq + Hash,
    Ix: DenseIndex,
{
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index of `key`, assigning the next free one if unseen.
    #[inline]
    pub fn intern(&mut self, key: K) -> Ix {
        if let Some(&ix) = self.to_index.get(&key) {
            return ix;
        }
        let ix = Ix::new(self.to_key.len());
        self.to_key.push(key.clone());
        self.to_index.insert(key, ix);
        ix
    }

    #[inline]
    pub fn index_of(&self, key: &K) -> Option<Ix> {
        self.to_index.get(key).copied()
    }

    #[inline]
    pub fn key(&self, ix: Ix) -> Option<&K> {
        self.to_key.get(ix.get())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.to_key.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.to_key.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (Ix, &K)> + '_ {
        self.to_key.iter().enumerate().map(|(i, k)| (Ix::new(i), k))
    }
}

impl<K, Ix> FromIterator<K> for Interner<K, Ix>
where
    K: Clone + Eq + Hash,
    Ix: DenseIndex,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut interner = Self::new();
        for k in iter {
            interner.intern(k);
        }
        interner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    struct Ix(usize);

    impl DenseIndex for Ix {
        fn new(index: usize) -> Self {
            Ix(index)
        }
        fn get(self) -> usize {
            self.0
        }
    }

    #[test]
    fn test_intern_assigns_dense_indices_in_insertion_order() {
        let mut i: Interner<&str, Ix> = Interner::new();
        assert_eq!(i.intern("b"), Ix(0));
        assert_eq!(i.intern("a"), Ix(1));
        assert_eq!(i.intern("b"), Ix(0));
        assert_eq!(i.len(), 2);
        assert_eq!(i.key(Ix(1)), Some(&"a"));
        assert_eq!(i.index_of(&"a"), Some(Ix(1)));
    }

    #[test]
    fn test_unknown_lookups_return_none() {
        let i: Interner<String, Ix> = Interner::new();
        assert!(i.is_empty());
        assert_eq!(i.index_of(&"x".to_string()), None);
        assert_eq!(i.key(Ix(0)), None);
    }

    #[test]
    fn test_from_iter_dedups_and_iterates() {
        let i: Interner<u32, Ix> = [7, 3, 7, 9].into_iter().collect();
        let pairs: Vec<_> = i.iter().map(|(ix, k)| (ix.get(), *k)).collect();
        assert_eq!(pairs, vec![(0, 7), (1, 3), (2, 9)]);
    }
}
