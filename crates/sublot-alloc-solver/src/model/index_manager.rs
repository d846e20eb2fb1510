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

use crate::model::index::{CrateIndex, LocationIndex, PartIndex};
use sublot_alloc_core::prelude::Interner;
use sublot_alloc_model::prelude::{CrateIdentifier, Location, PartNumber};

/// Dense indices for the crates, locations and parts of one allocation model.
///
/// Keys are sorted before interning, so indices follow the natural order of
/// the identifiers and the built model is independent of input order.
#[derive(Debug, Clone)]
pub struct SolverIndexManager {
    crates: Interner<CrateIdentifier, CrateIndex>,
    locations: Interner<Location, LocationIndex>,
    parts: Interner<PartNumber, PartIndex>,
}

impl SolverIndexManager {
    pub fn new<C, L, P>(crates: C, locations: L, parts: P) -> Self
    where
        C: IntoIterator<Item = CrateIdentifier>,
        L: IntoIterator<Item = Location>,
        P: IntoIterator<Item = PartNumber>,
    {
        Self {
            crates: sorted(crates),
            locations: sorted(locations),
            parts: sorted(parts),
        }
    }

    #[inline]
    pub fn crate_index(&self, id: &CrateIdentifier) -> Option<CrateIndex> {
        self.crates.index_of(id)
    }

    #[inline]
    pub fn location_index(&self, location: &Location) -> Option<LocationIndex> {
        self.locations.index_of(location)
    }

    #[inline]
    pub fn part_index(&self, part: &PartNumber) -> Option<PartIndex> {
        self.parts.index_of(part)
    }

    #[inline]
    pub fn crate_id(&self, i: CrateIndex) -> Option<&CrateIdentifier> {
        self.crates.key(i)
    }

    #[inline]
    pub fn location(&self, i: LocationIndex) -> Option<&Location> {
        self.locations.key(i)
    }

    #[inline]
    pub fn part(&self, i: PartIndex) -> Option<&PartNumber> {
        self.parts.key(i)
    }

    #[inline]
    pub fn crates_len(&self) -> usize {
        self.crates.len()
    }

    #[inline]
    pub fn locations_len(&self) -> usize {
        self.locations.len()
    }

    #[inline]
    pub fn parts_len(&self) -> usize {
        self.parts.len()
    }

    #[inline]
    pub fn iter_crates(&self) -> impl Iterator<Item = (CrateIndex, &CrateIdentifier)> + '_ {
        self.crates.iter()
    }

    #[inline]
    pub fn iter_locations(&self) -> impl Iterator<Item = (LocationIndex, &Location)> + '_ {
        self.locations.iter()
    }

    #[inline]
    pub fn iter_parts(&self) -> impl Iterator<Item = (PartIndex, &PartNumber)> + '_ {
        self.parts.iter()
    }
}

fn sorted<K, Ix, I>(keys: I) -> Interner<K, Ix>
where
    K: Clone + Ord + std::hash::Hash,
    Ix: sublot_alloc_core::prelude::DenseIndex,
    I: IntoIterator<Item = K>,
{
    let mut keys: Vec<K> = keys.into_iter().collect();
    keys.sort_unstable();
    keys.dedup();
    keys.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[inline]
    fn cid(s: &str) -> CrateIdentifier {
        CrateIdentifier::from(s)
    }

    #[inline]
    fn loc(s: &str) -> Location {
        Location::parse(s).unwrap()
    }

    #[inline]
    fn pn(s: &str) -> PartNumber {
        PartNumber::from(s)
    }

    #[test]
    fn test_indices_follow_sorted_identifiers() {
        let m = SolverIndexManager::new(
            [cid("C"), cid("A"), cid("B")],
            [loc("2.10"), loc("2.9")],
            [pn("P2"), pn("P1"), pn("P2")],
        );

        assert_eq!(m.crates_len(), 3);
        assert_eq!(m.locations_len(), 2);
        assert_eq!(m.parts_len(), 2);

        assert_eq!(m.crate_index(&cid("A")), Some(CrateIndex(0)));
        assert_eq!(m.crate_index(&cid("C")), Some(CrateIndex(2)));
        // "02.09" sorts before "02.10" once padded.
        assert_eq!(m.location(LocationIndex(0)), Some(&loc("2.9")));
        assert_eq!(m.part_index(&pn("P2")), Some(PartIndex(1)));
    }

    #[test]
    fn test_unknown_keys_and_indices_are_none() {
        let m = SolverIndexManager::new([cid("A")], [loc("1")], [pn("P1")]);
        assert_eq!(m.crate_index(&cid("Z")), None);
        assert_eq!(m.location_index(&loc("9")), None);
        assert_eq!(m.part(PartIndex(3)), None);
        assert_eq!(m.crate_id(CrateIndex(0)), Some(&cid("A")));
    }

    #[test]
    fn test_iteration_yields_index_key_pairs() {
        let m = SolverIndexManager::new([cid("B"), cid("A")], [loc("1")], [pn("P1")]);
        let ids: Vec<(usize, &str)> = m.iter_crates().map(|(i, c)| (i.get(), c.as_str())).collect();
        assert_eq!(ids, vec![(0, "A"), (1, "B")]);
    }
}
