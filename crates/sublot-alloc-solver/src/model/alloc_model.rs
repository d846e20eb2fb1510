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

use crate::{
    err::InfeasibleError,
    milp::config::CandidateScope,
    model::{
        index::{CrateIndex, LocationIndex, PartIndex},
        index_manager::SolverIndexManager,
    },
    netting::{NetTable, extract::FreeCrates},
};
use std::collections::{BTreeMap, BTreeSet};
use sublot_alloc_core::prelude::Quantity;
use sublot_alloc_model::prelude::{CrateIdentifier, FreeCrate, Location, PartNumber};

/// The dense data the MILP is built from.
///
/// Parts are those carried by free crates. Candidate locations are those with
/// unmet demand for at least one such part, filtered by [`CandidateScope`].
#[derive(Debug, Clone)]
pub struct AllocationModel<'p> {
    index_manager: SolverIndexManager,
    crates: Vec<FreeCrate<'p>>, // len = C
    quantities: Vec<Quantity>,  // len = C * P
    remaining: Vec<Quantity>,   // len = P * L, still owed before assignment
    carried: Vec<Quantity>,     // len = P * L, already over before assignment
}

impl<'p> AllocationModel<'p> {
    pub fn build(
        net: &NetTable,
        free: &FreeCrates<'p>,
        scope: CandidateScope,
    ) -> Result<Self, InfeasibleError> {
        let parts: BTreeSet<&PartNumber> = free.parts();

        let candidates: BTreeSet<&Location> = net
            .iter()
            .filter(|(l, p, q)| {
                q.is_negative()
                    && parts.contains(p)
                    && (scope == CandidateScope::AllDemand || net.is_active(l))
            })
            .map(|(l, _, _)| l)
            .collect();

        if candidates.is_empty() && !free.is_empty() {
            return Err(InfeasibleError::new(free.ids(), Vec::new()));
        }

        let index_manager = SolverIndexManager::new(
            free.iter().map(|c| c.id().clone()),
            candidates.into_iter().cloned(),
            parts.into_iter().cloned(),
        );

        let by_id: BTreeMap<&CrateIdentifier, &FreeCrate<'p>> =
            free.iter().map(|c| (c.id(), c)).collect();
        let crates: Vec<FreeCrate<'p>> = index_manager
            .iter_crates()
            .filter_map(|(_, id)| by_id.get(id).map(|c| **c))
            .collect();

        let cl = index_manager.crates_len();
        let pl = index_manager.parts_len();
        let ll = index_manager.locations_len();

        let mut quantities = vec![Quantity::ZERO; cl * pl];
        for (ci, c) in crates.iter().enumerate() {
            for (part, &q) in c.bom() {
                if let Some(pi) = index_manager.part_index(part) {
                    quantities[ci * pl + pi.get()] = q;
                }
            }
        }

        let mut remaining = vec![Quantity::ZERO; pl * ll];
        let mut carried = vec![Quantity::ZERO; pl * ll];
        for (pi, part) in index_manager.iter_parts() {
            for (li, location) in index_manager.iter_locations() {
                let n = net.net(location, part);
                remaining[pi.get() * ll + li.get()] = n.negative_part();
                carried[pi.get() * ll + li.get()] = n.positive_part();
            }
        }

        tracing::debug!(
            "Model: {} crates x {} locations, {} parts",
            cl,
            ll,
            pl
        );

        Ok(Self {
            index_manager,
            crates,
            quantities,
            remaining,
            carried,
        })
    }

    #[inline]
    pub fn index_manager(&self) -> &SolverIndexManager {
        &self.index_manager
    }

    #[inline]
    pub fn crates_len(&self) -> usize {
        self.index_manager.crates_len()
    }

    #[inline]
    pub fn locations_len(&self) -> usize {
        self.index_manager.locations_len()
    }

    #[inline]
    pub fn parts_len(&self) -> usize {
        self.index_manager.parts_len()
    }

    #[inline]
    pub fn free_crate(&self, c: CrateIndex) -> &FreeCrate<'p> {
        debug_assert!(c.get() < self.crates.len());
        &self.crates[c.get()]
    }

    #[inline]
    pub fn candidate_locations(&self) -> Vec<Location> {
        self.index_manager
            .iter_locations()
            .map(|(_, l)| l.clone())
            .collect()
    }

    #[inline]
    pub fn quantity(&self, c: CrateIndex, p: PartIndex) -> Quantity {
        self.quantities[c.get() * self.parts_len() + p.get()]
    }

    #[inline]
    pub fn remaining(&self, p: PartIndex, l: LocationIndex) -> Quantity {
        self.remaining[self.pair_index(p, l)]
    }

    #[inline]
    pub fn carried(&self, p: PartIndex, l: LocationIndex) -> Quantity {
        self.carried[self.pair_index(p, l)]
    }

    /// Flat index of a (part, location) pair, row-major by part.
    #[inline(always)]
    pub fn pair_index(&self, p: PartIndex, l: LocationIndex) -> usize {
        debug_assert!(p.get() < self.parts_len());
        debug_assert!(l.get() < self.locations_len());

        p.get() * self.locations_len() + l.get()
    }

    /// Flat index of a (crate, location) decision, row-major by crate.
    #[inline(always)]
    pub fn decision_index(&self, c: CrateIndex, l: LocationIndex) -> usize {
        debug_assert!(c.get() < self.crates_len());
        debug_assert!(l.get() < self.locations_len());

        c.get() * self.locations_len() + l.get()
    }

    #[inline]
    pub fn iter_crate_indices(&self) -> impl Iterator<Item = CrateIndex> {
        (0..self.crates_len()).map(CrateIndex::new)
    }

    #[inline]
    pub fn iter_location_indices(&self) -> impl Iterator<Item = LocationIndex> {
        (0..self.locations_len()).map(LocationIndex::new)
    }

    #[inline]
    pub fn iter_part_indices(&self) -> impl Iterator<Item = PartIndex> {
        (0..self.parts_len()).map(PartIndex::new)
    }

    /// Incoming quantity per (part, location) when crate `c` goes to `assignment[c]`.
    pub fn incoming(&self, assignment: &[LocationIndex]) -> Vec<Quantity> {
        debug_assert_eq!(assignment.len(), self.crates_len());

        let mut incoming = vec![Quantity::ZERO; self.parts_len() * self.locations_len()];
        for (ci, &l) in assignment.iter().enumerate() {
            let c = CrateIndex::new(ci);
            for p in self.iter_part_indices() {
                let q = self.quantity(c, p);
                if q.is_positive() {
                    incoming[self.pair_index(p, l)] += q;
                }
            }
        }
        incoming
    }

    /// Exact surplus per (part, location) under `assignment`.
    pub fn surplus_under(&self, assignment: &[LocationIndex]) -> Vec<Quantity> {
        let incoming = self.incoming(assignment);
        (0..incoming.len())
            .map(|i| (self.carried[i] + incoming[i] - self.remaining[i]).positive_part())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netting::{NettingEngine, extract::FreeCrateExtractor};
    use sublot_alloc_model::prelude::{AllocationProblem, Crate, ProblemBuilder};

    #[inline]
    fn pn(s: &str) -> PartNumber {
        PartNumber::from(s)
    }

    #[inline]
    fn loc(s: &str) -> Location {
        Location::parse(s).unwrap()
    }

    #[inline]
    fn q(v: i64) -> Quantity {
        Quantity::new(v)
    }

    fn mk_crate(id: &str, location: Option<&str>, parts: &[(&str, i64)]) -> Crate {
        let bom = parts.iter().map(|(p, n)| (pn(p), q(*n))).collect();
        Crate::new(CrateIdentifier::from(id), None, location.map(loc), bom).unwrap()
    }

    // L1 and L2 are active through located P9 crates; L3 has demand but no supply.
    fn problem() -> AllocationProblem {
        let mut b = ProblemBuilder::new();
        b.add_demand(loc("1"), pn("P1"), q(4)).unwrap();
        b.add_demand(loc("2"), pn("P1"), q(2)).unwrap();
        b.add_demand(loc("2"), pn("P2"), q(1)).unwrap();
        b.add_demand(loc("3"), pn("P1"), q(5)).unwrap();
        b.add_demand(loc("4"), pn("P7"), q(5)).unwrap();
        b.add_crate(mk_crate("S1", Some("1"), &[("P9", 1)]));
        b.add_crate(mk_crate("S2", Some("2"), &[("P9", 1), ("P2", 3)]));
        b.add_crate(mk_crate("S4", Some("4"), &[("P7", 1)]));
        b.add_crate(mk_crate("A", None, &[("P1", 5)]));
        b.add_crate(mk_crate("B", None, &[("P1", 3), ("P2", 1)]));
        b.build().unwrap()
    }

    #[test]
    fn test_candidates_are_active_unfulfilled_for_free_parts() {
        let p = problem();
        let net = NettingEngine::net(&p);
        let free = FreeCrateExtractor::extract(&p);
        let m = AllocationModel::build(&net, &free, CandidateScope::ActiveLocations).unwrap();

        // L4 is active and short of P7, but no free crate carries P7.
        assert_eq!(m.candidate_locations(), vec![loc("1"), loc("2")]);
        assert_eq!(m.crates_len(), 2);
        assert_eq!(m.parts_len(), 2);
    }

    #[test]
    fn test_all_demand_scope_adds_inactive_locations() {
        let p = problem();
        let net = NettingEngine::net(&p);
        let free = FreeCrateExtractor::extract(&p);
        let m = AllocationModel::build(&net, &free, CandidateScope::AllDemand).unwrap();
        assert_eq!(m.candidate_locations(), vec![loc("1"), loc("2"), loc("3")]);
    }

    #[test]
    fn test_dense_tables() {
        let p = problem();
        let net = NettingEngine::net(&p);
        let free = FreeCrateExtractor::extract(&p);
        let m = AllocationModel::build(&net, &free, CandidateScope::ActiveLocations).unwrap();
        let im = m.index_manager();

        let a = im.crate_index(&CrateIdentifier::from("A")).unwrap();
        let b = im.crate_index(&CrateIdentifier::from("B")).unwrap();
        let p1 = im.part_index(&pn("P1")).unwrap();
        let p2 = im.part_index(&pn("P2")).unwrap();
        let l1 = im.location_index(&loc("1")).unwrap();
        let l2 = im.location_index(&loc("2")).unwrap();

        assert_eq!(m.free_crate(a).id().as_str(), "A");
        assert_eq!(m.quantity(a, p1), q(5));
        assert_eq!(m.quantity(a, p2), Quantity::ZERO);
        assert_eq!(m.quantity(b, p2), q(1));

        assert_eq!(m.remaining(p1, l1), q(4));
        assert_eq!(m.remaining(p1, l2), q(2));
        // S2 brought 3 of P2 against a demand of 1.
        assert_eq!(m.remaining(p2, l2), Quantity::ZERO);
        assert_eq!(m.carried(p2, l2), q(2));
        assert_eq!(m.carried(p2, l1), Quantity::ZERO);
    }

    #[test]
    fn test_surplus_under_assignment() {
        let p = problem();
        let net = NettingEngine::net(&p);
        let free = FreeCrateExtractor::extract(&p);
        let m = AllocationModel::build(&net, &free, CandidateScope::ActiveLocations).unwrap();
        let im = m.index_manager();
        let p1 = im.part_index(&pn("P1")).unwrap();
        let p2 = im.part_index(&pn("P2")).unwrap();
        let l1 = im.location_index(&loc("1")).unwrap();
        let l2 = im.location_index(&loc("2")).unwrap();

        // A -> L1, B -> L2
        let s = m.surplus_under(&[l1, l2]);
        assert_eq!(s[m.pair_index(p1, l1)], q(1));
        assert_eq!(s[m.pair_index(p1, l2)], q(1));
        assert_eq!(s[m.pair_index(p2, l2)], q(3));
        assert_eq!(s[m.pair_index(p2, l1)], Quantity::ZERO);

        // A -> L2, B -> L1
        let s = m.surplus_under(&[l2, l1]);
        assert_eq!(s[m.pair_index(p1, l2)], q(3));
        assert_eq!(s[m.pair_index(p1, l1)], Quantity::ZERO);
        assert_eq!(s[m.pair_index(p2, l1)], q(1));
    }

    #[test]
    fn test_no_candidates_is_infeasible() {
        let mut b = ProblemBuilder::new();
        b.add_demand(loc("1"), pn("P1"), q(1)).unwrap();
        b.add_crate(mk_crate("S", Some("1"), &[("P1", 1)]));
        b.add_crate(mk_crate("F", None, &[("P1", 2)]));
        let p = b.build().unwrap();

        let net = NettingEngine::net(&p);
        let free = FreeCrateExtractor::extract(&p);
        let err = AllocationModel::build(&net, &free, CandidateScope::ActiveLocations).unwrap_err();
        assert_eq!(err.crates(), &[CrateIdentifier::from("F")]);
        assert!(err.locations().is_empty());
    }
}
