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

use std::collections::BTreeSet;
use sublot_alloc_core::prelude::Quantity;
use sublot_alloc_model::prelude::{AllocationProblem, CrateIdentifier, FreeCrate, PartNumber};

/// The free crates of a problem, ordered by identifier.
///
/// Each entry keeps its full manifest and container, so the optimizer sees
/// per-crate quantities rather than totals.
#[derive(Debug, Clone)]
pub struct FreeCrates<'p> {
    crates: Vec<FreeCrate<'p>>,
}

impl<'p> FreeCrates<'p> {
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &FreeCrate<'p>> {
        self.crates.iter()
    }

    #[inline]
    pub fn get(&self, i: usize) -> Option<&FreeCrate<'p>> {
        self.crates.get(i)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.crates.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.crates.is_empty()
    }

    pub fn ids(&self) -> Vec<CrateIdentifier> {
        self.crates.iter().map(|c| c.id().clone()).collect()
    }

    /// Every part that appears in at least one free crate.
    pub fn parts(&self) -> BTreeSet<&'p PartNumber> {
        self.crates.iter().flat_map(|c| c.bom().keys()).collect()
    }

    /// Total quantity of `part` across all free crates.
    pub fn total_of(&self, part: &PartNumber) -> Quantity {
        self.crates
            .iter()
            .filter_map(|c| c.bom().get(part).copied())
            .sum()
    }
}

#[derive(Debug, Clone, Default)]
pub struct FreeCrateExtractor;

impl FreeCrateExtractor {
    #[tracing::instrument(level = "debug", name = "Extract Free Crates", skip_all)]
    pub fn extract(problem: &AllocationProblem) -> FreeCrates<'_> {
        let crates: Vec<FreeCrate<'_>> = problem.iter_free_crates().collect();
        tracing::debug!("Extractor: {} free crates", crates.len());
        FreeCrates { crates }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sublot_alloc_model::prelude::{
        ContainerIdentifier, Crate, Location, ProblemBuilder, SupplyRow,
    };

    #[inline]
    fn pn(s: &str) -> PartNumber {
        PartNumber::from(s)
    }

    fn row(id: &str, container: &str, part: &str, n: i64, location: Option<&str>) -> SupplyRow {
        SupplyRow {
            crate_id: CrateIdentifier::from(id),
            container: Some(ContainerIdentifier::from(container)),
            crate_type: None,
            part: pn(part),
            quantity: Quantity::new(n),
            location: location.map(|l| Location::parse(l).unwrap()),
        }
    }

    fn problem() -> AllocationProblem {
        let mut b = ProblemBuilder::new();
        b.add_supply_row(row("B", "K1", "P1", 3, None)).unwrap();
        b.add_supply_row(row("B", "K1", "P2", 1, None)).unwrap();
        b.add_supply_row(row("A", "K2", "P1", 5, None)).unwrap();
        b.add_supply_row(row("C", "K2", "P3", 7, Some("1"))).unwrap();
        b.build().unwrap()
    }

    #[test]
    fn test_extracts_only_free_crates_in_id_order() {
        let p = problem();
        let free = FreeCrateExtractor::extract(&p);
        let ids: Vec<&str> = free.iter().map(|c| c.id().as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
    }

    #[test]
    fn test_manifest_and_container_are_preserved() {
        let p = problem();
        let free = FreeCrateExtractor::extract(&p);
        let b = free.get(1).unwrap();
        assert_eq!(b.bom().len(), 2);
        assert_eq!(b.bom()[&pn("P1")], Quantity::new(3));
        assert_eq!(b.container().map(|c| c.as_str()), Some("K1"));
    }

    #[test]
    fn test_parts_and_totals_span_free_crates() {
        let p = problem();
        let free = FreeCrateExtractor::extract(&p);
        let parts: Vec<&str> = free.parts().into_iter().map(|p| p.as_str()).collect();
        assert_eq!(parts, vec!["P1", "P2"]);
        assert_eq!(free.total_of(&pn("P1")), Quantity::new(8));
        assert_eq!(free.total_of(&pn("P3")), Quantity::ZERO);
    }

    #[test]
    fn test_problem_without_free_crates_extracts_nothing() {
        let mut b = ProblemBuilder::new();
        let bom = [(pn("P1"), Quantity::new(1))].into_iter().collect();
        b.add_crate(
            Crate::new(
                CrateIdentifier::from("X"),
                None,
                Some(Location::parse("1").unwrap()),
                bom,
            )
            .unwrap(),
        );
        let p = b.build().unwrap();
        assert!(FreeCrateExtractor::extract(&p).is_empty());
    }
}
