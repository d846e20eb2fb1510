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

use crate::problem::{
    err::{DemandError, NonPositiveDemandError},
    location::Location,
    part::PartNumber,
};
use std::collections::{BTreeMap, BTreeSet};
use sublot_alloc_core::prelude::Quantity;

/// One item-level requirement. Each row with a non-zero size is one unit of demand.
#[derive(Debug, Clone, PartialEq)]
pub struct RequirementRow {
    pub location: Location,
    pub part: PartNumber,
    pub size: f64,
}

impl RequirementRow {
    #[inline]
    pub fn new(location: Location, part: PartNumber, size: f64) -> Self {
        Self {
            location,
            part,
            size,
        }
    }
}

/// Required quantity per (location, part).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DemandTable {
    required: BTreeMap<(Location, PartNumber), Quantity>,
}

impl DemandTable {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an already aggregated quantity, summing with what is there.
    pub fn insert(
        &mut self,
        location: Location,
        part: PartNumber,
        quantity: Quantity,
    ) -> Result<(), DemandError> {
        if !quantity.is_positive() {
            return Err(NonPositiveDemandError::new(location, part, quantity).into());
        }
        *self
            .required
            .entry((location, part))
            .or_insert(Quantity::ZERO) += quantity;
        Ok(())
    }

    /// Counts one unit for `row`. Returns `false` when the row has zero size
    /// and therefore is not demand.
    pub fn add_requirement(&mut self, row: RequirementRow) -> Result<bool, DemandError> {
        if !row.size.is_finite() || row.size < 0.0 {
            return Err(DemandError::InvalidRequirementSize(row.location, row.part));
        }
        if row.size == 0.0 {
            return Ok(false);
        }
        self.insert(row.location, row.part, Quantity::new(1))?;
        Ok(true)
    }

    pub fn from_requirements<I>(rows: I) -> Result<Self, DemandError>
    where
        I: IntoIterator<Item = RequirementRow>,
    {
        let mut t = Self::new();
        for row in rows {
            t.add_requirement(row)?;
        }
        Ok(t)
    }

    #[inline]
    pub fn get(&self, location: &Location, part: &PartNumber) -> Quantity {
        // Tuple keys force an owned lookup; demand tables are small.
        self.required
            .get(&(location.clone(), part.clone()))
            .copied()
            .unwrap_or(Quantity::ZERO)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&Location, &PartNumber, Quantity)> {
        self.required.iter().map(|((l, p), q)| (l, p, *q))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.required.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.required.is_empty()
    }

    pub fn locations(&self) -> BTreeSet<&Location> {
        self.required.keys().map(|(l, _)| l).collect()
    }

    pub fn total(&self) -> Quantity {
        self.required.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[inline]
    fn loc(s: &str) -> Location {
        Location::parse(s).unwrap()
    }
    #[inline]
    fn pn(s: &str) -> PartNumber {
        PartNumber::from(s)
    }
    #[inline]
    fn q(v: i64) -> Quantity {
        Quantity::new(v)
    }

    #[test]
    fn test_requirements_aggregate_by_location_and_part() {
        let rows = vec![
            RequirementRow::new(loc("1.01"), pn("P1"), 30.5),
            RequirementRow::new(loc("1.01"), pn("P1"), 31.0),
            RequirementRow::new(loc("1.01"), pn("P2"), 12.0),
            RequirementRow::new(loc("1.02"), pn("P1"), 30.5),
        ];
        let t = DemandTable::from_requirements(rows).unwrap();
        assert_eq!(t.len(), 3);
        assert_eq!(t.get(&loc("1.01"), &pn("P1")), q(2));
        assert_eq!(t.get(&loc("1.01"), &pn("P2")), q(1));
        assert_eq!(t.get(&loc("1.02"), &pn("P1")), q(1));
        assert_eq!(t.get(&loc("1.02"), &pn("P2")), q(0));
        assert_eq!(t.total(), q(4));
    }

    #[test]
    fn test_zero_size_rows_are_not_demand() {
        let mut t = DemandTable::new();
        assert!(!t.add_requirement(RequirementRow::new(loc("1"), pn("P1"), 0.0)).unwrap());
        assert!(t.is_empty());
    }

    #[test]
    fn test_invalid_sizes_are_rejected() {
        let mut t = DemandTable::new();
        assert!(t.add_requirement(RequirementRow::new(loc("1"), pn("P1"), -1.0)).is_err());
        assert!(t.add_requirement(RequirementRow::new(loc("1"), pn("P1"), f64::NAN)).is_err());
    }

    #[test]
    fn test_insert_sums_and_rejects_non_positive() {
        let mut t = DemandTable::new();
        t.insert(loc("1"), pn("P1"), q(3)).unwrap();
        t.insert(loc("1"), pn("P1"), q(4)).unwrap();
        assert_eq!(t.get(&loc("1"), &pn("P1")), q(7));
        assert!(matches!(
            t.insert(loc("1"), pn("P1"), q(0)),
            Err(DemandError::NonPositiveQuantity(_))
        ));
    }

    #[test]
    fn test_locations_are_distinct_and_sorted() {
        let mut t = DemandTable::new();
        t.insert(loc("2.10"), pn("B"), q(1)).unwrap();
        t.insert(loc("2.9"), pn("A"), q(1)).unwrap();
        t.insert(loc("2.9"), pn("B"), q(1)).unwrap();
        let ls: Vec<_> = t.locations().into_iter().map(|l| l.as_str()).collect();
        assert_eq!(ls, vec!["02.09", "02.10"]);
        assert_eq!(t.total(), q(3));
    }
}
