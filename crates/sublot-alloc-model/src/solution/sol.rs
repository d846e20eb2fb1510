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
    bom::{ContainerIdentifier, CrateIdentifier, CrateType},
    location::Location,
    part::PartNumber,
};
use serde::Serialize;
use sublot_alloc_core::prelude::Quantity;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CrateAssignment {
    pub crate_id: CrateIdentifier,
    pub container: Option<ContainerIdentifier>,
    pub crate_type: Option<CrateType>,
    pub location: Location,
}

/// Leftover material of one part at one location, always positive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SurplusRecord {
    pub part: PartNumber,
    pub location: Location,
    pub quantity: Quantity,
}

/// Demand of one part at one location that is still owed, always positive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DeficitRecord {
    pub location: Location,
    pub part: PartNumber,
    pub quantity: Quantity,
}

/// Material already at a location beyond what it needs, before any assignment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ExtraRecord {
    pub location: Location,
    pub part: PartNumber,
    pub quantity: Quantity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationStatus {
    /// There were no free crates; the optimizer did not run.
    FullyAssigned,
    /// Every free crate was placed by a certified optimal solve.
    Optimized,
}

impl std::fmt::Display for AllocationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AllocationStatus::FullyAssigned => write!(f, "fully assigned"),
            AllocationStatus::Optimized => write!(f, "optimized"),
        }
    }
}

/// The output tables of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationSolution {
    status: AllocationStatus,
    assignments: Vec<CrateAssignment>,
    surplus: Vec<SurplusRecord>,
    unfulfilled: Vec<DeficitRecord>,
    residual_deficit: Vec<DeficitRecord>,
    extras: Vec<ExtraRecord>,
    total_surplus: Quantity,
    objective_value: Option<f64>,
}

impl AllocationSolution {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        status: AllocationStatus,
        mut assignments: Vec<CrateAssignment>,
        mut surplus: Vec<SurplusRecord>,
        mut unfulfilled: Vec<DeficitRecord>,
        mut residual_deficit: Vec<DeficitRecord>,
        mut extras: Vec<ExtraRecord>,
        objective_value: Option<f64>,
    ) -> Self {
        assignments.sort();
        surplus.sort();
        unfulfilled.sort();
        residual_deficit.sort();
        extras.sort();
        let total_surplus = surplus.iter().map(|s| s.quantity).sum();
        Self {
            status,
            assignments,
            surplus,
            unfulfilled,
            residual_deficit,
            extras,
            total_surplus,
            objective_value,
        }
    }

    #[inline]
    pub fn status(&self) -> AllocationStatus {
        self.status
    }

    #[inline]
    pub fn is_fully_assigned(&self) -> bool {
        self.status == AllocationStatus::FullyAssigned
    }

    #[inline]
    pub fn assignments(&self) -> &[CrateAssignment] {
        &self.assignments
    }

    #[inline]
    pub fn surplus(&self) -> &[SurplusRecord] {
        &self.surplus
    }

    #[inline]
    pub fn unfulfilled(&self) -> &[DeficitRecord] {
        &self.unfulfilled
    }

    #[inline]
    pub fn residual_deficit(&self) -> &[DeficitRecord] {
        &self.residual_deficit
    }

    #[inline]
    pub fn extras(&self) -> &[ExtraRecord] {
        &self.extras
    }

    #[inline]
    pub fn total_surplus(&self) -> Quantity {
        self.total_surplus
    }

    #[inline]
    pub fn objective_value(&self) -> Option<f64> {
        self.objective_value
    }

    pub fn location_of(&self, crate_id: &CrateIdentifier) -> Option<&Location> {
        self.assignments
            .iter()
            .find(|a| &a.crate_id == crate_id)
            .map(|a| &a.location)
    }

    pub fn surplus_of(&self, part: &PartNumber, location: &Location) -> Quantity {
        self.surplus
            .iter()
            .find(|s| &s.part == part && &s.location == location)
            .map(|s| s.quantity)
            .unwrap_or(Quantity::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[inline]
    fn loc(s: &str) -> Location {
        Location::parse(s).unwrap()
    }

    fn surplus(part: &str, l: &str, n: i64) -> SurplusRecord {
        SurplusRecord {
            part: PartNumber::from(part),
            location: loc(l),
            quantity: Quantity::new(n),
        }
    }

    #[test]
    fn test_new_sorts_tables_and_totals_surplus() {
        let s = AllocationSolution::new(
            AllocationStatus::Optimized,
            vec![
                CrateAssignment {
                    crate_id: CrateIdentifier::from("B"),
                    container: None,
                    crate_type: None,
                    location: loc("1"),
                },
                CrateAssignment {
                    crate_id: CrateIdentifier::from("A"),
                    container: None,
                    crate_type: None,
                    location: loc("2"),
                },
            ],
            vec![surplus("P2", "1", 3), surplus("P1", "2", 1)],
            vec![],
            vec![],
            vec![],
            Some(4.0),
        );

        assert_eq!(s.assignments()[0].crate_id.as_str(), "A");
        assert_eq!(s.surplus()[0].part.as_str(), "P1");
        assert_eq!(s.total_surplus(), Quantity::new(4));
        assert_eq!(s.location_of(&CrateIdentifier::from("B")), Some(&loc("1")));
        assert_eq!(s.location_of(&CrateIdentifier::from("Z")), None);
        assert_eq!(s.surplus_of(&PartNumber::from("P2"), &loc("1")), Quantity::new(3));
        assert_eq!(s.surplus_of(&PartNumber::from("P2"), &loc("2")), Quantity::ZERO);
        assert!(!s.is_fully_assigned());
    }

    #[test]
    fn test_serializes_to_plain_tables() {
        let s = AllocationSolution::new(
            AllocationStatus::FullyAssigned,
            vec![],
            vec![surplus("P1", "2", 1)],
            vec![],
            vec![],
            vec![],
            None,
        );
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["status"], "fully_assigned");
        assert_eq!(v["surplus"][0]["part"], "P1");
        assert_eq!(v["surplus"][0]["location"], "02");
        assert_eq!(v["surplus"][0]["quantity"], 1);
        assert_eq!(v["total_surplus"], 1);
    }
}
