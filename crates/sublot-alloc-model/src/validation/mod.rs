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

pub mod err;

use crate::{
    problem::{bom::CrateIdentifier, location::Location, part::PartNumber, prob::AllocationProblem},
    solution::AllocationSolution,
    validation::err::{
        DuplicateAssignmentError, MissingAssignmentError, NegativeSurplusError,
        SolutionValidationError, SurplusMismatchError, UnknownCrateError, UnknownLocationError,
    },
};
use std::collections::{BTreeMap, BTreeSet};
use sublot_alloc_core::prelude::Quantity;

/// Checks an [`AllocationSolution`] against the problem it claims to solve.
#[derive(Debug, Clone)]
pub struct SolutionValidator;

impl SolutionValidator {
    /// Every free crate is assigned exactly once and nothing else is assigned.
    pub fn validate_assignment_total(
        problem: &AllocationProblem,
        solution: &AllocationSolution,
    ) -> Result<(), SolutionValidationError> {
        let free: BTreeSet<&CrateIdentifier> = problem.iter_free_crates().map(|c| c.id()).collect();

        let mut seen: BTreeSet<&CrateIdentifier> = BTreeSet::new();
        for a in solution.assignments() {
            if !free.contains(&a.crate_id) {
                return Err(UnknownCrateError::new(a.crate_id.clone()).into());
            }
            if !seen.insert(&a.crate_id) {
                return Err(DuplicateAssignmentError::new(a.crate_id.clone()).into());
            }
        }

        if let Some(missing) = free.difference(&seen).next() {
            return Err(MissingAssignmentError::new((*missing).clone()).into());
        }
        Ok(())
    }

    /// Crates may only be sent to locations that carry demand.
    pub fn validate_locations_known(
        problem: &AllocationProblem,
        solution: &AllocationSolution,
    ) -> Result<(), UnknownLocationError> {
        let known = problem.demand().locations();
        for a in solution.assignments() {
            if !known.contains(&a.location) {
                return Err(UnknownLocationError::new(
                    a.crate_id.clone(),
                    a.location.clone(),
                ));
            }
        }
        Ok(())
    }

    pub fn validate_surplus_positive(
        solution: &AllocationSolution,
    ) -> Result<(), NegativeSurplusError> {
        for s in solution.surplus() {
            if !s.quantity.is_positive() {
                return Err(NegativeSurplusError::new(
                    s.part.clone(),
                    s.location.clone(),
                    s.quantity,
                ));
            }
        }
        Ok(())
    }

    /// The reported surplus table equals the one implied by the assignment.
    ///
    /// Expects a total assignment; run [`validate_assignment_total`](Self::validate_assignment_total) first.
    pub fn validate_surplus_consistent(
        problem: &AllocationProblem,
        solution: &AllocationSolution,
    ) -> Result<(), SurplusMismatchError> {
        let expected = Self::surplus_after_assignment(problem, solution);
        let reported: BTreeMap<(&PartNumber, &Location), Quantity> = solution
            .surplus()
            .iter()
            .map(|s| ((&s.part, &s.location), s.quantity))
            .collect();

        let keys: BTreeSet<(&PartNumber, &Location)> = expected
            .keys()
            .copied()
            .chain(reported.keys().copied())
            .collect();

        for key in keys {
            let e = expected.get(&key).copied().unwrap_or(Quantity::ZERO);
            let r = reported.get(&key).copied().unwrap_or(Quantity::ZERO);
            if e != r {
                return Err(SurplusMismatchError::new(
                    key.0.clone(),
                    key.1.clone(),
                    e,
                    r,
                ));
            }
        }
        Ok(())
    }

    pub fn validate(
        problem: &AllocationProblem,
        solution: &AllocationSolution,
    ) -> Result<(), SolutionValidationError> {
        Self::validate_assignment_total(problem, solution)?;
        Self::validate_locations_known(problem, solution)?;
        Self::validate_surplus_positive(solution)?;
        Self::validate_surplus_consistent(problem, solution)?;
        Ok(())
    }

    fn surplus_after_assignment<'a>(
        problem: &'a AllocationProblem,
        solution: &'a AllocationSolution,
    ) -> BTreeMap<(&'a PartNumber, &'a Location), Quantity> {
        let mut net: BTreeMap<(&PartNumber, &Location), Quantity> = BTreeMap::new();

        for c in problem.iter_located_crates() {
            for (part, &q) in c.bom() {
                *net.entry((part, c.location())).or_default() += q;
            }
        }
        for a in solution.assignments() {
            if let Some(c) = problem.crates().get(&a.crate_id) {
                for (part, &q) in c.iter_parts() {
                    *net.entry((part, &a.location)).or_default() += q;
                }
            }
        }
        for (location, part, q) in problem.demand().iter() {
            *net.entry((part, location)).or_default() -= q;
        }

        net.retain(|_, q| q.is_positive());
        net
    }
}
