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
    err::AllocationError,
    milp::{config::AllocatorConfig, formulation::MilpOutcome},
    model::{alloc_model::AllocationModel, index::LocationIndex},
    netting::NetTable,
};
use sublot_alloc_core::prelude::{Quantity, exceeds_tolerance, is_selected, round_to_quantity};
use sublot_alloc_model::{
    prelude::{CrateAssignment, DeficitRecord, SolutionValidationError, SurplusRecord},
    validation::err::{
        DuplicateAssignmentError, MissingAssignmentError, SurplusMismatchError,
    },
};

/// The output tables recovered from one solve.
#[derive(Debug, Clone, PartialEq)]
pub struct Interpretation {
    pub assignments: Vec<CrateAssignment>,
    pub surplus: Vec<SurplusRecord>,
    pub residual_deficit: Vec<DeficitRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResultInterpreter {
    selection_threshold: f64,
    surplus_tolerance: f64,
}

impl ResultInterpreter {
    #[inline]
    pub fn new(selection_threshold: f64, surplus_tolerance: f64) -> Self {
        Self {
            selection_threshold,
            surplus_tolerance,
        }
    }

    #[inline]
    pub fn from_config(config: &AllocatorConfig) -> Self {
        Self::new(config.selection_threshold(), config.surplus_tolerance())
    }

    /// Location chosen for each crate, indexed by crate.
    ///
    /// Fails unless every crate has exactly one selected location.
    pub fn read_assignment(
        &self,
        model: &AllocationModel<'_>,
        outcome: &MilpOutcome,
    ) -> Result<Vec<LocationIndex>, SolutionValidationError> {
        let mut assignment = Vec::with_capacity(model.crates_len());
        for c in model.iter_crate_indices() {
            let mut chosen = model.iter_location_indices().filter(|&l| {
                is_selected(
                    outcome.decisions()[model.decision_index(c, l)],
                    self.selection_threshold,
                )
            });

            let id = model.free_crate(c).id();
            let Some(l) = chosen.next() else {
                return Err(MissingAssignmentError::new(id.clone()).into());
            };
            if chosen.next().is_some() {
                return Err(DuplicateAssignmentError::new(id.clone()).into());
            }
            assignment.push(l);
        }
        Ok(assignment)
    }

    /// Surplus per (part, location) as read from the solver, checked against
    /// the exact value implied by `assignment`.
    ///
    /// A reading above the exact value means the bound was not tight; the
    /// exact value is kept. A reading below it means a violated constraint.
    pub fn read_surplus(
        &self,
        model: &AllocationModel<'_>,
        outcome: &MilpOutcome,
        assignment: &[LocationIndex],
    ) -> Result<Vec<Quantity>, SolutionValidationError> {
        let exact = model.surplus_under(assignment);
        let im = model.index_manager();

        for p in model.iter_part_indices() {
            for l in model.iter_location_indices() {
                let k = model.pair_index(p, l);
                let raw = outcome.surplus()[k];
                let reading = if exceeds_tolerance(raw, self.surplus_tolerance) {
                    round_to_quantity(raw).unwrap_or(Quantity::ZERO)
                } else {
                    Quantity::ZERO
                };

                if reading == exact[k] {
                    continue;
                }
                let (Some(part), Some(location)) = (im.part(p), im.location(l)) else {
                    continue;
                };
                if reading < exact[k] {
                    return Err(SurplusMismatchError::new(
                        part.clone(),
                        location.clone(),
                        exact[k],
                        reading,
                    )
                    .into());
                }
                tracing::warn!(
                    "Surplus of {} at {} read as {} ({}), exact value is {}",
                    part,
                    location,
                    reading,
                    raw,
                    exact[k]
                );
            }
        }
        Ok(exact)
    }

    pub fn interpret(
        &self,
        model: &AllocationModel<'_>,
        net: &NetTable,
        outcome: &MilpOutcome,
    ) -> Result<Interpretation, AllocationError> {
        let assignment = self.read_assignment(model, outcome)?;
        self.read_surplus(model, outcome, &assignment)?;

        let im = model.index_manager();
        let mut after = net.clone();
        let mut assignments = Vec::with_capacity(assignment.len());

        for (c, &l) in model.iter_crate_indices().zip(assignment.iter()) {
            let crate_ref = model.free_crate(c);
            let Some(location) = im.location(l) else {
                return Err(SolutionValidationError::from(MissingAssignmentError::new(
                    crate_ref.id().clone(),
                ))
                .into());
            };
            for (part, &q) in crate_ref.bom() {
                after.add_supply(location, part, q);
            }
            tracing::trace!("Assign {} -> {}", crate_ref.id(), location);
            assignments.push(CrateAssignment {
                crate_id: crate_ref.id().clone(),
                container: crate_ref.container().cloned(),
                crate_type: crate_ref.crate_type().cloned(),
                location: location.clone(),
            });
        }

        Ok(Interpretation {
            assignments,
            surplus: after.surplus(),
            residual_deficit: after.unfulfilled(),
        })
    }
}
