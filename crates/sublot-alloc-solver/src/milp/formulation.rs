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

//! The assignment MILP.
//!
//! ```text
//! x[c,l] in {0,1}          crate c goes to location l
//! sum_l x[c,l] = 1         for every crate c
//! s[p,l] >= 0
//! s[p,l] >= carried[p,l] - remaining[p,l] + sum_c q[c,p] * x[c,l]
//! min sum s[p,l]
//! ```
//!
//! Minimizing `s` makes the two lower bounds tight, so at the optimum
//! `s[p,l] = max(0, carried + incoming - remaining)`.

use crate::{
    err::{AllocationError, InfeasibleError, SolveIncompleteError, SolveStatus},
    milp::config::{AllocatorConfig, ObjectivePolicy},
    model::alloc_model::AllocationModel,
};
use good_lp::solvers::highs::highs;
use good_lp::*;

/// Raw variable values of a certified optimal solve.
#[derive(Debug, Clone, PartialEq)]
pub struct MilpOutcome {
    decisions: Vec<f64>,        // len = C * L, see AllocationModel::decision_index
    surplus: Vec<f64>,          // len = P * L, see AllocationModel::pair_index
    deficit: Option<Vec<f64>>,  // len = P * L, only with a deficit penalty
    objective: f64,
}

impl MilpOutcome {
    #[inline]
    pub fn new(
        decisions: Vec<f64>,
        surplus: Vec<f64>,
        deficit: Option<Vec<f64>>,
        objective: f64,
    ) -> Self {
        Self {
            decisions,
            surplus,
            deficit,
            objective,
        }
    }

    #[inline]
    pub fn decisions(&self) -> &[f64] {
        &self.decisions
    }

    #[inline]
    pub fn surplus(&self) -> &[f64] {
        &self.surplus
    }

    #[inline]
    pub fn deficit(&self) -> Option<&[f64]> {
        self.deficit.as_deref()
    }

    #[inline]
    pub fn objective(&self) -> f64 {
        self.objective
    }
}

#[derive(Debug, Clone)]
pub struct AllocationMilp<'c> {
    config: &'c AllocatorConfig,
}

impl<'c> AllocationMilp<'c> {
    #[inline]
    pub fn new(config: &'c AllocatorConfig) -> Self {
        Self { config }
    }

    #[tracing::instrument(level = "debug", name = "MILP Solve", skip_all)]
    pub fn solve(&self, model: &AllocationModel<'_>) -> Result<MilpOutcome, AllocationError> {
        let mut vars = variables!();

        let x: Vec<Variable> = model
            .iter_crate_indices()
            .flat_map(|c| model.iter_location_indices().map(move |l| (c, l)))
            .map(|(c, l)| {
                vars.add(
                    variable()
                        .binary()
                        .name(format!("x_{}_{}", c.get(), l.get())),
                )
            })
            .collect();

        let pairs: Vec<_> = model
            .iter_part_indices()
            .flat_map(|p| model.iter_location_indices().map(move |l| (p, l)))
            .collect();

        let s: Vec<Variable> = pairs
            .iter()
            .map(|(p, l)| {
                vars.add(
                    variable()
                        .min(0.0)
                        .name(format!("s_{}_{}", p.get(), l.get())),
                )
            })
            .collect();

        let deficit_weight = match self.config.objective() {
            ObjectivePolicy::SurplusOnly => None,
            ObjectivePolicy::SurplusAndDeficit { deficit_weight } => Some(deficit_weight),
        };
        let d: Option<Vec<Variable>> = deficit_weight.map(|_| {
            pairs
                .iter()
                .map(|(p, l)| {
                    vars.add(
                        variable()
                            .min(0.0)
                            .name(format!("d_{}_{}", p.get(), l.get())),
                    )
                })
                .collect()
        });

        let mut objective = s.iter().fold(Expression::from(0.0), |acc, &v| acc + v);
        if let (Some(w), Some(d)) = (deficit_weight, &d) {
            for &v in d {
                objective.add_mul(w, v);
            }
        }

        let mut prob = vars.minimise(objective).using(highs);
        prob.set_verbose(self.config.verbose_solver());
        if let Some(limit) = self.config.time_limit() {
            prob = prob.with_time_limit(limit.as_secs_f64());
        }

        // Each crate goes to exactly one location.
        for c in model.iter_crate_indices() {
            let sum = model
                .iter_location_indices()
                .fold(Expression::from(0.0), |acc, l| {
                    acc + x[model.decision_index(c, l)]
                });
            prob.add_constraint(sum.eq(1.0));
        }

        // s >= carried - remaining + incoming, and optionally
        // d >= remaining - carried - incoming.
        for &(p, l) in &pairs {
            let k = model.pair_index(p, l);
            let mut incoming = Expression::from(0.0);
            for c in model.iter_crate_indices() {
                let q = model.quantity(c, p);
                if q.is_positive() {
                    incoming.add_mul(q.as_f64(), x[model.decision_index(c, l)]);
                }
            }
            let offset = (model.carried(p, l) - model.remaining(p, l)).as_f64();

            let mut lhs = Expression::from(s[k]);
            lhs -= incoming.clone();
            prob.add_constraint(lhs.geq(offset));

            if let Some(d) = &d {
                let mut lhs = Expression::from(d[k]);
                lhs += incoming;
                prob.add_constraint(lhs.geq(-offset));
            }
        }

        tracing::debug!(
            "MILP: {} binaries, {} surplus vars, {} constraints",
            x.len(),
            s.len(),
            model.crates_len() + pairs.len() * if d.is_some() { 2 } else { 1 }
        );

        let sol = match prob.solve() {
            Ok(sol) => sol,
            Err(ResolutionError::Infeasible) => {
                return Err(InfeasibleError::new(
                    model
                        .index_manager()
                        .iter_crates()
                        .map(|(_, id)| id.clone())
                        .collect(),
                    model.candidate_locations(),
                )
                .into());
            }
            Err(e) => return Err(incomplete_from(e).into()),
        };
        check_status(sol.status())?;

        let decisions: Vec<f64> = x.iter().map(|&v| sol.value(v)).collect();
        let surplus: Vec<f64> = s.iter().map(|&v| sol.value(v)).collect();
        let deficit: Option<Vec<f64>> = d.map(|d| d.iter().map(|&v| sol.value(v)).collect());

        let mut objective: f64 = surplus.iter().sum();
        if let (Some(w), Some(d)) = (deficit_weight, &deficit) {
            objective += w * d.iter().sum::<f64>();
        }

        Ok(MilpOutcome::new(decisions, surplus, deficit, objective))
    }
}

/// Only a certified optimum is accepted.
fn check_status(status: SolutionStatus) -> Result<(), SolveIncompleteError> {
    match status {
        SolutionStatus::Optimal => Ok(()),
        SolutionStatus::TimeLimit => Err(SolveIncompleteError::new(SolveStatus::TimeLimit)),
        SolutionStatus::GapLimit => Err(SolveIncompleteError::new(SolveStatus::GapLimit)),
    }
}

/// Solver failures other than infeasibility.
fn incomplete_from(e: ResolutionError) -> SolveIncompleteError {
    match e {
        ResolutionError::Unbounded => SolveIncompleteError::new(SolveStatus::Unbounded),
        e => SolveIncompleteError::new(SolveStatus::Failed(e.to_string())),
    }
}
