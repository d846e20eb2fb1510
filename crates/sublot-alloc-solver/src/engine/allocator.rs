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
    engine::interpret::ResultInterpreter,
    err::AllocationError,
    milp::{config::AllocatorConfig, formulation::AllocationMilp},
    model::alloc_model::AllocationModel,
    netting::{NettingEngine, extract::FreeCrateExtractor},
};
use sublot_alloc_model::prelude::{
    AllocationProblem, AllocationSolution, AllocationStatus, SolutionValidator,
};

/// Runs netting, optimization and interpretation for one problem snapshot.
///
/// Every run rebuilds the model from scratch and shares no state with other
/// runs. Among several optimal assignments the solver is free to return any.
#[derive(Debug, Clone, Default)]
pub struct Allocator {
    config: AllocatorConfig,
}

impl Allocator {
    #[inline]
    pub fn new(config: AllocatorConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    #[tracing::instrument(
        level = "info",
        name = "Allocate",
        skip_all,
        fields(crates = problem.crates().len(), demand_rows = problem.demand().len())
    )]
    pub fn allocate(
        &self,
        problem: &AllocationProblem,
    ) -> Result<AllocationSolution, AllocationError> {
        self.config.validate()?;

        let net = NettingEngine::net(problem);
        let unfulfilled = net.unfulfilled();
        let extras = net.extras(self.config.product_family());
        let free = FreeCrateExtractor::extract(problem);

        tracing::info!(
            "Netting done: {} units demanded, {} unfulfilled rows, {} extras, {} free crates",
            problem.demand().total(),
            unfulfilled.len(),
            extras.len(),
            free.len()
        );
        for part in free.parts() {
            tracing::debug!("Free supply of {}: {}", part.as_str(), free.total_of(part));
        }

        if free.is_empty() {
            tracing::info!("No free crates; skipping optimization");
            return Ok(AllocationSolution::new(
                AllocationStatus::FullyAssigned,
                Vec::new(),
                net.surplus(),
                unfulfilled.clone(),
                unfulfilled,
                extras,
                None,
            ));
        }

        let model = AllocationModel::build(&net, &free, self.config.candidate_scope())?;
        let outcome = AllocationMilp::new(&self.config).solve(&model)?;
        let result = ResultInterpreter::from_config(&self.config).interpret(&model, &net, &outcome)?;

        let solution = AllocationSolution::new(
            AllocationStatus::Optimized,
            result.assignments,
            result.surplus,
            unfulfilled,
            result.residual_deficit,
            extras,
            Some(outcome.objective()),
        );
        SolutionValidator::validate(problem, &solution)?;

        tracing::info!(
            "Allocation optimal: {} crates placed, total surplus {}, objective {:.3}",
            solution.assignments().len(),
            solution.total_surplus(),
            outcome.objective()
        );
        Ok(solution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        err::ConfigError,
        milp::config::{CandidateScope, ObjectivePolicy},
    };
    use std::time::Duration;
    use sublot_alloc_core::prelude::Quantity;
    use sublot_alloc_model::prelude::{
        Crate, CrateIdentifier, Location, PartNumber, ProblemBuilder, ProductFamily,
    };

    #[inline]
    fn pn(s: &str) -> PartNumber {
        PartNumber::from(s)
    }

    #[inline]
    fn loc(s: &str) -> Location {
        Location::parse(s).unwrap()
    }

    #[inline]
    fn cid(s: &str) -> CrateIdentifier {
        CrateIdentifier::from(s)
    }

    #[inline]
    fn q(v: i64) -> Quantity {
        Quantity::new(v)
    }

    fn mk_crate(id: &str, location: Option<&str>, parts: &[(&str, i64)]) -> Crate {
        let bom = parts.iter().map(|(p, n)| (pn(p), q(*n))).collect();
        Crate::new(cid(id), None, location.map(loc), bom).unwrap()
    }

    /// L1 owes 4 of P1 and L2 owes 2; free crates A (5) and B (3).
    fn scenario(extra_free: &[Crate]) -> AllocationProblem {
        let mut b = ProblemBuilder::new();
        b.add_demand(loc("1"), pn("P1"), q(5)).unwrap();
        b.add_demand(loc("2"), pn("P1"), q(3)).unwrap();
        b.add_crate(mk_crate("S1", Some("1"), &[("P1", 1)]));
        b.add_crate(mk_crate("S2", Some("2"), &[("P1", 1)]));
        b.add_crate(mk_crate("A", None, &[("P1", 5)]));
        b.add_crate(mk_crate("B", None, &[("P1", 3)]));
        b.extend_crates(extra_free.iter().cloned());
        b.build().unwrap()
    }

    #[test]
    fn test_two_crate_scenario_is_solved_optimally() {
        let p = scenario(&[]);
        let s = Allocator::default().allocate(&p).unwrap();

        assert_eq!(s.status(), AllocationStatus::Optimized);
        assert_eq!(s.location_of(&cid("A")), Some(&loc("1")));
        assert_eq!(s.location_of(&cid("B")), Some(&loc("2")));
        assert_eq!(s.total_surplus(), q(2));
        assert_eq!(s.surplus_of(&pn("P1"), &loc("1")), q(1));
        assert_eq!(s.surplus_of(&pn("P1"), &loc("2")), q(1));
        assert!(s.residual_deficit().is_empty());
        assert_eq!(s.unfulfilled().len(), 2);
        assert!((s.objective_value().unwrap() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_every_free_crate_is_assigned_exactly_once() {
        let extra = [
            mk_crate("C", None, &[("P1", 1)]),
            mk_crate("D", None, &[("P1", 2)]),
        ];
        let p = scenario(&extra);
        let s = Allocator::default().allocate(&p).unwrap();

        let mut ids: Vec<&str> = s.assignments().iter().map(|a| a.crate_id.as_str()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["A", "B", "C", "D"]);
        assert!(s.surplus().iter().all(|r| r.quantity.is_positive()));
        assert!(SolutionValidator::validate(&p, &s).is_ok());
    }

    #[test]
    fn test_no_free_crates_skips_optimization() {
        let mut b = ProblemBuilder::new();
        b.add_demand(loc("1"), pn("P1"), q(5)).unwrap();
        b.add_demand(loc("1"), pn("P2"), q(1)).unwrap();
        b.add_demand(loc("2"), pn("P1"), q(3)).unwrap();
        b.add_crate(mk_crate("S1", Some("1"), &[("P1", 2), ("P3", 4)]));
        let p = b.build().unwrap();

        let s = Allocator::default().allocate(&p).unwrap();
        assert!(s.is_fully_assigned());
        assert!(s.assignments().is_empty());
        assert_eq!(s.objective_value(), None);

        // L2 has nothing shipped to it, so its deficit is not reported.
        let u: Vec<(&str, &str, i64)> = s
            .unfulfilled()
            .iter()
            .map(|d| (d.location.as_str(), d.part.as_str(), d.quantity.value()))
            .collect();
        assert_eq!(u, vec![("01", "P1", 3), ("01", "P2", 1)]);
        assert_eq!(s.residual_deficit(), s.unfulfilled());
        assert_eq!(s.surplus_of(&pn("P3"), &loc("1")), q(4));
        assert_eq!(s.total_surplus(), q(4));
    }

    #[test]
    fn test_zero_candidate_locations_is_infeasible() {
        let mut b = ProblemBuilder::new();
        b.add_demand(loc("1"), pn("P1"), q(1)).unwrap();
        b.add_crate(mk_crate("S1", Some("1"), &[("P1", 1)]));
        b.add_crate(mk_crate("F", None, &[("P2", 1)]));
        let p = b.build().unwrap();

        match Allocator::default().allocate(&p) {
            Err(AllocationError::Infeasible(e)) => assert_eq!(e.crates(), &[cid("F")]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_repeated_runs_agree_on_total_surplus() {
        let extra = [mk_crate("C", None, &[("P1", 2)])];
        let p = scenario(&extra);
        let a = Allocator::default().allocate(&p).unwrap();
        let b = Allocator::default().allocate(&p).unwrap();
        assert_eq!(a.total_surplus(), b.total_surplus());
    }

    #[test]
    fn test_crate_of_undemanded_part_adds_its_quantity_to_surplus() {
        let base = Allocator::default().allocate(&scenario(&[])).unwrap();

        let extra = [mk_crate("Z", None, &[("PZ", 7)])];
        let p = scenario(&extra);
        let s = Allocator::default().allocate(&p).unwrap();

        assert_eq!(s.total_surplus(), base.total_surplus() + q(7));
        // Either location is optimal for Z.
        let z = s.location_of(&cid("Z")).unwrap();
        assert!(z == &loc("1") || z == &loc("2"));
        assert_eq!(s.surplus_of(&pn("PZ"), z), q(7));
        assert_eq!(s.location_of(&cid("A")), Some(&loc("1")));
        assert_eq!(s.location_of(&cid("B")), Some(&loc("2")));
    }

    #[test]
    fn test_untouched_parts_keep_their_pre_assignment_surplus() {
        let mut b = ProblemBuilder::new();
        b.add_demand(loc("1"), pn("P1"), q(4)).unwrap();
        b.add_demand(loc("1"), pn("P2"), q(1)).unwrap();
        b.add_crate(mk_crate("S1", Some("1"), &[("P2", 6)]));
        b.add_crate(mk_crate("S3", Some("3"), &[("P5", 2)]));
        b.add_crate(mk_crate("A", None, &[("P1", 4)]));
        let p = b.build().unwrap();

        let s = Allocator::default().allocate(&p).unwrap();
        assert_eq!(s.surplus_of(&pn("P2"), &loc("1")), q(5));
        assert_eq!(s.surplus_of(&pn("P5"), &loc("3")), q(2));
        assert_eq!(s.surplus_of(&pn("P1"), &loc("1")), Quantity::ZERO);
        assert_eq!(s.total_surplus(), q(7));
    }

    #[test]
    fn test_short_supply_carries_residual_deficit() {
        let mut b = ProblemBuilder::new();
        b.add_demand(loc("1"), pn("P1"), q(5)).unwrap();
        b.add_crate(mk_crate("S1", Some("1"), &[("P1", 1)]));
        b.add_crate(mk_crate("A", None, &[("P1", 2)]));
        let p = b.build().unwrap();

        let s = Allocator::default().allocate(&p).unwrap();
        assert_eq!(s.total_surplus(), Quantity::ZERO);
        assert_eq!(s.residual_deficit().len(), 1);
        assert_eq!(s.residual_deficit()[0].quantity, q(2));
        assert_eq!(s.unfulfilled()[0].quantity, q(4));
    }

    #[test]
    fn test_deficit_penalty_yields_the_same_total_surplus() {
        let extra = [
            mk_crate("C", None, &[("P1", 4)]),
            mk_crate("D", None, &[("P1", 1)]),
        ];
        let p = scenario(&extra);
        let plain = Allocator::default().allocate(&p).unwrap();

        let cfg = AllocatorConfig::default().with_objective(ObjectivePolicy::SurplusAndDeficit {
            deficit_weight: 5.0,
        });
        let penalized = Allocator::new(cfg).allocate(&p).unwrap();

        assert_eq!(plain.total_surplus(), penalized.total_surplus());
    }

    #[test]
    fn test_all_demand_scope_reaches_inactive_locations() {
        let mut b = ProblemBuilder::new();
        b.add_demand(loc("1"), pn("P1"), q(3)).unwrap();
        b.add_demand(loc("3"), pn("P1"), q(3)).unwrap();
        b.add_crate(mk_crate("S1", Some("1"), &[("P1", 1)]));
        b.add_crate(mk_crate("F", None, &[("P1", 3)]));
        let p = b.build().unwrap();

        let active = Allocator::default().allocate(&p).unwrap();
        assert_eq!(active.location_of(&cid("F")), Some(&loc("1")));
        assert_eq!(active.total_surplus(), q(1));

        let cfg = AllocatorConfig::default().with_candidate_scope(CandidateScope::AllDemand);
        let all = Allocator::new(cfg).allocate(&p).unwrap();
        assert_eq!(all.location_of(&cid("F")), Some(&loc("3")));
        assert_eq!(all.total_surplus(), Quantity::ZERO);
        assert_eq!(all.residual_deficit().len(), 1);
        assert_eq!(all.residual_deficit()[0].location, loc("1"));
    }

    #[test]
    fn test_extras_follow_the_product_family() {
        let mut b = ProblemBuilder::new();
        b.add_demand(loc("1"), pn("GL-1"), q(1)).unwrap();
        b.add_crate(mk_crate("S1", Some("1"), &[("GL-1", 3), ("XX-9", 2)]));
        let p = b.build().unwrap();

        let cfg = AllocatorConfig::default().with_product_family(ProductFamily::with_prefix("GL"));
        let s = Allocator::new(cfg).allocate(&p).unwrap();
        assert_eq!(s.extras().len(), 1);
        assert_eq!(s.extras()[0].part, pn("GL-1"));
        assert_eq!(s.extras()[0].quantity, q(2));
        // XX-9 is still surplus.
        assert_eq!(s.total_surplus(), q(4));
    }

    #[test]
    fn test_time_limit_is_accepted_by_the_solver() {
        let cfg = AllocatorConfig::default().with_time_limit(Some(Duration::from_secs(5)));
        let s = Allocator::new(cfg).allocate(&scenario(&[])).unwrap();
        assert_eq!(s.total_surplus(), q(2));

        let cfg = AllocatorConfig::default().with_time_limit(None);
        let s = Allocator::new(cfg).allocate(&scenario(&[])).unwrap();
        assert_eq!(s.total_surplus(), q(2));
    }

    #[test]
    fn test_invalid_config_is_an_input_error() {
        let cfg = AllocatorConfig::default().with_selection_threshold(0.0);
        match Allocator::new(cfg).allocate(&scenario(&[])) {
            Err(AllocationError::Input(crate::err::InputError::Config(
                ConfigError::SelectionThreshold(_),
            ))) => {}
            other => panic!("unexpected {other:?}"),
        }
    }
}
