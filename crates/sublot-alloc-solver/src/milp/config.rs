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

use crate::err::ConfigError;
use serde::Deserialize;
use std::time::Duration;
use sublot_alloc_core::math::tolerance::{DEFAULT_SELECTION_THRESHOLD, DEFAULT_TOLERANCE};
use sublot_alloc_model::prelude::ProductFamily;

pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(60);

/// Converts a time limit in seconds, rejecting values that are not positive
/// or do not fit a `Duration`.
pub fn time_limit_from_secs(secs: f64) -> Result<Duration, ConfigError> {
    if !(secs.is_finite() && secs > 0.0) {
        return Err(ConfigError::TimeLimit(secs));
    }
    Duration::try_from_secs_f64(secs).map_err(|_| ConfigError::TimeLimit(secs))
}

/// What the optimizer minimizes.
///
/// For a fixed problem, total surplus minus total deficit over the modelled
/// pairs is the same for every assignment, so both policies share their
/// optimal assignments. `SurplusAndDeficit` only changes the reported objective.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObjectivePolicy {
    #[default]
    SurplusOnly,
    SurplusAndDeficit { deficit_weight: f64 },
}

/// Which locations a free crate may be sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateScope {
    /// Unfulfilled demand at locations that already received located supply.
    #[default]
    ActiveLocations,
    /// Every location with unmet demand.
    AllDemand,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawAllocatorConfig {
    time_limit_secs: Option<f64>,
    selection_threshold: f64,
    surplus_tolerance: f64,
    objective: ObjectivePolicy,
    candidate_scope: CandidateScope,
    product_family: ProductFamily,
    verbose_solver: bool,
}

impl Default for RawAllocatorConfig {
    fn default() -> Self {
        Self {
            time_limit_secs: Some(DEFAULT_TIME_LIMIT.as_secs_f64()),
            selection_threshold: DEFAULT_SELECTION_THRESHOLD,
            surplus_tolerance: DEFAULT_TOLERANCE,
            objective: ObjectivePolicy::default(),
            candidate_scope: CandidateScope::default(),
            product_family: ProductFamily::any(),
            verbose_solver: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawAllocatorConfig")]
pub struct AllocatorConfig {
    time_limit: Option<Duration>,
    selection_threshold: f64,
    surplus_tolerance: f64,
    objective: ObjectivePolicy,
    candidate_scope: CandidateScope,
    product_family: ProductFamily,
    verbose_solver: bool,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            time_limit: Some(DEFAULT_TIME_LIMIT),
            selection_threshold: DEFAULT_SELECTION_THRESHOLD,
            surplus_tolerance: DEFAULT_TOLERANCE,
            objective: ObjectivePolicy::default(),
            candidate_scope: CandidateScope::default(),
            product_family: ProductFamily::any(),
            verbose_solver: false,
        }
    }
}

impl AllocatorConfig {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    #[inline]
    pub fn selection_threshold(&self) -> f64 {
        self.selection_threshold
    }

    #[inline]
    pub fn surplus_tolerance(&self) -> f64 {
        self.surplus_tolerance
    }

    #[inline]
    pub fn objective(&self) -> ObjectivePolicy {
        self.objective
    }

    #[inline]
    pub fn candidate_scope(&self) -> CandidateScope {
        self.candidate_scope
    }

    #[inline]
    pub fn product_family(&self) -> &ProductFamily {
        &self.product_family
    }

    #[inline]
    pub fn verbose_solver(&self) -> bool {
        self.verbose_solver
    }

    #[inline]
    pub fn with_time_limit(mut self, limit: Option<Duration>) -> Self {
        self.time_limit = limit;
        self
    }

    #[inline]
    pub fn with_selection_threshold(mut self, threshold: f64) -> Self {
        self.selection_threshold = threshold;
        self
    }

    #[inline]
    pub fn with_surplus_tolerance(mut self, tolerance: f64) -> Self {
        self.surplus_tolerance = tolerance;
        self
    }

    #[inline]
    pub fn with_objective(mut self, objective: ObjectivePolicy) -> Self {
        self.objective = objective;
        self
    }

    #[inline]
    pub fn with_candidate_scope(mut self, scope: CandidateScope) -> Self {
        self.candidate_scope = scope;
        self
    }

    #[inline]
    pub fn with_product_family(mut self, family: ProductFamily) -> Self {
        self.product_family = family;
        self
    }

    #[inline]
    pub fn with_verbose_solver(mut self, verbose: bool) -> Self {
        self.verbose_solver = verbose;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = self.selection_threshold;
        if !(t.is_finite() && t > 0.0 && t < 1.0) {
            return Err(ConfigError::SelectionThreshold(t));
        }
        // Anything at or above 0.5 could swallow a whole unit when rounding.
        let tol = self.surplus_tolerance;
        if !(tol.is_finite() && (0.0..0.5).contains(&tol)) {
            return Err(ConfigError::SurplusTolerance(tol));
        }
        if let ObjectivePolicy::SurplusAndDeficit { deficit_weight } = self.objective {
            if !(deficit_weight.is_finite() && deficit_weight > 0.0) {
                return Err(ConfigError::DeficitWeight(deficit_weight));
            }
        }
        if self.time_limit.is_some_and(|l| l.is_zero()) {
            return Err(ConfigError::TimeLimit(0.0));
        }
        Ok(())
    }
}

impl TryFrom<RawAllocatorConfig> for AllocatorConfig {
    type Error = ConfigError;

    fn try_from(raw: RawAllocatorConfig) -> Result<Self, Self::Error> {
        let time_limit = raw.time_limit_secs.map(time_limit_from_secs).transpose()?;
        let cfg = AllocatorConfig {
            time_limit,
            selection_threshold: raw.selection_threshold,
            surplus_tolerance: raw.surplus_tolerance,
            objective: raw.objective,
            candidate_scope: raw.candidate_scope,
            product_family: raw.product_family,
            verbose_solver: raw.verbose_solver,
        };
        cfg.validate()?;
        Ok(cfg)
    }
}
