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

use sublot_alloc_model::prelude::{
    CrateIdentifier, Location, ProblemError, ProblemLoaderError, SolutionValidationError,
};

/// A configuration value outside its admissible range.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    SelectionThreshold(f64),
    SurplusTolerance(f64),
    DeficitWeight(f64),
    TimeLimit(f64),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::SelectionThreshold(v) => {
                write!(f, "Selection threshold {v} must lie strictly between 0 and 1")
            }
            ConfigError::SurplusTolerance(v) => {
                write!(f, "Surplus tolerance {v} must be finite and in [0, 0.5)")
            }
            ConfigError::DeficitWeight(v) => {
                write!(f, "Deficit weight {v} must be finite and positive")
            }
            ConfigError::TimeLimit(v) => {
                write!(f, "Time limit of {v} seconds must be finite and positive")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug)]
pub enum InputError {
    Problem(ProblemLoaderError),
    Config(ConfigError),
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::Problem(e) => write!(f, "{e}"),
            InputError::Config(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for InputError {}

/// No assignment exists for the free crates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfeasibleError {
    crates: Vec<CrateIdentifier>,
    locations: Vec<Location>,
}

impl InfeasibleError {
    #[inline]
    pub fn new(crates: Vec<CrateIdentifier>, locations: Vec<Location>) -> Self {
        Self { crates, locations }
    }

    #[inline]
    pub fn crates(&self) -> &[CrateIdentifier] {
        &self.crates
    }

    #[inline]
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }
}

impl std::fmt::Display for InfeasibleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let crates: Vec<&str> = self.crates.iter().map(|c| c.as_str()).collect();
        if self.locations.is_empty() {
            return write!(
                f,
                "No candidate location for free crates [{}]",
                crates.join(", ")
            );
        }
        let locations: Vec<&str> = self.locations.iter().map(|l| l.as_str()).collect();
        write!(
            f,
            "No feasible assignment of crates [{}] to locations [{}]",
            crates.join(", "),
            locations.join(", ")
        )
    }
}

impl std::error::Error for InfeasibleError {}

/// How a solve ended when it did not end with a certified optimum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveStatus {
    TimeLimit,
    GapLimit,
    Unbounded,
    Failed(String),
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveStatus::TimeLimit => write!(f, "time limit reached"),
            SolveStatus::GapLimit => write!(f, "stopped at gap limit"),
            SolveStatus::Unbounded => write!(f, "unbounded"),
            SolveStatus::Failed(msg) => write!(f, "solver failed: {msg}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveIncompleteError {
    status: SolveStatus,
}

impl SolveIncompleteError {
    #[inline]
    pub fn new(status: SolveStatus) -> Self {
        Self { status }
    }

    #[inline]
    pub fn status(&self) -> &SolveStatus {
        &self.status
    }
}

impl std::fmt::Display for SolveIncompleteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Solve did not reach a certified optimum: {}", self.status)
    }
}

impl std::error::Error for SolveIncompleteError {}

#[derive(Debug)]
pub enum AllocationError {
    Input(InputError),
    Infeasible(InfeasibleError),
    SolveIncomplete(SolveIncompleteError),
    /// The solver output broke an invariant of the model. Always a bug.
    InvariantViolation(SolutionValidationError),
}

impl std::fmt::Display for AllocationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AllocationError::Input(e) => write!(f, "Invalid input: {e}"),
            AllocationError::Infeasible(e) => write!(f, "{e}"),
            AllocationError::SolveIncomplete(e) => write!(f, "{e}"),
            AllocationError::InvariantViolation(e) => write!(f, "Invariant violated: {e}"),
        }
    }
}

impl std::error::Error for AllocationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AllocationError::Input(e) => Some(e),
            AllocationError::Infeasible(e) => Some(e),
            AllocationError::SolveIncomplete(e) => Some(e),
            AllocationError::InvariantViolation(e) => Some(e),
        }
    }
}

impl From<ProblemLoaderError> for AllocationError {
    fn from(e: ProblemLoaderError) -> Self {
        AllocationError::Input(InputError::Problem(e))
    }
}

impl From<ProblemError> for AllocationError {
    fn from(e: ProblemError) -> Self {
        AllocationError::Input(InputError::Problem(ProblemLoaderError::from(e)))
    }
}

impl From<ConfigError> for AllocationError {
    fn from(e: ConfigError) -> Self {
        AllocationError::Input(InputError::Config(e))
    }
}

impl From<InfeasibleError> for AllocationError {
    fn from(e: InfeasibleError) -> Self {
        AllocationError::Infeasible(e)
    }
}

impl From<SolveIncompleteError> for AllocationError {
    fn from(e: SolveIncompleteError) -> Self {
        AllocationError::SolveIncomplete(e)
    }
}

impl From<SolutionValidationError> for AllocationError {
    fn from(e: SolutionValidationError) -> Self {
        AllocationError::InvariantViolation(e)
    }
}
