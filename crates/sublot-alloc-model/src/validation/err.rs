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

use crate::problem::{bom::CrateIdentifier, location::Location, part::PartNumber};
use sublot_alloc_core::prelude::Quantity;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MissingAssignmentError {
    crate_id: CrateIdentifier,
}

impl MissingAssignmentError {
    #[inline]
    pub fn new(crate_id: CrateIdentifier) -> Self {
        Self { crate_id }
    }

    #[inline]
    pub fn crate_id(&self) -> &CrateIdentifier {
        &self.crate_id
    }
}

impl std::fmt::Display for MissingAssignmentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Free crate {} has no assignment", self.crate_id)
    }
}

impl std::error::Error for MissingAssignmentError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DuplicateAssignmentError {
    crate_id: CrateIdentifier,
}

impl DuplicateAssignmentError {
    #[inline]
    pub fn new(crate_id: CrateIdentifier) -> Self {
        Self { crate_id }
    }

    #[inline]
    pub fn crate_id(&self) -> &CrateIdentifier {
        &self.crate_id
    }
}

impl std::fmt::Display for DuplicateAssignmentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Crate {} is assigned more than once", self.crate_id)
    }
}

impl std::error::Error for DuplicateAssignmentError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnknownCrateError {
    crate_id: CrateIdentifier,
}

impl UnknownCrateError {
    #[inline]
    pub fn new(crate_id: CrateIdentifier) -> Self {
        Self { crate_id }
    }

    #[inline]
    pub fn crate_id(&self) -> &CrateIdentifier {
        &self.crate_id
    }
}

impl std::fmt::Display for UnknownCrateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Assignment for crate {} which is not a free crate of the problem",
            self.crate_id
        )
    }
}

impl std::error::Error for UnknownCrateError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnknownLocationError {
    crate_id: CrateIdentifier,
    location: Location,
}

impl UnknownLocationError {
    #[inline]
    pub fn new(crate_id: CrateIdentifier, location: Location) -> Self {
        Self { crate_id, location }
    }

    #[inline]
    pub fn crate_id(&self) -> &CrateIdentifier {
        &self.crate_id
    }

    #[inline]
    pub fn location(&self) -> &Location {
        &self.location
    }
}

impl std::fmt::Display for UnknownLocationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Crate {} is assigned to location {} which has no demand",
            self.crate_id, self.location
        )
    }
}

impl std::error::Error for UnknownLocationError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NegativeSurplusError {
    part: PartNumber,
    location: Location,
    quantity: Quantity,
}

impl NegativeSurplusError {
    #[inline]
    pub fn new(part: PartNumber, location: Location, quantity: Quantity) -> Self {
        Self {
            part,
            location,
            quantity,
        }
    }

    #[inline]
    pub fn part(&self) -> &PartNumber {
        &self.part
    }

    #[inline]
    pub fn location(&self) -> &Location {
        &self.location
    }

    #[inline]
    pub fn quantity(&self) -> Quantity {
        self.quantity
    }
}

impl std::fmt::Display for NegativeSurplusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Surplus of {} at {} is {} but must be positive",
            self.part, self.location, self.quantity
        )
    }
}

impl std::error::Error for NegativeSurplusError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SurplusMismatchError {
    part: PartNumber,
    location: Location,
    expected: Quantity,
    reported: Quantity,
}

impl SurplusMismatchError {
    #[inline]
    pub fn new(part: PartNumber, location: Location, expected: Quantity, reported: Quantity) -> Self {
        Self {
            part,
            location,
            expected,
            reported,
        }
    }

    #[inline]
    pub fn part(&self) -> &PartNumber {
        &self.part
    }

    #[inline]
    pub fn location(&self) -> &Location {
        &self.location
    }

    #[inline]
    pub fn expected(&self) -> Quantity {
        self.expected
    }

    #[inline]
    pub fn reported(&self) -> Quantity {
        self.reported
    }
}

impl std::fmt::Display for SurplusMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Surplus of {} at {} is reported as {} but the assignment yields {}",
            self.part, self.location, self.reported, self.expected
        )
    }
}

impl std::error::Error for SurplusMismatchError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolutionValidationError {
    MissingAssignment(MissingAssignmentError),
    DuplicateAssignment(DuplicateAssignmentError),
    UnknownCrate(UnknownCrateError),
    UnknownLocation(UnknownLocationError),
    NegativeSurplus(NegativeSurplusError),
    SurplusMismatch(SurplusMismatchError),
}

impl std::fmt::Display for SolutionValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolutionValidationError::MissingAssignment(e) => write!(f, "{e}"),
            SolutionValidationError::DuplicateAssignment(e) => write!(f, "{e}"),
            SolutionValidationError::UnknownCrate(e) => write!(f, "{e}"),
            SolutionValidationError::UnknownLocation(e) => write!(f, "{e}"),
            SolutionValidationError::NegativeSurplus(e) => write!(f, "{e}"),
            SolutionValidationError::SurplusMismatch(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SolutionValidationError {}

impl From<MissingAssignmentError> for SolutionValidationError {
    fn from(e: MissingAssignmentError) -> Self {
        SolutionValidationError::MissingAssignment(e)
    }
}

impl From<DuplicateAssignmentError> for SolutionValidationError {
    fn from(e: DuplicateAssignmentError) -> Self {
        SolutionValidationError::DuplicateAssignment(e)
    }
}

impl From<UnknownCrateError> for SolutionValidationError {
    fn from(e: UnknownCrateError) -> Self {
        SolutionValidationError::UnknownCrate(e)
    }
}

impl From<UnknownLocationError> for SolutionValidationError {
    fn from(e: UnknownLocationError) -> Self {
        SolutionValidationError::UnknownLocation(e)
    }
}

impl From<NegativeSurplusError> for SolutionValidationError {
    fn from(e: NegativeSurplusError) -> Self {
        SolutionValidationError::NegativeSurplus(e)
    }
}

impl From<SurplusMismatchError> for SolutionValidationError {
    fn from(e: SurplusMismatchError) -> Self {
        SolutionValidationError::SurplusMismatch(e)
    }
}
