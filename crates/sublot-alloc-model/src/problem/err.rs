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
use sublot_alloc_core::prelude::Quantity;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LocationError {
    Empty,
    EmptyMergeGroup,
    OverlappingMergeGroups(String),
}

impl std::fmt::Display for LocationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationError::Empty => write!(f, "Location code is empty"),
            LocationError::EmptyMergeGroup => write!(f, "Location merge group has no members"),
            LocationError::OverlappingMergeGroups(code) => {
                write!(f, "Location {} appears in more than one merge group", code)
            }
        }
    }
}

impl std::error::Error for LocationError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmptyCrateError {
    id: CrateIdentifier,
}

impl EmptyCrateError {
    pub fn new(id: CrateIdentifier) -> Self {
        Self { id }
    }

    pub fn id(&self) -> &CrateIdentifier {
        &self.id
    }
}

impl std::fmt::Display for EmptyCrateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} has no part with a positive quantity in its manifest",
            self.id
        )
    }
}

impl std::error::Error for EmptyCrateError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DuplicateCratePartError {
    crate_id: CrateIdentifier,
    part: PartNumber,
}

impl DuplicateCratePartError {
    pub fn new(crate_id: CrateIdentifier, part: PartNumber) -> Self {
        Self { crate_id, part }
    }

    pub fn crate_id(&self) -> &CrateIdentifier {
        &self.crate_id
    }

    pub fn part(&self) -> &PartNumber {
        &self.part
    }
}

impl std::fmt::Display for DuplicateCratePartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} lists {} more than once; supply rows must be aggregated per crate and part",
            self.crate_id, self.part
        )
    }
}

impl std::error::Error for DuplicateCratePartError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonPositiveSupplyError {
    crate_id: CrateIdentifier,
    part: PartNumber,
    quantity: Quantity,
}

impl NonPositiveSupplyError {
    pub fn new(crate_id: CrateIdentifier, part: PartNumber, quantity: Quantity) -> Self {
        Self {
            crate_id,
            part,
            quantity,
        }
    }

    pub fn crate_id(&self) -> &CrateIdentifier {
        &self.crate_id
    }

    pub fn part(&self) -> &PartNumber {
        &self.part
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }
}

impl std::fmt::Display for NonPositiveSupplyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} carries a non-positive quantity {} of {}",
            self.crate_id, self.quantity, self.part
        )
    }
}

impl std::error::Error for NonPositiveSupplyError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConflictingCrateLocationError {
    crate_id: CrateIdentifier,
    first: Option<Location>,
    second: Option<Location>,
}

impl ConflictingCrateLocationError {
    pub fn new(crate_id: CrateIdentifier, first: Option<Location>, second: Option<Location>) -> Self {
        Self {
            crate_id,
            first,
            second,
        }
    }

    pub fn crate_id(&self) -> &CrateIdentifier {
        &self.crate_id
    }

    pub fn first(&self) -> Option<&Location> {
        self.first.as_ref()
    }

    pub fn second(&self) -> Option<&Location> {
        self.second.as_ref()
    }
}

impl std::fmt::Display for ConflictingCrateLocationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let show = |l: &Option<Location>| match l {
            Some(l) => l.to_string(),
            None => "<unknown>".to_string(),
        };
        write!(
            f,
            "Supply rows for {} disagree on its location ({} vs {})",
            self.crate_id,
            show(&self.first),
            show(&self.second)
        )
    }
}

impl std::error::Error for ConflictingCrateLocationError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConflictingCrateContainerError {
    crate_id: CrateIdentifier,
    first: Option<ContainerIdentifier>,
    second: Option<ContainerIdentifier>,
}

impl ConflictingCrateContainerError {
    pub fn new(
        crate_id: CrateIdentifier,
        first: Option<ContainerIdentifier>,
        second: Option<ContainerIdentifier>,
    ) -> Self {
        Self {
            crate_id,
            first,
            second,
        }
    }

    pub fn crate_id(&self) -> &CrateIdentifier {
        &self.crate_id
    }
}

impl std::fmt::Display for ConflictingCrateContainerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let show = |c: &Option<ContainerIdentifier>| match c {
            Some(c) => c.to_string(),
            None => "<none>".to_string(),
        };
        write!(
            f,
            "Supply rows for {} disagree on its container ({} vs {})",
            self.crate_id,
            show(&self.first),
            show(&self.second)
        )
    }
}

impl std::error::Error for ConflictingCrateContainerError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConflictingCrateTypeError {
    crate_id: CrateIdentifier,
    first: Option<CrateType>,
    second: Option<CrateType>,
}

impl ConflictingCrateTypeError {
    pub fn new(
        crate_id: CrateIdentifier,
        first: Option<CrateType>,
        second: Option<CrateType>,
    ) -> Self {
        Self {
            crate_id,
            first,
            second,
        }
    }

    pub fn crate_id(&self) -> &CrateIdentifier {
        &self.crate_id
    }
}

impl std::fmt::Display for ConflictingCrateTypeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let show = |t: &Option<CrateType>| match t {
            Some(t) => t.to_string(),
            None => "<none>".to_string(),
        };
        write!(
            f,
            "Supply rows for {} disagree on its crate type ({} vs {})",
            self.crate_id,
            show(&self.first),
            show(&self.second)
        )
    }
}

impl std::error::Error for ConflictingCrateTypeError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SupplyError {
    DuplicateCratePart(DuplicateCratePartError),
    NonPositiveQuantity(NonPositiveSupplyError),
    ConflictingLocation(ConflictingCrateLocationError),
    ConflictingContainer(ConflictingCrateContainerError),
    ConflictingCrateType(ConflictingCrateTypeError),
    EmptyCrate(EmptyCrateError),
}

impl std::fmt::Display for SupplyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SupplyError::DuplicateCratePart(e) => write!(f, "{}", e),
            SupplyError::NonPositiveQuantity(e) => write!(f, "{}", e),
            SupplyError::ConflictingLocation(e) => write!(f, "{}", e),
            SupplyError::ConflictingContainer(e) => write!(f, "{}", e),
            SupplyError::ConflictingCrateType(e) => write!(f, "{}", e),
            SupplyError::EmptyCrate(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SupplyError {}

impl From<DuplicateCratePartError> for SupplyError {
    fn from(err: DuplicateCratePartError) -> Self {
        SupplyError::DuplicateCratePart(err)
    }
}

impl From<NonPositiveSupplyError> for SupplyError {
    fn from(err: NonPositiveSupplyError) -> Self {
        SupplyError::NonPositiveQuantity(err)
    }
}

impl From<ConflictingCrateLocationError> for SupplyError {
    fn from(err: ConflictingCrateLocationError) -> Self {
        SupplyError::ConflictingLocation(err)
    }
}

impl From<ConflictingCrateContainerError> for SupplyError {
    fn from(err: ConflictingCrateContainerError) -> Self {
        SupplyError::ConflictingContainer(err)
    }
}

impl From<ConflictingCrateTypeError> for SupplyError {
    fn from(err: ConflictingCrateTypeError) -> Self {
        SupplyError::ConflictingCrateType(err)
    }
}

impl From<EmptyCrateError> for SupplyError {
    fn from(err: EmptyCrateError) -> Self {
        SupplyError::EmptyCrate(err)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonPositiveDemandError {
    location: Location,
    part: PartNumber,
    quantity: Quantity,
}

impl NonPositiveDemandError {
    pub fn new(location: Location, part: PartNumber, quantity: Quantity) -> Self {
        Self {
            location,
            part,
            quantity,
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn part(&self) -> &PartNumber {
        &self.part
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }
}

impl std::fmt::Display for NonPositiveDemandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Demand for {} at location {} must be positive, got {}",
            self.part, self.location, self.quantity
        )
    }
}

impl std::error::Error for NonPositiveDemandError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DemandError {
    NonPositiveQuantity(NonPositiveDemandError),
    InvalidRequirementSize(Location, PartNumber),
}

impl std::fmt::Display for DemandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DemandError::NonPositiveQuantity(e) => write!(f, "{}", e),
            DemandError::InvalidRequirementSize(l, p) => write!(
                f,
                "Requirement row for {} at location {} has a negative or non-finite size",
                p, l
            ),
        }
    }
}

impl std::error::Error for DemandError {}

impl From<NonPositiveDemandError> for DemandError {
    fn from(err: NonPositiveDemandError) -> Self {
        DemandError::NonPositiveQuantity(err)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProblemError {
    DuplicateCrate(CrateIdentifier),
    Supply(SupplyError),
    Demand(DemandError),
}

impl std::fmt::Display for ProblemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProblemError::DuplicateCrate(id) => write!(f, "{} was added more than once", id),
            ProblemError::Supply(e) => write!(f, "{}", e),
            ProblemError::Demand(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ProblemError {}

impl From<SupplyError> for ProblemError {
    fn from(err: SupplyError) -> Self {
        ProblemError::Supply(err)
    }
}

impl From<DemandError> for ProblemError {
    fn from(err: DemandError) -> Self {
        ProblemError::Demand(err)
    }
}

#[derive(Debug)]
pub enum ProblemLoaderError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Location(LocationError),
    Problem(ProblemError),
}

impl From<std::io::Error> for ProblemLoaderError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ProblemLoaderError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<LocationError> for ProblemLoaderError {
    fn from(e: LocationError) -> Self {
        Self::Location(e)
    }
}

impl From<ProblemError> for ProblemLoaderError {
    fn from(e: ProblemError) -> Self {
        Self::Problem(e)
    }
}

impl From<SupplyError> for ProblemLoaderError {
    fn from(e: SupplyError) -> Self {
        Self::Problem(ProblemError::Supply(e))
    }
}

impl From<DemandError> for ProblemLoaderError {
    fn from(e: DemandError) -> Self {
        Self::Problem(ProblemError::Demand(e))
    }
}

impl std::fmt::Display for ProblemLoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProblemLoaderError::Io(e) => write!(f, "I/O error: {e}"),
            ProblemLoaderError::Json(e) => write!(f, "malformed instance: {e}"),
            ProblemLoaderError::Location(e) => write!(f, "location error: {e}"),
            ProblemLoaderError::Problem(e) => write!(f, "problem error: {e}"),
        }
    }
}

impl std::error::Error for ProblemLoaderError {}
