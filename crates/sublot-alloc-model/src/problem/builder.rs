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
    bom::{Crate, CrateContainer},
    demand::{DemandTable, RequirementRow},
    err::ProblemError,
    location::Location,
    part::PartNumber,
    prob::AllocationProblem,
    supply::{SupplyRow, SupplyTable},
};
use sublot_alloc_core::prelude::Quantity;

#[derive(Debug, Default)]
pub struct ProblemBuilder {
    demand: DemandTable,
    supply: SupplyTable,
    crates: Vec<Crate>,
}

impl ProblemBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn add_demand(
        &mut self,
        location: Location,
        part: PartNumber,
        quantity: Quantity,
    ) -> Result<&mut Self, ProblemError> {
        self.demand.insert(location, part, quantity)?;
        Ok(self)
    }

    #[inline]
    pub fn add_requirement(&mut self, row: RequirementRow) -> Result<&mut Self, ProblemError> {
        self.demand.add_requirement(row)?;
        Ok(self)
    }

    #[inline]
    pub fn add_supply_row(&mut self, row: SupplyRow) -> Result<&mut Self, ProblemError> {
        self.supply.push(row)?;
        Ok(self)
    }

    #[inline]
    pub fn add_crate(&mut self, c: Crate) -> &mut Self {
        self.crates.push(c);
        self
    }

    #[inline]
    pub fn extend_crates<I>(&mut self, it: I) -> &mut Self
    where
        I: IntoIterator<Item = Crate>,
    {
        self.crates.extend(it);
        self
    }

    pub fn build(self) -> Result<AllocationProblem, ProblemError> {
        let mut crates: CrateContainer = self.supply.into_crates()?;
        for c in self.crates {
            if crates.contains_id(c.id()) {
                return Err(ProblemError::DuplicateCrate(c.id().clone()));
            }
            crates.insert(c);
        }
        Ok(AllocationProblem::new(self.demand, crates))
    }
}
