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
    bom::{CrateContainer, FreeCrate, LocatedCrate},
    demand::DemandTable,
    part::PartNumber,
};
use std::collections::BTreeSet;

/// One input snapshot: the demand table and every crate, located or free.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllocationProblem {
    demand: DemandTable,
    crates: CrateContainer,
}

impl AllocationProblem {
    #[inline]
    pub fn new(demand: DemandTable, crates: CrateContainer) -> Self {
        Self { demand, crates }
    }

    #[inline]
    pub fn demand(&self) -> &DemandTable {
        &self.demand
    }

    #[inline]
    pub fn crates(&self) -> &CrateContainer {
        &self.crates
    }

    #[inline]
    pub fn iter_located_crates(&self) -> impl Iterator<Item = LocatedCrate<'_>> {
        self.crates.iter_located()
    }

    #[inline]
    pub fn iter_free_crates(&self) -> impl Iterator<Item = FreeCrate<'_>> {
        self.crates.iter_free()
    }

    #[inline]
    pub fn has_free_crates(&self) -> bool {
        self.iter_free_crates().next().is_some()
    }

    /// Parts carried by at least one free crate.
    pub fn free_parts(&self) -> BTreeSet<&PartNumber> {
        self.iter_free_crates()
            .flat_map(|c| c.bom().keys())
            .collect()
    }
}
