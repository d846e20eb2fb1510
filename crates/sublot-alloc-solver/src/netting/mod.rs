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

pub mod extract;

use std::collections::{BTreeMap, BTreeSet};
use sublot_alloc_core::prelude::Quantity;
use sublot_alloc_model::prelude::{
    AllocationProblem, DeficitRecord, ExtraRecord, Location, PartNumber, ProductFamily,
    SurplusRecord,
};

/// Signed supply minus demand per (location, part).
///
/// Holds a row for every pair that has demand or located supply, including
/// pairs that net to zero.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NetTable {
    net: BTreeMap<(Location, PartNumber), Quantity>,
    active: BTreeSet<Location>,
}

impl NetTable {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds placed supply. A location that receives supply becomes active.
    pub fn add_supply(&mut self, location: &Location, part: &PartNumber, quantity: Quantity) {
        *self
            .net
            .entry((location.clone(), part.clone()))
            .or_default() += quantity;
        if quantity.is_positive() {
            self.active.insert(location.clone());
        }
    }

    pub fn add_demand(&mut self, location: &Location, part: &PartNumber, quantity: Quantity) {
        *self
            .net
            .entry((location.clone(), part.clone()))
            .or_default() -= quantity;
    }

    #[inline]
    pub fn net(&self, location: &Location, part: &PartNumber) -> Quantity {
        self.net
            .get(&(location.clone(), part.clone()))
            .copied()
            .unwrap_or(Quantity::ZERO)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&Location, &PartNumber, Quantity)> {
        self.net.iter().map(|((l, p), q)| (l, p, *q))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.net.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.net.is_empty()
    }

    #[inline]
    pub fn active_locations(&self) -> &BTreeSet<Location> {
        &self.active
    }

    #[inline]
    pub fn is_active(&self, location: &Location) -> bool {
        self.active.contains(location)
    }

    /// Negative net at active locations.
    pub fn unfulfilled(&self) -> Vec<DeficitRecord> {
        self.iter()
            .filter(|(l, _, q)| q.is_negative() && self.is_active(l))
            .map(|(l, p, q)| DeficitRecord {
                location: l.clone(),
                part: p.clone(),
                quantity: q.negative_part(),
            })
            .collect()
    }

    /// Positive net of parts in `family`.
    pub fn extras(&self, family: &ProductFamily) -> Vec<ExtraRecord> {
        self.iter()
            .filter(|(_, p, q)| q.is_positive() && family.contains(p))
            .map(|(l, p, q)| ExtraRecord {
                location: l.clone(),
                part: p.clone(),
                quantity: q,
            })
            .collect()
    }

    /// Positive net of every part, regardless of family.
    pub fn surplus(&self) -> Vec<SurplusRecord> {
        self.iter()
            .filter(|(_, _, q)| q.is_positive())
            .map(|(l, p, q)| SurplusRecord {
                part: p.clone(),
                location: l.clone(),
                quantity: q,
            })
            .collect()
    }

    #[inline]
    pub fn total_surplus(&self) -> Quantity {
        self.net.values().map(|q| q.positive_part()).sum()
    }
}

/// Nets located supply against demand.
#[derive(Debug, Clone, Default)]
pub struct NettingEngine;

impl NettingEngine {
    #[tracing::instrument(level = "debug", name = "Netting", skip_all)]
    pub fn net(problem: &AllocationProblem) -> NetTable {
        let mut table = NetTable::new();

        for c in problem.iter_located_crates() {
            for (part, &q) in c.bom() {
                table.add_supply(c.location(), part, q);
            }
        }
        for (location, part, q) in problem.demand().iter() {
            table.add_demand(location, part, q);
        }

        tracing::debug!(
            "Netting: {} rows, {} active locations",
            table.len(),
            table.active_locations().len()
        );
        table
    }
}
