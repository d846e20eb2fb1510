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
    builder::ProblemBuilder,
    demand::RequirementRow,
    err::ProblemLoaderError,
    location::LocationCanonicalizer,
    part::PartNumber,
    prob::AllocationProblem,
    supply::SupplyRow,
};
use serde::Deserialize;
use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};
use sublot_alloc_core::prelude::Quantity;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawInstance {
    #[serde(default)]
    canonicalizer: Option<LocationCanonicalizer>,
    #[serde(default)]
    requirements: Vec<RawRequirement>,
    #[serde(default)]
    demand: Vec<RawDemand>,
    #[serde(default)]
    supply: Vec<RawSupply>,
}

#[derive(Debug, Deserialize)]
struct RawRequirement {
    location: String,
    part: String,
    size: f64,
}

#[derive(Debug, Deserialize)]
struct RawDemand {
    location: String,
    part: String,
    quantity: i64,
}

#[derive(Debug, Deserialize)]
struct RawSupply {
    #[serde(rename = "crate")]
    crate_id: String,
    #[serde(default)]
    container: Option<String>,
    #[serde(default)]
    crate_type: Option<String>,
    part: String,
    quantity: i64,
    #[serde(default)]
    location: Option<String>,
    /// Number of purchase-order sublots packed into the crate. A crate that
    /// serves more than one has no single location yet.
    #[serde(default)]
    sublots_in_crate: Option<u32>,
}

/// Reads an [`AllocationProblem`] from a JSON instance file.
///
/// All location codes pass through one [`LocationCanonicalizer`]: the loader's
/// own if one was set, otherwise the instance's, otherwise the default.
#[derive(Debug, Clone, Default)]
pub struct ProblemLoader {
    canonicalizer: Option<LocationCanonicalizer>,
}

impl ProblemLoader {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_canonicalizer(mut self, c: LocationCanonicalizer) -> Self {
        self.canonicalizer = Some(c);
        self
    }

    pub fn from_reader<R: Read>(&self, r: R) -> Result<AllocationProblem, ProblemLoaderError> {
        let raw: RawInstance = serde_json::from_reader(BufReader::new(r))?;
        self.build(raw)
    }

    #[inline]
    pub fn from_path(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<AllocationProblem, ProblemLoaderError> {
        let file = File::open(path).map_err(ProblemLoaderError::Io)?;
        self.from_reader(file)
    }

    #[inline]
    pub fn from_str(&self, s: &str) -> Result<AllocationProblem, ProblemLoaderError> {
        let raw: RawInstance = serde_json::from_str(s)?;
        self.build(raw)
    }

    fn build(&self, raw: RawInstance) -> Result<AllocationProblem, ProblemLoaderError> {
        let canon = match (&self.canonicalizer, raw.canonicalizer) {
            (Some(c), _) => c.clone(),
            (None, Some(c)) => c,
            (None, None) => LocationCanonicalizer::default(),
        };

        let mut builder = ProblemBuilder::new();

        for r in raw.requirements {
            let location = canon.canonicalize(&r.location)?;
            builder.add_requirement(RequirementRow::new(
                location,
                PartNumber::new(r.part),
                r.size,
            ))?;
        }

        for d in raw.demand {
            let location = canon.canonicalize(&d.location)?;
            builder.add_demand(location, PartNumber::new(d.part), Quantity::new(d.quantity))?;
        }

        for s in raw.supply {
            let location = match s.sublots_in_crate {
                Some(n) if n != 1 => None,
                _ => canon.canonicalize_opt(s.location.as_deref())?,
            };
            let container = s
                .container
                .filter(|c| !c.trim().is_empty())
                .map(ContainerIdentifier::new);
            let crate_type = s
                .crate_type
                .filter(|t| !t.trim().is_empty())
                .map(CrateType::new);
            let row = SupplyRow::new(
                CrateIdentifier::new(s.crate_id),
                container,
                PartNumber::new(s.part),
                Quantity::new(s.quantity),
                location,
            );
            builder.add_supply_row(row.with_crate_type(crate_type))?;
        }

        Ok(builder.build()?)
    }
}
