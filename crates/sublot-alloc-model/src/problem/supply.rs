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
    bom::{ContainerIdentifier, Crate, CrateContainer, CrateIdentifier, CrateType},
    err::{
        ConflictingCrateContainerError, ConflictingCrateLocationError,
        ConflictingCrateTypeError, DuplicateCratePartError, NonPositiveSupplyError, SupplyError,
    },
    location::Location,
    part::PartNumber,
};
use std::collections::{BTreeMap, btree_map::Entry};
use sublot_alloc_core::prelude::Quantity;

/// One (crate, part) line of a crate manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplyRow {
    pub crate_id: CrateIdentifier,
    pub container: Option<ContainerIdentifier>,
    pub crate_type: Option<CrateType>,
    pub part: PartNumber,
    pub quantity: Quantity,
    pub location: Option<Location>,
}

impl SupplyRow {
    #[inline]
    pub fn new(
        crate_id: CrateIdentifier,
        container: Option<ContainerIdentifier>,
        part: PartNumber,
        quantity: Quantity,
        location: Option<Location>,
    ) -> Self {
        Self {
            crate_id,
            container,
            crate_type: None,
            part,
            quantity,
            location,
        }
    }

    #[inline]
    pub fn with_crate_type(mut self, crate_type: Option<CrateType>) -> Self {
        self.crate_type = crate_type;
        self
    }
}

#[derive(Debug)]
struct PendingCrate {
    container: Option<ContainerIdentifier>,
    crate_type: Option<CrateType>,
    location: Option<Location>,
    bom: BTreeMap<PartNumber, Quantity>,
}

/// Groups supply rows into crates, keeping each crate's full manifest.
#[derive(Debug, Default)]
pub struct SupplyTable {
    pending: BTreeMap<CrateIdentifier, PendingCrate>,
}

impl SupplyTable {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: SupplyRow) -> Result<(), SupplyError> {
        let SupplyRow {
            crate_id,
            container,
            crate_type,
            part,
            quantity,
            location,
        } = row;

        if !quantity.is_positive() {
            return Err(NonPositiveSupplyError::new(crate_id, part, quantity).into());
        }

        match self.pending.entry(crate_id) {
            Entry::Vacant(v) => {
                let mut bom = BTreeMap::new();
                bom.insert(part, quantity);
                v.insert(PendingCrate {
                    container,
                    crate_type,
                    location,
                    bom,
                });
            }
            Entry::Occupied(mut o) => {
                let crate_id = o.key().clone();
                let p = o.get_mut();
                if p.location != location {
                    return Err(ConflictingCrateLocationError::new(
                        crate_id,
                        p.location.clone(),
                        location,
                    )
                    .into());
                }
                if p.container != container {
                    return Err(ConflictingCrateContainerError::new(
                        crate_id,
                        p.container.clone(),
                        container,
                    )
                    .into());
                }
                if p.crate_type != crate_type {
                    return Err(ConflictingCrateTypeError::new(
                        crate_id,
                        p.crate_type.clone(),
                        crate_type,
                    )
                    .into());
                }
                if p.bom.contains_key(&part) {
                    return Err(DuplicateCratePartError::new(crate_id, part).into());
                }
                p.bom.insert(part, quantity);
            }
        }
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn into_crates(self) -> Result<CrateContainer, SupplyError> {
        let mut out = CrateContainer::new();
        for (id, p) in self.pending {
            let c = Crate::new(id, p.container, p.location, p.bom)?;
            out.insert(c.with_crate_type(p.crate_type));
        }
        Ok(out)
    }

    pub fn from_rows<I>(rows: I) -> Result<CrateContainer, SupplyError>
    where
        I: IntoIterator<Item = SupplyRow>,
    {
        let mut t = Self::new();
        for r in rows {
            t.push(r)?;
        }
        t.into_crates()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[inline]
    fn cid(s: &str) -> CrateIdentifier {
        CrateIdentifier::from(s)
    }
    #[inline]
    fn ctr(s: &str) -> ContainerIdentifier {
        ContainerIdentifier::from(s)
    }
    #[inline]
    fn pn(s: &str) -> PartNumber {
        PartNumber::from(s)
    }
    #[inline]
    fn q(v: i64) -> Quantity {
        Quantity::new(v)
    }
    #[inline]
    fn loc(s: &str) -> Location {
        Location::parse(s).unwrap()
    }

    fn row(c: &str, part: &str, n: i64, l: Option<&str>) -> SupplyRow {
        SupplyRow::new(cid(c), Some(ctr("MSKU1")), pn(part), q(n), l.map(loc))
    }

    #[test]
    fn test_rows_group_into_crates_with_full_manifest() {
        let crates = SupplyTable::from_rows(vec![
            row("C1", "P1", 5, None),
            row("C1", "P2", 2, None),
            row("C2", "P1", 3, Some("1.01")),
        ])
        .unwrap();

        assert_eq!(crates.len(), 2);
        let c1 = crates.get(&cid("C1")).unwrap();
        assert!(c1.is_free());
        assert_eq!(c1.quantity_of(&pn("P1")), q(5));
        assert_eq!(c1.quantity_of(&pn("P2")), q(2));
        assert_eq!(c1.container(), Some(&ctr("MSKU1")));

        let c2 = crates.get(&cid("C2")).unwrap();
        assert_eq!(c2.location(), Some(&loc("1.01")));
    }

    #[test]
    fn test_duplicate_crate_part_is_rejected() {
        let r = SupplyTable::from_rows(vec![row("C1", "P1", 5, None), row("C1", "P1", 1, None)]);
        assert!(matches!(r, Err(SupplyError::DuplicateCratePart(_))));
    }

    #[test]
    fn test_non_positive_quantity_is_rejected() {
        let r = SupplyTable::from_rows(vec![row("C1", "P1", 0, None)]);
        assert!(matches!(r, Err(SupplyError::NonPositiveQuantity(_))));
    }

    #[test]
    fn test_conflicting_location_is_rejected() {
        let r = SupplyTable::from_rows(vec![
            row("C1", "P1", 1, Some("1.01")),
            row("C1", "P2", 1, Some("1.02")),
        ]);
        assert!(matches!(r, Err(SupplyError::ConflictingLocation(_))));

        let r = SupplyTable::from_rows(vec![
            row("C1", "P1", 1, Some("1.01")),
            row("C1", "P2", 1, None),
        ]);
        assert!(matches!(r, Err(SupplyError::ConflictingLocation(_))));
    }

    #[test]
    fn test_conflicting_container_is_rejected() {
        let mut t = SupplyTable::new();
        t.push(row("C1", "P1", 1, None)).unwrap();
        let mut other = row("C1", "P2", 1, None);
        other.container = Some(ctr("MSKU2"));
        assert!(matches!(
            t.push(other),
            Err(SupplyError::ConflictingContainer(_))
        ));
    }

    #[test]
    fn test_crate_type_reaches_the_crate() {
        let rack = Some(CrateType::from("RACK"));
        let crates = SupplyTable::from_rows(vec![
            row("C1", "P1", 1, None).with_crate_type(rack.clone()),
            row("C1", "P2", 1, None).with_crate_type(rack.clone()),
        ])
        .unwrap();
        assert_eq!(crates.get(&cid("C1")).unwrap().crate_type(), rack.as_ref());
    }

    #[test]
    fn test_conflicting_crate_type_is_rejected() {
        let r = SupplyTable::from_rows(vec![
            row("C1", "P1", 1, None).with_crate_type(Some(CrateType::from("RACK"))),
            row("C1", "P2", 1, None).with_crate_type(Some(CrateType::from("BOX"))),
        ]);
        assert!(matches!(r, Err(SupplyError::ConflictingCrateType(_))));
    }
}
