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
    common::{FreeKind, Identifier, IdentifierMarkerName, Kind, LocatedKind},
    problem::{err::EmptyCrateError, location::Location, part::PartNumber},
};
use std::collections::{BTreeMap, btree_map};
use sublot_alloc_core::prelude::Quantity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CrateIdentifierMarker;

impl IdentifierMarkerName for CrateIdentifierMarker {
    const NAME: &'static str = "Crate";
}

pub type CrateIdentifier = Identifier<String, CrateIdentifierMarker>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerIdentifierMarker;

impl IdentifierMarkerName for ContainerIdentifierMarker {
    const NAME: &'static str = "Container";
}

/// The shipping container a crate arrived in. Carried for traceability only.
pub type ContainerIdentifier = Identifier<String, ContainerIdentifierMarker>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CrateTypeMarker;

impl IdentifierMarkerName for CrateTypeMarker {
    const NAME: &'static str = "CrateType";
}

/// Packaging type of a crate (rack, box, ...). Traceability only.
pub type CrateType = Identifier<String, CrateTypeMarker>;

/// A physical crate and its bill of materials.
///
/// Crates are atomic: they go to exactly one location and are never split.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Crate {
    id: CrateIdentifier,
    container: Option<ContainerIdentifier>,
    crate_type: Option<CrateType>,
    location: Option<Location>,
    bom: BTreeMap<PartNumber, Quantity>,
}

impl Crate {
    /// Builds a crate from its manifest. Every entry must be strictly positive.
    pub fn new(
        id: CrateIdentifier,
        container: Option<ContainerIdentifier>,
        location: Option<Location>,
        bom: BTreeMap<PartNumber, Quantity>,
    ) -> Result<Self, EmptyCrateError> {
        if bom.is_empty() || bom.values().any(|q| !q.is_positive()) {
            return Err(EmptyCrateError::new(id));
        }
        Ok(Self {
            id,
            container,
            crate_type: None,
            location,
            bom,
        })
    }

    #[inline]
    pub fn with_crate_type(mut self, crate_type: Option<CrateType>) -> Self {
        self.crate_type = crate_type;
        self
    }

    #[inline]
    pub fn id(&self) -> &CrateIdentifier {
        &self.id
    }

    #[inline]
    pub fn container(&self) -> Option<&ContainerIdentifier> {
        self.container.as_ref()
    }

    #[inline]
    pub fn crate_type(&self) -> Option<&CrateType> {
        self.crate_type.as_ref()
    }

    #[inline]
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    #[inline]
    pub fn is_free(&self) -> bool {
        self.location.is_none()
    }

    #[inline]
    pub fn bom(&self) -> &BTreeMap<PartNumber, Quantity> {
        &self.bom
    }

    #[inline]
    pub fn quantity_of(&self, part: &PartNumber) -> Quantity {
        self.bom.get(part).copied().unwrap_or(Quantity::ZERO)
    }

    #[inline]
    pub fn iter_parts(&self) -> btree_map::Iter<'_, PartNumber, Quantity> {
        self.bom.iter()
    }
}

/// What a kinded view keeps from the check that admitted the crate.
pub trait CrateKind: Kind {
    type Anchor<'a>: Copy + std::fmt::Debug;
}

impl CrateKind for LocatedKind {
    type Anchor<'a> = &'a Location;
}

impl CrateKind for FreeKind {
    type Anchor<'a> = ();
}

/// A borrowed crate whose kind (located or free) has been checked.
#[derive(Debug)]
pub struct CrateRef<'a, K: CrateKind> {
    inner: &'a Crate,
    anchor: K::Anchor<'a>,
}

impl<K: CrateKind> Clone for CrateRef<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: CrateKind> Copy for CrateRef<'_, K> {}

impl<'a, K: CrateKind> CrateRef<'a, K> {
    #[inline]
    pub fn id(&self) -> &'a CrateIdentifier {
        &self.inner.id
    }

    #[inline]
    pub fn container(&self) -> Option<&'a ContainerIdentifier> {
        self.inner.container.as_ref()
    }

    #[inline]
    pub fn crate_type(&self) -> Option<&'a CrateType> {
        self.inner.crate_type.as_ref()
    }

    #[inline]
    pub fn bom(&self) -> &'a BTreeMap<PartNumber, Quantity> {
        &self.inner.bom
    }
}

impl<'a> CrateRef<'a, LocatedKind> {
    #[inline]
    pub fn try_new(c: &'a Crate) -> Option<Self> {
        c.location.as_ref().map(|l| Self {
            inner: c,
            anchor: l,
        })
    }

    #[inline]
    pub fn location(&self) -> &'a Location {
        self.anchor
    }
}

impl<'a> CrateRef<'a, FreeKind> {
    #[inline]
    pub fn try_new(c: &'a Crate) -> Option<Self> {
        c.is_free().then_some(Self {
            inner: c,
            anchor: (),
        })
    }
}

pub type LocatedCrate<'a> = CrateRef<'a, LocatedKind>;
pub type FreeCrate<'a> = CrateRef<'a, FreeKind>;

#[repr(transparent)]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrateContainer(BTreeMap<CrateIdentifier, Crate>);

impl CrateContainer {
    #[inline]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    #[inline]
    pub fn insert(&mut self, c: Crate) -> Option<Crate> {
        self.0.insert(c.id.clone(), c)
    }

    #[inline]
    pub fn get(&self, id: &CrateIdentifier) -> Option<&Crate> {
        self.0.get(id)
    }

    #[inline]
    pub fn contains_id(&self, id: &CrateIdentifier) -> bool {
        self.0.contains_key(id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Crate> {
        self.0.values()
    }

    #[inline]
    pub fn iter_located(&self) -> impl Iterator<Item = LocatedCrate<'_>> {
        self.0.values().filter_map(LocatedCrate::try_new)
    }

    #[inline]
    pub fn iter_free(&self) -> impl Iterator<Item = FreeCrate<'_>> {
        self.0.values().filter_map(FreeCrate::try_new)
    }

    #[inline]
    pub fn located_len(&self) -> usize {
        self.iter_located().count()
    }

    #[inline]
    pub fn free_len(&self) -> usize {
        self.iter_free().count()
    }
}

impl FromIterator<Crate> for CrateContainer {
    fn from_iter<I: IntoIterator<Item = Crate>>(iter: I) -> Self {
        let mut c = Self::new();
        for cr in iter {
            c.insert(cr);
        }
        c
    }
}
