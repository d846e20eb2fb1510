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

use crate::problem::err::LocationError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// A canonical sublot key.
///
/// Only [`LocationCanonicalizer`] builds these, so two `Location`s compare equal
/// exactly when they denote the same logical destination, and their lexical
/// order is the intended grouping order.
#[repr(transparent)]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Location(String);

impl Location {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonicalizes `raw` with the default rules (width 2, no merges).
    #[inline]
    pub fn parse(raw: &str) -> Result<Self, LocationError> {
        LocationCanonicalizer::default().canonicalize(raw)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub const DEFAULT_SEGMENT_WIDTH: usize = 2;

/// Serialized form of a [`LocationCanonicalizer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalizerConfig {
    #[serde(default = "default_segment_width")]
    pub segment_width: usize,
    #[serde(default)]
    pub merge_groups: Vec<Vec<String>>,
}

fn default_segment_width() -> usize {
    DEFAULT_SEGMENT_WIDTH
}

impl Default for CanonicalizerConfig {
    fn default() -> Self {
        Self {
            segment_width: DEFAULT_SEGMENT_WIDTH,
            merge_groups: Vec::new(),
        }
    }
}

/// Turns raw sublot codes into [`Location`]s.
///
/// Numeric `.`-separated segments are zero-padded to a fixed width so that
/// `"2.9"` sorts before `"2.10"`, and codes known to be fulfilled jointly are
/// folded into one key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "CanonicalizerConfig")]
pub struct LocationCanonicalizer {
    segment_width: usize,
    merged: HashMap<String, String>,
}

impl Default for LocationCanonicalizer {
    fn default() -> Self {
        Self {
            segment_width: DEFAULT_SEGMENT_WIDTH,
            merged: HashMap::new(),
        }
    }
}

impl LocationCanonicalizer {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the padding width. Merge groups declared earlier are re-keyed.
    pub fn segment_width(mut self, width: usize) -> Self {
        self.segment_width = width;
        let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (member, key) in std::mem::take(&mut self.merged) {
            groups.entry(key).or_default().push(member);
        }
        for members in groups.into_values() {
            let members: BTreeSet<String> = members.iter().map(|m| self.pad(m)).collect();
            self.insert_group(members);
        }
        self
    }

    /// Declares that every code in `codes` is fulfilled jointly.
    pub fn merge<I, S>(mut self, codes: I) -> Result<Self, LocationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut members = BTreeSet::new();
        for code in codes {
            members.insert(self.normalize(code.as_ref())?);
        }
        if members.is_empty() {
            return Err(LocationError::EmptyMergeGroup);
        }
        if let Some(dup) = members.iter().find(|m| self.merged.contains_key(*m)) {
            return Err(LocationError::OverlappingMergeGroups(dup.clone()));
        }

        self.insert_group(members);
        Ok(self)
    }

    fn insert_group(&mut self, members: BTreeSet<String>) {
        let key = members
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" & ");
        for m in members {
            self.merged.insert(m, key.clone());
        }
    }

    pub fn normalize(&self, raw: &str) -> Result<String, LocationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LocationError::Empty);
        }

        Ok(self.pad(trimmed))
    }

    fn pad(&self, trimmed: &str) -> String {
        let width = self.segment_width;
        let segments: Vec<String> = trimmed
            .split('.')
            .map(|seg| {
                if !seg.is_empty() && seg.bytes().all(|b| b.is_ascii_digit()) {
                    let digits = seg.trim_start_matches('0');
                    let digits = if digits.is_empty() { "0" } else { digits };
                    format!("{digits:0>width$}")
                } else {
                    seg.to_string()
                }
            })
            .collect();
        segments.join(".")
    }

    pub fn canonicalize(&self, raw: &str) -> Result<Location, LocationError> {
        let normalized = self.normalize(raw)?;
        match self.merged.get(&normalized) {
            Some(key) => Ok(Location(key.clone())),
            None => Ok(Location(normalized)),
        }
    }

    /// Like [`canonicalize`](Self::canonicalize), but blank input means "unknown".
    pub fn canonicalize_opt(&self, raw: Option<&str>) -> Result<Option<Location>, LocationError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(None),
            Some(r) => self.canonicalize(r).map(Some),
        }
    }
}

impl TryFrom<CanonicalizerConfig> for LocationCanonicalizer {
    type Error = LocationError;

    fn try_from(cfg: CanonicalizerConfig) -> Result<Self, Self::Error> {
        let mut c = LocationCanonicalizer::new().segment_width(cfg.segment_width);
        for group in cfg.merge_groups {
            c = c.merge(group)?;
        }
        Ok(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_pads_numeric_segments() {
        let c = LocationCanonicalizer::new();
        assert_eq!(c.normalize("2.5").unwrap(), "02.05");
        assert_eq!(c.normalize("2.10").unwrap(), "02.10");
        assert_eq!(c.normalize(" 2.05 ").unwrap(), "02.05");
        assert_eq!(c.normalize("002.5").unwrap(), "02.05");
        assert_eq!(c.normalize("3").unwrap(), "03");
        assert_eq!(c.normalize("0.0").unwrap(), "00.00");
    }

    #[test]
    fn test_normalize_keeps_non_numeric_segments() {
        let c = LocationCanonicalizer::new();
        assert_eq!(c.normalize("A.7").unwrap(), "A.07");
        assert_eq!(c.normalize("Yard").unwrap(), "Yard");
    }

    #[test]
    fn test_lexical_order_matches_numeric_order() {
        let c = LocationCanonicalizer::new();
        let mut v: Vec<Location> = ["2.10", "2.9", "10.1", "2.05"]
            .iter()
            .map(|r| c.canonicalize(r).unwrap())
            .collect();
        v.sort();
        let s: Vec<_> = v.iter().map(|l| l.as_str()).collect();
        assert_eq!(s, vec!["02.05", "02.09", "02.10", "10.01"]);
    }

    #[test]
    fn test_empty_is_rejected() {
        let c = LocationCanonicalizer::new();
        assert_eq!(c.canonicalize("  "), Err(LocationError::Empty));
        assert_eq!(c.canonicalize_opt(Some("  ")), Ok(None));
        assert_eq!(c.canonicalize_opt(None), Ok(None));
    }

    #[test]
    fn test_merge_folds_codes_into_one_key() {
        let c = LocationCanonicalizer::new().merge(["2.09", "2.05"]).unwrap();
        let a = c.canonicalize("2.05").unwrap();
        let b = c.canonicalize("2.9").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "02.05 & 02.09");
        // Re-canonicalizing a merged key is stable.
        assert_eq!(c.canonicalize(a.as_str()).unwrap(), a);
        // Unrelated codes are untouched.
        assert_eq!(c.canonicalize("2.06").unwrap().as_str(), "02.06");
    }

    #[test]
    fn test_width_change_rekeys_earlier_merges() {
        let c = LocationCanonicalizer::new()
            .merge(["2.05", "2.09"])
            .unwrap()
            .segment_width(3);
        let merged = c.canonicalize("2.5").unwrap();
        assert_eq!(merged.as_str(), "002.005 & 002.009");
        assert_eq!(c.canonicalize("002.009").unwrap(), merged);
        assert_eq!(c.canonicalize("2.6").unwrap().as_str(), "002.006");

        let ordered = LocationCanonicalizer::new()
            .segment_width(3)
            .merge(["2.05", "2.09"])
            .unwrap();
        assert_eq!(c, ordered);
    }

    #[test]
    fn test_overlapping_merge_groups_are_rejected() {
        let c = LocationCanonicalizer::new().merge(["2.05", "2.09"]).unwrap();
        assert_eq!(
            c.merge(["2.9", "2.11"]),
            Err(LocationError::OverlappingMergeGroups("02.09".to_string()))
        );
    }

    #[test]
    fn test_empty_merge_group_is_rejected() {
        let r = LocationCanonicalizer::new().merge(Vec::<String>::new());
        assert_eq!(r, Err(LocationError::EmptyMergeGroup));
    }

    #[test]
    fn test_deserialize_from_config() {
        let json = r#"{ "segment_width": 3, "merge_groups": [["2.05", "2.09"]] }"#;
        let c: LocationCanonicalizer = serde_json::from_str(json).unwrap();
        assert_eq!(c.canonicalize("2.5").unwrap().as_str(), "002.005 & 002.009");
        assert_eq!(c.canonicalize("1.2").unwrap().as_str(), "001.002");
    }

    #[test]
    fn test_deserialize_defaults() {
        let c: LocationCanonicalizer = serde_json::from_str("{}").unwrap();
        assert_eq!(c, LocationCanonicalizer::default());
    }
}
