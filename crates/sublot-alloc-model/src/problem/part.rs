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

use crate::common::{Identifier, IdentifierMarkerName};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartNumberMarker;

impl IdentifierMarkerName for PartNumberMarker {
    const NAME: &'static str = "Part";
}

pub type PartNumber = Identifier<String, PartNumberMarker>;

/// The tracked product family, identified by a part-number prefix.
///
/// Parts outside the family still count towards netting, but they are not
/// reported as extras.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFamily {
    #[serde(default)]
    prefix: Option<String>,
}

impl ProductFamily {
    /// A family that contains every part.
    #[inline]
    pub fn any() -> Self {
        Self { prefix: None }
    }

    #[inline]
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        if prefix.is_empty() {
            return Self::any();
        }
        Self {
            prefix: Some(prefix),
        }
    }

    #[inline]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    #[inline]
    pub fn contains(&self, part: &PartNumber) -> bool {
        match &self.prefix {
            Some(p) => part.as_str().starts_with(p.as_str()),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[inline]
    fn pn(s: &str) -> PartNumber {
        PartNumber::from(s)
    }

    #[test]
    fn test_any_family_contains_everything() {
        let f = ProductFamily::any();
        assert!(f.contains(&pn("GL-100")));
        assert!(f.contains(&pn("")));
        assert_eq!(f.prefix(), None);
    }

    #[test]
    fn test_prefix_family_filters_foreign_parts() {
        let f = ProductFamily::with_prefix("GL-");
        assert!(f.contains(&pn("GL-100")));
        assert!(!f.contains(&pn("ST-100")));
        assert!(!f.contains(&pn("gl-100")));
    }

    #[test]
    fn test_empty_prefix_means_any() {
        assert_eq!(ProductFamily::with_prefix(""), ProductFamily::any());
    }
}
