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

//! Reading integer decisions back out of a MILP solution.
//!
//! Solvers work on a continuous relaxation internally, so a binary that is "1"
//! may come back as `0.9999999` and a count of `3` as `3.0000004`.

use crate::primitives::Quantity;

/// Default cut-off above which a binary decision variable is read as 1.
pub const DEFAULT_SELECTION_THRESHOLD: f64 = 0.5;

/// Default tolerance below which a continuous value is read as 0.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

#[inline]
pub fn is_selected(value: f64, threshold: f64) -> bool {
    value.is_finite() && value >= threshold
}

#[inline]
pub fn exceeds_tolerance(value: f64, tolerance: f64) -> bool {
    value.is_finite() && value > tolerance
}

/// Rounds to the nearest integer quantity. Non-finite input yields `None`.
#[inline]
pub fn round_to_quantity(value: f64) -> Option<Quantity> {
    if !value.is_finite() {
        return None;
    }
    let r = value.round();
    if r < i64::MIN as f64 || r > i64::MAX as f64 {
        return None;
    }
    Some(Quantity::new(r as i64))
}
