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

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use sublot_alloc_core::prelude::Quantity;
use sublot_alloc_model::prelude::*;
use sublot_alloc_solver::prelude::*;

/// --- helpers ---
#[inline]
fn pn(i: usize) -> PartNumber {
    PartNumber::new(format!("P{i:03}"))
}
#[inline]
fn loc(i: usize) -> Location {
    Location::parse(&format!("{}.{}", 1 + i / 10, i % 10)).unwrap()
}

/// Every location holds one located crate and owes a few parts; free crates
/// carry a deterministic mix of those parts.
fn build_problem(num_locations: usize, num_parts: usize, num_free: usize) -> AllocationProblem {
    let mut b = ProblemBuilder::new();

    for l in 0..num_locations {
        for p in 0..num_parts {
            if (l + p) % 3 == 0 {
                let need = 2 + ((l * 7 + p * 5) % 9) as i64;
                b.add_demand(loc(l), pn(p), Quantity::new(need)).unwrap();
            }
        }
        let bom = [(pn(l % num_parts), Quantity::new(1))].into_iter().collect();
        b.add_crate(
            Crate::new(
                CrateIdentifier::new(format!("S{l:03}")),
                None,
                Some(loc(l)),
                bom,
            )
            .unwrap(),
        );
    }

    for c in 0..num_free {
        let bom = (0..3)
            .map(|k| {
                let p = (c * 3 + k * 7) % num_parts;
                (pn(p), Quantity::new(1 + ((c + k) % 4) as i64))
            })
            .collect();
        b.add_crate(Crate::new(CrateIdentifier::new(format!("F{c:03}")), None, None, bom).unwrap());
    }

    b.build().unwrap()
}

fn bench_model_build(c: &mut Criterion) {
    let problem = build_problem(20, 12, 30);
    let net = NettingEngine::net(&problem);
    let free = FreeCrateExtractor::extract(&problem);

    c.bench_function("AllocationModel build (20 locations, 12 parts, 30 crates)", |b| {
        b.iter(|| {
            black_box(
                AllocationModel::build(&net, &free, CandidateScope::ActiveLocations)
                    .expect("model should build"),
            );
        });
    });
}

fn bench_allocate(c: &mut Criterion) {
    let problem = build_problem(10, 8, 12);
    let allocator = Allocator::new(AllocatorConfig::default());

    let mut group = c.benchmark_group("Allocator");
    group.sample_size(10);
    group.bench_function("allocate (10 locations, 8 parts, 12 crates)", |b| {
        b.iter(|| {
            let solution = allocator.allocate(&problem).expect("allocation should succeed");
            assert_eq!(solution.assignments().len(), 12);
            black_box(solution);
        });
    });
    group.finish();
}

criterion_group!(benches, bench_model_build, bench_allocate);
criterion_main!(benches);
