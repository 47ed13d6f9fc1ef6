// ─────────────────────────────────────────────────────────────────────
// SCPN Seismic Core — Assembly & Projection Benchmarks
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! One-time sweep costs: operator assembly and basis projection.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use seismic_core::basis::{RomBasis, RomOperators};
use seismic_core::material::PremMaterialModel;
use seismic_core::operators::ShearOperators;
use seismic_types::state::MeshInfo;

fn bench_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("operator_assembly");
    for (nr, nt) in [(64usize, 32usize), (128, 64), (256, 128)] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{nr}x{nt}")),
            &(nr, nt),
            |b, &(nr, nt)| {
                let mesh = MeshInfo::new(nr, nt, 3480.0e3, 6371.0e3);
                b.iter(|| {
                    ShearOperators::with_material(black_box(mesh.clone()), &PremMaterialModel)
                        .unwrap()
                });
            },
        );
    }
    group.finish();
}

fn bench_projection(c: &mut Criterion) {
    let mut group = c.benchmark_group("basis_projection");
    group.sample_size(10);
    let mesh = MeshInfo::new(128, 64, 3480.0e3, 6371.0e3);
    let ops = ShearOperators::with_material(mesh.clone(), &PremMaterialModel).unwrap();
    for rom_size in [30usize, 60, 120] {
        let basis = RomBasis::random_dummy(&mesh, rom_size, rom_size, 2357);
        group.bench_with_input(
            BenchmarkId::from_parameter(rom_size),
            &basis,
            |b, basis| {
                b.iter(|| RomOperators::project(black_box(&ops), basis).unwrap());
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_assembly, bench_projection);
criterion_main!(benches);
