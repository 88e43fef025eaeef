use criterion::{criterion_group, criterion_main, Criterion};

use twophase::coord::Coord;
use twophase::cubie::CubieCube;
use twophase::moves::{create_move_table, Move::*};
use twophase::solver::{solve, solver_tables};

fn cc_apply_moves() {
    let cc = CubieCube::default();
    let _ = cc.apply_moves(&[R, U, R3, U3]);
}

fn cc_multi_moves() {
    let mut cc = CubieCube::default();
    cc.multiply_moves(&[R, U, R3, U3]);
}

fn bench_moves(c: &mut Criterion) {
    let mut group = c.benchmark_group("CubieCube Moves");
    group.bench_function("multiply_moves", |b| b.iter(cc_multi_moves));
    group.bench_function("apply_moves", |b| b.iter(cc_apply_moves));
    group.finish();
}

fn bench_tables(c: &mut Criterion) {
    let mut group = c.benchmark_group("Move tables");
    group.sample_size(10);
    group.bench_function("twist", |b| b.iter(|| create_move_table(Coord::Twist)));
    group.bench_function("frbr", |b| b.iter(|| create_move_table(Coord::FrBr)));
    group.finish();
}

fn bench_solver(c: &mut Criterion) {
    // table generation is not part of the measurement
    let _ = solver_tables().unwrap();
    c.bench_function("Solver", |b| {
        b.iter(|| {
            solve(
                "RLLBUFUUUBDURRBBUBRLRRFDFDDLLLUDFLRRDDFRLFDBUBFFLBBDUF",
                20,
                0.1,
            )
            .unwrap()
        })
    });
}

criterion_group!(benches, bench_solver, bench_moves, bench_tables);
criterion_main!(benches);
