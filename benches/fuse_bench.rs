use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use grid_lmc::solvers::GreedyContractionFactory;
use grid_lmc::{FusionMove, GridLiftedObjective};
use ndarray::{Array2, ArrayD, IxDyn};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn blocky_labels(rng: &mut StdRng, side: usize, block: usize) -> ArrayD<u64> {
    let flat: Vec<u64> = (0..side * side)
        .map(|p| {
            let (r, c) = (p / side, p % side);
            ((r / block) * 131 + c / block + rng.gen_range(0..2)) as u64
        })
        .collect();
    ArrayD::from_shape_vec(IxDyn(&[side, side]), flat).unwrap()
}

fn bench_fuse_pair(c: &mut Criterion) {
    let mut group = c.benchmark_group("fusion_move");
    for &side in &[32usize, 64, 128] {
        let mut rng = StdRng::seed_from_u64(7);
        let offsets =
            Array2::from_shape_vec((3, 2), vec![0i64, 1, 1, 0, 4, 4]).unwrap();
        let weights: Vec<f32> = (0..side * side * 3)
            .map(|_| rng.gen_range(-1.0f32..1.0))
            .collect();
        let weights = ArrayD::from_shape_vec(IxDyn(&[side, side, 3]), weights).unwrap();
        let objective = GridLiftedObjective::new(weights, offsets).unwrap();

        let a = blocky_labels(&mut rng, side, 4);
        let b = blocky_labels(&mut rng, side, 8);
        let mut fusion = FusionMove::new(&objective, Arc::new(GreedyContractionFactory));

        group.bench_function(format!("fuse_pair_{side}x{side}"), |bench| {
            bench.iter(|| black_box(fusion.fuse_pair(black_box(&a), black_box(&b)).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_fuse_pair);
criterion_main!(benches);
