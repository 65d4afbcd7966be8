use criterion::{black_box, criterion_group, criterion_main, Criterion};
use grid_lmc::GridLiftedObjective;
use ndarray::{Array2, ArrayD, IxDyn};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_instance(side: usize) -> (GridLiftedObjective, ArrayD<u64>) {
    let mut rng = StdRng::seed_from_u64(42);
    let offsets =
        Array2::from_shape_vec((4, 2), vec![0i64, 1, 1, 0, 3, 0, 0, 9]).unwrap();
    let weights: Vec<f32> = (0..side * side * 4)
        .map(|_| rng.gen_range(-1.0f32..1.0))
        .collect();
    let weights = ArrayD::from_shape_vec(IxDyn(&[side, side, 4]), weights).unwrap();
    let objective = GridLiftedObjective::new(weights, offsets).unwrap();
    let labels: Vec<u64> = (0..side * side).map(|_| rng.gen_range(0..8)).collect();
    let labels = ArrayD::from_shape_vec(IxDyn(&[side, side]), labels).unwrap();
    (objective, labels)
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("lifted_evaluate");
    for &side in &[64usize, 128, 256] {
        let (objective, labels) = random_instance(side);
        group.bench_function(format!("grid_{side}x{side}"), |b| {
            b.iter(|| black_box(objective.evaluate(black_box(&labels)).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_evaluate);
criterion_main!(benches);
