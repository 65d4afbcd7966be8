#![cfg(feature = "heavy")]
use std::sync::Arc;

use grid_lmc::solvers::GreedyContractionFactory;
use grid_lmc::{FusionMove, GridLiftedObjective};
use ndarray::{Array2, ArrayD, IxDyn};
use rand::{rngs::StdRng, Rng, SeedableRng};

#[test]
fn heavy_stress_volume_fusion() {
    let mut rng = StdRng::seed_from_u64(321);
    let shape = [24usize, 24, 24];
    let offsets = Array2::from_shape_vec(
        (4, 3),
        vec![0i64, 0, 1, 0, 1, 0, 1, 0, 0, 0, 3, 3],
    )
    .unwrap();
    let pixels: usize = shape.iter().product();

    let weights: Vec<f32> = (0..pixels * 4).map(|_| rng.gen_range(-1.0f32..1.0)).collect();
    let weights = ArrayD::from_shape_vec(IxDyn(&[24, 24, 24, 4]), weights).unwrap();
    let objective = GridLiftedObjective::new(weights, offsets).unwrap();

    // Blocky random proposals so the contraction has real regions to merge.
    let blocky = |rng: &mut StdRng, block: usize| -> ArrayD<u64> {
        let mut flat = Vec::with_capacity(pixels);
        for z in 0..shape[0] {
            for y in 0..shape[1] {
                for x in 0..shape[2] {
                    let seed = (z / block, y / block, x / block);
                    flat.push((seed.0 * 31 + seed.1 * 7 + seed.2 + rng.gen_range(0..2)) as u64);
                }
            }
        }
        ArrayD::from_shape_vec(IxDyn(&shape), flat).unwrap()
    };

    let a = blocky(&mut rng, 4);
    let b = blocky(&mut rng, 6);
    let bound = objective
        .evaluate(&a)
        .unwrap()
        .min(objective.evaluate(&b).unwrap());

    let mut fusion = FusionMove::new(&objective, Arc::new(GreedyContractionFactory));
    let fused = fusion.fuse_pair(&a, &b).unwrap();
    let fused_energy = objective.evaluate(&fused).unwrap();
    assert!(fused_energy.is_finite());
    assert!(fused_energy <= bound + 1e-6);
}
