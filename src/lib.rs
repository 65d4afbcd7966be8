//! Pixel-wise lifted multicut objectives and fusion moves on regular grids.
//!
//! This crate scores segmentations of D-dimensional images and volumes
//! under a *lifted multicut* cost — a per-pixel, per-offset weight paid
//! whenever the two endpoints of an offset edge receive different labels —
//! and improves them with *fusion moves*: a local-search step that combines
//! several candidate labelings into one of equal or lower cost.
//!
//! ## Core idea
//! 1. Build a [`GridLiftedObjective`] from a weight tensor and an offset
//!    set (arbitrary, possibly long-range displacements).
//! 2. Produce candidate labelings with whatever heuristics you have.
//! 3. Let [`FusionMove`] contract everything the candidates agree on,
//!    solve the small contracted problem through a [`SolverFactory`], and
//!    keep the result only if it strictly improves on the best candidate.
//!
//! Fusing never degrades the objective: the contracted solution competes
//! against the best input, and on anything short of a strict win the best
//! input is returned unchanged.
//!
//! ## Quick start
//! ```
//! use std::sync::Arc;
//!
//! use grid_lmc::solvers::GreedyContractionFactory;
//! use grid_lmc::{FusionMove, GridLiftedObjective};
//! use ndarray::{Array2, ArrayD, IxDyn};
//!
//! // 2x2 grid, right and downward unit offsets, unit cut costs.
//! let weights = ArrayD::from_elem(IxDyn(&[2, 2, 2]), 1.0f32);
//! let offsets = Array2::from_shape_vec((2, 2), vec![0i64, 1, 1, 0]).unwrap();
//! let objective = GridLiftedObjective::new(weights, offsets).unwrap();
//!
//! // Two candidates: a row split and a column split, both of cost 2.
//! let a = ArrayD::from_shape_vec(IxDyn(&[2, 2]), vec![0u64, 0, 1, 1]).unwrap();
//! let b = ArrayD::from_shape_vec(IxDyn(&[2, 2]), vec![0u64, 1, 0, 1]).unwrap();
//! assert_eq!(objective.evaluate(&a).unwrap(), 2.0);
//! assert_eq!(objective.evaluate(&b).unwrap(), 2.0);
//!
//! let mut fusion = FusionMove::new(&objective, Arc::new(GreedyContractionFactory));
//! let fused = fusion.fuse_pair(&a, &b).unwrap();
//! assert!(objective.evaluate(&fused).unwrap() <= 2.0);
//! ```
//!
//! ## Reference solvers
//! The [`solvers`] module ships a greedy edge-contraction solver and an
//! identity solver. Both are usable and serve as templates for plugging in
//! stronger external solvers through [`SolverFactory`].

pub mod boundaries;
pub mod error;
pub mod fusion;
pub mod graph;
pub mod grid;
pub mod objective;
pub mod solvers;
pub mod traits;
pub mod ufd;

pub use crate::boundaries::extract_boundaries;
pub use crate::error::Error;
pub use crate::fusion::FusionMove;
pub use crate::graph::GraphObjective;
pub use crate::objective::GridLiftedObjective;
pub use crate::traits::{MulticutSolver, ProgressObserver, SolverFactory};
