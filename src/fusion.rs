//! Fusion moves: combine candidate labelings without degrading the cost.
//!
//! A fusion step contracts every grid-adjacent pixel pair on which *all*
//! candidates agree, projects the lifted objective onto the surviving
//! classes, solves the (much smaller) contracted problem through the solver
//! seam, and keeps the contracted solution only if it is strictly better
//! than the best input. The returned labeling therefore never costs more
//! than the best candidate, regardless of solver quality.
//!
//! The contraction machinery is dimension-generic; 2-D images and 3-D
//! volumes run through the same code path via
//! [`GridGeometry`](crate::grid::GridGeometry).

use std::sync::Arc;

use ndarray::{ArrayBase, ArrayD, Axis, Data, IxDyn};

use crate::error::Error;
use crate::graph::GraphObjective;
use crate::objective::{flat_labels, GridLiftedObjective};
use crate::traits::SolverFactory;
use crate::ufd::{ClassArena, Ufd};

/// Fusion-move operator bound to one objective.
///
/// Holds a read-only borrow of the objective (which must outlive the
/// instance) and owns a disjoint-set scratch structure sized to the grid,
/// reset at the start of every fuse call. One instance must not be shared
/// across concurrent fuse calls; create one instance per thread instead —
/// the borrowed objective is safely aliased.
pub struct FusionMove<'a> {
    objective: &'a GridLiftedObjective,
    factory: Arc<dyn SolverFactory>,
    ufd: Ufd,
}

impl<'a> FusionMove<'a> {
    /// Bind a fusion operator to `objective`, solving contracted problems
    /// with solvers produced by `factory`.
    pub fn new(objective: &'a GridLiftedObjective, factory: Arc<dyn SolverFactory>) -> Self {
        let ufd = Ufd::new(objective.num_pixels());
        Self {
            objective,
            factory,
            ufd,
        }
    }

    /// The objective this operator fuses against.
    #[inline]
    pub fn objective(&self) -> &GridLiftedObjective {
        self.objective
    }

    /// Fuse two candidate labelings of the grid.
    ///
    /// Returns a labeling whose cost is at most `min(evaluate(a),
    /// evaluate(b))`; when the contracted solve does not strictly improve on
    /// that, the better input is returned unchanged, ties broken toward `a`.
    pub fn fuse_pair<Sa, Sb>(
        &mut self,
        a: &ArrayBase<Sa, IxDyn>,
        b: &ArrayBase<Sb, IxDyn>,
    ) -> Result<ArrayD<u64>, Error>
    where
        Sa: Data<Elem = u64>,
        Sb: Data<Elem = u64>,
    {
        self.objective.check_labeling_shape(a.shape())?;
        self.objective.check_labeling_shape(b.shape())?;
        let flat_a = flat_labels(a);
        let flat_b = flat_labels(b);
        let fused = self.fuse_flat(&[&flat_a[..], &flat_b[..]])?;
        Ok(self.objective.labeling_from_flat(fused))
    }

    /// Fuse any number of candidates stacked along a trailing proposal axis
    /// (shape `grid shape × n_proposals`).
    ///
    /// The baseline is the minimum cost over all proposal slices, ties
    /// broken toward the earliest slice. Zero proposals are rejected before
    /// any traversal.
    pub fn fuse_proposals<S>(&mut self, stacked: &ArrayBase<S, IxDyn>) -> Result<ArrayD<u64>, Error>
    where
        S: Data<Elem = u64>,
    {
        let shape = stacked.shape();
        let ndim = self.objective.shape().len();
        if shape.len() != ndim + 1 || &shape[..ndim] != self.objective.shape() {
            return Err(Error::ShapeMismatch {
                expected: self.objective.shape().to_vec(),
                actual: shape.to_vec(),
            });
        }
        let n_proposals = shape[ndim];
        if n_proposals == 0 {
            return Err(Error::NoProposals);
        }

        let flats: Vec<Vec<u64>> = (0..n_proposals)
            .map(|i| stacked.index_axis(Axis(ndim), i).iter().copied().collect())
            .collect();
        let refs: Vec<&[u64]> = flats.iter().map(Vec::as_slice).collect();
        let fused = self.fuse_flat(&refs)?;
        Ok(self.objective.labeling_from_flat(fused))
    }

    /// Fusion over validated row-major proposals.
    fn fuse_flat(&mut self, proposals: &[&[u64]]) -> Result<Vec<u64>, Error> {
        debug_assert!(!proposals.is_empty());
        let objective = self.objective;
        let geometry = objective.geometry();
        let num_pixels = geometry.num_pixels();

        #[cfg(feature = "tracing")]
        let span = tracing::debug_span!("fuse", proposals = proposals.len(), pixels = num_pixels);
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        // Contract pixel pairs on which every proposal agrees.
        self.ufd.reset();
        contract_agreeing(&mut self.ufd, objective, proposals);

        // Freeze the partition into a dense class arena.
        let arena = ClassArena::from_ufd(&mut self.ufd);
        let num_classes = arena.len();
        let ufd = &mut self.ufd;
        let dense: Vec<usize> = (0..num_pixels)
            .map(|p| arena.dense_index(ufd.find(p)))
            .collect();

        // Project the objective onto the contracted graph: structural edges
        // for surviving grid adjacencies, accumulated lifted costs on top.
        let mut contracted = GraphObjective::new(num_classes);
        geometry.for_each_pixel(|p, coord| {
            let class_p = dense[p];
            for axis in 0..geometry.ndim() {
                if let Some(q) = geometry.axis_successor(p, coord, axis) {
                    let class_q = dense[q];
                    if class_p != class_q {
                        contracted.insert_edge(class_p, class_q);
                    }
                }
            }
        });
        let weights = objective
            .weights()
            .as_slice()
            .expect("weights kept in standard layout");
        let n_offsets = objective.num_offsets();
        geometry.for_each_pixel(|p, coord| {
            let class_p = dense[p];
            for (o, offset) in objective.offset_rows().enumerate() {
                if let Some(q) = geometry.offset_partner(coord, offset) {
                    let class_q = dense[q];
                    if class_p != class_q {
                        contracted.add_cost(class_p, class_q, f64::from(weights[p * n_offsets + o]));
                    }
                }
            }
        });

        #[cfg(feature = "tracing")]
        tracing::debug!(
            classes = num_classes,
            edges = contracted.num_edges(),
            "contracted problem built"
        );

        // Solve the contracted problem from a singleton start.
        let mut class_labels: Vec<u64> = (0..num_classes as u64).collect();
        {
            let mut solver = self.factory.create(&contracted);
            solver.optimize(&mut class_labels, None)?;
        }
        let contracted_energy = contracted.evaluate(&class_labels);

        // Best-of-inputs baseline, recomputed per call.
        let energies = proposal_energies(objective, proposals);
        let (best_index, best_energy) = energies
            .iter()
            .enumerate()
            .fold((0usize, f64::INFINITY), |(bi, be), (i, &e)| {
                if e < be {
                    (i, e)
                } else {
                    (bi, be)
                }
            });

        #[cfg(feature = "tracing")]
        tracing::debug!(contracted_energy, best_energy, "fusion comparison");

        if contracted_energy < best_energy {
            Ok(dense.iter().map(|&class| class_labels[class]).collect())
        } else {
            Ok(proposals[best_index].to_vec())
        }
    }
}

/// Merge every grid-adjacent pixel pair on which all proposals agree.
fn contract_agreeing(ufd: &mut Ufd, objective: &GridLiftedObjective, proposals: &[&[u64]]) {
    let geometry = objective.geometry();
    geometry.for_each_pixel(|p, coord| {
        for axis in 0..geometry.ndim() {
            if let Some(q) = geometry.axis_successor(p, coord, axis) {
                if proposals.iter().all(|labels| labels[p] == labels[q]) {
                    ufd.merge(p, q);
                }
            }
        }
    });
}

#[cfg(feature = "parallel")]
fn proposal_energies(objective: &GridLiftedObjective, proposals: &[&[u64]]) -> Vec<f64> {
    use rayon::prelude::*;
    proposals
        .par_iter()
        .map(|labels| objective.energy_of(labels))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn proposal_energies(objective: &GridLiftedObjective, proposals: &[&[u64]]) -> Vec<f64> {
    proposals
        .iter()
        .map(|labels| objective.energy_of(labels))
        .collect()
}
