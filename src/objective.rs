//! Pixel-wise lifted multicut objective on a regular grid.
//!
//! The objective is a per-pixel, per-offset cost tensor: entry
//! `(p, o)` is the penalty paid when pixel `p` and its partner
//! `p + offsets[o]` end up with different labels. Offsets are arbitrary
//! integer displacements — immediate neighbors and long-range "lifted"
//! pairs alike — and partners falling outside the grid contribute nothing.
//!
//! Labeling arguments are generic over ndarray storage, so owned arrays and
//! views (e.g. slices of a stacked proposal tensor) are both accepted.

use std::borrow::Cow;

use ndarray::{Array2, ArrayBase, ArrayD, Data, IxDyn};

use crate::error::Error;
use crate::graph::GraphObjective;
use crate::grid::GridGeometry;
use crate::traits::{LogObserver, SolverFactory};

/// Immutable lifted multicut objective over a D-dimensional grid.
///
/// Constructed once from a weight tensor of shape `grid shape × n_offsets`
/// and an `(n_offsets, D)` offset matrix; read-only afterwards and safe to
/// share across any number of fusion instances.
#[derive(Debug, Clone)]
pub struct GridLiftedObjective {
    weights: ArrayD<f32>,
    offsets: Array2<i64>,
    offsets_flat: Vec<i64>,
    geometry: GridGeometry,
}

impl GridLiftedObjective {
    /// Build an objective from `weights` and `offsets`.
    ///
    /// The trailing axis of `weights` must match the number of offset rows,
    /// the remaining axes are the grid shape (every extent positive), and
    /// each offset row must have one component per grid dimension.
    pub fn new(weights: ArrayD<f32>, offsets: Array2<i64>) -> Result<Self, Error> {
        let full = weights.shape();
        if full.len() < 2 {
            return Err(Error::InvalidShape(full.to_vec()));
        }
        let (grid, channels) = full.split_at(full.len() - 1);
        if grid.iter().any(|&extent| extent == 0) {
            return Err(Error::InvalidShape(grid.to_vec()));
        }
        if offsets.ncols() != grid.len() {
            return Err(Error::OffsetDimMismatch {
                grid_ndim: grid.len(),
                offset_ndim: offsets.ncols(),
            });
        }
        if offsets.nrows() != channels[0] {
            return Err(Error::OffsetCountMismatch {
                weight_channels: channels[0],
                offsets: offsets.nrows(),
            });
        }

        let geometry = GridGeometry::new(grid);
        let offsets_flat = offsets.iter().copied().collect();
        Ok(Self {
            weights: weights.as_standard_layout().into_owned(),
            offsets,
            offsets_flat,
            geometry,
        })
    }

    /// Grid extents.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        self.geometry.shape()
    }

    /// Number of pixels ∏(shape).
    #[inline]
    pub fn num_pixels(&self) -> usize {
        self.geometry.num_pixels()
    }

    /// Number of offset vectors.
    #[inline]
    pub fn num_offsets(&self) -> usize {
        self.offsets.nrows()
    }

    /// The weight tensor, shape `grid shape × n_offsets`.
    #[inline]
    pub fn weights(&self) -> &ArrayD<f32> {
        &self.weights
    }

    /// The offset matrix, shape `(n_offsets, D)`.
    #[inline]
    pub fn offsets(&self) -> &Array2<i64> {
        &self.offsets
    }

    /// Geometry of the underlying grid.
    #[inline]
    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// Cost of `labels`: the sum of `weights(p, o)` over every pixel `p` and
    /// offset `o` whose in-bounds partner carries a different label.
    ///
    /// Each pixel is traversed exactly once as `p`; pairs are counted from
    /// the offset direction only, so a symmetric offset set counts each
    /// unordered pair twice by design and a one-sided set once.
    pub fn evaluate<S>(&self, labels: &ArrayBase<S, IxDyn>) -> Result<f64, Error>
    where
        S: Data<Elem = u64>,
    {
        self.check_labeling_shape(labels.shape())?;
        let flat = flat_labels(labels);
        Ok(self.energy_of(&flat))
    }

    /// `evaluate` over a row-major flat labeling that is already known to
    /// cover the grid.
    pub(crate) fn energy_of(&self, labels: &[u64]) -> f64 {
        debug_assert_eq!(labels.len(), self.num_pixels());
        let weights = self
            .weights
            .as_slice()
            .expect("weights kept in standard layout");
        let n_offsets = self.num_offsets();
        let mut energy = 0.0f64;
        self.geometry.for_each_pixel(|p, coord| {
            let label_p = labels[p];
            for (o, offset) in self.offset_rows().enumerate() {
                if let Some(q) = self.geometry.offset_partner(coord, offset) {
                    if labels[q] != label_p {
                        energy += f64::from(weights[p * n_offsets + o]);
                    }
                }
            }
        });
        energy
    }

    /// Optimize the full, uncontracted objective.
    ///
    /// Materializes a graph with one node per pixel and one accumulated edge
    /// per in-bounds (pixel, offset-partner) pair, seeds it with `initial`,
    /// and delegates to `factory`. With `verbose` set, solver progress is
    /// reported through [`LogObserver`].
    ///
    /// A shape mismatch between `initial` and the grid is rejected before
    /// any graph is built; solver failures propagate unchanged.
    pub fn optimize<S>(
        &self,
        factory: &dyn SolverFactory,
        initial: &ArrayBase<S, IxDyn>,
        verbose: bool,
    ) -> Result<ArrayD<u64>, Error>
    where
        S: Data<Elem = u64>,
    {
        self.check_labeling_shape(initial.shape())?;

        #[cfg(feature = "tracing")]
        let span = tracing::debug_span!(
            "optimize",
            pixels = self.num_pixels(),
            offsets = self.num_offsets()
        );
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        let weights = self
            .weights
            .as_slice()
            .expect("weights kept in standard layout");
        let n_offsets = self.num_offsets();
        let mut graph = GraphObjective::new(self.num_pixels());
        self.geometry.for_each_pixel(|p, coord| {
            for (o, offset) in self.offset_rows().enumerate() {
                if let Some(q) = self.geometry.offset_partner(coord, offset) {
                    graph.add_cost(p, q, f64::from(weights[p * n_offsets + o]));
                }
            }
        });

        let mut node_labels: Vec<u64> = initial.iter().copied().collect();
        {
            let mut solver = factory.create(&graph);
            if verbose {
                let mut observer = LogObserver;
                solver.optimize(&mut node_labels, Some(&mut observer))?;
            } else {
                solver.optimize(&mut node_labels, None)?;
            }
        }

        Ok(self.labeling_from_flat(node_labels))
    }

    /// Iterate offset rows as `&[i64]` slices of length D.
    pub(crate) fn offset_rows(&self) -> std::slice::ChunksExact<'_, i64> {
        self.offsets_flat.chunks_exact(self.geometry.ndim())
    }

    /// Reject labelings whose shape differs from the grid shape.
    pub(crate) fn check_labeling_shape(&self, shape: &[usize]) -> Result<(), Error> {
        if shape != self.shape() {
            return Err(Error::ShapeMismatch {
                expected: self.shape().to_vec(),
                actual: shape.to_vec(),
            });
        }
        Ok(())
    }

    /// Reshape a row-major flat labeling back into grid shape.
    pub(crate) fn labeling_from_flat(&self, flat: Vec<u64>) -> ArrayD<u64> {
        ArrayD::from_shape_vec(IxDyn(self.shape()), flat)
            .expect("flat labeling covers the grid")
    }
}

/// Row-major flat view of a labeling, copying only when the storage is not
/// already contiguous (e.g. a proposal slice of a stacked tensor).
pub(crate) fn flat_labels<S>(labels: &ArrayBase<S, IxDyn>) -> Cow<'_, [u64]>
where
    S: Data<Elem = u64>,
{
    match labels.as_slice() {
        Some(slice) => Cow::Borrowed(slice),
        None => Cow::Owned(labels.iter().copied().collect()),
    }
}
