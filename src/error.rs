//! Error types shared across the crate.
//!
//! Configuration errors are raised before any grid traversal begins; solver
//! failures are opaque and propagate unchanged to the caller.

use thiserror::Error;

/// Errors produced by objective construction, evaluation and fusion.
#[derive(Debug, Error)]
pub enum Error {
    /// A labeling does not cover the grid the objective was built for.
    #[error("labeling shape {actual:?} does not match grid shape {expected:?}")]
    ShapeMismatch {
        /// Grid shape declared by the objective.
        expected: Vec<usize>,
        /// Shape of the offending labeling.
        actual: Vec<usize>,
    },

    /// Offset vectors and grid dimensionality disagree.
    #[error("offset vectors have {offset_ndim} components but the grid has {grid_ndim} dimensions")]
    OffsetDimMismatch {
        /// Number of grid dimensions.
        grid_ndim: usize,
        /// Components per offset vector.
        offset_ndim: usize,
    },

    /// The weight tensor's trailing axis and the offset count disagree.
    #[error("weight tensor has {weight_channels} offset channels but {offsets} offsets were supplied")]
    OffsetCountMismatch {
        /// Size of the weight tensor's trailing axis.
        weight_channels: usize,
        /// Number of offset vectors.
        offsets: usize,
    },

    /// A tensor shape that cannot describe a grid (empty, or a zero extent).
    #[error("invalid shape {0:?}: expected positive grid extents")]
    InvalidShape(Vec<usize>),

    /// The multi-proposal fuse was called with an empty proposal axis.
    #[error("at least one proposal labeling is required")]
    NoProposals,

    /// Failure reported by an external solver; passed through without retry.
    #[error("solver failed: {0}")]
    Solver(#[source] Box<dyn std::error::Error + Send + Sync>),
}
