//! Ground-truth boundary extraction.
//!
//! Derives, for every (pixel, offset) pair, whether the offset edge crosses
//! a label boundary in a ground-truth segmentation. The resulting mask has
//! the same layout as a weight tensor (`grid shape × n_offsets`) and is the
//! usual starting point for building supervised cut costs.

use ndarray::{Array2, ArrayBase, ArrayD, Data, IxDyn};

use crate::error::Error;
use crate::grid::GridGeometry;
use crate::objective::flat_labels;

/// Mark every in-bounds offset edge of `ground_truth` that crosses a label
/// boundary.
///
/// Output shape is `ground_truth.shape() × offsets.nrows()`. Entries whose
/// offset partner falls outside the grid stay `false` and carry no meaning
/// downstream.
pub fn extract_boundaries<S>(
    ground_truth: &ArrayBase<S, IxDyn>,
    offsets: &Array2<i64>,
) -> Result<ArrayD<bool>, Error>
where
    S: Data<Elem = u64>,
{
    let shape = ground_truth.shape();
    if shape.is_empty() || shape.iter().any(|&extent| extent == 0) {
        return Err(Error::InvalidShape(shape.to_vec()));
    }
    if offsets.ncols() != shape.len() {
        return Err(Error::OffsetDimMismatch {
            grid_ndim: shape.len(),
            offset_ndim: offsets.ncols(),
        });
    }

    let geometry = GridGeometry::new(shape);
    let n_offsets = offsets.nrows();
    let offsets_flat: Vec<i64> = offsets.iter().copied().collect();
    let labels = flat_labels(ground_truth);

    let mut mask = vec![false; geometry.num_pixels() * n_offsets];
    geometry.for_each_pixel(|p, coord| {
        let label_p = labels[p];
        for (o, offset) in offsets_flat.chunks_exact(geometry.ndim()).enumerate() {
            if let Some(q) = geometry.offset_partner(coord, offset) {
                mask[p * n_offsets + o] = labels[q] != label_p;
            }
        }
    });

    let mut out_shape = shape.to_vec();
    out_shape.push(n_offsets);
    Ok(ArrayD::from_shape_vec(IxDyn(&out_shape), mask)
        .expect("mask covers grid shape × n_offsets"))
}
