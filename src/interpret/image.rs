//! Conversions between feature images, flat feature lists and per-residue
//! vectors, plus the comparison of attributions with distance maps.
use crate::shared::errors::PipelineError;
use crate::shared::utils::max_f64;
use anyhow::Result;
use ndarray::{concatenate, s, Array1, Array2, Array3, Array4, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

/// Reshape flat feature lists (n, h*w*c) into images (n, h, w, c)
pub fn feature_lists_to_images(z: &Array2<f64>, shape: (usize, usize, usize)) -> Result<Array4<f64>> {
    let (h, w, c) = shape;
    let n = z.nrows();
    Ok(z
        .as_standard_layout()
        .to_owned()
        .into_shape_with_order((n, h, w, c))?)
}

pub fn image_to_feature_list(img: &Array3<f64>) -> Array1<f64> {
    img.iter().copied().collect()
}

/// Flatten every image of (n, h, w, c) to a row of (n, h*w*c)
pub fn images_to_feature_lists(imgs: &Array4<f64>) -> Result<Array2<f64>> {
    let (n, h, w, c) = imgs.dim();
    Ok(imgs
        .as_standard_layout()
        .to_owned()
        .into_shape_with_order((n, h * w * c))?)
}

/// Mean image over the first axis
pub fn mean_feature_values(imgs: &Array4<f64>) -> Result<Array3<f64>> {
    imgs.mean_axis(Axis(0))
        .ok_or_else(|| PipelineError::invalid("no image to average").into())
}

/// Repeat every row of the two inputs twice, (n, k) -> (2n, k)
pub fn duplicate_input_pair_lists(l: &Array2<f64>, r: &Array2<f64>) -> (Array2<f64>, Array2<f64>) {
    let repeat = |a: &Array2<f64>| {
        let idx: Vec<usize> = (0..a.nrows()).flat_map(|i| [i, i]).collect();
        a.select(Axis(0), &idx)
    };
    (repeat(l), repeat(r))
}

/// Split concatenated (cdr3 ++ epitope) inputs at column `split`
pub fn split_concatenated_inputs(inputs: &Array2<f64>, split: usize) -> Result<(Array2<f64>, Array2<f64>)> {
    if split > inputs.ncols() {
        return Err(PipelineError::invalid(format!(
            "split column {} beyond {} columns",
            split,
            inputs.ncols()
        )))?;
    }
    Ok((
        inputs.slice(s![.., ..split]).to_owned(),
        inputs.slice(s![.., split..]).to_owned(),
    ))
}

/// Cut the centered padding of a padded map down to (width, height)
/// ```
/// use ndarray::{array, Array2};
/// use imrex_data::interpret::image::remove_image_padding;
/// let m: Array2<f64> = array![[0., 0., 0., 0.], [0., 1., 2., 0.], [0., 0., 0., 0.]];
/// assert_eq!(remove_image_padding(&m.view(), 1, 2).unwrap(), array![[1., 2.]]);
/// ```
pub fn remove_image_padding(m: &ArrayView2<f64>, width: usize, height: usize) -> Result<Array2<f64>> {
    let (rows, cols) = m.dim();
    if width > rows || height > cols {
        return Err(PipelineError::invalid(format!(
            "cannot unpad a ({}, {}) map to ({}, {})",
            rows, cols, width, height
        )))?;
    }
    let top = (rows - width) / 2;
    let left = (cols - height) / 2;
    Ok(m.slice(s![top..top + width, left..left + height]).to_owned())
}

/// Center `values` in a vector of length `len`, filling with `fill`
/// ```
/// use imrex_data::interpret::image::aa_add_padding;
/// let v = aa_add_padding(&[1., 2.], 5, 0.).unwrap();
/// assert_eq!(v.to_vec(), vec![0., 1., 2., 0., 0.]);
/// ```
pub fn aa_add_padding(values: &[f64], len: usize, fill: f64) -> Result<Array1<f64>> {
    if values.len() > len {
        return Err(PipelineError::RangeViolation {
            sequence: format!("{:?}", values),
            length: values.len(),
            max: len,
        })?;
    }
    let before = (len - values.len()) / 2;
    let mut padded = Array1::from_elem(len, fill);
    padded
        .slice_mut(s![before..before + values.len()])
        .assign(&ArrayView1::from(values));
    Ok(padded)
}

/// Keep the attributions of the two sequences of a token-encoded input,
/// dropping everything outside the (start, end) token pairs
pub fn aa_remove_padding(
    att: &ArrayView1<f64>,
    tokens: &ArrayView1<i64>,
    start_token: i64,
    end_token: i64,
) -> Result<Array1<f64>> {
    let starts: Vec<usize> = (0..tokens.len()).filter(|&i| tokens[i] == start_token).collect();
    let ends: Vec<usize> = (0..tokens.len()).filter(|&i| tokens[i] == end_token).collect();
    if starts.len() < 2 || ends.len() < 2 || starts[0] >= ends[0] || starts[1] >= ends[1] {
        return Err(PipelineError::invalid(
            "expected two start/end delimited sequences",
        ))?;
    }
    if ends[1] > att.len() {
        return Err(PipelineError::invalid("attribution shorter than its tokens"))?;
    }
    Ok(concatenate(
        Axis(0),
        &[
            att.slice(s![starts[0] + 1..ends[0]]),
            att.slice(s![starts[1] + 1..ends[1]]),
        ],
    )?)
}

/// Rescale a non-negative map to [0, 1] by its maximum; all-zero maps are
/// returned unchanged
/// ```
/// use ndarray::array;
/// use imrex_data::interpret::image::normalize_2d;
/// assert_eq!(normalize_2d(&array![[1., 4.], [2., 0.]]), array![[0.25, 1.], [0.5, 0.]]);
/// ```
pub fn normalize_2d(m: &Array2<f64>) -> Array2<f64> {
    match max_f64(m.iter().copied()) {
        Some(max) if max != 0. && max.is_finite() => m / max,
        _ => m.clone(),
    }
}

/// Inverse distances and attributions, both normalized
pub fn error_setup(dm: &Array2<f64>, att: &Array2<f64>) -> (Array2<f64>, Array2<f64>) {
    let inverse = dm.mapv(|d| 1. / d);
    (normalize_2d(&inverse), normalize_2d(att))
}

/// Root mean squared error between the normalized inverse distance map and
/// the normalized attribution map
pub fn rmse(dm: &Array2<f64>, att: &Array2<f64>) -> Result<f64> {
    if dm.dim() != att.dim() {
        return Err(PipelineError::invalid(format!(
            "distance map {:?} and attribution {:?} differ in shape",
            dm.dim(),
            att.dim()
        )))?;
    }
    let (dm, att) = error_setup(dm, att);
    let mse = (&dm - &att)
        .mapv(|x| x * x)
        .mean()
        .ok_or_else(|| PipelineError::invalid("empty maps"))?;
    Ok(mse.sqrt())
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AggregateMethod {
    Min,
    Max,
}

/// Per-residue summary of a (cdr3, epitope) map: the epitope residues
/// (column-wise) followed by the CDR3 residues (row-wise)
/// ```
/// use ndarray::array;
/// use imrex_data::interpret::image::{matrix_to_aa, AggregateMethod};
/// let m = array![[1., 5.], [3., 2.], [4., 0.]];
/// let v = matrix_to_aa(&m, AggregateMethod::Max);
/// assert_eq!(v.to_vec(), vec![4., 5., 5., 3., 4.]);
/// ```
pub fn matrix_to_aa(m: &Array2<f64>, method: AggregateMethod) -> Array1<f64> {
    let fold = |axis: Axis| match method {
        AggregateMethod::Min => m.fold_axis(axis, f64::INFINITY, |acc, &x| acc.min(x)),
        AggregateMethod::Max => m.fold_axis(axis, f64::NEG_INFINITY, |acc, &x| acc.max(x)),
    };
    let epitope = fold(Axis(0));
    let cdr3 = fold(Axis(1));
    epitope.into_iter().chain(cdr3).collect()
}
