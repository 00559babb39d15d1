//! Integrated gradients over feature images.
//!
//! The model itself is not part of this crate: gradients along the path are
//! provided by the caller, either precomputed or through a closure.
use crate::shared::errors::PipelineError;
use anyhow::Result;
use ndarray::{s, Array1, Array3, Array4, Axis};
use serde::{Deserialize, Serialize};

/// Riemann sum used to approximate the path integral
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RiemannMethod {
    #[default]
    Trapezoidal,
    Left,
    Midpoint,
    Right,
}

/// Interpolation coefficients for `m_steps` steps
/// ```
/// use imrex_data::interpret::attribution::{interpolation_alphas, RiemannMethod};
/// let a = interpolation_alphas(4, RiemannMethod::Trapezoidal).unwrap();
/// assert_eq!(a.to_vec(), vec![0., 0.25, 0.5, 0.75, 1.]);
/// let a = interpolation_alphas(4, RiemannMethod::Right).unwrap();
/// assert_eq!(a.to_vec(), vec![0.25, 0.5, 0.75, 1.]);
/// ```
pub fn interpolation_alphas(m_steps: usize, method: RiemannMethod) -> Result<Array1<f64>> {
    if m_steps == 0 {
        return Err(PipelineError::invalid("m_steps must be positive"))?;
    }
    let m = m_steps as f64;
    Ok(match method {
        RiemannMethod::Trapezoidal => Array1::linspace(0., 1., m_steps + 1),
        RiemannMethod::Left => Array1::linspace(0., 1. - 1. / m, m_steps),
        RiemannMethod::Right => Array1::linspace(1. / m, 1., m_steps),
        RiemannMethod::Midpoint => Array1::linspace(0.5 / m, 1. - 0.5 / m, m_steps),
    })
}

/// Linear interpolations between `baseline` and `input`, one per alpha,
/// stacked along a new first axis
pub fn generate_path_inputs(
    baseline: &Array3<f64>,
    input: &Array3<f64>,
    alphas: &Array1<f64>,
) -> Result<Array4<f64>> {
    if baseline.dim() != input.dim() {
        return Err(PipelineError::invalid(format!(
            "baseline shape {:?} differs from input shape {:?}",
            baseline.dim(),
            input.dim()
        )))?;
    }
    let (h, w, c) = input.dim();
    let delta = input - baseline;
    let mut paths = Array4::<f64>::zeros((alphas.len(), h, w, c));
    for (ii, &alpha) in alphas.iter().enumerate() {
        paths
            .slice_mut(s![ii, .., .., ..])
            .assign(&(baseline + &(&delta * alpha)));
    }
    Ok(paths)
}

/// Average the path gradients (first axis) into one attribution map
pub fn integral_approximation(gradients: &Array4<f64>, method: RiemannMethod) -> Result<Array3<f64>> {
    let n = gradients.len_of(Axis(0));
    let averaged = match method {
        RiemannMethod::Trapezoidal => {
            if n < 2 {
                return Err(PipelineError::invalid(
                    "trapezoidal approximation needs at least two gradients",
                ))?;
            }
            let grads = (&gradients.slice(s![..n - 1, .., .., ..])
                + &gradients.slice(s![1.., .., .., ..]))
                / 2.;
            grads.mean_axis(Axis(0))
        }
        RiemannMethod::Left | RiemannMethod::Midpoint | RiemannMethod::Right => {
            gradients.mean_axis(Axis(0))
        }
    };
    averaged.ok_or_else(|| PipelineError::invalid("no gradient to integrate").into())
}

/// Integrated gradients of `input` with respect to `baseline`.
///
/// `gradient_fn` receives the interpolated images (steps, h, w, c) and
/// returns the model gradients for each of them, same shape.
pub fn integrated_gradients<F>(
    baseline: &Array3<f64>,
    input: &Array3<f64>,
    m_steps: usize,
    method: RiemannMethod,
    mut gradient_fn: F,
) -> Result<Array3<f64>>
where
    F: FnMut(&Array4<f64>) -> Result<Array4<f64>>,
{
    let alphas = interpolation_alphas(m_steps, method)?;
    let paths = generate_path_inputs(baseline, input, &alphas)?;
    let gradients = gradient_fn(&paths)?;
    if gradients.dim() != paths.dim() {
        return Err(PipelineError::invalid(format!(
            "gradients of shape {:?} for path inputs of shape {:?}",
            gradients.dim(),
            paths.dim()
        )))?;
    }
    let avg = integral_approximation(&gradients, method)?;
    Ok((input - baseline) * avg)
}
