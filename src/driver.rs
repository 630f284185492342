use crate::error::SvdError;
use crate::float::SvdFloat;
use crate::ops;
use crate::ortho::Basis;
use crate::power::{self, BlockStep};
use ndarray::{Array1, Array2};
use rayon::prelude::*;

/// Tuning knobs for the block power iteration.
///
/// # Fields
/// - block_max: upper bound on singular triplets extracted per block
/// - max_iter: power-iteration rounds allowed per block before the best
///   available iterate is accepted
/// - tol: Frobenius-norm change in the block below which the loop stops
#[derive(Debug, Clone, PartialEq)]
pub struct BlockParams<T: SvdFloat> {
    pub block_max: usize,
    pub max_iter: usize,
    pub tol: T,
}

impl<T: SvdFloat> Default for BlockParams<T> {
    fn default() -> Self {
        Self {
            block_max: 16,
            max_iter: 100,
            tol: T::from_f64(1e-5).unwrap(),
        }
    }
}

/// Computational diagnostics for one rank-k run.
///
/// # Fields
/// - rank: number of singular directions requested
/// - blocks: number of block extractions performed
/// - iterations: power-iteration rounds summed over all blocks
/// - converged_blocks: blocks whose loop met `tol` before `max_iter`
/// - skipped_columns: directions dropped as numerically null (the only
///   source of under-rank output)
/// - block_max, max_iter, tol: the parameters used
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostics<T: SvdFloat> {
    pub rank: usize,
    pub blocks: usize,
    pub iterations: usize,
    pub converged_blocks: usize,
    pub skipped_columns: usize,
    pub block_max: usize,
    pub max_iter: usize,
    pub tol: T,
}

/// Rank-k approximation result.
///
/// # Fields
/// - d: number of nonzero singular values extracted
/// - s: singular values, one per requested direction, zero where the
///   direction collapsed (descending within each block, not globally)
/// - vt: right singular vectors, one per row (rank × n)
/// - approx: the rank-k reconstruction (accumulator)
/// - residual: what remains of the input; `approx + residual` equals the
///   input to rounding
/// - rel_error: `‖A − approx‖_F / max(‖A‖_F, 1e-12)`
/// - diagnostics: computational diagnostics
#[derive(Debug, Clone, PartialEq)]
pub struct ApproxRec<T: SvdFloat> {
    pub d: usize,
    pub s: Array1<T>,
    pub vt: Array2<T>,
    pub approx: Array2<T>,
    pub residual: Array2<T>,
    pub rel_error: T,
    pub diagnostics: Diagnostics<T>,
}

impl<T: SvdFloat> ApproxRec<T> {
    /// Reconstruction error as the percentage figure reported in tables.
    pub fn percent_error(&self) -> T {
        self.rel_error * T::from_f64(100.0).unwrap()
    }
}

/// Rank-k approximation with default parameters.
///
/// low_rank_with_params(A, rank, `BlockParams { 16, 100, 1e-5 }`)
pub fn low_rank<T: SvdFloat>(a: &Array2<T>, rank: usize) -> Result<ApproxRec<T>, SvdError> {
    low_rank_with_params(a, rank, &BlockParams::default())
}

/// Computes a rank-k approximation of a dense matrix by repeated block
/// extraction until `rank` directions have been produced.
///
/// `rank` may exceed `min(m, n)`; the surplus directions surface as zeros
/// in `s` with the approximation unchanged for them.
pub fn low_rank_with_params<T: SvdFloat>(
    a: &Array2<T>,
    rank: usize,
    params: &BlockParams<T>,
) -> Result<ApproxRec<T>, SvdError> {
    validate(a, rank, params)?;
    let (m, n) = a.dim();

    let mut residual = a.clone();
    let mut acc = Array2::zeros((m, n));
    let mut basis = Basis::new(n);
    let mut sigmas = Vec::with_capacity(rank);

    let mut blocks = 0;
    let mut iterations = 0;
    let mut converged_blocks = 0;
    let mut skipped_columns = 0;

    let mut remaining = rank;
    while remaining > 0 {
        let b = remaining.min(params.block_max);
        let step: BlockStep<T> = power::block_step(
            &mut residual,
            &mut acc,
            b,
            &basis,
            params.max_iter,
            params.tol,
        );

        for (col, sigma) in step.columns.into_iter().zip(step.sigmas) {
            basis.push(col);
            sigmas.push(sigma);
        }
        blocks += 1;
        iterations += step.iterations;
        if step.converged {
            converged_blocks += 1;
        }
        skipped_columns += step.skipped;
        remaining -= b;
    }

    let mut vt_data = Vec::with_capacity(rank * n);
    for k in 0..basis.len() {
        vt_data.extend_from_slice(basis.column(k));
    }
    let vt = Array2::from_shape_vec((rank, n), vt_data)?;

    let rel_error = ops::frob_diff(a, &acc) / ops::frob_norm(a).max(ops::NORM_FLOOR);
    let d = sigmas.iter().filter(|s| **s > T::zero()).count();

    Ok(ApproxRec {
        d,
        s: Array1::from_vec(sigmas),
        vt,
        approx: acc,
        residual,
        rel_error: T::from_f64(rel_error).unwrap(),
        diagnostics: Diagnostics {
            rank,
            blocks,
            iterations,
            converged_blocks,
            skipped_columns,
            block_max: params.block_max,
            max_iter: params.max_iter,
            tol: params.tol,
        },
    })
}

/// Runs one rank-k approximation per requested rank, each against a fresh
/// copy of the input. The runs share no state and execute in parallel;
/// results come back in the order the ranks were given, each bit-identical
/// to a standalone call.
pub fn low_rank_multi<T: SvdFloat>(
    a: &Array2<T>,
    ranks: &[usize],
    params: &BlockParams<T>,
) -> Result<Vec<ApproxRec<T>>, SvdError> {
    ranks
        .par_iter()
        .map(|&rank| low_rank_with_params(a, rank, params))
        .collect()
}

/// Affine rescaling of a matrix onto `[lo, hi]`, e.g. back to the 0..255
/// intensity range before an approximation is written out as an image.
/// A constant matrix maps entirely to `lo`.
pub fn rescale_to_range<T: SvdFloat>(a: &Array2<T>, lo: T, hi: T) -> Array2<T> {
    if a.is_empty() {
        return a.clone();
    }
    let mut minv = a[[0, 0]];
    let mut maxv = a[[0, 0]];
    for &v in a.iter() {
        if v < minv {
            minv = v;
        }
        if v > maxv {
            maxv = v;
        }
    }
    let mut range = maxv - minv;
    if range < T::from_f64(1e-6).unwrap() {
        range = T::one();
    }
    a.map(|&v| lo + (hi - lo) * ((v - minv) / range))
}

fn validate<T: SvdFloat>(
    a: &Array2<T>,
    rank: usize,
    params: &BlockParams<T>,
) -> Result<(), SvdError> {
    let (m, n) = a.dim();
    if m == 0 || n == 0 {
        return Err(SvdError::ConfigError(format!(
            "matrix dimensions must be positive, got {m}x{n}"
        )));
    }
    if rank == 0 {
        return Err(SvdError::ConfigError(
            "rank must be greater than 0".to_string(),
        ));
    }
    if params.block_max == 0 {
        return Err(SvdError::ConfigError(
            "block_max must be greater than 0".to_string(),
        ));
    }
    if params.max_iter == 0 {
        return Err(SvdError::ConfigError(
            "max_iter must be greater than 0".to_string(),
        ));
    }
    if !params.tol.is_finite() || params.tol <= T::zero() {
        return Err(SvdError::ConfigError(format!(
            "tol must be finite and positive, got {:?}",
            params.tol
        )));
    }
    Ok(())
}
