use crate::float::SvdFloat;
use crate::ops;
use crate::ortho::{self, Basis};
use ndarray::Array2;

/// Outcome of one block extraction.
///
/// All `b` right-vector columns are returned so the caller can grow the
/// basis, including columns whose singular value collapsed; those carry a
/// zero in `sigmas` and left the residual untouched.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BlockStep<T> {
    pub columns: Vec<Vec<T>>,
    pub sigmas: Vec<T>,
    pub iterations: usize,
    pub converged: bool,
    pub skipped: usize,
}

// Deterministic seed pattern for the starting block: a pure function of
// (row, column), so repeated runs are bit-identical. A statistical RNG,
// even a seeded one, would let convergence differ by rounding order.
fn seed_block<T: SvdFloat>(n: usize, b: usize) -> Array2<T> {
    let mut v = Array2::zeros((n, b));
    for i in 0..n {
        for j in 0..b {
            v[[i, j]] = T::from_f64(1.0 + 1e-3 * (j + (i % 7)) as f64).unwrap();
        }
    }
    v
}

/// Extracts one block of up to `b` singular triplets from the residual.
///
/// Runs the R→V→Y→Z→QR power loop to convergence (or `max_iter`, which is
/// not an error; the best available iterate is used), then removes each
/// column's rank-1 contribution from `r` while adding the identical value
/// to `acc`, preserving `acc + r` exactly.
pub(crate) fn block_step<T: SvdFloat>(
    r: &mut Array2<T>,
    acc: &mut Array2<T>,
    b: usize,
    basis: &Basis<T>,
    max_iter: usize,
    tol: T,
) -> BlockStep<T> {
    let (m, n) = r.dim();
    let tol = tol.to_f64().unwrap();

    let mut v = seed_block(n, b);
    ortho::deflate_against_basis(&mut v, basis);

    let mut iterations = 0;
    let mut converged = false;
    for _ in 0..max_iter {
        iterations += 1;
        let v_prev = v.clone();

        let y = ops::multiply(r, &v);
        let mut z = ops::multiply_transpose(r, &y);
        ortho::qr_orthonormalize(&mut z);
        v = z;

        if ops::frob_diff(&v, &v_prev) < tol {
            converged = true;
            break;
        }
    }

    // rank-b update with the converged (or best available) block
    let y = ops::multiply(r, &v);
    let mut sigmas = vec![T::zero(); b];
    let mut skipped = 0;
    for j in 0..b {
        let sigma = ops::col_norm_f64(&y, j);
        if sigma < ops::NORM_FLOOR {
            // numerically null direction; neither acc nor r is touched
            skipped += 1;
            continue;
        }
        let sigma = T::from_f64(sigma).unwrap();
        sigmas[j] = sigma;

        for i in 0..m {
            let u_i = y[[i, j]] / sigma;
            let su_i = sigma * u_i;
            for k in 0..n {
                let delta = su_i * v[[k, j]];
                acc[[i, k]] += delta;
                r[[i, k]] -= delta;
            }
        }
    }

    let columns = (0..b).map(|j| v.column(j).to_vec()).collect();
    BlockStep {
        columns,
        sigmas,
        iterations,
        converged,
        skipped,
    }
}
