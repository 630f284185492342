use crate::float::SvdFloat;
use ndarray::Array2;

/// Norms collapse to zero below this; guards division by a collapsed vector.
pub(crate) const NORM_FLOOR: f64 = 1e-12;

// dot product of two vectors, accumulated in f64
pub fn dot<T: SvdFloat>(x: &[T], y: &[T]) -> T {
    let sum: f64 = x
        .iter()
        .zip(y)
        .map(|(a, b)| a.to_f64().unwrap() * b.to_f64().unwrap())
        .sum();
    T::from_f64(sum).unwrap()
}

// norm (length) of a vector, accumulated in f64
pub fn norm<T: SvdFloat>(x: &[T]) -> T {
    T::from_f64(norm_f64(x)).unwrap()
}

pub(crate) fn norm_f64<T: SvdFloat>(x: &[T]) -> f64 {
    let sum: f64 = x
        .iter()
        .map(|a| {
            let a = a.to_f64().unwrap();
            a * a
        })
        .sum();
    sum.sqrt()
}

/// Scales `x` to unit length. Leaves `x` unchanged when its norm is below
/// the floor, i.e. the vector has collapsed to noise.
pub fn normalize<T: SvdFloat>(x: &mut [T]) {
    let n = norm_f64(x);
    if n < NORM_FLOOR {
        return;
    }
    let n = T::from_f64(n).unwrap();
    for elem in x.iter_mut() {
        *elem = *elem / n;
    }
}

// norm of one column of a block, accumulated in f64
pub(crate) fn col_norm_f64<T: SvdFloat>(a: &Array2<T>, j: usize) -> f64 {
    let sum: f64 = a
        .column(j)
        .iter()
        .map(|v| {
            let v = v.to_f64().unwrap();
            v * v
        })
        .sum();
    sum.sqrt()
}

pub(crate) fn normalize_col<T: SvdFloat>(a: &mut Array2<T>, j: usize) {
    let n = col_norm_f64(a, j);
    if n < NORM_FLOOR {
        return;
    }
    let n = T::from_f64(n).unwrap();
    for v in a.column_mut(j).iter_mut() {
        *v = *v / n;
    }
}

/// Dense product `Y = R * V` for an m×n residual and an n×b block.
///
/// Each output row is built by accumulating `a * (row of V)` across the
/// contraction dimension, so the same loop serves any block width.
pub fn multiply<T: SvdFloat>(r: &Array2<T>, v: &Array2<T>) -> Array2<T> {
    let (m, n) = r.dim();
    let b = v.ncols();
    debug_assert_eq!(n, v.nrows(), "multiply: R is m×n, V must be n×b");

    let mut y = Array2::zeros((m, b));
    for i in 0..m {
        for k in 0..n {
            let a_val = r[[i, k]];
            for j in 0..b {
                y[[i, j]] += a_val * v[[k, j]];
            }
        }
    }
    y
}

/// Dense product `Z = Rᵗ * Y` for an m×n residual and an m×b block,
/// iterating the contraction over R's rows into Z's columns.
pub fn multiply_transpose<T: SvdFloat>(r: &Array2<T>, y: &Array2<T>) -> Array2<T> {
    let (m, n) = r.dim();
    let b = y.ncols();
    debug_assert_eq!(m, y.nrows(), "multiply_transpose: R is m×n, Y must be m×b");

    let mut z = Array2::zeros((n, b));
    for i in 0..m {
        for k in 0..n {
            let a_val = r[[i, k]];
            for j in 0..b {
                z[[k, j]] += a_val * y[[i, j]];
            }
        }
    }
    z
}

// Frobenius norm of the elementwise difference, accumulated in f64
pub(crate) fn frob_diff<T: SvdFloat>(a: &Array2<T>, b: &Array2<T>) -> f64 {
    debug_assert_eq!(a.dim(), b.dim());
    let sum: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x.to_f64().unwrap() - y.to_f64().unwrap();
            d * d
        })
        .sum();
    sum.sqrt()
}

pub(crate) fn frob_norm<T: SvdFloat>(a: &Array2<T>) -> f64 {
    let sum: f64 = a
        .iter()
        .map(|x| {
            let x = x.to_f64().unwrap();
            x * x
        })
        .sum();
    sum.sqrt()
}
