use crate::float::SvdFloat;
use crate::ops;
use ndarray::Array2;

/// Append-only store of previously extracted right singular vectors.
///
/// Columns are pushed as blocks complete, so the projection loops iterate
/// over the vectors found so far and the final target rank never needs to
/// be known up front.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Basis<T> {
    n: usize,
    cols: Vec<Vec<T>>,
}

impl<T: SvdFloat> Basis<T> {
    pub(crate) fn new(n: usize) -> Self {
        Self { n, cols: vec![] }
    }

    pub(crate) fn len(&self) -> usize {
        self.cols.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.cols.is_empty()
    }

    pub(crate) fn push(&mut self, col: Vec<T>) {
        debug_assert_eq!(col.len(), self.n, "basis column must have n entries");
        self.cols.push(col);
    }

    pub(crate) fn column(&self, k: usize) -> &[T] {
        &self.cols[k]
    }
}

/// In-place modified Gram-Schmidt over the columns of an n×b block.
///
/// Each column is orthogonalized against the columns before it only, so the
/// result is a valid orthonormal set but not a unique one; reordering the
/// input produces a different valid basis. A column whose post-subtraction
/// norm is exactly zero is left at zero (a linearly dependent direction).
pub(crate) fn qr_orthonormalize<T: SvdFloat>(z: &mut Array2<T>) {
    let (n, b) = z.dim();

    for j in 0..b {
        for k in 0..j {
            let mut sum = 0.0_f64;
            for i in 0..n {
                sum += z[[i, k]].to_f64().unwrap() * z[[i, j]].to_f64().unwrap();
            }
            let proj = T::from_f64(sum).unwrap();
            for i in 0..n {
                let sub = proj * z[[i, k]];
                z[[i, j]] -= sub;
            }
        }

        let norm = ops::col_norm_f64(z, j);
        if norm == 0.0 {
            continue;
        }
        let inv = T::from_f64(1.0 / norm).unwrap();
        for v in z.column_mut(j).iter_mut() {
            *v *= inv;
        }
    }
}

/// Removes from every column of `v` its projection onto each basis column,
/// in column order, then renormalizes. Keeps a new block from rediscovering
/// directions extracted by earlier blocks.
pub(crate) fn deflate_against_basis<T: SvdFloat>(v: &mut Array2<T>, basis: &Basis<T>) {
    if basis.is_empty() {
        return;
    }
    let (n, b) = v.dim();

    for j in 0..b {
        for k in 0..basis.len() {
            let q = basis.column(k);
            let mut sum = 0.0_f64;
            for i in 0..n {
                sum += q[i].to_f64().unwrap() * v[[i, j]].to_f64().unwrap();
            }
            let proj = T::from_f64(sum).unwrap();
            for i in 0..n {
                let sub = proj * q[i];
                v[[i, j]] -= sub;
            }
        }
        ops::normalize_col(v, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn col_dot(a: &Array2<f32>, i: usize, j: usize) -> f32 {
        a.column(i)
            .iter()
            .zip(a.column(j).iter())
            .map(|(x, y)| x * y)
            .sum()
    }

    #[test]
    fn qr_produces_orthonormal_columns() {
        let mut z = array![
            [1.0_f32, 1.0, 0.0],
            [1.0, 0.0, 1.0],
            [0.0, 1.0, 1.0],
            [1.0, 1.0, 1.0],
        ];
        qr_orthonormalize(&mut z);
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!(
                    (col_dot(&z, i, j) - expected).abs() < 1e-5,
                    "columns {i},{j} not orthonormal"
                );
            }
        }
    }

    #[test]
    fn qr_zeroes_dependent_column() {
        // second column is a multiple of the first; the subtraction cancels
        // exactly in f32, so the zero-norm guard fires and the column stays
        // at zero instead of being renormalized
        let mut z = array![[1.0_f32, 2.0], [0.0, 0.0], [0.0, 0.0]];
        qr_orthonormalize(&mut z);
        assert!((col_dot(&z, 0, 0) - 1.0).abs() < 1e-5);
        assert!(z.column(1).iter().all(|v| *v == 0.0));
    }

    #[test]
    fn deflation_removes_basis_components() {
        let mut basis = Basis::new(3);
        basis.push(vec![1.0_f32, 0.0, 0.0]);

        let mut v = array![[1.0_f32], [1.0], [0.0]];
        deflate_against_basis(&mut v, &basis);

        assert!(v[[0, 0]].abs() < 1e-6);
        assert!((v[[1, 0]] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn deflation_is_noop_for_empty_basis() {
        let basis = Basis::<f32>::new(2);
        let mut v = array![[3.0_f32], [4.0]];
        deflate_against_basis(&mut v, &basis);
        assert_eq!(v, array![[3.0], [4.0]]);
    }
}
