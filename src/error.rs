use thiserror::Error;

/// Errors surfaced by the block SVD routines.
///
/// Numerical degeneracy (collapsed directions, non-convergence) is never
/// reported here; it is absorbed by the iteration and visible only through
/// [`crate::Diagnostics`]. Only invalid configurations reach this type.
#[derive(Error, Debug)]
pub enum SvdError {
    #[error("invalid configuration: {0}")]
    ConfigError(String),

    #[error("shape mismatch: {0}")]
    ShapeError(#[from] ndarray::ShapeError),
}
