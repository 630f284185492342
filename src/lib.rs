pub mod error;

mod driver;
mod float;
mod ops;
mod ortho;
mod power;

pub use driver::{
    low_rank, low_rank_multi, low_rank_with_params, rescale_to_range, ApproxRec, BlockParams,
    Diagnostics,
};
pub use error::SvdError;
pub use float::SvdFloat;
pub use ops::{dot, multiply, multiply_transpose, norm, normalize};
