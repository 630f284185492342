use num_traits::{Float, FromPrimitive, ToPrimitive};
use std::fmt::Debug;
use std::iter::Sum;
use std::ops::{AddAssign, MulAssign, SubAssign};

/// Floating point types usable with the block power iteration.
///
/// Working precision follows `Self`; dot products and norms accumulate in
/// `f64` regardless, so `f32` matrices keep acceptable accuracy over long
/// contraction dimensions.
pub trait SvdFloat:
    Float + FromPrimitive + ToPrimitive + Debug + Send + Sync + AddAssign + SubAssign + MulAssign + Sum
{
    fn eps() -> Self;
    fn compare(a: Self, b: Self) -> bool;
}

impl SvdFloat for f32 {
    fn eps() -> Self {
        f32::EPSILON
    }

    fn compare(a: Self, b: Self) -> bool {
        (b - a).abs() < f32::EPSILON
    }
}

impl SvdFloat for f64 {
    fn eps() -> Self {
        f64::EPSILON
    }

    fn compare(a: Self, b: Self) -> bool {
        (b - a).abs() < f64::EPSILON
    }
}
