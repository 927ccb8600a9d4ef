//! Numeric trait for rankable inputs
//!
//! Labels, scores and weights arrive as floats or integers. Ranking only
//! needs ordering; weights and statistics need a lossless-enough `f64` view.

use num_traits::ToPrimitive;
use std::fmt::Debug;

/// A value that can be ordered, shared across threads and viewed as `f64`
pub trait Numeric: Copy + PartialOrd + Debug + Send + Sync + ToPrimitive + 'static {
    /// Convert to `f64`, mapping unrepresentable values to NaN
    #[inline]
    fn to_f64_lossy(self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }

    /// Whether this value can take part in an ordering (i.e. is not NaN)
    #[inline]
    fn is_comparable(self) -> bool {
        self.partial_cmp(&self).is_some()
    }
}

macro_rules! impl_numeric {
    ($($t:ty),*) => {
        $(impl Numeric for $t {})*
    };
}

impl_numeric!(f64, f32, i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

/// Convert a slice of any numeric type into owned `f64` values
pub fn to_f64_vec<T: Numeric>(values: &[T]) -> Vec<f64> {
    values.iter().map(|v| v.to_f64_lossy()).collect()
}
