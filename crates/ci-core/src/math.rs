//! Mathematical utilities for interval construction
//!
//! Standard-normal and Beta helpers used by the asymptotic, bootstrap and
//! binomial-proportion intervals.

/// Distribution-related mathematical functions
pub mod distributions {
    /// Standard normal distribution utilities
    pub mod normal {
        use statrs::function::erf::{erfc, erfc_inv};
        use std::f64::consts::SQRT_2;

        /// Cumulative distribution function of the standard normal distribution
        pub fn cdf(x: f64) -> f64 {
            if x.is_nan() {
                return f64::NAN;
            }
            0.5 * erfc(-x / SQRT_2)
        }

        /// Inverse CDF (quantile function) of the standard normal distribution
        ///
        /// Returns `-inf`/`+inf` at the boundaries `p <= 0` and `p >= 1`.
        pub fn ppf(p: f64) -> f64 {
            if p.is_nan() {
                return f64::NAN;
            }
            if p <= 0.0 {
                return f64::NEG_INFINITY;
            }
            if p >= 1.0 {
                return f64::INFINITY;
            }
            -SQRT_2 * erfc_inv(2.0 * p)
        }

        /// Alias for ppf (percent point function) that matches common naming
        #[inline]
        pub fn quantile(p: f64) -> f64 {
            ppf(p)
        }

        /// Two-sided critical value `z` such that `P(|Z| <= z) = confidence_level`
        ///
        /// 1.959964 for a 95% level.
        #[inline]
        pub fn two_sided_critical(confidence_level: f64) -> f64 {
            ppf(1.0 - (1.0 - confidence_level) / 2.0)
        }

    }

    /// Beta distribution utilities
    pub mod beta {
        use crate::{Error, Result};
        use statrs::distribution::{Beta, ContinuousCDF};

        /// Quantile of the Beta(a, b) distribution
        pub fn quantile(a: f64, b: f64, p: f64) -> Result<f64> {
            if !(0.0..=1.0).contains(&p) {
                return Err(Error::InvalidParameter(format!(
                    "Probability {p} must be in [0, 1]"
                )));
            }
            let dist = Beta::new(a, b).map_err(|e| {
                Error::Computation(format!("Failed to create Beta({a}, {b}) distribution: {e}"))
            })?;

            if p == 0.0 {
                return Ok(0.0);
            }
            if p == 1.0 {
                return Ok(1.0);
            }
            Ok(dist.inverse_cdf(p).clamp(0.0, 1.0))
        }

    }
}
