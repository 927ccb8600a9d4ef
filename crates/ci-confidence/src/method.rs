//! Interval estimation methods
//!
//! The external surface names methods by string; internally the choice is
//! an enum so dispatch is exhaustive.

use ci_core::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a confidence interval is constructed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimationMethod {
    /// DeLong placement-value variance with a normal approximation (ROC AUC only)
    Delong,
    /// Point estimate plus/minus a normal quantile times a standard error
    #[serde(alias = "normal")]
    NormalApprox,
    /// Empirical quantiles of the bootstrap distribution
    BootstrapPercentile,
    /// Reverse-percentile bootstrap
    BootstrapBasic,
    /// Bias-corrected and accelerated bootstrap
    BootstrapBca,
    /// Wilson score interval for a proportion
    Wilson,
    /// Agresti-Coull adjusted Wald interval for a proportion
    AgrestiCoull,
    /// Exact Beta-quantile interval for a proportion
    #[serde(alias = "beta")]
    ClopperPearson,
    /// Bayesian interval under the Jeffreys prior
    Jeffreys,
}

impl EstimationMethod {
    pub const ALL: [EstimationMethod; 9] = [
        Self::Delong,
        Self::NormalApprox,
        Self::BootstrapPercentile,
        Self::BootstrapBasic,
        Self::BootstrapBca,
        Self::Wilson,
        Self::AgrestiCoull,
        Self::ClopperPearson,
        Self::Jeffreys,
    ];

    /// Canonical external name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delong => "delong",
            Self::NormalApprox => "normal_approx",
            Self::BootstrapPercentile => "bootstrap_percentile",
            Self::BootstrapBasic => "bootstrap_basic",
            Self::BootstrapBca => "bootstrap_bca",
            Self::Wilson => "wilson",
            Self::AgrestiCoull => "agresti_coull",
            Self::ClopperPearson => "clopper_pearson",
            Self::Jeffreys => "jeffreys",
        }
    }

    /// Methods that draw a bootstrap distribution
    pub fn is_bootstrap(&self) -> bool {
        matches!(
            self,
            Self::BootstrapPercentile | Self::BootstrapBasic | Self::BootstrapBca
        )
    }

    /// Methods that need a success count and a trial count
    pub fn is_binomial(&self) -> bool {
        matches!(
            self,
            Self::Wilson | Self::AgrestiCoull | Self::ClopperPearson | Self::Jeffreys
        )
    }
}

impl FromStr for EstimationMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "delong" => Ok(Self::Delong),
            "normal" | "normal_approx" => Ok(Self::NormalApprox),
            "bootstrap_percentile" => Ok(Self::BootstrapPercentile),
            "bootstrap_basic" => Ok(Self::BootstrapBasic),
            "bootstrap_bca" => Ok(Self::BootstrapBca),
            "wilson" => Ok(Self::Wilson),
            "agresti_coull" => Ok(Self::AgrestiCoull),
            "beta" | "clopper_pearson" => Ok(Self::ClopperPearson),
            "jeffreys" => Ok(Self::Jeffreys),
            other => Err(Error::UnsupportedMethod(format!(
                "Unknown estimation method '{other}'"
            ))),
        }
    }
}

impl fmt::Display for EstimationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
