//! Averaging strategies for per-class metrics

use ci_core::{Error, MetricParams, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Parameter key carrying the averaging strategy
pub const AVERAGE_PARAM: &str = "average";

/// How per-class counts combine into one number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Average {
    /// Labels must be 0/1; class 1 is positive
    #[default]
    Binary,
    /// Pool one-vs-rest counts over all classes, then take the ratio
    Micro,
    /// Unweighted mean of the per-class values
    Macro,
}

impl Average {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Micro => "micro",
            Self::Macro => "macro",
        }
    }

    /// Read `average` from metric parameters, defaulting to binary
    pub fn from_params(params: &MetricParams) -> Result<Self> {
        params
            .get_text(AVERAGE_PARAM)?
            .map_or(Ok(Self::Binary), str::parse)
    }

    /// Parameters carrying this strategy
    pub fn to_params(self) -> MetricParams {
        MetricParams::new().with(AVERAGE_PARAM, self.as_str())
    }
}

impl FromStr for Average {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "binary" => Ok(Self::Binary),
            "micro" => Ok(Self::Micro),
            "macro" => Ok(Self::Macro),
            other => Err(Error::InvalidParameter(format!(
                "Unknown average '{other}', expected binary, micro or macro"
            ))),
        }
    }
}

impl fmt::Display for Average {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_params() {
        assert_eq!(Average::from_params(&MetricParams::new()).unwrap(), Average::Binary);
        assert_eq!(Average::from_params(&Average::Macro.to_params()).unwrap(), Average::Macro);
        assert!(Average::from_params(&MetricParams::new().with("average", "weighted")).is_err());
        assert!(Average::from_params(&MetricParams::new().with("average", 1.0)).is_err());
    }

    #[test]
    fn test_serde() {
        assert_eq!(serde_json::to_string(&Average::Micro).unwrap(), "\"micro\"");
    }
}
