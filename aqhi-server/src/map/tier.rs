//! AQHI colour tiers.

use std::fmt;

use serde::Serialize;

use crate::aqhi::Aqhi;

/// Health-risk band used to colour a station's marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    /// Index at or below 3.
    Low,
    /// Index above 3, at or below 6.
    Moderate,
    /// Index above 6, or no index field at all.
    High,
}

impl RiskTier {
    /// Classify an index value.
    ///
    /// # Examples
    ///
    /// ```
    /// use aqhi_server::map::RiskTier;
    ///
    /// assert_eq!(RiskTier::from_aqhi(3.0), RiskTier::Low);
    /// assert_eq!(RiskTier::from_aqhi(6.0), RiskTier::Moderate);
    /// assert_eq!(RiskTier::from_aqhi(6.5), RiskTier::High);
    /// ```
    pub fn from_aqhi(value: f64) -> Self {
        if value <= 3.0 {
            RiskTier::Low
        } else if value <= 6.0 {
            RiskTier::Moderate
        } else {
            RiskTier::High
        }
    }

    /// Classify an index as reported by the feed.
    ///
    /// `null` compares as zero and lands in `Low`; an absent index fails
    /// both comparisons and lands in `High`.
    pub fn from_reading(value: Aqhi) -> Self {
        match value {
            Aqhi::Value(v) => Self::from_aqhi(v),
            Aqhi::Null => Self::from_aqhi(0.0),
            Aqhi::Missing => Self::from_aqhi(f64::NAN),
        }
    }

    /// CSS colour name used for stroke and fill.
    pub fn color(self) -> &'static str {
        match self {
            RiskTier::Low => "green",
            RiskTier::Moderate => "orange",
            RiskTier::High => "red",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.color())
    }
}
