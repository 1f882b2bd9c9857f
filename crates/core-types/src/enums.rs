use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifies one of the fixed, enumerable strategy templates.
///
/// The declaration order is significant: it is the stable order used for
/// deterministic tie-breaking during exploration, and the order templates
/// appear in rendered reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateId {
    /// Cross-sectional momentum ranking with a monthly rebalance.
    MomentumRanker,
    /// Concentrated high-conviction momentum book.
    ConcentratedMomentum,
    /// Low-volatility sector rotation.
    LowVolRotation,
    /// Trend following behind regime and breadth filters.
    DefensiveTrend,
    /// Short-horizon mean reversion, cheap to iterate on.
    FastMeanReversion,
}

impl TemplateId {
    /// All templates, in declaration order.
    pub const ALL: [TemplateId; 5] = [
        TemplateId::MomentumRanker,
        TemplateId::ConcentratedMomentum,
        TemplateId::LowVolRotation,
        TemplateId::DefensiveTrend,
        TemplateId::FastMeanReversion,
    ];

    /// The stable wire name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateId::MomentumRanker => "momentum_ranker",
            TemplateId::ConcentratedMomentum => "concentrated_momentum",
            TemplateId::LowVolRotation => "low_vol_rotation",
            TemplateId::DefensiveTrend => "defensive_trend",
            TemplateId::FastMeanReversion => "fast_mean_reversion",
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemplateId::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CoreError::UnknownTemplate(s.to_string()))
    }
}

/// An explicit risk-profile override for template selection.
///
/// When a caller supplies one, the recommender maps it directly to a fixed
/// template choice regardless of the current performance metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskProfile {
    /// Concentrate the book for maximum alpha capture.
    Concentrated,
    /// Prioritize drawdown control and stability.
    Stable,
    /// Prioritize fast, low-cost iteration.
    Fast,
}

impl fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskProfile::Concentrated => "concentrated",
            RiskProfile::Stable => "stable",
            RiskProfile::Fast => "fast",
        };
        f.write_str(s)
    }
}

impl FromStr for RiskProfile {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "concentrated" => Ok(RiskProfile::Concentrated),
            "stable" => Ok(RiskProfile::Stable),
            "fast" => Ok(RiskProfile::Fast),
            other => Err(CoreError::UnknownRiskProfile(other.to_string())),
        }
    }
}

/// Severity of a single validation issue.
///
/// This is a required field on every issue, so consumers never have to probe
/// for its presence before branching on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    /// The issue invalidates the strategy as generated.
    Critical,
    /// The issue degrades the strategy but does not invalidate it.
    Moderate,
}
