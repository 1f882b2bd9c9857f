use core_types::TemplateId;
use serde::Serialize;

/// Structural complexity of a template's generated strategy code.
///
/// The recommender downgrades away from `Complex` templates when the
/// validator reports critical architecture issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Simple,
    Complex,
}

/// Static metadata describing one template's architecture and expectations.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateSpec {
    pub id: TemplateId,
    /// One-line description of the strategy-construction pattern.
    pub architecture: &'static str,
    pub complexity: Complexity,
    /// The Sharpe range this template has historically produced, (low, high).
    pub expected_sharpe: (f64, f64),
}

impl TemplateSpec {
    pub fn is_complex(&self) -> bool {
        self.complexity == Complexity::Complex
    }
}

/// The metadata table for every template, in declaration order.
pub(crate) fn all_specs() -> Vec<TemplateSpec> {
    vec![
        TemplateSpec {
            id: TemplateId::MomentumRanker,
            architecture: "Cross-sectional momentum ranking over a liquid universe, rebalanced monthly with a long-term trend gate",
            complexity: Complexity::Simple,
            expected_sharpe: (0.8, 1.8),
        },
        TemplateSpec {
            id: TemplateId::ConcentratedMomentum,
            architecture: "Concentrated high-conviction momentum book with position caps and tight per-name stops",
            complexity: Complexity::Complex,
            expected_sharpe: (1.2, 2.5),
        },
        TemplateSpec {
            id: TemplateId::LowVolRotation,
            architecture: "Low-volatility sector rotation holding the calmest names, sized by inverse volatility",
            complexity: Complexity::Simple,
            expected_sharpe: (0.6, 1.4),
        },
        TemplateSpec {
            id: TemplateId::DefensiveTrend,
            architecture: "Trend following behind a market-regime filter and a breadth filter, with defensive cash fallback",
            complexity: Complexity::Complex,
            expected_sharpe: (0.7, 1.6),
        },
        TemplateSpec {
            id: TemplateId::FastMeanReversion,
            architecture: "Short-horizon mean reversion on z-score extremes, small and cheap to iterate on",
            complexity: Complexity::Simple,
            expected_sharpe: (0.4, 1.2),
        },
    ]
}
