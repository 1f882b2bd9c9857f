use serde::Serialize;
use std::fmt;

/// Importance weight of a criterion. Declaration order is severity order,
/// most severe first, and drives the sort in rendered reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CriterionWeight {
    Critical,
    High,
    Medium,
    Low,
}

impl fmt::Display for CriterionWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CriterionWeight::Critical => "CRITICAL",
            CriterionWeight::High => "HIGH",
            CriterionWeight::Medium => "MEDIUM",
            CriterionWeight::Low => "LOW",
        };
        // pad() honors width specifiers in the criteria table.
        f.pad(s)
    }
}

/// How the actual value is compared against the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    GreaterEq,
    LessEq,
    Less,
    Greater,
    Equal,
}

impl Comparison {
    pub fn symbol(&self) -> &'static str {
        match self {
            Comparison::GreaterEq => ">=",
            Comparison::LessEq => "<=",
            Comparison::Less => "<",
            Comparison::Greater => ">",
            Comparison::Equal => "=",
        }
    }

    /// Applies the literal comparison semantics.
    pub fn holds(&self, actual: f64, threshold: f64) -> bool {
        match self {
            Comparison::GreaterEq => actual >= threshold,
            Comparison::LessEq => actual <= threshold,
            Comparison::Less => actual < threshold,
            Comparison::Greater => actual > threshold,
            Comparison::Equal => actual == threshold,
        }
    }
}

/// One named pass/fail check of the gate.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionCriterion {
    pub name: String,
    pub threshold: f64,
    pub actual: f64,
    pub comparison: Comparison,
    pub weight: CriterionWeight,
    pub passed: bool,
}

impl DecisionCriterion {
    /// Builds a criterion, computing `passed` from the literal comparison.
    pub fn evaluate(
        name: &str,
        actual: f64,
        comparison: Comparison,
        threshold: f64,
        weight: CriterionWeight,
    ) -> Self {
        Self {
            name: name.to_string(),
            threshold,
            actual,
            comparison,
            weight,
            passed: comparison.holds(actual, threshold),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparisons_follow_literal_semantics() {
        assert!(Comparison::Less.holds(0.79, 0.8));
        assert!(!Comparison::Less.holds(0.8, 0.8));
        assert!(Comparison::GreaterEq.holds(60.0, 60.0));
        assert!(Comparison::Equal.holds(1.0, 1.0));
    }

    #[test]
    fn weight_order_is_severity_order() {
        assert!(CriterionWeight::Critical < CriterionWeight::High);
        assert!(CriterionWeight::High < CriterionWeight::Medium);
        assert!(CriterionWeight::Medium < CriterionWeight::Low);
    }
}
