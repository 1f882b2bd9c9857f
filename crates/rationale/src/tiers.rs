use serde::Serialize;

/// A named performance band over Sharpe ratios.
///
/// The five tiers are contiguous half-open intervals, lower-inclusive, so a
/// boundary value always belongs to the higher band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerformanceTier {
    pub label: &'static str,
    pub min_sharpe: f64,
}

pub const POOR: PerformanceTier = PerformanceTier {
    label: "Poor",
    min_sharpe: 0.0,
};
pub const ARCHIVE: PerformanceTier = PerformanceTier {
    label: "Archive",
    min_sharpe: 0.5,
};
pub const SOLID: PerformanceTier = PerformanceTier {
    label: "Solid",
    min_sharpe: 1.0,
};
pub const CONTENDER: PerformanceTier = PerformanceTier {
    label: "Contender",
    min_sharpe: 1.5,
};
pub const CHAMPION: PerformanceTier = PerformanceTier {
    label: "Champion",
    min_sharpe: 2.0,
};

/// Classifies a Sharpe ratio into its performance tier.
pub fn performance_tier(sharpe: f64) -> PerformanceTier {
    if sharpe >= CHAMPION.min_sharpe {
        CHAMPION
    } else if sharpe >= CONTENDER.min_sharpe {
        CONTENDER
    } else if sharpe >= SOLID.min_sharpe {
        SOLID
    } else if sharpe >= ARCHIVE.min_sharpe {
        ARCHIVE
    } else {
        POOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_values_belong_to_the_higher_band() {
        assert_eq!(performance_tier(0.5).label, "Archive");
        assert_eq!(performance_tier(1.0).label, "Solid");
        assert_eq!(performance_tier(1.5).label, "Contender");
        assert_eq!(performance_tier(2.0).label, "Champion");
    }

    #[test]
    fn tiers_cover_all_reals() {
        assert_eq!(performance_tier(-3.0).label, "Poor");
        assert_eq!(performance_tier(0.49).label, "Poor");
        assert_eq!(performance_tier(17.0).label, "Champion");
    }
}
