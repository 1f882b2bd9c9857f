use core_types::TemplateId;
use std::collections::BTreeMap;

/// The default parameter grid for a template: parameter name -> ordered list
/// of candidate values, mirroring the grid-search convention used by the
/// wider research engine. The midpoint element of each list serves as the
/// representative default.
pub fn parameter_grid(id: TemplateId) -> BTreeMap<String, Vec<f64>> {
    let entries: &[(&str, &[f64])] = match id {
        TemplateId::MomentumRanker => &[
            ("lookback_days", &[63.0, 126.0, 189.0, 252.0]),
            ("stock_count", &[10.0, 20.0, 30.0, 40.0, 50.0]),
            ("rebalance_days", &[5.0, 10.0, 21.0]),
            ("stop_loss_pct", &[0.08, 0.10, 0.15, 0.20]),
            ("ma_window", &[50.0, 100.0, 150.0, 200.0]),
        ],
        TemplateId::ConcentratedMomentum => &[
            ("lookback_days", &[63.0, 126.0, 252.0]),
            ("stock_count", &[5.0, 8.0, 10.0, 12.0, 15.0]),
            ("max_weight", &[0.10, 0.15, 0.20]),
            ("stop_loss_pct", &[0.10, 0.12, 0.15, 0.18, 0.20]),
            ("ma_window", &[20.0, 50.0, 100.0]),
        ],
        TemplateId::LowVolRotation => &[
            ("vol_window", &[21.0, 42.0, 63.0, 126.0]),
            ("stock_count", &[15.0, 20.0, 25.0, 30.0, 40.0]),
            ("rebalance_days", &[10.0, 21.0, 42.0]),
            ("max_weight", &[0.05, 0.08, 0.10]),
        ],
        TemplateId::DefensiveTrend => &[
            ("ma_window", &[50.0, 100.0, 150.0, 200.0]),
            ("regime_window", &[126.0, 189.0, 252.0]),
            ("stock_count", &[10.0, 15.0, 20.0, 25.0, 30.0]),
            ("stop_loss_pct", &[0.05, 0.08, 0.10, 0.12, 0.15]),
        ],
        TemplateId::FastMeanReversion => &[
            ("zscore_entry", &[1.5, 2.0, 2.5, 3.0]),
            ("holding_days", &[2.0, 3.0, 5.0, 8.0]),
            ("stock_count", &[10.0, 15.0, 20.0, 25.0, 30.0]),
            ("stop_loss_pct", &[0.05, 0.08, 0.10]),
        ],
    };

    entries
        .iter()
        .map(|(name, values)| (name.to_string(), values.to_vec()))
        .collect()
}
