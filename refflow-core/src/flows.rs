//! Derived Flow Calculator
//!
//! Converts a monthly reference volume (m³) into design flow rates (L/s):
//!
//! ```text
//! adjustment  = 24 / H                       (1 without operating hours)
//! base mean   = (R / D) / T * 1000
//! mean        = base mean * adjustment
//! max daily   = mean * K1
//! max hourly  = mean * K2
//! max combined= mean * K1 * K2               (peaking product)
//!             | max(series) / D / T * 1000   (historical maximum)
//! ```

use crate::error::{EstimatorError, Result};
use crate::params::{CombinedFlowDefinition, ProjectParameters};
use serde::{Deserialize, Serialize};

/// Litres per cubic metre
pub const LITERS_PER_CUBIC_METER: f64 = 1000.0;

/// Hours in a day
pub const HOURS_PER_DAY: f64 = 24.0;

/// Design flow rates derived from a reference consumption
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedFlows {
    /// 24 / operating hours (1 for continuous operation)
    pub adjustment_factor: f64,
    /// Mean flow over continuous operation, L/s
    pub base_mean_flow: f64,
    /// Mean flow over the operating hours, L/s
    pub mean_flow: f64,
    /// Maximum daily flow (mean * K1), L/s
    pub max_daily_flow: f64,
    /// Maximum hourly flow (mean * K2), L/s
    pub max_hourly_flow: f64,
    /// Maximum combined flow, L/s
    pub max_combined_flow: f64,
    /// Definition used for the combined flow
    pub combined_definition: CombinedFlowDefinition,
}

/// Mean flow in L/s of `volume` m³ spread over `days` days of `daily_seconds`
pub fn base_mean_flow(volume: f64, days: u32, daily_seconds: u32) -> Result<f64> {
    if days < 1 {
        return Err(EstimatorError::invalid("days per month must be at least 1"));
    }
    if daily_seconds < 1 {
        return Err(EstimatorError::invalid("daily seconds must be at least 1"));
    }
    Ok((volume / days as f64) / daily_seconds as f64 * LITERS_PER_CUBIC_METER)
}

/// Operating-hours adjustment, 24 / H
pub fn adjustment_factor(operating_hours: Option<f64>) -> Result<f64> {
    match operating_hours {
        None => Ok(1.0),
        Some(hours) if (1.0..=HOURS_PER_DAY).contains(&hours) => Ok(HOURS_PER_DAY / hours),
        Some(hours) => Err(EstimatorError::invalid(format!(
            "operating hours must be between 1 and 24, got {}",
            hours
        ))),
    }
}

/// Compute every design flow for a reference consumption
///
/// `historical_max` is the largest reading of the series; it is only used by
/// [`CombinedFlowDefinition::HistoricalMaximum`].
pub fn compute_flows(
    reference: f64,
    params: &ProjectParameters,
    historical_max: f64,
) -> Result<DerivedFlows> {
    let base = base_mean_flow(reference, params.days_per_month, params.daily_seconds)?;
    let adjustment = adjustment_factor(params.operating_hours)?;

    let mean_flow = base * adjustment;
    let max_combined_flow = match params.combined_flow {
        CombinedFlowDefinition::PeakingProduct => mean_flow * params.k1 * params.k2,
        CombinedFlowDefinition::HistoricalMaximum => {
            base_mean_flow(historical_max, params.days_per_month, params.daily_seconds)?
        }
    };

    Ok(DerivedFlows {
        adjustment_factor: adjustment,
        base_mean_flow: base,
        mean_flow,
        max_daily_flow: mean_flow * params.k1,
        max_hourly_flow: mean_flow * params.k2,
        max_combined_flow,
        combined_definition: params.combined_flow,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_mean_flow() {
        let q = base_mean_flow(300_000.0, 30, 86_400).unwrap();
        assert!((q - 115.740_740_7).abs() < 1e-6);
    }

    #[test]
    fn test_continuous_operation() {
        let params = ProjectParameters {
            k1: 1.2,
            k2: 1.5,
            ..Default::default()
        };
        let flows = compute_flows(300_000.0, &params, 320_000.0).unwrap();

        assert_eq!(flows.adjustment_factor, 1.0);
        assert_eq!(flows.mean_flow, flows.base_mean_flow);
        assert!((flows.max_daily_flow - flows.mean_flow * 1.2).abs() < 1e-12);
        assert!((flows.max_hourly_flow - flows.mean_flow * 1.5).abs() < 1e-12);
        assert!((flows.max_combined_flow - flows.mean_flow * 1.8).abs() < 1e-9);
    }

    #[test]
    fn test_operating_hours_adjustment() {
        let params = ProjectParameters {
            operating_hours: Some(16.0),
            ..Default::default()
        };
        let flows = compute_flows(300_000.0, &params, 300_000.0).unwrap();
        assert!((flows.adjustment_factor - 1.5).abs() < 1e-12);
        assert!((flows.mean_flow - 115.740_740_7 * 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_more_hours_lowers_mean_flow() {
        let mut previous = f64::INFINITY;
        for hours in 1..=24 {
            let params = ProjectParameters {
                operating_hours: Some(hours as f64),
                ..Default::default()
            };
            let flows = compute_flows(250_000.0, &params, 250_000.0).unwrap();
            assert!(flows.mean_flow < previous);
            previous = flows.mean_flow;
        }
    }

    #[test]
    fn test_higher_k1_raises_daily_flow() {
        let mut previous = 0.0;
        for step in 0..10 {
            let params = ProjectParameters {
                k1: 1.0 + step as f64 * 0.1,
                ..Default::default()
            };
            let flows = compute_flows(250_000.0, &params, 250_000.0).unwrap();
            assert!(flows.max_daily_flow > previous);
            previous = flows.max_daily_flow;
        }
    }

    #[test]
    fn test_historical_maximum_definition() {
        let params = ProjectParameters {
            combined_flow: CombinedFlowDefinition::HistoricalMaximum,
            operating_hours: Some(12.0),
            ..Default::default()
        };
        let flows = compute_flows(300_000.0, &params, 345_600.0).unwrap();

        // Unscaled by K1, K2 or the operating-hours adjustment
        assert!((flows.max_combined_flow - 133.333_333_3).abs() < 1e-6);
        assert_eq!(
            flows.combined_definition,
            CombinedFlowDefinition::HistoricalMaximum
        );
    }

    #[test]
    fn test_rejects_zero_divisors() {
        assert!(base_mean_flow(1.0, 0, 86_400).is_err());
        assert!(base_mean_flow(1.0, 30, 0).is_err());
        assert!(adjustment_factor(Some(0.0)).is_err());
        assert_eq!(adjustment_factor(None).unwrap(), 1.0);

        let params = ProjectParameters {
            days_per_month: 0,
            ..Default::default()
        };
        assert!(matches!(
            compute_flows(1.0, &params, 1.0),
            Err(EstimatorError::InvalidInput(_))
        ));
    }
}
