//! Normality Tests
//!
//! Three independent tests of whether a consumption series plausibly came from
//! a normal distribution:
//! - Shapiro-Wilk (Royston's AS R94 approximation)
//! - D'Agostino-Pearson omnibus K² (skewness and kurtosis tests combined)
//! - One-sample Kolmogorov-Smirnov against a normal distribution
//!
//! Every p-value is read against the fixed [`NORMALITY_ALPHA`]: strictly
//! greater fails to reject normality, anything else rejects it.
//!
//! **Caveat**: the Kolmogorov-Smirnov reference distribution is parameterised by
//! the series' own mean and population standard deviation. Estimating the
//! parameters from the same data makes the test conservative (it rejects less
//! often than its nominal level). The p-value is reported as computed, without a
//! Lilliefors correction.

use crate::distribution::{chi2_sf, kolmogorov_cdf, normal_cdf, normal_quantile, normal_sf};
use crate::error::{StatsError, check_samples, sorted_copy};
use crate::summary::central_moments;
use crate::{NORMALITY_ALPHA, OMNIBUS_MIN_SAMPLES, SHAPIRO_SAMPLE_RANGE};
use serde::{Deserialize, Serialize};

/// Which normality test produced an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NormalityTest {
    /// Shapiro-Wilk W test
    ShapiroWilk,
    /// D'Agostino-Pearson omnibus K² test
    DagostinoPearson,
    /// One-sample Kolmogorov-Smirnov test against a fitted normal
    KolmogorovSmirnov,
}

impl std::fmt::Display for NormalityTest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NormalityTest::ShapiroWilk => write!(f, "Shapiro-Wilk"),
            NormalityTest::DagostinoPearson => write!(f, "D'Agostino-Pearson"),
            NormalityTest::KolmogorovSmirnov => write!(f, "Kolmogorov-Smirnov"),
        }
    }
}

/// Reading of a p-value against [`NORMALITY_ALPHA`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NormalityVerdict {
    /// p > alpha: the data is consistent with a normal distribution
    FailsToReject,
    /// p <= alpha: normality is rejected
    Rejects,
}

impl NormalityVerdict {
    /// Whether normality is accepted
    pub fn is_normal(self) -> bool {
        matches!(self, NormalityVerdict::FailsToReject)
    }
}

impl std::fmt::Display for NormalityVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NormalityVerdict::FailsToReject => write!(f, "fails to reject normality"),
            NormalityVerdict::Rejects => write!(f, "rejects normality"),
        }
    }
}

/// Interpret a p-value (strict `>` comparison against alpha)
pub fn interpret_p_value(p_value: f64) -> NormalityVerdict {
    if p_value > NORMALITY_ALPHA {
        NormalityVerdict::FailsToReject
    } else {
        NormalityVerdict::Rejects
    }
}

/// Statistic and p-value of one test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestOutcome {
    /// Test that produced this outcome
    pub test: NormalityTest,
    /// Test statistic (W, K² or D)
    pub statistic: f64,
    /// p-value
    pub p_value: f64,
    /// Interpretation of the p-value
    pub verdict: NormalityVerdict,
}

impl TestOutcome {
    fn new(test: NormalityTest, statistic: f64, p_value: f64) -> Self {
        Self {
            test,
            statistic,
            p_value,
            verdict: interpret_p_value(p_value),
        }
    }
}

/// Results of all three tests on one series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalityBattery {
    /// Shapiro-Wilk outcome
    pub shapiro_wilk: TestOutcome,
    /// D'Agostino-Pearson outcome
    pub dagostino_pearson: TestOutcome,
    /// Kolmogorov-Smirnov outcome
    pub kolmogorov_smirnov: TestOutcome,
}

impl NormalityBattery {
    /// Outcomes in reporting order
    pub fn outcomes(&self) -> [&TestOutcome; 3] {
        [
            &self.shapiro_wilk,
            &self.dagostino_pearson,
            &self.kolmogorov_smirnov,
        ]
    }

    /// Whether every test fails to reject normality
    pub fn all_fail_to_reject(&self) -> bool {
        self.outcomes().iter().all(|o| o.verdict.is_normal())
    }
}

/// Run all three tests
///
/// The Kolmogorov-Smirnov reference is N(mean, population std-dev) of the
/// samples themselves.
pub fn run_normality_battery(samples: &[f64]) -> Result<NormalityBattery, StatsError> {
    check_samples(samples)?;

    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    let (m2, _, _) = central_moments(samples, mean);

    Ok(NormalityBattery {
        shapiro_wilk: shapiro_wilk(samples)?,
        dagostino_pearson: dagostino_pearson(samples)?,
        kolmogorov_smirnov: kolmogorov_smirnov_normal(samples, mean, m2.sqrt())?,
    })
}

/// Evaluate `c[0] + c[1] x + c[2] x² + ...`
fn poly(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

const SW_SMALL: f64 = 1e-19;
const SW_G: [f64; 2] = [-2.273, 0.459];
const SW_C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.07119, 4.434685, -2.706056];
const SW_C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];
const SW_C3: [f64; 4] = [0.544, -0.39978, 0.025054, -6.714e-4];
const SW_C4: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
const SW_C5: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const SW_C6: [f64; 3] = [-0.4803, -0.082676, 0.0030302];

/// Shapiro-Wilk W test
///
/// Royston (1995) AS R94: approximate coefficients from normal order
/// statistics, W as the squared correlation between the sorted data and the
/// coefficients, and a normalising transformation of W for the p-value.
/// Supports 3 to 5000 samples.
pub fn shapiro_wilk(samples: &[f64]) -> Result<TestOutcome, StatsError> {
    check_samples(samples)?;

    let n = samples.len();
    let (min_n, max_n) = SHAPIRO_SAMPLE_RANGE;
    if n < min_n {
        return Err(StatsError::NotEnoughSamples { got: n, min: min_n });
    }
    if n > max_n {
        return Err(StatsError::TooManySamples { got: n, max: max_n });
    }

    let x = sorted_copy(samples);
    let range = x[n - 1] - x[0];
    if range < SW_SMALL {
        return Err(StatsError::NoVariance);
    }

    let half = n / 2;
    let an = n as f64;
    let mut a = vec![0.0; half];

    if n == 3 {
        a[0] = 0.5f64.sqrt();
    } else {
        let an25 = an + 0.25;
        let m: Vec<f64> = (1..=half)
            .map(|i| normal_quantile((i as f64 - 0.375) / an25))
            .collect();
        let summ2 = 2.0 * m.iter().map(|v| v * v).sum::<f64>();
        let ssumm2 = summ2.sqrt();
        let rsn = 1.0 / an.sqrt();
        let a1 = poly(&SW_C1, rsn) - m[0] / ssumm2;

        let (first_scaled, fac) = if n > 5 {
            let a2 = -m[1] / ssumm2 + poly(&SW_C2, rsn);
            let fac = ((summ2 - 2.0 * m[0] * m[0] - 2.0 * m[1] * m[1])
                / (1.0 - 2.0 * a1 * a1 - 2.0 * a2 * a2))
                .sqrt();
            a[1] = a2;
            (2, fac)
        } else {
            let fac = ((summ2 - 2.0 * m[0] * m[0]) / (1.0 - 2.0 * a1 * a1)).sqrt();
            (1, fac)
        };
        a[0] = a1;
        for i in first_scaled..half {
            a[i] = -m[i] / fac;
        }
    }

    // Antisymmetric coefficient vector over the sorted sample
    let mut coef = vec![0.0; n];
    for (i, &ai) in a.iter().enumerate() {
        coef[i] = -ai;
        coef[n - 1 - i] = ai;
    }

    let xs: Vec<f64> = x.iter().map(|v| v / range).collect();
    let sa = coef.iter().sum::<f64>() / an;
    let sx = xs.iter().sum::<f64>() / an;
    let (mut ssa, mut ssx, mut sax) = (0.0, 0.0, 0.0);
    for (c, v) in coef.iter().zip(&xs) {
        let asa = c - sa;
        let xsx = v - sx;
        ssa += asa * asa;
        ssx += xsx * xsx;
        sax += asa * xsx;
    }
    let ssassx = (ssa * ssx).sqrt();
    let w1 = (ssassx - sax) * (ssassx + sax) / (ssa * ssx);
    let w = (1.0 - w1).min(1.0);

    let p_value = if n == 3 {
        // Exact distribution for n = 3
        let pi6 = 6.0 / std::f64::consts::PI;
        let stqr = std::f64::consts::PI / 3.0;
        (pi6 * (w.sqrt().asin() - stqr)).clamp(0.0, 1.0)
    } else if w1 <= 0.0 {
        1.0
    } else {
        let mut y = w1.ln();
        let (m, s) = if n <= 11 {
            let gamma = poly(&SW_G, an);
            if y >= gamma {
                return Ok(TestOutcome::new(NormalityTest::ShapiroWilk, w, 1e-99));
            }
            y = -(gamma - y).ln();
            (poly(&SW_C3, an), poly(&SW_C4, an).exp())
        } else {
            let ln_n = an.ln();
            (poly(&SW_C5, ln_n), poly(&SW_C6, ln_n).exp())
        };
        normal_sf((y - m) / s)
    };

    Ok(TestOutcome::new(NormalityTest::ShapiroWilk, w, p_value))
}

/// D'Agostino-Pearson omnibus test
///
/// K² = Zs² + Zk², where Zs is D'Agostino's skewness test and Zk the
/// Anscombe-Glynn kurtosis test; K² is chi-squared with 2 degrees of freedom.
/// Needs at least [`OMNIBUS_MIN_SAMPLES`] samples.
pub fn dagostino_pearson(samples: &[f64]) -> Result<TestOutcome, StatsError> {
    check_samples(samples)?;

    let count = samples.len();
    if count < OMNIBUS_MIN_SAMPLES {
        return Err(StatsError::NotEnoughSamples {
            got: count,
            min: OMNIBUS_MIN_SAMPLES,
        });
    }

    let n = count as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let (m2, m3, m4) = central_moments(samples, mean);
    if m2 <= 0.0 {
        return Err(StatsError::NoVariance);
    }

    // Skewness test
    let b1 = m3 / m2.powf(1.5);
    let mut y = b1 * (((n + 1.0) * (n + 3.0)) / (6.0 * (n - 2.0))).sqrt();
    let beta2 = 3.0 * (n * n + 27.0 * n - 70.0) * (n + 1.0) * (n + 3.0)
        / ((n - 2.0) * (n + 5.0) * (n + 7.0) * (n + 9.0));
    let w2 = -1.0 + (2.0 * (beta2 - 1.0)).sqrt();
    let delta = 1.0 / (0.5 * w2.ln()).sqrt();
    let alpha = (2.0 / (w2 - 1.0)).sqrt();
    if y == 0.0 {
        y = 1.0;
    }
    let z_skew = delta * (y / alpha + ((y / alpha).powi(2) + 1.0).sqrt()).ln();

    // Kurtosis test
    let b2 = m4 / (m2 * m2);
    let expected = 3.0 * (n - 1.0) / (n + 1.0);
    let var_b2 = 24.0 * n * (n - 2.0) * (n - 3.0)
        / ((n + 1.0) * (n + 1.0) * (n + 3.0) * (n + 5.0));
    let x = (b2 - expected) / var_b2.sqrt();
    let sqrt_beta1 = 6.0 * (n * n - 5.0 * n + 2.0) / ((n + 7.0) * (n + 9.0))
        * ((6.0 * (n + 3.0) * (n + 5.0)) / (n * (n - 2.0) * (n - 3.0))).sqrt();
    let a = 6.0
        + 8.0 / sqrt_beta1 * (2.0 / sqrt_beta1 + (1.0 + 4.0 / (sqrt_beta1 * sqrt_beta1)).sqrt());
    let term1 = 1.0 - 2.0 / (9.0 * a);
    let denom = 1.0 + x * (2.0 / (a - 4.0)).sqrt();
    let term2 = denom.signum() * ((1.0 - 2.0 / a) / denom.abs()).cbrt();
    let z_kurt = (term1 - term2) / (2.0 / (9.0 * a)).sqrt();

    let k2 = z_skew * z_skew + z_kurt * z_kurt;
    Ok(TestOutcome::new(
        NormalityTest::DagostinoPearson,
        k2,
        chi2_sf(k2, 2),
    ))
}

/// Two-sided one-sample Kolmogorov-Smirnov test against N(`mean`, `std_dev`)
///
/// The p-value comes from the exact Kolmogorov distribution of D for the
/// sample size.
pub fn kolmogorov_smirnov_normal(
    samples: &[f64],
    mean: f64,
    std_dev: f64,
) -> Result<TestOutcome, StatsError> {
    check_samples(samples)?;
    if std_dev.is_nan() || std_dev <= 0.0 {
        return Err(StatsError::NoVariance);
    }

    let sorted = sorted_copy(samples);
    let n = sorted.len() as f64;

    let mut d_plus = f64::NEG_INFINITY;
    let mut d_minus = f64::NEG_INFINITY;
    for (i, &x) in sorted.iter().enumerate() {
        let cdf = normal_cdf(x, mean, std_dev);
        d_plus = d_plus.max((i + 1) as f64 / n - cdf);
        d_minus = d_minus.max(cdf - i as f64 / n);
    }
    let d = d_plus.max(d_minus);

    let p_value = (1.0 - kolmogorov_cdf(sorted.len(), d)).clamp(0.0, 1.0);
    Ok(TestOutcome::new(NormalityTest::KolmogorovSmirnov, d, p_value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normal_like(n: usize, mean: f64, sd: f64) -> Vec<f64> {
        (1..=n)
            .map(|i| mean + sd * normal_quantile((i as f64 - 0.5) / n as f64))
            .collect()
    }

    fn lognormal_like(n: usize) -> Vec<f64> {
        (1..=n)
            .map(|i| 100.0 * (0.8 * normal_quantile((i as f64 - 0.5) / n as f64)).exp())
            .collect()
    }

    const TEXTBOOK: [f64; 8] = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];

    #[test]
    fn test_interpretation_threshold() {
        assert_eq!(interpret_p_value(0.05), NormalityVerdict::Rejects);
        assert_eq!(interpret_p_value(0.0500001), NormalityVerdict::FailsToReject);
        assert_eq!(interpret_p_value(0.001), NormalityVerdict::Rejects);
        assert_eq!(interpret_p_value(f64::NAN), NormalityVerdict::Rejects);
    }

    #[test]
    fn test_shapiro_wilk_three_samples() {
        let outcome = shapiro_wilk(&[1.0, 2.0, 4.0]).unwrap();
        assert!((outcome.statistic - 0.964_285_7).abs() < 1e-6);
        assert!((outcome.p_value - 0.636_887).abs() < 1e-4);

        // Equally spaced points are a perfect fit
        let outcome = shapiro_wilk(&[1.0, 2.0, 3.0]).unwrap();
        assert!((outcome.statistic - 1.0).abs() < 1e-9);
        assert!((outcome.p_value - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_shapiro_wilk_small_sample() {
        let outcome = shapiro_wilk(&TEXTBOOK).unwrap();
        assert!((outcome.statistic - 0.916_634).abs() < 1e-4);
        assert!((outcome.p_value - 0.403_15).abs() < 1e-3);
        assert_eq!(outcome.verdict, NormalityVerdict::FailsToReject);
    }

    #[test]
    fn test_shapiro_wilk_separates_shapes() {
        let normal = shapiro_wilk(&normal_like(120, 1_000.0, 100.0)).unwrap();
        assert!(normal.statistic > 0.999);
        assert!(normal.p_value > 0.99);

        let skewed = shapiro_wilk(&lognormal_like(48)).unwrap();
        assert!((skewed.statistic - 0.7896).abs() < 1e-3);
        assert!(skewed.p_value < 1e-5);
        assert_eq!(skewed.verdict, NormalityVerdict::Rejects);
    }

    #[test]
    fn test_shapiro_wilk_errors() {
        assert_eq!(
            shapiro_wilk(&[1.0, 2.0]),
            Err(StatsError::NotEnoughSamples { got: 2, min: 3 })
        );
        assert_eq!(shapiro_wilk(&[3.0; 10]), Err(StatsError::NoVariance));
        let huge: Vec<f64> = (0..5001).map(|i| i as f64).collect();
        assert!(matches!(
            shapiro_wilk(&huge),
            Err(StatsError::TooManySamples { .. })
        ));
    }

    #[test]
    fn test_dagostino_pearson() {
        let outcome = dagostino_pearson(&TEXTBOOK).unwrap();
        assert!((outcome.statistic - 1.801_72).abs() < 1e-4);
        assert!((outcome.p_value - 0.406_22).abs() < 1e-4);

        let normal = dagostino_pearson(&normal_like(120, 1_000.0, 100.0)).unwrap();
        assert!(normal.p_value > 0.99);

        let skewed = dagostino_pearson(&lognormal_like(48)).unwrap();
        assert!((skewed.statistic - 36.455).abs() < 0.01);
        assert!(skewed.p_value < 1e-6);
    }

    #[test]
    fn test_dagostino_pearson_needs_eight_samples() {
        assert_eq!(
            dagostino_pearson(&TEXTBOOK[..7]),
            Err(StatsError::NotEnoughSamples { got: 7, min: 8 })
        );
        assert_eq!(dagostino_pearson(&[1.0; 12]), Err(StatsError::NoVariance));
    }

    #[test]
    fn test_kolmogorov_smirnov() {
        let outcome = kolmogorov_smirnov_normal(&TEXTBOOK, 5.0, 2.0).unwrap();
        assert!((outcome.statistic - 0.25).abs() < 1e-6);
        assert!((outcome.p_value - 0.6134).abs() < 1e-3);

        assert_eq!(
            kolmogorov_smirnov_normal(&TEXTBOOK, 5.0, 0.0),
            Err(StatsError::NoVariance)
        );
    }

    #[test]
    fn test_kolmogorov_smirnov_self_parameterised_is_conservative() {
        // Shapiro-Wilk and K² reject this skewed series; the self-fitted KS does not
        let battery = run_normality_battery(&lognormal_like(48)).unwrap();
        assert!((battery.kolmogorov_smirnov.statistic - 0.1598).abs() < 1e-3);
        assert!((battery.kolmogorov_smirnov.p_value - 0.154).abs() < 0.005);
        assert_eq!(
            battery.kolmogorov_smirnov.verdict,
            NormalityVerdict::FailsToReject
        );
        assert_eq!(battery.shapiro_wilk.verdict, NormalityVerdict::Rejects);
        assert!(!battery.all_fail_to_reject());
    }

    #[test]
    fn test_battery_on_normal_data() {
        let battery = run_normality_battery(&normal_like(60, 300_000.0, 15_000.0)).unwrap();
        assert!(battery.all_fail_to_reject());
        let names: Vec<String> = battery.outcomes().iter().map(|o| o.test.to_string()).collect();
        assert_eq!(
            names,
            vec!["Shapiro-Wilk", "D'Agostino-Pearson", "Kolmogorov-Smirnov"]
        );
    }
}
