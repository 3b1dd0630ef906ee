//! Distribution Functions
//!
//! Normal, chi-squared and Kolmogorov distribution functions needed by the
//! normality tests and chart overlays.

use std::f64::consts::{PI, SQRT_2};

/// Normal probability density with the given location and scale
pub fn normal_pdf(x: f64, mean: f64, std_dev: f64) -> f64 {
    let z = (x - mean) / std_dev;
    (-0.5 * z * z).exp() / (std_dev * (2.0 * PI).sqrt())
}

/// Normal CDF with the given location and scale
pub fn normal_cdf(x: f64, mean: f64, std_dev: f64) -> f64 {
    let z = (x - mean) / std_dev;
    0.5 * erfc(-z / SQRT_2)
}

/// Standard normal upper tail probability, P(Z > z)
pub fn normal_sf(z: f64) -> f64 {
    0.5 * erfc(z / SQRT_2)
}

/// Standard normal quantile (inverse CDF)
///
/// Wichura's algorithm AS 241 (PPND16), accurate to about 1e-16.
pub fn normal_quantile(p: f64) -> f64 {
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }

    let q = p - 0.5;
    if q.abs() <= 0.425 {
        let r = 0.180625 - q * q;
        return q
            * (((((((2509.0809287301226727 * r + 33430.575583588128105) * r
                + 67265.770927008700853)
                * r
                + 45921.953931549871457)
                * r
                + 13731.693765509461125)
                * r
                + 1971.5909503065514427)
                * r
                + 133.14166789178437745)
                * r
                + 3.387132872796366608)
            / (((((((5226.495278852545925 * r + 28729.085735721942674) * r
                + 39307.89580009271061)
                * r
                + 21213.794301586595867)
                * r
                + 5394.1960214247511077)
                * r
                + 687.1870074920579083)
                * r
                + 42.313330701600911252)
                * r
                + 1.0);
    }

    let r = if q < 0.0 { p } else { 1.0 - p };
    let r = (-r.ln()).sqrt();

    let value = if r <= 5.0 {
        let r = r - 1.6;
        (((((((7.7454501427834140764e-4 * r + 0.0227238449892691845833) * r
            + 0.24178072517745061177)
            * r
            + 1.27045825245236838258)
            * r
            + 3.64784832476320460504)
            * r
            + 5.7694972214606914055)
            * r
            + 4.6303378461565452959)
            * r
            + 1.42343711074968357734)
            / (((((((1.05075007164441684324e-9 * r + 5.475938084995344946e-4) * r
                + 0.0151986665636164571966)
                * r
                + 0.14810397642748007459)
                * r
                + 0.68976733498510000455)
                * r
                + 1.6763848301838038494)
                * r
                + 2.05319162663775882187)
                * r
                + 1.0)
    } else {
        let r = r - 5.0;
        (((((((2.01033439929228813265e-7 * r + 2.71155556874348757815e-5) * r
            + 0.0012426609473880784386)
            * r
            + 0.026532189526576123093)
            * r
            + 0.29656057182850489123)
            * r
            + 1.7848265399172913358)
            * r
            + 5.4637849111641143699)
            * r
            + 6.6579046435011037772)
            / (((((((2.04426310338993978564e-15 * r + 1.4215117583164458887e-7) * r
                + 1.8463183175100546818e-5)
                * r
                + 7.868691311456132591e-4)
                * r
                + 0.0148753612908506148525)
                * r
                + 0.13692988092273580531)
                * r
                + 0.59983220655588793769)
                * r
                + 1.0)
    };

    if q < 0.0 { -value } else { value }
}

/// Chi-squared survival function, P(X > x), for integer degrees of freedom
pub fn chi2_sf(x: f64, df: u32) -> f64 {
    if x <= 0.0 {
        return 1.0;
    }
    if df == 0 {
        return 0.0;
    }

    // Closed forms: even df is a finite Poisson sum, odd df adds the normal tail
    let half = x / 2.0;
    if df % 2 == 0 {
        let mut term = 1.0;
        let mut sum = 1.0;
        for k in 1..df / 2 {
            term *= half / k as f64;
            sum += term;
        }
        (-half).exp() * sum
    } else {
        let root = x.sqrt();
        let mut sf = 2.0 * normal_sf(root);
        let mut term = root * (-half).exp() * (2.0 / PI).sqrt();
        let mut k = 1.0;
        for _ in 0..(df - 1) / 2 {
            sf += term;
            k += 2.0;
            term *= x / k;
        }
        sf
    }
}

/// Kolmogorov distribution: P(D_n < d) for the two-sided one-sample statistic
///
/// Marsaglia, Tsang & Wang (2003) matrix-power evaluation, exact up to
/// floating point for the sample sizes a monthly series has. Far in the
/// upper tail the published asymptotic shortcut is used.
pub fn kolmogorov_cdf(n: usize, d: f64) -> f64 {
    if n == 0 || d <= 0.0 {
        return 0.0;
    }
    if d >= 1.0 {
        return 1.0;
    }

    let nf = n as f64;
    let s = d * d * nf;
    if s > 7.24 || (s > 3.76 && n > 99) {
        return 1.0 - 2.0 * (-(2.000071 + 0.331 / nf.sqrt() + 1.409 / nf) * s).exp();
    }

    let k = (nf * d) as usize + 1;
    let m = 2 * k - 1;
    let h = k as f64 - nf * d;

    let mut hm = vec![0.0; m * m];
    for i in 0..m {
        for j in 0..m {
            if i + 1 >= j {
                hm[i * m + j] = 1.0;
            }
        }
    }
    for i in 0..m {
        hm[i * m] -= h.powi(i as i32 + 1);
        hm[(m - 1) * m + i] -= h.powi((m - i) as i32);
    }
    if 2.0 * h - 1.0 > 0.0 {
        hm[(m - 1) * m] += (2.0 * h - 1.0).powi(m as i32);
    }
    for i in 0..m {
        for j in 0..m {
            if i + 1 > j {
                for g in 1..=(i + 1 - j) {
                    hm[i * m + j] /= g as f64;
                }
            }
        }
    }

    let (q, mut exponent) = matrix_power(&hm, 0, m, n);
    let mut value = q[(k - 1) * m + k - 1];
    for i in 1..=n {
        value = value * i as f64 / nf;
        if value < 1e-140 {
            value *= 1e140;
            exponent -= 140;
        }
    }

    (value * 10f64.powi(exponent)).clamp(0.0, 1.0)
}

fn matrix_multiply(a: &[f64], b: &[f64], m: usize) -> Vec<f64> {
    let mut out = vec![0.0; m * m];
    for i in 0..m {
        for j in 0..m {
            let mut sum = 0.0;
            for l in 0..m {
                sum += a[i * m + l] * b[l * m + j];
            }
            out[i * m + j] = sum;
        }
    }
    out
}

/// Raise `a` (scaled by 10^`exponent`) to `n`, tracking the decimal exponent
fn matrix_power(a: &[f64], exponent: i32, m: usize, n: usize) -> (Vec<f64>, i32) {
    if n == 1 {
        return (a.to_vec(), exponent);
    }

    let (half, half_exp) = matrix_power(a, exponent, m, n / 2);
    let squared = matrix_multiply(&half, &half, m);
    let squared_exp = 2 * half_exp;

    let (mut v, mut v_exp) = if n % 2 == 0 {
        (squared, squared_exp)
    } else {
        (matrix_multiply(a, &squared, m), exponent + squared_exp)
    };

    if v[(m / 2) * m + (m / 2)] > 1e140 {
        for x in v.iter_mut() {
            *x *= 1e-140;
        }
        v_exp += 140;
    }

    (v, v_exp)
}

/// Complementary error function
///
/// Chebyshev fit with fractional error below 1.2e-7 everywhere, so upper-tail
/// probabilities keep their relative accuracy.
fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.5 * z);
    let ans = t
        * (-z * z - 1.26551223
            + t * (1.00002368
                + t * (0.37409196
                    + t * (0.09678418
                        + t * (-0.18628806
                            + t * (0.27886807
                                + t * (-1.13520398
                                    + t * (1.48851587 + t * (-0.82215223 + t * 0.17087277)))))))))
            .exp();

    if x >= 0.0 { ans } else { 2.0 - ans }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_quantile() {
        assert!(normal_quantile(0.5).abs() < 1e-12);
        assert!((normal_quantile(0.975) - 1.959963984540054).abs() < 1e-9);
        assert!((normal_quantile(0.025) + 1.959963984540054).abs() < 1e-9);
        assert!((normal_quantile(1e-10) + 6.361340902404056).abs() < 1e-6);
        assert_eq!(normal_quantile(0.0), f64::NEG_INFINITY);
    }

    #[test]
    fn test_normal_cdf() {
        assert!((normal_cdf(0.0, 0.0, 1.0) - 0.5).abs() < 1e-7);
        assert!((normal_cdf(1.96, 0.0, 1.0) - 0.975).abs() < 1e-4);
        assert!((normal_cdf(80.4, 100.0, 10.0) - 0.025).abs() < 1e-4);
        assert!((normal_sf(1.96) - 0.025).abs() < 1e-4);
    }

    #[test]
    fn test_normal_pdf() {
        let peak = normal_pdf(0.0, 0.0, 1.0);
        assert!((peak - 0.3989422804).abs() < 1e-9);
        assert!((normal_pdf(110.0, 100.0, 10.0) - 0.0241970725).abs() < 1e-9);
    }

    #[test]
    fn test_chi2_sf() {
        // df = 2 is a pure exponential
        assert!((chi2_sf(5.991464547, 2) - 0.05).abs() < 1e-8);
        assert!((chi2_sf(3.841458821, 1) - 0.05).abs() < 1e-6);
        assert!((chi2_sf(7.814727903, 3) - 0.05).abs() < 1e-6);
        assert_eq!(chi2_sf(0.0, 2), 1.0);
    }

    #[test]
    fn test_kolmogorov_cdf() {
        // Critical value for n = 10 at alpha = 0.05 is 0.409
        let p = 1.0 - kolmogorov_cdf(10, 0.409);
        assert!((p - 0.05).abs() < 0.003);

        // Monotone in d
        assert!(kolmogorov_cdf(20, 0.1) < kolmogorov_cdf(20, 0.2));
        assert_eq!(kolmogorov_cdf(20, 0.0), 0.0);
        assert_eq!(kolmogorov_cdf(20, 1.0), 1.0);
    }
}
