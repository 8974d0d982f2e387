//! Binomial statistics helpers
//!
//! A grain's bin is the number of rightward deflections over `n` rows, so
//! bin occupancy follows Binomial(n, 1/2). The peak probability sizes the
//! accumulator stacks.

/// Probability of the most likely bin after `num_rows` rows:
/// `C(n, floor(n/2)) / 2^n`, computed in log space to stay finite for
/// large boards. Returns 1.0 for zero rows (the single-bin board).
pub fn max_bin_probability(num_rows: u32) -> f64 {
    let n = num_rows as u64;
    let k = n / 2;
    let mut log_c = 0.0_f64;
    for i in 1..=n {
        log_c += (i as f64).ln();
    }
    for i in 1..=k {
        log_c -= (i as f64).ln();
    }
    for i in 1..=(n - k) {
        log_c -= (i as f64).ln();
    }
    (log_c - n as f64 * std::f64::consts::LN_2).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Direct C(n, n/2) / 2^n for small n
    fn central_ratio(n: u64) -> f64 {
        let k = n / 2;
        let mut c = 1.0_f64;
        for i in 0..k {
            c = c * (n - i) as f64 / (i + 1) as f64;
        }
        c / 2.0_f64.powi(n as i32)
    }

    #[test]
    fn test_zero_rows_is_certain() {
        assert_eq!(max_bin_probability(0), 1.0);
    }

    #[test]
    fn test_small_boards() {
        // n=1: C(1,0)/2 = 0.5; n=2: C(2,1)/4 = 0.5; n=4: C(4,2)/16 = 0.375
        assert!((max_bin_probability(1) - 0.5).abs() < 1e-12);
        assert!((max_bin_probability(2) - 0.5).abs() < 1e-12);
        assert!((max_bin_probability(4) - 0.375).abs() < 1e-12);
    }

    #[test]
    fn test_matches_central_binomial_for_even_rows() {
        for n in [6_u32, 12, 24, 48, 64] {
            let expect = central_ratio(n as u64);
            let got = max_bin_probability(n);
            assert!(
                (got - expect).abs() < 1e-9 * expect.max(1e-300),
                "n={n}: {got} vs {expect}"
            );
        }
    }

    #[test]
    fn test_decreases_with_rows() {
        let mut prev = max_bin_probability(0);
        for n in 1..=64 {
            let p = max_bin_probability(n);
            assert!(p <= prev + 1e-12);
            assert!(p > 0.0);
            prev = p;
        }
    }
}
