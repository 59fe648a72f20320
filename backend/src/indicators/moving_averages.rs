use crate::models::PriceSeries;

/// Simple Moving Average (SMA)
/// Calculates the arithmetic mean of the last N closes
pub struct SMA {
    period: usize,
}

impl SMA {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// Calculate SMA for a value series
    /// Returns a vector of the same length as input
    /// First (period - 1) entries are None (warmup period)
    pub fn calculate(&self, values: &[f64]) -> Vec<Option<f64>> {
        let mut result = vec![None; values.len()];

        if self.period == 0 || values.len() < self.period {
            return result;
        }

        for i in (self.period - 1)..values.len() {
            let window_start = i + 1 - self.period;
            let window = &values[window_start..=i];
            let sum: f64 = window.iter().sum();
            result[i] = Some(sum / self.period as f64);
        }

        result
    }
}

/// Moving average of the closes, aligned 1:1 with the series
pub fn compute_moving_average(series: &PriceSeries, period: usize) -> Vec<Option<f64>> {
    SMA::new(period).calculate(&series.closes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PriceBar;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn series_from(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                date: start + chrono::Duration::days(i as i64),
                close,
                volume: 1000,
            })
            .collect();
        PriceSeries::new(bars).unwrap()
    }

    #[test]
    fn test_sma_basic() {
        let prices = vec![100.0, 102.0, 101.0, 103.0, 105.0, 104.0, 106.0];
        let result = SMA::new(3).calculate(&prices);

        assert_eq!(result[0], None);
        assert_eq!(result[1], None);

        // (100 + 102 + 101) / 3
        assert!((result[2].unwrap() - 101.0).abs() < 0.001);
        // (102 + 101 + 103) / 3
        assert!((result[3].unwrap() - 102.0).abs() < 0.001);
        // (101 + 103 + 105) / 3
        assert!((result[4].unwrap() - 103.0).abs() < 0.001);
    }

    #[test]
    fn test_sma_insufficient_data() {
        let result = SMA::new(3).calculate(&[100.0, 102.0]);
        assert_eq!(result, vec![None, None]);
    }

    #[test]
    fn test_sma_period_one_is_identity() {
        let prices = vec![3.0, 1.5, 7.25];
        let result = SMA::new(1).calculate(&prices);
        assert_eq!(result, vec![Some(3.0), Some(1.5), Some(7.25)]);
    }

    #[test]
    fn test_sma_zero_period_has_no_values() {
        let result = SMA::new(0).calculate(&[1.0, 2.0]);
        assert_eq!(result, vec![None, None]);
    }

    #[test]
    fn test_sma_period_20() {
        let prices: Vec<f64> = (0..25).map(|i| 100.0 + i as f64).collect();
        let result = SMA::new(20).calculate(&prices);

        for value in &result[..19] {
            assert!(value.is_none());
        }

        // (100 + 101 + ... + 119) / 20
        assert!((result[19].unwrap() - 109.5).abs() < 0.001);
        // (101 + 102 + ... + 120) / 20
        assert!((result[20].unwrap() - 110.5).abs() < 0.001);
    }

    #[test]
    fn test_compute_moving_average_period_longer_than_series() {
        let series = series_from(&[1.0, 2.0, 3.0]);
        assert_eq!(compute_moving_average(&series, 5), vec![None; 3]);
    }

    #[test]
    fn test_compute_moving_average_empty_series() {
        let series = series_from(&[]);
        assert!(compute_moving_average(&series, 3).is_empty());
    }

    fn naive_mean(values: &[f64], end: usize, period: usize) -> f64 {
        let mut sum = 0.0;
        for j in (end + 1 - period)..=end {
            sum += values[j];
        }
        sum / period as f64
    }

    proptest! {
        #[test]
        fn prop_sma_matches_naive_reference(
            closes in prop::collection::vec(1.0..1000.0_f64, 1..120),
            period in 1usize..40,
        ) {
            let series = series_from(&closes);
            let result = compute_moving_average(&series, period);
            prop_assert_eq!(result.len(), closes.len());

            if period <= closes.len() {
                let defined = result.iter().filter(|v| v.is_some()).count();
                prop_assert_eq!(defined, closes.len() - period + 1);
                prop_assert!(result[..period - 1].iter().all(|v| v.is_none()));

                for i in (period - 1)..closes.len() {
                    let expected = naive_mean(&closes, i, period);
                    let actual = result[i].unwrap();
                    prop_assert!((actual - expected).abs() <= 1e-9 * expected.abs().max(1.0));
                }
            } else {
                prop_assert!(result.iter().all(|v| v.is_none()));
            }
        }
    }
}
