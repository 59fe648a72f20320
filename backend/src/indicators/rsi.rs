use super::moving_averages::SMA;
use crate::models::PriceSeries;

pub const DEFAULT_RSI_PERIOD: usize = 14;

/// Relative Strength Index (RSI)
/// Measures momentum by comparing magnitude of recent gains to recent losses
/// Returns values between 0-100:
/// - Below 30: Oversold (potentially undervalued)
/// - Above 70: Overbought (potentially overvalued)
pub struct RSI {
    period: usize,
}

impl RSI {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// Calculate RSI for a price series using simple rolling averages
    /// of gains and losses.
    /// Returns a vector of the same length as input
    /// First (period) entries are None (warmup period plus the differencing bar)
    pub fn calculate(&self, prices: &[f64]) -> Vec<Option<f64>> {
        let mut result = vec![None; prices.len()];

        if self.period == 0 || prices.len() < self.period + 1 {
            return result;
        }

        // gains[k] and losses[k] describe the move into prices[k + 1]
        let (gains, losses): (Vec<f64>, Vec<f64>) = prices
            .windows(2)
            .map(|w| {
                let change = w[1] - w[0];
                (change.max(0.0), (-change).max(0.0))
            })
            .unzip();

        let sma = SMA::new(self.period);
        let avg_gains = sma.calculate(&gains);
        let avg_losses = sma.calculate(&losses);

        for (k, (avg_gain, avg_loss)) in avg_gains.into_iter().zip(avg_losses).enumerate() {
            if let (Some(avg_gain), Some(avg_loss)) = (avg_gain, avg_loss) {
                result[k + 1] = Some(rsi_from_averages(avg_gain, avg_loss));
            }
        }

        result
    }
}

/// RSI from average gain and loss.
/// A zero average loss never reaches the division: it is 100 when there were
/// gains and 50 when the window was flat.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return if avg_gain > 0.0 { 100.0 } else { 50.0 };
    }

    let rs = avg_gain / avg_loss;
    (100.0 - (100.0 / (1.0 + rs))).clamp(0.0, 100.0)
}

/// RSI of the closes, aligned 1:1 with the series
pub fn compute_rsi(series: &PriceSeries, periods: usize) -> Vec<Option<f64>> {
    RSI::new(periods).calculate(&series.closes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rsi_basic() {
        let prices = vec![
            100.0, 102.0, 104.0, 103.0, 105.0, 107.0, 106.0, 108.0, 110.0, 109.0,
            111.0, 113.0, 112.0, 114.0, 116.0, 115.0, 117.0, 119.0, 118.0, 120.0,
        ];
        let result = RSI::new(14).calculate(&prices);

        for (i, value) in result.iter().take(14).enumerate() {
            assert!(value.is_none(), "Index {} should be None", i);
        }

        let first = result[14].expect("Index 14 should have a value");
        assert!((0.0..=100.0).contains(&first), "RSI should be between 0-100");
        assert!(first > 50.0, "RSI should be high with mostly gains");
    }

    #[test]
    fn test_rsi_matches_hand_computed_value() {
        // 10 up moves of 1.0 and 4 down moves of 0.5 in the first window
        let mut prices = vec![100.0];
        for i in 1..=14 {
            let change = if i % 7 == 0 || i % 5 == 0 { -0.5 } else { 1.0 };
            prices.push(prices[i - 1] + change);
        }
        let result = RSI::new(14).calculate(&prices);

        let avg_gain = 10.0 / 14.0;
        let avg_loss = 2.0 / 14.0;
        let expected = 100.0 - 100.0 / (1.0 + avg_gain / avg_loss);
        assert!((result[14].unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_rsi_uses_simple_window_not_wilder_smoothing() {
        // After a loss leaves the trailing window the RSI returns to 100
        let mut prices = vec![100.0, 99.0];
        for i in 1..=20 {
            prices.push(99.0 + i as f64);
        }
        let result = RSI::new(3).calculate(&prices);

        assert!(result[3].unwrap() < 100.0);
        assert_eq!(result[4], Some(100.0));
    }

    #[test]
    fn test_rsi_downtrend() {
        let prices = vec![
            120.0, 118.0, 116.0, 117.0, 115.0, 113.0, 114.0, 112.0, 110.0, 111.0,
            109.0, 107.0, 108.0, 106.0, 104.0, 105.0, 103.0, 101.0, 102.0, 100.0,
        ];
        let result = RSI::new(14).calculate(&prices);
        assert!(result[14].unwrap() < 50.0, "RSI should be low with mostly losses");
    }

    #[test]
    fn test_rsi_insufficient_data() {
        let result = RSI::new(14).calculate(&[100.0, 102.0, 104.0, 103.0, 105.0]);
        assert!(result.iter().all(|v| v.is_none()));
    }

    #[test]
    fn test_rsi_exactly_period_bars_has_no_value() {
        let prices: Vec<f64> = (0..14).map(|i| 100.0 + i as f64).collect();
        let result = RSI::new(14).calculate(&prices);
        assert_eq!(result.len(), 14);
        assert!(result.iter().all(|v| v.is_none()));
    }

    #[test]
    fn test_rsi_all_gains_is_exactly_100() {
        let prices: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let result = RSI::new(14).calculate(&prices);

        for value in &result[14..] {
            assert_eq!(*value, Some(100.0));
        }
    }

    #[test]
    fn test_rsi_all_losses_is_exactly_0() {
        let prices: Vec<f64> = (0..30).map(|i| 120.0 - i as f64).collect();
        let result = RSI::new(14).calculate(&prices);

        for value in &result[14..] {
            assert_eq!(*value, Some(0.0));
        }
    }

    #[test]
    fn test_rsi_no_change_is_neutral() {
        let result = RSI::new(14).calculate(&[100.0; 20]);

        for value in &result[..14] {
            assert!(value.is_none());
        }
        for value in &result[14..] {
            assert_eq!(*value, Some(50.0));
        }
    }

    #[test]
    fn test_rsi_from_averages_edges() {
        assert_eq!(rsi_from_averages(0.0, 0.0), 50.0);
        assert_eq!(rsi_from_averages(1.5, 0.0), 100.0);
        assert_eq!(rsi_from_averages(0.0, 2.0), 0.0);
        assert!((rsi_from_averages(1.0, 1.0) - 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_rsi_zero_period_has_no_values() {
        let result = RSI::new(0).calculate(&[1.0, 2.0, 3.0]);
        assert!(result.iter().all(|v| v.is_none()));
    }

    fn strictly_monotonic(start: f64, steps: Vec<f64>, up: bool) -> Vec<f64> {
        let mut prices = vec![start];
        for step in steps {
            let last = *prices.last().unwrap();
            prices.push(if up { last + step } else { last - step });
        }
        prices
    }

    proptest! {
        #[test]
        fn prop_rsi_bounded_and_finite(
            prices in prop::collection::vec(1.0..1000.0_f64, 0..150),
            period in 1usize..30,
        ) {
            let result = RSI::new(period).calculate(&prices);
            prop_assert_eq!(result.len(), prices.len());

            for (i, value) in result.iter().enumerate() {
                if i < period {
                    prop_assert!(value.is_none());
                } else {
                    let v = value.unwrap();
                    prop_assert!(v.is_finite());
                    prop_assert!((0.0..=100.0).contains(&v));
                }
            }
        }

        #[test]
        fn prop_rsi_flat_series_is_50(price in 1.0..1000.0_f64, len in 15usize..80) {
            let result = RSI::new(14).calculate(&vec![price; len]);
            prop_assert!(result[14..].iter().all(|v| *v == Some(50.0)));
        }

        #[test]
        fn prop_rsi_increasing_series_is_100(
            start in 500.0..1000.0_f64,
            steps in prop::collection::vec(0.01..5.0_f64, 14..60),
        ) {
            let prices = strictly_monotonic(start, steps, true);
            let result = RSI::new(14).calculate(&prices);
            prop_assert!(result[14..].iter().all(|v| *v == Some(100.0)));
        }

        #[test]
        fn prop_rsi_decreasing_series_is_0(
            start in 500.0..1000.0_f64,
            steps in prop::collection::vec(0.01..5.0_f64, 14..60),
        ) {
            let prices = strictly_monotonic(start, steps, false);
            let result = RSI::new(14).calculate(&prices);
            prop_assert!(result[14..].iter().all(|v| *v == Some(0.0)));
        }
    }
}
