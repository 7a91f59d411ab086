use crate::config::FilterConfig;

/// alpha = 1 / (1 + tau/Te), tau = 1/(2*pi*fc)
fn smoothing_factor(te: f64, cutoff: f64) -> f64 {
    let r = 2.0 * std::f64::consts::PI * cutoff * te;
    r / (r + 1.0)
}

/// Parameters shared by every channel of a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParams {
    pub min_cutoff: f64,
    pub beta: f64,
    pub derivative_cutoff: f64,
}

impl FilterParams {
    pub fn new(min_cutoff: f64, beta: f64, derivative_cutoff: f64) -> Self {
        Self {
            min_cutoff,
            beta,
            derivative_cutoff,
        }
    }

    pub fn from_config(config: &FilterConfig) -> Self {
        Self::new(config.min_cutoff, config.beta, config.derivative_cutoff)
    }
}

impl Default for FilterParams {
    fn default() -> Self {
        Self::from_config(&FilterConfig::default())
    }
}

/// Persistent state of one scalar channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelState {
    /// Last filtered value
    pub value: f64,
    /// Last smoothed derivative
    pub derivative: f64,
    /// Seconds
    pub timestamp: f64,
}

impl ChannelState {
    /// State after the first sample, which passes through unfiltered
    pub fn new(value: f64, timestamp: f64) -> Self {
        Self {
            value,
            derivative: 0.0,
            timestamp,
        }
    }

    /// Filter one sample taken at `timestamp`.
    ///
    /// A sample that is not later than the previous one leaves the state
    /// unchanged and returns the last filtered value.
    pub fn step(&mut self, params: &FilterParams, timestamp: f64, value: f64) -> f64 {
        let te = timestamp - self.timestamp;
        if te <= 0.0 {
            return self.value;
        }

        // Velocity is low-passed too, otherwise jitter drives the cutoff
        let a_d = smoothing_factor(te, params.derivative_cutoff);
        let dx = (value - self.value) / te;
        let edx = a_d * dx + (1.0 - a_d) * self.derivative;

        let cutoff = params.min_cutoff + params.beta * edx.abs();
        let a = smoothing_factor(te, cutoff);
        // a * x + (1 - a) * prev, exact when the sample repeats
        let filtered = self.value + a * (value - self.value);

        self.value = filtered;
        self.derivative = edx;
        self.timestamp = timestamp;
        filtered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 1.0 / 30.0;

    fn params(beta: f64) -> FilterParams {
        FilterParams::new(1.0, beta, 1.0)
    }

    /// Filter `samples` taken every DT, first one at t = 0
    fn run(params: &FilterParams, samples: impl IntoIterator<Item = f64>) -> Vec<f64> {
        let mut state: Option<ChannelState> = None;
        samples
            .into_iter()
            .enumerate()
            .map(|(i, x)| {
                let t = i as f64 * DT;
                match state.as_mut() {
                    Some(s) => s.step(params, t, x),
                    None => {
                        state = Some(ChannelState::new(x, t));
                        x
                    }
                }
            })
            .collect()
    }

    #[test]
    fn test_smoothing_factor_bounds() {
        // alpha should be between 0 and 1
        for &cutoff in &[0.1, 1.0, 10.0, 100.0] {
            for &te in &[0.001, 0.01, 0.033, 0.1, 8.0 / 30.0] {
                let alpha = smoothing_factor(te, cutoff);
                assert!(alpha > 0.0 && alpha < 1.0, "alpha={} for te={}, cutoff={}", alpha, te, cutoff);
            }
        }
    }

    #[test]
    fn test_smoothing_factor_formula() {
        let (te, cutoff) = (DT, 1.0);
        let expected = 1.0 / (1.0 + 1.0 / (2.0 * std::f64::consts::PI * cutoff * te));
        assert!((smoothing_factor(te, cutoff) - expected).abs() < 1e-15);
    }

    #[test]
    fn test_first_sample_passthrough() {
        for &value in &[5.0, -3.25, 0.0, 1e6] {
            let state = ChannelState::new(value, 12.0 * DT);
            assert_eq!(state.value, value);
            assert_eq!(state.derivative, 0.0);
            assert_eq!(state.timestamp, 12.0 * DT);
            assert_eq!(run(&params(0.7), [value])[0], value);
        }
    }

    #[test]
    fn test_filter_smooths() {
        let out = run(&params(0.0), [0.0, 10.0]);
        assert!(out[1] < 10.0, "Expected smoothing, got {}", out[1]);
        assert!(out[1] > 0.0, "Expected positive value, got {}", out[1]);
    }

    #[test]
    fn test_from_config_maps_fields() {
        let config = FilterConfig {
            frame_rate: 60.0,
            min_cutoff: 0.5,
            beta: 0.3,
            derivative_cutoff: 2.0,
        };
        let p = FilterParams::from_config(&config);
        assert_eq!(p.min_cutoff, 0.5);
        assert_eq!(p.beta, 0.3);
        assert_eq!(p.derivative_cutoff, 2.0);
    }

    #[test]
    fn test_step_matches_hand_computation() {
        let p = FilterParams::new(1.0, 0.5, 1.0);
        let mut state = ChannelState::new(0.0, 0.0);
        let out = state.step(&p, DT, 1.0);

        let a_d = smoothing_factor(DT, 1.0);
        let edx = a_d * (1.0 / DT);
        let a = smoothing_factor(DT, 1.0 + 0.5 * edx);
        let expected = a * 1.0;
        assert!((out - expected).abs() < 1e-12);
        assert!((state.derivative - edx).abs() < 1e-12);
        assert_eq!(state.timestamp, DT);
    }

    #[test]
    fn test_cutoffs_used_separately() {
        let p = FilterParams::new(0.5, 0.3, 2.0);
        let mut state = ChannelState::new(1.0, 0.0);
        state.derivative = 4.0;
        let out = state.step(&p, DT, 2.0);

        // Velocity uses the derivative cutoff, position the adaptive one
        let a_d = smoothing_factor(DT, 2.0);
        let edx = a_d * (1.0 / DT) + (1.0 - a_d) * 4.0;
        let a = smoothing_factor(DT, 0.5 + 0.3 * edx);
        assert!((state.derivative - edx).abs() < 1e-12);
        assert!((out - (1.0 + a)).abs() < 1e-12);

        let mut swapped = ChannelState::new(1.0, 0.0);
        swapped.derivative = 4.0;
        swapped.step(&FilterParams::new(2.0, 0.3, 0.5), DT, 2.0);
        assert!((swapped.derivative - state.derivative).abs() > 1e-3);
    }

    #[test]
    fn test_converges_on_constant_input() {
        for &beta in &[0.0, 0.01, 0.5, 5.0] {
            let samples = std::iter::once(0.0).chain(std::iter::repeat(1.0).take(200));
            let out = run(&params(beta), samples);
            let last = out[out.len() - 1];
            assert!((last - 1.0).abs() < 1e-6, "beta={} ended at {}", beta, last);
        }
    }

    #[test]
    fn test_constant_from_first_sample_never_moves() {
        for value in run(&params(1.0), std::iter::repeat(2.5).take(50)) {
            assert_eq!(value, 2.5);
        }
    }

    #[test]
    fn test_higher_beta_lags_less_on_ramp() {
        let ramp: Vec<f64> = (0..60).map(|i| 0.1 * i as f64).collect();
        for &(low, high) in &[(0.0, 0.5), (0.05, 1.0)] {
            let r_low = run(&params(low), ramp.iter().copied());
            let r_high = run(&params(high), ramp.iter().copied());
            for i in 1..ramp.len() {
                let (lag_low, lag_high) = (ramp[i] - r_low[i], ramp[i] - r_high[i]);
                assert!(
                    lag_high < lag_low,
                    "step {}: beta {} lag {} not below beta {} lag {}",
                    i, high, lag_high, low, lag_low
                );
            }
        }
    }

    #[test]
    fn test_gap_uses_elapsed_time() {
        // Same two samples, one channel sees a gap of 8 frames
        let p = params(0.0);
        let mut contiguous = ChannelState::new(0.0, 2.0 * DT);
        let mut gapped = ChannelState::new(0.0, 2.0 * DT);
        let near = contiguous.step(&p, 3.0 * DT, 1.0);
        let far = gapped.step(&p, 10.0 * DT, 1.0);

        let expected_far = smoothing_factor(8.0 * DT, 1.0);
        assert!((far - expected_far).abs() < 1e-12);
        // A longer interval lets the output move further toward the sample
        assert!(far > near);
        assert_eq!(gapped.timestamp, 10.0 * DT);
    }

    #[test]
    fn test_non_increasing_timestamp_holds_value() {
        let p = params(0.3);
        let mut state = ChannelState::new(0.0, 0.0);
        let first = state.step(&p, DT, 4.0);
        let before = state;
        assert_eq!(state.step(&p, DT, 100.0), first);
        assert_eq!(state.step(&p, 0.5 * DT, -100.0), first);
        assert_eq!(state, before);
    }
}
