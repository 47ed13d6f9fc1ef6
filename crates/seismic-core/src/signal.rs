// ─────────────────────────────────────────────────────────────────────
// SCPN Seismic Core — Source Signal
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Parametrized time-domain source signals.

use seismic_types::config::{SignalConfig, SignalKind};
use std::f64::consts::PI;

/// Usable bandwidth of a Ricker wavelet as a multiple of its peak
/// frequency 1/T.
const RICKER_BANDWIDTH_FACTOR: f64 = 2.5;

/// Usable bandwidth of the Gaussian-derivative pulse.
const GAUSS_DER_BANDWIDTH_FACTOR: f64 = 2.0;

/// A source waveform with a mutable period and fixed shape/delay.
///
/// Signals are cheap values: the sampling drivers clone the configured
/// signal once per sample and reset the period in place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Signal {
    kind: SignalKind,
    period: f64,
    delay: f64,
}

impl Signal {
    pub fn new(kind: SignalKind, period: f64, delay: f64) -> Self {
        assert!(period > 0.0, "signal period must be positive");
        Signal {
            kind,
            period,
            delay,
        }
    }

    pub fn from_config(cfg: &SignalConfig) -> Self {
        Signal::new(cfg.kind, cfg.period, cfg.delay)
    }

    pub fn kind(&self) -> SignalKind {
        self.kind
    }

    pub fn period(&self) -> f64 {
        self.period
    }

    /// Replace the period in place, keeping shape and delay.
    pub fn reset_period(&mut self, period: f64) {
        assert!(period > 0.0, "signal period must be positive");
        self.period = period;
    }

    /// Highest frequency with meaningful energy, used by the
    /// dispersion check.
    pub fn max_freq(&self) -> f64 {
        match self.kind {
            SignalKind::Ricker => RICKER_BANDWIDTH_FACTOR / self.period,
            SignalKind::GaussianDerivative => GAUSS_DER_BANDWIDTH_FACTOR / self.period,
        }
    }

    /// Waveform value at time t (seconds).
    pub fn evaluate(&self, t: f64) -> f64 {
        let tau = t - self.delay;
        match self.kind {
            SignalKind::Ricker => {
                let fp = 1.0 / self.period;
                let arg = PI * PI * fp * fp * tau * tau;
                (1.0 - 2.0 * arg) * (-arg).exp()
            }
            SignalKind::GaussianDerivative => {
                let sigma = self.period / (2.0 * PI);
                -(tau / (sigma * sigma)) * (-tau * tau / (2.0 * sigma * sigma)).exp()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ricker_peak_at_delay() {
        let s = Signal::new(SignalKind::Ricker, 40.0, 80.0);
        assert!((s.evaluate(80.0) - 1.0).abs() < 1e-12);
        assert!(s.evaluate(0.0).abs() < 1e-3, "far tail should be small");
    }

    #[test]
    fn test_gauss_der_is_odd_about_delay() {
        let s = Signal::new(SignalKind::GaussianDerivative, 40.0, 100.0);
        assert!(s.evaluate(100.0).abs() < 1e-15);
        assert!((s.evaluate(90.0) + s.evaluate(110.0)).abs() < 1e-12);
    }

    #[test]
    fn test_reset_period_updates_max_freq() {
        let mut s = Signal::new(SignalKind::Ricker, 10.0, 0.0);
        assert!((s.max_freq() - 0.25).abs() < 1e-15);
        s.reset_period(20.0);
        assert!((s.max_freq() - 0.125).abs() < 1e-15);
        assert_eq!(s.kind(), SignalKind::Ricker);
    }

    #[test]
    #[should_panic(expected = "period must be positive")]
    fn test_zero_period_rejected() {
        let _ = Signal::new(SignalKind::Ricker, 0.0, 0.0);
    }
}
