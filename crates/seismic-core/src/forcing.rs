// ─────────────────────────────────────────────────────────────────────
// SCPN Seismic Core — Forcing
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Seismic source representations.
//!
//! The source location is fixed at construction and never changes
//! across samples; only the signal content is replaced, so the sampling
//! loop performs no allocation.

use crate::signal::Signal;
use seismic_types::config::SimConfig;
use seismic_types::error::{SeismicError, SeismicResult};
use seismic_types::state::MeshInfo;

/// Single source location, single signal.
#[derive(Debug, Clone)]
pub struct RankOneForcing {
    vp_gid: usize,
    signal: Signal,
}

impl RankOneForcing {
    pub fn new(config: &SimConfig, mesh: &MeshInfo) -> Self {
        let vp_gid = mesh.nearest_vp_gid(config.source_radius_m(), config.source_angle_rad());
        RankOneForcing {
            vp_gid,
            signal: Signal::from_config(&config.forcing.signal),
        }
    }

    /// Velocity grid id where the source acts.
    pub fn vp_gid(&self) -> usize {
        self.vp_gid
    }

    /// Frequency bound of the live signal, for the dispersion check.
    pub fn max_freq(&self) -> f64 {
        self.signal.max_freq()
    }

    /// Swap the signal content in place; the location is untouched.
    pub fn replace_signal(&mut self, signal: Signal) {
        self.signal = signal;
    }

    pub fn evaluate(&self, t: f64) -> f64 {
        self.signal.evaluate(t)
    }
}

/// Single source location, a fixed-width batch of signals marched as
/// the columns of a rank-2 state.
#[derive(Debug, Clone)]
pub struct RankTwoForcing {
    vp_gid: usize,
    f_size: usize,
    signals: Vec<Signal>,
}

impl RankTwoForcing {
    pub fn new(config: &SimConfig, mesh: &MeshInfo, f_size: usize) -> Self {
        assert!(f_size > 0, "forcing batch width must be positive");
        let vp_gid = mesh.nearest_vp_gid(config.source_radius_m(), config.source_angle_rad());
        let nominal = Signal::from_config(&config.forcing.signal);
        RankTwoForcing {
            vp_gid,
            f_size,
            signals: vec![nominal; f_size],
        }
    }

    pub fn vp_gid(&self) -> usize {
        self.vp_gid
    }

    pub fn batch_width(&self) -> usize {
        self.f_size
    }

    /// Max frequency across the live batch.
    pub fn max_freq(&self) -> f64 {
        self.signals
            .iter()
            .map(Signal::max_freq)
            .fold(0.0, f64::max)
    }

    /// Copy `f_size` signals from `signals[offset..]` into the batch.
    ///
    /// The batch capacity is fixed; an offset that would read past the
    /// end of the sample list is a precondition error, not a silent
    /// truncation.
    pub fn replace_signals(&mut self, signals: &[Signal], offset: usize) -> SeismicResult<()> {
        if offset + self.f_size > signals.len() {
            return Err(SeismicError::Precondition(format!(
                "signal batch [{}, {}) exceeds sample list of length {}",
                offset,
                offset + self.f_size,
                signals.len()
            )));
        }
        self.signals
            .copy_from_slice(&signals[offset..offset + self.f_size]);
        Ok(())
    }

    /// Evaluate all batch signals at time t into `out`.
    pub fn evaluate_into(&self, t: f64, out: &mut [f64]) {
        debug_assert_eq!(out.len(), self.f_size);
        for (o, s) in out.iter_mut().zip(&self.signals) {
            *o = s.evaluate(t);
        }
    }

    /// Live batch contents, read-only.
    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seismic_types::config::{SignalConfig, SignalKind};

    fn test_config() -> SimConfig {
        let json = r#"{
            "run_name": "t",
            "problem": "fom",
            "mesh": { "nr": 8, "ntheta": 6, "radius_min_km": 3500.0, "radius_max_km": 6371.0 },
            "general": { "num_steps": 4, "time_step_size": 0.1 },
            "io": { "output_dir": "out" },
            "material": { "model": "prem" },
            "forcing": {
                "signal": { "kind": "ricker", "period": 60.0, "delay": 120.0 },
                "depth_km": 640.0,
                "angle_deg": 90.0
            }
        }"#;
        serde_json::from_str(json).unwrap()
    }

    fn make_signal(period: f64) -> Signal {
        Signal::from_config(&SignalConfig {
            kind: SignalKind::Ricker,
            period,
            delay: 0.0,
        })
    }

    #[test]
    fn test_rank_one_location_fixed_across_replacement() {
        let cfg = test_config();
        let mesh = cfg.create_mesh();
        let mut forcing = RankOneForcing::new(&cfg, &mesh);
        let gid = forcing.vp_gid();
        forcing.replace_signal(make_signal(10.0));
        assert_eq!(forcing.vp_gid(), gid);
        assert!((forcing.max_freq() - 0.25).abs() < 1e-15);
    }

    #[test]
    fn test_rank_two_replace_signals_target_slice_only() {
        let cfg = test_config();
        let mesh = cfg.create_mesh();
        let mut forcing = RankTwoForcing::new(&cfg, &mesh, 2);
        let samples: Vec<Signal> = [10.0, 20.0, 30.0, 40.0].map(make_signal).to_vec();

        forcing.replace_signals(&samples, 2).unwrap();
        assert_eq!(forcing.signals().len(), 2, "batch capacity never grows");
        assert!((forcing.signals()[0].period() - 30.0).abs() < 1e-15);
        assert!((forcing.signals()[1].period() - 40.0).abs() < 1e-15);
        // max freq comes from the shortest live period
        assert!((forcing.max_freq() - 2.5 / 30.0).abs() < 1e-15);
    }

    #[test]
    fn test_rank_two_rejects_out_of_range_offset() {
        let cfg = test_config();
        let mesh = cfg.create_mesh();
        let mut forcing = RankTwoForcing::new(&cfg, &mesh, 2);
        let samples: Vec<Signal> = [10.0, 20.0, 30.0].map(make_signal).to_vec();

        let before: Vec<f64> = forcing.signals().iter().map(Signal::period).collect();
        let err = forcing.replace_signals(&samples, 2).unwrap_err();
        assert!(matches!(err, SeismicError::Precondition(_)));
        // failed replacement leaves the batch untouched
        let after: Vec<f64> = forcing.signals().iter().map(Signal::period).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_rank_two_evaluate_matches_signals() {
        let cfg = test_config();
        let mesh = cfg.create_mesh();
        let mut forcing = RankTwoForcing::new(&cfg, &mesh, 2);
        let samples: Vec<Signal> = [15.0, 25.0].map(make_signal).to_vec();
        forcing.replace_signals(&samples, 0).unwrap();

        let mut out = [0.0; 2];
        forcing.evaluate_into(3.0, &mut out);
        assert!((out[0] - samples[0].evaluate(3.0)).abs() < 1e-15);
        assert!((out[1] - samples[1].evaluate(3.0)).abs() < 1e-15);
    }
}
