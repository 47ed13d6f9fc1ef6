// ─────────────────────────────────────────────────────────────────────
// SCPN Seismic Core — Problem Dispatch
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Top-level entry: pick the FOM or ROM driver from the configuration
//! and run it behind one uniform interface.

use crate::fom::FomDriver;
use crate::rom::RomDriver;
use seismic_types::config::{ProblemKind, SimConfig};
use seismic_types::error::SeismicResult;

#[derive(Debug)]
pub enum Problem {
    FomRankOne(FomDriver),
    RomRankTwo(RomDriver),
}

impl Problem {
    /// Validate the configuration and build the matching driver. All
    /// user-input errors surface here, before any time stepping.
    pub fn from_config(config: SimConfig) -> SeismicResult<Self> {
        config.validate()?;
        match config.problem {
            ProblemKind::Fom => Ok(Problem::FomRankOne(FomDriver::new(config)?)),
            ProblemKind::Rom => Ok(Problem::RomRankTwo(RomDriver::new(config)?)),
        }
    }

    pub fn run(&mut self) -> SeismicResult<()> {
        match self {
            Problem::FomRankOne(driver) => driver.run(),
            Problem::RomRankTwo(driver) => driver.run(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seismic_types::config::SAMPLABLE_SIGNAL_PERIOD;
    use seismic_types::error::SeismicError;

    fn fom_json(output_dir: &str) -> String {
        format!(
            r#"{{
            "run_name": "dispatch",
            "problem": "fom",
            "mesh": {{ "nr": 12, "ntheta": 6, "radius_min_km": 3500.0, "radius_max_km": 6371.0 }},
            "general": {{ "num_steps": 4, "time_step_size": 2.0 }},
            "io": {{ "output_dir": "{output_dir}" }},
            "material": {{ "model": "prem" }},
            "forcing": {{
                "signal": {{ "kind": "ricker", "period": 2000.0, "delay": 100.0 }},
                "depth_km": 640.0,
                "angle_deg": 90.0
            }},
            "sampling": {{ "parameter": "signalPeriod", "values": [2000.0] }}
        }}"#
        )
    }

    #[test]
    fn test_dispatch_builds_fom() {
        let dir = tempfile::tempdir().unwrap();
        let cfg: SimConfig = serde_json::from_str(&fom_json(dir.path().to_str().unwrap())).unwrap();
        let mut problem = Problem::from_config(cfg).unwrap();
        assert!(matches!(problem, Problem::FomRankOne(_)));
        problem.run().unwrap();
    }

    #[test]
    fn test_non_positive_values_rejected_before_assembly() {
        // A negative sampled period and a zero nominal period must both
        // surface as configuration errors, never reach the march.
        let dir = tempfile::tempdir().unwrap();
        let mut cfg: SimConfig =
            serde_json::from_str(&fom_json(dir.path().to_str().unwrap())).unwrap();
        cfg.sampling.as_mut().unwrap().values = vec![2000.0, -5.0];
        let err = Problem::from_config(cfg).unwrap_err();
        assert!(matches!(err, SeismicError::ConfigError(_)));

        let mut cfg: SimConfig =
            serde_json::from_str(&fom_json(dir.path().to_str().unwrap())).unwrap();
        cfg.forcing.signal.period = 0.0;
        let err = Problem::from_config(cfg).unwrap_err();
        assert!(matches!(err, SeismicError::ConfigError(_)));
    }

    #[test]
    fn test_unsupported_parameter_rejected_before_assembly() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg: SimConfig =
            serde_json::from_str(&fom_json(dir.path().to_str().unwrap())).unwrap();
        cfg.sampling.as_mut().unwrap().parameter = "sourceDepth".into();
        let err = Problem::from_config(cfg).unwrap_err();
        assert!(matches!(err, SeismicError::ConfigError(_)));
        assert!(err.to_string().contains(SAMPLABLE_SIGNAL_PERIOD));
    }
}
