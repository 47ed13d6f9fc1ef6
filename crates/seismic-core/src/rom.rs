// ─────────────────────────────────────────────────────────────────────
// SCPN Seismic Core — ROM Driver
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Reduced-order driver: batched rank-2 marches over the sampled
//! signal periods.
//!
//! The FOM operators are assembled and projected exactly once per
//! sweep; each batch of `forcing_size` samples then marches together as
//! the columns of one rank-2 state. Projection requires the folded
//! operators, so the ROM path ignores `include_material_in_jacobian`.

use ndarray::Array2;
use tracing::{info, info_span};

use crate::basis::{RomBasis, RomOperators};
use crate::forcing::RankTwoForcing;
use crate::integrate::run_rom_rank_two;
use crate::material::create_material_model;
use crate::observer::Observer;
use crate::operators::ShearOperators;
use crate::signal::Signal;
use crate::stability::{check_cfl, check_dispersion_criterion};
use seismic_types::config::{SamplingSection, SimConfig};
use seismic_types::error::{SeismicError, SeismicResult};
use seismic_types::state::{FieldId, Mirrored};

#[derive(Debug)]
pub struct RomDriver {
    config: SimConfig,
    ops: ShearOperators,
    rom_ops: RomOperators,
    forcing: RankTwoForcing,
    /// Reduced forcing direction per batch column, `rom_size_vp × f_size`.
    phi_vp_rho_inv: Array2<f64>,
    observer: Option<Observer>,
    skip_outputs: bool,
    x_vp: Mirrored,
    x_sp: Mirrored,
}

impl RomDriver {
    pub fn new(config: SimConfig) -> SeismicResult<Self> {
        let rom = config
            .rom
            .clone()
            .ok_or_else(|| SeismicError::ConfigError("rom section is required".into()))?;
        if config.sampling.is_none() {
            return Err(SeismicError::ConfigError(
                "rom problem requires a sampling section".into(),
            ));
        }

        let mesh = config.create_mesh();
        let material = create_material_model(&config.material)?;
        let ops = ShearOperators::with_material(mesh.clone(), material.as_ref())?;
        let basis = RomBasis::from_config(&rom, &mesh)?;
        let rom_ops = RomOperators::project(&ops, &basis)?;
        let forcing = RankTwoForcing::new(&config, &mesh, rom.forcing_size);
        let phi_vp_rho_inv = reduced_forcing_directions(&ops, &basis, &forcing);
        info!(
            rom_size_vp = rom.rom_size_vp,
            rom_size_sp = rom.rom_size_sp,
            f_size = rom.forcing_size,
            source_gid = forcing.vp_gid(),
            "rom driver assembled"
        );

        let observer = config.io.enable_snapshot_matrix.then(|| {
            Observer::new(
                rom.rom_size_vp,
                rom.rom_size_sp,
                config.general.num_steps,
                config.io.snapshot_frequency,
                rom.forcing_size,
            )
        });
        // dummy-basis runs are for timing only; their data is noise
        let skip_outputs = rom.random_dummy_basis;

        let x_vp = Mirrored::zeros(rom.rom_size_vp, rom.forcing_size);
        let x_sp = Mirrored::zeros(rom.rom_size_sp, rom.forcing_size);
        Ok(RomDriver {
            config,
            ops,
            rom_ops,
            forcing,
            phi_vp_rho_inv,
            observer,
            skip_outputs,
            x_vp,
            x_sp,
        })
    }

    pub fn run(&mut self) -> SeismicResult<()> {
        let sampling: SamplingSection = self
            .config
            .sampling
            .clone()
            .ok_or_else(|| SeismicError::ConfigError("sampling section is required".into()))?;
        let f_size = self.forcing.batch_width();

        let nominal = Signal::from_config(&self.config.forcing.signal);
        let signals: Vec<Signal> = sampling
            .values
            .iter()
            .map(|&period| {
                let mut s = nominal;
                s.reset_period(period);
                s
            })
            .collect();

        let num_batches = signals.len() / f_size;
        for batch in 0..num_batches {
            let span = info_span!("rom_batch", batch);
            let _guard = span.enter();

            self.forcing.replace_signals(&signals, batch * f_size)?;
            self.check_stability()?;

            self.x_vp.reset();
            self.x_sp.reset();
            if let Some(obs) = &mut self.observer {
                obs.prep_for_new_run(batch);
            }

            run_rom_rank_two(
                self.config.general.num_steps,
                self.config.general.time_step_size,
                &self.rom_ops.jac_vp_rom,
                &self.rom_ops.jac_sp_rom,
                &self.phi_vp_rho_inv,
                &self.forcing,
                self.observer.as_mut(),
                &mut self.x_vp,
                &mut self.x_sp,
            );

            if !self.skip_outputs {
                let start = std::time::Instant::now();
                if let Some(obs) = &self.observer {
                    obs.write_snapshot_matrix(FieldId::Vp, &self.config.io.output_dir)?;
                    obs.write_snapshot_matrix(FieldId::Sp, &self.config.io.output_dir)?;
                }
                info!(
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "outputs processed"
                );
            }
            info!(
                samples = f_size,
                first_period = signals[batch * f_size].period(),
                "batch complete"
            );
        }
        info!(batches = num_batches, "rom sweep finished");
        Ok(())
    }

    fn check_stability(&self) -> SeismicResult<()> {
        let mesh = self.ops.mesh();
        if self.config.general.check_dispersion {
            check_dispersion_criterion(
                mesh,
                self.forcing.max_freq(),
                self.ops.min_shear_velocity(),
            )?;
        }
        if self.config.general.check_cfl {
            check_cfl(
                mesh,
                self.config.general.time_step_size,
                self.ops.max_shear_velocity(),
            )?;
        }
        Ok(())
    }

    /// Final reduced velocity state of the last batch.
    pub fn velocity_state(&self) -> &Mirrored {
        &self.x_vp
    }
}

/// Column j of the result is `(1/ρ)[gid] · phi_vp[gid, ·]ᵀ`: the source
/// impulse at the forcing gid pushed through the velocity basis, one
/// copy per batch column.
fn reduced_forcing_directions(
    ops: &ShearOperators,
    basis: &RomBasis,
    forcing: &RankTwoForcing,
) -> Array2<f64> {
    let gid = forcing.vp_gid();
    let rho_inv = ops.rho_inv_vp()[gid];
    let k = basis.rom_size_vp();
    let mut out = Array2::zeros((k, forcing.batch_width()));
    for j in 0..forcing.batch_width() {
        for i in 0..k {
            out[[i, j]] = rho_inv * basis.phi_vp()[[gid, i]];
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rom_config(output_dir: &str, dummy: bool) -> SimConfig {
        let json = format!(
            r#"{{
            "run_name": "rom",
            "problem": "rom",
            "mesh": {{ "nr": 12, "ntheta": 6, "radius_min_km": 3500.0, "radius_max_km": 6371.0 }},
            "general": {{ "num_steps": 6, "time_step_size": 2.0 }},
            "io": {{ "output_dir": "{output_dir}", "enable_snapshot_matrix": true }},
            "material": {{ "model": "prem" }},
            "forcing": {{
                "signal": {{ "kind": "ricker", "period": 2000.0, "delay": 100.0 }},
                "depth_km": 640.0,
                "angle_deg": 90.0
            }},
            "sampling": {{ "parameter": "signalPeriod", "values": [2000.0, 2200.0, 2400.0, 2600.0] }},
            "rom": {{
                "rom_size_vp": 8,
                "rom_size_sp": 6,
                "forcing_size": 2,
                "random_dummy_basis": {dummy},
                "dummy_basis_seed": 99
            }}
        }}"#
        );
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_rom_sweep_runs_in_batches() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = rom_config(dir.path().to_str().unwrap(), true);
        let mut driver = RomDriver::new(cfg).unwrap();
        driver.run().unwrap();

        // dummy basis skips output processing entirely
        assert!(!dir.path().join("snapshots_vp_run0.npz").exists());
        let energy: f64 = driver
            .velocity_state()
            .resident()
            .iter()
            .map(|x| x * x)
            .sum();
        assert!(energy > 0.0, "reduced state must respond to the source");
    }

    #[test]
    fn test_reduced_forcing_directions_shape() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = rom_config(dir.path().to_str().unwrap(), true);
        let driver = RomDriver::new(cfg).unwrap();
        assert_eq!(driver.phi_vp_rho_inv.dim(), (8, 2));
        // both batch columns carry the same direction
        for i in 0..8 {
            assert_eq!(
                driver.phi_vp_rho_inv[[i, 0]],
                driver.phi_vp_rho_inv[[i, 1]]
            );
        }
    }

    #[test]
    fn test_rom_requires_sampling_section() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = rom_config(dir.path().to_str().unwrap(), true);
        cfg.sampling = None;
        assert!(RomDriver::new(cfg).is_err());
    }
}
