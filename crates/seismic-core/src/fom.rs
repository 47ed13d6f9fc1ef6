// ─────────────────────────────────────────────────────────────────────
// SCPN Seismic Core — FOM Driver
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Full-order driver: one rank-1 march per sampled signal period.
//!
//! Everything sample-invariant (mesh, material scan, operators, source
//! location, state allocations) is built once; the sampling loop only
//! swaps signal content, re-checks stability, and resets states.

use tracing::{info, info_span};

use crate::forcing::RankOneForcing;
use crate::integrate::run_fom_rank_one;
use crate::material::create_material_model;
use crate::observer::{Observer, Seismogram};
use crate::operators::ShearOperators;
use crate::signal::Signal;
use crate::stability::{check_cfl, check_dispersion_criterion};
use seismic_types::config::SimConfig;
use seismic_types::error::SeismicResult;
use seismic_types::state::{FieldId, Mirrored};

#[derive(Debug)]
pub struct FomDriver {
    config: SimConfig,
    ops: ShearOperators,
    forcing: RankOneForcing,
    observer: Option<Observer>,
    seismogram: Option<Seismogram>,
    x_vp: Mirrored,
    x_sp: Mirrored,
}

impl FomDriver {
    /// Build all sample-invariant structure up front.
    pub fn new(config: SimConfig) -> SeismicResult<Self> {
        let mesh = config.create_mesh();
        let material = create_material_model(&config.material)?;
        // Sampling always folds: rebuilding operators per sample would
        // defeat the sweep amortization, and only the signal varies.
        let ops = if config.general.include_material_in_jacobian || config.sampling_enabled() {
            ShearOperators::with_material(mesh.clone(), material.as_ref())?
        } else {
            ShearOperators::without_material(mesh.clone(), material.as_ref())?
        };
        let forcing = RankOneForcing::new(&config, &mesh);
        info!(
            num_vp = mesh.num_vp_pts(),
            num_sp = mesh.num_sp_pts(),
            source_gid = forcing.vp_gid(),
            folded = ops.material_folded(),
            "fom driver assembled"
        );

        let observer = config.io.enable_snapshot_matrix.then(|| {
            Observer::new(
                mesh.num_vp_pts(),
                mesh.num_sp_pts(),
                config.general.num_steps,
                config.io.snapshot_frequency,
                1,
            )
        });
        let seismogram = config
            .io
            .enable_seismogram
            .then(|| Seismogram::from_config(&config, &mesh));

        let x_vp = Mirrored::zeros(mesh.num_vp_pts(), 1);
        let x_sp = Mirrored::zeros(mesh.num_sp_pts(), 1);
        Ok(FomDriver {
            config,
            ops,
            forcing,
            observer,
            seismogram,
            x_vp,
            x_sp,
        })
    }

    /// Run the sweep (or the single configured run).
    pub fn run(&mut self) -> SeismicResult<()> {
        let periods: Vec<f64> = match &self.config.sampling {
            Some(s) => s.values.clone(),
            None => vec![self.config.forcing.signal.period],
        };
        let nominal = Signal::from_config(&self.config.forcing.signal);

        for (run_id, &period) in periods.iter().enumerate() {
            let span = info_span!("fom_run", run_id, period);
            let _guard = span.enter();

            let mut signal = nominal;
            signal.reset_period(period);
            self.forcing.replace_signal(signal);
            self.check_stability()?;

            self.x_vp.reset();
            self.x_sp.reset();
            if let Some(obs) = &mut self.observer {
                obs.prep_for_new_run(run_id);
            }
            if let Some(seis) = &mut self.seismogram {
                seis.prep_for_new_run(run_id);
            }

            run_fom_rank_one(
                self.config.general.num_steps,
                self.config.general.time_step_size,
                &self.ops,
                &self.forcing,
                self.config.general.exploit_forcing_sparsity,
                self.observer.as_mut(),
                self.seismogram.as_mut(),
                &mut self.x_vp,
                &mut self.x_sp,
            );
            self.write_run_outputs()?;
            info!("run complete");
        }

        // coordinates accompany the snapshot matrices; sample-invariant,
        // so written once per sweep
        if self.config.io.enable_snapshot_matrix {
            let out = &self.config.io.output_dir;
            self.ops.write_coordinates(FieldId::Vp, out)?;
            self.ops.write_coordinates(FieldId::Sp, out)?;
        }
        info!(runs = periods.len(), "fom sweep finished");
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

    fn write_run_outputs(&self) -> SeismicResult<()> {
        let start = std::time::Instant::now();
        let out = &self.config.io.output_dir;
        if let Some(obs) = &self.observer {
            obs.write_snapshot_matrix(FieldId::Vp, out)?;
            obs.write_snapshot_matrix(FieldId::Sp, out)?;
        }
        if let Some(seis) = &self.seismogram {
            seis.write_receivers(out)?;
        }
        info!(elapsed_ms = start.elapsed().as_millis() as u64, "outputs processed");
        Ok(())
    }

    /// Final velocity state of the last run, for inspection.
    pub fn velocity_state(&self) -> &Mirrored {
        &self.x_vp
    }
}
