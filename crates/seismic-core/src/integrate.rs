// ─────────────────────────────────────────────────────────────────────
// SCPN Seismic Core — Time Integration
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Explicit staggered leapfrog for the coupled velocity-stress system.
//!
//!   v ← v + dt·(1/ρ)·J_vp_bare·σ + dt·(1/ρ)·f(t)
//!   σ ← σ + dt·μ·J_sp_bare·v
//!
//! With material folded into the operators the elementwise ρ and μ
//! factors disappear from the update and only the forcing injection
//! keeps its 1/ρ weight. The stress update always uses the velocity of
//! the current step (velocity first, then stress).

use ndarray::Array2;
use tracing::trace;

use crate::forcing::{RankOneForcing, RankTwoForcing};
use crate::observer::{Observer, Seismogram};
use crate::operators::ShearOperators;
use seismic_types::state::Mirrored;

/// March the full-order rank-1 system for `num_steps` steps.
///
/// `x_vp` / `x_sp` are single-column mirrored states, zeroed by the
/// caller. Observation syncs the host mirror only on snapshot steps.
#[allow(clippy::too_many_arguments)]
pub fn run_fom_rank_one(
    num_steps: usize,
    dt: f64,
    ops: &ShearOperators,
    forcing: &RankOneForcing,
    exploit_forcing_sparsity: bool,
    observer: Option<&mut Observer>,
    seismogram: Option<&mut Seismogram>,
    x_vp: &mut Mirrored,
    x_sp: &mut Mirrored,
) {
    let n_vp = ops.jac_vp().nrows();
    let n_sp = ops.jac_sp().nrows();
    let mut k_vp = Array2::zeros((n_vp, 1));
    let mut k_sp = Array2::zeros((n_sp, 1));
    // dense forcing buffer, only touched on the non-sparse path
    let mut f_dense = Array2::zeros((n_vp, 1));

    let gid = forcing.vp_gid();
    let folded = ops.material_folded();
    let rho_inv = ops.rho_inv_vp();
    let mu = ops.mu_sp();

    let mut observer = observer;
    let mut seismogram = seismogram;

    for step in 0..num_steps {
        let t = step as f64 * dt;

        // velocity update
        ops.jac_vp().apply(x_sp.resident().view(), &mut k_vp);
        {
            let v = x_vp.resident_mut();
            if folded {
                v.scaled_add(dt, &k_vp);
            } else {
                for g in 0..n_vp {
                    v[[g, 0]] += dt * rho_inv[g] * k_vp[[g, 0]];
                }
            }
            if exploit_forcing_sparsity {
                v[[gid, 0]] += dt * rho_inv[gid] * forcing.evaluate(t);
            } else {
                f_dense.fill(0.0);
                f_dense[[gid, 0]] = forcing.evaluate(t);
                for g in 0..n_vp {
                    v[[g, 0]] += dt * rho_inv[g] * f_dense[[g, 0]];
                }
            }
        }

        // stress update from the freshly advanced velocity
        ops.jac_sp().apply(x_vp.resident().view(), &mut k_sp);
        {
            let s = x_sp.resident_mut();
            if folded {
                s.scaled_add(dt, &k_sp);
            } else {
                for g in 0..n_sp {
                    s[[g, 0]] += dt * mu[g] * k_sp[[g, 0]];
                }
            }
        }

        if let Some(obs) = observer.as_deref_mut() {
            if obs.wants_step(step) {
                x_vp.sync_host();
                x_sp.sync_host();
                obs.observe(step, x_vp.host().view(), x_sp.host().view());
            }
        }
        if let Some(seis) = seismogram.as_deref_mut() {
            x_vp.sync_host();
            seis.record(step, x_vp.host().view());
        }
        trace!(step, t, "fom step complete");
    }
}

/// March the reduced rank-2 system for `num_steps` steps.
///
/// `phi_vp_rho_inv` carries the reduced forcing direction per batch
/// column: column j is `(1/ρ)[gid] · phi_vp[gid, ·]ᵀ`, precomputed once
/// per sweep. States are `rom_size × f_size` mirrored buffers.
#[allow(clippy::too_many_arguments)]
pub fn run_rom_rank_two(
    num_steps: usize,
    dt: f64,
    jac_vp_rom: &Array2<f64>,
    jac_sp_rom: &Array2<f64>,
    phi_vp_rho_inv: &Array2<f64>,
    forcing: &RankTwoForcing,
    observer: Option<&mut Observer>,
    x_vp: &mut Mirrored,
    x_sp: &mut Mirrored,
) {
    let f_size = forcing.batch_width();
    debug_assert_eq!(phi_vp_rho_inv.ncols(), f_size);
    let mut f_vals = vec![0.0; f_size];
    let mut observer = observer;

    for step in 0..num_steps {
        let t = step as f64 * dt;

        // velocity update: reduced operator plus per-column injection
        let k_vp = jac_vp_rom.dot(x_sp.resident());
        {
            let v = x_vp.resident_mut();
            v.scaled_add(dt, &k_vp);
            forcing.evaluate_into(t, &mut f_vals);
            for (j, &f) in f_vals.iter().enumerate() {
                for i in 0..v.nrows() {
                    v[[i, j]] += dt * f * phi_vp_rho_inv[[i, j]];
                }
            }
        }

        // stress update
        let k_sp = jac_sp_rom.dot(x_vp.resident());
        x_sp.resident_mut().scaled_add(dt, &k_sp);

        if let Some(obs) = observer.as_deref_mut() {
            if obs.wants_step(step) {
                x_vp.sync_host();
                x_sp.sync_host();
                obs.observe(step, x_vp.host().view(), x_sp.host().view());
            }
        }
        trace!(step, t, "rom step complete");
    }
}
