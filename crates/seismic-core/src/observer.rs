// ─────────────────────────────────────────────────────────────────────
// SCPN Seismic Core — Observer & Seismogram
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Per-run data collection: state snapshots and receiver traces.
//!
//! Buffers are allocated once with the capacity of a full run and
//! reused across samples; `prep_for_new_run` only resets the cursor and
//! zeroes the data, so the sampling loop never reallocates.

use ndarray::{s, Array1, Array2, ArrayView2};
use ndarray_npy::NpzWriter;
use seismic_types::config::SimConfig;
use seismic_types::error::{SeismicError, SeismicResult};
use seismic_types::state::{FieldId, MeshInfo};
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Accumulates state snapshots every k-th step for both fields.
#[derive(Debug, Clone)]
pub struct Observer {
    snapshot_frequency: usize,
    state_cols: usize,
    capacity: usize,
    count: usize,
    run_id: usize,
    vp: Array2<f64>,
    sp: Array2<f64>,
}

impl Observer {
    /// `state_cols` is 1 for rank-1 states and the forcing batch width
    /// for rank-2 states.
    pub fn new(
        n_vp: usize,
        n_sp: usize,
        num_steps: usize,
        snapshot_frequency: usize,
        state_cols: usize,
    ) -> Self {
        let capacity = num_steps.div_ceil(snapshot_frequency);
        Observer {
            snapshot_frequency,
            state_cols,
            capacity,
            count: 0,
            run_id: 0,
            vp: Array2::zeros((n_vp, capacity * state_cols)),
            sp: Array2::zeros((n_sp, capacity * state_cols)),
        }
    }

    /// Reset for a new sample run; prior content is discarded.
    pub fn prep_for_new_run(&mut self, run_id: usize) {
        self.run_id = run_id;
        self.count = 0;
        self.vp.fill(0.0);
        self.sp.fill(0.0);
    }

    pub fn run_id(&self) -> usize {
        self.run_id
    }

    /// Number of snapshots stored so far in this run.
    pub fn num_snapshots(&self) -> usize {
        self.count
    }

    /// Whether this step falls on the snapshot cadence. The time
    /// marcher uses this to skip host synchronization on skipped steps.
    pub fn wants_step(&self, step: usize) -> bool {
        step % self.snapshot_frequency == 0 && self.count < self.capacity
    }

    /// Record both fields if this step falls on the sampling cadence.
    pub fn observe(&mut self, step: usize, x_vp: ArrayView2<'_, f64>, x_sp: ArrayView2<'_, f64>) {
        if step % self.snapshot_frequency != 0 || self.count >= self.capacity {
            return;
        }
        let lo = self.count * self.state_cols;
        let hi = lo + self.state_cols;
        self.vp.slice_mut(s![.., lo..hi]).assign(&x_vp);
        self.sp.slice_mut(s![.., lo..hi]).assign(&x_sp);
        self.count += 1;
    }

    /// Collected snapshot matrix of one field (ndof × stored columns).
    pub fn snapshots(&self, field: FieldId) -> ArrayView2<'_, f64> {
        let cols = self.count * self.state_cols;
        match field {
            FieldId::Vp => self.vp.slice(s![.., ..cols]),
            FieldId::Sp => self.sp.slice(s![.., ..cols]),
        }
    }

    /// Persist the snapshot matrix of one field for the current run.
    pub fn write_snapshot_matrix(&self, field: FieldId, output_dir: &str) -> SeismicResult<()> {
        std::fs::create_dir_all(output_dir)?;
        let path = Path::new(output_dir).join(format!(
            "snapshots_{}_run{}.npz",
            field.tag(),
            self.run_id
        ));
        let data = self.snapshots(field).to_owned();
        let mut npz = NpzWriter::new(File::create(&path)?);
        npz.add_array("snapshots", &data)
            .map_err(|e| SeismicError::ArrayIo(e.to_string()))?;
        npz.finish()
            .map_err(|e| SeismicError::ArrayIo(e.to_string()))?;
        debug!(path = %path.display(), cols = data.ncols(), "snapshot matrix written");
        Ok(())
    }
}

/// Velocity traces at fixed surface receivers, one row per receiver.
#[derive(Debug, Clone)]
pub struct Seismogram {
    receiver_gids: Vec<usize>,
    num_steps: usize,
    run_id: usize,
    data: Array2<f64>,
}

impl Seismogram {
    /// Receivers sit on the surface ring at the configured angles.
    pub fn from_config(config: &SimConfig, mesh: &MeshInfo) -> Self {
        let receiver_gids: Vec<usize> = config
            .io
            .receiver_angles_deg
            .iter()
            .map(|deg| mesh.nearest_vp_gid(mesh.r_max, deg.to_radians()))
            .collect();
        let num_steps = config.general.num_steps;
        Seismogram {
            data: Array2::zeros((receiver_gids.len(), num_steps)),
            receiver_gids,
            num_steps,
            run_id: 0,
        }
    }

    pub fn receiver_gids(&self) -> &[usize] {
        &self.receiver_gids
    }

    pub fn prep_for_new_run(&mut self, run_id: usize) {
        self.run_id = run_id;
        self.data.fill(0.0);
    }

    /// Record the first state column at every receiver for this step.
    pub fn record(&mut self, step: usize, x_vp: ArrayView2<'_, f64>) {
        if step >= self.num_steps {
            return;
        }
        for (row, &gid) in self.receiver_gids.iter().enumerate() {
            self.data[[row, step]] = x_vp[[gid, 0]];
        }
    }

    pub fn traces(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    /// Persist receiver traces for the current run.
    pub fn write_receivers(&self, output_dir: &str) -> SeismicResult<()> {
        std::fs::create_dir_all(output_dir)?;
        let path = Path::new(output_dir).join(format!("seismogram_run{}.npz", self.run_id));
        let gids: Array1<u64> = self.receiver_gids.iter().map(|&g| g as u64).collect();
        let mut npz = NpzWriter::new(File::create(&path)?);
        npz.add_array("traces", &self.data)
            .map_err(|e| SeismicError::ArrayIo(e.to_string()))?;
        npz.add_array("receiver_gids", &gids)
            .map_err(|e| SeismicError::ArrayIo(e.to_string()))?;
        npz.finish()
            .map_err(|e| SeismicError::ArrayIo(e.to_string()))?;
        debug!(path = %path.display(), receivers = self.receiver_gids.len(), "seismogram written");
        Ok(())
    }
}
