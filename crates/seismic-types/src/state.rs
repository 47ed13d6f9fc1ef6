// ─────────────────────────────────────────────────────────────────────
// SCPN Seismic Core — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use ndarray::{Array1, Array2};

/// Degree-of-freedom field identifier for the coupled shear system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    /// Velocity field.
    Vp,
    /// Shear-stress field.
    Sp,
}

impl FieldId {
    /// File-name tag for persisted outputs.
    pub fn tag(&self) -> &'static str {
        match self {
            FieldId::Vp => "vp",
            FieldId::Sp => "sp",
        }
    }
}

/// Polar mesh for the radially-layered domain.
///
/// Velocity points sit on the radial nodes `r_i = r_min + i·dr`
/// (`nr × ntheta` points); stress points sit on the staggered radii
/// `r_{i+1/2}` (`(nr-1) × ntheta` points). The angular coordinate spans
/// `[0, π]`. Grid ids are row-major: `gid = i_r * ntheta + i_theta`.
#[derive(Debug, Clone)]
pub struct MeshInfo {
    pub nr: usize,
    pub ntheta: usize,
    pub r_min: f64,
    pub r_max: f64,
    pub dr: f64,
    pub dtheta: f64,
    pub r: Array1<f64>,
    pub theta: Array1<f64>,
}

impl MeshInfo {
    /// Build a uniform mesh between two radii (meters).
    pub fn new(nr: usize, ntheta: usize, r_min: f64, r_max: f64) -> Self {
        assert!(nr > 1 && ntheta > 1, "mesh needs at least 2 points per axis");
        let r = Array1::linspace(r_min, r_max, nr);
        let theta = Array1::linspace(0.0, std::f64::consts::PI, ntheta);
        let dr = r[1] - r[0];
        let dtheta = theta[1] - theta[0];
        MeshInfo {
            nr,
            ntheta,
            r_min,
            r_max,
            dr,
            dtheta,
            r,
            theta,
        }
    }

    /// Number of velocity degrees of freedom.
    pub fn num_vp_pts(&self) -> usize {
        self.nr * self.ntheta
    }

    /// Number of stress degrees of freedom.
    pub fn num_sp_pts(&self) -> usize {
        (self.nr - 1) * self.ntheta
    }

    /// Radius of a velocity node.
    pub fn vp_radius(&self, i_r: usize) -> f64 {
        self.r[i_r]
    }

    /// Radius of a staggered stress node.
    pub fn sp_radius(&self, i_r: usize) -> f64 {
        self.r[i_r] + 0.5 * self.dr
    }

    /// Grid resolution used by the stability checks. The stencil
    /// differences radially, so the resolution is the radial spacing.
    pub fn min_spacing(&self) -> f64 {
        self.dr
    }

    /// Locate the velocity grid id nearest to (radius, angle).
    pub fn nearest_vp_gid(&self, radius: f64, angle: f64) -> usize {
        let i_r = ((radius - self.r_min) / self.dr)
            .round()
            .clamp(0.0, (self.nr - 1) as f64) as usize;
        let i_t = (angle / self.dtheta)
            .round()
            .clamp(0.0, (self.ntheta - 1) as f64) as usize;
        i_r * self.ntheta + i_t
    }

    /// Coordinates (radius, angle) of every velocity node, gid order.
    pub fn vp_coordinates(&self) -> (Array1<f64>, Array1<f64>) {
        self.field_coordinates(self.nr, |i| self.vp_radius(i))
    }

    /// Coordinates (radius, angle) of every stress node, gid order.
    pub fn sp_coordinates(&self) -> (Array1<f64>, Array1<f64>) {
        self.field_coordinates(self.nr - 1, |i| self.sp_radius(i))
    }

    fn field_coordinates(
        &self,
        n_radial: usize,
        radius_of: impl Fn(usize) -> f64,
    ) -> (Array1<f64>, Array1<f64>) {
        let n = n_radial * self.ntheta;
        let mut rr = Array1::zeros(n);
        let mut tt = Array1::zeros(n);
        for i in 0..n_radial {
            for j in 0..self.ntheta {
                rr[i * self.ntheta + j] = radius_of(i);
                tt[i * self.ntheta + j] = self.theta[j];
            }
        }
        (rr, tt)
    }
}

/// Ownership pair of a resident compute buffer and its host mirror.
///
/// The march mutates `resident`; readers on the observation side see
/// `host` and must request an explicit `sync_host()` first. Nothing is
/// synchronized implicitly.
#[derive(Debug, Clone)]
pub struct Mirrored {
    resident: Array2<f64>,
    host: Array2<f64>,
}

impl Mirrored {
    /// Allocate a zeroed pair of (rows × cols) buffers.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Mirrored {
            resident: Array2::zeros((rows, cols)),
            host: Array2::zeros((rows, cols)),
        }
    }

    pub fn resident(&self) -> &Array2<f64> {
        &self.resident
    }

    pub fn resident_mut(&mut self) -> &mut Array2<f64> {
        &mut self.resident
    }

    /// Copy the resident buffer into the host mirror.
    pub fn sync_host(&mut self) {
        self.host.assign(&self.resident);
    }

    /// Host mirror as of the last `sync_host()`.
    pub fn host(&self) -> &Array2<f64> {
        &self.host
    }

    /// Zero both buffers; the allocation is reused across runs.
    pub fn reset(&mut self) {
        self.resident.fill(0.0);
        self.host.fill(0.0);
    }
}
