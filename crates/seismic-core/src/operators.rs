// ─────────────────────────────────────────────────────────────────────
// SCPN Seismic Core — Operator Assembly
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! FOM spatial operators for the coupled velocity-stress shear system
//!
//!   ∂v/∂t = (1/ρ) ∇·σ + f,      ∂σ/∂t = μ ∇v,      μ = ρ·vs²
//!
//! discretized with a first-order staggered radial stencil. Two
//! assembly variants exist: material folded into the nonzeros, or the
//! bare stencil with ρ and μ applied at every step (a memory/compute
//! trade-off selected by configuration). The ROM path always folds,
//! since projecting density separately is not supported.

use crate::material::MaterialModel;
use ndarray::Array1;
use ndarray_npy::NpzWriter;
use seismic_math::sparse::{CsrBuilder, CsrMatrix};
use seismic_types::error::{SeismicError, SeismicResult};
use seismic_types::state::{FieldId, MeshInfo};
use std::fs::File;
use std::path::Path;

/// The assembled FOM operators plus the material data cached for the
/// whole sweep (velocity bounds, inverse density, shear modulus).
#[derive(Debug, Clone)]
pub struct ShearOperators {
    mesh: MeshInfo,
    /// Stress → velocity (discrete divergence), `num_vp × num_sp`.
    jac_vp: CsrMatrix,
    /// Velocity → stress (discrete gradient), `num_sp × num_vp`.
    jac_sp: CsrMatrix,
    rho_inv_vp: Array1<f64>,
    mu_sp: Array1<f64>,
    min_vs: f64,
    max_vs: f64,
    material_folded: bool,
}

impl ShearOperators {
    /// Assemble with ρ and μ baked into the nonzero values.
    pub fn with_material(mesh: MeshInfo, material: &dyn MaterialModel) -> SeismicResult<Self> {
        Self::assemble(mesh, material, true)
    }

    /// Assemble the bare stencil; material is applied at apply time.
    pub fn without_material(mesh: MeshInfo, material: &dyn MaterialModel) -> SeismicResult<Self> {
        Self::assemble(mesh, material, false)
    }

    fn assemble(mesh: MeshInfo, material: &dyn MaterialModel, fold: bool) -> SeismicResult<Self> {
        let nr = mesh.nr;
        let nt = mesh.ntheta;
        let n_vp = mesh.num_vp_pts();
        let n_sp = mesh.num_sp_pts();
        let inv_dr = 1.0 / mesh.dr;

        let mut rho_inv_vp = Array1::zeros(n_vp);
        let mut mu_sp = Array1::zeros(n_sp);
        let mut min_vs = f64::INFINITY;
        let mut max_vs: f64 = 0.0;

        // Velocity-point material: density only; vs sampled for bounds.
        for i in 0..nr {
            for j in 0..nt {
                let (rho, vs) = material.compute_at(mesh.vp_radius(i), mesh.theta[j]);
                rho_inv_vp[i * nt + j] = 1.0 / rho;
                max_vs = max_vs.max(vs);
                if vs > 0.0 {
                    min_vs = min_vs.min(vs);
                }
            }
        }

        // Stress-point material: shear modulus μ = ρ·vs².
        for i in 0..nr - 1 {
            for j in 0..nt {
                let (rho, vs) = material.compute_at(mesh.sp_radius(i), mesh.theta[j]);
                mu_sp[i * nt + j] = rho * vs * vs;
                max_vs = max_vs.max(vs);
                if vs > 0.0 {
                    min_vs = min_vs.min(vs);
                }
            }
        }

        if !min_vs.is_finite() {
            return Err(SeismicError::ConfigError(
                "domain contains no solid material (shear speed is zero everywhere)".into(),
            ));
        }

        // Divergence: v(i,j) couples to the staggered stresses above
        // and below; one-sided at the domain edges.
        let mut b_vp = CsrBuilder::new(n_sp);
        for i in 0..nr {
            for j in 0..nt {
                let scale = if fold { rho_inv_vp[i * nt + j] } else { 1.0 };
                let mut entries: Vec<(usize, f64)> = Vec::with_capacity(2);
                if i > 0 {
                    entries.push(((i - 1) * nt + j, -inv_dr * scale));
                }
                if i < nr - 1 {
                    entries.push((i * nt + j, inv_dr * scale));
                }
                b_vp.push_row(&entries);
            }
        }
        let jac_vp = b_vp.finish();

        // Gradient: σ(i+1/2, j) couples to the adjacent velocities.
        let mut b_sp = CsrBuilder::new(n_vp);
        for i in 0..nr - 1 {
            for j in 0..nt {
                let scale = if fold { mu_sp[i * nt + j] } else { 1.0 };
                b_sp.push_row(&[
                    ((i + 1) * nt + j, inv_dr * scale),
                    (i * nt + j, -inv_dr * scale),
                ]);
            }
        }
        let jac_sp = b_sp.finish();

        Ok(ShearOperators {
            mesh,
            jac_vp,
            jac_sp,
            rho_inv_vp,
            mu_sp,
            min_vs,
            max_vs,
            material_folded: fold,
        })
    }

    pub fn mesh(&self) -> &MeshInfo {
        &self.mesh
    }

    pub fn jac_vp(&self) -> &CsrMatrix {
        &self.jac_vp
    }

    pub fn jac_sp(&self) -> &CsrMatrix {
        &self.jac_sp
    }

    /// Whether ρ and μ are baked into the Jacobian nonzeros.
    pub fn material_folded(&self) -> bool {
        self.material_folded
    }

    /// Inverse density at the velocity points; also needed by the
    /// forcing injection when material is folded.
    pub fn rho_inv_vp(&self) -> &Array1<f64> {
        &self.rho_inv_vp
    }

    /// Shear modulus at the stress points.
    pub fn mu_sp(&self) -> &Array1<f64> {
        &self.mu_sp
    }

    /// Minimum shear speed over solid points. Fluid (vs = 0) regions
    /// are excluded so the dispersion criterion stays meaningful.
    pub fn min_shear_velocity(&self) -> f64 {
        self.min_vs
    }

    pub fn max_shear_velocity(&self) -> f64 {
        self.max_vs
    }

    /// Persist the grid coordinates of one field as an `.npz` archive.
    /// Coordinates are sample-invariant, so callers write them once
    /// per sweep.
    pub fn write_coordinates(&self, field: FieldId, output_dir: &str) -> SeismicResult<()> {
        let (radius, theta) = match field {
            FieldId::Vp => self.mesh.vp_coordinates(),
            FieldId::Sp => self.mesh.sp_coordinates(),
        };
        std::fs::create_dir_all(output_dir)?;
        let path = Path::new(output_dir).join(format!("coords_{}.npz", field.tag()));
        let mut npz = NpzWriter::new(File::create(&path)?);
        npz.add_array("radius", &radius)
            .map_err(|e| SeismicError::ArrayIo(e.to_string()))?;
        npz.add_array("theta", &theta)
            .map_err(|e| SeismicError::ArrayIo(e.to_string()))?;
        npz.finish()
            .map_err(|e| SeismicError::ArrayIo(e.to_string()))?;
        Ok(())
    }
}
