// ─────────────────────────────────────────────────────────────────────
// SCPN Seismic Core — ROM Basis
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Reduced-basis loading and operator projection.
//!
//! A basis pair (one per field) either comes from a trained archive or
//! is generated as seeded Gaussian noise for performance work where no
//! offline stage exists. The dummy basis is reproducible across runs
//! through its seed; its outputs carry no physical meaning.

use ndarray::Array2;
use ndarray_npy::NpzReader;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};
use seismic_math::projection::project_operator;
use seismic_types::config::RomSection;
use seismic_types::error::{SeismicError, SeismicResult};
use seismic_types::state::MeshInfo;
use std::fs::File;
use tracing::info;

use crate::operators::ShearOperators;

/// Dense reduced bases for the two fields, column-orthonormal when
/// trained, arbitrary when generated as a dummy.
#[derive(Debug, Clone)]
pub struct RomBasis {
    phi_vp: Array2<f64>,
    phi_sp: Array2<f64>,
}

impl RomBasis {
    /// Build according to the ROM section: load the archive or draw a
    /// seeded random stand-in.
    pub fn from_config(rom: &RomSection, mesh: &MeshInfo) -> SeismicResult<Self> {
        let basis = if rom.random_dummy_basis {
            info!(
                seed = rom.dummy_basis_seed,
                "using seeded random dummy basis"
            );
            Self::random_dummy(mesh, rom.rom_size_vp, rom.rom_size_sp, rom.dummy_basis_seed)
        } else {
            let path = rom.basis_file.as_deref().ok_or_else(|| {
                SeismicError::ConfigError("rom basis_file is missing".into())
            })?;
            Self::from_npz(path)?
        };
        basis.validate_shapes(mesh, rom.rom_size_vp, rom.rom_size_sp)?;
        Ok(basis)
    }

    /// Load `phi_vp` / `phi_sp` from a NumPy archive.
    pub fn from_npz(path: &str) -> SeismicResult<Self> {
        let mut npz = NpzReader::new(File::open(path)?)
            .map_err(|e| SeismicError::ArrayIo(format!("{path}: {e}")))?;
        let phi_vp = read_entry(&mut npz, "phi_vp")?;
        let phi_sp = read_entry(&mut npz, "phi_sp")?;
        info!(
            path,
            vp_cols = phi_vp.ncols(),
            sp_cols = phi_sp.ncols(),
            "basis archive loaded"
        );
        Ok(RomBasis { phi_vp, phi_sp })
    }

    /// Seeded standard-normal entries; deterministic for a given seed
    /// and shape.
    pub fn random_dummy(mesh: &MeshInfo, size_vp: usize, size_sp: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut draw = |rows: usize, cols: usize| {
            Array2::from_shape_simple_fn((rows, cols), || -> f64 {
                StandardNormal.sample(&mut rng)
            })
        };
        let phi_vp = draw(mesh.num_vp_pts(), size_vp);
        let phi_sp = draw(mesh.num_sp_pts(), size_sp);
        RomBasis { phi_vp, phi_sp }
    }

    fn validate_shapes(
        &self,
        mesh: &MeshInfo,
        size_vp: usize,
        size_sp: usize,
    ) -> SeismicResult<()> {
        let want_vp = (mesh.num_vp_pts(), size_vp);
        let want_sp = (mesh.num_sp_pts(), size_sp);
        if self.phi_vp.dim() != want_vp {
            return Err(SeismicError::ShapeMismatch(format!(
                "phi_vp is {:?}, mesh and rom_size_vp require {:?}",
                self.phi_vp.dim(),
                want_vp
            )));
        }
        if self.phi_sp.dim() != want_sp {
            return Err(SeismicError::ShapeMismatch(format!(
                "phi_sp is {:?}, mesh and rom_size_sp require {:?}",
                self.phi_sp.dim(),
                want_sp
            )));
        }
        Ok(())
    }

    pub fn phi_vp(&self) -> &Array2<f64> {
        &self.phi_vp
    }

    pub fn phi_sp(&self) -> &Array2<f64> {
        &self.phi_sp
    }

    pub fn rom_size_vp(&self) -> usize {
        self.phi_vp.ncols()
    }

    pub fn rom_size_sp(&self) -> usize {
        self.phi_sp.ncols()
    }
}

/// The two projected Jacobians, dense and small. Computed once per
/// sweep from material-folded FOM operators.
#[derive(Debug, Clone)]
pub struct RomOperators {
    /// `phi_vpᵀ · J_vp · phi_sp`, `rom_size_vp × rom_size_sp`.
    pub jac_vp_rom: Array2<f64>,
    /// `phi_spᵀ · J_sp · phi_vp`, `rom_size_sp × rom_size_vp`.
    pub jac_sp_rom: Array2<f64>,
}

impl RomOperators {
    /// Galerkin projection of both operators. Requires folded FOM
    /// operators: a bare stencil would project density incorrectly.
    pub fn project(ops: &ShearOperators, basis: &RomBasis) -> SeismicResult<Self> {
        if !ops.material_folded() {
            return Err(SeismicError::Precondition(
                "reduced operators require material folded into the Jacobians".into(),
            ));
        }
        let jac_vp_rom = project_operator(basis.phi_vp(), ops.jac_vp(), basis.phi_sp())?;
        let jac_sp_rom = project_operator(basis.phi_sp(), ops.jac_sp(), basis.phi_vp())?;
        info!(
            vp_dim = ?jac_vp_rom.dim(),
            sp_dim = ?jac_sp_rom.dim(),
            "reduced operators projected"
        );
        Ok(RomOperators {
            jac_vp_rom,
            jac_sp_rom,
        })
    }
}

fn read_entry(
    npz: &mut NpzReader<File>,
    name: &str,
) -> SeismicResult<Array2<f64>> {
    npz.by_name(name)
        .or_else(|_| npz.by_name(&format!("{name}.npy")))
        .map_err(|e| SeismicError::ArrayIo(format!("entry '{name}': {e}")))
}
