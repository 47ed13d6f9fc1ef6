// ─────────────────────────────────────────────────────────────────────
// SCPN Seismic Core — Stability Checks
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! CFL and spatial-dispersion criteria.
//!
//! Both checks are pure and must be re-run after every forcing
//! mutation: the forcing bandwidth changes per sample while the
//! velocity bounds are cached once per sweep. A violation is a fatal
//! user-input error; the drivers abort rather than adjust the scheme,
//! which would invalidate comparability across samples.

use seismic_types::constants::{CFL_LIMIT, MIN_POINTS_PER_WAVELENGTH};
use seismic_types::error::{SeismicError, SeismicResult};
use seismic_types::state::MeshInfo;

/// Points-per-wavelength criterion: the grid must resolve the shortest
/// wavelength `min_vs / max_freq`. Strictly fewer points than
/// [`MIN_POINTS_PER_WAVELENGTH`] fails.
pub fn check_dispersion_criterion(
    mesh: &MeshInfo,
    max_freq: f64,
    min_shear_velocity: f64,
) -> SeismicResult<()> {
    debug_assert!(min_shear_velocity > 0.0, "fluid-only bound is a caller bug");
    let min_wavelength = min_shear_velocity / max_freq;
    let points_per_wavelength = min_wavelength / mesh.min_spacing();
    if points_per_wavelength < MIN_POINTS_PER_WAVELENGTH {
        return Err(SeismicError::DispersionViolation {
            points_per_wavelength,
            required: MIN_POINTS_PER_WAVELENGTH,
            min_vs: min_shear_velocity,
            max_freq,
        });
    }
    Ok(())
}

/// Courant criterion for the explicit march: `vs_max · dt / h` must
/// not exceed [`CFL_LIMIT`]. Strictly greater than the limit fails;
/// equality passes.
pub fn check_cfl(mesh: &MeshInfo, dt: f64, max_shear_velocity: f64) -> SeismicResult<()> {
    let cfl = max_shear_velocity * dt / mesh.min_spacing();
    if cfl > CFL_LIMIT {
        return Err(SeismicError::CflViolation {
            cfl,
            limit: CFL_LIMIT,
            dt,
        });
    }
    Ok(())
}
