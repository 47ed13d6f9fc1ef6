// ─────────────────────────────────────────────────────────────────────
// SCPN Seismic Core — Material Model
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Radially-layered material profiles.
//!
//! The PREM profile follows Dziewonski & Anderson (1981), "Preliminary
//! reference Earth model", Phys. Earth Plan. Int. 25:297-356.

use seismic_types::config::MaterialSection;
use seismic_types::constants::{EARTH_SURFACE_RADIUS_KM, METERS_PER_KM};
use seismic_types::error::{SeismicError, SeismicResult};

/// Maps a spatial location to density and shear-wave speed.
///
/// Implementations are stateless and immutable; they are built once per
/// sweep and queried during operator assembly only.
pub trait MaterialModel {
    /// Density (kg/m³) and shear-wave speed (m/s) at a point given by
    /// radius from the planet center (meters) and polar angle (radians).
    fn compute_at(&self, radius_m: f64, angle_rad: f64) -> (f64, f64);
}

/// The PREM radial profile. Radius bands are half-open on the lower
/// side; the outer core is fluid and carries zero shear speed.
#[derive(Debug, Clone, Copy, Default)]
pub struct PremMaterialModel;

impl MaterialModel for PremMaterialModel {
    fn compute_at(&self, radius_m: f64, _angle_rad: f64) -> (f64, f64) {
        let r_km = radius_m / METERS_PER_KM;
        let x = r_km / EARTH_SURFACE_RADIUS_KM;
        let x_sq = x * x;
        let x_cu = x * x * x;

        // Native profile units: g/cm³ and km/s.
        let (rho, vs) = if r_km >= 6356.0 {
            (2.6, 3.2)
        } else if r_km >= 6346.6 {
            (2.9, 3.9)
        } else if r_km >= 6151.0 {
            // LID and low-velocity zone share one polynomial pair
            (2.691 + 0.6924 * x, 2.1519 + 2.3481 * x)
        } else if r_km >= 5971.0 {
            // transition zone
            (7.1089 - 3.8045 * x, 8.9496 - 4.4597 * x)
        } else if r_km >= 5771.0 {
            // transition zone
            (11.2494 - 8.0298 * x, 22.3512 - 18.5856 * x)
        } else if r_km >= 5701.0 {
            // transition zone
            (5.3197 - 1.4836 * x, 9.9839 - 4.9324 * x)
        } else if r_km >= 5600.0 {
            // lower mantle part 3
            (
                7.9565 - 6.4761 * x + 5.5283 * x_sq - 3.0807 * x_cu,
                22.3459 - 17.2473 * x - 2.0834 * x_sq + 0.9783 * x_cu,
            )
        } else if r_km >= 3630.0 {
            // lower mantle part 2
            (
                7.9565 - 6.4761 * x + 5.5283 * x_sq - 3.0807 * x_cu,
                11.1671 - 13.7818 * x + 17.4575 * x_sq - 9.2777 * x_cu,
            )
        } else if r_km >= 3480.0 {
            // lower mantle part 1
            (
                7.9565 - 6.4761 * x + 5.5283 * x_sq - 3.0807 * x_cu,
                6.9254 + 1.4672 * x - 2.0834 * x_sq + 0.9783 * x_cu,
            )
        } else if r_km >= 1221.5 {
            // outer core: fluid, no shear wave support
            (12.5815 - 1.2638 * x - 3.6426 * x_sq - 5.5281 * x_cu, 0.0)
        } else {
            // inner core
            (13.0885 - 8.8381 * x_sq, 3.6678 - 4.4475 * x_sq)
        };

        // g/cm³ → kg/m³ and km/s → m/s
        (rho * METERS_PER_KM, vs * METERS_PER_KM)
    }
}

/// Select the material model named by the configuration.
pub fn create_material_model(
    section: &MaterialSection,
) -> SeismicResult<Box<dyn MaterialModel + Send + Sync>> {
    match section.model.as_str() {
        "prem" => Ok(Box::new(PremMaterialModel)),
        other => Err(SeismicError::ConfigError(format!(
            "unknown material model '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KM: f64 = METERS_PER_KM;

    fn rel_close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn test_crust_values() {
        let m = PremMaterialModel;
        let (rho, vs) = m.compute_at(6360.0 * KM, 0.0);
        assert!((rho - 2600.0).abs() < 1e-9);
        assert!((vs - 3200.0).abs() < 1e-9);
    }

    #[test]
    fn test_outer_core_is_fluid() {
        let m = PremMaterialModel;
        let (rho, vs) = m.compute_at(2500.0 * KM, 1.0);
        assert_eq!(vs, 0.0, "outer core must carry zero shear speed");
        assert!(rho > 9000.0, "outer core density should exceed the mantle");
    }

    #[test]
    fn test_inner_core_supports_shear() {
        let m = PremMaterialModel;
        let (_, vs) = m.compute_at(1000.0 * KM, 0.0);
        assert!(vs > 3000.0);
    }

    /// Polynomial-to-polynomial band edges are continuous; the two
    /// crust steps and the major discontinuities (670 km, CMB, ICB)
    /// are intentional jumps and excluded here.
    #[test]
    fn test_continuity_at_polynomial_boundaries() {
        let m = PremMaterialModel;
        let continuous_edges_km = [6291.0, 5600.0, 3630.0];
        let eps = 1e-6;
        for &edge in &continuous_edges_km {
            let (rho_lo, vs_lo) = m.compute_at((edge - eps) * KM, 0.3);
            let (rho_hi, vs_hi) = m.compute_at((edge + eps) * KM, 0.3);
            assert!(
                rel_close(rho_lo, rho_hi, 1e-3),
                "rho discontinuous at {edge} km: {rho_lo} vs {rho_hi}"
            );
            assert!(
                rel_close(vs_lo, vs_hi, 1e-3),
                "vs discontinuous at {edge} km: {vs_lo} vs {vs_hi}"
            );
        }
    }

    #[test]
    fn test_band_edges_leave_no_gap() {
        // Evaluating exactly on each documented edge must hit the band
        // above it (half-open lower side), never panic or fall through.
        let m = PremMaterialModel;
        for edge_km in [6356.0, 6346.6, 6151.0, 5971.0, 5771.0, 5701.0, 5600.0, 3630.0, 3480.0, 1221.5]
        {
            let (rho, _) = m.compute_at(edge_km * KM, 0.0);
            assert!(rho > 0.0 && rho.is_finite());
        }
    }

    #[test]
    fn test_factory_rejects_unknown_model() {
        let section = MaterialSection {
            model: "ak135".into(),
        };
        assert!(create_material_model(&section).is_err());
        let section = MaterialSection {
            model: "prem".into(),
        };
        assert!(create_material_model(&section).is_ok());
    }
}
