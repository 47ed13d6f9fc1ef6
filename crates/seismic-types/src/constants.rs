// ─────────────────────────────────────────────────────────────────────
// SCPN Seismic Core — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
/// Earth surface radius (km), PREM reference value.
pub const EARTH_SURFACE_RADIUS_KM: f64 = 6371.0;

/// Unit conversion factor shared by the profile model: km → m, km/s → m/s
/// and g/cm³ → kg/m³ all scale by 1000.
pub const METERS_PER_KM: f64 = 1000.0;

/// Minimum grid points per shortest wavelength for the dispersion check.
/// Strictly fewer points fails the check.
pub const MIN_POINTS_PER_WAVELENGTH: f64 = 8.0;

/// Stability limit for the explicit leapfrog march.
/// A Courant number strictly greater than this fails the CFL check.
pub const CFL_LIMIT: f64 = 0.25;
