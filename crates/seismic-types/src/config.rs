// ─────────────────────────────────────────────────────────────────────
// SCPN Seismic Core — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::constants::METERS_PER_KM;
use crate::error::{SeismicError, SeismicResult};
use crate::state::MeshInfo;
use serde::{Deserialize, Serialize};

/// The only parameter the sampling drivers know how to sweep.
pub const SAMPLABLE_SIGNAL_PERIOD: &str = "signalPeriod";

/// Top-level simulation configuration, read once from JSON and treated
/// as immutable by every component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    pub run_name: String,
    pub problem: ProblemKind,
    pub mesh: MeshConfig,
    pub general: GeneralSection,
    pub io: IoSection,
    pub material: MaterialSection,
    pub forcing: ForcingSection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sampling: Option<SamplingSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rom: Option<RomSection>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProblemKind {
    Fom,
    Rom,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshConfig {
    pub nr: usize,
    pub ntheta: usize,
    pub radius_min_km: f64,
    pub radius_max_km: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralSection {
    pub num_steps: usize,
    pub time_step_size: f64,
    #[serde(default = "default_true")]
    pub check_dispersion: bool,
    #[serde(default = "default_true")]
    pub check_cfl: bool,
    /// Fold material properties into the Jacobian nonzeros. Ignored by
    /// the sampling and ROM paths, which always fold.
    #[serde(default = "default_true")]
    pub include_material_in_jacobian: bool,
    /// Inject the source only at its grid index instead of assembling
    /// a dense forcing vector each step.
    #[serde(default = "default_true")]
    pub exploit_forcing_sparsity: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IoSection {
    pub output_dir: String,
    #[serde(default)]
    pub enable_snapshot_matrix: bool,
    #[serde(default = "default_snapshot_frequency")]
    pub snapshot_frequency: usize,
    #[serde(default)]
    pub enable_seismogram: bool,
    /// Receiver angles (degrees) on the surface ring.
    #[serde(default)]
    pub receiver_angles_deg: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialSection {
    /// Profile model name; only "prem" is shipped.
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForcingSection {
    pub signal: SignalConfig,
    pub depth_km: f64,
    pub angle_deg: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalConfig {
    pub kind: SignalKind,
    pub period: f64,
    #[serde(default)]
    pub delay: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalKind {
    #[serde(rename = "ricker")]
    Ricker,
    #[serde(rename = "gaussDer")]
    GaussianDerivative,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingSection {
    /// Name of the parameter to sweep; see [`SAMPLABLE_SIGNAL_PERIOD`].
    pub parameter: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RomSection {
    pub rom_size_vp: usize,
    pub rom_size_sp: usize,
    /// Forcing batch width (columns marched together per run).
    pub forcing_size: usize,
    /// NumPy archive with `phi_vp` / `phi_sp` entries. Unused when the
    /// dummy basis is enabled.
    #[serde(default)]
    pub basis_file: Option<String>,
    /// Replace the trained basis with a seeded random one; output
    /// processing is skipped in that mode.
    #[serde(default)]
    pub random_dummy_basis: bool,
    #[serde(default = "default_seed")]
    pub dummy_basis_seed: u64,
}

fn default_true() -> bool {
    true
}

fn default_snapshot_frequency() -> usize {
    1
}

fn default_seed() -> u64 {
    2357
}

impl SimConfig {
    /// Load from a JSON file and validate cross-section invariants.
    pub fn from_file(path: &str) -> SeismicResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Cross-section validation, run before anything expensive is built.
    pub fn validate(&self) -> SeismicResult<()> {
        if self.mesh.nr < 2 || self.mesh.ntheta < 2 {
            return Err(SeismicError::ConfigError(
                "mesh needs at least 2 points per axis".into(),
            ));
        }
        if self.mesh.radius_min_km >= self.mesh.radius_max_km {
            return Err(SeismicError::ConfigError(
                "mesh radius_min_km must be below radius_max_km".into(),
            ));
        }
        if self.general.time_step_size <= 0.0 {
            return Err(SeismicError::ConfigError(
                "time_step_size must be positive".into(),
            ));
        }
        if self.forcing.signal.period <= 0.0 {
            return Err(SeismicError::ConfigError(format!(
                "forcing signal period must be positive, got {}",
                self.forcing.signal.period
            )));
        }
        if self.io.snapshot_frequency == 0 {
            return Err(SeismicError::ConfigError(
                "snapshot_frequency must be at least 1".into(),
            ));
        }
        if let Some(sampling) = &self.sampling {
            if sampling.parameter != SAMPLABLE_SIGNAL_PERIOD {
                return Err(SeismicError::ConfigError(format!(
                    "sampling for parameter '{}' is not supported; only '{}' can be sampled",
                    sampling.parameter, SAMPLABLE_SIGNAL_PERIOD
                )));
            }
            if sampling.values.is_empty() {
                return Err(SeismicError::ConfigError(
                    "sampling values list is empty".into(),
                ));
            }
            if let Some(bad) = sampling.values.iter().find(|&&v| v <= 0.0) {
                return Err(SeismicError::ConfigError(format!(
                    "sampling values are signal periods and must be positive, got {bad}"
                )));
            }
        }
        match self.problem {
            ProblemKind::Rom => {
                let rom = self.rom.as_ref().ok_or_else(|| {
                    SeismicError::ConfigError("rom problem requires a [rom] section".into())
                })?;
                let sampling = self.sampling.as_ref().ok_or_else(|| {
                    SeismicError::ConfigError("rom problem requires a [sampling] section".into())
                })?;
                if rom.forcing_size == 0 {
                    return Err(SeismicError::ConfigError(
                        "rom forcing_size must be at least 1".into(),
                    ));
                }
                if sampling.values.len() % rom.forcing_size != 0 {
                    return Err(SeismicError::ConfigError(format!(
                        "number of sampling values ({}) must be a multiple of forcing_size ({})",
                        sampling.values.len(),
                        rom.forcing_size
                    )));
                }
                if rom.basis_file.is_none() && !rom.random_dummy_basis {
                    return Err(SeismicError::ConfigError(
                        "rom needs either basis_file or random_dummy_basis".into(),
                    ));
                }
            }
            ProblemKind::Fom => {}
        }
        Ok(())
    }

    /// Build the polar mesh from the mesh section (radii in meters).
    pub fn create_mesh(&self) -> MeshInfo {
        MeshInfo::new(
            self.mesh.nr,
            self.mesh.ntheta,
            self.mesh.radius_min_km * METERS_PER_KM,
            self.mesh.radius_max_km * METERS_PER_KM,
        )
    }

    /// Source radius (meters) derived from the configured depth.
    pub fn source_radius_m(&self) -> f64 {
        (self.mesh.radius_max_km - self.forcing.depth_km) * METERS_PER_KM
    }

    /// Source angle in radians.
    pub fn source_angle_rad(&self) -> f64 {
        self.forcing.angle_deg.to_radians()
    }

    /// True when sampling is requested.
    pub fn sampling_enabled(&self) -> bool {
        self.sampling.is_some()
    }
}
