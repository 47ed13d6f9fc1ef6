use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeismicError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Precondition violated: {0}")]
    Precondition(String),

    #[error("Dispersion criterion violated: {points_per_wavelength:.3} points per wavelength, need at least {required:.1} (min vs = {min_vs:.1} m/s, max frequency = {max_freq:.4} Hz)")]
    DispersionViolation {
        points_per_wavelength: f64,
        required: f64,
        min_vs: f64,
        max_freq: f64,
    },

    #[error("CFL criterion violated: cfl = {cfl:.6} exceeds limit {limit:.6} (dt = {dt:.3e} s)")]
    CflViolation { cfl: f64, limit: f64, dt: f64 },

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Array IO error: {0}")]
    ArrayIo(String),
}

pub type SeismicResult<T> = Result<T, SeismicError>;
