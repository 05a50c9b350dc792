use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read stores file {path}: {source}")]
    StoresFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse stores file: {0}")]
    StoresFileParse(#[from] serde_yaml::Error),

    #[error("stores validation error: {0}")]
    Validation(String),
}

/// Failures from the postal-code → address lookup.
#[derive(Debug, Error)]
pub enum AddressError {
    #[error("invalid postal code \"{0}\": expected 8 digits")]
    InvalidPostalCode(String),

    /// The provider answered, but the code is not registered.
    #[error("postal code {0} not found")]
    NotFound(String),

    /// Network failure, timeout, non-2xx status, or malformed payload.
    #[error("address provider unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum GeoError {
    #[error("no geocoding candidates for \"{0}\"")]
    NotFound(String),

    #[error("geocoding provider unavailable: {0}")]
    Unavailable(String),

    #[error("invalid coordinates ({latitude}, {longitude})")]
    InvalidCoordinates { latitude: f64, longitude: f64 },
}

#[derive(Debug, Error)]
pub enum RateError {
    #[error("carrier rate provider unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("store directory unavailable: {0}")]
    Unavailable(String),
}

/// Terminal failures of a nearby-store lookup.
///
/// Everything scoped to a single store is recovered inside the resolver and
/// never shows up here.
#[derive(Debug, Error)]
pub enum ProximityError {
    #[error("invalid postal code \"{0}\": expected 8 digits")]
    InvalidPostalCode(String),

    #[error("radius {0} is outside the accepted range 1-1000")]
    RadiusOutOfRange(f64),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),
}

impl From<AddressError> for ProximityError {
    fn from(err: AddressError) -> Self {
        match &err {
            AddressError::InvalidPostalCode(raw) => Self::InvalidPostalCode(raw.clone()),
            AddressError::NotFound(_) => Self::NotFound(err.to_string()),
            AddressError::Unavailable(_) => Self::ProviderUnavailable(err.to_string()),
        }
    }
}

impl From<GeoError> for ProximityError {
    fn from(err: GeoError) -> Self {
        match &err {
            GeoError::NotFound(_) => Self::NotFound(err.to_string()),
            GeoError::Unavailable(_) | GeoError::InvalidCoordinates { .. } => {
                Self::ProviderUnavailable(err.to_string())
            }
        }
    }
}

impl From<DirectoryError> for ProximityError {
    fn from(err: DirectoryError) -> Self {
        Self::ProviderUnavailable(err.to_string())
    }
}
