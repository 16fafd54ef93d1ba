use thiserror::Error;

/// Failure while loading or validating monitor configuration
///
/// Checks themselves never fail; this is only returned at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration source could not be read or extracted
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    /// A JSON document was malformed
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A value was present but unusable
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Load(Box::new(err))
    }
}

pub type Result<T, E = ConfigError> = std::result::Result<T, E>;
