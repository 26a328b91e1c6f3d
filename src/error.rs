use thiserror::Error;

/// Lookup and configuration failures. Ids are generated internally, so a
/// missing zone or planet means a bug upstream rather than bad input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("zone not found: {0}")]
    ZoneNotFound(String),

    #[error("planet not found: {0}")]
    PlanetNotFound(String),

    #[error("queen not found: {0}")]
    QueenNotFound(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
