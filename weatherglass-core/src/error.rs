use thiserror::Error;

/// Malformed caller input, detected before any network access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a location.")]
    EmptyLocation,

    #[error("Please choose a historical date.")]
    MissingHistoricalDate,

    #[error("Please choose a marine date.")]
    MissingMarineDate,
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::EmptyLocation => "empty-location",
            ValidationError::MissingHistoricalDate => "missing-historical-date",
            ValidationError::MissingMarineDate => "missing-marine-date",
        }
    }
}

/// The API reported success but the payload could not be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataShapeError {
    #[error("unexpected response: no location block")]
    MissingLocation,

    #[error("unexpected response: no current block")]
    MissingCurrent,

    #[error("unexpected response: no historical block")]
    MissingHistorical,
}

impl DataShapeError {
    pub fn code(&self) -> &'static str {
        match self {
            DataShapeError::MissingLocation => "missing-location",
            DataShapeError::MissingCurrent => "missing-current",
            DataShapeError::MissingHistorical => "missing-historical",
        }
    }
}

/// Every failure a single weather query can end with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeatherError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Message reported by the upstream service, passed through verbatim.
    #[error("{0}")]
    Api(String),

    #[error(transparent)]
    DataShape(#[from] DataShapeError),

    #[error("Request failed: {0}")]
    Transport(String),
}

impl WeatherError {
    pub fn kind(&self) -> &'static str {
        match self {
            WeatherError::Configuration(_) => "configuration",
            WeatherError::Validation(_) => "validation",
            WeatherError::Api(_) => "api",
            WeatherError::DataShape(_) => "data-shape",
            WeatherError::Transport(_) => "transport",
        }
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        WeatherError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_codes_are_stable() {
        assert_eq!(ValidationError::EmptyLocation.code(), "empty-location");
        assert_eq!(ValidationError::MissingHistoricalDate.code(), "missing-historical-date");
        assert_eq!(ValidationError::MissingMarineDate.code(), "missing-marine-date");
    }

    #[test]
    fn data_shape_errors_read_as_unexpected_response() {
        let err = WeatherError::from(DataShapeError::MissingCurrent);
        assert_eq!(err.kind(), "data-shape");
        assert!(err.to_string().starts_with("unexpected response"));
    }

    #[test]
    fn api_error_message_is_verbatim() {
        let err = WeatherError::Api("invalid_access_key".into());
        assert_eq!(err.to_string(), "invalid_access_key");
        assert_eq!(err.kind(), "api");
    }
}
