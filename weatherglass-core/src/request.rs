use reqwest::Url;
use std::fmt;
use tracing::debug;

use crate::{
    error::{ValidationError, WeatherError},
    model::{QueryInput, QueryMode},
};

const ACCESS_KEY_PARAM: &str = "access_key";

/// The two weatherstack endpoints the three modes map onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Current,
    Historical,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Current => "/current",
            Endpoint::Historical => "/historical",
        }
    }
}

/// A composed query: endpoint plus ordered, unique parameters.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub endpoint: Endpoint,
    params: Vec<(String, String)>,
}

impl ApiRequest {
    fn new(endpoint: Endpoint) -> Self {
        Self { endpoint, params: Vec::new() }
    }

    /// Sets `key`, replacing an earlier value in place so keys stay unique.
    fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.params.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value,
            None => self.params.push((key.to_string(), value)),
        }
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// Full GET url: `{base}{endpoint}?{form-urlencoded params}`.
    pub fn url(&self, base_url: &str) -> Result<Url, WeatherError> {
        let raw = format!("{}{}", base_url.trim_end_matches('/'), self.endpoint.path());
        Url::parse_with_params(&raw, &self.params)
            .map_err(|e| WeatherError::Configuration(format!("invalid base URL '{base_url}': {e}")))
    }

    /// Same as [`ApiRequest::url`] with the access key masked, for logs and errors.
    pub fn redacted_url(&self, base_url: &str) -> String {
        let mut masked = self.clone();
        if masked.param(ACCESS_KEY_PARAM).is_some() {
            masked.set(ACCESS_KEY_PARAM, "***");
        }
        masked
            .url(base_url)
            .map(String::from)
            .unwrap_or_else(|_| format!("{base_url}{}", self.endpoint.path()))
    }
}

impl fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<(&str, &str)> = self
            .params
            .iter()
            .map(|(k, v)| {
                let shown = if k == ACCESS_KEY_PARAM { "***" } else { v.as_str() };
                (k.as_str(), shown)
            })
            .collect();

        f.debug_struct("ApiRequest")
            .field("endpoint", &self.endpoint)
            .field("params", &params)
            .finish()
    }
}

/// Turns a mode and caller input into an [`ApiRequest`]. Holds only the credential.
#[derive(Clone)]
pub struct RequestBuilder {
    access_key: String,
}

impl RequestBuilder {
    pub fn new(access_key: impl Into<String>) -> Self {
        Self { access_key: access_key.into() }
    }

    pub fn build(&self, mode: QueryMode, input: &QueryInput) -> Result<ApiRequest, WeatherError> {
        let location = input.location.trim();
        if location.is_empty() {
            return Err(ValidationError::EmptyLocation.into());
        }

        let endpoint = match mode {
            QueryMode::Current => Endpoint::Current,
            QueryMode::Historical | QueryMode::Marine => Endpoint::Historical,
        };

        let mut request = ApiRequest::new(endpoint);
        request.set(ACCESS_KEY_PARAM, self.access_key.as_str());
        request.set("query", location);
        request.set("units", input.units.as_str());

        match mode {
            QueryMode::Current => {}
            QueryMode::Historical => {
                let date = required_date(input.historical_date.as_deref())
                    .ok_or(ValidationError::MissingHistoricalDate)?;
                request.set("historical_date", date);
                request.set("hourly", "1");
            }
            QueryMode::Marine => {
                let date = required_date(input.marine_date.as_deref())
                    .ok_or(ValidationError::MissingMarineDate)?;
                request.set("historical_date", date);
                request.set("hourly", "1");
                request.set("tide", "1");
            }
        }

        debug!(%mode, ?request, "composed weatherstack request");
        Ok(request)
    }
}

impl fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBuilder").field("access_key", &"***").finish()
    }
}

fn required_date(date: Option<&str>) -> Option<&str> {
    date.filter(|d| !d.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Units;

    fn builder() -> RequestBuilder {
        RequestBuilder::new("KEY")
    }

    fn keys(request: &ApiRequest) -> Vec<&str> {
        request.params().iter().map(|(k, _)| k.as_str()).collect()
    }

    #[test]
    fn current_uses_base_params_only() {
        let input =
            QueryInput::new("  New York ", Units::Fahrenheit).with_historical_date("2019-09-07");
        let request = builder().build(QueryMode::Current, &input).unwrap();

        assert_eq!(request.endpoint, Endpoint::Current);
        assert_eq!(keys(&request), ["access_key", "query", "units"]);
        assert_eq!(request.param("query"), Some("New York"));
        assert_eq!(request.param("units"), Some("f"));
    }

    #[test]
    fn historical_adds_date_and_hourly() {
        let input = QueryInput::new("Paris", Units::Metric)
            .with_historical_date("2019-09-07")
            .with_marine_date("2001-01-01");
        let request = builder().build(QueryMode::Historical, &input).unwrap();

        assert_eq!(request.endpoint, Endpoint::Historical);
        assert_eq!(keys(&request), ["access_key", "query", "units", "historical_date", "hourly"]);
        assert_eq!(request.param("historical_date"), Some("2019-09-07"));
        assert_eq!(request.param("hourly"), Some("1"));
    }

    #[test]
    fn marine_uses_marine_date_and_tide_flag() {
        let input = QueryInput::new("Brest", Units::Scientific)
            .with_historical_date("2001-01-01")
            .with_marine_date("2019-09-07");
        let request = builder().build(QueryMode::Marine, &input).unwrap();

        assert_eq!(request.endpoint, Endpoint::Historical);
        assert_eq!(
            keys(&request),
            ["access_key", "query", "units", "historical_date", "hourly", "tide"]
        );
        assert_eq!(request.param("historical_date"), Some("2019-09-07"));
        assert_eq!(request.param("tide"), Some("1"));
    }

    #[test]
    fn blank_location_is_rejected_for_every_mode() {
        let input = QueryInput::new("   ", Units::Metric)
            .with_historical_date("2019-09-07")
            .with_marine_date("2019-09-07");

        for mode in QueryMode::all() {
            let err = builder().build(*mode, &input).unwrap_err();
            assert_eq!(err, WeatherError::Validation(ValidationError::EmptyLocation));
        }
    }

    #[test]
    fn missing_dates_are_rejected() {
        let input = QueryInput::new("Oslo", Units::Metric)
            .with_historical_date("")
            .with_marine_date("");

        let err = builder().build(QueryMode::Historical, &input).unwrap_err();
        assert_eq!(err, WeatherError::Validation(ValidationError::MissingHistoricalDate));

        let err = builder().build(QueryMode::Marine, &input).unwrap_err();
        assert_eq!(err, WeatherError::Validation(ValidationError::MissingMarineDate));

        let bare = QueryInput::new("Oslo", Units::Metric);
        assert!(builder().build(QueryMode::Historical, &bare).is_err());
        assert!(builder().build(QueryMode::Marine, &bare).is_err());
    }

    #[test]
    fn url_is_encoded_once_and_roundtrips() {
        let input =
            QueryInput::new("São Paulo & Co", Units::Metric).with_historical_date("2019-09-07");
        let request = builder().build(QueryMode::Historical, &input).unwrap();
        let url = request.url("https://api.weatherstack.com/").unwrap();

        assert_eq!(url.path(), "/historical");
        assert!(url.as_str().contains("query=S%C3%A3o+Paulo+%26+Co"));

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs, request.params());

        let location = pairs.iter().find(|(k, _)| k == "query").map(|(_, v)| v.as_str());
        let date = pairs.iter().find(|(k, _)| k == "historical_date").map(|(_, v)| v.as_str());
        assert_eq!(location, Some("São Paulo & Co"));
        assert_eq!(date, Some("2019-09-07"));
    }

    #[test]
    fn percent_sequences_in_input_are_not_decoded() {
        let input = QueryInput::new("50%25 chance", Units::Metric);
        let request = builder().build(QueryMode::Current, &input).unwrap();
        let url = request.url("https://api.weatherstack.com").unwrap();

        let query = url.query_pairs().find(|(k, _)| k == "query").map(|(_, v)| v.into_owned());
        assert_eq!(query.as_deref(), Some("50%25 chance"));
    }

    #[test]
    fn access_key_is_hidden_from_debug_and_redacted_url() {
        let input = QueryInput::new("Rome", Units::Metric);
        let request = RequestBuilder::new("SECRET").build(QueryMode::Current, &input).unwrap();

        assert!(!format!("{request:?}").contains("SECRET"));
        let redacted = request.redacted_url("https://api.weatherstack.com");
        assert!(!redacted.contains("SECRET"));
        assert!(redacted.contains("query=Rome"));
    }

    #[test]
    fn bad_base_url_is_a_configuration_error() {
        let input = QueryInput::new("Rome", Units::Metric);
        let request = builder().build(QueryMode::Current, &input).unwrap();
        let err = request.url("not a url").unwrap_err();
        assert_eq!(err.kind(), "configuration");
    }
}
