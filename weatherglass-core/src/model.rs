use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{fmt, str::FromStr};

/// Which kind of weather query is being made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    Current,
    Historical,
    Marine,
}

impl QueryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryMode::Current => "current",
            QueryMode::Historical => "historical",
            QueryMode::Marine => "marine",
        }
    }

    pub const fn all() -> &'static [QueryMode] {
        &[QueryMode::Current, QueryMode::Historical, QueryMode::Marine]
    }
}

impl fmt::Display for QueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "current" => Ok(QueryMode::Current),
            "historical" => Ok(QueryMode::Historical),
            "marine" => Ok(QueryMode::Marine),
            _ => Err(format!(
                "Unknown mode '{value}'. Supported modes: current, historical, marine."
            )),
        }
    }
}

/// Unit system requested from the API; conversion is done upstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Units {
    #[default]
    #[serde(rename = "m")]
    Metric,
    #[serde(rename = "f")]
    Fahrenheit,
    #[serde(rename = "s")]
    Scientific,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "m",
            Units::Fahrenheit => "f",
            Units::Scientific => "s",
        }
    }

    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Fahrenheit => "°F",
            Units::Scientific => "K",
        }
    }

    pub fn speed_unit(&self) -> &'static str {
        match self {
            Units::Metric => "km/h",
            Units::Fahrenheit | Units::Scientific => "mph",
        }
    }

    pub fn distance_unit(&self) -> &'static str {
        match self {
            Units::Metric => "km",
            Units::Fahrenheit | Units::Scientific => "mi",
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Metric, Units::Fahrenheit, Units::Scientific]
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Units::Metric => "Metric (°C)",
            Units::Fahrenheit => "Imperial (°F)",
            Units::Scientific => "Scientific (K)",
        };
        f.write_str(label)
    }
}

impl FromStr for Units {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "m" => Ok(Units::Metric),
            "f" => Ok(Units::Fahrenheit),
            "s" => Ok(Units::Scientific),
            _ => Err(format!("Unknown units '{value}'. Expected one of: m, f, s.")),
        }
    }
}

/// Caller-supplied fields for one query. Only the date matching the mode is read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryInput {
    pub location: String,
    pub units: Units,
    pub historical_date: Option<String>,
    pub marine_date: Option<String>,
}

impl QueryInput {
    pub fn new(location: impl Into<String>, units: Units) -> Self {
        Self { location: location.into(), units, ..Self::default() }
    }

    pub fn with_historical_date(mut self, date: impl Into<String>) -> Self {
        self.historical_date = Some(date.into());
        self
    }

    pub fn with_marine_date(mut self, date: impl Into<String>) -> Self {
        self.marine_date = Some(date.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LocationInfo {
    pub name: String,
    pub country: String,
    pub region: String,
    pub timezone_id: String,
    pub local_time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CurrentConditions {
    pub temperature: Option<f64>,
    pub feelslike_temperature: Option<f64>,
    pub description: Option<String>,
    pub icon_url: Option<String>,
    pub humidity_percent: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_direction: Option<String>,
    pub pressure_mb: Option<f64>,
    pub visibility: Option<f64>,
    pub uv_index: Option<f64>,
    pub cloud_cover_percent: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HourlyEntry {
    /// HHMM-style code without separator, e.g. `900` for 09:00.
    pub time_code: u32,
    pub temperature: Option<f64>,
    pub description: Option<String>,
    pub wind_speed: Option<f64>,
    pub wind_direction: Option<String>,
}

impl HourlyEntry {
    pub fn formatted_time(&self) -> String {
        format_time_code(self.time_code)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HistoricalDayEntry {
    pub date: String,
    pub avg_temp: Option<f64>,
    pub min_temp: Option<f64>,
    pub max_temp: Option<f64>,
    pub sun_hours: Option<f64>,
    pub uv_index: Option<f64>,
    pub hourly: Vec<HourlyEntry>,
}

/// Tide payload as returned by the API. Its shape depends on the plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TideData {
    /// The plan did not include tide data.
    #[default]
    None,
    Single(Value),
    Many(Vec<Value>),
}

impl TideData {
    pub fn is_none(&self) -> bool {
        matches!(self, TideData::None)
    }

    /// Records in received order; a single record yields one element.
    pub fn records(&self) -> Vec<&Value> {
        match self {
            TideData::None => Vec::new(),
            TideData::Single(record) => vec![record],
            TideData::Many(records) => records.iter().collect(),
        }
    }
}

/// Normalized outcome of one query, the only shape handed to rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum WeatherResult {
    Current { location: LocationInfo, current: CurrentConditions },
    Historical { location: LocationInfo, day: HistoricalDayEntry },
    Marine { location: LocationInfo, day: HistoricalDayEntry, tides: TideData },
}

impl WeatherResult {
    pub fn mode(&self) -> QueryMode {
        match self {
            WeatherResult::Current { .. } => QueryMode::Current,
            WeatherResult::Historical { .. } => QueryMode::Historical,
            WeatherResult::Marine { .. } => QueryMode::Marine,
        }
    }

    pub fn location(&self) -> &LocationInfo {
        match self {
            WeatherResult::Current { location, .. }
            | WeatherResult::Historical { location, .. }
            | WeatherResult::Marine { location, .. } => location,
        }
    }
}

/// Renders an hourly time code as `HH:MM`: `900` becomes `09:00`.
pub fn format_time_code(code: u32) -> String {
    let padded = format!("{code:04}");
    let (hours, minutes) = padded.split_at(padded.len() - 2);
    format!("{hours}:{minutes}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn time_codes_are_padded_and_split() {
        assert_eq!(format_time_code(900), "09:00");
        assert_eq!(format_time_code(0), "00:00");
        assert_eq!(format_time_code(2330), "23:30");
        assert_eq!(format_time_code(9), "00:09");
    }

    #[test]
    fn units_roundtrip_through_str() {
        for units in Units::all() {
            assert_eq!(units.as_str().parse::<Units>(), Ok(*units));
        }
        assert!("x".parse::<Units>().is_err());
    }

    #[test]
    fn only_metric_reports_kilometres() {
        assert_eq!(Units::Metric.speed_unit(), "km/h");
        assert_eq!(Units::Metric.distance_unit(), "km");
        assert_eq!(Units::Fahrenheit.speed_unit(), "mph");
        assert_eq!(Units::Scientific.distance_unit(), "mi");
    }

    #[test]
    fn mode_roundtrip_through_str() {
        for mode in QueryMode::all() {
            assert_eq!(mode.as_str().parse::<QueryMode>(), Ok(*mode));
        }
        let err = "tidal".parse::<QueryMode>().unwrap_err();
        assert!(err.contains("Unknown mode"));
    }

    #[test]
    fn tide_records_flatten_both_shapes() {
        assert!(TideData::None.records().is_empty());
        assert_eq!(TideData::Single(json!({"h": 1})).records().len(), 1);
        assert_eq!(TideData::Many(vec![json!(1), json!(2)]).records().len(), 2);
    }

    #[test]
    fn absent_tides_serialize_as_null() {
        let value = serde_json::to_value(TideData::None).unwrap();
        assert!(value.is_null());
    }
}
