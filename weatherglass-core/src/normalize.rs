//! Interprets raw weatherstack payloads into a [`WeatherResult`].
//!
//! The payload is loosely structured and varies by mode and plan. Blocks are
//! looked up by hand, then read into the private `Ws*` shapes below, whose
//! fields never fail: a value of an unexpected type is left unset.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

use crate::{
    error::{DataShapeError, WeatherError},
    model::{
        CurrentConditions, HistoricalDayEntry, HourlyEntry, LocationInfo, QueryMode, TideData,
        WeatherResult,
    },
};

const UNKNOWN_API_ERROR: &str = "unknown API error";

pub fn normalize(mode: QueryMode, raw: &Value) -> Result<WeatherResult, WeatherError> {
    if let Some(message) = api_error_message(raw) {
        warn!(%mode, %message, "weatherstack returned an error payload");
        return Err(WeatherError::Api(message));
    }

    normalize_success(mode, raw).map_err(|err| {
        warn!(%mode, code = err.code(), "could not interpret weatherstack response");
        WeatherError::DataShape(err)
    })
}

/// `Some(message)` when the payload carries a truthy `error` field.
pub fn api_error_message(raw: &Value) -> Option<String> {
    let error = present(raw, "error")?;
    let falsy = match error {
        Value::Bool(flag) => !flag,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        _ => false,
    };
    if falsy {
        return None;
    }

    let message = error
        .get("info")
        .and_then(Value::as_str)
        .filter(|info| !info.is_empty())
        .unwrap_or(UNKNOWN_API_ERROR);

    Some(message.to_string())
}

fn normalize_success(mode: QueryMode, raw: &Value) -> Result<WeatherResult, DataShapeError> {
    let location: WsLocation = block(raw, "location").ok_or(DataShapeError::MissingLocation)?;
    let location = LocationInfo::from(location);

    match mode {
        QueryMode::Current => {
            let current: WsCurrent =
                block(raw, "current").ok_or(DataShapeError::MissingCurrent)?;
            Ok(WeatherResult::Current { location, current: current.into() })
        }
        QueryMode::Historical => {
            let (day, _) = first_historical_entry(raw)?;
            Ok(WeatherResult::Historical { location, day })
        }
        QueryMode::Marine => {
            let (day, tides) = first_historical_entry(raw)?;
            Ok(WeatherResult::Marine { location, day, tides })
        }
    }
}

/// The `historical` block as `(date key, entry)` pairs in the order received.
pub fn historical_entries(raw: &Value) -> Vec<(String, Value)> {
    present(raw, "historical")
        .and_then(Value::as_object)
        .map(|days| days.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
        .unwrap_or_default()
}

/// One date is requested, so one date key is expected back. If the API ever
/// sends more, the first entry wins.
fn first_historical_entry(
    raw: &Value,
) -> Result<(HistoricalDayEntry, TideData), DataShapeError> {
    let entries = historical_entries(raw);
    let (_, entry) = entries.into_iter().next().ok_or(DataShapeError::MissingHistorical)?;
    let day: WsHistoricalDay = decode(&entry).ok_or(DataShapeError::MissingHistorical)?;

    // Hours without a usable time code are dropped, the rest of the day is kept.
    let hourly: Vec<HourlyEntry> = present(&entry, "hourly")
        .and_then(Value::as_array)
        .map(|hours| {
            hours
                .iter()
                .filter_map(decode::<WsHour>)
                .filter_map(WsHour::into_entry)
                .collect()
        })
        .unwrap_or_default();

    Ok((day.into_entry(hourly), tide_data(&entry)))
}

/// `tides` if present, else `tide`, else nothing.
fn tide_data(entry: &Value) -> TideData {
    match present(entry, "tides").or_else(|| present(entry, "tide")) {
        None => TideData::None,
        Some(Value::Array(records)) => TideData::Many(records.clone()),
        Some(record) => TideData::Single(record.clone()),
    }
}

/// A field counts as present when it exists and is not JSON `null`.
fn present<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key).filter(|v| !v.is_null())
}

fn block<T: for<'de> Deserialize<'de>>(raw: &Value, key: &str) -> Option<T> {
    present(raw, key).and_then(decode)
}

/// Only objects carry a block; anything else reads as absent.
fn decode<T: for<'de> Deserialize<'de>>(value: &Value) -> Option<T> {
    value.is_object().then(|| T::deserialize(value).ok()).flatten()
}

#[derive(Debug, Deserialize)]
struct WsLocation {
    #[serde(default, deserialize_with = "text")]
    name: Option<String>,
    #[serde(default, deserialize_with = "text")]
    country: Option<String>,
    #[serde(default, deserialize_with = "text")]
    region: Option<String>,
    #[serde(default, deserialize_with = "text")]
    timezone_id: Option<String>,
    #[serde(default, deserialize_with = "text")]
    localtime: Option<String>,
}

impl From<WsLocation> for LocationInfo {
    fn from(loc: WsLocation) -> Self {
        Self {
            name: loc.name.unwrap_or_default(),
            country: loc.country.unwrap_or_default(),
            region: loc.region.unwrap_or_default(),
            timezone_id: loc.timezone_id.unwrap_or_default(),
            local_time: loc.localtime.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WsCurrent {
    #[serde(default, deserialize_with = "number")]
    temperature: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    feelslike: Option<f64>,
    #[serde(default, deserialize_with = "first_text")]
    weather_descriptions: Option<String>,
    #[serde(default, deserialize_with = "first_text")]
    weather_icons: Option<String>,
    #[serde(default, deserialize_with = "number")]
    humidity: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    wind_speed: Option<f64>,
    #[serde(default, deserialize_with = "text")]
    wind_dir: Option<String>,
    #[serde(default, deserialize_with = "number")]
    pressure: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    visibility: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    uv_index: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    cloudcover: Option<f64>,
}

impl From<WsCurrent> for CurrentConditions {
    fn from(cur: WsCurrent) -> Self {
        Self {
            temperature: cur.temperature,
            feelslike_temperature: cur.feelslike,
            description: cur.weather_descriptions,
            icon_url: cur.weather_icons,
            humidity_percent: cur.humidity,
            wind_speed: cur.wind_speed,
            wind_direction: cur.wind_dir,
            pressure_mb: cur.pressure,
            visibility: cur.visibility,
            uv_index: cur.uv_index,
            cloud_cover_percent: cur.cloudcover,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WsHistoricalDay {
    #[serde(default, deserialize_with = "text")]
    date: Option<String>,
    #[serde(default, deserialize_with = "number")]
    avgtemp: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    mintemp: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    maxtemp: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    sunhour: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    uv_index: Option<f64>,
}

impl WsHistoricalDay {
    fn into_entry(self, hourly: Vec<HourlyEntry>) -> HistoricalDayEntry {
        HistoricalDayEntry {
            date: self.date.unwrap_or_default(),
            avg_temp: self.avgtemp,
            min_temp: self.mintemp,
            max_temp: self.maxtemp,
            sun_hours: self.sunhour,
            uv_index: self.uv_index,
            hourly,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WsHour {
    #[serde(default, deserialize_with = "time_code")]
    time: Option<u32>,
    #[serde(default, deserialize_with = "number")]
    temperature: Option<f64>,
    #[serde(default, deserialize_with = "first_text")]
    weather_descriptions: Option<String>,
    #[serde(default, deserialize_with = "number")]
    wind_speed: Option<f64>,
    #[serde(default, deserialize_with = "text")]
    wind_dir: Option<String>,
}

impl WsHour {
    fn into_entry(self) -> Option<HourlyEntry> {
        Some(HourlyEntry {
            time_code: self.time?,
            temperature: self.temperature,
            description: self.weather_descriptions,
            wind_speed: self.wind_speed,
            wind_direction: self.wind_dir,
        })
    }
}

/// A number, or a string holding one. Anything else is unset.
fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// First element of a sequence of strings, if there is one.
fn first_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_array()
        .and_then(|items| items.first())
        .and_then(Value::as_str)
        .map(str::to_string))
}

/// Hourly `time` arrives as `900` or `"900"` depending on the endpoint.
fn time_code<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().and_then(|code| u32::try_from(code).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}
