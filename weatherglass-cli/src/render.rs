//! Plain-text rendering of a [`WeatherResult`].

use std::fmt::{Display, Write};
use weatherglass_core::{
    CurrentConditions, HistoricalDayEntry, LocationInfo, TideData, Units, WeatherError,
    WeatherResult,
};

const HOURLY_PREVIEW: usize = 6;
const TIDE_PREVIEW: usize = 4;

pub const NO_TIDES_MESSAGE: &str = "Marine-specific tide data was not returned for this \
     location or plan. Showing general historical information instead.";

pub fn render(result: &WeatherResult, units: Units) -> String {
    let mut out = String::new();

    location(&mut out, result.location());

    match result {
        WeatherResult::Current { current, .. } => current_section(&mut out, current, units),
        WeatherResult::Historical { day, .. } => historical_section(&mut out, day, units),
        WeatherResult::Marine { day, tides, .. } => marine_section(&mut out, day, tides, units),
    }

    out
}

/// One line naming the error class and its message.
pub fn error_line(err: &WeatherError) -> String {
    format!("[{}] {err}", err.kind())
}

fn location(out: &mut String, loc: &LocationInfo) {
    let place = [loc.name.as_str(), loc.region.as_str(), loc.country.as_str()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    let _ = writeln!(out, "{place}");
    if !loc.local_time.is_empty() {
        let _ = writeln!(out, "Local time: {} ({})", loc.local_time, loc.timezone_id);
    }
    out.push('\n');
}

fn current_section(out: &mut String, cur: &CurrentConditions, units: Units) {
    let deg = units.temperature_symbol();
    let _ = writeln!(
        out,
        "{}{deg}  {}",
        or_dash(cur.temperature),
        cur.description.as_deref().unwrap_or("")
    );
    row(out, "Feels like", format!("{}{deg}", or_dash(cur.feelslike_temperature)));
    row(out, "Humidity", format!("{}%", or_dash(cur.humidity_percent)));
    row(
        out,
        "Wind",
        format!(
            "{} {} · {}",
            or_dash(cur.wind_speed),
            units.speed_unit(),
            cur.wind_direction.as_deref().unwrap_or("-")
        ),
    );
    row(out, "Pressure", format!("{} mb", or_dash(cur.pressure_mb)));
    row(out, "Visibility", format!("{} {}", or_dash(cur.visibility), units.distance_unit()));
    row(out, "UV index", or_dash(cur.uv_index));
    row(out, "Cloud cover", format!("{}%", or_dash(cur.cloud_cover_percent)));
    if let Some(icon) = &cur.icon_url {
        row(out, "Icon", icon);
    }
}

fn historical_section(out: &mut String, day: &HistoricalDayEntry, units: Units) {
    let deg = units.temperature_symbol();
    let _ = writeln!(out, "Historical summary for {}", day.date);
    row(out, "Avg temp", format!("{}{deg}", or_dash(day.avg_temp)));
    row(
        out,
        "Min / Max",
        format!("{}{deg} / {}{deg}", or_dash(day.min_temp), or_dash(day.max_temp)),
    );
    row(out, "Sun hours", or_dash(day.sun_hours));
    row(out, "UV index", or_dash(day.uv_index));

    if !day.hourly.is_empty() {
        out.push('\n');
        for hour in day.hourly.iter().take(HOURLY_PREVIEW) {
            let _ = writeln!(
                out,
                "  {}  {}{deg}  {}",
                hour.formatted_time(),
                or_dash(hour.temperature),
                hour.description.as_deref().unwrap_or("")
            );
        }
    }
}

fn marine_section(out: &mut String, day: &HistoricalDayEntry, tides: &TideData, units: Units) {
    let deg = units.temperature_symbol();
    let _ = writeln!(out, "Marine conditions (based on historical data)");

    match tides {
        TideData::None => {
            let _ = writeln!(out, "{NO_TIDES_MESSAGE}");
        }
        TideData::Single(record) => tide_record(out, None, record),
        TideData::Many(records) => {
            for (idx, record) in records.iter().take(TIDE_PREVIEW).enumerate() {
                tide_record(out, Some(idx + 1), record);
            }
        }
    }

    out.push('\n');
    row(out, "Avg temp", format!("{}{deg}", or_dash(day.avg_temp)));
    let sample = day.hourly.first();
    row(
        out,
        "Wind (sample)",
        format!(
            "{} · {}",
            or_dash(sample.and_then(|h| h.wind_speed)),
            sample.and_then(|h| h.wind_direction.as_deref()).unwrap_or("-")
        ),
    );
}

fn tide_record(out: &mut String, index: Option<usize>, record: &serde_json::Value) {
    if let Some(index) = index {
        let _ = writeln!(out, "Tide {index}");
    }
    let pretty = serde_json::to_string_pretty(record).unwrap_or_else(|_| record.to_string());
    let _ = writeln!(out, "{pretty}");
}

fn row(out: &mut String, label: &str, value: impl Display) {
    let _ = writeln!(out, "  {label:<14}{value}");
}

fn or_dash(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use weatherglass_core::{HourlyEntry, ValidationError};

    fn loc() -> LocationInfo {
        LocationInfo {
            name: "Brest".into(),
            country: "France".into(),
            region: "Bretagne".into(),
            timezone_id: "Europe/Paris".into(),
            local_time: "2019-09-07 10:00".into(),
        }
    }

    fn day(hours: usize) -> HistoricalDayEntry {
        HistoricalDayEntry {
            date: "2019-09-07".into(),
            avg_temp: Some(18.0),
            hourly: (0..hours)
                .map(|i| HourlyEntry {
                    time_code: (i as u32) * 300,
                    temperature: Some(15.0),
                    description: Some("Mist".into()),
                    wind_speed: Some(12.0),
                    wind_direction: Some("W".into()),
                })
                .collect(),
            ..HistoricalDayEntry::default()
        }
    }

    #[test]
    fn current_lists_description_and_skips_missing_icon() {
        let result = WeatherResult::Current {
            location: loc(),
            current: CurrentConditions {
                temperature: Some(21.0),
                description: Some("Sunny".into()),
                ..CurrentConditions::default()
            },
        };

        let text = render(&result, Units::Metric);
        assert!(text.starts_with("Brest, Bretagne, France\n"));
        assert!(text.contains("21°C  Sunny"));
        assert!(!text.contains("Icon"));
    }

    #[test]
    fn current_wind_and_visibility_follow_units() {
        let current = CurrentConditions {
            wind_speed: Some(13.0),
            wind_direction: Some("NNE".into()),
            visibility: Some(10.0),
            ..CurrentConditions::default()
        };

        let metric = WeatherResult::Current { location: loc(), current: current.clone() };
        let text = render(&metric, Units::Metric);
        assert!(text.contains("13 km/h · NNE"));
        assert!(text.contains("10 km\n"));

        let imperial = WeatherResult::Current { location: loc(), current };
        let text = render(&imperial, Units::Fahrenheit);
        assert!(text.contains("13 mph · NNE"));
        assert!(text.contains("10 mi\n"));
    }

    #[test]
    fn historical_shows_at_most_six_hours_with_formatted_times() {
        let result = WeatherResult::Historical { location: loc(), day: day(8) };
        let text = render(&result, Units::Fahrenheit);

        assert!(text.contains("Historical summary for 2019-09-07"));
        assert!(text.contains("  00:00  15°F  Mist"));
        assert!(text.contains("  09:00  15°F  Mist"));
        assert!(text.contains("  15:00"));
        assert!(!text.contains("18:00"));
    }

    #[test]
    fn marine_without_tides_shows_fallback_message() {
        let result = WeatherResult::Marine { location: loc(), day: day(1), tides: TideData::None };
        let text = render(&result, Units::Metric);

        assert!(text.contains(NO_TIDES_MESSAGE));
        assert!(text.contains("12 · W"));
    }

    #[test]
    fn marine_limits_tide_records() {
        let tides = TideData::Many((0..6).map(|i| json!({ "tide_height": i })).collect());
        let result = WeatherResult::Marine { location: loc(), day: day(0), tides };
        let text = render(&result, Units::Metric);

        assert!(text.contains("Tide 4"));
        assert!(!text.contains("Tide 5"));
        assert!(!text.contains(NO_TIDES_MESSAGE));
        assert!(text.contains("- · -"));
    }

    #[test]
    fn error_line_names_the_class() {
        let err = WeatherError::from(ValidationError::EmptyLocation);
        assert_eq!(error_line(&err), "[validation] Please enter a location.");
    }
}
