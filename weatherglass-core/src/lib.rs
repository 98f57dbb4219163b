//! Core library for the `weatherglass` CLI.
//!
//! This crate defines:
//! - Request composition for the three query modes (current, historical, marine)
//! - Normalization of raw weatherstack payloads into [`WeatherResult`]
//! - Configuration & credentials handling
//! - The provider seam that performs the HTTP round trip
//!
//! It is used by `weatherglass-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod request;

pub use config::Config;
pub use error::{DataShapeError, ValidationError, WeatherError};
pub use model::{
    CurrentConditions, HistoricalDayEntry, HourlyEntry, LocationInfo, QueryInput, QueryMode,
    TideData, Units, WeatherResult, format_time_code,
};
pub use normalize::normalize;
pub use provider::{WeatherProvider, provider_from_config, weatherstack::WeatherstackProvider};
pub use request::{ApiRequest, Endpoint, RequestBuilder};
