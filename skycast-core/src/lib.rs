//! Core library for `skycast`.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Time-bounded requests against OpenWeather
//! - The four lookups (current conditions, forecast, air quality, UV index)
//! - Shared domain models and the classified [`FetchError`]
//!
//! It is used by `skycast-cli`, but can also be reused by other front ends.

pub mod config;
pub mod error;
pub mod http;
pub mod model;
pub mod provider;

pub use config::{Config, Endpoints};
pub use error::FetchError;
pub use model::{
    AirQuality, AirQualityCategory, Condition, Coordinate, CurrentConditions, Forecast,
    ForecastEntry, UvCategory, UvIndex,
};
pub use provider::{
    WeatherSource, openweather::OpenWeatherClient, openweather_from_config, source_from_config,
};
