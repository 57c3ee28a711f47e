//! Core library for the `skycast` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather gateway (current conditions + 5-day forecast)
//! - Normalization of raw payloads into daily aggregated forecasts
//!
//! It is used by `skycast-cli`, but can also be reused by other binaries or
//! services.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod gateway;
pub mod model;
pub mod service;

pub use config::Config;
pub use error::{Error, Result};
pub use gateway::{OpenWeatherGateway, WeatherBundle};
pub use model::{DailyForecast, LocationQuery, Unit, WeatherSnapshot};
pub use service::WeatherService;
