use anyhow::Context;
use chrono::{DateTime, Local};
use clap::{Parser, Subcommand, ValueEnum};

use skycast_core::{Config, Unit, WeatherService, WeatherSnapshot};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Current conditions and 5-day forecast from OpenWeather")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show weather for a location.
    Show {
        /// Place name (e.g. "New York") or raw coordinates ("lat=40.7&lon=-74.0").
        location: String,

        /// Temperature unit for display.
        #[arg(long, value_enum, default_value = "celsius")]
        unit: UnitArg,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum UnitArg {
    Celsius,
    Fahrenheit,
}

impl From<UnitArg> for Unit {
    fn from(arg: UnitArg) -> Self {
        match arg {
            UnitArg::Celsius => Unit::Celsius,
            UnitArg::Fahrenheit => Unit::Fahrenheit,
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { location, unit } => show(&location, unit.into()).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let api_key = inquire::Text::new("OpenWeather API key:")
        .prompt()
        .context("Failed to read API key")?;

    let mut config = Config::load()?;
    config.set_api_key(api_key.trim().to_string());
    config.save()?;

    println!("Saved to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(location: &str, unit: Unit) -> anyhow::Result<()> {
    let config = Config::load()?;
    let service = WeatherService::from_config(&config)?;
    let snapshot = service.lookup(location).await?;

    print_snapshot(&snapshot, unit);
    Ok(())
}

fn print_snapshot(snapshot: &WeatherSnapshot, unit: Unit) {
    let suffix = unit.suffix();

    println!("{} — {}", snapshot.location_name, snapshot.description);
    println!(
        "  Temperature: {:.1}{suffix} (feels like {:.1}{suffix})",
        unit.from_celsius(snapshot.temperature_c),
        unit.from_celsius(snapshot.feels_like_c),
    );
    println!(
        "  Humidity: {}%   Wind: {:.1} m/s",
        snapshot.humidity_pct, snapshot.wind_speed_mps
    );
    println!(
        "  Observed {}   Sunrise {}   Sunset {}",
        local_time(snapshot.observed_at),
        local_time(snapshot.sunrise),
        local_time(snapshot.sunset),
    );

    if snapshot.forecast.is_empty() {
        return;
    }

    println!();
    println!("Forecast:");
    for day in &snapshot.forecast {
        println!(
            "  {:<4} min {:>6.1}{suffix}   max {:>6.1}{suffix}   (code {})",
            day.day,
            unit.from_celsius(day.min_temp_c),
            unit.from_celsius(day.max_temp_c),
            day.weather_code,
        );
    }
}

fn local_time(ts: i64) -> String {
    DateTime::from_timestamp(ts, 0)
        .map(|t| t.with_timezone(&Local).format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}
