use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::Password;
use serde::Serialize;
use skycast_core::{Config, OpenWeatherClient, WeatherSource, openweather_from_config};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Weather, air quality and UV index from OpenWeather")]
pub struct Cli {
    /// Print the raw typed result as JSON instead of a summary.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key (prompted if not given).
    Configure {
        #[arg(long)]
        api_key: Option<String>,

        /// Per-request time budget in milliseconds.
        #[arg(long)]
        timeout_ms: Option<u64>,
    },

    /// Current conditions for a place.
    Current { place: String },

    /// 5-day / 3-hour forecast for a place.
    Forecast {
        place: String,

        /// Show at most this many entries.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Air quality for a place.
    Air { place: String },

    /// UV index for a place.
    Uv {
        place: String,

        /// Report lookup failures instead of falling back to a placeholder reading.
        #[arg(long)]
        strict: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let json = self.json;

        match self.command {
            Command::Configure { api_key, timeout_ms } => configure(api_key, timeout_ms)?,
            Command::Current { place } => {
                let current = client()?.fetch_current_conditions(&place).await?;
                print(json, &current, render::current)?;
            }
            Command::Forecast { place, limit } => {
                let mut forecast = client()?.fetch_forecast(&place).await?;
                if let Some(limit) = limit {
                    forecast.list.truncate(limit);
                }
                print(json, &forecast, render::forecast)?;
            }
            Command::Air { place } => {
                let air = client()?.fetch_air_quality(&place).await?;
                print(json, &air, render::air_quality)?;
            }
            Command::Uv { place, strict } => {
                let client = client()?;
                let uv = if strict {
                    client.try_fetch_uv_index(&place).await?
                } else {
                    client.fetch_uv_index(&place).await
                };
                print(json, &uv, render::uv_index)?;
            }
        }

        Ok(())
    }
}

fn client() -> anyhow::Result<OpenWeatherClient> {
    let config = Config::load()?.with_env_overrides();
    let data_url = config.endpoints.data_url.as_str();
    tracing::debug!(timeout_ms = config.timeout_ms, data_url, "loaded configuration");
    openweather_from_config(&config)
}

fn print<T: Serialize>(json: bool, value: &T, summary: fn(&T) -> String) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", summary(value));
    }
    Ok(())
}

fn configure(api_key: Option<String>, timeout_ms: Option<u64>) -> anyhow::Result<()> {
    // Skip validation here: this is how a broken config gets fixed.
    let config = Config::read()?;

    let api_key = match api_key {
        Some(key) => key,
        None => Password::new("OpenWeather API key:")
            .without_confirmation()
            .prompt()
            .context("Failed to read API key")?,
    };

    let config = apply_settings(config, &api_key, timeout_ms)?;
    config.save()?;

    println!(
        "Saved configuration to {}",
        Config::config_file_path()?.display()
    );
    Ok(())
}

fn apply_settings(
    mut config: Config,
    api_key: &str,
    timeout_ms: Option<u64>,
) -> anyhow::Result<Config> {
    if api_key.trim().is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    config.set_api_key(api_key.trim().to_string());
    if let Some(ms) = timeout_ms {
        config.timeout_ms = ms;
    }

    config.validate().context("Refusing to save configuration")?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_settings_stores_trimmed_key_and_timeout() {
        let config = apply_settings(Config::default(), "  KEY  ", Some(2500));
        let config = config.unwrap();

        assert_eq!(config.api_key(), Some("KEY"));
        assert_eq!(config.timeout_ms, 2500);
    }

    #[test]
    fn apply_settings_rejects_zero_timeout() {
        let err = apply_settings(Config::default(), "KEY", Some(0)).unwrap_err();

        let msg = format!("{err:#}");
        assert!(msg.contains("Refusing to save configuration"));
        assert!(msg.contains("timeout_ms must be greater than zero"));
    }

    #[test]
    fn apply_settings_repairs_zero_timeout() {
        let mut broken = Config::default();
        broken.timeout_ms = 0;

        let config = apply_settings(broken, "KEY", Some(8000)).unwrap();
        assert_eq!(config.timeout_ms, 8000);
    }

    #[test]
    fn apply_settings_rejects_blank_key() {
        let err = apply_settings(Config::default(), "   ", None).unwrap_err();
        assert!(err.to_string().contains("API key must not be empty"));
    }
}
