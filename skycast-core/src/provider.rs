use crate::{
    AirQuality, Config, CurrentConditions, FetchError, Forecast, UvIndex,
    provider::openweather::OpenWeatherClient,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// The four lookups the presentation layer can ask for.
///
/// Each call takes one place query and settles on its own; implementations
/// hold no per-call state, so independent calls may run concurrently.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn fetch_current_conditions(&self, query: &str) -> Result<CurrentConditions, FetchError>;

    async fn fetch_forecast(&self, query: &str) -> Result<Forecast, FetchError>;

    /// Resolves the place first; any failure in either step is returned as-is.
    async fn fetch_air_quality(&self, query: &str) -> Result<AirQuality, FetchError>;

    /// Never fails: on any error the result is [`UvIndex::fallback`].
    async fn fetch_uv_index(&self, query: &str) -> UvIndex;
}

/// Construct the OpenWeather client from config.
pub fn openweather_from_config(config: &Config) -> anyhow::Result<OpenWeatherClient> {
    config.validate()?;

    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
                 Hint: run `skycast configure` or set SKYCAST_API_KEY."
        )
    })?;

    Ok(OpenWeatherClient::new(
        api_key.to_owned(),
        config.endpoints.clone(),
        config.timeout(),
    ))
}

/// Same as [`openweather_from_config`], behind the [`WeatherSource`] trait.
pub fn source_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherSource>> {
    let source = openweather_from_config(config)?;
    Ok(Box::new(source))
}
