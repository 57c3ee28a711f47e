use tracing::info;

use crate::aggregate::normalize;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::gateway::OpenWeatherGateway;
use crate::model::WeatherSnapshot;

/// The one operation exposed to callers: location key in, snapshot out.
///
/// Construction validates the credential once; individual lookups then only
/// fail for input, upstream, or transport reasons.
#[derive(Debug, Clone)]
pub struct WeatherService {
    gateway: OpenWeatherGateway,
}

impl WeatherService {
    /// Build a service from configuration, failing fast with a
    /// `Configuration` error before any network call if the key is missing.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.require_api_key()?;
        Ok(Self { gateway: OpenWeatherGateway::new(api_key.to_owned()) })
    }

    #[cfg(test)]
    fn with_gateway(gateway: OpenWeatherGateway) -> Self {
        Self { gateway }
    }

    /// Look up current conditions and the aggregated 5-day forecast.
    pub async fn lookup(&self, location: &str) -> Result<WeatherSnapshot> {
        if location.trim().is_empty() {
            return Err(Error::InvalidInput);
        }

        info!(location, "looking up weather");
        let bundle = self.gateway.fetch_bundle(location).await?;
        normalize(bundle)
    }
}
