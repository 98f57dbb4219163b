use crate::{
    Config, QueryInput, QueryMode, WeatherError, WeatherResult,
    provider::weatherstack::WeatherstackProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod weatherstack;

/// One query in, one normalized result or one classified error out.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn get_weather(
        &self,
        mode: QueryMode,
        input: &QueryInput,
    ) -> Result<WeatherResult, WeatherError>;
}

/// Construct the weatherstack provider from config.
///
/// The credential is checked here, before any request is built.
pub fn provider_from_config(config: &Config) -> Result<Box<dyn WeatherProvider>, WeatherError> {
    let api_key = config.require_api_key()?;
    let provider = WeatherstackProvider::new(api_key.to_owned()).with_base_url(config.base_url());
    Ok(Box::new(provider))
}
