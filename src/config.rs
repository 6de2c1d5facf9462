use std::env;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub riot_api_key: String,
    pub database_url: String,
    pub region: String,
    pub platform: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        const DEFAULT_REGION: &str = "na";
        const DEFAULT_PLATFORM: &str = "NA1";

        let riot_api_key = env::var("RIOT_API_KEY")
            .map_err(|_| AppError::Config("RIOT_API_KEY must be set".into()))?;

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:riftsquad.db".into());

        let region = env::var("RIOT_REGION")
            .unwrap_or_else(|_| DEFAULT_REGION.into())
            .to_lowercase();

        let platform = env::var("RIOT_PLATFORM").unwrap_or_else(|_| DEFAULT_PLATFORM.into());

        Ok(Self {
            riot_api_key,
            database_url,
            region,
            platform,
        })
    }
}
