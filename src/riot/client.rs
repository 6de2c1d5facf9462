use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use super::{
    traits::LolApi,
    types::{
        ChampionDto, ChampionListDto, MasteryDto, MatchDetailDto, MatchListDto,
        MatchReferenceDto, SummonerDto,
    },
};
use crate::{config::Config, error::AppError};

/// Concrete [`LolApi`] over HTTP.
#[derive(Debug)]
pub struct ApiClient {
    client: reqwest::Client,
    key: String,
    region: String,
    platform: String,
}

impl ApiClient {
    const STATIC_BASE_URL: &'static str = "https://global.api.pvp.net";

    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            key: config.riot_api_key.clone(),
            region: config.region.clone(),
            platform: config.platform.clone(),
        }
    }

    fn base_url(&self) -> String {
        format!("https://{}.api.pvp.net", self.region)
    }

    /// GET + deserialize. A 404 is an expected miss, not a failure.
    async fn request<T: DeserializeOwned>(&self, url: String) -> Result<Option<T>, AppError> {
        let res = self
            .client
            .get(&url)
            .header("X-Riot-Token", &self.key)
            .send()
            .await?;

        match res.status() {
            StatusCode::OK => Ok(Some(res.json().await?)),
            StatusCode::NOT_FOUND => Ok(None),
            status => Err(AppError::Api {
                status: status.as_u16(),
            }),
        }
    }

    async fn request_required<T: DeserializeOwned>(&self, url: String) -> Result<T, AppError> {
        self.request(url).await?.ok_or(AppError::Api {
            status: StatusCode::NOT_FOUND.as_u16(),
        })
    }
}

#[async_trait]
impl LolApi for ApiClient {
    async fn summoner_by_name(
        &self,
        normalized_name: &str,
    ) -> Result<Option<SummonerDto>, AppError> {
        tracing::trace!("[API] summoner_by_name {normalized_name}");
        let url = format!(
            "{}/api/lol/{}/v1.4/summoner/by-name/{}",
            self.base_url(),
            self.region,
            urlencoding::encode(normalized_name),
        );

        // The endpoint answers with a name-keyed map.
        let by_name: Option<HashMap<String, SummonerDto>> = self.request(url).await?;
        Ok(by_name.and_then(|mut map| map.remove(normalized_name)))
    }

    async fn match_history(&self, summoner_id: i64) -> Result<Vec<MatchReferenceDto>, AppError> {
        tracing::trace!("[API] match_history {summoner_id}");
        let url = format!(
            "{}/api/lol/{}/v2.2/matchlist/by-summoner/{}",
            self.base_url(),
            self.region,
            summoner_id,
        );

        let list: MatchListDto = self.request_required(url).await?;
        Ok(list.matches)
    }

    async fn masteries(&self, summoner_id: i64) -> Result<Vec<MasteryDto>, AppError> {
        tracing::trace!("[API] masteries {summoner_id}");
        let url = format!(
            "{}/championmastery/location/{}/player/{}/champions",
            self.base_url(),
            self.platform,
            summoner_id,
        );

        self.request_required(url).await
    }

    async fn champion_by_id(&self, champion_id: i64) -> Result<Option<ChampionDto>, AppError> {
        tracing::trace!("[API] champion_by_id {champion_id}");
        let url = format!(
            "{}/api/lol/static-data/{}/v1.2/champion/{}?champData=tags",
            Self::STATIC_BASE_URL,
            self.region,
            champion_id,
        );

        self.request(url).await
    }

    async fn all_champions(&self) -> Result<Vec<ChampionDto>, AppError> {
        tracing::trace!("[API] all_champions");
        let url = format!(
            "{}/api/lol/static-data/{}/v1.2/champion?champData=tags",
            Self::STATIC_BASE_URL,
            self.region,
        );

        let list: ChampionListDto = self.request_required(url).await?;
        Ok(list.data.into_values().collect())
    }

    async fn match_detail(&self, match_id: i64) -> Result<MatchDetailDto, AppError> {
        tracing::trace!("[API] match_detail {match_id}");
        let url = format!(
            "{}/api/lol/{}/v2.2/match/{}",
            self.base_url(),
            self.region,
            match_id,
        );

        self.request_required(url).await
    }
}
