use std::fmt::Debug;

use async_trait::async_trait;

use super::types::{ChampionDto, MasteryDto, MatchDetailDto, MatchReferenceDto, SummonerDto};
use crate::error::AppError;

/// Upstream statistics API surface the core consumes. Production uses the
/// reqwest [`ApiClient`](super::client::ApiClient); tests inject a mock.
///
/// Every call either returns a complete record set or fails for that player;
/// retry and rate-limit policy live outside this crate.
#[async_trait]
pub trait LolApi: Send + Sync + Debug {
    /// Resolves a normalized summoner name. `None` means the summoner does
    /// not exist, not a transport failure.
    async fn summoner_by_name(&self, normalized_name: &str)
        -> Result<Option<SummonerDto>, AppError>;

    async fn match_history(&self, summoner_id: i64) -> Result<Vec<MatchReferenceDto>, AppError>;

    async fn masteries(&self, summoner_id: i64) -> Result<Vec<MasteryDto>, AppError>;

    async fn champion_by_id(&self, champion_id: i64) -> Result<Option<ChampionDto>, AppError>;

    async fn all_champions(&self) -> Result<Vec<ChampionDto>, AppError>;

    async fn match_detail(&self, match_id: i64) -> Result<MatchDetailDto, AppError>;
}
