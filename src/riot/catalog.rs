use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;
use tracing::info;

use super::{traits::LolApi, types::ChampionDto};
use crate::error::AppError;

/// Read-through cache over the champion static data. Classification depends
/// on it for every champion lookup; a gap in the catalog surfaces as
/// [`AppError::MissingChampion`] and aborts that player's run.
#[derive(Debug)]
pub struct ChampionCatalog {
    api: Arc<dyn LolApi>,
    cache: RwLock<HashMap<i64, Arc<ChampionDto>>>,
}

impl ChampionCatalog {
    pub fn new(api: Arc<dyn LolApi>) -> Self {
        Self {
            api,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Bulk-loads the full champion list. Optional: lookups fall back to
    /// per-champion fetches either way.
    pub async fn warm(&self) -> Result<usize, AppError> {
        let champions = self.api.all_champions().await?;
        let count = champions.len();

        let mut cache = self.cache.write().await;
        for champion in champions {
            cache.insert(champion.id, Arc::new(champion));
        }

        info!("⚔️ champion catalog warmed ({count} champions)");
        Ok(count)
    }

    pub async fn get(&self, champion_id: i64) -> Result<Arc<ChampionDto>, AppError> {
        if let Some(champion) = self.cache.read().await.get(&champion_id) {
            return Ok(champion.clone());
        }

        match self.api.champion_by_id(champion_id).await? {
            Some(champion) => {
                let champion = Arc::new(champion);
                self.cache
                    .write()
                    .await
                    .insert(champion_id, champion.clone());
                Ok(champion)
            }
            None => Err(AppError::MissingChampion { champion_id }),
        }
    }
}
