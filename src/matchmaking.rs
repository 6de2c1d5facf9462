//! Matchmaking engine: places summoners onto compatible forming teams.
//!
//! Every mutating path runs under one engine-wide lock so the
//! check-then-act sequences (leader uniqueness, collision scan, roster
//! capacity) never interleave.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::{
    classify::{self, Classification, Position, cache::ClassificationCache},
    db::{
        Repository,
        models::{Player, Team},
    },
    error::AppError,
    riot::{LolApi, catalog::ChampionCatalog, normalize_summoner_name, types::SummonerDto},
};

pub const QUEUED_MESSAGE: &str = "No teams just yet, but you're on the list!";
pub const PLACED_MESSAGE: &str = "We found you a team!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementStatus {
    /// No compatible team right now; the open request stays pending.
    Queued,
    Placed,
}

#[derive(Debug, Clone)]
pub struct PlacementOutcome {
    pub status: PlacementStatus,
    pub team: Option<Team>,
    pub message: String,
}

impl PlacementOutcome {
    fn queued() -> Self {
        Self {
            status: PlacementStatus::Queued,
            team: None,
            message: QUEUED_MESSAGE.into(),
        }
    }

    fn placed(team: Team) -> Self {
        Self {
            status: PlacementStatus::Placed,
            team: Some(team),
            message: PLACED_MESSAGE.into(),
        }
    }
}

pub struct MatchmakingService {
    api: Arc<dyn LolApi>,
    repo: Repository,
    catalog: ChampionCatalog,
    classifications: ClassificationCache,
    /// Serializes check-then-act sequences against the team pool.
    placement_lock: Mutex<()>,
}

impl MatchmakingService {
    pub fn new(api: Arc<dyn LolApi>, repo: Repository) -> Self {
        Self {
            catalog: ChampionCatalog::new(api.clone()),
            api,
            repo,
            classifications: ClassificationCache::new(),
            placement_lock: Mutex::new(()),
        }
    }

    pub fn catalog(&self) -> &ChampionCatalog {
        &self.catalog
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    async fn resolve_summoner(&self, name: &str) -> Result<SummonerDto, AppError> {
        let normalized = normalize_summoner_name(name);
        self.api
            .summoner_by_name(&normalized)
            .await?
            .ok_or(AppError::SummonerNotFound { name: normalized })
    }

    /// Ranked classification for a summoner, computed at most once per
    /// process lifetime unless invalidated.
    pub async fn classification(
        &self,
        summoner_name: &str,
    ) -> Result<Arc<Classification>, AppError> {
        let summoner = self.resolve_summoner(summoner_name).await?;
        self.classification_for(&summoner).await
    }

    pub async fn invalidate_classification(&self, summoner_name: &str) {
        self.classifications
            .invalidate(&normalize_summoner_name(summoner_name))
            .await;
    }

    async fn classification_for(
        &self,
        summoner: &SummonerDto,
    ) -> Result<Arc<Classification>, AppError> {
        let key = normalize_summoner_name(&summoner.name);
        self.classifications
            .get_or_compute(&key, || self.compute_classification(summoner.id))
            .await
    }

    async fn compute_classification(&self, summoner_id: i64) -> Result<Classification, AppError> {
        let matches = self.api.match_history(summoner_id).await?;
        let masteries = self.api.masteries(summoner_id).await?;

        let mut played = Vec::with_capacity(matches.len());
        for reference in &matches {
            let champion = self.catalog.get(reference.champion).await?;
            played.push(classify::PlayedMatch {
                champion_name: champion.name.clone(),
                lane: reference.lane.clone(),
            });
        }

        let mut scored = Vec::with_capacity(masteries.len());
        for mastery in &masteries {
            let champion = self.catalog.get(mastery.champion_id).await?;
            scored.push(classify::ScoredMastery {
                champion_name: champion.name.clone(),
                tags: champion.tags.clone(),
                points: mastery.champion_points,
                level: mastery.champion_level,
            });
        }

        Ok(classify::classify(&played, &scored))
    }

    /// Highest achieved season tier, read from the most recent match's
    /// detail. A summoner with no match history has no rank.
    async fn highest_rank(&self, summoner: &SummonerDto) -> Result<Option<String>, AppError> {
        let matches = self.api.match_history(summoner.id).await?;
        let Some(reference) = matches.first() else {
            return Ok(None);
        };

        let detail = self.api.match_detail(reference.match_id).await?;
        Ok(detail.highest_rank_of(summoner.id))
    }

    /// Fetches or creates the player row. Best position and rank are fixed
    /// at first sight; later history does not rewrite them.
    async fn ensure_player(&self, summoner: &SummonerDto) -> Result<Player, AppError> {
        if let Some(player) = self.repo.get_player_by_name(&summoner.name).await? {
            return Ok(player);
        }

        let classification = self.classification_for(summoner).await?;
        let position = classify::best_position(&classification).ok_or_else(|| {
            AppError::NoClassificationData {
                name: summoner.name.clone(),
            }
        })?;
        let highest_rank = self.highest_rank(summoner).await?;

        self.repo
            .create_player(
                &summoner.name,
                highest_rank.as_deref(),
                &position.to_string(),
            )
            .await
    }

    /// Opens a new team with the summoner as leader. A player leading a
    /// still-forming team cannot start another one.
    pub async fn create_team(&self, summoner_name: &str) -> Result<Team, AppError> {
        let summoner = self.resolve_summoner(summoner_name).await?;
        let _guard = self.placement_lock.lock().await;

        let player = self.ensure_player(&summoner).await?;
        if self.repo.leads_forming_team(player.id).await? {
            return Err(AppError::AlreadySearching);
        }

        let team = self.repo.create_team_with_leader(player.id).await?;
        info!("🛡️ {} opened team {}", player.summoner_name, team.id);
        Ok(team)
    }

    /// Tries to place the summoner on a forming team led by someone of the
    /// same rank. Queued is a valid terminal outcome, not an error.
    pub async fn request_team(&self, summoner_name: &str) -> Result<PlacementOutcome, AppError> {
        let summoner = self.resolve_summoner(summoner_name).await?;
        let _guard = self.placement_lock.lock().await;

        let player = self.ensure_player(&summoner).await?;
        let request = self.repo.open_request(player.id).await?;
        let position = player
            .position()
            .ok_or_else(|| AppError::NoClassificationData {
                name: player.summoner_name.clone(),
            })?;

        let candidates = self
            .repo
            .forming_teams_for_rank(player.highest_rank.as_deref())
            .await?;
        if candidates.is_empty() {
            debug!(
                "no forming team at rank {:?} for {}",
                player.highest_rank, player.summoner_name
            );
            return Ok(PlacementOutcome::queued());
        }

        for team in candidates {
            // A team the player already sits on is never a candidate; a
            // repeat request must not duplicate their membership.
            if self.repo.is_member(player.id, team.id).await? {
                continue;
            }

            let taken = self.repo.member_positions(team.id).await?;
            let collision = taken
                .iter()
                .filter_map(|stored| Position::parse(stored))
                .any(|other| position.collides_with(&other));

            if collision {
                // The scan gives up at the first colliding team rather than
                // trying the rest; the open request stays pending.
                debug!(
                    "{} collides on team {}, staying queued",
                    player.summoner_name, team.id
                );
                return Ok(PlacementOutcome::queued());
            }

            let team = self.repo.join_team(player.id, request.id, team.id).await?;
            info!("🛡️ placed {} on team {}", player.summoner_name, team.id);
            return Ok(PlacementOutcome::placed(team));
        }

        Ok(PlacementOutcome::queued())
    }
}
