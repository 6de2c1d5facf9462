use serde::Deserialize;

// ============================================================================
// Summoner-v1.4
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummonerDto {
    pub id: i64,
    pub name: String,
}

// ============================================================================
// Matchlist-v2.2
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchListDto {
    #[serde(default)]
    pub matches: Vec<MatchReferenceDto>,
}

/// One entry of a summoner's historical match list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReferenceDto {
    pub champion: i64,
    pub lane: String,
    pub role: String,
    pub match_id: i64,
    pub timestamp: i64,
}

// ============================================================================
// Match-v2.2
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDetailDto {
    #[serde(default)]
    pub participants: Vec<MatchParticipantDto>,
    #[serde(default)]
    pub participant_identities: Vec<ParticipantIdentityDto>,
}

impl MatchDetailDto {
    /// Highest achieved season tier of the given summoner in this match, if
    /// they took part in it.
    pub fn highest_rank_of(&self, summoner_id: i64) -> Option<String> {
        let identity = self
            .participant_identities
            .iter()
            .find(|identity| identity.player.summoner_id == summoner_id)?;

        self.participants
            .iter()
            .find(|p| p.participant_id == identity.participant_id)
            .and_then(|p| p.highest_achieved_season_tier.clone())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchParticipantDto {
    pub participant_id: i64,
    pub champion_id: i64,
    pub team_id: i64,
    pub highest_achieved_season_tier: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantIdentityDto {
    pub participant_id: i64,
    pub player: MatchPlayerDto,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchPlayerDto {
    pub summoner_id: i64,
    pub summoner_name: String,
}

// ============================================================================
// Champion mastery
// ============================================================================

/// Cumulative mastery record for one champion of one player.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasteryDto {
    pub champion_id: i64,
    pub champion_points: i64,
    pub champion_level: i64,
    pub champion_points_until_next_level: i64,
    pub champion_points_since_last_level: i64,
    pub chest_granted: bool,
}

// ============================================================================
// Static data: champions
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ChampionListDto {
    pub data: std::collections::HashMap<String, ChampionDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChampionDto {
    pub id: i64,
    pub name: String,
    pub title: String,
    pub key: String,
    /// Archetype labels ("Fighter", "Support", ...) used to bin mastery
    /// scores. A champion usually carries one or two.
    #[serde(default)]
    pub tags: Vec<String>,
}
