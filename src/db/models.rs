use sqlx::FromRow;

use crate::classify::Position;

#[derive(Debug, Clone, FromRow)]
pub struct Player {
    pub id: i64,
    pub summoner_name: String,
    /// Highest achieved season tier, absent when the summoner has no match
    /// history to derive it from.
    pub highest_rank: Option<String>,
    /// Stored as "<LANE> <ARCHETYPE>", set once at creation.
    pub best_position: String,
    pub created_at: i64,
}

impl Player {
    pub fn position(&self) -> Option<Position> {
        Position::parse(&self.best_position)
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Team {
    pub id: i64,
    pub created_at: i64,
    pub finished_at: Option<i64>,
}

impl Team {
    pub fn is_forming(&self) -> bool {
        self.finished_at.is_none()
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct PlayerRequest {
    pub id: i64,
    pub player_id: i64,
    pub created_at: i64,
    pub finished_at: Option<i64>,
}

impl PlayerRequest {
    pub fn is_open(&self) -> bool {
        self.finished_at.is_none()
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Membership {
    pub player_id: i64,
    pub team_id: i64,
    pub is_leader: bool,
}
