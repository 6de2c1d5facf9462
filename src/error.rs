use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream API error: status {status}")]
    Api { status: u16 },

    #[error("Summoner not found: {name}")]
    SummonerNotFound { name: String },

    #[error("Champion {champion_id} missing from catalog")]
    MissingChampion { champion_id: i64 },

    #[error("No mastery data to classify for {name}")]
    NoClassificationData { name: String },

    #[error("You're already building a team!")]
    AlreadySearching,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Business-rule rejections and lookup misses are user-facing, not faults.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            AppError::SummonerNotFound { .. }
                | AppError::NoClassificationData { .. }
                | AppError::AlreadySearching
        )
    }
}
