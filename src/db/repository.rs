use sqlx::SqlitePool;

use super::models::{Membership, Player, PlayerRequest, Team};
use crate::error::AppError;

/// A team is promoted from forming to complete at exactly this many members.
pub const TEAM_SIZE: i64 = 5;

const PLAYER_COLUMNS: &str = "id, summoner_name, highest_rank, best_position, created_at";
const TEAM_COLUMNS: &str = "id, created_at, finished_at";
const REQUEST_COLUMNS: &str = "id, player_id, created_at, finished_at";

#[derive(Clone, Debug)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // === Player operations ===

    pub async fn get_player_by_name(
        &self,
        summoner_name: &str,
    ) -> Result<Option<Player>, AppError> {
        let player = sqlx::query_as::<_, Player>(&format!(
            "SELECT {PLAYER_COLUMNS} FROM players WHERE summoner_name = ?"
        ))
        .bind(summoner_name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(player)
    }

    pub async fn create_player(
        &self,
        summoner_name: &str,
        highest_rank: Option<&str>,
        best_position: &str,
    ) -> Result<Player, AppError> {
        let player = sqlx::query_as::<_, Player>(&format!(
            r#"
            INSERT INTO players (summoner_name, highest_rank, best_position)
            VALUES (?, ?, ?)
            RETURNING {PLAYER_COLUMNS}
            "#
        ))
        .bind(summoner_name)
        .bind(highest_rank)
        .bind(best_position)
        .fetch_one(&self.pool)
        .await?;
        Ok(player)
    }

    // === Request operations ===

    pub async fn get_open_request(
        &self,
        player_id: i64,
    ) -> Result<Option<PlayerRequest>, AppError> {
        let request = sqlx::query_as::<_, PlayerRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM player_requests WHERE player_id = ? AND finished_at IS NULL"
        ))
        .bind(player_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(request)
    }

    /// Creates the single open request for a player, reusing an existing one.
    pub async fn open_request(&self, player_id: i64) -> Result<PlayerRequest, AppError> {
        if let Some(request) = self.get_open_request(player_id).await? {
            return Ok(request);
        }

        let request = sqlx::query_as::<_, PlayerRequest>(&format!(
            "INSERT INTO player_requests (player_id) VALUES (?) RETURNING {REQUEST_COLUMNS}"
        ))
        .bind(player_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(request)
    }

    // === Team operations ===

    /// Whether any team the player has ever led is still forming.
    pub async fn leads_forming_team(&self, player_id: i64) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT 1
            FROM memberships m
            INNER JOIN teams t ON t.id = m.team_id
            WHERE m.player_id = ? AND m.is_leader = 1 AND t.finished_at IS NULL
            "#,
        )
        .bind(player_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(exists.is_some())
    }

    pub async fn create_team_with_leader(&self, player_id: i64) -> Result<Team, AppError> {
        let mut tx = self.pool.begin().await?;

        let team = sqlx::query_as::<_, Team>(&format!(
            "INSERT INTO teams DEFAULT VALUES RETURNING {TEAM_COLUMNS}"
        ))
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO memberships (player_id, team_id, is_leader) VALUES (?, ?, 1)")
            .bind(player_id)
            .bind(team.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(team)
    }

    /// Forming teams whose leader holds the given rank, ordered by team id so
    /// the placement scan is deterministic. NULL ranks band together.
    pub async fn forming_teams_for_rank(
        &self,
        highest_rank: Option<&str>,
    ) -> Result<Vec<Team>, AppError> {
        let teams = sqlx::query_as::<_, Team>(
            r#"
            SELECT t.id, t.created_at, t.finished_at
            FROM teams t
            INNER JOIN memberships m ON m.team_id = t.id AND m.is_leader = 1
            INNER JOIN players p ON p.id = m.player_id
            WHERE t.finished_at IS NULL AND p.highest_rank IS ?
            ORDER BY t.id ASC
            "#,
        )
        .bind(highest_rank)
        .fetch_all(&self.pool)
        .await?;
        Ok(teams)
    }

    /// Best positions of every current member of a team.
    pub async fn member_positions(&self, team_id: i64) -> Result<Vec<String>, AppError> {
        let positions = sqlx::query_scalar::<_, String>(
            r#"
            SELECT p.best_position
            FROM players p
            INNER JOIN memberships m ON m.player_id = p.id
            WHERE m.team_id = ?
            ORDER BY m.joined_at ASC, p.id ASC
            "#,
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(positions)
    }

    pub async fn is_member(&self, player_id: i64, team_id: i64) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, i32>(
            "SELECT 1 FROM memberships WHERE player_id = ? AND team_id = ?",
        )
        .bind(player_id)
        .bind(team_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(exists.is_some())
    }

    pub async fn member_count(&self, team_id: i64) -> Result<i64, AppError> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM memberships WHERE team_id = ?")
                .bind(team_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    pub async fn team_members(&self, team_id: i64) -> Result<Vec<Membership>, AppError> {
        let members = sqlx::query_as::<_, Membership>(
            "SELECT player_id, team_id, is_leader FROM memberships WHERE team_id = ?",
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(members)
    }

    /// Places a player on a team and closes their open request. The team is
    /// promoted to complete when the roster reaches [`TEAM_SIZE`]; that
    /// transition is one-way. Runs in a single transaction so a failed join
    /// leaves no partial state.
    pub async fn join_team(
        &self,
        player_id: i64,
        request_id: i64,
        team_id: i64,
    ) -> Result<Team, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO memberships (player_id, team_id, is_leader) VALUES (?, ?, 0)")
            .bind(player_id)
            .bind(team_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE player_requests SET finished_at = unixepoch() WHERE id = ?")
            .bind(request_id)
            .execute(&mut *tx)
            .await?;

        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM memberships WHERE team_id = ?")
                .bind(team_id)
                .fetch_one(&mut *tx)
                .await?;

        if count >= TEAM_SIZE {
            sqlx::query(
                "UPDATE teams SET finished_at = unixepoch() WHERE id = ? AND finished_at IS NULL",
            )
            .bind(team_id)
            .execute(&mut *tx)
            .await?;
        }

        let team = sqlx::query_as::<_, Team>(&format!(
            "SELECT {TEAM_COLUMNS} FROM teams WHERE id = ?"
        ))
        .bind(team_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(team)
    }
}

#[cfg(test)]
mod tests {
    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;
    use crate::db::migrations::run_migrations;

    async fn test_repo() -> Repository {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();
        Repository::new(pool)
    }

    async fn sample_player(repo: &Repository, name: &str, position: &str) -> Player {
        repo.create_player(name, Some("GOLD"), position)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn open_request_is_reused_while_open() {
        let repo = test_repo().await;
        let player = sample_player(&repo, "alice", "MID Mage").await;

        let first = repo.open_request(player.id).await.unwrap();
        let second = repo.open_request(player.id).await.unwrap();

        assert_eq!(first.id, second.id);
        assert!(second.is_open());
    }

    #[tokio::test]
    async fn join_team_closes_request_and_finishes_team_at_five() {
        let repo = test_repo().await;
        let leader = sample_player(&repo, "leader", "TOP Fighter").await;
        let team = repo.create_team_with_leader(leader.id).await.unwrap();
        assert!(team.is_forming());

        for (i, position) in ["JUNGLE Assassin", "MID Mage", "BOTTOM Marksman", "BOTTOM Support"]
            .into_iter()
            .enumerate()
        {
            let player = sample_player(&repo, &format!("member{i}"), position).await;
            let request = repo.open_request(player.id).await.unwrap();
            let team = repo.join_team(player.id, request.id, team.id).await.unwrap();

            assert!(repo
                .get_open_request(player.id)
                .await
                .unwrap()
                .is_none());

            if i < 3 {
                assert!(team.is_forming());
            } else {
                assert!(!team.is_forming());
            }
        }

        assert_eq!(repo.member_count(team.id).await.unwrap(), TEAM_SIZE);

        let members = repo.team_members(team.id).await.unwrap();
        assert_eq!(members.len() as i64, TEAM_SIZE);
        let leaders: Vec<_> = members.iter().filter(|m| m.is_leader).collect();
        assert_eq!(leaders.len(), 1);
        assert_eq!(leaders[0].player_id, leader.id);
    }

    #[tokio::test]
    async fn membership_lookup_tracks_roster() {
        let repo = test_repo().await;
        let leader = sample_player(&repo, "leader", "TOP Fighter").await;
        let outsider = sample_player(&repo, "outsider", "MID Mage").await;
        let team = repo.create_team_with_leader(leader.id).await.unwrap();

        assert!(repo.is_member(leader.id, team.id).await.unwrap());
        assert!(!repo.is_member(outsider.id, team.id).await.unwrap());
    }

    #[tokio::test]
    async fn leads_forming_team_only_while_team_is_open() {
        let repo = test_repo().await;
        let leader = sample_player(&repo, "leader", "TOP Fighter").await;

        assert!(!repo.leads_forming_team(leader.id).await.unwrap());

        let team = repo.create_team_with_leader(leader.id).await.unwrap();
        assert!(repo.leads_forming_team(leader.id).await.unwrap());

        for i in 0..4 {
            let player = sample_player(&repo, &format!("member{i}"), "MID Mage").await;
            let request = repo.open_request(player.id).await.unwrap();
            repo.join_team(player.id, request.id, team.id).await.unwrap();
        }

        // Team is complete, so the leader is free to start another.
        assert!(!repo.leads_forming_team(leader.id).await.unwrap());
    }

    #[tokio::test]
    async fn forming_teams_are_banded_by_leader_rank() {
        let repo = test_repo().await;
        let gold = sample_player(&repo, "goldleader", "TOP Fighter").await;
        let unranked = repo
            .create_player("newleader", None, "MID Mage")
            .await
            .unwrap();

        let gold_team = repo.create_team_with_leader(gold.id).await.unwrap();
        let unranked_team = repo.create_team_with_leader(unranked.id).await.unwrap();

        let found = repo.forming_teams_for_rank(Some("GOLD")).await.unwrap();
        assert_eq!(found.iter().map(|t| t.id).collect::<Vec<_>>(), vec![gold_team.id]);

        let found = repo.forming_teams_for_rank(None).await.unwrap();
        assert_eq!(found.iter().map(|t| t.id).collect::<Vec<_>>(), vec![unranked_team.id]);

        assert!(repo.forming_teams_for_rank(Some("IRON")).await.unwrap().is_empty());
    }
}
