//! PostgreSQL implementation of ScoringRepository.
//!
//! Rubrics and per-criterion points are stored as JSONB. Result replacement
//! runs in one transaction so readers never see a half-written leaderboard.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{
    DomainError, ErrorCode, EventId, JudgeScoreId, RegistrationId, ResultId, ScoringSessionId,
    Timestamp, UserId,
};
use crate::domain::scoring::{
    CompetitionResult, JudgeAssignment, JudgeScore, Rubric, ScoringSession,
};
use crate::ports::ScoringRepository;

use super::rows::{is_unique_violation, parse_column, to_i32, to_u32};

pub struct PostgresScoringRepository {
    pool: PgPool,
}

impl PostgresScoringRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SessionRow {
    id: Uuid,
    event_id: Uuid,
    category: String,
    rubric: Json<Rubric>,
    status: String,
    created_by: String,
    created_at: DateTime<Utc>,
    closed_at: Option<DateTime<Utc>>,
}

impl TryFrom<SessionRow> for ScoringSession {
    type Error = DomainError;

    fn try_from(row: SessionRow) -> Result<Self, Self::Error> {
        Ok(ScoringSession {
            id: ScoringSessionId::from_uuid(row.id),
            event_id: EventId::from_uuid(row.event_id),
            category: row.category,
            rubric: row.rubric.0,
            status: parse_column("status", &row.status)?,
            created_by: parse_column("created_by", &row.created_by)?,
            created_at: Timestamp::from_datetime(row.created_at),
            closed_at: row.closed_at.map(Timestamp::from_datetime),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AssignmentRow {
    session_id: Uuid,
    judge_id: String,
    assigned_by: String,
    assigned_at: DateTime<Utc>,
}

impl TryFrom<AssignmentRow> for JudgeAssignment {
    type Error = DomainError;

    fn try_from(row: AssignmentRow) -> Result<Self, Self::Error> {
        Ok(JudgeAssignment {
            session_id: ScoringSessionId::from_uuid(row.session_id),
            judge_id: parse_column("judge_id", &row.judge_id)?,
            assigned_by: parse_column("assigned_by", &row.assigned_by)?,
            assigned_at: Timestamp::from_datetime(row.assigned_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ScoreRow {
    id: Uuid,
    session_id: Uuid,
    judge_id: String,
    registration_id: Uuid,
    points: Json<BTreeMap<String, f64>>,
    total: f64,
    finalized: bool,
    finalized_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ScoreRow> for JudgeScore {
    type Error = DomainError;

    fn try_from(row: ScoreRow) -> Result<Self, Self::Error> {
        Ok(JudgeScore {
            id: JudgeScoreId::from_uuid(row.id),
            session_id: ScoringSessionId::from_uuid(row.session_id),
            judge_id: parse_column("judge_id", &row.judge_id)?,
            registration_id: RegistrationId::from_uuid(row.registration_id),
            points: row.points.0,
            total: row.total,
            finalized: row.finalized,
            finalized_at: row.finalized_at.map(Timestamp::from_datetime),
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ResultRow {
    id: Uuid,
    event_id: Uuid,
    session_id: Uuid,
    category: String,
    registration_id: Uuid,
    competitor_name: String,
    average_score: f64,
    judge_count: i32,
    placement: i32,
    points: i32,
    computed_at: DateTime<Utc>,
}

impl TryFrom<ResultRow> for CompetitionResult {
    type Error = DomainError;

    fn try_from(row: ResultRow) -> Result<Self, Self::Error> {
        Ok(CompetitionResult {
            id: ResultId::from_uuid(row.id),
            event_id: EventId::from_uuid(row.event_id),
            session_id: ScoringSessionId::from_uuid(row.session_id),
            category: row.category,
            registration_id: RegistrationId::from_uuid(row.registration_id),
            competitor_name: row.competitor_name,
            average_score: row.average_score,
            judge_count: to_u32("judge_count", row.judge_count)?,
            placement: to_u32("placement", row.placement)?,
            points: to_u32("points", row.points)?,
            computed_at: Timestamp::from_datetime(row.computed_at),
        })
    }
}

const SELECT_SESSION: &str = r#"
    SELECT id, event_id, category, rubric, status, created_by, created_at, closed_at
    FROM scoring_sessions
"#;

const SELECT_SCORE: &str = r#"
    SELECT id, session_id, judge_id, registration_id, points, total, finalized,
           finalized_at, created_at, updated_at
    FROM judge_scores
"#;

#[async_trait]
impl ScoringRepository for PostgresScoringRepository {
    async fn save_session(&self, session: &ScoringSession) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO scoring_sessions (
                id, event_id, category, rubric, status, created_by, created_at, closed_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(session.id.as_uuid())
        .bind(session.event_id.as_uuid())
        .bind(&session.category)
        .bind(Json(&session.rubric))
        .bind(session.status.as_str())
        .bind(session.created_by.as_str())
        .bind(session.created_at.as_datetime())
        .bind(session.closed_at.map(|t| *t.as_datetime()))
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to save scoring session", e))?;

        Ok(())
    }

    async fn update_session(&self, session: &ScoringSession) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE scoring_sessions SET status = $2, closed_at = $3 WHERE id = $1",
        )
        .bind(session.id.as_uuid())
        .bind(session.status.as_str())
        .bind(session.closed_at.map(|t| *t.as_datetime()))
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to update scoring session", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::ScoringSessionNotFound,
                format!("Scoring session not found: {}", session.id),
            ));
        }
        Ok(())
    }

    async fn find_session(
        &self,
        id: &ScoringSessionId,
    ) -> Result<Option<ScoringSession>, DomainError> {
        let row: Option<SessionRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_SESSION))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to fetch scoring session", e))?;

        row.map(ScoringSession::try_from).transpose()
    }

    async fn list_sessions(&self, event_id: &EventId) -> Result<Vec<ScoringSession>, DomainError> {
        let rows: Vec<SessionRow> = sqlx::query_as(&format!(
            "{} WHERE event_id = $1 ORDER BY category ASC, created_at ASC",
            SELECT_SESSION
        ))
        .bind(event_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list scoring sessions", e))?;

        rows.into_iter().map(ScoringSession::try_from).collect()
    }

    async fn assign_judge(&self, assignment: &JudgeAssignment) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO judge_assignments (session_id, judge_id, assigned_by, assigned_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(assignment.session_id.as_uuid())
        .bind(assignment.judge_id.as_str())
        .bind(assignment.assigned_by.as_str())
        .bind(assignment.assigned_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return DomainError::new(
                    ErrorCode::Conflict,
                    "Judge is already assigned to this session",
                );
            }
            DomainError::database("Failed to assign judge", e)
        })?;

        Ok(())
    }

    async fn is_judge_assigned(
        &self,
        session_id: &ScoringSessionId,
        judge_id: &UserId,
    ) -> Result<bool, DomainError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM judge_assignments WHERE session_id = $1 AND judge_id = $2
            )
            "#,
        )
        .bind(session_id.as_uuid())
        .bind(judge_id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to check judge assignment", e))?;

        Ok(exists)
    }

    async fn list_judges(
        &self,
        session_id: &ScoringSessionId,
    ) -> Result<Vec<JudgeAssignment>, DomainError> {
        let rows: Vec<AssignmentRow> = sqlx::query_as(
            r#"
            SELECT session_id, judge_id, assigned_by, assigned_at
            FROM judge_assignments
            WHERE session_id = $1
            ORDER BY assigned_at ASC
            "#,
        )
        .bind(session_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list judges", e))?;

        rows.into_iter().map(JudgeAssignment::try_from).collect()
    }

    async fn upsert_score(&self, score: &JudgeScore) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO judge_scores (
                id, session_id, judge_id, registration_id, points, total, finalized,
                finalized_at, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT ON CONSTRAINT judge_scores_sheet_key DO UPDATE SET
                points = EXCLUDED.points,
                total = EXCLUDED.total,
                finalized = EXCLUDED.finalized,
                finalized_at = EXCLUDED.finalized_at,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(score.id.as_uuid())
        .bind(score.session_id.as_uuid())
        .bind(score.judge_id.as_str())
        .bind(score.registration_id.as_uuid())
        .bind(Json(&score.points))
        .bind(score.total)
        .bind(score.finalized)
        .bind(score.finalized_at.map(|t| *t.as_datetime()))
        .bind(score.created_at.as_datetime())
        .bind(score.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to save judge score", e))?;

        Ok(())
    }

    async fn find_score(
        &self,
        session_id: &ScoringSessionId,
        judge_id: &UserId,
        registration_id: &RegistrationId,
    ) -> Result<Option<JudgeScore>, DomainError> {
        let row: Option<ScoreRow> = sqlx::query_as(&format!(
            "{} WHERE session_id = $1 AND judge_id = $2 AND registration_id = $3",
            SELECT_SCORE
        ))
        .bind(session_id.as_uuid())
        .bind(judge_id.as_str())
        .bind(registration_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch judge score", e))?;

        row.map(JudgeScore::try_from).transpose()
    }

    async fn list_scores(
        &self,
        session_id: &ScoringSessionId,
    ) -> Result<Vec<JudgeScore>, DomainError> {
        let rows: Vec<ScoreRow> = sqlx::query_as(&format!(
            "{} WHERE session_id = $1 ORDER BY created_at ASC",
            SELECT_SCORE
        ))
        .bind(session_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list judge scores", e))?;

        rows.into_iter().map(JudgeScore::try_from).collect()
    }

    async fn replace_results(
        &self,
        session_id: &ScoringSessionId,
        results: &[CompetitionResult],
    ) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::database("Failed to begin transaction", e))?;

        sqlx::query("DELETE FROM competition_results WHERE session_id = $1")
            .bind(session_id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::database("Failed to clear results", e))?;

        for result in results {
            sqlx::query(
                r#"
                INSERT INTO competition_results (
                    id, event_id, session_id, category, registration_id, competitor_name,
                    average_score, judge_count, placement, points, computed_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                "#,
            )
            .bind(result.id.as_uuid())
            .bind(result.event_id.as_uuid())
            .bind(result.session_id.as_uuid())
            .bind(&result.category)
            .bind(result.registration_id.as_uuid())
            .bind(&result.competitor_name)
            .bind(result.average_score)
            .bind(to_i32("judge_count", result.judge_count)?)
            .bind(to_i32("placement", result.placement)?)
            .bind(to_i32("points", result.points)?)
            .bind(result.computed_at.as_datetime())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::database("Failed to save result", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| DomainError::database("Failed to commit results", e))?;

        Ok(())
    }

    async fn list_results(
        &self,
        event_id: &EventId,
        category: Option<&str>,
    ) -> Result<Vec<CompetitionResult>, DomainError> {
        let rows: Vec<ResultRow> = sqlx::query_as(
            r#"
            SELECT id, event_id, session_id, category, registration_id, competitor_name,
                   average_score, judge_count, placement, points, computed_at
            FROM competition_results
            WHERE event_id = $1 AND ($2::text IS NULL OR category = $2)
            ORDER BY category ASC, placement ASC
            "#,
        )
        .bind(event_id.as_uuid())
        .bind(category)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list results", e))?;

        rows.into_iter().map(CompetitionResult::try_from).collect()
    }
}
