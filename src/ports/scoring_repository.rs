//! Scoring sessions, judge sheets and computed results.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventId, RegistrationId, ScoringSessionId, UserId};
use crate::domain::scoring::{CompetitionResult, JudgeAssignment, JudgeScore, ScoringSession};

#[async_trait]
pub trait ScoringRepository: Send + Sync {
    async fn save_session(&self, session: &ScoringSession) -> Result<(), DomainError>;

    async fn update_session(&self, session: &ScoringSession) -> Result<(), DomainError>;

    async fn find_session(
        &self,
        id: &ScoringSessionId,
    ) -> Result<Option<ScoringSession>, DomainError>;

    async fn list_sessions(&self, event_id: &EventId) -> Result<Vec<ScoringSession>, DomainError>;

    /// # Errors
    ///
    /// - `Conflict` if the judge is already assigned to the session
    async fn assign_judge(&self, assignment: &JudgeAssignment) -> Result<(), DomainError>;

    async fn is_judge_assigned(
        &self,
        session_id: &ScoringSessionId,
        judge_id: &UserId,
    ) -> Result<bool, DomainError>;

    async fn list_judges(
        &self,
        session_id: &ScoringSessionId,
    ) -> Result<Vec<JudgeAssignment>, DomainError>;

    /// Inserts or replaces the sheet for its (session, judge, registration).
    async fn upsert_score(&self, score: &JudgeScore) -> Result<(), DomainError>;

    async fn find_score(
        &self,
        session_id: &ScoringSessionId,
        judge_id: &UserId,
        registration_id: &RegistrationId,
    ) -> Result<Option<JudgeScore>, DomainError>;

    async fn list_scores(
        &self,
        session_id: &ScoringSessionId,
    ) -> Result<Vec<JudgeScore>, DomainError>;

    /// Replaces every stored result of the session atomically.
    async fn replace_results(
        &self,
        session_id: &ScoringSessionId,
        results: &[CompetitionResult],
    ) -> Result<(), DomainError>;

    /// Results ordered by category then placement.
    async fn list_results(
        &self,
        event_id: &EventId,
        category: Option<&str>,
    ) -> Result<Vec<CompetitionResult>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoring_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn ScoringRepository) {}
    }
}
