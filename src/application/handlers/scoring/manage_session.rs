//! Scoring session setup: opening sessions and assigning judges.

use std::sync::Arc;

use crate::application::handlers::events::load_managed_event;
use crate::application::Actor;
use crate::domain::foundation::{DomainError, ErrorCode, EventId, ScoringSessionId, Timestamp, UserId};
use crate::domain::scoring::{Criterion, JudgeAssignment, Rubric, ScoringSession};
use crate::ports::{EventRepository, ScoringRepository};

#[derive(Debug, Clone)]
pub struct CreateScoringSessionCommand {
    pub actor: Actor,
    pub event_id: EventId,
    pub category: String,
    pub criteria: Vec<Criterion>,
}

/// Opens judging for one category of an event (organizer or admin).
pub struct CreateScoringSessionHandler {
    events: Arc<dyn EventRepository>,
    scoring: Arc<dyn ScoringRepository>,
}

impl CreateScoringSessionHandler {
    pub fn new(events: Arc<dyn EventRepository>, scoring: Arc<dyn ScoringRepository>) -> Self {
        Self { events, scoring }
    }

    pub async fn handle(&self, cmd: CreateScoringSessionCommand) -> Result<ScoringSession, DomainError> {
        let event = load_managed_event(self.events.as_ref(), &cmd.actor, &cmd.event_id).await?;
        let rubric = Rubric::new(cmd.criteria)?;
        let session = ScoringSession::open(event.id, cmd.category, rubric, cmd.actor.user_id)?;
        self.scoring.save_session(&session).await?;
        tracing::info!(
            event_id = %event.id,
            session_id = %session.id,
            category = %session.category,
            "Scoring session opened"
        );
        Ok(session)
    }
}

#[derive(Debug, Clone)]
pub struct AssignJudgeCommand {
    pub actor: Actor,
    pub session_id: ScoringSessionId,
    pub judge_id: UserId,
}

/// Grants a user permission to score a session (organizer or admin).
pub struct AssignJudgeHandler {
    events: Arc<dyn EventRepository>,
    scoring: Arc<dyn ScoringRepository>,
}

impl AssignJudgeHandler {
    pub fn new(events: Arc<dyn EventRepository>, scoring: Arc<dyn ScoringRepository>) -> Self {
        Self { events, scoring }
    }

    pub async fn handle(&self, cmd: AssignJudgeCommand) -> Result<JudgeAssignment, DomainError> {
        let session = load_managed_session(
            self.events.as_ref(),
            self.scoring.as_ref(),
            &cmd.actor,
            &cmd.session_id,
        )
        .await?;
        session.ensure_open()?;

        let assignment = JudgeAssignment {
            session_id: session.id,
            judge_id: cmd.judge_id,
            assigned_by: cmd.actor.user_id,
            assigned_at: Timestamp::now(),
        };
        self.scoring.assign_judge(&assignment).await?;
        Ok(assignment)
    }
}

pub(crate) fn session_not_found(id: &ScoringSessionId) -> DomainError {
    DomainError::new(
        ErrorCode::ScoringSessionNotFound,
        format!("Scoring session {} not found", id),
    )
}

pub(crate) async fn load_session(
    scoring: &dyn ScoringRepository,
    id: &ScoringSessionId,
) -> Result<ScoringSession, DomainError> {
    scoring
        .find_session(id)
        .await?
        .ok_or_else(|| session_not_found(id))
}

/// Loads a session whose event the actor organizes (or any, for admins).
pub(crate) async fn load_managed_session(
    events: &dyn EventRepository,
    scoring: &dyn ScoringRepository,
    actor: &Actor,
    id: &ScoringSessionId,
) -> Result<ScoringSession, DomainError> {
    let session = load_session(scoring, id).await?;
    load_managed_event(events, actor, &session.event_id).await?;
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::test_support::{
        competitor, organizer, published_event, upcoming_details, user,
    };
    use crate::domain::scoring::sq_rubric;

    async fn session(store: &InMemoryStore) -> ScoringSession {
        let event = published_event(store, upcoming_details()).await;
        CreateScoringSessionHandler::new(Arc::new(store.clone()), Arc::new(store.clone()))
            .handle(CreateScoringSessionCommand {
                actor: organizer(),
                event_id: event.id,
                category: " sq-expert ".into(),
                criteria: sq_rubric().criteria().to_vec(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn organizer_opens_session() {
        let store = InMemoryStore::new();
        let session = session(&store).await;
        assert_eq!(session.category, "sq-expert");
        assert!(store.find_session(&session.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn duplicate_criteria_are_rejected() {
        let store = InMemoryStore::new();
        let event = published_event(&store, upcoming_details()).await;
        let mut criteria = sq_rubric().criteria().to_vec();
        criteria.push(criteria[0].clone());

        let err = CreateScoringSessionHandler::new(Arc::new(store.clone()), Arc::new(store))
            .handle(CreateScoringSessionCommand {
                actor: organizer(),
                event_id: event.id,
                category: "sq-expert".into(),
                criteria,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
    }

    #[tokio::test]
    async fn judge_assignment_is_unique() {
        let store = InMemoryStore::new();
        let session = session(&store).await;
        let handler = AssignJudgeHandler::new(Arc::new(store.clone()), Arc::new(store.clone()));
        let cmd = AssignJudgeCommand {
            actor: organizer(),
            session_id: session.id,
            judge_id: user("judge-1"),
        };

        handler.handle(cmd.clone()).await.unwrap();
        assert!(store
            .is_judge_assigned(&session.id, &user("judge-1"))
            .await
            .unwrap());
        let err = handler.handle(cmd).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn competitors_cannot_assign_judges() {
        let store = InMemoryStore::new();
        let session = session(&store).await;
        let err = AssignJudgeHandler::new(Arc::new(store.clone()), Arc::new(store))
            .handle(AssignJudgeCommand {
                actor: competitor("fan-1"),
                session_id: session.id,
                judge_id: user("fan-1"),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }
}
