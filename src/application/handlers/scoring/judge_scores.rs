//! Judge sheets: submitting, revising and finalizing scores.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::manage_session::load_session;
use crate::application::handlers::registrations::registration_not_found;
use crate::domain::foundation::{
    DomainError, ErrorCode, RegistrationId, ScoringSessionId, UserId,
};
use crate::domain::registration::RegistrationStatus;
use crate::domain::scoring::{JudgeScore, ScoringSession};
use crate::ports::{RegistrationRepository, ScoringRepository};

#[derive(Debug, Clone)]
pub struct SubmitScoreCommand {
    pub judge_id: UserId,
    pub session_id: ScoringSessionId,
    pub registration_id: RegistrationId,
    /// Points per criterion name.
    pub points: BTreeMap<String, f64>,
}

/// Handler for a judge's sheet.
///
/// Creates the sheet on first submission and replaces it on later ones, until
/// the judge finalizes it. Only assigned judges may score, and only approved
/// registrations in the session's event and category are scored.
pub struct SubmitScoreHandler {
    scoring: Arc<dyn ScoringRepository>,
    registrations: Arc<dyn RegistrationRepository>,
}

impl SubmitScoreHandler {
    pub fn new(
        scoring: Arc<dyn ScoringRepository>,
        registrations: Arc<dyn RegistrationRepository>,
    ) -> Self {
        Self {
            scoring,
            registrations,
        }
    }

    pub async fn handle(&self, cmd: SubmitScoreCommand) -> Result<JudgeScore, DomainError> {
        // 1. Session must be open and the caller assigned to it
        let session = load_session(self.scoring.as_ref(), &cmd.session_id).await?;
        session.ensure_open()?;
        ensure_assigned(self.scoring.as_ref(), &session, &cmd.judge_id).await?;

        // 2. Registrant must be approved for this event and category
        let registration = self
            .registrations
            .find_by_id(&cmd.registration_id)
            .await?
            .ok_or_else(|| registration_not_found(&cmd.registration_id))?;
        if registration.event_id != session.event_id
            || !registration
                .entry
                .category
                .eq_ignore_ascii_case(&session.category)
        {
            return Err(DomainError::validation(
                "registration_id",
                "Registration is not entered in this scoring session's category",
            ));
        }
        if registration.status != RegistrationStatus::Approved {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Only approved registrations can be scored",
            )
            .with_detail("status", registration.status.as_str()));
        }

        // 3. Create or revise the sheet
        let score = match self
            .scoring
            .find_score(&session.id, &cmd.judge_id, &registration.id)
            .await?
        {
            Some(mut existing) => {
                existing.revise(&session, cmd.points)?;
                existing
            }
            None => JudgeScore::submit(&session, cmd.judge_id, registration.id, cmd.points)?,
        };

        // 4. Persist
        self.scoring.upsert_score(&score).await?;
        Ok(score)
    }
}

#[derive(Debug, Clone)]
pub struct FinalizeScoreCommand {
    pub judge_id: UserId,
    pub session_id: ScoringSessionId,
    pub registration_id: RegistrationId,
}

/// Locks a judge's sheet so it counts toward results.
pub struct FinalizeScoreHandler {
    scoring: Arc<dyn ScoringRepository>,
}

impl FinalizeScoreHandler {
    pub fn new(scoring: Arc<dyn ScoringRepository>) -> Self {
        Self { scoring }
    }

    pub async fn handle(&self, cmd: FinalizeScoreCommand) -> Result<JudgeScore, DomainError> {
        let session = load_session(self.scoring.as_ref(), &cmd.session_id).await?;
        ensure_assigned(self.scoring.as_ref(), &session, &cmd.judge_id).await?;

        let mut score = self
            .scoring
            .find_score(&session.id, &cmd.judge_id, &cmd.registration_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::ScoreNotFound,
                    "No score submitted for this registration",
                )
            })?;
        score.finalize(&session)?;
        self.scoring.upsert_score(&score).await?;
        Ok(score)
    }
}

async fn ensure_assigned(
    scoring: &dyn ScoringRepository,
    session: &ScoringSession,
    judge_id: &UserId,
) -> Result<(), DomainError> {
    if scoring.is_judge_assigned(&session.id, judge_id).await? {
        Ok(())
    } else {
        Err(DomainError::new(
            ErrorCode::JudgeNotAssigned,
            "Judge is not assigned to this scoring session",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::test_support::{published_event, upcoming_details, user};
    use crate::domain::foundation::Timestamp;
    use crate::domain::registration::{sample_entry, Registration};
    use crate::domain::scoring::{sheet, sq_rubric, JudgeAssignment};

    struct Setup {
        store: InMemoryStore,
        session: ScoringSession,
        registration: Registration,
    }

    async fn setup(status: RegistrationStatus) -> Setup {
        let store = InMemoryStore::new();
        let event = published_event(&store, upcoming_details()).await;
        let session =
            ScoringSession::open(event.id, "street-2", sq_rubric(), user("organizer-1")).unwrap();
        store.save_session(&session).await.unwrap();
        store
            .assign_judge(&JudgeAssignment {
                session_id: session.id,
                judge_id: user("judge-1"),
                assigned_by: user("organizer-1"),
                assigned_at: Timestamp::now(),
            })
            .await
            .unwrap();
        let mut registration =
            Registration::create(&event, user("fan-1"), sample_entry(), Timestamp::now()).unwrap();
        registration.status = status;
        RegistrationRepository::save(&store, &registration).await.unwrap();
        Setup {
            store,
            session,
            registration,
        }
    }

    fn submit(setup: &Setup, judge: &str, points: BTreeMap<String, f64>) -> SubmitScoreCommand {
        SubmitScoreCommand {
            judge_id: user(judge),
            session_id: setup.session.id,
            registration_id: setup.registration.id,
            points,
        }
    }

    fn submit_handler(setup: &Setup) -> SubmitScoreHandler {
        SubmitScoreHandler::new(Arc::new(setup.store.clone()), Arc::new(setup.store.clone()))
    }

    #[tokio::test]
    async fn resubmission_revises_the_draft() {
        let setup = setup(RegistrationStatus::Approved).await;
        let handler = submit_handler(&setup);

        let first = handler.handle(submit(&setup, "judge-1", sheet(8.0, 6.0, 10.0))).await.unwrap();
        assert_eq!(first.total, 8.0);
        let second = handler.handle(submit(&setup, "judge-1", sheet(10.0, 10.0, 10.0))).await.unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.total, 10.0);
        assert_eq!(setup.store.list_scores(&setup.session.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unassigned_judge_is_refused() {
        let setup = setup(RegistrationStatus::Approved).await;
        let err = submit_handler(&setup)
            .handle(submit(&setup, "judge-2", sheet(8.0, 6.0, 10.0)))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::JudgeNotAssigned);
    }

    #[tokio::test]
    async fn unapproved_registration_cannot_be_scored() {
        let setup = setup(RegistrationStatus::Confirmed).await;
        let err = submit_handler(&setup)
            .handle(submit(&setup, "judge-1", sheet(8.0, 6.0, 10.0)))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }

    #[tokio::test]
    async fn out_of_range_points_are_rejected() {
        let setup = setup(RegistrationStatus::Approved).await;
        let err = submit_handler(&setup)
            .handle(submit(&setup, "judge-1", sheet(11.0, 6.0, 10.0)))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
    }

    #[tokio::test]
    async fn finalized_score_cannot_change() {
        let setup = setup(RegistrationStatus::Approved).await;
        submit_handler(&setup)
            .handle(submit(&setup, "judge-1", sheet(8.0, 6.0, 10.0)))
            .await
            .unwrap();

        let finalized = FinalizeScoreHandler::new(Arc::new(setup.store.clone()))
            .handle(FinalizeScoreCommand {
                judge_id: user("judge-1"),
                session_id: setup.session.id,
                registration_id: setup.registration.id,
            })
            .await
            .unwrap();
        assert!(finalized.finalized);

        let err = submit_handler(&setup)
            .handle(submit(&setup, "judge-1", sheet(10.0, 10.0, 10.0)))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ScoreFinalized);
    }

    #[tokio::test]
    async fn finalizing_without_a_sheet_is_not_found() {
        let setup = setup(RegistrationStatus::Approved).await;
        let err = FinalizeScoreHandler::new(Arc::new(setup.store.clone()))
            .handle(FinalizeScoreCommand {
                judge_id: user("judge-1"),
                session_id: setup.session.id,
                registration_id: setup.registration.id,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ScoreNotFound);
    }
}
