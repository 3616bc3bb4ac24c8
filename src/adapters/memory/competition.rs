//! Events, registrations and scoring over the shared tables.

use async_trait::async_trait;

use crate::domain::event::Event;
use crate::domain::foundation::{
    DomainError, ErrorCode, EventId, RegistrationId, ScoringSessionId, UserId,
};
use crate::domain::registration::{CheckIn, Registration};
use crate::domain::scoring::{
    by_placement, CompetitionResult, JudgeAssignment, JudgeScore, ScoringSession,
};
use crate::ports::{
    EventFilter, EventRepository, RegistrationFilter, RegistrationRepository, ScoringRepository,
};

use super::InMemoryStore;

#[async_trait]
impl EventRepository for InMemoryStore {
    async fn save(&self, event: &Event) -> Result<(), DomainError> {
        self.tables.write().await.events.insert(event.id, event.clone());
        Ok(())
    }

    async fn update(&self, event: &Event) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        match tables.events.get_mut(&event.id) {
            Some(stored) => {
                *stored = event.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::EventNotFound,
                format!("Event not found: {}", event.id),
            )),
        }
    }

    async fn find_by_id(&self, id: &EventId) -> Result<Option<Event>, DomainError> {
        Ok(self.tables.read().await.events.get(id).cloned())
    }

    async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>, DomainError> {
        let tables = self.tables.read().await;
        let mut events: Vec<Event> = tables
            .events
            .values()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        events.sort_by(|a, b| {
            a.details
                .start_date
                .cmp(&b.details.start_date)
                .then(a.created_at.cmp(&b.created_at))
        });
        events.truncate(filter.limit as usize);
        Ok(events)
    }
}

#[async_trait]
impl RegistrationRepository for InMemoryStore {
    async fn save(&self, registration: &Registration) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        let duplicate = tables.registrations.values().any(|r| {
            r.event_id == registration.event_id
                && r.user_id == registration.user_id
                && r.status.is_active()
        });
        if duplicate && registration.status.is_active() {
            return Err(DomainError::new(
                ErrorCode::AlreadyRegistered,
                "Already registered for this event",
            ));
        }
        tables
            .registrations
            .insert(registration.id, registration.clone());
        Ok(())
    }

    async fn update(&self, registration: &Registration) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        match tables.registrations.get_mut(&registration.id) {
            Some(stored) => {
                *stored = registration.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::RegistrationNotFound,
                format!("Registration not found: {}", registration.id),
            )),
        }
    }

    async fn find_by_id(&self, id: &RegistrationId) -> Result<Option<Registration>, DomainError> {
        Ok(self.tables.read().await.registrations.get(id).cloned())
    }

    async fn find_active(
        &self,
        event_id: &EventId,
        user_id: &UserId,
    ) -> Result<Option<Registration>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .registrations
            .values()
            .find(|r| &r.event_id == event_id && &r.user_id == user_id && r.status.is_active())
            .cloned())
    }

    async fn list(&self, filter: &RegistrationFilter) -> Result<Vec<Registration>, DomainError> {
        let tables = self.tables.read().await;
        let mut registrations: Vec<Registration> = tables
            .registrations
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        registrations.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(registrations)
    }

    async fn count_active(&self, event_id: &EventId) -> Result<u32, DomainError> {
        let tables = self.tables.read().await;
        let count = tables
            .registrations
            .values()
            .filter(|r| &r.event_id == event_id && r.status.is_active())
            .count();
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    async fn record_check_in(&self, check_in: &CheckIn) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        if tables.check_ins.contains_key(&check_in.registration_id) {
            return Err(DomainError::new(
                ErrorCode::AlreadyCheckedIn,
                "Registration is already checked in",
            ));
        }
        tables
            .check_ins
            .insert(check_in.registration_id, check_in.clone());
        Ok(())
    }

    async fn find_check_in(
        &self,
        registration_id: &RegistrationId,
    ) -> Result<Option<CheckIn>, DomainError> {
        Ok(self.tables.read().await.check_ins.get(registration_id).cloned())
    }
}

#[async_trait]
impl ScoringRepository for InMemoryStore {
    async fn save_session(&self, session: &ScoringSession) -> Result<(), DomainError> {
        self.tables
            .write()
            .await
            .sessions
            .insert(session.id, session.clone());
        Ok(())
    }

    async fn update_session(&self, session: &ScoringSession) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        match tables.sessions.get_mut(&session.id) {
            Some(stored) => {
                *stored = session.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::ScoringSessionNotFound,
                format!("Scoring session not found: {}", session.id),
            )),
        }
    }

    async fn find_session(
        &self,
        id: &ScoringSessionId,
    ) -> Result<Option<ScoringSession>, DomainError> {
        Ok(self.tables.read().await.sessions.get(id).cloned())
    }

    async fn list_sessions(&self, event_id: &EventId) -> Result<Vec<ScoringSession>, DomainError> {
        let tables = self.tables.read().await;
        let mut sessions: Vec<ScoringSession> = tables
            .sessions
            .values()
            .filter(|s| &s.event_id == event_id)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(sessions)
    }

    async fn assign_judge(&self, assignment: &JudgeAssignment) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        let exists = tables.judges.iter().any(|j| {
            j.session_id == assignment.session_id && j.judge_id == assignment.judge_id
        });
        if exists {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                "Judge is already assigned to this session",
            ));
        }
        tables.judges.push(assignment.clone());
        Ok(())
    }

    async fn is_judge_assigned(
        &self,
        session_id: &ScoringSessionId,
        judge_id: &UserId,
    ) -> Result<bool, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .judges
            .iter()
            .any(|j| &j.session_id == session_id && &j.judge_id == judge_id))
    }

    async fn list_judges(
        &self,
        session_id: &ScoringSessionId,
    ) -> Result<Vec<JudgeAssignment>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .judges
            .iter()
            .filter(|j| &j.session_id == session_id)
            .cloned()
            .collect())
    }

    async fn upsert_score(&self, score: &JudgeScore) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        let existing = tables.scores.iter_mut().find(|s| {
            s.session_id == score.session_id
                && s.judge_id == score.judge_id
                && s.registration_id == score.registration_id
        });
        match existing {
            Some(stored) => {
                stored.points = score.points.clone();
                stored.total = score.total;
                stored.finalized = score.finalized;
                stored.finalized_at = score.finalized_at;
                stored.updated_at = score.updated_at;
            }
            None => tables.scores.push(score.clone()),
        }
        Ok(())
    }

    async fn find_score(
        &self,
        session_id: &ScoringSessionId,
        judge_id: &UserId,
        registration_id: &RegistrationId,
    ) -> Result<Option<JudgeScore>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .scores
            .iter()
            .find(|s| {
                &s.session_id == session_id
                    && &s.judge_id == judge_id
                    && &s.registration_id == registration_id
            })
            .cloned())
    }

    async fn list_scores(
        &self,
        session_id: &ScoringSessionId,
    ) -> Result<Vec<JudgeScore>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .scores
            .iter()
            .filter(|s| &s.session_id == session_id)
            .cloned()
            .collect())
    }

    async fn replace_results(
        &self,
        session_id: &ScoringSessionId,
        results: &[CompetitionResult],
    ) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        tables.results.retain(|r| &r.session_id != session_id);
        tables.results.extend_from_slice(results);
        Ok(())
    }

    async fn list_results(
        &self,
        event_id: &EventId,
        category: Option<&str>,
    ) -> Result<Vec<CompetitionResult>, DomainError> {
        let tables = self.tables.read().await;
        let mut results: Vec<CompetitionResult> = tables
            .results
            .iter()
            .filter(|r| &r.event_id == event_id && category.map_or(true, |c| r.category == c))
            .cloned()
            .collect();
        results.sort_by(by_placement);
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;
    use crate::domain::registration::{sample_entry, RegistrationStatus};

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn registration(event_id: EventId, user_id: UserId) -> Registration {
        let now = Timestamp::now();
        Registration {
            id: RegistrationId::new(),
            event_id,
            user_id,
            entry: sample_entry(),
            amount_due_cents: 3_500,
            status: RegistrationStatus::PendingPayment,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn second_active_registration_is_rejected() {
        let store = InMemoryStore::new();
        let event_id = EventId::new();
        let first = registration(event_id, user("racer-1"));
        RegistrationRepository::save(&store, &first).await.unwrap();

        let second = registration(event_id, user("racer-1"));
        let err = RegistrationRepository::save(&store, &second)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AlreadyRegistered);
    }

    #[tokio::test]
    async fn cancelled_registration_frees_the_slot() {
        let store = InMemoryStore::new();
        let event_id = EventId::new();
        let mut first = registration(event_id, user("racer-1"));
        RegistrationRepository::save(&store, &first).await.unwrap();
        first.status = RegistrationStatus::Cancelled;
        RegistrationRepository::update(&store, &first).await.unwrap();

        assert_eq!(store.count_active(&event_id).await.unwrap(), 0);
        let again = registration(event_id, user("racer-1"));
        RegistrationRepository::save(&store, &again).await.unwrap();
        assert_eq!(store.count_active(&event_id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn check_in_is_recorded_once() {
        let store = InMemoryStore::new();
        let registration = registration(EventId::new(), user("racer-1"));
        let check_in = CheckIn::record(&registration, user("staff-1"));
        store.record_check_in(&check_in).await.unwrap();

        let err = store
            .record_check_in(&CheckIn::record(&registration, user("staff-1")))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AlreadyCheckedIn);
    }
}
