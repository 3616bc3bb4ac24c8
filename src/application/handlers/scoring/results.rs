//! Result computation, session closing and result queries.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;

use super::manage_session::load_managed_session;
use crate::application::side_effects::record_audit;
use crate::application::Actor;
use crate::domain::audit::{AuditAction, AuditEntry};
use crate::domain::foundation::{DomainError, EventId, RegistrationId, ScoringSessionId, Timestamp};
use crate::domain::registration::RegistrationStatus;
use crate::domain::scoring::{
    rank, CompetitionResult, Contender, ScoreLine, ScoringSession,
};
use crate::ports::{
    AuditLog, EventRepository, RegistrationFilter, RegistrationRepository, ScoringRepository,
};

/// Ranks a session's approved registrants and replaces its stored results.
///
/// Only finalized sheets count; registrants without one are left out.
pub(crate) async fn compute_results(
    scoring: &dyn ScoringRepository,
    registrations: &dyn RegistrationRepository,
    session: &ScoringSession,
) -> Result<Vec<CompetitionResult>, DomainError> {
    let approved = registrations
        .list(&RegistrationFilter {
            event_id: Some(session.event_id),
            user_id: None,
            status: Some(RegistrationStatus::Approved),
        })
        .await?;
    let entrants: Vec<_> = approved
        .into_iter()
        .filter(|r| r.entry.category.eq_ignore_ascii_case(&session.category))
        .collect();

    let mut lines: HashMap<RegistrationId, Vec<ScoreLine>> = HashMap::new();
    for score in scoring.list_scores(&session.id).await? {
        lines
            .entry(score.registration_id)
            .or_default()
            .push(ScoreLine::from(&score));
    }

    let contenders: Vec<Contender> = entrants
        .iter()
        .map(|r| Contender {
            registration_id: r.id,
            registered_at: r.created_at,
            scores: lines.remove(&r.id).unwrap_or_default(),
        })
        .collect();

    let names: HashMap<RegistrationId, &str> = entrants
        .iter()
        .map(|r| (r.id, r.entry.competitor_name.as_str()))
        .collect();
    let computed_at = Timestamp::now();
    let results: Vec<CompetitionResult> = rank(&contenders)
        .iter()
        .map(|ranked| {
            CompetitionResult::from_ranked(
                session.event_id,
                session.id,
                &session.category,
                names
                    .get(&ranked.registration_id)
                    .copied()
                    .unwrap_or_default(),
                ranked,
                computed_at,
            )
        })
        .collect();

    scoring.replace_results(&session.id, &results).await?;
    tracing::info!(
        session_id = %session.id,
        ranked = results.len(),
        entrants = entrants.len(),
        "Competition results computed"
    );
    Ok(results)
}

#[derive(Debug, Clone)]
pub struct ComputeResultsCommand {
    pub actor: Actor,
    pub session_id: ScoringSessionId,
}

/// Recomputes standings for a session without closing it.
pub struct ComputeResultsHandler {
    events: Arc<dyn EventRepository>,
    registrations: Arc<dyn RegistrationRepository>,
    scoring: Arc<dyn ScoringRepository>,
}

impl ComputeResultsHandler {
    pub fn new(
        events: Arc<dyn EventRepository>,
        registrations: Arc<dyn RegistrationRepository>,
        scoring: Arc<dyn ScoringRepository>,
    ) -> Self {
        Self {
            events,
            registrations,
            scoring,
        }
    }

    pub async fn handle(&self, cmd: ComputeResultsCommand) -> Result<Vec<CompetitionResult>, DomainError> {
        let session = load_managed_session(
            self.events.as_ref(),
            self.scoring.as_ref(),
            &cmd.actor,
            &cmd.session_id,
        )
        .await?;
        compute_results(self.scoring.as_ref(), self.registrations.as_ref(), &session).await
    }
}

#[derive(Debug, Clone)]
pub struct CloseScoringSessionCommand {
    pub actor: Actor,
    pub session_id: ScoringSessionId,
}

#[derive(Debug, Clone)]
pub struct CloseScoringSessionResult {
    pub session: ScoringSession,
    pub results: Vec<CompetitionResult>,
}

/// Closes judging and persists the final results.
///
/// Results are written before the session is marked closed, so a failed
/// computation leaves the session open for another attempt.
pub struct CloseScoringSessionHandler {
    events: Arc<dyn EventRepository>,
    registrations: Arc<dyn RegistrationRepository>,
    scoring: Arc<dyn ScoringRepository>,
    audit: Arc<dyn AuditLog>,
}

impl CloseScoringSessionHandler {
    pub fn new(
        events: Arc<dyn EventRepository>,
        registrations: Arc<dyn RegistrationRepository>,
        scoring: Arc<dyn ScoringRepository>,
        audit: Arc<dyn AuditLog>,
    ) -> Self {
        Self {
            events,
            registrations,
            scoring,
            audit,
        }
    }

    pub async fn handle(
        &self,
        cmd: CloseScoringSessionCommand,
    ) -> Result<CloseScoringSessionResult, DomainError> {
        // 1. Load and check the transition up front
        let mut session = load_managed_session(
            self.events.as_ref(),
            self.scoring.as_ref(),
            &cmd.actor,
            &cmd.session_id,
        )
        .await?;
        session.close()?;

        // 2. Rank and store results
        let results =
            compute_results(self.scoring.as_ref(), self.registrations.as_ref(), &session).await?;

        // 3. Mark closed
        self.scoring.update_session(&session).await?;

        // 4. Audit (non-critical)
        record_audit(
            self.audit.as_ref(),
            AuditEntry::record(
                cmd.actor.user_id,
                AuditAction::ScoringSessionClosed,
                "scoring_session",
                session.id,
                json!({ "category": session.category, "ranked": results.len() }),
            ),
        )
        .await;

        Ok(CloseScoringSessionResult { session, results })
    }
}

#[derive(Debug, Clone)]
pub struct GetResultsQuery {
    pub event_id: EventId,
    pub category: Option<String>,
}

/// Public standings for an event, ordered by category then placement.
pub struct GetResultsHandler {
    scoring: Arc<dyn ScoringRepository>,
}

impl GetResultsHandler {
    pub fn new(scoring: Arc<dyn ScoringRepository>) -> Self {
        Self { scoring }
    }

    pub async fn handle(&self, query: GetResultsQuery) -> Result<Vec<CompetitionResult>, DomainError> {
        self.scoring
            .list_results(&query.event_id, query.category.as_deref())
            .await
    }
}

/// Scoring sessions of an event.
pub struct ListScoringSessionsHandler {
    scoring: Arc<dyn ScoringRepository>,
}

impl ListScoringSessionsHandler {
    pub fn new(scoring: Arc<dyn ScoringRepository>) -> Self {
        Self { scoring }
    }

    pub async fn handle(&self, event_id: EventId) -> Result<Vec<ScoringSession>, DomainError> {
        self.scoring.list_sessions(&event_id).await
    }
}
