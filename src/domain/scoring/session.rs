//! Scoring sessions, judge assignments and judge score sheets.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    str_enum, DomainError, ErrorCode, EventId, JudgeScoreId, RegistrationId, ScoringSessionId,
    StateMachine, Timestamp, UserId, ValidationError,
};

use super::Rubric;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringStatus {
    /// Judges may submit and finalize sheets.
    Open,
    /// Results computed; sheets are frozen.
    Closed,
}

str_enum!(ScoringStatus {
    Open => "open",
    Closed => "closed",
});

impl StateMachine for ScoringStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        matches!((self, target), (ScoringStatus::Open, ScoringStatus::Closed))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            ScoringStatus::Open => vec![ScoringStatus::Closed],
            ScoringStatus::Closed => vec![],
        }
    }
}

/// Judging of one competition category at one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringSession {
    pub id: ScoringSessionId,
    pub event_id: EventId,
    pub category: String,
    pub rubric: Rubric,
    pub status: ScoringStatus,
    pub created_by: UserId,
    pub created_at: Timestamp,
    pub closed_at: Option<Timestamp>,
}

impl ScoringSession {
    pub fn open(
        event_id: EventId,
        category: impl Into<String>,
        rubric: Rubric,
        created_by: UserId,
    ) -> Result<Self, ValidationError> {
        let category = category.into().trim().to_string();
        if category.is_empty() {
            return Err(ValidationError::empty_field("category"));
        }
        Ok(Self {
            id: ScoringSessionId::new(),
            event_id,
            category,
            rubric,
            status: ScoringStatus::Open,
            created_by,
            created_at: Timestamp::now(),
            closed_at: None,
        })
    }

    pub fn ensure_open(&self) -> Result<(), DomainError> {
        if self.status != ScoringStatus::Open {
            return Err(DomainError::new(
                ErrorCode::ScoringClosed,
                "Scoring session is closed",
            ));
        }
        Ok(())
    }

    pub fn close(&mut self) -> Result<(), DomainError> {
        self.status = self.status.transition_to(ScoringStatus::Closed)?;
        self.closed_at = Some(Timestamp::now());
        Ok(())
    }
}

/// A judge's permission to score a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgeAssignment {
    pub session_id: ScoringSessionId,
    pub judge_id: UserId,
    pub assigned_by: UserId,
    pub assigned_at: Timestamp,
}

/// One judge's sheet for one registrant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeScore {
    pub id: JudgeScoreId,
    pub session_id: ScoringSessionId,
    pub judge_id: UserId,
    pub registration_id: RegistrationId,
    /// Points per criterion name.
    pub points: BTreeMap<String, f64>,
    /// Weighted mean of `points` under the session rubric.
    pub total: f64,
    pub finalized: bool,
    pub finalized_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl JudgeScore {
    pub fn submit(
        session: &ScoringSession,
        judge_id: UserId,
        registration_id: RegistrationId,
        points: BTreeMap<String, f64>,
    ) -> Result<Self, DomainError> {
        session.ensure_open()?;
        let total = session.rubric.weighted_total(&points)?;
        let now = Timestamp::now();
        Ok(Self {
            id: JudgeScoreId::new(),
            session_id: session.id,
            judge_id,
            registration_id,
            points,
            total,
            finalized: false,
            finalized_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replaces the sheet while it is still a draft.
    pub fn revise(
        &mut self,
        session: &ScoringSession,
        points: BTreeMap<String, f64>,
    ) -> Result<(), DomainError> {
        session.ensure_open()?;
        self.ensure_draft()?;
        self.total = session.rubric.weighted_total(&points)?;
        self.points = points;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Locks the sheet so it counts toward results.
    pub fn finalize(&mut self, session: &ScoringSession) -> Result<(), DomainError> {
        session.ensure_open()?;
        self.ensure_draft()?;
        let now = Timestamp::now();
        self.finalized = true;
        self.finalized_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    fn ensure_draft(&self) -> Result<(), DomainError> {
        if self.finalized {
            return Err(DomainError::new(
                ErrorCode::ScoreFinalized,
                "Score has been finalized and can no longer change",
            ));
        }
        Ok(())
    }
}
