//! Request and response DTOs for judging endpoints.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::application::handlers::scoring::CloseScoringSessionResult;
use crate::domain::scoring::{CompetitionResult, ScoringSession};

#[derive(Debug, Clone, Deserialize)]
pub struct AssignJudgeRequest {
    pub judge_id: String,
}

/// Points per criterion name.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitScoreRequest {
    pub points: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CloseSessionResponse {
    pub session: ScoringSession,
    pub results: Vec<CompetitionResult>,
}

impl From<CloseScoringSessionResult> for CloseSessionResponse {
    fn from(result: CloseScoringSessionResult) -> Self {
        Self {
            session: result.session,
            results: result.results,
        }
    }
}
