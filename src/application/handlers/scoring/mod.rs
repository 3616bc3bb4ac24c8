//! Judging handlers.
//!
//! ## Commands
//! - Opening a scoring session for an event category
//! - Assigning judges
//! - Submitting, revising and finalizing judge sheets
//! - Computing results and closing a session
//!
//! ## Queries
//! - Published results per event and category
//! - Sessions of an event

mod judge_scores;
mod manage_session;
mod results;

// Commands
pub use judge_scores::{
    FinalizeScoreCommand, FinalizeScoreHandler, SubmitScoreCommand, SubmitScoreHandler,
};
pub use manage_session::{
    AssignJudgeCommand, AssignJudgeHandler, CreateScoringSessionCommand,
    CreateScoringSessionHandler,
};
pub use results::{
    CloseScoringSessionCommand, CloseScoringSessionHandler, CloseScoringSessionResult,
    ComputeResultsCommand, ComputeResultsHandler,
};

// Queries
pub use results::{GetResultsHandler, GetResultsQuery, ListScoringSessionsHandler};
