//! Competition judging: rubrics, judge sheets and result ranking.

mod ranking;
mod rubric;
mod session;

pub use ranking::{
    average_finalized, by_placement, placement_points, rank, CompetitionResult, Contender,
    RankedResult, ScoreLine,
};
pub use rubric::{Criterion, Rubric, MAX_CRITERION_WEIGHT};
pub use session::{JudgeAssignment, JudgeScore, ScoringSession, ScoringStatus};

#[cfg(test)]
pub(crate) use rubric::tests::{sheet, sq_rubric};
