//! Competition result ranking.
//!
//! Each approved registrant's finalized judge totals are averaged, registrants are
//! ordered by descending average, and placement points come from a fixed table.
//! Equal averages are ordered by earlier registration, then registration id, so
//! placements are always a gapless `1..=N` sequence.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    EventId, RegistrationId, ResultId, ScoringSessionId, Timestamp, UserId,
};

use super::JudgeScore;

/// The part of a judge sheet that matters for ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreLine {
    pub judge_id: UserId,
    pub total: f64,
    pub finalized: bool,
}

impl From<&JudgeScore> for ScoreLine {
    fn from(score: &JudgeScore) -> Self {
        Self {
            judge_id: score.judge_id.clone(),
            total: score.total,
            finalized: score.finalized,
        }
    }
}

/// A registrant eligible for placement.
#[derive(Debug, Clone, PartialEq)]
pub struct Contender {
    pub registration_id: RegistrationId,
    pub registered_at: Timestamp,
    pub scores: Vec<ScoreLine>,
}

/// Arithmetic mean of the finalized totals, `None` when nothing is finalized.
pub fn average_finalized(scores: &[ScoreLine]) -> Option<f64> {
    let (sum, count) = scores
        .iter()
        .filter(|s| s.finalized)
        .fold((0.0, 0u32), |(sum, count), s| (sum + s.total, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Points awarded for a 1-based placement.
pub fn placement_points(placement: u32) -> u32 {
    match placement {
        1 => 100,
        2 => 75,
        3 => 50,
        4..=10 => 25,
        _ => 10,
    }
}

/// A contender's computed standing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    pub registration_id: RegistrationId,
    pub average_score: f64,
    /// Finalized sheets that contributed to the average.
    pub judge_count: u32,
    pub placement: u32,
    pub points: u32,
}

/// Ranks contenders with at least one finalized score.
pub fn rank(contenders: &[Contender]) -> Vec<RankedResult> {
    let mut scored: Vec<(&Contender, f64, u32)> = contenders
        .iter()
        .filter_map(|c| {
            let average = average_finalized(&c.scores)?;
            let judges = c.scores.iter().filter(|s| s.finalized).count() as u32;
            Some((c, average, judges))
        })
        .collect();

    scored.sort_by(|(a, avg_a, _), (b, avg_b, _)| {
        avg_b
            .total_cmp(avg_a)
            .then_with(|| a.registered_at.cmp(&b.registered_at))
            .then_with(|| a.registration_id.cmp(&b.registration_id))
    });

    scored
        .into_iter()
        .enumerate()
        .map(|(index, (contender, average_score, judge_count))| {
            let placement = index as u32 + 1;
            RankedResult {
                registration_id: contender.registration_id,
                average_score,
                judge_count,
                placement,
                points: placement_points(placement),
            }
        })
        .collect()
}

/// Persisted result row for one registrant in one scoring session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitionResult {
    pub id: ResultId,
    pub event_id: EventId,
    pub session_id: ScoringSessionId,
    pub category: String,
    pub registration_id: RegistrationId,
    pub competitor_name: String,
    pub average_score: f64,
    pub judge_count: u32,
    pub placement: u32,
    pub points: u32,
    pub computed_at: Timestamp,
}

impl CompetitionResult {
    pub fn from_ranked(
        event_id: EventId,
        session_id: ScoringSessionId,
        category: &str,
        competitor_name: impl Into<String>,
        ranked: &RankedResult,
        computed_at: Timestamp,
    ) -> Self {
        Self {
            id: ResultId::new(),
            event_id,
            session_id,
            category: category.to_string(),
            registration_id: ranked.registration_id,
            competitor_name: competitor_name.into(),
            average_score: ranked.average_score,
            judge_count: ranked.judge_count,
            placement: ranked.placement,
            points: ranked.points,
            computed_at,
        }
    }
}

/// Sort order used when listing stored results.
pub fn by_placement(a: &CompetitionResult, b: &CompetitionResult) -> Ordering {
    a.category
        .cmp(&b.category)
        .then(a.placement.cmp(&b.placement))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn line(judge: &str, total: f64, finalized: bool) -> ScoreLine {
        ScoreLine {
            judge_id: UserId::new(judge).unwrap(),
            total,
            finalized,
        }
    }

    fn contender(minutes_after: i64, scores: Vec<ScoreLine>) -> Contender {
        let base = Timestamp::from_unix_secs(1_780_000_000).unwrap();
        Contender {
            registration_id: RegistrationId::new(),
            registered_at: base.plus(Duration::minutes(minutes_after)),
            scores,
        }
    }

    #[test]
    fn average_is_arithmetic_mean_of_finalized_scores() {
        let scores = vec![
            line("j1", 8.0, true),
            line("j2", 9.0, true),
            line("j3", 7.0, true),
        ];
        assert_eq!(average_finalized(&scores), Some(8.0));
    }

    #[test]
    fn draft_scores_are_ignored() {
        let scores = vec![line("j1", 8.0, true), line("j2", 2.0, false)];
        assert_eq!(average_finalized(&scores), Some(8.0));
    }

    #[test]
    fn no_finalized_scores_means_no_average() {
        assert_eq!(average_finalized(&[line("j1", 8.0, false)]), None);
        assert_eq!(average_finalized(&[]), None);
    }

    #[test]
    fn placement_points_table() {
        assert_eq!(placement_points(1), 100);
        assert_eq!(placement_points(2), 75);
        assert_eq!(placement_points(3), 50);
        assert_eq!(placement_points(4), 25);
        assert_eq!(placement_points(10), 25);
        assert_eq!(placement_points(11), 10);
        assert_eq!(placement_points(250), 10);
    }

    #[test]
    fn ranks_by_descending_average() {
        let low = contender(0, vec![line("j1", 70.0, true)]);
        let high = contender(1, vec![line("j1", 95.0, true), line("j2", 91.0, true)]);
        let mid = contender(2, vec![line("j1", 88.0, true)]);

        let ranked = rank(&[low.clone(), high.clone(), mid.clone()]);

        let order: Vec<_> = ranked.iter().map(|r| r.registration_id).collect();
        assert_eq!(
            order,
            vec![high.registration_id, mid.registration_id, low.registration_id]
        );
        assert_eq!(ranked[0].points, 100);
        assert_eq!(ranked[0].judge_count, 2);
        assert_eq!(ranked[0].average_score, 93.0);
        assert_eq!(ranked[2].points, 50);
    }

    #[test]
    fn ties_go_to_earlier_registration() {
        let late = contender(30, vec![line("j1", 90.0, true)]);
        let early = contender(5, vec![line("j1", 90.0, true)]);

        let ranked = rank(&[late.clone(), early.clone()]);

        assert_eq!(ranked[0].registration_id, early.registration_id);
        assert_eq!(ranked[0].placement, 1);
        assert_eq!(ranked[1].placement, 2);
        assert_eq!(ranked[1].points, 75);
    }

    #[test]
    fn contenders_without_finalized_scores_are_excluded() {
        let scored = contender(0, vec![line("j1", 60.0, true)]);
        let unscored = contender(1, vec![line("j1", 99.0, false)]);

        let ranked = rank(&[scored.clone(), unscored]);

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].registration_id, scored.registration_id);
    }

    #[test]
    fn eleventh_place_receives_ten_points() {
        let field: Vec<_> = (0..11)
            .map(|i| contender(i, vec![line("j1", 100.0 - i as f64, true)]))
            .collect();

        let ranked = rank(&field);

        assert_eq!(ranked[10].placement, 11);
        assert_eq!(ranked[10].points, 10);
        assert_eq!(ranked[9].points, 25);
    }
}
