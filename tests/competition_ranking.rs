//! Property tests for result ranking.

use proptest::prelude::*;

use car_audio_events::domain::foundation::{RegistrationId, Timestamp, UserId};
use car_audio_events::domain::scoring::{placement_points, rank, Contender, ScoreLine};

fn contender(index: usize, totals: &[(f64, bool)]) -> Contender {
    Contender {
        registration_id: RegistrationId::new(),
        registered_at: Timestamp::from_unix_secs(1_700_000_000 + index as i64)
            .expect("valid timestamp"),
        scores: totals
            .iter()
            .enumerate()
            .map(|(judge, (total, finalized))| ScoreLine {
                judge_id: UserId::new(format!("judge-{}", judge)).expect("valid user id"),
                total: *total,
                finalized: *finalized,
            })
            .collect(),
    }
}

fn field() -> impl Strategy<Value = Vec<Vec<(f64, bool)>>> {
    prop::collection::vec(
        prop::collection::vec((0.0f64..100.0, any::<bool>()), 0..4),
        0..12,
    )
}

proptest! {
    #[test]
    fn placements_are_gapless(sheets in field()) {
        let contenders: Vec<Contender> = sheets
            .iter()
            .enumerate()
            .map(|(i, s)| contender(i, s))
            .collect();
        let ranked = rank(&contenders);

        let placements: Vec<u32> = ranked.iter().map(|r| r.placement).collect();
        let expected: Vec<u32> = (1..=ranked.len() as u32).collect();
        prop_assert_eq!(placements, expected);
    }

    #[test]
    fn only_finalized_contenders_are_ranked(sheets in field()) {
        let contenders: Vec<Contender> = sheets
            .iter()
            .enumerate()
            .map(|(i, s)| contender(i, s))
            .collect();
        let eligible = sheets
            .iter()
            .filter(|s| s.iter().any(|(_, finalized)| *finalized))
            .count();
        prop_assert_eq!(rank(&contenders).len(), eligible);
    }

    #[test]
    fn averages_never_increase_down_the_table(sheets in field()) {
        let contenders: Vec<Contender> = sheets
            .iter()
            .enumerate()
            .map(|(i, s)| contender(i, s))
            .collect();
        let ranked = rank(&contenders);
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].average_score >= pair[1].average_score);
        }
    }

    #[test]
    fn points_follow_placement(sheets in field()) {
        let contenders: Vec<Contender> = sheets
            .iter()
            .enumerate()
            .map(|(i, s)| contender(i, s))
            .collect();
        for result in rank(&contenders) {
            prop_assert_eq!(result.points, placement_points(result.placement));
        }
    }
}

#[test]
fn equal_averages_favour_earlier_registration() {
    let first = contender(0, &[(80.0, true)]);
    let second = contender(1, &[(80.0, true)]);
    let ranked = rank(&[second.clone(), first.clone()]);
    assert_eq!(ranked[0].registration_id, first.registration_id);
    assert_eq!(ranked[1].registration_id, second.registration_id);
}

#[test]
fn points_table_tapers_off() {
    assert_eq!(placement_points(1), 100);
    assert_eq!(placement_points(2), 75);
    assert_eq!(placement_points(3), 50);
    assert_eq!(placement_points(10), 25);
    assert_eq!(placement_points(11), 10);
}
