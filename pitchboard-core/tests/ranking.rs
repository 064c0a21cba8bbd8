#![allow(clippy::unwrap_used)]

mod common;

use common::{active_event, flat_breakdown, keyspace, recorded_session, store_baseline};
use kanau::processor::Processor;
use pitchboard_core::Error;
use pitchboard_core::Keyspace;
use pitchboard_core::keyspace::EntityKind;
use pitchboard_core::ranking::{GetEventStats, GetRankings, GetTeamRank};
use pitchboard_core::scoring::{ScoreSession, SubmitJudgeScore};

async fn scored(ks: &Keyspace, event_id: &str, session_id: &str, total: f64) {
    recorded_session(ks, event_id, session_id, &format!("team-{session_id}")).await;
    store_baseline(ks, event_id, session_id, 0.5).await;
    ks.process(ScoreSession {
        event_id: event_id.to_string(),
        session_id: session_id.to_string(),
        breakdown: flat_breakdown(total),
    })
    .await
    .unwrap();
}

fn rankings(event_id: &str, limit: Option<usize>) -> GetRankings {
    GetRankings {
        event_id: event_id.to_string(),
        limit,
    }
}

#[tokio::test]
async fn test_tied_totals_rank_by_submission_time() {
    let (ks, _) = keyspace();
    active_event(&ks, "E").await;
    scored(&ks, "E", "S1", 87.5).await;
    scored(&ks, "E", "S2", 87.5).await;

    let board = ks.process(rankings("E", None)).await.unwrap();
    let ranked: Vec<_> = board
        .entries
        .iter()
        .map(|e| (e.rank, e.session_id.as_str()))
        .collect();
    assert_eq!(ranked, [(1, "S1"), (2, "S2")]);
}

#[tokio::test]
async fn test_leaderboard_is_a_sorted_permutation() {
    let (ks, _) = keyspace();
    active_event(&ks, "E").await;
    let totals = [("a", 55.0), ("b", 91.0), ("c", 72.25), ("d", 91.0), ("e", 10.0)];
    for (id, total) in totals {
        scored(&ks, "E", id, total).await;
    }
    // Judge records never rank.
    ks.process(SubmitJudgeScore {
        event_id: "E".to_string(),
        session_id: "a".to_string(),
        judge_id: "j1".to_string(),
        breakdown: flat_breakdown(100.0),
    })
    .await
    .unwrap();

    let board = ks.process(rankings("E", None)).await.unwrap();
    assert_eq!(board.total_entries, totals.len());
    let mut ids: Vec<_> = board.entries.iter().map(|e| e.session_id.clone()).collect();
    ids.sort();
    assert_eq!(ids, ["a", "b", "c", "d", "e"]);
    for pair in board.entries.windows(2) {
        assert!(pair[0].total >= pair[1].total);
        if pair[0].total == pair[1].total {
            assert!(pair[0].scored_at <= pair[1].scored_at);
        }
        assert_eq!(pair[0].rank + 1, pair[1].rank);
    }
    assert_eq!(board.entries[0].session_id, "b");
}

#[tokio::test]
async fn test_limit_truncates_after_ranking() {
    let (ks, _) = keyspace();
    active_event(&ks, "E").await;
    for (id, total) in [("a", 50.0), ("b", 90.0), ("c", 70.0)] {
        scored(&ks, "E", id, total).await;
    }
    let board = ks.process(rankings("E", Some(2))).await.unwrap();
    assert_eq!(board.total_entries, 3);
    let ids: Vec<_> = board.entries.iter().map(|e| e.session_id.as_str()).collect();
    assert_eq!(ids, ["b", "c"]);
}

#[tokio::test]
async fn test_team_rank_with_neighbors() {
    let (ks, _) = keyspace();
    active_event(&ks, "E").await;
    for (id, total) in [("a", 50.0), ("b", 90.0), ("c", 70.0)] {
        scored(&ks, "E", id, total).await;
    }
    let rank = ks
        .process(GetTeamRank {
            event_id: "E".to_string(),
            session_id: "c".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(rank.entry.rank, 2);
    assert_eq!(rank.total_entries, 3);
    let above = rank.above.unwrap();
    assert_eq!((above.session_id.as_str(), above.gap), ("b", 20.0));
    let below = rank.below.unwrap();
    assert_eq!((below.session_id.as_str(), below.gap), ("a", 20.0));

    let top = ks
        .process(GetTeamRank {
            event_id: "E".to_string(),
            session_id: "b".to_string(),
        })
        .await
        .unwrap();
    assert!(top.above.is_none());

    recorded_session(&ks, "E", "unscored", "Late").await;
    let err = ks
        .process(GetTeamRank {
            event_id: "E".to_string(),
            session_id: "unscored".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { kind: EntityKind::ScoringRecord, .. }));
}

#[tokio::test]
async fn test_stats_are_computed_fresh() {
    let (ks, _) = keyspace();
    active_event(&ks, "E").await;
    let empty = ks
        .process(GetEventStats {
            event_id: "E".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(empty.scored_sessions, 0);
    assert!(empty.mean.is_none() && empty.median.is_none());

    for (id, total) in [("a", 60.0), ("b", 90.0), ("c", 70.0), ("d", 80.0)] {
        scored(&ks, "E", id, total).await;
    }
    let stats = ks
        .process(GetEventStats {
            event_id: "E".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(stats.scored_sessions, 4);
    assert_eq!(stats.mean, Some(75.0));
    assert_eq!(stats.median, Some(75.0));
    assert_eq!(stats.max, Some(90.0));
    assert_eq!(stats.min, Some(60.0));
}

#[tokio::test]
async fn test_rankings_of_unknown_event() {
    let (ks, _) = keyspace();
    let err = ks.process(rankings("ghost", None)).await.unwrap_err();
    assert!(matches!(err, Error::NotFound { kind: EntityKind::Event, .. }));
}
