/// Integration tests for dashboard aggregates
mod common;

use chrono::{Duration, Utc};
use common::{new_bet, MemoryContext};
use ledger::domain::Outcome;
use ledger::repository::LedgerStore;
use shared::LamportAmount;

#[tokio::test]
async fn test_total_volume_is_exact_above_f64_precision() {
    let ctx = MemoryContext::new();
    let amounts = [(1u64 << 53) + 1, (1u64 << 60) + 3, u64::MAX];

    for (nonce, amount) in amounts.iter().enumerate() {
        ctx.store.insert(new_bet("alice", nonce as u64, *amount)).await.unwrap();
    }

    let expected: u128 = amounts.iter().map(|a| u128::from(*a)).sum();
    assert_eq!(ctx.ledger.dashboard.total_volume().await.unwrap(), expected);
    // 2^53 + 1 is the first integer an f64 cannot hold
    assert_ne!(((1u64 << 53) + 1) as f64 as u64, (1u64 << 53) + 1);
}

#[tokio::test]
async fn test_windowed_revenue_can_be_negative() {
    let ctx = MemoryContext::new();
    let day = Duration::hours(24);

    ctx.store.insert(new_bet("alice", 1, 100)).await.unwrap();
    ctx.store.insert(new_bet("bob", 2, 300)).await.unwrap();
    ctx.store
        .apply_resolution(1, 90, LamportAmount::new(1_000))
        .await
        .unwrap();
    ctx.store
        .apply_resolution(2, 10, LamportAmount::ZERO)
        .await
        .unwrap();

    // Outside the window, must not offset the loss
    ctx.store
        .insert_at(new_bet("carol", 3, 1_000_000), Utc::now() - Duration::hours(48))
        .await;

    let revenue = ctx.ledger.dashboard.windowed_revenue(day).await.unwrap();
    assert_eq!(revenue, 100 + 300 - 1_000);
    assert_eq!(ctx.ledger.dashboard.active_games(day).await.unwrap(), 2);
    assert_eq!(ctx.ledger.dashboard.total_users().await.unwrap(), 3);
}

#[tokio::test]
async fn test_total_users_counts_distinct_players() {
    let ctx = MemoryContext::new();
    for (nonce, player) in ["alice", "bob", "alice", "carol", "bob"].iter().enumerate() {
        ctx.store.insert(new_bet(player, nonce as u64, 1)).await.unwrap();
    }
    assert_eq!(ctx.ledger.dashboard.total_users().await.unwrap(), 3);
}

#[tokio::test]
async fn test_recent_activity_returns_newest_first() {
    let ctx = MemoryContext::new();
    for nonce in 1..=5u64 {
        ctx.store
            .insert(new_bet(&format!("player-{}", nonce), nonce, 1_000))
            .await
            .unwrap();
    }
    ctx.store
        .apply_resolution(5, 1, LamportAmount::new(1_500_000_000))
        .await
        .unwrap();

    let feed = ctx.ledger.dashboard.recent_activity(3).await.unwrap();
    let players: Vec<&str> = feed.iter().map(|e| e.player.as_str()).collect();
    assert_eq!(players, ["player-5", "player-4", "player-3"]);

    assert_eq!(feed[0].outcome_label, Outcome::Won);
    assert_eq!(feed[0].signed_amount_text, "+1.5000");
    assert_eq!(feed[1].outcome_label, Outcome::Lost);
    assert_eq!(feed[1].signed_amount_text, "-0.0000");
}

#[tokio::test]
async fn test_snapshot_uses_configured_defaults() {
    let ctx = MemoryContext::new();
    for nonce in 0..8u64 {
        ctx.store.insert(new_bet("alice", nonce, 10)).await.unwrap();
    }

    let snapshot = ctx.ledger.dashboard.snapshot().await.unwrap();
    assert_eq!(snapshot.total_users, 1);
    assert_eq!(snapshot.active_games, 8);
    assert_eq!(snapshot.total_volume, 80);
    assert_eq!(snapshot.windowed_revenue, 80);
    assert_eq!(snapshot.recent_activity.len(), 5);
}
