//! Aggregator behavior across task boundaries: backpressure, concurrent
//! producers, and persistence.

use std::time::Duration;

use tokio::time::timeout;

use net_tetris::server::{
    load_scores, persist_scores, score_channel, ScoreAggregator, ScoreBoard,
};

#[tokio::test]
async fn test_produce_blocks_at_capacity() {
    let (queue, mut rx) = score_channel(2);

    queue.produce(10).await;
    queue.produce(20).await;

    // Queue is full; the third submission must wait.
    let blocked = timeout(Duration::from_millis(50), queue.produce(30)).await;
    assert!(blocked.is_err(), "produce should block on a full queue");

    // Consuming one slot unblocks it.
    assert_eq!(rx.recv().await, Some(10));
    timeout(Duration::from_millis(500), queue.produce(30))
        .await
        .expect("produce should complete after a slot frees");

    assert_eq!(rx.recv().await, Some(20));
    assert_eq!(rx.recv().await, Some(30));
}

#[tokio::test]
async fn test_concurrent_producers_yield_sorted_top_n() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("scores.txt");

    let (aggregator, queue) = ScoreAggregator::start(path.clone())
        .await
        .expect("aggregator start");
    let board = aggregator.board();

    let mut producers = Vec::new();
    for score in 1..=25u32 {
        let queue = queue.clone();
        producers.push(tokio::spawn(async move {
            queue.produce(score * 10).await;
        }));
    }
    for producer in producers {
        producer.await.expect("producer task");
    }

    drop(queue);
    timeout(Duration::from_secs(2), aggregator.shutdown())
        .await
        .expect("aggregator drains after producers hang up");

    // Whatever the arrival order, the retained set is the 10 largest.
    let expected: Vec<u32> = (16..=25).rev().map(|s| s * 10).collect();
    assert_eq!(board.read().await.entries().as_slice(), expected.as_slice());

    // And the same list survived to disk.
    let reloaded = load_scores(&path).await.expect("load persisted scores");
    assert_eq!(reloaded.entries().as_slice(), expected.as_slice());
}

#[tokio::test]
async fn test_persistence_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("scores.txt");

    let board = ScoreBoard::from_entries([400, 100, 900, 250]);
    persist_scores(&path, &board).await.expect("persist");

    let reloaded = load_scores(&path).await.expect("load");
    assert_eq!(reloaded, board);
}

#[tokio::test]
async fn test_load_tolerates_missing_and_garbage() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("scores.txt");

    let missing = load_scores(&path).await.expect("missing file loads");
    assert_eq!(missing, ScoreBoard::new());

    tokio::fs::write(&path, "300\nnot-a-score\n\n  150 \n-7\n")
        .await
        .expect("write fixture");
    let loaded = load_scores(&path).await.expect("load");
    assert_eq!(loaded.entries()[0], 300);
    assert_eq!(loaded.entries()[1], 150);
    assert_eq!(loaded.entries()[2], 0);
}
