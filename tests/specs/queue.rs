//! Producer admission and consumer round trips.

use crate::prelude::*;
use fenq_client::{Error, DEFAULT_RESERVE_SIZE};

#[tokio::test]
async fn the_reserve_commit_read_ack_scenario() {
    let w = world().await;

    assert_eq!(counts(&w, "Q").await, (0, 0));

    w.queue.reserve("Q", DEFAULT_RESERVE_SIZE).await.unwrap();
    assert_eq!(counts(&w, "Q").await, (1, 0));

    w.queue.commit("Q", "m1").await.unwrap();
    assert_eq!(counts(&w, "Q").await, (0, 1));

    assert_eq!(w.queue.read("Q").await.unwrap().as_deref(), Some("m1"));

    w.queue.ack("Q").await.unwrap();
    assert_eq!(w.queue.read("Q").await.unwrap(), None);
    assert_eq!(counts(&w, "Q").await, (0, 0));
}

#[tokio::test]
async fn abort_returns_capacity_without_publishing() {
    let w = world().await;

    w.queue.reserve("Q", 64).await.unwrap();
    w.queue.abort("Q").await.unwrap();

    assert_eq!(counts(&w, "Q").await, (0, 0));
    assert_eq!(w.queue.read("Q").await.unwrap(), None);
}

#[tokio::test]
async fn commit_without_reservation_still_publishes() {
    let w = world().await;

    w.queue.commit("Q", "unreserved").await.unwrap();
    assert_eq!(counts(&w, "Q").await, (0, 1));
    assert_eq!(
        w.queue.read("Q").await.unwrap().as_deref(),
        Some("unreserved")
    );
}

#[tokio::test]
async fn messages_come_out_in_commit_order() {
    let w = world().await;

    for m in ["first", "second", "third"] {
        w.queue.reserve("Q", 16).await.unwrap();
        w.queue.commit("Q", m).await.unwrap();
    }

    for expected in ["first", "second", "third"] {
        assert_eq!(w.queue.read("Q").await.unwrap().as_deref(), Some(expected));
        w.queue.ack("Q").await.unwrap();
    }
    assert_eq!(w.queue.read("Q").await.unwrap(), None);
}

#[tokio::test]
async fn queue_names_are_isolated() {
    let w = world().await;

    w.queue.commit("a", "for-a").await.unwrap();
    w.queue.commit("b", "for-b").await.unwrap();
    w.queue.ack("a").await.unwrap();

    assert_eq!(w.queue.read("a").await.unwrap(), None);
    assert_eq!(w.queue.read("b").await.unwrap().as_deref(), Some("for-b"));
}

#[tokio::test]
async fn aborting_with_nothing_reserved_is_reported() {
    let w = world().await;
    assert!(matches!(w.queue.abort("Q").await, Err(Error::NotReserved)));
}
