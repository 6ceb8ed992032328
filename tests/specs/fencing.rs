//! Fenced consumption: locked reads and acks demand live ownership of
//! the queue's derived lock.

use crate::prelude::*;
use fenq_client::{Cookie, Error, QueueClient};
use std::time::Duration;

const TTL: Duration = Duration::from_secs(1);

#[tokio::test]
async fn fenced_reads_match_unfenced_reads_for_the_owner() {
    let w = world().await;
    let consumer = Cookie::new("consumer");

    w.queue.commit("Q", "m1").await.unwrap();
    w.locks
        .lock(&QueueClient::lock_name("Q"), &consumer, TTL)
        .await
        .unwrap();

    let plain = w.queue.read("Q").await.unwrap();
    let fenced = w.queue.locked_read("Q", &consumer).await.unwrap();
    assert_eq!(plain, fenced);
}

#[tokio::test]
async fn strangers_cannot_use_the_fenced_path() {
    let w = world().await;
    let consumer = Cookie::new("consumer");
    let stranger = Cookie::new("stranger");

    w.queue.commit("Q", "m1").await.unwrap();

    // Nobody holds the lock yet
    assert!(matches!(
        w.queue.locked_read("Q", &stranger).await,
        Err(Error::NotHeld)
    ));

    w.locks
        .lock(&QueueClient::lock_name("Q"), &consumer, TTL)
        .await
        .unwrap();
    assert!(matches!(
        w.queue.locked_read("Q", &stranger).await,
        Err(Error::Busy)
    ));
    assert!(matches!(
        w.queue.locked_ack("Q", &stranger).await,
        Err(Error::Busy)
    ));
}

#[tokio::test]
async fn batch_read_returns_the_k_oldest_and_batch_ack_removes_them() {
    let w = world().await;
    let consumer = Cookie::new("consumer");

    let payloads = ["p0", "p1", "p2", "p3", "p4"];
    for p in payloads {
        w.queue.reserve("Q", 8).await.unwrap();
        w.queue.commit("Q", p).await.unwrap();
    }
    w.locks
        .lock(&QueueClient::lock_name("Q"), &consumer, TTL)
        .await
        .unwrap();

    let batch = w.queue.locked_read_batch("Q", &consumer, 3).await.unwrap();
    assert_eq!(batch, vec!["p0", "p1", "p2"]);

    w.queue.locked_ack_batch("Q", &consumer, 3).await.unwrap();
    assert_eq!(counts(&w, "Q").await, (0, 2));

    let rest = w.queue.locked_read_batch("Q", &consumer, 10).await.unwrap();
    assert_eq!(rest, vec!["p3", "p4"]);
}

#[tokio::test]
async fn expiry_mid_consumption_cuts_off_the_consumer() {
    let w = world().await;
    let consumer = Cookie::new("consumer");

    w.queue.commit("Q", "m1").await.unwrap();
    w.locks
        .lock(&QueueClient::lock_name("Q"), &consumer, TTL)
        .await
        .unwrap();
    assert!(w.queue.locked_read("Q", &consumer).await.is_ok());

    // Lease lapses between read and ack
    w.clock.advance(TTL);
    assert!(matches!(
        w.queue.locked_ack("Q", &consumer).await,
        Err(Error::NotHeld)
    ));

    // The message is still there for the next rightful consumer
    assert_eq!(w.queue.read("Q").await.unwrap().as_deref(), Some("m1"));
}

#[tokio::test]
async fn handover_after_expiry_gives_the_new_consumer_the_same_messages() {
    let w = world().await;
    let first = Cookie::new("first");
    let second = Cookie::new("second");
    let lock_name = QueueClient::lock_name("Q");

    w.queue.commit("Q", "m1").await.unwrap();
    w.locks.lock(&lock_name, &first, TTL).await.unwrap();
    w.clock.advance(TTL);

    w.locks.lock(&lock_name, &second, TTL).await.unwrap();
    assert_eq!(
        w.queue.locked_read("Q", &second).await.unwrap().as_deref(),
        Some("m1")
    );
    assert!(matches!(
        w.queue.locked_read("Q", &first).await,
        Err(Error::Busy)
    ));
}
