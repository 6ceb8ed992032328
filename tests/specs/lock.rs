//! Mutual exclusion, renewal, and expiry takeover.

use crate::prelude::*;
use fenq_client::{Cookie, Error};
use std::time::Duration;

const TTL: Duration = Duration::from_secs(1);

#[tokio::test]
async fn holder_excludes_other_cookies_until_expiry() {
    let w = world().await;
    let alice = Cookie::new("alice");
    let bob = Cookie::new("bob");

    w.locks.lock("shared", &alice, TTL).await.unwrap();

    assert!(matches!(
        w.locks.lock("shared", &bob, TTL).await,
        Err(Error::Busy)
    ));
    assert!(w.locks.assert_locked("shared", &alice).await.is_ok());
    assert!(matches!(
        w.locks.assert_locked("shared", &bob).await,
        Err(Error::Busy)
    ));
}

#[tokio::test]
async fn renewal_extends_past_the_original_deadline() {
    let w = world().await;
    let alice = Cookie::new("alice");

    w.locks.lock("shared", &alice, TTL).await.unwrap();
    w.clock.advance(TTL / 2);
    w.locks.lock("shared", &alice, TTL).await.unwrap();

    // After the original TTL but before twice it
    w.clock.advance(TTL * 3 / 4);
    assert!(w.locks.assert_locked("shared", &alice).await.is_ok());
}

#[tokio::test]
async fn expired_lock_is_taken_over_and_the_loser_stays_out() {
    let w = world().await;
    let alice = Cookie::new("alice");
    let bob = Cookie::new("bob");

    w.locks.lock("shared", &alice, TTL).await.unwrap();
    w.clock.advance(TTL);

    w.locks.lock("shared", &bob, TTL).await.unwrap();
    assert!(matches!(
        w.locks.lock("shared", &alice, TTL).await,
        Err(Error::Busy)
    ));
}

#[tokio::test]
async fn unlock_is_fenced_by_the_cookie() {
    let w = world().await;
    let alice = Cookie::new("alice");
    let bob = Cookie::new("bob");

    w.locks.lock("shared", &alice, TTL).await.unwrap();
    assert!(matches!(
        w.locks.unlock("shared", &bob).await,
        Err(Error::Busy)
    ));

    w.locks.unlock("shared", &alice).await.unwrap();
    assert!(matches!(
        w.locks.unlock("shared", &alice).await,
        Err(Error::NotHeld)
    ));
}

#[tokio::test]
async fn contending_tasks_elect_exactly_one_holder() {
    let w = world().await;

    let mut handles = Vec::new();
    for i in 0..8 {
        let locks = w.locks.clone();
        let cookie = Cookie::new(format!("worker-{}", i));
        handles.push(tokio::spawn(async move {
            locks.lock("election", &cookie, TTL).await.is_ok()
        }));
    }

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap() {
            winners += 1;
        }
    }
    assert_eq!(winners, 1);
}
