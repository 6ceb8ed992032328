//! Shared harness for behavioral specs.

use fenq_client::{initialize, LockClient, MemoryRuntime, QueueClient};
use fenq_core::FakeClock;
use std::sync::Arc;

pub struct World {
    pub locks: LockClient,
    pub queue: QueueClient,
    pub clock: FakeClock,
}

/// Fresh store, installed library, frozen clock.
pub async fn world() -> World {
    let clock = FakeClock::new();
    let runtime = Arc::new(MemoryRuntime::with_clock(clock.clone()));
    initialize(runtime.as_ref()).await.unwrap();
    World {
        locks: LockClient::new(runtime.clone()),
        queue: QueueClient::new(runtime),
        clock,
    }
}

pub async fn counts(world: &World, name: &str) -> (usize, usize) {
    let status = world.queue.status(name).await.unwrap();
    (status.reservations, status.messages)
}
