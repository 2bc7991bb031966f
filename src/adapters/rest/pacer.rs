use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Spaces outgoing API calls at least `1 / rate` seconds apart.
pub struct RequestPacer {
    min_interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl RequestPacer {
    pub fn new(requests_per_second: f64) -> Self {
        let min_interval = if requests_per_second > 0.0 {
            Duration::from_secs_f64(1.0 / requests_per_second)
        } else {
            tracing::warn!(
                "Request pacer configured with non-positive rate ({requests_per_second} req/s), pacing disabled"
            );
            Duration::ZERO
        };
        Self {
            min_interval,
            next_slot: Mutex::new(None),
        }
    }

    /// Wait for this caller's slot. Slots are reserved under the lock so
    /// concurrent callers queue up instead of all firing at once.
    pub async fn wait(&self) {
        if self.min_interval.is_zero() {
            return;
        }
        let slot = {
            let mut next = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = next.map_or(now, |n| n.max(now));
            *next = Some(slot + self.min_interval);
            slot
        };
        tokio::time::sleep_until(slot).await;
    }
}
