use dashmap::DashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::time::{Duration, Instant};

// Past this many tracked clients, stale windows are dropped before counting.
const PURGE_THRESHOLD: usize = 4096;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    attempts: u32,
}

/// Fixed-window attempt counter per client address. One instance guards
/// `/login`, another every request.
#[derive(Debug)]
pub struct RateLimiter {
    max_attempts: u32,
    window: Duration,
    windows: DashMap<IpAddr, Window>,
}

impl RateLimiter {
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
            windows: DashMap::new(),
        }
    }

    /// Count an attempt from `client`; `false` once the window's budget is spent.
    /// Clients without a known address share one bucket.
    pub fn try_acquire(&self, client: Option<IpAddr>) -> bool {
        self.try_acquire_at(client, Instant::now())
    }

    fn try_acquire_at(&self, client: Option<IpAddr>, now: Instant) -> bool {
        if self.windows.len() >= PURGE_THRESHOLD {
            self.purge_expired_at(now);
        }

        let key = client.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        let mut window = self.windows.entry(key).or_insert(Window {
            started: now,
            attempts: 0,
        });
        if now.duration_since(window.started) >= self.window {
            *window = Window {
                started: now,
                attempts: 0,
            };
        }
        if window.attempts >= self.max_attempts {
            return false;
        }
        window.attempts += 1;
        true
    }

    fn purge_expired_at(&self, now: Instant) {
        self.windows
            .retain(|_, window| now.duration_since(window.started) < self.window);
    }
}
