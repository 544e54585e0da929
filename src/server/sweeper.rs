use crate::domain_port::*;
use crate::logger::*;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Periodically deletes revoked and expired refresh tokens.
pub struct Sweeper {
    handle: Mutex<Option<JoinHandle<()>>>,
    cancellation_token: CancellationToken,
}

impl Sweeper {
    /// Start sweeping every `interval`, first run one interval from now.
    pub fn spawn(
        store: Arc<dyn RefreshTokenStore>,
        interval: Duration,
        cancellation_token: CancellationToken,
    ) -> Self {
        let token = cancellation_token.clone();
        let handle = tokio::spawn(async move { run(store, interval, token).await });
        Self {
            handle: Mutex::new(Some(handle)),
            cancellation_token,
        }
    }

    /// Stop the loop, waiting for a sweep that is already running.
    pub async fn shutdown(&self) {
        self.cancellation_token.cancel();

        let handle = self.handle.lock().ok().and_then(|mut lock| lock.take());
        if let Some(handle) = handle {
            let r = handle.await;
            info!("sweeper stopped: {:?}", r);
        }
    }
}

async fn run(store: Arc<dyn RefreshTokenStore>, interval: Duration, token: CancellationToken) {
    let interval = interval.max(Duration::from_secs(1));
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!(interval_secs = interval.as_secs(), "sweeper started");

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
        }

        // Outside the select: cancellation never interrupts a running sweep.
        match store.sweep().await {
            Ok(removed) => info!(removed, "swept refresh tokens"),
            Err(e) => error!("refresh token sweep failed: {}", e),
        }
    }
}
