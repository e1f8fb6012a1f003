//! # Expiration Monitor
//!
//! Recurring background check that proactively terminates the session a
//! fixed window before its hard expiry, so the UI never hits a burst of
//! rejected requests right at the boundary.
//!
//! Two states:
//!
//! - **Idle** - no session; the task waits on the store's watch channel
//! - **Monitoring** - a session exists; a fixed-interval ticker compares
//!   `exp` against the clock and clears the session once inside the window
//!
//! The monitor re-enters `Monitoring` any number of times across the
//! process lifetime as sessions come and go. The interval only exists while
//! `Monitoring`, so logout and expiry both tear the timer down.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use super::store::SessionStore;
use super::Session;

/// Epoch-seconds clock, injectable for tests.
pub type ClockFn = Arc<dyn Fn() -> i64 + Send + Sync>;

/// Background proactive-expiry checker.
///
/// Holds only a handle to the session store; it never owns session state.
pub struct ExpiryMonitor {
    store: Arc<SessionStore>,
    check_interval: Duration,
    expiry_window_secs: i64,
    clock: ClockFn,
}

impl ExpiryMonitor {
    /// Create a monitor checking every `check_interval`, clearing the
    /// session once `exp - now <= expiry_window_secs`.
    pub fn new(store: Arc<SessionStore>, check_interval: Duration, expiry_window_secs: i64) -> Self {
        Self {
            store,
            check_interval,
            expiry_window_secs,
            clock: Arc::new(lib_utils::now_epoch_s),
        }
    }

    /// Create a monitor using the configured interval and window.
    pub fn from_config(config: &crate::config::Config, store: Arc<SessionStore>) -> Self {
        Self::new(
            store,
            Duration::from_secs(config.expiry_check_interval_secs),
            config.expiry_window_secs,
        )
    }

    /// Replace the wall clock (tests advance a fixed or scripted clock).
    pub fn with_clock(mut self, clock: ClockFn) -> Self {
        self.clock = clock;
        self
    }

    /// Spawn the monitor task. Dropping the returned handle stops it.
    pub fn start(&self) -> MonitorHandle {
        let store = self.store.clone();
        let clock = self.clock.clone();
        let check_interval = self.check_interval;
        let window = self.expiry_window_secs;

        let handle = tokio::spawn(async move {
            run(store, check_interval, window, clock).await;
        });

        MonitorHandle { handle }
    }
}

/// Handle to a running monitor task. Abort-on-drop: no timer outlives the
/// component that started it.
pub struct MonitorHandle {
    handle: JoinHandle<()>,
}

impl MonitorHandle {
    /// Stop the monitor task.
    pub fn stop(self) {
        self.handle.abort();
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn run(
    store: Arc<SessionStore>,
    check_interval: Duration,
    window: i64,
    clock: ClockFn,
) {
    let mut rx = store.subscribe();

    loop {
        // Idle: wait for a session to appear
        while rx.borrow_and_update().is_none() {
            if rx.changed().await.is_err() {
                return; // store dropped, nothing left to monitor
            }
        }

        debug!("session present, monitoring expiry");
        if monitor_session(&store, &mut rx, check_interval, window, &clock).await {
            return;
        }
    }
}

/// Monitoring state. Returns `true` when the store is gone and the task
/// should exit, `false` on a transition back to Idle.
async fn monitor_session(
    store: &SessionStore,
    rx: &mut watch::Receiver<Option<Session>>,
    check_interval: Duration,
    window: i64,
    clock: &ClockFn,
) -> bool {
    let mut ticker = tokio::time::interval(check_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                // a vanished session is "no session", not an error
                let Some(session) = store.current() else {
                    return false;
                };
                let remaining = session.remaining_secs(clock());
                if remaining <= window {
                    info!(
                        username = %session.username,
                        remaining,
                        "session inside expiry window, clearing proactively"
                    );
                    store.clear_session();
                    return false;
                }
                debug!(remaining, "session still valid");
            }
            changed = rx.changed() => {
                match changed {
                    // logout elsewhere tears the ticker down; a replaced
                    // session keeps being monitored with the new expiry
                    Ok(()) => {
                        if rx.borrow_and_update().is_none() {
                            return false;
                        }
                    }
                    Err(_) => return true,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::storage::MemoryStorage;
    use lib_utils::b64u_encode;
    use shared::AuthBody;

    const NOW: i64 = 1_700_000_000;

    fn auth_body(exp: i64) -> AuthBody {
        let claims = format!(r#"{{"username":"alice","exp":{exp},"sub":42}}"#);
        AuthBody {
            role: "user".to_string(),
            access_token: format!("eyJhbGciOiJIUzI1NiJ9.{}.c2ln", b64u_encode(claims)),
            refresh_token: "r1".to_string(),
        }
    }

    fn monitor(store: &Arc<SessionStore>) -> ExpiryMonitor {
        ExpiryMonitor::new(store.clone(), Duration::from_secs(30), 300)
            .with_clock(Arc::new(|| NOW))
    }

    async fn settle() {
        // paused clock: lets the monitor task observe state and tick
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_inside_window_is_cleared_on_next_tick() {
        let store = Arc::new(SessionStore::new(Arc::new(MemoryStorage::new())));
        let _handle = monitor(&store).start();

        // 200s remaining is inside the 300s window
        store.set_session(&auth_body(NOW + 200)).unwrap();
        settle().await;

        assert_eq!(store.current(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_outside_window_survives_many_ticks() {
        let store = Arc::new(SessionStore::new(Arc::new(MemoryStorage::new())));
        let _handle = monitor(&store).start();

        store.set_session(&auth_body(NOW + 100_000)).unwrap();
        tokio::time::sleep(Duration::from_secs(301)).await;

        assert!(store.current().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_monitor_reenters_after_logout() {
        let store = Arc::new(SessionStore::new(Arc::new(MemoryStorage::new())));
        let _handle = monitor(&store).start();

        store.set_session(&auth_body(NOW + 100_000)).unwrap();
        settle().await;
        store.clear_session();
        settle().await;

        // second session, this time near expiry: the monitor must have gone
        // back to Idle and picked the new session up again
        store.set_session(&auth_body(NOW + 250)).unwrap();
        settle().await;

        assert_eq!(store.current(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopped_monitor_never_clears() {
        let store = Arc::new(SessionStore::new(Arc::new(MemoryStorage::new())));
        let handle = monitor(&store).start();
        handle.stop();

        store.set_session(&auth_body(NOW + 200)).unwrap();
        tokio::time::sleep(Duration::from_secs(120)).await;

        assert!(store.current().is_some());
    }
}
