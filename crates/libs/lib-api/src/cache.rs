//! # Response Cache
//!
//! A generic query cache keyed by `(operation, argument fingerprint)`.
//!
//! Every subscriber to the same key shares one cache slot and one in-flight
//! request. Results fan out over a `watch` channel, so a screen gets an
//! immediately-available (possibly loading) view that updates when the
//! request settles. Mutations invalidate by tag, flipping every live slot
//! carrying the tag into a refetching state.
//!
//! Staleness is an explicit caller policy ([`QueryOptions`]) rather than a
//! UI-lifecycle side effect: a resubscribe refetches only when the entry is
//! older than `stale_after` or `refetch_on_resubscribe` is set.
//!
//! Ordering: when refetches overlap on one slot, the last request to
//! *settle* wins, which is not necessarily the last one issued. Known,
//! intentional: invalidation-driven refetches always carry fresher data
//! than whatever they race.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::error::{ApiError, ApiResult};

/// Closure producing the fetch future for a slot. Stored so invalidation
/// can refetch without the original caller.
pub type Fetcher = Arc<dyn Fn() -> BoxFuture<'static, ApiResult<Value>> + Send + Sync>;

/// Cache key: operation identifier plus canonical argument fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub operation: &'static str,
    pub fingerprint: String,
}

/// Live view of one cache slot.
#[derive(Debug, Clone, Default)]
pub struct QueryState {
    /// Last successful result, if any. Survives a later failed refetch so
    /// screens can keep rendering stale data next to the error.
    pub data: Option<Value>,
    pub error: Option<ApiError>,
    /// First fetch still running and nothing to show yet.
    pub is_loading: bool,
    /// Any fetch currently running (initial or refetch).
    pub is_fetching: bool,
}

impl QueryState {
    /// Deserialize the current data into its concrete response type.
    pub fn data_as<T: DeserializeOwned>(&self) -> Option<ApiResult<T>> {
        self.data.as_ref().map(|value| {
            serde_json::from_value(value.clone()).map_err(|e| ApiError::Parse(e.to_string()))
        })
    }
}

/// Per-query cache policy.
#[derive(Debug, Clone)]
pub struct QueryOptions {
    /// Age beyond which a resubscribe triggers a refetch.
    pub stale_after: Duration,
    /// Refetch on every resubscribe, regardless of age.
    pub refetch_on_resubscribe: bool,
    /// Tags for group invalidation by mutations.
    pub tags: &'static [&'static str],
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            stale_after: Duration::from_secs(60),
            refetch_on_resubscribe: false,
            tags: &[],
        }
    }
}

impl QueryOptions {
    pub fn tagged(tags: &'static [&'static str]) -> Self {
        Self {
            tags,
            ..Self::default()
        }
    }

    pub fn stale_after(mut self, age: Duration) -> Self {
        self.stale_after = age;
        self
    }

    pub fn refetch_on_resubscribe(mut self, refetch: bool) -> Self {
        self.refetch_on_resubscribe = refetch;
        self
    }
}

struct Slot {
    tx: watch::Sender<QueryState>,
    fetcher: Fetcher,
    tags: &'static [&'static str],
    subscribers: usize,
    in_flight: usize,
    last_fetch: Option<Instant>,
    last_unsubscribed: Option<Instant>,
}

/// Shared query cache. Clone-cheap: clones share the slot map.
#[derive(Clone)]
pub struct QueryCache {
    slots: Arc<Mutex<HashMap<QueryKey, Slot>>>,
    grace: Duration,
}

impl QueryCache {
    /// Create a cache retaining unsubscribed slots for `grace` before
    /// eviction (screen remounts within the grace window skip the network).
    pub fn new(grace: Duration) -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
            grace,
        }
    }

    /// Subscribe to a cached query.
    ///
    /// Fingerprint-equal concurrent calls share one slot and one in-flight
    /// request. The returned subscription's initial state is available
    /// immediately; dropping it releases the slot (after the grace period,
    /// if it was the last subscriber).
    pub fn query<A: Serialize>(
        &self,
        operation: &'static str,
        args: &A,
        options: &QueryOptions,
        fetcher: Fetcher,
    ) -> Subscription {
        let key = QueryKey {
            operation,
            fingerprint: fingerprint(args),
        };

        let (rx, fetch) = {
            let mut slots = self.slots.lock();
            match slots.get_mut(&key) {
                Some(slot) => {
                    slot.subscribers += 1;
                    slot.last_unsubscribed = None;
                    let stale = slot
                        .last_fetch
                        .map_or(true, |at| at.elapsed() > options.stale_after);
                    let fetch = options.refetch_on_resubscribe || stale;
                    (slot.tx.subscribe(), fetch)
                }
                None => {
                    let (tx, rx) = watch::channel(QueryState {
                        data: None,
                        error: None,
                        is_loading: true,
                        is_fetching: false,
                    });
                    slots.insert(
                        key.clone(),
                        Slot {
                            tx,
                            fetcher,
                            tags: options.tags,
                            subscribers: 1,
                            in_flight: 0,
                            last_fetch: None,
                            last_unsubscribed: None,
                        },
                    );
                    (rx, true)
                }
            }
        };

        if fetch {
            // deduped: a fetch already in flight for this key is shared
            self.begin_fetch(&key, true);
        }

        Subscription {
            rx,
            _guard: SlotGuard {
                cache: self.clone(),
                key,
            },
        }
    }

    /// Run a one-shot write operation.
    ///
    /// Mutations never populate the keyed cache. On success, every live
    /// slot carrying one of `invalidates` transitions to refetching.
    pub async fn mutate<T, F>(&self, invalidates: &[&str], op: F) -> ApiResult<T>
    where
        F: Future<Output = ApiResult<T>>,
    {
        let result = op.await;
        if result.is_ok() && !invalidates.is_empty() {
            self.invalidate_tags(invalidates);
        }
        result
    }

    /// Flip every live slot carrying one of `tags` into a refetching state.
    pub fn invalidate_tags(&self, tags: &[&str]) {
        let keys: Vec<QueryKey> = {
            let slots = self.slots.lock();
            slots
                .iter()
                .filter(|(_, slot)| slot.tags.iter().any(|t| tags.contains(t)))
                .map(|(key, _)| key.clone())
                .collect()
        };

        for key in &keys {
            debug!(operation = key.operation, "invalidating cache slot");
            // not deduped: an invalidation must refetch even when a fetch
            // is already running; last to settle wins
            self.begin_fetch(key, false);
        }
    }

    /// Number of live slots (subscribed or inside their grace period).
    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.lock().is_empty()
    }

    fn begin_fetch(&self, key: &QueryKey, dedupe: bool) {
        let fetcher = {
            let mut slots = self.slots.lock();
            let Some(slot) = slots.get_mut(key) else {
                return;
            };
            if dedupe && slot.in_flight > 0 {
                return;
            }
            slot.in_flight += 1;
            slot.tx.send_modify(|state| {
                state.is_loading = state.data.is_none() && state.error.is_none();
                state.is_fetching = true;
            });
            slot.fetcher.clone()
        };

        let cache = self.clone();
        let key = key.clone();
        tokio::spawn(async move {
            let result = fetcher().await;
            cache.settle(&key, result);
        });
    }

    fn settle(&self, key: &QueryKey, result: ApiResult<Value>) {
        let mut slots = self.slots.lock();
        // the slot may have been evicted while the request was in flight;
        // the late result is dropped, not resurrected
        let Some(slot) = slots.get_mut(key) else {
            return;
        };

        slot.in_flight = slot.in_flight.saturating_sub(1);
        slot.last_fetch = Some(Instant::now());
        let still_fetching = slot.in_flight > 0;

        slot.tx.send_modify(|state| {
            match result {
                Ok(value) => {
                    state.data = Some(value);
                    state.error = None;
                }
                Err(e) => {
                    state.error = Some(e);
                }
            }
            state.is_loading = false;
            state.is_fetching = still_fetching;
        });
    }

    fn unsubscribe(&self, key: &QueryKey) {
        {
            let mut slots = self.slots.lock();
            let Some(slot) = slots.get_mut(key) else {
                return;
            };
            slot.subscribers = slot.subscribers.saturating_sub(1);
            if slot.subscribers > 0 {
                return;
            }
            slot.last_unsubscribed = Some(Instant::now());
        }

        // guards drop from arbitrary contexts; during runtime teardown
        // there is nothing left to evict for
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let cache = self.clone();
        let key = key.clone();
        let grace = self.grace;
        handle.spawn(async move {
            tokio::time::sleep(grace).await;
            cache.evict_if_idle(&key);
        });
    }

    fn evict_if_idle(&self, key: &QueryKey) {
        let mut slots = self.slots.lock();
        let Some(slot) = slots.get(key) else {
            return;
        };
        // a resubscribe clears last_unsubscribed; a newer drop restarts the
        // clock and has its own eviction task pending
        let idle = slot.subscribers == 0
            && slot
                .last_unsubscribed
                .map_or(false, |at| at.elapsed() >= self.grace);
        if idle {
            debug!(operation = key.operation, "evicting idle cache slot");
            slots.remove(key);
        }
    }
}

/// Canonical fingerprint for query arguments.
///
/// `serde_json` object maps are BTreeMap-backed (the `preserve_order`
/// feature is not enabled), so keys render sorted and two structurally
/// equal argument values fingerprint identically regardless of field
/// declaration order.
pub fn fingerprint<A: Serialize>(args: &A) -> String {
    serde_json::to_value(args)
        .and_then(|value| serde_json::to_string(&value))
        .unwrap_or_else(|e| {
            warn!(error = %e, "unserializable query arguments, degrading to error fingerprint");
            format!("unserializable:{e}")
        })
}

/// Live handle to a cache slot.
///
/// Dropping the subscription releases the slot; dropping the *last*
/// subscription starts the grace period. An in-flight request is never
/// cancelled by unsubscribing.
pub struct Subscription {
    rx: watch::Receiver<QueryState>,
    _guard: SlotGuard,
}

impl Subscription {
    /// Snapshot of the current state.
    pub fn state(&self) -> QueryState {
        self.rx.borrow().clone()
    }

    /// Wait for the next state change and return it.
    pub async fn changed(&mut self) -> QueryState {
        // Err is only possible after eviction, which a live subscription
        // prevents; the current state is still the right answer then
        let _ = self.rx.changed().await;
        self.rx.borrow_and_update().clone()
    }

    /// Wait until no fetch is running and return the settled state.
    pub async fn settled(&mut self) -> QueryState {
        loop {
            let state = self.rx.borrow_and_update().clone();
            if !state.is_fetching && !state.is_loading {
                return state;
            }
            if self.rx.changed().await.is_err() {
                return state;
            }
        }
    }
}

struct SlotGuard {
    cache: QueryCache,
    key: QueryKey,
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.cache.unsubscribe(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_fetcher(counter: Arc<AtomicUsize>, delay: Duration) -> Fetcher {
        Arc::new(move || {
            let counter = counter.clone();
            Box::pin(async move {
                tokio::time::sleep(delay).await;
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                Ok(json!({ "fetch": n }))
            })
        })
    }

    fn failing_fetcher(status: u16) -> Fetcher {
        Arc::new(move || {
            Box::pin(async move {
                Err(ApiError::Http {
                    status,
                    body: "{\"error\":\"nope\"}".to_string(),
                })
            })
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_equal_queries_share_one_fetch() {
        let cache = QueryCache::new(Duration::from_secs(30));
        let counter = Arc::new(AtomicUsize::new(0));
        let fetcher = counting_fetcher(counter.clone(), Duration::from_millis(100));
        let options = QueryOptions::default();
        let args = json!({ "city": "Lagos" });

        let mut first = cache.query("events.list", &args, &options, fetcher.clone());
        let mut second = cache.query("events.list", &args, &options, fetcher);

        assert!(first.state().is_loading);

        let a = first.settled().await;
        let b = second.settled().await;

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(a.data, Some(json!({ "fetch": 1 })));
        assert_eq!(b.data, a.data);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_distinct_fingerprints_fetch_separately() {
        let cache = QueryCache::new(Duration::from_secs(30));
        let counter = Arc::new(AtomicUsize::new(0));
        let fetcher = counting_fetcher(counter.clone(), Duration::from_millis(10));
        let options = QueryOptions::default();

        let mut lagos = cache.query("events.list", &json!({"city": "Lagos"}), &options, fetcher.clone());
        let mut accra = cache.query("events.list", &json!({"city": "Accra"}), &options, fetcher);

        lagos.settled().await;
        accra.settled().await;

        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_fingerprint_ignores_key_insertion_order() {
        let mut forward = serde_json::Map::new();
        forward.insert("a".to_string(), json!(1));
        forward.insert("b".to_string(), json!(2));

        let mut reverse = serde_json::Map::new();
        reverse.insert("b".to_string(), json!(2));
        reverse.insert("a".to_string(), json!(1));

        assert_eq!(
            fingerprint(&Value::Object(forward)),
            fingerprint(&Value::Object(reverse))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_mutation_invalidates_tagged_slots() {
        let cache = QueryCache::new(Duration::from_secs(30));
        let counter = Arc::new(AtomicUsize::new(0));
        let fetcher = counting_fetcher(counter.clone(), Duration::from_millis(10));
        let options = QueryOptions::tagged(&["bookings"]);

        let mut bookings = cache.query("bookings.mine", &json!(null), &options, fetcher);
        bookings.settled().await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        let booked: ApiResult<Value> = cache
            .mutate(&["bookings"], async { Ok(json!({ "id": 7 })) })
            .await;
        assert!(booked.is_ok());

        // the live slot flips to refetching immediately after the mutate
        assert!(bookings.state().is_fetching);

        let refreshed = bookings.settled().await;
        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert_eq!(refreshed.data, Some(json!({ "fetch": 2 })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_mutation_does_not_invalidate() {
        let cache = QueryCache::new(Duration::from_secs(30));
        let counter = Arc::new(AtomicUsize::new(0));
        let fetcher = counting_fetcher(counter.clone(), Duration::from_millis(10));
        let options = QueryOptions::tagged(&["bookings"]);

        let mut bookings = cache.query("bookings.mine", &json!(null), &options, fetcher);
        bookings.settled().await;

        let failed: ApiResult<Value> = cache
            .mutate(&["bookings"], async {
                Err(ApiError::Network("connection refused".to_string()))
            })
            .await;
        assert!(failed.is_err());
        assert!(!bookings.state().is_fetching);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_errors_propagate_to_subscribers() {
        let cache = QueryCache::new(Duration::from_secs(30));
        let options = QueryOptions::default();

        let mut sub = cache.query("profile.get", &json!(null), &options, failing_fetcher(401));
        let state = sub.settled().await;

        assert_eq!(state.data, None);
        let err = state.error.expect("error should propagate");
        assert!(err.is_unauthenticated());
        assert_eq!(err.backend_message().as_deref(), Some("nope"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_grace_period_eviction() {
        let cache = QueryCache::new(Duration::from_secs(30));
        let counter = Arc::new(AtomicUsize::new(0));
        let fetcher = counting_fetcher(counter.clone(), Duration::from_millis(10));
        let options = QueryOptions::default();

        let mut sub = cache.query("events.list", &json!({}), &options, fetcher);
        sub.settled().await;
        drop(sub);

        // still cached inside the grace window
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(cache.len(), 1);

        tokio::time::sleep(Duration::from_secs(25)).await;
        assert_eq!(cache.len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribed_slot_never_evicts() {
        let cache = QueryCache::new(Duration::from_secs(30));
        let counter = Arc::new(AtomicUsize::new(0));
        let fetcher = counting_fetcher(counter.clone(), Duration::from_millis(10));
        let options = QueryOptions::default();

        let mut sub = cache.query("events.list", &json!({}), &options, fetcher);
        sub.settled().await;

        tokio::time::sleep(Duration::from_secs(3600)).await;
        assert_eq!(cache.len(), 1);
        assert!(sub.state().data.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unsubscribe_does_not_cancel_in_flight_fetch() {
        let cache = QueryCache::new(Duration::from_secs(30));
        let counter = Arc::new(AtomicUsize::new(0));
        let fetcher = counting_fetcher(counter.clone(), Duration::from_millis(100));
        let options = QueryOptions::default().stale_after(Duration::from_secs(300));

        let sub = cache.query("events.list", &json!({}), &options, fetcher.clone());
        drop(sub); // unsubscribed before the request settles

        tokio::time::sleep(Duration::from_millis(200)).await;

        // the request ran to completion and its result landed in the slot,
        // so a remount inside the grace window is served from cache
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        let again = cache.query("events.list", &json!({}), &options, fetcher);
        assert_eq!(again.state().data, Some(json!({ "fetch": 1 })));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resubscribe_within_grace_serves_cached_data() {
        let cache = QueryCache::new(Duration::from_secs(30));
        let counter = Arc::new(AtomicUsize::new(0));
        let fetcher = counting_fetcher(counter.clone(), Duration::from_millis(10));
        let options = QueryOptions::default().stale_after(Duration::from_secs(300));

        let mut sub = cache.query("events.list", &json!({}), &options, fetcher.clone());
        sub.settled().await;
        drop(sub);

        tokio::time::sleep(Duration::from_secs(5)).await;

        // remount inside grace + freshness: no second network round-trip
        let again = cache.query("events.list", &json!({}), &options, fetcher);
        assert_eq!(again.state().data, Some(json!({ "fetch": 1 })));
        assert!(!again.state().is_fetching);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_resubscribe_refetches() {
        let cache = QueryCache::new(Duration::from_secs(3600));
        let counter = Arc::new(AtomicUsize::new(0));
        let fetcher = counting_fetcher(counter.clone(), Duration::from_millis(10));
        let options = QueryOptions::default().stale_after(Duration::from_secs(60));

        let mut sub = cache.query("events.list", &json!({}), &options, fetcher.clone());
        sub.settled().await;
        drop(sub);

        tokio::time::sleep(Duration::from_secs(120)).await;

        let mut again = cache.query("events.list", &json!({}), &options, fetcher);
        let state = again.settled().await;
        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert_eq!(state.data, Some(json!({ "fetch": 2 })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refetch_on_resubscribe_policy() {
        let cache = QueryCache::new(Duration::from_secs(3600));
        let counter = Arc::new(AtomicUsize::new(0));
        let fetcher = counting_fetcher(counter.clone(), Duration::from_millis(10));
        let options = QueryOptions::default()
            .stale_after(Duration::from_secs(3600))
            .refetch_on_resubscribe(true);

        let mut sub = cache.query("events.list", &json!({}), &options, fetcher.clone());
        sub.settled().await;
        drop(sub);

        let mut again = cache.query("events.list", &json!({}), &options, fetcher);
        again.settled().await;
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }
}
