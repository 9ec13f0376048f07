use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use truckfinder_core::RawFoodTruck;

use super::DatasetSource;
use crate::error::DatasetError;

/// Source of "now" for cache expiry decisions.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug)]
struct CacheEntry {
    payload: Arc<Vec<RawFoodTruck>>,
    fetched_at: DateTime<Utc>,
    /// When the fetch that produced this entry started.
    requested_at: DateTime<Utc>,
}

/// Read-through, single-entry cache in front of a [`DatasetSource`].
///
/// An entry older than the TTL is refreshed on the next [`get`](Self::get).
/// Only a successful fetch replaces the entry. When a refresh fails and an
/// older entry exists, that entry keeps being served; the error reaches the
/// caller only when nothing has ever been fetched.
///
/// The lock is never held across the upstream call, and a refresh swaps in a
/// fully built entry, so readers see either the old payload or the new one.
/// Concurrent misses may each hit upstream once; of overlapping refreshes the
/// one that started last is kept, even if an earlier one finishes after it.
pub struct RawDatasetCache {
    source: Arc<dyn DatasetSource>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    entry: RwLock<Option<Arc<CacheEntry>>>,
}

impl RawDatasetCache {
    pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

    #[must_use]
    pub fn new(source: Arc<dyn DatasetSource>, ttl: Duration) -> Self {
        Self::with_clock(source, ttl, Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(
        source: Arc<dyn DatasetSource>,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            source,
            clock,
            ttl,
            entry: RwLock::new(None),
        }
    }

    /// Returns the cached dataset, fetching it first when missing or expired.
    ///
    /// # Errors
    ///
    /// Returns the upstream [`DatasetError`] only when the fetch fails and no
    /// earlier payload is available to fall back on.
    pub async fn get(&self) -> Result<Arc<Vec<RawFoodTruck>>, DatasetError> {
        let current = self.entry.read().await.clone();

        if let Some(entry) = &current {
            if self.is_fresh(entry) {
                return Ok(Arc::clone(&entry.payload));
            }
        }

        let requested_at = self.clock.now();
        match self.source.fetch().await {
            Ok(records) => {
                let entry = Arc::new(CacheEntry {
                    payload: Arc::new(records),
                    fetched_at: self.clock.now(),
                    requested_at,
                });
                tracing::info!(
                    records = entry.payload.len(),
                    fetched_at = %entry.fetched_at,
                    "refreshed food truck dataset"
                );
                let mut slot = self.entry.write().await;
                if let Some(newer) = slot.as_ref().filter(|e| e.requested_at > requested_at) {
                    tracing::debug!("discarding refresh overtaken by a later one");
                    return Ok(Arc::clone(&newer.payload));
                }
                let payload = Arc::clone(&entry.payload);
                *slot = Some(entry);
                Ok(payload)
            }
            Err(err) => match current {
                Some(stale) => {
                    tracing::warn!(
                        error = %err,
                        fetched_at = %stale.fetched_at,
                        "food truck dataset refresh failed; serving previous copy"
                    );
                    Ok(Arc::clone(&stale.payload))
                }
                None => {
                    tracing::error!(error = %err, "food truck dataset unavailable");
                    Err(err)
                }
            },
        }
    }

    /// When the currently held payload was fetched, if any.
    pub async fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.entry.read().await.as_ref().map(|entry| entry.fetched_at)
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn is_fresh(&self, entry: &CacheEntry) -> bool {
        // A clock that moved backwards reads as age zero.
        match (self.clock.now() - entry.fetched_at).to_std() {
            Ok(age) => age <= self.ttl,
            Err(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::TimeDelta;
    use serde_json::json;
    use tokio::sync::oneshot;

    use super::*;

    struct ManualClock(Mutex<DateTime<Utc>>);

    impl ManualClock {
        fn new() -> Self {
            Self(Mutex::new(
                DateTime::parse_from_rfc3339("2025-06-01T12:00:00Z")
                    .unwrap()
                    .with_timezone(&Utc),
            ))
        }

        fn advance(&self, by: TimeDelta) {
            let mut now = self.0.lock().unwrap();
            *now += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    enum Outcome {
        Records(Vec<RawFoodTruck>),
        Status(u16),
    }

    /// Replays scripted outcomes in order and counts calls.
    struct ScriptedSource {
        outcomes: Mutex<VecDeque<Outcome>>,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(outcomes: Vec<Outcome>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DatasetSource for ScriptedSource {
        async fn fetch(&self) -> Result<Vec<RawFoodTruck>, DatasetError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.outcomes.lock().unwrap().pop_front() {
                Some(Outcome::Records(records)) => Ok(records),
                Some(Outcome::Status(status)) => Err(DatasetError::UnexpectedStatus {
                    status,
                    url: "http://upstream.test/trucks.json".to_owned(),
                }),
                None => panic!("unexpected extra fetch"),
            }
        }
    }

    /// Each fetch waits for the payload sent on its own channel.
    struct GatedSource {
        gates: Mutex<VecDeque<oneshot::Receiver<Vec<RawFoodTruck>>>>,
    }

    impl GatedSource {
        fn pending(&self) -> usize {
            self.gates.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl DatasetSource for GatedSource {
        async fn fetch(&self) -> Result<Vec<RawFoodTruck>, DatasetError> {
            let gate = self
                .gates
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected extra fetch");
            Ok(gate.await.expect("gate released"))
        }
    }

    fn truck(name: &str) -> RawFoodTruck {
        RawFoodTruck::from_value(json!({
            "applicant": name,
            "latitude": "37.7749",
            "longitude": "-122.4194"
        }))
        .unwrap()
    }

    fn cache_with(source: &Arc<ScriptedSource>, clock: &Arc<ManualClock>) -> RawDatasetCache {
        let source: Arc<dyn DatasetSource> = source.clone();
        let clock: Arc<dyn Clock> = clock.clone();
        RawDatasetCache::with_clock(source, RawDatasetCache::DEFAULT_TTL, clock)
    }

    fn names(payload: &[RawFoodTruck]) -> Vec<String> {
        payload.iter().filter_map(RawFoodTruck::applicant).collect()
    }

    #[tokio::test]
    async fn first_get_fetches_and_later_gets_hit_the_cache() {
        let source = Arc::new(ScriptedSource::new(vec![Outcome::Records(vec![truck("A")])]));
        let clock = Arc::new(ManualClock::new());
        let cache = cache_with(&source, &clock);

        assert!(cache.fetched_at().await.is_none());
        let first = cache.get().await.expect("first get");
        clock.advance(TimeDelta::minutes(59));
        let second = cache.get().await.expect("second get");

        assert_eq!(source.calls(), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(names(&second), vec!["A"]);
        assert!(cache.fetched_at().await.is_some());
    }

    #[tokio::test]
    async fn entry_at_exactly_the_ttl_is_still_fresh() {
        let source = Arc::new(ScriptedSource::new(vec![Outcome::Records(vec![truck("A")])]));
        let clock = Arc::new(ManualClock::new());
        let cache = cache_with(&source, &clock);

        cache.get().await.expect("first get");
        clock.advance(TimeDelta::seconds(3600));
        cache.get().await.expect("second get");

        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn expired_entry_is_refreshed() {
        let source = Arc::new(ScriptedSource::new(vec![
            Outcome::Records(vec![truck("A")]),
            Outcome::Records(vec![truck("B"), truck("C")]),
        ]));
        let clock = Arc::new(ManualClock::new());
        let cache = cache_with(&source, &clock);

        cache.get().await.expect("first get");
        let first_fetch = cache.fetched_at().await.expect("fetched");
        clock.advance(TimeDelta::seconds(3601));
        let refreshed = cache.get().await.expect("refresh");

        assert_eq!(source.calls(), 2);
        assert_eq!(names(&refreshed), vec!["B", "C"]);
        assert!(cache.fetched_at().await.expect("fetched") > first_fetch);
    }

    #[tokio::test]
    async fn failure_with_empty_cache_propagates() {
        let source = Arc::new(ScriptedSource::new(vec![Outcome::Status(500)]));
        let clock = Arc::new(ManualClock::new());
        let cache = cache_with(&source, &clock);

        let err = cache.get().await.expect_err("should fail");
        assert!(matches!(
            err,
            DatasetError::UnexpectedStatus { status: 500, .. }
        ));
        assert!(cache.fetched_at().await.is_none());
    }

    #[tokio::test]
    async fn failed_refresh_keeps_serving_the_previous_payload() {
        let source = Arc::new(ScriptedSource::new(vec![
            Outcome::Records(vec![truck("A")]),
            Outcome::Status(503),
            Outcome::Records(vec![truck("B")]),
        ]));
        let clock = Arc::new(ManualClock::new());
        let cache = cache_with(&source, &clock);

        cache.get().await.expect("first get");
        let first_fetch = cache.fetched_at().await;
        clock.advance(TimeDelta::hours(2));

        let stale = cache.get().await.expect("stale copy served");
        assert_eq!(names(&stale), vec!["A"]);
        assert_eq!(cache.fetched_at().await, first_fetch, "entry not replaced");

        // The entry is still expired, so the next read tries upstream again.
        let refreshed = cache.get().await.expect("recovered");
        assert_eq!(names(&refreshed), vec!["B"]);
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test]
    async fn failure_after_failure_keeps_propagating_until_success() {
        let source = Arc::new(ScriptedSource::new(vec![
            Outcome::Status(500),
            Outcome::Records(vec![truck("A")]),
        ]));
        let clock = Arc::new(ManualClock::new());
        let cache = cache_with(&source, &clock);

        assert!(cache.get().await.is_err());
        let payload = cache.get().await.expect("second attempt succeeds");
        assert_eq!(names(&payload), vec!["A"]);
    }

    #[tokio::test]
    async fn slower_earlier_refresh_does_not_replace_a_newer_entry() {
        let (slow_tx, slow_rx) = oneshot::channel();
        let (fast_tx, fast_rx) = oneshot::channel();
        let source = Arc::new(GatedSource {
            gates: Mutex::new(VecDeque::from([slow_rx, fast_rx])),
        });
        let clock = Arc::new(ManualClock::new());
        let cache = Arc::new(RawDatasetCache::with_clock(
            source.clone(),
            RawDatasetCache::DEFAULT_TTL,
            clock.clone(),
        ));

        let slow = tokio::spawn({
            let cache = Arc::clone(&cache);
            async move { cache.get().await }
        });
        while source.pending() == 2 {
            tokio::task::yield_now().await;
        }

        clock.advance(TimeDelta::seconds(1));
        fast_tx.send(vec![truck("Newer")]).unwrap();
        let fast = cache.get().await.expect("fast refresh");
        assert_eq!(names(&fast), vec!["Newer"]);

        slow_tx.send(vec![truck("Older")]).unwrap();
        let slow = slow.await.expect("join").expect("slow refresh");
        assert_eq!(names(&slow), vec!["Newer"]);
        assert_eq!(names(&cache.get().await.expect("cached")), vec!["Newer"]);
    }
}
