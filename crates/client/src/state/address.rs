//! Address autocomplete container.
//!
//! Input is debounced; issuing a new search cancels the pending one (both
//! its debounce timer and any in-flight lookup), and a generation counter
//! guarantees a stale response is never applied over a newer one. Queries
//! under the minimum length short-circuit to an empty result set without
//! touching the network.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::instrument;

use crate::api::geocode::{AddressCandidate, Geocoder};
use crate::toast::{ToastRequest, Toasts};

/// How long input must be quiet before a lookup is issued.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);
/// Queries shorter than this never reach the network.
pub const MIN_QUERY_LENGTH: usize = 3;

/// Current autocomplete state.
#[derive(Debug, Clone, PartialEq)]
pub struct AddressState {
    /// What the user has typed so far.
    pub query: String,
    /// Candidates for the current query, best (highest place id) first.
    pub results: Vec<AddressCandidate>,
    /// The chosen/typed delivery address.
    pub address: String,
    pub lat: f64,
    pub lng: f64,
}

impl Default for AddressState {
    fn default() -> Self {
        Self {
            query: String::new(),
            results: Vec::new(),
            address: String::new(),
            // Downtown Chicago, the storefront's home market
            lat: 41.8781,
            lng: -87.6298,
        }
    }
}

/// Debounced, cancellable address search.
pub struct AddressSearch<G>
where
    G: Geocoder + 'static,
{
    geocoder: Arc<G>,
    toasts: Toasts,
    state: Arc<Mutex<AddressState>>,
    generation: Arc<AtomicU64>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<G> AddressSearch<G>
where
    G: Geocoder + 'static,
{
    /// Create an idle container.
    pub fn new(geocoder: G, toasts: Toasts) -> Self {
        Self {
            geocoder: Arc::new(geocoder),
            toasts,
            state: Arc::new(Mutex::new(AddressState::default())),
            generation: Arc::new(AtomicU64::new(0)),
            pending: Mutex::new(None),
        }
    }

    /// Current state snapshot.
    #[must_use]
    pub fn state(&self) -> AddressState {
        lock(&self.state).clone()
    }

    /// Record new input and schedule a debounced lookup.
    ///
    /// Cancels whatever search was pending. Must be called from within a
    /// tokio runtime.
    #[instrument(skip(self))]
    pub fn search(&self, text: &str) {
        lock(&self.state).query = text.to_owned();

        // Every call starts a new generation; anything older must not land.
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(previous) = lock(&self.pending).take() {
            previous.abort();
        }

        let text = text.to_owned();
        let geocoder = Arc::clone(&self.geocoder);
        let state = Arc::clone(&self.state);
        let current = Arc::clone(&self.generation);
        let toasts = self.toasts.clone();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(SEARCH_DEBOUNCE).await;
            if current.load(Ordering::SeqCst) != generation {
                return;
            }

            if text.chars().count() < MIN_QUERY_LENGTH {
                lock(&state).results.clear();
                return;
            }

            match geocoder.search(&text).await {
                Ok(mut results) => {
                    if current.load(Ordering::SeqCst) != generation {
                        return;
                    }
                    results.sort_by(|a, b| b.place_id.cmp(&a.place_id));
                    lock(&state).results = results;
                }
                Err(error) => {
                    toasts.push(ToastRequest::destructive(
                        "Address error",
                        error.to_string(),
                    ));
                }
            }
        });

        *lock(&self.pending) = Some(handle);
    }

    /// Wait for the pending lookup (if any) to finish or be cancelled.
    pub async fn wait_for_search(&self) {
        let handle = lock(&self.pending).take();
        if let Some(handle) = handle {
            // Abort errors just mean the search was superseded.
            let _ = handle.await;
        }
    }

    /// Adopt a candidate: collapse the result list and set the derived
    /// address and coordinates atomically.
    pub fn select_address(&self, candidate: &AddressCandidate) {
        let mut state = lock(&self.state);
        state.query = candidate.display_name.clone();
        state.address = candidate.display_name.clone();
        if let Ok(lat) = candidate.lat.parse() {
            state.lat = lat;
        }
        if let Ok(lng) = candidate.lon.parse() {
            state.lng = lng;
        }
        state.results.clear();
    }

    /// Set the delivery address directly (manual entry).
    pub fn set_address(&self, value: &str) {
        lock(&self.state).address = value.to_owned();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::sync::atomic::AtomicUsize;

    use crate::api::geocode::GeocodeError;

    /// Geocoder stub: counts calls, optionally delays, echoes canned results.
    struct StubGeocoder {
        calls: AtomicUsize,
        delay: Duration,
    }

    impl StubGeocoder {
        fn instant() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                delay: Duration::ZERO,
            })
        }

        fn slow(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                delay,
            })
        }
    }

    fn candidate(place_id: u64, display_name: &str) -> AddressCandidate {
        AddressCandidate {
            place_id,
            display_name: display_name.to_owned(),
            lat: "41.8867756".to_owned(),
            lon: "-87.6363440".to_owned(),
        }
    }

    impl Geocoder for Arc<StubGeocoder> {
        fn search(
            &self,
            query: &str,
        ) -> impl Future<Output = Result<Vec<AddressCandidate>, GeocodeError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let delay = self.delay;
            let query = query.to_owned();
            async move {
                tokio::time::sleep(delay).await;
                Ok(vec![
                    candidate(100, &format!("{query} - first")),
                    candidate(300, &format!("{query} - newest")),
                    candidate(200, &format!("{query} - middle")),
                ])
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_query_never_hits_the_network() {
        let geocoder = StubGeocoder::instant();
        let search = AddressSearch::new(Arc::clone(&geocoder), Toasts::new());

        search.search("ab");
        search.wait_for_search().await;

        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
        assert!(search.state().results.is_empty());
        assert_eq!(search.state().query, "ab");
    }

    #[tokio::test(start_paused = true)]
    async fn test_results_sorted_by_descending_place_id() {
        let geocoder = StubGeocoder::instant();
        let search = AddressSearch::new(geocoder, Toasts::new());

        search.search("wacker drive");
        search.wait_for_search().await;

        let results = search.state().results;
        let ids: Vec<u64> = results.iter().map(|c| c.place_id).collect();
        assert_eq!(ids, vec![300, 200, 100]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_search_cancels_pending_one() {
        let geocoder = StubGeocoder::instant();
        let search = AddressSearch::new(Arc::clone(&geocoder), Toasts::new());

        // Second call lands inside the first call's debounce window
        search.search("old query");
        search.search("new query");
        search.wait_for_search().await;

        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
        let results = search.state().results;
        assert!(results
            .iter()
            .all(|c| c.display_name.starts_with("new query")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_is_never_applied() {
        // First lookup is slow enough that the second supersedes it mid-flight
        let geocoder = StubGeocoder::slow(Duration::from_secs(2));
        let search = AddressSearch::new(Arc::clone(&geocoder), Toasts::new());

        search.search("slow query");
        // Let the debounce elapse so the slow lookup is actually in flight
        tokio::time::sleep(SEARCH_DEBOUNCE + Duration::from_millis(10)).await;

        search.search("fast query");
        search.wait_for_search().await;

        let results = search.state().results;
        assert!(!results.is_empty());
        assert!(results
            .iter()
            .all(|c| c.display_name.starts_with("fast query")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_address_collapses_results() {
        let geocoder = StubGeocoder::instant();
        let search = AddressSearch::new(geocoder, Toasts::new());

        search.search("wacker drive");
        search.wait_for_search().await;
        assert!(!search.state().results.is_empty());

        let chosen = candidate(300, "300 Wacker Dr, Chicago");
        search.select_address(&chosen);

        let state = search.state();
        assert_eq!(state.query, "300 Wacker Dr, Chicago");
        assert_eq!(state.address, "300 Wacker Dr, Chicago");
        assert!((state.lat - 41.886_775_6).abs() < 1e-9);
        assert!((state.lng - -87.636_344_0).abs() < 1e-9);
        assert!(state.results.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_address_manual_entry() {
        let search = AddressSearch::new(StubGeocoder::instant(), Toasts::new());
        search.set_address("221B Baker Street");
        assert_eq!(search.state().address, "221B Baker Street");
    }
}
