//! Lists state container.
//!
//! Mutations are not optimistic: the backend is called first and the single
//! affected list is replaced with the server's authoritative response before
//! the full collection is written to the local cache. The client therefore
//! never displays a list state the server has not confirmed, at the cost of
//! latency between action and update.

use std::sync::{Mutex, PoisonError};

use tracing::instrument;

use avento_core::{List, ListId, ProductId};

use crate::api::ListsApi;
use crate::error::ClientError;
use crate::state::ConfirmPrompt;
use crate::store::{KeyValueStore, LISTS_KEY};

const DELETE_LIST_CONFIRMATION: &str = "Are you sure you want to delete this list? This action cannot be undone and will permanently remove all of the list data.";
const REMOVE_PRODUCT_CONFIRMATION: &str =
    "Are you sure you want to remove product from this list? This action cannot be undone.";

#[derive(Default)]
struct ListsState {
    lists: Vec<List>,
    loading: bool,
    last_error: Option<String>,
}

/// Server-authoritative lists container.
pub struct Lists<S, A, C>
where
    S: KeyValueStore,
    A: ListsApi,
    C: ConfirmPrompt,
{
    store: S,
    api: A,
    confirm: C,
    state: Mutex<ListsState>,
}

impl<S, A, C> Lists<S, A, C>
where
    S: KeyValueStore,
    A: ListsApi,
    C: ConfirmPrompt,
{
    /// Create a container hydrated from the local cache.
    pub fn new(store: S, api: A, confirm: C) -> Self {
        let lists = store.load(LISTS_KEY).unwrap_or_default();
        Self {
            store,
            api,
            confirm,
            state: Mutex::new(ListsState {
                lists,
                ..ListsState::default()
            }),
        }
    }

    /// Cached copy of the user's lists.
    #[must_use]
    pub fn lists(&self) -> Vec<List> {
        self.lock_state().lists.clone()
    }

    /// Whether a backend call is in flight.
    #[must_use]
    pub fn loading(&self) -> bool {
        self.lock_state().loading
    }

    /// The message of the most recent failure, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.lock_state().last_error.clone()
    }

    /// Forget the recorded failure.
    pub fn clear_error(&self) {
        self.lock_state().last_error = None;
    }

    /// Replace the cached collection with the server's.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails; the cached collection
    /// is left untouched.
    #[instrument(skip(self))]
    pub async fn fetch_lists(&self) -> Result<Vec<List>, ClientError> {
        self.begin();
        match self.api.fetch_lists().await {
            Ok(lists) => {
                self.commit(|cached| *cached = lists.clone())?;
                Ok(lists)
            }
            Err(error) => Err(self.fail(error.into())),
        }
    }

    /// Create a named list and append the server's copy to the cache.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    #[instrument(skip(self))]
    pub async fn create_list(&self, name: &str) -> Result<List, ClientError> {
        self.begin();
        match self.api.create_list(name).await {
            Ok(created) => {
                self.commit(|cached| cached.push(created.clone()))?;
                Ok(created)
            }
            Err(error) => Err(self.fail(error.into())),
        }
    }

    /// Rename a list, replacing the cached copy with the server's response.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    #[instrument(skip(self))]
    pub async fn update_list(&self, id: &ListId, name: &str) -> Result<List, ClientError> {
        self.begin();
        match self.api.update_list(id, name).await {
            Ok(updated) => {
                self.commit(|cached| replace_list(cached, &updated))?;
                Ok(updated)
            }
            Err(error) => Err(self.fail(error.into())),
        }
    }

    /// Add a product to a list, replacing the cached copy with the server's.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    #[instrument(skip(self))]
    pub async fn add_product_to_list(
        &self,
        list_id: &ListId,
        product_id: &ProductId,
    ) -> Result<List, ClientError> {
        self.begin();
        match self.api.add_product_to_list(list_id, product_id).await {
            Ok(updated) => {
                self.commit(|cached| replace_list(cached, &updated))?;
                Ok(updated)
            }
            Err(error) => Err(self.fail(error.into())),
        }
    }

    /// Remove a product from a list, after confirmation.
    ///
    /// Returns `Ok(None)` when the user declines - a no-op, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    #[instrument(skip(self))]
    pub async fn remove_product_from_list(
        &self,
        list_id: &ListId,
        product_id: &ProductId,
    ) -> Result<Option<List>, ClientError> {
        if !self.confirm.confirm(REMOVE_PRODUCT_CONFIRMATION) {
            return Ok(None);
        }

        self.begin();
        match self.api.remove_product_from_list(list_id, product_id).await {
            Ok(updated) => {
                self.commit(|cached| replace_list(cached, &updated))?;
                Ok(Some(updated))
            }
            Err(error) => Err(self.fail(error.into())),
        }
    }

    /// Delete a list, after confirmation.
    ///
    /// Returns `Ok(false)` when the user declines - a no-op, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    #[instrument(skip(self))]
    pub async fn delete_list(&self, id: &ListId) -> Result<bool, ClientError> {
        if !self.confirm.confirm(DELETE_LIST_CONFIRMATION) {
            return Ok(false);
        }

        self.begin();
        match self.api.delete_list(id).await {
            Ok(()) => {
                self.commit(|cached| cached.retain(|list| &list.id != id))?;
                Ok(true)
            }
            Err(error) => Err(self.fail(error.into())),
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, ListsState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self) {
        let mut state = self.lock_state();
        state.loading = true;
        state.last_error = None;
    }

    /// Apply a confirmed server result to the cache and persist it.
    fn commit(&self, apply: impl FnOnce(&mut Vec<List>)) -> Result<(), ClientError> {
        let mut state = self.lock_state();
        apply(&mut state.lists);
        let saved = self.store.save(LISTS_KEY, &state.lists);
        state.loading = false;
        saved.map_err(|error| {
            let error = ClientError::from(error);
            state.last_error = Some(error.to_string());
            error
        })
    }

    fn fail(&self, error: ClientError) -> ClientError {
        let mut state = self.lock_state();
        state.loading = false;
        state.last_error = Some(error.to_string());
        error
    }
}

/// Swap the cached entry with the same id for the server's copy.
fn replace_list(cached: &mut [List], updated: &List) {
    for list in cached {
        if list.id == updated.id {
            *list = updated.clone();
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::api::ApiError;
    use crate::store::{MemoryStore, LISTS_KEY};

    fn list(id: &str, name: &str, product_ids: &[&str]) -> List {
        List {
            id: ListId::new(id),
            name: name.to_owned(),
            product_ids: product_ids.iter().map(|p| ProductId::new(*p)).collect(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Stub backend: one canned response for every mutation.
    struct StubListsApi {
        response: Result<List, &'static str>,
        calls: AtomicUsize,
    }

    impl StubListsApi {
        fn ok(list: List) -> Arc<Self> {
            Arc::new(Self {
                response: Ok(list),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(message: &'static str) -> Arc<Self> {
            Arc::new(Self {
                response: Err(message),
                calls: AtomicUsize::new(0),
            })
        }

        fn respond(&self) -> Result<List, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.response {
                Ok(list) => Ok(list.clone()),
                Err(message) => Err(ApiError::Api {
                    status: 400,
                    message: (*message).to_string(),
                }),
            }
        }
    }

    impl ListsApi for Arc<StubListsApi> {
        fn fetch_lists(&self) -> impl Future<Output = Result<Vec<List>, ApiError>> + Send {
            std::future::ready(self.respond().map(|list| vec![list]))
        }

        fn create_list(&self, _name: &str) -> impl Future<Output = Result<List, ApiError>> + Send {
            std::future::ready(self.respond())
        }

        fn update_list(
            &self,
            _id: &ListId,
            _name: &str,
        ) -> impl Future<Output = Result<List, ApiError>> + Send {
            std::future::ready(self.respond())
        }

        fn add_product_to_list(
            &self,
            _list_id: &ListId,
            _product_id: &ProductId,
        ) -> impl Future<Output = Result<List, ApiError>> + Send {
            std::future::ready(self.respond())
        }

        fn remove_product_from_list(
            &self,
            _list_id: &ListId,
            _product_id: &ProductId,
        ) -> impl Future<Output = Result<List, ApiError>> + Send {
            std::future::ready(self.respond())
        }

        fn delete_list(&self, _id: &ListId) -> impl Future<Output = Result<(), ApiError>> + Send {
            std::future::ready(self.respond().map(|_| ()))
        }
    }

    struct StubConfirm(bool);

    impl ConfirmPrompt for StubConfirm {
        fn confirm(&self, _message: &str) -> bool {
            self.0
        }
    }

    fn seeded_store(lists: &[List]) -> MemoryStore {
        let store = MemoryStore::new();
        store.save(LISTS_KEY, lists).unwrap();
        store
    }

    #[tokio::test]
    async fn test_hydrates_from_cache() {
        let store = seeded_store(&[list("l1", "Wishlist", &["p1"])]);
        let container = Lists::new(store, StubListsApi::ok(list("l1", "Wishlist", &[])), StubConfirm(true));
        assert_eq!(container.lists().len(), 1);
    }

    #[tokio::test]
    async fn test_create_appends_server_copy() {
        let created = list("l2", "Gift ideas", &[]);
        let api = StubListsApi::ok(created.clone());
        let container = Lists::new(MemoryStore::new(), api, StubConfirm(true));

        let result = container.create_list("Gift ideas").await.unwrap();
        assert_eq!(result, created);
        assert_eq!(container.lists(), vec![created]);
    }

    #[tokio::test]
    async fn test_mutation_replaces_with_authoritative_response() {
        // Server's copy differs from what the client asked for; the server wins.
        let server_copy = list("l1", "Wishlist (2)", &["p1", "p2"]);
        let api = StubListsApi::ok(server_copy.clone());
        let store = seeded_store(&[list("l1", "Wishlist", &["p1"])]);
        let container = Lists::new(store, api, StubConfirm(true));

        container
            .add_product_to_list(&ListId::new("l1"), &ProductId::new("p2"))
            .await
            .unwrap();
        assert_eq!(container.lists(), vec![server_copy]);
    }

    #[tokio::test]
    async fn test_failed_mutation_leaves_state_untouched() {
        let before = vec![list("l1", "Wishlist", &["p1"])];
        let store = seeded_store(&before);
        let container = Lists::new(store.clone(), StubListsApi::failing("list_not_found"), StubConfirm(true));

        let error = container
            .update_list(&ListId::new("l1"), "Renamed")
            .await
            .unwrap_err();
        assert_eq!(error.to_string(), "list_not_found");
        assert_eq!(container.lists(), before);
        assert_eq!(container.last_error().as_deref(), Some("list_not_found"));
        // Cache untouched too
        let cached: Vec<List> = store.load(LISTS_KEY).unwrap();
        assert_eq!(cached, before);
    }

    #[tokio::test]
    async fn test_declined_confirmation_is_a_noop() {
        let api = StubListsApi::ok(list("l1", "Wishlist", &[]));
        let store = seeded_store(&[list("l1", "Wishlist", &["p1"])]);
        let container = Lists::new(store, Arc::clone(&api), StubConfirm(false));

        let removed = container
            .remove_product_from_list(&ListId::new("l1"), &ProductId::new("p1"))
            .await
            .unwrap();
        assert!(removed.is_none());

        let deleted = container.delete_list(&ListId::new("l1")).await.unwrap();
        assert!(!deleted);

        // Backend never called, state unchanged
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
        assert_eq!(container.lists().len(), 1);
        assert!(container.last_error().is_none());
    }

    #[tokio::test]
    async fn test_delete_removes_from_cache() {
        let api = StubListsApi::ok(list("l1", "Old", &[]));
        let store = seeded_store(&[list("l1", "Old", &[]), list("l2", "Keep", &[])]);
        let container = Lists::new(store.clone(), api, StubConfirm(true));

        assert!(container.delete_list(&ListId::new("l1")).await.unwrap());
        assert_eq!(container.lists(), vec![list("l2", "Keep", &[])]);
        let cached: Vec<List> = store.load(LISTS_KEY).unwrap();
        assert_eq!(cached.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_replaces_whole_collection() {
        let api = StubListsApi::ok(list("l9", "Fresh", &[]));
        let store = seeded_store(&[list("l1", "Stale", &[])]);
        let container = Lists::new(store, api, StubConfirm(true));

        let lists = container.fetch_lists().await.unwrap();
        assert_eq!(lists, vec![list("l9", "Fresh", &[])]);
        assert_eq!(container.lists(), lists);
        assert!(!container.loading());
    }
}
