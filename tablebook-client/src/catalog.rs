//! Catalog cache
//!
//! Holds the last successfully fetched restaurant listing. A refresh
//! replaces the listing wholesale; a failed refresh keeps the previous one
//! and only sets the error.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Utc};
use shared::Restaurant;
use tokio::sync::watch;

use crate::error::ClientResult;
use crate::http::ReservationApi;

pub const REFRESH_FAILED: &str = "Failed to fetch restaurants";

/// Snapshot published to observers after every change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogState {
    pub restaurants: Vec<Restaurant>,
    /// True while at least one refresh is in flight
    pub is_loading: bool,
    pub error: Option<String>,
    pub last_refreshed: Option<DateTime<Utc>>,
}

pub struct CatalogCache {
    api: Arc<dyn ReservationApi>,
    state: watch::Sender<CatalogState>,
    in_flight: AtomicUsize,
}

/// Decrements the in-flight count on drop, so a cancelled refresh does not
/// leave the cache loading forever.
struct InFlight<'a> {
    cache: &'a CatalogCache,
}

impl<'a> InFlight<'a> {
    fn enter(cache: &'a CatalogCache) -> Self {
        cache.in_flight.fetch_add(1, Ordering::SeqCst);
        cache.state.send_modify(|state| {
            state.is_loading = true;
            state.error = None;
        });
        Self { cache }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.cache.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.cache
                .state
                .send_if_modified(|state| std::mem::replace(&mut state.is_loading, false));
        }
    }
}

impl CatalogCache {
    pub fn new(api: Arc<dyn ReservationApi>) -> Self {
        let (state, _) = watch::channel(CatalogState::default());
        Self {
            api,
            state,
            in_flight: AtomicUsize::new(0),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<CatalogState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> CatalogState {
        self.state.borrow().clone()
    }

    /// Fetches the listing and replaces the cached one. Returns the number
    /// of restaurants now cached.
    ///
    /// Overlapping refreshes are not ordered: whichever response arrives
    /// last is what the cache ends up holding.
    pub async fn refresh(&self) -> ClientResult<usize> {
        let _guard = InFlight::enter(self);

        match self.api.list_restaurants().await {
            Ok(restaurants) => {
                let restaurants = dedupe_by_id(restaurants);
                let count = restaurants.len();
                self.state.send_modify(|state| {
                    state.restaurants = restaurants;
                    state.error = None;
                    state.last_refreshed = Some(Utc::now());
                });
                tracing::info!(count, "Catalog refreshed");
                Ok(count)
            }
            Err(e) => {
                let message = e.user_message(REFRESH_FAILED, REFRESH_FAILED);
                tracing::warn!(error = %e, "Catalog refresh failed, keeping previous listing");
                self.state.send_modify(|state| state.error = Some(message));
                Err(e)
            }
        }
    }

    /// Read-only projection of the cached listing.
    pub fn filter(&self, search: Option<&str>, cuisine: Option<&str>) -> Vec<Restaurant> {
        let state = self.state.borrow();
        filter_restaurants(&state.restaurants, search, cuisine)
            .into_iter()
            .cloned()
            .collect()
    }

    /// `None` means "not loaded", not "does not exist".
    pub fn by_id(&self, id: &str) -> Option<Restaurant> {
        self.state
            .borrow()
            .restaurants
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    /// Distinct non-empty cuisines in listing order.
    pub fn cuisines(&self) -> Vec<String> {
        let state = self.state.borrow();
        let mut seen = HashSet::new();
        state
            .restaurants
            .iter()
            .map(|r| r.cuisine.trim())
            .filter(|c| !c.is_empty() && seen.insert(c.to_lowercase()))
            .map(str::to_string)
            .collect()
    }

    /// Cached entry, or a direct fetch for deep links into a restaurant the
    /// listing has not loaded. The fetched entry is not added to the cache.
    pub async fn fetch_restaurant(&self, id: &str) -> ClientResult<Restaurant> {
        if let Some(restaurant) = self.by_id(id) {
            return Ok(restaurant);
        }
        tracing::debug!(restaurant_id = %id, "Catalog miss, fetching restaurant");
        self.api.get_restaurant(id).await
    }
}

impl std::fmt::Debug for CatalogCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("CatalogCache")
            .field("restaurants", &state.restaurants.len())
            .field("is_loading", &state.is_loading)
            .field("error", &state.error)
            .finish()
    }
}

/// `search` matches name, location or cuisine (case-insensitive substring).
/// `cuisine` must equal the restaurant's cuisine, ignoring case. Blank
/// values disable their filter; both filters must pass.
pub fn filter_restaurants<'a>(
    restaurants: &'a [Restaurant],
    search: Option<&str>,
    cuisine: Option<&str>,
) -> Vec<&'a Restaurant> {
    let search = search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);
    let cuisine = cuisine
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_lowercase);

    restaurants
        .iter()
        .filter(|r| match &search {
            Some(term) => [&r.name, &r.location, &r.cuisine]
                .iter()
                .any(|field| field.to_lowercase().contains(term.as_str())),
            None => true,
        })
        .filter(|r| match &cuisine {
            Some(cuisine) => r.cuisine.trim().to_lowercase() == *cuisine,
            None => true,
        })
        .collect()
}

fn dedupe_by_id(restaurants: Vec<Restaurant>) -> Vec<Restaurant> {
    let mut seen = HashSet::new();
    restaurants
        .into_iter()
        .filter(|r| {
            let fresh = seen.insert(r.id.clone());
            if !fresh {
                tracing::warn!(restaurant_id = %r.id, "Duplicate restaurant id in listing, keeping first");
            }
            fresh
        })
        .collect()
}
