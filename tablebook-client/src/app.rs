//! BookingApp - 客户端门面
//!
//! Wires one session manager and one catalog cache over a shared service
//! client, and hands out routers and per-restaurant workflows.

use std::sync::Arc;

use crate::catalog::CatalogCache;
use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::http::ReservationApi;
use crate::router::{AccessRouter, RootArea, route};
use crate::session::{SessionManager, SessionStore};
use crate::storage::KeyValueStore;
use crate::workflow::ReservationWorkflow;

pub struct BookingApp {
    /// 远程服务客户端
    api: Arc<dyn ReservationApi>,
    /// 会话 (唯一写入者)
    session: SessionManager,
    /// 餐厅列表缓存
    catalog: CatalogCache,
}

impl BookingApp {
    /// Builds the network client and file store described by `config`.
    ///
    /// Must be called inside a tokio runtime.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let api = Arc::new(config.build_http_client()?);
        let store = Arc::new(config.build_store());
        tracing::debug!(base_url = %config.base_url, data_dir = %config.data_dir.display(), "Booking app configured");
        Ok(Self::with_parts(api, store))
    }

    pub fn with_parts(api: Arc<dyn ReservationApi>, store: Arc<dyn KeyValueStore>) -> Self {
        let session = SessionManager::new(api.clone(), SessionStore::new(store));
        let catalog = CatalogCache::new(api.clone());
        Self {
            api,
            session,
            catalog,
        }
    }

    /// Restores the persisted session and returns the initial root area.
    pub async fn start(&self) -> RootArea {
        let session = self.session.rehydrate().await;
        let area = route(&session);
        tracing::info!(?area, "Booking app started");
        area
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn catalog(&self) -> &CatalogCache {
        &self.catalog
    }

    pub fn router(&self) -> AccessRouter {
        AccessRouter::new(self.session.subscribe())
    }

    /// Starts a reservation workflow for one restaurant's detail view.
    pub async fn open_restaurant(&self, restaurant_id: &str) -> ClientResult<ReservationWorkflow> {
        ReservationWorkflow::open(
            self.api.clone(),
            self.session.subscribe(),
            &self.catalog,
            restaurant_id,
        )
        .await
    }
}

impl std::fmt::Debug for BookingApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingApp")
            .field("session", &self.session)
            .field("catalog", &self.catalog)
            .finish()
    }
}
