//! Application context - dependency injection container

use std::path::PathBuf;
use std::sync::Arc;

use spendview_common::auth::{SessionClaims, SessionTokenCodec};
use spendview_core::{CacheStore, DashboardService, ExpenseDataSource, SnapshotCache};
use spendview_domain::{Config, ProviderEnvironment, Result};
use spendview_infra::{FileCacheStore, MemoryCacheStore, OAuthFlow, RampDataSource};
use tracing::{info, warn};

/// Application context - holds all services and dependencies
///
/// Pieces that depend on optional configuration are kept as `Result`s so the
/// server can start without them and report the problem per request.
pub struct AppContext {
    pub config: Config,
    pub environment: ProviderEnvironment,
    dashboard: Result<Arc<DashboardService>>,
    oauth: Result<Arc<OAuthFlow>>,
    sessions: Option<SessionTokenCodec>,
}

impl AppContext {
    /// Wire the production adapters from configuration.
    pub fn from_config(config: Config) -> Self {
        let source = RampDataSource::from_config(&config.provider)
            .map(|source| Arc::new(source) as Arc<dyn ExpenseDataSource>);
        let store: Arc<dyn CacheStore> = match &config.cache.path {
            Some(path) => {
                info!(path = %path, "using file snapshot cache");
                Arc::new(FileCacheStore::new(PathBuf::from(path)))
            }
            None => Arc::new(MemoryCacheStore::new()),
        };
        Self::with_source(config, source, store)
    }

    /// Wire the context around an explicit data source and cache store.
    pub fn with_source(
        config: Config,
        source: Result<Arc<dyn ExpenseDataSource>>,
        store: Arc<dyn CacheStore>,
    ) -> Self {
        let cache = SnapshotCache::new(store)
            .with_max_age(chrono::Duration::hours(config.cache.max_age_hours.max(0)));
        let dashboard = source.map(|source| Arc::new(DashboardService::new(source, cache)));
        if let Err(err) = &dashboard {
            warn!(error = %err, "expense provider unavailable; data endpoints will report it");
        }

        let oauth = OAuthFlow::from_config(&config).map(Arc::new);
        if let Err(err) = &oauth {
            warn!(error = %err, "sign-in unavailable");
        }

        let sessions = config
            .session
            .secret
            .as_deref()
            .filter(|secret| !secret.is_empty())
            .and_then(|secret| SessionTokenCodec::new(secret, config.session.ttl_seconds).ok());

        Self { environment: config.provider.environment, config, dashboard, oauth, sessions }
    }

    /// # Errors
    /// The configuration error captured at startup.
    pub fn dashboard(&self) -> Result<&Arc<DashboardService>> {
        self.dashboard.as_ref().map_err(Clone::clone)
    }

    /// # Errors
    /// The configuration error captured at startup.
    pub fn oauth(&self) -> Result<&Arc<OAuthFlow>> {
        self.oauth.as_ref().map_err(Clone::clone)
    }

    /// Claims of a valid session token; `None` for anything else.
    pub fn session(&self, token: &str) -> Option<SessionClaims> {
        self.sessions.as_ref()?.verify(token).ok()
    }

    pub fn session_ttl_seconds(&self) -> i64 {
        self.config.session.ttl_seconds
    }
}
