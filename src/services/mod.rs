//! Business logic services

pub mod report;
pub mod stats;
pub mod users;

use std::{future::Future, sync::Arc, time::Duration};

use crate::{
    error::{AppError, AppResult},
    repository::Store,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub stats: stats::StatsService,
    store: Arc<dyn Store>,
    timeout: Duration,
}

impl Services {
    /// Create all services over the given store. Every store call made by a
    /// service fails once it runs longer than `timeout`.
    pub fn new(store: Arc<dyn Store>, timeout: Duration) -> Self {
        Self {
            users: users::UsersService::new(store.clone(), timeout),
            stats: stats::StatsService::new(store.clone(), timeout),
            store,
            timeout,
        }
    }

    /// Check that the store answers
    pub async fn ping(&self) -> AppResult<()> {
        bounded(self.timeout, "ping", self.store.ping()).await
    }

    /// Release the store connections
    pub async fn shutdown(&self) {
        self.store.close().await;
    }
}

/// Await a store call, turning an overrun of `limit` into an error
pub(crate) async fn bounded<T, F>(limit: Duration, op: &'static str, call: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(AppError::StoreTimeout(op)),
    }
}
