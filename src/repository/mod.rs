//! Repository layer for database operations

pub mod stats;
pub mod users;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{ReportRow, StatEvent, TopStatsQuery, User},
};

/// Storage operations needed by the services.
///
/// Implementations must be safe to share between concurrently running
/// requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert a user. Returns `false` when the id already existed, which is not an error.
    async fn create_user(&self, user: &User) -> AppResult<bool>;

    /// Add one to the `(user, action, date)` counter, creating it at 1 if absent
    async fn record_stat(&self, event: &StatEvent) -> AppResult<()>;

    /// Top users per date for one action, ordered by date then rank
    async fn query_top_stats(&self, query: &TopStatsQuery) -> AppResult<Vec<ReportRow>>;

    /// Round-trip to the database
    async fn ping(&self) -> AppResult<()>;

    /// Close the underlying connections
    async fn close(&self);
}

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub users: users::UsersRepository,
    pub stats: stats::StatsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: users::UsersRepository::new(pool.clone()),
            stats: stats::StatsRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl Store for Repository {
    async fn create_user(&self, user: &User) -> AppResult<bool> {
        self.users.create(user).await
    }

    async fn record_stat(&self, event: &StatEvent) -> AppResult<()> {
        self.stats.record(event).await
    }

    async fn query_top_stats(&self, query: &TopStatsQuery) -> AppResult<Vec<ReportRow>> {
        self.stats.top_by_date(query).await
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
