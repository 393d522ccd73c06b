//! Statistics service

use std::{sync::Arc, time::Duration};

use crate::{
    error::AppResult,
    models::{ReportDocument, StatEvent, TopStatsQuery},
    repository::Store,
};

use super::{bounded, report};

#[derive(Clone)]
pub struct StatsService {
    store: Arc<dyn Store>,
    timeout: Duration,
}

impl StatsService {
    pub fn new(store: Arc<dyn Store>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Count one event
    pub async fn record(&self, event: &StatEvent) -> AppResult<()> {
        bounded(self.timeout, "record_stat", self.store.record_stat(event)).await
    }

    /// Top users per date for the requested window, grouped by date
    pub async fn top(&self, query: &TopStatsQuery) -> AppResult<ReportDocument> {
        let rows = bounded(self.timeout, "query_top_stats", self.store.query_top_stats(query)).await?;
        tracing::debug!(rows = rows.len(), action = %query.action, "Top stats fetched");
        Ok(report::build_report(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{Action, ReportRow, Sex},
        repository::MockStore,
    };
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn test_top_groups_store_rows() {
        let mut store = MockStore::new();
        store
            .expect_query_top_stats()
            .withf(|q| q.action == Action::Like && q.limit == 2)
            .times(1)
            .returning(|_| {
                Ok(vec![
                    ReportRow {
                        date: date("2012-02-02"),
                        user_id: "2".into(),
                        age: 18,
                        sex: Sex::Male,
                        count: 3,
                    },
                    ReportRow {
                        date: date("2012-01-15"),
                        user_id: "5".into(),
                        age: 40,
                        sex: Sex::Female,
                        count: 1,
                    },
                ])
            });

        let service = StatsService::new(Arc::new(store), Duration::from_secs(1));
        let query = TopStatsQuery {
            date_from: date("2012-01-01"),
            date_to: date("2012-03-01"),
            action: Action::Like,
            limit: 2,
        };

        let report = service.top(&query).await.unwrap();
        assert_eq!(report.items.len(), 2);
        assert_eq!(report.items[0].date, "2012-01-15");
        assert_eq!(report.items[1].rows[0].user_id, "2");
    }

    #[tokio::test]
    async fn test_record_propagates_store_error() {
        let mut store = MockStore::new();
        store
            .expect_record_stat()
            .times(1)
            .returning(|_| Err(sqlx::Error::PoolClosed.into()));

        let service = StatsService::new(Arc::new(store), Duration::from_secs(1));
        let event = StatEvent {
            user: "2".into(),
            action: Action::Logout,
            date: date("2012-02-02"),
        };

        assert!(service.record(&event).await.is_err());
    }
}
