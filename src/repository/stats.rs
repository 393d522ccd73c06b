//! Stat counters repository

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{ReportRow, StatEvent, TopStatsQuery},
};

#[derive(Clone)]
pub struct StatsRepository {
    pool: Pool<Postgres>,
}

impl StatsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Upsert-increment the counter of `(user, action, date)`.
    ///
    /// The increment happens inside the statement so concurrent submissions
    /// for the same key never lose an update.
    pub async fn record(&self, event: &StatEvent) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO stats ("user", action, date)
            VALUES ($1, $2, $3)
            ON CONFLICT ON CONSTRAINT user_time_uniq
            DO UPDATE SET cnt = stats.cnt + 1
            "#,
        )
        .bind(&event.user)
        .bind(event.action.as_str())
        .bind(event.date)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// For each date of `[date_from, date_to)`, the `limit` users with the
    /// highest counter for the action. Equal counters rank by user id.
    pub async fn top_by_date(&self, query: &TopStatsQuery) -> AppResult<Vec<ReportRow>> {
        let rows = sqlx::query_as::<_, ReportRow>(
            r#"
            SELECT date, user_id, age, sex, count
            FROM (
                SELECT s.date,
                       u.id AS user_id,
                       u.age,
                       u.sex::text AS sex,
                       s.cnt AS count,
                       row_number() OVER (
                           PARTITION BY s.date
                           ORDER BY s.cnt DESC, u.id ASC
                       ) AS rank_in_day
                FROM stats s
                JOIN users u ON u.id = s."user"
                WHERE s.date >= $1
                  AND s.date < $2
                  AND s.action = $3
            ) ranked
            WHERE rank_in_day <= $4
            ORDER BY date, count DESC, user_id
            "#,
        )
        .bind(query.date_from)
        .bind(query.date_to)
        .bind(query.action.as_str())
        .bind(query.limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
