//! Users repository

use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::User};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert a user, leaving an existing row with the same id untouched.
    /// Returns whether a row was inserted.
    pub async fn create(&self, user: &User) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (id, age, sex)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(&user.id)
        .bind(user.age)
        .bind(user.sex.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
