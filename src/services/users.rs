//! User registration service

use std::{sync::Arc, time::Duration};

use crate::{error::AppResult, models::User, repository::Store};

use super::bounded;

#[derive(Clone)]
pub struct UsersService {
    store: Arc<dyn Store>,
    timeout: Duration,
}

impl UsersService {
    pub fn new(store: Arc<dyn Store>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Register a user. Registering an existing id again succeeds without
    /// changing the stored record.
    pub async fn register(&self, user: &User) -> AppResult<()> {
        let created = bounded(self.timeout, "create_user", self.store.create_user(user)).await?;
        if created {
            tracing::info!(user_id = %user.id, "User registered");
        } else {
            tracing::debug!(user_id = %user.id, "User already registered");
        }
        Ok(())
    }
}
