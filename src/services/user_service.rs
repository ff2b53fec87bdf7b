use std::sync::Arc;

use crate::database::user_store::{StoreError, UserStore};
use crate::dto::user_dto::{CreateUserPayload, UpdateUserPayload};
use crate::error::{Error, Result};
use crate::models::user::User;

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        Ok(self.store.list().await?)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<User> {
        self.store.get(id).await?.ok_or_else(user_not_found)
    }

    pub async fn create(&self, payload: CreateUserPayload) -> Result<User> {
        let user = self.store.insert(payload).await.map_err(|e| {
            if let StoreError::UniqueViolation(field) = &e {
                tracing::warn!(field = ?field, "user create rejected by unique constraint");
            }
            Error::from(e)
        })?;
        tracing::info!(user_id = user.id, "user created");
        Ok(user)
    }

    pub async fn update(&self, id: i64, changes: UpdateUserPayload) -> Result<User> {
        let updated = self
            .store
            .update(id, changes)
            .await
            .map_err(|e| match e {
                StoreError::UniqueViolation(field) => {
                    tracing::warn!(user_id = id, field = ?field, "user update rejected by unique constraint");
                    let message = field
                        .map(|f| f.conflict_message())
                        .unwrap_or("Update failed");
                    Error::Conflict(message.to_string())
                }
                other => Error::from(other),
            })?;
        let user = updated.ok_or_else(user_not_found)?;
        tracing::info!(user_id = user.id, "user updated");
        Ok(user)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        if !self.store.delete(id).await? {
            return Err(user_not_found());
        }
        tracing::info!(user_id = id, "user deleted");
        Ok(())
    }
}

fn user_not_found() -> Error {
    Error::NotFound("User not found".to_string())
}
