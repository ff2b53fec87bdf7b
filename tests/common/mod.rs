#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::Value as JsonValue;
use tower::ServiceExt;
use userservice::{
    database::user_store::{StoreError, StoreResult, UniqueField, UserStore},
    dto::user_dto::{CreateUserPayload, UpdateUserPayload},
    models::user::User,
    AppState,
};

#[derive(Default)]
struct Table {
    next_id: i64,
    rows: BTreeMap<i64, User>,
}

impl Table {
    fn check_unique(&self, id: Option<i64>, email: &str, username: &str) -> StoreResult<()> {
        let others: Vec<&User> = self.rows.values().filter(|u| Some(u.id) != id).collect();
        if others.iter().any(|u| u.email == email) {
            return Err(StoreError::UniqueViolation(Some(UniqueField::Email)));
        }
        if others.iter().any(|u| u.username == username) {
            return Err(StoreError::UniqueViolation(Some(UniqueField::Username)));
        }
        Ok(())
    }
}

/// Single-table stand-in for PostgreSQL with the same unique keys.
#[derive(Default, Clone)]
pub struct MemoryUserStore {
    table: Arc<Mutex<Table>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn list(&self) -> StoreResult<Vec<User>> {
        let table = self.table.lock().unwrap();
        Ok(table.rows.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(self.table.lock().unwrap().rows.get(&id).cloned())
    }

    async fn insert(&self, payload: CreateUserPayload) -> StoreResult<User> {
        let mut table = self.table.lock().unwrap();
        table.check_unique(None, &payload.email, &payload.username)?;
        table.next_id += 1;
        let now = Utc::now();
        let user = User {
            id: table.next_id,
            email: payload.email,
            username: payload.username,
            first_name: payload.first_name,
            last_name: payload.last_name,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: i64, changes: UpdateUserPayload) -> StoreResult<Option<User>> {
        let mut table = self.table.lock().unwrap();
        let Some(mut user) = table.rows.get(&id).cloned() else {
            return Ok(None);
        };
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(username) = changes.username {
            user.username = username;
        }
        if let Some(first_name) = changes.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            user.last_name = last_name;
        }
        if let Some(is_active) = changes.is_active {
            user.is_active = is_active;
        }
        table.check_unique(Some(id), &user.email, &user.username)?;
        user.updated_at = Utc::now();
        table.rows.insert(id, user.clone());
        Ok(Some(user))
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        Ok(self.table.lock().unwrap().rows.remove(&id).is_some())
    }
}

pub fn setup_app() -> Router {
    let store = Arc::new(MemoryUserStore::default());
    userservice::routes::router(AppState::with_store(store))
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<&str>,
) -> (StatusCode, JsonValue) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(raw) => {
            req = req.header("content-type", "application/json");
            Body::from(raw.to_string())
        }
        None => Body::empty(),
    };
    let resp = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let body = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub async fn create_user(app: &Router, email: &str, username: &str) -> JsonValue {
    let body = serde_json::json!({ "email": email, "username": username }).to_string();
    let (status, user) = send(app, "POST", "/users/", Some(&body)).await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {user}");
    user
}
