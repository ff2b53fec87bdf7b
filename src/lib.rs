pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::database::user_store::{PgUserStore, UserStore};
use crate::services::user_service::UserService;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self::with_store(Arc::new(PgUserStore::new(pool)))
    }

    pub fn with_store(store: Arc<dyn UserStore>) -> Self {
        Self {
            user_service: UserService::new(store),
        }
    }
}
