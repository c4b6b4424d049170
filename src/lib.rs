pub mod access;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod query;
pub mod rest;
pub mod store;

use sqlx::sqlite::SqlitePool;

use crate::{auth::TokenService, store::CredentialStore};

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub users: CredentialStore,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(db: SqlitePool, tokens: TokenService) -> Self {
        AppState {
            users: CredentialStore::new(db.clone()),
            db,
            tokens,
        }
    }
}
