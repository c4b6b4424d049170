use sqlx::SqlitePool;
use tokio::sync::OnceCell;

use crate::{
    auth::password::{hash_password, verify_password},
    error::StoreError,
    models::user::User,
};

pub const ADMIN_USERNAME: &str = "admin";

/// Verified against when the username is unknown, so both failure paths
/// pay for one Argon2 run.
static DUMMY_HASH: OnceCell<String> = OnceCell::const_new();

async fn dummy_hash() -> Result<&'static str, StoreError> {
    let hash = DUMMY_HASH
        .get_or_try_init(|| async { hash_password("unknown-user-placeholder") })
        .await?;
    Ok(hash.as_str())
}

/// Owns the `users` table. Uniqueness is left to the UNIQUE constraint so
/// concurrent registrations of one name cannot both succeed.
#[derive(Clone)]
pub struct CredentialStore {
    db: SqlitePool,
}

impl CredentialStore {
    pub fn new(db: SqlitePool) -> Self {
        CredentialStore { db }
    }

    pub async fn create_user(&self, username: &str, password: &str) -> Result<i64, StoreError> {
        let password_hash = hash_password(password)?;

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO users (username, password_hash) VALUES (?, ?) RETURNING id",
        )
        .bind(username)
        .bind(&password_hash)
        .fetch_one(&self.db)
        .await?;

        Ok(id)
    }

    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;

        let Some(user) = user else {
            verify_password(password, dummy_hash().await?)?;
            return Err(StoreError::NotFound);
        };

        if !verify_password(password, &user.password_hash)? {
            return Err(StoreError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Creates the `admin` account unless it already exists. Returns whether
    /// a row was inserted.
    pub async fn ensure_admin(&self, password: &str) -> Result<bool, StoreError> {
        let password_hash = hash_password(password)?;

        let result = sqlx::query(
            "INSERT INTO users (username, password_hash) VALUES (?, ?) ON CONFLICT(username) DO NOTHING",
        )
        .bind(ADMIN_USERNAME)
        .bind(&password_hash)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn create_then_verify() {
        let store = CredentialStore::new(test_pool().await);
        let id = store.create_user("alice", "s3cret").await.unwrap();

        let user = store.verify_credentials("alice", "s3cret").await.unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.username, "alice");
        assert_ne!(user.password_hash, "s3cret");
    }

    #[tokio::test]
    async fn duplicate_username_is_already_exists() {
        let store = CredentialStore::new(test_pool().await);
        store.create_user("alice", "one").await.unwrap();

        let err = store.create_user("alice", "two").await.unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_registration_has_one_winner() {
        const RACERS: usize = 8;

        let path = std::env::temp_dir().join(format!(
            "catalog-auth-race-{}-{}.db",
            std::process::id(),
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        let url = format!("sqlite://{}", path.display());
        let pool = crate::db::connect(&url, 4).await.unwrap();
        let store = CredentialStore::new(pool.clone());

        let handles: Vec<_> = (0..RACERS)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.create_user("bob", &format!("pw-{i}")).await })
            })
            .collect();

        let mut won = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => won += 1,
                Err(StoreError::AlreadyExists) => conflicts += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        pool.close().await;
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
        }

        assert_eq!((won, conflicts), (1, RACERS - 1));
    }

    #[tokio::test]
    async fn unknown_user_still_runs_verification() {
        let store = CredentialStore::new(test_pool().await);
        store.create_user("carol", "right").await.unwrap();

        // The placeholder hash must parse, or the unknown-user path would
        // fail fast with a hashing error instead of verifying.
        let hash = dummy_hash().await.unwrap();
        assert!(!verify_password("right", hash).unwrap());

        let started = std::time::Instant::now();
        for _ in 0..3 {
            let err = store.verify_credentials("carol", "wrong").await.unwrap_err();
            assert!(matches!(err, StoreError::InvalidCredentials));
        }
        let wrong_password = started.elapsed();

        let started = std::time::Instant::now();
        for _ in 0..3 {
            let err = store.verify_credentials("nobody", "wrong").await.unwrap_err();
            assert!(matches!(err, StoreError::NotFound));
        }
        let unknown_user = started.elapsed();

        assert!(
            unknown_user * 4 >= wrong_password,
            "unknown user {unknown_user:?} vs wrong password {wrong_password:?}"
        );
    }

    #[tokio::test]
    async fn usernames_are_case_sensitive() {
        let store = CredentialStore::new(test_pool().await);
        store.create_user("Alice", "pw").await.unwrap();
        store.create_user("alice", "pw").await.unwrap();

        let err = store.verify_credentials("ALICE", "pw").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user() {
        let store = CredentialStore::new(test_pool().await);
        store.create_user("carol", "right").await.unwrap();

        let wrong = store.verify_credentials("carol", "wrong").await.unwrap_err();
        assert!(matches!(wrong, StoreError::InvalidCredentials));

        let missing = store.verify_credentials("dave", "right").await.unwrap_err();
        assert!(matches!(missing, StoreError::NotFound));
    }

    #[tokio::test]
    async fn empty_password_is_accepted() {
        let store = CredentialStore::new(test_pool().await);
        store.create_user("eve", "").await.unwrap();
        assert!(store.verify_credentials("eve", "").await.is_ok());
    }

    #[tokio::test]
    async fn ensure_admin_is_idempotent() {
        let store = CredentialStore::new(test_pool().await);
        assert!(store.ensure_admin("first-pass").await.unwrap());
        assert!(!store.ensure_admin("second-pass").await.unwrap());

        // The original password is kept.
        store
            .verify_credentials(ADMIN_USERNAME, "first-pass")
            .await
            .unwrap();
        assert!(store
            .verify_credentials(ADMIN_USERNAME, "second-pass")
            .await
            .is_err());
    }
}
