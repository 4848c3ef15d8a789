pub mod models;
pub mod schema;

use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use eduscreen_shared::domain::Score;
use models::{ActivityResult, Adult, Child, NewActivityResult, NewAdult, NewChild};

/// Structured error type for all storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A Diesel ORM error (query failure, constraint violation, etc.)
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    /// Failed to acquire or build a connection from the pool.
    #[error("pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    /// A `spawn_blocking` task panicked or was cancelled.
    #[error("task error: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// A database migration failed to apply.
    #[error("migration error: {0}")]
    Migration(String),
}

impl StorageError {
    /// True when the underlying cause is a violated UNIQUE constraint.
    /// Handlers map this to a conflict response; signup's check-then-insert
    /// race and duplicate child names both end up here.
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _,
            ))
        )
    }
}

#[derive(Clone)]
pub struct Store {
    pool: Pool<ConnectionManager<SqliteConnection>>,
}

impl Store {
    pub async fn connect_sqlite(path: &str) -> Result<Self, StorageError> {
        let url = path.to_string();
        let manager = ConnectionManager::<SqliteConnection>::new(url);
        let pool = Pool::builder().max_size(8).build(manager)?;

        // Run pending Diesel migrations on startup (auto-init empty DBs)
        {
            let pool_clone = pool.clone();
            tokio::task::spawn_blocking(move || -> Result<(), StorageError> {
                const MIGRATIONS: EmbeddedMigrations = embed_migrations!();
                let mut conn = pool_clone.get()?;
                configure_sqlite_conn(&mut conn)?;
                conn.run_pending_migrations(MIGRATIONS)
                    .map_err(|e| StorageError::Migration(e.to_string()))?;
                Ok(())
            })
            .await??;
        }

        Ok(Store { pool })
    }

    pub async fn create_adult(
        &self,
        email: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<Adult, StorageError> {
        use schema::responsible_adult;
        let pool = self.pool.clone();
        let email_owned = email.to_string();
        let username_owned = username.to_string();
        let hash_owned = password_hash.to_string();
        tokio::task::spawn_blocking(move || -> Result<Adult, StorageError> {
            let mut conn = pool.get()?;
            configure_sqlite_conn(&mut conn)?;
            let new_adult = NewAdult {
                email: &email_owned,
                username: &username_owned,
                password_hash: &hash_owned,
            };
            Ok(diesel::insert_into(responsible_adult::table)
                .values(&new_adult)
                .returning(Adult::as_returning())
                .get_result::<Adult>(&mut conn)?)
        })
        .await?
    }

    pub async fn adult_by_email(&self, email: &str) -> Result<Option<Adult>, StorageError> {
        use schema::responsible_adult::dsl as ra;
        let pool = self.pool.clone();
        let email_owned = email.to_string();
        tokio::task::spawn_blocking(move || -> Result<Option<Adult>, StorageError> {
            let mut conn = pool.get()?;
            configure_sqlite_conn(&mut conn)?;
            Ok(ra::responsible_adult
                .filter(ra::email.eq(&email_owned))
                .select(Adult::as_select())
                .first::<Adult>(&mut conn)
                .optional()?)
        })
        .await?
    }

    pub async fn username_exists(&self, username: &str) -> Result<bool, StorageError> {
        use schema::responsible_adult::dsl as ra;
        let pool = self.pool.clone();
        let username_owned = username.to_string();
        tokio::task::spawn_blocking(move || -> Result<bool, StorageError> {
            let mut conn = pool.get()?;
            configure_sqlite_conn(&mut conn)?;
            let count: i64 = ra::responsible_adult
                .filter(ra::username.eq(&username_owned))
                .count()
                .get_result(&mut conn)?;
            Ok(count > 0)
        })
        .await?
    }

    pub async fn create_child(
        &self,
        adult_id: i32,
        child_name: &str,
        gender: &str,
        age: i32,
        grade: i32,
    ) -> Result<Child, StorageError> {
        use schema::child;
        let pool = self.pool.clone();
        let name_owned = child_name.to_string();
        let gender_owned = gender.to_string();
        tokio::task::spawn_blocking(move || -> Result<Child, StorageError> {
            let mut conn = pool.get()?;
            configure_sqlite_conn(&mut conn)?;
            let new_child = NewChild {
                adult_id,
                child_name: &name_owned,
                gender: &gender_owned,
                age,
                grade,
            };
            Ok(diesel::insert_into(child::table)
                .values(&new_child)
                .returning(Child::as_returning())
                .get_result::<Child>(&mut conn)?)
        })
        .await?
    }

    /// Looks a child up by display name alone; names are only unique per
    /// adult, so the first match wins.
    pub async fn child_by_name(&self, child_name: &str) -> Result<Option<Child>, StorageError> {
        use schema::child::dsl as ch;
        let pool = self.pool.clone();
        let name_owned = child_name.to_string();
        tokio::task::spawn_blocking(move || -> Result<Option<Child>, StorageError> {
            let mut conn = pool.get()?;
            configure_sqlite_conn(&mut conn)?;
            Ok(ch::child
                .filter(ch::child_name.eq(&name_owned))
                .select(Child::as_select())
                .first::<Child>(&mut conn)
                .optional()?)
        })
        .await?
    }

    pub async fn children_names_for_adult(
        &self,
        adult_id: i32,
    ) -> Result<Vec<String>, StorageError> {
        use schema::child::dsl as ch;
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<Vec<String>, StorageError> {
            let mut conn = pool.get()?;
            configure_sqlite_conn(&mut conn)?;
            Ok(ch::child
                .filter(ch::adult_id.eq(adult_id))
                .select(ch::child_name)
                .load::<String>(&mut conn)?)
        })
        .await?
    }

    /// Appends one graded attempt; history is kept, never overwritten.
    pub async fn insert_activity_result(
        &self,
        child_id: i32,
        activity_id: i32,
        given_answer: Option<&str>,
        score: Score,
        time_taken_seconds: Option<i32>,
    ) -> Result<(), StorageError> {
        use schema::activity_results;
        let pool = self.pool.clone();
        let given_owned = given_answer.map(|s| s.to_string());
        tokio::task::spawn_blocking(move || -> Result<(), StorageError> {
            let mut conn = pool.get()?;
            configure_sqlite_conn(&mut conn)?;
            let row = NewActivityResult {
                child_id,
                activity_id,
                given_answer: given_owned.as_deref(),
                is_correct: score.is_correct() as i32,
                score: score.as_i32(),
                is_completed: 1,
                time_taken_seconds,
            };
            diesel::insert_into(activity_results::table)
                .values(&row)
                .execute(&mut conn)?;
            Ok(())
        })
        .await?
    }

    pub async fn results_for_child(
        &self,
        child_id: i32,
    ) -> Result<Vec<ActivityResult>, StorageError> {
        use schema::activity_results::dsl as ar;
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<Vec<ActivityResult>, StorageError> {
            let mut conn = pool.get()?;
            configure_sqlite_conn(&mut conn)?;
            Ok(ar::activity_results
                .filter(ar::child_id.eq(child_id))
                .order(ar::activity_id.asc())
                .select(ActivityResult::as_select())
                .load::<ActivityResult>(&mut conn)?)
        })
        .await?
    }
}

fn configure_sqlite_conn(conn: &mut SqliteConnection) -> Result<(), diesel::result::Error> {
    // Enable WAL for better read/write concurrency, set a busy timeout, and
    // turn on foreign-key enforcement so deletes cascade adult -> child ->
    // activity_results.
    diesel::sql_query("PRAGMA journal_mode=WAL;").execute(conn)?;
    diesel::sql_query("PRAGMA synchronous=NORMAL;").execute(conn)?;
    diesel::sql_query("PRAGMA busy_timeout=5000;").execute(conn)?;
    diesel::sql_query("PRAGMA foreign_keys=ON;").execute(conn)?;
    Ok(())
}
