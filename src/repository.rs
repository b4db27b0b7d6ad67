use crate::models::{
    APPLICATION_MESSAGE_PREFIX, ApplyOutcome, Competition, CompetitionListing, CompetitionUpdate,
    NewCompetition, PrintRow, ScoreboardRow, User,
};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::{str::FromStr, sync::Arc, time::Duration};

/// Repository Trait
///
/// Persistence contract for the competitions feature. Handlers only see this trait, which lets the
/// handler tests swap in an in-memory mock.
///
/// Mutations return the number of affected rows; the handlers decide what a count other than one
/// means for their flow.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Competitions ---
    // All competitions with their author's name, earliest deadline first.
    async fn list_competitions(&self) -> Result<Vec<CompetitionListing>, sqlx::Error>;
    async fn get_competition(&self, id: i64) -> Result<Option<Competition>, sqlx::Error>;
    async fn create_competition(&self, req: &NewCompetition, author_id: i64) -> Result<u64, sqlx::Error>;
    async fn update_competition(&self, req: &CompetitionUpdate) -> Result<u64, sqlx::Error>;
    /// Deletes the competition together with its applications. Returns the number of
    /// competition rows removed; nothing is removed unless that number is exactly one.
    async fn delete_competition(&self, id: i64) -> Result<u64, sqlx::Error>;

    // --- Applications ---
    async fn apply(&self, user_id: i64, competition_id: i64) -> Result<ApplyOutcome, sqlx::Error>;
    // Ascending by score.
    async fn scoreboard(&self, competition_id: i64) -> Result<Vec<ScoreboardRow>, sqlx::Error>;
    // Descending by score.
    async fn print_layout(&self, competition_id: i64) -> Result<Vec<PrintRow>, sqlx::Error>;
    async fn update_score(&self, application_id: i64, score: Option<f64>) -> Result<u64, sqlx::Error>;

    // --- User/Auth ---
    async fn get_user(&self, id: i64) -> Result<Option<User>, sqlx::Error>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// SqliteRepository
///
/// `Repository` backed by an SQLite connection pool.
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Creates a new repository instance using an initialized connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

// Deferred transactions that read before writing fail with SQLITE_BUSY instead of waiting when
// another writer got there first.
const BEGIN_WRITE: &str = "BEGIN IMMEDIATE";

/// How long a connection waits for the write lock before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// connect
///
/// Opens the pool (creating the database file if needed) and applies the embedded migrations.
///
/// An in-memory database lives exactly as long as its connection, so it gets a single
/// connection that is never recycled.
pub async fn connect(db_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(db_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = if db_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?
    } else {
        SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?
    };

    sqlx::migrate!("./migrations").run(&pool).await?;
    Ok(pool)
}

#[async_trait]
impl Repository for SqliteRepository {
    async fn list_competitions(&self) -> Result<Vec<CompetitionListing>, sqlx::Error> {
        sqlx::query_as::<_, CompetitionListing>(
            r#"
            SELECT c.id, c.name, c.description, u.name AS author, c.apply_till
            FROM competitions c
            JOIN users u ON c.author_id = u.id
            ORDER BY c.apply_till
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn get_competition(&self, id: i64) -> Result<Option<Competition>, sqlx::Error> {
        sqlx::query_as::<_, Competition>(
            "SELECT id, name, description, author_id, apply_till FROM competitions WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn create_competition(&self, req: &NewCompetition, author_id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO competitions (name, description, author_id, apply_till) VALUES (?, ?, ?, ?)",
        )
        .bind(&req.name)
        .bind(&req.description)
        .bind(author_id)
        .bind(req.apply_till)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn update_competition(&self, req: &CompetitionUpdate) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE competitions SET name = ?, description = ?, apply_till = ? WHERE id = ?",
        )
        .bind(&req.name)
        .bind(&req.description)
        .bind(req.apply_till)
        .bind(req.id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// delete_competition
    ///
    /// Children first, then the parent, in one transaction. The transaction is only committed when
    /// exactly one competition row went away; dropping `tx` on any other path rolls it back.
    async fn delete_competition(&self, id: i64) -> Result<u64, sqlx::Error> {
        let mut tx = self.pool.begin_with(BEGIN_WRITE).await?;

        let applications = sqlx::query("DELETE FROM applications WHERE competition_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let deleted = sqlx::query("DELETE FROM competitions WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 1 {
            tx.commit().await?;
            tracing::debug!(competition_id = id, applications, "competition deleted");
        } else {
            tx.rollback().await?;
        }

        Ok(deleted)
    }

    /// apply
    ///
    /// Check-then-insert inside one write transaction. `BEGIN IMMEDIATE` takes the write lock up
    /// front, so concurrent applies queue on the busy timeout and the later ones see the earlier
    /// row. The unique index on (user_id, competition_id) still backs the check: a conflicting
    /// insert is reported as `AlreadyApplied`.
    ///
    /// The inbox row is addressed to the applicant, not to the competition's author.
    async fn apply(&self, user_id: i64, competition_id: i64) -> Result<ApplyOutcome, sqlx::Error> {
        let mut tx = self.pool.begin_with(BEGIN_WRITE).await?;

        let existing: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM applications WHERE user_id = ? AND competition_id = ?",
        )
        .bind(user_id)
        .bind(competition_id)
        .fetch_optional(&mut *tx)
        .await?;

        if existing.is_some() {
            return Ok(ApplyOutcome::AlreadyApplied);
        }

        let name: Option<String> = sqlx::query_scalar("SELECT name FROM competitions WHERE id = ?")
            .bind(competition_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(name) = name else {
            return Ok(ApplyOutcome::UnknownCompetition);
        };

        let inserted = match sqlx::query(
            "INSERT INTO applications (user_id, competition_id, applied_at) VALUES (?, ?, ?)",
        )
        .bind(user_id)
        .bind(competition_id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        {
            Ok(result) => result.rows_affected(),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                return Ok(ApplyOutcome::AlreadyApplied);
            }
            Err(e) => return Err(e),
        };

        sqlx::query("INSERT INTO inbox (author_id, message, competition_id) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(format!("{APPLICATION_MESSAGE_PREFIX}{name}"))
            .bind(competition_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        if inserted == 1 {
            Ok(ApplyOutcome::Applied)
        } else {
            Ok(ApplyOutcome::NotRecorded)
        }
    }

    async fn scoreboard(&self, competition_id: i64) -> Result<Vec<ScoreboardRow>, sqlx::Error> {
        sqlx::query_as::<_, ScoreboardRow>(
            r#"
            SELECT a.id, u.name AS contestant, a.applied_at, a.score,
                   c.name AS competition, a.competition_id
            FROM applications a
            JOIN users u ON a.user_id = u.id
            JOIN competitions c ON a.competition_id = c.id
            WHERE c.id = ?
            ORDER BY a.score
            "#,
        )
        .bind(competition_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn print_layout(&self, competition_id: i64) -> Result<Vec<PrintRow>, sqlx::Error> {
        sqlx::query_as::<_, PrintRow>(
            r#"
            SELECT a.id, u.name AS contestant, c.apply_till, a.score,
                   c.name AS competition, a.competition_id
            FROM applications a
            JOIN users u ON a.user_id = u.id
            JOIN competitions c ON a.competition_id = c.id
            WHERE c.id = ?
            ORDER BY a.score DESC
            "#,
        )
        .bind(competition_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn update_score(&self, application_id: i64, score: Option<f64>) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE applications SET score = ? WHERE id = ?")
            .bind(score)
            .bind(application_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT id, name, email, role FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }
}
