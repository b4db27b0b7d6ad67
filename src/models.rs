use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// --- Core Application Schemas (Mapped to Database) ---

/// User
///
/// Identity record from the `users` table. Provisioned externally; this service only reads it
/// to resolve the caller's name and role.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Default)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    // 'admin' unlocks the admin routes; anything else is a regular user.
    pub role: String,
}

pub const ADMIN_ROLE: &str = "admin";

/// Competition
///
/// A full row of the `competitions` table, as shown in the edit form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Competition {
    pub id: i64,
    pub name: String,
    pub description: String,
    // FK to users.id (creator).
    pub author_id: i64,
    pub apply_till: NaiveDate,
}

/// CompetitionListing
///
/// A competition joined with its author's display name, for the index page.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CompetitionListing {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub author: String,
    pub apply_till: NaiveDate,
}

/// Application
///
/// A user's entry into a competition. `score` stays empty until a judge records it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Application {
    pub id: i64,
    pub user_id: i64,
    pub competition_id: i64,
    pub applied_at: DateTime<Utc>,
    pub score: Option<f64>,
}

/// InboxMessage
///
/// Notification row written as a side effect of applying.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InboxMessage {
    pub id: i64,
    pub author_id: i64,
    pub message: String,
    pub competition_id: Option<i64>,
}

/// ScoreboardRow
///
/// One application on the scoreboard (users ⋈ applications ⋈ competitions).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScoreboardRow {
    // Application id; the target of the score update form.
    pub id: i64,
    pub contestant: String,
    pub applied_at: DateTime<Utc>,
    pub score: Option<f64>,
    pub competition: String,
    pub competition_id: i64,
}

/// PrintRow
///
/// Same join as the scoreboard, carrying the application deadline instead of the
/// application time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PrintRow {
    pub id: i64,
    pub contestant: String,
    pub apply_till: NaiveDate,
    pub score: Option<f64>,
    pub competition: String,
    pub competition_id: i64,
}

// --- Validated Commands (Input to the Repository) ---

/// NewCompetition
///
/// A validated add-form submission. The author is taken from the session, never the body.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCompetition {
    pub name: String,
    pub description: String,
    pub apply_till: NaiveDate,
}

/// CompetitionUpdate
///
/// A validated edit-form submission.
#[derive(Debug, Clone, PartialEq)]
pub struct CompetitionUpdate {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub apply_till: NaiveDate,
}

/// ApplyOutcome
///
/// Result of the apply workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    AlreadyApplied,
    // The application insert affected an unexpected number of rows.
    NotRecorded,
    // No competition with the requested id.
    UnknownCompetition,
}

/// Prefix of the inbox message written when somebody applies.
pub const APPLICATION_MESSAGE_PREFIX: &str = "Nova prijava na natjecanje: ";
