#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use chrono::NaiveDate;
use competitions_portal::{
    AppConfig, AppState, Views, create_router,
    models::NewCompetition,
    repository::{self, Repository, RepositoryState, SqliteRepository},
};
use sqlx::SqlitePool;
use std::{path::Path, sync::Arc};
use tower::ServiceExt;

pub const ADMIN_ID: i64 = 1;
pub const ANA_ID: i64 = 2;
pub const BORNA_ID: i64 = 3;

/// In-memory database with migrations applied and three users seeded:
/// an admin and two regular users.
pub async fn test_pool() -> SqlitePool {
    let pool = repository::connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    seed_users(&pool).await;
    pool
}

/// Database file inside `dir`, seeded like `test_pool`. Unlike the in-memory pool it has
/// several connections, so concurrent writers really contend for the lock.
pub async fn file_pool(dir: &Path) -> SqlitePool {
    let url = format!("sqlite://{}", dir.join("competitions.db").display());
    let pool = repository::connect(&url)
        .await
        .expect("Failed to open database file");
    seed_users(&pool).await;
    pool
}

async fn seed_users(pool: &SqlitePool) {
    for (id, name, role) in [
        (ADMIN_ID, "Admin", "admin"),
        (ANA_ID, "Ana", "user"),
        (BORNA_ID, "Borna", "user"),
    ] {
        sqlx::query("INSERT INTO users (id, name, email, role) VALUES (?, ?, ?, ?)")
            .bind(id)
            .bind(name)
            .bind(format!("{}@example.com", name.to_lowercase()))
            .bind(role)
            .execute(pool)
            .await
            .expect("Failed to seed user");
    }
}

pub fn state_for(repo: RepositoryState) -> AppState {
    AppState {
        repo,
        views: Arc::new(Views::new().expect("templates")),
        config: AppConfig::default(),
    }
}

pub struct TestContext {
    pub pool: SqlitePool,
    pub repo: Arc<SqliteRepository>,
    pub app: Router,
}

pub async fn setup() -> TestContext {
    let pool = test_pool().await;
    let repo = Arc::new(SqliteRepository::new(pool.clone()));
    let app = create_router(state_for(repo.clone()));
    TestContext { pool, repo, app }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Inserts a competition authored by the admin and returns its id.
pub async fn create_competition(ctx: &TestContext, name: &str, apply_till: NaiveDate) -> i64 {
    let new = NewCompetition {
        name: name.to_string(),
        description: format!("{name} description"),
        apply_till,
    };
    ctx.repo.create_competition(&new, ADMIN_ID).await.unwrap();
    sqlx::query_scalar("SELECT id FROM competitions WHERE name = ?")
        .bind(name)
        .fetch_one(&ctx.pool)
        .await
        .unwrap()
}

pub async fn count(pool: &SqlitePool, sql: &str) -> i64 {
    sqlx::query_scalar(sql).fetch_one(pool).await.unwrap()
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers.get(header::LOCATION).and_then(|v| v.to_str().ok())
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    TestResponse {
        status,
        headers,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

pub fn get(uri: &str, user_id: Option<i64>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(id) = user_id {
        builder = builder.header("x-user-id", id.to_string());
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, user_id: Option<i64>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(id) = user_id {
        builder = builder.header("x-user-id", id.to_string());
    }
    builder.body(Body::from(body.to_string())).unwrap()
}
