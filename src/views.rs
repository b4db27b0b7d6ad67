use axum::{
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use minijinja::{Environment, context};
use serde::Serialize;

use crate::{
    error::AppResult,
    models::{Competition, CompetitionListing, PrintRow, ScoreboardRow},
};

pub const INDEX: &str = "competitions/index.html";
pub const FORM: &str = "competitions/form.html";
pub const SCORE: &str = "competitions/score.html";
pub const PRINT_LAYOUT: &str = "competitions/printLayout.html";

/// Views
///
/// Server-side renderer. Templates are compiled into the binary and parsed once at startup.
pub struct Views {
    env: Environment<'static>,
}

impl Views {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template("layout.html", include_str!("../templates/layout.html"))?;
        env.add_template(INDEX, include_str!("../templates/competitions/index.html"))?;
        env.add_template(FORM, include_str!("../templates/competitions/form.html"))?;
        env.add_template(SCORE, include_str!("../templates/competitions/score.html"))?;
        env.add_template(PRINT_LAYOUT, include_str!("../templates/competitions/printLayout.html"))?;
        Ok(Self { env })
    }

    /// Renders `name` with the payload exposed as `result`.
    pub fn render<T: Serialize>(&self, name: &str, result: &T) -> AppResult<Html<String>> {
        let template = self.env.get_template(name)?;
        Ok(Html(template.render(context! { result => result })?))
    }
}

/// `302 Found` to `location`.
pub fn redirect(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

// --- View Payloads ---

#[derive(Debug, Serialize)]
pub struct ListResult {
    pub items: Vec<CompetitionListing>,
}

/// FormResult
///
/// Every state of `competitions/form`: the add/edit form itself, and the flags shown after a
/// submission or an apply attempt.
#[derive(Debug, Default, Serialize)]
pub struct FormResult {
    pub display_form: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit: Option<Competition>,
    pub validation_error: bool,
    pub database_error: bool,
    pub success: bool,
    pub applied: bool,
    pub already_applied: bool,
}

impl FormResult {
    pub fn add_form() -> Self {
        Self { display_form: true, ..Self::default() }
    }

    pub fn edit_form(competition: Competition) -> Self {
        Self { display_form: true, edit: Some(competition), ..Self::default() }
    }

    pub fn validation_error() -> Self {
        Self { display_form: true, validation_error: true, ..Self::default() }
    }

    pub fn database_error() -> Self {
        Self { database_error: true, ..Self::default() }
    }

    pub fn success() -> Self {
        Self { success: true, ..Self::default() }
    }

    pub fn applied() -> Self {
        Self { applied: true, ..Self::default() }
    }

    pub fn already_applied() -> Self {
        Self { already_applied: true, ..Self::default() }
    }
}

#[derive(Debug, Serialize)]
pub struct ScoreResult {
    pub items: Vec<ScoreboardRow>,
}

#[derive(Debug, Serialize)]
pub struct PrintLayoutResult {
    pub items: Vec<PrintRow>,
    pub print_layout: bool,
}
