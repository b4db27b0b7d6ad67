use crate::{
    AppState,
    auth::{AdminUser, AuthUser},
    error::{AppError, AppResult},
    extract::IdParam,
    forms::{AddCompetitionForm, EditCompetitionForm, ScoreForm},
    models::ApplyOutcome,
    views::{self, FormResult, ListResult, PrintLayoutResult, ScoreResult},
};
use axum::{
    Form,
    extract::{State, rejection::FormRejection},
    response::{Html, IntoResponse, Response},
};

const LIST_PATH: &str = "/competitions";

// A body that is not a urlencoded form counts as invalid input, same as a bad field.
fn decoded<T>(form: Result<Form<T>, FormRejection>) -> Option<T> {
    match form {
        Ok(Form(form)) => Some(form),
        Err(rejection) => {
            tracing::debug!("form body rejected: {}", rejection.body_text());
            None
        }
    }
}

// --- Handlers ---

/// list_competitions
///
/// [Authenticated Route] All competitions with their author, earliest deadline first.
pub async fn list_competitions(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Html<String>> {
    let items = state.repo.list_competitions().await?;
    state.views.render(views::INDEX, &ListResult { items })
}

/// delete_competition
///
/// [Admin Route] Removes a competition and its applications, then returns to the list.
/// Anything other than exactly one deleted competition is a failed operation and leaves the
/// store untouched.
pub async fn delete_competition(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    IdParam(id): IdParam,
) -> AppResult<Response> {
    let deleted = state.repo.delete_competition(id).await?;
    if deleted != 1 {
        tracing::warn!(competition_id = id, deleted, "delete did not remove exactly one competition");
        return Err(AppError::OperationFailed);
    }

    tracing::info!(competition_id = id, admin_id = admin.id, "competition deleted");
    Ok(views::redirect(LIST_PATH))
}

/// edit_form
///
/// [Admin Route] The competition form prefilled with an existing row.
pub async fn edit_form(
    _admin: AdminUser,
    State(state): State<AppState>,
    IdParam(id): IdParam,
) -> AppResult<Html<String>> {
    let competition = state
        .repo
        .get_competition(id)
        .await?
        .ok_or(AppError::InvalidCall)?;

    state.views.render(views::FORM, &FormResult::edit_form(competition))
}

/// add_form
///
/// [Admin Route] The empty competition form.
pub async fn add_form(_admin: AdminUser, State(state): State<AppState>) -> AppResult<Html<String>> {
    state.views.render(views::FORM, &FormResult::add_form())
}

/// update_competition
///
/// [Authenticated Route] Handles the edit form submission. Note that this only requires an
/// authenticated caller, unlike the admin-only form that produces it.
///
/// Invalid input (including a body that is not a form at all) re-renders the form with
/// `validation_error`; a store failure or an update that does not hit exactly one row renders
/// `database_error`.
pub async fn update_competition(
    user: AuthUser,
    State(state): State<AppState>,
    form: Result<Form<EditCompetitionForm>, FormRejection>,
) -> AppResult<Response> {
    let Some(update) = decoded(form).and_then(EditCompetitionForm::into_command) else {
        return Ok(state.views.render(views::FORM, &FormResult::validation_error())?.into_response());
    };

    match state.repo.update_competition(&update).await {
        Ok(1) => {
            tracing::info!(competition_id = update.id, user_id = user.id, "competition updated");
            Ok(views::redirect(LIST_PATH))
        }
        Ok(changes) => {
            tracing::warn!(competition_id = update.id, changes, "competition update affected unexpected rows");
            Ok(state.views.render(views::FORM, &FormResult::database_error())?.into_response())
        }
        Err(e) => {
            tracing::error!("update_competition error: {:?}", e);
            Ok(state.views.render(views::FORM, &FormResult::database_error())?.into_response())
        }
    }
}

/// create_competition
///
/// [Admin Route] Handles the add form submission. The author is the acting admin.
pub async fn create_competition(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    form: Result<Form<AddCompetitionForm>, FormRejection>,
) -> AppResult<Html<String>> {
    let Some(competition) = decoded(form).and_then(AddCompetitionForm::into_command) else {
        return state.views.render(views::FORM, &FormResult::validation_error());
    };

    let result = match state.repo.create_competition(&competition, admin.id).await {
        Ok(1) => {
            tracing::info!(admin_id = admin.id, name = %competition.name, "competition created");
            FormResult::success()
        }
        Ok(changes) => {
            tracing::warn!(changes, "competition insert affected unexpected rows");
            FormResult::database_error()
        }
        Err(e) => {
            tracing::error!("create_competition error: {:?}", e);
            FormResult::database_error()
        }
    };

    state.views.render(views::FORM, &result)
}

/// apply
///
/// [Authenticated Route] Enters the caller into a competition, at most once.
///
/// The inbox notification written alongside is addressed to the applicant.
pub async fn apply(
    user: AuthUser,
    State(state): State<AppState>,
    IdParam(competition_id): IdParam,
) -> AppResult<Html<String>> {
    let result = match state.repo.apply(user.id, competition_id).await? {
        ApplyOutcome::Applied => {
            tracing::info!(user_id = user.id, competition_id, "application recorded");
            FormResult::applied()
        }
        ApplyOutcome::AlreadyApplied => FormResult::already_applied(),
        ApplyOutcome::NotRecorded => FormResult::database_error(),
        ApplyOutcome::UnknownCompetition => return Err(AppError::InvalidCall),
    };

    state.views.render(views::FORM, &result)
}

/// scoreboard
///
/// [Public Route] Applications of one competition, lowest score first.
pub async fn scoreboard(
    State(state): State<AppState>,
    IdParam(competition_id): IdParam,
) -> AppResult<Html<String>> {
    let items = state.repo.scoreboard(competition_id).await?;
    state.views.render(views::SCORE, &ScoreResult { items })
}

/// update_score
///
/// [Authenticated Route] Sets the score of one application, then shows the scoreboard named by
/// the submitted `competition_id`. That id is not checked against the application's competition.
pub async fn update_score(
    user: AuthUser,
    State(state): State<AppState>,
    IdParam(application_id): IdParam,
    Form(form): Form<ScoreForm>,
) -> AppResult<Response> {
    let score = form.score()?;
    let competition_id = form.competition_id().ok_or(AppError::InvalidCall)?;

    let changes = state.repo.update_score(application_id, score).await?;
    if changes == 0 {
        return Err(AppError::InvalidCall);
    }

    tracing::info!(application_id, ?score, user_id = user.id, "score updated");
    Ok(views::redirect(&format!("{LIST_PATH}/score/{competition_id}")))
}

/// print_layout
///
/// [Public Route] Printable results, highest score first.
pub async fn print_layout(
    State(state): State<AppState>,
    IdParam(competition_id): IdParam,
) -> AppResult<Html<String>> {
    let items = state.repo.print_layout(competition_id).await?;
    state.views.render(
        views::PRINT_LAYOUT,
        &PrintLayoutResult {
            items,
            print_layout: true,
        },
    )
}
