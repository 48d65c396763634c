//! Reminder CRUD and schedule evaluation.
//!
//! Creation and update are per-kind routes so each payload carries exactly
//! the fields its rule needs. Every listing endpoint evaluates items
//! against the server's current date, sharing one Easter table per
//! request.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use tracing::debug;

use tickler_api::{
    CreateDaily, CreateEaster, CreateIrregular, CreateMonthly, CreateOnce, CreateWeekly,
    CreateXDays, CreateYearly, ReminderResponse, UpdateDaily, UpdateEaster, UpdateIrregular,
    UpdateMonthly, UpdateOnce, UpdateWeekly, UpdateXDays, UpdateYearly,
};
use tickler_core::{Category, EasterTable, Reminder};
use tickler_db::queries::reminder;

use crate::auth::AuthUser;
use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_all))
        .route("/current", get(list_current))
        .route("/completed-today", get(list_completed_today))
        .route("/daily", post(create_daily))
        .route("/weekly", post(create_weekly))
        .route("/monthly", post(create_monthly))
        .route("/yearly", post(create_yearly))
        .route("/once", post(create_once))
        .route("/xdays", post(create_xdays))
        .route("/easter", post(create_easter))
        .route("/irregular", post(create_irregular))
        .route("/daily/{id}", post(update_daily))
        .route("/weekly/{id}", post(update_weekly))
        .route("/monthly/{id}", post(update_monthly))
        .route("/yearly/{id}", post(update_yearly))
        .route("/once/{id}", post(update_once))
        .route("/xdays/{id}", post(update_xdays))
        .route("/easter/{id}", post(update_easter))
        .route("/irregular/{id}", post(update_irregular))
        .route("/{id}/complete", post(complete))
        .route("/{id}", delete(remove))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn respond(item: &Reminder, today: NaiveDate) -> ServerResult<Json<ReminderResponse>> {
    let mut easter = EasterTable::new();
    Ok(Json(ReminderResponse::from_domain(item, today, &mut easter)?))
}

fn respond_batch(
    items: impl IntoIterator<Item = Reminder>,
    today: NaiveDate,
) -> ServerResult<Json<Vec<ReminderResponse>>> {
    let mut easter = EasterTable::new();
    let responses = items
        .into_iter()
        .map(|item| ReminderResponse::from_domain(&item, today, &mut easter))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(responses))
}

// ============================================================================
// Listing
// ============================================================================

async fn list_all(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> ServerResult<Json<Vec<ReminderResponse>>> {
    let items = reminder::list_reminders(state.db.pool(), user.id).await?;
    respond_batch(items, today())
}

#[derive(Debug, Deserialize)]
struct CurrentParams {
    category: Option<String>,
}

/// Items whose lead window is open right now, optionally restricted to one
/// category.
async fn list_current(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(params): Query<CurrentParams>,
) -> ServerResult<Json<Vec<ReminderResponse>>> {
    let category = params
        .category
        .as_deref()
        .map(|raw| {
            raw.parse::<Category>()
                .map_err(|_| ServerError::UnknownCategory {
                    value: raw.to_string(),
                })
        })
        .transpose()?;

    let today = today();
    let mut easter = EasterTable::new();
    let mut current = Vec::new();
    for item in reminder::list_reminders(state.db.pool(), user.id).await? {
        if category.is_some_and(|c| c != item.category) {
            continue;
        }
        if item.should_display_with(today, &mut easter)? {
            current.push(ReminderResponse::from_domain(&item, today, &mut easter)?);
        }
    }
    debug!(user_id = user.id, count = current.len(), "current reminders");
    Ok(Json(current))
}

async fn list_completed_today(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> ServerResult<Json<Vec<ReminderResponse>>> {
    let today = today();
    let items = reminder::list_reminders(state.db.pool(), user.id)
        .await?
        .into_iter()
        .filter(|item| item.date_completed == Some(today));
    respond_batch(items, today)
}

// ============================================================================
// Creation, one route per rule kind
// ============================================================================

async fn create(
    state: &AppState,
    item: &Reminder,
    today: NaiveDate,
) -> ServerResult<(StatusCode, Json<ReminderResponse>)> {
    let created = reminder::create_reminder(state.db.pool(), item).await?;
    Ok((StatusCode::CREATED, respond(&created, today)?))
}

async fn create_daily(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<CreateDaily>,
) -> ServerResult<(StatusCode, Json<ReminderResponse>)> {
    let today = today();
    create(&state, &req.build(user.id, today)?, today).await
}

async fn create_weekly(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<CreateWeekly>,
) -> ServerResult<(StatusCode, Json<ReminderResponse>)> {
    let today = today();
    create(&state, &req.build(user.id, today)?, today).await
}

async fn create_monthly(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<CreateMonthly>,
) -> ServerResult<(StatusCode, Json<ReminderResponse>)> {
    let today = today();
    create(&state, &req.build(user.id, today)?, today).await
}

async fn create_yearly(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<CreateYearly>,
) -> ServerResult<(StatusCode, Json<ReminderResponse>)> {
    let today = today();
    create(&state, &req.build(user.id, today)?, today).await
}

async fn create_once(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<CreateOnce>,
) -> ServerResult<(StatusCode, Json<ReminderResponse>)> {
    let today = today();
    create(&state, &req.build(user.id, today)?, today).await
}

async fn create_xdays(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<CreateXDays>,
) -> ServerResult<(StatusCode, Json<ReminderResponse>)> {
    let today = today();
    create(&state, &req.build(user.id, today)?, today).await
}

async fn create_easter(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<CreateEaster>,
) -> ServerResult<(StatusCode, Json<ReminderResponse>)> {
    let today = today();
    create(&state, &req.build(user.id, today)?, today).await
}

async fn create_irregular(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<CreateIrregular>,
) -> ServerResult<(StatusCode, Json<ReminderResponse>)> {
    let today = today();
    create(&state, &req.build(user.id, today)?, today).await
}

// ============================================================================
// Updates, one route per rule kind
// ============================================================================

async fn fetch_owned(state: &AppState, user_id: i64, id: i64) -> ServerResult<Reminder> {
    reminder::get_reminder(state.db.pool(), user_id, id)
        .await?
        .ok_or(ServerError::NotFound {
            entity: "reminder",
            id,
        })
}

async fn store(state: &AppState, item: &Reminder) -> ServerResult<Json<ReminderResponse>> {
    if !reminder::update_reminder(state.db.pool(), item).await? {
        return Err(ServerError::NotFound {
            entity: "reminder",
            id: item.id,
        });
    }
    respond(item, today())
}

async fn update_daily(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateDaily>,
) -> ServerResult<Json<ReminderResponse>> {
    let mut item = fetch_owned(&state, user.id, id).await?;
    req.apply(&mut item)?;
    store(&state, &item).await
}

async fn update_weekly(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateWeekly>,
) -> ServerResult<Json<ReminderResponse>> {
    let mut item = fetch_owned(&state, user.id, id).await?;
    req.apply(&mut item)?;
    store(&state, &item).await
}

async fn update_monthly(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateMonthly>,
) -> ServerResult<Json<ReminderResponse>> {
    let mut item = fetch_owned(&state, user.id, id).await?;
    req.apply(&mut item)?;
    store(&state, &item).await
}

async fn update_yearly(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateYearly>,
) -> ServerResult<Json<ReminderResponse>> {
    let mut item = fetch_owned(&state, user.id, id).await?;
    req.apply(&mut item)?;
    store(&state, &item).await
}

async fn update_once(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateOnce>,
) -> ServerResult<Json<ReminderResponse>> {
    let mut item = fetch_owned(&state, user.id, id).await?;
    req.apply(&mut item)?;
    store(&state, &item).await
}

async fn update_xdays(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateXDays>,
) -> ServerResult<Json<ReminderResponse>> {
    let mut item = fetch_owned(&state, user.id, id).await?;
    req.apply(&mut item)?;
    store(&state, &item).await
}

async fn update_easter(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateEaster>,
) -> ServerResult<Json<ReminderResponse>> {
    let mut item = fetch_owned(&state, user.id, id).await?;
    req.apply(&mut item)?;
    store(&state, &item).await
}

async fn update_irregular(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateIrregular>,
) -> ServerResult<Json<ReminderResponse>> {
    let mut item = fetch_owned(&state, user.id, id).await?;
    req.apply(&mut item)?;
    store(&state, &item).await
}

// ============================================================================
// Completion and deletion
// ============================================================================

async fn complete(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> ServerResult<Json<ReminderResponse>> {
    let today = today();
    if !reminder::mark_completed(state.db.pool(), user.id, id, today).await? {
        return Err(ServerError::NotFound {
            entity: "reminder",
            id,
        });
    }
    let item = fetch_owned(&state, user.id, id).await?;
    respond(&item, today)
}

async fn remove(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> ServerResult<StatusCode> {
    if !reminder::delete_reminder(state.db.pool(), user.id, id).await? {
        return Err(ServerError::NotFound {
            entity: "reminder",
            id,
        });
    }
    debug!(user_id = user.id, reminder_id = id, "deleted reminder");
    Ok(StatusCode::NO_CONTENT)
}
