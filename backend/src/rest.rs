use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use tracing::info;

use crate::db::DbConnection;
use crate::domain::{ActivityService, CamperService, SignupService};
use crate::error::ApiResult;
use shared::{
    Activity, Camper, CamperDetail, CreateCamperRequest, CreateSignupRequest, SignupDetail,
    UpdateCamperRequest,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub campers: CamperService,
    pub activities: ActivityService,
    pub signups: SignupService,
}

impl AppState {
    /// Create application state with all services over one connection
    pub fn new(db: DbConnection) -> Self {
        Self {
            campers: CamperService::new(db.clone()),
            activities: ActivityService::new(db.clone()),
            signups: SignupService::new(db),
        }
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/campers", get(list_campers).post(create_camper))
        .route("/campers/:id", get(get_camper).patch(update_camper))
        .route("/activities", get(list_activities))
        .route("/activities/:id", delete(delete_activity))
        .route("/signups", post(create_signup))
        .with_state(state)
}

async fn home() -> &'static str {
    ""
}

/// Handler for GET /campers
async fn list_campers(State(state): State<AppState>) -> ApiResult<Json<Vec<Camper>>> {
    info!("GET /campers");
    Ok(Json(state.campers.list().await?))
}

/// Handler for POST /campers
async fn create_camper(
    State(state): State<AppState>,
    payload: Result<Json<CreateCamperRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Camper>)> {
    info!("POST /campers");

    let Json(request) = payload?;
    let camper = state.campers.create(request).await?;
    Ok((StatusCode::CREATED, Json(camper)))
}

/// Handler for GET /campers/:id
async fn get_camper(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<CamperDetail>> {
    info!("GET /campers/{id}");
    Ok(Json(state.campers.get_detail(id).await?))
}

/// Handler for PATCH /campers/:id
async fn update_camper(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<UpdateCamperRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Camper>)> {
    info!("PATCH /campers/{id}");

    let Json(request) = payload?;
    let camper = state.campers.update(id, request).await?;
    Ok((StatusCode::ACCEPTED, Json(camper)))
}

/// Handler for GET /activities
async fn list_activities(State(state): State<AppState>) -> ApiResult<Json<Vec<Activity>>> {
    info!("GET /activities");
    Ok(Json(state.activities.list().await?))
}

/// Handler for DELETE /activities/:id
async fn delete_activity(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    info!("DELETE /activities/{id}");

    state.activities.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for POST /signups
async fn create_signup(
    State(state): State<AppState>,
    payload: Result<Json<CreateSignupRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SignupDetail>)> {
    info!("POST /signups");

    let Json(request) = payload?;
    let signup = state.signups.create(request).await?;
    Ok((StatusCode::CREATED, Json(signup)))
}
