use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;

use crate::{
    dto::checkin_dto::CheckInPayload,
    error::{Error, Result},
    middleware::auth::CurrentUser,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/jobs/{id}/check-in",
    params(
        ("id" = Uuid, Path, description = "Job post ID")
    ),
    request_body = CheckInPayload,
    responses(
        (status = 201, description = "Attendance recorded for today"),
        (status = 400, description = "Contract not active or already checked in today"),
        (status = 404, description = "Caller has no contract on this job")
    )
)]
#[axum::debug_handler]
pub async fn check_in(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CheckInPayload>,
) -> Result<impl IntoResponse> {
    user.require_worker()?;
    let Some(contract) = state.contract_service.find_for_worker(id, user.id).await? else {
        return Err(Error::NotFound("no contract on this job".to_string()));
    };
    let record = state
        .checkin_service
        .check_in(&contract, &user, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[utoipa::path(
    get,
    path = "/api/contracts/{contract_id}/check-ins",
    params(
        ("contract_id" = Uuid, Path, description = "Contract ID")
    ),
    responses(
        (status = 200, description = "Attendance records, newest first"),
        (status = 403, description = "Caller is not a party to the contract")
    )
)]
#[axum::debug_handler]
pub async fn contract_check_ins(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(contract_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let contract = state.contract_service.find(contract_id).await?;
    let records = state
        .checkin_service
        .list_for_contract(&contract, &user)
        .await?;
    Ok(Json(records))
}
