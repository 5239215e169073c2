use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::payment_dto::{DisputePayload, MarkSentPayload, OutgoingQuery, RecordPaymentPayload},
    error::{Error, Result},
    middleware::auth::CurrentUser,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/payments/mine",
    responses(
        (status = 200, description = "Payment schedule rows across the caller's contracts"),
        (status = 403, description = "Caller is not a worker")
    )
)]
#[axum::debug_handler]
pub async fn my_payments(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse> {
    user.require_worker()?;
    let schedules = state.payment_service.list_for_worker(user.id).await?;
    Ok(Json(schedules))
}

#[utoipa::path(
    get,
    path = "/api/payments/outgoing",
    params(
        ("job_id" = Option<Uuid>, Query, description = "Restrict to one job post")
    ),
    responses(
        (status = 200, description = "Schedule rows the caller owes across their jobs"),
        (status = 403, description = "Caller is not an employer")
    )
)]
#[axum::debug_handler]
pub async fn outgoing_payments(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<OutgoingQuery>,
) -> Result<impl IntoResponse> {
    user.require_employer()?;
    let schedules = state
        .payment_service
        .list_outgoing(&user, query.job_id)
        .await?;
    Ok(Json(schedules))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{id}/payments",
    params(
        ("id" = Uuid, Path, description = "Job post ID")
    ),
    responses(
        (status = 200, description = "Schedule rows for every contract under the job"),
        (status = 403, description = "Caller does not own this job")
    )
)]
#[axum::debug_handler]
pub async fn job_payments(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    user.require_employer()?;
    let schedules = state.payment_service.list_for_job(id, &user).await?;
    Ok(Json(schedules))
}

#[utoipa::path(
    get,
    path = "/api/contracts/{contract_id}/payments",
    params(
        ("contract_id" = Uuid, Path, description = "Contract ID")
    ),
    responses(
        (status = 200, description = "Schedule rows for the contract, earliest due first"),
        (status = 403, description = "Caller is not a party to the contract")
    )
)]
#[axum::debug_handler]
pub async fn contract_payments(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(contract_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let schedules = state
        .payment_service
        .list_for_contract(contract_id, &user)
        .await?;
    Ok(Json(schedules))
}

#[utoipa::path(
    get,
    path = "/api/payments/{schedule_id}/transaction",
    params(
        ("schedule_id" = Uuid, Path, description = "Payment schedule ID")
    ),
    responses(
        (status = 200, description = "Transaction recorded against the schedule row"),
        (status = 404, description = "No payment recorded yet")
    )
)]
#[axum::debug_handler]
pub async fn payment_transaction(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(schedule_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let transaction = state
        .payment_service
        .get_transaction(schedule_id, &user)
        .await?;
    match transaction {
        Some(t) => Ok(Json(t)),
        None => Err(Error::NotFound(
            "no payment recorded for this schedule".to_string(),
        )),
    }
}

#[utoipa::path(
    post,
    path = "/api/payments/{schedule_id}/send",
    params(
        ("schedule_id" = Uuid, Path, description = "Payment schedule ID")
    ),
    request_body = MarkSentPayload,
    responses(
        (status = 200, description = "Payment marked as sent"),
        (status = 400, description = "Missing reference for a non-cash method"),
        (status = 409, description = "Schedule row cannot be marked sent")
    )
)]
#[axum::debug_handler]
pub async fn send_payment(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(schedule_id): Path<Uuid>,
    Json(payload): Json<MarkSentPayload>,
) -> Result<impl IntoResponse> {
    user.require_employer()?;
    payload.validate()?;
    let schedule = state
        .payment_service
        .mark_sent(schedule_id, &user, payload, &state.notification_service)
        .await?;
    Ok(Json(schedule))
}

#[utoipa::path(
    post,
    path = "/api/payments/{schedule_id}/confirm",
    params(
        ("schedule_id" = Uuid, Path, description = "Payment schedule ID")
    ),
    responses(
        (status = 200, description = "Receipt confirmed"),
        (status = 403, description = "Caller is not the contract worker"),
        (status = 409, description = "Payment has not been sent")
    )
)]
#[axum::debug_handler]
pub async fn confirm_payment(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(schedule_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    user.require_worker()?;
    let schedule = state
        .payment_service
        .confirm(schedule_id, &user, &state.notification_service)
        .await?;
    Ok(Json(schedule))
}

#[utoipa::path(
    post,
    path = "/api/payments/{schedule_id}/dispute",
    params(
        ("schedule_id" = Uuid, Path, description = "Payment schedule ID")
    ),
    request_body = DisputePayload,
    responses(
        (status = 200, description = "Payment disputed"),
        (status = 400, description = "No recorded payment to dispute"),
        (status = 409, description = "Schedule row cannot be disputed")
    )
)]
#[axum::debug_handler]
pub async fn dispute_payment(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(schedule_id): Path<Uuid>,
    Json(payload): Json<DisputePayload>,
) -> Result<impl IntoResponse> {
    user.require_worker()?;
    payload.validate()?;
    let schedule = state
        .payment_service
        .dispute(schedule_id, &user, payload, &state.notification_service)
        .await?;
    Ok(Json(schedule))
}

#[utoipa::path(
    post,
    path = "/api/contracts/{contract_id}/record-payment",
    params(
        ("contract_id" = Uuid, Path, description = "Contract ID")
    ),
    request_body = RecordPaymentPayload,
    responses(
        (status = 200, description = "One-off payment recorded as confirmed"),
        (status = 400, description = "Long-term contract or invalid details"),
        (status = 403, description = "Caller is not the contract employer")
    )
)]
#[axum::debug_handler]
pub async fn record_contract_payment(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(contract_id): Path<Uuid>,
    Json(payload): Json<RecordPaymentPayload>,
) -> Result<impl IntoResponse> {
    user.require_employer()?;
    payload.validate()?;
    let schedule = state
        .payment_service
        .record_short_term_payment(contract_id, &user, payload, &state.notification_service)
        .await?;
    Ok(Json(schedule))
}
