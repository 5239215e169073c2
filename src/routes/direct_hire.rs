use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::direct_hire_dto::{
        CreateDirectHirePayload, DirectHireListQuery, HirePaymentPayload,
        SubmitHireCompletionPayload,
    },
    error::Result,
    middleware::auth::CurrentUser,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/direct-hires",
    request_body = CreateDirectHirePayload,
    responses(
        (status = 201, description = "Booking request created"),
        (status = 400, description = "Invalid payload or self-booking"),
        (status = 403, description = "Caller is not an employer")
    )
)]
#[axum::debug_handler]
pub async fn create_direct_hire(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CreateDirectHirePayload>,
) -> Result<impl IntoResponse> {
    user.require_employer()?;
    payload.validate()?;
    let hire = state
        .direct_hire_service
        .create(&user, payload, &state.notification_service)
        .await?;
    Ok((StatusCode::CREATED, Json(hire)))
}

#[utoipa::path(
    get,
    path = "/api/direct-hires/employer",
    params(
        ("status" = Option<String>, Query, description = "Filter by booking status")
    ),
    responses(
        (status = 200, description = "Bookings created by the caller")
    )
)]
#[axum::debug_handler]
pub async fn employer_direct_hires(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<DirectHireListQuery>,
) -> Result<impl IntoResponse> {
    user.require_employer()?;
    let hires = state
        .direct_hire_service
        .list_for_employer(user.id, query)
        .await?;
    Ok(Json(hires))
}

#[utoipa::path(
    get,
    path = "/api/direct-hires/worker",
    params(
        ("status" = Option<String>, Query, description = "Filter by booking status")
    ),
    responses(
        (status = 200, description = "Bookings addressed to the caller")
    )
)]
#[axum::debug_handler]
pub async fn worker_direct_hires(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<DirectHireListQuery>,
) -> Result<impl IntoResponse> {
    user.require_worker()?;
    let hires = state
        .direct_hire_service
        .list_for_worker(user.id, query)
        .await?;
    Ok(Json(hires))
}

#[utoipa::path(
    get,
    path = "/api/direct-hires/{id}",
    params(
        ("id" = Uuid, Path, description = "Booking ID")
    ),
    responses(
        (status = 200, description = "Booking detail"),
        (status = 403, description = "Caller is not a party to the booking"),
        (status = 404, description = "Booking not found")
    )
)]
#[axum::debug_handler]
pub async fn get_direct_hire(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let hire = state.direct_hire_service.get(id, &user).await?;
    Ok(Json(hire))
}

#[utoipa::path(
    post,
    path = "/api/direct-hires/{id}/accept",
    params(
        ("id" = Uuid, Path, description = "Booking ID")
    ),
    responses(
        (status = 200, description = "Booking accepted, conversation opened"),
        (status = 409, description = "Booking is not pending")
    )
)]
#[axum::debug_handler]
pub async fn accept_direct_hire(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    user.require_worker()?;
    let hire = state
        .direct_hire_service
        .accept(id, &user, &state.notification_service)
        .await?;
    Ok(Json(hire))
}

#[utoipa::path(
    post,
    path = "/api/direct-hires/{id}/reject",
    params(
        ("id" = Uuid, Path, description = "Booking ID")
    ),
    responses(
        (status = 200, description = "Booking rejected"),
        (status = 409, description = "Booking is not pending")
    )
)]
#[axum::debug_handler]
pub async fn reject_direct_hire(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    user.require_worker()?;
    let hire = state
        .direct_hire_service
        .reject(id, &user, &state.notification_service)
        .await?;
    Ok(Json(hire))
}

#[utoipa::path(
    post,
    path = "/api/direct-hires/{id}/cancel",
    params(
        ("id" = Uuid, Path, description = "Booking ID")
    ),
    responses(
        (status = 200, description = "Booking cancelled"),
        (status = 409, description = "Booking is past the point of cancelling")
    )
)]
#[axum::debug_handler]
pub async fn cancel_direct_hire(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    user.require_employer()?;
    let hire = state
        .direct_hire_service
        .cancel(id, &user, &state.notification_service)
        .await?;
    Ok(Json(hire))
}

#[utoipa::path(
    post,
    path = "/api/direct-hires/{id}/start",
    params(
        ("id" = Uuid, Path, description = "Booking ID")
    ),
    responses(
        (status = 200, description = "Work started"),
        (status = 409, description = "Booking has not been accepted")
    )
)]
#[axum::debug_handler]
pub async fn start_direct_hire(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    user.require_worker()?;
    let hire = state
        .direct_hire_service
        .start(id, &user, &state.notification_service)
        .await?;
    Ok(Json(hire))
}

#[utoipa::path(
    post,
    path = "/api/direct-hires/{id}/submit-completion",
    params(
        ("id" = Uuid, Path, description = "Booking ID")
    ),
    request_body = SubmitHireCompletionPayload,
    responses(
        (status = 200, description = "Completion submitted for approval"),
        (status = 409, description = "Work is not in progress")
    )
)]
#[axum::debug_handler]
pub async fn submit_direct_hire_completion(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SubmitHireCompletionPayload>,
) -> Result<impl IntoResponse> {
    user.require_worker()?;
    let hire = state
        .direct_hire_service
        .submit_completion(id, &user, payload, &state.notification_service)
        .await?;
    Ok(Json(hire))
}

#[utoipa::path(
    post,
    path = "/api/direct-hires/{id}/approve-completion",
    params(
        ("id" = Uuid, Path, description = "Booking ID")
    ),
    responses(
        (status = 200, description = "Completion approved"),
        (status = 409, description = "No completion awaiting approval")
    )
)]
#[axum::debug_handler]
pub async fn approve_direct_hire_completion(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    user.require_employer()?;
    let hire = state
        .direct_hire_service
        .approve_completion(id, &user, &state.notification_service)
        .await?;
    Ok(Json(hire))
}

#[utoipa::path(
    post,
    path = "/api/direct-hires/{id}/submit-payment",
    params(
        ("id" = Uuid, Path, description = "Booking ID")
    ),
    request_body = HirePaymentPayload,
    responses(
        (status = 200, description = "Payment details recorded"),
        (status = 400, description = "Missing reference for a non-cash method"),
        (status = 409, description = "Completion has not been approved")
    )
)]
#[axum::debug_handler]
pub async fn submit_direct_hire_payment(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<HirePaymentPayload>,
) -> Result<impl IntoResponse> {
    user.require_employer()?;
    payload.validate()?;
    let hire = state
        .direct_hire_service
        .submit_payment(id, &user, payload, &state.notification_service)
        .await?;
    Ok(Json(hire))
}

#[utoipa::path(
    post,
    path = "/api/direct-hires/{id}/confirm-payment",
    params(
        ("id" = Uuid, Path, description = "Booking ID")
    ),
    responses(
        (status = 200, description = "Payment receipt confirmed, booking closed")
    )
)]
#[axum::debug_handler]
pub async fn confirm_direct_hire_payment(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    user.require_worker()?;
    let hire = state
        .direct_hire_service
        .confirm_payment_received(id, &user, &state.notification_service)
        .await?;
    Ok(Json(hire))
}
