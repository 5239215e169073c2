use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
    Extension,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    dto::notification_dto::{NotificationListQuery, UnreadCountResponse},
    error::{Error, Result},
    middleware::auth::CurrentUser,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/notifications",
    params(
        ("unread_only" = Option<bool>, Query, description = "Return only unread notifications")
    ),
    responses(
        (status = 200, description = "Caller's notifications, newest first")
    )
)]
#[axum::debug_handler]
pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<NotificationListQuery>,
) -> Result<impl IntoResponse> {
    let notifications = state
        .notification_service
        .list_for_user(user.id, query.unread_only)
        .await?;
    Ok(Json(notifications))
}

#[utoipa::path(
    get,
    path = "/api/notifications/unread-count",
    responses(
        (status = 200, description = "Count of unread notifications", body = Json<UnreadCountResponse>)
    )
)]
#[axum::debug_handler]
pub async fn unread_count(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse> {
    let unread = state.notification_service.unread_count(user.id).await?;
    Ok(Json(UnreadCountResponse { unread }))
}

#[utoipa::path(
    post,
    path = "/api/notifications/{id}/read",
    params(
        ("id" = Uuid, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Notification marked as read"),
        (status = 404, description = "Notification not found")
    )
)]
#[axum::debug_handler]
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let marked = state.notification_service.mark_read(user.id, id).await?;
    if !marked {
        return Err(Error::NotFound("notification not found".to_string()));
    }
    Ok(Json(json!({ "read": true })))
}

#[utoipa::path(
    post,
    path = "/api/notifications/read-all",
    responses(
        (status = 200, description = "All notifications marked as read")
    )
)]
#[axum::debug_handler]
pub async fn mark_all_read(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse> {
    let marked = state.notification_service.mark_all_read(user.id).await?;
    Ok(Json(json!({ "read": marked })))
}
