use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::job_dto::{
        ApproveCompletionPayload, BrowseJobsQuery, CancelRecurringPayload, CreateJobPayload,
        JobListQuery, JobListResponse, StartJobPayload, SubmitCompletionPayload, UpdateJobPayload,
        UpdateJobStatusPayload,
    },
    error::{Error, Result},
    middleware::auth::CurrentUser,
    models::job::JobStatus,
    AppState,
};

const PUBLIC_BROWSE_LIMIT: i64 = 50;

#[utoipa::path(
    get,
    path = "/api/public/jobs",
    params(
        ("limit" = Option<i64>, Query, description = "Maximum number of open jobs to return")
    ),
    responses(
        (status = 200, description = "Open job posts, newest first")
    )
)]
#[axum::debug_handler]
pub async fn browse_jobs(
    State(state): State<AppState>,
    Query(query): Query<BrowseJobsQuery>,
) -> Result<impl IntoResponse> {
    let limit = query.limit.unwrap_or(PUBLIC_BROWSE_LIMIT).clamp(1, 200);
    let jobs = state.job_service.list_open(limit).await?;
    Ok(Json(jobs))
}

#[utoipa::path(
    get,
    path = "/api/public/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job post ID")
    ),
    responses(
        (status = 200, description = "Job post detail"),
        (status = 404, description = "Job not found or not open")
    )
)]
#[axum::debug_handler]
pub async fn browse_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let job = state.job_service.get(id).await?;
    // Unauthenticated callers only see posts still taking applications.
    if job.status != JobStatus::Open {
        return Err(Error::NotFound("job post not found".to_string()));
    }
    Ok(Json(job))
}

#[utoipa::path(
    post,
    path = "/api/jobs",
    request_body = CreateJobPayload,
    responses(
        (status = 201, description = "Job post created"),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Caller is not an employer")
    )
)]
#[axum::debug_handler]
pub async fn create_job(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CreateJobPayload>,
) -> Result<impl IntoResponse> {
    user.require_employer()?;
    payload.validate()?;
    let job = state.job_service.create(&user, payload).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

#[utoipa::path(
    get,
    path = "/api/jobs",
    params(
        ("page" = Option<i64>, Query, description = "Page number, 1-based"),
        ("per_page" = Option<i64>, Query, description = "Page size"),
        ("status" = Option<String>, Query, description = "Filter by job status"),
        ("job_type" = Option<String>, Query, description = "Filter by onetime/longterm"),
        ("longterm" = Option<bool>, Query, description = "Filter by the long-term flag"),
        ("search" = Option<String>, Query, description = "Search in title and description")
    ),
    responses(
        (status = 200, description = "Paginated job posts", body = Json<JobListResponse>)
    )
)]
#[axum::debug_handler]
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobListQuery>,
) -> Result<impl IntoResponse> {
    let list = state.job_service.list(query).await?;
    Ok(Json(JobListResponse {
        items: list.items,
        total: list.total,
        page: list.page,
        per_page: list.per_page,
        total_pages: list.total_pages,
    }))
}

#[utoipa::path(
    get,
    path = "/api/jobs/mine",
    responses(
        (status = 200, description = "Job posts owned by the caller"),
        (status = 403, description = "Caller is not an employer")
    )
)]
#[axum::debug_handler]
pub async fn my_jobs(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse> {
    user.require_employer()?;
    let jobs = state.job_service.list_for_employer(user.id).await?;
    Ok(Json(jobs))
}

#[utoipa::path(
    get,
    path = "/api/jobs/applications/mine",
    responses(
        (status = 200, description = "Applications submitted by the caller"),
        (status = 403, description = "Caller is not a worker")
    )
)]
#[axum::debug_handler]
pub async fn my_applications(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse> {
    user.require_worker()?;
    let applications = state.job_service.list_applications_for_worker(user.id).await?;
    Ok(Json(applications))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job post ID")
    ),
    responses(
        (status = 200, description = "Job post detail"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let job = state.job_service.get(id).await?;
    Ok(Json(job))
}

#[utoipa::path(
    patch,
    path = "/api/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job post ID")
    ),
    request_body = UpdateJobPayload,
    responses(
        (status = 200, description = "Job post updated"),
        (status = 403, description = "Caller does not own this job"),
        (status = 409, description = "Job is no longer editable")
    )
)]
#[axum::debug_handler]
pub async fn update_job(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateJobPayload>,
) -> Result<impl IntoResponse> {
    user.require_employer()?;
    payload.validate()?;
    let job = state.job_service.update(id, &user, payload).await?;
    Ok(Json(job))
}

#[utoipa::path(
    post,
    path = "/api/jobs/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Job post ID")
    ),
    request_body = UpdateJobStatusPayload,
    responses(
        (status = 200, description = "Status changed"),
        (status = 403, description = "Caller does not own this job"),
        (status = 409, description = "Status cannot be set manually")
    )
)]
#[axum::debug_handler]
pub async fn update_job_status(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateJobStatusPayload>,
) -> Result<impl IntoResponse> {
    user.require_employer()?;
    let job = state.job_service.update_status(id, &user, payload).await?;
    Ok(Json(job))
}

#[utoipa::path(
    delete,
    path = "/api/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job post ID")
    ),
    responses(
        (status = 204, description = "Job post deleted"),
        (status = 403, description = "Caller does not own this job"),
        (status = 409, description = "Job cannot be deleted in its current state")
    )
)]
#[axum::debug_handler]
pub async fn delete_job(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    user.require_employer()?;
    state.job_service.soft_delete(id, &user).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/jobs/{id}/cancel",
    params(
        ("id" = Uuid, Path, description = "Job post ID")
    ),
    responses(
        (status = 200, description = "Job post cancelled"),
        (status = 409, description = "Job cannot be cancelled in its current state")
    )
)]
#[axum::debug_handler]
pub async fn cancel_job(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    user.require_employer()?;
    let job = state.job_service.cancel(id, &user).await?;
    Ok(Json(job))
}

#[utoipa::path(
    post,
    path = "/api/jobs/{id}/apply",
    params(
        ("id" = Uuid, Path, description = "Job post ID")
    ),
    responses(
        (status = 201, description = "Application recorded"),
        (status = 400, description = "Job not open, own job, or duplicate application"),
        (status = 403, description = "Caller is not a worker")
    )
)]
#[axum::debug_handler]
pub async fn apply_to_job(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    user.require_worker()?;
    let application = state
        .job_service
        .apply(id, &user, &state.notification_service)
        .await?;
    Ok((StatusCode::CREATED, Json(application)))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{id}/application-status",
    params(
        ("id" = Uuid, Path, description = "Job post ID")
    ),
    responses(
        (status = 200, description = "The caller's application and contract on the job"),
        (status = 404, description = "Caller has not applied to this job")
    )
)]
#[axum::debug_handler]
pub async fn application_status(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    user.require_worker()?;
    let status = state.job_service.application_status(id, &user).await?;
    Ok(Json(status))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{id}/applicants",
    params(
        ("id" = Uuid, Path, description = "Job post ID")
    ),
    responses(
        (status = 200, description = "Applicants with their contract state"),
        (status = 403, description = "Caller does not own this job")
    )
)]
#[axum::debug_handler]
pub async fn list_applicants(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    user.require_employer()?;
    let applicants = state.job_service.list_applicants(id, &user).await?;
    Ok(Json(applicants))
}

#[utoipa::path(
    post,
    path = "/api/jobs/{id}/applications/{application_id}/reject",
    params(
        ("id" = Uuid, Path, description = "Job post ID"),
        ("application_id" = Uuid, Path, description = "Application ID")
    ),
    responses(
        (status = 200, description = "Application rejected"),
        (status = 400, description = "Application already decided"),
        (status = 403, description = "Caller does not own this job")
    )
)]
#[axum::debug_handler]
pub async fn reject_application(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path((id, application_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse> {
    user.require_employer()?;
    let application = state
        .job_service
        .reject_application(id, application_id, &user, &state.notification_service)
        .await?;
    Ok(Json(application))
}

#[utoipa::path(
    post,
    path = "/api/jobs/{id}/start",
    params(
        ("id" = Uuid, Path, description = "Job post ID")
    ),
    request_body = StartJobPayload,
    responses(
        (status = 200, description = "Job started with the selected applicants"),
        (status = 400, description = "Selection does not fill the job exactly"),
        (status = 409, description = "Job is not open")
    )
)]
#[axum::debug_handler]
pub async fn start_job(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StartJobPayload>,
) -> Result<impl IntoResponse> {
    user.require_employer()?;
    payload.validate()?;
    let job = state
        .job_service
        .start_job(id, &user, payload, &state.notification_service)
        .await?;
    Ok(Json(job))
}

#[utoipa::path(
    post,
    path = "/api/jobs/{id}/submit-completion",
    params(
        ("id" = Uuid, Path, description = "Job post ID")
    ),
    request_body = SubmitCompletionPayload,
    responses(
        (status = 200, description = "Completion submitted for approval"),
        (status = 400, description = "Long-term job or no active contract"),
        (status = 403, description = "Caller is not a worker")
    )
)]
#[axum::debug_handler]
pub async fn submit_completion(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SubmitCompletionPayload>,
) -> Result<impl IntoResponse> {
    user.require_worker()?;
    let contract = state
        .job_service
        .submit_completion(id, &user, payload, &state.notification_service)
        .await?;
    Ok(Json(contract))
}

#[utoipa::path(
    post,
    path = "/api/jobs/{id}/approve-completion",
    params(
        ("id" = Uuid, Path, description = "Job post ID")
    ),
    request_body = ApproveCompletionPayload,
    responses(
        (status = 200, description = "Completion approved"),
        (status = 400, description = "No completions awaiting approval"),
        (status = 409, description = "Job has no completion to approve")
    )
)]
#[axum::debug_handler]
pub async fn approve_completion(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApproveCompletionPayload>,
) -> Result<impl IntoResponse> {
    user.require_employer()?;
    let job = state
        .job_service
        .approve_completion(id, &user, payload, &state.notification_service)
        .await?;
    Ok(Json(job))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{id}/completion-details",
    params(
        ("id" = Uuid, Path, description = "Job post ID")
    ),
    responses(
        (status = 200, description = "Per-contract completion breakdown"),
        (status = 403, description = "Caller does not own this job")
    )
)]
#[axum::debug_handler]
pub async fn completion_details(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    user.require_employer()?;
    let details = state.job_service.completion_details(id, &user).await?;
    Ok(Json(details))
}

#[utoipa::path(
    post,
    path = "/api/jobs/{id}/cancel-recurring",
    params(
        ("id" = Uuid, Path, description = "Job post ID")
    ),
    request_body = CancelRecurringPayload,
    responses(
        (status = 200, description = "Recurring schedule stopped"),
        (status = 400, description = "Job is not a recurring service"),
        (status = 403, description = "Caller is neither the employer nor a contracted worker")
    )
)]
#[axum::debug_handler]
pub async fn cancel_recurring(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CancelRecurringPayload>,
) -> Result<impl IntoResponse> {
    let job = state
        .job_service
        .cancel_recurring(id, &user, payload, &state.notification_service)
        .await?;
    Ok(Json(job))
}
