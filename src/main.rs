use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use marketplace_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    middleware::{auth, cors, rate_limit},
    routes, AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool);

    let base_routes = Router::new().route("/health", get(routes::health::health));

    let public_api = Router::new()
        .route("/api/public/jobs", get(routes::jobs::browse_jobs))
        .route("/api/public/jobs/:id", get(routes::jobs::browse_job))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit::new_rps_state(config.public_rps),
            rate_limit::rps_middleware,
        ));

    let api = Router::new()
        .route(
            "/api/jobs",
            get(routes::jobs::list_jobs).post(routes::jobs::create_job),
        )
        .route("/api/jobs/mine", get(routes::jobs::my_jobs))
        .route(
            "/api/jobs/applications/mine",
            get(routes::jobs::my_applications),
        )
        .route(
            "/api/jobs/:id",
            get(routes::jobs::get_job)
                .patch(routes::jobs::update_job)
                .delete(routes::jobs::delete_job),
        )
        .route("/api/jobs/:id/cancel", post(routes::jobs::cancel_job))
        .route("/api/jobs/:id/status", post(routes::jobs::update_job_status))
        .route("/api/jobs/:id/apply", post(routes::jobs::apply_to_job))
        .route(
            "/api/jobs/:id/application-status",
            get(routes::jobs::application_status),
        )
        .route(
            "/api/jobs/:id/applicants",
            get(routes::jobs::list_applicants),
        )
        .route(
            "/api/jobs/:id/applications/:application_id/reject",
            post(routes::jobs::reject_application),
        )
        .route("/api/jobs/:id/start", post(routes::jobs::start_job))
        .route(
            "/api/jobs/:id/submit-completion",
            post(routes::jobs::submit_completion),
        )
        .route(
            "/api/jobs/:id/approve-completion",
            post(routes::jobs::approve_completion),
        )
        .route(
            "/api/jobs/:id/completion-details",
            get(routes::jobs::completion_details),
        )
        .route(
            "/api/jobs/:id/cancel-recurring",
            post(routes::jobs::cancel_recurring),
        )
        .route("/api/jobs/:id/check-in", post(routes::checkins::check_in))
        .route(
            "/api/jobs/:id/payments",
            get(routes::payments::job_payments),
        )
        .route(
            "/api/contracts/:contract_id/payments",
            get(routes::payments::contract_payments),
        )
        .route(
            "/api/contracts/:contract_id/record-payment",
            post(routes::payments::record_contract_payment),
        )
        .route(
            "/api/contracts/:contract_id/check-ins",
            get(routes::checkins::contract_check_ins),
        )
        .route("/api/payments/mine", get(routes::payments::my_payments))
        .route(
            "/api/payments/outgoing",
            get(routes::payments::outgoing_payments),
        )
        .route(
            "/api/payments/:schedule_id/transaction",
            get(routes::payments::payment_transaction),
        )
        .route(
            "/api/payments/:schedule_id/send",
            post(routes::payments::send_payment),
        )
        .route(
            "/api/payments/:schedule_id/confirm",
            post(routes::payments::confirm_payment),
        )
        .route(
            "/api/payments/:schedule_id/dispute",
            post(routes::payments::dispute_payment),
        )
        .route(
            "/api/direct-hires",
            post(routes::direct_hire::create_direct_hire),
        )
        .route(
            "/api/direct-hires/employer",
            get(routes::direct_hire::employer_direct_hires),
        )
        .route(
            "/api/direct-hires/worker",
            get(routes::direct_hire::worker_direct_hires),
        )
        .route(
            "/api/direct-hires/:id",
            get(routes::direct_hire::get_direct_hire),
        )
        .route(
            "/api/direct-hires/:id/accept",
            post(routes::direct_hire::accept_direct_hire),
        )
        .route(
            "/api/direct-hires/:id/reject",
            post(routes::direct_hire::reject_direct_hire),
        )
        .route(
            "/api/direct-hires/:id/cancel",
            post(routes::direct_hire::cancel_direct_hire),
        )
        .route(
            "/api/direct-hires/:id/start",
            post(routes::direct_hire::start_direct_hire),
        )
        .route(
            "/api/direct-hires/:id/submit-completion",
            post(routes::direct_hire::submit_direct_hire_completion),
        )
        .route(
            "/api/direct-hires/:id/approve-completion",
            post(routes::direct_hire::approve_direct_hire_completion),
        )
        .route(
            "/api/direct-hires/:id/submit-payment",
            post(routes::direct_hire::submit_direct_hire_payment),
        )
        .route(
            "/api/direct-hires/:id/confirm-payment",
            post(routes::direct_hire::confirm_direct_hire_payment),
        )
        .route(
            "/api/notifications",
            get(routes::notifications::list_notifications),
        )
        .route(
            "/api/notifications/unread-count",
            get(routes::notifications::unread_count),
        )
        .route(
            "/api/notifications/:id/read",
            post(routes::notifications::mark_read),
        )
        .route(
            "/api/notifications/read-all",
            post(routes::notifications::mark_all_read),
        )
        .layer(axum::middleware::from_fn(auth::require_bearer_auth))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit::new_rps_state(config.api_rps),
            rate_limit::rps_middleware,
        ));

    let app = base_routes
        .merge(public_api)
        .merge(api)
        .with_state(app_state)
        .layer(cors::permissive_cors())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024));

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
