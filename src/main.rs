use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use cleit_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    routes, AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool);

    // Unauthenticated surface: listings, signup, OTP, upload signing.
    let public_api = Router::new()
        .route("/health", get(routes::health::health))
        .route("/api/jobs", get(routes::jobs::list_jobs))
        .route("/api/tests", get(routes::tests::list_tests))
        .route("/api/webinars", get(routes::webinars::list_webinars))
        .route(
            "/api/register/user",
            get(routes::register::check_availability).post(routes::register::register_user),
        )
        .route("/api/otp/send", post(routes::otp::send_otp))
        .route("/api/otp/verify", post(routes::otp::verify_otp))
        .route("/api/signresume", post(routes::upload::sign_resume_upload))
        .layer(axum::middleware::from_fn_with_state(
            cleit_backend::middleware::rate_limit::new_rps_state(config.public_rps),
            cleit_backend::middleware::rate_limit::rps_middleware,
        ));

    // Everything a signed-in student does: opportunity detail, apply,
    // register, profile.
    let student_api = Router::new()
        .route(
            "/api/jobs/:id",
            get(routes::jobs::get_job)
                .patch(routes::jobs::apply_to_job)
                .delete(routes::jobs::withdraw_application)
                .put(routes::jobs::update_application_status),
        )
        .route(
            "/api/tests/:id",
            get(routes::tests::get_test)
                .patch(routes::tests::register_for_test)
                .delete(routes::tests::deregister_from_test),
        )
        .route(
            "/api/webinars/:id",
            get(routes::webinars::get_webinar)
                .patch(routes::webinars::register_for_webinar)
                .delete(routes::webinars::deregister_from_webinar),
        )
        .route(
            "/api/user",
            get(routes::account::get_profile).patch(routes::account::update_profile),
        )
        .layer(axum::middleware::from_fn(
            cleit_backend::middleware::auth::require_student_auth,
        ))
        .layer(axum::middleware::from_fn_with_state(
            cleit_backend::middleware::rate_limit::new_rps_state(config.student_rps),
            cleit_backend::middleware::rate_limit::rps_middleware,
        ));

    let app = public_api
        .merge(student_api)
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024));

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
