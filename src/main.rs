use axum::{
    routing::{get, post},
    Router,
};
use lingua_backend::{
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

    let base_routes = Router::new().route("/health", get(routes::health::health));

    let api = Router::new()
        .route(
            "/api/classes",
            get(routes::classes::list_classes).post(routes::classes::create_class),
        )
        .route(
            "/api/classes/:id",
            get(routes::classes::get_class)
                .patch(routes::classes::update_class)
                .delete(routes::classes::delete_class),
        )
        .route(
            "/api/classes/:id/exams",
            get(routes::classes::list_exams_for_class),
        )
        .route(
            "/api/classes/:id/assignments",
            get(routes::classes::list_assignments_for_class),
        )
        .route("/api/exams", post(routes::classes::create_exam))
        .route(
            "/api/exams/:id",
            get(routes::classes::get_exam).delete(routes::classes::delete_exam),
        )
        .route("/api/assignments", post(routes::classes::create_assignment))
        .route(
            "/api/assignments/:id",
            get(routes::classes::get_assignment).delete(routes::classes::delete_assignment),
        )
        .route(
            "/api/quizzes",
            get(routes::quiz::list_quizzes).post(routes::quiz::create_quiz),
        )
        .route(
            "/api/quizzes/:id",
            get(routes::quiz::get_quiz)
                .patch(routes::quiz::update_quiz)
                .delete(routes::quiz::delete_quiz),
        )
        .route(
            "/api/quizzes/:id/questions",
            get(routes::quiz::list_questions).post(routes::quiz::create_question),
        )
        .route(
            "/api/quizzes/:id/questions/bulk",
            post(routes::quiz::bulk_create_questions),
        )
        .route(
            "/api/questions/:id",
            axum::routing::delete(routes::quiz::delete_question),
        )
        .route(
            "/api/questions/:id/order",
            axum::routing::patch(routes::quiz::update_question_order),
        )
        .route(
            "/api/questions/:id/options",
            post(routes::quiz::add_option).put(routes::quiz::replace_options),
        )
        .route(
            "/api/questions/:id/correct-option",
            post(routes::quiz::set_correct_option),
        )
        .route(
            "/api/options/:id",
            axum::routing::delete(routes::quiz::delete_option),
        )
        .layer(axum::middleware::from_fn_with_state(
            lingua_backend::middleware::rate_limit::new_rps_state(config.api_rps),
            lingua_backend::middleware::rate_limit::rps_middleware,
        ));

    let app = base_routes
        .merge(api)
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
