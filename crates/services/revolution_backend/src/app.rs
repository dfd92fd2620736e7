// File: crates/services/revolution_backend/src/app.rs
use axum::{routing::get, Router};
use revolution_config::AppConfig;
use revolution_scheduling::{routes as scheduling_routes, SchedulingState};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Assembles the full application: API routes under `/api`, optional Swagger UI
/// and the static front-end as fallback.
pub fn build_app(config: &AppConfig, scheduling: Arc<SchedulingState>) -> Router {
    let api_router = Router::new()
        .route("/", get(|| async { "Welcome to the Revolution CarWash API!" }))
        .merge(revolution_common::routes())
        .merge(scheduling_routes::routes(scheduling));

    #[allow(unused_mut)] // mutated only with the openapi feature
    let mut app = Router::new().nest("/api", api_router);

    #[cfg(feature = "openapi")]
    {
        use revolution_scheduling::doc::SchedulingApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Revolution CarWash API",
                version = "0.1.0",
                description = "Appointment booking, admin board and blackout days",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            servers((url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(SchedulingApiDoc::openapi());
        info!("Adding Swagger UI at /api/docs");
        app = app.merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc));
    }

    let app = match config.static_dir.as_deref() {
        Some(dir) if !dir.trim().is_empty() => {
            info!("Serving static files from {}", dir);
            app.fallback_service(ServeDir::new(dir))
        }
        _ => app,
    };

    app.layer(TraceLayer::new_for_http())
}
