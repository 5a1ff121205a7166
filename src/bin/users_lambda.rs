//! API Gateway Lambda for the users resource
//!
//! Serves the same router as the REST server behind an API Gateway proxy
//! integration (REST or HTTP API) or an ALB target.

use lambda_http::tower::ServiceExt;
use user_service::{
    config::Settings,
    logging::init_tracing,
    server::{create_router, strip_stage, AppState},
};

#[tokio::main]
async fn main() -> Result<(), lambda_http::Error> {
    let settings = Settings::load()?;
    init_tracing(&settings.log_level, settings.log_format, false)?;

    tracing::info!(
        app_name = %settings.app_name,
        version = %settings.app_version,
        store = %settings.store_backend,
        table = %settings.users_table,
        "Starting API Gateway handler"
    );

    // Built once per execution environment and reused across invocations
    let state = AppState::new(settings).await?;

    // Named stages arrive as `/{stage}/users`; route on the bare path
    let app = create_router(state).map_request(strip_stage);

    lambda_http::run(app).await
}
