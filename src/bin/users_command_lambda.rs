//! Directly invoked Lambda for user commands
//!
//! Payload: `{"command": "GET|GETALL|POST|DELETE", "userId": ..., ...}`
//! Response: `{"result": ..., "requestId": ...}`

use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use std::sync::Arc;
use user_service::{
    api::command::{handle_command, CommandResponse},
    config::Settings,
    logging::init_tracing,
    server::AppState,
    UserService,
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let settings = Settings::load()?;
    init_tracing(&settings.log_level, settings.log_format, false)?;

    tracing::info!(
        app_name = %settings.app_name,
        version = %settings.app_version,
        store = %settings.store_backend,
        table = %settings.users_table,
        "Starting command handler"
    );

    let state = AppState::new(settings).await?;
    let users = state.users.clone();

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let users = users.clone();
        async move { process(&users, event).await }
    }))
    .await
}

async fn process(users: &Arc<UserService>, event: LambdaEvent<Value>) -> Result<CommandResponse, Error> {
    let (payload, context) = event.into_parts();
    let response = handle_command(users, payload, &context.request_id).await?;
    Ok(response)
}
