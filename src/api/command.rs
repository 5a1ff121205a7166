//! Command invocation adapter
//!
//! Handles directly invoked Lambda payloads of the form
//! `{"command": "GET" | "GETALL" | "POST" | "DELETE", "userId": ..., ...}`
//! and answers with `{"result": ..., "requestId": ...}`, or
//! `{"error": ..., "requestId": ...}` when the payload or a stored record
//! cannot be (de)serialized. Store failures are returned as `Err` so the
//! runtime reports a function error.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::db::{StoreError, User};
use crate::services::{UserService, UserServiceError};

/// Operation selector carried in the payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Command {
    /// Fetch one user by `userId`
    Get,
    /// List every user
    GetAll,
    /// Create a user from the payload fields
    Post,
    /// Delete the user with `userId`
    Delete,
}

/// Invocation payload: a command plus the user fields it needs
#[derive(Debug, Clone, Deserialize)]
pub struct CommandRequest {
    pub command: Command,

    #[serde(flatten)]
    pub user: User,
}

/// What came of a command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CommandOutcome {
    Success { result: String },
    Failure { error: String },
}

/// Response envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResponse {
    #[serde(flatten)]
    pub outcome: CommandOutcome,

    /// Correlation id of the invocation
    pub request_id: String,
}

impl CommandResponse {
    pub fn success(result: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self {
            outcome: CommandOutcome::Success {
                result: result.into(),
            },
            request_id: request_id.into(),
        }
    }

    pub fn failure(error: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self {
            outcome: CommandOutcome::Failure {
                error: error.into(),
            },
            request_id: request_id.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, CommandOutcome::Success { .. })
    }
}

/// Failures that make the command unanswerable
#[derive(Debug, thiserror::Error)]
enum Rejection {
    #[error("invalid payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("{0} requires a userId")]
    MissingUserId(&'static str),

    #[error(transparent)]
    Service(UserServiceError),
}

/// Run one command payload against the user service.
///
/// Serialization problems come back as a failure envelope; store errors
/// propagate.
pub async fn handle_command(
    users: &UserService,
    payload: Value,
    request_id: &str,
) -> Result<CommandResponse, StoreError> {
    match dispatch(users, payload).await {
        Ok(result) => Ok(CommandResponse::success(result, request_id)),
        Err(Rejection::Service(UserServiceError::Store(e))) => {
            tracing::error!(request_id = %request_id, error = %e, "Store request failed");
            Err(e)
        }
        Err(rejection) => {
            tracing::error!(request_id = %request_id, error = %rejection, "Command rejected");
            Ok(CommandResponse::failure(rejection.to_string(), request_id))
        }
    }
}

async fn dispatch(users: &UserService, payload: Value) -> Result<String, Rejection> {
    let request: CommandRequest = serde_json::from_value(payload)?;
    tracing::info!(command = ?request.command, user_id = ?request.user.id(), "Processing command");

    let result = match request.command {
        Command::Get => {
            let user_id = request.user.id().ok_or(Rejection::MissingUserId("GET"))?;
            let user = users.get(user_id).await.map_err(Rejection::Service)?;
            serde_json::to_string(&user)?
        }
        Command::GetAll => {
            let all = users.find_all().await.map_err(Rejection::Service)?;
            serde_json::to_string(&all)?
        }
        Command::Post => {
            let created = users.create(request.user).await.map_err(Rejection::Service)?;
            serde_json::to_string(&created)?
        }
        Command::Delete => {
            let user_id = request.user.id().ok_or(Rejection::MissingUserId("DELETE"))?;
            users.delete(user_id).await.map_err(Rejection::Service)?
        }
    };

    Ok(result)
}
