//! API Gateway stage handling
//!
//! `lambda_http` prefixes the request path with the API Gateway stage name
//! (`/Prod/users`), while the router only knows `/users`. The raw path from
//! the event carries no stage and is routed instead.

use axum::http::{uri::PathAndQuery, Uri};
use lambda_http::{Request, RequestExt};

/// Replace the staged request path with the event's raw path.
///
/// Requests whose raw path is empty or already equal to the URI path pass
/// through untouched. The query string is kept.
pub fn strip_stage(mut request: Request) -> Request {
    if let Some(uri) = unstaged_uri(&request) {
        tracing::trace!(uri = %uri, "Stripped API Gateway stage");
        *request.uri_mut() = uri;
    }
    request
}

fn unstaged_uri(request: &Request) -> Option<Uri> {
    let raw_path = request.raw_http_path();
    let uri = request.uri();
    if raw_path.is_empty() || raw_path == uri.path() {
        return None;
    }

    let path_and_query = match uri.query() {
        Some(query) => format!("{}?{}", raw_path, query),
        None => raw_path.to_string(),
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query.parse::<PathAndQuery>().ok()?);
    Uri::from_parts(parts).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::routes::create_router;
    use crate::server::state::test_support::memory_state;
    use axum::{
        body::to_bytes,
        http::{Request as HttpRequest, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    /// REST API (v1) proxy event as API Gateway sends it for a named stage
    fn rest_api_event(stage: &str, path: &str, user_id: Option<&str>) -> Request {
        let (single, multi) = match user_id {
            Some(id) => (json!({ "userId": id }), json!({ "userId": [id] })),
            None => (Value::Null, Value::Null),
        };

        let event = json!({
            "resource": "/users",
            "path": path,
            "httpMethod": "GET",
            "headers": { "Host": "abc123.execute-api.us-east-1.amazonaws.com" },
            "multiValueHeaders": { "Host": ["abc123.execute-api.us-east-1.amazonaws.com"] },
            "queryStringParameters": single,
            "multiValueQueryStringParameters": multi,
            "pathParameters": null,
            "stageVariables": null,
            "requestContext": {
                "accountId": "123456789012",
                "resourceId": "abc123",
                "stage": stage,
                "requestId": "c6af9ac6-7b61-11e6-9a41-93e8deadbeef",
                "identity": { "sourceIp": "127.0.0.1", "userAgent": "curl/8.0" },
                "resourcePath": "/users",
                "httpMethod": "GET",
                "apiId": "abc123",
                "path": format!("/{}{}", stage, path)
            },
            "body": null,
            "isBase64Encoded": false
        });

        lambda_http::request::from_str(&event.to_string()).unwrap()
    }

    async fn call(request: Request) -> (StatusCode, Value) {
        let response = create_router(memory_state())
            .map_request(strip_stage)
            .oneshot(request)
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_named_stage_is_removed_from_path() {
        let request = rest_api_event("Prod", "/users", None);
        assert_eq!(request.uri().path(), "/Prod/users");

        let request = strip_stage(request);
        assert_eq!(request.uri().path(), "/users");
    }

    #[test]
    fn test_query_survives_stage_removal() {
        let request = strip_stage(rest_api_event("Prod", "/users", Some("u-1")));

        assert_eq!(request.uri().path(), "/users");
        assert_eq!(request.uri().query(), Some("userId=u-1"));
    }

    #[test]
    fn test_request_without_raw_path_is_untouched() {
        let request = HttpRequest::builder()
            .uri("https://abc123.execute-api.us-east-1.amazonaws.com/users/u-1")
            .body(lambda_http::Body::Empty)
            .unwrap();

        assert_eq!(strip_stage(request).uri().path(), "/users/u-1");
    }

    #[test]
    fn test_raw_path_keeps_authority() {
        let request = HttpRequest::builder()
            .uri("https://abc123.execute-api.us-east-1.amazonaws.com/Prod/users/u-1")
            .body(lambda_http::Body::Empty)
            .unwrap()
            .with_raw_http_path("/users/u-1");

        let request = strip_stage(request);
        assert_eq!(request.uri().path(), "/users/u-1");
        assert_eq!(
            request.uri().host(),
            Some("abc123.execute-api.us-east-1.amazonaws.com")
        );
    }

    #[tokio::test]
    async fn test_staged_event_reaches_users_route() {
        let (status, body) = call(rest_api_event("Prod", "/users", None)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_staged_event_with_user_id_query() {
        let (status, body) = call(rest_api_event("Prod", "/users", Some("ghost"))).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["userId"].is_null());
    }
}
