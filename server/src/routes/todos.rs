//! Todo endpoint routes.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use listsync_engine::{ApiResponse, TodoPayload, TodoRecord};

use crate::auth::{AuthUser, Identity};
use crate::error::{AppError, Result};
use crate::handlers::{handle_create, handle_delete, handle_list, handle_update};
use crate::AppState;

/// Create todo routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/todos", get(list_handler).post(create_handler))
        .route("/todos/{id}", put(update_handler).delete(delete_handler))
}

fn payload(body: std::result::Result<Json<TodoPayload>, JsonRejection>) -> Result<TodoPayload> {
    body.map(|Json(payload)| payload)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// GET /todos - The caller's todos, newest first.
async fn list_handler(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Vec<TodoRecord>>> {
    Ok(Json(handle_list(&state, &identity).await?))
}

/// POST /todos - Create a todo.
async fn create_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    body: std::result::Result<Json<TodoPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse>)> {
    let response = handle_create(&state, &auth.user_id, payload(body)?).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// PUT /todos/{id} - Replace text and completion of a todo.
async fn update_handler(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    body: std::result::Result<Json<TodoPayload>, JsonRejection>,
) -> Result<Json<ApiResponse>> {
    Ok(Json(
        handle_update(&state, &identity, &id, payload(body)?).await?,
    ))
}

/// DELETE /todos/{id} - Delete a todo.
async fn delete_handler(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse>> {
    Ok(Json(handle_delete(&state, &identity, &id).await?))
}

#[cfg(test)]
mod tests {
    use crate::routes::testing::send;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use listsync_engine::{ApiResponse, TodoRecord};

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn anonymous_list_is_empty() {
        let request = Request::get("/todos").body(Body::empty()).unwrap();
        let (status, body): (_, Vec<TodoRecord>) = send(request).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn anonymous_create_is_unauthorized() {
        let request = json_request("POST", "/todos", r#"{"text":"Call mom"}"#);
        let (status, body): (_, ApiResponse) = send(request).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(!body.success);
        assert_eq!(body.message, "Please login to continue.");
    }

    #[tokio::test]
    async fn malformed_authorization_is_rejected() {
        let request = Request::get("/todos")
            .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
            .body(Body::empty())
            .unwrap();
        let (status, body): (_, ApiResponse) = send(request).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(!body.success);
    }

    #[tokio::test]
    async fn update_validates_before_anything_else() {
        let request = json_request("PUT", "/todos/abc", r#"{"text":"  ","isComplete":false}"#);
        let (status, body): (_, ApiResponse) = send(request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.message, "Todo is required");

        let long = format!(r#"{{"text":"{}"}}"#, "a".repeat(251));
        let (status, body): (_, ApiResponse) = send(json_request("PUT", "/todos/abc", &long)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.message, "Todo must be at most 250 characters long");
    }

    #[tokio::test]
    async fn invalid_json_uses_envelope() {
        let request = json_request("PUT", "/todos/abc", "{not json");
        let (status, body): (_, ApiResponse) = send(request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!body.success);
    }

    #[tokio::test]
    async fn anonymous_update_and_delete_find_nothing() {
        let request = json_request("PUT", "/todos/abc", r#"{"text":"Call dad"}"#);
        let (status, body): (_, ApiResponse) = send(request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.message, "Todo not found");

        let request = Request::delete("/todos/abc").body(Body::empty()).unwrap();
        let (status, body): (_, ApiResponse) = send(request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.message, "Todo not found");
    }
}
