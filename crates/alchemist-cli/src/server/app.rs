//! Axum application setup.

use std::future::Future;

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::cors::{Any, CorsLayer};

use super::handlers;
use super::state::ServerState;

/// Create the Axum router with all routes.
pub fn create_router(state: ServerState) -> Router {
    // CORS configuration for local development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Tables and validation
        .route("/data", get(handlers::get_data))
        .route("/errors", get(handlers::get_errors))
        .route("/upload/:entity", post(handlers::upload_table))
        .route("/edit", post(handlers::edit_cell))
        .route("/search", post(handlers::search))
        // Export
        .route("/export", post(handlers::export_all))
        .route("/export/:entity", get(handlers::export_table))
        // Rules and weights
        .route("/rules", get(handlers::get_rules).post(handlers::add_rule))
        .route("/rules/export", get(handlers::export_rules))
        .route("/weights", get(handlers::get_weights).put(handlers::put_weights))
        .route("/weights/preset/:preset", post(handlers::apply_preset))
        .route("/weights/:name", put(handlers::set_weight))
        // Session-bound fix suggestions
        .route(
            "/fixes",
            get(handlers::get_pending_fixes).post(handlers::request_fix),
        )
        .route("/fixes/apply", post(handlers::apply_fix))
        // Stateless AI contracts
        .route("/ai-error-correction", post(handlers::ai_error_correction))
        .route(
            "/ai-rule-recommendations",
            post(handlers::ai_rule_recommendations),
        )
        .route("/nl-to-rule", post(handlers::nl_to_rule));

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(state)
}

/// Start the web server, stopping when `shutdown` resolves.
pub async fn run_server<F>(
    state: ServerState,
    port: u16,
    shutdown: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_router(state);
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));

    tracing::info!(%addr, "server listening");
    println!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use alchemist::{AppState, MockProvider, Parser};

    fn samples() -> ServerState {
        ServerState::new(AppState::with_samples().unwrap(), Parser::new())
    }

    fn with_mock() -> ServerState {
        samples().with_gateway(Arc::new(MockProvider::new()))
    }

    async fn send(state: &ServerState, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = create_router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::String(String::from_utf8_lossy(&bytes).into()))
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_get_data_and_errors() {
        let state = samples();
        let (status, data) = send(&state, "GET", "/api/data", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(data["clients"].as_array().is_some_and(|c| !c.is_empty()));

        let (status, errors) = send(&state, "GET", "/api/errors", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(errors["errorCount"].is_u64());
        assert!(errors["tasks"].is_array());
    }

    #[tokio::test]
    async fn test_upload_edit_and_search() {
        let state = samples();
        let request = Request::builder()
            .method("POST")
            .uri("/api/upload/tasks?name=mine.csv")
            .body(Body::from("taskid,TaskName,Duration\nT1,A,0\nT2,B,3\n"))
            .unwrap();
        let response = create_router(state.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let (_, errors) = send(&state, "GET", "/api/errors", None).await;
        assert_eq!(errors["tasks"][0]["col"], "Duration");

        let (status, errors) = send(
            &state,
            "POST",
            "/api/edit",
            Some(json!({"entity": "tasks", "row": 0, "col": "Duration", "value": "2"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(
            errors["tasks"]
                .as_array()
                .unwrap()
                .iter()
                .all(|e| e["col"] != "Duration")
        );

        let (_, found) = send(
            &state,
            "POST",
            "/api/search",
            Some(json!({"entity": "tasks", "query": "Duration >= 3"})),
        )
        .await;
        assert_eq!(found["understood"], true);
        assert_eq!(found["hits"].as_array().unwrap().len(), 1);
        assert_eq!(found["hits"][0]["record"]["TaskID"], "T2");
    }

    #[tokio::test]
    async fn test_bad_upload_keeps_table() {
        let state = samples();
        let before = state.session.read().await.dataset().tasks.clone();

        let request = Request::builder()
            .method("POST")
            .uri("/api/upload/tasks")
            .body(Body::from(""))
            .unwrap();
        let response = create_router(state.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(state.session.read().await.dataset().tasks, before);
    }

    #[tokio::test]
    async fn test_unknown_entity_is_not_found() {
        let state = samples();
        let (status, _) = send(&state, "GET", "/api/export/projects", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_export_writes_files_to_export_dir() {
        let dir = tempfile::tempdir().unwrap();
        let state = samples().with_export_dir(dir.path().join("out"));

        let (status, body) = send(&state, "POST", "/api/export", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["files"].as_array().unwrap().len(), 4);
        for name in ["clients_cleaned.csv", "workers_cleaned.csv", "tasks_cleaned.csv", "rules.json"] {
            assert!(dir.path().join("out").join(name).exists(), "{} missing", name);
        }
    }

    #[tokio::test]
    async fn test_export_into_a_file_is_500() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let state = samples().with_export_dir(file.path());

        let (status, _) = send(&state, "POST", "/api/export", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_rules_and_weights() {
        let state = samples();
        let (status, rules) = send(
            &state,
            "POST",
            "/api/rules",
            Some(json!({"draft": {"type": "coRun", "tasks": "T1, T2"}})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(rules, json!([{"type": "coRun", "tasks": ["T1", "T2"]}]));

        let opaque = json!({"type": "custom", "note": "keep me"});
        let (_, rules) = send(&state, "POST", "/api/rules", Some(json!({"rule": opaque}))).await;
        assert_eq!(rules[1], opaque);

        let (status, _) = send(
            &state,
            "POST",
            "/api/rules",
            Some(json!({"draft": {"type": "loadLimit", "workerGroup": "", "maxSlots": "2"}})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, weights) = send(&state, "POST", "/api/weights/preset/fairDistribution", None).await;
        assert_eq!(weights["requestedTaskIDs"], 10);

        let (status, _) = send(&state, "PUT", "/api/weights/fairness", Some(json!({"value": 11}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, export) = send(&state, "GET", "/api/rules/export", None).await;
        assert_eq!(export["rules"].as_array().unwrap().len(), 2);
        assert_eq!(export["weights"]["fairness"], 4);
    }

    #[tokio::test]
    async fn test_fix_flow() {
        let state = with_mock();
        state
            .session
            .write()
            .await
            .import_csv(&Parser::new(), alchemist::EntityKind::Tasks, "t.csv", b"TaskID,TaskName,Duration\nT1,A,0\n")
            .unwrap();

        let (status, fix) = send(
            &state,
            "POST",
            "/api/fixes",
            Some(json!({"entity": "tasks", "row": 0, "col": "Duration"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fix["status"], "recorded");
        assert_eq!(fix["suggestion"], "1");

        let (_, pending) = send(&state, "GET", "/api/fixes", None).await;
        assert_eq!(pending.as_array().unwrap().len(), 1);

        let token = fix["token"].clone();
        let (status, applied) = send(&state, "POST", "/api/fixes/apply", Some(json!({"token": token}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(applied["errors"], json!([]));

        let (status, _) = send(&state, "POST", "/api/fixes/apply", Some(json!({"token": token}))).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_fix_without_gateway_is_unavailable() {
        let state = samples();
        let (status, fix) = send(
            &state,
            "POST",
            "/api/fixes",
            Some(json!({"entity": "clients", "row": 0, "col": "PriorityLevel"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fix["status"], "unavailable");
        assert_eq!(fix["suggestion"], Value::Null);
    }

    #[tokio::test]
    async fn test_ai_endpoints() {
        let state = with_mock();

        let (status, body) = send(
            &state,
            "POST",
            "/api/ai-error-correction",
            Some(json!({
                "row": 0, "col": "PriorityLevel", "value": "9",
                "message": "PriorityLevel must be between 1 and 5.",
                "rowData": {}, "entityType": "clients"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["suggestion"], "5");

        let (status, body) = send(&state, "POST", "/api/nl-to-rule", Some(json!({"text": "T1 and T3 run together"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["rule"], json!({"type": "coRun", "tasks": ["T1", "T3"]}));

        let (status, body) = send(
            &state,
            "POST",
            "/api/ai-rule-recommendations",
            Some(json!({"data": {"tasks": [{"TaskID": "T1"}, {"TaskID": "T2"}]}, "rules": []})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["aiRules"][0]["type"], "coRun");
    }

    #[tokio::test]
    async fn test_ai_failures_are_500_with_error() {
        let (status, body) = send(&samples(), "POST", "/api/nl-to-rule", Some(json!({"text": "x"}))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().is_some_and(|e| e.contains("not configured")));

        let failing = samples().with_gateway(Arc::new(MockProvider::failing()));
        let (status, body) = send(&failing, "POST", "/api/nl-to-rule", Some(json!({"text": "T1 and T2"}))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].is_string());
        assert!(failing.session.read().await.rules().is_empty());
    }
}
