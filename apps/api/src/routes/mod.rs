pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::session::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/plans", get(handlers::handle_list_plans))
        // Session API
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/draft",
            patch(handlers::handle_update_draft),
        )
        .route(
            "/api/v1/sessions/:id/optimize",
            post(handlers::handle_optimize),
        )
        .route("/api/v1/sessions/:id/revise", post(handlers::handle_revise))
        .route(
            "/api/v1/sessions/:id/plan",
            post(handlers::handle_select_plan),
        )
        .route("/api/v1/sessions/:id/export", post(handlers::handle_export))
        .route(
            "/api/v1/sessions/:id/document",
            get(handlers::handle_document),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::session::store::SessionStore;
    use crate::testing::{
        failing_status, RecordingExporter, RecordingPayments, ScriptedGenerator, JANE_DOE_REPLY,
    };

    struct TestApp {
        router: Router,
        llm: Arc<ScriptedGenerator>,
        exporter: RecordingExporter,
    }

    impl TestApp {
        fn new(llm: ScriptedGenerator) -> Self {
            let llm = Arc::new(llm);
            let exporter = RecordingExporter::default();
            let state = AppState {
                sessions: SessionStore::default(),
                llm: llm.clone(),
                payments: Arc::new(RecordingPayments::default()),
                exporter: Arc::new(exporter.clone()),
            };
            Self {
                router: build_router(state),
                llm,
                exporter,
            }
        }

        async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
            let (status, bytes) = self.send_raw(method, uri, body).await;
            let value = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap()
            };
            (status, value)
        }

        async fn send_raw(
            &self,
            method: Method,
            uri: &str,
            body: Option<Value>,
        ) -> (StatusCode, Vec<u8>) {
            let mut builder = Request::builder().method(method).uri(uri);
            let body = match body {
                Some(value) => {
                    builder = builder.header(header::CONTENT_TYPE, "application/json");
                    Body::from(value.to_string())
                }
                None => Body::empty(),
            };
            let response = self
                .router
                .clone()
                .oneshot(builder.body(body).unwrap())
                .await
                .unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            (status, bytes.to_vec())
        }

        async fn new_session(&self) -> String {
            let (status, body) = self.send(Method::POST, "/api/v1/sessions", None).await;
            assert_eq!(status, StatusCode::CREATED);
            body["id"].as_str().unwrap().to_string()
        }

        async fn fill_jane_doe(&self, id: &str) {
            let (status, _) = self
                .send(
                    Method::PATCH,
                    &format!("/api/v1/sessions/{id}/draft"),
                    Some(json!({"fields": {
                        "name": "Jane Doe",
                        "experience": "Engineer at Acme (2019-2023)"
                    }})),
                )
                .await;
            assert_eq!(status, StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn test_health() {
        let app = TestApp::new(ScriptedGenerator::default());
        let (status, body) = app.send(Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_plans_are_listed_in_catalog_order() {
        let app = TestApp::new(ScriptedGenerator::default());
        let (status, body) = app.send(Method::GET, "/api/v1/plans", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["plans"][0]["id"], "basic");
        assert_eq!(body["plans"][1]["id"], "pro");
        assert_eq!(body["plans"][1]["recommended"], true);
    }

    #[tokio::test]
    async fn test_draft_patch_applies_every_named_field() {
        let app = TestApp::new(ScriptedGenerator::default());
        let id = app.new_session().await;
        app.fill_jane_doe(&id).await;

        let (status, body) = app
            .send(
                Method::PATCH,
                &format!("/api/v1/sessions/{id}/draft"),
                Some(json!({"fields": {
                    "jobDescription": "Rust role",
                    "skills": "Go, SQL",
                    "email": "jane@example.com"
                }})),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["draft"]["jobDescription"], "Rust role");
        assert_eq!(body["draft"]["skills"], "Go, SQL");
        assert_eq!(body["draft"]["email"], "jane@example.com");
        assert_eq!(body["draft"]["name"], "Jane Doe");
        assert_eq!(body["draft"]["phone"], "");
    }

    #[tokio::test]
    async fn test_full_flow_to_printable_document() {
        let app = TestApp::new(ScriptedGenerator::replying(&[JANE_DOE_REPLY]));
        let id = app.new_session().await;
        app.fill_jane_doe(&id).await;

        let (status, body) = app
            .send(Method::POST, &format!("/api/v1/sessions/{id}/optimize"), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["view"], "preview");
        assert_eq!(body["ats_score"], 82);
        assert_eq!(body["result"]["skills"], json!(["Go", "SQL"]));

        let (status, body) = app
            .send(
                Method::POST,
                &format!("/api/v1/sessions/{id}/plan"),
                Some(json!({"plan_id": "pro"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["view"], "final");
        assert_eq!(body["selected_plan"], "pro");
        assert_eq!(app.llm.calls(), 1);

        let (status, body) = app
            .send(Method::POST, &format!("/api/v1/sessions/{id}/export"), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["exported"], true);
        assert_eq!(app.exporter.documents.lock().unwrap().len(), 1);

        let (status, page) = app
            .send_raw(Method::GET, &format!("/api/v1/sessions/{id}/document"), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        let page = String::from_utf8(page).unwrap();
        assert!(page.contains("<title>Jane Doe - Resume</title>"));
    }

    #[tokio::test]
    async fn test_optimize_without_required_fields_is_400() {
        let app = TestApp::new(ScriptedGenerator::replying(&[JANE_DOE_REPLY]));
        let id = app.new_session().await;

        let (status, body) = app
            .send(Method::POST, &format!("/api/v1/sessions/{id}/optimize"), None)
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(app.llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_is_502_and_session_back_in_input() {
        let app = TestApp::new(ScriptedGenerator::new(vec![failing_status(500)]));
        let id = app.new_session().await;
        app.fill_jane_doe(&id).await;

        let (status, body) = app
            .send(Method::POST, &format!("/api/v1/sessions/{id}/optimize"), None)
            .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "OPTIMIZATION_ERROR");
        assert_eq!(
            body["error"]["message"],
            "Optimization failed. Please try again."
        );

        let (_, session) = app
            .send(Method::GET, &format!("/api/v1/sessions/{id}"), None)
            .await;
        assert_eq!(session["view"], "input");
        assert_eq!(session["draft"]["name"], "Jane Doe");
        assert!(session["result"].is_null());
    }

    #[tokio::test]
    async fn test_plan_before_preview_is_409() {
        let app = TestApp::new(ScriptedGenerator::default());
        let id = app.new_session().await;

        let (status, body) = app
            .send(
                Method::POST,
                &format!("/api/v1/sessions/{id}/plan"),
                Some(json!({"plan_id": "basic"})),
            )
            .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "INVALID_TRANSITION");
    }

    #[tokio::test]
    async fn test_unknown_plan_is_404() {
        let app = TestApp::new(ScriptedGenerator::replying(&[JANE_DOE_REPLY]));
        let id = app.new_session().await;
        app.fill_jane_doe(&id).await;
        app.send(Method::POST, &format!("/api/v1/sessions/{id}/optimize"), None)
            .await;

        let (status, body) = app
            .send(
                Method::POST,
                &format!("/api/v1/sessions/{id}/plan"),
                Some(json!({"plan_id": "enterprise"})),
            )
            .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "PLAN_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_unknown_session_is_404() {
        let app = TestApp::new(ScriptedGenerator::default());
        let (status, body) = app
            .send(
                Method::GET,
                "/api/v1/sessions/00000000-0000-0000-0000-000000000000",
                None,
            )
            .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_delete_session() {
        let app = TestApp::new(ScriptedGenerator::default());
        let id = app.new_session().await;

        let (status, _) = app
            .send(Method::DELETE, &format!("/api/v1/sessions/{id}"), None)
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = app
            .send(Method::GET, &format!("/api/v1/sessions/{id}"), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_revise_returns_to_input_with_result_kept() {
        let app = TestApp::new(ScriptedGenerator::replying(&[JANE_DOE_REPLY]));
        let id = app.new_session().await;
        app.fill_jane_doe(&id).await;
        app.send(Method::POST, &format!("/api/v1/sessions/{id}/optimize"), None)
            .await;

        let (status, body) = app
            .send(Method::POST, &format!("/api/v1/sessions/{id}/revise"), None)
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["view"], "input");
        assert_eq!(body["ats_score"], 82);
    }
}
