//! HTTP routes and handlers for the prediction service.
//!
//! Three endpoints sit in front of the inference engine:
//!
//! * `GET /health` — liveness probe reporting the loaded model dimensions.
//! * `GET /api/model/features` — vocabulary and severity table introspection.
//! * `POST /api/model/predict` — ranked disease candidates for a symptom list.
//!
//! The engine is immutable, so handlers share it read-only through
//! [`AppState`]; no per-request locking exists anywhere on this path.

use axum::extract::State;
use axum::http::Method;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use healthinsight_core::{FeatureCatalog, PredictRequest, PredictionReport, ServerConfig};
use healthinsight_model::SymptomAnalyzer;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::debug;

/// Shared application state, built once at startup.
pub struct AppState {
    /// The loaded inference engine.
    pub analyzer: SymptomAnalyzer,
    /// Service configuration.
    pub config: ServerConfig,
}

/// Build the axum [`Router`] with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    let allow_any_origin = state.config.cors.allow_any_origin;
    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/api/model/features", get(features_handler))
        .route("/api/model/predict", post(predict_handler))
        .with_state(state);

    if allow_any_origin {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any);
        router.layer(cors)
    } else {
        router
    }
}

/// `GET /health` — liveness probe.
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "healthinsight-server",
        "model": {
            "classes": state.analyzer.model().n_classes(),
            "features": state.analyzer.vocabulary().len(),
        },
    }))
}

/// `GET /api/model/features` — the frozen vocabulary and severity table.
pub async fn features_handler(State(state): State<Arc<AppState>>) -> Json<FeatureCatalog> {
    Json(state.analyzer.features())
}

/// `POST /api/model/predict` — rank candidate diseases for the reported
/// symptoms.
///
/// A missing `topK` falls back to the configured default; malformed bodies
/// are rejected by the JSON extractor before this handler runs.
pub async fn predict_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PredictRequest>,
) -> Json<PredictionReport> {
    let top_k = request.top_k.unwrap_or(state.config.default_top_k);
    debug!(
        symptom_count = request.symptoms.len(),
        top_k, "prediction requested"
    );
    Json(state.analyzer.predict(&request.symptoms, top_k))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use healthinsight_core::TrainingExample;
    use healthinsight_model::{MetadataStore, NaiveBayesModel, SymptomVocabulary, DEFAULT_ALPHA};
    use tower::ServiceExt;

    /// Train a two-disease fixture engine in memory.
    fn fixture_analyzer() -> SymptomAnalyzer {
        let examples = vec![
            TrainingExample::new(
                "Fungal infection".to_string(),
                vec!["itching".to_string(), "skin_rash".to_string()],
            ),
            TrainingExample::new(
                "Fungal infection".to_string(),
                vec!["itching".to_string(), "skin_rash".to_string()],
            ),
            TrainingExample::new(
                "Fungal infection".to_string(),
                vec!["itching".to_string(), "skin_rash".to_string()],
            ),
            TrainingExample::new(
                "Fungal infection".to_string(),
                vec!["itching".to_string(), "skin_rash".to_string()],
            ),
            TrainingExample::new("Common Cold".to_string(), vec!["fatigue".to_string()]),
            TrainingExample::new("Common Cold".to_string(), vec!["fatigue".to_string()]),
        ];
        let vocabulary = SymptomVocabulary::from_examples(&examples);
        let matrix: Vec<Vec<f64>> = examples
            .iter()
            .map(|e| vocabulary.encode(&e.symptoms))
            .collect();
        let labels: Vec<String> = examples.iter().map(|e| e.disease.clone()).collect();
        let model = NaiveBayesModel::fit(&matrix, &labels, DEFAULT_ALPHA).unwrap();

        let mut metadata = MetadataStore::new();
        metadata.set_description(
            "Fungal infection".to_string(),
            "A common fungal condition.".to_string(),
        );
        metadata.set_precautions(
            "Fungal infection".to_string(),
            vec!["keep the area dry".to_string()],
        );
        metadata.set_symptom_weight("itching".to_string(), 1);
        metadata.set_symptom_weight("fatigue".to_string(), 4);

        SymptomAnalyzer::new(vocabulary, model, metadata).unwrap()
    }

    fn test_app() -> Router {
        test_app_with_config(ServerConfig::default())
    }

    fn test_app_with_config(config: ServerConfig) -> Router {
        let state = Arc::new(AppState {
            analyzer: fixture_analyzer(),
            config,
        });
        build_router(state)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn post_predict(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/model/predict")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = test_app();
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["service"], "healthinsight-server");
        assert_eq!(json["model"]["classes"], 2);
        assert_eq!(json["model"]["features"], 3);
    }

    #[tokio::test]
    async fn test_features_endpoint() {
        let app = test_app();
        let req = Request::builder()
            .uri("/api/model/features")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(
            json["features"],
            serde_json::json!(["fatigue", "itching", "skin_rash"])
        );
        assert_eq!(json["symptom_meta"]["itching"], 1);
        assert_eq!(json["symptom_meta"]["fatigue"], 4);
    }

    #[tokio::test]
    async fn test_predict_endpoint() {
        let app = test_app();
        let response = app
            .oneshot(post_predict(
                r#"{"symptoms":["itching","skin_rash"],"topK":1}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let analysis = json["analysis"].as_array().unwrap();
        assert_eq!(analysis.len(), 1);
        assert_eq!(analysis[0]["topic"], "Fungal infection");
        assert_eq!(analysis[0]["related"], "Fungal infection");
        assert_eq!(analysis[0]["warning_level"], "high");
        assert!(analysis[0]["match_score"].as_f64().unwrap() >= 0.6);
        assert_eq!(analysis[0]["description"], "A common fungal condition.");
        assert_eq!(
            analysis[0]["advice"],
            serde_json::json!(["keep the area dry"])
        );

        let focus = json["symptom_focus"].as_array().unwrap();
        assert_eq!(focus.len(), 2);
        assert_eq!(focus[0]["symptom"], "itching");
        assert_eq!(focus[0]["weight"], 1);
        assert_eq!(focus[0]["note"], "mild, monitor at home");
    }

    #[tokio::test]
    async fn test_predict_missing_top_k_uses_configured_default() {
        let config = ServerConfig {
            default_top_k: 1,
            ..ServerConfig::default()
        };
        let app = test_app_with_config(config);
        let response = app
            .oneshot(post_predict(r#"{"symptoms":["itching"]}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["analysis"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_predict_top_k_zero_returns_empty_analysis() {
        let app = test_app();
        let response = app
            .oneshot(post_predict(r#"{"symptoms":["itching"],"topK":0}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert!(json["analysis"].as_array().unwrap().is_empty());
        assert_eq!(json["symptom_focus"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_predict_truncates_top_k_to_class_count() {
        let app = test_app();
        let response = app
            .oneshot(post_predict(r#"{"symptoms":["itching"],"topK":50}"#))
            .await
            .unwrap();

        let json = body_json(response).await;
        assert_eq!(json["analysis"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_predict_unknown_symptoms_still_answers() {
        let app = test_app();
        let response = app
            .oneshot(post_predict(r#"{"symptoms":["not_a_real_symptom"],"topK":3}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let focus = json["symptom_focus"].as_array().unwrap();
        assert_eq!(focus[0]["weight"], 0);
        assert_eq!(focus[0]["note"], "mild, monitor at home");
    }

    #[tokio::test]
    async fn test_predict_rejects_malformed_bodies() {
        for body in [
            "not json at all",
            r#"{"symptoms":"oops"}"#,
            r#"{"symptoms":[1,2,3]}"#,
            r#"{"symptoms":[],"topK":-1}"#,
            r#"{}"#,
        ] {
            let app = test_app();
            let response = app.oneshot(post_predict(body)).await.unwrap();
            assert!(
                response.status().is_client_error(),
                "body {body:?} should be rejected, got {}",
                response.status()
            );
        }
    }

    #[tokio::test]
    async fn test_cors_preflight_allows_any_origin() {
        let app = test_app();
        let req = Request::builder()
            .method("OPTIONS")
            .uri("/api/model/predict")
            .header(header::ORIGIN, "http://localhost:5173")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .map(|v| v.to_str().unwrap()),
            Some("*")
        );
    }

    #[tokio::test]
    async fn test_cors_can_be_disabled() {
        let config = ServerConfig {
            cors: healthinsight_core::CorsConfig {
                allow_any_origin: false,
            },
            ..ServerConfig::default()
        };
        let app = test_app_with_config(config);
        let req = Request::builder()
            .uri("/health")
            .header(header::ORIGIN, "http://localhost:5173")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }
}
