// API module entry
// Emotion analysis, model training and suggestion endpoints

mod body;
mod error;
mod handlers;
mod types;

use hyper::body::{Body, Bytes};
use hyper::{Request, Response, StatusCode};
use http_body_util::Full;
use serde::Serialize;

use crate::config::AppState;
use crate::http;
use crate::logger;

pub use body::BoxError;
use error::HandlerError;
use types::ErrorBody;

/// The routes served by this API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    AnalyzeAudio,
    TrainModel,
    GetSuggestions,
}

impl Endpoint {
    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            "/analyze-audio" => Some(Self::AnalyzeAudio),
            "/train-model" => Some(Self::TrainModel),
            "/get-suggestions" => Some(Self::GetSuggestions),
            _ => None,
        }
    }

    pub const fn path(self) -> &'static str {
        match self {
            Self::AnalyzeAudio => "/analyze-audio",
            Self::TrainModel => "/train-model",
            Self::GetSuggestions => "/get-suggestions",
        }
    }

    /// Message sent to the client for any failure of this endpoint
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::AnalyzeAudio => "Audio analysis failed",
            Self::TrainModel => "Model training failed",
            Self::GetSuggestions => "Failed to get suggestions",
        }
    }
}

/// Run the endpoint's handler and turn its result into a response
///
/// Failures are logged here and never escape: the client gets a 500 with
/// the endpoint's fixed message, whatever the cause.
pub async fn handle<B>(endpoint: Endpoint, req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    match endpoint {
        Endpoint::AnalyzeAudio => respond(endpoint, handlers::analyze_audio(req, state).await),
        Endpoint::TrainModel => respond(endpoint, handlers::train_model(req, state).await),
        Endpoint::GetSuggestions => respond(endpoint, handlers::get_suggestions(req, state).await),
    }
}

fn respond<T: Serialize>(endpoint: Endpoint, result: Result<T, HandlerError>) -> Response<Full<Bytes>> {
    match result {
        Ok(payload) => http::json_response(StatusCode::OK, &payload),
        Err(e) => {
            logger::log_handler_error(endpoint.path(), &e);
            http::json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &ErrorBody {
                    error: endpoint.failure_message(),
                },
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use http_body_util::BodyExt;
    use std::sync::Arc;

    fn state() -> (Arc<AppState>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.upload.dir = dir.path().to_string_lossy().into_owned();
        (AppState::new(config).unwrap(), dir)
    }

    async fn call(endpoint: Endpoint, content_type: &str, body: &'static str) -> (StatusCode, serde_json::Value) {
        let (state, _dir) = state();
        let req = Request::post(endpoint.path())
            .header("content-type", content_type)
            .body(Full::new(Bytes::from(body)))
            .unwrap();
        let resp = handle(endpoint, req, &state).await;
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_endpoint_paths_round_trip() {
        for endpoint in [Endpoint::AnalyzeAudio, Endpoint::TrainModel, Endpoint::GetSuggestions] {
            assert_eq!(Endpoint::from_path(endpoint.path()), Some(endpoint));
        }
        assert_eq!(Endpoint::from_path("/analyze-audio/"), None);
    }

    #[tokio::test]
    async fn test_analyze_without_file_returns_placeholder() {
        let (status, body) = call(Endpoint::AnalyzeAudio, "application/json", "{}").await;
        assert_eq!(status, StatusCode::OK);
        for key in ["stress", "anxiety", "mood", "energy"] {
            assert_eq!(body[key], 0.5, "{key}");
        }
        assert_eq!(body["emotions"]["happy"], 0.3);
    }

    #[tokio::test]
    async fn test_malformed_multipart_maps_to_500() {
        let (status, body) = call(
            Endpoint::AnalyzeAudio,
            "multipart/form-data; boundary=xyz",
            "--xyz\r\nContent-Disposition: form-data; name=\"audio\"; filename=\"a.wav\"\r\n\r\ncut",
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({ "error": "Audio analysis failed" }));
    }

    #[tokio::test]
    async fn test_train_model_ack() {
        let (status, body) = call(
            Endpoint::TrainModel,
            "application/json",
            r#"{"userId":"u1","responses":[],"emotions":{}}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({ "success": true, "message": "Model updated" }));
    }

    #[tokio::test]
    async fn test_train_model_malformed_json_maps_to_500() {
        let (status, body) = call(Endpoint::TrainModel, "application/json", "{not json").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({ "error": "Model training failed" }));
    }

    #[tokio::test]
    async fn test_get_suggestions_failure_message() {
        let (status, body) = call(Endpoint::GetSuggestions, "application/json", "[").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({ "error": "Failed to get suggestions" }));
    }

    #[tokio::test]
    async fn test_get_suggestions_single_item() {
        let (status, body) = call(Endpoint::GetSuggestions, "application/json", "{}").await;
        assert_eq!(status, StatusCode::OK);
        let items = body.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["id"], "1");
        assert_eq!(items[0]["difficulty"], "medium");
    }
}
