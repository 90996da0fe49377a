// Endpoint handlers
// Each returns its payload or a HandlerError; the caller maps errors to 500

use hyper::body::{Body, Bytes};
use hyper::Request;

use super::body::{read_json, receive_upload, BoxError};
use super::error::HandlerError;
use super::types::{
    EmotionEstimate, Suggestion, SuggestionRequest, TrainingAck, TrainingRequest, SUGGESTIONS,
};
use crate::config::AppState;
use crate::logger;

/// `POST /analyze-audio`
///
/// No analysis is performed yet; the received file is only staged and
/// removed again before the estimate is returned.
pub async fn analyze_audio<B>(
    req: Request<B>,
    state: &AppState,
) -> Result<EmotionEstimate, HandlerError>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    let upload = receive_upload(req, state).await?;

    let estimate = EmotionEstimate::PLACEHOLDER;
    debug_assert!(estimate.is_normalized());

    if let Some(file) = upload {
        logger::log_debug(&format!("[ANALYZE] Received {} bytes of audio", file.size()));
        file.discard().await?;
    }

    Ok(estimate)
}

/// `POST /train-model`
pub async fn train_model<B>(req: Request<B>, state: &AppState) -> Result<TrainingAck, HandlerError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let training: TrainingRequest = read_json(req, state.config.http.max_body_size).await?;

    logger::log_debug(&format!(
        "[TRAIN] user={} responses={} emotions={}",
        training.user_id.map_or_else(|| "-".to_string(), |v| v.to_string()),
        training.responses.is_some(),
        training.emotions.is_some(),
    ));

    Ok(TrainingAck::UPDATED)
}

/// `POST /get-suggestions`
pub async fn get_suggestions<B>(
    req: Request<B>,
    state: &AppState,
) -> Result<&'static [Suggestion], HandlerError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let request: SuggestionRequest = read_json(req, state.config.http.max_body_size).await?;

    logger::log_debug(&format!(
        "[SUGGEST] emotional_state={} history={}",
        request.emotional_state.is_some(),
        request.history.is_some(),
    ));

    Ok(SUGGESTIONS)
}
