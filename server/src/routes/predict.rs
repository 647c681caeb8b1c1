//! Prediction endpoint.
//!
//! `POST /predict` accepts a multipart upload with a `file` field and,
//! in quiz mode, a `quizWord` text field. The pipeline per request is
//! strictly linear: decode, preprocess, forward pass, format, respond.
//! Any failure is logged with request context and mapped through
//! [`ApiError`]; no partial response is ever produced.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::{Multipart, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::Serialize;
use tracing::{error, info, warn};

use sketch_core::types::Prediction;

use crate::error::ApiError;
use crate::state::SharedState;

/// Classification response: top-K predictions plus an optional echo of
/// the uploaded image as a data URI.
#[derive(Debug, Serialize)]
pub struct PredictionsResponse {
    pub predictions: Vec<Prediction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// POST /predict - classify an uploaded sketch
pub async fn predict(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut file_bytes: Option<Vec<u8>> = None;
    let mut quiz_word: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart body: {}", e)))?
    {
        match field.name() {
            Some("file") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("failed to read file field: {}", e)))?;
                file_bytes = Some(bytes.to_vec());
            }
            Some("quizWord") => {
                let text = field.text().await.map_err(|e| {
                    ApiError::BadRequest(format!("failed to read quizWord field: {}", e))
                })?;
                quiz_word = Some(text);
            }
            _ => {}
        }
    }

    let bytes =
        file_bytes.ok_or_else(|| ApiError::BadRequest("missing form field: file".to_string()))?;

    if let Some(dir) = &state.options.upload_dir {
        dump_upload(dir, &bytes).await;
    }

    if state.options.quiz_mode {
        let word = quiz_word
            .ok_or_else(|| ApiError::BadRequest("missing form field: quizWord".to_string()))?;

        let verdict = state.predictor.quiz(&bytes, &word).map_err(|e| {
            error!(error = %e, quiz_word = %word, upload_bytes = bytes.len(), "quiz round failed");
            ApiError::from(e)
        })?;

        info!(result = %verdict.result, correct = verdict.correct, "quiz round answered");
        Ok(Json(verdict).into_response())
    } else {
        let predictions = state.predictor.predict(&bytes).map_err(|e| {
            error!(error = %e, upload_bytes = bytes.len(), "prediction failed");
            ApiError::from(e)
        })?;

        if let Some(top) = predictions.first() {
            info!(class = %top.label, probability = top.probability, "prediction served");
        }

        let image = state
            .options
            .echo_image
            .then(|| format!("data:image/png;base64,{}", BASE64.encode(&bytes)));

        Ok(Json(PredictionsResponse { predictions, image }).into_response())
    }
}

/// Copy the raw upload to disk. Debug aid only; never fails the request.
async fn dump_upload(dir: &Path, bytes: &[u8]) {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let path = dir.join(format!("upload-{}.png", stamp));

    if let Err(e) = tokio::fs::write(&path, bytes).await {
        warn!(error = %e, path = %path.display(), "failed to save upload");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_shape() {
        let response = PredictionsResponse {
            predictions: vec![Prediction {
                label: "apple".to_string(),
                probability: 0.8123,
            }],
            image: None,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["predictions"][0]["class"], "apple");
        // The image field disappears entirely when echoing is off
        assert!(json.get("image").is_none());
    }

    #[test]
    fn test_response_with_image_echo() {
        let response = PredictionsResponse {
            predictions: Vec::new(),
            image: Some(format!("data:image/png;base64,{}", BASE64.encode(b"png"))),
        };

        let json = serde_json::to_value(&response).unwrap();
        let uri = json["image"].as_str().unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
    }
}
