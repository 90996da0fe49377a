// Request body extraction
// JSON payloads and multipart audio uploads

use http_body_util::{BodyExt, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::CONTENT_TYPE;
use hyper::Request;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::io::AsyncWriteExt;

use super::error::HandlerError;
use crate::config::AppState;
use crate::http;
use crate::logger;
use crate::upload::UploadedFile;

/// Boxed error a request body may fail with
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn content_type<B>(req: &Request<B>) -> Option<&str> {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
}

/// Parse a JSON request body
///
/// Bodies that are not `application/json`, or are blank, parse as an
/// empty request. A top-level array also yields an empty request, since
/// it carries no named fields. Any other non-object value is rejected.
pub async fn read_json<T, B>(req: Request<B>, limit: u64) -> Result<T, HandlerError>
where
    T: DeserializeOwned + Default,
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    if !http::is_media_type(content_type(&req), "application/json") {
        return Ok(T::default());
    }

    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    let bytes = Limited::new(req.into_body(), limit)
        .collect()
        .await
        .map_err(|e| HandlerError::Body(e.to_string()))?
        .to_bytes();

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    match serde_json::from_slice::<Value>(&bytes)? {
        value @ Value::Object(_) => Ok(serde_json::from_value(value)?),
        Value::Array(_) => Ok(T::default()),
        _ => Err(HandlerError::UnexpectedJson),
    }
}

/// Receive the audio upload of a multipart request, if there is one
///
/// The first file part in the configured field is streamed to the
/// staging directory. Every other part is skipped. Requests that are not
/// `multipart/form-data` carry no file.
pub async fn receive_upload<B>(
    req: Request<B>,
    state: &AppState,
) -> Result<Option<UploadedFile>, HandlerError>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    let ct = content_type(&req);
    if !http::is_media_type(ct, "multipart/form-data") {
        return Ok(None);
    }
    let boundary = multer::parse_boundary(ct.unwrap_or_default())?;

    let constraints = multer::Constraints::new()
        .size_limit(multer::SizeLimit::new().whole_stream(state.config.http.max_body_size));
    let stream = req.into_body().into_data_stream();
    let mut multipart = multer::Multipart::with_constraints(stream, boundary, constraints);

    let field_name = state.config.upload.field_name.as_str();
    let mut upload = None;

    while let Some(mut field) = multipart.next_field().await? {
        let is_audio = field.name() == Some(field_name) && field.file_name().is_some();
        if !is_audio || upload.is_some() {
            logger::log_debug(&format!(
                "[UPLOAD] Skipping multipart field {:?}",
                field.name().unwrap_or("<unnamed>")
            ));
            continue;
        }

        let (mut staged, mut file) = state.uploads.create().await?;
        while let Some(chunk) = field.chunk().await? {
            file.write_all(&chunk).await?;
            staged.record_written(chunk.len());
        }
        file.flush().await?;

        logger::log_debug(&format!(
            "[UPLOAD] Staged {:?} ({} bytes) at {}",
            field.file_name().unwrap_or_default(),
            staged.size(),
            staged.path().display()
        ));
        upload = Some(staged);
    }

    Ok(upload)
}
