use crate::error::{AppError, Result};
use crate::model::{CreateUrlRequest, CreateUrlResponse, GetUrlResponse, ShortenStatus};
use crate::state::AppState;
use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use linkhop_core::{ShortCode, ShortenOutcome};
use linkhop_redirector::RedirectOutcome;
use tracing::{debug, warn};
use url::Url;

const CREATED_MESSAGE: &str = "Your link was shortened successfully!";
const EXISTING_MESSAGE: &str = "This URL had already been shortened.";

/// JSON submission: `POST /v1/urls`.
pub async fn create_url_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateUrlRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateUrlResponse>)> {
    let Json(request) = payload?;
    shorten(&state, request).await
}

/// Form submission: `POST /` with an `original_url` field.
pub async fn submit_form_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Form<CreateUrlRequest>, FormRejection>,
) -> Result<(StatusCode, Json<CreateUrlResponse>)> {
    let Form(request) = payload?;
    shorten(&state, request).await
}

async fn shorten(
    state: &AppState,
    request: CreateUrlRequest,
) -> Result<(StatusCode, Json<CreateUrlResponse>)> {
    let original_url = request.original_url.unwrap_or_default();
    let shortened = state.shortener().shorten(&original_url).await?;

    let (status_code, status, message) = match shortened.outcome {
        ShortenOutcome::Created => (StatusCode::CREATED, ShortenStatus::Created, CREATED_MESSAGE),
        ShortenOutcome::Existing => (StatusCode::OK, ShortenStatus::Existing, EXISTING_MESSAGE),
    };

    let link = shortened.link;
    Ok((
        status_code,
        Json(CreateUrlResponse {
            short_url: state.short_url(&link),
            short_code: link.short_code.to_string(),
            original_url: link.original_url,
            status,
            message: message.to_string(),
        }),
    ))
}

/// `GET /{short_code}`: redirect to the original URL.
pub async fn redirect_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    match state.redirector().lookup(&short_code).await? {
        RedirectOutcome::Redirect(link) => {
            debug!(code = %link.short_code, "redirecting");
            let location = location_header(&link.original_url)?;
            Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
        }
        RedirectOutcome::NotFound(code) => {
            warn!(code = %code, "unknown short code requested");
            Err(AppError::short_code_not_found(&code))
        }
    }
}

/// `GET /v1/urls/{short_code}`: describe a link without redirecting.
pub async fn get_url_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<GetUrlResponse>> {
    let Ok(code) = ShortCode::new(short_code.as_str()) else {
        return Err(AppError::short_code_not_found(&short_code));
    };

    let link = state
        .shortener()
        .resolve(&code)
        .await?
        .ok_or_else(|| AppError::short_code_not_found(&short_code))?;

    Ok(Json(GetUrlResponse {
        short_url: state.short_url(&link),
        short_code: link.short_code.to_string(),
        original_url: link.original_url,
    }))
}

/// Builds a `Location` value, falling back to the parser's ASCII
/// serialization for URLs with non-ASCII characters.
fn location_header(original_url: &str) -> Result<HeaderValue> {
    if original_url.is_ascii() {
        if let Ok(value) = HeaderValue::from_str(original_url) {
            return Ok(value);
        }
    }

    let normalized = Url::parse(original_url)
        .map_err(|e| AppError::Internal(format!("stored url is malformed: {e}")))?;
    HeaderValue::from_str(normalized.as_str())
        .map_err(|e| AppError::Internal(format!("stored url is not a valid header: {e}")))
}
