//! Request handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::Json;
use broker::ResponseType;
use playground_core::{parse_timestamp, OverlayArea, PlaygroundError};
use serde_json::{Map, Value};
use tracing::{info, instrument};

use super::error::ApiError;
use super::payload::{
    RenderedPicture, ResponseReply, ResponseRequest, SendRequest, StartReply, StartRequest,
};
use crate::state::AppState;

const INDEX_PAGE: &str =
    "<html><head><title>KID Museum: SMS Playground</title><body>It works.</body></html>";

pub async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

#[instrument(skip(state, body))]
pub async fn start_conversation(
    State(state): State<AppState>,
    Json(body): Json<StartRequest>,
) -> Result<Json<StartReply>, ApiError> {
    let not_before = parse_timestamp(&body.messages_must_be_older_than)?;
    let outcome = state
        .conversations
        .start_session(&body.keyword, not_before)
        .await?;
    Ok(Json(outcome.into()))
}

#[instrument(skip(state, body))]
pub async fn send_message(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(body): Json<SendRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .conversations
        .send_message(&code, &body.message, body.picture_url.as_deref())
        .await?;
    Ok(StatusCode::OK)
}

#[instrument(skip(state, body))]
pub async fn collect_response(
    State(state): State<AppState>,
    Path((code, response_type)): Path<(String, String)>,
    Json(body): Json<ResponseRequest>,
) -> Result<Json<ResponseReply>, ApiError> {
    let expected: ResponseType = response_type.parse()?;
    let not_before = parse_timestamp(&body.messages_must_be_older_than)?;
    let outcome = state
        .conversations
        .collect_response(&code, expected, not_before)
        .await?;
    Ok(Json(outcome.into()))
}

/// Body is `{"<area>_name": "<asset>"}`, e.g. `{"moustache_name": "walrus"}`.
#[instrument(skip(state, body))]
pub async fn add_to_picture(
    State(state): State<AppState>,
    Path((code, picture_code, area)): Path<(String, String, String)>,
    Json(body): Json<Map<String, Value>>,
) -> Result<StatusCode, ApiError> {
    state.require_picture(&code, &picture_code)?;
    let region = match area.parse::<OverlayArea>()? {
        OverlayArea::Implemented(region) => region,
        OverlayArea::Reserved(reserved) => {
            return Err(PlaygroundError::UnsupportedArea(reserved.as_str().to_string()).into())
        }
    };

    let key = format!("{area}_name");
    let asset_name = body.get(&key).and_then(Value::as_str).ok_or_else(|| {
        PlaygroundError::InvalidRequest(format!("body must contain a string `{key}`"))
    })?;

    state
        .conversations
        .pictures()
        .set_overlay(&picture_code, OverlayArea::Implemented(region), asset_name)?;
    Ok(StatusCode::OK)
}

#[instrument(skip(state))]
pub async fn render_picture(
    State(state): State<AppState>,
    Path((code, picture_code)): Path<(String, String)>,
) -> Result<Json<RenderedPicture>, ApiError> {
    let picture = state.require_picture(&code, &picture_code)?;
    let url = state.renderer.render(&picture).await?;
    info!(conversation_code = %code, picture_code = %picture_code, url = %url, "Rendered picture");
    Ok(Json(RenderedPicture { url }))
}
