//! REST API handlers
//!
//! Every response body is `{"message": ...}`; errors go through
//! `MixerError`'s `IntoResponse` with the same shape.

use axum::extract::rejection::FormRejection;
use axum::extract::{Form, State};
use axum::response::Json;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use shared::{ProcessId, process_info, process_warn};

use crate::error::{MixerError, MixerResult};
use crate::traits::{MediaLibrary, MixerControl};

/// Service context injected into every handler
pub struct AppContext<M, L> {
    pub mixer: Arc<M>,
    pub library: Arc<L>,
}

impl<M, L> AppContext<M, L> {
    pub fn new(mixer: Arc<M>, library: Arc<L>) -> Self {
        Self { mixer, library }
    }
}

impl<M, L> Clone for AppContext<M, L> {
    fn clone(&self) -> Self {
        Self {
            mixer: self.mixer.clone(),
            library: self.library.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddSongForm {
    pub filename: Option<String>,
}

/// List songs endpoint - GET /v1/mixer/getSongs
pub async fn get_songs<M, L>(State(ctx): State<AppContext<M, L>>) -> MixerResult<Json<Value>>
where
    M: MixerControl + 'static,
    L: MediaLibrary + 'static,
{
    let songs = ctx.library.list_songs().await.inspect_err(|e| {
        process_warn!(ProcessId::current(), "Song listing failed: {}", e);
    })?;

    Ok(Json(json!({ "message": songs })))
}

/// Queue a song endpoint - POST /v1/mixer/addSong
pub async fn add_song<M, L>(
    State(ctx): State<AppContext<M, L>>,
    form: Result<Form<AddSongForm>, FormRejection>,
) -> MixerResult<Json<Value>>
where
    M: MixerControl + 'static,
    L: MediaLibrary + 'static,
{
    let filename = form
        .ok()
        .and_then(|Form(form)| form.filename)
        .filter(|name| !name.trim().is_empty())
        .ok_or(MixerError::MissingFilename)?;

    ctx.mixer.submit(&filename).await.inspect_err(|e| {
        process_warn!(ProcessId::current(), "Could not queue '{}': {}", filename, e);
    })?;

    process_info!(ProcessId::current(), "🎵 Queued song: {}", filename);
    Ok(Json(json!({ "message": "OK" })))
}

/// Current status endpoint - GET /v1/mixer/status
pub async fn get_status<M, L>(State(ctx): State<AppContext<M, L>>) -> Json<Value>
where
    M: MixerControl + 'static,
    L: MediaLibrary + 'static,
{
    Json(json!({ "message": ctx.mixer.status().await }))
}
