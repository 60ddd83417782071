//! HTTP API: upload an image, get formatted files back.
//!
//! ## Routes
//!
//! | Method | Path | |
//! |---|---|---|
//! | `GET` | `/` | Health check, empty `200` |
//! | `POST` | `/format` | Multipart upload, see below |
//!
//! ## `POST /format`
//!
//! Multipart form fields:
//!
//! - `image` — the file to process
//! - `name` — output file name, e.g. `photo.jpg`; its extension picks the
//!   output format
//! - `options` — JSON [`Options`] document; omitted or empty means defaults
//!
//! The upload is stored as `<root>/<name stem>-original.<ext>`, then decoded,
//! run through the pipeline, and every output is written to
//! `<root>/<output name>`. The response lists where everything went:
//!
//! ```json
//! {
//!   "formatted": "uploads/photo.jpg",
//!   "original": "uploads/photo-original.jpg",
//!   "thumbnails": ["uploads/photo-small.jpg"]
//! }
//! ```
//!
//! Any failure answers `400 Bad Request` with the error message as plain
//! text. There is no partial response: if one thumbnail fails, the request
//! fails.

use crate::format::save_outputs;
use crate::imaging::{BackendError, ImageBackend, RustBackend, decode_image};
use crate::naming::derive_name;
use crate::options::Options;
use crate::pipeline::{PipelineEvent, process_image};
use axum::Json;
use axum::Router;
use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tower_http::trace::TraceLayer;

/// Suffix of the stored copy of each upload.
pub const ORIGINAL_SUFFIX: &str = "-original";

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),
    #[error("Missing form field: {0}")]
    MissingField(&'static str),
    #[error("Invalid output name: {0:?}")]
    InvalidName(String),
    #[error("Output name used more than once: {0:?}")]
    DuplicateOutput(String),
    #[error("Malformed upload: {0}")]
    Multipart(#[from] MultipartError),
    #[error("Malformed options: {0}")]
    Options(#[from] serde_json::Error),
    #[error("Image processing failed: {0}")]
    Imaging(#[from] BackendError),
    #[error("Processing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IntoResponse for ServeError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, "Request failed");
        (StatusCode::BAD_REQUEST, self.to_string()).into_response()
    }
}

/// Paths produced by one `POST /format` request, `/`-separated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormatResponse {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub formatted: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub original: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub thumbnails: Vec<String>,
}

/// Shared state for every request.
pub struct AppState<B = RustBackend> {
    pub root: PathBuf,
    pub backend: B,
}

impl AppState {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            backend: RustBackend::new(),
        }
    }
}

/// Build the API router.
pub fn router<B>(state: Arc<AppState<B>>, max_upload_bytes: usize) -> Router
where
    B: ImageBackend + Send + 'static,
{
    Router::new()
        .route("/", get(health))
        .route("/format", post(format_upload::<B>))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Make sure `root` exists and is a directory, creating it if missing.
pub fn prepare_root(root: &Path) -> Result<(), ServeError> {
    if root.exists() && !root.is_dir() {
        return Err(ServeError::NotADirectory(root.to_path_buf()));
    }
    std::fs::create_dir_all(root)?;
    Ok(())
}

/// Bind `port` on all interfaces and serve until the process is stopped.
pub async fn serve(port: u16, root: &Path, max_upload_bytes: usize) -> Result<(), ServeError> {
    prepare_root(root)?;
    tracing::info!(root = %root.display(), "Root dir ready");

    let state = Arc::new(AppState::new(root));
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state, max_upload_bytes)).await?;
    Ok(())
}

async fn health() -> StatusCode {
    StatusCode::OK
}

/// Fields collected from the multipart form.
#[derive(Default)]
struct Upload {
    image: Option<axum::body::Bytes>,
    name: Option<String>,
    options: Option<String>,
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, ServeError> {
    let mut upload = Upload::default();
    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "image" => upload.image = Some(field.bytes().await?),
            "name" => upload.name = Some(field.text().await?),
            "options" => upload.options = Some(field.text().await?),
            other => tracing::debug!(field = other, "Ignoring unknown form field"),
        }
    }
    Ok(upload)
}

/// Output names must be plain file names inside the root directory.
fn validate_name(name: &str) -> Result<(), ServeError> {
    let is_plain = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && Path::new(name).file_name().is_some_and(|f| f == name);
    if is_plain {
        Ok(())
    } else {
        Err(ServeError::InvalidName(name.to_string()))
    }
}

/// Every output, thumbnails included, must be a plain name distinct from the
/// others and from the stored original.
fn check_outputs(name: &str, original: &str, options: &Options) -> Result<(), ServeError> {
    for output in options.output_names(name) {
        validate_name(&output)?;
    }
    match options.duplicate_output(name, &[original]) {
        Some(output) => Err(ServeError::DuplicateOutput(output)),
        None => Ok(()),
    }
}

fn parse_options(raw: Option<&str>) -> Result<Options, ServeError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Options::default()),
        Some(json) => Ok(serde_json::from_str(json)?),
    }
}

/// `/`-separated path with `.` components dropped, so a root of `.` gives
/// `photo.jpg` rather than `./photo.jpg`.
fn slash_path(path: &Path) -> String {
    let cleaned: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    cleaned.to_string_lossy().replace('\\', "/")
}

#[tracing::instrument(skip(state, multipart), fields(operation = "format"))]
async fn format_upload<B>(
    State(state): State<Arc<AppState<B>>>,
    multipart: Multipart,
) -> Result<Json<FormatResponse>, ServeError>
where
    B: ImageBackend + Send + 'static,
{
    let upload = read_upload(multipart).await?;
    let name = upload.name.ok_or(ServeError::MissingField("name"))?;
    validate_name(&name)?;
    let image = upload.image.ok_or(ServeError::MissingField("image"))?;
    tracing::debug!(options = ?upload.options, "Reading options");
    let options = parse_options(upload.options.as_deref())?;
    let original_name = derive_name(&name, ORIGINAL_SUFFIX);
    check_outputs(&name, &original_name, &options)?;

    let original = state.root.join(original_name);
    tracing::info!(path = %original.display(), "Saving original");
    tokio::fs::write(&original, &image).await?;

    let response = tokio::task::spawn_blocking(move || {
        run_format(&state, &name, &image, &original, &options)
    })
    .await??;
    Ok(Json(response))
}

/// Decode the upload, run the pipeline, and write every output.
fn run_format<B: ImageBackend>(
    state: &AppState<B>,
    name: &str,
    upload: &[u8],
    original: &Path,
    options: &Options,
) -> Result<FormatResponse, ServeError> {
    let image = Arc::new(decode_image(upload)?);

    let (tx, rx) = std::sync::mpsc::channel();
    tracing::info!(name, thumbnails = options.thumbnails.len(), "Processing");
    let result = process_image(&state.backend, name, image, options, Some(tx));
    for event in rx.iter() {
        log_event(&event);
    }
    let outputs = result?;

    let saved = save_outputs(&outputs, &state.root)?;
    let mut paths = saved.iter().map(|p| slash_path(p));
    Ok(FormatResponse {
        formatted: paths.next().unwrap_or_default(),
        original: slash_path(original),
        thumbnails: paths.collect(),
    })
}

fn log_event(event: &PipelineEvent) {
    match event {
        PipelineEvent::StepApplied {
            output,
            step,
            from,
            to,
        } => tracing::debug!(
            output = %output,
            step = step.label(),
            width = to.width,
            height = to.height,
            from_width = from.width,
            from_height = from.height,
            "Step applied"
        ),
        PipelineEvent::StepSkipped { output, step } => {
            tracing::debug!(output = %output, step = step.label(), "Step skipped")
        }
        PipelineEvent::OutputReady { index, name, size } => tracing::debug!(
            index,
            name = %name,
            width = size.width,
            height = size.height,
            "Output ready"
        ),
    }
}
