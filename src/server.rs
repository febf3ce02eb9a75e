use std::{path::Path, sync::Arc};

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Form, FromRequest, Multipart, Request, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_http::{cors::CorsLayer, services::ServeDir};

use crate::error::SummaryError;
use crate::messages::{ChatResponse, ErrorDetail, HealthResponse};
use crate::model::TextModel;
use crate::pages::{DEFAULT_DISPLAY_NAME, Page};
use crate::service::{SummarizationRequest, SummarizationService};

/// Shared state handed to every handler.
pub struct AppState<M: TextModel> {
    pub service: SummarizationService<M>,
    pub display_name: String,
    /// Answer failed summarizations with `200 {"response": "<error>"}`
    /// instead of a 502/503 status.
    pub legacy_error_payloads: bool,
}

impl<M: TextModel> AppState<M> {
    pub fn new(service: SummarizationService<M>) -> Self {
        Self {
            service,
            display_name: DEFAULT_DISPLAY_NAME.to_string(),
            legacy_error_payloads: false,
        }
    }

    pub fn with_legacy_error_payloads(mut self, enabled: bool) -> Self {
        self.legacy_error_payloads = enabled;
        self
    }
}

/// Builds the application router.
pub fn router<M: TextModel>(state: AppState<M>, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route(Page::Index.path(), get(index::<M>))
        .route(Page::Settings.path(), get(settings::<M>))
        .route(
            Page::DefaultInstructions.path(),
            get(default_instructions::<M>),
        )
        .route(Page::Rules.path(), get(rules::<M>))
        .route("/health", get(health::<M>))
        // Image bytes are never read, so an oversized upload must reach the image check.
        .route("/chat", post(chat::<M>).layer(DefaultBodyLimit::disable()))
        .with_state(Arc::new(state))
        .nest_service("/static", ServeDir::new(static_dir.as_ref()))
        .layer(CorsLayer::permissive())
}

async fn index<M: TextModel>(State(state): State<Arc<AppState<M>>>) -> Html<String> {
    Html(Page::Index.render(&state.display_name))
}

async fn settings<M: TextModel>(State(state): State<Arc<AppState<M>>>) -> Html<String> {
    Html(Page::Settings.render(&state.display_name))
}

async fn default_instructions<M: TextModel>(
    State(state): State<Arc<AppState<M>>>,
) -> Html<String> {
    Html(Page::DefaultInstructions.render(&state.display_name))
}

async fn rules<M: TextModel>(State(state): State<Arc<AppState<M>>>) -> Html<String> {
    Html(Page::Rules.render(&state.display_name))
}

async fn health<M: TextModel>(State(state): State<Arc<AppState<M>>>) -> Json<HealthResponse> {
    let model = if state.service.is_available() {
        "available"
    } else {
        "unavailable"
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        model: model.to_string(),
    })
}

async fn chat<M: TextModel>(State(state): State<Arc<AppState<M>>>, form: ChatForm) -> Response {
    let request = SummarizationRequest {
        text: form.user_query,
        image_present: form.image_present,
    };

    match state.service.handle_request(request).await {
        Ok(summary) => (
            StatusCode::OK,
            Json(ChatResponse {
                response: summary.text,
            }),
        )
            .into_response(),
        Err(error) => ChatError {
            error,
            legacy: state.legacy_error_payloads,
        }
        .into_response(),
    }
}

/// The decoded `POST /chat` form.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ChatForm {
    pub user_query: String,
    /// True when an `image` field with a non-empty file name was sent.
    pub image_present: bool,
}

#[derive(Deserialize)]
struct UrlEncodedChatForm {
    #[serde(default)]
    user_query: String,
}

impl<S: Send + Sync> FromRequest<S> for ChatForm {
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_ascii_lowercase);

        match content_type.as_deref() {
            None => Ok(ChatForm::default()),
            Some(ct) if ct.starts_with("multipart/form-data") => {
                let multipart = Multipart::from_request(req, state)
                    .await
                    .map_err(|e| bad_form(e.body_text()))?;
                read_multipart(multipart).await
            }
            Some(ct) if ct.starts_with("application/x-www-form-urlencoded") => {
                let Form(form) = Form::<UrlEncodedChatForm>::from_request(req, state)
                    .await
                    .map_err(|e| bad_form(e.body_text()))?;
                Ok(ChatForm {
                    user_query: form.user_query,
                    image_present: false,
                })
            }
            Some(other) => Err(bad_form(format!(
                "Expected a form-encoded body, got {other}"
            ))),
        }
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<ChatForm, Response> {
    let mut form = ChatForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_form(e.body_text()))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("user_query") => {
                form.user_query = field.text().await.map_err(|e| bad_form(e.body_text()))?;
            }
            Some("image") => {
                // An image is rejected whatever else was sent; stop reading here.
                if field.file_name().is_some_and(|name| !name.is_empty()) {
                    form.image_present = true;
                    return Ok(form);
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

fn bad_form(message: String) -> Response {
    log::debug!("Rejected malformed chat form: {message}");
    detail(StatusCode::BAD_REQUEST, message)
}

fn detail(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorDetail { detail: message })).into_response()
}

/// Maps a [`SummaryError`] onto the HTTP contract of `POST /chat`.
struct ChatError {
    error: SummaryError,
    legacy: bool,
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let message = self.error.to_string();

        if self.error.is_client_error() {
            log::debug!("Rejected chat request: {message}");
            return detail(StatusCode::BAD_REQUEST, message);
        }

        log::warn!("Chat request failed: {message}");

        if self.legacy {
            let response = match &self.error {
                SummaryError::Generation(_) => message,
                _ => format!("Error summarizing text: {message}"),
            };
            return (StatusCode::OK, Json(ChatResponse { response })).into_response();
        }

        let status = match self.error {
            SummaryError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::BAD_GATEWAY,
        };
        detail(status, message)
    }
}
