//! A small web service that turns user text into a one-line summary.
//!
//! The pieces, leaf first:
//!
//! - [`PromptTemplate`] renders the fixed summarization prompt.
//! - [`TextModel`] is the seam to an external text-generation provider, with
//!   [`GeminiModel`] as the production backend and [`ModelClient`] as the
//!   process-wide handle built once at startup.
//! - [`SummarizationService`] validates requests and makes at most one
//!   provider call per request.
//! - [`server::router`] exposes the static pages, `GET /health` and
//!   `POST /chat` over axum.

pub mod config;
pub mod error;
pub mod gemini;
pub mod messages;
pub mod model;
pub mod pages;
pub mod server;
pub mod service;
pub mod template;

pub use config::ModelConfig;
pub use error::{GenerationError, InitializationError, SummaryError, TemplateError};
pub use gemini::{GeminiError, GeminiModel};
pub use model::{ModelClient, TextModel};
pub use server::{AppState, router};
pub use service::{SummarizationRequest, SummarizationService, Summary};
pub use template::{DEFAULT_PROMPT_TEMPLATE, PromptTemplate};
